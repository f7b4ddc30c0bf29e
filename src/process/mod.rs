//! Process management for backend tools.
//!
//! This module handles spawning and communicating with the backend
//! subprocess. Each operation spawns a new tool process; the tool prompts
//! for its database passphrase on the same streams it prints output to.
//!
//! # Architecture
//!
//! ```text
//! passbridge                          backend tool
//! ┌──────────────┐                   ┌─────────────┐
//! │BackendProcess│──stdin (secrets)─▶│             │
//! │              │◀──stdout (chunks)─│             │
//! │              │◀──stderr (chunks)─│             │
//! └──────────────┘                   └─────────────┘
//! ```
//!
//! # Output Protocol
//!
//! The tools emit newline-delimited text, except for interactive prompts,
//! which arrive without a trailing newline. Output is therefore read in raw
//! chunks, never line-buffered: a line reader would sit on a prompt forever
//! waiting for the newline that never comes.

mod io;
mod spawn;

pub use io::{ChunkRead, PipePair, PipeReader, PipeWriter, RespondWrite};
pub use spawn::{BackendProcess, Termination};

/// Read size for one chunk of process output.
pub const READ_CHUNK_BYTES: usize = 4096;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn types_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<BackendProcess>();
        assert_send_sync::<Termination>();
    }

    #[test]
    fn constants_are_reasonable() {
        assert!(READ_CHUNK_BYTES >= 1024, "chunk reads should be at least 1KB");
    }
}
