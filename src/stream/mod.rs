//! Streaming output handling.
//!
//! This module turns the raw chunk stream of a backend process into
//! rendered text and a termination report. The main types are:
//!
//! - [`LineSplitter`] - classifies raw chunks into lines and prompt candidates
//! - [`OutputEvent`] - one classified piece of raw output
//! - [`RunStream`] - the supervisor for one operation, an async stream of [`RunEvent`]s
//! - [`RunOutput`] - the collected result of one operation
//!
//! # Example
//!
//! ```ignore
//! use futures::StreamExt;
//! use passbridge::stream::RunEvent;
//!
//! let mut stream = client.show_entry_stream(&"foo.com".into()).await?;
//!
//! while let Some(event) = stream.next().await {
//!     match event? {
//!         RunEvent::Text(text) => print!("{}", text),
//!         RunEvent::Finished(termination) => {
//!             if !termination.is_normal() {
//!                 eprintln!("backend failed: {:?}", termination);
//!             }
//!         }
//!     }
//! }
//! ```
//!
//! # Cancellation
//!
//! Dropping a [`RunStream`] will:
//! 1. Cancel the background reader task
//! 2. Kill the backend subprocess
//!
//! This ensures clean resource cleanup even when not consuming the full
//! stream.

pub mod events;
pub mod run;
pub mod splitter;

pub use events::{OutputEvent, RunEvent, RunOutput};
pub use run::{with_timeout, RunStream};
pub use splitter::LineSplitter;
