//! Backend tool adapters.
//!
//! Each supported password-store tool has a distinct argument convention
//! and a distinct output grammar: `pwdb` emits machine-readable field
//! lines, `pwsafe` emits free-form formatted records. The line/prompt
//! framing in [`crate::stream`] is shared; everything tool-specific lives
//! behind the [`Backend`] trait, so a new tool is added by implementing
//! this trait, not by touching the framing logic.

use std::ffi::OsString;
use std::path::Path;

use crate::config::{BackendKind, EntryName};

mod pwdb;
mod pwsafe;

pub use pwdb::Pwdb;
pub use pwsafe::Pwsafe;

/// The per-tool adapter contract.
///
/// Implementations are stateless; the same static instance serves every
/// operation for its [`BackendKind`].
pub trait Backend: Send + Sync {
    /// Default executable name, resolved via PATH unless overridden.
    fn tool_name(&self) -> &'static str;

    /// Arguments for enumerating all entry names.
    fn list_args(&self, db: &Path) -> Vec<OsString>;

    /// Arguments for requesting one entry's fields.
    fn display_args(&self, db: &Path, entry: &EntryName) -> Vec<OsString>;

    /// Map one raw output line to zero or one lines of user-visible text.
    ///
    /// The input always ends in a newline. Returning `None` drops the line.
    fn transform_line(&self, line: &str) -> Option<String>;

    /// Check whether the pending (non-newline-terminated) output is a
    /// passphrase request. On match, returns the prompt text to present;
    /// the supervisor obtains the secret and writes it back.
    fn recognize_prompt<'a>(&self, pending: &'a str) -> Option<&'a str>;
}

impl BackendKind {
    /// Resolve this kind to its static adapter.
    pub fn backend(self) -> &'static dyn Backend {
        match self {
            BackendKind::Pwdb => &Pwdb,
            BackendKind::Pwsafe => &Pwsafe,
        }
    }
}
