//! # passbridge
//!
//! Async Rust adapter for interactive password-store CLI tools.
//!
//! This library lets a caller browse named password entries stored in a
//! backend-specific database and retrieve a password by driving the
//! backend's own command-line tool as a subprocess: it launches the tool,
//! incrementally buffers its raw output, splits it into complete lines
//! versus trailing interactive prompts, answers passphrase prompts without
//! echoing, and blocks the caller until the process exits.
//!
//! Two backends are supported, selected by [`BackendKind`]: `pwdb` and
//! `pwsafe`. The database file format is entirely opaque to this crate;
//! the tools own it.
//!
//! ## Quick Start
//!
//! ```ignore
//! use passbridge::{BackendKind, PassClient, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = PassClient::builder()
//!         .backend(BackendKind::Pwsafe)
//!         .database("/home/user/.pwsafe.dat")
//!         .build()?;
//!
//!     for name in client.list_entries().await? {
//!         println!("{}", name);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Streaming
//!
//! ```ignore
//! use futures::StreamExt;
//! use passbridge::{PassClient, RunEvent};
//!
//! let mut stream = client.show_entry_stream(&"foo.com".into()).await?;
//! while let Some(event) = stream.next().await {
//!     if let RunEvent::Text(text) = event? {
//!         print!("{}", text);
//!     }
//! }
//! ```
//!
//! ## Passphrase caching
//!
//! The backend tools prompt for their database passphrase. The prompt is
//! answered via a [`SecurePrompt`] collaborator (terminal by default,
//! never echoing) and optionally cached per [`CachePolicy`]:
//!
//! ```ignore
//! use std::time::Duration;
//! use passbridge::{CachePolicy, PassClient};
//!
//! let client = PassClient::builder()
//!     .database("/home/user/.pwsafe.dat")
//!     .cache_policy(CachePolicy::ExpireAfter(Duration::from_secs(300)))
//!     .build()?;
//! ```

pub mod backend;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod process;
pub mod prompt;
pub mod stream;

pub use error::{Error, Result};

// Re-export the client types at crate root
pub use client::{ClientBuilder, PassClient};

// Re-export commonly used config types at crate root
pub use config::{BackendKind, CachePolicy, ClientConfig, ClientConfigBuilder, EntryName};

// Re-export commonly used collaborators at crate root
pub use cache::CredentialCache;
pub use prompt::{SecurePrompt, TerminalPrompt};

// Re-export commonly used process types at crate root
pub use process::{BackendProcess, Termination};

// Re-export commonly used stream types at crate root
pub use stream::{LineSplitter, OutputEvent, RunEvent, RunOutput, RunStream};
