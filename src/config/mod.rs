//! Configuration for the backend client.
//!
//! This module provides:
//!
//! - [`ClientConfig`] and [`ClientConfigBuilder`] for configuring the client
//! - Type-safe options like [`BackendKind`], [`CachePolicy`], and [`EntryName`]
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use passbridge::config::{BackendKind, CachePolicy, ClientConfig};
//!
//! let config = ClientConfig::builder()
//!     .backend(BackendKind::Pwsafe)
//!     .database("/home/user/.pwsafe.dat")
//!     .cache_policy(CachePolicy::ExpireAfter(Duration::from_secs(300)))
//!     .build()?;
//! ```

pub mod builder;
pub mod options;

// Re-export commonly used types
pub use builder::{ClientConfig, ClientConfigBuilder};
pub use options::{BackendKind, CachePolicy, EntryName};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_exports_accessible() {
        // Verify all public types are accessible
        let _: BackendKind = BackendKind::Pwdb;
        let _: CachePolicy = CachePolicy::Never;
        let _: EntryName = EntryName::new("test");
    }

    #[test]
    fn builder_accessible() {
        // Should be able to create a builder
        let _ = ClientConfig::builder();
    }
}
