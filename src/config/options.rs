//! Type-safe configuration options for the backend client.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// The backend password-store tool to drive.
///
/// Each kind is bound to an executable name, an argument convention for
/// the list and display operations, a line transform, and a prompt
/// recognizer. Selection is per-client and immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// The `pwdb` tool (machine-readable field output).
    #[default]
    Pwdb,
    /// The `pwsafe` tool (free-form formatted records).
    Pwsafe,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Pwdb => write!(f, "pwdb"),
            BackendKind::Pwsafe => write!(f, "pwsafe"),
        }
    }
}

/// How long a collected database passphrase is kept in memory.
///
/// The policy is a deliberate user preference, injected at build time.
/// It is the only state that survives across operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CachePolicy {
    /// Never cache; every passphrase request prompts.
    #[default]
    Never,
    /// Cache indefinitely, until cleared explicitly.
    Keep,
    /// Cache and clear after the given duration.
    ExpireAfter(Duration),
}

impl fmt::Display for CachePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CachePolicy::Never => write!(f, "never"),
            CachePolicy::Keep => write!(f, "keep"),
            CachePolicy::ExpireAfter(d) => write!(f, "expire after {:?}", d),
        }
    }
}

/// Newtype for entry names to prevent string mixups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryName(pub String);

impl EntryName {
    /// Create a new EntryName from a string.
    pub fn new(name: impl Into<String>) -> Self {
        EntryName(name.into())
    }

    /// Get the entry name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for EntryName {
    fn from(s: String) -> Self {
        EntryName(s)
    }
}

impl From<&str> for EntryName {
    fn from(s: &str) -> Self {
        EntryName(s.to_string())
    }
}

impl AsRef<str> for EntryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_kind_display() {
        assert_eq!(BackendKind::Pwdb.to_string(), "pwdb");
        assert_eq!(BackendKind::Pwsafe.to_string(), "pwsafe");
    }

    #[test]
    fn backend_kind_serde_roundtrip() {
        for kind in [BackendKind::Pwdb, BackendKind::Pwsafe] {
            let json = serde_json::to_string(&kind).unwrap();
            let parsed: BackendKind = serde_json::from_str(&json).unwrap();
            assert_eq!(kind, parsed);
        }
    }

    #[test]
    fn cache_policy_default_is_never() {
        assert_eq!(CachePolicy::default(), CachePolicy::Never);
    }

    #[test]
    fn cache_policy_display() {
        assert_eq!(CachePolicy::Never.to_string(), "never");
        assert_eq!(CachePolicy::Keep.to_string(), "keep");
        assert!(CachePolicy::ExpireAfter(Duration::from_secs(60))
            .to_string()
            .contains("60s"));
    }

    #[test]
    fn entry_name_usage() {
        let name = EntryName::new("foo.com");
        assert_eq!(name.as_str(), "foo.com");
        assert_eq!(name.to_string(), "foo.com");

        let name2: EntryName = "bar.org".into();
        assert_eq!(name2.as_ref(), "bar.org");
    }

    #[test]
    fn entry_name_serde() {
        let name = EntryName::new("foo.com");
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, "\"foo.com\"");

        let parsed: EntryName = serde_json::from_str(&json).unwrap();
        assert_eq!(name, parsed);
    }

    #[test]
    fn types_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<BackendKind>();
        assert_send_sync::<CachePolicy>();
        assert_send_sync::<EntryName>();
    }
}
