//! Client configuration and builder.
//!
//! This module provides the builder pattern for configuring the backend client.
//!
//! # Example
//!
//! ```ignore
//! use passbridge::config::{BackendKind, CachePolicy, ClientConfig};
//!
//! let config = ClientConfig::builder()
//!     .backend(BackendKind::Pwsafe)
//!     .database("/home/user/.pwsafe.dat")
//!     .cache_policy(CachePolicy::ExpireAfter(Duration::from_secs(60)))
//!     .build()?;
//! ```

use std::collections::HashMap;
use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use super::options::{BackendKind, CachePolicy};
use crate::{Error, Result};

/// Configuration for the backend client.
///
/// Use [`ClientConfig::builder()`] to create a new configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    // Backend selection
    pub(crate) backend: BackendKind,
    pub(crate) database: PathBuf,

    // Credential cache
    pub(crate) cache_policy: CachePolicy,

    // Process options
    pub(crate) tool_path: Option<PathBuf>,
    pub(crate) working_directory: Option<PathBuf>,
    pub(crate) timeout: Option<Duration>,
    pub(crate) env_vars: HashMap<String, String>,
    pub(crate) inherit_env: bool,
}

impl ClientConfig {
    /// Create a new builder for ClientConfig.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Get the selected backend kind.
    pub fn backend(&self) -> BackendKind {
        self.backend
    }

    /// Get the database file path.
    pub fn database(&self) -> &PathBuf {
        &self.database
    }

    /// Get the credential cache policy.
    pub fn cache_policy(&self) -> CachePolicy {
        self.cache_policy
    }

    /// Get the timeout if set.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Get the working directory if set.
    pub fn working_directory(&self) -> Option<&PathBuf> {
        self.working_directory.as_ref()
    }

    /// Get the command to invoke: the configured tool path, or the
    /// backend's default executable name.
    pub(crate) fn tool_command(&self) -> OsString {
        self.tool_path
            .as_ref()
            .map(|p| p.as_os_str().to_os_string())
            .unwrap_or_else(|| OsString::from(self.backend.backend().tool_name()))
    }
}

/// Builder for [`ClientConfig`].
///
/// This builder validates the configuration when
/// [`build()`](ClientConfigBuilder::build) is called. The database file
/// itself is never pre-validated: a missing or unreadable database surfaces
/// through the backend tool's own output, exactly as it would interactively.
#[derive(Debug, Clone)]
pub struct ClientConfigBuilder {
    backend: BackendKind,
    database: Option<PathBuf>,
    cache_policy: CachePolicy,
    tool_path: Option<PathBuf>,
    working_directory: Option<PathBuf>,
    timeout: Option<Duration>,
    env_vars: HashMap<String, String>,
    inherit_env: bool,
}

impl Default for ClientConfigBuilder {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            database: None,
            cache_policy: CachePolicy::default(),
            tool_path: None,
            working_directory: None,
            timeout: None,
            env_vars: HashMap::new(),
            inherit_env: true, // Default: inherit parent environment
        }
    }
}

impl ClientConfigBuilder {
    // -------------------------------------------------------------------------
    // Backend selection
    // -------------------------------------------------------------------------

    /// Select the backend tool to drive.
    pub fn backend(mut self, kind: BackendKind) -> Self {
        self.backend = kind;
        self
    }

    /// Path to the backend database file (required).
    ///
    /// The file is opaque to this crate and is not checked for existence;
    /// the backend tool owns its format and its error reporting.
    pub fn database(mut self, path: impl Into<PathBuf>) -> Self {
        self.database = Some(path.into());
        self
    }

    // -------------------------------------------------------------------------
    // Credential cache
    // -------------------------------------------------------------------------

    /// Set the passphrase cache policy (default: never cache).
    pub fn cache_policy(mut self, policy: CachePolicy) -> Self {
        self.cache_policy = policy;
        self
    }

    // -------------------------------------------------------------------------
    // Process options
    // -------------------------------------------------------------------------

    /// Path to the backend tool binary (default: search PATH for the
    /// backend's own executable name).
    pub fn tool_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.tool_path = Some(path.into());
        self
    }

    /// Working directory for the backend process.
    pub fn working_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.working_directory = Some(path.into());
        self
    }

    /// Overall timeout for one operation.
    ///
    /// By default there is none: a backend that never completes a line or
    /// never exits hangs the caller, matching the interactive behavior of
    /// the tools themselves.
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Add/override environment variable for the subprocess.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }

    /// Don't inherit parent environment (default: inherit).
    pub fn inherit_env(mut self, inherit: bool) -> Self {
        self.inherit_env = inherit;
        self
    }

    // -------------------------------------------------------------------------
    // Build
    // -------------------------------------------------------------------------

    /// Build the configuration.
    ///
    /// This validates:
    /// - A database path was provided
    /// - The working directory exists if specified
    /// - The timeout is nonzero if specified
    ///
    /// Note: tool existence is checked lazily at spawn time.
    pub fn build(self) -> Result<ClientConfig> {
        let database = self
            .database
            .ok_or_else(|| Error::InvalidConfig("database path is required".into()))?;

        if let Some(ref dir) = self.working_directory {
            if !dir.exists() {
                return Err(Error::InvalidConfig(format!(
                    "working directory does not exist: {}",
                    dir.display()
                )));
            }
        }

        if let Some(timeout) = self.timeout {
            if timeout.is_zero() {
                return Err(Error::InvalidConfig("timeout must be nonzero".into()));
            }
        }

        Ok(ClientConfig {
            backend: self.backend,
            database,
            cache_policy: self.cache_policy,
            tool_path: self.tool_path,
            working_directory: self.working_directory,
            timeout: self.timeout,
            env_vars: self.env_vars,
            inherit_env: self.inherit_env,
        })
    }
}
