//! High-level client for browsing and retrieving password entries.
//!
//! This module provides [`PassClient`], the main entry point for driving a
//! backend password-store tool.
//!
//! # Example
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
//!
//!     let output = client.show_entry(&"foo.com".into()).await?;
//!     print!("{}", output.rendered);
//!
//!     Ok(())
//! }
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::CredentialCache;
use crate::config::{BackendKind, CachePolicy, ClientConfig, ClientConfigBuilder, EntryName};
use crate::prompt::{SecurePrompt, TerminalPrompt};
use crate::stream::{with_timeout, RunOutput, RunStream};
use crate::Result;

/// A client for one backend password database.
///
/// `PassClient` holds the configuration, the credential cache, and the
/// secure prompt collaborator. It runs one backend process per operation
/// and blocks the caller (asynchronously) until the process exits.
///
/// # Thread Safety
///
/// `PassClient` is `Send + Sync`, and cloning is cheap: clones share the
/// configuration and the credential cache, so a passphrase collected by
/// one clone serves them all. The cache also survives failed runs, so a
/// backend error does not force a re-prompt.
///
/// # Example
///
/// ```ignore
/// let client = PassClient::builder()
///     .database("/home/user/.pwsafe.dat")
///     .backend(BackendKind::Pwsafe)
///     .cache_policy(CachePolicy::ExpireAfter(Duration::from_secs(300)))
///     .build()?;
///
/// let entries = client.list_entries().await?;
/// ```
#[derive(Clone)]
pub struct PassClient {
    config: Arc<ClientConfig>,
    cache: CredentialCache,
    prompter: Arc<dyn SecurePrompt>,
}

impl PassClient {
    /// Create a new client with the given configuration.
    ///
    /// Uses the terminal prompt for passphrase collection; use
    /// [`builder()`](Self::builder) with
    /// [`prompt()`](ClientBuilder::prompt) to inject another collaborator.
    pub fn with_config(config: ClientConfig) -> Self {
        Self::with_prompter(config, Arc::new(TerminalPrompt::new()))
    }

    /// Create a new client with a custom secure prompt collaborator.
    pub fn with_prompter(config: ClientConfig, prompter: Arc<dyn SecurePrompt>) -> Self {
        let cache = CredentialCache::new(config.cache_policy());
        Self {
            config: Arc::new(config),
            cache,
            prompter,
        }
    }

    /// Create a builder for configuring a new client.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let client = PassClient::builder()
    ///     .backend(BackendKind::Pwdb)
    ///     .database("/home/user/passwords.db")
    ///     .build()?;
    /// ```
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Enumerate all entry names, lexicographically sorted.
    ///
    /// The backend emits entries in its own order with a trailing
    /// separator artifact; the captured output is post-processed so list
    /// order is always alphabetical, not process-emission order.
    pub async fn list_entries(&self) -> Result<Vec<String>> {
        let backend = self.config.backend().backend();
        let args = backend.list_args(self.config.database());
        let output = self.collect(args).await?;

        let mut entries: Vec<String> = output.rendered.split('\n').map(String::from).collect();
        if entries.last().is_some_and(|line| line.is_empty()) {
            entries.pop();
        }
        entries.sort();
        Ok(entries)
    }

    /// Retrieve one entry's fields as rendered text.
    ///
    /// The call blocks until the backend process exits. An abnormal exit
    /// is not an error: it is carried in the returned
    /// [`RunOutput::termination`] alongside whatever output was captured.
    pub async fn show_entry(&self, name: &EntryName) -> Result<RunOutput> {
        let backend = self.config.backend().backend();
        let args = backend.display_args(self.config.database(), name);
        self.collect(args).await
    }

    /// Retrieve one entry as a stream of events.
    ///
    /// This is the low-level streaming API; for simple use cases prefer
    /// [`show_entry`](Self::show_entry).
    ///
    /// # Cancellation
    ///
    /// Dropping the returned [`RunStream`] kills the backend process.
    pub async fn show_entry_stream(&self, name: &EntryName) -> Result<RunStream> {
        let backend = self.config.backend().backend();
        let args = backend.display_args(self.config.database(), name);
        RunStream::spawn(
            &self.config,
            backend,
            self.cache.clone(),
            Arc::clone(&self.prompter),
            args,
        )
    }

    /// Erase the cached passphrase.
    ///
    /// Returns whether something was actually cleared; clearing an empty
    /// cache is not an error.
    pub async fn clear_cached_secret(&self) -> bool {
        self.cache.clear().await
    }

    /// Get a reference to the client's configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Run one operation and collect its output, honoring the configured
    /// timeout if any.
    async fn collect(&self, args: Vec<std::ffi::OsString>) -> Result<RunOutput> {
        let backend = self.config.backend().backend();
        let stream = RunStream::spawn(
            &self.config,
            backend,
            self.cache.clone(),
            Arc::clone(&self.prompter),
            args,
        )?;

        if let Some(timeout) = self.config.timeout() {
            with_timeout(timeout, stream.collect_output()).await
        } else {
            stream.collect_output().await
        }
    }
}

impl fmt::Debug for PassClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PassClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Builder for [`PassClient`].
///
/// This wraps [`ClientConfigBuilder`] and builds directly into a
/// [`PassClient`].
///
/// # Example
///
/// ```ignore
/// let client = PassClient::builder()
///     .backend(BackendKind::Pwsafe)
///     .database("/home/user/.pwsafe.dat")
///     .cache_policy(CachePolicy::Keep)
///     .build()?;
/// ```
#[derive(Default)]
pub struct ClientBuilder {
    inner: ClientConfigBuilder,
    prompter: Option<Arc<dyn SecurePrompt>>,
}

impl ClientBuilder {
    /// Create a new client builder with default settings.
    pub fn new() -> Self {
        Self {
            inner: ClientConfigBuilder::default(),
            prompter: None,
        }
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid (e.g. no database
    /// path, or a working directory that does not exist).
    pub fn build(self) -> Result<PassClient> {
        let config = self.inner.build()?;
        let prompter = self
            .prompter
            .unwrap_or_else(|| Arc::new(TerminalPrompt::new()));
        Ok(PassClient::with_prompter(config, prompter))
    }

    // -------------------------------------------------------------------------
    // Backend selection (delegated to ClientConfigBuilder)
    // -------------------------------------------------------------------------

    /// Select the backend tool to drive.
    pub fn backend(mut self, kind: BackendKind) -> Self {
        self.inner = self.inner.backend(kind);
        self
    }

    /// Path to the backend database file (required).
    pub fn database(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.inner = self.inner.database(path);
        self
    }

    // -------------------------------------------------------------------------
    // Credential cache and prompting
    // -------------------------------------------------------------------------

    /// Set the passphrase cache policy (default: never cache).
    pub fn cache_policy(mut self, policy: CachePolicy) -> Self {
        self.inner = self.inner.cache_policy(policy);
        self
    }

    /// Inject a secure prompt collaborator (default: terminal prompt).
    pub fn prompt(mut self, prompter: Arc<dyn SecurePrompt>) -> Self {
        self.prompter = Some(prompter);
        self
    }

    // -------------------------------------------------------------------------
    // Process options
    // -------------------------------------------------------------------------

    /// Path to the backend tool binary.
    pub fn tool_path(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.inner = self.inner.tool_path(path);
        self
    }

    /// Working directory for the backend process.
    pub fn working_directory(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.inner = self.inner.working_directory(path);
        self
    }

    /// Overall timeout for one operation (default: none).
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.inner = self.inner.timeout(duration);
        self
    }

    /// Add/override environment variable for the subprocess.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.inner = self.inner.env(key, value);
        self
    }

    /// Don't inherit parent environment (default: inherit).
    pub fn inherit_env(mut self, inherit: bool) -> Self {
        self.inner = self.inner.inherit_env(inherit);
        self
    }
}

impl fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_produces_client() {
        let client = PassClient::builder()
            .backend(BackendKind::Pwsafe)
            .database("/tmp/safe.dat")
            .cache_policy(CachePolicy::Keep)
            .build()
            .unwrap();

        assert_eq!(client.config().backend(), BackendKind::Pwsafe);
        assert_eq!(client.config().cache_policy(), CachePolicy::Keep);
    }

    #[test]
    fn builder_validation_propagates() {
        let result = PassClient::builder().build();
        assert!(result.is_err());
    }

    #[test]
    fn clones_share_the_cache() {
        let client = PassClient::builder()
            .database("/tmp/test.db")
            .build()
            .unwrap();
        let clone = client.clone();

        assert!(Arc::ptr_eq(&client.config, &clone.config));
    }

    #[tokio::test]
    async fn clear_on_fresh_client_reports_nothing_cached() {
        let client = PassClient::builder()
            .database("/tmp/test.db")
            .build()
            .unwrap();

        assert!(!client.clear_cached_secret().await);
    }

    #[test]
    fn client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PassClient>();
        assert_send_sync::<ClientBuilder>();
    }
}
