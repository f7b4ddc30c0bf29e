use std::time::Duration;

/// Errors that can occur when using passbridge.
///
/// Errors are organized by category:
/// - Configuration errors: detected at `build()` time
/// - Spawn errors: failed to start the backend process
/// - IO errors: communication failures with the subprocess
/// - Prompt errors: the secure prompt collaborator failed
/// - Runtime errors: failures during execution
///
/// An abnormal backend exit is deliberately *not* an `Error`: it is carried
/// in [`Termination`](crate::process::Termination) alongside whatever output
/// was captured before the process died.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    // -------------------------------------------------------------------------
    // Configuration errors (detected at build() time)
    // -------------------------------------------------------------------------
    /// Invalid configuration provided to builder.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // -------------------------------------------------------------------------
    // Spawn errors
    // -------------------------------------------------------------------------
    /// Backend tool binary not found in PATH.
    #[error("backend tool not found (searched: {searched})")]
    BackendNotFound { searched: String },

    /// Failed to spawn the backend subprocess.
    #[error("failed to spawn backend process: {0}")]
    ProcessSpawn(#[source] std::io::Error),

    // -------------------------------------------------------------------------
    // IO errors
    // -------------------------------------------------------------------------
    /// IO error communicating with the backend subprocess.
    #[error("IO error: {0}")]
    Io(#[source] std::io::Error),

    // -------------------------------------------------------------------------
    // Prompt errors
    // -------------------------------------------------------------------------
    /// The secure prompt collaborator failed to collect a secret.
    #[error("password prompt failed: {0}")]
    Prompt(String),

    // -------------------------------------------------------------------------
    // Runtime errors
    // -------------------------------------------------------------------------
    /// Stream closed before the backend reported termination.
    #[error("stream closed unexpectedly")]
    StreamClosed,

    /// Operation exceeded the configured timeout.
    #[error("operation timed out after {0:?}")]
    Timeout(Duration),

    /// Operation was cancelled by dropping the stream.
    #[error("operation cancelled")]
    Cancelled,
}

/// A specialized Result type for passbridge operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an IO error.
    pub fn io(source: std::io::Error) -> Self {
        Self::Io(source)
    }

    /// Check if this error is retryable.
    ///
    /// Retryable here means "re-invoking the operation fresh may succeed";
    /// no retry is ever performed automatically.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Timeout(_) | Error::Io(_) | Error::StreamClosed)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }

    #[test]
    fn is_retryable_detection() {
        assert!(Error::Timeout(Duration::from_secs(30)).is_retryable());
        assert!(Error::StreamClosed.is_retryable());
        assert!(!Error::InvalidConfig("bad".into()).is_retryable());
        assert!(!Error::Cancelled.is_retryable());
        assert!(!Error::Prompt("declined".into()).is_retryable());
    }

    #[test]
    fn from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.is_retryable());
    }

    #[test]
    fn question_mark_operator_io() {
        fn fallible_io() -> Result<()> {
            let _file = std::fs::File::open("/nonexistent/path/that/does/not/exist")?;
            Ok(())
        }
        let result = fallible_io();
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn display_includes_context() {
        let err = Error::BackendNotFound {
            searched: "pwsafe".into(),
        };
        assert!(err.to_string().contains("pwsafe"));

        let err = Error::Timeout(Duration::from_secs(5));
        assert!(err.to_string().contains("5s"));
    }
}
