//! Secure passphrase prompting.
//!
//! The backend tools request their database passphrase interactively. This
//! module defines the [`SecurePrompt`] collaborator that collects it from
//! the user without echoing, and a terminal implementation built on
//! `rpassword`.

use std::future::Future;
use std::pin::Pin;

use secrecy::SecretString;

use crate::{Error, Result};

/// A collaborator that collects a secret from the user.
///
/// Implementations must never display the typed input. The prompt text is
/// whatever the backend tool emitted, e.g. `Enter passphrase for /path/db:`.
pub trait SecurePrompt: Send + Sync {
    /// Prompt the user and return the entered secret.
    fn prompt(
        &self,
        text: &str,
    ) -> Pin<Box<dyn Future<Output = Result<SecretString>> + Send + '_>>;
}

/// Terminal-based passphrase prompt.
///
/// Reads from the controlling terminal with echo disabled, suitable for
/// interactive sessions. Prompting runs on the blocking thread pool so the
/// async runtime is not stalled while the user types.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl TerminalPrompt {
    /// Create a new terminal prompt.
    pub fn new() -> Self {
        Self
    }
}

impl SecurePrompt for TerminalPrompt {
    fn prompt(
        &self,
        text: &str,
    ) -> Pin<Box<dyn Future<Output = Result<SecretString>> + Send + '_>> {
        let text = text.to_string();
        Box::pin(async move {
            let password = tokio::task::spawn_blocking(move || {
                rpassword::prompt_password(format!("{} ", text.trim_end()))
            })
            .await
            .map_err(|e| Error::Prompt(format!("prompt task failed: {}", e)))?
            .map_err(|e| Error::Prompt(format!("failed to read passphrase: {}", e)))?;

            tracing::debug!("passphrase entered at terminal");
            Ok(SecretString::from(password))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_prompt_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TerminalPrompt>();
    }

    #[test]
    fn trait_object_is_usable() {
        let prompt: Box<dyn SecurePrompt> = Box::new(TerminalPrompt::new());
        let _ = &prompt;
    }
}
