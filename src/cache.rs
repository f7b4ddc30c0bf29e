//! In-memory passphrase cache.
//!
//! Holds at most one database passphrase, governed by a
//! [`CachePolicy`](crate::config::CachePolicy): never cache, keep until
//! cleared, or keep with a time-based expiry. The cache deliberately
//! survives failed runs so the user is not re-prompted after a backend
//! error.

use std::sync::Arc;

use secrecy::SecretString;
use tokio::sync::Mutex;

use crate::config::CachePolicy;
use crate::prompt::SecurePrompt;
use crate::Result;

struct CacheState {
    secret: Option<Arc<SecretString>>,
    /// At most one live expiry timer; arming a new one aborts the old.
    timer: Option<tokio::task::JoinHandle<()>>,
}

/// Cache for the backend database passphrase.
///
/// Cloning is cheap and all clones share the same state, so a client and
/// its clones see one cache. Absence of a cached secret is never an error;
/// it triggers the [`SecurePrompt`] collaborator.
#[derive(Clone)]
pub struct CredentialCache {
    policy: CachePolicy,
    state: Arc<Mutex<CacheState>>,
}

impl CredentialCache {
    /// Create an empty cache with the given policy.
    pub fn new(policy: CachePolicy) -> Self {
        Self {
            policy,
            state: Arc::new(Mutex::new(CacheState {
                secret: None,
                timer: None,
            })),
        }
    }

    /// Get the cache policy.
    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// Return the cached secret, or collect one via the prompt collaborator.
    ///
    /// Under [`CachePolicy::Keep`] the collected secret is stored until
    /// cleared; under [`CachePolicy::ExpireAfter`] a single expiry timer is
    /// armed that clears it after the configured duration. Under
    /// [`CachePolicy::Never`] nothing is stored and every call prompts.
    pub async fn get_or_prompt<P>(&self, prompt_text: &str, prompter: &P) -> Result<Arc<SecretString>>
    where
        P: SecurePrompt + ?Sized,
    {
        if let Some(secret) = self.state.lock().await.secret.clone() {
            tracing::debug!("using cached passphrase");
            return Ok(secret);
        }

        let secret = Arc::new(prompter.prompt(prompt_text).await?);

        match self.policy {
            CachePolicy::Never => {}
            CachePolicy::Keep => {
                let mut state = self.state.lock().await;
                if let Some(timer) = state.timer.take() {
                    timer.abort();
                }
                state.secret = Some(Arc::clone(&secret));
            }
            CachePolicy::ExpireAfter(duration) => {
                let mut state = self.state.lock().await;
                if let Some(timer) = state.timer.take() {
                    timer.abort();
                }
                state.secret = Some(Arc::clone(&secret));

                let shared = Arc::clone(&self.state);
                state.timer = Some(tokio::spawn(async move {
                    tokio::time::sleep(duration).await;
                    let mut state = shared.lock().await;
                    state.secret = None;
                    state.timer = None;
                    tracing::debug!("cached passphrase expired");
                }));
            }
        }

        Ok(secret)
    }

    /// Erase the cached secret and cancel any pending expiry timer.
    ///
    /// Returns whether something was actually cleared, so callers can tell
    /// the user the difference. Clearing an empty cache is not an error.
    pub async fn clear(&self) -> bool {
        let mut state = self.state.lock().await;
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
        state.secret.take().is_some()
    }
}
