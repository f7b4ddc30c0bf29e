//! Operation run stream.
//!
//! This module provides [`RunStream`], the process supervisor: it owns one
//! backend process for the duration of one operation, routes its output
//! through the [`LineSplitter`] and the active backend adapter, answers
//! recognized passphrase prompts, and reports termination.

use std::ffi::OsString;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use futures::Stream;
use secrecy::ExposeSecret;
use tokio::sync::mpsc;
use tokio::time::timeout as tokio_timeout;

use super::events::{OutputEvent, RunEvent, RunOutput};
use super::splitter::LineSplitter;
use crate::backend::Backend;
use crate::cache::CredentialCache;
use crate::config::ClientConfig;
use crate::process::{BackendProcess, ChunkRead, RespondWrite, Termination};
use crate::prompt::SecurePrompt;
use crate::{Error, Result};

/// A stream of events from one backend operation.
///
/// Yields [`RunEvent::Text`] for each rendered output line and a final
/// [`RunEvent::Finished`] once the process has exited. It implements
/// [`futures::Stream`] for use with async combinators; most callers want
/// [`collect_output`](Self::collect_output), which is synchronous from the
/// caller's point of view.
///
/// # Cancellation
///
/// Dropping a `RunStream` will:
/// 1. Stop the background reader task
/// 2. Kill the backend subprocess
///
/// There is no mid-operation cancellation contract beyond that; a process
/// killed out-of-band is reported as a non-error [`Termination::Killed`].
pub struct RunStream {
    rx: mpsc::Receiver<Result<RunEvent>>,
    /// Held to keep the process alive until the stream is dropped.
    #[allow(dead_code)]
    process: Option<Arc<tokio::sync::Mutex<BackendProcess>>>,
    task_handle: Option<tokio::task::JoinHandle<()>>,
}

impl RunStream {
    /// Spawn the backend tool and start supervising it.
    ///
    /// The background task reads raw chunks from the merged output pipes,
    /// feeds them through a [`LineSplitter`], renders complete lines via
    /// the backend's line transform, and answers recognized passphrase
    /// prompts from the credential cache. After output reaches EOF the
    /// process exit is awaited and classified.
    pub fn spawn(
        config: &ClientConfig,
        backend: &'static dyn Backend,
        cache: CredentialCache,
        prompter: Arc<dyn SecurePrompt>,
        args: Vec<OsString>,
    ) -> Result<Self> {
        let mut process = BackendProcess::spawn(config, args)?;
        let output = process.take_output().expect("output pipes were configured");
        let input = process.take_input().expect("input pipe was configured");

        let (tx, rx) = mpsc::channel(64);
        let process = Arc::new(tokio::sync::Mutex::new(process));
        let process_clone = Arc::clone(&process);

        let task_handle = tokio::spawn(async move {
            match run_loop(output, input, backend, cache, prompter, &tx).await {
                Ok(()) => {
                    let status = {
                        let mut guard = process_clone.lock().await;
                        guard.wait().await
                    };
                    match status {
                        Ok(status) => {
                            let termination = Termination::classify(status);
                            report(&termination);
                            let _ = tx.send(Ok(RunEvent::Finished(termination))).await;
                        }
                        Err(e) => {
                            let _ = tx.send(Err(e)).await;
                        }
                    }
                }
                Err(e) => {
                    let _ = tx.send(Err(e)).await;
                    let mut guard = process_clone.lock().await;
                    let _ = guard.start_kill();
                }
            }
        });

        Ok(Self {
            rx,
            process: Some(process),
            task_handle: Some(task_handle),
        })
    }

    /// Supervise an already-open chunk source instead of a spawned process.
    ///
    /// EOF on the reader is reported as [`Termination::Completed`]. This
    /// is the seam used by scripted tests; `spawn` is the production path.
    pub fn from_parts<R, W>(
        reader: R,
        writer: W,
        backend: &'static dyn Backend,
        cache: CredentialCache,
        prompter: Arc<dyn SecurePrompt>,
    ) -> Self
    where
        R: ChunkRead + 'static,
        W: RespondWrite + 'static,
    {
        let (tx, rx) = mpsc::channel(64);

        let task_handle = tokio::spawn(async move {
            match run_loop(reader, writer, backend, cache, prompter, &tx).await {
                Ok(()) => {
                    let _ = tx.send(Ok(RunEvent::Finished(Termination::Completed))).await;
                }
                Err(e) => {
                    let _ = tx.send(Err(e)).await;
                }
            }
        });

        Self {
            rx,
            process: None,
            task_handle: Some(task_handle),
        }
    }

    /// Collect the whole operation into a [`RunOutput`].
    ///
    /// This blocks (asynchronously) until the backend process has exited,
    /// converting the event stream back into the synchronous contract most
    /// callers want.
    pub async fn collect_output(mut self) -> Result<RunOutput> {
        use futures::StreamExt;

        let mut rendered = String::new();
        let mut termination = None;

        while let Some(event) = self.next().await {
            match event? {
                RunEvent::Text(text) => rendered.push_str(&text),
                RunEvent::Finished(t) => termination = Some(t),
            }
        }

        let termination = termination.ok_or(Error::StreamClosed)?;
        Ok(RunOutput {
            rendered,
            termination,
        })
    }
}

impl Stream for RunStream {
    type Item = Result<RunEvent>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().rx.poll_recv(cx)
    }
}

impl Drop for RunStream {
    fn drop(&mut self) {
        // Cancel the background task; the process is killed when the last
        // reference to it is dropped.
        if let Some(handle) = self.task_handle.take() {
            handle.abort();
        }
    }
}

/// Background loop: split chunks, render lines, answer prompts.
async fn run_loop<R, W>(
    mut reader: R,
    mut writer: W,
    backend: &'static dyn Backend,
    cache: CredentialCache,
    prompter: Arc<dyn SecurePrompt>,
    tx: &mpsc::Sender<Result<RunEvent>>,
) -> Result<()>
where
    R: ChunkRead,
    W: RespondWrite,
{
    let mut splitter = LineSplitter::new();

    while let Some(chunk) = reader.read_chunk().await? {
        if tx.is_closed() {
            return Err(Error::Cancelled);
        }
        for event in splitter.feed(&chunk) {
            match event {
                OutputEvent::Line(line) => {
                    if let Some(rendered) = backend.transform_line(&line) {
                        if tx.send(Ok(RunEvent::Text(rendered))).await.is_err() {
                            return Err(Error::Cancelled);
                        }
                    }
                }
                OutputEvent::Prompt(pending) => {
                    if let Some(prompt_text) = backend.recognize_prompt(&pending) {
                        tracing::debug!("passphrase prompt recognized");
                        let secret = cache.get_or_prompt(prompt_text, prompter.as_ref()).await?;
                        writer.write_line(secret.expose_secret()).await?;
                        // The tool has its reply; it will not resend the
                        // partial text, so the whole accumulator goes.
                        splitter.flush();
                    }
                    // An unmatched fragment stays buffered. If it never
                    // completes, the operation stalls, matching the tools'
                    // own interactive behavior.
                }
            }
        }
    }

    Ok(())
}

fn report(termination: &Termination) {
    match termination {
        Termination::Abnormal { code } => {
            tracing::warn!("backend exited abnormally with code {}", code);
        }
        Termination::Unknown(status) => {
            tracing::warn!("unrecognized backend exit status: {}", status);
        }
        _ => tracing::debug!("backend finished"),
    }
}

/// Run a future with a timeout.
///
/// Returns an error if the future doesn't complete within the specified
/// duration.
pub async fn with_timeout<F, T>(duration: Duration, future: F) -> Result<T>
where
    F: std::future::Future<Output = Result<T>>,
{
    match tokio_timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => Err(Error::Timeout(duration)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_stream_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<RunStream>();
    }

    #[tokio::test]
    async fn with_timeout_success() {
        let result = with_timeout(Duration::from_secs(1), async { Ok::<_, Error>(42) }).await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn with_timeout_expires() {
        let result = with_timeout(Duration::from_millis(1), async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok::<_, Error>(42)
        })
        .await;
        assert!(matches!(result, Err(Error::Timeout(_))));
    }

    #[tokio::test]
    async fn with_timeout_inner_error() {
        let result = with_timeout(Duration::from_secs(1), async {
            Err::<i32, _>(Error::Cancelled)
        })
        .await;
        assert!(matches!(result, Err(Error::Cancelled)));
    }
}
