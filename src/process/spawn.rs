//! Process spawning and lifecycle management.

use std::ffi::OsString;
use std::process::{ExitStatus, Stdio};

use tokio::process::{Child, Command};

use super::io::{PipePair, PipeWriter};
use crate::config::ClientConfig;
use crate::{Error, Result};

/// A running backend tool process.
///
/// This struct manages the lifecycle of a single tool invocation. Each
/// operation spawns a new process.
///
/// # Cancellation
///
/// Dropping a `BackendProcess` will kill the subprocess if it's still
/// running. Out-of-band kills are classified as [`Termination::Killed`],
/// not surfaced as failures.
pub struct BackendProcess {
    child: Child,
    output: Option<PipePair>,
    input: Option<PipeWriter>,
}

impl BackendProcess {
    /// Spawn the backend tool with the given operation arguments.
    ///
    /// All three standard streams are piped: output and prompts are read
    /// from stdout/stderr, prompt responses are written to stdin.
    pub fn spawn(config: &ClientConfig, args: Vec<OsString>) -> Result<Self> {
        let mut cmd = build_command(config);
        cmd.args(&args);
        cmd.stdin(Stdio::piped());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        tracing::debug!(tool = %config.tool_command().to_string_lossy(), "spawning backend");

        let mut child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::BackendNotFound {
                    searched: config.tool_command().to_string_lossy().into_owned(),
                }
            } else {
                Error::ProcessSpawn(e)
            }
        })?;

        let stdin = child.stdin.take().expect("stdin was configured");
        let stdout = child.stdout.take().expect("stdout was configured");
        let stderr = child.stderr.take().expect("stderr was configured");

        Ok(Self {
            child,
            output: Some(PipePair::new(stdout, stderr)),
            input: Some(PipeWriter::new(stdin)),
        })
    }

    /// Take the merged output reader. It can only be taken once.
    pub fn take_output(&mut self) -> Option<PipePair> {
        self.output.take()
    }

    /// Take the stdin writer. It can only be taken once.
    pub fn take_input(&mut self) -> Option<PipeWriter> {
        self.input.take()
    }

    /// Get the process ID of the running tool.
    pub fn pid(&self) -> Option<u32> {
        self.child.id()
    }

    /// Wait for the process to exit and return its exit status.
    pub async fn wait(&mut self) -> Result<ExitStatus> {
        self.child.wait().await.map_err(Error::io)
    }

    /// Try to kill the process without waiting.
    pub fn start_kill(&mut self) -> Result<()> {
        self.child.start_kill().map_err(Error::io)
    }
}

impl Drop for BackendProcess {
    fn drop(&mut self) {
        // Try to kill the process if it's still running
        let _ = self.start_kill();
    }
}

/// Build a tokio Command from the config.
fn build_command(config: &ClientConfig) -> Command {
    let mut cmd = Command::new(config.tool_command());

    if let Some(ref dir) = config.working_directory {
        cmd.current_dir(dir);
    }

    if !config.inherit_env {
        cmd.env_clear();
    }

    for (key, value) in &config.env_vars {
        cmd.env(key, value);
    }

    cmd
}

/// Classification of a backend process exit.
///
/// Only abnormal exits and unrecognized statuses are worth reporting;
/// a finished or killed process is silent. None of these are [`Error`]s:
/// the operation still returns whatever output was captured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// Exited with status zero.
    Completed,
    /// Terminated by a signal (including out-of-band kills).
    Killed,
    /// Exited with a nonzero status code.
    Abnormal { code: i32 },
    /// The platform reported something unrecognizable.
    Unknown(String),
}

impl Termination {
    /// Classify an exit status.
    pub fn classify(status: ExitStatus) -> Self {
        if status.success() {
            return Termination::Completed;
        }
        if let Some(code) = status.code() {
            return Termination::Abnormal { code };
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if status.signal().is_some() {
                return Termination::Killed;
            }
        }
        Termination::Unknown(status.to_string())
    }

    /// Whether this termination needs no report (finished or killed).
    pub fn is_normal(&self) -> bool {
        matches!(self, Termination::Completed | Termination::Killed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    fn status_from_raw(raw: i32) -> ExitStatus {
        use std::os::unix::process::ExitStatusExt;
        ExitStatus::from_raw(raw)
    }

    #[cfg(unix)]
    #[test]
    fn classify_success_is_completed() {
        let t = Termination::classify(status_from_raw(0));
        assert_eq!(t, Termination::Completed);
        assert!(t.is_normal());
    }

    #[cfg(unix)]
    #[test]
    fn classify_exit_code_is_abnormal() {
        // Wait status encodes the exit code in the high byte
        let t = Termination::classify(status_from_raw(3 << 8));
        assert_eq!(t, Termination::Abnormal { code: 3 });
        assert!(!t.is_normal());
    }

    #[cfg(unix)]
    #[test]
    fn classify_signal_is_killed() {
        // Wait status for death by SIGKILL
        let t = Termination::classify(status_from_raw(9));
        assert_eq!(t, Termination::Killed);
        assert!(t.is_normal());
    }

    #[test]
    fn build_command_applies_env() {
        let config = ClientConfig::builder()
            .database("/tmp/test.db")
            .env("PWDB_OPTS", "--color=never")
            .build()
            .unwrap();

        // Command construction itself must not touch the filesystem
        let cmd = build_command(&config);
        let envs: Vec<_> = cmd.as_std().get_envs().collect();
        assert!(envs
            .iter()
            .any(|(k, v)| *k == "PWDB_OPTS" && v.is_some_and(|v| v == "--color=never")));
    }

    #[test]
    fn process_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<BackendProcess>();
    }
}
