//! Test utilities for passbridge integration tests.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use secrecy::SecretString;

use passbridge::process::{ChunkRead, RespondWrite};
use passbridge::prompt::SecurePrompt;
use passbridge::Result;

/// A chunk source that replays a pre-defined sequence of chunks.
///
/// Chunks are returned in order, then `Ok(None)` signals EOF.
pub struct ScriptedReader {
    chunks: VecDeque<String>,
}

impl ScriptedReader {
    /// Create a new scripted reader from the given chunks.
    pub fn new(chunks: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            chunks: chunks.into_iter().map(Into::into).collect(),
        }
    }
}

impl ChunkRead for ScriptedReader {
    async fn read_chunk(&mut self) -> Result<Option<String>> {
        Ok(self.chunks.pop_front())
    }
}

/// A response sink that records every written line.
#[derive(Clone, Default)]
pub struct CaptureWriter {
    lines: Arc<Mutex<Vec<String>>>,
}

impl CaptureWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// All lines written so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl RespondWrite for CaptureWriter {
    async fn write_line(&mut self, line: &str) -> Result<()> {
        self.lines.lock().unwrap().push(line.to_string());
        Ok(())
    }
}

/// Prompt stub that returns a fixed secret and counts invocations.
pub struct CountingPrompt {
    calls: AtomicUsize,
    secret: String,
}

impl CountingPrompt {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            secret: secret.into(),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SecurePrompt for CountingPrompt {
    fn prompt(
        &self,
        _text: &str,
    ) -> Pin<Box<dyn Future<Output = Result<SecretString>> + Send + '_>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let secret = self.secret.clone();
        Box::pin(async move { Ok(SecretString::from(secret)) })
    }
}

/// Write an executable shell script standing in for a backend tool.
#[cfg(unix)]
pub fn fake_tool(dir: &tempfile::TempDir, name: &str, body: &str) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.path().join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}
