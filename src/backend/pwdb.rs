//! Adapter for the `pwdb` tool.

use std::ffi::OsString;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use super::Backend;
use crate::config::EntryName;

static PROMPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^.*\bpassword\b[^:\n]*:\s*$").expect("valid regex"));

/// The `pwdb` backend: machine-readable field output, long-option arguments.
#[derive(Debug, Clone, Copy)]
pub struct Pwdb;

impl Backend for Pwdb {
    fn tool_name(&self) -> &'static str {
        "pwdb"
    }

    fn list_args(&self, db: &Path) -> Vec<OsString> {
        vec![
            OsString::from("--file"),
            db.as_os_str().to_os_string(),
            OsString::from("--list"),
        ]
    }

    fn display_args(&self, db: &Path, entry: &EntryName) -> Vec<OsString> {
        vec![
            OsString::from("--file"),
            db.as_os_str().to_os_string(),
            OsString::from("--name"),
            OsString::from(entry.as_str()),
        ]
    }

    fn transform_line(&self, line: &str) -> Option<String> {
        // Bare newlines are separator noise.
        if line.len() < 2 {
            return None;
        }
        Some(line.to_string())
    }

    fn recognize_prompt<'a>(&self, pending: &'a str) -> Option<&'a str> {
        PROMPT_RE.find(pending).map(|m| m.as_str())
    }
}
