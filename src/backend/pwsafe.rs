//! Adapter for the `pwsafe` tool.
//!
//! `pwsafe` prints free-form formatted records: an informational banner,
//! `username`/`password` field lines, and `> `-quoted notes with literal
//! `\n` escapes. The transform re-renders these for display.

use std::ffi::OsString;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use super::Backend;
use crate::config::EntryName;

static PROMPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.*Enter passphrase[^\n]*:\s*$").expect("valid regex"));

static FIELD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(username|password)(.*)$").expect("valid regex"));

/// Informational banner emitted before entry fields; dropped from output.
const BANNER: &str = "Going to print login and password to stdout";

/// The `pwsafe` backend: free-form formatted records, short-option arguments.
#[derive(Debug, Clone, Copy)]
pub struct Pwsafe;

impl Backend for Pwsafe {
    fn tool_name(&self) -> &'static str {
        "pwsafe"
    }

    fn list_args(&self, db: &Path) -> Vec<OsString> {
        vec![OsString::from("-f"), db.as_os_str().to_os_string()]
    }

    fn display_args(&self, db: &Path, entry: &EntryName) -> Vec<OsString> {
        vec![
            OsString::from("-pulE"),
            OsString::from(entry.as_str()),
            OsString::from("-f"),
            db.as_os_str().to_os_string(),
        ]
    }

    fn transform_line(&self, line: &str) -> Option<String> {
        // Bare newlines are separator noise.
        if line.len() < 2 {
            return None;
        }

        let body = line.trim_end_matches(['\r', '\n']);

        if body == BANNER {
            return None;
        }

        // Field lines: capitalize the label, preserve the rest verbatim.
        if let Some(caps) = FIELD_RE.captures(body) {
            let label = &caps[1];
            let mut out = String::with_capacity(line.len());
            out.push_str(&label[..1].to_uppercase());
            out.push_str(&label[1..]);
            out.push_str(&caps[2]);
            out.push('\n');
            return Some(out);
        }

        // Quoted note lines: expand literal \n escapes into real newlines,
        // separated from the fields above by a blank line.
        if let Some(quoted) = body.strip_prefix("> ") {
            let mut out = String::with_capacity(line.len() + 1);
            out.push('\n');
            out.push_str(&quoted.replace("\\n", "\n"));
            out.push('\n');
            return Some(out);
        }

        Some(line.to_string())
    }

    fn recognize_prompt<'a>(&self, pending: &'a str) -> Option<&'a str> {
        PROMPT_RE.find(pending).map(|m| m.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_args_convention() {
        let args = Pwsafe.list_args(Path::new("/tmp/safe.dat"));
        assert_eq!(args, vec!["-f", "/tmp/safe.dat"]);
    }

    #[test]
    fn display_args_convention() {
        let args = Pwsafe.display_args(Path::new("/tmp/safe.dat"), &EntryName::new("foo.com"));
        assert_eq!(args, vec!["-pulE", "foo.com", "-f", "/tmp/safe.dat"]);
    }

    #[test]
    fn banner_is_dropped() {
        assert_eq!(
            Pwsafe.transform_line("Going to print login and password to stdout\n"),
            None
        );
    }

    #[test]
    fn field_label_is_capitalized() {
        assert_eq!(
            Pwsafe.transform_line("password for foo.com:  s3cr3t\n"),
            Some("Password for foo.com:  s3cr3t\n".to_string())
        );
        assert_eq!(
            Pwsafe.transform_line("username for foo.com: alice\n"),
            Some("Username for foo.com: alice\n".to_string())
        );
    }

    #[test]
    fn quoted_line_expands_escaped_newlines() {
        assert_eq!(
            Pwsafe.transform_line("> line1\\nline2\n"),
            Some("\nline1\nline2\n".to_string())
        );
    }

    #[test]
    fn quoted_line_without_escapes() {
        assert_eq!(
            Pwsafe.transform_line("> just a note\n"),
            Some("\njust a note\n".to_string())
        );
    }

    #[test]
    fn ordinary_lines_pass_through() {
        assert_eq!(
            Pwsafe.transform_line("foo.com  -  web\n"),
            Some("foo.com  -  web\n".to_string())
        );
    }

    #[test]
    fn noise_lines_are_dropped() {
        assert_eq!(Pwsafe.transform_line("\n"), None);
    }

    #[test]
    fn recognizes_passphrase_prompt() {
        assert_eq!(
            Pwsafe.recognize_prompt("Enter passphrase for /tmp/safe.dat: "),
            Some("Enter passphrase for /tmp/safe.dat: ")
        );
    }

    #[test]
    fn partial_prompt_is_not_recognized() {
        assert_eq!(Pwsafe.recognize_prompt("Enter passphr"), None);
        assert_eq!(Pwsafe.recognize_prompt("some other text"), None);
    }
}
