//! Event types for backend output streams.

use crate::process::Termination;

/// One classified piece of raw process output.
///
/// Produced by [`LineSplitter::feed`](crate::stream::LineSplitter::feed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputEvent {
    /// A complete line, always ending in a newline in the raw stream.
    Line(String),
    /// The non-newline-terminated remainder accumulated so far; a
    /// candidate interactive prompt.
    Prompt(String),
}

/// One event from a running operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    /// Rendered user-visible text.
    Text(String),
    /// The backend process exited; always the final event.
    Finished(Termination),
}

/// The collected result of one operation.
///
/// An abnormal exit is carried here rather than as an error, together with
/// whatever output was rendered before the process died.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutput {
    /// All rendered text, concatenated.
    pub rendered: String,
    /// How the backend process exited.
    pub termination: Termination,
}

impl RunOutput {
    /// Whether the backend finished cleanly (completed or killed).
    pub fn is_success(&self) -> bool {
        self.termination.is_normal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_output_success() {
        let output = RunOutput {
            rendered: "foo\n".into(),
            termination: Termination::Completed,
        };
        assert!(output.is_success());

        let output = RunOutput {
            rendered: String::new(),
            termination: Termination::Abnormal { code: 1 },
        };
        assert!(!output.is_success());
    }

    #[test]
    fn events_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<OutputEvent>();
        assert_send_sync::<RunEvent>();
        assert_send_sync::<RunOutput>();
    }
}
