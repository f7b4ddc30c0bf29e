//! Line/prompt splitting of raw process output.

use super::events::OutputEvent;

/// Splits an append-only chunk stream into lines and a trailing prompt.
///
/// Chunks arrive arbitrarily fragmented: a line or a prompt token may be
/// spread over several chunks. The splitter accumulates unconsumed text,
/// emits one [`OutputEvent::Line`] per complete newline-terminated line,
/// and surfaces any non-empty remainder as an [`OutputEvent::Prompt`]
/// candidate for the backend's prompt recognizer.
///
/// The remainder is retained verbatim and unbounded until a newline
/// arrives or the consumer calls [`flush`](Self::flush) after answering a
/// recognized prompt. A backend that never completes a line is a
/// caller-visible hang, not a protocol violation.
#[derive(Debug, Default)]
pub struct LineSplitter {
    pending: String,
}

impl LineSplitter {
    /// Create an empty splitter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one chunk of raw output and classify it.
    ///
    /// Emits each complete line (including its newline) in order, followed
    /// by at most one `Prompt` event for the unconsumed remainder.
    pub fn feed(&mut self, chunk: &str) -> Vec<OutputEvent> {
        self.pending.push_str(chunk);

        let mut events = Vec::new();
        while let Some(pos) = self.pending.find('\n') {
            let line: String = self.pending.drain(..=pos).collect();
            events.push(OutputEvent::Line(line));
        }
        if !self.pending.is_empty() {
            events.push(OutputEvent::Prompt(self.pending.clone()));
        }
        events
    }

    /// Discard the accumulated remainder.
    ///
    /// Called only once a recognized prompt has been answered: the tool,
    /// having received its reply, will not resend that partial text.
    pub fn flush(&mut self) {
        self.pending.clear();
    }

    /// The unconsumed remainder, if any.
    pub fn pending(&self) -> &str {
        &self.pending
    }
}
