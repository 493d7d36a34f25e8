//! Error sink: where user-facing failure messages go.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a recorded message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    #[default]
    Error,
    Warning,
    Info,
}

impl Severity {
    /// Lowercase name of the severity.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receives messages produced during validation.
pub trait ErrorSink {
    /// Record a message.
    fn add(&mut self, message: String, severity: Severity);
}

impl<S: ErrorSink + ?Sized> ErrorSink for &mut S {
    fn add(&mut self, message: String, severity: Severity) {
        (**self).add(message, severity)
    }
}

/// Discards everything; for callers that only want the boolean or the
/// returned report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ErrorSink for NullSink {
    fn add(&mut self, _message: String, _severity: Severity) {}
}

/// A recorded message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub severity: Severity,
    pub text: String,
}

/// In-memory sink keeping messages in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageCollector {
    messages: Vec<Message>,
}

impl MessageCollector {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages in arrival order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Texts of the error-severity messages.
    pub fn errors(&self) -> Vec<&str> {
        self.messages
            .iter()
            .filter(|m| m.severity == Severity::Error)
            .map(|m| m.text.as_str())
            .collect()
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns `true` when nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Remove all messages.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Take all messages, leaving the collector empty.
    pub fn drain(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.messages)
    }
}

impl ErrorSink for MessageCollector {
    fn add(&mut self, message: String, severity: Severity) {
        self.messages.push(Message {
            severity,
            text: message,
        });
    }
}
