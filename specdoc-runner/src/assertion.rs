//! Evaluation outcomes and value comparison.

use crate::fixture::Value;
use serde::Serialize;
use std::fmt;

/// Result of executing one visible command.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Failure { expected: String, actual: String },
    Exception(ExceptionCause),
}

/// What went wrong when a command could not complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExceptionCause {
    /// The command expression that was being evaluated.
    pub expression: String,
    pub message: String,
    /// Supporting lines (error sources), outermost first.
    pub context: Vec<String>,
}

impl ExceptionCause {
    pub fn new(expression: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            message: message.into(),
            context: Vec::new(),
        }
    }

    pub fn with_context(mut self, context: Vec<String>) -> Self {
        self.context = context;
        self
    }
}

/// Outcome category, also used as the CSS class on rendered elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Success,
    Failure,
    Exception,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Success => "success",
            Status::Failure => "failure",
            Status::Exception => "exception",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Outcome {
    pub fn failure(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Outcome::Failure {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn status(&self) -> Status {
        match self {
            Outcome::Success => Status::Success,
            Outcome::Failure { .. } => Status::Failure,
            Outcome::Exception(_) => Status::Exception,
        }
    }
}

/// Decides whether an actual value matches the expected text.
pub trait Comparator: Send + Sync {
    fn matches(&self, expected: &str, actual: &Value) -> bool;
}

/// Compares after collapsing whitespace; `Null` compares as `(null)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NormalizedComparator;

impl Comparator for NormalizedComparator {
    fn matches(&self, expected: &str, actual: &Value) -> bool {
        normalize_whitespace(expected) == normalize_whitespace(&actual.to_string())
    }
}

/// Character-for-character comparison of the displayed value.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExactComparator;

impl Comparator for ExactComparator {
    fn matches(&self, expected: &str, actual: &Value) -> bool {
        expected == actual.to_string()
    }
}

/// Trim, treat non-breaking spaces as spaces, and collapse whitespace runs.
pub fn normalize_whitespace(text: &str) -> String {
    text.split(|c: char| c.is_whitespace() || c == '\u{a0}')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
