//! Error types: rule failures, parse errors and the validation report.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Error recorded for a field whose rule failed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuleError {
    /// The failing rule's canonical name (e.g., "req", "between")
    pub code: String,
    /// Localized message as produced by the message catalog
    pub message: String,
    /// Message arguments in order: field label, then rule arguments
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
}

impl RuleError {
    /// Create a new rule error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            args: Vec::new(),
        }
    }

    /// Create a rule error with message arguments.
    pub fn with_args(
        code: impl Into<String>,
        message: impl Into<String>,
        args: Vec<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            args,
        }
    }
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for RuleError {}

/// Outcome of a validation call.
///
/// Holds at most one [`RuleError`] per field: the first rule that failed.
/// Field order follows the order the fields failed in.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ValidationReport {
    failures: Vec<(String, RuleError)>,
}

impl ValidationReport {
    /// Create an empty (valid) report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the failure of a field.
    ///
    /// Returns `false` and keeps the existing error when the field already
    /// failed.
    pub fn record(&mut self, field: impl Into<String>, error: RuleError) -> bool {
        let field = field.into();
        if self.has_error(&field) {
            return false;
        }
        self.failures.push((field, error));
        true
    }

    /// Returns `true` when no field failed.
    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
    }

    /// Check whether a field has an error.
    pub fn has_error(&self, field: &str) -> bool {
        self.failures.iter().any(|(f, _)| f == field)
    }

    /// Get the error recorded for a field.
    pub fn get(&self, field: &str) -> Option<&RuleError> {
        self.failures
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, e)| e)
    }

    /// Number of failed fields.
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// Returns `true` when no field failed.
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Names of the failed fields, in failure order.
    pub fn field_names(&self) -> Vec<&str> {
        self.failures.iter().map(|(f, _)| f.as_str()).collect()
    }

    /// Iterate over `(field, error)` pairs in failure order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RuleError)> {
        self.failures.iter().map(|(f, e)| (f.as_str(), e))
    }

    /// Map of field name to "has an error".
    pub fn error_flags(&self) -> HashMap<&str, bool> {
        self.failures.iter().map(|(f, _)| (f.as_str(), true)).collect()
    }

    /// Convert to `Result`: `Ok` when valid, `Err(self)` otherwise.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed: {} field error(s)", self.len())
    }
}

impl std::error::Error for ValidationReport {}

/// Error raised while turning a rule-string into typed rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The token names no known rule
    #[error("unknown rule `{name}` for field `{field}`")]
    UnknownRule { field: String, name: String },

    /// The rule got the wrong number of arguments
    #[error("rule `{rule}` on field `{field}` expects {expected} argument(s), found {found}")]
    Arity {
        field: String,
        rule: String,
        expected: usize,
        found: usize,
    },

    /// An argument has the wrong shape (e.g. non-numeric bound)
    #[error("invalid argument `{argument}` to rule `{rule}` on field `{field}`")]
    InvalidArgument {
        field: String,
        rule: String,
        argument: String,
    },

    /// The token is not `name` or `name(args)`
    #[error("malformed rule token `{token}` for field `{field}`")]
    Malformed { field: String, token: String },

    /// The rule-string contains an empty token (e.g. `"req||int"`)
    #[error("empty rule token for field `{field}`")]
    EmptyToken { field: String },

    /// A rule document could not be read as JSON
    #[error("invalid rule document: {0}")]
    Document(String),
}

impl ParseError {
    /// Name of the field whose rule-string failed to parse, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            ParseError::UnknownRule { field, .. }
            | ParseError::Arity { field, .. }
            | ParseError::InvalidArgument { field, .. }
            | ParseError::Malformed { field, .. }
            | ParseError::EmptyToken { field } => Some(field),
            ParseError::Document(_) => None,
        }
    }

    pub(crate) fn with_field(self, field_name: &str) -> Self {
        let field = field_name.to_string();
        match self {
            ParseError::UnknownRule { name, .. } => ParseError::UnknownRule { field, name },
            ParseError::Arity {
                rule,
                expected,
                found,
                ..
            } => ParseError::Arity {
                field,
                rule,
                expected,
                found,
            },
            ParseError::InvalidArgument { rule, argument, .. } => ParseError::InvalidArgument {
                field,
                rule,
                argument,
            },
            ParseError::Malformed { token, .. } => ParseError::Malformed { field, token },
            ParseError::EmptyToken { .. } => ParseError::EmptyToken { field },
            other @ ParseError::Document(_) => other,
        }
    }
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        ParseError::Document(err.to_string())
    }
}

/// Error loading engine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable deserialization failed
    #[error("configuration error: {0}")]
    Env(#[from] envy::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_error_display() {
        let error = RuleError::new("req", "Name is required");
        assert_eq!(error.to_string(), "[req] Name is required");
        assert!(error.args.is_empty());
    }

    #[test]
    fn report_keeps_first_error_per_field() {
        let mut report = ValidationReport::new();
        assert!(report.record("name", RuleError::new("min", "too short")));
        assert!(!report.record("name", RuleError::new("max", "too long")));
        assert!(report.record("email", RuleError::new("email", "bad email")));

        assert_eq!(report.len(), 2);
        assert_eq!(report.get("name").unwrap().code, "min");
        assert_eq!(report.field_names(), vec!["name", "email"]);
        assert!(report.has_error("email"));
        assert!(!report.has_error("age"));
        assert_eq!(report.error_flags().get("name"), Some(&true));
    }

    #[test]
    fn report_into_result() {
        assert!(ValidationReport::new().into_result().is_ok());

        let mut report = ValidationReport::new();
        report.record("field", RuleError::new("code", "message"));
        let err = report.into_result().unwrap_err();
        assert_eq!(err.to_string(), "Validation failed: 1 field error(s)");
    }

    #[test]
    fn report_serialization() {
        let mut report = ValidationReport::new();
        report.record(
            "age",
            RuleError::with_args("between", "Age out of range", vec!["Age".into(), "18".into()]),
        );

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["failures"][0][0], "age");
        assert_eq!(json["failures"][0][1]["code"], "between");
        assert_eq!(json["failures"][0][1]["args"][1], "18");
    }

    #[test]
    fn parse_error_carries_field() {
        let err = ParseError::UnknownRule {
            field: String::new(),
            name: "bogus".into(),
        }
        .with_field("email");

        assert_eq!(err.field(), Some("email"));
        assert_eq!(err.to_string(), "unknown rule `bogus` for field `email`");
    }
}
