//! Message catalog: field labels and error templates.
//!
//! The engine asks the catalog for a human-readable label for each field
//! and for the formatted message of a failing rule, keyed by
//! `"<rule name>Error"`. [`MessageBundle`] is an in-memory catalog loaded
//! from code or JSON; applications with their own localization layer
//! implement [`MessageCatalog`] instead.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Resolves field labels and formats error templates.
pub trait MessageCatalog {
    /// Human-readable label for a key (usually a field name).
    fn label(&self, key: &str) -> String;

    /// Format the template stored under `template_key` with positional
    /// arguments.
    fn format(&self, template_key: &str, args: &[String]) -> String;
}

impl<C: MessageCatalog + ?Sized> MessageCatalog for &C {
    fn label(&self, key: &str) -> String {
        (**self).label(key)
    }

    fn format(&self, template_key: &str, args: &[String]) -> String {
        (**self).format(template_key, args)
    }
}

/// Replace `{0}`, `{1}`, ... in `template` with `args`.
///
/// Placeholders without a matching argument are left untouched.
pub fn interpolate(template: &str, args: &[String]) -> String {
    let mut result = template.to_string();
    for (index, arg) in args.iter().enumerate() {
        let placeholder = format!("{{{}}}", index);
        result = result.replace(&placeholder, arg);
    }
    result
}

/// In-memory message catalog.
///
/// Labels and templates share one key space, as in a flat translation file:
///
/// ```json
/// {
///   "username": "Username",
///   "minError": "{0} must be at least {1} characters"
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageBundle {
    messages: HashMap<String, String>,
}

impl MessageBundle {
    /// Create an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bundle pre-filled with English templates for every rule.
    pub fn english() -> Self {
        let mut bundle = Self::new();
        for (key, template) in DEFAULT_TEMPLATES {
            bundle.add(*key, *template);
        }
        bundle
    }

    /// Load from a flat JSON object of strings.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content).map_err(std::io::Error::from)
    }

    /// Add a message.
    pub fn add(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.messages.insert(key.into(), message.into());
    }

    /// Builder-style variant of [`add`](Self::add).
    pub fn with(mut self, key: impl Into<String>, message: impl Into<String>) -> Self {
        self.add(key, message);
        self
    }

    /// Overlay another bundle; its messages win.
    pub fn merge(&mut self, other: MessageBundle) {
        self.messages.extend(other.messages);
    }

    /// Get a message.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.messages.get(key).map(|s| s.as_str())
    }

    /// Check if bundle has a message.
    pub fn has(&self, key: &str) -> bool {
        self.messages.contains_key(key)
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns `true` when the bundle holds no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl MessageCatalog for MessageBundle {
    /// Falls back to the key itself.
    fn label(&self, key: &str) -> String {
        self.get(key).unwrap_or(key).to_string()
    }

    /// Falls back to the key followed by the arguments.
    fn format(&self, template_key: &str, args: &[String]) -> String {
        match self.get(template_key) {
            Some(template) => interpolate(template, args),
            None if args.is_empty() => template_key.to_string(),
            None => format!("{}: {}", template_key, args.join(", ")),
        }
    }
}

/// English templates keyed by `"<rule name>Error"`.
pub const DEFAULT_TEMPLATES: &[(&str, &str)] = &[
    ("reqError", "{0} is required"),
    ("numError", "{0} must be a number"),
    ("intError", "{0} must be a whole number"),
    ("floatError", "{0} must be a decimal number"),
    ("alphaError", "{0} may only contain letters and spaces"),
    (
        "alphanumError",
        "{0} may only contain letters, digits, spaces and , . |",
    ),
    ("vdateError", "{0} must be a date in the form YYYY-MM-DD"),
    ("emailError", "{0} must be a valid email address"),
    ("urlError", "{0} must be a valid URL"),
    ("ltError", "{0} must be less than {1}"),
    ("gtError", "{0} must be greater than {1}"),
    ("minError", "{0} must be at least {1}"),
    ("maxError", "{0} must be at most {1}"),
    ("betweenError", "{0} must be between {1} and {2}"),
    (
        "floatlikeError",
        "{0} must have {1} digit(s) before and {2} digit(s) after the decimal point",
    ),
    ("eqError", "{0} must equal {1}"),
    ("eq_fieldError", "{0} must match {1}"),
];
