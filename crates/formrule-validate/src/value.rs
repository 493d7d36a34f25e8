//! Submitted field values.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

/// A raw value as submitted by the caller.
///
/// Values are not coerced: a numeric-looking string stays [`FieldValue::Text`]
/// and is measured by its length in the length/range rules, while a
/// [`FieldValue::Number`] is compared by value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Explicit null / no value
    Null,
    /// Boolean flag (e.g. a checkbox)
    Bool(bool),
    /// Numeric value
    Number(f64),
    /// Text as typed by the user
    Text(String),
}

impl FieldValue {
    /// The value evaluated for fields missing from the input.
    pub fn empty() -> Self {
        FieldValue::Text(String::new())
    }

    /// Text form used by the pattern predicates and loose equality.
    ///
    /// Integral numbers are rendered without a fractional part, `true` is
    /// `"1"`, and `false`/null are the empty string.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            FieldValue::Text(s) => Cow::Borrowed(s.as_str()),
            FieldValue::Number(n) => Cow::Owned(format_number(*n)),
            FieldValue::Bool(true) => Cow::Borrowed("1"),
            FieldValue::Bool(false) | FieldValue::Null => Cow::Borrowed(""),
        }
    }

    /// Returns `true` for [`FieldValue::Text`].
    pub fn is_text(&self) -> bool {
        matches!(self, FieldValue::Text(_))
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

/// Submitted values keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldValues {
    values: HashMap<String, FieldValue>,
}

impl FieldValues {
    /// Create an empty value set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the value of a field, replacing any previous one.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.values.insert(field.into(), value.into());
    }

    /// Builder-style variant of [`insert`](Self::insert).
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(field, value);
        self
    }

    /// Get the value of a field if it was submitted.
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    /// Check whether a field was submitted.
    pub fn contains(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    /// Number of submitted fields.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` when nothing was submitted.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parse a flat JSON object of field values.
    ///
    /// Nested arrays and objects are rejected.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl<K, V> FromIterator<(K, V)> for FieldValues
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_form_of_each_variant() {
        assert_eq!(FieldValue::from("abc").as_text(), "abc");
        assert_eq!(FieldValue::Number(12.0).as_text(), "12");
        assert_eq!(FieldValue::Number(12.5).as_text(), "12.5");
        assert_eq!(FieldValue::Bool(true).as_text(), "1");
        assert_eq!(FieldValue::Bool(false).as_text(), "");
        assert_eq!(FieldValue::Null.as_text(), "");
    }

    #[test]
    fn deserialize_flat_object() {
        let values =
            FieldValues::from_json(r#"{"name": "Sam", "age": 30, "agree": true, "note": null}"#)
                .unwrap();

        assert_eq!(values.get("name"), Some(&FieldValue::Text("Sam".into())));
        assert_eq!(values.get("age"), Some(&FieldValue::Number(30.0)));
        assert_eq!(values.get("agree"), Some(&FieldValue::Bool(true)));
        assert_eq!(values.get("note"), Some(&FieldValue::Null));
        assert_eq!(values.len(), 4);
    }

    #[test]
    fn nested_values_are_rejected() {
        assert!(FieldValues::from_json(r#"{"tags": ["a", "b"]}"#).is_err());
        assert!(FieldValues::from_json(r#"{"address": {"city": "x"}}"#).is_err());
    }

    #[test]
    fn collect_from_pairs() {
        let values: FieldValues = [("a", "1"), ("b", "2")].into_iter().collect();
        assert!(values.contains("a"));
        assert!(!values.contains("c"));
    }
}
