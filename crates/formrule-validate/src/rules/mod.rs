//! Typed rule instructions.
//!
//! A [`Rule`] is one parsed rule token. Parsing lives in [`crate::parser`];
//! the checks themselves in [`predicates`].

pub mod predicates;

use crate::error::ParseError;
use crate::value::FieldValue;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One parsed rule token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Rule {
    /// `req`: value must be non-empty
    Required,
    /// `num`: non-negative integer or decimal
    Numeric,
    /// `int`: non-negative integer
    Integer,
    /// `float`: decimal with mandatory fractional part
    Float,
    /// `alpha`: letters and spaces
    Alpha,
    /// `alphanum`: letters, digits, spaces and `,.|`
    AlphaNum,
    /// `vdate`: `YYYY-MM-DD`
    Date,
    /// `email`: simple `local@domain.tld`
    Email,
    /// `url`: optional scheme, domain, optional path
    Url,
    /// `lt(n)`: length/value strictly below `n`
    Lt(u64),
    /// `gt(n)`: length/value strictly above `n`
    Gt(u64),
    /// `min(n)`: length/value at least `n`
    Min(u64),
    /// `max(n)`: length/value at most `n`
    Max(u64),
    /// `between(low,high)`: inclusive length/value range
    Between(u64, u64),
    /// `floatlike(before,after)`: exact digit counts around the point
    FloatLike(usize, usize),
    /// `eq(literal)`: loose equality with a literal
    Eq(String),
    /// `eq_field(field)`: loose equality with another field's value
    EqField(String),
}

impl Rule {
    /// Canonical rule name, used to build message keys.
    pub fn name(&self) -> &'static str {
        match self {
            Rule::Required => "req",
            Rule::Numeric => "num",
            Rule::Integer => "int",
            Rule::Float => "float",
            Rule::Alpha => "alpha",
            Rule::AlphaNum => "alphanum",
            Rule::Date => "vdate",
            Rule::Email => "email",
            Rule::Url => "url",
            Rule::Lt(_) => "lt",
            Rule::Gt(_) => "gt",
            Rule::Min(_) => "min",
            Rule::Max(_) => "max",
            Rule::Between(..) => "between",
            Rule::FloatLike(..) => "floatlike",
            Rule::Eq(_) => "eq",
            Rule::EqField(_) => "eq_field",
        }
    }

    /// Rule arguments rendered as text, in declaration order.
    pub fn args(&self) -> Vec<String> {
        match self {
            Rule::Lt(n) | Rule::Gt(n) | Rule::Min(n) | Rule::Max(n) => vec![n.to_string()],
            Rule::Between(low, high) => vec![low.to_string(), high.to_string()],
            Rule::FloatLike(before, after) => vec![before.to_string(), after.to_string()],
            Rule::Eq(literal) => vec![literal.clone()],
            Rule::EqField(field) => vec![field.clone()],
            _ => Vec::new(),
        }
    }

    /// The other field this rule reads, if any.
    pub fn referenced_field(&self) -> Option<&str> {
        match self {
            Rule::EqField(field) => Some(field),
            _ => None,
        }
    }

    /// Evaluate the rule against a value.
    ///
    /// `reference` is the value of the field named by `eq_field`; `None`
    /// compares against the empty string. Other rules ignore it.
    pub fn check(&self, value: &FieldValue, reference: Option<&FieldValue>) -> bool {
        match self {
            Rule::Required => predicates::req(value),
            Rule::Numeric => predicates::num(value),
            Rule::Integer => predicates::int(value),
            Rule::Float => predicates::float(value),
            Rule::Alpha => predicates::alpha(value),
            Rule::AlphaNum => predicates::alphanum(value),
            Rule::Date => predicates::vdate(value),
            Rule::Email => predicates::email(value),
            Rule::Url => predicates::url(value),
            Rule::Lt(bound) => predicates::lt(value, *bound),
            Rule::Gt(bound) => predicates::gt(value, *bound),
            Rule::Min(bound) => predicates::min(value, *bound),
            Rule::Max(bound) => predicates::max(value, *bound),
            Rule::Between(low, high) => predicates::between(value, *low, *high),
            Rule::FloatLike(before, after) => predicates::floatlike(value, *before, *after),
            Rule::Eq(literal) => predicates::eq(value, literal),
            Rule::EqField(_) => match reference {
                Some(other) => predicates::eq_field(value, other),
                None => predicates::eq_field(value, &FieldValue::empty()),
            },
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args = self.args();
        if args.is_empty() {
            f.write_str(self.name())
        } else {
            write!(f, "{}({})", self.name(), args.join(","))
        }
    }
}

impl FromStr for Rule {
    type Err = ParseError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        crate::parser::parse_token(token)
    }
}

impl TryFrom<String> for Rule {
    type Error = ParseError;

    fn try_from(token: String) -> Result<Self, Self::Error> {
        token.parse()
    }
}

impl From<Rule> for String {
    fn from(rule: Rule) -> Self {
        rule.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_renders_token_form() {
        assert_eq!(Rule::Required.to_string(), "req");
        assert_eq!(Rule::Between(2, 10).to_string(), "between(2,10)");
        assert_eq!(Rule::EqField("password".into()).to_string(), "eq_field(password)");
        assert_eq!(Rule::FloatLike(2, 3).to_string(), "floatlike(2,3)");
    }

    #[test]
    fn args_in_order() {
        assert_eq!(Rule::Between(2, 10).args(), vec!["2", "10"]);
        assert_eq!(Rule::Min(3).args(), vec!["3"]);
        assert!(Rule::Email.args().is_empty());
    }

    #[test]
    fn eq_field_without_reference_compares_with_empty() {
        let rule = Rule::EqField("password".into());
        assert!(rule.check(&FieldValue::from(""), None));
        assert!(!rule.check(&FieldValue::from("y"), None));
        assert!(rule.check(&FieldValue::from("x"), Some(&FieldValue::from("x"))));
        assert_eq!(rule.referenced_field(), Some("password"));
    }

    #[test]
    fn serde_uses_token_form() {
        let json = serde_json::to_string(&Rule::Between(2, 5)).unwrap();
        assert_eq!(json, "\"between(2,5)\"");

        let rule: Rule = serde_json::from_str("\"min(3)\"").unwrap();
        assert_eq!(rule, Rule::Min(3));

        assert!(serde_json::from_str::<Rule>("\"nope\"").is_err());
    }
}
