//! Rule-string parsing.
//!
//! A rule-string such as `"req|alpha|between(2,30)"` is split on `|`, each
//! token is tokenized into a name and an optional argument list, and the
//! pair is resolved against the fixed rule table. Unknown names and bad
//! arguments are reported here, before any value is evaluated.

use crate::error::ParseError;
use crate::rules::Rule;
use std::fmt;

/// Separator between rule tokens in a rule-string.
pub const RULE_SEPARATOR: char = '|';

/// A rule token split into its name and argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Token<'a> {
    name: &'a str,
    /// `None` for a bare name, `Some` for `name(...)`
    args: Option<Vec<&'a str>>,
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_word(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn tokenize(raw: &str) -> Result<Token<'_>, ParseError> {
    let token = raw.trim();
    if token.is_empty() {
        return Err(ParseError::EmptyToken {
            field: String::new(),
        });
    }

    let malformed = || ParseError::Malformed {
        field: String::new(),
        token: token.to_string(),
    };

    let (name, args) = match token.find('(') {
        None => (token, None),
        Some(open) => {
            let inner = token[open + 1..].strip_suffix(')').ok_or_else(malformed)?;
            if inner.contains('(') || inner.contains(')') {
                return Err(malformed());
            }
            let args = inner.split(',').map(str::trim).collect();
            (token[..open].trim_end(), Some(args))
        }
    };

    if !is_identifier(name) {
        return Err(malformed());
    }

    Ok(Token { name, args })
}

fn arity(rule: &str, expected: usize, found: usize) -> ParseError {
    ParseError::Arity {
        field: String::new(),
        rule: rule.to_string(),
        expected,
        found,
    }
}

fn invalid_argument(rule: &str, argument: &str) -> ParseError {
    ParseError::InvalidArgument {
        field: String::new(),
        rule: rule.to_string(),
        argument: argument.to_string(),
    }
}

fn expect_args(rule: &str, args: &[&str], expected: usize) -> Result<(), ParseError> {
    if args.len() != expected {
        return Err(arity(rule, expected, args.len()));
    }
    Ok(())
}

fn number_arg<T: std::str::FromStr>(rule: &str, arg: &str) -> Result<T, ParseError> {
    if arg.is_empty() || !arg.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid_argument(rule, arg));
    }
    arg.parse().map_err(|_| invalid_argument(rule, arg))
}

fn word_arg(rule: &str, arg: &str) -> Result<String, ParseError> {
    if is_word(arg) {
        Ok(arg.to_string())
    } else {
        Err(invalid_argument(rule, arg))
    }
}

/// Parameterless rules by name.
fn bare_rule(name: &str) -> Option<Rule> {
    let rule = match name {
        "req" | "required" => Rule::Required,
        "num" => Rule::Numeric,
        "int" => Rule::Integer,
        "float" => Rule::Float,
        "alpha" => Rule::Alpha,
        "alphanum" => Rule::AlphaNum,
        "vdate" => Rule::Date,
        "email" => Rule::Email,
        "url" => Rule::Url,
        _ => return None,
    };
    Some(rule)
}

/// Number of arguments taken by a parameterized rule.
fn parameter_count(name: &str) -> Option<usize> {
    match name {
        "min" | "max" | "lt" | "gt" | "eq" | "eq_field" => Some(1),
        "between" | "floatlike" => Some(2),
        _ => None,
    }
}

fn resolve(token: Token<'_>) -> Result<Rule, ParseError> {
    let Token { name, args } = token;

    let Some(args) = args else {
        return match (bare_rule(name), parameter_count(name)) {
            (Some(rule), _) => Ok(rule),
            (None, Some(expected)) => Err(arity(name, expected, 0)),
            (None, None) => Err(ParseError::UnknownRule {
                field: String::new(),
                name: name.to_string(),
            }),
        };
    };

    // Parameterized forms are resolved before bare names.
    match name {
        "min" | "max" | "lt" | "gt" => {
            expect_args(name, &args, 1)?;
            let bound = number_arg(name, args[0])?;
            Ok(match name {
                "min" => Rule::Min(bound),
                "max" => Rule::Max(bound),
                "lt" => Rule::Lt(bound),
                _ => Rule::Gt(bound),
            })
        }
        "between" => {
            expect_args(name, &args, 2)?;
            Ok(Rule::Between(
                number_arg(name, args[0])?,
                number_arg(name, args[1])?,
            ))
        }
        "floatlike" => {
            expect_args(name, &args, 2)?;
            Ok(Rule::FloatLike(
                number_arg(name, args[0])?,
                number_arg(name, args[1])?,
            ))
        }
        "eq" => {
            expect_args(name, &args, 1)?;
            Ok(Rule::Eq(word_arg(name, args[0])?))
        }
        "eq_field" => {
            expect_args(name, &args, 1)?;
            Ok(Rule::EqField(word_arg(name, args[0])?))
        }
        _ if bare_rule(name).is_some() => Err(arity(name, 0, args.len())),
        _ => Err(ParseError::UnknownRule {
            field: String::new(),
            name: name.to_string(),
        }),
    }
}

/// Parse a single rule token such as `"between(2,10)"`.
pub fn parse_token(token: &str) -> Result<Rule, ParseError> {
    resolve(tokenize(token)?)
}

/// Parse a full rule-string for one field.
///
/// Errors name `field`.
pub fn parse_rule_string(field: &str, rule_string: &str) -> Result<Vec<Rule>, ParseError> {
    rule_string
        .split(RULE_SEPARATOR)
        .map(|token| parse_token(token).map_err(|e| e.with_field(field)))
        .collect()
}

/// The ordered rules attached to one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRules {
    /// Field name, also the key used to look up its label
    pub field: String,
    /// Rules in evaluation order
    pub rules: Vec<Rule>,
}

impl FieldRules {
    /// Create rules for a field.
    pub fn new(field: impl Into<String>, rules: Vec<Rule>) -> Self {
        Self {
            field: field.into(),
            rules,
        }
    }

    /// Canonical rule-string, e.g. `"req|min(3)"`.
    pub fn rule_string(&self) -> String {
        self.rules
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("|")
    }
}

/// Parsed rules for a whole form.
///
/// Fields keep their insertion order, which is also the order in which they
/// are evaluated and their errors are reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    fields: Vec<FieldRules>,
}

impl RuleSet {
    /// Create an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `(field, rule-string)` pairs.
    ///
    /// ```
    /// use formrule_validate::RuleSet;
    ///
    /// let rules = RuleSet::parse([
    ///     ("username", "req|alphanum|between(3,20)"),
    ///     ("password_confirm", "req|eq_field(password)"),
    /// ])
    /// .unwrap();
    /// assert_eq!(rules.len(), 2);
    /// ```
    pub fn parse<I, K, V>(pairs: I) -> Result<Self, ParseError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut set = Self::new();
        for (field, rule_string) in pairs {
            let field = field.as_ref();
            let rules = parse_rule_string(field, rule_string.as_ref())?;
            set.insert(FieldRules::new(field, rules));
        }
        Ok(set)
    }

    /// Parse a JSON object mapping field names to rule-strings.
    ///
    /// A value may also be an array of individual rule tokens.
    pub fn from_json(json: &str) -> Result<Self, ParseError> {
        let document: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;
        let mut set = Self::new();

        for (field, value) in document {
            let rules = match value {
                serde_json::Value::String(rule_string) => parse_rule_string(&field, &rule_string)?,
                serde_json::Value::Array(tokens) => tokens
                    .iter()
                    .map(|token| match token {
                        serde_json::Value::String(t) => {
                            parse_token(t).map_err(|e| e.with_field(&field))
                        }
                        other => Err(ParseError::Document(format!(
                            "rule token for field `{field}` must be a string, found {other}"
                        ))),
                    })
                    .collect::<Result<Vec<_>, _>>()?,
                other => {
                    return Err(ParseError::Document(format!(
                        "rules for field `{field}` must be a string or array, found {other}"
                    )))
                }
            };
            set.insert(FieldRules::new(field, rules));
        }

        Ok(set)
    }

    /// Add rules for a field; rules already set for that field are replaced
    /// in place.
    pub fn insert(&mut self, field_rules: FieldRules) {
        match self
            .fields
            .iter_mut()
            .find(|existing| existing.field == field_rules.field)
        {
            Some(existing) => existing.rules = field_rules.rules,
            None => self.fields.push(field_rules),
        }
    }

    /// Builder-style helper: parse and add a rule-string for one field.
    pub fn field(mut self, field: &str, rule_string: &str) -> Result<Self, ParseError> {
        let rules = parse_rule_string(field, rule_string)?;
        self.insert(FieldRules::new(field, rules));
        Ok(self)
    }

    /// Rules for a field.
    pub fn get(&self, field: &str) -> Option<&[Rule]> {
        self.fields
            .iter()
            .find(|f| f.field == field)
            .map(|f| f.rules.as_slice())
    }

    /// Iterate over fields in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldRules> {
        self.fields.iter()
    }

    /// Number of fields with rules.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` when no field has rules.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for field_rules in &self.fields {
            writeln!(f, "{}: {}", field_rules.field, field_rules.rule_string())?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a FieldRules;
    type IntoIter = std::slice::Iter<'a, FieldRules>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bare_and_parameterized_tokens() {
        let rules = parse_rule_string("name", "req|alpha|min(3)|max(50)").unwrap();
        assert_eq!(
            rules,
            vec![Rule::Required, Rule::Alpha, Rule::Min(3), Rule::Max(50)]
        );

        assert_eq!(parse_token("between(2,10)").unwrap(), Rule::Between(2, 10));
        assert_eq!(parse_token("floatlike(2,3)").unwrap(), Rule::FloatLike(2, 3));
        assert_eq!(parse_token("lt(5)").unwrap(), Rule::Lt(5));
        assert_eq!(parse_token("gt(0)").unwrap(), Rule::Gt(0));
        assert_eq!(parse_token("eq(yes)").unwrap(), Rule::Eq("yes".into()));
        assert_eq!(
            parse_token("eq_field(password)").unwrap(),
            Rule::EqField("password".into())
        );
    }

    #[test]
    fn required_alias_maps_to_req() {
        assert_eq!(parse_token("required").unwrap(), Rule::Required);
        assert_eq!(parse_token("required").unwrap().name(), "req");
    }

    #[test]
    fn whitespace_around_tokens_is_ignored() {
        let rules = parse_rule_string("f", " req | between( 2 , 5 ) ").unwrap();
        assert_eq!(rules, vec![Rule::Required, Rule::Between(2, 5)]);
    }

    #[test]
    fn unknown_rule_is_rejected() {
        let err = parse_rule_string("email", "req|emial").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnknownRule {
                field: "email".into(),
                name: "emial".into()
            }
        );

        assert!(matches!(
            parse_token("uppercase(3)"),
            Err(ParseError::UnknownRule { .. })
        ));
    }

    #[test]
    fn wrong_arity_is_rejected() {
        assert!(matches!(
            parse_token("between(2)"),
            Err(ParseError::Arity {
                expected: 2,
                found: 1,
                ..
            })
        ));
        assert!(matches!(
            parse_token("min"),
            Err(ParseError::Arity {
                expected: 1,
                found: 0,
                ..
            })
        ));
        assert!(matches!(
            parse_token("req(1)"),
            Err(ParseError::Arity {
                expected: 0,
                found: 1,
                ..
            })
        ));
    }

    #[test]
    fn invalid_arguments_are_rejected() {
        assert!(matches!(
            parse_token("min(-1)"),
            Err(ParseError::InvalidArgument { .. })
        ));
        assert!(matches!(
            parse_token("max(ten)"),
            Err(ParseError::InvalidArgument { .. })
        ));
        assert!(matches!(
            parse_token("min()"),
            Err(ParseError::InvalidArgument { .. })
        ));
        assert!(matches!(
            parse_token("eq(a b)"),
            Err(ParseError::InvalidArgument { .. })
        ));
        assert!(matches!(
            parse_token("max(99999999999999999999999)"),
            Err(ParseError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        for token in ["min(3", "min(3))", "3min", "min(3)x", "(3)"] {
            assert!(
                matches!(parse_token(token), Err(ParseError::Malformed { .. })),
                "expected malformed: {token}"
            );
        }
    }

    #[test]
    fn empty_token_is_rejected() {
        assert_eq!(
            parse_rule_string("age", "req||int").unwrap_err(),
            ParseError::EmptyToken {
                field: "age".into()
            }
        );
        assert!(parse_rule_string("age", "").is_err());
    }

    #[test]
    fn rule_set_keeps_insertion_order_and_replaces_duplicates() {
        let set = RuleSet::parse([("b", "req"), ("a", "int"), ("b", "email")]).unwrap();
        let fields: Vec<_> = set.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(fields, vec!["b", "a"]);
        assert_eq!(set.get("b"), Some(&[Rule::Email][..]));
    }

    #[test]
    fn rule_set_from_json() {
        let set = RuleSet::from_json(
            r#"{"zip": "req|int|between(4,6)", "age": ["req", "num", "max(120)"]}"#,
        )
        .unwrap();

        let fields: Vec<_> = set.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(fields, vec!["zip", "age"]);
        assert_eq!(set.get("age").unwrap()[2], Rule::Max(120));
        assert_eq!(set.to_string(), "zip: req|int|between(4,6)\nage: req|num|max(120)\n");
    }

    #[test]
    fn rule_set_from_json_errors() {
        assert!(matches!(
            RuleSet::from_json(r#"{"zip": 5}"#),
            Err(ParseError::Document(_))
        ));
        assert!(matches!(
            RuleSet::from_json("not json"),
            Err(ParseError::Document(_))
        ));
        assert_eq!(
            RuleSet::from_json(r#"{"zip": ["req", "nope"]}"#)
                .unwrap_err()
                .field(),
            Some("zip")
        );
    }

    #[test]
    fn builder_field() {
        let set = RuleSet::new()
            .field("name", "req")
            .and_then(|s| s.field("age", "int"))
            .unwrap();
        assert_eq!(set.len(), 2);
        assert!(RuleSet::new().field("x", "bogus").is_err());
    }
}
