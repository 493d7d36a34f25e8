//! Predicate library.
//!
//! Each predicate takes the raw submitted value and answers pass/fail.
//! Pattern predicates work on [`FieldValue::as_text`]; the length/range
//! predicates measure text by character count and numbers by value, and
//! fail for booleans and null.

use crate::value::FieldValue;
use regex::Regex;
use std::sync::OnceLock;

// Pre-compiled regex patterns
static NUM_REGEX: OnceLock<Regex> = OnceLock::new();
static INT_REGEX: OnceLock<Regex> = OnceLock::new();
static FLOAT_REGEX: OnceLock<Regex> = OnceLock::new();
static ALPHA_REGEX: OnceLock<Regex> = OnceLock::new();
static ALPHANUM_REGEX: OnceLock<Regex> = OnceLock::new();
static DATE_REGEX: OnceLock<Regex> = OnceLock::new();
static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
static URL_REGEX: OnceLock<Regex> = OnceLock::new();

fn compiled(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("built-in pattern is valid"))
}

fn num_regex() -> &'static Regex {
    compiled(&NUM_REGEX, r"^[0-9]+(?:\.[0-9]+)?$")
}

fn int_regex() -> &'static Regex {
    compiled(&INT_REGEX, r"^[0-9]+$")
}

fn float_regex() -> &'static Regex {
    compiled(&FLOAT_REGEX, r"^[0-9]+\.[0-9]+$")
}

fn alpha_regex() -> &'static Regex {
    compiled(&ALPHA_REGEX, r"^[a-zA-Z\p{Arabic} ]+$")
}

fn alphanum_regex() -> &'static Regex {
    compiled(&ALPHANUM_REGEX, r"^[a-zA-Z\p{Arabic}0-9 ,.|]+$")
}

fn date_regex() -> &'static Regex {
    // Month length is not checked: 2023-02-31 is accepted.
    compiled(
        &DATE_REGEX,
        r"^[12][0-9]{3}-(?:0[1-9]|1[0-2])-(?:0[1-9]|[12][0-9]|3[01])$",
    )
}

fn email_regex() -> &'static Regex {
    compiled(&EMAIL_REGEX, r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
}

fn url_regex() -> &'static Regex {
    compiled(
        &URL_REGEX,
        r"^(?:https?://)?[0-9a-z.-]+\.[a-z.]{2,6}[/a-zA-Z0-9_ .-]*/?$",
    )
}

/// Non-empty value.
pub fn req(value: &FieldValue) -> bool {
    match value {
        FieldValue::Text(s) => !s.is_empty(),
        FieldValue::Number(_) => true,
        FieldValue::Bool(b) => *b,
        FieldValue::Null => false,
    }
}

/// Non-negative integer or decimal.
pub fn num(value: &FieldValue) -> bool {
    num_regex().is_match(&value.as_text())
}

/// Non-negative integer.
pub fn int(value: &FieldValue) -> bool {
    int_regex().is_match(&value.as_text())
}

/// Decimal with a mandatory fractional part.
pub fn float(value: &FieldValue) -> bool {
    float_regex().is_match(&value.as_text())
}

/// Latin or Arabic letters and spaces.
pub fn alpha(value: &FieldValue) -> bool {
    alpha_regex().is_match(&value.as_text())
}

/// Latin or Arabic letters, digits, spaces, `,`, `.` and `|`.
pub fn alphanum(value: &FieldValue) -> bool {
    alphanum_regex().is_match(&value.as_text())
}

/// `YYYY-MM-DD` date with a year starting with 1 or 2.
pub fn vdate(value: &FieldValue) -> bool {
    date_regex().is_match(&value.as_text())
}

pub fn email(value: &FieldValue) -> bool {
    email_regex().is_match(&value.as_text())
}

pub fn url(value: &FieldValue) -> bool {
    url_regex().is_match(&value.as_text())
}

/// Loose equality against a literal.
pub fn eq(value: &FieldValue, literal: &str) -> bool {
    loose_eq_text(&value.as_text(), literal)
}

/// Loose equality against another submitted value.
pub fn eq_field(value: &FieldValue, other: &FieldValue) -> bool {
    loose_eq_text(&value.as_text(), &other.as_text())
}

/// Numeric texts compare by value, everything else by exact text.
fn loose_eq_text(a: &str, b: &str) -> bool {
    match (parse_number(a), parse_number(b)) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// The quantity compared by the length/range predicates.
fn magnitude(value: &FieldValue) -> Option<f64> {
    match value {
        FieldValue::Text(s) => Some(s.chars().count() as f64),
        FieldValue::Number(n) => Some(*n),
        FieldValue::Bool(_) | FieldValue::Null => None,
    }
}

pub fn lt(value: &FieldValue, bound: u64) -> bool {
    magnitude(value).is_some_and(|m| m < bound as f64)
}

pub fn gt(value: &FieldValue, bound: u64) -> bool {
    magnitude(value).is_some_and(|m| m > bound as f64)
}

pub fn min(value: &FieldValue, bound: u64) -> bool {
    magnitude(value).is_some_and(|m| m >= bound as f64)
}

pub fn max(value: &FieldValue, bound: u64) -> bool {
    magnitude(value).is_some_and(|m| m <= bound as f64)
}

/// Inclusive range.
pub fn between(value: &FieldValue, low: u64, high: u64) -> bool {
    magnitude(value).is_some_and(|m| m >= low as f64 && m <= high as f64)
}

/// Decimal with exactly `before` digits before the point and `after` after it.
pub fn floatlike(value: &FieldValue, before: usize, after: usize) -> bool {
    if !float(value) {
        return false;
    }
    let text = value.as_text();
    match text.split_once('.') {
        Some((whole, fraction)) => whole.len() == before && fraction.len() == after,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> FieldValue {
        FieldValue::from(s)
    }

    #[test]
    fn req_policy() {
        assert!(req(&text("x")));
        assert!(req(&text(" ")));
        assert!(req(&text("0")));
        assert!(req(&FieldValue::Number(0.0)));
        assert!(req(&FieldValue::Bool(true)));
        assert!(!req(&text("")));
        assert!(!req(&FieldValue::Null));
        assert!(!req(&FieldValue::Bool(false)));
    }

    #[test]
    fn numeric_patterns() {
        assert!(num(&text("12")));
        assert!(num(&text("12.5")));
        assert!(!num(&text("-1")));
        assert!(!num(&text("1.")));
        assert!(!num(&text("abc")));

        assert!(int(&text("007")));
        assert!(!int(&text("1.0")));
        assert!(int(&FieldValue::Number(42.0)));

        assert!(float(&text("0.5")));
        assert!(!float(&text("5")));
        assert!(float(&FieldValue::Number(2.25)));
    }

    #[test]
    fn alpha_accepts_latin_arabic_and_spaces() {
        assert!(alpha(&text("John Smith")));
        assert!(alpha(&text("محمد علي")));
        assert!(!alpha(&text("John3")));
        assert!(!alpha(&text("")));
        assert!(!alpha(&text("José")));
    }

    #[test]
    fn alphanum_allows_punctuation_subset() {
        assert!(alphanum(&text("Street 12, Apt. 4|B")));
        assert!(alphanum(&text("شارع 5")));
        assert!(!alphanum(&text("a-b")));
        assert!(!alphanum(&text("a@b")));
    }

    #[test]
    fn date_shape_only() {
        assert!(vdate(&text("2023-01-31")));
        assert!(vdate(&text("2023-02-31")));
        assert!(vdate(&text("1999-12-01")));
        assert!(!vdate(&text("3023-01-01")));
        assert!(!vdate(&text("2023-13-01")));
        assert!(!vdate(&text("2023-00-10")));
        assert!(!vdate(&text("2023-01-32")));
        assert!(!vdate(&text("23-01-01")));
    }

    #[test]
    fn email_and_url() {
        assert!(email(&text("user.name+tag@example.co.uk")));
        assert!(!email(&text("user@localhost")));
        assert!(!email(&text("@example.com")));

        assert!(url(&text("https://example.com")));
        assert!(url(&text("example.com/path/to page")));
        assert!(url(&text("http://sub.example.org/")));
        assert!(!url(&text("not a url")));
        assert!(!url(&text("ftp://example.com")));
    }

    #[test]
    fn loose_equality() {
        assert!(eq(&text("yes"), "yes"));
        assert!(!eq(&text("Yes"), "yes"));
        assert!(eq(&text("1.0"), "1"));
        assert!(eq(&FieldValue::Number(5.0), "5"));
        assert!(eq_field(&text("x"), &text("x")));
        assert!(!eq_field(&text("y"), &FieldValue::empty()));
        assert!(eq_field(&FieldValue::Null, &FieldValue::empty()));
    }

    #[test]
    fn length_for_text_value_for_numbers() {
        assert!(min(&text("abc"), 3));
        assert!(!min(&text("ab"), 3));
        assert!(max(&text("héllo"), 5));
        assert!(lt(&text("ab"), 3));
        assert!(!gt(&text("abc"), 3));

        assert!(min(&FieldValue::Number(18.0), 18));
        assert!(!max(&FieldValue::Number(121.0), 120));
        assert!(gt(&FieldValue::Number(0.5), 0));

        // numeric-looking text is still measured by length
        assert!(!min(&text("100"), 50));
    }

    #[test]
    fn length_rules_fail_for_bool_and_null() {
        for value in [FieldValue::Bool(true), FieldValue::Bool(false), FieldValue::Null] {
            assert!(!lt(&value, 100));
            assert!(!gt(&value, 0));
            assert!(!min(&value, 0));
            assert!(!max(&value, 100));
            assert!(!between(&value, 0, 100));
        }
    }

    #[test]
    fn between_inclusive() {
        assert!(between(&text("abc"), 2, 5));
        assert!(between(&text("ab"), 2, 5));
        assert!(between(&text("abcde"), 2, 5));
        assert!(!between(&text("a"), 2, 5));
        assert!(!between(&text("abcdef"), 2, 5));
        assert!(between(&FieldValue::Number(10.0), 2, 10));
    }

    #[test]
    fn floatlike_digit_counts() {
        assert!(floatlike(&text("12.345"), 2, 3));
        assert!(!floatlike(&text("1.345"), 2, 3));
        assert!(!floatlike(&text("12.34"), 2, 3));
        assert!(!floatlike(&text("12"), 2, 0));
        assert!(floatlike(&FieldValue::Number(12.5), 2, 1));
    }
}
