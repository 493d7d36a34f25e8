//! # formrule
//!
//! Declarative validation for form-like input. Each field gets a
//! pipe-delimited rule-string; the engine runs the rules in order, stops at
//! the first failure per field, and records one localized message per
//! failing field.
//!
//! ## Example
//!
//! ```rust
//! use formrule_validate::prelude::*;
//!
//! let rules = RuleSet::parse([
//!     ("username", "req|alphanum|between(3,20)"),
//!     ("email", "req|email"),
//!     ("password", "req|min(8)"),
//!     ("password_confirm", "req|eq_field(password)"),
//! ])
//! .unwrap();
//!
//! let values = FieldValues::new()
//!     .with("username", "sam")
//!     .with("email", "sam@example.com")
//!     .with("password", "correct horse")
//!     .with("password_confirm", "correct horse");
//!
//! let mut sink = MessageCollector::new();
//! let valid = RuleEngine::new().is_valid(&rules, &values, &MessageBundle::english(), &mut sink);
//!
//! assert!(valid);
//! assert!(sink.is_empty());
//! ```
//!
//! ## Rules
//!
//! - `req` (alias `required`) - non-empty value
//! - `num`, `int`, `float` - numeric shapes
//! - `alpha`, `alphanum` - Latin/Arabic letters (plus digits and `,.|`)
//! - `vdate` - `YYYY-MM-DD`
//! - `email`, `url`
//! - `lt(n)`, `gt(n)`, `min(n)`, `max(n)`, `between(a,b)` - character count
//!   for text, value for numbers
//! - `floatlike(a,b)` - exactly `a` digits before and `b` after the point
//! - `eq(word)`, `eq_field(field)` - loose equality
//!
//! ## Messages
//!
//! A failing rule is reported through [`MessageCatalog::format`] with the
//! key `"<rule>Error"` and the arguments `[label, rule args...]`, then
//! recorded on the [`ErrorSink`] with [`Severity::Error`].

mod catalog;
mod config;
mod engine;
mod error;
pub mod parser;
pub mod rules;
mod sink;
mod value;


pub use catalog::{interpolate, MessageBundle, MessageCatalog, DEFAULT_TEMPLATES};
pub use config::{EngineConfig, MissingReference, ENV_PREFIX};
pub use engine::RuleEngine;
pub use error::{ConfigError, ParseError, RuleError, ValidationReport};
pub use parser::{FieldRules, RuleSet};
pub use rules::Rule;
pub use sink::{ErrorSink, Message, MessageCollector, NullSink, Severity};
pub use value::{FieldValue, FieldValues};

/// Prelude module for validation
pub mod prelude {
    pub use crate::catalog::{MessageBundle, MessageCatalog};
    pub use crate::config::{EngineConfig, MissingReference};
    pub use crate::engine::RuleEngine;
    pub use crate::error::{ParseError, RuleError, ValidationReport};
    pub use crate::parser::RuleSet;
    pub use crate::rules::Rule;
    pub use crate::sink::{ErrorSink, MessageCollector, Severity};
    pub use crate::value::{FieldValue, FieldValues};
}
