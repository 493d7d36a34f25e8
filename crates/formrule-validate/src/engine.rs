//! The rule engine: evaluates a [`RuleSet`] against submitted values.

use crate::catalog::MessageCatalog;
use crate::config::{EngineConfig, MissingReference};
use crate::error::{ParseError, RuleError, ValidationReport};
use crate::parser::RuleSet;
use crate::rules::Rule;
use crate::sink::ErrorSink;
use crate::value::{FieldValue, FieldValues};

/// Evaluates rule sets.
///
/// For every field, rules run in order until one fails. The failure is
/// formatted through the [`MessageCatalog`] and recorded once on the
/// [`ErrorSink`]; the field's remaining rules are skipped.
///
/// ```
/// use formrule_validate::prelude::*;
///
/// let rules = RuleSet::parse([("username", "req|between(3,20)")]).unwrap();
/// let values = FieldValues::new().with("username", "al");
/// let mut sink = MessageCollector::new();
///
/// let valid = RuleEngine::new().is_valid(&rules, &values, &MessageBundle::english(), &mut sink);
///
/// assert!(!valid);
/// assert_eq!(sink.errors(), vec!["username must be between 3 and 20"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    config: EngineConfig,
}

impl RuleEngine {
    /// Engine with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with a custom configuration.
    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    /// The engine's configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Validate and answer only pass/fail; messages go to `sink`.
    pub fn is_valid<C, S>(
        &self,
        rules: &RuleSet,
        values: &FieldValues,
        catalog: &C,
        sink: &mut S,
    ) -> bool
    where
        C: MessageCatalog + ?Sized,
        S: ErrorSink + ?Sized,
    {
        self.validate(rules, values, catalog, sink).is_valid()
    }

    /// Parse `(field, rule-string)` pairs, then validate.
    pub fn is_valid_str<C, S>(
        &self,
        rules: &[(&str, &str)],
        values: &FieldValues,
        catalog: &C,
        sink: &mut S,
    ) -> Result<bool, ParseError>
    where
        C: MessageCatalog + ?Sized,
        S: ErrorSink + ?Sized,
    {
        let rules = RuleSet::parse(rules.iter().copied())?;
        Ok(self.is_valid(&rules, values, catalog, sink))
    }

    /// Validate and return the per-field errors.
    ///
    /// Every error in the report was also recorded on `sink`, in the same
    /// order.
    pub fn validate<C, S>(
        &self,
        rules: &RuleSet,
        values: &FieldValues,
        catalog: &C,
        sink: &mut S,
    ) -> ValidationReport
    where
        C: MessageCatalog + ?Sized,
        S: ErrorSink + ?Sized,
    {
        let mut report = ValidationReport::new();
        let empty = FieldValue::empty();

        for field_rules in rules {
            let field = field_rules.field.as_str();
            let value = values.get(field).unwrap_or(&empty);

            let failed = field_rules
                .rules
                .iter()
                .find(|rule| !self.passes(rule, value, values));

            if let Some(rule) = failed {
                tracing::debug!(field, rule = %rule, "validation rule failed");
                let error = self.rule_error(field, rule, catalog);
                sink.add(error.message.clone(), self.config.severity);
                report.record(field, error);
            }
        }

        tracing::debug!(
            fields = rules.len(),
            failed = report.len(),
            "validation finished"
        );
        report
    }

    fn passes(&self, rule: &Rule, value: &FieldValue, values: &FieldValues) -> bool {
        let passed = match rule.referenced_field() {
            Some(other) => match values.get(other) {
                Some(reference) => rule.check(value, Some(reference)),
                None => match self.config.missing_reference {
                    MissingReference::Empty => rule.check(value, None),
                    MissingReference::Fail => false,
                },
            },
            None => rule.check(value, None),
        };
        tracing::trace!(rule = %rule, passed, "rule evaluated");
        passed
    }

    /// Message arguments: the field label, then the rule arguments, with the
    /// other field's label standing in for `eq_field`'s field name.
    fn rule_error<C>(&self, field: &str, rule: &Rule, catalog: &C) -> RuleError
    where
        C: MessageCatalog + ?Sized,
    {
        let mut args = vec![catalog.label(field)];
        match rule.referenced_field() {
            Some(other) => args.push(catalog.label(other)),
            None => args.extend(rule.args()),
        }

        let message = catalog.format(&self.config.template_key(rule.name()), &args);
        RuleError::with_args(rule.name(), message, args)
    }
}
