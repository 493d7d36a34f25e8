//! Engine configuration.
//!
//! Defaults match the conventional behavior; every field can be overridden
//! from `FORMRULE_`-prefixed environment variables:
//!
//! | variable | field |
//! |---|---|
//! | `FORMRULE_ERROR_KEY_SUFFIX` | [`EngineConfig::error_key_suffix`] |
//! | `FORMRULE_MISSING_REFERENCE` | [`EngineConfig::missing_reference`] (`empty` / `fail`) |
//! | `FORMRULE_SEVERITY` | [`EngineConfig::severity`] |

use crate::error::ConfigError;
use crate::sink::Severity;
use serde::{Deserialize, Serialize};

/// Environment variable prefix read by [`EngineConfig::from_env`].
pub const ENV_PREFIX: &str = "FORMRULE";

/// What `eq_field` does when the referenced field was not submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingReference {
    /// Compare against the empty string
    #[default]
    Empty,
    /// Fail the rule
    Fail,
}

/// Configuration for [`RuleEngine`](crate::RuleEngine).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Appended to the rule name to form the message template key
    pub error_key_suffix: String,
    /// Policy for `eq_field` naming an absent field
    pub missing_reference: MissingReference,
    /// Severity used when recording failures
    pub severity: Severity,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            error_key_suffix: "Error".to_string(),
            missing_reference: MissingReference::Empty,
            severity: Severity::Error,
        }
    }
}

impl EngineConfig {
    /// Load from `FORMRULE_*` environment variables; unset ones keep their
    /// defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_prefixed(ENV_PREFIX)
    }

    /// Load from environment variables with a custom prefix.
    pub fn from_env_prefixed(prefix: &str) -> Result<Self, ConfigError> {
        envy::prefixed(format!("{}_", prefix))
            .from_env::<Self>()
            .map_err(ConfigError::from)
    }

    /// Set the template key suffix.
    pub fn error_key_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.error_key_suffix = suffix.into();
        self
    }

    /// Set the missing-reference policy.
    pub fn missing_reference(mut self, policy: MissingReference) -> Self {
        self.missing_reference = policy;
        self
    }

    /// Set the severity used for failures.
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Message template key for a rule name.
    pub fn template_key(&self, rule_name: &str) -> String {
        format!("{}{}", rule_name, self.error_key_suffix)
    }
}
