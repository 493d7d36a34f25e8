//! CLI commands

mod check;
mod rules;

pub use check::{check, CheckArgs};
pub use rules::{print_rules, RulesArgs};

use anyhow::{Context, Result};
use formrule_validate::RuleSet;
use std::path::Path;

/// Read and parse a rule document.
fn load_rules(path: &Path) -> Result<RuleSet> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read rules from {}", path.display()))?;
    RuleSet::from_json(&content)
        .with_context(|| format!("failed to parse rules in {}", path.display()))
}
