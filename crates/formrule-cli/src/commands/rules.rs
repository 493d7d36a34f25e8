//! Rules command - print a rule document in canonical form

use super::load_rules;
use anyhow::Result;
use clap::Args;
use console::style;
use std::path::PathBuf;

/// Arguments for the `rules` command
#[derive(Args, Debug)]
pub struct RulesArgs {
    /// JSON object mapping field names to rule-strings
    #[arg(short, long)]
    pub rules: PathBuf,
}

/// Parse the rule document and print one line per field.
pub fn print_rules(args: RulesArgs) -> Result<bool> {
    let rules = load_rules(&args.rules)?;

    for field_rules in &rules {
        println!(
            "{}: {}",
            style(&field_rules.field).bold(),
            field_rules.rule_string()
        );
    }
    tracing::debug!(fields = rules.len(), "rule document parsed");

    Ok(true)
}
