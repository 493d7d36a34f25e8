//! Check command - validate an input document

use super::load_rules;
use anyhow::{Context, Result};
use clap::Args;
use console::{style, Emoji};
use formrule_validate::{
    EngineConfig, FieldValues, MessageBundle, MessageCollector, RuleEngine, ValidationReport,
};
use serde::Serialize;
use std::path::PathBuf;

static CHECK: Emoji<'_, '_> = Emoji("✅ ", "+ ");
static ERROR: Emoji<'_, '_> = Emoji("❌ ", "x ");

/// Arguments for the `check` command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// JSON object mapping field names to rule-strings
    #[arg(short, long)]
    pub rules: PathBuf,

    /// JSON object mapping field names to submitted values
    #[arg(short, long)]
    pub input: PathBuf,

    /// JSON object of labels and message templates, layered over the
    /// built-in English messages
    #[arg(short, long)]
    pub messages: Option<PathBuf>,

    /// Print a JSON report instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    valid: bool,
    errors: Vec<JsonFieldError<'a>>,
}

#[derive(Debug, Serialize)]
struct JsonFieldError<'a> {
    field: &'a str,
    code: &'a str,
    message: &'a str,
}

impl<'a> From<&'a ValidationReport> for JsonReport<'a> {
    fn from(report: &'a ValidationReport) -> Self {
        Self {
            valid: report.is_valid(),
            errors: report
                .iter()
                .map(|(field, error)| JsonFieldError {
                    field,
                    code: &error.code,
                    message: &error.message,
                })
                .collect(),
        }
    }
}

/// Validate the input document; returns whether it is valid.
pub fn check(args: CheckArgs) -> Result<bool> {
    let config = EngineConfig::from_env().context("invalid FORMRULE_* configuration")?;
    let rules = load_rules(&args.rules)?;

    let input = std::fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read input from {}", args.input.display()))?;
    let values = FieldValues::from_json(&input)
        .with_context(|| format!("failed to parse input in {}", args.input.display()))?;

    let mut catalog = MessageBundle::english();
    if let Some(path) = &args.messages {
        let overrides = MessageBundle::from_file(path)
            .with_context(|| format!("failed to load messages from {}", path.display()))?;
        catalog.merge(overrides);
    }

    let mut sink = MessageCollector::new();
    let report = RuleEngine::with_config(config).validate(&rules, &values, &catalog, &mut sink);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&JsonReport::from(&report))?);
    } else if report.is_valid() {
        println!("{} {}", CHECK, style("valid").green().bold());
    } else {
        for message in sink.messages() {
            println!("{} {}", ERROR, message.text);
        }
    }

    Ok(report.is_valid())
}
