//! CLI argument parsing

use crate::commands::{self, CheckArgs, RulesArgs};
use clap::{Parser, Subcommand};

/// formrule - validate JSON form data against rule-strings
#[derive(Parser, Debug)]
#[command(name = "formrule")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG wins when set
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate an input document against a rule document
    Check(CheckArgs),

    /// Parse a rule document and print its canonical form
    Rules(RulesArgs),
}

impl Cli {
    /// Requested verbosity level.
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }

    /// Execute the CLI command.
    ///
    /// `Ok(false)` means the command ran but the input is invalid.
    pub fn execute(self) -> anyhow::Result<bool> {
        match self.command {
            Commands::Check(args) => commands::check(args),
            Commands::Rules(args) => commands::print_rules(args),
        }
    }
}
