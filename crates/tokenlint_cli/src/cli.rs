//! Command-line arguments for `tklint`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Checks stylesheets and components against a design-token set
#[derive(Parser)]
#[command(name = "tklint", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Lint documents against the configured tokens
    Lint(LintArgs),

    /// Write a starter tokenlint.config.jsonc
    Init {
        /// Replace an existing config file
        #[arg(long)]
        force: bool,
    },

    /// List the built-in rules
    Rules,
}

#[derive(Args)]
pub struct LintArgs {
    /// Files, directories, or glob patterns. Defaults to the configured
    /// patterns, then the current directory.
    pub patterns: Vec<String>,

    /// Config file to use instead of looking one up
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Lint every document even if the cache has it
    #[arg(long)]
    pub no_cache: bool,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Write fixes back to the documents
    #[arg(long)]
    pub fix: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
