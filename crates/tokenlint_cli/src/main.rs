//! `tklint`: lints stylesheets and components against design tokens.
//!
//! Exit status is 0 when no error-severity message was reported, 1 when one
//! was, and 2 when the run itself failed.

mod cli;
mod commands;
mod discovery;
mod output;

use std::process::ExitCode;

use clap::Parser;
use miette::Result;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};

const EXIT_FOUND_ERRORS: u8 = 1;
const EXIT_FAILED: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli.command) {
        Ok(false) => ExitCode::SUCCESS,
        Ok(true) => ExitCode::from(EXIT_FOUND_ERRORS),
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(EXIT_FAILED)
        }
    }
}

/// Logs go to stderr so `--format json` output stays parseable. `RUST_LOG`
/// wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Returns whether any error-severity message was reported.
fn run(command: &Commands) -> Result<bool> {
    match command {
        Commands::Lint(args) => commands::lint::run_lint(args),
        Commands::Init { force } => commands::init::run_init(*force).map(|()| false),
        Commands::Rules => {
            commands::rules::run_rules();
            Ok(false)
        }
    }
}
