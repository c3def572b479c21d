//! JSON output formatter

use miette::{IntoDiagnostic, Result};
use tokenlint_core::LintReport;

pub fn output_json(report: &LintReport) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report).into_diagnostic()?);
    Ok(())
}
