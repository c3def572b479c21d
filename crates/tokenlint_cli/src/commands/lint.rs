//! Lint command implementation

use std::path::{Path, PathBuf};

use miette::{IntoDiagnostic, Result};
use tokenlint_ast::{Document, FileDocument};
use tokenlint_core::{Linter, LinterConfig};
use tokenlint_parser::ParserRegistry;
use tracing::{info, warn};

use crate::cli::LintArgs;
use crate::discovery::{discover, resolve_ignore_files};
use crate::output::output_report;

/// Config file names looked up in the working directory, in priority order.
pub const CONFIG_FILES: &[&str] = &[
    "tokenlint.config.jsonc",
    "tokenlint.config.json",
    ".tokenlint.jsonc",
    ".tokenlint.json",
];

pub fn run_lint(args: &LintArgs) -> Result<bool> {
    let mut config = if let Some(ref path) = args.config {
        LinterConfig::from_file(path).into_diagnostic()?
    } else {
        find_config(Path::new("."))?
    };

    if args.no_cache {
        config.cache = false;
    }
    if args.fix {
        config.fix = true;
    }

    let patterns = resolve_patterns(&args.patterns, &config);
    let base_dir = config
        .base_dir()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let supported = ParserRegistry::new().supported_kinds();

    let ignore_files = resolve_ignore_files(&base_dir, &config.ignore_files);
    let discovered = discover(&patterns, Path::new("."), &ignore_files, &supported)?;
    let linter = Linter::new(config, Vec::new()).into_diagnostic()?;

    let documents: Vec<FileDocument> = discovered
        .files
        .iter()
        .map(|path| FileDocument::new(path.clone()))
        .collect();
    let refs: Vec<&dyn Document> = documents.iter().map(|d| d as &dyn Document).collect();

    let report = linter.lint_documents(&refs, &discovered.ignore_files);
    if let Some(warning) = &report.warning {
        warn!("{}", warning);
    }

    output_report(&report, args.format)?;
    Ok(report.has_errors())
}

/// Loads the first config file found in `dir`, or the defaults.
pub fn find_config(dir: &Path) -> Result<LinterConfig> {
    for name in CONFIG_FILES {
        let path = dir.join(name);
        if path.is_file() {
            info!("Using config: {}", path.display());
            return LinterConfig::from_file(&path).into_diagnostic();
        }
    }

    info!("No config file found, using defaults");
    Ok(LinterConfig::new())
}

fn resolve_patterns(cli_patterns: &[String], config: &LinterConfig) -> Vec<String> {
    if !cli_patterns.is_empty() {
        cli_patterns.to_vec()
    } else if !config.patterns.is_empty() {
        config.patterns.clone()
    } else {
        vec![".".to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_prefers_jsonc() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".tokenlint.json"), r#"{ "cache": false }"#).unwrap();
        fs::write(
            temp.path().join("tokenlint.config.jsonc"),
            "{\n  // comment\n  \"fix\": true\n}",
        )
        .unwrap();

        let config = find_config(temp.path()).unwrap();

        assert!(config.fix);
        assert!(config.cache);
        assert_eq!(
            config.config_path,
            Some(temp.path().join("tokenlint.config.jsonc"))
        );
    }

    #[test]
    fn test_find_config_defaults_when_missing() {
        let temp = TempDir::new().unwrap();
        let config = find_config(temp.path()).unwrap();
        assert!(config.config_path.is_none());
        assert!(config.rules.is_empty());
    }

    #[test]
    fn test_resolve_patterns_fallbacks() {
        let mut config = LinterConfig::new();
        assert_eq!(resolve_patterns(&[], &config), vec!["."]);

        config.patterns = vec!["src/**/*.css".to_string()];
        assert_eq!(resolve_patterns(&[], &config), vec!["src/**/*.css"]);
        assert_eq!(
            resolve_patterns(&["app.css".to_string()], &config),
            vec!["app.css"]
        );
    }
}
