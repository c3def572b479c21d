//! # tokenlint_core
//!
//! Core linter engine for tokenlint.
//!
//! This crate provides:
//! - The main `Linter` orchestrator
//! - Configuration loading and validation
//! - The built-in design-token rules
//! - Cross-document token reference tracking
//!
//! ## Example
//!
//! ```
//! use serde_json::json;
//! use tokenlint_ast::{Document, SourceDocument};
//! use tokenlint_cache::CacheManager;
//! use tokenlint_core::{Linter, LinterConfig, RuleLevel};
//!
//! let config = LinterConfig::new()
//!     .with_tokens(json!({ "color": { "$type": "color", "brand": { "$value": "#ff0000" } } }))
//!     .with_rule("design-token/colors", RuleLevel::Error);
//! let linter = Linter::new(config, vec![]).unwrap();
//!
//! let doc = SourceDocument::new("/app.css", "css", "a { color: #00ff00; }");
//! let cache = CacheManager::new(".tokenlint-cache.json").with_enabled(false);
//! let report = linter.lint_with_cache(&[&doc as &dyn Document], &[], &cache);
//!
//! assert_eq!(report.error_count(), 1);
//! ```

mod config;
mod error;
mod linter;
pub mod references;
pub mod rules;

#[cfg(test)]
mod test_utils;

pub use config::{LinterConfig, RuleLevel, RuleSetting};
pub use error::LinterError;
pub use linter::{LintReport, Linter, RUN_RESULT_ID};
pub use references::{Reference, ReferenceIndex, scan_references};

pub use tokenlint_rule::{Fix, LintMessage, LintResult, Plugin, Severity};
