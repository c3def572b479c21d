//! Linter error types.

use thiserror::Error;

use tokenlint_rule::RuleError;
use tokenlint_tokens::TokenError;

/// Errors that abort a lint run.
///
/// Per-document failures never surface here; they become messages in the
/// document's result.
#[derive(Debug, Error)]
pub enum LinterError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The design tokens failed to load.
    #[error("Token error: {0}")]
    Tokens(#[from] TokenError),

    /// A rule or plugin failed to register or configure.
    #[error("Rule error: {0}")]
    Rule(#[from] RuleError),
}

impl LinterError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
