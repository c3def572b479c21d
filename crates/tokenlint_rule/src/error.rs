//! Rule registration error types.

use thiserror::Error;

/// Errors raised while assembling the rule set for a run.
///
/// All of them are fatal: they surface before any document is linted.
#[derive(Debug, Error)]
pub enum RuleError {
    /// Two modules declare the same rule name.
    #[error("Rule \"{name}\" is declared by both {first} and {second}")]
    Duplicate {
        name: String,
        first: String,
        second: String,
    },

    /// A module is malformed.
    #[error("Invalid rule from {origin}: {message}")]
    InvalidRule { origin: String, message: String },

    /// Strict loading requires a description.
    #[error("Rule \"{name}\" from {origin} has no meta.description")]
    MissingDescription { name: String, origin: String },

    /// A configured plugin was not supplied.
    #[error("Plugin not found: {0}")]
    MissingPlugin(String),

    /// Options do not match the rule's schema.
    #[error("Invalid options for rule \"{rule}\": {message}")]
    InvalidOptions { rule: String, message: String },

    /// A configured rule does not exist.
    #[error("Unknown rule \"{0}\"")]
    UnknownRule(String),
}

impl RuleError {
    /// Creates an invalid rule error.
    pub fn invalid_rule(origin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRule {
            origin: origin.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid options error.
    pub fn invalid_options(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidOptions {
            rule: rule.into(),
            message: message.into(),
        }
    }
}
