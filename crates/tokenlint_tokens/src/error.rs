//! Token loading error types.

use thiserror::Error;

/// Errors raised while flattening, validating or resolving design tokens.
#[derive(Debug, Error)]
pub enum TokenError {
    /// A token value does not have the shape its type requires.
    #[error("Invalid token \"{path}\": {message}")]
    Validation {
        /// Dot-separated token path.
        path: String,
        /// What was expected.
        message: String,
    },

    /// Alias resolution revisited a path.
    #[error("Circular alias reference detected: {}", chain.join(" -> "))]
    Cycle {
        /// The alias chain, ending with the revisited path.
        chain: Vec<String>,
    },

    /// An alias points at a path that holds no token.
    #[error("Token \"{path}\" references unknown token \"{target}\"")]
    UnresolvedAlias {
        /// The referencing token.
        path: String,
        /// The missing target path.
        target: String,
    },

    /// An alias points at a token of an incompatible type.
    #[error("Token \"{path}\" expects a {expected} but \"{target}\" is a {found}")]
    TypeMismatch {
        /// The referencing token.
        path: String,
        /// The referenced token.
        target: String,
        /// Type required at the reference site.
        expected: String,
        /// Type of the referenced token.
        found: String,
    },

    /// A tree entry is neither a group nor a token.
    #[error("Invalid token tree at \"{pointer}\": {message}")]
    InvalidNode {
        /// Structural pointer of the offending node.
        pointer: String,
        /// Why the node was rejected.
        message: String,
    },

    /// A group or token name contains reserved characters.
    #[error("Invalid token name \"{name}\" at \"{pointer}\": names may not contain '.', '{{' or '}}'")]
    InvalidName {
        /// The rejected name.
        name: String,
        /// Structural pointer of the node.
        pointer: String,
    },

    /// No type could be determined for a token.
    #[error("Token \"{path}\" has no $type and none could be inherited")]
    MissingType {
        /// Dot-separated token path.
        path: String,
    },

    /// A `$type` names an unknown token type.
    #[error("Token \"{path}\" has unknown $type \"{type_name}\"")]
    UnknownType {
        /// Dot-separated token path.
        path: String,
        /// The unrecognized type name.
        type_name: String,
    },

    /// An allow-pattern could not be compiled.
    #[error("Invalid token pattern \"{pattern}\": {message}")]
    Pattern {
        /// The pattern as written.
        pattern: String,
        /// Compiler message.
        message: String,
    },

    /// A theme failed to load.
    #[error("Failed to parse tokens for theme \"{theme}\": {source}")]
    Theme {
        /// Theme name.
        theme: String,
        /// Underlying failure.
        #[source]
        source: Box<TokenError>,
    },
}

impl TokenError {
    /// Creates a validation error.
    pub fn validation(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid node error.
    pub fn invalid_node(pointer: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidNode {
            pointer: pointer.into(),
            message: message.into(),
        }
    }

    /// Wraps this error with the theme it occurred in.
    pub fn in_theme(self, theme: impl Into<String>) -> Self {
        Self::Theme {
            theme: theme.into(),
            source: Box::new(self),
        }
    }

    /// Returns true if this error, or the error it wraps, is an alias cycle.
    pub fn is_cycle(&self) -> bool {
        match self {
            Self::Cycle { .. } => true,
            Self::Theme { source, .. } => source.is_cycle(),
            _ => false,
        }
    }

    /// Returns true for alias failures (cycles, missing targets, mismatches).
    pub fn is_alias_error(&self) -> bool {
        match self {
            Self::Cycle { .. } | Self::UnresolvedAlias { .. } | Self::TypeMismatch { .. } => true,
            Self::Theme { source, .. } => source.is_alias_error(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_wrapping_message() {
        let err = TokenError::validation("color.brand", "expected a color").in_theme("light");
        assert_eq!(
            err.to_string(),
            "Failed to parse tokens for theme \"light\": Invalid token \"color.brand\": expected a color"
        );
    }

    #[test]
    fn test_cycle_message_and_classification() {
        let err = TokenError::Cycle {
            chain: vec!["a".into(), "b".into(), "a".into()],
        };
        assert_eq!(
            err.to_string(),
            "Circular alias reference detected: a -> b -> a"
        );
        assert!(err.is_cycle());
        assert!(err.is_alias_error());
        assert!(err.in_theme("dark").is_cycle());
    }

    #[test]
    fn test_validation_is_not_alias_error() {
        let err = TokenError::validation("x", "bad");
        assert!(!err.is_cycle());
        assert!(!err.is_alias_error());
    }
}
