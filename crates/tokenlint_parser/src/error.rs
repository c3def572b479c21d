//! Parse error types.

use thiserror::Error;

/// Errors that can occur during parsing.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The source text is malformed.
    #[error("{message} (at byte {offset})")]
    Syntax {
        /// Error message.
        message: String,
        /// Absolute byte offset in the document where the error occurred.
        offset: usize,
    },

    /// No strategy handles the document type.
    #[error("Unsupported document type: {0}")]
    Unsupported(String),
}

impl ParseError {
    /// Creates a new syntax error at `offset`.
    pub fn syntax(message: impl Into<String>, offset: usize) -> Self {
        Self::Syntax {
            message: message.into(),
            offset,
        }
    }

    /// Creates a new unsupported document type error.
    pub fn unsupported(kind: impl Into<String>) -> Self {
        Self::Unsupported(kind.into())
    }

    /// Returns the byte offset the error points at, if any.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::Syntax { offset, .. } => Some(*offset),
            Self::Unsupported(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_display() {
        let err = ParseError::syntax("Unclosed block", 12);
        assert_eq!(err.to_string(), "Unclosed block (at byte 12)");
        assert_eq!(err.offset(), Some(12));
        assert_eq!(ParseError::unsupported("md").offset(), None);
    }
}
