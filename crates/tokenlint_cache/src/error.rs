//! Cache error types.

use std::io;

use thiserror::Error;

/// Errors that can occur in the cache system.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The cache store could not be parsed.
    #[error("Corrupted cache: {0}")]
    Corrupted(String),

    /// A document's text could not be read.
    #[error("Failed to read {id}: {source}")]
    Read { id: String, source: io::Error },

    /// Fixed text could not be written back.
    #[error("Failed to write fixes to {id}: {source}")]
    Write { id: String, source: io::Error },

    /// I/O error on the cache store.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CacheError {
    /// Creates a corrupted cache error.
    pub fn corrupted(message: impl Into<String>) -> Self {
        Self::Corrupted(message.into())
    }

    /// Creates a document read error.
    pub fn read(id: impl Into<String>, source: io::Error) -> Self {
        Self::Read {
            id: id.into(),
            source,
        }
    }

    /// Creates a document write error.
    pub fn write(id: impl Into<String>, source: io::Error) -> Self {
        Self::Write {
            id: id.into(),
            source,
        }
    }
}
