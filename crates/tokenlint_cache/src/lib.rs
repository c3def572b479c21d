//! # tokenlint_cache
//!
//! Document-level caching for tokenlint.
//!
//! This crate provides:
//! - Per-document result memoization keyed by modification time and size
//! - Fix application with overlap filtering
//! - A JSON store that is pruned and saved once per run
//!
//! ## Example
//!
//! ```
//! use tokenlint_ast::SourceDocument;
//! use tokenlint_cache::CacheManager;
//! use tokenlint_rule::LintResult;
//!
//! let cache = CacheManager::new(".tokenlint-cache.json");
//! let doc = SourceDocument::new("/a.css", "css", "a { color: red; }");
//!
//! let result = cache
//!     .process_document(&doc, |_| LintResult::new("/a.css", vec![]))
//!     .unwrap();
//! assert!(result.messages.is_empty());
//! assert_eq!(cache.len(), 1);
//! ```

mod entry;
mod error;
mod fixer;
mod manager;

pub use entry::CacheEntry;
pub use error::CacheError;
pub use fixer::{FixerResult, apply_fixes};
pub use manager::{CacheManager, DEFAULT_CACHE_LOCATION};
