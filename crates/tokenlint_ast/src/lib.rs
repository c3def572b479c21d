//! # tokenlint_ast
//!
//! Source model shared by every tokenlint crate.
//!
//! This crate provides:
//! - Byte spans and 1-indexed line/column positions, plus a [`LineIndex`]
//!   to convert between them
//! - The closed set of syntax events parsing strategies emit
//!   ([`SyntaxEvent`], [`EventKind`]) and the [`EventSink`] they emit into
//! - The abstract [`Document`] consumed by the linter
//!
//! ## Example
//!
//! ```rust
//! use tokenlint_ast::{LineIndex, Position, Span};
//!
//! let index = LineIndex::new("a {\n  color: red;\n}");
//! assert_eq!(index.position(6), Position::new(2, 3));
//! assert_eq!(Span::new(6, 11).len(), 5);
//! ```

mod document;
mod event;
mod span;

pub use document::{Document, DocumentStat, FileDocument, SourceDocument, kind_from_path};
pub use event::{
    CssDeclaration, EventKind, EventSink, JsxAttribute, RecordingSink, StringLiteral, SyntaxEvent,
};
pub use span::{LineIndex, Position, Span};
