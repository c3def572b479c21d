//! # tokenlint_parser
//!
//! Parsing strategies for tokenlint.
//!
//! This crate provides:
//! - A `Parser` trait for implementing custom strategies
//! - Built-in strategies for stylesheets (CSS, SCSS, Less, Sass), scripts
//!   (JavaScript, TypeScript, JSX) and components (Vue, Svelte)
//! - A `ParserRegistry` that picks a strategy by document type
//!
//! ## Architecture
//!
//! Strategies do not build a syntax tree. They walk the source once and
//! emit syntax events (CSS declarations, string literals and JSX
//! attributes) to an [`EventSink`](tokenlint_ast::EventSink). Embedded
//! languages, such as a `<style>` block in a Vue file or a `css` template
//! in JavaScript, are handed to the matching scanner with absolute offsets.
//!
//! ## Example
//!
//! ```rust
//! use tokenlint_ast::{EventKind, RecordingSink};
//! use tokenlint_parser::ParserRegistry;
//!
//! let registry = ParserRegistry::new();
//! let mut sink = RecordingSink::default();
//! registry.parse("css", "a { color: #fff; }", &mut sink).unwrap();
//!
//! assert_eq!(sink.events[0].0, EventKind::CssDeclaration);
//! assert_eq!(sink.events[0].2, "color: #fff");
//! ```

mod css;
mod error;
mod markup;
mod registry;
mod script;
mod traits;

pub use css::CssParser;
pub use error::ParseError;
pub use markup::{SvelteParser, VueParser};
pub use registry::ParserRegistry;
pub use script::ScriptParser;
pub use traits::Parser;
