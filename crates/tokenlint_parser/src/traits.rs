//! Parser trait definition.

use tokenlint_ast::EventSink;

use crate::ParseError;

/// A parsing strategy for one family of document types.
///
/// A strategy walks the document's native syntax and emits a
/// [`SyntaxEvent`](tokenlint_ast::SyntaxEvent) for every construct the sink
/// wants. Spans in emitted events are byte offsets into `source`.
///
/// # Example
///
/// ```rust
/// use tokenlint_ast::{EventSink, RecordingSink};
/// use tokenlint_parser::{ParseError, Parser};
///
/// struct NothingParser;
///
/// impl Parser for NothingParser {
///     fn name(&self) -> &str {
///         "nothing"
///     }
///
///     fn extensions(&self) -> &[&str] {
///         &["txt"]
///     }
///
///     fn parse(&self, _source: &str, _sink: &mut dyn EventSink) -> Result<(), ParseError> {
///         Ok(())
///     }
/// }
///
/// assert!(NothingParser.can_parse("TXT"));
/// ```
pub trait Parser: Send + Sync {
    /// Returns the name of this parser.
    fn name(&self) -> &str;

    /// Returns the document type tags this parser handles.
    ///
    /// Tags are file extensions without the leading dot (e.g., `["css", "scss"]`).
    fn extensions(&self) -> &[&str];

    /// Parses `source`, emitting events into `sink`.
    fn parse(&self, source: &str, sink: &mut dyn EventSink) -> Result<(), ParseError>;

    /// Returns true if this parser can handle the given document type.
    fn can_parse(&self, extension: &str) -> bool {
        self.extensions()
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension))
    }
}
