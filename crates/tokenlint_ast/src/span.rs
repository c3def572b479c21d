//! Span and position types for source locations.
//!
//! Lines and columns are both 1-indexed, matching what stylesheet and
//! script tooling report to users.

use serde::{Deserialize, Serialize};

/// A position in source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (1-indexed, counted in characters).
    pub column: u32,
}

impl Position {
    /// Creates a new position.
    #[inline]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

/// A span representing a range in source text.
///
/// Uses byte offsets (0-indexed) for efficient slicing.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Span {
    /// Start byte offset (0-indexed, inclusive).
    pub start: u32,
    /// End byte offset (0-indexed, exclusive).
    pub end: u32,
}

impl Span {
    /// Creates a new span.
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Creates a span from `usize` offsets, as produced by `str` slicing.
    ///
    /// Offsets past `u32::MAX` saturate, so sources over 4 GiB get spans
    /// clamped to that limit.
    #[inline]
    pub fn from_range(start: usize, end: usize) -> Self {
        Self {
            start: saturate(start),
            end: saturate(end),
        }
    }

    /// Returns the length of the span in bytes.
    #[inline]
    pub const fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Returns true if the span is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns true if the two spans share at least one byte.
    ///
    /// Two empty spans at the same offset are treated as overlapping, since
    /// both would insert at the same position.
    #[inline]
    pub const fn overlaps(&self, other: &Span) -> bool {
        if self.is_empty() && other.is_empty() {
            return self.start == other.start;
        }
        self.start < other.end && other.start < self.end
    }

    /// Moves the span forward by `base` bytes.
    ///
    /// Used when a region of a larger document is scanned on its own.
    #[inline]
    pub const fn shift(&self, base: u32) -> Span {
        Span {
            start: self.start + base,
            end: self.end + base,
        }
    }
}

/// Maps byte offsets to line/column positions.
///
/// Built once per document; lookups are a binary search over line starts.
#[derive(Debug, Clone)]
pub struct LineIndex<'s> {
    source: &'s str,
    line_starts: Vec<u32>,
}

impl<'s> LineIndex<'s> {
    /// Indexes the line starts of `source`.
    pub fn new(source: &'s str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| saturate(i + 1)),
        );
        Self {
            source,
            line_starts,
        }
    }

    /// Returns the 1-indexed position of a byte offset.
    ///
    /// Offsets past the end clamp to the end of the source.
    pub fn position(&self, offset: u32) -> Position {
        let offset = offset.min(saturate(self.source.len()));
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let line_start = self.line_starts[line] as usize;
        let end = floor_char_boundary(self.source, offset as usize);
        let column = saturate(self.source[line_start..end].chars().count()) + 1;
        Position::new(saturate(line) + 1, column)
    }
}

fn saturate(offset: usize) -> u32 {
    u32::try_from(offset).unwrap_or(u32::MAX)
}

fn floor_char_boundary(s: &str, mut index: usize) -> usize {
    while index > 0 && !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position() {
        let pos = Position::new(1, 1);
        assert_eq!(pos.line, 1);
        assert_eq!(pos.column, 1);
        assert_eq!(Position::default(), pos);
    }

    #[test]
    fn test_span() {
        let span = Span::new(10, 20);
        assert_eq!(span.len(), 10);
        assert!(!span.is_empty());
        assert!(Span::new(5, 5).is_empty());
    }

    #[test]
    fn test_span_from_range_saturates() {
        assert_eq!(Span::from_range(3, 7), Span::new(3, 7));
        let huge = u32::MAX as usize + 10;
        assert_eq!(Span::from_range(1, huge), Span::new(1, u32::MAX));
    }

    #[test]
    fn test_span_shift() {
        let span = Span::new(2, 5).shift(10);
        assert_eq!(span, Span::new(12, 15));
    }

    #[test]
    fn test_span_overlaps() {
        assert!(Span::new(0, 5).overlaps(&Span::new(3, 8)));
        assert!(!Span::new(0, 5).overlaps(&Span::new(5, 8)));
        assert!(Span::new(4, 4).overlaps(&Span::new(4, 4)));
        assert!(!Span::new(4, 4).overlaps(&Span::new(0, 4)));
    }

    #[test]
    fn test_span_deserialization() {
        let json = r#"{"start": 5, "end": 15}"#;
        let span: Span = serde_json::from_str(json).unwrap();
        assert_eq!(span.start, 5);
        assert_eq!(span.end, 15);
    }

    #[test]
    fn test_line_index_first_line() {
        let index = LineIndex::new("a{color:red}");
        assert_eq!(index.position(0), Position::new(1, 1));
        assert_eq!(index.position(2), Position::new(1, 3));
    }

    #[test]
    fn test_line_index_multiline() {
        let source = "a {\n  color: red;\n}\n";
        let index = LineIndex::new(source);
        let offset = source.find("color").unwrap() as u32;
        assert_eq!(index.position(offset), Position::new(2, 3));
        assert_eq!(index.position(source.len() as u32), Position::new(4, 1));
    }

    #[test]
    fn test_line_index_counts_characters() {
        let source = "/* ✓ */ a{}";
        let index = LineIndex::new(source);
        let offset = source.find('a').unwrap() as u32;
        assert_eq!(index.position(offset), Position::new(1, 9));
    }

    #[test]
    fn test_line_index_clamps_past_end() {
        let index = LineIndex::new("ab");
        assert_eq!(index.position(100), Position::new(1, 3));
    }
}
