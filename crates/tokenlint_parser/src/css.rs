//! Stylesheet strategy: CSS, SCSS, Less and indented Sass.

use tokenlint_ast::{CssDeclaration, EventKind, EventSink, Span, SyntaxEvent};

use crate::{ParseError, Parser};

/// How braces are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CssMode {
    /// Rules with blocks; declarations may also appear at the top level, as
    /// in CSS-in-JS templates.
    Stylesheet,
    /// A bare declaration list such as a `style` attribute. Braces are
    /// template interpolations and are skipped whole.
    Inline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CssOptions {
    pub mode: CssMode,
    /// Whether `//` starts a comment (SCSS, Less, CSS-in-JS).
    pub line_comments: bool,
}

impl CssOptions {
    pub const STYLESHEET: Self = Self {
        mode: CssMode::Stylesheet,
        line_comments: false,
    };
    pub const PREPROCESSED: Self = Self {
        mode: CssMode::Stylesheet,
        line_comments: true,
    };
    pub const INLINE: Self = Self {
        mode: CssMode::Inline,
        line_comments: false,
    };
}

#[derive(Debug, Clone, Copy)]
enum Syntax {
    Braces(CssOptions),
    Indented,
}

/// Parser for stylesheets.
#[derive(Debug, Clone, Copy)]
pub struct CssParser {
    name: &'static str,
    extensions: &'static [&'static str],
    syntax: Syntax,
}

impl CssParser {
    /// Plain CSS.
    pub const fn css() -> Self {
        Self {
            name: "css",
            extensions: &["css"],
            syntax: Syntax::Braces(CssOptions::STYLESHEET),
        }
    }

    /// SCSS and Less, which add `//` comments and `#{}` / `@{}` interpolation.
    pub const fn scss() -> Self {
        Self {
            name: "scss",
            extensions: &["scss", "less"],
            syntax: Syntax::Braces(CssOptions::PREPROCESSED),
        }
    }

    /// Indented Sass.
    pub const fn sass() -> Self {
        Self {
            name: "sass",
            extensions: &["sass"],
            syntax: Syntax::Indented,
        }
    }
}

impl Parser for CssParser {
    fn name(&self) -> &str {
        self.name
    }

    fn extensions(&self) -> &[&str] {
        self.extensions
    }

    fn parse(&self, source: &str, sink: &mut dyn EventSink) -> Result<(), ParseError> {
        match self.syntax {
            Syntax::Braces(options) => scan_css(source, 0, options, sink),
            Syntax::Indented => {
                scan_sass(source, 0, sink);
                Ok(())
            }
        }
    }
}

/// Scans a stylesheet region starting at absolute offset `base`.
pub(crate) fn scan_css(
    source: &str,
    base: usize,
    options: CssOptions,
    sink: &mut dyn EventSink,
) -> Result<(), ParseError> {
    if !sink.wants(EventKind::CssDeclaration) {
        return Ok(());
    }
    let bytes = source.as_bytes();
    let err = |message: &str, at: usize| ParseError::syntax(message, base + at);

    let mut i = 0;
    let mut stmt_start = 0;
    let mut blocks: Vec<usize> = Vec::new();
    let mut parens: Vec<usize> = Vec::new();

    while i < bytes.len() {
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = skip_block_comment(bytes, i).ok_or_else(|| err("Unterminated comment", i))?;
                continue;
            }
            b'/' if options.line_comments && parens.is_empty() && bytes.get(i + 1) == Some(&b'/') => {
                i = skip_line(bytes, i);
                continue;
            }
            b'"' | b'\'' => {
                i = skip_string(bytes, i).ok_or_else(|| err("Unterminated string", i))?;
                continue;
            }
            b'$' | b'#' | b'@' if bytes.get(i + 1) == Some(&b'{') => {
                i = skip_braces(bytes, i + 1)
                    .ok_or_else(|| err("Unterminated interpolation", i))?;
                continue;
            }
            b'(' => parens.push(i),
            b')' => {
                if parens.pop().is_none() {
                    return Err(err("Unexpected ')'", i));
                }
            }
            b'{' if parens.is_empty() => {
                if options.mode == CssMode::Inline {
                    i = skip_braces(bytes, i).ok_or_else(|| err("Unclosed '{'", i))?;
                    continue;
                }
                blocks.push(i);
                stmt_start = i + 1;
            }
            b'}' if parens.is_empty() => {
                if blocks.pop().is_none() {
                    return Err(err("Unexpected '}'", i));
                }
                emit_declaration(source, base, stmt_start, i, sink);
                stmt_start = i + 1;
            }
            b';' if parens.is_empty() => {
                emit_declaration(source, base, stmt_start, i, sink);
                stmt_start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }

    if let Some(&open) = parens.last() {
        return Err(err("Unclosed '('", open));
    }
    if let Some(&open) = blocks.last() {
        return Err(err("Unclosed block", open));
    }
    emit_declaration(source, base, stmt_start, bytes.len(), sink);
    Ok(())
}

/// Scans indented Sass, one declaration per line.
pub(crate) fn scan_sass(source: &str, base: usize, sink: &mut dyn EventSink) {
    if !sink.wants(EventKind::CssDeclaration) {
        return;
    }
    let mut offset = 0;
    for line in source.split_inclusive('\n') {
        let start = offset;
        offset += line.len();
        let trimmed = line.trim_start();
        if trimmed.starts_with("//") || trimmed.starts_with("/*") {
            continue;
        }
        let Some(colon) = trimmed.find(':') else {
            continue;
        };
        // `a:hover` is a selector; a property is followed by whitespace.
        if !trimmed[colon + 1..].starts_with([' ', '\t']) {
            continue;
        }
        let end = start + line.trim_end().len();
        emit_declaration(source, base, start, end, sink);
    }
}

fn emit_declaration(
    source: &str,
    base: usize,
    start: usize,
    end: usize,
    sink: &mut dyn EventSink,
) {
    let stmt = &source[start..end];
    let lead = leading_trivia(stmt);
    let text = stmt[lead..].trim_end();
    if text.is_empty() || text.starts_with('@') {
        return;
    }
    let Some(colon) = text.find(':') else {
        return;
    };
    let property = text[..colon].trim_end();
    if !is_property_name(property) {
        return;
    }

    let after = &text[colon + 1..];
    let value_start = colon + 1 + (after.len() - after.trim_start().len());
    let mut value = after.trim();
    let mut important = false;
    if let Some(stripped) = strip_important(value) {
        value = stripped;
        important = true;
    }
    if value.is_empty() {
        return;
    }

    let origin = base + start + lead;
    sink.emit(SyntaxEvent::CssDeclaration(CssDeclaration {
        property,
        value,
        span: Span::from_range(origin, origin + text.len()),
        value_span: Span::from_range(origin + value_start, origin + value_start + value.len()),
        important,
    }));
}

/// Length of leading whitespace and comments.
fn leading_trivia(stmt: &str) -> usize {
    let mut pos = 0;
    loop {
        let rest = &stmt[pos..];
        let trimmed = rest.trim_start();
        pos += rest.len() - trimmed.len();
        if let Some(body) = trimmed.strip_prefix("/*") {
            match body.find("*/") {
                Some(close) => pos += 2 + close + 2,
                None => return stmt.len(),
            }
        } else if trimmed.starts_with("//") {
            match trimmed.find('\n') {
                Some(newline) => pos += newline + 1,
                None => return stmt.len(),
            }
        } else {
            return pos;
        }
    }
}

/// Returns true for `color`, `-webkit-box-shadow` and `--brand-primary`.
pub(crate) fn is_property_name(name: &str) -> bool {
    if let Some(custom) = name.strip_prefix("--") {
        return !custom.is_empty()
            && custom
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b >= 0x80);
    }
    let body = name.strip_prefix('-').unwrap_or(name);
    let mut bytes = body.bytes();
    matches!(bytes.next(), Some(b) if b.is_ascii_alphabetic())
        && bytes.all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

fn strip_important(value: &str) -> Option<&str> {
    const IMPORTANT: &str = "important";
    let split = value.len().checked_sub(IMPORTANT.len())?;
    if !value.is_char_boundary(split) || !value[split..].eq_ignore_ascii_case(IMPORTANT) {
        return None;
    }
    value[..split]
        .trim_end()
        .strip_suffix('!')
        .map(str::trim_end)
}

fn skip_block_comment(bytes: &[u8], start: usize) -> Option<usize> {
    bytes[start + 2..]
        .windows(2)
        .position(|w| w == b"*/")
        .map(|p| start + 2 + p + 2)
}

fn skip_line(bytes: &[u8], start: usize) -> usize {
    bytes[start..]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(bytes.len(), |p| start + p)
}

/// Skips a quoted string starting at `start`, returning the offset after the
/// closing quote. Strings may not span lines unescaped.
pub(crate) fn skip_string(bytes: &[u8], start: usize) -> Option<usize> {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' => return None,
            b if b == quote => return Some(i + 1),
            _ => i += 1,
        }
    }
    None
}

/// Skips a balanced `{...}` starting at `open`, returning the offset after
/// the matching `}`. Quoted strings inside are skipped.
pub(crate) fn skip_braces(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = open;
    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' | b'`' => {
                let quote = bytes[i];
                i += 1;
                while i < bytes.len() && bytes[i] != quote {
                    if bytes[i] == b'\\' {
                        i += 1;
                    }
                    i += 1;
                }
            }
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}
