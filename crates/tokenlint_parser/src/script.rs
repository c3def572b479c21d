//! Script strategy: JavaScript, TypeScript and JSX.
//!
//! This is a token-level scanner, not a full parser. It tracks just enough
//! state to tell strings, templates, regular expressions, comments and JSX
//! apart, and to find the `{}` boundaries of embedded expressions.

use tokenlint_ast::{EventKind, EventSink, JsxAttribute, Span, StringLiteral, SyntaxEvent};

use crate::css::{CssOptions, scan_css, skip_braces};
use crate::{ParseError, Parser};

/// Tags whose template literal holds CSS.
const CSS_TAGS: &[&str] = &["css", "createGlobalStyle", "keyframes", "injectGlobal", "styled"];

/// Keywords after which an expression (and so a regex or JSX) may start.
const EXPRESSION_KEYWORDS: &[&str] = &[
    "return", "typeof", "case", "do", "else", "in", "of", "new", "delete", "void", "throw",
    "yield", "await", "instanceof",
];

/// Parser for script documents.
#[derive(Debug, Clone, Copy)]
pub struct ScriptParser {
    name: &'static str,
    extensions: &'static [&'static str],
    jsx: bool,
}

impl ScriptParser {
    /// JavaScript and TSX, with JSX enabled.
    pub const fn javascript() -> Self {
        Self {
            name: "script",
            extensions: &["js", "jsx", "mjs", "cjs", "tsx"],
            jsx: true,
        }
    }

    /// TypeScript, where `<` starts type arguments rather than JSX.
    pub const fn typescript() -> Self {
        Self {
            name: "typescript",
            extensions: &["ts", "mts", "cts"],
            jsx: false,
        }
    }
}

impl Parser for ScriptParser {
    fn name(&self) -> &str {
        self.name
    }

    fn extensions(&self) -> &[&str] {
        self.extensions
    }

    fn parse(&self, source: &str, sink: &mut dyn EventSink) -> Result<(), ParseError> {
        scan_script(source, 0, self.jsx, sink)
    }
}

/// Scans a script region starting at absolute offset `base`.
pub(crate) fn scan_script(
    source: &str,
    base: usize,
    jsx: bool,
    sink: &mut dyn EventSink,
) -> Result<(), ParseError> {
    let mut scanner = Scanner {
        src: source,
        bytes: source.as_bytes(),
        pos: 0,
        base,
        jsx,
        last: None,
        sink,
    };
    scanner.scan(false)
}

struct Scanner<'s, 'k> {
    src: &'s str,
    bytes: &'s [u8],
    pos: usize,
    base: usize,
    jsx: bool,
    /// Offset of the last byte of the previous significant token.
    last: Option<usize>,
    sink: &'k mut dyn EventSink,
}

impl<'s> Scanner<'s, '_> {
    fn error(&self, message: &str, at: usize) -> ParseError {
        ParseError::syntax(message, self.base + at)
    }

    fn peek_at(&self, at: usize) -> Option<u8> {
        self.bytes.get(at).copied()
    }

    /// Scans tokens. With `until_close`, stops at the `}` closing the
    /// enclosing expression, leaving `pos` on it.
    fn scan(&mut self, until_close: bool) -> Result<(), ParseError> {
        let opened = self.pos.saturating_sub(1);
        let mut depth = 0usize;
        while let Some(b) = self.peek_at(self.pos) {
            let start = self.pos;
            match b {
                b if b.is_ascii_whitespace() => {
                    self.pos += 1;
                    continue;
                }
                b'/' if self.peek_at(start + 1) == Some(b'/') => {
                    self.skip_line_comment();
                    continue;
                }
                b'/' if self.peek_at(start + 1) == Some(b'*') => {
                    self.skip_block_comment()?;
                    continue;
                }
                b'/' if self.expression_allowed() => self.regex(),
                b'\'' | b'"' => self.string(b)?,
                b'`' => self.template()?,
                b'<' if self.jsx && self.expression_allowed() && self.starts_jsx() => {
                    self.jsx_element()?;
                }
                b'{' => {
                    depth += 1;
                    self.pos += 1;
                }
                b'}' => {
                    if depth == 0 {
                        if until_close {
                            return Ok(());
                        }
                        return Err(self.error("Unexpected '}'", start));
                    }
                    depth -= 1;
                    self.pos += 1;
                }
                b if is_ident_byte(b) => {
                    while self.peek_at(self.pos).is_some_and(is_ident_byte) {
                        self.pos += 1;
                    }
                }
                _ => self.pos += 1,
            }
            self.last = Some(self.pos - 1);
        }
        if until_close {
            return Err(self.error("Unclosed '{'", opened));
        }
        if depth > 0 {
            return Err(self.error("Unclosed '{'", self.bytes.len()));
        }
        Ok(())
    }

    /// Returns true if the previous token lets an expression start here.
    fn expression_allowed(&self) -> bool {
        let Some(last) = self.last else {
            return true;
        };
        let b = self.bytes[last];
        if is_ident_byte(b) {
            let start = self.src[..=last]
                .bytes()
                .rposition(|c| !is_ident_byte(c))
                .map_or(0, |p| p + 1);
            return EXPRESSION_KEYWORDS.contains(&&self.src[start..=last]);
        }
        !matches!(b, b')' | b']' | b'"' | b'\'' | b'`')
    }

    fn starts_jsx(&self) -> bool {
        self.peek_at(self.pos + 1)
            .is_some_and(|b| b.is_ascii_alphabetic() || b == b'>')
    }

    fn skip_line_comment(&mut self) {
        self.pos = self.bytes[self.pos..]
            .iter()
            .position(|&b| b == b'\n')
            .map_or(self.bytes.len(), |p| self.pos + p);
    }

    fn skip_block_comment(&mut self) -> Result<(), ParseError> {
        let start = self.pos;
        let close = self.bytes[start + 2..]
            .windows(2)
            .position(|w| w == b"*/")
            .ok_or_else(|| self.error("Unterminated comment", start))?;
        self.pos = start + 2 + close + 2;
        Ok(())
    }

    fn regex(&mut self) {
        let start = self.pos;
        let mut i = start + 1;
        let mut in_class = false;
        while let Some(b) = self.peek_at(i) {
            match b {
                b'\\' => i += 1,
                b'[' => in_class = true,
                b']' => in_class = false,
                b'/' if !in_class => {
                    i += 1;
                    while self.peek_at(i).is_some_and(|f| f.is_ascii_alphabetic()) {
                        i += 1;
                    }
                    self.pos = i;
                    return;
                }
                // Not a regex after all; read the slash as division.
                b'\n' => break,
                _ => {}
            }
            i += 1;
        }
        self.pos = start + 1;
    }

    fn string(&mut self, quote: u8) -> Result<(), ParseError> {
        let start = self.pos;
        let mut i = start + 1;
        loop {
            match self.peek_at(i) {
                None | Some(b'\n') => return Err(self.error("Unterminated string literal", start)),
                Some(b'\\') => i += 2,
                Some(b) if b == quote => break,
                Some(_) => i += 1,
            }
        }
        self.emit_literal(start + 1, i, char::from(quote));
        self.pos = i + 1;
        Ok(())
    }

    fn emit_literal(&mut self, start: usize, end: usize, quote: char) {
        if self.sink.wants(EventKind::StringLiteral) {
            let value = &self.src[start..end];
            self.sink.emit(SyntaxEvent::StringLiteral(StringLiteral {
                value,
                span: Span::from_range(self.base + start, self.base + end),
                quote,
            }));
        }
    }

    fn template(&mut self) -> Result<(), ParseError> {
        let tick = self.pos;
        let is_css = self.css_tag_before(tick);
        let content_start = tick + 1;
        let mut i = content_start;
        let mut interpolated = false;
        loop {
            match self.peek_at(i) {
                None => return Err(self.error("Unterminated template literal", tick)),
                Some(b'\\') => i += 2,
                Some(b'`') => break,
                Some(b'$') if self.peek_at(i + 1) == Some(b'{') => {
                    interpolated = true;
                    self.pos = i + 2;
                    self.last = Some(i + 1);
                    self.scan(true)?;
                    i = self.pos + 1;
                }
                Some(_) => i += 1,
            }
        }
        let content = &self.src[content_start..i];
        if is_css {
            scan_css(
                content,
                self.base + content_start,
                CssOptions::PREPROCESSED,
                &mut *self.sink,
            )?;
        } else if !interpolated {
            self.emit_literal(content_start, i, '`');
        }
        self.pos = i + 1;
        Ok(())
    }

    /// Returns true if the template at `tick` is tagged with a CSS tag such
    /// as `css`, `styled.div` or `styled(Button).attrs(...)`.
    fn css_tag_before(&self, tick: usize) -> bool {
        let mut head = self.src[..tick].trim_end();
        loop {
            while head.ends_with(')') {
                match matching_open_paren(head) {
                    Some(open) => head = head[..open].trim_end(),
                    None => return false,
                }
            }
            let start = head
                .char_indices()
                .rev()
                .find(|&(_, c)| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '.')))
                .map_or(0, |(i, c)| i + c.len_utf8());
            let path = &head[start..];
            // A member of a call result, as in `styled(Button).attrs(...)`.
            if path.starts_with('.') && head[..start].ends_with(')') {
                head = &head[..start];
                continue;
            }
            let root = path.split('.').next().unwrap_or_default();
            return CSS_TAGS.contains(&root) || path.ends_with(".css");
        }
    }

    fn jsx_element(&mut self) -> Result<(), ParseError> {
        let open = self.pos;
        self.pos += 1;
        while self.peek_at(self.pos).is_some_and(is_jsx_name_byte) {
            self.pos += 1;
        }
        loop {
            self.skip_whitespace();
            match self.peek_at(self.pos) {
                None => return Err(self.error("Unterminated JSX tag", open)),
                Some(b'/') if self.peek_at(self.pos + 1) == Some(b'>') => {
                    self.pos += 2;
                    return Ok(());
                }
                Some(b'>') => {
                    self.pos += 1;
                    break;
                }
                Some(b'{') => {
                    self.pos += 1;
                    self.last = Some(self.pos - 1);
                    self.scan(true)?;
                    self.pos += 1;
                }
                Some(b) if is_jsx_name_byte(b) => self.jsx_attribute()?,
                Some(_) => {
                    // Type arguments such as `<T,>` in TSX; not an element.
                    self.pos = open + 1;
                    return Ok(());
                }
            }
        }
        self.jsx_children(open)
    }

    fn jsx_attribute(&mut self) -> Result<(), ParseError> {
        let src = self.src;
        let start = self.pos;
        while self.peek_at(self.pos).is_some_and(is_jsx_name_byte) {
            self.pos += 1;
        }
        let name = &src[start..self.pos];
        let name_end = self.pos;
        self.skip_whitespace();
        if self.peek_at(self.pos) != Some(b'=') {
            self.pos = name_end;
            self.emit_attribute(name, start, name_end, None);
            return Ok(());
        }
        self.pos += 1;
        self.skip_whitespace();

        match self.peek_at(self.pos) {
            Some(quote @ (b'"' | b'\'')) => {
                let value_start = self.pos + 1;
                let close = self.bytes[value_start..]
                    .iter()
                    .position(|&b| b == quote)
                    .map(|p| value_start + p)
                    .ok_or_else(|| self.error("Unterminated attribute value", self.pos))?;
                self.pos = close + 1;
                self.emit_attribute(name, start, self.pos, Some((value_start, close)));
                if name == "style" {
                    scan_css(
                        &self.src[value_start..close],
                        self.base + value_start,
                        CssOptions::INLINE,
                        &mut *self.sink,
                    )?;
                }
            }
            Some(b'{') => {
                let brace = self.pos;
                let end = skip_braces(self.bytes, brace)
                    .ok_or_else(|| self.error("Unclosed '{'", brace))?;
                let (value_start, value_end) = trim_range(self.src, brace + 1, end - 1);
                self.emit_attribute(name, start, end, Some((value_start, value_end)));
                self.pos = brace + 1;
                self.last = Some(brace);
                self.scan(true)?;
                self.pos += 1;
            }
            Some(b'<') => {
                self.jsx_element()?;
                self.emit_attribute(name, start, self.pos, None);
            }
            _ => return Err(self.error("Expected attribute value", self.pos)),
        }
        Ok(())
    }

    fn emit_attribute(
        &mut self,
        name: &'s str,
        start: usize,
        end: usize,
        value: Option<(usize, usize)>,
    ) {
        if !self.sink.wants(EventKind::JsxAttribute) {
            return;
        }
        let (src, base) = (self.src, self.base);
        self.sink.emit(SyntaxEvent::JsxAttribute(JsxAttribute {
            name,
            value: value.map(|(s, e)| &src[s..e]),
            span: Span::from_range(base + start, base + end),
            value_span: value.map(|(s, e)| Span::from_range(base + s, base + e)),
        }));
    }

    fn jsx_children(&mut self, open: usize) -> Result<(), ParseError> {
        loop {
            match self.peek_at(self.pos) {
                None => return Err(self.error("Unclosed JSX element", open)),
                Some(b'<') if self.peek_at(self.pos + 1) == Some(b'/') => {
                    let close = self.bytes[self.pos..]
                        .iter()
                        .position(|&b| b == b'>')
                        .ok_or_else(|| self.error("Unterminated closing tag", self.pos))?;
                    self.pos += close + 1;
                    return Ok(());
                }
                Some(b'<') if self.starts_jsx() => self.jsx_element()?,
                Some(b'{') => {
                    self.pos += 1;
                    self.last = Some(self.pos - 1);
                    self.scan(true)?;
                    self.pos += 1;
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_at(self.pos).is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b >= 0x80
}

fn is_jsx_name_byte(b: u8) -> bool {
    is_ident_byte(b) || matches!(b, b'-' | b':' | b'.')
}

fn matching_open_paren(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, b) in text.bytes().enumerate().rev() {
        match b {
            b')' => depth += 1,
            b'(' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn trim_range(src: &str, start: usize, end: usize) -> (usize, usize) {
    let inner = &src[start..end];
    let lead = inner.len() - inner.trim_start().len();
    (start + lead, start + lead + inner.trim().len())
}
