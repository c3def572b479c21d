//! Component strategies: Vue and Svelte single-file components.
//!
//! Both formats are HTML-like markup with embedded `<script>` and `<style>`
//! blocks. Embedded regions are handed to the script and stylesheet scanners
//! with their absolute offsets, so every span points into the whole file.

use tokenlint_ast::{CssDeclaration, EventKind, EventSink, JsxAttribute, Span, SyntaxEvent};
use tracing::debug;

use crate::css::{CssOptions, scan_css, scan_sass, skip_braces};
use crate::script::scan_script;
use crate::{ParseError, Parser};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dialect {
    Vue,
    Svelte,
}

/// Parser for Vue single-file components.
#[derive(Debug, Clone, Copy, Default)]
pub struct VueParser;

impl Parser for VueParser {
    fn name(&self) -> &str {
        "vue"
    }

    fn extensions(&self) -> &[&str] {
        &["vue"]
    }

    fn parse(&self, source: &str, sink: &mut dyn EventSink) -> Result<(), ParseError> {
        scan_markup(source, Dialect::Vue, sink)
    }
}

/// Parser for Svelte components.
#[derive(Debug, Clone, Copy, Default)]
pub struct SvelteParser;

impl Parser for SvelteParser {
    fn name(&self) -> &str {
        "svelte"
    }

    fn extensions(&self) -> &[&str] {
        &["svelte"]
    }

    fn parse(&self, source: &str, sink: &mut dyn EventSink) -> Result<(), ParseError> {
        scan_markup(source, Dialect::Svelte, sink)
    }
}

fn scan_markup(source: &str, dialect: Dialect, sink: &mut dyn EventSink) -> Result<(), ParseError> {
    let bytes = source.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'<' if bytes[i..].starts_with(b"<!--") => {
                i = find(bytes, i + 4, b"-->")
                    .map(|p| p + 3)
                    .ok_or_else(|| ParseError::syntax("Unterminated comment", i))?;
            }
            b'<' if bytes.get(i + 1).is_some_and(u8::is_ascii_alphabetic) => {
                i = element(source, i, dialect, sink)?;
            }
            // `{#if cond}`, `{expr}` and friends.
            b'{' if dialect == Dialect::Svelte => {
                i = expression(source, i, sink)?;
            }
            b'{' if dialect == Dialect::Vue && bytes.get(i + 1) == Some(&b'{') => {
                let close = find(bytes, i + 2, b"}}")
                    .ok_or_else(|| ParseError::syntax("Unclosed '{{'", i))?;
                scan_script(&source[i + 2..close], i + 2, false, sink)?;
                i = close + 2;
            }
            _ => i += 1,
        }
    }
    Ok(())
}

/// Scans a Svelte `{...}` expression at `open`, returning the offset after it.
fn expression(source: &str, open: usize, sink: &mut dyn EventSink) -> Result<usize, ParseError> {
    let end = skip_braces(source.as_bytes(), open)
        .ok_or_else(|| ParseError::syntax("Unclosed '{'", open))?;
    scan_script(&source[open + 1..end - 1], open + 1, false, sink)?;
    Ok(end)
}

/// Scans the element starting at `open`, returning the offset after its
/// opening tag, or after the closing tag for `<script>` and `<style>`.
fn element(
    source: &str,
    open: usize,
    dialect: Dialect,
    sink: &mut dyn EventSink,
) -> Result<usize, ParseError> {
    let bytes = source.as_bytes();
    let mut i = open + 1;
    while bytes
        .get(i)
        .is_some_and(|&b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b':' | b'.'))
    {
        i += 1;
    }
    let tag = &source[open + 1..i];
    let mut lang = None;

    loop {
        while bytes.get(i).is_some_and(u8::is_ascii_whitespace) {
            i += 1;
        }
        match bytes.get(i) {
            None => return Err(ParseError::syntax("Unterminated tag", open)),
            Some(b'>') => {
                i += 1;
                break;
            }
            Some(b'/') if bytes.get(i + 1) == Some(&b'>') => return Ok(i + 2),
            Some(b'{') if dialect == Dialect::Svelte => i = expression(source, i, sink)?,
            Some(_) => {
                let attr = Attribute::read(source, i)?;
                i = attr.end;
                if attr.name(source) == "lang" {
                    lang = attr.value(source);
                }
                attr.emit(source, dialect, sink)?;
            }
        }
    }

    let is_script = tag.eq_ignore_ascii_case("script");
    if !is_script && !tag.eq_ignore_ascii_case("style") {
        return Ok(i);
    }
    let close = find_closing_tag(bytes, i, tag)
        .ok_or_else(|| ParseError::syntax(format!("Unclosed <{tag}>"), open))?;
    let content = &source[i..close];
    if is_script {
        scan_script(content, i, matches!(lang, Some("jsx" | "tsx")), sink)?;
    } else {
        match lang.unwrap_or("css") {
            "css" | "postcss" => scan_css(content, i, CssOptions::STYLESHEET, sink)?,
            "scss" | "less" => scan_css(content, i, CssOptions::PREPROCESSED, sink)?,
            "sass" => scan_sass(content, i, sink),
            other => debug!("Skipping <style lang=\"{other}\">"),
        }
    }
    Ok(bytes[close..]
        .iter()
        .position(|&b| b == b'>')
        .map_or(bytes.len(), |p| close + p + 1))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueKind {
    Quoted,
    Braced,
    Unquoted,
}

/// One attribute of an opening tag, as byte ranges into the source.
#[derive(Debug, Clone, Copy)]
struct Attribute {
    start: usize,
    name_end: usize,
    value: Option<(usize, usize, ValueKind)>,
    end: usize,
}

impl Attribute {
    fn read(source: &str, start: usize) -> Result<Self, ParseError> {
        let bytes = source.as_bytes();
        let mut i = start;
        while bytes.get(i).is_some_and(|&b| !is_attribute_name_end(b)) {
            i += 1;
        }
        let name_end = i;
        let bare = Self {
            start,
            name_end,
            value: None,
            end: name_end.max(start + 1),
        };
        if name_end == start {
            return Ok(bare);
        }

        while bytes.get(i).is_some_and(u8::is_ascii_whitespace) {
            i += 1;
        }
        if bytes.get(i) != Some(&b'=') {
            return Ok(bare);
        }
        i += 1;
        while bytes.get(i).is_some_and(u8::is_ascii_whitespace) {
            i += 1;
        }

        let (value, end) = match bytes.get(i) {
            Some(&quote @ (b'"' | b'\'')) => {
                let close = find(bytes, i + 1, &[quote])
                    .ok_or_else(|| ParseError::syntax("Unterminated attribute value", i))?;
                ((i + 1, close, ValueKind::Quoted), close + 1)
            }
            Some(b'{') => {
                let end = skip_braces(bytes, i)
                    .ok_or_else(|| ParseError::syntax("Unclosed '{'", i))?;
                ((i + 1, end - 1, ValueKind::Braced), end)
            }
            Some(_) => {
                let value_start = i;
                while bytes
                    .get(i)
                    .is_some_and(|&b| !b.is_ascii_whitespace() && b != b'>')
                {
                    i += 1;
                }
                ((value_start, i, ValueKind::Unquoted), i)
            }
            None => return Err(ParseError::syntax("Expected attribute value", i)),
        };
        Ok(Self {
            start,
            name_end,
            value: Some(value),
            end,
        })
    }

    fn name<'s>(&self, source: &'s str) -> &'s str {
        &source[self.start..self.name_end]
    }

    fn value<'s>(&self, source: &'s str) -> Option<&'s str> {
        self.value.map(|(s, e, _)| &source[s..e])
    }

    fn emit(
        &self,
        source: &str,
        dialect: Dialect,
        sink: &mut dyn EventSink,
    ) -> Result<(), ParseError> {
        let raw = self.name(source);
        if raw.is_empty() {
            return Ok(());
        }
        let span = Span::from_range(self.start, self.end);

        if dialect == Dialect::Svelte
            && let Some(directive) = raw.strip_prefix("style:")
        {
            return self.emit_style_directive(source, directive, span, sink);
        }

        let name = match dialect {
            Dialect::Vue => raw
                .strip_prefix("v-bind:")
                .or_else(|| raw.strip_prefix(':'))
                .unwrap_or(raw),
            Dialect::Svelte => raw,
        };
        let value = self.value.map(|(s, e, kind)| {
            let (s, e) = if kind == ValueKind::Braced {
                trim_range(source, s, e)
            } else {
                (s, e)
            };
            (s, e, kind)
        });

        if sink.wants(EventKind::JsxAttribute) {
            sink.emit(SyntaxEvent::JsxAttribute(JsxAttribute {
                name,
                value: value.map(|(s, e, _)| &source[s..e]),
                span,
                value_span: value.map(|(s, e, _)| Span::from_range(s, e)),
            }));
        }

        let Some((start, end, kind)) = value else {
            return Ok(());
        };
        let content = &source[start..end];
        let bound = dialect == Dialect::Vue && (raw.starts_with([':', '@']) || raw.starts_with("v-"));
        if kind == ValueKind::Braced || bound {
            scan_script(content, start, false, sink)?;
        } else if kind == ValueKind::Quoted && name.eq_ignore_ascii_case("style") {
            scan_css(content, start, CssOptions::INLINE, sink)?;
        }
        Ok(())
    }

    /// Svelte `style:color="red"` and `style:color|important="red"`.
    fn emit_style_directive(
        &self,
        source: &str,
        directive: &str,
        span: Span,
        sink: &mut dyn EventSink,
    ) -> Result<(), ParseError> {
        let Some((start, end, kind)) = self.value else {
            return Ok(());
        };
        if kind == ValueKind::Braced {
            return scan_script(&source[start..end], start, false, sink);
        }
        let (property, important) = match directive.strip_suffix("|important") {
            Some(property) => (property, true),
            None => (directive, false),
        };
        let (start, end) = trim_range(source, start, end);
        if start < end && sink.wants(EventKind::CssDeclaration) {
            sink.emit(SyntaxEvent::CssDeclaration(CssDeclaration {
                property,
                value: &source[start..end],
                span,
                value_span: Span::from_range(start, end),
                important,
            }));
        }
        Ok(())
    }
}

fn is_attribute_name_end(b: u8) -> bool {
    b.is_ascii_whitespace() || matches!(b, b'=' | b'>' | b'/' | b'"' | b'\'' | b'{')
}

fn find(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    bytes
        .get(from..)?
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| from + p)
}

/// Finds `</tag` at or after `from`, ignoring ASCII case.
fn find_closing_tag(bytes: &[u8], from: usize, tag: &str) -> Option<usize> {
    let needle = format!("</{tag}");
    bytes
        .get(from..)?
        .windows(needle.len())
        .position(|w| w.eq_ignore_ascii_case(needle.as_bytes()))
        .map(|p| from + p)
}

fn trim_range(source: &str, start: usize, end: usize) -> (usize, usize) {
    let inner = &source[start..end];
    let lead = inner.len() - inner.trim_start().len();
    (start + lead, start + lead + inner.trim().len())
}
