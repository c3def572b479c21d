//! Syntax events emitted by parsing strategies.
//!
//! Every construct a rule can listen to is a variant of [`SyntaxEvent`].
//! The set is closed: rules declare which [`EventKind`]s they handle and
//! the registry checks that declaration up front.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Span;

/// The kinds of syntax events a rule may listen to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    /// A `property: value` declaration in a stylesheet, inline style, or
    /// CSS-in-JS template.
    CssDeclaration,
    /// A quoted string literal in a script.
    StringLiteral,
    /// An attribute on a JSX element.
    JsxAttribute,
}

impl EventKind {
    /// All event kinds, in declaration order.
    pub const ALL: [EventKind; 3] = [
        EventKind::CssDeclaration,
        EventKind::StringLiteral,
        EventKind::JsxAttribute,
    ];

    /// Returns the event name as written in rule metadata.
    pub const fn as_str(&self) -> &'static str {
        match self {
            EventKind::CssDeclaration => "cssDeclaration",
            EventKind::StringLiteral => "stringLiteral",
            EventKind::JsxAttribute => "jsxAttribute",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stylesheet declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CssDeclaration<'s> {
    /// Property name, trimmed (e.g. `color`, `--brand`).
    pub property: &'s str,
    /// Raw value text, trimmed, without a trailing `!important`.
    pub value: &'s str,
    /// Span of the whole declaration, starting at the property name.
    pub span: Span,
    /// Span of `value` in the document.
    pub value_span: Span,
    /// Whether the declaration carried `!important`.
    pub important: bool,
}

/// A string literal in script code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringLiteral<'s> {
    /// The literal's content, without quotes and unescaped only as far as
    /// the source allows slicing (escapes are left as written).
    pub value: &'s str,
    /// Span of the content, excluding quotes.
    pub span: Span,
    /// The quote character: `'`, `"` or `` ` ``.
    pub quote: char,
}

/// An attribute on a JSX element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsxAttribute<'s> {
    /// Attribute name (e.g. `style`, `className`).
    pub name: &'s str,
    /// Attribute value: the quoted content or the expression inside `{}`.
    /// `None` for boolean attributes.
    pub value: Option<&'s str>,
    /// Span of the attribute from its name to the end of its value.
    pub span: Span,
    /// Span of `value`.
    pub value_span: Option<Span>,
}

/// A syntax event passed to rule listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxEvent<'s> {
    CssDeclaration(CssDeclaration<'s>),
    StringLiteral(StringLiteral<'s>),
    JsxAttribute(JsxAttribute<'s>),
}

impl SyntaxEvent<'_> {
    /// Returns the kind of this event.
    pub const fn kind(&self) -> EventKind {
        match self {
            SyntaxEvent::CssDeclaration(_) => EventKind::CssDeclaration,
            SyntaxEvent::StringLiteral(_) => EventKind::StringLiteral,
            SyntaxEvent::JsxAttribute(_) => EventKind::JsxAttribute,
        }
    }

    /// Returns the span the event covers.
    pub const fn span(&self) -> Span {
        match self {
            SyntaxEvent::CssDeclaration(decl) => decl.span,
            SyntaxEvent::StringLiteral(lit) => lit.span,
            SyntaxEvent::JsxAttribute(attr) => attr.span,
        }
    }
}

/// Receiver of syntax events.
///
/// Parsing strategies call [`EventSink::wants`] to skip work nobody listens
/// to, and [`EventSink::emit`] for every matching construct.
pub trait EventSink {
    /// Returns true if any listener handles `kind`.
    fn wants(&self, kind: EventKind) -> bool;

    /// Delivers an event.
    fn emit(&mut self, event: SyntaxEvent<'_>);
}

/// An [`EventSink`] that records owned copies of events.
///
/// Handy for inspecting what a strategy produces.
#[derive(Debug, Default)]
pub struct RecordingSink {
    /// Recorded events as `(kind, span, text)`, where `text` is the
    /// declaration `property: value`, the literal content, or the
    /// attribute `name=value`.
    pub events: Vec<(EventKind, Span, String)>,
}

impl EventSink for RecordingSink {
    fn wants(&self, _kind: EventKind) -> bool {
        true
    }

    fn emit(&mut self, event: SyntaxEvent<'_>) {
        let text = match &event {
            SyntaxEvent::CssDeclaration(decl) => format!("{}: {}", decl.property, decl.value),
            SyntaxEvent::StringLiteral(lit) => lit.value.to_string(),
            SyntaxEvent::JsxAttribute(attr) => match attr.value {
                Some(value) => format!("{}={}", attr.name, value),
                None => attr.name.to_string(),
            },
        };
        self.events.push((event.kind(), event.span(), text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_names() {
        assert_eq!(EventKind::CssDeclaration.as_str(), "cssDeclaration");
        assert_eq!(EventKind::JsxAttribute.to_string(), "jsxAttribute");
        let json = serde_json::to_string(&EventKind::StringLiteral).unwrap();
        assert_eq!(json, "\"stringLiteral\"");
    }

    #[test]
    fn test_syntax_event_kind_and_span() {
        let event = SyntaxEvent::StringLiteral(StringLiteral {
            value: "red",
            span: Span::new(1, 4),
            quote: '"',
        });
        assert_eq!(event.kind(), EventKind::StringLiteral);
        assert_eq!(event.span(), Span::new(1, 4));
    }

    #[test]
    fn test_recording_sink() {
        let mut sink = RecordingSink::default();
        sink.emit(SyntaxEvent::CssDeclaration(CssDeclaration {
            property: "color",
            value: "red",
            span: Span::new(2, 11),
            value_span: Span::new(8, 11),
            important: false,
        }));
        assert_eq!(
            sink.events,
            vec![(
                EventKind::CssDeclaration,
                Span::new(2, 11),
                "color: red".to_string()
            )]
        );
    }
}
