//! Lint messages and results.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokenlint_ast::{Position, Span};

/// Severity level for messages.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Error - fails the run.
    #[default]
    Error,
    /// Warning - reported, but does not fail the run.
    Warn,
}

impl Severity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warn => "warn",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message reported by a rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LintMessage {
    /// The rule that reported this message.
    pub rule_id: String,

    /// Human-readable message.
    pub message: String,

    pub severity: Severity,

    /// Line number (1-indexed).
    pub line: u32,

    /// Column number (1-indexed).
    pub column: u32,

    /// Optional fix for this message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix: Option<Fix>,

    /// Rule-specific data, such as the offending value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl LintMessage {
    /// Creates an error-severity message at `position`.
    pub fn new(rule_id: impl Into<String>, message: impl Into<String>, position: Position) -> Self {
        Self {
            rule_id: rule_id.into(),
            message: message.into(),
            severity: Severity::Error,
            line: position.line,
            column: position.column,
            fix: None,
            metadata: None,
        }
    }

    /// Sets the severity level.
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Sets an auto-fix.
    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fix = Some(fix);
        self
    }

    /// Attaches rule-specific data.
    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Returns the message position.
    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }
}

/// A byte-range replacement in a document's text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fix {
    /// `[start, end)` byte offsets to replace.
    pub range: [u32; 2],

    /// The replacement text.
    pub text: String,
}

impl Fix {
    /// Creates a fix that replaces `span`.
    pub fn new(span: Span, text: impl Into<String>) -> Self {
        Self {
            range: [span.start, span.end],
            text: text.into(),
        }
    }

    /// Creates a fix that inserts text at an offset.
    pub fn insert(offset: u32, text: impl Into<String>) -> Self {
        Self::new(Span::new(offset, offset), text)
    }

    /// Creates a fix that deletes a span.
    pub fn delete(span: Span) -> Self {
        Self::new(span, String::new())
    }

    /// Returns the replaced range as a span.
    pub fn span(&self) -> Span {
        Span::new(self.range[0], self.range[1])
    }
}

/// All messages for one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LintResult {
    /// The document identifier; the absolute path for files.
    #[serde(alias = "filePath")]
    pub document_id: String,

    /// Messages in report order.
    pub messages: Vec<LintMessage>,
}

impl LintResult {
    pub fn new(document_id: impl Into<String>, messages: Vec<LintMessage>) -> Self {
        Self {
            document_id: document_id.into(),
            messages,
        }
    }

    /// Number of error-severity messages.
    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    /// Number of warn-severity messages.
    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warn)
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Number of messages carrying a fix.
    pub fn fixable_count(&self) -> usize {
        self.messages.iter().filter(|m| m.fix.is_some()).count()
    }

    fn count(&self, severity: Severity) -> usize {
        self.messages
            .iter()
            .filter(|m| m.severity == severity)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_message_builder_chain() {
        let msg = LintMessage::new("design-token/colors", "Unknown color", Position::new(3, 7))
            .with_severity(Severity::Warn)
            .with_fix(Fix::new(Span::new(10, 14), "var(--brand)"))
            .with_metadata(json!({ "value": "#fff" }));

        assert_eq!(msg.severity, Severity::Warn);
        assert_eq!(msg.position(), Position::new(3, 7));
        assert_eq!(msg.fix.as_ref().unwrap().span(), Span::new(10, 14));
    }

    #[test]
    fn test_fix_insert_and_delete() {
        assert_eq!(Fix::insert(4, "x").range, [4, 4]);
        let fix = Fix::delete(Span::new(5, 15));
        assert_eq!(fix.range, [5, 15]);
        assert!(fix.text.is_empty());
    }

    #[test]
    fn test_message_serialization_shape() {
        let msg = LintMessage::new("rule", "message", Position::new(1, 3))
            .with_fix(Fix::new(Span::new(0, 3), "good"));
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({
                "ruleId": "rule",
                "message": "message",
                "severity": "error",
                "line": 1,
                "column": 3,
                "fix": { "range": [0, 3], "text": "good" }
            })
        );
    }

    #[test]
    fn test_result_accepts_file_path_alias() {
        let result: LintResult = serde_json::from_value(json!({
            "filePath": "/a.css",
            "messages": []
        }))
        .unwrap();
        assert_eq!(result.document_id, "/a.css");
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({ "documentId": "/a.css", "messages": [] })
        );
    }

    #[test]
    fn test_result_counts() {
        let result = LintResult::new(
            "/a.css",
            vec![
                LintMessage::new("a", "m", Position::default()),
                LintMessage::new("b", "m", Position::default()).with_severity(Severity::Warn),
                LintMessage::new("c", "m", Position::default())
                    .with_fix(Fix::insert(0, "x")),
            ],
        );
        assert_eq!(result.error_count(), 2);
        assert_eq!(result.warning_count(), 1);
        assert_eq!(result.fixable_count(), 1);
        assert!(result.has_errors());
    }

    #[test]
    fn test_severity_serialization() {
        assert_eq!(serde_json::to_value(Severity::Warn).unwrap(), json!("warn"));
        assert_eq!(Severity::default(), Severity::Error);
    }
}
