//! What a rule sees while it runs, and how it reports.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokenlint_ast::{LineIndex, Position, Span};
use tokenlint_tokens::DesignTokens;
use tracing::warn;

use crate::{Fix, LintMessage, Severity};

/// The document a per-document context belongs to.
#[derive(Debug, Clone, Copy)]
pub struct DocumentInfo<'a> {
    pub id: &'a str,
    /// Type tag such as `css` or `vue`.
    pub kind: &'a str,
    pub source: &'a str,
}

/// Context passed to [`RuleModule::create`](crate::RuleModule::create) and
/// [`RuleModule::create_run`](crate::RuleModule::create_run).
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub rule_id: &'a str,
    pub severity: Severity,
    /// Options from the configuration, `Null` when none were given.
    pub options: &'a Value,
    pub tokens: &'a DesignTokens,
    /// The document being linted; `None` when creating a run-level hook.
    pub document: Option<DocumentInfo<'a>>,
}

impl<'a> RuleContext<'a> {
    /// Deserializes the options, falling back to defaults.
    ///
    /// Options were checked against the rule's schema at startup, so a
    /// failure here means the schema is looser than the options type.
    pub fn options_or_default<T: DeserializeOwned + Default>(&self) -> T {
        if self.options.is_null() {
            return T::default();
        }
        serde_json::from_value(self.options.clone()).unwrap_or_else(|e| {
            warn!("Ignoring options for rule '{}': {}", self.rule_id, e);
            T::default()
        })
    }
}

/// Aggregate facts about the whole run, for run-level hooks.
pub trait TokenUsage: Sync {
    /// Returns true if any document referenced the token at `path`.
    fn is_referenced(&self, path: &str) -> bool;

    /// Number of references to the token at `path` across all documents.
    fn reference_count(&self, path: &str) -> usize;
}

/// Context passed to run-level hooks once every document has finished.
#[derive(Clone, Copy)]
pub struct RunContext<'a> {
    pub tokens: &'a DesignTokens,
    pub usage: &'a dyn TokenUsage,
    /// Ids of every document in the run, in input order.
    pub documents: &'a [String],
}

impl std::fmt::Debug for RunContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunContext")
            .field("documents", &self.documents.len())
            .finish_non_exhaustive()
    }
}

/// A message under construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    message: String,
    span: Option<Span>,
    position: Option<Position>,
    fix: Option<Fix>,
    metadata: Option<Value>,
}

impl Report {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            span: None,
            position: None,
            fix: None,
            metadata: None,
        }
    }

    /// Anchors the message at the start of `span` in the document.
    pub fn at(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Anchors the message at an explicit position, for run-level messages
    /// that point into the configuration.
    pub fn at_position(mut self, position: Position) -> Self {
        self.position = Some(position);
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
}

/// Turns a rule's reports into [`LintMessage`]s.
pub struct Reporter<'a> {
    rule_id: &'a str,
    severity: Severity,
    index: Option<&'a LineIndex<'a>>,
    messages: &'a mut Vec<LintMessage>,
}

impl<'a> Reporter<'a> {
    /// Creates a reporter. Without a line index, span-anchored reports fall
    /// back to line 1, column 1.
    pub fn new(
        rule_id: &'a str,
        severity: Severity,
        index: Option<&'a LineIndex<'a>>,
        messages: &'a mut Vec<LintMessage>,
    ) -> Self {
        Self {
            rule_id,
            severity,
            index,
            messages,
        }
    }

    pub fn report(&mut self, report: Report) {
        let position = report
            .position
            .or_else(|| Some(self.index?.position(report.span?.start)))
            .unwrap_or_default();
        let mut message = LintMessage::new(self.rule_id, report.message, position)
            .with_severity(self.severity);
        message.fix = report.fix;
        message.metadata = report.metadata;
        self.messages.push(message);
    }

    pub fn rule_id(&self) -> &str {
        self.rule_id
    }
}
