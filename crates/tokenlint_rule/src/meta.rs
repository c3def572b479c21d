//! Rule metadata.

use serde::{Deserialize, Serialize};
use tokenlint_ast::EventKind;

/// What a rule listens to.
///
/// Registration rejects rules that declare nothing, and the dispatcher only
/// routes the declared event kinds to a rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    /// Syntax events handled in the per-document phase.
    #[serde(default)]
    pub events: Vec<EventKind>,

    /// Whether the rule has a run-level hook.
    #[serde(default)]
    pub run: bool,
}

impl Capabilities {
    /// Returns true if the rule handles `kind`.
    pub fn handles(&self, kind: EventKind) -> bool {
        self.events.contains(&kind)
    }

    /// Returns true if nothing is declared.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && !self.run
    }
}

/// Static description of a rule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleMeta {
    /// Human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Grouping such as `design-token` or `design-system`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Whether this rule can provide auto-fixes.
    #[serde(default)]
    pub fixable: bool,

    /// JSON Schema for rule options.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<serde_json::Value>,

    #[serde(default)]
    pub capabilities: Capabilities,
}

impl RuleMeta {
    /// Creates metadata with a description.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..Self::default()
        }
    }

    /// Sets the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Sets the options schema.
    pub fn with_schema(mut self, schema: serde_json::Value) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Declares the event kinds the rule handles.
    pub fn with_events(mut self, events: &[EventKind]) -> Self {
        self.capabilities.events = events.to_vec();
        self
    }

    /// Declares a run-level hook.
    pub fn with_run(mut self) -> Self {
        self.capabilities.run = true;
        self
    }

    /// Marks the rule as fixable.
    pub fn fixable(mut self) -> Self {
        self.fixable = true;
        self
    }

    /// Returns the description, if present and non-blank.
    pub fn description(&self) -> Option<&str> {
        self.description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_meta_builder() {
        let meta = RuleMeta::new("Disallow raw colors")
            .with_category("design-token")
            .with_events(&[EventKind::CssDeclaration])
            .fixable();

        assert_eq!(meta.description(), Some("Disallow raw colors"));
        assert!(meta.capabilities.handles(EventKind::CssDeclaration));
        assert!(!meta.capabilities.handles(EventKind::JsxAttribute));
        assert!(!meta.capabilities.run);
        assert!(meta.fixable);
    }

    #[test]
    fn test_blank_description_is_missing() {
        let meta = RuleMeta::new("  ");
        assert_eq!(meta.description(), None);
        assert!(meta.capabilities.is_empty());
    }

    #[test]
    fn test_meta_deserialize() {
        let meta: RuleMeta = serde_json::from_value(json!({
            "description": "x",
            "capabilities": { "events": ["stringLiteral"], "run": true }
        }))
        .unwrap();
        assert_eq!(meta.capabilities.events, vec![EventKind::StringLiteral]);
        assert!(meta.capabilities.run);
        assert!(meta.schema.is_none());
    }
}
