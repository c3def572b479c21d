//! Routing syntax events to rule handlers.

use tokenlint_ast::{EventKind, EventSink, LineIndex, SyntaxEvent};

use crate::{LintMessage, Listeners, Reporter, RuleModule, Severity};

struct Bound<'a> {
    rule_id: &'a str,
    severity: Severity,
    listeners: Listeners<'a>,
}

/// An [`EventSink`] that feeds one document's events to the active rules.
///
/// Each event goes to every rule with a handler for its kind, in the order
/// the rules were added.
pub struct Dispatcher<'a> {
    index: LineIndex<'a>,
    rules: Vec<Bound<'a>>,
    messages: Vec<LintMessage>,
}

impl<'a> Dispatcher<'a> {
    /// Creates a dispatcher for a document's text.
    pub fn new(source: &'a str) -> Self {
        Self {
            index: LineIndex::new(source),
            rules: Vec::new(),
            messages: Vec::new(),
        }
    }

    /// Binds a rule's listeners. Handlers for kinds the rule did not declare
    /// are dropped.
    pub fn add(
        &mut self,
        module: &'a dyn RuleModule,
        severity: Severity,
        mut listeners: Listeners<'a>,
    ) {
        listeners.restrict_to(&module.meta().capabilities, module.name());
        if listeners.is_empty() {
            return;
        }
        self.rules.push(Bound {
            rule_id: module.name(),
            severity,
            listeners,
        });
    }

    /// Returns true if no rule listens to anything.
    pub fn is_idle(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns the collected messages, ordered by position.
    pub fn into_messages(self) -> Vec<LintMessage> {
        let mut messages = self.messages;
        messages.sort_by_key(|m| (m.line, m.column));
        messages
    }
}

impl EventSink for Dispatcher<'_> {
    fn wants(&self, kind: EventKind) -> bool {
        self.rules.iter().any(|r| r.listeners.handles(kind))
    }

    fn emit(&mut self, event: SyntaxEvent<'_>) {
        let kind = event.kind();
        for rule in &mut self.rules {
            for (handled, handler) in &mut rule.listeners.handlers {
                if *handled != kind {
                    continue;
                }
                let mut reporter = Reporter::new(
                    rule.rule_id,
                    rule.severity,
                    Some(&self.index),
                    &mut self.messages,
                );
                handler(&event, &mut reporter);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Report, RuleContext, RuleMeta};
    use pretty_assertions::assert_eq;
    use tokenlint_ast::{CssDeclaration, Span, StringLiteral};
    use tokenlint_tokens::DesignTokens;

    struct Shout {
        meta: RuleMeta,
    }

    impl RuleModule for Shout {
        fn name(&self) -> &str {
            "shout"
        }

        fn meta(&self) -> &RuleMeta {
            &self.meta
        }

        fn create<'a>(&'a self, _ctx: &RuleContext<'a>) -> Listeners<'a> {
            Listeners::new()
                .on_declaration(|decl, reporter| {
                    reporter.report(Report::new(decl.property.to_uppercase()).at(decl.span));
                })
                .on_string(|lit, reporter| {
                    reporter.report(Report::new(lit.value.to_uppercase()).at(lit.span));
                })
        }
    }

    fn listeners<'a>(rule: &'a Shout, tokens: &'a DesignTokens) -> Listeners<'a> {
        let ctx = RuleContext {
            rule_id: rule.name(),
            severity: Severity::Error,
            options: &serde_json::Value::Null,
            tokens,
            document: None,
        };
        rule.create(&ctx)
    }

    #[test]
    fn test_dispatch_declared_kinds_only() {
        let rule = Shout {
            meta: RuleMeta::new("shout").with_events(&[EventKind::CssDeclaration]),
        };
        let source = "\n  a { color: red }";
        let tokens = DesignTokens::default();
        let mut dispatcher = Dispatcher::new(source);
        dispatcher.add(&rule, Severity::Warn, listeners(&rule, &tokens));

        assert!(dispatcher.wants(EventKind::CssDeclaration));
        assert!(!dispatcher.wants(EventKind::StringLiteral));

        dispatcher.emit(SyntaxEvent::StringLiteral(StringLiteral {
            value: "x",
            span: Span::new(0, 1),
            quote: '"',
        }));
        dispatcher.emit(SyntaxEvent::CssDeclaration(CssDeclaration {
            property: "color",
            value: "red",
            span: Span::new(7, 17),
            value_span: Span::new(14, 17),
            important: false,
        }));

        let messages = dispatcher.into_messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].message, "COLOR");
        assert_eq!((messages[0].line, messages[0].column), (2, 7));
        assert_eq!(messages[0].severity, Severity::Warn);
    }

    #[test]
    fn test_rule_without_matching_listeners_is_skipped() {
        let rule = Shout {
            meta: RuleMeta::new("shout").with_run(),
        };
        let tokens = DesignTokens::default();
        let mut dispatcher = Dispatcher::new("");
        dispatcher.add(&rule, Severity::Error, listeners(&rule, &tokens));
        assert!(dispatcher.is_idle());
    }
}
