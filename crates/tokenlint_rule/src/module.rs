//! The rule protocol.

use tokenlint_ast::{CssDeclaration, EventKind, JsxAttribute, StringLiteral, SyntaxEvent};
use tracing::warn;

use crate::{Capabilities, Reporter, RuleContext, RuleMeta, RunContext};

/// A per-document event handler.
pub type Handler<'a> = Box<dyn FnMut(&SyntaxEvent<'_>, &mut Reporter<'_>) + 'a>;

/// A run-level hook. It is consumed when called, so it fires at most once.
pub type RunHandler<'a> = Box<dyn FnOnce(&RunContext<'_>, &mut Reporter<'_>) + 'a>;

/// A lint rule.
///
/// Modules are immutable once registered. `create` is called once per
/// document and `create_run` once per run; any state a rule keeps lives in
/// the closures they return.
pub trait RuleModule: Send + Sync {
    /// Unique rule name, such as `design-token/colors`.
    fn name(&self) -> &str;

    fn meta(&self) -> &RuleMeta;

    /// Returns the handlers for one document.
    fn create<'a>(&'a self, _ctx: &RuleContext<'a>) -> Listeners<'a> {
        Listeners::new()
    }

    /// Returns the hook to call after every document has been linted.
    fn create_run<'a>(&'a self, _ctx: &RuleContext<'a>) -> Option<RunHandler<'a>> {
        None
    }
}

/// A partial map from event kind to handlers.
#[derive(Default)]
pub struct Listeners<'a> {
    pub(crate) handlers: Vec<(EventKind, Handler<'a>)>,
}

impl<'a> Listeners<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a handler for `kind`.
    pub fn on(
        mut self,
        kind: EventKind,
        handler: impl FnMut(&SyntaxEvent<'_>, &mut Reporter<'_>) + 'a,
    ) -> Self {
        self.handlers.push((kind, Box::new(handler)));
        self
    }

    /// Adds a handler for CSS declarations.
    pub fn on_declaration(
        self,
        mut handler: impl FnMut(&CssDeclaration<'_>, &mut Reporter<'_>) + 'a,
    ) -> Self {
        self.on(EventKind::CssDeclaration, move |event, reporter| {
            if let SyntaxEvent::CssDeclaration(decl) = event {
                handler(decl, reporter);
            }
        })
    }

    /// Adds a handler for script string literals.
    pub fn on_string(
        self,
        mut handler: impl FnMut(&StringLiteral<'_>, &mut Reporter<'_>) + 'a,
    ) -> Self {
        self.on(EventKind::StringLiteral, move |event, reporter| {
            if let SyntaxEvent::StringLiteral(lit) = event {
                handler(lit, reporter);
            }
        })
    }

    /// Adds a handler for JSX attributes.
    pub fn on_attribute(
        self,
        mut handler: impl FnMut(&JsxAttribute<'_>, &mut Reporter<'_>) + 'a,
    ) -> Self {
        self.on(EventKind::JsxAttribute, move |event, reporter| {
            if let SyntaxEvent::JsxAttribute(attr) = event {
                handler(attr, reporter);
            }
        })
    }

    /// Returns true if some handler takes `kind`.
    pub fn handles(&self, kind: EventKind) -> bool {
        self.handlers.iter().any(|(k, _)| *k == kind)
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Drops handlers for kinds the rule did not declare.
    pub fn restrict_to(&mut self, capabilities: &Capabilities, rule: &str) {
        self.handlers.retain(|(kind, _)| {
            let declared = capabilities.handles(*kind);
            if !declared {
                warn!("Rule '{rule}' returned a handler for undeclared event '{kind}'");
            }
            declared
        });
    }
}

impl std::fmt::Debug for Listeners<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.handlers.iter().map(|(kind, _)| kind))
            .finish()
    }
}
