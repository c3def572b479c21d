//! `design-system/deprecation`: references to deprecated tokens.

use std::collections::HashMap;
use std::rc::Rc;

use serde_json::json;

use tokenlint_ast::{EventKind, Span};
use tokenlint_rule::{Fix, Listeners, Report, RuleContext, RuleMeta, RuleModule};
use tokenlint_tokens::{FlattenedToken, TokenSet, alias, css_var_name};

use super::literals::{alias_references, var_references};

/// Deprecated tokens, by CSS custom property name and by path.
struct Deprecated<'a> {
    set: &'a TokenSet,
    by_var: HashMap<String, &'a FlattenedToken>,
    by_path: HashMap<&'a str, &'a FlattenedToken>,
}

impl<'a> Deprecated<'a> {
    fn new(set: &'a TokenSet) -> Self {
        let mut by_var = HashMap::new();
        let mut by_path = HashMap::new();
        for token in set.iter().filter(|t| t.deprecated) {
            by_var.entry(token.css_var_name()).or_insert(token);
            by_path.entry(token.path.as_str()).or_insert(token);
        }
        Self {
            set,
            by_var,
            by_path,
        }
    }

    fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }

    /// Returns the replacement path, if it names an existing token.
    fn replacement(&self, token: &FlattenedToken) -> Option<&'a str> {
        let path = token.replacement()?;
        self.set.get(path).map(|t| t.path.as_str())
    }

    fn report(&self, token: &FlattenedToken) -> Report {
        let mut message = format!("Token \"{}\" is deprecated", token.path);
        match (self.replacement(token), token.deprecation.as_deref()) {
            (Some(replacement), _) => {
                message.push_str(&format!("; use \"{replacement}\" instead"));
            }
            (None, Some(reason)) if !alias::is_alias(reason) => {
                message.push_str(&format!(": {reason}"));
            }
            _ => {}
        }
        Report::new(message).with_metadata(json!({ "path": token.path }))
    }
}

pub struct Deprecation {
    meta: RuleMeta,
}

impl Deprecation {
    pub const NAME: &'static str = "design-system/deprecation";

    pub fn new() -> Self {
        Self {
            meta: RuleMeta::new("Disallow references to deprecated tokens")
                .with_category("design-system")
                .with_events(&[EventKind::CssDeclaration, EventKind::StringLiteral])
                .fixable(),
        }
    }
}

impl Default for Deprecation {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleModule for Deprecation {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn create<'a>(&'a self, ctx: &RuleContext<'a>) -> Listeners<'a> {
        let Some(set) = ctx.tokens.token_set() else {
            return Listeners::new();
        };
        let deprecated = Rc::new(Deprecated::new(set));
        if deprecated.is_empty() {
            return Listeners::new();
        }
        let strings = Rc::clone(&deprecated);

        Listeners::new()
            .on_declaration(move |decl, reporter| {
                for reference in var_references(decl.value) {
                    let Some(token) = deprecated.by_var.get(reference.name) else {
                        continue;
                    };
                    let span = Span::from_range(reference.start, reference.end)
                        .shift(decl.value_span.start);
                    let mut report = deprecated.report(token).at(span);
                    if let Some(replacement) = deprecated.replacement(token) {
                        report = report.with_fix(Fix::new(span, css_var_name(replacement)));
                    }
                    reporter.report(report);
                }
            })
            .on_string(move |lit, reporter| {
                for reference in alias_references(lit.value) {
                    let Some(token) = strings.by_path.get(reference.path) else {
                        continue;
                    };
                    let span = Span::from_range(reference.start, reference.end)
                        .shift(lit.span.start);
                    let mut report = strings.report(token).at(span);
                    if let Some(replacement) = strings.replacement(token) {
                        report = report.with_fix(Fix::new(span, alias::alias_to(replacement)));
                    }
                    reporter.report(report);
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::run_rule;
    use pretty_assertions::assert_eq;
    use serde_json::Value;

    fn tokens() -> Value {
        json!({
            "color": {
                "$type": "color",
                "brand": { "$value": "#ff0000" },
                "primary": {
                    "$value": "#ff0000",
                    "$deprecated": "{color.brand}"
                },
                "legacy": {
                    "$value": "#00ff00",
                    "$deprecated": "Will be removed in v3"
                }
            }
        })
    }

    #[test]
    fn test_css_reference_with_replacement() {
        let source = "a { color: var(--color-primary); }";
        let messages = run_rule(&Deprecation::new(), tokens(), Value::Null, "css", source);

        assert_eq!(messages.len(), 1);
        assert_eq!(
            messages[0].message,
            "Token \"color.primary\" is deprecated; use \"color.brand\" instead"
        );
        assert_eq!((messages[0].line, messages[0].column), (1, 16));
        assert_eq!(
            messages[0].fix,
            Some(Fix::new(Span::new(15, 30), "--color-brand"))
        );
    }

    #[test]
    fn test_string_reference_with_reason() {
        let source = "const c = '{color.legacy}';";
        let messages = run_rule(&Deprecation::new(), tokens(), Value::Null, "js", source);

        assert_eq!(messages.len(), 1);
        assert_eq!(
            messages[0].message,
            "Token \"color.legacy\" is deprecated: Will be removed in v3"
        );
        assert!(messages[0].fix.is_none());
    }

    #[test]
    fn test_string_reference_fix() {
        let source = "t('{color.primary}')";
        let messages = run_rule(&Deprecation::new(), tokens(), Value::Null, "ts", source);
        assert_eq!(
            messages[0].fix,
            Some(Fix::new(Span::new(3, 18), "{color.brand}"))
        );
    }

    #[test]
    fn test_current_tokens_are_fine() {
        let source = "a { color: var(--color-brand); }";
        let messages = run_rule(&Deprecation::new(), tokens(), Value::Null, "css", source);
        assert!(messages.is_empty());
    }
}
