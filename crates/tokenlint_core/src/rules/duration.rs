//! `design-token/duration`: transition and animation times must come from
//! the duration tokens.

use serde_json::json;

use tokenlint_ast::EventKind;
use tokenlint_rule::{Listeners, Report, RuleContext, RuleMeta, RuleModule};
use tokenlint_tokens::TokenType;

use super::literals::unit_literals;
use super::spacing::token_measures;

fn to_millis(value: f64, unit: &str) -> f64 {
    if unit == "s" { value * 1000.0 } else { value }
}

pub struct Duration {
    meta: RuleMeta,
}

impl Duration {
    pub const NAME: &'static str = "design-token/duration";

    pub fn new() -> Self {
        Self {
            meta: RuleMeta::new("Require transition and animation times to match a duration token")
                .with_category("design-token")
                .with_events(&[EventKind::CssDeclaration]),
        }
    }
}

impl Default for Duration {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleModule for Duration {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn create<'a>(&'a self, ctx: &RuleContext<'a>) -> Listeners<'a> {
        let millis: Vec<f64> = token_measures(ctx.tokens, TokenType::Duration)
            .into_iter()
            .map(|(value, unit)| to_millis(value, &unit))
            .collect();
        let patterns = ctx.tokens.allow_list();

        Listeners::new().on_declaration(move |decl, reporter| {
            let property = decl.property.to_ascii_lowercase();
            if !property.starts_with("transition") && !property.starts_with("animation") {
                return;
            }
            for (literal, value, unit) in unit_literals(decl.value, &["ms", "s"]) {
                let ms = to_millis(value, &unit);
                let allowed = ms == 0.0
                    || patterns.is_some_and(|p| p.allows(literal.text))
                    || millis.iter().any(|m| (m - ms).abs() < 1e-6);
                if allowed {
                    continue;
                }
                reporter.report(
                    Report::new(format!(
                        "Duration \"{}\" does not match any duration token",
                        literal.text
                    ))
                    .at(literal.span_in(decl.value_span))
                    .with_metadata(json!({ "property": decl.property, "value": literal.text })),
                );
            }
        })
    }
}
