//! `design-token/spacing`: spacing lengths must come from the dimension
//! tokens.

use serde_json::json;

use tokenlint_ast::EventKind;
use tokenlint_rule::{Listeners, Report, RuleContext, RuleMeta, RuleModule};
use tokenlint_tokens::{DesignTokens, TokenType};

use super::literals::unit_literals;

const SPACING_UNITS: &[&str] = &["px", "rem", "em", "pt", "ch", "ex"];

/// Returns true for margin, padding, gap and inset properties.
fn is_spacing_property(property: &str) -> bool {
    let property = property.to_ascii_lowercase();
    ["margin", "padding", "inset", "scroll-margin", "scroll-padding"]
        .iter()
        .any(|prefix| property == *prefix || property.starts_with(&format!("{prefix}-")))
        || matches!(
            property.as_str(),
            "gap" | "row-gap" | "column-gap" | "grid-gap" | "top" | "right" | "bottom" | "left"
        )
}

/// `(value, unit)` pairs of every dimension token, fallbacks included.
pub(crate) fn token_measures(tokens: &DesignTokens, ty: TokenType) -> Vec<(f64, String)> {
    let Some(set) = tokens.token_set() else {
        return Vec::new();
    };
    set.iter()
        .filter(|t| t.token_type == ty)
        .flat_map(|t| std::iter::once(&t.value).chain(&t.fallbacks))
        .filter_map(|v| {
            let value = v.get("value")?.as_f64()?;
            let unit = v.get("unit")?.as_str()?;
            Some((value, unit.to_ascii_lowercase()))
        })
        .collect()
}

pub struct Spacing {
    meta: RuleMeta,
}

impl Spacing {
    pub const NAME: &'static str = "design-token/spacing";

    pub fn new() -> Self {
        Self {
            meta: RuleMeta::new("Require spacing lengths to match a dimension token")
                .with_category("design-token")
                .with_events(&[EventKind::CssDeclaration]),
        }
    }
}

impl Default for Spacing {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleModule for Spacing {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn create<'a>(&'a self, ctx: &RuleContext<'a>) -> Listeners<'a> {
        let measures = token_measures(ctx.tokens, TokenType::Dimension);
        let patterns = ctx.tokens.allow_list();

        Listeners::new().on_declaration(move |decl, reporter| {
            if !is_spacing_property(decl.property) {
                return;
            }
            for (literal, value, unit) in unit_literals(decl.value, SPACING_UNITS) {
                let allowed = value == 0.0
                    || patterns.is_some_and(|p| p.allows(literal.text))
                    || measures
                        .iter()
                        .any(|(v, u)| *u == unit && (v - value.abs()).abs() < f64::EPSILON);
                if allowed {
                    continue;
                }
                reporter.report(
                    Report::new(format!(
                        "Spacing \"{}\" does not match any dimension token",
                        literal.text
                    ))
                    .at(literal.span_in(decl.value_span))
                    .with_metadata(json!({ "property": decl.property, "value": literal.text })),
                );
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

    #[test]
    fn test_spacing_tokens() {
        let tokens = json!({
            "space": {
                "$type": "dimension",
                "sm": { "$value": "4px" },
                "md": { "$value": 8 },
                "lg": { "$value": "1.5rem" }
            }
        });
        let source = "a {\n  margin: 0 -4px 8px 1.5rem;\n  padding: 6px;\n  width: 13px;\n}";
        let messages = run_rule(&Spacing::new(), tokens, Value::Null, "css", source);

        assert_eq!(messages.len(), 1);
        assert_eq!((messages[0].line, messages[0].column), (3, 12));
        assert_eq!(
            messages[0].message,
            "Spacing \"6px\" does not match any dimension token"
        );
    }

    #[test]
    fn test_spacing_properties() {
        assert!(is_spacing_property("margin-inline-start"));
        assert!(is_spacing_property("Gap"));
        assert!(!is_spacing_property("width"));
        assert!(!is_spacing_property("marginal"));
    }
}
