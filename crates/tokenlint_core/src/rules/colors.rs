//! `design-token/colors`: color values must come from the color tokens.

use std::collections::{BTreeMap, HashSet};
use std::rc::Rc;

use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use tokenlint_rule::{Listeners, Report, RuleContext, RuleMeta, RuleModule};
use tokenlint_ast::EventKind;
use tokenlint_tokens::{AllowList, Color, DesignTokens, TokenType, parse_css_color};

use super::literals::{ColorLiteral, color_literals};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Options {
    /// Extra allowed colors, keyed by a name for documentation.
    tokens: BTreeMap<String, String>,
}

/// The colors a document may use.
struct Palette<'a> {
    keys: HashSet<String>,
    patterns: Option<&'a AllowList>,
}

impl<'a> Palette<'a> {
    fn new(tokens: &'a DesignTokens, options: &Options) -> Self {
        let mut keys = HashSet::new();
        if let Some(set) = tokens.token_set() {
            for token in set.iter().filter(|t| t.token_type == TokenType::Color) {
                keys.extend(
                    std::iter::once(&token.value)
                        .chain(&token.fallbacks)
                        .filter_map(|v| Color::from_value(v)?.hex_key()),
                );
            }
        }
        for (name, value) in &options.tokens {
            match parse_css_color(value).and_then(|c| c.hex_key()) {
                Some(key) => {
                    keys.insert(key);
                }
                None => debug!("Ignoring allowed color '{}': {} is not a color", name, value),
            }
        }
        Self {
            keys,
            patterns: tokens.allow_list(),
        }
    }

    fn allows(&self, literal: &str) -> bool {
        if self.patterns.is_some_and(|p| p.allows(literal)) {
            return true;
        }
        parse_css_color(literal)
            .and_then(|c| c.hex_key())
            .is_some_and(|key| self.keys.contains(&key))
    }
}

/// Returns true for properties whose keywords are colors.
fn is_color_property(property: &str) -> bool {
    let property = property.to_ascii_lowercase();
    property == "color"
        || property.ends_with("-color")
        || matches!(
            property.as_str(),
            "background"
                | "border"
                | "border-top"
                | "border-right"
                | "border-bottom"
                | "border-left"
                | "border-block"
                | "border-inline"
                | "outline"
                | "fill"
                | "stroke"
                | "box-shadow"
                | "text-shadow"
                | "text-decoration"
                | "column-rule"
        )
}

pub struct Colors {
    meta: RuleMeta,
}

impl Colors {
    pub const NAME: &'static str = "design-token/colors";

    pub fn new() -> Self {
        Self {
            meta: RuleMeta::new("Require color values to match a color token")
                .with_category("design-token")
                .with_events(&[EventKind::CssDeclaration, EventKind::StringLiteral])
                .with_schema(json!({
                    "type": "object",
                    "properties": {
                        "tokens": {
                            "type": "object",
                            "additionalProperties": { "type": "string" }
                        }
                    },
                    "additionalProperties": false
                })),
        }
    }
}

impl Default for Colors {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleModule for Colors {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn create<'a>(&'a self, ctx: &RuleContext<'a>) -> Listeners<'a> {
        let options: Options = ctx.options_or_default();
        let palette = Rc::new(Palette::new(ctx.tokens, &options));
        let strings = Rc::clone(&palette);

        Listeners::new()
            .on_declaration(move |decl, reporter| {
                // Custom property definitions are where tokens live.
                if decl.property.starts_with("--") {
                    return;
                }
                let named = is_color_property(decl.property);
                for (literal, kind) in color_literals(decl.value, named) {
                    let message = match kind {
                        ColorLiteral::Named => {
                            format!("Named color \"{}\" is not a design token", literal.text)
                        }
                        ColorLiteral::Computed if palette.allows(literal.text) => continue,
                        ColorLiteral::Computed => format!(
                            "Color \"{}\" does not match any color token",
                            literal.text
                        ),
                    };
                    reporter.report(Report::new(message).at(decl.span).with_metadata(json!({
                        "property": decl.property,
                        "value": literal.text,
                    })));
                }
            })
            .on_string(move |lit, reporter| {
                let value = lit.value.trim();
                if parse_css_color(value).is_none() || strings.allows(value) {
                    return;
                }
                reporter.report(
                    Report::new(format!("Color \"{}\" does not match any color token", value))
                        .at(lit.span)
                        .with_metadata(json!({ "value": value })),
                );
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
                "ink": { "$value": "rgb(0, 0, 0)" }
            }
        })
    }

    #[test]
    fn test_named_color_is_reported_at_declaration() {
        let messages = run_rule(
            &Colors::new(),
            json!(null),
            json!({ "tokens": { "--brand": "#ff0000" } }),
            "css",
            "a{color:red}",
        );
        assert_eq!(messages.len(), 1);
        assert_eq!((messages[0].line, messages[0].column), (1, 3));
        assert_eq!(messages[0].message, "Named color \"red\" is not a design token");
    }

    #[test]
    fn test_token_colors_are_allowed() {
        let source = "a { color: #F00; background: #000000; border: 1px solid #123456; }";
        let messages = run_rule(&Colors::new(), tokens(), Value::Null, "css", source);

        assert_eq!(messages.len(), 1);
        assert_eq!(
            messages[0].metadata,
            Some(json!({ "property": "border", "value": "#123456" }))
        );
    }

    #[test]
    fn test_var_and_custom_properties_are_allowed() {
        let source = ":root { --brand: #abcdef; }\na { color: var(--brand, #abcdef); }";
        let messages = run_rule(&Colors::new(), tokens(), Value::Null, "css", source);
        assert!(messages.is_empty(), "{messages:?}");
    }

    #[test]
    fn test_script_strings() {
        let source = "const a = '#ff0000';\nconst b = 'rgb(1, 2, 3)';\nconst c = 'red';";
        let messages = run_rule(&Colors::new(), tokens(), Value::Null, "js", source);

        assert_eq!(messages.len(), 1);
        assert_eq!((messages[0].line, messages[0].column), (2, 12));
    }

    #[test]
    fn test_allow_patterns() {
        let patterns = json!(["#fff", "/^#0{3,6}$/"]);
        let source = "a { color: #fff; background: #000; fill: #111; }";
        let messages = run_rule(&Colors::new(), patterns, Value::Null, "css", source);

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].metadata.as_ref().unwrap()["value"], "#111");
    }
}
