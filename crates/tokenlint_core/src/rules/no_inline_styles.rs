//! `design-system/no-inline-styles`: styling belongs in stylesheets.

use tokenlint_ast::EventKind;
use tokenlint_rule::{Listeners, Report, RuleContext, RuleMeta, RuleModule};

pub struct NoInlineStyles {
    meta: RuleMeta,
}

impl NoInlineStyles {
    pub const NAME: &'static str = "design-system/no-inline-styles";

    pub fn new() -> Self {
        Self {
            meta: RuleMeta::new("Disallow inline style attributes")
                .with_category("design-system")
                .with_events(&[EventKind::JsxAttribute]),
        }
    }
}

impl Default for NoInlineStyles {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleModule for NoInlineStyles {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn create<'a>(&'a self, _ctx: &RuleContext<'a>) -> Listeners<'a> {
        Listeners::new().on_attribute(|attr, reporter| {
            if attr.name != "style" {
                return;
            }
            reporter.report(Report::new("Inline styles are not allowed").at(attr.span));
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
    fn test_jsx_style_attribute() {
        let source = "const a = <div className=\"card\" style={{ color: 'red' }} />;";
        let messages = run_rule(&NoInlineStyles::new(), Value::Null, Value::Null, "jsx", source);

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].rule_id, NoInlineStyles::NAME);
        assert_eq!((messages[0].line, messages[0].column), (1, 33));
    }

    #[test]
    fn test_other_attributes_are_fine() {
        let source = "const a = <Box styles={x} className=\"style\" />;";
        let messages = run_rule(&NoInlineStyles::new(), Value::Null, Value::Null, "jsx", source);
        assert!(messages.is_empty());
    }
}
