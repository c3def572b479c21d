//! `design-token/no-unused-tokens`: tokens no document references.

use serde::Deserialize;
use serde_json::json;

use tokenlint_rule::{
    Report, Reporter, RuleContext, RuleMeta, RuleModule, RunContext, RunHandler,
};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Options {
    /// Token paths or group prefixes to leave alone.
    ignore: Vec<String>,
}

impl Options {
    fn ignores(&self, path: &str) -> bool {
        self.ignore.iter().any(|ignored| {
            path == ignored
                || path
                    .strip_prefix(ignored.as_str())
                    .is_some_and(|rest| rest.starts_with('.'))
        })
    }
}

pub struct NoUnusedTokens {
    meta: RuleMeta,
}

impl NoUnusedTokens {
    pub const NAME: &'static str = "design-token/no-unused-tokens";

    pub fn new() -> Self {
        Self {
            meta: RuleMeta::new("Report tokens that no document references")
                .with_category("design-token")
                .with_run()
                .with_schema(json!({
                    "type": "object",
                    "properties": {
                        "ignore": {
                            "type": "array",
                            "items": { "type": "string" }
                        }
                    },
                    "additionalProperties": false
                })),
        }
    }
}

impl Default for NoUnusedTokens {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleModule for NoUnusedTokens {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn create_run<'a>(&'a self, ctx: &RuleContext<'a>) -> Option<RunHandler<'a>> {
        let options: Options = ctx.options_or_default();
        Some(Box::new(move |run: &RunContext<'_>, reporter: &mut Reporter<'_>| {
            let Some(set) = run.tokens.token_set() else {
                return;
            };
            for path in set.paths() {
                if options.ignores(path) || run.usage.is_referenced(path) {
                    continue;
                }
                let mut report = Report::new(format!("Token \"{path}\" is never referenced"))
                    .with_metadata(json!({ "path": path }));
                if let Some(location) = set.get(path).and_then(|t| t.location) {
                    report = report.at_position(location);
                }
                reporter.report(report);
            }
        }))
    }
}
