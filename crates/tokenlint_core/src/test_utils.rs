//! Helpers for running a single rule in unit tests.

use serde_json::Value;

use tokenlint_parser::ParserRegistry;
use tokenlint_rule::{
    DocumentInfo, Dispatcher, LintMessage, RuleContext, RuleModule, RunContext, Reporter,
    Severity, TokenUsage,
};
use tokenlint_tokens::{DesignTokens, FlattenOptions};

/// Loads `tokens`; `null` yields an empty token set.
pub fn design_tokens(tokens: &Value) -> DesignTokens {
    DesignTokens::from_value(Some(tokens), &FlattenOptions::default())
        .unwrap_or_else(|e| panic!("invalid test tokens: {e}"))
}

/// Lints `source` with `rule` alone, at error severity.
pub fn run_rule(
    rule: &dyn RuleModule,
    tokens: Value,
    options: Value,
    kind: &str,
    source: &str,
) -> Vec<LintMessage> {
    let tokens = design_tokens(&tokens);
    let ctx = RuleContext {
        rule_id: rule.name(),
        severity: Severity::Error,
        options: &options,
        tokens: &tokens,
        document: Some(DocumentInfo {
            id: "/test",
            kind,
            source,
        }),
    };

    let mut dispatcher = Dispatcher::new(source);
    dispatcher.add(rule, Severity::Error, rule.create(&ctx));
    ParserRegistry::new()
        .parse(kind, source, &mut dispatcher)
        .unwrap_or_else(|e| panic!("test source failed to parse: {e}"));
    dispatcher.into_messages()
}

/// Runs `rule`'s run-level hook against `usage`.
pub fn run_hook(
    rule: &dyn RuleModule,
    tokens: Value,
    options: Value,
    usage: &dyn TokenUsage,
) -> Vec<LintMessage> {
    let tokens = design_tokens(&tokens);
    let ctx = RuleContext {
        rule_id: rule.name(),
        severity: Severity::Warn,
        options: &options,
        tokens: &tokens,
        document: None,
    };
    let mut messages = Vec::new();
    if let Some(hook) = rule.create_run(&ctx) {
        let run = RunContext {
            tokens: &tokens,
            usage,
            documents: &[],
        };
        let mut reporter = Reporter::new(rule.name(), Severity::Warn, None, &mut messages);
        hook(&run, &mut reporter);
    }
    messages
}
