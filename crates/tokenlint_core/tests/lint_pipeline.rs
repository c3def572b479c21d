//! Integration tests for the lint pipeline.
//!
//! These tests drive `Linter` end to end: token loading, rule registration,
//! parallel document linting through the cache, fixes, and run-level hooks.

use std::fs;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tempfile::TempDir;

use tokenlint_ast::{Document, EventKind, FileDocument, SourceDocument};
use tokenlint_cache::CacheManager;
use tokenlint_core::{
    LintReport, Linter, LinterConfig, LinterError, Plugin, RuleLevel, RuleSetting, Severity,
};
use tokenlint_rule::{
    Listeners, Reporter, RuleContext, RuleError, RuleMeta, RuleModule, RunContext, RunHandler,
};

/// Counts how often a document is linted and how often the run hook fires.
struct Probe {
    meta: RuleMeta,
    linted: Arc<AtomicUsize>,
    runs: Arc<AtomicUsize>,
}

impl Probe {
    const NAME: &'static str = "probe/count";

    fn plugin(linted: &Arc<AtomicUsize>, runs: &Arc<AtomicUsize>) -> Plugin {
        let probe = Probe {
            meta: RuleMeta::new("Counts calls")
                .with_events(&[EventKind::CssDeclaration])
                .with_run(),
            linted: Arc::clone(linted),
            runs: Arc::clone(runs),
        };
        Plugin::new("probe", vec![Box::new(probe)])
    }
}

impl RuleModule for Probe {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn create<'a>(&'a self, _ctx: &RuleContext<'a>) -> Listeners<'a> {
        self.linted.fetch_add(1, Ordering::SeqCst);
        Listeners::new().on_declaration(|_, _| {})
    }

    fn create_run<'a>(&'a self, _ctx: &RuleContext<'a>) -> Option<RunHandler<'a>> {
        Some(Box::new(
            move |_run: &RunContext<'_>, _reporter: &mut Reporter<'_>| {
                self.runs.fetch_add(1, Ordering::SeqCst);
            },
        ))
    }
}

fn tokens() -> Value {
    json!({
        "color": {
            "$type": "color",
            "brand": { "$value": "#ff0000" },
            "accent": { "$value": "#0000ff" },
            "old": { "$value": "#ff0000", "$deprecated": "{color.brand}" },
            "unused": { "$value": "#00ff00" }
        }
    })
}

fn lint(linter: &Linter, documents: &[&dyn Document]) -> LintReport {
    linter.lint_documents(documents, &[])
}

#[test]
fn test_named_color_reported_at_declaration() {
    let config = LinterConfig::new().with_rule(
        "design-token/colors",
        RuleSetting::WithOptions(
            RuleLevel::Error,
            json!({ "tokens": { "--brand": "#ff0000" } }),
        ),
    );
    let linter = Linter::new(config, vec![]).unwrap();
    let doc = SourceDocument::new("/a.css", "css", "a{color:red}");
    let cache = CacheManager::new("unused.json").with_enabled(false);

    let report = linter.lint_with_cache(&[&doc], &[], &cache);

    assert_eq!(report.results.len(), 1);
    let messages = &report.results[0].messages;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].severity, Severity::Error);
    assert_eq!((messages[0].line, messages[0].column), (1, 3));
}

#[test]
fn test_unchanged_document_is_not_relinted() {
    let temp_dir = TempDir::new().unwrap();
    let css = temp_dir.path().join("app.css");
    fs::write(&css, "a { color: #123456; }\n").unwrap();

    let linted = Arc::new(AtomicUsize::new(0));
    let runs = Arc::new(AtomicUsize::new(0));
    let config = || {
        let mut config = LinterConfig::new()
            .with_tokens(tokens())
            .with_rule("design-token/colors", RuleLevel::Error)
            .with_rule(Probe::NAME, RuleLevel::Warn);
        config.cache_location = temp_dir
            .path()
            .join(".tokenlint-cache.json")
            .to_string_lossy()
            .to_string();
        config
    };
    let doc = FileDocument::new(&css);

    let first_linter = Linter::new(config(), vec![Probe::plugin(&linted, &runs)]).unwrap();
    let first = lint(&first_linter, &[&doc]);
    assert_eq!(linted.load(Ordering::SeqCst), 1);

    let second_linter = Linter::new(config(), vec![Probe::plugin(&linted, &runs)]).unwrap();
    let second = lint(&second_linter, &[&doc]);

    assert_eq!(linted.load(Ordering::SeqCst), 1);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first.results).unwrap(),
        serde_json::to_string(&second.results).unwrap()
    );
    assert_eq!(first.results[0].error_count(), 1);

    let store = fs::read_to_string(temp_dir.path().join(".tokenlint-cache.json")).unwrap();
    let store: Value = serde_json::from_str(&store).unwrap();
    assert!(store.get(doc.id()).is_some());
}

#[test]
fn test_changed_document_is_relinted() {
    let temp_dir = TempDir::new().unwrap();
    let doc = SourceDocument::new("/a.css", "css", "a { color: #ff0000; }");
    let linted = Arc::new(AtomicUsize::new(0));
    let runs = Arc::new(AtomicUsize::new(0));
    let config = LinterConfig::new()
        .with_tokens(tokens())
        .with_rule(Probe::NAME, RuleLevel::Warn);
    let linter = Linter::new(config, vec![Probe::plugin(&linted, &runs)]).unwrap();
    let cache = CacheManager::new(temp_dir.path().join("cache.json"));

    linter.lint_with_cache(&[&doc], &[], &cache);
    linter.lint_with_cache(&[&doc], &[], &cache);
    assert_eq!(linted.load(Ordering::SeqCst), 1);

    doc.write_text("a { color: #0000ff; }").unwrap();
    linter.lint_with_cache(&[&doc], &[], &cache);
    assert_eq!(linted.load(Ordering::SeqCst), 2);
}

#[test]
fn test_run_hook_fires_once_and_sees_every_document() {
    let linted = Arc::new(AtomicUsize::new(0));
    let runs = Arc::new(AtomicUsize::new(0));
    let config = LinterConfig::new()
        .with_tokens(tokens())
        .with_rule("design-token/no-unused-tokens", RuleLevel::Warn)
        .with_rule(Probe::NAME, RuleLevel::Warn);
    let linter = Linter::new(config, vec![Probe::plugin(&linted, &runs)]).unwrap();

    let a = SourceDocument::new("/a.css", "css", "a { color: var(--color-brand); }");
    let b = SourceDocument::new("/b.tsx", "tsx", "const c = '{color.accent}';");
    let c = SourceDocument::new("/c.scss", "scss", ".x { color: var(--color-old); }");
    let cache = CacheManager::new("unused.json").with_enabled(false);

    let report = linter.lint_with_cache(&[&a, &b, &c], &[], &cache);

    assert_eq!(runs.load(Ordering::SeqCst), 1);
    assert_eq!(report.results.len(), 4);
    let ids: Vec<&str> = report
        .results
        .iter()
        .map(|r| r.document_id.as_str())
        .collect();
    assert_eq!(ids, vec!["/a.css", "/b.tsx", "/c.scss", "tokenlint.config"]);

    let unused: Vec<&str> = report.results[3]
        .messages
        .iter()
        .map(|m| m.message.as_str())
        .collect();
    assert_eq!(unused, vec!["Token \"color.unused\" is never referenced"]);
    assert_eq!(report.results[3].messages[0].severity, Severity::Warn);
}

#[test]
fn test_run_level_messages_point_into_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("tokenlint.config.jsonc");
    fs::write(
        &path,
        r##"{
  "tokens": {
    "color": {
      "$type": "color",
      "unused": { "$value": "#00ff00" }
    }
  },
  "rules": { "design-token/no-unused-tokens": "error" },
  "cache": false
}"##,
    )
    .unwrap();
    let config = LinterConfig::from_file(&path).unwrap();
    let linter = Linter::new(config, vec![]).unwrap();

    let doc = SourceDocument::new("/a.css", "css", "a { margin: 0; }");
    let report = lint(&linter, &[&doc]);

    let run_result = &report.results[1];
    assert_eq!(run_result.document_id, path.display().to_string());
    assert_eq!(
        (run_result.messages[0].line, run_result.messages[0].column),
        (5, 7)
    );
}

/// A plugin rule that reuses a built-in rule's name.
struct Impostor {
    meta: RuleMeta,
}

impl RuleModule for Impostor {
    fn name(&self) -> &str {
        "design-token/colors"
    }

    fn meta(&self) -> &RuleMeta {
        &self.meta
    }
}

#[test]
fn test_builtin_and_plugin_name_collision_is_fatal() {
    let impostor = Impostor {
        meta: RuleMeta::new("Colors, again").with_events(&[EventKind::CssDeclaration]),
    };
    let plugin = Plugin::new("acme", vec![Box::new(impostor)]);
    let err = Linter::new(LinterConfig::new(), vec![plugin]).err().unwrap();

    match err {
        LinterError::Rule(RuleError::Duplicate {
            name,
            first,
            second,
        }) => {
            assert_eq!(name, "design-token/colors");
            assert_eq!(first, "built-in rules");
            assert_eq!(second, "plugin \"acme\"");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_plugin_name_collision_is_fatal() {
    let linted = Arc::new(AtomicUsize::new(0));
    let runs = Arc::new(AtomicUsize::new(0));
    let plugins = vec![
        Probe::plugin(&linted, &runs),
        Probe::plugin(&linted, &runs),
    ];
    let err = Linter::new(LinterConfig::new(), plugins).err().unwrap();

    assert_eq!(
        err.to_string(),
        "Rule error: Rule \"probe/count\" is declared by both plugin \"probe\" and plugin \"probe\""
    );
    assert_eq!(linted.load(Ordering::SeqCst), 0);
}

#[test]
fn test_fix_rewrites_deprecated_reference() {
    let temp_dir = TempDir::new().unwrap();
    let css = temp_dir.path().join("app.css");
    fs::write(&css, "a {\n  color: var(--color-old);\n}\n").unwrap();

    let mut config = LinterConfig::new()
        .with_tokens(tokens())
        .with_rule("design-system/deprecation", RuleLevel::Error);
    config.fix = true;
    config.cache_location = temp_dir
        .path()
        .join("cache.json")
        .to_string_lossy()
        .to_string();
    let linter = Linter::new(config, vec![]).unwrap();
    let doc = FileDocument::new(&css);

    let report = lint(&linter, &[&doc]);

    assert_eq!(
        fs::read_to_string(&css).unwrap(),
        "a {\n  color: var(--color-brand);\n}\n"
    );
    assert!(report.results[0].messages.is_empty());
}

#[test]
fn test_parse_failure_does_not_abort_siblings() {
    let config = LinterConfig::new()
        .with_tokens(tokens())
        .with_rule("design-token/colors", RuleLevel::Error);
    let linter = Linter::new(config, vec![]).unwrap();
    let broken = SourceDocument::new("/broken.css", "css", "a { color: #fff;");
    let fine = SourceDocument::new("/fine.css", "css", "a { color: #abcdef; }");
    let cache = CacheManager::new("unused.json").with_enabled(false);

    let report = linter.lint_with_cache(&[&broken, &fine], &[], &cache);

    assert_eq!(report.results[0].messages.len(), 1);
    assert_eq!(report.results[0].messages[0].rule_id, "parse-error");
    assert_eq!(report.results[1].messages.len(), 1);
    assert_eq!(report.results[1].messages[0].rule_id, "design-token/colors");
}

#[test]
fn test_theme_failure_is_fatal_with_context() {
    let config = LinterConfig::new().with_tokens(json!({
        "light": { "color": { "bg": { "$type": "color", "$value": "#fff" } } },
        "dark": { "color": { "bg": { "$type": "color", "$value": "nope" } } }
    }));
    let err = Linter::new(config, vec![]).err().unwrap();

    assert!(matches!(err, LinterError::Tokens(_)));
    assert!(
        err.to_string()
            .contains("Failed to parse tokens for theme \"dark\""),
        "{err}"
    );
}
