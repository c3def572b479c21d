//! Core linter engine.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use jsonschema::Validator;
use parking_lot::Mutex;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use tokenlint_ast::{Document, LineIndex, Position};
use tokenlint_cache::{CacheError, CacheManager};
use tokenlint_parser::ParserRegistry;
use tokenlint_rule::{
    DocumentInfo, Dispatcher, LintMessage, LintResult, Plugin, Reporter, RuleContext,
    RuleError, RuleModule, RunContext, RunHandler, RuleRegistry, Severity,
};
use tokenlint_tokens::{
    ColorSpace, DesignTokens, FlattenOptions, JsoncLocator, LocationResolver, TokenWarning,
};

use crate::references::{Reference, ReferenceIndex, scan_references};
use crate::rules::builtin_rules;
use crate::{LinterConfig, LinterError};

/// Id of the result that collects run-level messages when the
/// configuration was not loaded from a file.
pub const RUN_RESULT_ID: &str = "tokenlint.config";

/// A rule enabled for this run.
#[derive(Debug)]
struct ActiveRule {
    name: String,
    severity: Severity,
    options: Value,
}

/// Output of one lint run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LintReport {
    /// One result per document, in input order, followed by the run-level
    /// result when it has messages.
    pub results: Vec<LintResult>,
    /// Ignore files from discovery and configuration, sorted and deduplicated.
    pub ignore_files: Vec<String>,
    /// Set when the run could not do anything useful.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl LintReport {
    pub fn error_count(&self) -> usize {
        self.results.iter().map(LintResult::error_count).sum()
    }

    pub fn warning_count(&self) -> usize {
        self.results.iter().map(LintResult::warning_count).sum()
    }

    pub fn has_errors(&self) -> bool {
        self.results.iter().any(LintResult::has_errors)
    }
}

/// The core linter engine.
///
/// Holds everything resolved once per invocation: the flattened tokens, the
/// rule registry, and the rules the configuration enables. Documents are
/// linted in parallel; run-level hooks fire after every document is done.
pub struct Linter {
    config: LinterConfig,
    tokens: DesignTokens,
    token_warnings: Vec<TokenWarning>,
    registry: RuleRegistry,
    /// Enabled rules, in registration order.
    active: Vec<ActiveRule>,
    parsers: ParserRegistry,
    pool: Option<ThreadPool>,
}

impl Linter {
    /// Creates a linter from a configuration and the plugins it names.
    ///
    /// Plugins named in `config.plugins` are registered in that order; any
    /// other supplied plugin follows in the order given. Token, plugin and
    /// rule errors are fatal here, before any document is read.
    pub fn new(config: LinterConfig, plugins: Vec<Plugin>) -> Result<Self, LinterError> {
        let (tokens, token_warnings) = Self::load_tokens(&config)?;
        let registry = Self::build_registry(&config, plugins)?;
        let active = Self::resolve_active(&config, &registry)?;

        let pool = match config.concurrency {
            Some(threads) => Some(
                ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| {
                        LinterError::config(format!("Failed to build thread pool: {}", e))
                    })?,
            ),
            None => None,
        };

        debug!(
            "Linter ready: {} rules registered, {} enabled",
            registry.len(),
            active.len()
        );

        Ok(Self {
            config,
            tokens,
            token_warnings,
            registry,
            active,
            parsers: ParserRegistry::new(),
            pool,
        })
    }

    fn load_tokens(
        config: &LinterConfig,
    ) -> Result<(DesignTokens, Vec<TokenWarning>), LinterError> {
        let color_space = match config.color_space.as_deref() {
            Some(name) => {
                let space: ColorSpace = name
                    .parse()
                    .map_err(|e| LinterError::config(format!("Unknown color space: {}", e)))?;
                if !space.is_convertible() {
                    return Err(LinterError::config(format!(
                        "Color space \"{}\" is not supported for normalization",
                        space
                    )));
                }
                Some(space)
            }
            None => None,
        };

        let locator = config
            .source
            .as_deref()
            .and_then(|source| JsoncLocator::new(source, &["tokens"]));
        let warnings = Mutex::new(Vec::new());
        let on_warn = |warning: &TokenWarning| {
            warn!("Token {}", warning);
            warnings.lock().push(warning.clone());
        };
        let options = FlattenOptions {
            color_space,
            locator: locator
                .as_ref()
                .map(|l| l as &(dyn LocationResolver + Sync)),
            on_warn: Some(&on_warn),
        };

        let tokens = DesignTokens::from_value(config.tokens.as_ref(), &options)?;
        if let Some(set) = tokens.token_set() {
            info!("Loaded {} tokens", set.paths().len());
        }
        Ok((tokens, warnings.into_inner()))
    }

    fn build_registry(
        config: &LinterConfig,
        plugins: Vec<Plugin>,
    ) -> Result<RuleRegistry, LinterError> {
        let mut registry = RuleRegistry::new().strict(config.strict_plugins);
        for rule in builtin_rules() {
            registry.register_builtin(rule)?;
        }

        let mut remaining: Vec<Option<Plugin>> = plugins.into_iter().map(Some).collect();
        for name in &config.plugins {
            let plugin = remaining
                .iter_mut()
                .find(|p| p.as_ref().is_some_and(|p| &p.name == name))
                .and_then(Option::take)
                .ok_or_else(|| RuleError::MissingPlugin(name.clone()))?;
            debug!("Registering plugin '{}'", name);
            registry.register_plugin(plugin)?;
        }
        for plugin in remaining.into_iter().flatten() {
            debug!("Registering plugin '{}'", plugin.name);
            registry.register_plugin(plugin)?;
        }

        Ok(registry)
    }

    fn resolve_active(
        config: &LinterConfig,
        registry: &RuleRegistry,
    ) -> Result<Vec<ActiveRule>, LinterError> {
        if let Some(unknown) = config
            .rules
            .keys()
            .find(|name| registry.get(name).is_none())
        {
            return Err(RuleError::UnknownRule(unknown.clone()).into());
        }

        let mut active = Vec::new();
        for module in registry.iter() {
            let Some(setting) = config.rules.get(module.name()) else {
                continue;
            };
            let Some(severity) = setting.level().severity() else {
                continue;
            };
            let options = setting.options();
            validate_options(module, options)?;
            active.push(ActiveRule {
                name: module.name().to_string(),
                severity,
                options: options.clone(),
            });
        }
        Ok(active)
    }

    /// Returns the configuration.
    pub fn config(&self) -> &LinterConfig {
        &self.config
    }

    /// Returns the loaded tokens.
    pub fn tokens(&self) -> &DesignTokens {
        &self.tokens
    }

    /// Returns warnings raised while loading tokens.
    pub fn token_warnings(&self) -> &[TokenWarning] {
        &self.token_warnings
    }

    /// Returns the rule registry.
    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Names of the enabled rules, in registration order.
    pub fn active_rules(&self) -> Vec<&str> {
        self.active.iter().map(|r| r.name.as_str()).collect()
    }

    /// Lints `documents` with the cache described by the configuration.
    ///
    /// The store is opened, stale keys are pruned, and it is saved once
    /// after every document has finished.
    pub fn lint_documents(
        &self,
        documents: &[&dyn Document],
        ignore_files: &[String],
    ) -> LintReport {
        let cache = CacheManager::open(self.config.cache_path(), self.config.cache)
            .with_fix(self.config.fix);
        let report = self.lint_with_cache(documents, ignore_files, &cache);

        cache.prune(documents.iter().map(|d| d.id()));
        if let Err(e) = cache.save() {
            warn!("Failed to save cache: {}", e);
        }
        report
    }

    /// Lints `documents` through `cache` without touching the store on disk.
    pub fn lint_with_cache(
        &self,
        documents: &[&dyn Document],
        ignore_files: &[String],
        cache: &CacheManager,
    ) -> LintReport {
        let base = self.config.base_dir();
        let mut ignore: Vec<String> = ignore_files
            .iter()
            .map(|name| normalize_ignore_file(None, name))
            .chain(
                self.config
                    .ignore_files
                    .iter()
                    .map(|name| normalize_ignore_file(base, name)),
            )
            .collect();
        ignore.sort();
        ignore.dedup();

        let warning = if self.active.is_empty() {
            Some("No rules are enabled".to_string())
        } else if documents.is_empty() {
            Some("No documents to lint".to_string())
        } else {
            None
        };

        let hooks = self.run_hooks();
        let track = !hooks.is_empty();

        let lint_all = || -> Vec<(LintResult, Vec<Reference>)> {
            documents
                .par_iter()
                .map(|document| self.lint_document(*document, cache, track))
                .collect()
        };
        let outcomes = match &self.pool {
            Some(pool) => pool.install(lint_all),
            None => lint_all(),
        };

        let mut results = Vec::with_capacity(outcomes.len() + 1);
        let mut references = Vec::new();
        for (result, refs) in outcomes {
            results.push(result);
            references.extend(refs);
        }

        if track {
            let usage = ReferenceIndex::new(&self.tokens, &references);
            let ids: Vec<String> = documents.iter().map(|d| d.id().to_string()).collect();
            let run = RunContext {
                tokens: &self.tokens,
                usage: &usage,
                documents: &ids,
            };

            let mut messages = Vec::new();
            for (rule, hook) in hooks {
                let mut reporter = Reporter::new(&rule.name, rule.severity, None, &mut messages);
                hook(&run, &mut reporter);
            }
            if !messages.is_empty() {
                let id = self
                    .config
                    .config_path
                    .as_ref()
                    .map_or_else(|| RUN_RESULT_ID.to_string(), |p| p.display().to_string());
                results.push(LintResult::new(id, messages));
            }
        }

        info!(
            "Linted {} documents ({} errors, {} warnings)",
            documents.len(),
            results.iter().map(LintResult::error_count).sum::<usize>(),
            results.iter().map(LintResult::warning_count).sum::<usize>()
        );

        LintReport {
            results,
            ignore_files: ignore,
            warning,
        }
    }

    /// Creates the run-level hooks of the enabled rules, in order.
    fn run_hooks(&self) -> Vec<(&ActiveRule, RunHandler<'_>)> {
        self.active
            .iter()
            .filter_map(|rule| {
                let module = self.registry.get(&rule.name)?;
                if !module.meta().capabilities.run {
                    return None;
                }
                let ctx = RuleContext {
                    rule_id: module.name(),
                    severity: rule.severity,
                    options: &rule.options,
                    tokens: &self.tokens,
                    document: None,
                };
                Some((rule, module.create_run(&ctx)?))
            })
            .collect()
    }

    /// Lints one document through the cache, returning its result and, when
    /// `track` is set, the token references in its current text.
    fn lint_document(
        &self,
        document: &dyn Document,
        cache: &CacheManager,
        track: bool,
    ) -> (LintResult, Vec<Reference>) {
        let id = document.id();
        let references = RefCell::new(None);
        let processed = cache.process_document(document, |text| {
            if track {
                references.replace(Some(scan_references(text)));
            }
            LintResult::new(id, self.lint_text(id, document.kind(), text))
        });

        let result = match processed {
            Ok(result) => result,
            Err(e) => {
                warn!("{}", e);
                let rule_id = match &e {
                    CacheError::Read { .. } => "read-error",
                    CacheError::Write { .. } => "fix-error",
                    _ => "internal-error",
                };
                let message = LintMessage::new(rule_id, e.to_string(), Position::default());
                LintResult::new(id, vec![message])
            }
        };

        let references = match references.into_inner() {
            Some(refs) => refs,
            // Cache hit: the text was not read for linting.
            None if track => match document.text() {
                Ok(text) => scan_references(&text),
                Err(e) => {
                    debug!("Cannot read {} for references: {}", id, e);
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        (result, references)
    }

    /// Runs the enabled rules over one document's text.
    pub fn lint_text(&self, id: &str, kind: &str, text: &str) -> Vec<LintMessage> {
        let mut dispatcher = Dispatcher::new(text);
        for rule in &self.active {
            let Some(module) = self.registry.get(&rule.name) else {
                continue;
            };
            let ctx = RuleContext {
                rule_id: module.name(),
                severity: rule.severity,
                options: &rule.options,
                tokens: &self.tokens,
                document: Some(DocumentInfo {
                    id,
                    kind,
                    source: text,
                }),
            };
            dispatcher.add(module, rule.severity, module.create(&ctx));
        }
        if dispatcher.is_idle() {
            return Vec::new();
        }

        match self.parsers.parse(kind, text, &mut dispatcher) {
            Ok(true) => dispatcher.into_messages(),
            Ok(false) => {
                debug!("Skipping {}: unsupported document type '{}'", id, kind);
                Vec::new()
            }
            Err(e) => {
                debug!("Failed to parse {}: {}", id, e);
                let position = e
                    .offset()
                    .map(|offset| LineIndex::new(text).position(offset as u32))
                    .unwrap_or_default();
                vec![LintMessage::new("parse-error", e.to_string(), position)]
            }
        }
    }
}

/// Checks a rule's options against its schema.
fn validate_options(module: &dyn RuleModule, options: &Value) -> Result<(), RuleError> {
    let Some(schema) = &module.meta().schema else {
        return Ok(());
    };
    if options.is_null() {
        return Ok(());
    }
    let validator = Validator::new(schema)
        .map_err(|e| RuleError::invalid_options(module.name(), format!("invalid schema: {}", e)))?;
    validator.validate(options).map_err(|e| {
        let path = e.instance_path().to_string();
        let at = if path.is_empty() { "/".to_string() } else { path };
        RuleError::invalid_options(module.name(), format!("{} at {}", e, at))
    })
}

/// Puts an ignore file in one form so the same file named twice dedups.
///
/// Relative config entries are resolved against `base`; anything that exists
/// on disk is canonicalized.
fn normalize_ignore_file(base: Option<&Path>, name: &str) -> String {
    let path = match base {
        Some(base) if Path::new(name).is_relative() && !base.as_os_str().is_empty() => {
            base.join(name)
        }
        _ => PathBuf::from(name),
    };
    path.canonicalize().unwrap_or(path).display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RuleLevel, RuleSetting};
    use crate::rules::{Colors, NoUnusedTokens};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::fs;
    use tokenlint_ast::{EventKind, SourceDocument};
    use tokenlint_rule::RuleMeta;

    fn config() -> LinterConfig {
        LinterConfig::new()
            .with_tokens(json!({
                "color": {
                    "$type": "color",
                    "brand": { "$value": "#ff0000" },
                    "unused": { "$value": "#00ff00" }
                }
            }))
            .with_rule(Colors::NAME, RuleLevel::Error)
            .with_rule(NoUnusedTokens::NAME, RuleLevel::Warn)
    }

    struct Custom {
        name: &'static str,
        meta: RuleMeta,
    }

    impl Custom {
        fn boxed(name: &'static str) -> Box<dyn RuleModule> {
            Box::new(Self {
                name,
                meta: RuleMeta::new("custom").with_events(&[EventKind::StringLiteral]),
            })
        }
    }

    impl RuleModule for Custom {
        fn name(&self) -> &str {
            self.name
        }

        fn meta(&self) -> &RuleMeta {
            &self.meta
        }
    }

    #[test]
    fn test_active_rules_follow_registration_order() {
        let config = config().with_rule("design-token/spacing", RuleLevel::Off);
        let linter = Linter::new(config, vec![]).unwrap();
        assert_eq!(
            linter.active_rules(),
            vec!["design-token/colors", "design-token/no-unused-tokens"]
        );
    }

    #[test]
    fn test_unknown_rule_is_fatal() {
        let config = config().with_rule("design-token/nope", RuleLevel::Warn);
        let err = Linter::new(config, vec![]).err().unwrap();
        assert_eq!(err.to_string(), "Rule error: Unknown rule \"design-token/nope\"");
    }

    #[test]
    fn test_missing_plugin_is_fatal() {
        let mut config = config();
        config.plugins = vec!["tokenlint-plugin-acme".into()];
        let err = Linter::new(config, vec![]).err().unwrap();
        assert!(matches!(err, LinterError::Rule(RuleError::MissingPlugin(_))));
    }

    #[test]
    fn test_plugins_register_in_configured_order() {
        let mut config = config();
        config.plugins = vec!["b".into(), "a".into()];
        let plugins = vec![
            Plugin::new("a", vec![Custom::boxed("a/one")]),
            Plugin::new("extra", vec![Custom::boxed("extra/one")]),
            Plugin::new("b", vec![Custom::boxed("b/one")]),
        ];
        let linter = Linter::new(config, plugins).unwrap();
        let names = linter.registry().names();
        assert_eq!(&names[names.len() - 3..], &["b/one", "a/one", "extra/one"]);
        assert_eq!(linter.registry().origin("a/one"), Some("plugin \"a\""));
    }

    #[test]
    fn test_invalid_options_are_fatal() {
        let config = config().with_rule(
            NoUnusedTokens::NAME,
            RuleSetting::WithOptions(RuleLevel::Warn, json!({ "ignore": "color" })),
        );
        let err = Linter::new(config, vec![]).err().unwrap();
        assert!(matches!(err, LinterError::Rule(RuleError::InvalidOptions { .. })));
    }

    #[test]
    fn test_unsupported_color_space() {
        let mut config = config();
        config.color_space = Some("oklch".into());
        let err = Linter::new(config, vec![]).err().unwrap();
        assert!(err.to_string().contains("not supported"), "{err}");
    }

    #[test]
    fn test_parse_error_becomes_single_message() {
        let linter = Linter::new(config(), vec![]).unwrap();
        let messages = linter.lint_text("/a.css", "css", "a { color: red;\n b { color: #fff");

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].rule_id, "parse-error");
        assert_eq!(messages[0].severity, Severity::Error);
    }

    #[test]
    fn test_unsupported_document_type_has_no_messages() {
        let linter = Linter::new(config(), vec![]).unwrap();
        assert!(linter.lint_text("/a.md", "md", "# color: red").is_empty());
    }

    #[test]
    fn test_run_level_result_and_ignore_files() {
        let mut config = config();
        config.ignore_files = vec![".gitignore".into()];
        let linter = Linter::new(config, vec![]).unwrap();
        let doc = SourceDocument::new("/a.css", "css", "a { color: var(--color-brand); }");
        let cache = CacheManager::new("unused.json").with_enabled(false);

        let report = linter.lint_with_cache(
            &[&doc],
            &[".tokenlintignore".into(), ".gitignore".into()],
            &cache,
        );

        assert_eq!(report.ignore_files, vec![".gitignore", ".tokenlintignore"]);
        assert_eq!(report.results.len(), 2);
        assert!(report.results[0].messages.is_empty());
        assert_eq!(report.results[1].document_id, RUN_RESULT_ID);
        assert_eq!(
            report.results[1].messages[0].message,
            "Token \"color.unused\" is never referenced"
        );
        assert!(report.warning.is_none());
    }

    #[test]
    fn test_same_ignore_file_from_discovery_and_config_is_listed_once() {
        let temp = tempfile::TempDir::new().unwrap();
        fs::write(temp.path().join(".tokenlintignore"), "dist/\n").unwrap();
        let mut config = config();
        config.config_path = Some(temp.path().join("tokenlint.config.json"));
        config.ignore_files = vec![".tokenlintignore".into()];
        let linter = Linter::new(config, vec![]).unwrap();
        let doc = SourceDocument::new("/a.css", "css", "a { color: var(--color-brand); }");
        let cache = CacheManager::new("unused.json").with_enabled(false);
        let absolute = temp
            .path()
            .join(".tokenlintignore")
            .canonicalize()
            .unwrap()
            .display()
            .to_string();

        let report = linter.lint_with_cache(&[&doc], &[absolute.clone()], &cache);

        assert_eq!(report.ignore_files, vec![absolute]);
    }

    #[test]
    fn test_warning_when_nothing_enabled() {
        let linter = Linter::new(LinterConfig::new(), vec![]).unwrap();
        let cache = CacheManager::new("unused.json").with_enabled(false);
        let report = linter.lint_with_cache(&[], &[], &cache);
        assert_eq!(report.warning.as_deref(), Some("No rules are enabled"));
        assert!(report.results.is_empty());
    }
}
