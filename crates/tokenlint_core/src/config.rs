//! Linter configuration.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use jsonc_parser::ParseOptions;
use jsonschema::Validator;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use tokenlint_cache::DEFAULT_CACHE_LOCATION;
use tokenlint_rule::Severity;

use crate::LinterError;

// Embed the schema
const SCHEMA_JSON: &str = include_str!("../../../schemas/v1/config.json");
static CONFIG_SCHEMA: OnceLock<Result<Validator, String>> = OnceLock::new();

static NO_OPTIONS: Value = Value::Null;

/// Configuration for the linter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinterConfig {
    /// Token tree, theme record, or list of allowed literals and patterns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens: Option<Value>,

    /// Rule name to severity, optionally with options.
    #[serde(default)]
    pub rules: BTreeMap<String, RuleSetting>,

    /// Plugin specifiers, in registration order.
    #[serde(default)]
    pub plugins: Vec<String>,

    /// Document patterns, consumed by document discovery.
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Ignore files, consumed by document discovery.
    #[serde(default)]
    pub ignore_files: Vec<String>,

    /// Whether to enable caching.
    #[serde(default = "default_cache")]
    pub cache: bool,

    /// Cache store path.
    #[serde(default = "default_cache_location")]
    pub cache_location: String,

    /// Whether to write fixes back to documents.
    #[serde(default)]
    pub fix: bool,

    /// Number of worker threads; the global pool is used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,

    /// Color space that resolved color tokens are converted into.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_space: Option<String>,

    /// Require every rule to carry a description.
    #[serde(default)]
    pub strict_plugins: bool,

    /// Path of the file this configuration was loaded from.
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Raw text of the configuration file, used to locate tokens.
    #[serde(skip)]
    pub source: Option<String>,
}

fn default_cache() -> bool {
    true
}

fn default_cache_location() -> String {
    DEFAULT_CACHE_LOCATION.to_string()
}

/// Rule severity as written in the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleLevel {
    Off,
    Warn,
    Error,
}

impl RuleLevel {
    /// Returns the message severity, or `None` when the rule is off.
    pub fn severity(self) -> Option<Severity> {
        match self {
            RuleLevel::Off => None,
            RuleLevel::Warn => Some(Severity::Warn),
            RuleLevel::Error => Some(Severity::Error),
        }
    }
}

/// Configuration for a single rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleSetting {
    /// `"warn"`
    Level(RuleLevel),
    /// `["warn", { ... }]`
    WithOptions(RuleLevel, Value),
}

impl RuleSetting {
    pub fn level(&self) -> RuleLevel {
        match self {
            RuleSetting::Level(level) | RuleSetting::WithOptions(level, _) => *level,
        }
    }

    /// Returns the rule options, `Null` when none were given.
    pub fn options(&self) -> &Value {
        match self {
            RuleSetting::Level(_) => &NO_OPTIONS,
            RuleSetting::WithOptions(_, options) => options,
        }
    }

    /// Returns whether the rule is enabled.
    pub fn is_enabled(&self) -> bool {
        self.level() != RuleLevel::Off
    }
}

impl From<RuleLevel> for RuleSetting {
    fn from(level: RuleLevel) -> Self {
        RuleSetting::Level(level)
    }
}

impl LinterConfig {
    /// Creates a new empty configuration.
    pub fn new() -> Self {
        Self {
            tokens: None,
            rules: BTreeMap::new(),
            plugins: Vec::new(),
            patterns: Vec::new(),
            ignore_files: Vec::new(),
            cache: true,
            cache_location: default_cache_location(),
            fix: false,
            concurrency: None,
            color_space: None,
            strict_plugins: false,
            config_path: None,
            source: None,
        }
    }

    /// Loads configuration from a file.
    ///
    /// Supports JSON with comments and trailing commas.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LinterError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            LinterError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let mut config = Self::from_jsonc(&content)?;
        config.config_path = Some(path.to_path_buf());
        config.source = Some(content);

        Ok(config)
    }

    /// Parses configuration from JSONC text with schema validation.
    pub fn from_jsonc(text: &str) -> Result<Self, LinterError> {
        let value = jsonc_parser::parse_to_serde_value(text, &ParseOptions::default())
            .map_err(|e| LinterError::config(format!("Invalid JSON: {}", e)))?
            .unwrap_or_else(|| Value::Object(serde_json::Map::new()));
        Self::from_value(value)
    }

    /// Builds configuration from a parsed value with schema validation.
    pub fn from_value(value: Value) -> Result<Self, LinterError> {
        let schema = CONFIG_SCHEMA
            .get_or_init(|| {
                let schema_json: Value = serde_json::from_str(SCHEMA_JSON)
                    .map_err(|e| format!("Invalid embedded config schema: {}", e))?;
                Validator::new(&schema_json)
                    .map_err(|e| format!("Invalid config schema compilation: {}", e))
            })
            .as_ref()
            .map_err(|e| LinterError::config(e.clone()))?;

        if let Err(e) = schema.validate(&value) {
            let path = e.instance_path().to_string();
            let at = if path.is_empty() { "/".to_string() } else { path };
            return Err(LinterError::config(format!(
                "Config validation failed: {} at {}",
                e, at
            )));
        }

        serde_json::from_value(value)
            .map_err(|e| LinterError::config(format!("Invalid config: {}", e)))
    }

    /// Returns the directory relative paths in this configuration resolve
    /// against.
    pub fn base_dir(&self) -> Option<&Path> {
        self.config_path.as_deref().and_then(Path::parent)
    }

    /// Returns the cache store path, resolved against [`base_dir`](Self::base_dir).
    pub fn cache_path(&self) -> PathBuf {
        let location = Path::new(&self.cache_location);
        match self.base_dir() {
            Some(base) if location.is_relative() => base.join(location),
            _ => location.to_path_buf(),
        }
    }

    /// Returns enabled rules with their settings.
    pub fn enabled_rules(&self) -> impl Iterator<Item = (&str, &RuleSetting)> {
        self.rules
            .iter()
            .filter(|(_, setting)| setting.is_enabled())
            .map(|(name, setting)| (name.as_str(), setting))
    }

    /// Sets a rule's setting.
    pub fn with_rule(mut self, name: impl Into<String>, setting: impl Into<RuleSetting>) -> Self {
        self.rules.insert(name.into(), setting.into());
        self
    }

    /// Sets the tokens value.
    pub fn with_tokens(mut self, tokens: Value) -> Self {
        self.tokens = Some(tokens);
        self
    }
}

impl Default for LinterConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn test_config_new() {
        let config = LinterConfig::new();
        assert!(config.rules.is_empty());
        assert!(config.tokens.is_none());
        assert!(config.cache);
        assert_eq!(config.cache_location, ".tokenlint-cache.json");
    }

    #[test]
    fn test_config_from_jsonc() {
        let text = r##"{
            // brand palette
            "tokens": { "color": { "$type": "color", "brand": { "$value": "#ff0000" } } },
            "rules": {
                "design-token/colors": "error",
                "design-token/spacing": "off",
                "design-token/no-unused-tokens": ["warn", { "ignore": ["color.brand"] }],
            },
            "cacheLocation": ".cache/tokenlint.json",
            "colorSpace": "hsl",
        }"##;

        let config = LinterConfig::from_jsonc(text).unwrap();
        assert_eq!(config.rules.len(), 3);
        assert_eq!(config.color_space.as_deref(), Some("hsl"));
        assert_eq!(
            config.rules["design-token/no-unused-tokens"],
            RuleSetting::WithOptions(RuleLevel::Warn, json!({ "ignore": ["color.brand"] }))
        );

        let enabled: Vec<&str> = config.enabled_rules().map(|(name, _)| name).collect();
        assert_eq!(
            enabled,
            vec!["design-token/colors", "design-token/no-unused-tokens"]
        );
    }

    #[test]
    fn test_rule_setting_accessors() {
        let plain = RuleSetting::Level(RuleLevel::Error);
        assert_eq!(plain.options(), &Value::Null);
        assert_eq!(plain.level().severity(), Some(Severity::Error));

        let off = RuleSetting::from(RuleLevel::Off);
        assert!(!off.is_enabled());
        assert_eq!(off.level().severity(), None);
    }

    #[test]
    fn test_from_file_sets_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokenlint.config.jsonc");
        fs::write(&path, r##"{ "tokens": ["#fff"] }"##).unwrap();

        let config = LinterConfig::from_file(&path).unwrap();
        assert_eq!(config.base_dir(), Some(dir.path()));
        assert_eq!(config.cache_path(), dir.path().join(".tokenlint-cache.json"));
        assert!(config.source.is_some());
    }

    #[rstest]
    #[case::unknown_property(r#"{ "rulez": {} }"#)]
    #[case::type_mismatch(r#"{ "cache": "yes" }"#)]
    #[case::invalid_severity(r#"{ "rules": { "design-token/colors": "fatal" } }"#)]
    #[case::unknown_color_space(r#"{ "colorSpace": "cmyk" }"#)]
    #[case::zero_concurrency(r#"{ "concurrency": 0 }"#)]
    fn test_config_validation_errors(#[case] text: &str) {
        let err = LinterConfig::from_jsonc(text).unwrap_err();
        assert!(
            err.to_string().contains("Config validation failed"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn test_invalid_jsonc() {
        let err = LinterConfig::from_jsonc("{ \"cache\": ").unwrap_err();
        assert!(err.to_string().contains("Invalid JSON"));
    }
}
