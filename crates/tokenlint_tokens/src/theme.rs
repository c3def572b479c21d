//! Loading the `tokens` configuration value.

use std::collections::HashSet;

use serde_json::{Map, Value};
use tracing::debug;

use crate::alias::pointer_push;
use crate::error::TokenError;
use crate::flatten::{FlattenOptions, flatten_tree, flatten_tree_at, to_tree};
use crate::pattern::AllowList;
use crate::token::FlattenedToken;
use crate::tree::{is_design_tokens, is_theme_record};

/// Name given to a bare token tree.
pub const DEFAULT_THEME: &str = "default";

/// The flattened tokens of one theme.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: String,
    pub tokens: Vec<FlattenedToken>,
}

/// Flattened tokens for every theme, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenSet {
    themes: Vec<Theme>,
}

impl TokenSet {
    /// Loads a token tree or theme record.
    ///
    /// Every theme is parsed; the first failure is returned, wrapped with
    /// its theme name.
    pub fn from_value(value: &Value, options: &FlattenOptions<'_>) -> Result<Self, TokenError> {
        let themes = Self::parse_themes(value, options)?
            .into_iter()
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { themes })
    }

    /// Parses each theme independently.
    ///
    /// The outer error is for values that are neither a tree nor a theme
    /// record; each inner result is one theme.
    pub fn parse_themes(
        value: &Value,
        options: &FlattenOptions<'_>,
    ) -> Result<Vec<Result<Theme, TokenError>>, TokenError> {
        if is_theme_record(value) {
            let Some(record) = value.as_object() else {
                return Ok(Vec::new());
            };
            debug!("Loading {} themes", record.len());
            return Ok(record
                .iter()
                .map(|(name, tree)| {
                    flatten_tree_at(tree, &pointer_push("#", name), options)
                        .map(|tokens| Theme {
                            name: name.clone(),
                            tokens,
                        })
                        .map_err(|e| e.in_theme(name))
                })
                .collect());
        }
        if is_design_tokens(value) {
            let theme = flatten_tree(value, options).map(|tokens| Theme {
                name: DEFAULT_THEME.to_string(),
                tokens,
            });
            return Ok(vec![theme]);
        }
        if value.as_object().is_some_and(Map::is_empty) {
            return Ok(Vec::new());
        }
        Err(TokenError::invalid_node(
            "#",
            "tokens must be a token tree, a theme record or a list of patterns",
        ))
    }

    pub fn themes(&self) -> &[Theme] {
        &self.themes
    }

    /// Iterates every token of every theme.
    pub fn iter(&self) -> impl Iterator<Item = &FlattenedToken> {
        self.themes.iter().flat_map(|t| t.tokens.iter())
    }

    /// Returns the first token at `path`, searching themes in order.
    pub fn get(&self, path: &str) -> Option<&FlattenedToken> {
        self.iter().find(|t| t.path == path)
    }

    /// Distinct token paths across all themes, in first-seen order.
    pub fn paths(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.iter()
            .map(|t| t.path.as_str())
            .filter(|p| seen.insert(*p))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.iter().all(|t| t.tokens.is_empty())
    }

    /// Rebuilds the source value: a bare tree for a lone default theme,
    /// otherwise a theme record.
    pub fn to_value(&self) -> Value {
        if let [theme] = self.themes.as_slice()
            && theme.name == DEFAULT_THEME
        {
            return to_tree(&theme.tokens);
        }
        Value::Object(
            self.themes
                .iter()
                .map(|t| (t.name.clone(), to_tree(&t.tokens)))
                .collect(),
        )
    }
}

/// The resolved `tokens` configuration.
#[derive(Debug, Clone)]
pub enum DesignTokens {
    /// A token tree or theme record.
    Tokens(TokenSet),
    /// A list of allowed literals and patterns.
    Patterns(AllowList),
}

impl Default for DesignTokens {
    fn default() -> Self {
        Self::Tokens(TokenSet::default())
    }
}

impl DesignTokens {
    /// Loads `tokens`; a missing value yields an empty token set.
    pub fn from_value(
        value: Option<&Value>,
        options: &FlattenOptions<'_>,
    ) -> Result<Self, TokenError> {
        match value {
            None | Some(Value::Null) => Ok(Self::default()),
            Some(Value::Array(items)) => {
                let raw = items
                    .iter()
                    .map(|item| {
                        item.as_str().ok_or_else(|| TokenError::Pattern {
                            pattern: item.to_string(),
                            message: "patterns must be strings".to_string(),
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                AllowList::parse(&raw).map(Self::Patterns)
            }
            Some(value) => TokenSet::from_value(value, options).map(Self::Tokens),
        }
    }

    /// Returns the token set, if tokens were declared as a tree.
    pub fn token_set(&self) -> Option<&TokenSet> {
        match self {
            Self::Tokens(set) => Some(set),
            Self::Patterns(_) => None,
        }
    }

    /// Returns the allow-list, if tokens were declared as patterns.
    pub fn allow_list(&self) -> Option<&AllowList> {
        match self {
            Self::Tokens(_) => None,
            Self::Patterns(list) => Some(list),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn options() -> FlattenOptions<'static> {
        FlattenOptions::default()
    }

    #[test]
    fn test_bare_tree_is_default_theme() {
        let set = TokenSet::from_value(
            &json!({
                "color": { "bg": { "$type": "color", "$value": "#fff" } },
                "space": { "sm": { "$type": "dimension", "$value": 4 } }
            }),
            &options(),
        )
        .unwrap();
        assert_eq!(set.themes().len(), 1);
        assert_eq!(set.themes()[0].name, DEFAULT_THEME);
        assert_eq!(set.get("color.bg").unwrap().pointer, "#/color/bg");
    }

    #[test]
    fn test_theme_record_pointers_include_theme() {
        let set = TokenSet::from_value(
            &json!({
                "light": { "color": { "bg": { "$type": "color", "$value": "#fff" } } },
                "dark": { "color": { "bg": { "$type": "color", "$value": "#000" } } }
            }),
            &options(),
        )
        .unwrap();
        let dark = set.themes().iter().find(|t| t.name == "dark").unwrap();
        assert_eq!(dark.tokens[0].pointer, "#/dark/color/bg");
        assert_eq!(set.paths(), vec!["color.bg"]);
        assert_eq!(set.iter().count(), 2);
    }

    #[test]
    fn test_theme_failure_is_wrapped_and_isolated() {
        let value = json!({
            "light": { "color": { "bg": { "$type": "color", "$value": "#fff" } } },
            "dark": { "color": { "bg": { "$type": "color", "$value": "nope" } } }
        });
        let results = TokenSet::parse_themes(&value, &options()).unwrap();
        assert!(results[0].is_ok());
        let err = results[1].as_ref().unwrap_err();
        assert!(
            err.to_string()
                .starts_with("Failed to parse tokens for theme \"dark\": "),
            "{err}"
        );

        let err = TokenSet::from_value(&value, &options()).unwrap_err();
        assert!(matches!(err, TokenError::Theme { ref theme, .. } if theme == "dark"));
    }

    #[test]
    fn test_theme_cycle_stays_distinguishable() {
        let value = json!({
            "light": { "color": {
                "a": { "$type": "color", "$value": "{color.b}" },
                "b": { "$type": "color", "$value": "{color.a}" }
            } }
        });
        let err = TokenSet::from_value(&value, &options()).unwrap_err();
        assert!(err.is_cycle());
    }

    #[test]
    fn test_to_value_round_trip() {
        let value = json!({
            "light": { "color": { "bg": { "$type": "color", "$value": "#fff" } } },
            "dark": { "color": { "bg": { "$type": "color", "$value": "#000" } } }
        });
        let set = TokenSet::from_value(&value, &options()).unwrap();
        let again = TokenSet::from_value(&set.to_value(), &options()).unwrap();
        assert_eq!(set, again);
    }

    #[test]
    fn test_design_tokens_variants() {
        let tokens = DesignTokens::from_value(Some(&json!(["#fff", "/^#0/"])), &options()).unwrap();
        assert!(tokens.allow_list().unwrap().allows("#000"));

        let empty = DesignTokens::from_value(None, &options()).unwrap();
        assert!(empty.token_set().unwrap().is_empty());

        assert!(DesignTokens::from_value(Some(&json!([1])), &options()).is_err());
        assert!(DesignTokens::from_value(Some(&json!("tokens")), &options()).is_err());
    }
}
