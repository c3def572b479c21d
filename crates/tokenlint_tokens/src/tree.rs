//! Shape detection for token documents.
//!
//! A configuration may hold either one token tree or a record of trees keyed
//! by theme name. The two are told apart by shape alone, which is ambiguous
//! for a single theme whose top-level groups contain only further groups:
//! such a tree is read as a theme record. [`is_theme_record`] is checked
//! before [`is_design_tokens`].

use serde_json::Value;

/// Key that holds a token's literal value.
pub const VALUE_KEY: &str = "$value";
/// Key that holds a JSON Pointer reference to another token.
pub const REF_KEY: &str = "$ref";
/// Prefix that marks metadata keys.
pub const META_PREFIX: char = '$';

/// Returns true if `key` is a metadata key.
pub fn is_meta_key(key: &str) -> bool {
    key.starts_with(META_PREFIX)
}

/// Returns true if `value` is a token node (carries `$value` or `$ref`).
pub fn is_token_node(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|obj| obj.contains_key(VALUE_KEY) || obj.contains_key(REF_KEY))
}

fn has_token_descendant(value: &Value) -> bool {
    let Some(obj) = value.as_object() else {
        return false;
    };
    obj.iter()
        .filter(|(key, _)| !is_meta_key(key))
        .any(|(_, child)| is_token_node(child) || has_token_descendant(child))
}

/// Returns true if `value` looks like a single token tree: a group (not a
/// token itself) with at least one token somewhere below it.
pub fn is_design_tokens(value: &Value) -> bool {
    value.is_object() && !is_token_node(value) && has_token_descendant(value)
}

/// Returns true if `value` looks like a record of token trees keyed by theme.
///
/// Every entry must be a token tree with no tokens directly beneath it, and
/// the root may not carry metadata. A single tree whose top-level groups
/// only hold nested groups also passes, and is then read as themes.
pub fn is_theme_record(value: &Value) -> bool {
    let Some(obj) = value.as_object() else {
        return false;
    };
    if obj.is_empty() || obj.keys().any(|key| is_meta_key(key)) {
        return false;
    }
    obj.values().all(|theme| {
        is_design_tokens(theme)
            && theme.as_object().is_some_and(|groups| {
                groups
                    .iter()
                    .filter(|(key, _)| !is_meta_key(key))
                    .all(|(_, child)| !is_token_node(child))
            })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_token_node() {
        assert!(is_token_node(&json!({ "$value": "#fff" })));
        assert!(is_token_node(&json!({ "$ref": "#/a" })));
        assert!(!is_token_node(&json!({ "$type": "color" })));
        assert!(!is_token_node(&json!("#fff")));
    }

    #[test]
    fn test_design_tokens() {
        let tree = json!({ "color": { "brand": { "$type": "color", "$value": "#f00" } } });
        assert!(is_design_tokens(&tree));
        assert!(!is_design_tokens(&json!({ "color": {} })));
        assert!(!is_design_tokens(&json!({ "$value": 1 })));
        assert!(!is_design_tokens(&json!([1, 2])));
    }

    #[test]
    fn test_theme_record() {
        let themes = json!({
            "light": { "color": { "bg": { "$type": "color", "$value": "#fff" } } },
            "dark": { "color": { "bg": { "$type": "color", "$value": "#000" } } }
        });
        assert!(is_theme_record(&themes));
    }

    #[test]
    fn test_single_tree_with_direct_tokens_is_not_theme_record() {
        let tree = json!({
            "color": { "bg": { "$type": "color", "$value": "#fff" } },
            "space": { "sm": { "$type": "dimension", "$value": "4px" } }
        });
        assert!(!is_theme_record(&tree));
        assert!(is_design_tokens(&tree));
    }

    #[test]
    fn test_known_ambiguity_reads_as_theme_record() {
        // A single tree whose top-level groups only contain groups.
        let tree = json!({
            "color": { "brand": { "primary": { "$type": "color", "$value": "#f00" } } }
        });
        assert!(is_theme_record(&tree));
    }

    #[test]
    fn test_root_metadata_blocks_theme_record() {
        let tree = json!({
            "$description": "tokens",
            "light": { "color": { "bg": { "$type": "color", "$value": "#fff" } } }
        });
        assert!(!is_theme_record(&tree));
    }
}
