//! Token references across the documents of a run.

use std::collections::{HashMap, HashSet};

use tokenlint_rule::TokenUsage;
use tokenlint_tokens::{DesignTokens, css_var_name};

use crate::rules::literals::{alias_references, var_references};

/// A token reference found in a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Reference {
    /// `var(--color-brand)`
    CssVar(String),
    /// `{color.brand}`
    Alias(String),
}

/// Collects the token references in a document's text.
pub fn scan_references(text: &str) -> Vec<Reference> {
    let vars = var_references(text)
        .into_iter()
        .map(|r| Reference::CssVar(r.name.to_string()));
    let aliases = alias_references(text)
        .into_iter()
        .map(|r| Reference::Alias(r.path.to_string()));
    vars.chain(aliases).collect()
}

/// How often each token path is referenced.
///
/// A referenced alias also counts as a reference to the token it points
/// at, transitively.
#[derive(Debug, Default)]
pub struct ReferenceIndex {
    counts: HashMap<String, usize>,
}

impl ReferenceIndex {
    /// Builds the index for `tokens` from every document's references.
    pub fn new<'r>(
        tokens: &DesignTokens,
        references: impl IntoIterator<Item = &'r Reference>,
    ) -> Self {
        let Some(set) = tokens.token_set() else {
            return Self::default();
        };

        let by_var: HashMap<String, &str> = set
            .paths()
            .into_iter()
            .map(|path| (css_var_name(path), path))
            .collect();
        let alias_of: HashMap<&str, &str> = set
            .iter()
            .filter_map(|t| Some((t.path.as_str(), t.alias_of.as_deref()?)))
            .collect();

        let mut counts: HashMap<String, usize> = HashMap::new();
        for reference in references {
            let path = match reference {
                Reference::CssVar(name) => match by_var.get(name.as_str()) {
                    Some(path) => *path,
                    None => continue,
                },
                Reference::Alias(path) => path.as_str(),
            };

            let mut seen = HashSet::new();
            let mut current = Some(path);
            while let Some(path) = current
                && seen.insert(path)
            {
                *counts.entry(path.to_string()).or_default() += 1;
                current = alias_of.get(path).copied();
            }
        }

        Self { counts }
    }

    /// Number of distinct referenced paths.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl TokenUsage for ReferenceIndex {
    fn is_referenced(&self, path: &str) -> bool {
        self.reference_count(path) > 0
    }

    fn reference_count(&self, path: &str) -> usize {
        self.counts.get(path).copied().unwrap_or(0)
    }
}
