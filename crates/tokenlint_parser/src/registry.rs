//! Lookup of parsing strategies by document type.

use tokenlint_ast::EventSink;
use tracing::debug;

use crate::{CssParser, ParseError, Parser, ScriptParser, SvelteParser, VueParser};

/// The set of strategies available to a run.
///
/// A document type is resolved against strategies newest first, so a
/// registered strategy overrides a built-in one for the same extension.
pub struct ParserRegistry {
    parsers: Vec<Box<dyn Parser>>,
}

impl ParserRegistry {
    /// Creates a registry holding every built-in strategy.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(CssParser::css()));
        registry.register(Box::new(CssParser::scss()));
        registry.register(Box::new(CssParser::sass()));
        registry.register(Box::new(ScriptParser::javascript()));
        registry.register(Box::new(ScriptParser::typescript()));
        registry.register(Box::new(VueParser));
        registry.register(Box::new(SvelteParser));
        registry
    }

    /// Creates a registry with no strategies.
    pub fn empty() -> Self {
        Self {
            parsers: Vec::new(),
        }
    }

    pub fn register(&mut self, parser: Box<dyn Parser>) {
        debug!("Registered parser '{}'", parser.name());
        self.parsers.push(parser);
    }

    /// Returns the strategy for a document type (a file extension).
    pub fn get(&self, kind: &str) -> Option<&dyn Parser> {
        self.parsers
            .iter()
            .rev()
            .find(|p| p.can_parse(kind))
            .map(|p| &**p)
    }

    /// Returns true if some strategy handles `kind`.
    pub fn supports(&self, kind: &str) -> bool {
        self.get(kind).is_some()
    }

    /// Parses `source` with the strategy for `kind`.
    ///
    /// Returns `Ok(false)` without touching the sink when no strategy
    /// handles `kind`.
    pub fn parse(
        &self,
        kind: &str,
        source: &str,
        sink: &mut dyn EventSink,
    ) -> Result<bool, ParseError> {
        let Some(parser) = self.get(kind) else {
            return Ok(false);
        };
        parser.parse(source, sink)?;
        Ok(true)
    }

    /// Every extension some strategy handles, lowercased and deduplicated.
    pub fn supported_kinds(&self) -> Vec<String> {
        let mut kinds: Vec<String> = self
            .parsers
            .iter()
            .flat_map(|p| p.extensions().iter().map(|e| e.to_ascii_lowercase()))
            .collect();
        kinds.sort();
        kinds.dedup();
        kinds
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.parsers.iter().map(|p| p.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use tokenlint_ast::RecordingSink;

    #[rstest]
    #[case("css", "css")]
    #[case("SCSS", "scss")]
    #[case("less", "scss")]
    #[case("sass", "sass")]
    #[case("tsx", "script")]
    #[case("ts", "typescript")]
    #[case("vue", "vue")]
    #[case("svelte", "svelte")]
    fn test_builtin_lookup(#[case] kind: &str, #[case] expected: &str) {
        let registry = ParserRegistry::new();
        assert_eq!(registry.get(kind).map(|p| p.name()), Some(expected));
    }

    #[test]
    fn test_unsupported_kind_is_skipped() {
        let registry = ParserRegistry::new();
        let mut sink = RecordingSink::default();
        assert!(!registry.parse("md", "# title", &mut sink).unwrap());
        assert!(sink.events.is_empty());
        assert!(!registry.supports("md"));
    }

    #[test]
    fn test_later_registration_wins() {
        struct Quiet;
        impl Parser for Quiet {
            fn name(&self) -> &str {
                "quiet"
            }
            fn extensions(&self) -> &[&str] {
                &["css", "md"]
            }
            fn parse(&self, _: &str, _: &mut dyn EventSink) -> Result<(), ParseError> {
                Ok(())
            }
        }

        let mut registry = ParserRegistry::new();
        registry.register(Box::new(Quiet));
        assert_eq!(registry.get("css").map(|p| p.name()), Some("quiet"));
        assert!(registry.supported_kinds().contains(&"md".to_string()));

        let mut sink = RecordingSink::default();
        assert!(registry.parse("css", "a { color: red }", &mut sink).unwrap());
        assert!(sink.events.is_empty());
    }
}
