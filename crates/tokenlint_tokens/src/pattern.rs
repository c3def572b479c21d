//! Allow-patterns for projects that list permitted values instead of tokens.

use regex::{Regex, RegexBuilder};

use crate::error::TokenError;

/// A single allowed value: an exact literal or a `/regex/` with optional
/// `i` flag.
#[derive(Debug, Clone)]
pub enum AllowPattern {
    Literal(String),
    Regex(Regex),
}

impl AllowPattern {
    /// Parses a pattern string.
    pub fn parse(raw: &str) -> Result<Self, TokenError> {
        let Some(body) = raw.strip_prefix('/') else {
            return Ok(Self::Literal(raw.to_string()));
        };
        let Some(end) = body.rfind('/') else {
            return Ok(Self::Literal(raw.to_string()));
        };
        let (source, flags) = (&body[..end], &body[end + 1..]);
        if let Some(flag) = flags.chars().find(|c| *c != 'i') {
            return Err(TokenError::Pattern {
                pattern: raw.to_string(),
                message: format!("unsupported flag '{flag}'"),
            });
        }
        RegexBuilder::new(source)
            .case_insensitive(flags.contains('i'))
            .build()
            .map(Self::Regex)
            .map_err(|e| TokenError::Pattern {
                pattern: raw.to_string(),
                message: e.to_string(),
            })
    }

    /// Returns true if `value` is allowed by this pattern.
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Self::Literal(literal) => literal == value,
            Self::Regex(regex) => regex.is_match(value),
        }
    }
}

/// An ordered list of allow-patterns.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    patterns: Vec<AllowPattern>,
}

impl AllowList {
    /// Parses every pattern, failing on the first invalid one.
    pub fn parse<S: AsRef<str>>(raw: &[S]) -> Result<Self, TokenError> {
        let patterns = raw
            .iter()
            .map(|p| AllowPattern::parse(p.as_ref()))
            .collect::<Result<_, _>>()?;
        Ok(Self { patterns })
    }

    /// Returns true if any pattern allows `value`.
    pub fn allows(&self, value: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(value))
    }

    /// Literal patterns, in order.
    pub fn literals(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().filter_map(|p| match p {
            AllowPattern::Literal(s) => Some(s.as_str()),
            AllowPattern::Regex(_) => None,
        })
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("#ff0000", "#ff0000", true)]
    #[case("#ff0000", "#FF0000", false)]
    #[case("/^#ff/i", "#FF0000", true)]
    #[case("/^--brand-/", "--brand-primary", true)]
    #[case("/^--brand-/", "--accent", false)]
    #[case("/not closed", "/not closed", true)]
    fn test_pattern_matches(#[case] pattern: &str, #[case] value: &str, #[case] expected: bool) {
        assert_eq!(AllowPattern::parse(pattern).unwrap().matches(value), expected);
    }

    #[test]
    fn test_invalid_patterns() {
        let err = AllowPattern::parse("/[/").unwrap_err();
        assert!(matches!(err, TokenError::Pattern { .. }));
        let err = AllowPattern::parse("/a/g").unwrap_err();
        assert!(err.to_string().contains("unsupported flag 'g'"));
    }

    #[test]
    fn test_allow_list() {
        let list = AllowList::parse(&["#fff", "/^var\\(--/"]).unwrap();
        assert_eq!(list.len(), 2);
        assert!(list.allows("#fff"));
        assert!(list.allows("var(--x)"));
        assert!(!list.allows("#000"));
        assert_eq!(list.literals().collect::<Vec<_>>(), vec!["#fff"]);
    }
}
