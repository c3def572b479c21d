//! Cache entry types.

use serde::{Deserialize, Serialize};
use tokenlint_ast::DocumentStat;
use tokenlint_rule::LintResult;

/// The cached result for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Modification time, in milliseconds, when the result was computed.
    pub mtime: f64,

    /// Size in bytes, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    pub result: LintResult,
}

impl CacheEntry {
    /// Creates an entry for a result computed at `stat`.
    pub fn new(stat: DocumentStat, result: LintResult) -> Self {
        Self {
            mtime: stat.mtime,
            size: stat.size,
            result,
        }
    }

    /// Checks if this entry still describes a document with `stat`.
    ///
    /// Sizes are compared only when both sides know theirs.
    pub fn is_fresh(&self, stat: &DocumentStat) -> bool {
        if self.mtime.to_bits() != stat.mtime.to_bits() {
            return false;
        }
        match (self.size, stat.size) {
            (Some(cached), Some(current)) => cached == current,
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn stat(mtime: f64, size: Option<u64>) -> DocumentStat {
        DocumentStat { mtime, size }
    }

    #[rstest]
    #[case(stat(10.0, Some(4)), true)]
    #[case(stat(10.0, None), true)]
    #[case(stat(11.0, Some(4)), false)]
    #[case(stat(10.0, Some(5)), false)]
    fn test_freshness(#[case] current: DocumentStat, #[case] expected: bool) {
        let entry = CacheEntry::new(stat(10.0, Some(4)), LintResult::new("/a.css", vec![]));
        assert_eq!(entry.is_fresh(&current), expected);
    }

    #[test]
    fn test_entry_without_size_serialization() {
        let entry = CacheEntry::new(stat(1.5, None), LintResult::new("/a.css", vec![]));
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "mtime": 1.5,
                "result": { "documentId": "/a.css", "messages": [] }
            })
        );
    }
}
