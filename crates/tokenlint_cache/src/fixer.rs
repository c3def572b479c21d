//! Applying fixes to document text.

use tracing::{debug, warn};

use tokenlint_rule::{Fix, LintMessage};

/// Result of applying fixes to a text.
#[derive(Debug)]
pub struct FixerResult {
    /// Number of fixes applied.
    pub fixes_applied: usize,
    /// The fixed content.
    pub fixed_content: String,
    /// Whether the content was modified.
    pub modified: bool,
}

impl FixerResult {
    /// Creates a result indicating no changes were made.
    pub fn unchanged(content: String) -> Self {
        Self {
            fixes_applied: 0,
            fixed_content: content,
            modified: false,
        }
    }
}

/// Applies the fixes carried by `messages` to `content`.
///
/// Fixes are applied from the end of the text to the beginning so earlier
/// ranges stay valid. Overlapping fixes and fixes with out-of-range or
/// non-boundary offsets are skipped with a warning.
pub fn apply_fixes(content: &str, messages: &[LintMessage]) -> FixerResult {
    let mut fixes: Vec<&Fix> = messages.iter().filter_map(|m| m.fix.as_ref()).collect();
    if fixes.is_empty() {
        return FixerResult::unchanged(content.to_string());
    }

    fixes.sort_by(|a, b| b.range[0].cmp(&a.range[0]));
    let fixes = filter_overlapping_fixes(fixes);

    let mut result = content.to_string();
    let mut applied = 0;
    for fix in fixes {
        let [start, end] = fix.range.map(|offset| offset as usize);
        if start > end
            || end > result.len()
            || !result.is_char_boundary(start)
            || !result.is_char_boundary(end)
        {
            warn!(
                "Invalid fix range: start={}, end={}, content_len={}",
                start,
                end,
                result.len()
            );
            continue;
        }

        debug!("Applying fix: replace [{}..{}] with '{}'", start, end, fix.text);
        result.replace_range(start..end, &fix.text);
        applied += 1;
    }

    FixerResult {
        fixes_applied: applied,
        fixed_content: result,
        modified: applied > 0,
    }
}

/// Filters out overlapping fixes, keeping the one that starts later.
///
/// Expects `fixes` sorted by start offset, descending.
fn filter_overlapping_fixes(fixes: Vec<&Fix>) -> Vec<&Fix> {
    let mut result: Vec<&Fix> = Vec::with_capacity(fixes.len());
    for fix in fixes {
        // Sorted descending, so only the last accepted fix can overlap.
        let overlaps = result
            .last()
            .is_some_and(|last| last.span().overlaps(&fix.span()));
        if overlaps {
            warn!(
                "Skipping overlapping fix at [{}, {}]",
                fix.range[0], fix.range[1]
            );
        } else {
            result.push(fix);
        }
    }
    result
}
