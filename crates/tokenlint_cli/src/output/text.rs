//! Text output formatter

use std::fmt::Write;

use tokenlint_core::LintReport;

pub fn format_text(report: &LintReport) -> String {
    let mut out = String::new();

    for result in &report.results {
        if result.messages.is_empty() {
            continue;
        }

        let _ = writeln!(out, "\n{}:", result.document_id);
        for msg in &result.messages {
            let _ = writeln!(
                out,
                "  {}:{} {} [{}]: {}",
                msg.line, msg.column, msg.severity, msg.rule_id, msg.message
            );
        }
    }

    let total_issues: usize = report.results.iter().map(|r| r.messages.len()).sum();
    let fixable: usize = report.results.iter().map(|r| r.fixable_count()).sum();

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Checked {} documents, found {} issues ({} errors, {} warnings)",
        report.results.len(),
        total_issues,
        report.error_count(),
        report.warning_count()
    );
    if fixable > 0 {
        let _ = writeln!(out, "{} issues can be fixed with --fix", fixable);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tokenlint_ast::{Position, Span};
    use tokenlint_core::{Fix, LintMessage, LintResult, Severity};

    #[test]
    fn test_format_text_groups_by_document() {
        let report = LintReport {
            results: vec![
                LintResult::new(
                    "/app/button.css",
                    vec![
                        LintMessage::new(
                            "design-token/colors",
                            "Unexpected color \"#00ff00\"",
                            Position::new(2, 3),
                        ),
                        LintMessage::new(
                            "design-system/deprecation",
                            "Token \"color.old\" is deprecated",
                            Position::new(4, 10),
                        )
                        .with_severity(Severity::Warn)
                        .with_fix(Fix::new(Span::new(40, 51), "--color-new")),
                    ],
                ),
                LintResult::new("/app/clean.css", vec![]),
            ],
            ..Default::default()
        };

        let expected = "\n/app/button.css:\n  \
            2:3 error [design-token/colors]: Unexpected color \"#00ff00\"\n  \
            4:10 warn [design-system/deprecation]: Token \"color.old\" is deprecated\n\
            \n\
            Checked 2 documents, found 2 issues (1 errors, 1 warnings)\n\
            1 issues can be fixed with --fix\n";

        assert_eq!(format_text(&report), expected);
    }

    #[test]
    fn test_format_text_clean_run() {
        let report = LintReport {
            results: vec![LintResult::new("/app/clean.css", vec![])],
            ..Default::default()
        };

        assert_eq!(
            format_text(&report),
            "\nChecked 1 documents, found 0 issues (0 errors, 0 warnings)\n"
        );
    }
}
