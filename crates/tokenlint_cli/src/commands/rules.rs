//! Rules command implementation

use std::fmt::Write;

use tokenlint_core::rules::builtin_rules;

pub fn run_rules() {
    print!("{}", format_rules());
}

fn format_rules() -> String {
    let rules = builtin_rules();
    let width = rules.iter().map(|r| r.name().len()).max().unwrap_or(0);

    let mut out = String::new();
    for rule in &rules {
        let meta = rule.meta();
        let fixable = if meta.fixable { " (fixable)" } else { "" };
        let _ = writeln!(
            out,
            "{:<width$}  {}{}",
            rule.name(),
            meta.description().unwrap_or_default(),
            fixable,
            width = width
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_every_builtin_rule() {
        let out = format_rules();
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), builtin_rules().len());
        assert!(lines[0].starts_with("design-token/colors"));
        assert!(out.contains("design-system/no-inline-styles"));
        assert!(out.contains("(fixable)"));
    }
}
