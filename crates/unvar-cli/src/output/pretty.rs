//! Pretty formatter for human-readable terminal output
//!
//! Shows each decision with its source line, then a summary.

use colored::{ColoredString, Colorize};
use unvar_core::Decision;
use unvar_core::transforms::let_const::DeclaratorDecision;

use crate::commands::FileOutcome;

pub struct PrettyFormatter {
    show_unchanged: bool,
}

impl PrettyFormatter {
    pub fn new() -> Self {
        Self {
            show_unchanged: false,
        }
    }

    pub fn show_unchanged(mut self, enabled: bool) -> Self {
        self.show_unchanged = enabled;
        self
    }

    pub fn format(&self, outcomes: &[FileOutcome]) -> String {
        let mut output = String::new();

        for outcome in outcomes {
            match &outcome.result {
                Ok(result) => {
                    for decision in result.decisions.iter() {
                        if decision.decision.is_narrowed() || self.show_unchanged {
                            output.push_str(&self.format_decision(outcome, decision));
                            output.push('\n');
                        }
                    }
                }
                Err(message) => {
                    output.push_str(&format!(
                        "{}: {}\n  {} {}\n\n",
                        "error".red().bold(),
                        message,
                        "-->".blue(),
                        outcome.display_path()
                    ));
                }
            }
        }

        output.push_str(&self.format_summary(outcomes));
        output
    }

    fn format_decision(&self, outcome: &FileOutcome, decision: &DeclaratorDecision) -> String {
        let mut lines = Vec::new();

        let names = decision
            .names
            .iter()
            .map(|name| format!("`{}`", name))
            .collect::<Vec<_>>()
            .join(", ");
        let message = match decision.reason {
            Some(reason) => format!("{} stays var: {}", names, reason.description()),
            None => format!("{} can be declared with {}", names, decision.keyword),
        };
        lines.push(format!("{}: {}", self.colorize_keyword(decision.decision), message));

        lines.push(format!(
            "  {} {}:{}:{}",
            "-->".blue(),
            outcome.display_path(),
            decision.line,
            decision.column
        ));

        if let Some(source_line) = outcome.source.lines().nth(decision.line.saturating_sub(1)) {
            let padding = " ".repeat(decision.line.to_string().len());
            lines.push(format!("{} {}", padding, "|".blue()));
            lines.push(format!(
                "{} {} {}",
                decision.line.to_string().blue(),
                "|".blue(),
                source_line
            ));
            lines.push(format!("{} {}", padding, "|".blue()));
        }

        lines.join("\n")
    }

    fn colorize_keyword(&self, decision: Decision) -> ColoredString {
        match decision {
            Decision::ImmutableNarrowed => "const".green().bold(),
            Decision::MutableNarrowed => "let".yellow().bold(),
            Decision::Unchanged => "var".dimmed().bold(),
        }
    }

    fn format_summary(&self, outcomes: &[FileOutcome]) -> String {
        let mut r#const = 0;
        let mut r#let = 0;
        let mut unchanged = 0;
        let mut changed_files = 0;
        let mut failed_files = 0;

        for outcome in outcomes {
            match &outcome.result {
                Ok(result) => {
                    let summary = result.decisions.summary();
                    r#const += summary.r#const;
                    r#let += summary.r#let;
                    unchanged += summary.unchanged;
                    if result.is_changed() {
                        changed_files += 1;
                    }
                }
                Err(_) => failed_files += 1,
            }
        }

        let files_str = if outcomes.len() == 1 {
            "1 file".to_string()
        } else {
            format!("{} files", outcomes.len())
        };

        let mut summary = if changed_files == 0 {
            format!("Checked {}: nothing to change", files_str).green().bold().to_string()
        } else {
            format!(
                "Checked {}: {} would change ({} const, {} let, {} kept as var)",
                files_str, changed_files, r#const, r#let, unchanged
            )
            .yellow()
            .bold()
            .to_string()
        };

        if failed_files > 0 {
            summary.push_str(&format!(
                "\n{}",
                format!("{} could not be checked", failed_files).red().bold()
            ));
        }

        summary.push('\n');
        summary
    }
}

impl Default for PrettyFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use unvar_core::TransformEngine;

    fn outcome(path: &str, code: &str) -> FileOutcome {
        let result = TransformEngine::new()
            .transform_source(path, code)
            .map_err(|e| e.to_string());
        FileOutcome {
            path: PathBuf::from(path),
            source: code.to_string(),
            result,
        }
    }

    fn plain(formatter: &PrettyFormatter, outcomes: &[FileOutcome]) -> String {
        colored::control::set_override(false);
        formatter.format(outcomes)
    }

    #[test]
    fn shows_narrowed_declarations_with_source_line() {
        let outcomes = vec![outcome("app.js", "foo();\nvar answer = 42;")];

        let output = plain(&PrettyFormatter::new(), &outcomes);

        assert!(output.contains("const: `answer` can be declared with const"));
        assert!(output.contains("--> app.js:2:5"));
        assert!(output.contains("2 | var answer = 42;"));
        assert!(output.contains("1 would change"));
    }

    #[test]
    fn hides_unchanged_by_default() {
        let outcomes = vec![outcome("app.js", "foo(a);\nvar a = 1;")];

        let output = plain(&PrettyFormatter::new(), &outcomes);

        assert!(!output.contains("stays var"));
        assert!(output.contains("nothing to change"));
    }

    #[test]
    fn explains_unchanged_when_requested() {
        let outcomes = vec![outcome("app.js", "foo(a);\nvar a = 1;")];

        let output = plain(&PrettyFormatter::new().show_unchanged(true), &outcomes);

        assert!(output.contains("var: `a` stays var: used before its declaration"));
    }

    #[test]
    fn reports_files_that_fail() {
        let outcomes = vec![outcome("bad.js", "var = ;")];

        let output = plain(&PrettyFormatter::new(), &outcomes);

        assert!(output.contains("error: cannot rewrite a file with syntax errors"));
        assert!(output.contains("1 could not be checked"));
    }
}
