//! JSON output formatter for programmatic integration

use serde::Serialize;
use unvar_core::transforms::let_const::DeclaratorDecision;

use crate::commands::FileOutcome;

#[derive(Serialize)]
pub struct JsonOutput<'a> {
    pub version: &'static str,
    pub metadata: JsonMetadata,
    pub summary: JsonSummary,
    pub files: Vec<JsonFile<'a>>,
}

#[derive(Serialize)]
pub struct JsonMetadata {
    pub unvar_version: &'static str,
    pub analyzed_path: String,
}

#[derive(Serialize, Default, Debug, PartialEq, Eq)]
pub struct JsonSummary {
    pub total_files: usize,
    pub files_changed: usize,
    pub files_failed: usize,
    pub r#const: usize,
    pub r#let: usize,
    pub unchanged: usize,
}

#[derive(Serialize)]
pub struct JsonFile<'a> {
    pub file: String,
    pub changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'a str>,
    pub decisions: &'a [DeclaratorDecision],
}

pub struct JsonFormatter {
    analyzed_path: String,
}

impl JsonFormatter {
    pub fn new(analyzed_path: &str) -> Self {
        Self {
            analyzed_path: analyzed_path.to_string(),
        }
    }

    pub fn format(&self, outcomes: &[FileOutcome]) -> String {
        let output = self.build_output(outcomes);
        serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn build_output<'a>(&self, outcomes: &'a [FileOutcome]) -> JsonOutput<'a> {
        let mut summary = JsonSummary {
            total_files: outcomes.len(),
            ..JsonSummary::default()
        };
        let mut files = Vec::with_capacity(outcomes.len());

        for outcome in outcomes {
            let file = match &outcome.result {
                Ok(result) => {
                    let counts = result.decisions.summary();
                    summary.r#const += counts.r#const;
                    summary.r#let += counts.r#let;
                    summary.unchanged += counts.unchanged;
                    if result.is_changed() {
                        summary.files_changed += 1;
                    }
                    JsonFile {
                        file: outcome.display_path(),
                        changed: result.is_changed(),
                        error: None,
                        decisions: &result.decisions.entries,
                    }
                }
                Err(message) => {
                    summary.files_failed += 1;
                    JsonFile {
                        file: outcome.display_path(),
                        changed: false,
                        error: Some(message.as_str()),
                        decisions: &[],
                    }
                }
            };
            files.push(file);
        }

        JsonOutput {
            version: "1.0",
            metadata: JsonMetadata {
                unvar_version: env!("CARGO_PKG_VERSION"),
                analyzed_path: self.analyzed_path.clone(),
            },
            summary,
            files,
        }
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

    #[test]
    fn summary_counts_files_and_decisions() {
        let outcomes = vec![
            outcome("a.js", "var x = 1, y;\ny = x;"),
            outcome("b.js", "foo(z);\nvar z;"),
            outcome("c.js", "var = ;"),
        ];
        let formatter = JsonFormatter::new("src");

        let output = formatter.build_output(&outcomes);

        assert_eq!(
            output.summary,
            JsonSummary {
                total_files: 3,
                files_changed: 1,
                files_failed: 1,
                r#const: 1,
                r#let: 1,
                unchanged: 1,
            }
        );
    }

    #[test]
    fn json_lists_decisions_per_file() {
        let outcomes = vec![outcome("a.js", "var x = 1;")];
        let formatter = JsonFormatter::new("a.js");

        let json: serde_json::Value = serde_json::from_str(&formatter.format(&outcomes)).unwrap();

        assert_eq!(json["version"], "1.0");
        assert_eq!(json["metadata"]["analyzed_path"], "a.js");
        assert_eq!(json["files"][0]["file"], "a.js");
        assert_eq!(json["files"][0]["changed"], true);
        assert_eq!(json["files"][0]["decisions"][0]["names"][0], "x");
        assert_eq!(json["files"][0]["decisions"][0]["keyword"], "const");
        assert!(json["files"][0].get("error").is_none());
    }

    #[test]
    fn json_reports_errors() {
        let outcomes = vec![outcome("bad.js", "var = ;")];
        let formatter = JsonFormatter::new("bad.js");

        let json: serde_json::Value = serde_json::from_str(&formatter.format(&outcomes)).unwrap();

        assert!(json["files"][0]["error"].is_string());
        assert_eq!(json["summary"]["files_failed"], 1);
    }
}
