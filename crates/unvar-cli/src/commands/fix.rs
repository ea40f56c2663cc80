//! Fix command - rewrites var declarations in place or to stdout

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::{FileOutcome, Workspace, build_engine, transform_files};

#[derive(Args, Debug)]
pub struct FixArgs {
    /// Path to file or directory to rewrite
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Write the rewritten code back to the files
    #[arg(short, long)]
    pub write: bool,

    /// Run only the named transform (by name or id), can be repeated
    #[arg(short, long = "transform", value_name = "NAME")]
    pub transforms: Vec<String>,
}

impl FixArgs {
    pub fn run(&self) -> Result<ExitCode> {
        let workspace = Workspace::load(&self.path)?;
        if workspace.files.is_empty() {
            eprintln!("No JavaScript/TypeScript files found.");
            return Ok(ExitCode::SUCCESS);
        }

        let engine = build_engine(&workspace.config, &self.transforms)?;
        let outcomes = transform_files(&engine, &workspace.files);

        // A lone file without --write goes to stdout
        if !self.write && self.path.is_file() {
            return print_single(&outcomes);
        }

        let (changed, failed) = apply_outcomes(&outcomes, self.write);
        print_summary(outcomes.len(), changed, failed, self.write);
        if failed > 0 {
            return Ok(ExitCode::FAILURE);
        }
        Ok(ExitCode::SUCCESS)
    }
}

/// Reports every outcome and writes changed files when asked. A file that
/// cannot be written counts as failed and the rest are still processed.
/// Returns the changed and failed counts.
fn apply_outcomes(outcomes: &[FileOutcome], write: bool) -> (usize, usize) {
    let mut changed = 0;
    let mut failed = 0;
    for outcome in outcomes {
        match &outcome.result {
            Ok(result) if result.is_changed() => {
                if !write {
                    changed += 1;
                    println!("{} {}", "would fix".yellow().bold(), outcome.display_path());
                    continue;
                }
                match fs::write(&outcome.path, &result.code) {
                    Ok(()) => {
                        changed += 1;
                        println!("{} {}", "fixed".green().bold(), outcome.display_path());
                    }
                    Err(e) => {
                        failed += 1;
                        tracing::warn!(file = %outcome.path.display(), error = %e, "write failed");
                        report_failure(outcome, &format!("failed to write file: {e}"));
                    }
                }
            }
            Ok(_) => {}
            Err(message) => {
                failed += 1;
                report_failure(outcome, message);
            }
        }
    }
    (changed, failed)
}

fn print_single(outcomes: &[FileOutcome]) -> Result<ExitCode> {
    let Some(outcome) = outcomes.first() else {
        return Ok(ExitCode::SUCCESS);
    };

    match &outcome.result {
        Ok(result) => {
            print!("{}", result.code);
            Ok(ExitCode::SUCCESS)
        }
        Err(message) => {
            report_failure(outcome, message);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn report_failure(outcome: &FileOutcome, message: &str) {
    eprintln!(
        "{} {}: {}",
        "error:".red().bold(),
        outcome.display_path(),
        message
    );
}

fn print_summary(total: usize, changed: usize, failed: usize, written: bool) {
    let verb = if written { "fixed" } else { "would be fixed" };
    let mut summary = format!(
        "{} of {} {} {}",
        changed,
        total,
        if total == 1 { "file" } else { "files" },
        verb
    );
    if failed > 0 {
        summary.push_str(&format!(", {} skipped with errors", failed));
    }

    println!();
    println!("{}", summary.bold());
    if !written && changed > 0 {
        println!("Run again with {} to apply the changes.", "--write".cyan());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn args(path: PathBuf, write: bool) -> FixArgs {
        FixArgs {
            path,
            write,
            transforms: Vec::new(),
        }
    }

    #[test]
    fn write_rewrites_files_in_place() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("app.js");
        fs::write(&file, "var a = 1;\nvar b;\nb = a;\n").unwrap();

        let code = args(dir.path().to_path_buf(), true).run().unwrap();

        assert_eq!(code, ExitCode::SUCCESS);
        assert_eq!(
            fs::read_to_string(&file).unwrap(),
            "const a = 1;\nlet b;\nb = a;\n"
        );
    }

    #[test]
    fn without_write_files_are_untouched() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("app.js");
        fs::write(&file, "var a = 1;\n").unwrap();

        args(dir.path().to_path_buf(), false).run().unwrap();

        assert_eq!(fs::read_to_string(&file).unwrap(), "var a = 1;\n");
    }

    #[test]
    fn syntax_errors_leave_file_untouched_and_fail() {
        let dir = tempdir().unwrap();
        let broken = dir.path().join("broken.js");
        let fine = dir.path().join("fine.js");
        fs::write(&broken, "var a = ;\n").unwrap();
        fs::write(&fine, "var b = 2;\n").unwrap();

        let code = args(dir.path().to_path_buf(), true).run().unwrap();

        assert_eq!(code, ExitCode::FAILURE);
        assert_eq!(fs::read_to_string(&broken).unwrap(), "var a = ;\n");
        assert_eq!(fs::read_to_string(&fine).unwrap(), "const b = 2;\n");
    }

    #[test]
    fn write_failure_does_not_stop_other_files() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("first.js");
        let second = dir.path().join("second.js");
        fs::write(&first, "var a = 1;\n").unwrap();
        fs::write(&second, "var b = 2;\n").unwrap();
        let engine = unvar_core::TransformEngine::new();
        let mut outcomes = transform_files(&engine, &[first, second.clone()]);
        outcomes[0].path = dir.path().join("removed").join("first.js");

        let (changed, failed) = apply_outcomes(&outcomes, true);

        assert_eq!((changed, failed), (1, 1));
        assert_eq!(fs::read_to_string(&second).unwrap(), "const b = 2;\n");
    }

    #[test]
    fn unknown_transform_is_an_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("app.js"), "var a = 1;\n").unwrap();
        let args = FixArgs {
            path: dir.path().to_path_buf(),
            write: true,
            transforms: vec!["nope".to_string()],
        };

        assert!(args.run().is_err());
    }

    #[test]
    fn missing_path_is_an_error() {
        let dir = tempdir().unwrap();

        assert!(args(dir.path().join("missing.js"), false).run().is_err());
    }
}
