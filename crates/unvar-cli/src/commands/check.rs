//! Check command - reports per-declarator decisions without writing

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, ValueEnum};

use super::{Workspace, build_engine, transform_files};
use crate::output::json::JsonFormatter;
use crate::output::pretty::PrettyFormatter;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Pretty,
    Json,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to file or directory to check
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Output format for the report
    #[arg(short, long, value_enum, default_value = "pretty")]
    pub format: OutputFormat,

    /// Run only the named transform (by name or id), can be repeated
    #[arg(short, long = "transform", value_name = "NAME")]
    pub transforms: Vec<String>,

    /// Also list declarations that keep var, with the reason
    #[arg(long)]
    pub show_unchanged: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl CheckArgs {
    /// Exits with failure when any file would change or could not be
    /// checked.
    pub fn run(&self) -> Result<ExitCode> {
        self.configure_colors();

        let workspace = Workspace::load(&self.path)?;
        let engine = build_engine(&workspace.config, &self.transforms)?;
        let outcomes = transform_files(&engine, &workspace.files);

        match self.format {
            OutputFormat::Json => {
                let formatter = JsonFormatter::new(&self.path.to_string_lossy());
                println!("{}", formatter.format(&outcomes));
            }
            OutputFormat::Pretty => {
                let formatter = PrettyFormatter::new().show_unchanged(self.show_unchanged);
                print!("{}", formatter.format(&outcomes));
            }
        }

        let dirty = outcomes
            .iter()
            .any(|outcome| outcome.is_changed() || outcome.result.is_err());
        if dirty {
            return Ok(ExitCode::FAILURE);
        }
        Ok(ExitCode::SUCCESS)
    }

    fn configure_colors(&self) {
        let no_color_env = std::env::var("NO_COLOR").is_ok();
        if self.no_color || no_color_env || self.format == OutputFormat::Json {
            colored::control::set_override(false);
        }
    }
}
