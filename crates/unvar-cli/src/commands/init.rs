//! Init command - writes a default unvar configuration

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use unvar_core::config::CONFIG_FILENAME;

const DEFAULT_CONFIG: &str = r#"# unvar configuration file

# File patterns to process, relative to the directory given on the command line
# include = ["src/**"]

# File patterns to skip
# exclude = ["vendor/**", "**/*.min.js"]

[transforms]
# Transforms to run, by name or id (all of them when empty)
# enabled = ["let"]

# Transforms to skip
# disabled = []
"#;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to create the configuration in
    #[arg(value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,

    /// Force overwrite existing configuration
    #[arg(short, long)]
    pub force: bool,
}

impl InitArgs {
    pub fn run(&self) -> Result<ExitCode> {
        let config_path = self.dir.join(CONFIG_FILENAME);

        if config_path.exists() && !self.force {
            anyhow::bail!(
                "Config file '{}' already exists. Use --force to overwrite.",
                config_path.display()
            );
        }

        fs::write(&config_path, DEFAULT_CONFIG)?;
        println!(
            "{} Created {} configuration file",
            "✓".green().bold(),
            config_path.display().to_string().cyan()
        );
        Ok(ExitCode::SUCCESS)
    }
}
