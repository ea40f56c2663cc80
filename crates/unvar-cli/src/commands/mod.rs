//! CLI command implementations

pub mod check;
pub mod fix;
pub mod init;

pub use check::CheckArgs;
pub use fix::FixArgs;
pub use init::InitArgs;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use rayon::prelude::*;
use unvar_core::config::{Config, PathFilter, discover_config};
use unvar_core::{TransformEngine, TransformResult};
use walkdir::WalkDir;

const SUPPORTED_EXTENSIONS: &[&str] = &["js", "jsx", "mjs", "cjs", "ts", "tsx", "mts", "cts"];

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rewrite var declarations into let and const
    Fix(FixArgs),

    /// Report what would change without touching any file
    Check(CheckArgs),

    /// Write a default unvar.toml in the given directory
    Init(InitArgs),
}

/// The files to process under one path, with the configuration that
/// applies to them.
pub struct Workspace {
    pub config: Config,
    pub files: Vec<PathBuf>,
}

impl Workspace {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("Path does not exist: {}", path.display());
        }

        let config_dir = if path.is_file() {
            path.parent().unwrap_or(Path::new("."))
        } else {
            path
        };
        let config_result = discover_config(config_dir)?;
        for warning in &config_result.warnings {
            eprintln!("{} {}", "warning:".yellow().bold(), warning);
        }

        let filter = config_result.config.path_filter()?;
        let files = discover_files(path, &filter)?;
        tracing::debug!(path = %path.display(), files = files.len(), "discovered files");

        Ok(Self {
            config: config_result.config,
            files,
        })
    }
}

pub fn build_engine(config: &Config, selected: &[String]) -> Result<TransformEngine> {
    let mut engine = TransformEngine::with_config(config);

    if !selected.is_empty() {
        for name in selected {
            if engine.registry().get(name).is_none() {
                anyhow::bail!("Unknown transform '{}'", name);
            }
        }
        engine.registry_mut().select(selected.iter().cloned());
    }

    Ok(engine)
}

pub struct FileOutcome {
    pub path: PathBuf,
    pub source: String,
    pub result: std::result::Result<TransformResult, String>,
}

impl FileOutcome {
    pub fn display_path(&self) -> String {
        self.path.to_string_lossy().to_string()
    }

    pub fn is_changed(&self) -> bool {
        self.result.as_ref().is_ok_and(TransformResult::is_changed)
    }
}

/// Transforms every file in parallel. A failing file is reported in its
/// outcome and never stops the others.
pub fn transform_files(engine: &TransformEngine, files: &[PathBuf]) -> Vec<FileOutcome> {
    files
        .par_iter()
        .map(|path| {
            let source = match fs::read_to_string(path) {
                Ok(source) => source,
                Err(e) => {
                    return FileOutcome {
                        path: path.clone(),
                        source: String::new(),
                        result: Err(format!("failed to read file: {e}")),
                    };
                }
            };

            let result = engine
                .transform_source(&path.to_string_lossy(), &source)
                .map_err(|e| e.to_string());
            if let Err(ref message) = result {
                tracing::warn!(file = %path.display(), error = %message, "file skipped");
            }

            FileOutcome {
                path: path.clone(),
                source,
                result,
            }
        })
        .collect()
}

pub fn discover_files(path: &Path, filter: &PathFilter) -> Result<Vec<PathBuf>> {
    if !path.exists() {
        anyhow::bail!("Path does not exist: {}", path.display());
    }

    if path.is_file() {
        if is_supported_file(path) {
            return Ok(vec![path.to_path_buf()]);
        } else {
            return Ok(vec![]);
        }
    }

    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .into_iter()
        .filter_entry(|e| !is_hidden(e))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| is_supported_file(e.path()))
        .filter(|e| {
            let relative = e.path().strip_prefix(path).unwrap_or(e.path());
            filter.is_allowed(relative)
        })
        .map(|e| e.path().to_path_buf())
        .collect();

    files.sort();
    Ok(files)
}

fn is_supported_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    if entry.depth() == 0 {
        return false;
    }
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.') || name == "node_modules")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    fn discover(path: &Path) -> Vec<PathBuf> {
        discover_files(path, &PathFilter::allow_all()).unwrap()
    }

    #[test]
    fn discover_files_finds_single_js_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test.js");
        File::create(&file_path).unwrap();

        let files = discover(&file_path);

        assert_eq!(files, vec![file_path]);
    }

    #[test]
    fn discover_files_finds_every_supported_extension() {
        let dir = tempdir().unwrap();
        for name in ["a.js", "b.jsx", "c.mjs", "d.cjs", "e.ts", "f.tsx", "g.mts", "h.cts"] {
            File::create(dir.path().join(name)).unwrap();
        }
        File::create(dir.path().join("readme.md")).unwrap();
        File::create(dir.path().join("config.json")).unwrap();

        let files = discover(dir.path());

        assert_eq!(files.len(), 8);
    }

    #[test]
    fn discover_files_skips_hidden_directories_and_node_modules() {
        let dir = tempdir().unwrap();
        for hidden in [".git", "node_modules"] {
            let hidden_dir = dir.path().join(hidden);
            fs::create_dir(&hidden_dir).unwrap();
            File::create(hidden_dir.join("skipped.js")).unwrap();
        }
        File::create(dir.path().join("visible.js")).unwrap();

        let files = discover(dir.path());

        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("visible.js"));
    }

    #[test]
    fn discover_files_is_recursive_and_sorted() {
        let dir = tempdir().unwrap();
        let subdir = dir.path().join("src");
        fs::create_dir(&subdir).unwrap();
        File::create(dir.path().join("root.js")).unwrap();
        File::create(subdir.join("nested.ts")).unwrap();

        let files = discover(dir.path());

        assert_eq!(files, vec![dir.path().join("root.js"), subdir.join("nested.ts")]);
    }

    #[test]
    fn discover_files_applies_exclude_patterns() {
        let dir = tempdir().unwrap();
        let vendor = dir.path().join("vendor");
        fs::create_dir(&vendor).unwrap();
        File::create(vendor.join("lib.js")).unwrap();
        File::create(dir.path().join("app.js")).unwrap();
        let config = Config {
            exclude: vec!["vendor/**".to_string()],
            ..Config::default()
        };

        let files = discover_files(dir.path(), &config.path_filter().unwrap()).unwrap();

        assert_eq!(files, vec![dir.path().join("app.js")]);
    }

    #[test]
    fn discover_files_errors_on_missing_path() {
        let dir = tempdir().unwrap();

        assert!(discover_files(&dir.path().join("missing"), &PathFilter::allow_all()).is_err());
    }

    #[test]
    fn workspace_reads_config_from_directory() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("unvar.toml"),
            "exclude = [\"legacy/**\"]\n\n[transforms]\ndisabled = [\"let\"]\n",
        )
        .unwrap();
        let legacy = dir.path().join("legacy");
        fs::create_dir(&legacy).unwrap();
        File::create(legacy.join("old.js")).unwrap();
        File::create(dir.path().join("new.js")).unwrap();

        let workspace = Workspace::load(dir.path()).unwrap();

        assert_eq!(workspace.files, vec![dir.path().join("new.js")]);
        assert_eq!(workspace.config.transforms.disabled, vec!["let"]);
    }

    #[test]
    fn build_engine_rejects_unknown_transform() {
        let result = build_engine(&Config::default(), &["missing".to_string()]);

        assert!(result.is_err());
    }

    #[test]
    fn transform_files_reports_failures_per_file() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("good.js");
        let bad = dir.path().join("bad.js");
        fs::write(&good, "var a = 1;\n").unwrap();
        fs::write(&bad, "var = ;\n").unwrap();
        let engine = TransformEngine::new();

        let outcomes = transform_files(&engine, &[good, bad]);

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes[0].is_changed());
        assert_eq!(
            outcomes[0].result.as_ref().map(|r| r.code.as_str()),
            Ok("const a = 1;\n")
        );
        assert!(outcomes[1].result.is_err());
        assert!(!outcomes[1].is_changed());
    }
}
