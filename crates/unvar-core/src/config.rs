//! Configuration loading and parsing for unvar
//!
//! Provides functionality to load and parse `unvar.toml` configuration files.

use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};

pub const CONFIG_FILENAME: &str = "unvar.toml";

const KNOWN_TOP_LEVEL_KEYS: &[&str] = &["include", "exclude", "transforms"];
const KNOWN_TRANSFORMS_KEYS: &[&str] = &["enabled", "disabled"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid TOML in '{path}': {message}")]
    ParseError { path: PathBuf, message: String },
    #[error("Invalid file pattern '{pattern}': {message}")]
    PatternError { pattern: String, message: String },
}

#[derive(Debug, Clone, Default)]
pub struct ConfigResult {
    pub config: Config,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub transforms: TransformsConfig,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct TransformsConfig {
    /// Transform ids or names to run. Empty means all of them.
    pub enabled: Vec<String>,
    pub disabled: Vec<String>,
}

impl Config {
    pub fn path_filter(&self) -> Result<PathFilter, ConfigError> {
        Ok(PathFilter {
            include: build_glob_set(&self.include)?,
            exclude: build_glob_set(&self.exclude)?,
        })
    }
}

/// Include and exclude patterns, matched against paths relative to the
/// directory being processed.
#[derive(Debug, Clone)]
pub struct PathFilter {
    include: Option<GlobSet>,
    exclude: Option<GlobSet>,
}

impl PathFilter {
    pub fn allow_all() -> Self {
        Self {
            include: None,
            exclude: None,
        }
    }

    pub fn is_allowed(&self, relative_path: &Path) -> bool {
        if self
            .exclude
            .as_ref()
            .is_some_and(|set| set.is_match(relative_path))
        {
            return false;
        }
        self.include
            .as_ref()
            .is_none_or(|set| set.is_match(relative_path))
    }
}

fn build_glob_set(patterns: &[String]) -> Result<Option<GlobSet>, ConfigError> {
    if patterns.is_empty() {
        return Ok(None);
    }

    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| ConfigError::PatternError {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;
        builder.add(glob);
    }

    builder
        .build()
        .map(Some)
        .map_err(|e| ConfigError::PatternError {
            pattern: patterns.join(", "),
            message: e.to_string(),
        })
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();
    loop {
        let config_path = current.join(CONFIG_FILENAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if !current.pop() {
            return None;
        }
    }
}

pub fn load_config_with_warnings(path: &Path) -> Result<ConfigResult, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e.message().to_string(),
    })?;
    let warnings = detect_unknown_keys(&content);

    Ok(ConfigResult { config, warnings })
}

fn detect_unknown_keys(content: &str) -> Vec<String> {
    let mut warnings = Vec::new();

    let table: toml::Table = match content.parse() {
        Ok(t) => t,
        Err(_) => return warnings,
    };

    let known_top: HashSet<&str> = KNOWN_TOP_LEVEL_KEYS.iter().copied().collect();
    for key in table.keys() {
        if !known_top.contains(key.as_str()) {
            warnings.push(format!("Unknown config option: '{}'", key));
        }
    }

    if let Some(toml::Value::Table(transforms)) = table.get("transforms") {
        let known: HashSet<&str> = KNOWN_TRANSFORMS_KEYS.iter().copied().collect();
        for key in transforms.keys() {
            if !known.contains(key.as_str()) {
                warnings.push(format!("Unknown config option in [transforms]: '{}'", key));
            }
        }
    }

    warnings
}

/// Finds and loads the nearest config. A missing file yields the defaults;
/// an unreadable or invalid one is an error.
pub fn discover_config(start_dir: &Path) -> Result<ConfigResult, ConfigError> {
    match find_config_file(start_dir) {
        Some(path) => load_config_with_warnings(&path),
        None => Ok(ConfigResult::default()),
    }
}
