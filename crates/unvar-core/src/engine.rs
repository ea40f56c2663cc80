//! Transform engine for rewriting source files
//!
//! Runs the enabled transforms over one file and returns the rewritten code
//! together with the decisions behind it. Used by the CLI and by tests.

use crate::config::Config;
use crate::edit::apply_edits;
use crate::parser::ParsedFile;
use crate::transforms::{DecisionTable, TransformError, TransformRegistry};

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub code: String,
    pub decisions: DecisionTable,
    /// Ids of the transforms that changed the file, in the order they ran.
    pub applied: Vec<&'static str>,
}

impl TransformResult {
    pub fn is_changed(&self) -> bool {
        !self.applied.is_empty()
    }
}

pub struct TransformEngine {
    registry: TransformRegistry,
}

impl TransformEngine {
    pub fn new() -> Self {
        Self {
            registry: TransformRegistry::with_builtins(),
        }
    }

    pub fn with_config(config: &Config) -> Self {
        let mut registry = TransformRegistry::with_builtins();
        registry.configure(&config.transforms);
        Self { registry }
    }

    pub fn with_registry(registry: TransformRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &TransformRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut TransformRegistry {
        &mut self.registry
    }

    pub fn transform_source(
        &self,
        filename: &str,
        source: &str,
    ) -> Result<TransformResult, TransformError> {
        self.transform(&ParsedFile::from_source(filename, source))
    }

    /// Files with syntax errors are refused rather than rewritten from a
    /// partially recovered tree.
    pub fn transform(&self, file: &ParsedFile) -> Result<TransformResult, TransformError> {
        if let Some(error) = file.errors().first() {
            return Err(TransformError::Parse(error.clone()));
        }

        let filename = file.filename();
        let mut code = file.source().to_string();
        let mut decisions = DecisionTable::default();
        let mut applied = Vec::new();
        // Re-parsed only after a transform changed the text
        let mut reparsed: Option<ParsedFile> = None;

        for transform in self.registry.enabled_transforms() {
            let current = reparsed.as_ref().unwrap_or(file);
            let output = transform.plan(current)?;

            tracing::debug!(
                file = filename,
                transform = transform.metadata().id,
                declarators = output.decisions.len(),
                edits = output.edits.len(),
                "transform planned"
            );

            let unchanged = output.is_unchanged();
            decisions.extend(output.decisions);
            if unchanged {
                continue;
            }

            code = apply_edits(current.source(), &output.edits)?;
            applied.push(transform.metadata().id);

            let next = ParsedFile::from_source(filename, &code);
            if let Some(error) = next.errors().first() {
                tracing::warn!(
                    file = filename,
                    transform = transform.metadata().id,
                    "rewritten code no longer parses"
                );
                return Err(TransformError::Parse(error.clone()));
            }
            reparsed = Some(next);
        }

        let summary = decisions.summary();
        tracing::debug!(
            file = filename,
            r#const = summary.r#const,
            r#let = summary.r#let,
            unchanged = summary.unchanged,
            "file transformed"
        );

        Ok(TransformResult {
            code,
            decisions,
            applied,
        })
    }
}

impl Default for TransformEngine {
    fn default() -> Self {
        Self::new()
    }
}
