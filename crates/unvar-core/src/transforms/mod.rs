//! Transform system for rewriting JavaScript/TypeScript sources
//!
//! A transform inspects a parsed file and plans text edits. The registry
//! decides which transforms run, based on the `[transforms]` configuration.

pub mod let_const;

use std::collections::HashSet;

use crate::config::TransformsConfig;
use crate::edit::TextEdit;
use crate::parser::{ParseError, ParsedFile};
use crate::semantic::InvalidInputError;

pub use let_const::{Decision, DecisionTable, LetTransform};

#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("cannot rewrite a file with syntax errors: {0}")]
    Parse(#[from] ParseError),
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
    #[error("overlapping edits at byte {at}")]
    OverlappingEdits { at: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformMetadata {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub examples: Option<&'static str>,
}

/// Edits planned by one transform, plus the decisions behind them.
#[derive(Debug, Clone, Default)]
pub struct TransformOutput {
    pub edits: Vec<TextEdit>,
    pub decisions: DecisionTable,
}

impl TransformOutput {
    pub fn is_unchanged(&self) -> bool {
        self.edits.is_empty()
    }
}

pub trait Transform: Send + Sync {
    fn metadata(&self) -> &TransformMetadata;
    fn plan(&self, file: &ParsedFile) -> Result<TransformOutput, TransformError>;
}

pub struct TransformRegistry {
    transforms: Vec<Box<dyn Transform>>,
    enabled: HashSet<String>,
    disabled: HashSet<String>,
}

impl TransformRegistry {
    pub fn new() -> Self {
        Self {
            transforms: Vec::new(),
            enabled: HashSet::new(),
            disabled: HashSet::new(),
        }
    }

    /// Registry with every built-in transform.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(LetTransform::new()));
        registry
    }

    pub fn register(&mut self, transform: Box<dyn Transform>) {
        self.transforms.push(transform);
    }

    pub fn configure(&mut self, config: &TransformsConfig) {
        self.enabled = config.enabled.iter().cloned().collect();
        self.disabled = config.disabled.iter().cloned().collect();
    }

    /// Restricts the run to the named transforms, on top of the configuration.
    pub fn select<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enabled = names.into_iter().map(Into::into).collect();
    }

    pub fn transforms(&self) -> impl Iterator<Item = &dyn Transform> {
        self.transforms.iter().map(|t| t.as_ref())
    }

    pub fn enabled_transforms(&self) -> impl Iterator<Item = &dyn Transform> {
        self.transforms()
            .filter(|transform| self.should_run(transform.metadata()))
    }

    fn should_run(&self, metadata: &TransformMetadata) -> bool {
        let matches = |set: &HashSet<String>| {
            set.contains(metadata.id) || set.contains(metadata.name)
        };

        if matches(&self.disabled) {
            return false;
        }
        self.enabled.is_empty() || matches(&self.enabled)
    }

    pub fn is_enabled(&self, id_or_name: &str) -> bool {
        self.get(id_or_name)
            .is_some_and(|transform| self.should_run(transform.metadata()))
    }

    /// Looks a transform up by id or by name.
    pub fn get(&self, id_or_name: &str) -> Option<&dyn Transform> {
        self.transforms()
            .find(|t| t.metadata().id == id_or_name || t.metadata().name == id_or_name)
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}

impl Default for TransformRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[macro_export]
macro_rules! declare_transform {
    (
        $name:ident,
        id = $id:literal,
        name = $transform_name:literal,
        description = $desc:literal
        $(, examples = $examples:literal)?
    ) => {
        pub struct $name {
            metadata: $crate::transforms::TransformMetadata,
        }

        impl $name {
            pub fn new() -> Self {
                Self {
                    metadata: $crate::transforms::TransformMetadata {
                        id: $id,
                        name: $transform_name,
                        description: $desc,
                        examples: declare_transform!(@examples $($examples)?),
                    },
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }
    };
    (@examples $examples:literal) => { Some($examples) };
    (@examples) => { None };
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestTransform {
        metadata: TransformMetadata,
    }

    impl TestTransform {
        fn new(id: &'static str, name: &'static str) -> Self {
            Self {
                metadata: TransformMetadata {
                    id,
                    name,
                    description: "A test transform",
                    examples: None,
                },
            }
        }
    }

    impl Transform for TestTransform {
        fn metadata(&self) -> &TransformMetadata {
            &self.metadata
        }

        fn plan(&self, _file: &ParsedFile) -> Result<TransformOutput, TransformError> {
            Ok(TransformOutput::default())
        }
    }

    fn registry() -> TransformRegistry {
        let mut registry = TransformRegistry::new();
        registry.register(Box::new(TestTransform::new("T001", "first")));
        registry.register(Box::new(TestTransform::new("T002", "second")));
        registry
    }

    #[test]
    fn builtins_contain_let_transform() {
        let registry = TransformRegistry::with_builtins();

        assert_eq!(registry.len(), 1);
        let transform = registry.get("let").expect("let transform");
        assert_eq!(transform.metadata().id, "T001");
        assert!(registry.get("T001").is_some());
    }

    #[test]
    fn everything_runs_by_default() {
        let registry = registry();

        let names: Vec<_> = registry
            .enabled_transforms()
            .map(|t| t.metadata().name)
            .collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn configure_enables_and_disables() {
        let mut registry = registry();
        registry.configure(&TransformsConfig {
            enabled: vec!["first".to_string(), "T002".to_string()],
            disabled: vec!["second".to_string()],
        });

        assert!(registry.is_enabled("first"));
        assert!(!registry.is_enabled("second"));
        assert!(!registry.is_enabled("T002"));
    }

    #[test]
    fn select_restricts_to_named_transforms() {
        let mut registry = registry();
        registry.select(["T002"]);

        let names: Vec<_> = registry
            .enabled_transforms()
            .map(|t| t.metadata().name)
            .collect();
        assert_eq!(names, vec!["second"]);
    }

    #[test]
    fn unknown_transform_is_not_enabled() {
        let registry = registry();

        assert!(registry.get("missing").is_none());
        assert!(!registry.is_enabled("missing"));
        assert!(!registry.is_empty());
    }

    #[test]
    fn error_messages() {
        let error = TransformError::OverlappingEdits { at: 12 };
        assert_eq!(error.to_string(), "overlapping edits at byte 12");

        let error = TransformError::from(ParseError {
            line: 1,
            column: 5,
            message: "Expected ident".to_string(),
        });
        assert_eq!(
            error.to_string(),
            "cannot rewrite a file with syntax errors: Expected ident at 1:5"
        );
    }
}
