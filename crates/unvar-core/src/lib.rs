//! Core of unvar: parsing, scope analysis and the `var` rewrite
//!
//! [`TransformEngine`] is the entry point for rewriting a whole file.
//! [`semantic::SemanticModel`] and [`transforms::let_const`] expose the
//! analysis and the decisions on their own.

pub mod config;
pub mod edit;
pub mod engine;
pub mod parser;
pub mod semantic;
pub mod transforms;

pub use config::{Config, ConfigError};
pub use edit::{TextEdit, apply_edits};
pub use engine::{TransformEngine, TransformResult};
pub use parser::{ParseError, ParsedFile, Parser};
pub use transforms::{Decision, DecisionTable, Transform, TransformError, TransformRegistry};
