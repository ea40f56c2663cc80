//! let transform (T001): Replace `var` with `let` or `const` where it is safe
//!
//! Every `var` binding is checked in isolation. It keeps `var` when narrowing
//! its scope could change which occurrences it binds: repeated declarations,
//! collisions with parameters or function names, uses before the declarator
//! and uses outside the block it is written in. Otherwise it becomes `const`
//! when never assigned after initialization and `let` when it is.

pub mod decision;
pub mod emitter;

use serde::Serialize;
use swc_ecma_ast::{Program, VarDecl, VarDeclKind};
use swc_ecma_visit::{Visit, VisitWith};

use crate::declare_transform;
use crate::parser::ParsedFile;
use crate::semantic::{ScopeKind, SemanticModel};
use crate::transforms::{Transform, TransformError, TransformMetadata, TransformOutput};

pub use decision::{BindingDecision, Decision, UnchangedReason};
pub use emitter::Emitter;

declare_transform!(
    LetTransform,
    id = "T001",
    name = "let",
    description = "Replace var with let or const where narrowing the scope is safe",
    examples = "// Before\nvar x = 1, y = 2;\ny = 4;\n\n// After\nconst x = 1;\nlet y = 2;\ny = 4;"
);

impl Transform for LetTransform {
    fn metadata(&self) -> &TransformMetadata {
        &self.metadata
    }

    fn plan(&self, file: &ParsedFile) -> Result<TransformOutput, TransformError> {
        let Some(program) = file.program() else {
            return Ok(TransformOutput::default());
        };

        if count_var_declarations(program) == 0 {
            return Ok(TransformOutput::default());
        }

        let model = SemanticModel::build(program)?;
        Ok(plan_rewrites(file, &model))
    }
}

/// Decides every declarator of every `var` statement and emits the edits.
pub fn plan_rewrites(file: &ParsedFile, model: &SemanticModel) -> TransformOutput {
    let emitter = Emitter::new(file);
    let mut output = TransformOutput::default();

    for (index, statement) in model.statements.iter().enumerate() {
        let mut decided: Vec<BindingDecision> = statement
            .declarators
            .iter()
            .map(|declarator| {
                decision::decide_declarator(declarator, &model.bindings, &model.scope_tree)
            })
            .collect();
        if !statement.placement.allows_split() {
            decision::unify(&mut decided);
        }

        for (declarator, decided) in statement.declarators.iter().zip(&decided) {
            let names = declarator
                .bindings
                .iter()
                .map(|&id| model.bindings.get(id).name.clone())
                .collect();
            let (line, column) = file.location(file.offset(declarator.span.lo));
            let target_scope = decided.target_scope.map(|scope| {
                let scope = model.scope_tree.get(scope);
                let (start_line, _) = file.location(file.offset(scope.span.lo));
                let (end_line, _) = file.location(file.offset(scope.span.hi));
                TargetScope {
                    kind: scope.kind,
                    start_line,
                    end_line,
                }
            });

            tracing::trace!(
                line,
                column,
                decision = ?decided.decision,
                reason = ?decided.reason,
                "declarator decided"
            );

            output.decisions.entries.push(DeclaratorDecision {
                statement: index,
                names,
                line,
                column,
                decision: decided.decision,
                keyword: decided.decision.keyword(),
                reason: decided.reason,
                target_scope,
            });
        }

        let decisions: Vec<Decision> = decided.iter().map(|d| d.decision).collect();
        output.edits.extend(emitter.emit(statement, &decisions));
    }

    // Statements nested in an initializer are recorded after their parent
    output.edits.sort_by_key(|edit| (edit.start, edit.end));
    output
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DecisionTable {
    pub entries: Vec<DeclaratorDecision>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeclaratorDecision {
    /// Index of the `var` statement in source order.
    pub statement: usize,
    pub names: Vec<String>,
    pub line: usize,
    pub column: usize,
    pub decision: Decision,
    pub keyword: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<UnchangedReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_scope: Option<TargetScope>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TargetScope {
    pub kind: ScopeKind,
    pub start_line: usize,
    pub end_line: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DecisionSummary {
    pub r#const: usize,
    pub r#let: usize,
    pub unchanged: usize,
}

impl DecisionTable {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DeclaratorDecision> {
        self.entries.iter()
    }

    pub fn extend(&mut self, other: DecisionTable) {
        self.entries.extend(other.entries);
    }

    pub fn summary(&self) -> DecisionSummary {
        let mut summary = DecisionSummary::default();
        for entry in &self.entries {
            match entry.decision {
                Decision::ImmutableNarrowed => summary.r#const += 1,
                Decision::MutableNarrowed => summary.r#let += 1,
                Decision::Unchanged => summary.unchanged += 1,
            }
        }
        summary
    }
}

#[derive(Default)]
struct VarCounter {
    count: usize,
}

impl Visit for VarCounter {
    fn visit_var_decl(&mut self, node: &VarDecl) {
        if node.kind == VarDeclKind::Var {
            self.count += 1;
        }
        node.visit_children_with(self);
    }
}

/// Number of `var` statements anywhere in the program.
pub fn count_var_declarations(program: &Program) -> usize {
    let mut counter = VarCounter::default();
    program.visit_with(&mut counter);
    counter.count
}
