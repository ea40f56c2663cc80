//! Semantic analysis module
//!
//! Builds the scope tree and binding table for one program in two passes:
//! [`ScopeBuilder`] declares, [`ReferenceResolver`] resolves.

pub mod bindings;
pub mod builder;
pub mod declarations;
pub mod resolver;
pub mod scope;
pub mod walk;

use swc_ecma_ast::Program;

pub use bindings::{
    Binding, BindingId, BindingOrigin, BindingTable, Reference, ReferenceKind,
};
pub use builder::ScopeBuilder;
pub use declarations::{DeclarationStatement, Declarator, Placement};
pub use resolver::ReferenceResolver;
pub use scope::{AncestorIter, Scope, ScopeId, ScopeKind, ScopeTree};
pub use walk::{ScopeVisitor, walk_program};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidInputError {
    #[error("declarator pattern at {lo}..{hi} does not bind a name")]
    InvalidPattern { lo: u32, hi: u32 },
}

pub struct SemanticModel {
    pub scope_tree: ScopeTree,
    pub bindings: BindingTable,
    /// Every `var` statement, in source order.
    pub statements: Vec<DeclarationStatement>,
    pub unresolved_count: usize,
}

impl SemanticModel {
    pub fn build(program: &Program) -> Result<Self, InvalidInputError> {
        let mut builder = ScopeBuilder::new();
        walk_program(program, &mut builder);

        if let Some(error) = builder.errors.drain(..).next() {
            return Err(error);
        }
        builder.finish();

        let ScopeBuilder {
            scope_tree,
            mut bindings,
            statements,
            ..
        } = builder;

        let mut resolver = ReferenceResolver::new(&scope_tree, &mut bindings);
        walk_program(program, &mut resolver);
        let unresolved_count = resolver.unresolved_count();

        Ok(Self {
            scope_tree,
            bindings,
            statements,
            unresolved_count,
        })
    }
}
