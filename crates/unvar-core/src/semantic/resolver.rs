//! Second semantic pass: attach identifier occurrences to bindings

use swc_common::Span;
use swc_ecma_ast::Ident;

use super::bindings::{BindingTable, Reference, ReferenceKind};
use super::scope::{ScopeId, ScopeKind, ScopeTree};
use super::walk::ScopeVisitor;

/// Replays the scopes created by the builder through a per-scope cursor over
/// their children, so every occurrence is resolved from the scope it was
/// written in.
pub struct ReferenceResolver<'a> {
    scope_tree: &'a ScopeTree,
    bindings: &'a mut BindingTable,
    stack: Vec<Frame>,
    unresolved: usize,
}

struct Frame {
    scope: ScopeId,
    next_child: usize,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(scope_tree: &'a ScopeTree, bindings: &'a mut BindingTable) -> Self {
        Self {
            scope_tree,
            bindings,
            stack: Vec::new(),
            unresolved: 0,
        }
    }

    /// Occurrences that matched no binding, such as globals.
    pub fn unresolved_count(&self) -> usize {
        self.unresolved
    }

    fn current_scope(&self) -> Option<ScopeId> {
        self.stack.last().map(|frame| frame.scope)
    }

    fn next_scope(&mut self) -> Option<ScopeId> {
        match self.stack.last_mut() {
            Some(frame) => {
                let child = self
                    .scope_tree
                    .get(frame.scope)
                    .children
                    .get(frame.next_child)
                    .copied();
                frame.next_child += 1;
                child
            }
            None => self.scope_tree.root(),
        }
    }
}

impl ScopeVisitor for ReferenceResolver<'_> {
    fn enter_scope(&mut self, kind: ScopeKind, _span: Span) {
        let scope = match self.next_scope() {
            Some(scope) => scope,
            None => {
                tracing::warn!(?kind, "scope replay out of step with scope tree");
                match self.current_scope() {
                    Some(scope) => scope,
                    None => return,
                }
            }
        };
        self.stack.push(Frame {
            scope,
            next_child: 0,
        });
    }

    fn exit_scope(&mut self) {
        self.stack.pop();
    }

    fn reference(&mut self, ident: &Ident, kind: ReferenceKind) {
        let Some(scope) = self.current_scope() else {
            return;
        };

        match self
            .bindings
            .lookup(ident.sym.as_str(), scope, self.scope_tree)
        {
            Some(binding_id) => {
                self.bindings.add_reference(
                    binding_id,
                    Reference {
                        kind,
                        span: ident.span,
                        scope,
                        function_scope: self.scope_tree.hoisting_scope(scope),
                    },
                );
            }
            None => self.unresolved += 1,
        }
    }

    fn declare_var(&mut self, ident: &Ident) {
        let Some(scope) = self.current_scope() else {
            return;
        };
        let function_scope = self.scope_tree.hoisting_scope(scope);

        let Some(binding_id) = self.bindings.lookup_in(ident.sym.as_str(), function_scope) else {
            return;
        };
        if self.bindings.get(binding_id).span == ident.span {
            return;
        }

        self.bindings.add_reference(
            binding_id,
            Reference {
                kind: ReferenceKind::Redeclare,
                span: ident.span,
                scope,
                function_scope,
            },
        );
    }
}
