//! Binding table for tracking declarations and the references resolved to them
//!
//! Bindings live in an arena and are indexed per governing scope by name.
//! Lookup walks the scope chain innermost-first.

use std::collections::HashMap;

use id_arena::{Arena, Id};
use swc_common::{BytePos, Span};

use super::scope::{ScopeId, ScopeTree};

pub type BindingId = Id<Binding>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum BindingOrigin {
    /// Declared with `var`. The only origin the rewrite considers.
    LegacyVar,
    Parameter,
    FunctionDeclarationName,
    FunctionExpressionName,
    /// `let`, `const`, `class`, catch parameters and imports.
    Lexical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum ReferenceKind {
    Read,
    Write,
    Update,
    Redeclare,
}

impl ReferenceKind {
    pub fn is_mutation(self) -> bool {
        !matches!(self, ReferenceKind::Read)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
    pub kind: ReferenceKind,
    pub span: Span,
    /// Innermost scope containing the occurrence.
    pub scope: ScopeId,
    /// Nearest Function or Global scope containing the occurrence.
    pub function_scope: ScopeId,
}

#[derive(Debug)]
pub struct Binding {
    pub id: BindingId,
    pub name: String,
    pub origin: BindingOrigin,
    /// Governing scope. For `var` this is the hoisting target, not the block
    /// the declaration is written in.
    pub scope: ScopeId,
    /// Span of the declaring identifier.
    pub span: Span,
    /// End of the whole declarator, initializer included.
    pub declarator_end: BytePos,
    pub has_initializer: bool,
    /// Innermost scope lexically containing the declarator.
    pub written_scope: ScopeId,
    pub multiple_declarators: bool,
    pub shadowed_by_incompatible_origin: bool,
    /// The declaration sits where a lexical declaration is not allowed.
    pub unanalyzable: bool,
    /// Sorted by source position.
    pub references: Vec<Reference>,
}

impl Binding {
    pub fn is_candidate(&self) -> bool {
        self.origin == BindingOrigin::LegacyVar
    }
}

pub struct BindingTable {
    arena: Arena<Binding>,
    by_scope: HashMap<ScopeId, HashMap<String, BindingId>>,
}

impl Default for BindingTable {
    fn default() -> Self {
        Self::new()
    }
}

impl BindingTable {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            by_scope: HashMap::new(),
        }
    }

    pub fn declare(
        &mut self,
        name: &str,
        origin: BindingOrigin,
        scope: ScopeId,
        span: Span,
    ) -> BindingId {
        let id = self.declare_detached(name, origin, scope, span);

        self.by_scope
            .entry(scope)
            .or_default()
            .insert(name.to_string(), id);

        id
    }

    /// Allocates a binding that lookups never return. Used for a `var` that
    /// collides with an existing non-var binding of its scope.
    pub fn declare_detached(
        &mut self,
        name: &str,
        origin: BindingOrigin,
        scope: ScopeId,
        span: Span,
    ) -> BindingId {
        self.arena.alloc_with_id(|id| Binding {
            id,
            name: name.to_string(),
            origin,
            scope,
            span,
            declarator_end: span.hi,
            has_initializer: false,
            written_scope: scope,
            multiple_declarators: false,
            shadowed_by_incompatible_origin: false,
            unanalyzable: false,
            references: Vec::new(),
        })
    }

    /// Binding of `name` owned by exactly `scope`, without walking outward.
    pub fn lookup_in(&self, name: &str, scope: ScopeId) -> Option<BindingId> {
        self.by_scope
            .get(&scope)
            .and_then(|bindings| bindings.get(name))
            .copied()
    }

    pub fn lookup(&self, name: &str, scope: ScopeId, scope_tree: &ScopeTree) -> Option<BindingId> {
        scope_tree
            .ancestors(scope)
            .find_map(|s| self.lookup_in(name, s.id))
    }

    pub fn get(&self, id: BindingId) -> &Binding {
        &self.arena[id]
    }

    pub fn get_mut(&mut self, id: BindingId) -> &mut Binding {
        &mut self.arena[id]
    }

    pub fn add_reference(&mut self, binding_id: BindingId, reference: Reference) {
        let references = &mut self.arena[binding_id].references;
        let index = references.partition_point(|r| r.span.lo <= reference.span.lo);
        references.insert(index, reference);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.arena.iter().map(|(_, b)| b)
    }

    pub fn candidates(&self) -> impl Iterator<Item = &Binding> {
        self.iter().filter(|b| b.is_candidate())
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.len() == 0
    }
}
