//! First semantic pass: scopes, bindings and `var` statement records

use std::collections::HashSet;

use swc_common::Span;
use swc_ecma_ast::{Ident, VarDecl, VarDeclarator};

use super::bindings::{BindingId, BindingOrigin, BindingTable};
use super::declarations::{DeclarationStatement, Declarator, Placement};
use super::scope::{ScopeId, ScopeKind, ScopeTree};
use super::walk::ScopeVisitor;
use super::InvalidInputError;

pub struct ScopeBuilder {
    pub scope_tree: ScopeTree,
    pub bindings: BindingTable,
    pub statements: Vec<DeclarationStatement>,
    pub errors: Vec<InvalidInputError>,
    scope_stack: Vec<ScopeId>,
    // Statements and declarators nest through function initializers
    open_statements: Vec<DeclarationStatement>,
    open_declarators: Vec<Declarator>,
}

impl Default for ScopeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeBuilder {
    pub fn new() -> Self {
        Self {
            scope_tree: ScopeTree::new(),
            bindings: BindingTable::new(),
            statements: Vec::new(),
            errors: Vec::new(),
            scope_stack: Vec::new(),
            open_statements: Vec::new(),
            open_declarators: Vec::new(),
        }
    }

    fn current_scope(&self) -> Option<ScopeId> {
        self.scope_stack.last().copied()
    }

    /// Marks every `var` whose name is bound by a non-var declaration in a
    /// scope between the one it is written in and the one it hoists to, or
    /// by a function declared in a block that hoists to the same scope.
    pub fn finish(&mut self) {
        // Sloppy scripts also assign block functions to the enclosing
        // function's binding of the same name
        let block_functions: HashSet<(&str, ScopeId)> = self
            .bindings
            .iter()
            .filter(|binding| {
                binding.origin == BindingOrigin::FunctionDeclarationName
                    && self.scope_tree.get(binding.scope).kind == ScopeKind::Block
            })
            .map(|binding| {
                (
                    binding.name.as_str(),
                    self.scope_tree.hoisting_scope(binding.scope),
                )
            })
            .collect();

        let shadowed: Vec<BindingId> = self
            .bindings
            .candidates()
            .filter(|binding| {
                block_functions.contains(&(binding.name.as_str(), binding.scope))
                    || self
                        .scope_tree
                        .ancestors(binding.written_scope)
                        .take_while(|scope| scope.id != binding.scope)
                        .any(|scope| self.bindings.lookup_in(&binding.name, scope.id).is_some())
            })
            .map(|binding| binding.id)
            .collect();

        for id in shadowed {
            self.bindings.get_mut(id).shadowed_by_incompatible_origin = true;
        }

        self.statements.sort_by_key(|statement| statement.span.lo);
    }

    fn bind_var(&mut self, ident: &Ident, written_scope: ScopeId) -> BindingId {
        let name = ident.sym.as_str();
        let governing = self.scope_tree.hoisting_scope(written_scope);

        let existing = self
            .bindings
            .lookup_in(name, governing)
            .map(|id| (id, self.bindings.get(id).origin));

        let id = match existing {
            Some((id, BindingOrigin::LegacyVar)) => {
                self.bindings.get_mut(id).multiple_declarators = true;
                return id;
            }
            Some(_) => {
                let id = self.bindings.declare_detached(
                    name,
                    BindingOrigin::LegacyVar,
                    governing,
                    ident.span,
                );
                self.bindings.get_mut(id).shadowed_by_incompatible_origin = true;
                id
            }
            None => self
                .bindings
                .declare(name, BindingOrigin::LegacyVar, governing, ident.span),
        };

        let unanalyzable = self.open_statements.last().is_none_or(|statement| {
            statement.ambient || statement.placement == Placement::SingleStatementBody
        });
        let (declarator_end, has_initializer) = self
            .open_declarators
            .last()
            .map(|declarator| (declarator.span.hi, declarator.has_initializer))
            .unwrap_or((ident.span.hi, false));

        let binding = self.bindings.get_mut(id);
        binding.written_scope = written_scope;
        binding.declarator_end = declarator_end;
        binding.has_initializer = has_initializer;
        binding.unanalyzable = unanalyzable;
        id
    }
}

impl ScopeVisitor for ScopeBuilder {
    fn enter_scope(&mut self, kind: ScopeKind, span: Span) {
        let id = self
            .scope_tree
            .create_scope(kind, self.current_scope(), span);
        self.scope_stack.push(id);
    }

    fn exit_scope(&mut self) {
        self.scope_stack.pop();
    }

    fn declare(&mut self, ident: &Ident, origin: BindingOrigin) {
        let Some(scope) = self.current_scope() else {
            return;
        };
        let name = ident.sym.as_str();

        match self.bindings.lookup_in(name, scope) {
            Some(existing) => {
                let binding = self.bindings.get_mut(existing);
                if binding.origin == BindingOrigin::LegacyVar {
                    binding.shadowed_by_incompatible_origin = true;
                }
            }
            None => {
                self.bindings.declare(name, origin, scope, ident.span);
            }
        }
    }

    fn begin_var_statement(&mut self, decl: &VarDecl, placement: Placement) {
        let Some(scope) = self.current_scope() else {
            return;
        };
        self.open_statements.push(DeclarationStatement {
            span: decl.span,
            keyword: DeclarationStatement::keyword_span(decl.span),
            placement,
            scope,
            ambient: decl.declare,
            declarators: Vec::new(),
        });
    }

    fn end_var_statement(&mut self) {
        if let Some(statement) = self.open_statements.pop() {
            self.statements.push(statement);
        }
    }

    fn begin_var_declarator(&mut self, declarator: &VarDeclarator, initialized: bool) {
        self.open_declarators.push(Declarator {
            span: declarator.span,
            has_initializer: initialized,
            bindings: Vec::new(),
        });
    }

    fn end_var_declarator(&mut self) {
        let Some(declarator) = self.open_declarators.pop() else {
            return;
        };
        if let Some(statement) = self.open_statements.last_mut() {
            statement.declarators.push(declarator);
        }
    }

    fn declare_var(&mut self, ident: &Ident) {
        let Some(scope) = self.current_scope() else {
            return;
        };
        let id = self.bind_var(ident, scope);
        if let Some(declarator) = self.open_declarators.last_mut() {
            if !declarator.bindings.contains(&id) {
                declarator.bindings.push(id);
            }
        }
    }

    fn invalid_pattern(&mut self, span: Span) {
        self.errors.push(InvalidInputError::InvalidPattern {
            lo: span.lo.0,
            hi: span.hi.0,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use crate::semantic::walk::walk_program;

    fn build(code: &str) -> ScopeBuilder {
        let result = Parser::new().parse_recovering(code);
        let program = result.program.expect("parse failed");
        let mut builder = ScopeBuilder::new();
        walk_program(&program, &mut builder);
        builder.finish();
        builder
    }

    fn var_binding<'a>(
        builder: &'a ScopeBuilder,
        name: &str,
    ) -> &'a crate::semantic::bindings::Binding {
        builder
            .bindings
            .candidates()
            .find(|b| b.name == name)
            .expect("binding not found")
    }

    #[test]
    fn var_hoists_to_function_scope() {
        let builder = build("function f() { if (c) { var a = 1; } }");
        let binding = var_binding(&builder, "a");

        assert_eq!(builder.scope_tree.get(binding.scope).kind, ScopeKind::Function);
        assert_eq!(
            builder.scope_tree.get(binding.written_scope).kind,
            ScopeKind::Block
        );
        assert!(binding.has_initializer);
    }

    #[test]
    fn repeated_var_sets_multiple_declarators() {
        let builder = build("var a = 1;\nvar a = 2;");

        assert_eq!(builder.bindings.candidates().count(), 1);
        assert!(var_binding(&builder, "a").multiple_declarators);
        assert_eq!(builder.statements.len(), 2);
        assert_eq!(
            builder.statements[0].declarators[0].bindings,
            builder.statements[1].declarators[0].bindings
        );
    }

    #[test]
    fn var_redeclaring_parameter_is_shadowed() {
        let builder = build("function foo(a) {\n  var a = 1;\n}");

        assert!(var_binding(&builder, "a").shadowed_by_incompatible_origin);
    }

    #[test]
    fn var_redeclaring_function_expression_name_is_shadowed() {
        let builder = build("(function foo(a) {\n  var foo;\n  return foo;\n})();");

        assert!(var_binding(&builder, "foo").shadowed_by_incompatible_origin);
    }

    #[test]
    fn function_declaration_name_lives_in_enclosing_scope() {
        let builder = build("function foo(a) {\n  var foo;\n  return foo;\n}");
        let binding = var_binding(&builder, "foo");

        assert!(!binding.shadowed_by_incompatible_origin);
        assert!(!binding.has_initializer);
    }

    #[test]
    fn later_function_declaration_shadows_var() {
        let builder = build("var a = 1;\nfunction a() {}");

        assert!(var_binding(&builder, "a").shadowed_by_incompatible_origin);
    }

    #[test]
    fn block_function_with_same_name_shadows_var() {
        let builder = build("var a = 1;\n{\n  function a() {}\n}");

        assert!(var_binding(&builder, "a").shadowed_by_incompatible_origin);
    }

    #[test]
    fn block_function_in_nested_function_leaves_outer_var_alone() {
        let builder = build("var a = 1;\nfunction f() {\n  {\n    function a() {}\n  }\n}");

        assert!(!var_binding(&builder, "a").shadowed_by_incompatible_origin);
    }

    #[test]
    fn var_inside_catch_with_same_name_is_shadowed() {
        let builder = build("try {} catch (e) { var e = 1; }");

        assert!(var_binding(&builder, "e").shadowed_by_incompatible_origin);
    }

    #[test]
    fn single_statement_var_is_unanalyzable() {
        let builder = build("if (c) var a = 1;");

        assert!(var_binding(&builder, "a").unanalyzable);
        assert_eq!(
            builder.statements[0].placement,
            Placement::SingleStatementBody
        );
    }

    #[test]
    fn for_in_head_counts_as_initialized() {
        let builder = build("for (var k in obj) {}");
        let binding = var_binding(&builder, "k");

        assert!(binding.has_initializer);
        assert_eq!(builder.statements[0].placement, Placement::ForHead);
    }

    #[test]
    fn declarator_end_covers_initializer() {
        let code = "var a = foo(a);";
        let builder = build(code);
        let binding = var_binding(&builder, "a");

        assert!(binding.declarator_end > binding.span.hi);
    }

    #[test]
    fn nested_statements_are_recorded_in_source_order() {
        let builder = build("var f = function () { var inner = 1; }, g = 2;");

        assert_eq!(builder.statements.len(), 2);
        assert_eq!(builder.statements[0].declarators.len(), 2);
        assert_eq!(builder.statements[1].declarators.len(), 1);
    }

    #[test]
    fn destructuring_declarator_collects_all_bindings() {
        let builder = build("var {a, b: [c]} = obj;");

        assert_eq!(builder.statements[0].declarators[0].bindings.len(), 2);
    }
}
