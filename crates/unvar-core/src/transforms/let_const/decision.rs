//! Per-binding and per-declarator rewrite decisions
//!
//! A `var` binding is narrowed only when every use of it lies after its
//! declarator and inside the scope the declarator is written in. It becomes
//! `const` when it is also initialized and never assigned again.

use serde::Serialize;

use crate::semantic::{Binding, BindingTable, Declarator, Reference, ScopeId, ScopeTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Decision {
    Unchanged,
    MutableNarrowed,
    ImmutableNarrowed,
}

impl Decision {
    pub fn keyword(self) -> &'static str {
        match self {
            Decision::Unchanged => "var",
            Decision::MutableNarrowed => "let",
            Decision::ImmutableNarrowed => "const",
        }
    }

    pub fn is_narrowed(self) -> bool {
        self != Decision::Unchanged
    }

    /// The strongest keyword two declarations can share.
    pub fn combine(self, other: Decision) -> Decision {
        match (self, other) {
            (Decision::Unchanged, _) | (_, Decision::Unchanged) => Decision::Unchanged,
            (Decision::MutableNarrowed, _) | (_, Decision::MutableNarrowed) => {
                Decision::MutableNarrowed
            }
            _ => Decision::ImmutableNarrowed,
        }
    }
}

/// Why a declaration keeps `var`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnchangedReason {
    /// The name is declared with `var` more than once in the same scope.
    Redeclared,
    /// The name collides with a parameter, function or lexical binding.
    Shadows,
    /// The statement sits where only a `var` is allowed.
    SingleStatementPosition,
    /// Used before the declarator finishes.
    UsedBeforeDeclaration,
    /// Used outside the block the declaration is written in.
    UsedOutsideBlock,
    /// The declarator binds nothing that can be rewritten.
    NotRewritable,
    /// Another declarator in the same unsplittable statement keeps `var`.
    SharedStatement,
    /// The name cannot be bound by `let` or `const`.
    ReservedName,
}

impl UnchangedReason {
    pub fn description(self) -> &'static str {
        match self {
            UnchangedReason::Redeclared => "declared more than once in the same function",
            UnchangedReason::Shadows => "collides with a parameter, function or block binding",
            UnchangedReason::SingleStatementPosition => {
                "written where only a var declaration is allowed"
            }
            UnchangedReason::UsedBeforeDeclaration => "used before its declaration",
            UnchangedReason::UsedOutsideBlock => "used outside the block it is declared in",
            UnchangedReason::NotRewritable => "does not declare a rewritable variable",
            UnchangedReason::SharedStatement => "shares a declaration that has to stay var",
            UnchangedReason::ReservedName => "its name cannot be declared with let or const",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindingDecision {
    pub decision: Decision,
    /// Narrowest scope holding the declarator and every reference.
    pub target_scope: Option<ScopeId>,
    pub reason: Option<UnchangedReason>,
}

impl BindingDecision {
    fn unchanged(reason: UnchangedReason) -> Self {
        Self {
            decision: Decision::Unchanged,
            target_scope: None,
            reason: Some(reason),
        }
    }

    fn narrowed(decision: Decision, target_scope: ScopeId) -> Self {
        Self {
            decision,
            target_scope: Some(target_scope),
            reason: None,
        }
    }

    /// Merges the decisions of bindings that share one keyword.
    pub fn combine(self, other: BindingDecision) -> BindingDecision {
        match (self.decision, other.decision) {
            (Decision::Unchanged, _) => self,
            (_, Decision::Unchanged) => other,
            _ => BindingDecision {
                decision: self.decision.combine(other.decision),
                target_scope: self.target_scope,
                reason: None,
            },
        }
    }
}

pub fn decide_binding(binding: &Binding, scope_tree: &ScopeTree) -> BindingDecision {
    if !binding.is_candidate() {
        return BindingDecision::unchanged(UnchangedReason::NotRewritable);
    }
    if binding.multiple_declarators {
        return BindingDecision::unchanged(UnchangedReason::Redeclared);
    }
    if binding.shadowed_by_incompatible_origin {
        return BindingDecision::unchanged(UnchangedReason::Shadows);
    }
    if binding.unanalyzable {
        return BindingDecision::unchanged(UnchangedReason::SingleStatementPosition);
    }
    // `let` cannot name a lexical binding
    if binding.name == "let" {
        return BindingDecision::unchanged(UnchangedReason::ReservedName);
    }

    if binding
        .references
        .iter()
        .any(|reference| used_before_declaration(binding, reference))
    {
        return BindingDecision::unchanged(UnchangedReason::UsedBeforeDeclaration);
    }

    if binding
        .references
        .iter()
        .any(|reference| !scope_tree.is_descendant_of(reference.scope, binding.written_scope))
    {
        return BindingDecision::unchanged(UnchangedReason::UsedOutsideBlock);
    }

    let mutated = binding
        .references
        .iter()
        .any(|reference| reference.kind.is_mutation());
    let decision = if !binding.has_initializer || mutated {
        Decision::MutableNarrowed
    } else {
        Decision::ImmutableNarrowed
    };

    BindingDecision::narrowed(decision, binding.written_scope)
}

/// A use in the same function counts until the whole declarator has run,
/// initializer included. A use inside a nested function is ordered by where
/// the function is written, so only one written ahead of the name counts.
pub fn used_before_declaration(binding: &Binding, reference: &Reference) -> bool {
    let cutoff = if reference.function_scope == binding.scope {
        binding.declarator_end
    } else {
        binding.span.hi
    };
    reference.span.lo < cutoff
}

pub fn decide_declarator(
    declarator: &Declarator,
    bindings: &BindingTable,
    scope_tree: &ScopeTree,
) -> BindingDecision {
    declarator
        .bindings
        .iter()
        .map(|&id| decide_binding(bindings.get(id), scope_tree))
        .reduce(BindingDecision::combine)
        .unwrap_or(BindingDecision::unchanged(UnchangedReason::NotRewritable))
}

/// Decisions for every declarator of a statement that cannot be split all
/// collapse to one keyword.
pub fn unify(decisions: &mut [BindingDecision]) {
    let Some(shared) = decisions.iter().copied().reduce(BindingDecision::combine) else {
        return;
    };
    for decision in decisions.iter_mut() {
        if shared.decision == Decision::Unchanged && decision.decision != Decision::Unchanged {
            *decision = BindingDecision::unchanged(UnchangedReason::SharedStatement);
        } else {
            decision.decision = shared.decision;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use crate::semantic::SemanticModel;

    fn decisions(code: &str) -> Vec<(String, Decision)> {
        let result = Parser::new().parse_recovering(code);
        let program = result.program.expect("parse failed");
        let model = SemanticModel::build(&program).expect("valid input");

        model
            .statements
            .iter()
            .flat_map(|statement| statement.declarators.iter())
            .map(|declarator| {
                let names = declarator
                    .bindings
                    .iter()
                    .map(|&id| model.bindings.get(id).name.clone())
                    .collect::<Vec<_>>()
                    .join(",");
                let decision = decide_declarator(declarator, &model.bindings, &model.scope_tree);
                (names, decision.decision)
            })
            .collect()
    }

    fn decision_of(code: &str) -> Decision {
        decisions(code)[0].1
    }

    #[test]
    fn uninitialized_is_let() {
        assert_eq!(decision_of("var x;"), Decision::MutableNarrowed);
    }

    #[test]
    fn initialized_and_never_assigned_is_const() {
        assert_eq!(decision_of("var x = 2;\nfoo(x);"), Decision::ImmutableNarrowed);
    }

    #[test]
    fn assignment_or_update_is_let() {
        assert_eq!(decision_of("var x = 5;\nx = 6;"), Decision::MutableNarrowed);
        assert_eq!(decision_of("var x = 5;\nx++;"), Decision::MutableNarrowed);
    }

    #[test]
    fn use_before_declaration_is_unchanged() {
        assert_eq!(decision_of("a = 1;\nvar a = 2;"), Decision::Unchanged);
        assert_eq!(decision_of("foo(a);\nvar a = 2;"), Decision::Unchanged);
    }

    #[test]
    fn self_reference_in_initializer_is_unchanged() {
        assert_eq!(decision_of("var a = a || {};"), Decision::Unchanged);
    }

    #[test]
    fn self_reference_in_nested_function_is_not_early() {
        assert_eq!(
            decision_of("var f = function () { return f; };"),
            Decision::ImmutableNarrowed
        );
        assert_eq!(
            decision_of("var o = { m() { return o; } };\nuse(o);"),
            Decision::ImmutableNarrowed
        );
    }

    #[test]
    fn nested_function_written_before_declaration_is_early() {
        assert_eq!(
            decision_of("function g() { return a; }\nvar a = 1;"),
            Decision::Unchanged
        );
    }

    #[test]
    fn variable_named_let_is_unchanged() {
        let result = Parser::new().parse_recovering("var let = 1;");
        let program = result.program.expect("parse failed");
        let model = SemanticModel::build(&program).expect("valid input");
        let declarator = &model.statements[0].declarators[0];

        let decided = decide_declarator(declarator, &model.bindings, &model.scope_tree);

        assert_eq!(decided.decision, Decision::Unchanged);
        assert_eq!(decided.reason, Some(UnchangedReason::ReservedName));
    }

    #[test]
    fn use_outside_block_is_unchanged() {
        assert_eq!(
            decision_of("if (true) {\n  var a = 1;\n}\nfoo(a);"),
            Decision::Unchanged
        );
    }

    #[test]
    fn use_inside_nested_function_in_block_counts() {
        assert_eq!(
            decision_of("if (true) {\n  var a = 1;\n  fn = () => a;\n}"),
            Decision::ImmutableNarrowed
        );
    }

    #[test]
    fn destructuring_combines_bindings() {
        assert_eq!(
            decision_of("var {a, b} = obj;\nb = 2;"),
            Decision::MutableNarrowed
        );
        assert_eq!(
            decision_of("var [a, b] = arr;\nfoo(a, b);"),
            Decision::ImmutableNarrowed
        );
    }

    #[test]
    fn combine_prefers_weakest_keyword() {
        use Decision::*;

        assert_eq!(ImmutableNarrowed.combine(ImmutableNarrowed), ImmutableNarrowed);
        assert_eq!(ImmutableNarrowed.combine(MutableNarrowed), MutableNarrowed);
        assert_eq!(MutableNarrowed.combine(Unchanged), Unchanged);
        assert_eq!(Unchanged.combine(ImmutableNarrowed), Unchanged);
    }

    #[test]
    fn keywords() {
        assert_eq!(Decision::Unchanged.keyword(), "var");
        assert_eq!(Decision::MutableNarrowed.keyword(), "let");
        assert_eq!(Decision::ImmutableNarrowed.keyword(), "const");
    }

    #[test]
    fn unify_collapses_to_shared_keyword() {
        let result = Parser::new().parse_recovering("for (var i = 0, n = 3; i < n; i++) {}");
        let program = result.program.expect("parse failed");
        let model = SemanticModel::build(&program).expect("valid input");

        let mut decided: Vec<_> = model.statements[0]
            .declarators
            .iter()
            .map(|d| decide_declarator(d, &model.bindings, &model.scope_tree))
            .collect();
        assert_eq!(decided[1].decision, Decision::ImmutableNarrowed);

        unify(&mut decided);
        assert!(decided.iter().all(|d| d.decision == Decision::MutableNarrowed));
    }

    #[test]
    fn unify_keeps_var_when_any_declarator_must() {
        let result = Parser::new().parse_recovering("for (var i = 0, n = 3; i < n; i++) {}\nfoo(i);");
        let program = result.program.expect("parse failed");
        let model = SemanticModel::build(&program).expect("valid input");

        let mut decided: Vec<_> = model.statements[0]
            .declarators
            .iter()
            .map(|d| decide_declarator(d, &model.bindings, &model.scope_tree))
            .collect();
        unify(&mut decided);

        assert_eq!(decided[0].reason, Some(UnchangedReason::UsedOutsideBlock));
        assert_eq!(decided[1].reason, Some(UnchangedReason::SharedStatement));
    }

    #[test]
    fn serializes_kebab_case() {
        let json = serde_json::to_string(&Decision::ImmutableNarrowed).expect("serialize");
        assert_eq!(json, "\"immutable-narrowed\"");

        let json = serde_json::to_string(&UnchangedReason::UsedOutsideBlock).expect("serialize");
        assert_eq!(json, "\"used-outside-block\"");
    }
}
