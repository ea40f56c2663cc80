//! Records of `var` statements and their declarators

use swc_common::{BytePos, Span};

use super::bindings::BindingId;
use super::scope::ScopeId;

/// Where a `var` statement appears, which limits how it may be rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Placement {
    /// A statement in a statement list (program, block, function body, case).
    Statement,
    /// The head of a `for`, `for-in` or `for-of` loop.
    ForHead,
    /// `export var ...`
    Export,
    /// The sole body of `if`, `while`, a label and similar, where a lexical
    /// declaration is a syntax error.
    SingleStatementBody,
}

impl Placement {
    /// Whether one statement here may become several.
    pub fn allows_split(self) -> bool {
        matches!(self, Placement::Statement)
    }
}

#[derive(Debug, Clone)]
pub struct Declarator {
    pub span: Span,
    pub has_initializer: bool,
    /// Bindings declared by the declarator's pattern, in source order.
    pub bindings: Vec<BindingId>,
}

#[derive(Debug, Clone)]
pub struct DeclarationStatement {
    pub span: Span,
    /// Position of the `var` keyword.
    pub keyword: Span,
    pub placement: Placement,
    /// Scope the statement is written in.
    pub scope: ScopeId,
    /// `declare var` in TypeScript.
    pub ambient: bool,
    pub declarators: Vec<Declarator>,
}

impl DeclarationStatement {
    pub fn keyword_span(span: Span) -> Span {
        Span::new(span.lo, BytePos(span.lo.0 + 3))
    }
}
