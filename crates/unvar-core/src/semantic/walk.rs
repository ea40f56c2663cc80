//! Scope-aware traversal shared by the semantic passes
//!
//! [`walk_program`] visits a [`Program`] in source order and reports scope
//! boundaries, declarations and identifier occurrences to a [`ScopeVisitor`].
//! Both the scope builder and the reference resolver are driven by this one
//! routine, so they agree on which regions open a scope and in what order.
//!
//! Every identifier is classified here. Property keys, labels, class member
//! names and the like are never reported; everything else is either a
//! declaration or a [`ReferenceKind`] occurrence.

use swc_common::{Span, Spanned};
use swc_ecma_ast::{
    ArrowExpr, AssignTarget, AssignTargetPat, BlockStmt, BlockStmtOrExpr, Callee, CatchClause,
    Class, ClassMember, Decl, DefaultDecl, ExportSpecifier, Expr, FnDecl, FnExpr, ForHead,
    ForInStmt, ForOfStmt, ForStmt, Function, Ident, ImportSpecifier, JSXAttrOrSpread,
    JSXAttrValue, JSXElement, JSXElementChild, JSXElementName, JSXExpr, JSXMemberExpr, JSXObject,
    MemberExpr, MemberProp, Module, ModuleDecl, ModuleExportName, ModuleItem, ObjectPatProp,
    OptChainBase, ParamOrTsParamProp, Pat, Program, Prop, PropName, PropOrSpread, Script,
    SimpleAssignTarget, Stmt, SuperProp, SwitchStmt, TryStmt, TsParamPropParam, VarDecl,
    VarDeclKind, VarDeclOrExpr, VarDeclarator,
};

use super::bindings::{BindingOrigin, ReferenceKind};
use super::declarations::Placement;
use super::scope::ScopeKind;

/// Receives the events of a scope-aware walk.
///
/// Scope events are mandatory; everything else defaults to a no-op so each
/// pass only implements what it consumes.
pub trait ScopeVisitor {
    fn enter_scope(&mut self, kind: ScopeKind, span: Span);

    fn exit_scope(&mut self);

    /// A non-`var` declaration in the current scope.
    fn declare(&mut self, _ident: &Ident, _origin: BindingOrigin) {}

    fn begin_var_statement(&mut self, _decl: &VarDecl, _placement: Placement) {}

    fn end_var_statement(&mut self) {}

    /// `initialized` is true when the declarator has an initializer or sits
    /// in a `for-in`/`for-of` head.
    fn begin_var_declarator(&mut self, _declarator: &VarDeclarator, _initialized: bool) {}

    fn end_var_declarator(&mut self) {}

    /// A name bound by the current `var` declarator.
    fn declare_var(&mut self, _ident: &Ident) {}

    fn reference(&mut self, _ident: &Ident, _kind: ReferenceKind) {}

    /// A `var` declarator pattern that cannot bind anything.
    fn invalid_pattern(&mut self, _span: Span) {}
}

pub fn walk_program<V: ScopeVisitor>(program: &Program, visitor: &mut V) {
    let mut walker = Walker { visitor };
    match program {
        Program::Module(module) => walker.walk_module(module),
        Program::Script(script) => walker.walk_script(script),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StmtPosition {
    List,
    Single,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PatRole {
    Var,
    Param,
    Lexical,
}

struct Walker<'v, V> {
    visitor: &'v mut V,
}

impl<V: ScopeVisitor> Walker<'_, V> {
    fn walk_module(&mut self, module: &Module) {
        self.visitor.enter_scope(ScopeKind::Global, module.span);
        for item in &module.body {
            match item {
                ModuleItem::ModuleDecl(decl) => self.walk_module_decl(decl),
                ModuleItem::Stmt(stmt) => self.walk_stmt(stmt, StmtPosition::List),
            }
        }
        self.visitor.exit_scope();
    }

    fn walk_script(&mut self, script: &Script) {
        self.visitor.enter_scope(ScopeKind::Global, script.span);
        self.walk_stmts(&script.body);
        self.visitor.exit_scope();
    }

    fn walk_module_decl(&mut self, decl: &ModuleDecl) {
        match decl {
            ModuleDecl::Import(import) => {
                for specifier in &import.specifiers {
                    let local = match specifier {
                        ImportSpecifier::Named(named) => &named.local,
                        ImportSpecifier::Default(default) => &default.local,
                        ImportSpecifier::Namespace(namespace) => &namespace.local,
                    };
                    self.visitor.declare(local, BindingOrigin::Lexical);
                }
            }
            ModuleDecl::ExportDecl(export_decl) => {
                self.walk_decl(&export_decl.decl, Placement::Export);
            }
            ModuleDecl::ExportDefaultDecl(export_default) => match &export_default.decl {
                DefaultDecl::Fn(fn_expr) => {
                    if let Some(ident) = &fn_expr.ident {
                        self.visitor
                            .declare(ident, BindingOrigin::FunctionDeclarationName);
                    }
                    self.walk_function(&fn_expr.function, None);
                }
                DefaultDecl::Class(class_expr) => {
                    if let Some(ident) = &class_expr.ident {
                        self.visitor.declare(ident, BindingOrigin::Lexical);
                    }
                    self.walk_class(&class_expr.class);
                }
                _ => {}
            },
            ModuleDecl::ExportDefaultExpr(export_expr) => self.walk_expr(&export_expr.expr),
            ModuleDecl::ExportNamed(named_export) => {
                // Re-exports from another module do not touch local bindings
                if named_export.src.is_none() {
                    for specifier in &named_export.specifiers {
                        if let ExportSpecifier::Named(named) = specifier {
                            if let ModuleExportName::Ident(ident) = &named.orig {
                                self.visitor.reference(ident, ReferenceKind::Read);
                            }
                        }
                    }
                }
            }
            ModuleDecl::TsImportEquals(import_equals) => {
                self.visitor.declare(&import_equals.id, BindingOrigin::Lexical);
            }
            ModuleDecl::TsExportAssignment(assignment) => self.walk_expr(&assignment.expr),
            _ => {}
        }
    }

    fn walk_stmts(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            self.walk_stmt(stmt, StmtPosition::List);
        }
    }

    fn walk_stmt(&mut self, stmt: &Stmt, position: StmtPosition) {
        match stmt {
            Stmt::Decl(decl) => {
                let placement = match position {
                    StmtPosition::List => Placement::Statement,
                    StmtPosition::Single => Placement::SingleStatementBody,
                };
                self.walk_decl(decl, placement);
            }
            Stmt::Block(block) => self.walk_block(block),
            Stmt::Expr(expr_stmt) => self.walk_expr(&expr_stmt.expr),
            Stmt::If(if_stmt) => {
                self.walk_expr(&if_stmt.test);
                self.walk_stmt(&if_stmt.cons, StmtPosition::Single);
                if let Some(alt) = &if_stmt.alt {
                    self.walk_stmt(alt, StmtPosition::Single);
                }
            }
            Stmt::For(for_stmt) => self.walk_for(for_stmt),
            Stmt::ForIn(for_in) => self.walk_for_in(for_in),
            Stmt::ForOf(for_of) => self.walk_for_of(for_of),
            Stmt::While(while_stmt) => {
                self.walk_expr(&while_stmt.test);
                self.walk_stmt(&while_stmt.body, StmtPosition::Single);
            }
            Stmt::DoWhile(do_while) => {
                self.walk_stmt(&do_while.body, StmtPosition::Single);
                self.walk_expr(&do_while.test);
            }
            Stmt::Switch(switch_stmt) => self.walk_switch(switch_stmt),
            Stmt::Try(try_stmt) => self.walk_try(try_stmt),
            Stmt::Labeled(labeled) => self.walk_stmt(&labeled.body, StmtPosition::Single),
            Stmt::With(with_stmt) => {
                self.walk_expr(&with_stmt.obj);
                self.walk_stmt(&with_stmt.body, StmtPosition::Single);
            }
            Stmt::Return(ret) => {
                if let Some(arg) = &ret.arg {
                    self.walk_expr(arg);
                }
            }
            Stmt::Throw(throw_stmt) => self.walk_expr(&throw_stmt.arg),
            _ => {}
        }
    }

    fn walk_decl(&mut self, decl: &Decl, placement: Placement) {
        match decl {
            Decl::Var(var_decl) => self.walk_var_decl(var_decl, placement, false),
            Decl::Fn(fn_decl) => self.walk_fn_decl(fn_decl),
            Decl::Class(class_decl) => {
                self.visitor
                    .declare(&class_decl.ident, BindingOrigin::Lexical);
                self.walk_class(&class_decl.class);
            }
            Decl::Using(using) => {
                for declarator in &using.decls {
                    self.walk_lexical_declarator(declarator);
                }
            }
            Decl::TsEnum(ts_enum) => {
                self.visitor.declare(&ts_enum.id, BindingOrigin::Lexical);
            }
            _ => {}
        }
    }

    fn walk_var_decl(&mut self, decl: &VarDecl, placement: Placement, in_loop_head: bool) {
        if decl.kind != VarDeclKind::Var {
            for declarator in &decl.decls {
                self.walk_lexical_declarator(declarator);
            }
            return;
        }

        self.visitor.begin_var_statement(decl, placement);
        for declarator in &decl.decls {
            let initialized = in_loop_head || declarator.init.is_some();
            self.visitor.begin_var_declarator(declarator, initialized);
            self.walk_binding_pat(&declarator.name, PatRole::Var);
            if let Some(init) = &declarator.init {
                self.walk_expr(init);
            }
            self.visitor.end_var_declarator();
        }
        self.visitor.end_var_statement();
    }

    fn walk_lexical_declarator(&mut self, declarator: &VarDeclarator) {
        self.walk_binding_pat(&declarator.name, PatRole::Lexical);
        if let Some(init) = &declarator.init {
            self.walk_expr(init);
        }
    }

    fn walk_fn_decl(&mut self, fn_decl: &FnDecl) {
        self.visitor
            .declare(&fn_decl.ident, BindingOrigin::FunctionDeclarationName);
        self.walk_function(&fn_decl.function, None);
    }

    /// `own_name` is the name of a function expression, visible only inside it.
    fn walk_function(&mut self, function: &Function, own_name: Option<&Ident>) {
        for decorator in &function.decorators {
            self.walk_expr(&decorator.expr);
        }

        self.visitor.enter_scope(ScopeKind::Function, function.span);

        if let Some(ident) = own_name {
            self.visitor
                .declare(ident, BindingOrigin::FunctionExpressionName);
        }

        for param in &function.params {
            for decorator in &param.decorators {
                self.walk_expr(&decorator.expr);
            }
            self.walk_binding_pat(&param.pat, PatRole::Param);
        }

        if let Some(body) = &function.body {
            self.walk_stmts(&body.stmts);
        }

        self.visitor.exit_scope();
    }

    fn walk_fn_expr(&mut self, fn_expr: &FnExpr) {
        self.walk_function(&fn_expr.function, fn_expr.ident.as_ref());
    }

    fn walk_arrow(&mut self, arrow: &ArrowExpr) {
        self.visitor.enter_scope(ScopeKind::Function, arrow.span);

        for param in &arrow.params {
            self.walk_binding_pat(param, PatRole::Param);
        }

        match &*arrow.body {
            BlockStmtOrExpr::BlockStmt(block) => self.walk_stmts(&block.stmts),
            BlockStmtOrExpr::Expr(expr) => self.walk_expr(expr),
        }

        self.visitor.exit_scope();
    }

    fn walk_block(&mut self, block: &BlockStmt) {
        self.visitor.enter_scope(ScopeKind::Block, block.span);
        self.walk_stmts(&block.stmts);
        self.visitor.exit_scope();
    }

    /// Runs `body` inside its own function-like scope. Used for class field
    /// initializers and static blocks, which get a fresh `var` scope.
    fn walk_in_function_scope(&mut self, span: Span, body: impl FnOnce(&mut Self)) {
        self.visitor.enter_scope(ScopeKind::Function, span);
        body(self);
        self.visitor.exit_scope();
    }

    fn walk_for(&mut self, for_stmt: &ForStmt) {
        self.visitor.enter_scope(ScopeKind::Block, for_stmt.span);

        if let Some(init) = &for_stmt.init {
            match init {
                VarDeclOrExpr::VarDecl(var_decl) => {
                    self.walk_var_decl(var_decl, Placement::ForHead, false)
                }
                VarDeclOrExpr::Expr(expr) => self.walk_expr(expr),
            }
        }
        if let Some(test) = &for_stmt.test {
            self.walk_expr(test);
        }
        if let Some(update) = &for_stmt.update {
            self.walk_expr(update);
        }
        self.walk_stmt(&for_stmt.body, StmtPosition::Single);

        self.visitor.exit_scope();
    }

    fn walk_for_in(&mut self, for_in: &ForInStmt) {
        self.visitor.enter_scope(ScopeKind::Block, for_in.span);
        self.walk_for_head(&for_in.left);
        self.walk_expr(&for_in.right);
        self.walk_stmt(&for_in.body, StmtPosition::Single);
        self.visitor.exit_scope();
    }

    fn walk_for_of(&mut self, for_of: &ForOfStmt) {
        self.visitor.enter_scope(ScopeKind::Block, for_of.span);
        self.walk_for_head(&for_of.left);
        self.walk_expr(&for_of.right);
        self.walk_stmt(&for_of.body, StmtPosition::Single);
        self.visitor.exit_scope();
    }

    fn walk_for_head(&mut self, head: &ForHead) {
        match head {
            ForHead::VarDecl(var_decl) => self.walk_var_decl(var_decl, Placement::ForHead, true),
            ForHead::UsingDecl(using) => {
                for declarator in &using.decls {
                    self.walk_lexical_declarator(declarator);
                }
            }
            ForHead::Pat(pat) => self.walk_target_pat(pat),
        }
    }

    fn walk_switch(&mut self, switch_stmt: &SwitchStmt) {
        self.walk_expr(&switch_stmt.discriminant);

        self.visitor.enter_scope(ScopeKind::Block, switch_stmt.span);
        for case in &switch_stmt.cases {
            if let Some(test) = &case.test {
                self.walk_expr(test);
            }
            self.walk_stmts(&case.cons);
        }
        self.visitor.exit_scope();
    }

    fn walk_try(&mut self, try_stmt: &TryStmt) {
        self.walk_block(&try_stmt.block);
        if let Some(handler) = &try_stmt.handler {
            self.walk_catch(handler);
        }
        if let Some(finalizer) = &try_stmt.finalizer {
            self.walk_block(finalizer);
        }
    }

    fn walk_catch(&mut self, catch: &CatchClause) {
        self.visitor.enter_scope(ScopeKind::Block, catch.span);
        if let Some(param) = &catch.param {
            self.walk_binding_pat(param, PatRole::Lexical);
        }
        self.walk_stmts(&catch.body.stmts);
        self.visitor.exit_scope();
    }

    fn walk_class(&mut self, class: &Class) {
        for decorator in &class.decorators {
            self.walk_expr(&decorator.expr);
        }
        if let Some(super_class) = &class.super_class {
            self.walk_expr(super_class);
        }

        for member in &class.body {
            match member {
                ClassMember::Constructor(ctor) => {
                    self.walk_prop_name(&ctor.key);
                    self.visitor.enter_scope(ScopeKind::Function, ctor.span);
                    for param in &ctor.params {
                        match param {
                            ParamOrTsParamProp::Param(p) => {
                                for decorator in &p.decorators {
                                    self.walk_expr(&decorator.expr);
                                }
                                self.walk_binding_pat(&p.pat, PatRole::Param);
                            }
                            ParamOrTsParamProp::TsParamProp(ts_param) => {
                                for decorator in &ts_param.decorators {
                                    self.walk_expr(&decorator.expr);
                                }
                                match &ts_param.param {
                                    TsParamPropParam::Ident(binding_ident) => {
                                        self.visitor
                                            .declare(&binding_ident.id, BindingOrigin::Parameter);
                                    }
                                    TsParamPropParam::Assign(assign_pat) => {
                                        self.walk_binding_pat(&assign_pat.left, PatRole::Param);
                                        self.walk_expr(&assign_pat.right);
                                    }
                                }
                            }
                        }
                    }
                    if let Some(body) = &ctor.body {
                        self.walk_stmts(&body.stmts);
                    }
                    self.visitor.exit_scope();
                }
                ClassMember::Method(method) => {
                    self.walk_prop_name(&method.key);
                    self.walk_function(&method.function, None);
                }
                ClassMember::PrivateMethod(method) => {
                    self.walk_function(&method.function, None);
                }
                ClassMember::ClassProp(prop) => {
                    for decorator in &prop.decorators {
                        self.walk_expr(&decorator.expr);
                    }
                    self.walk_prop_name(&prop.key);
                    if let Some(value) = &prop.value {
                        self.walk_in_function_scope(prop.span, |w| w.walk_expr(value));
                    }
                }
                ClassMember::PrivateProp(prop) => {
                    if let Some(value) = &prop.value {
                        self.walk_in_function_scope(prop.span, |w| w.walk_expr(value));
                    }
                }
                ClassMember::StaticBlock(block) => {
                    self.walk_in_function_scope(block.span, |w| w.walk_stmts(&block.body.stmts));
                }
                _ => {}
            }
        }
    }

    fn walk_prop_name(&mut self, key: &PropName) {
        if let PropName::Computed(computed) = key {
            self.walk_expr(&computed.expr);
        }
    }

    fn walk_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Ident(ident) => self.visitor.reference(ident, ReferenceKind::Read),
            Expr::Array(array) => {
                for elem in array.elems.iter().flatten() {
                    self.walk_expr(&elem.expr);
                }
            }
            Expr::Object(object) => {
                for prop in &object.props {
                    match prop {
                        PropOrSpread::Spread(spread) => self.walk_expr(&spread.expr),
                        PropOrSpread::Prop(prop) => self.walk_prop(prop),
                    }
                }
            }
            Expr::Fn(fn_expr) => self.walk_fn_expr(fn_expr),
            Expr::Arrow(arrow) => self.walk_arrow(arrow),
            Expr::Class(class_expr) => match &class_expr.ident {
                Some(ident) => {
                    // A named class expression binds its name inside the class only
                    self.visitor.enter_scope(ScopeKind::Block, class_expr.class.span);
                    self.visitor.declare(ident, BindingOrigin::Lexical);
                    self.walk_class(&class_expr.class);
                    self.visitor.exit_scope();
                }
                None => self.walk_class(&class_expr.class),
            },
            Expr::Unary(unary) => self.walk_expr(&unary.arg),
            Expr::Update(update) => self.walk_update_target(&update.arg),
            Expr::Bin(bin) => {
                self.walk_expr(&bin.left);
                self.walk_expr(&bin.right);
            }
            Expr::Assign(assign) => {
                self.walk_assign_target(&assign.left);
                self.walk_expr(&assign.right);
            }
            Expr::Member(member) => self.walk_member(member),
            Expr::SuperProp(super_prop) => {
                if let SuperProp::Computed(computed) = &super_prop.prop {
                    self.walk_expr(&computed.expr);
                }
            }
            Expr::Cond(cond) => {
                self.walk_expr(&cond.test);
                self.walk_expr(&cond.cons);
                self.walk_expr(&cond.alt);
            }
            Expr::Call(call) => {
                if let Callee::Expr(callee) = &call.callee {
                    self.walk_expr(callee);
                }
                for arg in &call.args {
                    self.walk_expr(&arg.expr);
                }
            }
            Expr::New(new_expr) => {
                self.walk_expr(&new_expr.callee);
                for arg in new_expr.args.iter().flatten() {
                    self.walk_expr(&arg.expr);
                }
            }
            Expr::Seq(seq) => {
                for expr in &seq.exprs {
                    self.walk_expr(expr);
                }
            }
            Expr::Tpl(tpl) => {
                for expr in &tpl.exprs {
                    self.walk_expr(expr);
                }
            }
            Expr::TaggedTpl(tagged) => {
                self.walk_expr(&tagged.tag);
                for expr in &tagged.tpl.exprs {
                    self.walk_expr(expr);
                }
            }
            Expr::Yield(yield_expr) => {
                if let Some(arg) = &yield_expr.arg {
                    self.walk_expr(arg);
                }
            }
            Expr::Await(await_expr) => self.walk_expr(&await_expr.arg),
            Expr::Paren(paren) => self.walk_expr(&paren.expr),
            Expr::OptChain(opt_chain) => match &*opt_chain.base {
                OptChainBase::Member(member) => self.walk_member(member),
                OptChainBase::Call(call) => {
                    self.walk_expr(&call.callee);
                    for arg in &call.args {
                        self.walk_expr(&arg.expr);
                    }
                }
            },
            Expr::JSXElement(element) => self.walk_jsx_element(element),
            Expr::JSXFragment(fragment) => {
                for child in &fragment.children {
                    self.walk_jsx_child(child);
                }
            }
            Expr::TsAs(ts_as) => self.walk_expr(&ts_as.expr),
            Expr::TsTypeAssertion(assertion) => self.walk_expr(&assertion.expr),
            Expr::TsNonNull(non_null) => self.walk_expr(&non_null.expr),
            Expr::TsSatisfies(satisfies) => self.walk_expr(&satisfies.expr),
            Expr::TsConstAssertion(const_assertion) => self.walk_expr(&const_assertion.expr),
            Expr::TsInstantiation(instantiation) => self.walk_expr(&instantiation.expr),
            _ => {}
        }
    }

    fn walk_prop(&mut self, prop: &Prop) {
        match prop {
            Prop::Shorthand(ident) => self.visitor.reference(ident, ReferenceKind::Read),
            Prop::KeyValue(kv) => {
                self.walk_prop_name(&kv.key);
                self.walk_expr(&kv.value);
            }
            Prop::Assign(assign) => self.walk_expr(&assign.value),
            Prop::Getter(getter) => {
                self.walk_prop_name(&getter.key);
                self.visitor.enter_scope(ScopeKind::Function, getter.span);
                if let Some(body) = &getter.body {
                    self.walk_stmts(&body.stmts);
                }
                self.visitor.exit_scope();
            }
            Prop::Setter(setter) => {
                self.walk_prop_name(&setter.key);
                self.visitor.enter_scope(ScopeKind::Function, setter.span);
                self.walk_binding_pat(&setter.param, PatRole::Param);
                if let Some(body) = &setter.body {
                    self.walk_stmts(&body.stmts);
                }
                self.visitor.exit_scope();
            }
            Prop::Method(method) => {
                self.walk_prop_name(&method.key);
                self.walk_function(&method.function, None);
            }
        }
    }

    fn walk_member(&mut self, member: &MemberExpr) {
        self.walk_expr(&member.obj);
        if let MemberProp::Computed(computed) = &member.prop {
            self.walk_expr(&computed.expr);
        }
    }

    fn walk_update_target(&mut self, arg: &Expr) {
        match arg {
            Expr::Ident(ident) => self.visitor.reference(ident, ReferenceKind::Update),
            Expr::Paren(paren) => self.walk_update_target(&paren.expr),
            other => self.walk_expr(other),
        }
    }

    /// An expression in assignment-target position.
    fn walk_write_target(&mut self, expr: &Expr) {
        match expr {
            Expr::Ident(ident) => self.visitor.reference(ident, ReferenceKind::Write),
            Expr::Paren(paren) => self.walk_write_target(&paren.expr),
            Expr::TsAs(ts_as) => self.walk_write_target(&ts_as.expr),
            Expr::TsNonNull(non_null) => self.walk_write_target(&non_null.expr),
            Expr::TsSatisfies(satisfies) => self.walk_write_target(&satisfies.expr),
            Expr::TsTypeAssertion(assertion) => self.walk_write_target(&assertion.expr),
            other => self.walk_expr(other),
        }
    }

    fn walk_assign_target(&mut self, target: &AssignTarget) {
        match target {
            AssignTarget::Simple(simple) => match simple {
                SimpleAssignTarget::Ident(binding_ident) => {
                    self.visitor
                        .reference(&binding_ident.id, ReferenceKind::Write);
                }
                SimpleAssignTarget::Member(member) => self.walk_member(member),
                SimpleAssignTarget::SuperProp(super_prop) => {
                    if let SuperProp::Computed(computed) = &super_prop.prop {
                        self.walk_expr(&computed.expr);
                    }
                }
                SimpleAssignTarget::Paren(paren) => self.walk_write_target(&paren.expr),
                SimpleAssignTarget::OptChain(opt_chain) => match &*opt_chain.base {
                    OptChainBase::Member(member) => self.walk_member(member),
                    OptChainBase::Call(call) => {
                        self.walk_expr(&call.callee);
                        for arg in &call.args {
                            self.walk_expr(&arg.expr);
                        }
                    }
                },
                SimpleAssignTarget::TsAs(ts_as) => self.walk_write_target(&ts_as.expr),
                SimpleAssignTarget::TsSatisfies(satisfies) => {
                    self.walk_write_target(&satisfies.expr)
                }
                SimpleAssignTarget::TsNonNull(non_null) => {
                    self.walk_write_target(&non_null.expr)
                }
                SimpleAssignTarget::TsTypeAssertion(assertion) => {
                    self.walk_write_target(&assertion.expr)
                }
                SimpleAssignTarget::TsInstantiation(instantiation) => {
                    self.walk_expr(&instantiation.expr)
                }
                _ => {}
            },
            AssignTarget::Pat(pat) => match pat {
                AssignTargetPat::Array(array) => {
                    for elem in array.elems.iter().flatten() {
                        self.walk_target_pat(elem);
                    }
                }
                AssignTargetPat::Object(object) => {
                    for prop in &object.props {
                        self.walk_target_object_prop(prop);
                    }
                }
                _ => {}
            },
        }
    }

    /// A destructuring pattern that assigns to existing bindings.
    fn walk_target_pat(&mut self, pat: &Pat) {
        match pat {
            Pat::Ident(binding_ident) => {
                self.visitor
                    .reference(&binding_ident.id, ReferenceKind::Write);
            }
            Pat::Array(array) => {
                for elem in array.elems.iter().flatten() {
                    self.walk_target_pat(elem);
                }
            }
            Pat::Object(object) => {
                for prop in &object.props {
                    self.walk_target_object_prop(prop);
                }
            }
            Pat::Rest(rest) => self.walk_target_pat(&rest.arg),
            Pat::Assign(assign) => {
                self.walk_target_pat(&assign.left);
                self.walk_expr(&assign.right);
            }
            Pat::Expr(expr) => self.walk_write_target(expr),
            Pat::Invalid(_) => {}
        }
    }

    fn walk_target_object_prop(&mut self, prop: &ObjectPatProp) {
        match prop {
            ObjectPatProp::KeyValue(kv) => {
                self.walk_prop_name(&kv.key);
                self.walk_target_pat(&kv.value);
            }
            ObjectPatProp::Assign(assign) => {
                self.write_shorthand(&assign.key);
                if let Some(value) = &assign.value {
                    self.walk_expr(value);
                }
            }
            ObjectPatProp::Rest(rest) => self.walk_target_pat(&rest.arg),
        }
    }

    fn write_shorthand(&mut self, ident: &Ident) {
        self.visitor.reference(ident, ReferenceKind::Write);
    }

    /// A pattern that introduces new bindings.
    fn walk_binding_pat(&mut self, pat: &Pat, role: PatRole) {
        match pat {
            Pat::Ident(binding_ident) => self.bind(&binding_ident.id, role),
            Pat::Array(array) => {
                for elem in array.elems.iter().flatten() {
                    self.walk_binding_pat(elem, role);
                }
            }
            Pat::Object(object) => {
                for prop in &object.props {
                    match prop {
                        ObjectPatProp::KeyValue(kv) => {
                            self.walk_prop_name(&kv.key);
                            self.walk_binding_pat(&kv.value, role);
                        }
                        ObjectPatProp::Assign(assign) => {
                            self.bind(&assign.key, role);
                            if let Some(value) = &assign.value {
                                self.walk_expr(value);
                            }
                        }
                        ObjectPatProp::Rest(rest) => self.walk_binding_pat(&rest.arg, role),
                    }
                }
            }
            Pat::Rest(rest) => self.walk_binding_pat(&rest.arg, role),
            Pat::Assign(assign) => {
                self.walk_binding_pat(&assign.left, role);
                self.walk_expr(&assign.right);
            }
            Pat::Invalid(_) | Pat::Expr(_) => {
                if role == PatRole::Var {
                    self.visitor.invalid_pattern(pat.span());
                }
            }
        }
    }

    fn bind(&mut self, ident: &Ident, role: PatRole) {
        match role {
            PatRole::Var => self.visitor.declare_var(ident),
            PatRole::Param => self.visitor.declare(ident, BindingOrigin::Parameter),
            PatRole::Lexical => self.visitor.declare(ident, BindingOrigin::Lexical),
        }
    }

    fn walk_jsx_element(&mut self, element: &JSXElement) {
        match &element.opening.name {
            JSXElementName::Ident(ident) => {
                // Lowercase names are intrinsic elements, not variables
                if ident.sym.chars().next().is_some_and(|c| c.is_uppercase()) {
                    self.visitor.reference(ident, ReferenceKind::Read);
                }
            }
            JSXElementName::JSXMemberExpr(member) => self.walk_jsx_member(member),
            JSXElementName::JSXNamespacedName(_) => {}
        }

        for attr in &element.opening.attrs {
            match attr {
                JSXAttrOrSpread::JSXAttr(attr) => match &attr.value {
                    Some(JSXAttrValue::JSXExprContainer(container)) => {
                        self.walk_jsx_expr(&container.expr)
                    }
                    Some(JSXAttrValue::JSXElement(element)) => self.walk_jsx_element(element),
                    Some(JSXAttrValue::JSXFragment(fragment)) => {
                        for child in &fragment.children {
                            self.walk_jsx_child(child);
                        }
                    }
                    _ => {}
                },
                JSXAttrOrSpread::SpreadElement(spread) => self.walk_expr(&spread.expr),
            }
        }

        for child in &element.children {
            self.walk_jsx_child(child);
        }
    }

    fn walk_jsx_member(&mut self, member: &JSXMemberExpr) {
        match &member.obj {
            JSXObject::Ident(ident) => self.visitor.reference(ident, ReferenceKind::Read),
            JSXObject::JSXMemberExpr(nested) => self.walk_jsx_member(nested),
        }
    }

    fn walk_jsx_child(&mut self, child: &JSXElementChild) {
        match child {
            JSXElementChild::JSXExprContainer(container) => self.walk_jsx_expr(&container.expr),
            JSXElementChild::JSXSpreadChild(spread) => self.walk_expr(&spread.expr),
            JSXElementChild::JSXElement(element) => self.walk_jsx_element(element),
            JSXElementChild::JSXFragment(fragment) => {
                for child in &fragment.children {
                    self.walk_jsx_child(child);
                }
            }
            JSXElementChild::JSXText(_) => {}
        }
    }

    fn walk_jsx_expr(&mut self, expr: &JSXExpr) {
        if let JSXExpr::Expr(expr) = expr {
            self.walk_expr(expr);
        }
    }
}
