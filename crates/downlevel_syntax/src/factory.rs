//! Arena context and node factory.
//!
//! [`AstArenas`] is a `Copy` bundle of typed-arena references, one per node
//! type that ends up behind an `&'a` link or inside an `&'a [..]` slice.
//! [`AstFactory`] wraps the bundle with the interner and the node-id
//! counter and exposes builder methods; checkers and tests construct trees
//! through it.
//!
//! Nodes built without an explicit span are synthesized
//! ([`Span::SYNTHESIZED`]); the `*_at` variants attach real positions for
//! sources whose text is available.

use std::collections::HashSet;

use downlevel_base::{Arena, Interner, Span, Symbol};

use crate::ast::{
    Binding, BindingElement, BindingPattern, CaseClause, ClassLike, ClassMember, Decorator,
    EnumDecl, EnumMember, ExportDecl, Expr, ExprKind, ForInit, Func, FuncBody, ImportDecl,
    ImportEqualsDecl, ImportSpecifier, MemberKind, ModuleDecl, NamedBindings, ObjectMember,
    ObjectMemberKind, ParamDecl, PatternKind, PropName, Stmt, StmtKind, TemplatePart,
    TemplateSpan, VarDecl, VarDeclList,
};
use crate::flags::{NodeFlags, NodeId};
use crate::ops::BinOp;
use crate::source::{collect_identifiers, compute_line_starts, SourceFile};

/// Typed arenas for every node type reachable through an `&'a` link.
#[derive(Clone, Copy)]
pub struct AstArenas<'a> {
    pub exprs: &'a Arena<Expr<'a>>,
    pub stmts: &'a Arena<Stmt<'a>>,
    pub expr_lists: &'a Arena<&'a Expr<'a>>,
    pub stmt_lists: &'a Arena<&'a Stmt<'a>>,
    pub params: &'a Arena<ParamDecl<'a>>,
    pub members: &'a Arena<ClassMember<'a>>,
    pub object_members: &'a Arena<ObjectMember<'a>>,
    pub var_decls: &'a Arena<VarDecl<'a>>,
    pub cases: &'a Arena<CaseClause<'a>>,
    pub template_spans: &'a Arena<TemplateSpan<'a>>,
    pub enum_members: &'a Arena<EnumMember<'a>>,
    pub import_specifiers: &'a Arena<ImportSpecifier>,
    pub binding_elements: &'a Arena<BindingElement<'a>>,
    pub patterns: &'a Arena<BindingPattern<'a>>,
    pub decorators: &'a Arena<Decorator<'a>>,
}

/// Runs `f` with a factory whose arenas live for the duration of the call.
///
/// The usual entry point for tests and short-lived pipelines: every arena
/// is a local, so nothing escapes except what `f` returns by value.
pub fn with_factory<R>(f: impl for<'a> FnOnce(&mut AstFactory<'a>) -> R) -> R {
    let exprs = Arena::new();
    let stmts = Arena::new();
    let expr_lists = Arena::new();
    let stmt_lists = Arena::new();
    let params = Arena::new();
    let members = Arena::new();
    let object_members = Arena::new();
    let var_decls = Arena::new();
    let cases = Arena::new();
    let template_spans = Arena::new();
    let enum_members = Arena::new();
    let import_specifiers = Arena::new();
    let binding_elements = Arena::new();
    let patterns = Arena::new();
    let decorators = Arena::new();
    let arenas = AstArenas {
        exprs: &exprs,
        stmts: &stmts,
        expr_lists: &expr_lists,
        stmt_lists: &stmt_lists,
        params: &params,
        members: &members,
        object_members: &object_members,
        var_decls: &var_decls,
        cases: &cases,
        template_spans: &template_spans,
        enum_members: &enum_members,
        import_specifiers: &import_specifiers,
        binding_elements: &binding_elements,
        patterns: &patterns,
        decorators: &decorators,
    };
    let mut factory = AstFactory::new(arenas);
    f(&mut factory)
}

/// Node builder over a set of arenas.
pub struct AstFactory<'a> {
    pub arenas: AstArenas<'a>,
    pub interner: Interner,
    next_id: u32,
}

impl<'a> AstFactory<'a> {
    pub fn new(arenas: AstArenas<'a>) -> Self {
        AstFactory {
            arenas,
            interner: Interner::new(),
            next_id: 0,
        }
    }

    pub fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn sym(&mut self, text: &str) -> Symbol {
        self.interner.intern(text)
    }

    // ─── Generic node allocation ────────────────────────────────────────

    pub fn expr(&mut self, kind: ExprKind<'a>) -> &'a Expr<'a> {
        self.expr_full(Span::SYNTHESIZED, NodeFlags::NONE, kind)
    }

    pub fn expr_at(&mut self, span: Span, kind: ExprKind<'a>) -> &'a Expr<'a> {
        self.expr_full(span, NodeFlags::NONE, kind)
    }

    pub fn expr_full(&mut self, span: Span, flags: NodeFlags, kind: ExprKind<'a>) -> &'a Expr<'a> {
        let id = self.next_id();
        self.arenas.exprs.alloc(Expr {
            id,
            span,
            flags,
            kind,
        })
    }

    pub fn stmt(&mut self, kind: StmtKind<'a>) -> &'a Stmt<'a> {
        self.stmt_full(Span::SYNTHESIZED, NodeFlags::NONE, kind)
    }

    pub fn stmt_at(&mut self, span: Span, kind: StmtKind<'a>) -> &'a Stmt<'a> {
        self.stmt_full(span, NodeFlags::NONE, kind)
    }

    pub fn stmt_flagged(&mut self, flags: NodeFlags, kind: StmtKind<'a>) -> &'a Stmt<'a> {
        self.stmt_full(Span::SYNTHESIZED, flags, kind)
    }

    pub fn stmt_full(&mut self, span: Span, flags: NodeFlags, kind: StmtKind<'a>) -> &'a Stmt<'a> {
        let id = self.next_id();
        self.arenas.stmts.alloc(Stmt {
            id,
            span,
            flags,
            kind,
        })
    }

    pub fn expr_list(&mut self, exprs: Vec<&'a Expr<'a>>) -> &'a [&'a Expr<'a>] {
        self.arenas.expr_lists.alloc_slice(exprs)
    }

    pub fn stmt_list(&mut self, stmts: Vec<&'a Stmt<'a>>) -> &'a [&'a Stmt<'a>] {
        self.arenas.stmt_lists.alloc_slice(stmts)
    }

    // ─── Expressions ────────────────────────────────────────────────────

    pub fn ident(&mut self, name: &str) -> &'a Expr<'a> {
        let sym = self.sym(name);
        self.expr(ExprKind::Ident(sym))
    }

    pub fn ident_at(&mut self, span: Span, name: &str) -> &'a Expr<'a> {
        let sym = self.sym(name);
        self.expr_at(span, ExprKind::Ident(sym))
    }

    pub fn num(&mut self, text: &str) -> &'a Expr<'a> {
        self.expr(ExprKind::NumLit(text.to_string()))
    }

    pub fn str_lit(&mut self, value: &str) -> &'a Expr<'a> {
        self.expr(ExprKind::StrLit {
            value: value.to_string(),
            single_quote: false,
        })
    }

    /// A string literal written with single quotes in source.
    pub fn single_quoted_str_lit(&mut self, value: &str) -> &'a Expr<'a> {
        self.expr(ExprKind::StrLit {
            value: value.to_string(),
            single_quote: true,
        })
    }

    pub fn bool_lit(&mut self, value: bool) -> &'a Expr<'a> {
        self.expr(if value {
            ExprKind::TrueLit
        } else {
            ExprKind::FalseLit
        })
    }

    pub fn null_lit(&mut self) -> &'a Expr<'a> {
        self.expr(ExprKind::NullLit)
    }

    pub fn this_expr(&mut self) -> &'a Expr<'a> {
        self.expr(ExprKind::This)
    }

    pub fn super_expr(&mut self) -> &'a Expr<'a> {
        self.expr(ExprKind::Super)
    }

    pub fn array(&mut self, elements: Vec<&'a Expr<'a>>) -> &'a Expr<'a> {
        let elements = self.expr_list(elements);
        self.expr(ExprKind::Array(elements))
    }

    pub fn object(&mut self, members: Vec<ObjectMember<'a>>) -> &'a Expr<'a> {
        let members = self.arenas.object_members.alloc_slice(members);
        self.expr(ExprKind::Object(members))
    }

    pub fn prop_member(&mut self, name: PropName<'a>, value: &'a Expr<'a>) -> ObjectMember<'a> {
        ObjectMember {
            id: self.next_id(),
            span: Span::SYNTHESIZED,
            kind: ObjectMemberKind::Prop { name, value },
        }
    }

    pub fn shorthand_member(&mut self, name: &str) -> ObjectMember<'a> {
        let sym = self.sym(name);
        ObjectMember {
            id: self.next_id(),
            span: Span::SYNTHESIZED,
            kind: ObjectMemberKind::Shorthand(sym),
        }
    }

    pub fn prop_name(&mut self, name: &str) -> PropName<'a> {
        PropName::Ident(self.sym(name))
    }

    /// A string-literal member name, keeping the source quote style.
    pub fn str_prop_name(&self, value: &str, single_quote: bool) -> PropName<'a> {
        PropName::Str {
            value: value.to_string(),
            single_quote,
        }
    }

    pub fn prop_access(&mut self, target: &'a Expr<'a>, name: &str) -> &'a Expr<'a> {
        let name = self.sym(name);
        self.expr(ExprKind::PropAccess { target, name })
    }

    pub fn elem_access(&mut self, target: &'a Expr<'a>, index: &'a Expr<'a>) -> &'a Expr<'a> {
        self.expr(ExprKind::ElemAccess { target, index })
    }

    pub fn call(&mut self, callee: &'a Expr<'a>, args: Vec<&'a Expr<'a>>) -> &'a Expr<'a> {
        let args = self.expr_list(args);
        self.expr(ExprKind::Call { callee, args })
    }

    pub fn new_expr(
        &mut self,
        callee: &'a Expr<'a>,
        args: Option<Vec<&'a Expr<'a>>>,
    ) -> &'a Expr<'a> {
        let args = args.map(|args| self.expr_list(args));
        self.expr(ExprKind::New { callee, args })
    }

    pub fn paren(&mut self, inner: &'a Expr<'a>) -> &'a Expr<'a> {
        self.expr(ExprKind::Paren(inner))
    }

    pub fn type_assertion(&mut self, inner: &'a Expr<'a>) -> &'a Expr<'a> {
        self.expr(ExprKind::TypeAssertion(inner))
    }

    pub fn spread(&mut self, inner: &'a Expr<'a>) -> &'a Expr<'a> {
        self.expr(ExprKind::Spread(inner))
    }

    pub fn binary(&mut self, op: BinOp, left: &'a Expr<'a>, right: &'a Expr<'a>) -> &'a Expr<'a> {
        self.expr(ExprKind::Binary { op, left, right })
    }

    pub fn assign(&mut self, left: &'a Expr<'a>, right: &'a Expr<'a>) -> &'a Expr<'a> {
        self.binary(BinOp::Assign, left, right)
    }

    pub fn cond_expr(
        &mut self,
        cond: &'a Expr<'a>,
        when_true: &'a Expr<'a>,
        when_false: &'a Expr<'a>,
    ) -> &'a Expr<'a> {
        self.expr(ExprKind::Conditional {
            cond,
            when_true,
            when_false,
        })
    }

    pub fn template_part(&self, cooked: &str, raw: &str) -> TemplatePart {
        TemplatePart {
            cooked: cooked.to_string(),
            raw: raw.to_string(),
        }
    }

    pub fn template(
        &mut self,
        head: TemplatePart,
        spans: Vec<TemplateSpan<'a>>,
    ) -> &'a Expr<'a> {
        let spans = self.arenas.template_spans.alloc_slice(spans);
        self.expr(ExprKind::Template { head, spans })
    }

    pub fn tagged_template(
        &mut self,
        tag: &'a Expr<'a>,
        head: TemplatePart,
        spans: Vec<TemplateSpan<'a>>,
    ) -> &'a Expr<'a> {
        let spans = self.arenas.template_spans.alloc_slice(spans);
        self.expr(ExprKind::TaggedTemplate { tag, head, spans })
    }

    pub fn function_expr(
        &mut self,
        name: Option<&str>,
        params: Vec<ParamDecl<'a>>,
        body: Vec<&'a Stmt<'a>>,
    ) -> &'a Expr<'a> {
        let func = self.func(name, params, body);
        self.expr(ExprKind::Function(func))
    }

    pub fn arrow_expr(&mut self, params: Vec<ParamDecl<'a>>, body: FuncBody<'a>) -> &'a Expr<'a> {
        let params = self.arenas.params.alloc_slice(params);
        self.expr(ExprKind::Arrow(Func {
            name: None,
            params,
            body: Some(body),
        }))
    }

    // ─── Functions and parameters ───────────────────────────────────────

    pub fn func(
        &mut self,
        name: Option<&str>,
        params: Vec<ParamDecl<'a>>,
        body: Vec<&'a Stmt<'a>>,
    ) -> Func<'a> {
        let name = name.map(|name| self.sym(name));
        let params = self.arenas.params.alloc_slice(params);
        let body = self.block(body);
        Func {
            name,
            params,
            body: Some(FuncBody::Block(body)),
        }
    }

    /// A function with no body — an overload signature or ambient
    /// declaration.
    pub fn bodyless_func(&mut self, name: Option<&str>, params: Vec<ParamDecl<'a>>) -> Func<'a> {
        let name = name.map(|name| self.sym(name));
        let params = self.arenas.params.alloc_slice(params);
        Func {
            name,
            params,
            body: None,
        }
    }

    pub fn param(&mut self, name: &str) -> ParamDecl<'a> {
        let sym = self.sym(name);
        self.param_full(NodeFlags::NONE, false, Binding::Ident(sym), None)
    }

    pub fn param_init(&mut self, name: &str, init: &'a Expr<'a>) -> ParamDecl<'a> {
        let sym = self.sym(name);
        self.param_full(NodeFlags::NONE, false, Binding::Ident(sym), Some(init))
    }

    pub fn rest_param(&mut self, name: &str) -> ParamDecl<'a> {
        let sym = self.sym(name);
        self.param_full(NodeFlags::NONE, true, Binding::Ident(sym), None)
    }

    /// Constructor parameter property (`constructor(public x: T)`).
    pub fn param_prop(&mut self, flags: NodeFlags, name: &str) -> ParamDecl<'a> {
        let sym = self.sym(name);
        self.param_full(flags, false, Binding::Ident(sym), None)
    }

    pub fn param_pattern(&mut self, pattern: &'a BindingPattern<'a>) -> ParamDecl<'a> {
        self.param_full(NodeFlags::NONE, false, Binding::Pattern(pattern), None)
    }

    pub fn param_full(
        &mut self,
        flags: NodeFlags,
        dotdotdot: bool,
        name: Binding<'a>,
        init: Option<&'a Expr<'a>>,
    ) -> ParamDecl<'a> {
        ParamDecl {
            id: self.next_id(),
            span: Span::SYNTHESIZED,
            flags,
            decorators: &[],
            dotdotdot,
            name,
            init,
        }
    }

    pub fn decorated_param(
        &mut self,
        decorators: Vec<Decorator<'a>>,
        name: &str,
    ) -> ParamDecl<'a> {
        let sym = self.sym(name);
        let decorators = self.arenas.decorators.alloc_slice(decorators);
        ParamDecl {
            id: self.next_id(),
            span: Span::SYNTHESIZED,
            flags: NodeFlags::NONE,
            decorators,
            dotdotdot: false,
            name: Binding::Ident(sym),
            init: None,
        }
    }

    pub fn decorator(&mut self, expr: &'a Expr<'a>) -> Decorator<'a> {
        Decorator {
            id: self.next_id(),
            span: Span::SYNTHESIZED,
            expr,
        }
    }

    // ─── Patterns ───────────────────────────────────────────────────────

    pub fn object_pattern(&mut self, elements: Vec<BindingElement<'a>>) -> &'a BindingPattern<'a> {
        self.pattern(PatternKind::Object, elements)
    }

    pub fn array_pattern(&mut self, elements: Vec<BindingElement<'a>>) -> &'a BindingPattern<'a> {
        self.pattern(PatternKind::Array, elements)
    }

    fn pattern(
        &mut self,
        kind: PatternKind,
        elements: Vec<BindingElement<'a>>,
    ) -> &'a BindingPattern<'a> {
        let id = self.next_id();
        let elements = self.arenas.binding_elements.alloc_slice(elements);
        self.arenas.patterns.alloc(BindingPattern {
            id,
            span: Span::SYNTHESIZED,
            kind,
            elements,
        })
    }

    pub fn binding_element(&mut self, name: &str, init: Option<&'a Expr<'a>>) -> BindingElement<'a> {
        let sym = self.sym(name);
        BindingElement {
            id: self.next_id(),
            span: Span::SYNTHESIZED,
            property_name: None,
            name: Some(Binding::Ident(sym)),
            dotdotdot: false,
            init,
        }
    }

    pub fn renamed_binding_element(
        &mut self,
        property: &str,
        name: &str,
        init: Option<&'a Expr<'a>>,
    ) -> BindingElement<'a> {
        let property = self.prop_name(property);
        let sym = self.sym(name);
        BindingElement {
            id: self.next_id(),
            span: Span::SYNTHESIZED,
            property_name: Some(property),
            name: Some(Binding::Ident(sym)),
            dotdotdot: false,
            init,
        }
    }

    pub fn rest_binding_element(&mut self, name: &str) -> BindingElement<'a> {
        let sym = self.sym(name);
        BindingElement {
            id: self.next_id(),
            span: Span::SYNTHESIZED,
            property_name: None,
            name: Some(Binding::Ident(sym)),
            dotdotdot: true,
            init: None,
        }
    }

    pub fn hole_binding_element(&mut self) -> BindingElement<'a> {
        BindingElement {
            id: self.next_id(),
            span: Span::SYNTHESIZED,
            property_name: None,
            name: None,
            dotdotdot: false,
            init: None,
        }
    }

    pub fn nested_binding_element(
        &mut self,
        property: Option<&str>,
        pattern: &'a BindingPattern<'a>,
    ) -> BindingElement<'a> {
        let property_name = property.map(|p| self.prop_name(p));
        BindingElement {
            id: self.next_id(),
            span: Span::SYNTHESIZED,
            property_name,
            name: Some(Binding::Pattern(pattern)),
            dotdotdot: false,
            init: None,
        }
    }

    // ─── Statements ─────────────────────────────────────────────────────

    pub fn block(&mut self, stmts: Vec<&'a Stmt<'a>>) -> &'a Stmt<'a> {
        let stmts = self.stmt_list(stmts);
        self.stmt(StmtKind::Block(stmts))
    }

    pub fn expr_stmt(&mut self, expr: &'a Expr<'a>) -> &'a Stmt<'a> {
        self.stmt(StmtKind::Expr(expr))
    }

    pub fn ret(&mut self, expr: Option<&'a Expr<'a>>) -> &'a Stmt<'a> {
        self.stmt(StmtKind::Return(expr))
    }

    pub fn var_decl(&mut self, name: &str, init: Option<&'a Expr<'a>>) -> VarDecl<'a> {
        let sym = self.sym(name);
        VarDecl {
            id: self.next_id(),
            span: Span::SYNTHESIZED,
            name: Binding::Ident(sym),
            init,
        }
    }

    pub fn pattern_var_decl(
        &mut self,
        pattern: &'a BindingPattern<'a>,
        init: Option<&'a Expr<'a>>,
    ) -> VarDecl<'a> {
        VarDecl {
            id: self.next_id(),
            span: Span::SYNTHESIZED,
            name: Binding::Pattern(pattern),
            init,
        }
    }

    pub fn var_list(&mut self, flags: NodeFlags, decls: Vec<VarDecl<'a>>) -> VarDeclList<'a> {
        let decls = self.arenas.var_decls.alloc_slice(decls);
        VarDeclList { flags, decls }
    }

    /// `var name = init;`
    pub fn var_stmt(&mut self, name: &str, init: Option<&'a Expr<'a>>) -> &'a Stmt<'a> {
        let decl = self.var_decl(name, init);
        let list = self.var_list(NodeFlags::NONE, vec![decl]);
        self.stmt(StmtKind::Var(list))
    }

    /// `let name = init;`
    pub fn let_stmt(&mut self, name: &str, init: Option<&'a Expr<'a>>) -> &'a Stmt<'a> {
        let decl = self.var_decl(name, init);
        let list = self.var_list(NodeFlags::LET, vec![decl]);
        self.stmt(StmtKind::Var(list))
    }

    /// `const name = init;`
    pub fn const_stmt(&mut self, name: &str, init: &'a Expr<'a>) -> &'a Stmt<'a> {
        let decl = self.var_decl(name, Some(init));
        let list = self.var_list(NodeFlags::CONST, vec![decl]);
        self.stmt(StmtKind::Var(list))
    }

    pub fn if_stmt(
        &mut self,
        cond: &'a Expr<'a>,
        then_branch: &'a Stmt<'a>,
        else_branch: Option<&'a Stmt<'a>>,
    ) -> &'a Stmt<'a> {
        self.stmt(StmtKind::If {
            cond,
            then_branch,
            else_branch,
        })
    }

    pub fn while_stmt(&mut self, cond: &'a Expr<'a>, body: &'a Stmt<'a>) -> &'a Stmt<'a> {
        self.stmt(StmtKind::While { cond, body })
    }

    pub fn for_of(
        &mut self,
        init: ForInit<'a>,
        expr: &'a Expr<'a>,
        body: &'a Stmt<'a>,
    ) -> &'a Stmt<'a> {
        self.stmt(StmtKind::ForOf { init, expr, body })
    }

    pub fn for_of_let(
        &mut self,
        name: &str,
        expr: &'a Expr<'a>,
        body: &'a Stmt<'a>,
    ) -> &'a Stmt<'a> {
        let decl = self.var_decl(name, None);
        let list = self.var_list(NodeFlags::LET, vec![decl]);
        self.for_of(ForInit::Var(list), expr, body)
    }

    pub fn case_clause(
        &mut self,
        test: Option<&'a Expr<'a>>,
        stmts: Vec<&'a Stmt<'a>>,
    ) -> CaseClause<'a> {
        let stmts = self.stmt_list(stmts);
        CaseClause {
            id: self.next_id(),
            span: Span::SYNTHESIZED,
            test,
            stmts,
        }
    }

    pub fn switch_stmt(
        &mut self,
        expr: &'a Expr<'a>,
        cases: Vec<CaseClause<'a>>,
    ) -> &'a Stmt<'a> {
        let cases = self.arenas.cases.alloc_slice(cases);
        self.stmt(StmtKind::Switch { expr, cases })
    }

    pub fn throw_stmt(&mut self, expr: &'a Expr<'a>) -> &'a Stmt<'a> {
        self.stmt(StmtKind::Throw(expr))
    }

    pub fn func_decl(
        &mut self,
        name: &str,
        params: Vec<ParamDecl<'a>>,
        body: Vec<&'a Stmt<'a>>,
    ) -> &'a Stmt<'a> {
        let func = self.func(Some(name), params, body);
        self.stmt(StmtKind::Function(func))
    }

    // ─── Classes ────────────────────────────────────────────────────────

    pub fn class_decl(
        &mut self,
        name: Option<&str>,
        heritage: Option<&'a Expr<'a>>,
        members: Vec<ClassMember<'a>>,
    ) -> &'a Stmt<'a> {
        let class = self.class_like(name, heritage, members, Vec::new());
        self.stmt(StmtKind::Class(class))
    }

    pub fn decorated_class_decl(
        &mut self,
        name: Option<&str>,
        heritage: Option<&'a Expr<'a>>,
        members: Vec<ClassMember<'a>>,
        decorators: Vec<Decorator<'a>>,
    ) -> &'a Stmt<'a> {
        let class = self.class_like(name, heritage, members, decorators);
        self.stmt(StmtKind::Class(class))
    }

    pub fn class_like(
        &mut self,
        name: Option<&str>,
        heritage: Option<&'a Expr<'a>>,
        members: Vec<ClassMember<'a>>,
        decorators: Vec<Decorator<'a>>,
    ) -> ClassLike<'a> {
        let name = name.map(|name| self.sym(name));
        let members = self.arenas.members.alloc_slice(members);
        let decorators = self.arenas.decorators.alloc_slice(decorators);
        ClassLike {
            name,
            heritage,
            members,
            decorators,
        }
    }

    pub fn member(&mut self, flags: NodeFlags, kind: MemberKind<'a>) -> ClassMember<'a> {
        ClassMember {
            id: self.next_id(),
            span: Span::SYNTHESIZED,
            flags,
            decorators: &[],
            kind,
        }
    }

    pub fn decorated_member(
        &mut self,
        flags: NodeFlags,
        decorators: Vec<Decorator<'a>>,
        kind: MemberKind<'a>,
    ) -> ClassMember<'a> {
        let decorators = self.arenas.decorators.alloc_slice(decorators);
        ClassMember {
            id: self.next_id(),
            span: Span::SYNTHESIZED,
            flags,
            decorators,
            kind,
        }
    }

    pub fn ctor(&mut self, params: Vec<ParamDecl<'a>>, body: Vec<&'a Stmt<'a>>) -> ClassMember<'a> {
        let func = self.func(None, params, body);
        self.member(NodeFlags::NONE, MemberKind::Constructor(func))
    }

    pub fn method(
        &mut self,
        name: &str,
        params: Vec<ParamDecl<'a>>,
        body: Vec<&'a Stmt<'a>>,
    ) -> ClassMember<'a> {
        let name = self.prop_name(name);
        let func = self.func(None, params, body);
        self.member(NodeFlags::NONE, MemberKind::Method { name, func })
    }

    pub fn getter(&mut self, name: &str, body: Vec<&'a Stmt<'a>>) -> ClassMember<'a> {
        let name = self.prop_name(name);
        let func = self.func(None, Vec::new(), body);
        self.member(NodeFlags::NONE, MemberKind::GetAccessor { name, func })
    }

    pub fn setter(&mut self, name: &str, param: &str, body: Vec<&'a Stmt<'a>>) -> ClassMember<'a> {
        let name = self.prop_name(name);
        let param = self.param(param);
        let func = self.func(None, vec![param], body);
        self.member(NodeFlags::NONE, MemberKind::SetAccessor { name, func })
    }

    pub fn property(&mut self, name: &str, init: Option<&'a Expr<'a>>) -> ClassMember<'a> {
        let name = self.prop_name(name);
        self.member(NodeFlags::NONE, MemberKind::Property { name, init })
    }

    pub fn static_property(&mut self, name: &str, init: Option<&'a Expr<'a>>) -> ClassMember<'a> {
        let name = self.prop_name(name);
        self.member(NodeFlags::STATIC, MemberKind::Property { name, init })
    }

    // ─── Enums, namespaces, modules ─────────────────────────────────────

    pub fn enum_member(&mut self, name: &str, init: Option<&'a Expr<'a>>) -> EnumMember<'a> {
        let name = self.prop_name(name);
        EnumMember {
            id: self.next_id(),
            span: Span::SYNTHESIZED,
            name,
            init,
        }
    }

    pub fn enum_decl(
        &mut self,
        flags: NodeFlags,
        name: &str,
        members: Vec<EnumMember<'a>>,
    ) -> &'a Stmt<'a> {
        let name = self.sym(name);
        let members = self.arenas.enum_members.alloc_slice(members);
        self.stmt_flagged(flags, StmtKind::Enum(EnumDecl { name, members }))
    }

    pub fn module_decl(
        &mut self,
        flags: NodeFlags,
        name: &str,
        body: Vec<&'a Stmt<'a>>,
    ) -> &'a Stmt<'a> {
        let name = self.sym(name);
        let body = self.stmt_list(body);
        self.stmt_flagged(flags, StmtKind::Module(ModuleDecl { name, body }))
    }

    pub fn import_specifier(&mut self, property: Option<&str>, name: &str) -> ImportSpecifier {
        let property = property.map(|p| self.sym(p));
        let name = self.sym(name);
        ImportSpecifier {
            id: self.next_id(),
            span: Span::SYNTHESIZED,
            property,
            name,
        }
    }

    /// `import { a, b as c } from "module"`.
    pub fn import_named(&mut self, module: &str, names: Vec<ImportSpecifier>) -> &'a Stmt<'a> {
        let names = self.arenas.import_specifiers.alloc_slice(names);
        self.stmt(StmtKind::Import(ImportDecl {
            module: module.to_string(),
            default_binding: None,
            bindings: Some(NamedBindings::Named(names)),
        }))
    }

    /// `import * as ns from "module"`.
    pub fn import_namespace(&mut self, module: &str, ns: &str) -> &'a Stmt<'a> {
        let ns = self.sym(ns);
        self.stmt(StmtKind::Import(ImportDecl {
            module: module.to_string(),
            default_binding: None,
            bindings: Some(NamedBindings::Namespace(ns)),
        }))
    }

    /// `import d from "module"`.
    pub fn import_default(&mut self, module: &str, name: &str) -> &'a Stmt<'a> {
        let name = self.sym(name);
        self.stmt(StmtKind::Import(ImportDecl {
            module: module.to_string(),
            default_binding: Some(name),
            bindings: None,
        }))
    }

    /// `import name = require("module")`.
    pub fn import_equals(&mut self, name: &str, module: &str) -> &'a Stmt<'a> {
        let name = self.sym(name);
        self.stmt(StmtKind::ImportEquals(ImportEqualsDecl {
            name,
            module: module.to_string(),
        }))
    }

    /// `export { ... } [from "module"]`.
    pub fn export_named(
        &mut self,
        module: Option<&str>,
        specifiers: Vec<ImportSpecifier>,
    ) -> &'a Stmt<'a> {
        let specifiers = self.arenas.import_specifiers.alloc_slice(specifiers);
        self.stmt(StmtKind::Export(ExportDecl {
            module: module.map(str::to_string),
            specifiers: Some(specifiers),
        }))
    }

    /// `export * from "module"`.
    pub fn export_star(&mut self, module: &str) -> &'a Stmt<'a> {
        self.stmt(StmtKind::Export(ExportDecl {
            module: Some(module.to_string()),
            specifiers: None,
        }))
    }

    pub fn export_assignment(&mut self, expr: &'a Expr<'a>) -> &'a Stmt<'a> {
        self.stmt(StmtKind::ExportAssignment(expr))
    }

    pub fn export_default(&mut self, expr: &'a Expr<'a>) -> &'a Stmt<'a> {
        self.stmt(StmtKind::ExportDefault(expr))
    }

    // ─── Source files ───────────────────────────────────────────────────

    /// Seals a statement list into a [`SourceFile`], computing the line
    /// table and the identifier universe.
    pub fn source_file(
        &mut self,
        file_name: &str,
        text: &str,
        stmts: Vec<&'a Stmt<'a>>,
    ) -> SourceFile<'a> {
        let stmts = self.stmt_list(stmts);
        let mut syms = HashSet::new();
        collect_identifiers(stmts, &mut syms);
        let identifiers = syms
            .into_iter()
            .map(|sym| self.interner.resolve(sym).to_string())
            .collect();
        let external_module = stmts.iter().any(|stmt| {
            matches!(
                stmt.kind,
                StmtKind::Import(_)
                    | StmtKind::ImportEquals(_)
                    | StmtKind::Export(_)
                    | StmtKind::ExportAssignment(_)
                    | StmtKind::ExportDefault(_)
            ) || stmt.is_exported()
        });
        SourceFile {
            file_name: file_name.to_string(),
            text: text.to_string(),
            stmts,
            identifiers,
            line_starts: compute_line_starts(text),
            external_module,
        }
    }
}
