//! Expression nodes.
//!
//! Expressions arrive fully resolved: type annotations are gone (a type
//! assertion survives only as a transparent wrapper to peel), and every
//! identifier that needs semantic treatment is answered by the resolver at
//! emission time, not recorded here.

use downlevel_base::{Span, Symbol};

use super::decl::{ClassLike, Func};
use crate::flags::{NodeFlags, NodeId};
use crate::ops::{BinOp, PostfixOp, UnaryOp};

/// An expression node: identity, position, modifiers, and the kind payload.
#[derive(Debug)]
pub struct Expr<'a> {
    pub id: NodeId,
    pub span: Span,
    pub flags: NodeFlags,
    pub kind: ExprKind<'a>,
}

impl<'a> Expr<'a> {
    /// Nodes manufactured during lowering have no source position.
    pub fn is_synthesized(&self) -> bool {
        self.span.is_synthesized()
    }
}

/// One cooked/raw text pair of a template literal.
#[derive(Debug, Clone)]
pub struct TemplatePart {
    /// Escape-processed text, as a string value.
    pub cooked: String,
    /// Verbatim source text between the delimiters.
    pub raw: String,
}

/// An interpolated expression plus the literal text that follows it.
#[derive(Debug)]
pub struct TemplateSpan<'a> {
    pub expr: &'a Expr<'a>,
    pub literal: TemplatePart,
}

/// A property in an object literal.
#[derive(Debug)]
pub struct ObjectMember<'a> {
    pub id: NodeId,
    pub span: Span,
    pub kind: ObjectMemberKind<'a>,
}

#[derive(Debug)]
pub enum ObjectMemberKind<'a> {
    /// `name: value`
    Prop {
        name: PropName<'a>,
        value: &'a Expr<'a>,
    },
    /// Shorthand `{ x }`.
    Shorthand(Symbol),
}

/// A declared member name: identifier, literal, or computed.
#[derive(Debug)]
pub enum PropName<'a> {
    Ident(Symbol),
    /// String-literal name: the value plus the source quote style, so
    /// re-emission keeps the author's quoting.
    Str { value: String, single_quote: bool },
    /// Numeric-literal name, stored as written.
    Num(String),
    /// `[expr]` — the expression's node id keys the captured temporary when
    /// a decorator needs to evaluate the name exactly once.
    Computed(&'a Expr<'a>),
}

#[derive(Debug)]
pub enum ExprKind<'a> {
    /// An identifier reference.
    Ident(Symbol),
    This,
    Super,
    NullLit,
    TrueLit,
    FalseLit,
    /// Numeric literal, stored as written in source.
    NumLit(String),
    /// String literal: the cooked value plus the source quote style, so
    /// `'hi'` re-emits single-quoted.
    StrLit { value: String, single_quote: bool },
    /// Regular expression literal, stored verbatim including delimiters.
    RegexLit(String),
    /// `` `head${e1}mid${e2}tail` ``
    Template {
        head: TemplatePart,
        spans: &'a [TemplateSpan<'a>],
    },
    /// `` tag`head${e}tail` ``
    TaggedTemplate {
        tag: &'a Expr<'a>,
        head: TemplatePart,
        spans: &'a [TemplateSpan<'a>],
    },
    /// Array literal; holes are [`ExprKind::Omitted`] elements.
    Array(&'a [&'a Expr<'a>]),
    /// An elision hole inside an array literal or destructuring target.
    Omitted,
    Object(&'a [ObjectMember<'a>]),
    /// `target.name`
    PropAccess {
        target: &'a Expr<'a>,
        name: Symbol,
    },
    /// `target[index]`
    ElemAccess {
        target: &'a Expr<'a>,
        index: &'a Expr<'a>,
    },
    Call {
        callee: &'a Expr<'a>,
        args: &'a [&'a Expr<'a>],
    },
    /// `new callee(...)`; `args` is `None` for argument-less `new C`.
    New {
        callee: &'a Expr<'a>,
        args: Option<&'a [&'a Expr<'a>]>,
    },
    Paren(&'a Expr<'a>),
    /// Function expression.
    Function(Func<'a>),
    /// Arrow function; converts to a function expression below ES6.
    Arrow(Func<'a>),
    /// Class expression.
    Class(ClassLike<'a>),
    /// `<T>expr` — erased at emit; only the wrapped expression remains.
    TypeAssertion(&'a Expr<'a>),
    Unary {
        op: UnaryOp,
        operand: &'a Expr<'a>,
    },
    Postfix {
        op: PostfixOp,
        operand: &'a Expr<'a>,
    },
    Binary {
        op: BinOp,
        left: &'a Expr<'a>,
        right: &'a Expr<'a>,
    },
    Conditional {
        cond: &'a Expr<'a>,
        when_true: &'a Expr<'a>,
        when_false: &'a Expr<'a>,
    },
    /// `...expr` in calls and array literals.
    Spread(&'a Expr<'a>),
}

/// Grammar precedence of a whole expression, for operand parenthesization.
/// Higher binds tighter; see the table in [`crate::ops`].
pub fn expression_precedence(expr: &Expr<'_>) -> u8 {
    match &expr.kind {
        ExprKind::Binary { op, .. } => op.precedence(),
        ExprKind::Conditional { .. } => 4,
        ExprKind::Arrow(_) => 3,
        ExprKind::Spread(_) => 2,
        ExprKind::Unary { .. } => 15,
        ExprKind::Postfix { .. } => 16,
        ExprKind::Call { .. } => 17,
        ExprKind::New { .. } | ExprKind::PropAccess { .. } | ExprKind::ElemAccess { .. } => 18,
        ExprKind::TypeAssertion(inner) => expression_precedence(inner),
        _ => 19,
    }
}

/// Peels parentheses and type assertions down to the effective expression.
pub fn skip_parens_and_assertions<'a>(expr: &'a Expr<'a>) -> &'a Expr<'a> {
    match &expr.kind {
        ExprKind::Paren(inner) | ExprKind::TypeAssertion(inner) => {
            skip_parens_and_assertions(inner)
        }
        _ => expr,
    }
}
