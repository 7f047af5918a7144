//! Declaration payloads: functions, classes, enums, namespaces, and the
//! import/export surface.
//!
//! These are carried by value inside their owning [`Stmt`](super::stmt::Stmt)
//! or [`Expr`](super::expr::Expr) node — the owning node supplies identity,
//! span, and modifier flags. Members and parameters, which the emitter
//! addresses individually (decorators, source maps), carry their own ids.

use downlevel_base::{Span, Symbol};

use super::expr::{Expr, PropName};
use super::pattern::Binding;
use super::stmt::{Block, Stmt};
use crate::flags::{NodeFlags, NodeId};

/// A function-like body: declaration, expression, arrow, method, accessor,
/// or constructor.
#[derive(Debug)]
pub struct Func<'a> {
    /// `None` for anonymous function expressions and default exports.
    pub name: Option<Symbol>,
    pub params: &'a [ParamDecl<'a>],
    /// `None` on overload signatures and ambient declarations; a
    /// non-ambient bodyless function is a recoverable semantic gap.
    pub body: Option<FuncBody<'a>>,
}

/// A function body: a block, or a bare expression for arrows.
#[derive(Debug)]
pub enum FuncBody<'a> {
    /// Always a [`StmtKind::Block`](super::stmt::StmtKind::Block) statement.
    Block(&'a Stmt<'a>),
    Expr(&'a Expr<'a>),
}

/// One parameter declaration.
#[derive(Debug)]
pub struct ParamDecl<'a> {
    pub id: NodeId,
    pub span: Span,
    /// Accessibility flags here mark a constructor parameter property.
    pub flags: NodeFlags,
    pub decorators: &'a [Decorator<'a>],
    /// `...rest`.
    pub dotdotdot: bool,
    pub name: Binding<'a>,
    pub init: Option<&'a Expr<'a>>,
}

impl<'a> ParamDecl<'a> {
    /// A constructor parameter with an accessibility modifier expands to a
    /// `this.x = x` assignment in the emitted constructor.
    pub fn is_parameter_property(&self) -> bool {
        self.flags.has_accessibility()
    }
}

/// `@expr` attached to a class, member, or parameter.
#[derive(Debug)]
pub struct Decorator<'a> {
    pub id: NodeId,
    pub span: Span,
    pub expr: &'a Expr<'a>,
}

/// The shared payload of class declarations and class expressions.
#[derive(Debug)]
pub struct ClassLike<'a> {
    pub name: Option<Symbol>,
    /// The `extends` expression, already resolved to a value reference.
    pub heritage: Option<&'a Expr<'a>>,
    pub members: &'a [ClassMember<'a>],
    pub decorators: &'a [Decorator<'a>],
}

/// A class member with its own identity and modifiers.
#[derive(Debug)]
pub struct ClassMember<'a> {
    pub id: NodeId,
    pub span: Span,
    pub flags: NodeFlags,
    pub decorators: &'a [Decorator<'a>],
    pub kind: MemberKind<'a>,
}

#[derive(Debug)]
pub enum MemberKind<'a> {
    Constructor(Func<'a>),
    Method { name: PropName<'a>, func: Func<'a> },
    GetAccessor { name: PropName<'a>, func: Func<'a> },
    SetAccessor { name: PropName<'a>, func: Func<'a> },
    Property {
        name: PropName<'a>,
        init: Option<&'a Expr<'a>>,
    },
}

impl<'a> ClassMember<'a> {
    /// The declared name, if the member has one (constructors do not).
    pub fn name(&self) -> Option<&PropName<'a>> {
        match &self.kind {
            MemberKind::Constructor(_) => None,
            MemberKind::Method { name, .. }
            | MemberKind::GetAccessor { name, .. }
            | MemberKind::SetAccessor { name, .. }
            | MemberKind::Property { name, .. } => Some(name),
        }
    }

    pub fn is_static(&self) -> bool {
        self.flags.contains(NodeFlags::STATIC)
    }
}

/// `enum E { A, B = 2 }`; `const`/`declare` live on the owning statement.
#[derive(Debug)]
pub struct EnumDecl<'a> {
    pub name: Symbol,
    pub members: &'a [EnumMember<'a>],
}

/// One enum member; the initializer is absent for auto-numbered members.
#[derive(Debug)]
pub struct EnumMember<'a> {
    pub id: NodeId,
    pub span: Span,
    pub name: PropName<'a>,
    pub init: Option<&'a Expr<'a>>,
}

/// An internal module (namespace) with a statement body.
#[derive(Debug)]
pub struct ModuleDecl<'a> {
    pub name: Symbol,
    pub body: Block<'a>,
}

/// `import d, { a as b } from "mod"` / `import * as ns from "mod"`.
#[derive(Debug)]
pub struct ImportDecl<'a> {
    /// The module specifier text, unquoted.
    pub module: String,
    pub default_binding: Option<Symbol>,
    pub bindings: Option<NamedBindings<'a>>,
}

#[derive(Debug)]
pub enum NamedBindings<'a> {
    Namespace(Symbol),
    Named(&'a [ImportSpecifier]),
}

/// `a` or `a as b` in an import or export clause.
#[derive(Debug)]
pub struct ImportSpecifier {
    pub id: NodeId,
    pub span: Span,
    /// The original name when aliased (`a` in `a as b`).
    pub property: Option<Symbol>,
    /// The local (or exported) name.
    pub name: Symbol,
}

/// `import name = require("mod")`.
#[derive(Debug)]
pub struct ImportEqualsDecl {
    pub name: Symbol,
    pub module: String,
}

/// `export { ... }`, `export { ... } from "mod"`, or `export * from "mod"`
/// (module `Some`, specifiers `None`).
#[derive(Debug)]
pub struct ExportDecl<'a> {
    pub module: Option<String>,
    pub specifiers: Option<&'a [ImportSpecifier]>,
}
