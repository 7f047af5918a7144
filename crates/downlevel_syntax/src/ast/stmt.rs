//! Statement nodes.
//!
//! Declarations are statements here: the checked tree interleaves them with
//! control flow exactly as written, and the emitter's single ordered
//! traversal depends on that interleaving being preserved.

use downlevel_base::{Span, Symbol};

use super::decl::{
    ClassLike, EnumDecl, ExportDecl, Func, ImportDecl, ImportEqualsDecl, ModuleDecl,
};
use super::expr::Expr;
use super::pattern::Binding;
use crate::flags::{NodeFlags, NodeId};

/// A sequence of statements, as stored by blocks and bodies.
pub type Block<'a> = &'a [&'a Stmt<'a>];

/// A statement node: identity, position, modifiers, and the kind payload.
#[derive(Debug)]
pub struct Stmt<'a> {
    pub id: NodeId,
    pub span: Span,
    pub flags: NodeFlags,
    pub kind: StmtKind<'a>,
}

impl<'a> Stmt<'a> {
    pub fn is_synthesized(&self) -> bool {
        self.span.is_synthesized()
    }

    /// `export` appears on the statement carrying the declaration.
    pub fn is_exported(&self) -> bool {
        self.flags.contains(NodeFlags::EXPORT)
    }
}

#[derive(Debug)]
pub enum StmtKind<'a> {
    Block(Block<'a>),
    /// `var`/`let`/`const` statement; the list flags carry the keyword.
    Var(VarDeclList<'a>),
    Expr(&'a Expr<'a>),
    If {
        cond: &'a Expr<'a>,
        then_branch: &'a Stmt<'a>,
        else_branch: Option<&'a Stmt<'a>>,
    },
    Do {
        body: &'a Stmt<'a>,
        cond: &'a Expr<'a>,
    },
    While {
        cond: &'a Expr<'a>,
        body: &'a Stmt<'a>,
    },
    For {
        init: Option<ForInit<'a>>,
        cond: Option<&'a Expr<'a>>,
        incr: Option<&'a Expr<'a>>,
        body: &'a Stmt<'a>,
    },
    ForIn {
        init: ForInit<'a>,
        expr: &'a Expr<'a>,
        body: &'a Stmt<'a>,
    },
    /// `for (v of expr)`; lowers to an index loop below ES6.
    ForOf {
        init: ForInit<'a>,
        expr: &'a Expr<'a>,
        body: &'a Stmt<'a>,
    },
    Continue(Option<Symbol>),
    Break(Option<Symbol>),
    Return(Option<&'a Expr<'a>>),
    With {
        expr: &'a Expr<'a>,
        body: &'a Stmt<'a>,
    },
    Switch {
        expr: &'a Expr<'a>,
        cases: &'a [CaseClause<'a>],
    },
    Labeled {
        label: Symbol,
        body: &'a Stmt<'a>,
    },
    Throw(&'a Expr<'a>),
    Try {
        block: &'a Stmt<'a>,
        catch: Option<CatchClause<'a>>,
        finally: Option<&'a Stmt<'a>>,
    },
    Debugger,
    Empty,
    Function(Func<'a>),
    Class(ClassLike<'a>),
    Enum(EnumDecl<'a>),
    /// Internal module (namespace) declaration.
    Module(ModuleDecl<'a>),
    Import(ImportDecl<'a>),
    /// `import name = require("mod")`.
    ImportEquals(ImportEqualsDecl),
    /// `export { ... } [from "mod"]` / `export * from "mod"`.
    Export(ExportDecl<'a>),
    /// `export = expr`.
    ExportAssignment(&'a Expr<'a>),
    /// `export default expr` where the default is not a declaration.
    ExportDefault(&'a Expr<'a>),
}

/// The first clause of a `for`/`for-in`/`for-of` head.
#[derive(Debug)]
pub enum ForInit<'a> {
    Var(VarDeclList<'a>),
    Expr(&'a Expr<'a>),
}

/// A `var`/`let`/`const` declaration list.
///
/// The keyword lives in `flags` ([`NodeFlags::LET`]/[`NodeFlags::CONST`],
/// neither for `var`) so the same list type serves statements and loop
/// heads.
#[derive(Debug)]
pub struct VarDeclList<'a> {
    pub flags: NodeFlags,
    pub decls: &'a [VarDecl<'a>],
}

/// One declarator: a name or destructuring pattern plus optional
/// initializer.
#[derive(Debug)]
pub struct VarDecl<'a> {
    pub id: NodeId,
    pub span: Span,
    pub name: Binding<'a>,
    pub init: Option<&'a Expr<'a>>,
}

/// `case test:` or `default:` with its statement list.
#[derive(Debug)]
pub struct CaseClause<'a> {
    pub id: NodeId,
    pub span: Span,
    /// `None` for the `default` clause.
    pub test: Option<&'a Expr<'a>>,
    pub stmts: Block<'a>,
}

/// `catch (name) { ... }`.
#[derive(Debug)]
pub struct CatchClause<'a> {
    pub id: NodeId,
    pub span: Span,
    pub name: Symbol,
    pub block: &'a Stmt<'a>,
}
