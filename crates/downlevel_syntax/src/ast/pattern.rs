//! Binding names and destructuring patterns.

use downlevel_base::{Span, Symbol};

use super::expr::{Expr, PropName};
use crate::flags::NodeId;

/// The declared name of a variable, parameter, or binding element: a plain
/// identifier or a nested destructuring pattern.
#[derive(Debug)]
pub enum Binding<'a> {
    Ident(Symbol),
    Pattern(&'a BindingPattern<'a>),
}

/// `{ a, b: c = 1 }` or `[x, , ...rest]`.
#[derive(Debug)]
pub struct BindingPattern<'a> {
    pub id: NodeId,
    pub span: Span,
    pub kind: PatternKind,
    pub elements: &'a [BindingElement<'a>],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    Object,
    Array,
}

/// One element of a pattern.
///
/// In an object pattern `property_name` is the source property when it
/// differs from the bound name (`{ p: x }`). In an array pattern a `None`
/// name is an elision hole.
#[derive(Debug)]
pub struct BindingElement<'a> {
    pub id: NodeId,
    pub span: Span,
    pub property_name: Option<PropName<'a>>,
    pub name: Option<Binding<'a>>,
    /// `...rest` — array patterns only.
    pub dotdotdot: bool,
    /// Default value applied when the incoming value is `undefined`.
    pub init: Option<&'a Expr<'a>>,
}
