//! # downlevel-syntax
//!
//! The checked JavaScript-superset AST consumed by the downlevel emitter.
//!
//! This crate models what a type checker hands off for emission: arena-
//! allocated nodes with resolved modifiers, source spans, and stable ids.
//! It knows nothing about output targets or module envelopes — that is the
//! emitter's business — but it owns everything positional: line maps,
//! trivia scanning, and operator precedence.
//!
//! ## Modules
//!
//! - [`ast`]: node definitions (expressions, statements, declarations,
//!   patterns)
//! - [`flags`]: node identity and modifier bitsets
//! - [`ops`]: operator kinds and the precedence table
//! - [`source`]: source files, line maps, identifier collection
//! - [`trivia`]: whitespace skipping and comment ranges
//! - [`factory`]: arena bundle and node builders
//!
//! ## Example
//!
//! ```
//! use downlevel_syntax::factory::with_factory;
//! use downlevel_syntax::ops::BinOp;
//!
//! let ids = with_factory(|f| {
//!     let one = f.num("1");
//!     let two = f.num("2");
//!     let sum = f.binary(BinOp::Add, one, two);
//!     let stmt = f.var_stmt("total", Some(sum));
//!     let file = f.source_file("calc.ts", "", vec![stmt]);
//!     file.identifiers.len()
//! });
//! assert_eq!(ids, 1);
//! ```

pub mod ast;
pub mod factory;
pub mod flags;
pub mod ops;
pub mod source;
pub mod trivia;

pub use ast::*;
pub use factory::{with_factory, AstArenas, AstFactory};
pub use flags::{NodeFlags, NodeId};
pub use ops::{BinOp, PostfixOp, UnaryOp};
pub use source::{compute_line_starts, LineAndCharacter, SourceFile};
pub use trivia::{
    leading_comment_ranges, skip_trivia, trailing_comment_ranges, CommentKind, CommentRange,
};
