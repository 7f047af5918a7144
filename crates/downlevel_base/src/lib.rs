//! # downlevel-base
//!
//! Structural atoms for the downlevel emitter.
//!
//! This crate provides the foundational types the rest of the workspace
//! builds on:
//!
//! - [`Arena`] — Bump allocation for stable AST references
//! - [`Interner`]/[`Symbol`] — Identifier interning for O(1) equality
//! - [`Span`] — Source position tracking, including the synthesized sentinel
//! - [`SpannedError`]/[`Result`] — Errors with source positions
//!
//! # Design Principles
//!
//! This crate has **no knowledge of JavaScript syntax or I/O**. It provides
//! only generic, reusable infrastructure that the syntax and emitter crates
//! build upon.
//!
//! # Example
//!
//! ```
//! use downlevel_base::{Arena, Interner, Span};
//!
//! let arena: Arena<&str> = Arena::new();
//! let mut interner = Interner::new();
//!
//! let name = interner.intern("console");
//! let span = Span::new(0, 7);
//!
//! let allocated = arena.alloc("console");
//! assert_eq!(*allocated, "console");
//! assert_eq!(interner.resolve(name), "console");
//! assert_eq!(span.len(), 7);
//! ```

pub mod arena;
pub mod error;
pub mod intern;
pub mod span;

pub use arena::Arena;
pub use error::{Result, SpannedError};
pub use intern::{Interner, Symbol};
pub use span::Span;
