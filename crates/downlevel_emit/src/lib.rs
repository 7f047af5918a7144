//! # downlevel-emit
//!
//! The code-emission core: a checked AST goes in, executable JavaScript
//! (and optionally a column-accurate source map) comes out.
//!
//! ## Pipeline position
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │  Source → Parser → Checker → resolved AST → HERE       │
//! └────────────────────────────────────────────────────────┘
//!                                                │
//!                                        .js  +  .js.map
//! ```
//!
//! One ordered traversal does four jobs at once: it writes text through
//! the [`writer`], lowers syntax to the configured [`options::ScriptTarget`],
//! invents collision-free names through [`names`], and records
//! [`sourcemap`] spans at every node boundary. Module files are framed for
//! one of four loaders on the way out.
//!
//! ## Modules
//!
//! - [`options`]: the compiler option surface
//! - [`writer`]: the indented, position-tracking character sink
//! - [`comments`]: the comment router (leading/trailing/detached/pinned)
//! - [`names`]: temporaries, suffixed uniques, block-scope renames
//! - [`sourcemap`]: span recording and Base64-VLQ encoding
//! - [`diagnostic`]: recoverable-gap reporting
//! - [`resolver`]/[`host`]: the two consumed capabilities
//! - [`emitter`]: the traversal itself — dispatch, lowering, module
//!   framing, orchestration
//!
//! ## Example
//!
//! ```
//! use downlevel_emit::{emit_files, CompilerOptions, MemoryHost, NullResolver};
//! use downlevel_syntax::with_factory;
//!
//! let output = with_factory(|f| {
//!     let ten = f.num("10");
//!     let stmt = f.var_stmt("x", Some(ten));
//!     let file = f.source_file("a.ts", "", vec![stmt]);
//!     let host = MemoryHost::new(vec![file], CompilerOptions::default());
//!     let result = emit_files(&host, &NullResolver, &f.interner, None);
//!     assert!(!result.emit_skipped);
//!     host.output("a.js").unwrap()
//! });
//! assert_eq!(output, "var x = 10;\n");
//! ```

pub mod comments;
pub mod diagnostic;
pub mod emitter;
pub mod helpers;
pub mod host;
pub mod names;
pub mod options;
pub mod resolver;
pub mod sourcemap;
pub mod writer;

pub use diagnostic::{Category, Diagnostic};
pub use emitter::{emit_files, EmitResult, Emitter};
pub use host::{EmitHost, MemoryHost};
pub use options::{CompilerOptions, ModuleKind, ScriptTarget};
pub use resolver::{EmitResolver, NodeCheckFlags, NullResolver, Substitution};
pub use sourcemap::{decode_mappings, SourceMapData, SourceMapJson, SourceMapSpan};
pub use writer::TextWriter;
