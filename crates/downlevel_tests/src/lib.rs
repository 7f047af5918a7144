//! Integration test crate for the downlevel workspace.
//!
//! All tests live under `tests/`; shared scaffolding (AST construction
//! helpers, the in-memory host, the table-driven resolver) is in
//! `tests/common/mod.rs`. This library target exists only so the crate
//! participates in the workspace build.
