//! Shared scaffolding for the emitter end-to-end tests.
//!
//! Tests build checked trees through the factory, wire any semantic facts
//! into a [`TestResolver`], emit through the in-memory host, and compare
//! the produced JavaScript text.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use downlevel_base::{Span, SpannedError};
use downlevel_emit::{
    emit_files, CompilerOptions, EmitHost, EmitResolver, EmitResult, MemoryHost, NodeCheckFlags,
    ScriptTarget, Substitution,
};
use downlevel_syntax::{with_factory, AstFactory, NodeId, SourceFile, Stmt};

pub fn es5() -> CompilerOptions {
    CompilerOptions {
        target: ScriptTarget::Es5,
        ..Default::default()
    }
}

pub fn es6() -> CompilerOptions {
    CompilerOptions {
        target: ScriptTarget::Es6,
        ..Default::default()
    }
}

/// A resolver whose answers are plain tables, filled per scenario.
#[derive(Default)]
pub struct TestResolver {
    pub globals: HashSet<String>,
    pub constants: HashMap<NodeId, f64>,
    pub substitutions: HashMap<NodeId, Substitution>,
    pub block_scoped_ids: HashMap<NodeId, u32>,
    pub shadowed_values: HashSet<String>,
    pub check_flags: HashMap<NodeId, NodeCheckFlags>,
    pub dead_aliases: HashSet<NodeId>,
    pub type_only_aliases: HashSet<NodeId>,
    pub types: HashMap<NodeId, String>,
    pub param_types: HashMap<NodeId, Vec<String>>,
    pub return_types: HashMap<NodeId, String>,
}

impl EmitResolver for TestResolver {
    fn has_global_name(&self, name: &str) -> bool {
        self.globals.contains(name)
    }

    fn get_constant_value(&self, node: NodeId) -> Option<f64> {
        self.constants.get(&node).copied()
    }

    fn get_expression_name_substitution(&self, node: NodeId, _name: &str) -> Option<Substitution> {
        self.substitutions.get(&node).cloned()
    }

    fn get_block_scoped_variable_id(&self, node: NodeId, _name: &str) -> Option<u32> {
        self.block_scoped_ids.get(&node).copied()
    }

    fn resolves_to_some_value(&self, name: &str) -> bool {
        self.shadowed_values.contains(name)
    }

    fn get_node_check_flags(&self, node: NodeId) -> NodeCheckFlags {
        self.check_flags
            .get(&node)
            .copied()
            .unwrap_or(NodeCheckFlags::NONE)
    }

    fn is_referenced_alias_declaration(&self, node: NodeId) -> bool {
        !self.dead_aliases.contains(&node)
    }

    fn is_value_alias_declaration(&self, node: NodeId) -> bool {
        !self.type_only_aliases.contains(&node)
    }

    fn serialize_type_of_node(&self, node: NodeId) -> String {
        self.types
            .get(&node)
            .cloned()
            .unwrap_or_else(|| "Object".to_string())
    }

    fn serialize_parameter_types_of_node(&self, node: NodeId) -> Vec<String> {
        self.param_types.get(&node).cloned().unwrap_or_default()
    }

    fn serialize_return_type_of_node(&self, node: NodeId) -> String {
        self.return_types
            .get(&node)
            .cloned()
            .unwrap_or_else(|| "void 0".to_string())
    }
}

/// Builds one `main.ts`, emits it with a default resolver, and returns the
/// JavaScript text.
pub fn emit_with<F>(options: CompilerOptions, build: F) -> String
where
    F: for<'a> FnOnce(&mut AstFactory<'a>) -> Vec<&'a Stmt<'a>>,
{
    emit_resolved(options, "", |f| (build(f), TestResolver::default()))
}

/// Like [`emit_with`], with real source text and a scenario resolver.
pub fn emit_resolved<F>(options: CompilerOptions, text: &str, build: F) -> String
where
    F: for<'a> FnOnce(&mut AstFactory<'a>) -> (Vec<&'a Stmt<'a>>, TestResolver),
{
    with_factory(|f| {
        let (stmts, resolver) = build(f);
        let file = f.source_file("main.ts", text, stmts);
        let host = MemoryHost::new(vec![file], options);
        let result = emit_files(&host, &resolver, &f.interner, None);
        assert!(!result.emit_skipped, "emit skipped: {:?}", result.diagnostics);
        host.output("main.js").expect("main.js should be emitted")
    })
}

/// Full-control variant: several files, full result and host access.
pub fn emit_program<B, C, R>(options: CompilerOptions, build: B, check: C) -> R
where
    B: for<'a> FnOnce(
        &mut AstFactory<'a>,
    ) -> (Vec<(String, String, Vec<&'a Stmt<'a>>)>, TestResolver),
    C: for<'a> FnOnce(&MemoryHost<'a>, &EmitResult) -> R,
{
    with_factory(|f| {
        let (specs, resolver) = build(f);
        let mut files = Vec::new();
        for (name, text, stmts) in specs {
            files.push(f.source_file(&name, &text, stmts));
        }
        let host = MemoryHost::new(files, options);
        let result = emit_files(&host, &resolver, &f.interner, None);
        check(&host, &result)
    })
}

/// Joins expected-output lines with `\n` and a trailing newline, the shape
/// every emitted file has.
pub fn lines(parts: &[&str]) -> String {
    let mut out = parts.join("\n");
    out.push('\n');
    out
}

/// A host backed by a real directory; exercises the filesystem round-trip
/// the in-memory host skips.
pub struct DiskHost<'a> {
    pub files: Vec<SourceFile<'a>>,
    pub options: CompilerOptions,
    root: PathBuf,
}

impl<'a> DiskHost<'a> {
    pub fn new(files: Vec<SourceFile<'a>>, options: CompilerOptions, root: &Path) -> Self {
        DiskHost {
            files,
            options,
            root: root.to_path_buf(),
        }
    }

    pub fn read_output(&self, file_name: &str) -> std::io::Result<String> {
        fs::read_to_string(self.root.join(file_name))
    }
}

impl<'a> EmitHost<'a> for DiskHost<'a> {
    fn get_source_files(&self) -> &[SourceFile<'a>] {
        &self.files
    }

    fn get_compiler_options(&self) -> &CompilerOptions {
        &self.options
    }

    fn write_file(&self, file_name: &str, data: &str, write_bom: bool) -> downlevel_base::Result<()> {
        let mut text = String::new();
        if write_bom {
            text.push('\u{feff}');
        }
        text.push_str(data);
        fs::write(self.root.join(file_name), text).map_err(|error| {
            SpannedError::new(
                format!("could not write {}: {}", file_name, error),
                Span::SYNTHESIZED,
            )
        })
    }
}
