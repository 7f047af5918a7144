//! The emitter's mutable state and the scoped-emission machinery.
//!
//! One [`Emitter`] exists per output file. All per-source-file state —
//! temp-name counters, generated-name maps, helper-emitted flags — lives
//! here; whenever a construct introduces a lexical environment (function
//! body, class body, module body) the affected slots are saved on entry and
//! restored on exit, which is the entire synchronization story of the
//! emitter.

use std::collections::{HashMap, HashSet};
use std::mem;

use downlevel_base::{Interner, Span, Symbol};
use downlevel_syntax::{
    leading_comment_ranges, skip_trivia, trailing_comment_ranges, Expr, NodeId, SourceFile, Stmt,
};

use crate::comments;
use crate::diagnostic::{Category, Diagnostic};
use crate::names::NameGenerator;
use crate::options::CompilerOptions;
use crate::resolver::EmitResolver;
use crate::sourcemap::SourceMapWriter;
use crate::writer::TextWriter;

/// Lexical-environment snapshot taken at function/class/module body entry.
pub(crate) struct SavedEnv {
    temp_state: u32,
    temp_variables: Vec<String>,
    temp_parameters: Vec<String>,
}

/// Innermost class being emitted; drives `super` and static-context
/// decisions.
pub(crate) struct ClassFrame {
    /// The name the emitted code uses for the class (a generated alias for
    /// anonymous classes).
    pub name: String,
    pub has_base: bool,
    pub in_static: bool,
}

/// Innermost namespace body; exported members assign through its local.
pub(crate) struct ModuleFrame {
    pub local: String,
}

/// Pre-pass classification of an external module's top-level statements.
#[derive(Default)]
pub(crate) struct ExternalModuleInfo<'a> {
    /// Imports (and referenced import-equals) that survive to the output,
    /// in source order.
    pub external_imports: Vec<&'a Stmt<'a>>,
    /// `export { local as exported }` clauses without a module specifier:
    /// local name → exported names.
    pub export_specifiers: HashMap<Symbol, Vec<Symbol>>,
    /// `export = expr`, emitted by the envelope's tail.
    pub export_equals: Option<&'a Expr<'a>>,
    pub has_export_stars: bool,
}

pub struct Emitter<'a> {
    pub(crate) options: &'a CompilerOptions,
    pub(crate) resolver: &'a dyn EmitResolver,
    pub(crate) interner: &'a Interner,
    pub(crate) writer: TextWriter,
    pub(crate) source_map: Option<SourceMapWriter>,
    pub(crate) file: &'a SourceFile<'a>,

    pub(crate) names: NameGenerator,
    pub(crate) temp_variables: Vec<String>,
    pub(crate) temp_parameters: Vec<String>,
    /// Captured computed-property-name temporaries, keyed by the name
    /// expression's node.
    pub(crate) computed_prop_temps: HashMap<NodeId, String>,

    pub(crate) extends_emitted: bool,
    pub(crate) decorate_emitted: bool,
    pub(crate) param_emitted: bool,
    pub(crate) export_star_helper_emitted: bool,

    /// Detached headers already written: (node pos, consumed end).
    pub(crate) detached_comment_ends: Vec<(usize, usize)>,
    /// High-water mark of emitted comment ranges in the current file; a
    /// range below it was already routed (a trailing comment is also in
    /// the next node's leading trivia).
    pub(crate) comment_watermark: usize,

    pub(crate) class_stack: Vec<ClassFrame>,
    pub(crate) module_stack: Vec<ModuleFrame>,
    /// System envelope: the export function parameter (`exports_1`).
    pub(crate) export_fn: Option<String>,
    /// System envelope: exported top-level bindings whose assignments are
    /// wrapped in `exports_1("name", ...)`.
    pub(crate) system_exported_names: HashSet<Symbol>,
    pub(crate) external: Option<ExternalModuleInfo<'a>>,
    /// Emitting the statement list of an external module's body.
    pub(crate) in_module_root: bool,
    /// Blocks between here and the enclosing function/module/file body;
    /// nonzero means `let`/`const` declarations are rename candidates.
    pub(crate) nested_block_depth: usize,

    pub(crate) diagnostics: Vec<Diagnostic>,
}

impl<'a> Emitter<'a> {
    pub fn new(
        options: &'a CompilerOptions,
        resolver: &'a dyn EmitResolver,
        interner: &'a Interner,
        file: &'a SourceFile<'a>,
        new_line: &str,
        with_source_map: bool,
    ) -> Self {
        Emitter {
            options,
            resolver,
            interner,
            writer: TextWriter::new(new_line),
            source_map: with_source_map.then(SourceMapWriter::new),
            file,
            names: NameGenerator::new(),
            temp_variables: Vec::new(),
            temp_parameters: Vec::new(),
            computed_prop_temps: HashMap::new(),
            extends_emitted: false,
            decorate_emitted: false,
            param_emitted: false,
            export_star_helper_emitted: false,
            detached_comment_ends: Vec::new(),
            comment_watermark: 0,
            class_stack: Vec::new(),
            module_stack: Vec::new(),
            export_fn: None,
            system_exported_names: HashSet::new(),
            external: None,
            in_module_root: false,
            nested_block_depth: 0,
            diagnostics: Vec::new(),
        }
    }

    /// Switches the current source file (`--out` concatenation). Generated
    /// names persist across the boundary — they must stay unique within the
    /// whole output — but the uniqueness test always consults the current
    /// file's identifier universe.
    pub(crate) fn set_source_file(&mut self, file: &'a SourceFile<'a>, map_source_path: String) {
        self.file = file;
        self.comment_watermark = 0;
        self.detached_comment_ends.clear();
        if let Some(sm) = &mut self.source_map {
            sm.set_current_source(map_source_path);
        }
    }

    // ─── Writer passthroughs ────────────────────────────────────────────

    pub(crate) fn write(&mut self, text: &str) {
        self.writer.write(text);
    }

    pub(crate) fn write_line(&mut self) {
        self.writer.write_line();
    }

    pub(crate) fn increase_indent(&mut self) {
        self.writer.increase_indent();
    }

    pub(crate) fn decrease_indent(&mut self) {
        self.writer.decrease_indent();
    }

    /// Writes multi-line helper text, re-lining through the writer so the
    /// host's newline applies.
    pub(crate) fn write_lines(&mut self, text: &str) {
        for line in text.split('\n') {
            self.write_line();
            self.write(line);
        }
    }

    // ─── Source-map bracketing ──────────────────────────────────────────

    /// Records the start-of-node span at the first non-trivia position.
    /// Synthesized nodes record nothing and inherit the surrounding span.
    pub(crate) fn record_start(&mut self, span: Span) {
        if span.is_synthesized() {
            return;
        }
        if let Some(sm) = &mut self.source_map {
            let pos = skip_trivia(&self.file.text, span.pos);
            sm.record_span(self.file, pos, &self.writer);
        }
    }

    pub(crate) fn record_end(&mut self, span: Span) {
        if span.is_synthesized() {
            return;
        }
        if let Some(sm) = &mut self.source_map {
            sm.record_span(self.file, span.end, &self.writer);
        }
    }

    /// Writes a token whose source position is known, bracketing it with
    /// span records. Returns the source offset just past the token.
    pub(crate) fn emit_token(&mut self, text: &str, pos: usize) -> usize {
        let start = skip_trivia(&self.file.text, pos);
        if let Some(sm) = &mut self.source_map {
            sm.record_span(self.file, start, &self.writer);
        }
        self.write(text);
        let end = start + text.len();
        if let Some(sm) = &mut self.source_map {
            sm.record_span(self.file, end, &self.writer);
        }
        end
    }

    pub(crate) fn push_scope_name(&mut self, name: &str) {
        if let Some(sm) = &mut self.source_map {
            sm.push_scope(name);
        }
    }

    pub(crate) fn pop_scope_name(&mut self) {
        if let Some(sm) = &mut self.source_map {
            sm.pop_scope();
        }
    }

    // ─── Lexical environments ───────────────────────────────────────────

    /// Saves and clears the temp-name state on entry to a function, class,
    /// or module body.
    pub(crate) fn start_lexical_environment(&mut self) -> SavedEnv {
        SavedEnv {
            temp_state: self.names.temp_state(),
            temp_variables: mem::take(&mut self.temp_variables),
            temp_parameters: mem::take(&mut self.temp_parameters),
        }
    }

    /// Restores the saved state; call after flushing accumulated temps.
    pub(crate) fn end_lexical_environment(&mut self, saved: SavedEnv) {
        self.names.set_temp_state(saved.temp_state);
        self.temp_variables = saved.temp_variables;
        self.temp_parameters = saved.temp_parameters;
    }

    /// Writes the `var _a, _b;` prelude-at-exit for temporaries invented
    /// inside the current body.
    pub(crate) fn flush_temp_declarations(&mut self) {
        if self.temp_variables.is_empty() {
            return;
        }
        self.write_line();
        self.write("var ");
        let names = mem::take(&mut self.temp_variables);
        for (i, name) in names.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.write(name);
        }
        self.write(";");
    }

    /// A fresh temporary, recorded for the enclosing body's flush.
    pub(crate) fn new_temp_variable(&mut self, hint: crate::names::TempHint) -> String {
        let name = self.names.make_temp_variable(hint, self.resolver, self.file);
        self.temp_variables.push(name.clone());
        name
    }

    /// A fresh temporary that will be declared as a parameter, not flushed.
    pub(crate) fn new_temp_parameter(&mut self) -> String {
        let name = self
            .names
            .make_temp_variable(crate::names::TempHint::Auto, self.resolver, self.file);
        self.temp_parameters.push(name.clone());
        name
    }

    // ─── Names ──────────────────────────────────────────────────────────

    pub(crate) fn text_of(&self, sym: Symbol) -> &'a str {
        // The interner outlives the emitter; re-borrow at 'a.
        self.interner.resolve(sym)
    }

    /// The stable generated name for a node, manufacturing it on first use.
    pub(crate) fn generated_name_for_node(&mut self, node: NodeId, base: &str) -> String {
        if let Some(name) = self.names.node_name(node) {
            return name.to_string();
        }
        let name = self.names.make_unique_name(base, self.resolver, self.file);
        self.names.set_node_name(node, name.clone());
        name
    }

    /// Module/enum declarations keep their own identifier when nothing in
    /// their body shadows it; otherwise they get a suffixed alias.
    pub(crate) fn module_like_name(&mut self, node: NodeId, own: &str, shadowed: bool) -> String {
        if let Some(name) = self.names.node_name(node) {
            return name.to_string();
        }
        if !shadowed && !self.names.is_generated(own) {
            self.names.reserve(own);
            self.names.set_node_name(node, own.to_string());
            return own.to_string();
        }
        let name = self.names.make_unique_name(own, self.resolver, self.file);
        self.names.set_node_name(node, name.clone());
        name
    }

    // ─── Comments ───────────────────────────────────────────────────────

    /// Leading comments of a node, minus any detached header already
    /// written for the same position.
    pub(crate) fn emit_leading_comments(&mut self, span: Span) {
        if span.is_synthesized() {
            return;
        }
        let mut pos = span.pos;
        if let Some(&(_, end)) = self
            .detached_comment_ends
            .iter()
            .find(|(node_pos, _)| *node_pos == span.pos)
        {
            pos = end;
        }
        let ranges = leading_comment_ranges(&self.file.text, pos);
        let ranges = self.route_comments(ranges);
        comments::emit_new_line_before_comments(&mut self.writer, self.file, pos, &ranges);
        comments::emit_comment_ranges(&mut self.writer, &self.file.text, &ranges);
    }

    /// Applies the `removeComments` filter and the already-routed
    /// watermark, advancing the watermark over what survives.
    fn route_comments(
        &mut self,
        ranges: Vec<downlevel_syntax::CommentRange>,
    ) -> Vec<downlevel_syntax::CommentRange> {
        let ranges =
            comments::filter_comments(ranges, &self.file.text, self.options.remove_comments);
        let watermark = self.comment_watermark;
        let ranges: Vec<_> = ranges
            .into_iter()
            .filter(|r| r.span.pos >= watermark)
            .collect();
        if let Some(last) = ranges.last() {
            self.comment_watermark = last.span.end;
        }
        ranges
    }

    /// Trailing comments on the same line as the node's end.
    pub(crate) fn emit_trailing_comments(&mut self, span: Span) {
        if span.is_synthesized() {
            return;
        }
        let ranges = trailing_comment_ranges(&self.file.text, span.end);
        let ranges = self.route_comments(ranges);
        comments::emit_trailing_comment_ranges(&mut self.writer, &self.file.text, &ranges);
    }

    /// Copyright-style header at a file or body start; written once, then
    /// suppressed from that position's leading set.
    pub(crate) fn emit_detached_comments(&mut self, pos: usize) {
        if self.options.remove_comments {
            return;
        }
        if let Some((ranges, end)) = comments::compute_detached_comments(self.file, pos) {
            comments::emit_comment_ranges(&mut self.writer, &self.file.text, &ranges);
            self.write_line();
            self.detached_comment_ends.push((pos, end));
            self.comment_watermark = self.comment_watermark.max(end);
        }
    }

    // ─── Diagnostics ────────────────────────────────────────────────────

    pub(crate) fn report(&mut self, span: Span, code: u32, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic {
            file_name: self.file.file_name.clone(),
            span,
            code,
            category: Category::Error,
            message: message.into(),
        });
    }

    // ─── Source-layout queries ──────────────────────────────────────────

    /// Both spans real and starting on one source line; synthesized spans
    /// count as same-line (lists of manufactured nodes stay compact).
    pub(crate) fn starts_on_same_line(&self, a: Span, b: Span) -> bool {
        if a.is_synthesized() || b.is_synthesized() {
            return true;
        }
        let text = &self.file.text;
        self.file.line_of_pos(skip_trivia(text, a.pos)) == self.file.line_of_pos(skip_trivia(text, b.pos))
    }
}
