//! Per-file orchestration: output paths, helper preludes, envelope
//! selection, artifact writing.
//!
//! One [`Emitter`] produces one output file. Without `--out` that means one
//! emitter per input; with `--out` the non-external-module inputs share a
//! single emitter (and its generated-name universe and helper flags), each
//! contributing its own `sources` entry to the shared map, while external
//! modules keep their own outputs.
//!
//! Helper functions (`__extends`, `__decorate`, `__metadata`, `__param`)
//! are emitted at the top of an output file when a pre-scan finds a
//! construct that will need them, each at most once per output.

use downlevel_base::Interner;
use downlevel_syntax::{
    ClassLike, Decorator, Expr, ExprKind, ForInit, Func, FuncBody, MemberKind, SourceFile, Stmt,
    StmtKind,
};

use crate::diagnostic::{codes, sort_and_deduplicate, Diagnostic};
use crate::emitter::Emitter;
use crate::helpers;
use crate::host::EmitHost;
use crate::options::{CompilerOptions, ModuleKind};
use crate::resolver::EmitResolver;
use crate::sourcemap::SourceMapData;

/// What one emission run reports back.
#[derive(Debug)]
pub struct EmitResult {
    /// An output could not be produced (a host write failed).
    pub emit_skipped: bool,
    /// Position-sorted, deduplicated.
    pub diagnostics: Vec<Diagnostic>,
    pub source_maps: Vec<SourceMapData>,
}

/// Emits every input file (or just `target_source_file`) through the host.
///
/// The host is borrowed for the tree lifetime `'a`: its source files hold
/// arena references, and the emitter walks them at that same lifetime.
pub fn emit_files<'a>(
    host: &'a dyn EmitHost<'a>,
    resolver: &'a dyn EmitResolver,
    interner: &'a Interner,
    target_source_file: Option<&str>,
) -> EmitResult {
    let options = host.get_compiler_options();
    let mut result = EmitResult {
        emit_skipped: false,
        diagnostics: Vec::new(),
        source_maps: Vec::new(),
    };

    let files = host.get_source_files();
    let selected = |file: &SourceFile<'a>| {
        target_source_file
            .map(|name| file.file_name == name)
            .unwrap_or(true)
            && !file.file_name.ends_with(".d.ts")
    };

    if let Some(out) = options.out.clone() {
        let batch: Vec<&SourceFile<'a>> = files
            .iter()
            .filter(|f| !f.external_module && selected(f))
            .collect();
        if !batch.is_empty() {
            emit_output(host, resolver, interner, options, &batch, &out, &mut result);
        }
        for file in files.iter().filter(|f| f.external_module && selected(f)) {
            let path = own_output_path(&file.file_name);
            emit_output(host, resolver, interner, options, &[file], &path, &mut result);
        }
    } else {
        for file in files.iter().filter(|f| selected(f)) {
            let path = own_output_path(&file.file_name);
            emit_output(host, resolver, interner, options, &[file], &path, &mut result);
        }
    }

    result.diagnostics = sort_and_deduplicate(std::mem::take(&mut result.diagnostics));
    result
}

fn emit_output<'a>(
    host: &'a dyn EmitHost<'a>,
    resolver: &'a dyn EmitResolver,
    interner: &'a Interner,
    options: &'a CompilerOptions,
    batch: &[&'a SourceFile<'a>],
    js_path: &str,
    result: &mut EmitResult,
) {
    let new_line = host.get_new_line().to_string();
    let common_dir = host.get_common_source_directory();
    let mut emitter = Emitter::new(
        options,
        resolver,
        interner,
        batch[0],
        &new_line,
        options.source_map,
    );

    for file in batch {
        let map_source = map_source_path(&file.file_name, &common_dir);
        emitter.set_source_file(file, map_source);
        emitter.emit_helpers_if_needed(file);
        emitter.emit_source_file(file);
    }
    emitter.write_line();

    if let Some(source_map) = emitter.source_map.take() {
        let map_path = format!("{}.map", js_path);
        let url = match &options.map_root {
            Some(root) => format!("{}/{}", root.trim_end_matches('/'), basename(&map_path)),
            None => basename(&map_path).to_string(),
        };
        emitter.write("//# sourceMappingURL=");
        emitter.write(&url);
        emitter.write_line();
        let map = source_map.finish(
            basename(js_path).to_string(),
            options.source_root.clone().unwrap_or_default(),
        );
        let json = serde_json::to_string(&map).expect("source map serializes");
        if let Err(error) = host.write_file(&map_path, &json, false) {
            result.emit_skipped = true;
            result.diagnostics.push(Diagnostic::error(
                &map_path,
                downlevel_base::Span::SYNTHESIZED,
                codes::WRITE_FAILED,
                format!("could not write source map: {}", error),
            ));
        }
        result.source_maps.push(SourceMapData {
            source_map_file_path: map_path,
            js_source_mapping_url: url,
            map,
        });
    }

    result.diagnostics.append(&mut emitter.diagnostics);
    let text = emitter.writer.into_text();
    if let Err(error) = host.write_file(js_path, &text, options.emit_bom) {
        result.emit_skipped = true;
        result.diagnostics.push(Diagnostic::error(
            js_path,
            downlevel_base::Span::SYNTHESIZED,
            codes::WRITE_FAILED,
            format!("could not write output: {}", error),
        ));
    }
}

/// `a/b/c.ts` → `a/b/c.js`.
pub fn own_output_path(file_name: &str) -> String {
    for ext in [".tsx", ".ts"] {
        if let Some(stem) = file_name.strip_suffix(ext) {
            return format!("{}.js", stem);
        }
    }
    format!("{}.js", file_name)
}

fn map_source_path(file_name: &str, common_dir: &str) -> String {
    if !common_dir.is_empty() {
        if let Some(rel) = file_name.strip_prefix(common_dir) {
            return rel.trim_start_matches('/').to_string();
        }
    }
    file_name.to_string()
}

fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

impl<'a> Emitter<'a> {
    /// One source file's contribution to the output: detached header,
    /// then the statement list inside its envelope.
    pub(crate) fn emit_source_file(&mut self, file: &'a SourceFile<'a>) {
        if !file.text.is_empty() {
            self.emit_detached_comments(0);
        }
        if file.external_module {
            match self.options.module {
                ModuleKind::CommonJs => self.emit_commonjs_module(file),
                ModuleKind::Amd => self.emit_amd_module(file),
                ModuleKind::System => self.emit_system_module(file),
                ModuleKind::None => {
                    if self.options.is_downlevel() {
                        self.emit_lines(file.stmts);
                        self.flush_temp_declarations();
                    } else {
                        self.emit_es6_module(file);
                    }
                }
            }
        } else {
            self.emit_lines(file.stmts);
            self.flush_temp_declarations();
        }
        self.write_line();
    }

    /// Pre-scan for helper demand; each helper emits once per output.
    pub(crate) fn emit_helpers_if_needed(&mut self, file: &'a SourceFile<'a>) {
        let mut needs = HelperNeeds::default();
        scan_stmts(file.stmts, &mut needs);
        // `__extends` is only called from the class IIFE; at ES6 the
        // `extends` clause survives and no helper is needed.
        if needs.extends && self.options.is_downlevel() && !self.extends_emitted {
            self.extends_emitted = true;
            self.write_lines(helpers::EXTENDS_HELPER);
            self.write_line();
        }
        if needs.decorate && !self.decorate_emitted {
            self.decorate_emitted = true;
            self.write_lines(helpers::DECORATE_HELPER);
            self.write_line();
            if self.options.emit_decorator_metadata {
                self.write_lines(helpers::METADATA_HELPER);
                self.write_line();
            }
        }
        if needs.param && !self.param_emitted {
            self.param_emitted = true;
            self.write_lines(helpers::PARAM_HELPER);
            self.write_line();
        }
    }
}

#[derive(Default)]
struct HelperNeeds {
    extends: bool,
    decorate: bool,
    param: bool,
}

fn scan_decorators(decorators: &[Decorator<'_>], needs: &mut HelperNeeds) {
    if !decorators.is_empty() {
        needs.decorate = true;
    }
}

fn scan_class(class: &ClassLike<'_>, needs: &mut HelperNeeds) {
    if class.heritage.is_some() {
        needs.extends = true;
    }
    scan_decorators(class.decorators, needs);
    for member in class.members {
        scan_decorators(member.decorators, needs);
        match &member.kind {
            MemberKind::Constructor(func)
            | MemberKind::Method { func, .. }
            | MemberKind::GetAccessor { func, .. }
            | MemberKind::SetAccessor { func, .. } => {
                for param in func.params {
                    if !param.decorators.is_empty() {
                        needs.decorate = true;
                        needs.param = true;
                    }
                }
                scan_func(func, needs);
            }
            MemberKind::Property { init, .. } => {
                if let Some(init) = init {
                    scan_expr(init, needs);
                }
            }
        }
    }
}

fn scan_func(func: &Func<'_>, needs: &mut HelperNeeds) {
    match &func.body {
        Some(FuncBody::Block(block)) => scan_stmt(block, needs),
        Some(FuncBody::Expr(expr)) => scan_expr(expr, needs),
        None => {}
    }
}

fn scan_stmts(stmts: &[&Stmt<'_>], needs: &mut HelperNeeds) {
    for stmt in stmts {
        scan_stmt(stmt, needs);
    }
}

fn scan_stmt(stmt: &Stmt<'_>, needs: &mut HelperNeeds) {
    match &stmt.kind {
        StmtKind::Class(class) => scan_class(class, needs),
        StmtKind::Function(func) => scan_func(func, needs),
        StmtKind::Module(decl) => scan_stmts(decl.body, needs),
        StmtKind::Block(stmts) => scan_stmts(stmts, needs),
        StmtKind::Var(list) => {
            for decl in list.decls {
                if let Some(init) = decl.init {
                    scan_expr(init, needs);
                }
            }
        }
        StmtKind::Expr(expr)
        | StmtKind::Throw(expr)
        | StmtKind::ExportAssignment(expr)
        | StmtKind::ExportDefault(expr) => scan_expr(expr, needs),
        StmtKind::Return(Some(expr)) => scan_expr(expr, needs),
        StmtKind::If {
            cond,
            then_branch,
            else_branch,
        } => {
            scan_expr(cond, needs);
            scan_stmt(then_branch, needs);
            if let Some(else_branch) = else_branch {
                scan_stmt(else_branch, needs);
            }
        }
        StmtKind::Do { body, cond } | StmtKind::While { cond, body } => {
            scan_expr(cond, needs);
            scan_stmt(body, needs);
        }
        StmtKind::For {
            init,
            cond,
            incr,
            body,
        } => {
            if let Some(ForInit::Expr(expr)) = init {
                scan_expr(expr, needs);
            }
            if let Some(cond) = cond {
                scan_expr(cond, needs);
            }
            if let Some(incr) = incr {
                scan_expr(incr, needs);
            }
            scan_stmt(body, needs);
        }
        StmtKind::ForIn { expr, body, .. } | StmtKind::ForOf { expr, body, .. } => {
            scan_expr(expr, needs);
            scan_stmt(body, needs);
        }
        StmtKind::With { expr, body } => {
            scan_expr(expr, needs);
            scan_stmt(body, needs);
        }
        StmtKind::Switch { expr, cases } => {
            scan_expr(expr, needs);
            for case in *cases {
                if let Some(test) = case.test {
                    scan_expr(test, needs);
                }
                scan_stmts(case.stmts, needs);
            }
        }
        StmtKind::Labeled { body, .. } => scan_stmt(body, needs),
        StmtKind::Try {
            block,
            catch,
            finally,
        } => {
            scan_stmt(block, needs);
            if let Some(catch) = catch {
                scan_stmt(catch.block, needs);
            }
            if let Some(finally) = finally {
                scan_stmt(finally, needs);
            }
        }
        _ => {}
    }
}

fn scan_expr(expr: &Expr<'_>, needs: &mut HelperNeeds) {
    match &expr.kind {
        ExprKind::Class(class) => scan_class(class, needs),
        ExprKind::Function(func) | ExprKind::Arrow(func) => scan_func(func, needs),
        ExprKind::Paren(inner)
        | ExprKind::TypeAssertion(inner)
        | ExprKind::Spread(inner)
        | ExprKind::Unary { operand: inner, .. }
        | ExprKind::Postfix { operand: inner, .. } => scan_expr(inner, needs),
        ExprKind::Binary { left, right, .. } => {
            scan_expr(left, needs);
            scan_expr(right, needs);
        }
        ExprKind::Conditional {
            cond,
            when_true,
            when_false,
        } => {
            scan_expr(cond, needs);
            scan_expr(when_true, needs);
            scan_expr(when_false, needs);
        }
        ExprKind::Call { callee, args } => {
            scan_expr(callee, needs);
            for arg in *args {
                scan_expr(arg, needs);
            }
        }
        ExprKind::New { callee, args } => {
            scan_expr(callee, needs);
            if let Some(args) = args {
                for arg in *args {
                    scan_expr(arg, needs);
                }
            }
        }
        ExprKind::Array(elements) => {
            for element in *elements {
                scan_expr(element, needs);
            }
        }
        ExprKind::Object(members) => {
            for member in *members {
                if let downlevel_syntax::ObjectMemberKind::Prop { value, .. } = &member.kind {
                    scan_expr(value, needs);
                }
            }
        }
        ExprKind::PropAccess { target, .. } => scan_expr(target, needs),
        ExprKind::ElemAccess { target, index } => {
            scan_expr(target, needs);
            scan_expr(index, needs);
        }
        ExprKind::Template { spans, .. } => {
            for span in *spans {
                scan_expr(span.expr, needs);
            }
        }
        ExprKind::TaggedTemplate { tag, spans, .. } => {
            scan_expr(tag, needs);
            for span in *spans {
                scan_expr(span.expr, needs);
            }
        }
        _ => {}
    }
}
