//! The module framer: four envelopes around a file's top-level statements.
//!
//! - **ES6** (no wrapper): `import`/`export` re-emit verbatim.
//! - **CommonJS**: imports become `var alias = require("mod")`, exports
//!   become `exports.x` writes, `export *` routes through the `__export`
//!   helper, `export =` becomes `module.exports = ...` at the tail.
//! - **AMD**: the file body becomes the `define([...], function (...))`
//!   callback; dependencies ride the array and arrive as parameters;
//!   `export =` becomes `return ...`.
//! - **System**: `System.register` with hoisted locals, one setter per
//!   dependency, and the statement body inside `execute`; assignments to
//!   exported bindings wrap in `exports_N("name", value)`.
//!
//! A pre-pass ([`Emitter::collect_external_module_info`]) classifies the
//! top-level statements and pre-generates import aliases so reference
//! substitution can render them before the import itself has emitted.

use std::collections::HashSet;

use downlevel_base::Symbol;
use downlevel_syntax::{
    Binding, ExportDecl, ImportDecl, NamedBindings, NodeFlags, SourceFile, Stmt, StmtKind,
};

use super::module_name_to_identifier;
use crate::emitter::context::ExternalModuleInfo;
use crate::emitter::Emitter;
use crate::helpers;
use crate::options::ModuleKind;

impl<'a> Emitter<'a> {
    /// Classifies top-level statements and assigns import aliases.
    /// Non-value aliases (`import x = require(...)` never referenced as a
    /// value) are dropped here and never reach the output.
    pub(crate) fn collect_external_module_info(&mut self, file: &'a SourceFile<'a>) {
        let mut info = ExternalModuleInfo::default();
        for stmt in file.stmts.iter().copied() {
            match &stmt.kind {
                StmtKind::Import(decl) => {
                    let base = module_name_to_identifier(&decl.module);
                    self.generated_name_for_node(stmt.id, &base);
                    info.external_imports.push(stmt);
                }
                StmtKind::ImportEquals(_) => {
                    if self.resolver.is_referenced_alias_declaration(stmt.id) {
                        info.external_imports.push(stmt);
                    }
                }
                StmtKind::Export(decl) => {
                    if let Some(module) = &decl.module {
                        let base = module_name_to_identifier(module);
                        self.generated_name_for_node(stmt.id, &base);
                        info.external_imports.push(stmt);
                        if decl.specifiers.is_none() {
                            info.has_export_stars = true;
                        }
                    } else if let Some(specifiers) = decl.specifiers {
                        for spec in specifiers {
                            if !self.resolver.is_value_alias_declaration(spec.id) {
                                continue;
                            }
                            let local = spec.property.unwrap_or(spec.name);
                            info.export_specifiers
                                .entry(local)
                                .or_default()
                                .push(spec.name);
                        }
                    }
                }
                StmtKind::ExportAssignment(expr) => info.export_equals = Some(*expr),
                _ => {}
            }
        }
        self.external = Some(info);
    }

    // ─── CommonJS ───────────────────────────────────────────────────────

    pub(crate) fn emit_commonjs_module(&mut self, file: &'a SourceFile<'a>) {
        self.collect_external_module_info(file);
        if self
            .external
            .as_ref()
            .map(|i| i.has_export_stars)
            .unwrap_or(false)
            && !self.export_star_helper_emitted
        {
            self.export_star_helper_emitted = true;
            self.write_lines(helpers::EXPORT_STAR_HELPER);
        }
        self.in_module_root = true;
        self.emit_lines(file.stmts);
        self.flush_temp_declarations();
        if let Some(info) = &self.external {
            if let Some(expr) = info.export_equals {
                self.write_line();
                self.write("module.exports = ");
                self.emit_expr(expr);
                self.write(";");
            }
        }
        self.in_module_root = false;
    }

    // ─── AMD ────────────────────────────────────────────────────────────

    pub(crate) fn emit_amd_module(&mut self, file: &'a SourceFile<'a>) {
        self.collect_external_module_info(file);
        let deps = self.external_dependency_list();
        self.write("define([\"require\", \"exports\"");
        for (module, _) in &deps {
            self.write(", \"");
            self.write(module);
            self.write("\"");
        }
        self.write("], function (require, exports");
        for (_, alias) in &deps {
            self.write(", ");
            self.write(alias);
        }
        self.write(") {");
        self.increase_indent();
        if self
            .external
            .as_ref()
            .map(|i| i.has_export_stars)
            .unwrap_or(false)
        {
            self.write_lines(helpers::EXPORT_STAR_HELPER);
        }
        self.in_module_root = true;
        self.emit_lines(file.stmts);
        self.flush_temp_declarations();
        if let Some(info) = &self.external {
            if let Some(expr) = info.export_equals {
                self.write_line();
                self.write("return ");
                self.emit_expr(expr);
                self.write(";");
            }
        }
        self.in_module_root = false;
        self.decrease_indent();
        self.write_line();
        self.write("});");
    }

    /// (module specifier, local alias) per surviving dependency, in
    /// source order.
    fn external_dependency_list(&mut self) -> Vec<(String, String)> {
        let imports: Vec<&'a Stmt<'a>> = self
            .external
            .as_ref()
            .map(|i| i.external_imports.clone())
            .unwrap_or_default();
        let mut deps = Vec::new();
        for stmt in imports {
            match &stmt.kind {
                StmtKind::Import(decl) => {
                    let alias = self
                        .names
                        .node_name(stmt.id)
                        .expect("alias generated in collect pass")
                        .to_string();
                    deps.push((decl.module.clone(), alias));
                }
                StmtKind::ImportEquals(decl) => {
                    let alias = self.text_of(decl.name).to_string();
                    deps.push((decl.module.clone(), alias));
                }
                StmtKind::Export(decl) => {
                    let alias = self
                        .names
                        .node_name(stmt.id)
                        .expect("alias generated in collect pass")
                        .to_string();
                    deps.push((decl.module.clone().unwrap(), alias));
                }
                _ => {}
            }
        }
        deps
    }

    // ─── System ─────────────────────────────────────────────────────────

    pub(crate) fn emit_system_module(&mut self, file: &'a SourceFile<'a>) {
        self.collect_external_module_info(file);
        let deps = self.external_dependency_list();
        let export_fn = self
            .names
            .make_unique_name("exports", self.resolver, self.file);
        self.export_fn = Some(export_fn.clone());
        self.system_exported_names = collect_system_exported_names(file);

        self.write("System.register([");
        for (i, (module, _)) in deps.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.write("\"");
            self.write(module);
            self.write("\"");
        }
        self.write("], function (");
        self.write(&export_fn);
        self.write(") {");
        self.increase_indent();

        // Hoisted prologue: import locals and top-level bindings first,
        // then full function declarations.
        let hoisted = self.collect_hoisted_names(file);
        if !hoisted.is_empty() {
            self.write_line();
            self.write("var ");
            for (i, name) in hoisted.iter().enumerate() {
                if i > 0 {
                    self.write(", ");
                }
                self.write(name);
            }
            self.write(";");
        }
        let star_fn = if self
            .external
            .as_ref()
            .map(|i| i.has_export_stars)
            .unwrap_or(false)
        {
            Some(self.emit_system_export_star_fn(&export_fn))
        } else {
            None
        };
        self.in_module_root = true;
        for stmt in file.stmts {
            if matches!(stmt.kind, StmtKind::Function(_)) {
                self.write_line();
                self.emit_stmt(stmt);
            }
        }

        self.write_line();
        self.write("return {");
        self.increase_indent();
        self.write_line();
        self.write("setters:[");
        self.emit_system_setters(&deps, star_fn.as_deref());
        self.write("],");
        self.write_line();
        self.write("execute: function() {");
        self.increase_indent();
        for stmt in file.stmts {
            match &stmt.kind {
                StmtKind::Import(_)
                | StmtKind::ImportEquals(_)
                | StmtKind::Export(_)
                | StmtKind::Function(_) => continue,
                _ => {
                    self.write_line();
                    self.emit_stmt(stmt);
                }
            }
        }
        self.flush_temp_declarations();
        self.decrease_indent();
        self.write_line();
        self.write("}");
        self.decrease_indent();
        self.write_line();
        self.write("}");
        self.in_module_root = false;
        self.export_fn = None;

        self.decrease_indent();
        self.write_line();
        self.write("});");
    }

    /// `function exportStar_1(m) { ... }` — bulk re-export for
    /// `export * from` under System.
    fn emit_system_export_star_fn(&mut self, export_fn: &str) -> String {
        let name = self
            .names
            .make_unique_name("exportStar", self.resolver, self.file);
        self.write_line();
        self.write("function ");
        self.write(&name);
        self.write("(m) {");
        self.increase_indent();
        self.write_line();
        self.write("var exports = {};");
        self.write_line();
        self.write("for (var n in m) {");
        self.increase_indent();
        self.write_line();
        self.write("if (n !== \"default\") exports[n] = m[n];");
        self.decrease_indent();
        self.write_line();
        self.write("}");
        self.write_line();
        self.write(export_fn);
        self.write("(exports);");
        self.decrease_indent();
        self.write_line();
        self.write("}");
        name
    }

    fn emit_system_setters(&mut self, deps: &[(String, String)], star_fn: Option<&str>) {
        if deps.is_empty() {
            return;
        }
        self.increase_indent();
        let imports: Vec<&'a Stmt<'a>> = self
            .external
            .as_ref()
            .map(|i| i.external_imports.clone())
            .unwrap_or_default();
        for (i, stmt) in imports.iter().enumerate() {
            if i > 0 {
                self.write(",");
            }
            let param = deps[i].1.clone();
            let setter_param = format!("{}_1", param);
            self.write_line();
            self.write("function (");
            self.write(&setter_param);
            self.write(") {");
            self.increase_indent();
            match &stmt.kind {
                StmtKind::Import(decl) => {
                    self.emit_system_import_setter_body(decl, &setter_param);
                }
                StmtKind::ImportEquals(decl) => {
                    let name = self.text_of(decl.name).to_string();
                    self.write_line();
                    self.write(&name);
                    self.write(" = ");
                    self.write(&setter_param);
                    self.write(";");
                }
                StmtKind::Export(decl) => {
                    self.emit_system_reexport_setter_body(decl, &setter_param, star_fn);
                }
                _ => {}
            }
            self.decrease_indent();
            self.write_line();
            self.write("}");
        }
        self.decrease_indent();
    }

    fn emit_system_import_setter_body(&mut self, decl: &'a ImportDecl<'a>, param: &str) {
        if let Some(default_binding) = decl.default_binding {
            let name = self.text_of(default_binding).to_string();
            self.write_line();
            self.write(&name);
            self.write(" = ");
            self.write(param);
            self.write(".default;");
        }
        match &decl.bindings {
            Some(NamedBindings::Namespace(sym)) => {
                let name = self.text_of(*sym).to_string();
                self.write_line();
                self.write(&name);
                self.write(" = ");
                self.write(param);
                self.write(";");
            }
            Some(NamedBindings::Named(specifiers)) => {
                for spec in *specifiers {
                    let local = self.text_of(spec.name).to_string();
                    let source = self
                        .text_of(spec.property.unwrap_or(spec.name))
                        .to_string();
                    self.write_line();
                    self.write(&local);
                    self.write(" = ");
                    self.write(param);
                    self.write(".");
                    self.write(&source);
                    self.write(";");
                }
            }
            None => {}
        }
    }

    fn emit_system_reexport_setter_body(
        &mut self,
        decl: &'a ExportDecl<'a>,
        param: &str,
        star_fn: Option<&str>,
    ) {
        match decl.specifiers {
            Some(specifiers) => {
                let export_fn = self.export_fn.clone().unwrap();
                for spec in specifiers {
                    let exported = self.text_of(spec.name).to_string();
                    let source = self
                        .text_of(spec.property.unwrap_or(spec.name))
                        .to_string();
                    self.write_line();
                    self.write(&export_fn);
                    self.write("(\"");
                    self.write(&exported);
                    self.write("\", ");
                    self.write(param);
                    self.write(".");
                    self.write(&source);
                    self.write(");");
                }
            }
            None => {
                if let Some(star_fn) = star_fn {
                    self.write_line();
                    self.write(star_fn);
                    self.write("(");
                    self.write(param);
                    self.write(");");
                }
            }
        }
    }

    /// Names hoisted into the System registrar prologue: import binding
    /// locals and top-level `var`/class/enum containers, in source order.
    fn collect_hoisted_names(&mut self, file: &'a SourceFile<'a>) -> Vec<String> {
        let mut names = Vec::new();
        let mut push = |name: String, names: &mut Vec<String>| {
            if !names.contains(&name) {
                names.push(name);
            }
        };
        for stmt in file.stmts {
            match &stmt.kind {
                StmtKind::Var(list) => {
                    for decl in list.decls {
                        if let Binding::Ident(sym) = &decl.name {
                            push(self.text_of(*sym).to_string(), &mut names);
                        }
                    }
                }
                StmtKind::Class(class) => {
                    if let Some(sym) = class.name {
                        push(self.text_of(sym).to_string(), &mut names);
                    }
                }
                StmtKind::Enum(decl) => {
                    push(self.text_of(decl.name).to_string(), &mut names);
                }
                StmtKind::Import(decl) => {
                    if let Some(default_binding) = decl.default_binding {
                        push(self.text_of(default_binding).to_string(), &mut names);
                    }
                    match &decl.bindings {
                        Some(NamedBindings::Namespace(sym)) => {
                            push(self.text_of(*sym).to_string(), &mut names);
                        }
                        Some(NamedBindings::Named(specifiers)) => {
                            for spec in *specifiers {
                                push(self.text_of(spec.name).to_string(), &mut names);
                            }
                        }
                        None => {}
                    }
                }
                StmtKind::ImportEquals(decl) => {
                    let referenced = self
                        .external
                        .as_ref()
                        .map(|i| i.external_imports.iter().any(|s| s.id == stmt.id))
                        .unwrap_or(false);
                    if referenced {
                        push(self.text_of(decl.name).to_string(), &mut names);
                    }
                }
                _ => {}
            }
        }
        names
    }

    // ─── ES6 verbatim ───────────────────────────────────────────────────

    pub(crate) fn emit_es6_module(&mut self, file: &'a SourceFile<'a>) {
        self.collect_external_module_info(file);
        self.in_module_root = true;
        self.emit_lines(file.stmts);
        self.flush_temp_declarations();
        self.in_module_root = false;
    }

    // ─── Per-statement dispatch ─────────────────────────────────────────

    pub(crate) fn emit_module_statement(&mut self, node: &'a Stmt<'a>) {
        match &node.kind {
            StmtKind::Import(decl) => self.emit_import_declaration(node, decl),
            StmtKind::ImportEquals(decl) => {
                let referenced = self
                    .external
                    .as_ref()
                    .map(|i| i.external_imports.iter().any(|s| s.id == node.id))
                    .unwrap_or(false);
                if !referenced {
                    return;
                }
                if self.options.module == ModuleKind::CommonJs {
                    let name = self.text_of(decl.name).to_string();
                    self.write("var ");
                    self.write(&name);
                    self.write(" = require(\"");
                    self.write(&decl.module);
                    self.write("\");");
                }
                // AMD and System receive the module through a parameter
                // or setter; nothing emits here.
            }
            StmtKind::Export(decl) => self.emit_export_declaration(node, decl),
            StmtKind::ExportAssignment(_) => {
                // Emitted by the envelope tail (`module.exports = ` /
                // `return `).
            }
            StmtKind::ExportDefault(expr) => match self.options.module {
                ModuleKind::CommonJs | ModuleKind::Amd => {
                    self.write("exports.default = ");
                    self.emit_expr(expr);
                    self.write(";");
                }
                ModuleKind::System => {
                    let export_fn = self.export_fn.clone().unwrap_or_default();
                    self.write(&export_fn);
                    self.write("(\"default\", ");
                    self.emit_expr(expr);
                    self.write(");");
                }
                ModuleKind::None => {
                    self.write("export default ");
                    self.emit_expr(expr);
                    self.write(";");
                }
            },
            _ => unreachable!("not a module statement"),
        }
    }

    fn emit_import_declaration(&mut self, node: &'a Stmt<'a>, decl: &'a ImportDecl<'a>) {
        match self.options.module {
            ModuleKind::CommonJs => {
                let has_bindings = decl.default_binding.is_some() || decl.bindings.is_some();
                if has_bindings {
                    let alias = self
                        .names
                        .node_name(node.id)
                        .expect("alias generated in collect pass")
                        .to_string();
                    self.write("var ");
                    self.write(&alias);
                    self.write(" = require(\"");
                    self.write(&decl.module);
                    self.write("\");");
                } else {
                    self.write("require(\"");
                    self.write(&decl.module);
                    self.write("\");");
                }
            }
            ModuleKind::Amd | ModuleKind::System => {
                // Dependencies arrive as callback parameters / setters.
            }
            ModuleKind::None => {
                if !self.options.is_downlevel() {
                    self.emit_es6_import_verbatim(decl);
                }
            }
        }
    }

    fn emit_es6_import_verbatim(&mut self, decl: &'a ImportDecl<'a>) {
        self.write("import ");
        let mut wrote = false;
        if let Some(default_binding) = decl.default_binding {
            let name = self.text_of(default_binding).to_string();
            self.write(&name);
            wrote = true;
        }
        match &decl.bindings {
            Some(NamedBindings::Namespace(sym)) => {
                if wrote {
                    self.write(", ");
                }
                let name = self.text_of(*sym).to_string();
                self.write("* as ");
                self.write(&name);
                wrote = true;
            }
            Some(NamedBindings::Named(specifiers)) => {
                if wrote {
                    self.write(", ");
                }
                self.write("{ ");
                for (i, spec) in specifiers.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    if let Some(property) = spec.property {
                        let source = self.text_of(property).to_string();
                        self.write(&source);
                        self.write(" as ");
                    }
                    let local = self.text_of(spec.name).to_string();
                    self.write(&local);
                }
                self.write(" }");
                wrote = true;
            }
            None => {}
        }
        if wrote {
            self.write(" from ");
        }
        self.write("\"");
        self.write(&decl.module);
        self.write("\";");
    }

    fn emit_export_declaration(&mut self, node: &'a Stmt<'a>, decl: &'a ExportDecl<'a>) {
        match self.options.module {
            ModuleKind::CommonJs => match (&decl.module, decl.specifiers) {
                (Some(module), None) => {
                    self.write("__export(require(\"");
                    self.write(module);
                    self.write("\"));");
                }
                (Some(module), Some(specifiers)) => {
                    let alias = self
                        .names
                        .node_name(node.id)
                        .expect("alias generated in collect pass")
                        .to_string();
                    self.write("var ");
                    self.write(&alias);
                    self.write(" = require(\"");
                    self.write(module);
                    self.write("\");");
                    self.emit_reexport_assignments(specifiers, &alias);
                }
                (None, _) => {
                    // Local re-exports emit at the declaration sites.
                }
            },
            ModuleKind::Amd => match (&decl.module, decl.specifiers) {
                (Some(_), None) => {
                    let alias = self
                        .names
                        .node_name(node.id)
                        .expect("alias generated in collect pass")
                        .to_string();
                    self.write("__export(");
                    self.write(&alias);
                    self.write(");");
                }
                (Some(_), Some(specifiers)) => {
                    let alias = self
                        .names
                        .node_name(node.id)
                        .expect("alias generated in collect pass")
                        .to_string();
                    self.emit_reexport_assignments(specifiers, &alias);
                }
                (None, _) => {}
            },
            ModuleKind::System => {
                // Handled in the setters.
            }
            ModuleKind::None => {
                if self.options.is_downlevel() {
                    return;
                }
                self.write("export ");
                match decl.specifiers {
                    None => self.write("*"),
                    Some(specifiers) => {
                        self.write("{ ");
                        for (i, spec) in specifiers.iter().enumerate() {
                            if i > 0 {
                                self.write(", ");
                            }
                            if let Some(property) = spec.property {
                                let source = self.text_of(property).to_string();
                                self.write(&source);
                                self.write(" as ");
                            }
                            let name = self.text_of(spec.name).to_string();
                            self.write(&name);
                        }
                        self.write(" }");
                    }
                }
                if let Some(module) = &decl.module {
                    self.write(" from \"");
                    self.write(module);
                    self.write("\"");
                }
                self.write(";");
            }
        }
    }

    fn emit_reexport_assignments(
        &mut self,
        specifiers: &'a [downlevel_syntax::ImportSpecifier],
        alias: &str,
    ) {
        for spec in specifiers {
            if !self.resolver.is_value_alias_declaration(spec.id) {
                continue;
            }
            let exported = self.text_of(spec.name).to_string();
            let source = self.text_of(spec.property.unwrap_or(spec.name)).to_string();
            self.write_line();
            self.write("exports.");
            self.write(&exported);
            self.write(" = ");
            self.write(alias);
            self.write(".");
            self.write(&source);
            self.write(";");
        }
    }

    /// Trailing alias assignments for an exported declaration: the
    /// `export` modifier itself, plus any `export { x }` specifiers that
    /// name it.
    pub(crate) fn emit_module_export_assignments(
        &mut self,
        node: &'a Stmt<'a>,
        name_sym: Option<Symbol>,
        emitted_name: &str,
    ) {
        if !self.in_module_root {
            return;
        }
        match self.options.module {
            ModuleKind::CommonJs | ModuleKind::Amd => {
                if node.is_exported() {
                    let exported = if node.flags.contains(NodeFlags::DEFAULT) {
                        "default".to_string()
                    } else {
                        name_sym
                            .map(|s| self.text_of(s).to_string())
                            .unwrap_or_else(|| emitted_name.to_string())
                    };
                    self.write_line();
                    self.write("exports.");
                    self.write(&exported);
                    self.write(" = ");
                    self.write(emitted_name);
                    self.write(";");
                }
                if let Some(sym) = name_sym {
                    let aliases: Vec<String> = self
                        .external
                        .as_ref()
                        .and_then(|i| i.export_specifiers.get(&sym))
                        .map(|names| {
                            names
                                .iter()
                                .map(|n| self.interner.resolve(*n).to_string())
                                .collect()
                        })
                        .unwrap_or_default();
                    for alias in aliases {
                        self.write_line();
                        self.write("exports.");
                        self.write(&alias);
                        self.write(" = ");
                        self.write(emitted_name);
                        self.write(";");
                    }
                }
            }
            ModuleKind::System => {
                let export_fn = match &self.export_fn {
                    Some(name) => name.clone(),
                    None => return,
                };
                if node.is_exported() {
                    let exported = if node.flags.contains(NodeFlags::DEFAULT) {
                        "default".to_string()
                    } else {
                        name_sym
                            .map(|s| self.text_of(s).to_string())
                            .unwrap_or_else(|| emitted_name.to_string())
                    };
                    self.write_line();
                    self.write(&export_fn);
                    self.write("(\"");
                    self.write(&exported);
                    self.write("\", ");
                    self.write(emitted_name);
                    self.write(");");
                }
            }
            ModuleKind::None => {}
        }
    }
}

/// Top-level bindings whose assignments wrap in `exports_N(...)` under
/// System: exported `var`/class/enum names.
fn collect_system_exported_names(file: &SourceFile<'_>) -> HashSet<Symbol> {
    let mut names = HashSet::new();
    for stmt in file.stmts {
        if !stmt.flags.contains(NodeFlags::EXPORT) {
            continue;
        }
        match &stmt.kind {
            StmtKind::Var(list) => {
                for decl in list.decls {
                    if let Binding::Ident(sym) = &decl.name {
                        names.insert(*sym);
                    }
                }
            }
            StmtKind::Class(class) => {
                if let Some(sym) = class.name {
                    names.insert(sym);
                }
            }
            StmtKind::Enum(decl) => {
                names.insert(decl.name);
            }
            _ => {}
        }
    }
    names
}
