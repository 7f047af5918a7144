//! Statement emission: control flow, blocks, and variable statements.
//!
//! Statements own the line structure of the output: each list entry starts
//! on its own line, embedded single statements indent one level, and block
//! braces are emitted as tokens so the source map pins them to the original
//! punctuation.
//!
//! Variable statements are where module framing intrudes on otherwise
//! straight-through emission: at the top level of a framed module an
//! exported `var` becomes a property assignment (CommonJS/AMD), a wrapped
//! `exports_N(...)` call (System), or keeps an `export` keyword (ES6).

use downlevel_syntax::{
    Binding, CaseClause, CatchClause, Expr, ExprKind, ForInit, NodeFlags, Stmt, StmtKind, VarDecl,
    VarDeclList,
};

use super::expr::starts_with_object_or_function;
use crate::emitter::Emitter;
use crate::options::ModuleKind;

impl<'a> Emitter<'a> {
    /// The single statement entry point: comment routing, source-map
    /// bracketing, then kind dispatch.
    pub(crate) fn emit_stmt(&mut self, node: &'a Stmt<'a>) {
        self.emit_leading_comments(node.span);
        self.record_start(node.span);
        match &node.kind {
            StmtKind::Block(stmts) => self.emit_block_stmt(node, stmts),
            StmtKind::Var(list) => self.emit_var_statement(node, list),
            StmtKind::Expr(expr) => self.emit_expression_statement(expr),
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => self.emit_if(cond, then_branch, *else_branch),
            StmtKind::Do { body, cond } => {
                self.write("do");
                let block = matches!(body.kind, StmtKind::Block(_));
                self.emit_embedded(body);
                if block {
                    self.write(" while (");
                } else {
                    self.write_line();
                    self.write("while (");
                }
                self.emit_expr(cond);
                self.write(");");
            }
            StmtKind::While { cond, body } => {
                self.write("while (");
                self.emit_expr(cond);
                self.write(")");
                self.emit_embedded(body);
            }
            StmtKind::For {
                init,
                cond,
                incr,
                body,
            } => {
                self.write("for (");
                match init {
                    Some(ForInit::Var(list)) => self.emit_var_decl_list(list),
                    Some(ForInit::Expr(expr)) => self.emit_expr(expr),
                    None => {}
                }
                self.write(";");
                if let Some(cond) = cond {
                    self.write(" ");
                    self.emit_expr(cond);
                }
                self.write(";");
                if let Some(incr) = incr {
                    self.write(" ");
                    self.emit_expr(incr);
                }
                self.write(")");
                self.emit_embedded(body);
            }
            StmtKind::ForIn { init, expr, body } => {
                self.write("for (");
                match init {
                    ForInit::Var(list) => self.emit_var_decl_list(list),
                    ForInit::Expr(expr) => self.emit_expr(expr),
                }
                self.write(" in ");
                self.emit_expr(expr);
                self.write(")");
                self.emit_embedded(body);
            }
            StmtKind::ForOf { init, expr, body } => {
                if self.options.is_downlevel() {
                    self.emit_downlevel_for_of(init, expr, body);
                } else {
                    self.write("for (");
                    match init {
                        ForInit::Var(list) => self.emit_var_decl_list(list),
                        ForInit::Expr(expr) => self.emit_expr(expr),
                    }
                    self.write(" of ");
                    self.emit_expr(expr);
                    self.write(")");
                    self.emit_embedded(body);
                }
            }
            StmtKind::Continue(label) => {
                self.write("continue");
                if let Some(label) = label {
                    let text = self.text_of(*label);
                    self.write(" ");
                    self.write(text);
                }
                self.write(";");
            }
            StmtKind::Break(label) => {
                self.write("break");
                if let Some(label) = label {
                    let text = self.text_of(*label);
                    self.write(" ");
                    self.write(text);
                }
                self.write(";");
            }
            StmtKind::Return(expr) => {
                match expr {
                    Some(expr) => {
                        self.write("return ");
                        self.emit_expr(expr);
                    }
                    None => self.write("return"),
                }
                self.write(";");
            }
            StmtKind::With { expr, body } => {
                self.write("with (");
                self.emit_expr(expr);
                self.write(")");
                self.emit_embedded(body);
            }
            StmtKind::Switch { expr, cases } => self.emit_switch(expr, cases),
            StmtKind::Labeled { label, body } => {
                let text = self.text_of(*label);
                self.write(text);
                self.write(": ");
                self.emit_stmt(body);
            }
            StmtKind::Throw(expr) => {
                self.write("throw ");
                self.emit_expr(expr);
                self.write(";");
            }
            StmtKind::Try {
                block,
                catch,
                finally,
            } => self.emit_try(block, catch, *finally),
            StmtKind::Debugger => self.write("debugger;"),
            StmtKind::Empty => self.write(";"),
            StmtKind::Function(func) => self.emit_function_declaration(node, func),
            StmtKind::Class(class) => self.emit_class_declaration(node, class),
            StmtKind::Enum(decl) => self.emit_enum_declaration(node, decl),
            StmtKind::Module(decl) => self.emit_module_declaration(node, decl),
            StmtKind::Import(_)
            | StmtKind::ImportEquals(_)
            | StmtKind::Export(_)
            | StmtKind::ExportAssignment(_)
            | StmtKind::ExportDefault(_) => self.emit_module_statement(node),
        }
        self.record_end(node.span);
        self.emit_trailing_comments(node.span);
    }

    /// One statement per line.
    pub(crate) fn emit_lines(&mut self, stmts: &'a [&'a Stmt<'a>]) {
        for stmt in stmts {
            self.write_line();
            self.emit_stmt(stmt);
        }
    }

    /// A dependent statement: a block stays on the same line, anything
    /// else indents one level on its own line.
    pub(crate) fn emit_embedded(&mut self, body: &'a Stmt<'a>) {
        if matches!(body.kind, StmtKind::Block(_)) {
            self.write(" ");
            self.emit_stmt(body);
        } else {
            self.increase_indent();
            self.write_line();
            self.nested_block_depth += 1;
            self.emit_stmt(body);
            self.nested_block_depth -= 1;
            self.decrease_indent();
        }
    }

    fn emit_block_stmt(&mut self, node: &'a Stmt<'a>, stmts: &'a [&'a Stmt<'a>]) {
        if stmts.is_empty() && node.span.is_synthesized() {
            self.write("{ }");
            return;
        }
        if node.span.is_synthesized() {
            self.write("{");
        } else {
            self.emit_token("{", node.span.pos);
        }
        self.increase_indent();
        let was_root = self.in_module_root;
        self.in_module_root = false;
        self.nested_block_depth += 1;
        self.emit_lines(stmts);
        self.nested_block_depth -= 1;
        self.in_module_root = was_root;
        self.decrease_indent();
        self.write_line();
        if node.span.is_synthesized() {
            self.write("}");
        } else {
            self.emit_token("}", node.span.end.saturating_sub(1));
        }
    }

    fn emit_if(
        &mut self,
        cond: &'a Expr<'a>,
        then_branch: &'a Stmt<'a>,
        else_branch: Option<&'a Stmt<'a>>,
    ) {
        self.write("if (");
        self.emit_expr(cond);
        self.write(")");
        self.emit_embedded(then_branch);
        if let Some(else_branch) = else_branch {
            if matches!(then_branch.kind, StmtKind::Block(_)) {
                self.write(" ");
            } else {
                self.write_line();
            }
            if let StmtKind::If { .. } = else_branch.kind {
                self.write("else ");
                self.emit_stmt(else_branch);
            } else {
                self.write("else");
                self.emit_embedded(else_branch);
            }
        }
    }

    fn emit_switch(&mut self, expr: &'a Expr<'a>, cases: &'a [CaseClause<'a>]) {
        self.write("switch (");
        self.emit_expr(expr);
        self.write(") {");
        self.increase_indent();
        self.nested_block_depth += 1;
        for case in cases {
            self.write_line();
            match case.test {
                Some(test) => {
                    self.write("case ");
                    self.emit_expr(test);
                    self.write(":");
                }
                None => self.write("default:"),
            }
            self.increase_indent();
            self.emit_lines(case.stmts);
            self.decrease_indent();
        }
        self.nested_block_depth -= 1;
        self.decrease_indent();
        self.write_line();
        self.write("}");
    }

    fn emit_try(
        &mut self,
        block: &'a Stmt<'a>,
        catch: &Option<CatchClause<'a>>,
        finally: Option<&'a Stmt<'a>>,
    ) {
        self.write("try ");
        self.emit_stmt(block);
        if let Some(catch) = catch {
            let name = self.text_of(catch.name);
            self.write(" catch (");
            self.write(name);
            self.write(") ");
            self.emit_stmt(catch.block);
        }
        if let Some(finally) = finally {
            self.write(" finally ");
            self.emit_stmt(finally);
        }
    }

    fn emit_expression_statement(&mut self, expr: &'a Expr<'a>) {
        if self.options.is_downlevel() {
            if let ExprKind::Binary {
                op: downlevel_syntax::BinOp::Assign,
                left,
                right,
            } = &expr.kind
            {
                if matches!(left.kind, ExprKind::Array(_) | ExprKind::Object(_)) {
                    self.emit_destructuring_assignment_statement(left, right);
                    self.write(";");
                    return;
                }
            }
        }
        if starts_with_object_or_function(expr) {
            self.write("(");
            self.emit_expr(expr);
            self.write(")");
        } else {
            self.emit_expr(expr);
        }
        self.write(";");
    }

    // ─── Variable statements ────────────────────────────────────────────

    fn emit_var_statement(&mut self, node: &'a Stmt<'a>, list: &'a VarDeclList<'a>) {
        let exported = node.is_exported();

        // System module root: names are hoisted into the registrar
        // prologue; the statement shrinks to its initializing assignments.
        if self.in_module_root && self.export_fn.is_some() {
            self.emit_hoisted_var_assignments(list, exported);
            return;
        }

        // CommonJS/AMD module root: an exported var is a property write on
        // `exports`, with no local declaration.
        if self.in_module_root
            && exported
            && matches!(self.options.module, ModuleKind::CommonJs | ModuleKind::Amd)
        {
            self.emit_exported_var_assignments(list, "exports");
            return;
        }

        // Namespace body: exported members live on the namespace local.
        if exported && !self.module_stack.is_empty() {
            let local = self.module_stack.last().unwrap().local.clone();
            self.emit_exported_var_assignments(list, &local);
            return;
        }

        // The ES6 envelope (no wrapper, target ES6) keeps the keyword.
        if exported
            && self.in_module_root
            && !self.options.is_downlevel()
            && self.options.module == ModuleKind::None
        {
            self.write("export ");
        }
        self.emit_var_decl_list(list);
        self.write(";");
    }

    /// `var`/`let`/`const` keyword plus comma-joined declarators; shared
    /// by statements and `for` heads.
    pub(crate) fn emit_var_decl_list(&mut self, list: &'a VarDeclList<'a>) {
        let keyword = if !self.options.is_downlevel() && list.flags.contains(NodeFlags::CONST) {
            "const "
        } else if !self.options.is_downlevel() && list.flags.contains(NodeFlags::LET) {
            "let "
        } else {
            "var "
        };
        self.write(keyword);
        for (i, decl) in list.decls.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.emit_var_decl(decl, list.flags);
        }
    }

    fn emit_var_decl(&mut self, decl: &'a VarDecl<'a>, list_flags: NodeFlags) {
        match &decl.name {
            Binding::Pattern(pattern) => {
                if self.options.is_downlevel() {
                    self.emit_destructuring_var_decl(pattern, decl.init);
                } else {
                    self.emit_binding_pattern_verbatim(pattern);
                    if let Some(init) = decl.init {
                        self.write(" = ");
                        self.emit_operand_with_min_precedence(init, 3);
                    }
                }
            }
            Binding::Ident(sym) => {
                let name = self.declared_name(decl, *sym, list_flags);
                self.record_start(decl.span);
                self.write(&name);
                self.record_end(decl.span);
                if let Some(init) = decl.init {
                    self.write(" = ");
                    self.emit_operand_with_min_precedence(init, 3);
                }
            }
        }
    }

    /// Resolves the emitted name of a declared binding, renaming a
    /// block-scoped declaration that collides with an enclosing value.
    pub(crate) fn declared_name(
        &mut self,
        decl: &'a VarDecl<'a>,
        sym: downlevel_base::Symbol,
        list_flags: NodeFlags,
    ) -> String {
        let text = self.text_of(sym).to_string();
        if list_flags.is_block_scoped() && self.nested_block_depth > 0 {
            if let Some(variable_id) = self.resolver.get_block_scoped_variable_id(decl.id, &text) {
                if let Some(existing) = self.names.rename_for(variable_id) {
                    return existing.to_string();
                }
                if self.resolver.resolves_to_some_value(&text) {
                    let renamed = self.names.make_unique_name(&text, self.resolver, self.file);
                    self.names.record_rename(variable_id, renamed.clone());
                    return renamed;
                }
            }
        }
        text
    }

    /// System registrar: `x = 1` or `exports_1("x", x = 1)`, names
    /// already hoisted.
    fn emit_hoisted_var_assignments(&mut self, list: &'a VarDeclList<'a>, exported: bool) {
        let export_fn = self.export_fn.clone().unwrap();
        let mut wrote = false;
        for decl in list.decls {
            let Binding::Ident(sym) = &decl.name else {
                continue;
            };
            let Some(init) = decl.init else {
                continue;
            };
            if wrote {
                self.write(", ");
            }
            let name = self.text_of(*sym).to_string();
            if exported {
                self.write(&export_fn);
                self.write("(\"");
                self.write(&name);
                self.write("\", ");
                self.write(&name);
                self.write(" = ");
                self.emit_operand_with_min_precedence(init, 3);
                self.write(")");
            } else {
                self.write(&name);
                self.write(" = ");
                self.emit_operand_with_min_precedence(init, 3);
            }
            wrote = true;
        }
        if wrote {
            self.write(";");
        }
    }

    /// `exports.x = 1;` / `M.x = 1;` — exported declarations write through
    /// their container and declare nothing locally.
    fn emit_exported_var_assignments(&mut self, list: &'a VarDeclList<'a>, container: &str) {
        let mut wrote = false;
        for decl in list.decls {
            let Binding::Ident(sym) = &decl.name else {
                continue;
            };
            let Some(init) = decl.init else {
                continue;
            };
            if wrote {
                self.write(", ");
            }
            let name = self.text_of(*sym).to_string();
            self.record_start(decl.span);
            self.write(container);
            self.write(".");
            self.write(&name);
            self.write(" = ");
            self.emit_operand_with_min_precedence(init, 3);
            self.record_end(decl.span);
            wrote = true;
        }
        if wrote {
            self.write(";");
        }
    }
}
