//! Function-shaped emission: declarations, expressions, arrows, and the
//! parameter lowerings they share.
//!
//! Below ES6 an arrow becomes a function expression (its `this` rewrites
//! are driven by resolver check flags, not syntax), default parameters
//! expand to `=== void 0` preludes, rest parameters to an `arguments` copy
//! loop, and destructuring parameters to a temp parameter plus a `var`
//! prelude.

use downlevel_base::Symbol;
use downlevel_syntax::{
    Binding, Expr, ExprKind, Func, FuncBody, NodeFlags, NodeId, ParamDecl, Stmt, StmtKind,
};

use crate::diagnostic::codes;
use crate::emitter::context::SavedEnv;
use crate::emitter::Emitter;
use crate::names::TempHint;
use crate::resolver::NodeCheckFlags;

/// A destructuring parameter and the temp that stands in for it.
pub(crate) struct PatternParam<'a> {
    pub param: &'a ParamDecl<'a>,
    pub temp: String,
}

impl<'a> Emitter<'a> {
    pub(crate) fn emit_function_declaration(&mut self, node: &'a Stmt<'a>, func: &'a Func<'a>) {
        if node.flags.contains(NodeFlags::AMBIENT) {
            return;
        }
        if func.body.is_none() {
            // Overload signature: emits nothing. A bodyless declaration
            // outside an ambient context is a recoverable semantic gap.
            if !node.span.is_synthesized() {
                self.report(node.span, codes::MISSING_BODY, "function implementation is missing");
            }
            return;
        }
        let name = match func.name {
            Some(sym) => self.text_of(sym).to_string(),
            None => self.generated_name_for_node(node.id, "default"),
        };
        self.push_scope_name(&name);
        if node.is_exported()
            && self.in_module_root
            && !self.options.is_downlevel()
            && self.options.module == crate::options::ModuleKind::None
        {
            self.write("export ");
            if node.flags.contains(NodeFlags::DEFAULT) {
                self.write("default ");
            }
        }
        self.write("function ");
        self.write(&name);
        self.emit_signature_and_body(func, node.id);
        self.pop_scope_name();
        self.emit_export_assignments_for_declaration(node, func.name, &name);
    }

    pub(crate) fn emit_function_expression(&mut self, node: &'a Expr<'a>, func: &'a Func<'a>) {
        let name = func.name.map(|sym| self.text_of(sym).to_string());
        match &name {
            Some(name) => {
                let name = name.clone();
                self.push_scope_name(&name);
                self.write("function ");
                self.write(&name);
            }
            None => {
                self.push_scope_name("");
                self.write("function ");
            }
        }
        self.emit_signature_and_body(func, node.id);
        self.pop_scope_name();
    }

    pub(crate) fn emit_arrow_function(&mut self, node: &'a Expr<'a>, func: &'a Func<'a>) {
        if self.options.is_downlevel() {
            self.push_scope_name("");
            self.write("function ");
            self.emit_signature_and_body(func, node.id);
            self.pop_scope_name();
            return;
        }
        self.write("(");
        let saved = self.start_lexical_environment();
        let pattern_params = self.emit_signature_parameters(func);
        self.write(") => ");
        match &func.body {
            Some(FuncBody::Expr(expr)) => {
                debug_assert!(pattern_params.is_empty());
                // An object literal body would parse as a block.
                if matches!(expr.kind, ExprKind::Object(_)) {
                    self.write("(");
                    self.emit_expr(expr);
                    self.write(")");
                } else {
                    self.emit_operand_with_min_precedence(expr, 3);
                }
            }
            Some(FuncBody::Block(block)) => self.emit_stmt(block),
            None => unreachable!("arrow function without a body"),
        }
        self.end_lexical_environment(saved);
    }

    /// Writes `(params) { body }` for a function whose name (or absence of
    /// one) the caller has already emitted.
    pub(crate) fn emit_signature_and_body(&mut self, func: &'a Func<'a>, owner: NodeId) {
        let saved = self.start_lexical_environment();
        self.write("(");
        let pattern_params = self.emit_signature_parameters(func);
        self.write(")");
        self.emit_function_body(func, owner, &pattern_params, saved);
    }

    /// Emits the parameter list, lowering as needed. Returns the pattern
    /// parameters that need a destructuring prelude in the body.
    pub(crate) fn emit_signature_parameters(&mut self, func: &'a Func<'a>) -> Vec<PatternParam<'a>> {
        let downlevel = self.options.is_downlevel();
        let mut pattern_params = Vec::new();
        let mut wrote = false;
        for param in func.params {
            if param.dotdotdot && downlevel {
                // Rest parameters materialize from `arguments` in the body.
                continue;
            }
            if wrote {
                self.write(", ");
            }
            self.record_start(param.span);
            if param.dotdotdot {
                self.write("...");
            }
            match &param.name {
                Binding::Ident(sym) => {
                    let text = self.text_of(*sym);
                    self.write(text);
                }
                Binding::Pattern(pattern) => {
                    if downlevel {
                        let temp = self.new_temp_parameter();
                        self.write(&temp);
                        pattern_params.push(PatternParam { param, temp });
                    } else {
                        self.emit_binding_pattern_verbatim(pattern);
                    }
                }
            }
            if let Some(init) = param.init {
                if !downlevel {
                    self.write(" = ");
                    self.emit_operand_with_min_precedence(init, 3);
                }
            }
            self.record_end(param.span);
            wrote = true;
        }
        pattern_params
    }

    /// Body emission shared by functions, converted arrows, and methods.
    /// Handles the lexical-environment hand-back: preludes, statements,
    /// temp flush, restore.
    pub(crate) fn emit_function_body(
        &mut self,
        func: &'a Func<'a>,
        owner: NodeId,
        pattern_params: &[PatternParam<'a>],
        saved: SavedEnv,
    ) {
        let body = func.body.as_ref().expect("body checked by caller");
        let saved_depth = std::mem::replace(&mut self.nested_block_depth, 0);
        let saved_root = std::mem::replace(&mut self.in_module_root, false);
        match body {
            FuncBody::Expr(expr) => {
                let needs_preludes = self.body_needs_preludes(func, owner, pattern_params);
                if !needs_preludes {
                    self.write(" { return ");
                    self.emit_operand_with_min_precedence(expr, 3);
                    self.write("; }");
                } else {
                    self.write(" {");
                    self.increase_indent();
                    self.emit_function_preludes(func, owner, pattern_params);
                    self.write_line();
                    self.write("return ");
                    self.emit_operand_with_min_precedence(expr, 3);
                    self.write(";");
                    self.flush_temp_declarations();
                    self.decrease_indent();
                    self.write_line();
                    self.write("}");
                }
            }
            FuncBody::Block(block) => {
                let StmtKind::Block(stmts) = &block.kind else {
                    unreachable!("function body must be a block statement");
                };
                self.write(" {");
                self.increase_indent();
                if !block.span.is_synthesized() {
                    self.emit_detached_comments(first_stmt_pos(stmts, block.span.pos + 1));
                }
                self.emit_function_preludes(func, owner, pattern_params);
                self.emit_lines(stmts);
                self.flush_temp_declarations();
                self.decrease_indent();
                self.write_line();
                self.write("}");
            }
        }
        self.nested_block_depth = saved_depth;
        self.in_module_root = saved_root;
        self.end_lexical_environment(saved);
    }

    fn body_needs_preludes(
        &self,
        func: &'a Func<'a>,
        owner: NodeId,
        pattern_params: &[PatternParam<'a>],
    ) -> bool {
        if !pattern_params.is_empty() {
            return true;
        }
        if self
            .resolver
            .get_node_check_flags(owner)
            .contains(NodeCheckFlags::CAPTURE_THIS)
        {
            return true;
        }
        self.options.is_downlevel()
            && func
                .params
                .iter()
                .any(|p| p.dotdotdot || p.init.is_some())
    }

    /// The prelude stack at a body's start, in fixed order: captured
    /// `this`, default values, rest materialization, pattern expansion.
    pub(crate) fn emit_function_preludes(
        &mut self,
        func: &'a Func<'a>,
        owner: NodeId,
        pattern_params: &[PatternParam<'a>],
    ) {
        if self
            .resolver
            .get_node_check_flags(owner)
            .contains(NodeCheckFlags::CAPTURE_THIS)
        {
            self.write_line();
            self.write("var _this = this;");
        }
        if !self.options.is_downlevel() {
            return;
        }
        for param in func.params {
            let (Binding::Ident(sym), Some(init)) = (&param.name, param.init) else {
                continue;
            };
            let text = self.text_of(*sym).to_string();
            self.write_line();
            self.record_start(param.span);
            self.write("if (");
            self.write(&text);
            self.write(" === void 0) { ");
            self.write(&text);
            self.write(" = ");
            self.emit_operand_with_min_precedence(init, 3);
            self.write("; }");
            self.record_end(param.span);
        }
        for entry in pattern_params {
            let Binding::Pattern(pattern) = &entry.param.name else {
                continue;
            };
            self.write_line();
            self.write("var ");
            self.emit_destructuring_param(pattern, &entry.temp);
            self.write(";");
        }
        if let Some((index, param)) = func
            .params
            .iter()
            .enumerate()
            .find(|(_, p)| p.dotdotdot)
        {
            self.emit_rest_parameter(param, index);
        }
    }

    /// `var rest = []; for (var _i = n; _i < arguments.length; _i++) ...`
    fn emit_rest_parameter(&mut self, param: &'a ParamDecl<'a>, index: usize) {
        let Binding::Ident(sym) = &param.name else {
            return;
        };
        let name = self.text_of(*sym).to_string();
        let counter = self
            .names
            .make_temp_variable(TempHint::LoopCounter, self.resolver, self.file);
        self.write_line();
        self.record_start(param.span);
        self.write("var ");
        self.write(&name);
        self.write(" = [];");
        self.record_end(param.span);
        self.write_line();
        self.write("for (var ");
        self.write(&counter);
        self.write(&format!(" = {}; ", index));
        self.write(&counter);
        self.write(" < arguments.length; ");
        self.write(&counter);
        self.write("++) {");
        self.increase_indent();
        self.write_line();
        self.write(&name);
        self.write("[");
        self.write(&counter);
        self.write(&format!(" - {}] = arguments[", index));
        self.write(&counter);
        self.write("];");
        self.decrease_indent();
        self.write_line();
        self.write("}");
    }

    /// Exported declarations in framed modules get a trailing alias
    /// assignment; namespaces attach exported members to their local.
    pub(crate) fn emit_export_assignments_for_declaration(
        &mut self,
        node: &'a Stmt<'a>,
        name_sym: Option<Symbol>,
        emitted_name: &str,
    ) {
        if node.is_exported() && !self.module_stack.is_empty() {
            let local = self.module_stack.last().unwrap().local.clone();
            let member = name_sym
                .map(|s| self.text_of(s).to_string())
                .unwrap_or_else(|| emitted_name.to_string());
            self.write_line();
            self.write(&local);
            self.write(".");
            self.write(&member);
            self.write(" = ");
            self.write(emitted_name);
            self.write(";");
            return;
        }
        self.emit_module_export_assignments(node, name_sym, emitted_name);
    }
}

/// Position of the first statement, or a fallback just inside the braces.
fn first_stmt_pos(stmts: &[&Stmt<'_>], fallback: usize) -> usize {
    stmts
        .first()
        .filter(|s| !s.span.is_synthesized())
        .map(|s| s.span.pos)
        .unwrap_or(fallback)
}
