//! `for-of` lowering: the array-index loop.
//!
//! `for (let v of expr) body` becomes
//!
//! ```text
//! for (var _i = 0, _a = expr; _i < _a.length; _i++) {
//!     var v = _a[_i];
//!     body
//! }
//! ```
//!
//! When the iterable is already a plain identifier the `_a` capture is
//! elided and the identifier is indexed directly. The left-hand binding is
//! re-emitted inside the body, so destructuring patterns keep working.
//! Only array-likes (`.length` plus indexing) are supported at downlevel
//! targets.

use downlevel_syntax::{Binding, Expr, ExprKind, ForInit, Stmt, StmtKind};

use crate::emitter::Emitter;
use crate::names::TempHint;

impl<'a> Emitter<'a> {
    pub(crate) fn emit_downlevel_for_of(
        &mut self,
        init: &'a ForInit<'a>,
        expr: &'a Expr<'a>,
        body: &'a Stmt<'a>,
    ) {
        self.write("for (var ");
        let counter = self
            .names
            .make_temp_variable(TempHint::LoopCounter, self.resolver, self.file);
        self.write(&counter);
        self.write(" = 0");

        let array = match &expr.kind {
            ExprKind::Ident(sym) => self.text_of(*sym).to_string(),
            _ => {
                let temp = self
                    .names
                    .make_temp_variable(TempHint::Auto, self.resolver, self.file);
                self.write(", ");
                self.write(&temp);
                self.write(" = ");
                self.emit_operand_with_min_precedence(expr, 3);
                temp
            }
        };

        self.write("; ");
        self.write(&counter);
        self.write(" < ");
        self.write(&array);
        self.write(".length; ");
        self.write(&counter);
        self.write("++) {");
        self.increase_indent();
        self.nested_block_depth += 1;

        self.write_line();
        match init {
            ForInit::Var(list) => {
                let decl = list
                    .decls
                    .first()
                    .expect("for-of head declares exactly one binding");
                match &decl.name {
                    Binding::Ident(sym) => {
                        let name = self.declared_name(decl, *sym, list.flags);
                        self.write("var ");
                        self.write(&name);
                        self.write(" = ");
                        self.write(&array);
                        self.write("[");
                        self.write(&counter);
                        self.write("];");
                    }
                    Binding::Pattern(pattern) => {
                        self.write("var ");
                        self.emit_destructuring_for_of_binding(pattern, &array, &counter);
                        self.write(";");
                    }
                }
            }
            ForInit::Expr(target) => {
                // `for (v of xs)` assigning an existing binding.
                self.emit_expr(target);
                self.write(" = ");
                self.write(&array);
                self.write("[");
                self.write(&counter);
                self.write("];");
            }
        }

        match &body.kind {
            StmtKind::Block(stmts) => self.emit_lines(stmts),
            _ => {
                self.write_line();
                self.emit_stmt(body);
            }
        }

        self.nested_block_depth -= 1;
        self.decrease_indent();
        self.write_line();
        self.write("}");
    }
}
