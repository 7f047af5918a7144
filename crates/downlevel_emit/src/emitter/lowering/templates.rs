//! Template literal lowering.
//!
//! Below ES6 a template becomes string concatenation. Interpolated
//! expressions are parenthesized unless they bind strictly tighter than
//! binary `+` — an embedded `n + 1` keeps its parens so string conversion
//! happens after the arithmetic. A tagged template materializes the
//! cooked/raw pair into a captured temporary:
//! `(_a = [cooked], _a.raw = [raw], tag(_a, e1, e2))`.

use downlevel_syntax::{Expr, ExprKind, TemplatePart, TemplateSpan};

use super::super::escape_string;
use crate::emitter::Emitter;
use crate::names::TempHint;

impl<'a> Emitter<'a> {
    pub(crate) fn emit_template(
        &mut self,
        _node: &'a Expr<'a>,
        head: &'a TemplatePart,
        spans: &'a [TemplateSpan<'a>],
    ) {
        if !self.options.is_downlevel() {
            self.emit_template_verbatim(head, spans);
            return;
        }
        // An empty head is skipped when the first literal piece can carry
        // the string conversion; with no literal text anywhere, the empty
        // head forces it.
        let emit_head = !head.cooked.is_empty()
            || spans
                .first()
                .map(|s| s.literal.cooked.is_empty())
                .unwrap_or(true);
        let mut wrote = false;
        if emit_head {
            let quoted = escape_string(&head.cooked);
            self.write(&quoted);
            wrote = true;
        }
        for span in spans {
            if wrote {
                self.write(" + ");
            }
            self.emit_interpolation(span.expr);
            wrote = true;
            if !span.literal.cooked.is_empty() {
                self.write(" + ");
                let quoted = escape_string(&span.literal.cooked);
                self.write(&quoted);
            }
        }
    }

    /// Wraps unless the expression binds strictly tighter than binary `+`.
    fn emit_interpolation(&mut self, expr: &'a Expr<'a>) {
        let needs_parens = match &expr.kind {
            ExprKind::Paren(_) => false,
            ExprKind::Binary { op, .. } => op.precedence() <= downlevel_syntax::BinOp::Add.precedence(),
            ExprKind::Conditional { .. } => true,
            _ => false,
        };
        if needs_parens {
            self.write("(");
            self.emit_expr(expr);
            self.write(")");
        } else {
            self.emit_expr(expr);
        }
    }

    pub(crate) fn emit_tagged_template(
        &mut self,
        tag: &'a Expr<'a>,
        head: &'a TemplatePart,
        spans: &'a [TemplateSpan<'a>],
    ) {
        if !self.options.is_downlevel() {
            self.emit_expr(tag);
            self.emit_template_verbatim(head, spans);
            return;
        }
        let temp = self.new_temp_variable(TempHint::Auto);
        self.write("(");
        self.write(&temp);
        self.write(" = [");
        self.emit_cooked_strings(head, spans);
        self.write("], ");
        self.write(&temp);
        self.write(".raw = [");
        self.emit_raw_strings(head, spans);
        self.write("], ");
        self.emit_expr(tag);
        self.write("(");
        self.write(&temp);
        for span in spans {
            self.write(", ");
            self.emit_operand_with_min_precedence(span.expr, 3);
        }
        self.write("))");
    }

    fn emit_cooked_strings(&mut self, head: &'a TemplatePart, spans: &'a [TemplateSpan<'a>]) {
        let quoted = escape_string(&head.cooked);
        self.write(&quoted);
        for span in spans {
            self.write(", ");
            let quoted = escape_string(&span.literal.cooked);
            self.write(&quoted);
        }
    }

    fn emit_raw_strings(&mut self, head: &'a TemplatePart, spans: &'a [TemplateSpan<'a>]) {
        let quoted = escape_string(&head.raw);
        self.write(&quoted);
        for span in spans {
            self.write(", ");
            let quoted = escape_string(&span.literal.raw);
            self.write(&quoted);
        }
    }

    fn emit_template_verbatim(&mut self, head: &'a TemplatePart, spans: &'a [TemplateSpan<'a>]) {
        self.write("`");
        self.writer.write_literal(&head.raw);
        for span in spans {
            self.write("${");
            self.emit_expr(span.expr);
            self.write("}");
            self.writer.write_literal(&span.literal.raw);
        }
        self.write("`");
    }
}
