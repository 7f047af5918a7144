//! Expression emission: the straight-through half of the node dispatch.
//!
//! Parentheses are re-derived from the precedence table rather than copied
//! from source, because lowering splices expressions into new contexts.
//! Lowered kinds (templates, arrows, class expressions, destructuring
//! assignments, spread) detour into the lowering engine; everything else
//! is written here.

use downlevel_base::Symbol;
use downlevel_syntax::{
    expression_precedence, skip_parens_and_assertions, Expr, ExprKind, NodeFlags, ObjectMember,
    ObjectMemberKind, PropName, UnaryOp,
};

use super::{format_constant, quote_string};
use crate::emitter::Emitter;
use crate::resolver::{NodeCheckFlags, Substitution};

/// Precedence a member-access target must reach to stand without parens.
const MEMBER_TARGET_PRECEDENCE: u8 = 17;

impl<'a> Emitter<'a> {
    /// The single expression entry point; brackets the node with
    /// source-map records and dispatches on kind.
    pub(crate) fn emit_expr(&mut self, node: &'a Expr<'a>) {
        self.record_start(node.span);
        match &node.kind {
            ExprKind::Ident(sym) => self.emit_ident_expr(node, *sym),
            ExprKind::This => self.emit_this(node),
            ExprKind::Super => self.emit_super_reference(),
            ExprKind::NullLit => self.write("null"),
            ExprKind::TrueLit => self.write("true"),
            ExprKind::FalseLit => self.write("false"),
            ExprKind::NumLit(text) => {
                let text = text.clone();
                self.write(&text);
            }
            ExprKind::StrLit {
                value,
                single_quote,
            } => {
                let quoted = quote_string(value, *single_quote);
                self.write(&quoted);
            }
            ExprKind::RegexLit(text) => {
                let text = text.clone();
                self.write(&text);
            }
            ExprKind::Template { head, spans } => self.emit_template(node, head, spans),
            ExprKind::TaggedTemplate { tag, head, spans } => {
                self.emit_tagged_template(tag, head, spans)
            }
            ExprKind::Array(elements) => self.emit_array(node, elements),
            ExprKind::Omitted => {}
            ExprKind::Object(members) => self.emit_object(node, members),
            ExprKind::PropAccess { target, name } => self.emit_prop_access(node, target, *name),
            ExprKind::ElemAccess { target, index } => self.emit_elem_access(node, target, index),
            ExprKind::Call { callee, args } => self.emit_call(callee, args),
            ExprKind::New { callee, args } => self.emit_new(callee, *args),
            ExprKind::Paren(inner) => self.emit_paren(inner),
            ExprKind::TypeAssertion(inner) => self.emit_expr(inner),
            ExprKind::Function(func) => self.emit_function_expression(node, func),
            ExprKind::Arrow(func) => self.emit_arrow_function(node, func),
            ExprKind::Class(class) => self.emit_class_expression(node, class),
            ExprKind::Unary { op, operand } => self.emit_unary(*op, operand),
            ExprKind::Postfix { op, operand } => {
                self.emit_operand_with_min_precedence(operand, 16);
                self.write(op.text());
            }
            ExprKind::Binary { op, left, right } => self.emit_binary(node, *op, left, right),
            ExprKind::Conditional {
                cond,
                when_true,
                when_false,
            } => self.emit_conditional(cond, when_true, when_false),
            ExprKind::Spread(inner) => {
                // Below ES6 spread is consumed by call/array lowering; a
                // spread reaching here is in an ES6-legal position.
                self.write("...");
                self.emit_operand_with_min_precedence(inner, 3);
            }
        }
        self.record_end(node.span);
    }

    fn emit_ident_expr(&mut self, node: &'a Expr<'a>, sym: Symbol) {
        let text = self.text_of(sym);
        if let Some(variable_id) = self.resolver.get_block_scoped_variable_id(node.id, text) {
            if let Some(renamed) = self.names.rename_for(variable_id) {
                let renamed = renamed.to_string();
                self.write(&renamed);
                return;
            }
        }
        if let Some(substitution) = self.resolver.get_expression_name_substitution(node.id, text) {
            match substitution {
                Substitution::Text(replacement) => self.write(&replacement),
                Substitution::ImportProperty { import, name } => {
                    let alias = self
                        .names
                        .node_name(import)
                        .expect("import alias queried before its name was generated")
                        .to_string();
                    self.write(&alias);
                    self.write(".");
                    self.write(&name);
                }
            }
            return;
        }
        self.write(text);
    }

    fn emit_this(&mut self, node: &'a Expr<'a>) {
        if self
            .resolver
            .get_node_check_flags(node.id)
            .contains(NodeCheckFlags::LEXICAL_THIS)
        {
            self.write("_this");
        } else {
            self.write("this");
        }
    }

    /// `super` outside a call position: the base reference itself.
    fn emit_super_reference(&mut self) {
        if !self.options.is_downlevel() {
            self.write("super");
            return;
        }
        let in_static = self.class_stack.last().map(|c| c.in_static).unwrap_or(false);
        if in_static {
            self.write("_super");
        } else {
            self.write("_super.prototype");
        }
    }

    fn emit_array(&mut self, node: &'a Expr<'a>, elements: &'a [&'a Expr<'a>]) {
        let has_spread = elements
            .iter()
            .any(|e| matches!(e.kind, ExprKind::Spread(_)));
        if has_spread && self.options.is_downlevel() {
            self.emit_list_with_spread(elements, true);
            return;
        }
        if elements.is_empty() {
            self.write("[]");
            return;
        }
        self.write("[");
        let multiline = self.list_is_multiline(node.flags, elements.iter().map(|e| e.span));
        self.emit_comma_list(elements, multiline);
        self.write("]");
    }

    fn emit_object(&mut self, node: &'a Expr<'a>, members: &'a [ObjectMember<'a>]) {
        if members.is_empty() {
            self.write("{}");
            return;
        }
        let has_computed = members.iter().any(|m| {
            matches!(
                m.kind,
                ObjectMemberKind::Prop {
                    name: PropName::Computed(_),
                    ..
                }
            )
        });
        if has_computed && self.options.is_downlevel() {
            self.emit_object_with_computed_names(members);
            return;
        }
        let multiline = self.list_is_multiline(node.flags, members.iter().map(|m| m.span));
        self.write("{");
        if multiline {
            self.increase_indent();
            for (i, member) in members.iter().enumerate() {
                if i > 0 {
                    self.write(",");
                }
                self.write_line();
                self.emit_object_member(member);
            }
            self.decrease_indent();
            self.write_line();
        } else {
            self.write(" ");
            for (i, member) in members.iter().enumerate() {
                if i > 0 {
                    self.write(", ");
                }
                self.emit_object_member(member);
            }
            self.write(" ");
        }
        self.write("}");
    }

    fn emit_object_member(&mut self, member: &'a ObjectMember<'a>) {
        match &member.kind {
            ObjectMemberKind::Prop { name, value } => {
                self.emit_prop_name(name);
                self.write(": ");
                self.emit_operand_with_min_precedence(value, 3);
            }
            ObjectMemberKind::Shorthand(sym) => {
                let text = self.text_of(*sym).to_string();
                self.write(&text);
                if self.options.is_downlevel() {
                    self.write(": ");
                    self.write(&text);
                }
            }
        }
    }

    /// ES5 object literal with computed names:
    /// `(_a = { x: 1 }, _a[k] = 2, _a)`.
    fn emit_object_with_computed_names(&mut self, members: &'a [ObjectMember<'a>]) {
        let temp = self.new_temp_variable(crate::names::TempHint::Auto);
        self.write("(");
        self.write(&temp);
        self.write(" = {");
        let mut wrote_plain = false;
        for member in members {
            let plain = match &member.kind {
                ObjectMemberKind::Prop {
                    name: PropName::Computed(_),
                    ..
                } => continue,
                other => other,
            };
            if wrote_plain {
                self.write(", ");
            } else {
                self.write(" ");
            }
            match plain {
                ObjectMemberKind::Prop { name, value } => {
                    self.emit_prop_name(name);
                    self.write(": ");
                    self.emit_operand_with_min_precedence(value, 3);
                }
                ObjectMemberKind::Shorthand(sym) => {
                    let text = self.text_of(*sym).to_string();
                    self.write(&text);
                    self.write(": ");
                    self.write(&text);
                }
            }
            wrote_plain = true;
        }
        if wrote_plain {
            self.write(" ");
        }
        self.write("}");
        for member in members {
            if let ObjectMemberKind::Prop {
                name: PropName::Computed(key),
                value,
            } = &member.kind
            {
                self.write(", ");
                self.write(&temp);
                self.write("[");
                self.emit_expr(key);
                self.write("] = ");
                self.emit_operand_with_min_precedence(value, 3);
            }
        }
        self.write(", ");
        self.write(&temp);
        self.write(")");
    }

    pub(crate) fn emit_prop_name(&mut self, name: &'a PropName<'a>) {
        match name {
            PropName::Ident(sym) => {
                let text = self.text_of(*sym).to_string();
                self.write(&text);
            }
            PropName::Str {
                value,
                single_quote,
            } => {
                let quoted = quote_string(value, *single_quote);
                self.write(&quoted);
            }
            PropName::Num(text) => {
                let text = text.clone();
                self.write(&text);
            }
            PropName::Computed(expr) => {
                self.write("[");
                self.emit_expr(expr);
                self.write("]");
            }
        }
    }

    fn emit_prop_access(&mut self, node: &'a Expr<'a>, target: &'a Expr<'a>, name: Symbol) {
        if self.try_emit_constant_value(node, Some(name)) {
            return;
        }
        self.emit_member_target(target);
        self.write(".");
        let text = self.text_of(name).to_string();
        self.write(&text);
    }

    fn emit_elem_access(&mut self, node: &'a Expr<'a>, target: &'a Expr<'a>, index: &'a Expr<'a>) {
        if self.try_emit_constant_value(node, None) {
            return;
        }
        self.emit_member_target(target);
        self.write("[");
        self.emit_expr(index);
        self.write("]");
    }

    /// Const-enum references fold to their values, annotated with the
    /// member name; `separateCompilation` forbids the cross-file fold.
    fn try_emit_constant_value(&mut self, node: &'a Expr<'a>, name: Option<Symbol>) -> bool {
        if self.options.separate_compilation {
            return false;
        }
        let Some(value) = self.resolver.get_constant_value(node.id) else {
            return false;
        };
        let rendered = format_constant(value);
        self.write(&rendered);
        if let Some(name) = name {
            let text = self.text_of(name).to_string();
            self.write(" /* ");
            self.write(&text);
            self.write(" */");
        }
        true
    }

    fn emit_member_target(&mut self, target: &'a Expr<'a>) {
        let needs_parens = match &target.kind {
            // `1..x` hazard, and `new C.x` would re-associate.
            ExprKind::NumLit(_) => true,
            ExprKind::New { args: None, .. } => true,
            _ => expression_precedence(target) < MEMBER_TARGET_PRECEDENCE,
        };
        if needs_parens {
            self.write("(");
            self.emit_expr(target);
            self.write(")");
        } else {
            self.emit_expr(target);
        }
    }

    fn emit_call(&mut self, callee: &'a Expr<'a>, args: &'a [&'a Expr<'a>]) {
        let has_spread = args.iter().any(|a| matches!(a.kind, ExprKind::Spread(_)));
        if self.options.is_downlevel() {
            if has_spread {
                self.emit_call_with_spread(callee, args);
                return;
            }
            if self.try_emit_super_call(callee, args) {
                return;
            }
        }
        self.emit_callee(callee);
        self.write("(");
        self.emit_comma_list(args, false);
        self.write(")");
    }

    fn emit_callee(&mut self, callee: &'a Expr<'a>) {
        let needs_parens = matches!(
            callee.kind,
            ExprKind::Function(_) | ExprKind::Arrow(_) | ExprKind::Class(_)
        ) || expression_precedence(callee) < MEMBER_TARGET_PRECEDENCE;
        if needs_parens {
            self.write("(");
            self.emit_expr(callee);
            self.write(")");
        } else {
            self.emit_expr(callee);
        }
    }

    /// `super(...)` and `super.m(...)` below ES6 route through the
    /// captured `_super`.
    fn try_emit_super_call(&mut self, callee: &'a Expr<'a>, args: &'a [&'a Expr<'a>]) -> bool {
        match &callee.kind {
            ExprKind::Super => {
                self.write("_super.call(this");
                for arg in args {
                    self.write(", ");
                    self.emit_operand_with_min_precedence(arg, 3);
                }
                self.write(")");
                true
            }
            ExprKind::PropAccess { target, name } if matches!(target.kind, ExprKind::Super) => {
                self.emit_super_reference();
                self.write(".");
                let text = self.text_of(*name).to_string();
                self.write(&text);
                self.write(".call(this");
                for arg in args {
                    self.write(", ");
                    self.emit_operand_with_min_precedence(arg, 3);
                }
                self.write(")");
                true
            }
            _ => false,
        }
    }

    /// `f(...xs)` below ES6: `.apply` with a concat-assembled argument
    /// array, evaluating the receiver exactly once.
    fn emit_call_with_spread(&mut self, callee: &'a Expr<'a>, args: &'a [&'a Expr<'a>]) {
        match &callee.kind {
            ExprKind::Super => {
                self.write("_super.apply(this, ");
                self.emit_list_with_spread(args, false);
                self.write(")");
            }
            ExprKind::PropAccess { target, name } if matches!(target.kind, ExprKind::Super) => {
                self.emit_super_reference();
                self.write(".");
                let text = self.text_of(*name).to_string();
                self.write(&text);
                self.write(".apply(this, ");
                self.emit_list_with_spread(args, false);
                self.write(")");
            }
            ExprKind::PropAccess { target, name } => {
                let text = self.text_of(*name).to_string();
                match target.kind {
                    ExprKind::Ident(_) | ExprKind::This => {
                        self.emit_member_target(target);
                        self.write(".");
                        self.write(&text);
                        self.write(".apply(");
                        self.emit_expr(target);
                    }
                    _ => {
                        let temp = self.new_temp_variable(crate::names::TempHint::Auto);
                        self.write("(");
                        self.write(&temp);
                        self.write(" = ");
                        self.emit_expr(target);
                        self.write(").");
                        self.write(&text);
                        self.write(".apply(");
                        self.write(&temp);
                    }
                }
                self.write(", ");
                self.emit_list_with_spread(args, false);
                self.write(")");
            }
            _ => {
                self.emit_callee(callee);
                self.write(".apply(void 0, ");
                self.emit_list_with_spread(args, false);
                self.write(")");
            }
        }
    }

    /// Renders a possibly-spread-bearing list as an array value:
    /// `[a, b].concat(xs, [c])`. A pure single spread passes through as
    /// the argument array, except where the consumer may mutate it
    /// (`needs_copy`), which forces a `.slice()` copy.
    fn emit_list_with_spread(&mut self, elements: &'a [&'a Expr<'a>], needs_copy: bool) {
        let mut segments: Vec<SpreadSegment<'a>> = Vec::new();
        for element in elements.iter().copied() {
            match &element.kind {
                ExprKind::Spread(inner) => segments.push(SpreadSegment::Spread(*inner)),
                _ => match segments.last_mut() {
                    Some(SpreadSegment::Literal(items)) => items.push(element),
                    _ => segments.push(SpreadSegment::Literal(vec![element])),
                },
            }
        }
        if segments.len() == 1 {
            match &segments[0] {
                SpreadSegment::Spread(inner) => {
                    if needs_copy {
                        self.emit_member_target(inner);
                        self.write(".slice()");
                    } else {
                        self.emit_operand_with_min_precedence(inner, 3);
                    }
                    return;
                }
                SpreadSegment::Literal(items) => {
                    self.write("[");
                    self.emit_comma_list_vec(items, false);
                    self.write("]");
                    return;
                }
            }
        }
        let mut rest = segments.iter();
        match rest.next() {
            Some(SpreadSegment::Literal(items)) => {
                self.write("[");
                self.emit_comma_list_vec(items, false);
                self.write("]");
            }
            Some(SpreadSegment::Spread(inner)) => {
                self.emit_member_target(inner);
            }
            None => {
                self.write("[]");
                return;
            }
        }
        self.write(".concat(");
        for (i, segment) in rest.enumerate() {
            if i > 0 {
                self.write(", ");
            }
            match segment {
                SpreadSegment::Spread(inner) => self.emit_operand_with_min_precedence(inner, 3),
                SpreadSegment::Literal(items) => {
                    self.write("[");
                    self.emit_comma_list_vec(items, false);
                    self.write("]");
                }
            }
        }
        self.write(")");
    }

    fn emit_new(&mut self, callee: &'a Expr<'a>, args: Option<&'a [&'a Expr<'a>]>) {
        self.write("new ");
        let needs_parens = matches!(callee.kind, ExprKind::Call { .. })
            || matches!(
                callee.kind,
                ExprKind::Function(_) | ExprKind::Arrow(_) | ExprKind::Class(_)
            )
            || expression_precedence(callee) < 18;
        if needs_parens {
            self.write("(");
            self.emit_expr(callee);
            self.write(")");
        } else {
            self.emit_expr(callee);
        }
        if let Some(args) = args {
            self.write("(");
            self.emit_comma_list(args, false);
            self.write(")");
        } else {
            self.write("()");
        }
    }

    fn emit_paren(&mut self, inner: &'a Expr<'a>) {
        // Peel erased type assertions: `(<any>x).p` keeps its parens, but
        // a paren left holding only an assertion of something simple
        // disappears with it.
        if matches!(inner.kind, ExprKind::TypeAssertion(_)) {
            let peeled = skip_parens_and_assertions(inner);
            if is_primary_like(peeled) {
                self.emit_expr(peeled);
                return;
            }
        }
        self.write("(");
        self.emit_expr(inner);
        self.write(")");
    }

    fn emit_unary(&mut self, op: UnaryOp, operand: &'a Expr<'a>) {
        self.write(op.text());
        let sign_clash = match (&op, &operand.kind) {
            (UnaryOp::Minus, ExprKind::Unary { op: inner, .. }) => matches!(
                inner,
                UnaryOp::Minus | UnaryOp::PreDecrement
            ),
            (UnaryOp::Plus, ExprKind::Unary { op: inner, .. }) => matches!(
                inner,
                UnaryOp::Plus | UnaryOp::PreIncrement
            ),
            _ => false,
        };
        if op.is_keyword() || sign_clash {
            self.write(" ");
        }
        self.emit_operand_with_min_precedence(operand, 15);
    }

    pub(crate) fn emit_binary(
        &mut self,
        node: &'a Expr<'a>,
        op: downlevel_syntax::BinOp,
        left: &'a Expr<'a>,
        right: &'a Expr<'a>,
    ) {
        if op == downlevel_syntax::BinOp::Assign
            && self.options.is_downlevel()
            && matches!(left.kind, ExprKind::Array(_) | ExprKind::Object(_))
        {
            self.emit_destructuring_assignment(node, left, right);
            return;
        }
        if op.is_assignment() {
            if let ExprKind::Ident(sym) = left.kind {
                if self.should_wrap_system_export(sym) {
                    let export_fn = self.export_fn.clone().unwrap();
                    let text = self.text_of(sym).to_string();
                    self.write(&export_fn);
                    self.write("(\"");
                    self.write(&text);
                    self.write("\", ");
                    self.emit_plain_binary(op, left, right);
                    self.write(")");
                    return;
                }
            }
        }
        self.emit_plain_binary(op, left, right);
    }

    fn should_wrap_system_export(&self, sym: Symbol) -> bool {
        self.export_fn.is_some() && self.system_exported_names.contains(&sym)
    }

    fn emit_plain_binary(
        &mut self,
        op: downlevel_syntax::BinOp,
        left: &'a Expr<'a>,
        right: &'a Expr<'a>,
    ) {
        let precedence = op.precedence();
        // Left operand of a left-associative operator tolerates equal
        // precedence; the right does not (and vice versa for assignment).
        let (left_min, right_min) = if op.is_right_associative() {
            (precedence + 1, precedence)
        } else {
            (precedence, precedence + 1)
        };
        self.emit_operand_with_min_precedence(left, left_min);
        if op == downlevel_syntax::BinOp::Comma {
            self.write(", ");
        } else {
            self.write(" ");
            self.write(op.text());
            self.write(" ");
        }
        self.emit_operand_with_min_precedence(right, right_min);
    }

    fn emit_conditional(
        &mut self,
        cond: &'a Expr<'a>,
        when_true: &'a Expr<'a>,
        when_false: &'a Expr<'a>,
    ) {
        self.emit_operand_with_min_precedence(cond, 5);
        self.write(" ? ");
        self.emit_operand_with_min_precedence(when_true, 3);
        self.write(" : ");
        self.emit_operand_with_min_precedence(when_false, 3);
    }

    /// Wraps the operand in parentheses when it binds more loosely than
    /// the position requires.
    pub(crate) fn emit_operand_with_min_precedence(&mut self, operand: &'a Expr<'a>, min: u8) {
        if expression_precedence(operand) < min {
            self.write("(");
            self.emit_expr(operand);
            self.write(")");
        } else {
            self.emit_expr(operand);
        }
    }

    /// Comma-separated expression list; multiline lists put one element
    /// per line at one extra indent.
    pub(crate) fn emit_comma_list(&mut self, items: &'a [&'a Expr<'a>], multiline: bool) {
        if multiline {
            self.increase_indent();
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    self.write(",");
                }
                self.write_line();
                self.emit_operand_with_min_precedence(item, 2);
            }
            self.decrease_indent();
            self.write_line();
        } else {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    self.write(", ");
                }
                self.emit_operand_with_min_precedence(item, 2);
            }
        }
    }

    fn emit_comma_list_vec(&mut self, items: &[&'a Expr<'a>], multiline: bool) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            let _ = multiline;
            self.emit_operand_with_min_precedence(item, 2);
        }
    }

    /// Source layout decision for list emission: an explicit multiline
    /// flag, or real spans starting on different lines.
    pub(crate) fn list_is_multiline(
        &self,
        flags: NodeFlags,
        mut spans: impl Iterator<Item = downlevel_base::Span>,
    ) -> bool {
        if flags.contains(NodeFlags::MULTILINE) {
            return true;
        }
        let Some(first) = spans.next() else {
            return false;
        };
        let last = spans.last().unwrap_or(first);
        !self.starts_on_same_line(first, last)
    }
}

enum SpreadSegment<'a> {
    Literal(Vec<&'a Expr<'a>>),
    Spread(&'a Expr<'a>),
}

/// Expressions a peeled type assertion may stand in for without parens.
fn is_primary_like(expr: &Expr<'_>) -> bool {
    matches!(
        expr.kind,
        ExprKind::Ident(_)
            | ExprKind::This
            | ExprKind::NumLit(_)
            | ExprKind::StrLit { .. }
            | ExprKind::TrueLit
            | ExprKind::FalseLit
            | ExprKind::NullLit
            | ExprKind::Call { .. }
            | ExprKind::PropAccess { .. }
            | ExprKind::ElemAccess { .. }
            | ExprKind::Paren(_)
    )
}

/// Does the leftmost token of this expression open an object literal,
/// function, or class? Such expressions need parens in statement position.
pub(crate) fn starts_with_object_or_function(expr: &Expr<'_>) -> bool {
    match &expr.kind {
        ExprKind::Object(_) | ExprKind::Function(_) | ExprKind::Class(_) => true,
        ExprKind::Binary { left, .. } => starts_with_object_or_function(left),
        ExprKind::Conditional { cond, .. } => starts_with_object_or_function(cond),
        ExprKind::Call { callee, .. } => starts_with_object_or_function(callee),
        ExprKind::PropAccess { target, .. } | ExprKind::ElemAccess { target, .. } => {
            starts_with_object_or_function(target)
        }
        ExprKind::Postfix { operand, .. } => starts_with_object_or_function(operand),
        ExprKind::TaggedTemplate { tag, .. } => starts_with_object_or_function(tag),
        ExprKind::TypeAssertion(inner) => starts_with_object_or_function(inner),
        _ => false,
    }
}
