//! Destructuring lowering: patterns become assignment sequences.
//!
//! A pattern walk emits `x = value.p`, `x = value[i]`, `x = value.slice(i)`
//! assignments in source order. The incoming value is captured into a
//! temporary whenever it would otherwise be evaluated more than once — a
//! non-identifier source feeding several elements, or any element with a
//! default (`value === void 0 ? default : value` reads it twice). In
//! declaration contexts the temporaries join the `var` list being written;
//! in assignment contexts they hoist to the enclosing function's prelude.

use downlevel_base::Symbol;
use downlevel_syntax::{
    expression_precedence, Binding, BindingElement, BindingPattern, Expr, ExprKind,
    ObjectMemberKind, PatternKind, PropName,
};

use super::super::quote_string;
use crate::emitter::Emitter;
use crate::names::TempHint;

/// Where the generated assignments land; decides comma style and temp
/// declaration strategy.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Ctx {
    /// Inside a `var` list: assignments are declarators, temps declare
    /// inline.
    Declaration,
    /// Expression context: plain assignments, temps hoist to the body
    /// prelude.
    Assignment,
}

/// A value that can be emitted (and for simple shapes, re-emitted).
enum Val<'a> {
    Expr(&'a Expr<'a>),
    /// An identifier or temporary, safe to repeat.
    Name(String),
    Prop(Box<Val<'a>>, Key<'a>),
    /// `base.slice(i)` — array rest.
    Slice(Box<Val<'a>>, usize),
    /// `name === void 0 ? init : name`; `name` is repeat-safe.
    Default(String, &'a Expr<'a>),
}

enum Key<'a> {
    Ident(String),
    /// String-literal key with its source quote style.
    Quoted(String, bool),
    Index(usize),
    /// Dynamic index by identifier (`arr[_i]` in the for-of body).
    Dyn(String),
    Computed(&'a Expr<'a>),
}

struct Destructurer<'e, 'a> {
    em: &'e mut Emitter<'a>,
    ctx: Ctx,
    count: usize,
}

impl<'e, 'a> Destructurer<'e, 'a> {
    fn separator(&mut self) {
        if self.count > 0 {
            self.em.write(", ");
        }
        self.count += 1;
    }

    fn make_temp(&mut self) -> String {
        match self.ctx {
            // Declarator position: the temp is part of the var list being
            // written, no hoist.
            Ctx::Declaration => {
                self.em
                    .names
                    .make_temp_variable(TempHint::Auto, self.em.resolver, self.em.file)
            }
            Ctx::Assignment => self.em.new_temp_variable(TempHint::Auto),
        }
    }

    fn emit_val(&mut self, val: &Val<'a>) {
        match val {
            Val::Expr(expr) => self.em.emit_operand_with_min_precedence(expr, 3),
            Val::Name(name) => self.em.write(name),
            Val::Prop(base, key) => {
                self.emit_member_base(base);
                match key {
                    Key::Ident(name) => {
                        self.em.write(".");
                        self.em.write(name);
                    }
                    Key::Quoted(value, single_quote) => {
                        let quoted = quote_string(value, *single_quote);
                        self.em.write("[");
                        self.em.write(&quoted);
                        self.em.write("]");
                    }
                    Key::Index(i) => {
                        self.em.write(&format!("[{}]", i));
                    }
                    Key::Dyn(name) => {
                        self.em.write("[");
                        self.em.write(name);
                        self.em.write("]");
                    }
                    Key::Computed(expr) => {
                        self.em.write("[");
                        self.em.emit_expr(expr);
                        self.em.write("]");
                    }
                }
            }
            Val::Slice(base, from) => {
                self.emit_member_base(base);
                self.em.write(&format!(".slice({})", from));
            }
            Val::Default(name, init) => {
                self.em.write(name);
                self.em.write(" === void 0 ? ");
                self.em.emit_operand_with_min_precedence(init, 3);
                self.em.write(" : ");
                self.em.write(name);
            }
        }
    }

    fn emit_member_base(&mut self, base: &Val<'a>) {
        if let Val::Expr(expr) = base {
            if expression_precedence(expr) < 17 || matches!(expr.kind, ExprKind::NumLit(_)) {
                self.em.write("(");
                self.em.emit_expr(expr);
                self.em.write(")");
                return;
            }
        }
        self.emit_val(base);
    }

    /// Guarantees the value is repeat-safe, emitting a capturing
    /// assignment when it is not.
    fn ensure_identifier(&mut self, val: Val<'a>) -> String {
        match val {
            Val::Name(name) => name,
            Val::Expr(expr) => {
                if let ExprKind::Ident(sym) = expr.kind {
                    self.em.text_of(sym).to_string()
                } else {
                    self.capture(Val::Expr(expr))
                }
            }
            other => self.capture(other),
        }
    }

    fn capture(&mut self, val: Val<'a>) -> String {
        let temp = self.make_temp();
        self.separator();
        self.em.write(&temp);
        self.em.write(" = ");
        self.emit_val(&val);
        temp
    }

    fn apply_default(&mut self, val: Val<'a>, init: Option<&'a Expr<'a>>) -> Val<'a> {
        match init {
            Some(init) => {
                let name = self.ensure_identifier(val);
                Val::Default(name, init)
            }
            None => val,
        }
    }

    fn assign_name(&mut self, name: &str, val: Val<'a>) {
        self.separator();
        self.em.write(name);
        self.em.write(" = ");
        self.emit_val(&val);
    }

    fn assign_target(&mut self, target: &'a Expr<'a>, val: Val<'a>) {
        self.separator();
        self.em.emit_expr(target);
        self.em.write(" = ");
        self.emit_val(&val);
    }

    // ─── Binding patterns (declarations, parameters) ────────────────────

    fn emit_pattern(&mut self, pattern: &'a BindingPattern<'a>, val: Val<'a>) {
        let val = if pattern.elements.len() > 1 {
            Val::Name(self.ensure_identifier(val))
        } else {
            val
        };
        match pattern.kind {
            PatternKind::Object => {
                for element in pattern.elements {
                    let key = self.object_key(element);
                    let source = Val::Prop(Box::new(clone_shallow(&val)), key);
                    self.emit_element(element, source);
                }
            }
            PatternKind::Array => {
                for (i, element) in pattern.elements.iter().enumerate() {
                    if element.name.is_none() {
                        continue;
                    }
                    let source = if element.dotdotdot {
                        Val::Slice(Box::new(clone_shallow(&val)), i)
                    } else {
                        Val::Prop(Box::new(clone_shallow(&val)), Key::Index(i))
                    };
                    self.emit_element(element, source);
                }
            }
        }
    }

    fn object_key(&mut self, element: &'a BindingElement<'a>) -> Key<'a> {
        let name = match &element.property_name {
            Some(prop) => prop,
            None => {
                // Shorthand: the bound identifier is also the key.
                let Some(Binding::Ident(sym)) = &element.name else {
                    unreachable!("object binding element without property or identifier");
                };
                return Key::Ident(self.em.text_of(*sym).to_string());
            }
        };
        match name {
            PropName::Ident(sym) => Key::Ident(self.em.text_of(*sym).to_string()),
            PropName::Str {
                value,
                single_quote,
            } => Key::Quoted(value.clone(), *single_quote),
            PropName::Num(text) => Key::Dyn(text.clone()),
            PropName::Computed(expr) => Key::Computed(*expr),
        }
    }

    fn emit_element(&mut self, element: &'a BindingElement<'a>, source: Val<'a>) {
        let source = self.apply_default(source, element.init);
        match &element.name {
            None => {}
            Some(Binding::Ident(sym)) => {
                let name = self.em.text_of(*sym).to_string();
                self.assign_name(&name, source);
            }
            Some(Binding::Pattern(nested)) => self.emit_pattern(nested, source),
        }
    }

    // ─── Expression-shaped targets (assignment destructuring) ───────────

    fn emit_assignment_shape(&mut self, target: &'a Expr<'a>, val: Val<'a>) {
        match &target.kind {
            ExprKind::Object(members) => {
                let val = if members.len() > 1 {
                    Val::Name(self.ensure_identifier(val))
                } else {
                    val
                };
                for member in *members {
                    match &member.kind {
                        ObjectMemberKind::Shorthand(sym) => {
                            let text = self.em.text_of(*sym).to_string();
                            let source =
                                Val::Prop(Box::new(clone_shallow(&val)), Key::Ident(text.clone()));
                            self.assign_name(&text, source);
                        }
                        ObjectMemberKind::Prop { name, value } => {
                            let key = match name {
                                PropName::Ident(sym) => {
                                    Key::Ident(self.em.text_of(*sym).to_string())
                                }
                                PropName::Str {
                                    value: s,
                                    single_quote,
                                } => Key::Quoted(s.clone(), *single_quote),
                                PropName::Num(text) => Key::Dyn(text.clone()),
                                PropName::Computed(expr) => Key::Computed(*expr),
                            };
                            let source = Val::Prop(Box::new(clone_shallow(&val)), key);
                            self.emit_assignment_shape(value, source);
                        }
                    }
                }
            }
            ExprKind::Array(elements) => {
                let val = if elements.len() > 1 {
                    Val::Name(self.ensure_identifier(val))
                } else {
                    val
                };
                for (i, element) in elements.iter().enumerate() {
                    match &element.kind {
                        ExprKind::Omitted => {}
                        ExprKind::Spread(rest) => {
                            let source = Val::Slice(Box::new(clone_shallow(&val)), i);
                            self.emit_assignment_shape(rest, source);
                        }
                        _ => {
                            let source =
                                Val::Prop(Box::new(clone_shallow(&val)), Key::Index(i));
                            self.emit_assignment_shape(element, source);
                        }
                    }
                }
            }
            ExprKind::Binary {
                op: downlevel_syntax::BinOp::Assign,
                left,
                right,
            } => {
                // `[a = 1] = xs` — a default inside the target.
                let source = self.apply_default(val, Some(*right));
                self.emit_assignment_shape(left, source);
            }
            ExprKind::Paren(inner) => self.emit_assignment_shape(inner, val),
            _ => self.assign_target(target, val),
        }
    }
}

/// Values are trees of owned strings plus `&'a` nodes; a shallow clone is
/// enough to reuse a base across elements.
fn clone_shallow<'a>(val: &Val<'a>) -> Val<'a> {
    match val {
        Val::Expr(expr) => Val::Expr(*expr),
        Val::Name(name) => Val::Name(name.clone()),
        Val::Prop(base, key) => Val::Prop(
            Box::new(clone_shallow(base)),
            match key {
                Key::Ident(s) => Key::Ident(s.clone()),
                Key::Quoted(s, single_quote) => Key::Quoted(s.clone(), *single_quote),
                Key::Index(i) => Key::Index(*i),
                Key::Dyn(s) => Key::Dyn(s.clone()),
                Key::Computed(expr) => Key::Computed(*expr),
            },
        ),
        Val::Slice(base, from) => Val::Slice(Box::new(clone_shallow(base)), *from),
        Val::Default(name, init) => Val::Default(name.clone(), *init),
    }
}

impl<'a> Emitter<'a> {
    /// Declarator position: `var {a, b = 2} = obj` becomes
    /// `var a = obj.a, _b = obj.b, b = _b === void 0 ? 2 : _b`.
    pub(crate) fn emit_destructuring_var_decl(
        &mut self,
        pattern: &'a BindingPattern<'a>,
        init: Option<&'a Expr<'a>>,
    ) {
        let Some(init) = init else {
            // The checker rejects uninitialized pattern declarations.
            unreachable!("destructuring declaration without initializer");
        };
        let mut d = Destructurer {
            em: self,
            ctx: Ctx::Declaration,
            count: 0,
        };
        d.emit_pattern(pattern, Val::Expr(init));
    }

    /// Parameter prelude: the body of `function (_a)` gains
    /// `var a = _a.a, b = _a.b;`.
    pub(crate) fn emit_destructuring_param(
        &mut self,
        pattern: &'a BindingPattern<'a>,
        temp: &str,
    ) {
        let mut d = Destructurer {
            em: self,
            ctx: Ctx::Declaration,
            count: 0,
        };
        d.emit_pattern(pattern, Val::Name(temp.to_string()));
    }

    /// `for-of` binding re-emission: `var v = arr[i];` (or a pattern walk
    /// over `arr[i]`).
    pub(crate) fn emit_destructuring_for_of_binding(
        &mut self,
        pattern: &'a BindingPattern<'a>,
        array: &str,
        index: &str,
    ) {
        let mut d = Destructurer {
            em: self,
            ctx: Ctx::Declaration,
            count: 0,
        };
        let source = Val::Prop(
            Box::new(Val::Name(array.to_string())),
            Key::Dyn(index.to_string()),
        );
        d.emit_pattern(pattern, source);
    }

    /// Statement form: `[a, b] = xs;` emits the assignment sequence and no
    /// final value.
    pub(crate) fn emit_destructuring_assignment_statement(
        &mut self,
        left: &'a Expr<'a>,
        right: &'a Expr<'a>,
    ) {
        let mut d = Destructurer {
            em: self,
            ctx: Ctx::Assignment,
            count: 0,
        };
        d.emit_assignment_shape(left, Val::Expr(right));
    }

    /// Expression form: wraps in parens and appends the captured value so
    /// the whole thing still evaluates to the right-hand side.
    pub(crate) fn emit_destructuring_assignment(
        &mut self,
        _node: &'a Expr<'a>,
        left: &'a Expr<'a>,
        right: &'a Expr<'a>,
    ) {
        self.write("(");
        let mut d = Destructurer {
            em: self,
            ctx: Ctx::Assignment,
            count: 0,
        };
        let value = d.ensure_identifier(Val::Expr(right));
        d.emit_assignment_shape(left, Val::Name(value.clone()));
        self.write(", ");
        self.write(&value);
        self.write(")");
    }

    /// ES6 pattern re-emission for parameter lists and `let`/`const`
    /// declarations that stay high-level.
    pub(crate) fn emit_binding_pattern_verbatim(&mut self, pattern: &'a BindingPattern<'a>) {
        let (open, close) = match pattern.kind {
            PatternKind::Object => ("{ ", " }"),
            PatternKind::Array => ("[", "]"),
        };
        self.write(open);
        for (i, element) in pattern.elements.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            if element.dotdotdot {
                self.write("...");
            }
            if let Some(prop) = &element.property_name {
                self.emit_prop_name(prop);
                self.write(": ");
            }
            match &element.name {
                None => {}
                Some(Binding::Ident(sym)) => {
                    let text = self.text_of(*sym);
                    self.write(text);
                }
                Some(Binding::Pattern(nested)) => self.emit_binding_pattern_verbatim(nested),
            }
            if let Some(init) = element.init {
                self.write(" = ");
                self.emit_operand_with_min_precedence(init, 3);
            }
        }
        self.write(close);
    }
}
