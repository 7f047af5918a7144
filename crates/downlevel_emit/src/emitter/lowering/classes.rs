//! Class lowering.
//!
//! Below ES6 a class becomes an IIFE over `_super`:
//!
//! ```text
//! var C = (function (_super) {
//!     __extends(C, _super);
//!     function C() {
//!         _super.apply(this, arguments);
//!     }
//!     C.prototype.m = function () { };
//!     Object.defineProperty(C.prototype, "x", { ... });
//!     C.staticProp = 1;
//!     return C;
//! })(Base);
//! ```
//!
//! Constructors synthesize when absent, parameter properties expand to
//! `this.x = x` after the `super(...)` call, instance property
//! initializers follow, and accessors group into one
//! `Object.defineProperty` at the first accessor's position. At ES6 the
//! syntax survives, except that parameter properties and instance
//! initializers still expand into the constructor and static properties
//! trail the declaration.

use downlevel_syntax::{
    Binding, ClassLike, ClassMember, Expr, ExprKind, Func, MemberKind, NodeFlags, NodeId,
    PropName, Stmt, StmtKind,
};

use crate::emitter::context::ClassFrame;
use crate::emitter::Emitter;

impl<'a> Emitter<'a> {
    pub(crate) fn emit_class_declaration(&mut self, node: &'a Stmt<'a>, class: &'a ClassLike<'a>) {
        if node.flags.contains(NodeFlags::AMBIENT) {
            return;
        }
        let name = match class.name {
            Some(sym) => self.text_of(sym).to_string(),
            None => self.generated_name_for_node(node.id, "default"),
        };
        let decorated = self.class_is_decorated(class);
        self.push_scope_name(&name);
        if self.options.is_downlevel() {
            // Under the System envelope the binding is hoisted into the
            // registrar prologue; elsewhere it declares here.
            if !(self.in_module_root && self.export_fn.is_some()) {
                self.write("var ");
            }
            self.write(&name);
            self.write(" = ");
            self.emit_es5_class_iife(class, &name);
            self.write(";");
        } else if decorated {
            // `let C = class { ... };` keeps the binding assignable for
            // the decorator result while preserving the runtime name.
            self.write("let ");
            self.write(&name);
            self.write(" = ");
            self.emit_es6_class_body(class, None);
            self.write(";");
            if class.name.is_some() {
                self.write_line();
                self.write("Object.defineProperty(");
                self.write(&name);
                self.write(", \"name\", { value: \"");
                self.write(&name);
                self.write("\", configurable: true });");
            }
            self.emit_es6_static_properties(class, &name);
            self.emit_member_decorator_calls(class, &name);
        } else {
            if node.is_exported()
                && self.in_module_root
                && self.options.module == crate::options::ModuleKind::None
            {
                self.write("export ");
                if node.flags.contains(NodeFlags::DEFAULT) {
                    self.write("default ");
                }
            }
            self.emit_es6_class_body(class, Some(&name));
            self.emit_es6_static_properties(class, &name);
            self.emit_member_decorator_calls(class, &name);
        }
        if decorated {
            self.emit_class_decorate_call(node.id, class, &name);
        }
        self.pop_scope_name();
        self.emit_export_assignments_for_declaration(node, class.name, &name);
    }

    pub(crate) fn emit_class_expression(&mut self, node: &'a Expr<'a>, class: &'a ClassLike<'a>) {
        let name = match class.name {
            Some(sym) => self.text_of(sym).to_string(),
            None => self.generated_name_for_node(node.id, "default"),
        };
        self.push_scope_name(&name);
        if self.options.is_downlevel() {
            self.emit_es5_class_iife(class, &name);
        } else {
            let statics: Vec<&ClassMember<'a>> = static_initialized_properties(class);
            if statics.is_empty() {
                self.emit_es6_class_body(class, class.name.is_some().then_some(name.as_str()));
            } else {
                // `(_a = class { }, _a.p = 1, _a)` keeps the statics off
                // the surrounding expression.
                let temp = self.new_temp_variable(crate::names::TempHint::Auto);
                self.write("(");
                self.write(&temp);
                self.write(" = ");
                self.emit_es6_class_body(class, class.name.is_some().then_some(name.as_str()));
                for member in statics {
                    let MemberKind::Property { name, init } = &member.kind else {
                        continue;
                    };
                    self.write(", ");
                    self.write(&temp);
                    self.emit_member_key(name, member);
                    self.write(" = ");
                    self.emit_operand_with_min_precedence(init.unwrap(), 3);
                }
                self.write(", ");
                self.write(&temp);
                self.write(")");
            }
        }
        self.pop_scope_name();
    }

    fn class_is_decorated(&self, class: &'a ClassLike<'a>) -> bool {
        if !class.decorators.is_empty() {
            return true;
        }
        class.members.iter().any(|member| {
            matches!(member.kind, MemberKind::Constructor(_))
                && member_param_decorators(member).next().is_some()
        })
    }

    // ─── ES5 ────────────────────────────────────────────────────────────

    fn emit_es5_class_iife(&mut self, class: &'a ClassLike<'a>, name: &str) {
        let has_base = class.heritage.is_some();
        self.write("(function (");
        if has_base {
            self.write("_super");
        }
        self.write(") {");
        self.increase_indent();

        let saved = self.start_lexical_environment();
        let saved_depth = std::mem::replace(&mut self.nested_block_depth, 0);
        let saved_root = std::mem::replace(&mut self.in_module_root, false);
        self.class_stack.push(ClassFrame {
            name: name.to_string(),
            has_base,
            in_static: false,
        });

        if has_base {
            self.write_line();
            self.write("__extends(");
            self.write(name);
            self.write(", _super);");
        }
        self.write_line();
        self.emit_constructor(class, name, false);
        self.emit_es5_members(class, name);
        self.emit_member_decorator_calls(class, name);
        self.emit_es5_static_properties(class, name);
        self.flush_temp_declarations();
        self.write_line();
        self.write("return ");
        self.write(name);
        self.write(";");

        self.class_stack.pop();
        self.nested_block_depth = saved_depth;
        self.in_module_root = saved_root;
        self.end_lexical_environment(saved);

        self.decrease_indent();
        self.write_line();
        self.write("})(");
        if let Some(base) = class.heritage {
            self.emit_operand_with_min_precedence(base, 3);
        }
        self.write(")");
    }

    fn emit_es5_members(&mut self, class: &'a ClassLike<'a>, name: &str) {
        let mut grouped_accessors: Vec<usize> = Vec::new();
        for (index, member) in class.members.iter().enumerate() {
            match &member.kind {
                MemberKind::Method { name: prop, func } => {
                    if func.body.is_none() {
                        continue;
                    }
                    self.set_static_context(member.is_static());
                    self.write_line();
                    self.record_start(member.span);
                    self.write_member_target(name, member);
                    self.emit_member_key(prop, member);
                    self.write(" = function ");
                    self.push_member_scope_name(prop);
                    self.emit_signature_and_body(func, member.id);
                    self.pop_scope_name();
                    self.write(";");
                    self.record_end(member.span);
                    self.set_static_context(false);
                }
                MemberKind::GetAccessor { .. } | MemberKind::SetAccessor { .. } => {
                    if grouped_accessors.contains(&index) {
                        continue;
                    }
                    self.emit_accessor_group(class, name, index, &mut grouped_accessors);
                }
                MemberKind::Constructor(_) | MemberKind::Property { .. } => {}
            }
        }
    }

    /// `Object.defineProperty` for the get/set pair, emitted at the first
    /// accessor's position; the partner is marked consumed.
    fn emit_accessor_group(
        &mut self,
        class: &'a ClassLike<'a>,
        name: &str,
        first_index: usize,
        grouped: &mut Vec<usize>,
    ) {
        let first = &class.members[first_index];
        let key_text = accessor_key_text(self, first);
        let mut getter: Option<&'a ClassMember<'a>> = None;
        let mut setter: Option<&'a ClassMember<'a>> = None;
        for (index, member) in class.members.iter().enumerate().skip(first_index) {
            if member.is_static() != first.is_static() {
                continue;
            }
            match &member.kind {
                MemberKind::GetAccessor { .. } if accessor_key_text(self, member) == key_text => {
                    if getter.is_none() {
                        getter = Some(member);
                        grouped.push(index);
                    }
                }
                MemberKind::SetAccessor { .. } if accessor_key_text(self, member) == key_text => {
                    if setter.is_none() {
                        setter = Some(member);
                        grouped.push(index);
                    }
                }
                _ => {}
            }
        }
        self.set_static_context(first.is_static());
        self.write_line();
        self.record_start(first.span);
        self.write("Object.defineProperty(");
        self.write_member_container(name, first);
        self.write(", ");
        let quoted = super::super::escape_string(&key_text);
        self.write(&quoted);
        self.write(", {");
        self.increase_indent();
        if let Some(member) = getter {
            let MemberKind::GetAccessor { func, .. } = &member.kind else {
                unreachable!()
            };
            self.write_line();
            self.write("get: function ");
            self.emit_signature_and_body(func, member.id);
            self.write(",");
        }
        if let Some(member) = setter {
            let MemberKind::SetAccessor { func, .. } = &member.kind else {
                unreachable!()
            };
            self.write_line();
            self.write("set: function ");
            self.emit_signature_and_body(func, member.id);
            self.write(",");
        }
        self.write_line();
        self.write("enumerable: true,");
        self.write_line();
        self.write("configurable: true");
        self.decrease_indent();
        self.write_line();
        self.write("});");
        self.record_end(first.span);
        self.set_static_context(false);
    }

    fn emit_es5_static_properties(&mut self, class: &'a ClassLike<'a>, name: &str) {
        for member in static_initialized_properties(class) {
            let MemberKind::Property { name: prop, init } = &member.kind else {
                continue;
            };
            self.set_static_context(true);
            self.write_line();
            self.record_start(member.span);
            self.write(name);
            self.emit_member_key(prop, member);
            self.write(" = ");
            self.emit_operand_with_min_precedence(init.unwrap(), 3);
            self.write(";");
            self.record_end(member.span);
            self.set_static_context(false);
        }
    }

    // ─── ES6 ────────────────────────────────────────────────────────────

    fn emit_es6_class_body(&mut self, class: &'a ClassLike<'a>, name: Option<&str>) {
        let has_base = class.heritage.is_some();
        self.write("class");
        if let Some(name) = name {
            self.write(" ");
            self.write(name);
        }
        if let Some(base) = class.heritage {
            self.write(" extends ");
            self.emit_operand_with_min_precedence(base, 17);
        }
        self.write(" {");
        self.increase_indent();
        self.class_stack.push(ClassFrame {
            name: name.unwrap_or("").to_string(),
            has_base,
            in_static: false,
        });

        let explicit_ctor = find_constructor(class).is_some();
        let instance_props = !instance_initialized_properties(class).is_empty();
        let has_param_props = find_constructor(class)
            .map(|(_, func)| func.params.iter().any(|p| p.is_parameter_property()))
            .unwrap_or(false);
        if explicit_ctor || instance_props || has_param_props || has_base {
            self.write_line();
            self.emit_constructor(class, name.unwrap_or(""), true);
        }

        for member in class.members {
            match &member.kind {
                MemberKind::Method { name: prop, func } => {
                    if func.body.is_none() {
                        continue;
                    }
                    self.set_static_context(member.is_static());
                    self.write_line();
                    if member.is_static() {
                        self.write("static ");
                    }
                    self.emit_prop_name_for_member(prop);
                    self.push_member_scope_name(prop);
                    self.emit_signature_and_body(func, member.id);
                    self.pop_scope_name();
                    self.set_static_context(false);
                }
                MemberKind::GetAccessor { name: prop, func } => {
                    self.set_static_context(member.is_static());
                    self.write_line();
                    if member.is_static() {
                        self.write("static ");
                    }
                    self.write("get ");
                    self.emit_prop_name_for_member(prop);
                    self.emit_signature_and_body(func, member.id);
                    self.set_static_context(false);
                }
                MemberKind::SetAccessor { name: prop, func } => {
                    self.set_static_context(member.is_static());
                    self.write_line();
                    if member.is_static() {
                        self.write("static ");
                    }
                    self.write("set ");
                    self.emit_prop_name_for_member(prop);
                    self.emit_signature_and_body(func, member.id);
                    self.set_static_context(false);
                }
                MemberKind::Constructor(_) | MemberKind::Property { .. } => {}
            }
        }

        self.class_stack.pop();
        self.decrease_indent();
        self.write_line();
        self.write("}");
    }

    fn emit_es6_static_properties(&mut self, class: &'a ClassLike<'a>, name: &str) {
        for member in static_initialized_properties(class) {
            let MemberKind::Property { name: prop, init } = &member.kind else {
                continue;
            };
            self.write_line();
            self.write(name);
            self.emit_member_key(prop, member);
            self.write(" = ");
            self.emit_operand_with_min_precedence(init.unwrap(), 3);
            self.write(";");
        }
    }

    // ─── Constructors ───────────────────────────────────────────────────

    /// Explicit or synthesized constructor, with the insertion order:
    /// `super(...)` call, parameter-property assignments, instance
    /// property initializers, remaining user statements.
    fn emit_constructor(&mut self, class: &'a ClassLike<'a>, name: &str, es6: bool) {
        let has_base = class.heritage.is_some();
        let ctor = find_constructor_member(class);
        let saved = self.start_lexical_environment();
        let saved_depth = std::mem::replace(&mut self.nested_block_depth, 0);
        let saved_root = std::mem::replace(&mut self.in_module_root, false);

        if es6 {
            self.write("constructor(");
        } else {
            self.write("function ");
            self.write(name);
            self.write("(");
        }

        let mut pattern_params = Vec::new();
        match ctor {
            Some((member, func)) => {
                let _ = member;
                pattern_params = self.emit_signature_parameters(func);
            }
            None => {
                if es6 && has_base {
                    self.write("...args");
                }
            }
        }
        self.write(") {");
        self.increase_indent();

        match ctor {
            Some((member, func)) => {
                self.emit_function_preludes(func, member.id, &pattern_params);
                let (super_call, rest) = split_super_call(func, has_base);
                if let Some(stmt) = super_call {
                    self.write_line();
                    self.emit_stmt(stmt);
                }
                self.emit_parameter_property_assignments(func);
                self.emit_instance_property_assignments(class);
                self.emit_lines(rest);
            }
            None => {
                if has_base {
                    self.write_line();
                    if es6 {
                        self.write("super(...args);");
                    } else {
                        self.write("_super.apply(this, arguments);");
                    }
                }
                self.emit_instance_property_assignments(class);
            }
        }

        self.flush_temp_declarations();
        self.decrease_indent();
        self.write_line();
        self.write("}");

        self.nested_block_depth = saved_depth;
        self.in_module_root = saved_root;
        self.end_lexical_environment(saved);
    }

    fn emit_parameter_property_assignments(&mut self, func: &'a Func<'a>) {
        for param in func.params {
            if !param.is_parameter_property() {
                continue;
            }
            let Binding::Ident(sym) = &param.name else {
                continue;
            };
            let text = self.text_of(*sym).to_string();
            self.write_line();
            self.record_start(param.span);
            self.write("this.");
            self.write(&text);
            self.write(" = ");
            self.write(&text);
            self.write(";");
            self.record_end(param.span);
        }
    }

    fn emit_instance_property_assignments(&mut self, class: &'a ClassLike<'a>) {
        for member in class.members {
            if member.is_static() {
                continue;
            }
            let MemberKind::Property {
                name,
                init: Some(init),
            } = &member.kind
            else {
                continue;
            };
            self.write_line();
            self.record_start(member.span);
            self.write("this");
            self.emit_member_key(name, member);
            self.write(" = ");
            self.emit_operand_with_min_precedence(init, 3);
            self.write(";");
            self.record_end(member.span);
        }
    }

    // ─── Member name plumbing ───────────────────────────────────────────

    fn set_static_context(&mut self, in_static: bool) {
        if let Some(frame) = self.class_stack.last_mut() {
            frame.in_static = in_static;
        }
    }

    /// `C.prototype` or `C` as the assignment target prefix.
    fn write_member_target(&mut self, class_name: &str, member: &'a ClassMember<'a>) {
        self.write(class_name);
        if !member.is_static() {
            self.write(".prototype");
        }
    }

    pub(crate) fn write_member_container(&mut self, class_name: &str, member: &'a ClassMember<'a>) {
        self.write(class_name);
        if !member.is_static() {
            self.write(".prototype");
        }
    }

    /// The access after the target: `.m`, `["s"]`, `[0]`, or a computed
    /// key — captured into a temporary at its definition site when
    /// decorators must reference it again.
    pub(crate) fn emit_member_key(&mut self, name: &'a PropName<'a>, member: &'a ClassMember<'a>) {
        match name {
            PropName::Ident(sym) => {
                let text = self.text_of(*sym).to_string();
                self.write(".");
                self.write(&text);
            }
            PropName::Str {
                value,
                single_quote,
            } => {
                let quoted = super::super::quote_string(value, *single_quote);
                self.write("[");
                self.write(&quoted);
                self.write("]");
            }
            PropName::Num(text) => {
                let text = text.clone();
                self.write("[");
                self.write(&text);
                self.write("]");
            }
            PropName::Computed(expr) => {
                self.write("[");
                if !member.decorators.is_empty() {
                    let temp = self.new_temp_variable(crate::names::TempHint::Auto);
                    self.computed_prop_temps.insert(expr.id, temp.clone());
                    self.write(&temp);
                    self.write(" = ");
                }
                self.emit_expr(expr);
                self.write("]");
            }
        }
    }

    fn emit_prop_name_for_member(&mut self, name: &'a PropName<'a>) {
        match name {
            PropName::Computed(expr) => {
                self.write("[");
                self.emit_expr(expr);
                self.write("]");
            }
            other => self.emit_prop_name(other),
        }
    }

    fn push_member_scope_name(&mut self, name: &'a PropName<'a>) {
        match name {
            PropName::Ident(sym) => {
                let text = self.text_of(*sym).to_string();
                self.push_scope_name(&text);
            }
            PropName::Str { value, .. } => {
                let label = format!("[\"{}\"]", value);
                self.push_scope_name(&label);
            }
            PropName::Num(text) => {
                let label = format!("[{}]", text);
                self.push_scope_name(&label);
            }
            PropName::Computed(_) => self.push_scope_name("[computed]"),
        }
    }
}

// ─── Free helpers ───────────────────────────────────────────────────────

pub(crate) fn find_constructor<'a>(
    class: &'a ClassLike<'a>,
) -> Option<(&'a ClassMember<'a>, &'a Func<'a>)> {
    find_constructor_member(class)
}

fn find_constructor_member<'a>(
    class: &'a ClassLike<'a>,
) -> Option<(&'a ClassMember<'a>, &'a Func<'a>)> {
    class.members.iter().find_map(|member| match &member.kind {
        MemberKind::Constructor(func) if func.body.is_some() => Some((member, func)),
        _ => None,
    })
}

pub(crate) fn static_initialized_properties<'a>(
    class: &'a ClassLike<'a>,
) -> Vec<&'a ClassMember<'a>> {
    class
        .members
        .iter()
        .filter(|m| {
            m.is_static()
                && matches!(
                    m.kind,
                    MemberKind::Property {
                        init: Some(_),
                        ..
                    }
                )
        })
        .collect()
}

fn instance_initialized_properties<'a>(class: &'a ClassLike<'a>) -> Vec<&'a ClassMember<'a>> {
    class
        .members
        .iter()
        .filter(|m| {
            !m.is_static()
                && matches!(
                    m.kind,
                    MemberKind::Property {
                        init: Some(_),
                        ..
                    }
                )
        })
        .collect()
}

/// Splits an explicit constructor body at a leading `super(...)` call so
/// parameter properties and field initializers can slot in right after it.
fn split_super_call<'a>(
    func: &'a Func<'a>,
    has_base: bool,
) -> (Option<&'a Stmt<'a>>, &'a [&'a Stmt<'a>]) {
    let Some(downlevel_syntax::FuncBody::Block(block)) = &func.body else {
        return (None, &[]);
    };
    let StmtKind::Block(stmts) = &block.kind else {
        return (None, &[]);
    };
    if !has_base {
        return (None, stmts);
    }
    if let Some(&first) = stmts.first() {
        if let StmtKind::Expr(expr) = &first.kind {
            if let ExprKind::Call { callee, .. } = &expr.kind {
                if matches!(callee.kind, ExprKind::Super) {
                    return (Some(first), &stmts[1..]);
                }
            }
        }
    }
    (None, stmts)
}

/// Textual key of an accessor for pairing get/set; computed accessors
/// never pair.
fn accessor_key_text<'a>(em: &Emitter<'a>, member: &'a ClassMember<'a>) -> String {
    let name = member.name().expect("accessors are named");
    match name {
        PropName::Ident(sym) => em.text_of(*sym).to_string(),
        PropName::Str { value, .. } => value.clone(),
        PropName::Num(text) => text.clone(),
        PropName::Computed(_) => format!("<computed:{}>", member.id),
    }
}

/// Parameter decorators of a member's function, with parameter indexes.
pub(crate) fn member_param_decorators<'a>(
    member: &'a ClassMember<'a>,
) -> impl Iterator<Item = (usize, &'a downlevel_syntax::Decorator<'a>)> {
    let params: &'a [downlevel_syntax::ParamDecl<'a>] = match &member.kind {
        MemberKind::Constructor(func)
        | MemberKind::Method { func, .. }
        | MemberKind::SetAccessor { func, .. } => func.params,
        _ => &[],
    };
    params
        .iter()
        .enumerate()
        .flat_map(|(i, p)| p.decorators.iter().map(move |d| (i, d)))
}
