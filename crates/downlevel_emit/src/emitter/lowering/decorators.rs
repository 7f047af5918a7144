//! Decorator lowering: trailing `__decorate` calls.
//!
//! Each decorated member produces one call after its definition:
//!
//! ```text
//! __decorate([dec, __param(0, pdec), __metadata("design:type", ...)],
//!            C.prototype, "m", Object.getOwnPropertyDescriptor(C.prototype, "m"));
//! ```
//!
//! Of an accessor pair only the first carries decorators, and parameter
//! decorators come from the `set` accessor. A decorated class gains a
//! trailing reassignment `C = __decorate([...], C);` so the decorator's
//! return value replaces the binding.

use downlevel_syntax::{ClassLike, ClassMember, MemberKind, NodeId, PropName};

use super::classes::member_param_decorators;
use crate::emitter::Emitter;

impl<'a> Emitter<'a> {
    /// Member `__decorate` calls, in member order, inside the class scope
    /// (the ES5 IIFE) or after the declaration (ES6).
    pub(crate) fn emit_member_decorator_calls(&mut self, class: &'a ClassLike<'a>, name: &str) {
        let mut seen_accessors: Vec<String> = Vec::new();
        for member in class.members {
            if matches!(member.kind, MemberKind::Constructor(_)) {
                continue;
            }
            let is_accessor = matches!(
                member.kind,
                MemberKind::GetAccessor { .. } | MemberKind::SetAccessor { .. }
            );
            let key = decorate_key(self, member);
            if is_accessor {
                if seen_accessors.contains(&key) {
                    // Only the first accessor of a pair is decorated.
                    continue;
                }
                seen_accessors.push(key.clone());
            }
            let param_decorators: Vec<_> = if is_accessor {
                self.set_accessor_param_decorators(class, member)
            } else {
                member_param_decorators(member).collect()
            };
            if member.decorators.is_empty() && param_decorators.is_empty() {
                continue;
            }
            self.write_line();
            self.write("__decorate([");
            let mut wrote = false;
            for decorator in member.decorators {
                if wrote {
                    self.write(", ");
                }
                self.emit_operand_with_min_precedence(decorator.expr, 3);
                wrote = true;
            }
            for (index, decorator) in &param_decorators {
                if wrote {
                    self.write(", ");
                }
                self.write(&format!("__param({}, ", index));
                self.emit_operand_with_min_precedence(decorator.expr, 3);
                self.write(")");
                wrote = true;
            }
            self.emit_member_metadata(member, wrote);
            self.write("], ");
            self.write_member_container(name, member);
            self.write(", ");
            self.write_decorate_key(member);
            match member.kind {
                MemberKind::Property { .. } => self.write(", void 0);"),
                _ => {
                    self.write(", Object.getOwnPropertyDescriptor(");
                    self.write_member_container(name, member);
                    self.write(", ");
                    self.write_decorate_key(member);
                    self.write("));");
                }
            }
        }
    }

    /// The trailing class reassignment:
    /// `C = __decorate([dec, __param(...), __metadata(...)], C);`
    pub(crate) fn emit_class_decorate_call(
        &mut self,
        node: NodeId,
        class: &'a ClassLike<'a>,
        name: &str,
    ) {
        self.write_line();
        self.write(name);
        self.write(" = __decorate([");
        let mut wrote = false;
        for decorator in class.decorators {
            if wrote {
                self.write(", ");
            }
            self.emit_operand_with_min_precedence(decorator.expr, 3);
            wrote = true;
        }
        let ctor_param_decorators: Vec<_> = class
            .members
            .iter()
            .filter(|m| matches!(m.kind, MemberKind::Constructor(_)))
            .flat_map(member_param_decorators)
            .collect();
        for (index, decorator) in ctor_param_decorators {
            if wrote {
                self.write(", ");
            }
            self.write(&format!("__param({}, ", index));
            self.emit_operand_with_min_precedence(decorator.expr, 3);
            self.write(")");
            wrote = true;
        }
        if self.options.emit_decorator_metadata {
            if wrote {
                self.write(", ");
            }
            let types = self.resolver.serialize_parameter_types_of_node(node);
            self.write("__metadata(\"design:paramtypes\", [");
            self.write(&types.join(", "));
            self.write("])");
        }
        self.write("], ");
        self.write(name);
        self.write(");");
    }

    fn emit_member_metadata(&mut self, member: &'a ClassMember<'a>, mut wrote: bool) {
        if !self.options.emit_decorator_metadata {
            return;
        }
        let design_type = self.resolver.serialize_type_of_node(member.id);
        if wrote {
            self.write(", ");
        }
        self.write("__metadata(\"design:type\", ");
        self.write(&design_type);
        self.write(")");
        wrote = true;
        let _ = wrote;
        match member.kind {
            MemberKind::Method { .. } | MemberKind::SetAccessor { .. } => {
                let types = self.resolver.serialize_parameter_types_of_node(member.id);
                self.write(", __metadata(\"design:paramtypes\", [");
                self.write(&types.join(", "));
                self.write("])");
            }
            _ => {}
        }
        if matches!(member.kind, MemberKind::Method { .. }) {
            let ret = self.resolver.serialize_return_type_of_node(member.id);
            self.write(", __metadata(\"design:returntype\", ");
            self.write(&ret);
            self.write(")");
        }
    }

    /// Parameter decorators apply to the `set` accessor of a pair,
    /// whichever accessor is being decorated.
    fn set_accessor_param_decorators(
        &self,
        class: &'a ClassLike<'a>,
        member: &'a ClassMember<'a>,
    ) -> Vec<(usize, &'a downlevel_syntax::Decorator<'a>)> {
        let key = decorate_key(self, member);
        class
            .members
            .iter()
            .filter(|m| {
                matches!(m.kind, MemberKind::SetAccessor { .. })
                    && m.is_static() == member.is_static()
                    && decorate_key(self, m) == key
            })
            .flat_map(member_param_decorators)
            .collect()
    }

    /// The key argument of `__decorate`: a string literal, or the
    /// captured temporary of a computed name (capturing here if the name
    /// had no earlier emission site).
    fn write_decorate_key(&mut self, member: &'a ClassMember<'a>) {
        let name = member.name().expect("decorated members are named");
        match name {
            PropName::Ident(sym) => {
                let text = self.text_of(*sym).to_string();
                let quoted = super::super::escape_string(&text);
                self.write(&quoted);
            }
            PropName::Str {
                value,
                single_quote,
            } => {
                let quoted = super::super::quote_string(value, *single_quote);
                self.write(&quoted);
            }
            PropName::Num(text) => {
                let quoted = super::super::escape_string(&text.clone());
                self.write(&quoted);
            }
            PropName::Computed(expr) => {
                if let Some(temp) = self.computed_prop_temps.get(&expr.id) {
                    let temp = temp.clone();
                    self.write(&temp);
                } else {
                    let temp = self.new_temp_variable(crate::names::TempHint::Auto);
                    self.computed_prop_temps.insert(expr.id, temp.clone());
                    self.write(&temp);
                    self.write(" = ");
                    self.emit_expr(expr);
                }
            }
        }
    }
}

/// Stable pairing key, mirroring the accessor grouping in class emission.
fn decorate_key<'a>(em: &Emitter<'a>, member: &'a ClassMember<'a>) -> String {
    match member.name() {
        Some(PropName::Ident(sym)) => em.text_of(*sym).to_string(),
        Some(PropName::Str { value, .. }) => value.clone(),
        Some(PropName::Num(text)) => text.clone(),
        Some(PropName::Computed(expr)) => format!("<computed:{}>", expr.id),
        None => String::new(),
    }
}
