//! Enum and namespace lowering.
//!
//! Both become the capture-or-create IIFE:
//!
//! ```text
//! var E;
//! (function (E) {
//!     E[E["A"] = 0] = "A";
//! })(E || (E = {}));
//! ```
//!
//! The IIFE parameter is the declaration's own identifier unless its body
//! (or an earlier generated name) shadows it, in which case a suffixed
//! alias stands in. Const enums erase entirely unless
//! `preserveConstEnums` keeps their bodies; their member references were
//! already folded to constants at use sites.

use downlevel_syntax::{EnumDecl, ModuleDecl, NodeFlags, PropName, Stmt, StmtKind};

use super::super::{escape_string, format_constant};
use crate::emitter::context::ModuleFrame;
use crate::emitter::Emitter;

impl<'a> Emitter<'a> {
    pub(crate) fn emit_enum_declaration(&mut self, node: &'a Stmt<'a>, decl: &'a EnumDecl<'a>) {
        if node.flags.contains(NodeFlags::AMBIENT) {
            return;
        }
        if node.flags.contains(NodeFlags::CONST) && !self.options.preserve_const_enums {
            return;
        }
        let own = self.text_of(decl.name).to_string();
        let param = self.module_like_name(node.id, &own, false);
        self.push_scope_name(&own);

        self.emit_container_var(node, &own);
        self.write("(function (");
        self.write(&param);
        self.write(") {");
        self.increase_indent();

        let mut next_auto: Option<f64> = Some(0.0);
        for member in decl.members {
            let member_name = enum_member_name_text(self, &member.name);
            let quoted = escape_string(&member_name);
            self.write_line();
            self.record_start(member.span);
            self.write(&param);
            self.write("[");
            self.write(&param);
            self.write("[");
            self.write(&quoted);
            self.write("] = ");
            match member.init {
                Some(init) => match self.resolver.get_constant_value(member.id) {
                    Some(value) => {
                        let rendered = format_constant(value);
                        self.write(&rendered);
                        next_auto = Some(value + 1.0);
                    }
                    None => {
                        self.emit_operand_with_min_precedence(init, 3);
                        next_auto = None;
                    }
                },
                None => {
                    let value = next_auto
                        .expect("auto-numbered member after a computed member");
                    let rendered = format_constant(value);
                    self.write(&rendered);
                    next_auto = Some(value + 1.0);
                }
            }
            self.write("] = ");
            self.write(&quoted);
            self.write(";");
            self.record_end(member.span);
        }

        self.decrease_indent();
        self.write_line();
        self.write("})(");
        self.write(&own);
        self.write(" || (");
        self.write(&own);
        self.write(" = {}));");
        self.pop_scope_name();
        self.emit_export_assignments_for_declaration(node, Some(decl.name), &own);
    }

    pub(crate) fn emit_module_declaration(&mut self, node: &'a Stmt<'a>, decl: &'a ModuleDecl<'a>) {
        if node.flags.contains(NodeFlags::AMBIENT) {
            return;
        }
        let own = self.text_of(decl.name).to_string();
        let shadowed = body_declares_name(self, decl.body, decl.name);
        let param = self.module_like_name(node.id, &own, shadowed);
        self.push_scope_name(&own);

        self.emit_container_var(node, &own);
        self.write("(function (");
        self.write(&param);
        self.write(") {");
        self.increase_indent();

        let saved = self.start_lexical_environment();
        let saved_depth = std::mem::replace(&mut self.nested_block_depth, 0);
        let saved_root = std::mem::replace(&mut self.in_module_root, false);
        self.module_stack.push(ModuleFrame {
            local: param.clone(),
        });

        self.emit_lines(decl.body);
        self.flush_temp_declarations();

        self.module_stack.pop();
        self.nested_block_depth = saved_depth;
        self.in_module_root = saved_root;
        self.end_lexical_environment(saved);

        self.decrease_indent();
        self.write_line();
        self.write("})(");
        self.write(&own);
        self.write(" || (");
        self.write(&own);
        self.write(" = {}));");
        self.pop_scope_name();
        self.emit_export_assignments_for_declaration(node, Some(decl.name), &own);
    }

    /// The `var E;` binding ahead of the IIFE. Inside a namespace the
    /// binding also attaches to the container so sibling namespaces merge.
    fn emit_container_var(&mut self, node: &'a Stmt<'a>, own: &str) {
        // Under the System envelope the name is hoisted into the
        // registrar prologue.
        if self.in_module_root && self.export_fn.is_some() {
            return;
        }
        if node.is_exported()
            && self.in_module_root
            && !self.options.is_downlevel()
            && self.options.module == crate::options::ModuleKind::None
        {
            self.write("export ");
        }
        self.write("var ");
        self.write(own);
        self.write(";");
        self.write_line();
    }
}

fn enum_member_name_text<'a>(em: &Emitter<'a>, name: &'a PropName<'a>) -> String {
    match name {
        PropName::Ident(sym) => em.text_of(*sym).to_string(),
        PropName::Str { value, .. } => value.clone(),
        PropName::Num(text) => text.clone(),
        PropName::Computed(_) => {
            unreachable!("enum member names are constant")
        }
    }
}

/// Does the body declare `name` itself? If so the IIFE parameter must be
/// an alias.
fn body_declares_name<'a>(
    em: &Emitter<'a>,
    body: &'a [&'a Stmt<'a>],
    name: downlevel_base::Symbol,
) -> bool {
    let _ = em;
    body.iter().any(|stmt| match &stmt.kind {
        StmtKind::Function(func) => func.name == Some(name),
        StmtKind::Class(class) => class.name == Some(name),
        StmtKind::Enum(decl) => decl.name == name,
        StmtKind::Module(decl) => decl.name == name,
        StmtKind::Var(list) => list.decls.iter().any(|d| match &d.name {
            downlevel_syntax::Binding::Ident(sym) => *sym == name,
            downlevel_syntax::Binding::Pattern(_) => false,
        }),
        _ => false,
    })
}
