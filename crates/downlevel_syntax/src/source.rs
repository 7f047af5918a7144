//! Source files and line maps.
//!
//! A [`SourceFile`] bundles what the emitter needs per input: the statement
//! list, the original text (for comment and verbatim re-emission), the
//! line-start table backing line/column queries, and the set of identifier
//! texts appearing anywhere in the file — the collision universe for
//! generated names.

use std::collections::HashSet;

use downlevel_base::Symbol;

use crate::ast::{
    Binding, BindingPattern, Block, Expr, ExprKind, ForInit, Func, FuncBody, MemberKind,
    NamedBindings, ObjectMemberKind, PropName, Stmt, StmtKind, VarDeclList,
};

/// 0-based line and character of a position; source maps add 1 when
/// recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineAndCharacter {
    pub line: usize,
    pub character: usize,
}

/// One input file, checked and ready to emit.
#[derive(Debug)]
pub struct SourceFile<'a> {
    /// Path as the host named it.
    pub file_name: String,
    /// Full original text.
    pub text: String,
    pub stmts: Block<'a>,
    /// Every identifier text occurring in the file. Generated names must
    /// avoid this set.
    pub identifiers: HashSet<String>,
    /// Byte offset of each line's first character.
    pub line_starts: Vec<usize>,
    /// File participates in external-module emission (has imports/exports).
    pub external_module: bool,
}

impl<'a> SourceFile<'a> {
    /// Maps a byte offset to its 0-based line/character.
    pub fn line_and_character_of_pos(&self, pos: usize) -> LineAndCharacter {
        let line = match self.line_starts.binary_search(&pos) {
            Ok(line) => line,
            Err(insert) => insert - 1,
        };
        LineAndCharacter {
            line,
            character: pos - self.line_starts[line],
        }
    }

    /// 0-based line of a byte offset.
    pub fn line_of_pos(&self, pos: usize) -> usize {
        self.line_and_character_of_pos(pos).line
    }
}

/// Computes the byte offset of each line start. Recognizes `\n`, `\r`, and
/// `\r\n`; line 0 always starts at offset 0.
pub fn compute_line_starts(text: &str) -> Vec<usize> {
    let bytes = text.as_bytes();
    let mut starts = vec![0];
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\r' => {
                if i + 1 < bytes.len() && bytes[i + 1] == b'\n' {
                    i += 1;
                }
                starts.push(i + 1);
            }
            b'\n' => starts.push(i + 1),
            _ => {}
        }
        i += 1;
    }
    starts
}

/// Collects every identifier symbol in a statement list.
///
/// The factory resolves the symbols to text when it seals a
/// [`SourceFile`]; the resulting set is the uniqueness universe for
/// generated temporaries and aliases.
pub fn collect_identifiers(stmts: Block<'_>, out: &mut HashSet<Symbol>) {
    for stmt in stmts {
        collect_stmt(stmt, out);
    }
}

fn collect_binding(binding: &Binding<'_>, out: &mut HashSet<Symbol>) {
    match binding {
        Binding::Ident(sym) => {
            out.insert(*sym);
        }
        Binding::Pattern(pattern) => collect_pattern(pattern, out),
    }
}

fn collect_pattern(pattern: &BindingPattern<'_>, out: &mut HashSet<Symbol>) {
    for element in pattern.elements {
        if let Some(name) = &element.name {
            collect_binding(name, out);
        }
        if let Some(prop) = &element.property_name {
            collect_prop_name(prop, out);
        }
        if let Some(init) = element.init {
            collect_expr(init, out);
        }
    }
}

fn collect_prop_name(name: &PropName<'_>, out: &mut HashSet<Symbol>) {
    match name {
        PropName::Ident(sym) => {
            out.insert(*sym);
        }
        PropName::Computed(expr) => collect_expr(expr, out),
        PropName::Str { .. } | PropName::Num(_) => {}
    }
}

fn collect_func(func: &Func<'_>, out: &mut HashSet<Symbol>) {
    if let Some(name) = func.name {
        out.insert(name);
    }
    for param in func.params {
        collect_binding(&param.name, out);
        if let Some(init) = param.init {
            collect_expr(init, out);
        }
        for dec in param.decorators {
            collect_expr(dec.expr, out);
        }
    }
    match &func.body {
        Some(FuncBody::Block(block)) => collect_stmt(block, out),
        Some(FuncBody::Expr(expr)) => collect_expr(expr, out),
        None => {}
    }
}

fn collect_var_list(list: &VarDeclList<'_>, out: &mut HashSet<Symbol>) {
    for decl in list.decls {
        collect_binding(&decl.name, out);
        if let Some(init) = decl.init {
            collect_expr(init, out);
        }
    }
}

fn collect_for_init(init: &ForInit<'_>, out: &mut HashSet<Symbol>) {
    match init {
        ForInit::Var(list) => collect_var_list(list, out),
        ForInit::Expr(expr) => collect_expr(expr, out),
    }
}

fn collect_stmt(stmt: &Stmt<'_>, out: &mut HashSet<Symbol>) {
    match &stmt.kind {
        StmtKind::Block(stmts) => collect_identifiers(stmts, out),
        StmtKind::Var(list) => collect_var_list(list, out),
        StmtKind::Expr(expr)
        | StmtKind::Throw(expr)
        | StmtKind::ExportAssignment(expr)
        | StmtKind::ExportDefault(expr) => collect_expr(expr, out),
        StmtKind::If {
            cond,
            then_branch,
            else_branch,
        } => {
            collect_expr(cond, out);
            collect_stmt(then_branch, out);
            if let Some(else_branch) = else_branch {
                collect_stmt(else_branch, out);
            }
        }
        StmtKind::Do { body, cond } | StmtKind::While { cond, body } => {
            collect_expr(cond, out);
            collect_stmt(body, out);
        }
        StmtKind::For {
            init,
            cond,
            incr,
            body,
        } => {
            if let Some(init) = init {
                collect_for_init(init, out);
            }
            if let Some(cond) = cond {
                collect_expr(cond, out);
            }
            if let Some(incr) = incr {
                collect_expr(incr, out);
            }
            collect_stmt(body, out);
        }
        StmtKind::ForIn { init, expr, body } | StmtKind::ForOf { init, expr, body } => {
            collect_for_init(init, out);
            collect_expr(expr, out);
            collect_stmt(body, out);
        }
        StmtKind::Continue(label) | StmtKind::Break(label) => {
            if let Some(label) = label {
                out.insert(*label);
            }
        }
        StmtKind::Return(expr) => {
            if let Some(expr) = expr {
                collect_expr(expr, out);
            }
        }
        StmtKind::With { expr, body } => {
            collect_expr(expr, out);
            collect_stmt(body, out);
        }
        StmtKind::Switch { expr, cases } => {
            collect_expr(expr, out);
            for case in *cases {
                if let Some(test) = case.test {
                    collect_expr(test, out);
                }
                collect_identifiers(case.stmts, out);
            }
        }
        StmtKind::Labeled { label, body } => {
            out.insert(*label);
            collect_stmt(body, out);
        }
        StmtKind::Try {
            block,
            catch,
            finally,
        } => {
            collect_stmt(block, out);
            if let Some(catch) = catch {
                out.insert(catch.name);
                collect_stmt(catch.block, out);
            }
            if let Some(finally) = finally {
                collect_stmt(finally, out);
            }
        }
        StmtKind::Debugger | StmtKind::Empty => {}
        StmtKind::Function(func) => collect_func(func, out),
        StmtKind::Class(class) => collect_class(class, out),
        StmtKind::Enum(decl) => {
            out.insert(decl.name);
            for member in decl.members {
                collect_prop_name(&member.name, out);
                if let Some(init) = member.init {
                    collect_expr(init, out);
                }
            }
        }
        StmtKind::Module(decl) => {
            out.insert(decl.name);
            collect_identifiers(decl.body, out);
        }
        StmtKind::Import(decl) => {
            if let Some(default_binding) = decl.default_binding {
                out.insert(default_binding);
            }
            match &decl.bindings {
                Some(NamedBindings::Namespace(sym)) => {
                    out.insert(*sym);
                }
                Some(NamedBindings::Named(specifiers)) => {
                    for spec in *specifiers {
                        out.insert(spec.name);
                        if let Some(property) = spec.property {
                            out.insert(property);
                        }
                    }
                }
                None => {}
            }
        }
        StmtKind::ImportEquals(decl) => {
            out.insert(decl.name);
        }
        StmtKind::Export(decl) => {
            if let Some(specifiers) = decl.specifiers {
                for spec in specifiers {
                    out.insert(spec.name);
                    if let Some(property) = spec.property {
                        out.insert(property);
                    }
                }
            }
        }
    }
}

fn collect_class(class: &crate::ast::ClassLike<'_>, out: &mut HashSet<Symbol>) {
    if let Some(name) = class.name {
        out.insert(name);
    }
    if let Some(heritage) = class.heritage {
        collect_expr(heritage, out);
    }
    for dec in class.decorators {
        collect_expr(dec.expr, out);
    }
    for member in class.members {
        for dec in member.decorators {
            collect_expr(dec.expr, out);
        }
        if let Some(name) = member.name() {
            collect_prop_name(name, out);
        }
        match &member.kind {
            MemberKind::Constructor(func)
            | MemberKind::Method { func, .. }
            | MemberKind::GetAccessor { func, .. }
            | MemberKind::SetAccessor { func, .. } => collect_func(func, out),
            MemberKind::Property { init, .. } => {
                if let Some(init) = init {
                    collect_expr(init, out);
                }
            }
        }
    }
}

fn collect_expr(expr: &Expr<'_>, out: &mut HashSet<Symbol>) {
    match &expr.kind {
        ExprKind::Ident(sym) => {
            out.insert(*sym);
        }
        ExprKind::Template { spans, .. } => {
            for span in *spans {
                collect_expr(span.expr, out);
            }
        }
        ExprKind::TaggedTemplate { tag, spans, .. } => {
            collect_expr(tag, out);
            for span in *spans {
                collect_expr(span.expr, out);
            }
        }
        ExprKind::Array(elements) => {
            for element in *elements {
                collect_expr(element, out);
            }
        }
        ExprKind::Object(members) => {
            for member in *members {
                match &member.kind {
                    ObjectMemberKind::Prop { name, value } => {
                        collect_prop_name(name, out);
                        collect_expr(value, out);
                    }
                    ObjectMemberKind::Shorthand(sym) => {
                        out.insert(*sym);
                    }
                }
            }
        }
        ExprKind::PropAccess { target, name } => {
            collect_expr(target, out);
            out.insert(*name);
        }
        ExprKind::ElemAccess { target, index } => {
            collect_expr(target, out);
            collect_expr(index, out);
        }
        ExprKind::Call { callee, args } => {
            collect_expr(callee, out);
            for arg in *args {
                collect_expr(arg, out);
            }
        }
        ExprKind::New { callee, args } => {
            collect_expr(callee, out);
            if let Some(args) = args {
                for arg in *args {
                    collect_expr(arg, out);
                }
            }
        }
        ExprKind::Paren(inner)
        | ExprKind::TypeAssertion(inner)
        | ExprKind::Spread(inner)
        | ExprKind::Unary { operand: inner, .. }
        | ExprKind::Postfix { operand: inner, .. } => collect_expr(inner, out),
        ExprKind::Function(func) | ExprKind::Arrow(func) => collect_func(func, out),
        ExprKind::Class(class) => collect_class(class, out),
        ExprKind::Binary { left, right, .. } => {
            collect_expr(left, out);
            collect_expr(right, out);
        }
        ExprKind::Conditional {
            cond,
            when_true,
            when_false,
        } => {
            collect_expr(cond, out);
            collect_expr(when_true, out);
            collect_expr(when_false, out);
        }
        ExprKind::This
        | ExprKind::Super
        | ExprKind::NullLit
        | ExprKind::TrueLit
        | ExprKind::FalseLit
        | ExprKind::NumLit(_)
        | ExprKind::StrLit { .. }
        | ExprKind::RegexLit(_)
        | ExprKind::Omitted => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_starts_handle_all_break_kinds() {
        let starts = compute_line_starts("a\nb\r\nc\rd");
        assert_eq!(starts, vec![0, 2, 5, 7]);
    }

    #[test]
    fn line_starts_single_line() {
        assert_eq!(compute_line_starts("abc"), vec![0]);
    }

    #[test]
    fn line_and_character_round_trip() {
        let file = SourceFile {
            file_name: "a.ts".to_string(),
            text: "var x;\nvar y;\n".to_string(),
            stmts: &[],
            identifiers: HashSet::new(),
            line_starts: compute_line_starts("var x;\nvar y;\n"),
            external_module: false,
        };
        let lc = file.line_and_character_of_pos(11);
        assert_eq!(lc.line, 1);
        assert_eq!(lc.character, 4);
        assert_eq!(file.line_of_pos(0), 0);
    }
}
