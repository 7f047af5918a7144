//! E2E emission: enum and namespace lowering, const-enum folding.

mod common;

use pretty_assertions::assert_eq;
use common::{emit_resolved, emit_with, es5, lines, TestResolver};
use downlevel_emit::CompilerOptions;
use downlevel_syntax::NodeFlags;

#[test]
fn enum_members_get_reverse_mappings() {
    let out = emit_resolved(es5(), "", |f| {
        let red = f.enum_member("Red", None);
        let five = f.num("5");
        let green = f.enum_member("Green", Some(five));
        let green_id = green.id;
        let blue = f.enum_member("Blue", None);
        let decl = f.enum_decl(NodeFlags::NONE, "Color", vec![red, green, blue]);
        let mut resolver = TestResolver::default();
        resolver.constants.insert(green_id, 5.0);
        (vec![decl], resolver)
    });
    assert_eq!(
        out,
        lines(&[
            "var Color;",
            "(function (Color) {",
            "    Color[Color[\"Red\"] = 0] = \"Red\";",
            "    Color[Color[\"Green\"] = 5] = \"Green\";",
            "    Color[Color[\"Blue\"] = 6] = \"Blue\";",
            "})(Color || (Color = {}));",
        ])
    );
}

#[test]
fn const_enum_erases_and_references_fold() {
    let out = emit_resolved(es5(), "", |f| {
        let red = f.enum_member("Red", None);
        let decl = f.enum_decl(NodeFlags::CONST, "Color", vec![red]);
        let color = f.ident("Color");
        let reference = f.prop_access(color, "Red");
        let ref_id = reference.id;
        let use_stmt = f.var_stmt("c", Some(reference));
        let mut resolver = TestResolver::default();
        resolver.constants.insert(ref_id, 0.0);
        (vec![decl, use_stmt], resolver)
    });
    assert_eq!(out, "var c = 0 /* Red */;\n");
}

#[test]
fn preserve_const_enums_keeps_the_body() {
    let options = CompilerOptions {
        preserve_const_enums: true,
        ..es5()
    };
    let out = emit_resolved(options, "", |f| {
        let red = f.enum_member("Red", None);
        let decl = f.enum_decl(NodeFlags::CONST, "Color", vec![red]);
        (vec![decl], TestResolver::default())
    });
    assert!(out.contains("Color[Color[\"Red\"] = 0] = \"Red\";"));
}

#[test]
fn separate_compilation_blocks_constant_folding() {
    let options = CompilerOptions {
        separate_compilation: true,
        ..es5()
    };
    let out = emit_resolved(options, "", |f| {
        let red = f.enum_member("Red", None);
        let decl = f.enum_decl(NodeFlags::NONE, "Color", vec![red]);
        let color = f.ident("Color");
        let reference = f.prop_access(color, "Red");
        let ref_id = reference.id;
        let use_stmt = f.var_stmt("c", Some(reference));
        let mut resolver = TestResolver::default();
        resolver.constants.insert(ref_id, 0.0);
        (vec![decl, use_stmt], resolver)
    });
    assert!(out.contains("var c = Color.Red;"));
}

#[test]
fn ambient_declarations_emit_nothing() {
    let out = emit_with(es5(), |f| {
        let red = f.enum_member("Red", None);
        let decl = f.enum_decl(NodeFlags::AMBIENT, "Color", vec![red]);
        let module = f.module_decl(NodeFlags::AMBIENT, "M", vec![]);
        vec![decl, module]
    });
    assert_eq!(out, "");
}

#[test]
fn namespace_members_attach_to_the_local() {
    let out = emit_with(es5(), |f| {
        let one = f.num("1");
        let version = {
            let decl = f.var_decl("version", Some(one));
            let list = f.var_list(NodeFlags::NONE, vec![decl]);
            f.stmt_flagged(NodeFlags::EXPORT, downlevel_syntax::StmtKind::Var(list))
        };
        let helper = f.func_decl("helper", vec![], vec![]);
        let m_ref = f.ident("M");
        let v_ref = f.prop_access(m_ref, "version");
        let ret = f.ret(Some(v_ref));
        let get_fn = {
            let func = f.func(Some("get"), vec![], vec![ret]);
            f.stmt_flagged(NodeFlags::EXPORT, downlevel_syntax::StmtKind::Function(func))
        };
        vec![f.module_decl(NodeFlags::NONE, "M", vec![version, helper, get_fn])]
    });
    assert_eq!(
        out,
        lines(&[
            "var M;",
            "(function (M) {",
            "    M.version = 1;",
            "    function helper() {",
            "    }",
            "    function get() {",
            "        return M.version;",
            "    }",
            "    M.get = get;",
            "})(M || (M = {}));",
        ])
    );
}

#[test]
fn shadowed_namespace_name_gets_an_alias_parameter() {
    let out = emit_with(es5(), |f| {
        let zero = f.num("0");
        let shadow = f.var_stmt("M", Some(zero));
        let one = f.num("1");
        let exported = {
            let decl = f.var_decl("x", Some(one));
            let list = f.var_list(NodeFlags::NONE, vec![decl]);
            f.stmt_flagged(NodeFlags::EXPORT, downlevel_syntax::StmtKind::Var(list))
        };
        vec![f.module_decl(NodeFlags::NONE, "M", vec![exported, shadow])]
    });
    assert_eq!(
        out,
        lines(&[
            "var M;",
            "(function (M_1) {",
            "    M_1.x = 1;",
            "    var M = 0;",
            "})(M || (M = {}));",
        ])
    );
}

#[test]
fn exported_enum_inside_namespace_reattaches() {
    let out = emit_with(es5(), |f| {
        let a = f.enum_member("A", None);
        let e = f.enum_decl(NodeFlags::EXPORT, "E", vec![a]);
        vec![f.module_decl(NodeFlags::NONE, "M", vec![e])]
    });
    assert_eq!(
        out,
        lines(&[
            "var M;",
            "(function (M) {",
            "    var E;",
            "    (function (E) {",
            "        E[E[\"A\"] = 0] = \"A\";",
            "    })(E || (E = {}));",
            "    M.E = E;",
            "})(M || (M = {}));",
        ])
    );
}

#[test]
fn nested_namespaces_chain_assignments() {
    let out = emit_with(es5(), |f| {
        let one = f.num("1");
        let inner_var = {
            let decl = f.var_decl("x", Some(one));
            let list = f.var_list(NodeFlags::NONE, vec![decl]);
            f.stmt_flagged(NodeFlags::EXPORT, downlevel_syntax::StmtKind::Var(list))
        };
        let inner = f.module_decl(NodeFlags::EXPORT, "Inner", vec![inner_var]);
        vec![f.module_decl(NodeFlags::NONE, "Outer", vec![inner])]
    });
    assert_eq!(
        out,
        lines(&[
            "var Outer;",
            "(function (Outer) {",
            "    var Inner;",
            "    (function (Inner) {",
            "        Inner.x = 1;",
            "    })(Inner || (Inner = {}));",
            "    Outer.Inner = Inner;",
            "})(Outer || (Outer = {}));",
        ])
    );
}
