//! E2E emission: decorator lowering and design-type metadata.

mod common;

use pretty_assertions::assert_eq;
use common::{emit_resolved, emit_with, es5, es6, lines, TestResolver};
use downlevel_emit::CompilerOptions;
use downlevel_syntax::NodeFlags;

fn es5_with_metadata() -> CompilerOptions {
    CompilerOptions {
        emit_decorator_metadata: true,
        ..es5()
    }
}

#[test]
fn decorated_class_reassigns_through_decorate() {
    let out = emit_resolved(es5_with_metadata(), "", |f| {
        let dec = f.ident("dec");
        let decorator = f.decorator(dec);
        let class = f.decorated_class_decl(Some("C"), None, vec![], vec![decorator]);
        (vec![class], TestResolver::default())
    });
    assert!(out.contains("var __decorate = this.__decorate ||"));
    assert!(out.contains("var __metadata = this.__metadata ||"));
    assert!(out.ends_with(&lines(&[
        "var C = (function () {",
        "    function C() {",
        "    }",
        "    return C;",
        "})();",
        "C = __decorate([dec, __metadata(\"design:paramtypes\", [])], C);",
    ])));
}

#[test]
fn method_decorator_passes_descriptor() {
    let out = emit_with(es5(), |f| {
        let dec = f.ident("dec");
        let decorator = f.decorator(dec);
        let method = f.method("m", vec![], vec![]);
        let member = f.decorated_member(
            NodeFlags::NONE,
            vec![decorator],
            method.kind,
        );
        vec![f.class_decl(Some("C"), None, vec![member])]
    });
    assert!(out.contains(
        "__decorate([dec], C.prototype, \"m\", Object.getOwnPropertyDescriptor(C.prototype, \"m\"));"
    ));
}

#[test]
fn property_decorator_passes_void_0() {
    let out = emit_with(es5(), |f| {
        let dec = f.ident("dec");
        let decorator = f.decorator(dec);
        let property = f.property("p", None);
        let member = f.decorated_member(NodeFlags::NONE, vec![decorator], property.kind);
        vec![f.class_decl(Some("C"), None, vec![member])]
    });
    assert!(out.contains("__decorate([dec], C.prototype, \"p\", void 0);"));
}

#[test]
fn parameter_decorators_wrap_in_param() {
    let out = emit_with(es5(), |f| {
        let pdec = f.ident("pdec");
        let decorator = f.decorator(pdec);
        let x = f.decorated_param(vec![decorator], "x");
        let method = f.method("m", vec![x], vec![]);
        vec![f.class_decl(Some("C"), None, vec![method])]
    });
    assert!(out.contains("var __param = this.__param ||"));
    assert!(out.contains(
        "__decorate([__param(0, pdec)], C.prototype, \"m\", Object.getOwnPropertyDescriptor(C.prototype, \"m\"));"
    ));
}

#[test]
fn only_first_accessor_of_a_pair_decorates() {
    let out = emit_with(es5(), |f| {
        let dec = f.ident("dec");
        let decorator = f.decorator(dec);
        let getter = f.getter("x", vec![]);
        let decorated_getter =
            f.decorated_member(NodeFlags::NONE, vec![decorator], getter.kind);
        let pdec = f.ident("pdec");
        let p_decorator = f.decorator(pdec);
        let v = f.decorated_param(vec![p_decorator], "v");
        let name = f.prop_name("x");
        let func = f.func(None, vec![v], vec![]);
        let setter = f.member(
            NodeFlags::NONE,
            downlevel_syntax::MemberKind::SetAccessor { name, func },
        );
        vec![f.class_decl(Some("C"), None, vec![decorated_getter, setter])]
    });
    let count = out.matches("__decorate(").count();
    assert_eq!(count, 1, "accessor pair must decorate once:\n{}", out);
    // Parameter decorators come from the set accessor.
    assert!(out.contains("__decorate([dec, __param(0, pdec)], C.prototype, \"x\","));
}

#[test]
fn metadata_entries_use_resolver_serializations() {
    let out = emit_resolved(es5_with_metadata(), "", |f| {
        let dec = f.ident("dec");
        let decorator = f.decorator(dec);
        let x = f.param("x");
        let method = f.method("m", vec![x], vec![]);
        let member = f.decorated_member(NodeFlags::NONE, vec![decorator], method.kind);
        let member_id = member.id;
        let class = f.class_decl(Some("C"), None, vec![member]);
        let mut resolver = TestResolver::default();
        resolver.types.insert(member_id, "Function".to_string());
        resolver
            .param_types
            .insert(member_id, vec!["Number".to_string()]);
        resolver
            .return_types
            .insert(member_id, "String".to_string());
        (vec![class], resolver)
    });
    assert!(out.contains(
        "__decorate([dec, __metadata(\"design:type\", Function), __metadata(\"design:paramtypes\", [Number]), __metadata(\"design:returntype\", String)], C.prototype, \"m\","
    ));
}

#[test]
fn es6_decorated_class_preserves_runtime_name() {
    let out = emit_with(es6(), |f| {
        let dec = f.ident("dec");
        let decorator = f.decorator(dec);
        let class = f.decorated_class_decl(Some("C"), None, vec![], vec![decorator]);
        vec![class]
    });
    assert_eq!(
        out,
        lines(&[
            "var __decorate = this.__decorate || (typeof Reflect === \"object\" && Reflect.decorate) || function (decorators, target, key, desc) {",
            "    switch (arguments.length) {",
            "        case 2: return decorators.reduceRight(function (o, d) { return (d && d(o)) || o; }, target);",
            "        case 3: return decorators.reduceRight(function (o, d) { return (d && d(target, key)), void 0; }, void 0);",
            "        case 4: return decorators.reduceRight(function (o, d) { return (d && d(target, key, o)) || o; }, desc);",
            "    }",
            "};",
            "let C = class {",
            "};",
            "Object.defineProperty(C, \"name\", { value: \"C\", configurable: true });",
            "C = __decorate([dec], C);",
        ])
    );
}

#[test]
fn constructor_parameter_decorators_attach_to_the_class() {
    let out = emit_with(es5(), |f| {
        let pdec = f.ident("pdec");
        let decorator = f.decorator(pdec);
        let x = f.decorated_param(vec![decorator], "x");
        let ctor = f.ctor(vec![x], vec![]);
        vec![f.class_decl(Some("C"), None, vec![ctor])]
    });
    assert!(out.contains("C = __decorate([__param(0, pdec)], C);"));
}
