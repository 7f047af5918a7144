//! E2E emission: `for-of` lowering to the array-index loop.

mod common;

use pretty_assertions::assert_eq;
use common::{emit_with, es5, es6, lines};

#[test]
fn for_of_lowers_to_index_loop() {
    let out = emit_with(es5(), |f| {
        let ten = f.num("10");
        let twenty = f.num("20");
        let array = f.array(vec![ten, twenty]);
        let log = f.ident("log");
        let v = f.ident("v");
        let call = f.call(log, vec![v]);
        let body = f.expr_stmt(call);
        vec![f.for_of_let("v", array, body)]
    });
    assert_eq!(
        out,
        lines(&[
            "for (var _i = 0, _a = [10, 20]; _i < _a.length; _i++) {",
            "    var v = _a[_i];",
            "    log(v);",
            "}",
        ])
    );
}

#[test]
fn identifier_iterable_elides_the_capture() {
    let out = emit_with(es5(), |f| {
        let xs = f.ident("xs");
        let log = f.ident("log");
        let v = f.ident("v");
        let call = f.call(log, vec![v]);
        let body = f.expr_stmt(call);
        vec![f.for_of_let("v", xs, body)]
    });
    assert_eq!(
        out,
        lines(&[
            "for (var _i = 0; _i < xs.length; _i++) {",
            "    var v = xs[_i];",
            "    log(v);",
        "}",
        ])
    );
}

#[test]
fn destructuring_binding_reemits_inside_the_body() {
    let out = emit_with(es5(), |f| {
        let a = f.binding_element("a", None);
        let b = f.binding_element("b", None);
        let pattern = f.array_pattern(vec![a, b]);
        let decl = f.pattern_var_decl(pattern, None);
        let list = f.var_list(downlevel_syntax::NodeFlags::LET, vec![decl]);
        let pairs = f.ident("pairs");
        let use_fn = f.ident("use");
        let a_ref = f.ident("a");
        let b_ref = f.ident("b");
        let call = f.call(use_fn, vec![a_ref, b_ref]);
        let body = f.expr_stmt(call);
        vec![f.for_of(downlevel_syntax::ForInit::Var(list), pairs, body)]
    });
    assert_eq!(
        out,
        lines(&[
            "for (var _i = 0; _i < pairs.length; _i++) {",
            "    var _a = pairs[_i], a = _a[0], b = _a[1];",
            "    use(a, b);",
            "}",
        ])
    );
}

#[test]
fn block_bodies_fold_into_the_loop_braces() {
    let out = emit_with(es5(), |f| {
        let xs = f.ident("xs");
        let log = f.ident("log");
        let v = f.ident("v");
        let call = f.call(log, vec![v]);
        let body = {
            let stmt = f.expr_stmt(call);
            f.block(vec![stmt])
        };
        vec![f.for_of_let("v", xs, body)]
    });
    assert_eq!(
        out,
        lines(&[
            "for (var _i = 0; _i < xs.length; _i++) {",
            "    var v = xs[_i];",
            "    log(v);",
            "}",
        ])
    );
}

#[test]
fn sibling_loops_advance_the_temp_cycle() {
    let out = emit_with(es5(), |f| {
        let get1 = f.ident("f");
        let call1 = f.call(get1, vec![]);
        let body1 = f.block(vec![]);
        let loop1 = f.for_of_let("v", call1, body1);

        let get2 = f.ident("g");
        let call2 = f.call(get2, vec![]);
        let body2 = f.block(vec![]);
        let loop2 = f.for_of_let("w", call2, body2);
        vec![loop1, loop2]
    });
    assert!(out.contains("for (var _i = 0, _a = f(); _i < _a.length; _i++)"));
    // The reserved `_i` is taken, so the second loop cycles on.
    assert!(out.contains("for (var _b = 0, _c = g(); _b < _c.length; _b++)"));
}

#[test]
fn function_scopes_reset_the_temp_cycle() {
    let out = emit_with(es5(), |f| {
        let get1 = f.ident("g");
        let call1 = f.call(get1, vec![]);
        let body1 = f.block(vec![]);
        let loop1 = f.for_of_let("v", call1, body1);
        let first = f.func_decl("one", vec![], vec![loop1]);

        let get2 = f.ident("g");
        let call2 = f.call(get2, vec![]);
        let body2 = f.block(vec![]);
        let loop2 = f.for_of_let("v", call2, body2);
        let second = f.func_decl("two", vec![], vec![loop2]);
        vec![first, second]
    });
    // Both function bodies reuse the same temp names; the saved counter
    // restores at each body exit.
    let occurrences = out.matches("for (var _i = 0, _a = g(); _i < _a.length; _i++)").count();
    assert_eq!(occurrences, 2);
}

#[test]
fn es6_for_of_emits_verbatim() {
    let out = emit_with(es6(), |f| {
        let xs = f.ident("xs");
        let log = f.ident("log");
        let v = f.ident("v");
        let call = f.call(log, vec![v]);
        let body = {
            let stmt = f.expr_stmt(call);
            f.block(vec![stmt])
        };
        vec![f.for_of_let("v", xs, body)]
    });
    assert_eq!(
        out,
        lines(&["for (let v of xs) {", "    log(v);", "}"])
    );
}
