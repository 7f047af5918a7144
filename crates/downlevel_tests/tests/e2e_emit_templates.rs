//! E2E emission: template literal lowering.

mod common;

use pretty_assertions::assert_eq;
use common::{emit_with, es5, es6, lines};
use downlevel_syntax::{BinOp, TemplateSpan};

#[test]
fn interpolation_concatenates_with_parens_around_additive() {
    let out = emit_with(es5(), |f| {
        let n = f.ident("n");
        let one = f.num("1");
        let sum = f.binary(BinOp::Add, n, one);
        let head = f.template_part("x=", "x=");
        let tail = f.template_part("", "");
        let template = f.template(head, vec![TemplateSpan { expr: sum, literal: tail }]);
        vec![f.var_stmt("s", Some(template))]
    });
    assert_eq!(out, "var s = \"x=\" + (n + 1);\n");
}

#[test]
fn multiplicative_interpolations_skip_parens() {
    let out = emit_with(es5(), |f| {
        let a = f.ident("a");
        let b = f.ident("b");
        let product = f.binary(BinOp::Mul, a, b);
        let head = f.template_part("v=", "v=");
        let tail = f.template_part("", "");
        let template = f.template(head, vec![TemplateSpan { expr: product, literal: tail }]);
        vec![f.var_stmt("s", Some(template))]
    });
    assert_eq!(out, "var s = \"v=\" + a * b;\n");
}

#[test]
fn bare_interpolations_force_string_conversion() {
    let out = emit_with(es5(), |f| {
        let a = f.ident("a");
        let b = f.ident("b");
        let head = f.template_part("", "");
        let mid = f.template_part("", "");
        let tail = f.template_part("", "");
        let template = f.template(
            head,
            vec![
                TemplateSpan { expr: a, literal: mid },
                TemplateSpan { expr: b, literal: tail },
            ],
        );
        vec![f.var_stmt("s", Some(template))]
    });
    assert_eq!(out, "var s = \"\" + a + b;\n");
}

#[test]
fn nonempty_first_literal_carries_the_conversion() {
    let out = emit_with(es5(), |f| {
        let a = f.ident("a");
        let head = f.template_part("", "");
        let tail = f.template_part("end", "end");
        let template = f.template(head, vec![TemplateSpan { expr: a, literal: tail }]);
        vec![f.var_stmt("s", Some(template))]
    });
    assert_eq!(out, "var s = a + \"end\";\n");
}

#[test]
fn conditional_interpolations_are_parenthesized() {
    let out = emit_with(es5(), |f| {
        let a = f.ident("a");
        let b = f.ident("b");
        let c = f.ident("c");
        let cond = f.cond_expr(a, b, c);
        let head = f.template_part("", "");
        let tail = f.template_part("", "");
        let template = f.template(head, vec![TemplateSpan { expr: cond, literal: tail }]);
        vec![f.var_stmt("s", Some(template))]
    });
    assert_eq!(out, "var s = \"\" + (a ? b : c);\n");
}

#[test]
fn tagged_template_captures_cooked_and_raw() {
    let out = emit_with(es5(), |f| {
        let tag = f.ident("t");
        let n = f.ident("n");
        let one = f.num("1");
        let sum = f.binary(BinOp::Add, n, one);
        let head = f.template_part("x=", "x=");
        let tail = f.template_part("", "");
        let template =
            f.tagged_template(tag, head, vec![TemplateSpan { expr: sum, literal: tail }]);
        vec![f.expr_stmt(template)]
    });
    assert_eq!(
        out,
        lines(&[
            "(_a = [\"x=\", \"\"], _a.raw = [\"x=\", \"\"], t(_a, n + 1));",
            "var _a;",
        ])
    );
}

#[test]
fn raw_text_differs_from_cooked_in_capture() {
    let out = emit_with(es5(), |f| {
        let tag = f.ident("t");
        let head = f.template_part("a\nb", "a\\nb");
        let template = f.tagged_template(tag, head, vec![]);
        vec![f.expr_stmt(template)]
    });
    assert_eq!(
        out,
        lines(&[
            "(_a = [\"a\\nb\"], _a.raw = [\"a\\\\nb\"], t(_a));",
            "var _a;",
        ])
    );
}

#[test]
fn es6_templates_emit_verbatim() {
    let out = emit_with(es6(), |f| {
        let n = f.ident("n");
        let one = f.num("1");
        let sum = f.binary(BinOp::Add, n, one);
        let head = f.template_part("x=", "x=");
        let tail = f.template_part("", "");
        let template = f.template(head, vec![TemplateSpan { expr: sum, literal: tail }]);
        vec![f.var_stmt("s", Some(template))]
    });
    assert_eq!(out, "var s = `x=${n + 1}`;\n");
}
