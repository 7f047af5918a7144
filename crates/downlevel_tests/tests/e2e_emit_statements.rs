//! E2E emission: plain statements, expressions, and precedence.

mod common;

use pretty_assertions::assert_eq;
use common::{emit_with, es5, es6, lines};
use downlevel_syntax::{BinOp, ForInit, NodeFlags, PostfixOp, UnaryOp};

#[test]
fn var_statement_with_initializer() {
    let out = emit_with(es5(), |f| {
        let ten = f.num("10");
        vec![f.var_stmt("x", Some(ten))]
    });
    assert_eq!(out, "var x = 10;\n");
}

#[test]
fn let_and_const_lower_to_var_below_es6() {
    let out = emit_with(es5(), |f| {
        let one = f.num("1");
        let two = f.num("2");
        let a = f.let_stmt("a", Some(one));
        let b = f.const_stmt("b", two);
        vec![a, b]
    });
    assert_eq!(out, lines(&["var a = 1;", "var b = 2;"]));
}

#[test]
fn let_and_const_survive_at_es6() {
    let out = emit_with(es6(), |f| {
        let one = f.num("1");
        let two = f.num("2");
        let a = f.let_stmt("a", Some(one));
        let b = f.const_stmt("b", two);
        vec![a, b]
    });
    assert_eq!(out, lines(&["let a = 1;", "const b = 2;"]));
}

#[test]
fn if_else_blocks_share_lines_with_braces() {
    let out = emit_with(es5(), |f| {
        let x = f.ident("x");
        let a = f.ident("a");
        let a_call = f.call(a, vec![]);
        let then_block = {
            let stmt = f.expr_stmt(a_call);
            f.block(vec![stmt])
        };
        let b = f.ident("b");
        let b_call = f.call(b, vec![]);
        let else_block = {
            let stmt = f.expr_stmt(b_call);
            f.block(vec![stmt])
        };
        vec![f.if_stmt(x, then_block, Some(else_block))]
    });
    assert_eq!(
        out,
        lines(&["if (x) {", "    a();", "} else {", "    b();", "}"])
    );
}

#[test]
fn else_if_chains_stay_flat() {
    let out = emit_with(es5(), |f| {
        let y = f.ident("y");
        let b = f.ident("b");
        let b_call = f.call(b, vec![]);
        let inner_block = {
            let stmt = f.expr_stmt(b_call);
            f.block(vec![stmt])
        };
        let inner = f.if_stmt(y, inner_block, None);
        let x = f.ident("x");
        let a = f.ident("a");
        let a_call = f.call(a, vec![]);
        let then_block = {
            let stmt = f.expr_stmt(a_call);
            f.block(vec![stmt])
        };
        vec![f.if_stmt(x, then_block, Some(inner))]
    });
    assert_eq!(
        out,
        lines(&["if (x) {", "    a();", "} else if (y) {", "    b();", "}"])
    );
}

#[test]
fn while_with_single_statement_indents() {
    let out = emit_with(es5(), |f| {
        let x = f.ident("x");
        let a = f.ident("a");
        let a_call = f.call(a, vec![]);
        let body = f.expr_stmt(a_call);
        vec![f.while_stmt(x, body)]
    });
    assert_eq!(out, lines(&["while (x)", "    a();"]));
}

#[test]
fn for_head_keeps_declaration_list() {
    let out = emit_with(es5(), |f| {
        let zero = f.num("0");
        let decl = f.var_decl("i", Some(zero));
        let list = f.var_list(NodeFlags::NONE, vec![decl]);
        let i = f.ident("i");
        let ten = f.num("10");
        let cond = f.binary(BinOp::Lt, i, ten);
        let i2 = f.ident("i");
        let incr = f.expr(downlevel_syntax::ExprKind::Postfix {
            op: PostfixOp::Increment,
            operand: i2,
        });
        let a = f.ident("a");
        let a_call = f.call(a, vec![]);
        let body = {
            let stmt = f.expr_stmt(a_call);
            f.block(vec![stmt])
        };
        vec![f.stmt(downlevel_syntax::StmtKind::For {
            init: Some(ForInit::Var(list)),
            cond: Some(cond),
            incr: Some(incr),
            body,
        })]
    });
    assert_eq!(
        out,
        lines(&["for (var i = 0; i < 10; i++) {", "    a();", "}"])
    );
}

#[test]
fn switch_cases_indent_their_statements() {
    let out = emit_with(es5(), |f| {
        let one = f.num("1");
        let a = f.ident("a");
        let a_call = f.call(a, vec![]);
        let a_stmt = f.expr_stmt(a_call);
        let brk = f.stmt(downlevel_syntax::StmtKind::Break(None));
        let case = f.case_clause(Some(one), vec![a_stmt, brk]);
        let b = f.ident("b");
        let b_call = f.call(b, vec![]);
        let b_stmt = f.expr_stmt(b_call);
        let default = f.case_clause(None, vec![b_stmt]);
        let x = f.ident("x");
        vec![f.switch_stmt(x, vec![case, default])]
    });
    assert_eq!(
        out,
        lines(&[
            "switch (x) {",
            "    case 1:",
            "        a();",
            "        break;",
            "    default:",
            "        b();",
            "}",
        ])
    );
}

#[test]
fn try_catch_finally_chain() {
    let out = emit_with(es5(), |f| {
        let a = f.ident("a");
        let a_call = f.call(a, vec![]);
        let try_block = {
            let stmt = f.expr_stmt(a_call);
            f.block(vec![stmt])
        };
        let b = f.ident("b");
        let b_call = f.call(b, vec![]);
        let catch_block = {
            let stmt = f.expr_stmt(b_call);
            f.block(vec![stmt])
        };
        let e = f.sym("e");
        let catch = downlevel_syntax::CatchClause {
            id: f.next_id(),
            span: downlevel_base::Span::SYNTHESIZED,
            name: e,
            block: catch_block,
        };
        let c = f.ident("c");
        let c_call = f.call(c, vec![]);
        let finally_block = {
            let stmt = f.expr_stmt(c_call);
            f.block(vec![stmt])
        };
        vec![f.stmt(downlevel_syntax::StmtKind::Try {
            block: try_block,
            catch: Some(catch),
            finally: Some(finally_block),
        })]
    });
    assert_eq!(
        out,
        lines(&[
            "try {",
            "    a();",
            "} catch (e) {",
            "    b();",
            "} finally {",
            "    c();",
            "}",
        ])
    );
}

#[test]
fn labeled_statement_prefixes_body() {
    let out = emit_with(es5(), |f| {
        let label = f.sym("outer");
        let brk = f.stmt(downlevel_syntax::StmtKind::Break(Some(label)));
        let body = f.block(vec![brk]);
        let x = f.ident("x");
        let loop_stmt = f.while_stmt(x, body);
        vec![f.stmt(downlevel_syntax::StmtKind::Labeled {
            label,
            body: loop_stmt,
        })]
    });
    assert_eq!(
        out,
        lines(&["outer: while (x) {", "    break outer;", "}"])
    );
}

#[test]
fn operand_parens_follow_precedence() {
    let out = emit_with(es5(), |f| {
        let a = f.ident("a");
        let b = f.ident("b");
        let c = f.ident("c");
        let sum = f.binary(BinOp::Add, a, b);
        let scaled = f.binary(BinOp::Mul, sum, c);
        let s1 = f.expr_stmt(scaled);

        let a2 = f.ident("a");
        let b2 = f.ident("b");
        let c2 = f.ident("c");
        let inner = f.binary(BinOp::Sub, b2, c2);
        let outer = f.binary(BinOp::Sub, a2, inner);
        let s2 = f.expr_stmt(outer);

        let a3 = f.ident("a");
        let b3 = f.ident("b");
        let c3 = f.ident("c");
        let product = f.binary(BinOp::Mul, b3, c3);
        let loose = f.binary(BinOp::Add, a3, product);
        let s3 = f.expr_stmt(loose);
        vec![s1, s2, s3]
    });
    assert_eq!(
        out,
        lines(&["(a + b) * c;", "a - (b - c);", "a + b * c;"])
    );
}

#[test]
fn expression_statement_parenthesizes_object_and_function() {
    let out = emit_with(es5(), |f| {
        let one = f.num("1");
        let name = f.prop_name("a");
        let member = f.prop_member(name, one);
        let obj = f.object(vec![member]);
        let s1 = f.expr_stmt(obj);
        let func = f.function_expr(None, vec![], vec![]);
        let s2 = f.expr_stmt(func);
        vec![s1, s2]
    });
    assert_eq!(
        out,
        lines(&["({ a: 1 });", "(function () {", "});"])
    );
}

#[test]
fn conditional_unary_and_postfix_forms() {
    let out = emit_with(es5(), |f| {
        let x = f.ident("x");
        let one = f.num("1");
        let two = f.num("2");
        let cond = f.cond_expr(x, one, two);
        let s1 = f.expr_stmt(cond);

        let y = f.ident("y");
        let neg = f.expr(downlevel_syntax::ExprKind::Unary {
            op: UnaryOp::Minus,
            operand: y,
        });
        let s2 = f.expr_stmt(neg);

        let z = f.ident("z");
        let ty = f.expr(downlevel_syntax::ExprKind::Unary {
            op: UnaryOp::TypeOf,
            operand: z,
        });
        let s3 = f.expr_stmt(ty);

        let w = f.ident("w");
        let inc = f.expr(downlevel_syntax::ExprKind::Postfix {
            op: PostfixOp::Increment,
            operand: w,
        });
        let s4 = f.expr_stmt(inc);

        let v = f.ident("v");
        let inner = f.expr(downlevel_syntax::ExprKind::Unary {
            op: UnaryOp::Minus,
            operand: v,
        });
        let double_neg = f.expr(downlevel_syntax::ExprKind::Unary {
            op: UnaryOp::Minus,
            operand: inner,
        });
        let s5 = f.expr_stmt(double_neg);
        vec![s1, s2, s3, s4, s5]
    });
    assert_eq!(
        out,
        lines(&["x ? 1 : 2;", "-y;", "typeof z;", "w++;", "- -v;"])
    );
}

#[test]
fn shorthand_properties_expand_below_es6() {
    let es5_out = emit_with(es5(), |f| {
        let member = f.shorthand_member("x");
        let obj = f.object(vec![member]);
        vec![f.var_stmt("o", Some(obj))]
    });
    assert_eq!(es5_out, "var o = { x: x };\n");

    let es6_out = emit_with(es6(), |f| {
        let member = f.shorthand_member("x");
        let obj = f.object(vec![member]);
        vec![f.var_stmt("o", Some(obj))]
    });
    assert_eq!(es6_out, "var o = { x };\n");
}

#[test]
fn member_access_on_literals_is_parenthesized() {
    let out = emit_with(es5(), |f| {
        let one = f.num("1");
        let callee = f.prop_access(one, "toString");
        let call = f.call(callee, vec![]);
        vec![f.expr_stmt(call)]
    });
    assert_eq!(out, "(1).toString();\n");
}

#[test]
fn spread_calls_lower_to_apply() {
    let out = emit_with(es5(), |f| {
        let xs = f.ident("xs");
        let spread = f.spread(xs);
        let callee = f.ident("g");
        let s1 = {
            let call = f.call(callee, vec![spread]);
            f.expr_stmt(call)
        };

        let a = f.ident("a");
        let xs2 = f.ident("xs");
        let spread2 = f.spread(xs2);
        let callee2 = f.ident("g");
        let s2 = {
            let call = f.call(callee2, vec![a, spread2]);
            f.expr_stmt(call)
        };

        let o = f.ident("o");
        let m = f.prop_access(o, "m");
        let xs3 = f.ident("xs");
        let spread3 = f.spread(xs3);
        let s3 = {
            let call = f.call(m, vec![spread3]);
            f.expr_stmt(call)
        };
        vec![s1, s2, s3]
    });
    assert_eq!(
        out,
        lines(&[
            "g.apply(void 0, xs);",
            "g.apply(void 0, [a].concat(xs));",
            "o.m.apply(o, xs);",
        ])
    );
}

#[test]
fn spread_arrays_concat_segments() {
    let out = emit_with(es5(), |f| {
        let xs = f.ident("xs");
        let spread = f.spread(xs);
        let copy = f.array(vec![spread]);
        let s1 = f.var_stmt("c", Some(copy));

        let a = f.ident("a");
        let xs2 = f.ident("xs");
        let spread2 = f.spread(xs2);
        let b = f.ident("b");
        let mixed = f.array(vec![a, spread2, b]);
        let s2 = f.var_stmt("m", Some(mixed));
        vec![s1, s2]
    });
    assert_eq!(
        out,
        lines(&["var c = xs.slice();", "var m = [a].concat(xs, [b]);"])
    );
}

#[test]
fn string_values_are_escaped() {
    let out = emit_with(es5(), |f| {
        let s = f.str_lit("a\"b\nc");
        vec![f.var_stmt("s", Some(s))]
    });
    assert_eq!(out, "var s = \"a\\\"b\\nc\";\n");
}

#[test]
fn comma_expression_spaces_after_comma_only() {
    let out = emit_with(es5(), |f| {
        let x = f.ident("x");
        let y = f.ident("y");
        let first = f.assign(x, y);
        let z = f.ident("z");
        let one = f.num("1");
        let second = f.assign(z, one);
        let comma = f.binary(BinOp::Comma, first, second);
        vec![f.expr_stmt(comma)]
    });
    assert_eq!(out, "x = y, z = 1;\n");
}

#[test]
fn empty_and_debugger_statements() {
    let out = emit_with(es5(), |f| {
        let empty = f.stmt(downlevel_syntax::StmtKind::Empty);
        let debugger = f.stmt(downlevel_syntax::StmtKind::Debugger);
        vec![empty, debugger]
    });
    assert_eq!(out, lines(&[";", "debugger;"]));
}

#[test]
fn bodyless_function_reports_diagnostic() {
    use common::{emit_program, TestResolver};
    use downlevel_base::Span;
    let (diag_count, code) = emit_program(
        es5(),
        |f| {
            let func = f.bodyless_func(Some("f"), vec![]);
            let stmt = f.stmt_at(Span::new(0, 18), downlevel_syntax::StmtKind::Function(func));
            (
                vec![(
                    "main.ts".to_string(),
                    "function f(): void;".to_string(),
                    vec![stmt],
                )],
                TestResolver::default(),
            )
        },
        |_host, result| {
            (
                result.diagnostics.len(),
                result.diagnostics.first().map(|d| d.code),
            )
        },
    );
    assert_eq!(diag_count, 1);
    assert_eq!(code, Some(2391));
}

#[test]
fn string_literals_keep_their_source_quotes() {
    let out = emit_with(es5(), |f| {
        let single = f.single_quoted_str_lit("hi");
        let double = f.str_lit("there");
        let a = f.var_stmt("a", Some(single));
        let b = f.var_stmt("b", Some(double));
        vec![a, b]
    });
    assert_eq!(out, lines(&["var a = 'hi';", "var b = \"there\";"]));
}

#[test]
fn single_quoted_strings_escape_only_their_own_quote() {
    let out = emit_with(es5(), |f| {
        let s = f.single_quoted_str_lit("say \"hi\"");
        vec![f.var_stmt("s", Some(s))]
    });
    assert_eq!(out, "var s = 'say \"hi\"';\n");
}

#[test]
fn string_property_names_keep_their_source_quotes() {
    let out = emit_with(es5(), |f| {
        let name = f.str_prop_name("k", true);
        let one = f.num("1");
        let member = f.prop_member(name, one);
        let obj = f.object(vec![member]);
        vec![f.var_stmt("o", Some(obj))]
    });
    assert_eq!(out, "var o = { 'k': 1 };\n");
}
