//! E2E emission: source-map recording.
//!
//! Beyond the unit-level VLQ laws, these tests decode whole emitted
//! mappings streams and check the recorder's global properties: emitted
//! positions strictly increase, every reference lands inside the tables,
//! and `--out` concatenation carries the source index across file
//! boundaries.

mod common;

use pretty_assertions::assert_eq;
use common::{emit_program, es5, TestResolver};
use downlevel_base::Span;
use downlevel_emit::{decode_mappings, CompilerOptions, SourceMapJson};
use downlevel_syntax::{AstFactory, Expr, ExprKind, Stmt, StmtKind};

fn mapped_es5() -> CompilerOptions {
    CompilerOptions {
        source_map: true,
        ..es5()
    }
}

/// A spanned `var <name> = <num>;` statement.
fn spanned_var<'a>(
    f: &mut AstFactory<'a>,
    name: &str,
    value: &str,
    span: Span,
    init_span: Span,
) -> &'a Stmt<'a> {
    let init: &'a Expr<'a> = f.expr_at(init_span, ExprKind::NumLit(value.to_string()));
    let decl = f.var_decl(name, Some(init));
    let list = f.var_list(downlevel_syntax::NodeFlags::NONE, vec![decl]);
    f.stmt_at(span, StmtKind::Var(list))
}

fn parse_map(host_output: &str) -> SourceMapJson {
    serde_json::from_str::<serde_json::Value>(host_output)
        .map(|v| SourceMapJson {
            version: v["version"].as_u64().unwrap() as u32,
            file: v["file"].as_str().unwrap().to_string(),
            source_root: v["sourceRoot"].as_str().unwrap().to_string(),
            sources: v["sources"]
                .as_array()
                .unwrap()
                .iter()
                .map(|s| s.as_str().unwrap().to_string())
                .collect(),
            names: v["names"]
                .as_array()
                .unwrap()
                .iter()
                .map(|s| s.as_str().unwrap().to_string())
                .collect(),
            mappings: v["mappings"].as_str().unwrap().to_string(),
        })
        .expect("map json parses")
}

#[test]
fn mapping_url_and_sidecar_are_written() {
    let (js, map) = emit_program(
        mapped_es5(),
        |f| {
            let text = "var x = 1;\n";
            let stmt = spanned_var(f, "x", "1", Span::new(0, 10), Span::new(7, 9));
            (
                vec![("main.ts".to_string(), text.to_string(), vec![stmt])],
                TestResolver::default(),
            )
        },
        |host, result| {
            assert!(!result.emit_skipped);
            assert_eq!(result.source_maps.len(), 1);
            (
                host.output("main.js").unwrap(),
                host.output("main.js.map").unwrap(),
            )
        },
    );
    assert!(js.ends_with("//# sourceMappingURL=main.js.map\n"));
    let map = parse_map(&map);
    assert_eq!(map.version, 3);
    assert_eq!(map.file, "main.js");
    assert_eq!(map.sources, vec!["main.ts"]);
}

#[test]
fn decoded_mappings_are_monotonic_and_in_bounds() {
    let map = emit_program(
        mapped_es5(),
        |f| {
            let text = "var x = 1;\nvar y = 2;\n";
            let first = spanned_var(f, "x", "1", Span::new(0, 10), Span::new(7, 9));
            let second = spanned_var(f, "y", "2", Span::new(10, 21), Span::new(18, 20));
            (
                vec![("main.ts".to_string(), text.to_string(), vec![first, second])],
                TestResolver::default(),
            )
        },
        |host, _| parse_map(&host.output("main.js.map").unwrap()),
    );
    let spans = decode_mappings(&map.mappings);
    assert!(!spans.is_empty());
    for pair in spans.windows(2) {
        let a = (pair[0].emitted_line, pair[0].emitted_column);
        let b = (pair[1].emitted_line, pair[1].emitted_column);
        assert!(a < b, "emitted positions must strictly increase: {:?}", pair);
    }
    for span in &spans {
        assert!(span.source_index < map.sources.len());
        if let Some(name) = span.name_index {
            assert!(name < map.names.len());
        }
    }
    // The second statement's records reference source line 2.
    assert!(spans.iter().any(|s| s.source_line == 2));
}

#[test]
fn synthesized_trees_record_no_spans() {
    let map = emit_program(
        mapped_es5(),
        |f| {
            let one = f.num("1");
            let stmt = f.var_stmt("x", Some(one));
            (
                vec![("main.ts".to_string(), String::new(), vec![stmt])],
                TestResolver::default(),
            )
        },
        |host, _| parse_map(&host.output("main.js.map").unwrap()),
    );
    assert_eq!(map.mappings, "");
}

#[test]
fn scope_names_qualify_through_containers() {
    let map = emit_program(
        mapped_es5(),
        |f| {
            let inner = f.func_decl("f", vec![], vec![]);
            let module = f.module_decl(downlevel_syntax::NodeFlags::NONE, "M", vec![inner]);
            (
                vec![("main.ts".to_string(), String::new(), vec![module])],
                TestResolver::default(),
            )
        },
        |host, _| parse_map(&host.output("main.js.map").unwrap()),
    );
    assert!(map.names.contains(&"M".to_string()));
    assert!(map.names.contains(&"M.f".to_string()));
}

#[test]
fn out_concatenation_spans_multiple_sources() {
    let options = CompilerOptions {
        out: Some("bundle.js".to_string()),
        ..mapped_es5()
    };
    let map = emit_program(
        options,
        |f| {
            let a = spanned_var(f, "a", "1", Span::new(0, 10), Span::new(8, 9));
            let b = spanned_var(f, "b", "2", Span::new(0, 10), Span::new(8, 9));
            (
                vec![
                    ("a.ts".to_string(), "var a = 1;".to_string(), vec![a]),
                    ("b.ts".to_string(), "var b = 2;".to_string(), vec![b]),
                ],
                TestResolver::default(),
            )
        },
        |host, _| parse_map(&host.output("bundle.js.map").unwrap()),
    );
    assert_eq!(map.sources, vec!["a.ts", "b.ts"]);
    let spans = decode_mappings(&map.mappings);
    assert!(spans.iter().any(|s| s.source_index == 0));
    assert!(spans.iter().any(|s| s.source_index == 1));
    // Concatenation restarts source lines; the delta encoding must still
    // decode to line 1 of the second file.
    assert!(spans
        .iter()
        .any(|s| s.source_index == 1 && s.source_line == 1));
}

#[test]
fn map_root_prefixes_the_mapping_url() {
    let options = CompilerOptions {
        map_root: Some("maps".to_string()),
        ..mapped_es5()
    };
    let js = emit_program(
        options,
        |f| {
            let one = f.num("1");
            let stmt = f.var_stmt("x", Some(one));
            (
                vec![("main.ts".to_string(), String::new(), vec![stmt])],
                TestResolver::default(),
            )
        },
        |host, _| host.output("main.js").unwrap(),
    );
    assert!(js.ends_with("//# sourceMappingURL=maps/main.js.map\n"));
}

#[test]
fn source_root_lands_in_the_map() {
    let options = CompilerOptions {
        source_root: Some("src/".to_string()),
        ..mapped_es5()
    };
    let map = emit_program(
        options,
        |f| {
            let one = f.num("1");
            let stmt = f.var_stmt("x", Some(one));
            (
                vec![("main.ts".to_string(), String::new(), vec![stmt])],
                TestResolver::default(),
            )
        },
        |host, _| parse_map(&host.output("main.js.map").unwrap()),
    );
    assert_eq!(map.source_root, "src/");
}
