//! E2E emission: artifacts written through a filesystem host.
//!
//! The in-memory host covers most scenarios; these tests push outputs
//! through a real directory to cover the path the orchestrator takes in
//! production — output next to the map, BOM prefixing, bytes surviving a
//! disk round-trip.

mod common;

use common::{es5, DiskHost, TestResolver};
use downlevel_emit::{emit_files, CompilerOptions};
use downlevel_syntax::with_factory;
use pretty_assertions::assert_eq;

#[test]
fn outputs_round_trip_through_the_filesystem() {
    let dir = tempfile::tempdir().expect("temp dir");
    let js = with_factory(|f| {
        let ten = f.num("10");
        let stmt = f.var_stmt("x", Some(ten));
        let file = f.source_file("main.ts", "", vec![stmt]);
        let host = DiskHost::new(vec![file], es5(), dir.path());
        let resolver = TestResolver::default();
        let result = emit_files(&host, &resolver, &f.interner, None);
        assert!(!result.emit_skipped, "{:?}", result.diagnostics);
        host.read_output("main.js").expect("main.js on disk")
    });
    assert_eq!(js, "var x = 10;\n");
}

#[test]
fn bom_option_prefixes_the_written_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let options = CompilerOptions {
        emit_bom: true,
        ..es5()
    };
    let js = with_factory(|f| {
        let one = f.num("1");
        let stmt = f.var_stmt("x", Some(one));
        let file = f.source_file("main.ts", "", vec![stmt]);
        let host = DiskHost::new(vec![file], options, dir.path());
        let resolver = TestResolver::default();
        emit_files(&host, &resolver, &f.interner, None);
        host.read_output("main.js").expect("main.js on disk")
    });
    assert!(js.starts_with('\u{feff}'));
    assert_eq!(&js[3..], "var x = 1;\n");
}

#[test]
fn map_file_lands_next_to_the_output() {
    let dir = tempfile::tempdir().expect("temp dir");
    let options = CompilerOptions {
        source_map: true,
        ..es5()
    };
    let (js, map) = with_factory(|f| {
        let one = f.num("1");
        let stmt = f.var_stmt("x", Some(one));
        let file = f.source_file("main.ts", "", vec![stmt]);
        let host = DiskHost::new(vec![file], options, dir.path());
        let resolver = TestResolver::default();
        emit_files(&host, &resolver, &f.interner, None);
        (
            host.read_output("main.js").expect("main.js on disk"),
            host.read_output("main.js.map").expect("map on disk"),
        )
    });
    assert!(js.ends_with("//# sourceMappingURL=main.js.map\n"));
    let map: serde_json::Value = serde_json::from_str(&map).expect("map parses");
    assert_eq!(map["version"], 3);
    assert_eq!(map["file"], "main.js");
}
