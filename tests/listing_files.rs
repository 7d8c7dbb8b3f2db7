//! Ingest driven by real listing files on disk, mirroring the CLI's own file
//! -> scanner -> graph path rather than the in-memory event streams the unit
//! tests build directly.

use tempfile::TempDir;

use objlink::{scanner, AppSeed, Graph, LinkKind};

fn read_and_ingest(graph: &mut Graph, path: &std::path::Path, lenient: bool) {
    let text = std::fs::read_to_string(path).unwrap();
    let label = path.to_string_lossy().into_owned();
    let events = scanner::scan_listing(&label, &text).unwrap();
    let base = scanner::listing_base_name(path);
    graph.ingest_listing(&base, events, lenient).unwrap();
}

#[test]
fn ingest_from_disk_links_scenario_one() {
    let dir = TempDir::new().unwrap();

    let app_path = dir.path().join("app.nm");
    std::fs::write(&app_path, "A.o:\nmain T 00000000 00000010\nfoo U\n").unwrap();

    let lib_path = dir.path().join("lib.nm");
    std::fs::write(
        &lib_path,
        "libx.a[b.o]:\nfoo T\nbar U\nlibx.a[c.o]:\nbar T\n",
    )
    .unwrap();

    let mut graph = Graph::new();
    read_and_ingest(&mut graph, &app_path, false);
    read_and_ingest(&mut graph, &lib_path, false);
    graph.finish_ingest();
    graph.run_linker(AppSeed::Watermark, false).unwrap();

    let app = graph.link_set(LinkKind::Application);
    let names: Vec<String> = app.iter().map(|&id| graph.object(id).display_name()).collect();
    assert_eq!(names, vec!["A.o", "libx.a[b.o]", "libx.a[c.o]"]);
    graph.check_invariants().unwrap();
}

#[test]
fn lenient_listing_accepts_lowercase_and_question_mark_codes() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.nm");
    std::fs::write(&path, "a.o:\nmain t\nmystery ?\n").unwrap();

    let mut graph = Graph::new();
    read_and_ingest(&mut graph, &path, true);
    graph.finish_ingest();

    let main = graph.find_symbol("main").unwrap();
    assert!(graph.symbol(main).is_defined());
    let mystery = graph.find_symbol("mystery").unwrap();
    assert!(!graph.symbol(mystery).is_defined());
}

#[test]
fn malformed_listing_line_on_disk_reports_file_and_line_number() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.nm");
    std::fs::write(&path, "A.o:\nmain T\nincomplete\n").unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let label = path.to_string_lossy().into_owned();
    let err = scanner::scan_listing(&label, &text).unwrap_err();
    assert_eq!(err.line, 3);
    assert_eq!(err.file, label);
}
