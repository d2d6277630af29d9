// SPDX-FileCopyrightText: 2026 Galatea Authors
// SPDX-License-Identifier: MIT

//! End-to-end: a README-shaped document through parse, query, layout, both
//! backends, and a full session round over the in-process server.

use galatea::format::parse_markdown;
use galatea::model::{NodeId, NodeKind};
use galatea::query::{children_of, path_to_root, search_nodes, SearchMode};
use galatea::remote::RemoteParseClient;
use galatea::render::{BackendFactory, BackendKind, CanvasBackendFactory};
use galatea::session::{ParseProvenance, SessionController, SessionPhase};

const README: &str = "\
# galatea

A markdown graph explorer.

## Install

Grab it from [crates.io](https://crates.io/crates/galatea).

## Usage

Run `galatea notes.md` and navigate.

### Keys

Press `b` to switch backends, see the [manual](https://example.com/manual).

### Remote mode

Pair it with `--serve`, described in the [manual](https://example.com/manual).

## License

MIT.
";

#[test]
fn readme_parses_into_the_expected_graph() {
    let snapshot = parse_markdown(README);

    assert_eq!(snapshot.heading_count(), 6);
    // One root heading, so every other heading carries one hierarchy edge.
    assert_eq!(snapshot.hierarchy_edge_count(), 5);

    // Two occurrences of the manual URL collapse into one node with the
    // first occurrence's text, but keep one edge per occurrence.
    let manual = NodeId::reference("https://example.com/manual");
    let node = snapshot.node(&manual).expect("manual reference node");
    assert_eq!(node.text(), "manual");
    let manual_edges = snapshot
        .edges()
        .iter()
        .filter(|edge| edge.target() == &manual)
        .count();
    assert_eq!(manual_edges, 2);

    // Sections hold the trimmed body text.
    assert_eq!(snapshot.sections().get(&NodeId::heading(5)), "MIT.");
}

#[test]
fn queries_walk_the_readme_hierarchy() {
    let snapshot = parse_markdown(README);

    let usage = NodeId::heading(2);
    assert_eq!(snapshot.node(&usage).expect("usage node").text(), "Usage");
    let children = children_of(&snapshot, &usage);
    assert_eq!(children.len(), 2);

    let remote_mode = NodeId::heading(4);
    let path = path_to_root(&snapshot, &remote_mode);
    assert_eq!(path, vec![remote_mode, usage, NodeId::heading(0)]);

    let hits = search_nodes(&snapshot, "manual", SearchMode::Substring).expect("search");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0], NodeId::reference("https://example.com/manual"));
}

#[test]
fn both_backends_render_every_readme_node() {
    let snapshot = parse_markdown(README);
    let factory = CanvasBackendFactory;

    for kind in [BackendKind::Planar, BackendKind::Spatial] {
        let mut backend = factory.create(kind);
        backend.initialize().expect("initialize");
        backend
            .render(snapshot.nodes(), snapshot.edges(), None)
            .expect("render");

        let frame = backend.frame().expect("frame");
        let text = frame.lines().join("\n");
        for node in snapshot.nodes() {
            if node.kind() == NodeKind::Heading {
                assert!(
                    text.contains(node.text()),
                    "{} backend misses {}",
                    kind.label(),
                    node.text()
                );
            }
            assert!(
                !frame.spans_for(node.id()).is_empty(),
                "{} backend has no hit-spans for {}",
                kind.label(),
                node.id()
            );
        }
    }
}

#[tokio::test]
async fn session_round_trips_the_readme_through_the_server() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, galatea::server::router())
            .await
            .expect("serve");
    });

    let remote = RemoteParseClient::new(format!("http://{addr}"));
    let mut controller = SessionController::new(Box::new(CanvasBackendFactory), Some(remote))
        .expect("controller");

    controller
        .load_content(README.to_owned(), Some("README.md".to_owned()))
        .await
        .expect("load");

    assert_eq!(controller.phase(), SessionPhase::Loaded);
    assert_eq!(controller.provenance(), ParseProvenance::Remote);
    assert_eq!(controller.filename(), Some("README.md"));
    assert_eq!(controller.stats().node_count, 8);

    // Remote snapshots still answer detail views from locally derived
    // sections.
    let license = NodeId::heading(5);
    assert!(controller.select(&license).expect("select"));
    let detail = controller.selected_detail().expect("detail");
    assert_eq!(detail.body_md, "MIT.");
    assert_eq!(detail.body_html, "<p>MIT.</p>\n");

    controller
        .switch_backend(BackendKind::Spatial)
        .expect("switch");
    assert_eq!(controller.active_backend(), BackendKind::Spatial);
    assert!(controller.frame().is_some());
}
