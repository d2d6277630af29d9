// SPDX-FileCopyrightText: 2026 Galatea Authors
// SPDX-License-Identifier: MIT

use std::cell::RefCell;
use std::rc::Rc;

use super::{LoadOutcome, ParseProvenance, SessionController, SessionPhase};
use crate::format::parse_markdown;
use crate::model::{GraphEdge, GraphNode, NodeId, NodeKind};
use crate::remote::{RemoteErrorCode, RemoteParseError, RemoteParseOutcome};
use crate::render::{
    BackendError, BackendFactory, BackendKind, CanvasBackendFactory, RenderBackend, RenderedFrame,
};

const DOC: &str = "# Title\nintro line\n## Sub\nbody\n[Doc](http://x) more";

#[derive(Debug, Default)]
struct BackendLog {
    inits: Vec<&'static str>,
    destroys: Vec<&'static str>,
    renders: Vec<(&'static str, usize)>,
    fail_init: Option<BackendKind>,
}

struct MockBackend {
    kind: BackendKind,
    log: Rc<RefCell<BackendLog>>,
}

impl RenderBackend for MockBackend {
    fn kind(&self) -> BackendKind {
        self.kind
    }

    fn initialize(&mut self) -> Result<(), BackendError> {
        if self.log.borrow().fail_init == Some(self.kind) {
            return Err(BackendError::Init {
                message: "scene resources unavailable".to_owned(),
            });
        }
        self.log.borrow_mut().inits.push(self.kind.label());
        Ok(())
    }

    fn render(
        &mut self,
        nodes: &[GraphNode],
        _edges: &[GraphEdge],
        _selected: Option<&NodeId>,
    ) -> Result<(), BackendError> {
        self.log.borrow_mut().renders.push((self.kind.label(), nodes.len()));
        Ok(())
    }

    fn frame(&self) -> Option<&RenderedFrame> {
        None
    }

    fn clear(&mut self) {}

    fn destroy(&mut self) {
        self.log.borrow_mut().destroys.push(self.kind.label());
    }
}

struct MockFactory {
    log: Rc<RefCell<BackendLog>>,
}

impl BackendFactory for MockFactory {
    fn create(&self, kind: BackendKind) -> Box<dyn RenderBackend> {
        Box::new(MockBackend {
            kind,
            log: self.log.clone(),
        })
    }
}

fn mock_controller() -> (SessionController, Rc<RefCell<BackendLog>>) {
    let log = Rc::new(RefCell::new(BackendLog::default()));
    let controller =
        SessionController::new(Box::new(MockFactory { log: log.clone() }), None).expect("controller");
    (controller, log)
}

fn remote_outcome_for(content: &str) -> RemoteParseOutcome {
    let stats = parse_markdown(content).stats_for(content);
    let (nodes, edges, _) = parse_markdown(content).into_parts();
    RemoteParseOutcome {
        nodes,
        edges,
        stats,
    }
}

#[test]
fn starts_empty_with_the_planar_backend_up() {
    let (controller, log) = mock_controller();
    assert_eq!(controller.phase(), SessionPhase::Empty);
    assert_eq!(controller.active_backend(), BackendKind::Planar);
    assert_eq!(log.borrow().inits, vec!["planar"]);
    assert!(controller.selected().is_none());
}

#[test]
fn local_load_adopts_snapshot_and_renders() {
    let (mut controller, log) = mock_controller();
    let ticket = controller.begin_load(DOC, Some("doc.md".to_owned())).expect("ticket");
    let outcome = controller.complete_load(ticket, None).expect("load");

    assert_eq!(outcome, LoadOutcome::Adopted(ParseProvenance::Local));
    assert_eq!(controller.phase(), SessionPhase::Loaded);
    assert_eq!(controller.filename(), Some("doc.md"));
    assert_eq!(controller.snapshot().heading_count(), 2);
    assert_eq!(controller.stats().node_count, 3);
    // The backend received the full node set.
    assert_eq!(log.borrow().renders, vec![("planar", 3)]);
}

#[test]
fn async_load_without_remote_takes_the_local_path() {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("tokio runtime");
    let (mut controller, _log) = mock_controller();
    let outcome = runtime
        .block_on(controller.load_content(DOC.to_owned(), None))
        .expect("load");
    assert_eq!(outcome, LoadOutcome::Adopted(ParseProvenance::Local));
    assert!(!controller.remote_configured());
}

#[test]
fn remote_success_is_adopted_with_locally_derived_sections() {
    let (mut controller, _log) = mock_controller();
    let ticket = controller.begin_load(DOC, Some("doc.md".to_owned())).expect("ticket");
    let outcome = controller
        .complete_load(ticket, Some(Ok(remote_outcome_for(DOC))))
        .expect("load");

    assert_eq!(outcome, LoadOutcome::Adopted(ParseProvenance::Remote));
    assert_eq!(controller.provenance(), ParseProvenance::Remote);
    assert!(controller.last_remote_error().is_none());
    // Section bodies never travel the wire yet the detail view still works.
    assert_eq!(
        controller.snapshot().sections().get(&NodeId::heading(0)),
        "intro line"
    );
}

#[test]
fn remote_failure_degrades_to_local_parse_and_keeps_the_filename() {
    let (mut controller, _log) = mock_controller();
    let ticket = controller.begin_load(DOC, Some("original.md".to_owned())).expect("ticket");
    let rejection = RemoteParseError::Rejected {
        status: 413,
        code: RemoteErrorCode::ContentTooLarge,
        message: "content too large".to_owned(),
    };
    let outcome = controller.complete_load(ticket, Some(Err(rejection))).expect("load");

    assert_eq!(outcome, LoadOutcome::Adopted(ParseProvenance::Local));
    assert_eq!(controller.phase(), SessionPhase::Loaded);
    assert_eq!(controller.filename(), Some("original.md"));
    assert_eq!(controller.snapshot().heading_count(), 2);
    let diagnostic = controller.last_remote_error().expect("diagnostic");
    assert!(diagnostic.contains("CONTENT_TOO_LARGE"));
}

#[test]
fn superseded_ticket_is_ignored() {
    let (mut controller, _log) = mock_controller();
    let first = controller.begin_load("# First", Some("a.md".to_owned())).expect("first");
    let second = controller.begin_load("# Second", Some("b.md".to_owned())).expect("second");

    let outcome = controller.complete_load(second, None).expect("second load");
    assert_eq!(outcome, LoadOutcome::Adopted(ParseProvenance::Local));

    let stale = controller.complete_load(first, None).expect("stale load");
    assert_eq!(stale, LoadOutcome::Superseded);

    // The newer snapshot survived the late completion.
    assert_eq!(controller.filename(), Some("b.md"));
    assert_eq!(
        controller.snapshot().node(&NodeId::heading(0)).map(GraphNode::text),
        Some("Second")
    );
}

#[test]
fn new_snapshot_clears_the_selection() {
    let (mut controller, _log) = mock_controller();
    let ticket = controller.begin_load(DOC, None).expect("ticket");
    controller.complete_load(ticket, None).expect("load");
    assert!(controller.select(&NodeId::heading(1)).expect("select"));
    assert_eq!(controller.selected(), Some(&NodeId::heading(1)));

    let ticket = controller.begin_load("# Other", None).expect("ticket");
    controller.complete_load(ticket, None).expect("reload");
    assert!(controller.selected().is_none());
}

#[test]
fn selecting_an_unknown_node_is_a_silent_no_op() {
    let (mut controller, log) = mock_controller();
    let ticket = controller.begin_load(DOC, None).expect("ticket");
    controller.complete_load(ticket, None).expect("load");
    let renders_before = log.borrow().renders.len();

    assert!(!controller.select(&NodeId::heading(99)).expect("select"));
    assert!(controller.selected().is_none());
    assert_eq!(log.borrow().renders.len(), renders_before);
}

#[test]
fn heading_detail_comes_from_the_section_index() {
    let (mut controller, _log) = mock_controller();
    let ticket = controller.begin_load(DOC, None).expect("ticket");
    controller.complete_load(ticket, None).expect("load");
    controller.select(&NodeId::heading(0)).expect("select");

    let detail = controller.selected_detail().expect("detail");
    assert_eq!(detail.title, "Title");
    assert_eq!(detail.kind, NodeKind::Heading);
    assert_eq!(detail.level, Some(1));
    assert_eq!(detail.source_line, Some(1));
    assert_eq!(detail.body_md, "intro line");
    assert_eq!(detail.body_html, "<p>intro line</p>\n");
}

#[test]
fn link_detail_uses_the_reference_template() {
    let (mut controller, _log) = mock_controller();
    let ticket = controller.begin_load(DOC, None).expect("ticket");
    controller.complete_load(ticket, None).expect("load");
    controller.select(&NodeId::reference("http://x")).expect("select");

    let detail = controller.selected_detail().expect("detail");
    assert_eq!(detail.kind, NodeKind::Link);
    assert_eq!(detail.url.as_deref(), Some("http://x"));
    assert_eq!(detail.body_md, "This is a reference to **Doc**.");
    assert_eq!(
        detail.body_html,
        "<p>This is a reference to <strong>Doc</strong>.</p>\n"
    );
}

#[test]
fn switching_to_the_same_backend_twice_is_a_no_op_the_second_time() {
    let (mut controller, log) = mock_controller();
    controller.switch_backend(BackendKind::Spatial).expect("switch");
    controller.switch_backend(BackendKind::Spatial).expect("switch again");

    let log = log.borrow();
    assert_eq!(log.inits, vec!["planar", "spatial"]);
    assert_eq!(log.destroys, vec!["planar"]);
}

#[test]
fn switching_re_renders_the_current_snapshot_into_the_new_backend() {
    let (mut controller, log) = mock_controller();
    let ticket = controller.begin_load(DOC, None).expect("ticket");
    controller.complete_load(ticket, None).expect("load");

    controller.switch_backend(BackendKind::Spatial).expect("switch");
    assert_eq!(controller.active_backend(), BackendKind::Spatial);
    assert_eq!(controller.phase(), SessionPhase::Loaded);
    assert_eq!(log.borrow().renders.last(), Some(&("spatial", 3)));
}

#[test]
fn failed_switch_reverts_to_the_previous_backend() {
    let (mut controller, log) = mock_controller();
    log.borrow_mut().fail_init = Some(BackendKind::Spatial);
    let ticket = controller.begin_load(DOC, None).expect("ticket");
    controller.complete_load(ticket, None).expect("load");

    controller.switch_backend(BackendKind::Spatial).unwrap_err();

    assert_eq!(controller.active_backend(), BackendKind::Planar);
    assert!(controller.has_backend());
    assert_eq!(controller.phase(), SessionPhase::Loaded);
    assert_eq!(controller.snapshot().heading_count(), 2);
    // The reverted backend shows the graph again.
    assert_eq!(log.borrow().renders.last(), Some(&("planar", 3)));

    // The controller is still fully usable.
    assert!(controller.select(&NodeId::heading(0)).expect("select"));
}

#[test]
fn clear_empties_the_session() {
    let (mut controller, _log) = mock_controller();
    let ticket = controller.begin_load(DOC, Some("doc.md".to_owned())).expect("ticket");
    controller.complete_load(ticket, None).expect("load");
    controller.select(&NodeId::heading(0)).expect("select");

    controller.clear();
    assert_eq!(controller.phase(), SessionPhase::Empty);
    assert!(controller.snapshot().is_empty());
    assert!(controller.selected().is_none());
    assert!(controller.filename().is_none());
    assert_eq!(controller.stats().node_count, 0);
}

#[test]
fn click_routes_the_backend_hit_test_into_selection() {
    // Real canvas backends here; the mock has no frame to hit.
    let mut controller =
        SessionController::new(Box::new(CanvasBackendFactory), None).expect("controller");
    let ticket = controller.begin_load(DOC, None).expect("ticket");
    controller.complete_load(ticket, None).expect("load");

    let span = controller
        .frame()
        .expect("frame")
        .spans_for(&NodeId::heading(1))[0];
    assert!(controller.click(span.1, span.0).expect("click"));
    assert_eq!(controller.selected(), Some(&NodeId::heading(1)));

    // A miss leaves the selection alone.
    assert!(!controller.click(9999, 9999).expect("miss"));
    assert_eq!(controller.selected(), Some(&NodeId::heading(1)));
}

#[test]
fn empty_content_still_reaches_loaded_with_an_empty_snapshot() {
    let (mut controller, _log) = mock_controller();
    let ticket = controller.begin_load("", None).expect("ticket");
    let outcome = controller.complete_load(ticket, None).expect("load");
    assert_eq!(outcome, LoadOutcome::Adopted(ParseProvenance::Local));
    assert_eq!(controller.phase(), SessionPhase::Loaded);
    assert!(controller.snapshot().is_empty());
}
