// SPDX-FileCopyrightText: 2026 Galatea Authors
// SPDX-License-Identifier: MIT

//! The session controller.
//!
//! Owns the current graph snapshot, the selection, and the active rendering
//! backend, and orchestrates the load path: remote parse when a client is
//! configured, local fallback otherwise or on any remote failure. The
//! controller itself is a synchronous state machine; the only suspension
//! point (the network call) lives between `begin_load` and `complete_load`,
//! and a load ticket that has been superseded by a newer one is ignored when
//! it finally completes, so a slow remote can never overwrite a newer parse.

use std::fmt;

use crate::format::parse_markdown;
use crate::model::{DocumentStats, GraphNode, GraphSnapshot, NodeId, NodeKind};
use crate::remote::{RemoteParseClient, RemoteParseError, RemoteParseOutcome};
use crate::render::html::render_markdown_html;
use crate::render::{BackendError, BackendFactory, BackendKind, RenderBackend, RenderedFrame};

#[cfg(test)]
mod tests;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Empty,
    Loaded,
    Switching,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseProvenance {
    Local,
    Remote,
}

impl ParseProvenance {
    pub fn label(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Remote => "remote",
        }
    }
}

/// Claim on one in-flight load. A newer `begin_load` supersedes older
/// tickets; completing a superseded ticket is a no-op.
#[derive(Debug)]
pub struct LoadTicket {
    seq: u64,
    content: String,
    filename: Option<String>,
}

impl LoadTicket {
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Adopted(ParseProvenance),
    Superseded,
}

#[derive(Debug)]
pub enum SessionError {
    /// A backend switch is in flight; retry after it settles.
    SwitchInFlight,
    Backend(BackendError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SwitchInFlight => f.write_str("a backend switch is in flight"),
            Self::Backend(err) => write!(f, "rendering backend failure: {err}"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Backend(err) => Some(err),
            Self::SwitchInFlight => None,
        }
    }
}

/// What the detail view shows for the selected node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDetail {
    pub title: String,
    pub kind: NodeKind,
    pub level: Option<u8>,
    pub source_line: Option<usize>,
    pub url: Option<String>,
    pub body_md: String,
    pub body_html: String,
}

pub struct SessionController {
    snapshot: GraphSnapshot,
    selected: Option<NodeId>,
    backend: Option<Box<dyn RenderBackend>>,
    backend_kind: BackendKind,
    factory: Box<dyn BackendFactory>,
    phase: SessionPhase,
    filename: Option<String>,
    stats: DocumentStats,
    provenance: ParseProvenance,
    last_remote_error: Option<String>,
    remote: Option<RemoteParseClient>,
    load_seq: u64,
}

impl SessionController {
    /// Creates a controller with the planar backend brought up and active.
    pub fn new(
        factory: Box<dyn BackendFactory>,
        remote: Option<RemoteParseClient>,
    ) -> Result<Self, SessionError> {
        let mut controller = Self {
            snapshot: GraphSnapshot::empty(),
            selected: None,
            backend: None,
            backend_kind: BackendKind::Planar,
            factory,
            phase: SessionPhase::Empty,
            filename: None,
            stats: DocumentStats::default(),
            provenance: ParseProvenance::Local,
            last_remote_error: None,
            remote,
            load_seq: 0,
        };
        let backend = controller
            .bring_up(BackendKind::Planar)
            .map_err(SessionError::Backend)?;
        controller.backend = Some(backend);
        Ok(controller)
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn snapshot(&self) -> &GraphSnapshot {
        &self.snapshot
    }

    pub fn selected(&self) -> Option<&NodeId> {
        self.selected.as_ref()
    }

    pub fn active_backend(&self) -> BackendKind {
        self.backend_kind
    }

    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    pub fn stats(&self) -> DocumentStats {
        self.stats
    }

    pub fn provenance(&self) -> ParseProvenance {
        self.provenance
    }

    pub fn last_remote_error(&self) -> Option<&str> {
        self.last_remote_error.as_deref()
    }

    pub fn remote_configured(&self) -> bool {
        self.remote.is_some()
    }

    pub fn frame(&self) -> Option<&RenderedFrame> {
        self.backend.as_ref().and_then(|backend| backend.frame())
    }

    /// Claims the next load. Rejected while a backend switch is in flight.
    pub fn begin_load(
        &mut self,
        content: impl Into<String>,
        filename: Option<String>,
    ) -> Result<LoadTicket, SessionError> {
        if self.phase == SessionPhase::Switching {
            return Err(SessionError::SwitchInFlight);
        }
        self.load_seq += 1;
        Ok(LoadTicket {
            seq: self.load_seq,
            content: content.into(),
            filename,
        })
    }

    /// Adopts the result of a load.
    ///
    /// `remote` is `None` for a purely local load, otherwise the remote parse
    /// result; a remote failure degrades to the local builder and is recorded
    /// as a diagnostic, never surfaced as a failure. Remote payloads carry no
    /// section bodies, so sections are always derived locally from the
    /// ticket's content (deterministic ids make the two line up). The session
    /// keeps the filename the load was requested with.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        remote: Option<Result<RemoteParseOutcome, RemoteParseError>>,
    ) -> Result<LoadOutcome, SessionError> {
        if ticket.seq != self.load_seq {
            return Ok(LoadOutcome::Superseded);
        }

        let (snapshot, stats, provenance) = match remote {
            Some(Ok(outcome)) => {
                self.last_remote_error = None;
                let (_, _, sections) = parse_markdown(&ticket.content).into_parts();
                (
                    GraphSnapshot::new(outcome.nodes, outcome.edges, sections),
                    outcome.stats,
                    ParseProvenance::Remote,
                )
            }
            Some(Err(err)) => {
                self.last_remote_error = Some(err.to_string());
                local_parse(&ticket.content)
            }
            None => local_parse(&ticket.content),
        };

        self.snapshot = snapshot;
        self.selected = None;
        self.filename = ticket.filename;
        self.stats = stats;
        self.provenance = provenance;
        self.phase = SessionPhase::Loaded;
        self.render_active().map_err(SessionError::Backend)?;
        Ok(LoadOutcome::Adopted(provenance))
    }

    /// The whole load path in one call: claim, remote attempt when a client
    /// is configured, adopt.
    pub async fn load_content(
        &mut self,
        content: String,
        filename: Option<String>,
    ) -> Result<LoadOutcome, SessionError> {
        let ticket = self.begin_load(content, filename)?;
        let remote = match &self.remote {
            Some(client) => Some(client.parse(ticket.content(), ticket.filename()).await),
            None => None,
        };
        self.complete_load(ticket, remote)
    }

    pub fn clear(&mut self) {
        self.snapshot = GraphSnapshot::empty();
        self.selected = None;
        self.filename = None;
        self.stats = DocumentStats::default();
        self.provenance = ParseProvenance::Local;
        self.last_remote_error = None;
        if let Some(backend) = self.backend.as_mut() {
            backend.clear();
        }
        self.phase = SessionPhase::Empty;
    }

    /// Selects `id` if it exists in the current snapshot; an unknown id is a
    /// silent no-op reported as `Ok(false)`.
    pub fn select(&mut self, id: &NodeId) -> Result<bool, SessionError> {
        if self.phase == SessionPhase::Switching {
            return Err(SessionError::SwitchInFlight);
        }
        if !self.snapshot.contains(id) {
            return Ok(false);
        }
        self.selected = Some(id.clone());
        self.render_active().map_err(SessionError::Backend)?;
        Ok(true)
    }

    pub fn clear_selection(&mut self) -> Result<(), SessionError> {
        if self.selected.take().is_some() {
            self.render_active().map_err(SessionError::Backend)?;
        }
        Ok(())
    }

    pub fn selected_detail(&self) -> Option<NodeDetail> {
        let id = self.selected.as_ref()?;
        let node = self.snapshot.node(id)?;
        Some(match node {
            GraphNode::Heading(heading) => {
                let body_md = self.snapshot.sections().get(id).to_owned();
                NodeDetail {
                    title: heading.text().to_owned(),
                    kind: NodeKind::Heading,
                    level: Some(heading.level()),
                    source_line: Some(heading.source_line()),
                    url: None,
                    body_html: render_markdown_html(&body_md),
                    body_md,
                }
            }
            GraphNode::Reference(reference) => {
                let body_md = format!("This is a reference to **{}**.", reference.text());
                NodeDetail {
                    title: reference.text().to_owned(),
                    kind: NodeKind::Link,
                    level: None,
                    source_line: None,
                    url: Some(reference.url().to_owned()),
                    body_html: render_markdown_html(&body_md),
                    body_md,
                }
            }
        })
    }

    /// Swaps the rendering backend. Switching to the already-active kind is a
    /// no-op. On init failure the previous kind is brought back up so the
    /// controller is never left torn down without a working backend; the
    /// error is returned either way.
    pub fn switch_backend(&mut self, target: BackendKind) -> Result<(), SessionError> {
        if target == self.backend_kind {
            return Ok(());
        }

        let resume_phase = self.phase;
        self.phase = SessionPhase::Switching;
        if let Some(mut backend) = self.backend.take() {
            backend.destroy();
        }

        let previous = self.backend_kind;
        let result = match self.bring_up(target) {
            Ok(backend) => {
                self.backend = Some(backend);
                self.backend_kind = target;
                Ok(())
            }
            Err(err) => {
                if let Ok(backend) = self.bring_up(previous) {
                    self.backend = Some(backend);
                }
                Err(SessionError::Backend(err))
            }
        };
        self.phase = resume_phase;

        match result {
            Ok(()) => {
                self.render_active().map_err(SessionError::Backend)?;
                Ok(())
            }
            Err(err) => {
                // Best effort: the reverted backend shows the graph again,
                // but the caller gets the switch failure.
                let _ = self.render_active();
                Err(err)
            }
        }
    }

    /// Routes a frame-coordinate click through the active backend's hit-test
    /// into selection.
    pub fn click(&mut self, x: usize, y: usize) -> Result<bool, SessionError> {
        let Some(hit) = self.backend.as_ref().and_then(|backend| backend.node_at(x, y)) else {
            return Ok(false);
        };
        self.select(&hit)
    }

    fn bring_up(&self, kind: BackendKind) -> Result<Box<dyn RenderBackend>, BackendError> {
        let mut backend = self.factory.create(kind);
        backend.initialize()?;
        Ok(backend)
    }

    fn render_active(&mut self) -> Result<(), BackendError> {
        let Some(backend) = self.backend.as_mut() else {
            return Ok(());
        };
        if self.snapshot.is_empty() {
            backend.clear();
            return Ok(());
        }
        backend.render(
            self.snapshot.nodes(),
            self.snapshot.edges(),
            self.selected.as_ref(),
        )
    }
}

fn local_parse(content: &str) -> (GraphSnapshot, DocumentStats, ParseProvenance) {
    let snapshot = parse_markdown(content);
    let stats = snapshot.stats_for(content);
    (snapshot, stats, ParseProvenance::Local)
}
