// SPDX-FileCopyrightText: 2026 Galatea Authors
// SPDX-License-Identifier: MIT

use super::ids::NodeId;

/// The relation an edge encodes, with its wire spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EdgeKind {
    /// Containment from an ancestor heading to a direct descendant heading.
    Hierarchy,
    /// From a heading to a link node appearing within that heading's scope.
    Reference,
}

impl EdgeKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Hierarchy => "hierarchy",
            Self::Reference => "reference",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "hierarchy" => Some(Self::Hierarchy),
            "reference" => Some(Self::Reference),
            _ => None,
        }
    }
}

/// A directed edge of the structural graph.
///
/// Edges are kept in emission order; duplicate reference edges into a
/// deduplicated target are deliberate (one edge per literal link occurrence).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphEdge {
    source: NodeId,
    target: NodeId,
    kind: EdgeKind,
}

impl GraphEdge {
    pub fn new(source: NodeId, target: NodeId, kind: EdgeKind) -> Self {
        Self {
            source,
            target,
            kind,
        }
    }

    pub fn hierarchy(source: NodeId, target: NodeId) -> Self {
        Self::new(source, target, EdgeKind::Hierarchy)
    }

    pub fn reference(source: NodeId, target: NodeId) -> Self {
        Self::new(source, target, EdgeKind::Reference)
    }

    pub fn source(&self) -> &NodeId {
        &self.source
    }

    pub fn target(&self) -> &NodeId {
        &self.target
    }

    pub fn kind(&self) -> EdgeKind {
        self.kind
    }
}
