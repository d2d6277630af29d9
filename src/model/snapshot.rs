// SPDX-FileCopyrightText: 2026 Galatea Authors
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;

use super::edge::{EdgeKind, GraphEdge};
use super::ids::NodeId;
use super::node::{GraphNode, NodeKind};

/// Per-heading body text: the raw lines strictly between a heading and the
/// next heading of level <= its own, trimmed of leading/trailing blank lines.
///
/// Rebuilt wholesale on every parse, never patched in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionIndex {
    entries: BTreeMap<NodeId, String>,
}

impl SectionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: NodeId, text: String) {
        self.entries.insert(id, text);
    }

    /// Stored section text, or `""` when the id has no entry. Total.
    pub fn get(&self, id: &NodeId) -> &str {
        self.entries.get(id).map(String::as_str).unwrap_or("")
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Document-level counters reported alongside a parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentStats {
    pub node_count: u64,
    pub edge_count: u64,
    pub line_count: u64,
    pub word_count: u64,
    pub char_count: u64,
}

impl DocumentStats {
    pub fn for_text(text: &str, node_count: usize, edge_count: usize) -> Self {
        Self {
            node_count: node_count as u64,
            edge_count: edge_count as u64,
            line_count: text.split('\n').count() as u64,
            word_count: text.split_whitespace().count() as u64,
            char_count: text.chars().count() as u64,
        }
    }
}

/// One complete, immutable parse result.
///
/// A new parse always constructs a fresh snapshot that replaces the previous
/// one wholesale; nothing mutates a snapshot after construction, so a backend
/// holding a borrowed view is never surprised by in-place edits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphSnapshot {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    sections: SectionIndex,
}

impl GraphSnapshot {
    pub fn new(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>, sections: SectionIndex) -> Self {
        Self {
            nodes,
            edges,
            sections,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn sections(&self) -> &SectionIndex {
        &self.sections
    }

    pub fn node(&self, id: &NodeId) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.id() == id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn heading_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.kind() == NodeKind::Heading).count()
    }

    pub fn hierarchy_edge_count(&self) -> usize {
        self.edges.iter().filter(|edge| edge.kind() == EdgeKind::Hierarchy).count()
    }

    pub fn stats_for(&self, text: &str) -> DocumentStats {
        DocumentStats::for_text(text, self.nodes.len(), self.edges.len())
    }

    pub fn into_parts(self) -> (Vec<GraphNode>, Vec<GraphEdge>, SectionIndex) {
        (self.nodes, self.edges, self.sections)
    }
}
