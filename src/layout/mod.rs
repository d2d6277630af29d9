// SPDX-FileCopyrightText: 2026 Galatea Authors
// SPDX-License-Identifier: MIT

//! Deterministic layout shared by both rendering backends.
//!
//! No physics: heading depth in the hierarchy forest becomes horizontal
//! indentation, document order becomes vertical order, and reference nodes sit
//! beside the heading that first references them. Both backends consume the
//! same placements; the spatial backend additionally projects the depth axis.

use std::collections::BTreeMap;

use crate::model::{EdgeKind, GraphEdge, GraphNode, NodeId, NodeKind};

pub const BOX_HEIGHT: usize = 3;
const DEPTH_INDENT: usize = 6;
const REFERENCE_GAP: usize = 4;
const MAX_LABEL_CHARS: usize = 28;

/// Where one node's box sits on the (unprojected) plane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodePlacement {
    pub id: NodeId,
    pub kind: NodeKind,
    pub label: String,
    pub depth: usize,
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl NodePlacement {
    /// Row of the label line, where connectors attach.
    pub fn middle_y(&self) -> usize {
        self.y + 1
    }

    pub fn right_x(&self) -> usize {
        self.x + self.width - 1
    }
}

/// Placements plus edge endpoints resolved to placement indices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphLayout {
    pub placements: Vec<NodePlacement>,
    pub hierarchy: Vec<(usize, usize)>,
    pub references: Vec<(usize, usize)>,
    pub width: usize,
    pub height: usize,
    pub max_depth: usize,
}

impl GraphLayout {
    pub fn placement_of(&self, id: &NodeId) -> Option<&NodePlacement> {
        self.placements.iter().find(|placement| &placement.id == id)
    }
}

pub fn layout_graph(nodes: &[GraphNode], edges: &[GraphEdge]) -> GraphLayout {
    let mut layout = GraphLayout::default();
    if nodes.is_empty() {
        return layout;
    }

    let depths = heading_depths(nodes, edges);
    let mut index_of: BTreeMap<NodeId, usize> = BTreeMap::new();
    let mut cursor = 0usize;

    // Headings first: document order is a pre-order walk of the forest, so
    // emitting them top to bottom already groups subtrees.
    for node in nodes {
        let Some(heading) = node.as_heading() else {
            continue;
        };
        let depth = depths.get(heading.id()).copied().unwrap_or(0);
        let label = truncate_label(heading.text());
        let placement = NodePlacement {
            id: heading.id().clone(),
            kind: NodeKind::Heading,
            width: label.chars().count() + 4,
            label,
            depth,
            x: depth * DEPTH_INDENT,
            y: cursor,
            height: BOX_HEIGHT,
        };
        index_of.insert(heading.id().clone(), layout.placements.len());
        layout.placements.push(placement);
        cursor += BOX_HEIGHT + 1;
    }

    // References beside the heading that first references them, stacked when
    // one heading links out more than once.
    let mut stacked_below: BTreeMap<usize, usize> = BTreeMap::new();
    for edge in edges {
        if edge.kind() != EdgeKind::Reference || index_of.contains_key(edge.target()) {
            continue;
        }
        let Some(&source_index) = index_of.get(edge.source()) else {
            continue;
        };
        let Some(node) = nodes.iter().find(|node| node.id() == edge.target()) else {
            continue;
        };

        let stack_slot = stacked_below.entry(source_index).or_insert(0);
        let source = &layout.placements[source_index];
        let label = truncate_label(node.text());
        let placement = NodePlacement {
            id: edge.target().clone(),
            kind: NodeKind::Link,
            width: label.chars().count() + 4,
            label,
            depth: source.depth + 1,
            x: source.x + source.width + REFERENCE_GAP,
            y: source.y + *stack_slot * BOX_HEIGHT,
            height: BOX_HEIGHT,
        };
        cursor = cursor.max(placement.y + BOX_HEIGHT + 1);
        *stack_slot += 1;
        index_of.insert(edge.target().clone(), layout.placements.len());
        layout.placements.push(placement);
    }

    // Reference nodes nothing points at (links seen before any heading) park
    // at the bottom so they stay visible without inventing a synthetic root.
    for node in nodes {
        if node.kind() != NodeKind::Link || index_of.contains_key(node.id()) {
            continue;
        }
        let label = truncate_label(node.text());
        let placement = NodePlacement {
            id: node.id().clone(),
            kind: NodeKind::Link,
            width: label.chars().count() + 4,
            label,
            depth: 0,
            x: 0,
            y: cursor,
            height: BOX_HEIGHT,
        };
        index_of.insert(node.id().clone(), layout.placements.len());
        layout.placements.push(placement);
        cursor += BOX_HEIGHT + 1;
    }

    for edge in edges {
        let (Some(&source), Some(&target)) =
            (index_of.get(edge.source()), index_of.get(edge.target()))
        else {
            continue;
        };
        match edge.kind() {
            EdgeKind::Hierarchy => layout.hierarchy.push((source, target)),
            EdgeKind::Reference => layout.references.push((source, target)),
        }
    }

    layout.height = cursor.max(1);
    layout.width = layout
        .placements
        .iter()
        .map(|placement| placement.x + placement.width)
        .max()
        .unwrap_or(0)
        + 2;
    layout.max_depth = layout
        .placements
        .iter()
        .map(|placement| placement.depth)
        .max()
        .unwrap_or(0);

    layout
}

/// Forest depth per heading id; roots sit at depth 0. A level jump (say 1 to
/// 4) is still a single parent/child step.
fn heading_depths(nodes: &[GraphNode], edges: &[GraphEdge]) -> BTreeMap<NodeId, usize> {
    let mut parent_of: BTreeMap<&NodeId, &NodeId> = BTreeMap::new();
    for edge in edges {
        if edge.kind() == EdgeKind::Hierarchy {
            parent_of.insert(edge.target(), edge.source());
        }
    }

    let mut depths = BTreeMap::new();
    for node in nodes {
        let Some(heading) = node.as_heading() else {
            continue;
        };
        let mut depth = 0usize;
        let mut current = heading.id();
        while let Some(parent) = parent_of.get(current) {
            depth += 1;
            current = parent;
        }
        depths.insert(heading.id().clone(), depth);
    }
    depths
}

fn truncate_label(text: &str) -> String {
    let mut label: String = text.chars().take(MAX_LABEL_CHARS).collect();
    if text.chars().count() > MAX_LABEL_CHARS {
        label.pop();
        label.push('…');
    }
    if label.is_empty() {
        label.push(' ');
    }
    label
}
