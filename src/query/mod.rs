// SPDX-FileCopyrightText: 2026 Galatea Authors
// SPDX-License-Identifier: MIT

//! Read-only queries over a graph snapshot: search and structural walks.

use std::fmt;

use crate::model::{EdgeKind, GraphNode, GraphSnapshot, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    #[default]
    Substring,
    Regex,
}

#[derive(Debug)]
pub enum SearchError {
    InvalidRegex {
        pattern: String,
        source: regex::Error,
    },
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRegex { pattern, source } => {
                write!(f, "invalid search pattern `{pattern}`: {source}")
            }
        }
    }
}

impl std::error::Error for SearchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidRegex { source, .. } => Some(source),
        }
    }
}

const FUZZY_CUTOFF: f64 = 55.0;

/// Finds nodes whose text or URL matches `query`, in document order.
///
/// Substring search is case-insensitive; when it finds nothing, fuzzy
/// ranking over node text takes over so near misses still surface, best
/// match first.
pub fn search_nodes(
    snapshot: &GraphSnapshot,
    query: &str,
    mode: SearchMode,
) -> Result<Vec<NodeId>, SearchError> {
    if query.is_empty() {
        return Ok(Vec::new());
    }

    match mode {
        SearchMode::Substring => {
            let needle = query.to_lowercase();
            let matched: Vec<NodeId> = snapshot
                .nodes()
                .iter()
                .filter(|node| haystack_for(node).to_lowercase().contains(&needle))
                .map(|node| node.id().clone())
                .collect();
            if !matched.is_empty() {
                return Ok(matched);
            }
            Ok(fuzzy_ranked(snapshot, query))
        }
        SearchMode::Regex => {
            let pattern = regex::Regex::new(query).map_err(|source| SearchError::InvalidRegex {
                pattern: query.to_owned(),
                source,
            })?;
            Ok(snapshot
                .nodes()
                .iter()
                .filter(|node| pattern.is_match(&haystack_for(node)))
                .map(|node| node.id().clone())
                .collect())
        }
    }
}

fn haystack_for(node: &GraphNode) -> String {
    match node.as_reference() {
        Some(reference) => format!("{} {}", reference.text(), reference.url()),
        None => node.text().to_owned(),
    }
}

fn fuzzy_ranked(snapshot: &GraphSnapshot, query: &str) -> Vec<NodeId> {
    let mut scored: Vec<(f64, usize, NodeId)> = snapshot
        .nodes()
        .iter()
        .enumerate()
        .filter_map(|(index, node)| {
            let ratio = rapidfuzz::fuzz::ratio(query.chars(), node.text().chars());
            (ratio >= FUZZY_CUTOFF).then(|| (ratio, index, node.id().clone()))
        })
        .collect();
    // Best score first; document order breaks ties deterministically.
    scored.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));
    scored.into_iter().map(|(_, _, id)| id).collect()
}

/// Direct child headings of `id`, in document order.
pub fn children_of<'a>(snapshot: &'a GraphSnapshot, id: &NodeId) -> Vec<&'a NodeId> {
    snapshot
        .edges()
        .iter()
        .filter(|edge| edge.kind() == EdgeKind::Hierarchy && edge.source() == id)
        .map(|edge| edge.target())
        .collect()
}

/// Reference targets of `id`, one entry per literal link occurrence.
pub fn references_from<'a>(snapshot: &'a GraphSnapshot, id: &NodeId) -> Vec<&'a NodeId> {
    snapshot
        .edges()
        .iter()
        .filter(|edge| edge.kind() == EdgeKind::Reference && edge.source() == id)
        .map(|edge| edge.target())
        .collect()
}

/// The chain from `id` up to its root, starting at `id` itself.
///
/// Hierarchy edges form a forest, so each node has at most one parent and the
/// walk always terminates.
pub fn path_to_root(snapshot: &GraphSnapshot, id: &NodeId) -> Vec<NodeId> {
    let mut path = vec![id.clone()];
    let mut current = id.clone();
    while let Some(parent) = snapshot
        .edges()
        .iter()
        .find(|edge| edge.kind() == EdgeKind::Hierarchy && edge.target() == &current)
        .map(|edge| edge.source().clone())
    {
        path.push(parent.clone());
        current = parent;
    }
    path
}
