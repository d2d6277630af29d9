// SPDX-FileCopyrightText: 2026 Galatea Authors
// SPDX-License-Identifier: MIT

//! Markdown structural graph builder.
//!
//! A single left-to-right pass over the lines of a document produces heading
//! nodes linked by hierarchy edges, reference nodes for inline link targets,
//! and a section index mapping each heading to its body text. Only ATX
//! headings and inline `[text](url)` links are structurally significant;
//! everything else is body text.

use std::collections::BTreeSet;

use memchr::memchr;
use smallvec::SmallVec;

use crate::model::{GraphEdge, GraphNode, GraphSnapshot, NodeId, SectionIndex};

/// An ancestor heading still in scope at the current line.
#[derive(Debug, Clone)]
struct OpenHeading {
    id: NodeId,
    level: u8,
}

/// Builds the structural graph for `text`.
///
/// Total: never fails; empty or heading-less input yields a snapshot without
/// heading nodes. Heading ids restart at zero on every call, so identical
/// input produces structurally identical snapshots.
pub fn parse_markdown(text: &str) -> GraphSnapshot {
    let mut nodes: Vec<GraphNode> = Vec::new();
    let mut edges: Vec<GraphEdge> = Vec::new();
    let mut sections = SectionIndex::new();

    // Chain of ancestors ordered by strictly increasing level. Six slots
    // cover the full ATX level domain without the code assuming it.
    let mut stack: SmallVec<[OpenHeading; 6]> = SmallVec::new();
    let mut heading_index = 0usize;
    let mut section_owner: Option<NodeId> = None;
    let mut section_body: Vec<&str> = Vec::new();
    let mut known_urls: BTreeSet<&str> = BTreeSet::new();

    for (line_index, line) in text.split('\n').enumerate() {
        if let Some((level, title)) = match_heading(line) {
            if let Some(owner) = section_owner.take() {
                sections.insert(owner, join_section(&section_body));
                section_body.clear();
            }

            let id = NodeId::heading(heading_index);
            heading_index += 1;

            // A heading can only nest under a strictly shallower one.
            while stack.last().is_some_and(|open| open.level >= level) {
                stack.pop();
            }
            if let Some(parent) = stack.last() {
                edges.push(GraphEdge::hierarchy(parent.id.clone(), id.clone()));
            }

            nodes.push(GraphNode::heading(id.clone(), title, level, line_index + 1));
            stack.push(OpenHeading {
                id: id.clone(),
                level,
            });
            section_owner = Some(id);
        } else if section_owner.is_some() {
            section_body.push(line);
        }

        // Link scanning sees the stack as left by the heading branch above,
        // so a link on a heading line hangs off that heading itself.
        for (link_text, url) in InlineLinks::new(line) {
            if known_urls.insert(url) {
                nodes.push(GraphNode::reference(NodeId::reference(url), link_text, url));
            }
            if let Some(top) = stack.last() {
                edges.push(GraphEdge::reference(top.id.clone(), NodeId::reference(url)));
            }
        }
    }

    if let Some(owner) = section_owner {
        sections.insert(owner, join_section(&section_body));
    }

    GraphSnapshot::new(nodes, edges, sections)
}

/// Matches an ATX heading: 1..=6 leading `#` markers, at least one whitespace
/// character, then text that is non-empty after trimming.
fn match_heading(line: &str) -> Option<(u8, &str)> {
    let marker_len = line.bytes().take_while(|&b| b == b'#').count();
    if marker_len == 0 || marker_len > 6 {
        return None;
    }

    let rest = &line[marker_len..];
    let trimmed = rest.trim_start();
    if trimmed.len() == rest.len() {
        // `#text` without a separator is body text.
        return None;
    }

    let title = trimmed.trim_end();
    if title.is_empty() {
        return None;
    }

    Some((marker_len as u8, title))
}

fn join_section(lines: &[&str]) -> String {
    let start = lines.iter().position(|line| !line.trim().is_empty());
    let Some(start) = start else {
        return String::new();
    };
    let end = lines
        .iter()
        .rposition(|line| !line.trim().is_empty())
        .unwrap_or(start);
    lines[start..=end].join("\n")
}

/// Iterator over `[text](url)` occurrences in one line, left to right.
///
/// Text is one or more characters without `]`, url one or more without `)`;
/// neither nests. A candidate `[` that does not complete a link only advances
/// the scan by one byte, matching the regex the original grammar came from.
struct InlineLinks<'a> {
    line: &'a str,
    pos: usize,
}

impl<'a> InlineLinks<'a> {
    fn new(line: &'a str) -> Self {
        Self { line, pos: 0 }
    }
}

impl<'a> Iterator for InlineLinks<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.line.as_bytes();
        while self.pos < bytes.len() {
            let open = self.pos + memchr(b'[', &bytes[self.pos..])?;
            let Some(close) = memchr(b']', &bytes[open + 1..]).map(|at| open + 1 + at) else {
                return None;
            };
            if close == open + 1 || bytes.get(close + 1) != Some(&b'(') {
                self.pos = open + 1;
                continue;
            }
            let Some(end) = memchr(b')', &bytes[close + 2..]).map(|at| close + 2 + at) else {
                self.pos = open + 1;
                continue;
            };
            if end == close + 2 {
                self.pos = open + 1;
                continue;
            }

            self.pos = end + 1;
            return Some((&self.line[open + 1..close], &self.line[close + 2..end]));
        }
        None
    }
}
