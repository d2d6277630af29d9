// SPDX-FileCopyrightText: 2026 Galatea Authors
// SPDX-License-Identifier: MIT

use super::ids::NodeId;

/// The discriminant of a [`GraphNode`], with its wire spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum NodeKind {
    Heading,
    Link,
}

impl NodeKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Heading => "heading",
            Self::Link => "link",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "heading" => Some(Self::Heading),
            "link" => Some(Self::Link),
            _ => None,
        }
    }
}

/// A Markdown heading line, one vertex of the hierarchy forest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingNode {
    id: NodeId,
    text: String,
    level: u8,
    source_line: usize,
}

impl HeadingNode {
    /// `level` is the literal count of leading `#` markers (1..=6);
    /// `source_line` is 1-based.
    pub fn new(id: NodeId, text: impl Into<String>, level: u8, source_line: usize) -> Self {
        Self {
            id,
            text: text.into(),
            level,
            source_line,
        }
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn source_line(&self) -> usize {
        self.source_line
    }
}

/// A unique link target URL; repeated occurrences of the same URL share one
/// reference node, keeping the first occurrence's link text as display text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceNode {
    id: NodeId,
    text: String,
    url: String,
}

impl ReferenceNode {
    pub fn new(id: NodeId, text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            url: url.into(),
        }
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// A vertex of the structural graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphNode {
    Heading(HeadingNode),
    Reference(ReferenceNode),
}

impl GraphNode {
    pub fn heading(id: NodeId, text: impl Into<String>, level: u8, source_line: usize) -> Self {
        Self::Heading(HeadingNode::new(id, text, level, source_line))
    }

    pub fn reference(id: NodeId, text: impl Into<String>, url: impl Into<String>) -> Self {
        Self::Reference(ReferenceNode::new(id, text, url))
    }

    pub fn id(&self) -> &NodeId {
        match self {
            Self::Heading(node) => node.id(),
            Self::Reference(node) => node.id(),
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Heading(node) => node.text(),
            Self::Reference(node) => node.text(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Heading(_) => NodeKind::Heading,
            Self::Reference(_) => NodeKind::Link,
        }
    }

    pub fn as_heading(&self) -> Option<&HeadingNode> {
        match self {
            Self::Heading(node) => Some(node),
            Self::Reference(_) => None,
        }
    }

    pub fn as_reference(&self) -> Option<&ReferenceNode> {
        match self {
            Self::Heading(_) => None,
            Self::Reference(node) => Some(node),
        }
    }
}
