// SPDX-FileCopyrightText: 2026 Galatea Authors
// SPDX-License-Identifier: MIT

//! The structural graph model: node and edge types, ids, and snapshots.

mod edge;
mod ids;
mod node;
mod snapshot;

pub use edge::{EdgeKind, GraphEdge};
pub use ids::{IdError, NodeId};
pub use node::{GraphNode, HeadingNode, NodeKind, ReferenceNode};
pub use snapshot::{DocumentStats, GraphSnapshot, SectionIndex};
