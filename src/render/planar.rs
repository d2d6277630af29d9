// SPDX-FileCopyrightText: 2026 Galatea Authors
// SPDX-License-Identifier: MIT

//! The 2D backend: a layered tree on the character canvas.

use std::collections::BTreeMap;

use crate::layout::{layout_graph, GraphLayout, NodePlacement};
use crate::model::{GraphEdge, GraphNode, NodeId};

use super::{
    BackendError, BackendKind, Canvas, CanvasError, LineSpan, RenderBackend, RenderedFrame,
};

pub(crate) const SELECTED_MARKER: char = '●';
const REFERENCE_DASH: char = '┄';
const REFERENCE_DASH_VERTICAL: char = '┆';
const REFERENCE_ARROW: char = '▸';

#[derive(Debug, Default)]
pub struct PlanarBackend {
    initialized: bool,
    frame: Option<RenderedFrame>,
}

impl PlanarBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RenderBackend for PlanarBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Planar
    }

    fn initialize(&mut self) -> Result<(), BackendError> {
        self.initialized = true;
        Ok(())
    }

    fn render(
        &mut self,
        nodes: &[GraphNode],
        edges: &[GraphEdge],
        selected: Option<&NodeId>,
    ) -> Result<(), BackendError> {
        if !self.initialized {
            return Err(BackendError::NotInitialized);
        }
        if nodes.is_empty() {
            self.frame = Some(RenderedFrame::default());
            return Ok(());
        }

        let layout = layout_graph(nodes, edges);
        let mut canvas = Canvas::new(layout.width, layout.height)?;

        for placement in &layout.placements {
            draw_node_box(&mut canvas, placement, 0, 0, selected)?;
        }
        for &(parent, child) in &layout.hierarchy {
            draw_hierarchy_connector(
                &mut canvas,
                &layout.placements[parent],
                &layout.placements[child],
            )?;
        }
        for &(source, target) in &layout.references {
            draw_reference_connector(
                &mut canvas,
                &layout.placements[source],
                &layout.placements[target],
            )?;
        }

        let spans = placement_spans(&layout, 0, 0);
        self.frame = Some(RenderedFrame::new(canvas.into_lines(), spans));
        Ok(())
    }

    fn frame(&self) -> Option<&RenderedFrame> {
        self.frame.as_ref()
    }

    fn clear(&mut self) {
        self.frame = None;
    }

    fn destroy(&mut self) {
        self.frame = None;
        self.initialized = false;
    }
}

/// Draws one node box with its label, shifted by `(dx, dy)`.
pub(crate) fn draw_node_box(
    canvas: &mut Canvas,
    placement: &NodePlacement,
    dx: usize,
    dy: usize,
    selected: Option<&NodeId>,
) -> Result<(), CanvasError> {
    let x = placement.x + dx;
    let y = placement.y + dy;
    canvas.draw_box(x, y, x + placement.width - 1, y + placement.height - 1)?;
    canvas.write_str(x + 2, y + 1, &placement.label)?;
    if selected == Some(&placement.id) {
        canvas.set(x + 1, y + 1, SELECTED_MARKER)?;
    }
    Ok(())
}

/// Elbow from a parent's underside down and across to a child's label row.
///
/// Siblings share the vertical run, so the canvas merges their corners into
/// tees and leaves the last child with a plain corner.
pub(crate) fn draw_hierarchy_connector(
    canvas: &mut Canvas,
    parent: &NodePlacement,
    child: &NodePlacement,
) -> Result<(), CanvasError> {
    let px = parent.x + 2;
    let cy = child.middle_y();
    if cy <= parent.y + parent.height || child.x <= px + 1 {
        return Ok(());
    }
    canvas.draw_vline(px, parent.y + parent.height, cy - 1)?;
    canvas.set(px, cy, super::UNICODE_BOX_BOTTOM_LEFT)?;
    canvas.draw_hline(px + 1, child.x - 1, cy)?;
    Ok(())
}

/// Dashed connector from a heading to one of its reference nodes. Drawn only
/// over blank cells so it never defaces a box.
pub(crate) fn draw_reference_connector(
    canvas: &mut Canvas,
    source: &NodePlacement,
    target: &NodePlacement,
) -> Result<(), CanvasError> {
    if target.x <= source.right_x() + 2 {
        return Ok(());
    }
    let sy = source.middle_y();
    let ty = target.middle_y();
    let lane = target.x - 2;

    for x in (source.right_x() + 1)..=lane {
        write_if_blank(canvas, x, sy, REFERENCE_DASH)?;
    }
    if ty != sy {
        let (top, bottom) = if sy <= ty { (sy, ty) } else { (ty, sy) };
        for y in top..=bottom {
            write_if_blank(canvas, lane, y, REFERENCE_DASH_VERTICAL)?;
        }
    }
    write_if_blank(canvas, target.x - 1, ty, REFERENCE_ARROW)?;
    Ok(())
}

pub(crate) fn write_if_blank(
    canvas: &mut Canvas,
    x: usize,
    y: usize,
    ch: char,
) -> Result<(), CanvasError> {
    if canvas.in_bounds(x, y) && canvas.get(x, y)? == ' ' {
        canvas.set(x, y, ch)?;
    }
    Ok(())
}

/// Hit-test and highlight spans for every placed box, shifted by `(dx, dy)`.
pub(crate) fn placement_spans(
    layout: &GraphLayout,
    dx: usize,
    dy: usize,
) -> BTreeMap<NodeId, Vec<LineSpan>> {
    let mut spans: BTreeMap<NodeId, Vec<LineSpan>> = BTreeMap::new();
    for placement in &layout.placements {
        let x0 = placement.x + dx;
        let x1 = x0 + placement.width - 1;
        let rows = (placement.y + dy)..(placement.y + dy + placement.height);
        spans.insert(placement.id.clone(), rows.map(|y| (y, x0, x1)).collect());
    }
    spans
}
