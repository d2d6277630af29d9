// SPDX-FileCopyrightText: 2026 Galatea Authors
// SPDX-License-Identifier: MIT

//! The 3D backend: the shared layout gains a depth axis and is projected
//! isometrically onto the canvas. Deeper nodes shift down-right, are drawn
//! later (painter's order), and wear double-line boxes so depth reads in
//! plain text.

use std::collections::BTreeMap;

use crate::layout::{layout_graph, NodePlacement};
use crate::model::{GraphEdge, GraphNode, NodeId};

use super::planar::{write_if_blank, SELECTED_MARKER};
use super::{
    BackendError, BackendKind, Canvas, CanvasError, LineSpan, RenderBackend, RenderedFrame,
};

const PROJECT_X_PER_DEPTH: usize = 2;
const PROJECT_Y_PER_DEPTH: usize = 1;

#[derive(Debug, Default)]
pub struct SpatialBackend {
    initialized: bool,
    frame: Option<RenderedFrame>,
}

impl SpatialBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

fn projected(placement: &NodePlacement) -> (usize, usize) {
    (
        placement.x + placement.depth * PROJECT_X_PER_DEPTH,
        placement.y + placement.depth * PROJECT_Y_PER_DEPTH,
    )
}

impl RenderBackend for SpatialBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Spatial
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
        let mut canvas = Canvas::new(
            layout.width + layout.max_depth * PROJECT_X_PER_DEPTH,
            layout.height + layout.max_depth * PROJECT_Y_PER_DEPTH,
        )?;

        // Connectors first so nearer boxes occlude them.
        for &(parent, child) in &layout.hierarchy {
            draw_projected_connector(
                &mut canvas,
                &layout.placements[parent],
                &layout.placements[child],
            )?;
        }
        for &(source, target) in &layout.references {
            draw_projected_connector(
                &mut canvas,
                &layout.placements[source],
                &layout.placements[target],
            )?;
        }

        // Painter's order: shallow first, deeper (nearer) drawn over it.
        let mut order: Vec<&NodePlacement> = layout.placements.iter().collect();
        order.sort_by_key(|placement| placement.depth);
        for placement in order {
            draw_projected_box(&mut canvas, placement, selected)?;
        }

        let mut spans: BTreeMap<NodeId, Vec<LineSpan>> = BTreeMap::new();
        for placement in &layout.placements {
            let (x, y) = projected(placement);
            let x1 = x + placement.width - 1;
            spans.insert(
                placement.id.clone(),
                (y..y + placement.height).map(|row| (row, x, x1)).collect(),
            );
        }

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

fn draw_projected_box(
    canvas: &mut Canvas,
    placement: &NodePlacement,
    selected: Option<&NodeId>,
) -> Result<(), CanvasError> {
    let (x, y) = projected(placement);
    let x1 = x + placement.width - 1;
    let y1 = y + placement.height - 1;

    // Clear the footprint so a nearer box fully occludes what lies behind it.
    for row in y..=y1 {
        for col in x..=x1 {
            canvas.set(col, row, ' ')?;
        }
    }

    if placement.depth == 0 {
        canvas.draw_box(x, y, x1, y1)?;
    } else {
        for col in (x + 1)..x1 {
            canvas.set(col, y, '═')?;
            canvas.set(col, y1, '═')?;
        }
        for row in (y + 1)..y1 {
            canvas.set(x, row, '║')?;
            canvas.set(x1, row, '║')?;
        }
        canvas.set(x, y, '╔')?;
        canvas.set(x1, y, '╗')?;
        canvas.set(x, y1, '╚')?;
        canvas.set(x1, y1, '╝')?;
    }

    canvas.write_str(x + 2, y + 1, &placement.label)?;
    if selected == Some(&placement.id) {
        canvas.set(x + 1, y + 1, SELECTED_MARKER)?;
    }
    Ok(())
}

/// Straight dotted sight-line between two projected box centers.
fn draw_projected_connector(
    canvas: &mut Canvas,
    from: &NodePlacement,
    to: &NodePlacement,
) -> Result<(), CanvasError> {
    let (fx, fy) = projected(from);
    let (tx, ty) = projected(to);
    let (x0, y0) = (fx + from.width / 2, fy + 1);
    let (x1, y1) = (tx + to.width / 2, ty + 1);

    // Bresenham over cells; every step lands in bounds because projection
    // stays inside the sized canvas.
    let dx = x1.abs_diff(x0) as isize;
    let dy = y1.abs_diff(y0) as isize;
    let sx: isize = if x0 < x1 { 1 } else { -1 };
    let sy: isize = if y0 < y1 { 1 } else { -1 };
    let mut err = dx - dy;
    let (mut x, mut y) = (x0 as isize, y0 as isize);
    loop {
        write_if_blank(canvas, x as usize, y as usize, '·')?;
        if (x, y) == (x1 as isize, y1 as isize) {
            break;
        }
        let doubled = 2 * err;
        if doubled > -dy {
            err -= dy;
            x += sx;
        }
        if doubled < dx {
            err += dx;
            y += sy;
        }
    }
    Ok(())
}
