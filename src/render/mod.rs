// SPDX-FileCopyrightText: 2026 Galatea Authors
// SPDX-License-Identifier: MIT

//! Rendering backends.
//!
//! Backends draw the structural graph onto a character canvas and publish a
//! [`RenderedFrame`]: text lines plus a per-node span index the TUI uses for
//! cell-accurate highlighting and mouse hit-testing. Two implementations sit
//! behind the [`RenderBackend`] capability trait; the session controller only
//! ever names them through [`BackendKind`].

use std::collections::BTreeMap;
use std::fmt;

use crate::model::{GraphEdge, GraphNode, NodeId};

pub mod html;
pub mod planar;
pub mod spatial;

pub use planar::PlanarBackend;
pub use spatial::SpatialBackend;

/// A contiguous run of cells on one line, `(y, x0, x1)` inclusive.
pub type LineSpan = (usize, usize, usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Planar,
    Spatial,
}

impl BackendKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Planar => "planar",
            Self::Spatial => "spatial",
        }
    }

    pub fn other(self) -> Self {
        match self {
            Self::Planar => Self::Spatial,
            Self::Spatial => Self::Planar,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    NotInitialized,
    Canvas(CanvasError),
    Init { message: String },
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInitialized => f.write_str("backend has not been initialized"),
            Self::Canvas(err) => write!(f, "canvas error: {err}"),
            Self::Init { message } => write!(f, "backend initialization failed: {message}"),
        }
    }
}

impl std::error::Error for BackendError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Canvas(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CanvasError> for BackendError {
    fn from(err: CanvasError) -> Self {
        Self::Canvas(err)
    }
}

/// Text output of one render pass, replaced wholesale on the next pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedFrame {
    lines: Vec<String>,
    spans: BTreeMap<NodeId, Vec<LineSpan>>,
}

impl RenderedFrame {
    pub fn new(lines: Vec<String>, spans: BTreeMap<NodeId, Vec<LineSpan>>) -> Self {
        Self { lines, spans }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn height(&self) -> usize {
        self.lines.len()
    }

    pub fn width(&self) -> usize {
        self.lines.iter().map(|line| line.chars().count()).max().unwrap_or(0)
    }

    pub fn spans_for(&self, id: &NodeId) -> &[LineSpan] {
        self.spans.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The node whose box covers cell `(x, y)`, if any.
    pub fn node_at(&self, x: usize, y: usize) -> Option<&NodeId> {
        self.spans.iter().find_map(|(id, spans)| {
            spans
                .iter()
                .any(|&(sy, x0, x1)| sy == y && x0 <= x && x <= x1)
                .then_some(id)
        })
    }
}

/// The capability both rendering technologies implement.
///
/// `render` borrows the node/edge arrays and never retains them; `destroy`
/// must be idempotent and safe to call on a backend that was never
/// initialized.
pub trait RenderBackend {
    fn kind(&self) -> BackendKind;

    fn initialize(&mut self) -> Result<(), BackendError>;

    fn render(
        &mut self,
        nodes: &[GraphNode],
        edges: &[GraphEdge],
        selected: Option<&NodeId>,
    ) -> Result<(), BackendError>;

    fn frame(&self) -> Option<&RenderedFrame>;

    fn node_at(&self, x: usize, y: usize) -> Option<NodeId> {
        self.frame().and_then(|frame| frame.node_at(x, y).cloned())
    }

    /// Drops the current frame but keeps acquired resources.
    fn clear(&mut self);

    /// Releases everything.
    fn destroy(&mut self);
}

/// Creates boxed backends per kind so the controller never names concrete
/// types. Adding a backend means a new [`BackendKind`] arm plus a factory arm.
pub trait BackendFactory {
    fn create(&self, kind: BackendKind) -> Box<dyn RenderBackend>;
}

/// The standard factory producing the character-canvas backends.
#[derive(Debug, Clone, Copy, Default)]
pub struct CanvasBackendFactory;

impl BackendFactory for CanvasBackendFactory {
    fn create(&self, kind: BackendKind) -> Box<dyn RenderBackend> {
        match kind {
            BackendKind::Planar => Box::new(PlanarBackend::new()),
            BackendKind::Spatial => Box::new(SpatialBackend::new()),
        }
    }
}

pub const UNICODE_BOX_HORIZONTAL: char = '─';
pub const UNICODE_BOX_VERTICAL: char = '│';
pub const UNICODE_BOX_TOP_LEFT: char = '┌';
pub const UNICODE_BOX_TOP_RIGHT: char = '┐';
pub const UNICODE_BOX_BOTTOM_LEFT: char = '└';
pub const UNICODE_BOX_BOTTOM_RIGHT: char = '┘';

// Bitflag directions a box-drawing cell connects towards.
const EDGE_LEFT: u8 = 1 << 0;
const EDGE_RIGHT: u8 = 1 << 1;
const EDGE_UP: u8 = 1 << 2;
const EDGE_DOWN: u8 = 1 << 3;

fn box_edges_from_char(ch: char) -> Option<u8> {
    match ch {
        UNICODE_BOX_HORIZONTAL => Some(EDGE_LEFT | EDGE_RIGHT),
        UNICODE_BOX_VERTICAL => Some(EDGE_UP | EDGE_DOWN),
        UNICODE_BOX_TOP_LEFT => Some(EDGE_RIGHT | EDGE_DOWN),
        UNICODE_BOX_TOP_RIGHT => Some(EDGE_LEFT | EDGE_DOWN),
        UNICODE_BOX_BOTTOM_LEFT => Some(EDGE_RIGHT | EDGE_UP),
        UNICODE_BOX_BOTTOM_RIGHT => Some(EDGE_LEFT | EDGE_UP),
        _ => None,
    }
}

fn box_char_from_edges(edges: u8) -> char {
    match edges {
        0 => ' ',
        1..=3 => UNICODE_BOX_HORIZONTAL,
        4 | 8 | 12 => UNICODE_BOX_VERTICAL,
        10 => UNICODE_BOX_TOP_LEFT,
        9 => UNICODE_BOX_TOP_RIGHT,
        6 => UNICODE_BOX_BOTTOM_LEFT,
        5 => UNICODE_BOX_BOTTOM_RIGHT,
        14 => '├',
        13 => '┤',
        11 => '┬',
        7 => '┴',
        _ => '┼',
    }
}

/// A fixed-size, bounds-checked character grid.
///
/// Collision behavior is deterministic: plain characters overwrite (last
/// writer wins) while Unicode box-drawing characters merge into junctions
/// instead of clobbering each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: usize,
    height: usize,
    cells: Vec<char>,
    box_edges: Vec<u8>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Result<Self, CanvasError> {
        let len = width
            .checked_mul(height)
            .ok_or(CanvasError::AreaOverflow { width, height })?;
        Ok(Self {
            width,
            height,
            cells: vec![' '; len],
            box_edges: vec![0; len],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Result<char, CanvasError> {
        let idx = self.index_of(x, y)?;
        Ok(self.render_at(idx))
    }

    pub fn set(&mut self, x: usize, y: usize, ch: char) -> Result<(), CanvasError> {
        let idx = self.index_of(x, y)?;
        if let Some(edges) = box_edges_from_char(ch) {
            self.box_edges[idx] |= edges;
        } else {
            self.cells[idx] = ch;
            self.box_edges[idx] = 0;
        }
        Ok(())
    }

    /// Writes `text` left-to-right starting at `(x, y)`, clipping at the
    /// right edge.
    pub fn write_str(&mut self, x: usize, y: usize, text: &str) -> Result<(), CanvasError> {
        if y >= self.height {
            return Err(self.out_of_bounds(x, y));
        }
        let mut x = x;
        for ch in text.chars() {
            if x >= self.width {
                break;
            }
            self.set(x, y, ch)?;
            x += 1;
        }
        Ok(())
    }

    pub fn draw_hline(&mut self, x0: usize, x1: usize, y: usize) -> Result<(), CanvasError> {
        let (min_x, max_x) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        if y >= self.height || max_x >= self.width {
            return Err(self.out_of_bounds(max_x, y));
        }
        for x in min_x..=max_x {
            self.set(x, y, UNICODE_BOX_HORIZONTAL)?;
        }
        Ok(())
    }

    pub fn draw_vline(&mut self, x: usize, y0: usize, y1: usize) -> Result<(), CanvasError> {
        let (min_y, max_y) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
        if x >= self.width || max_y >= self.height {
            return Err(self.out_of_bounds(x, max_y));
        }
        for y in min_y..=max_y {
            self.set(x, y, UNICODE_BOX_VERTICAL)?;
        }
        Ok(())
    }

    /// Draws a single-line box with corners at `(x0, y0)` and `(x1, y1)`.
    pub fn draw_box(
        &mut self,
        x0: usize,
        y0: usize,
        x1: usize,
        y1: usize,
    ) -> Result<(), CanvasError> {
        let (min_x, max_x) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        let (min_y, max_y) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
        if max_x >= self.width || max_y >= self.height {
            return Err(self.out_of_bounds(max_x, max_y));
        }
        if min_y == max_y {
            return self.draw_hline(min_x, max_x, min_y);
        }
        if min_x == max_x {
            return self.draw_vline(min_x, min_y, max_y);
        }

        for x in (min_x + 1)..max_x {
            self.set(x, min_y, UNICODE_BOX_HORIZONTAL)?;
            self.set(x, max_y, UNICODE_BOX_HORIZONTAL)?;
        }
        for y in (min_y + 1)..max_y {
            self.set(min_x, y, UNICODE_BOX_VERTICAL)?;
            self.set(max_x, y, UNICODE_BOX_VERTICAL)?;
        }
        self.set(min_x, min_y, UNICODE_BOX_TOP_LEFT)?;
        self.set(max_x, min_y, UNICODE_BOX_TOP_RIGHT)?;
        self.set(min_x, max_y, UNICODE_BOX_BOTTOM_LEFT)?;
        self.set(max_x, max_y, UNICODE_BOX_BOTTOM_RIGHT)?;
        Ok(())
    }

    pub fn into_lines(self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.height);
        for y in 0..self.height {
            let mut line = String::with_capacity(self.width);
            for x in 0..self.width {
                line.push(self.render_at((y * self.width) + x));
            }
            lines.push(line);
        }
        lines
    }

    fn index_of(&self, x: usize, y: usize) -> Result<usize, CanvasError> {
        if !self.in_bounds(x, y) {
            return Err(self.out_of_bounds(x, y));
        }
        Ok((y * self.width) + x)
    }

    fn out_of_bounds(&self, x: usize, y: usize) -> CanvasError {
        CanvasError::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        }
    }

    fn render_at(&self, idx: usize) -> char {
        match self.box_edges[idx] {
            0 => self.cells[idx],
            edges => box_char_from_edges(edges),
        }
    }
}

impl fmt::Display for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use std::fmt::Write as _;

        for y in 0..self.height {
            for x in 0..self.width {
                f.write_char(self.render_at((y * self.width) + x))?;
            }
            if y + 1 < self.height {
                f.write_char('\n')?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanvasError {
    AreaOverflow {
        width: usize,
        height: usize,
    },
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
}

impl fmt::Display for CanvasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AreaOverflow { width, height } => {
                write!(f, "canvas area overflow: {width}*{height}")
            }
            Self::OutOfBounds {
                x,
                y,
                width,
                height,
            } => write!(f, "out of bounds: ({x},{y}) for {width}x{height} canvas"),
        }
    }
}

impl std::error::Error for CanvasError {}
