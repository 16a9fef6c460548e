use glam::Mat4;

use crate::coords::Vec2;
use crate::device::{BatchVertex, GraphicContext, PrimitiveKind};
use crate::paint::Color;

use super::{to_clip, BatchBuffer, RenderBatcher};

/// Accumulates one-pixel line segments.
#[derive(Debug, Clone)]
pub struct LineBatcher {
    transform: Mat4,
    vertices: Vec<BatchVertex>,
}

impl LineBatcher {
    pub fn new() -> Self {
        Self {
            transform: Mat4::IDENTITY,
            vertices: Vec::new(),
        }
    }

    /// Draws independent segments given as consecutive point pairs.
    pub fn draw_lines(&mut self, positions: &[Vec2], color: Color) {
        let complete = positions.len() - positions.len() % 2;
        for &p in &positions[..complete] {
            self.push(p, color);
        }
    }

    /// Draws a connected polyline through `points`.
    pub fn draw_line_strip(&mut self, points: &[Vec2], color: Color) {
        for pair in points.windows(2) {
            self.push(pair[0], color);
            self.push(pair[1], color);
        }
    }

    /// Draws a closed polyline: the strip plus a segment back to the first point.
    pub fn draw_line_loop(&mut self, points: &[Vec2], color: Color) {
        self.draw_line_strip(points, color);
        if let [first, .., last] = points {
            self.push(*last, color);
            self.push(*first, color);
        }
    }

    fn push(&mut self, p: Vec2, color: Color) {
        self.vertices.push(BatchVertex {
            position: to_clip(&self.transform, p),
            color: color.to_array(),
            tex_coord: [0.0; 2],
        });
    }
}

impl Default for LineBatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderBatcher for LineBatcher {
    fn matrix_changed(&mut self, modelview: &Mat4, projection: &Mat4) {
        self.transform = *projection * *modelview;
    }

    fn flush(&mut self, buffer: &mut BatchBuffer, gc: &mut dyn GraphicContext) {
        buffer.submit(gc, PrimitiveKind::Lines, &self.vertices, None);
        self.vertices.clear();
    }

    fn pending_vertices(&self) -> usize {
        self.vertices.len()
    }
}
