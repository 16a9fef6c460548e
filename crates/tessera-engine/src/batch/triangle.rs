use glam::Mat4;

use crate::coords::{Rect, Vec2};
use crate::device::{BatchVertex, GraphicContext, PrimitiveKind};
use crate::paint::Color;

use super::{to_clip, BatchBuffer, RenderBatcher};

/// Accumulates filled triangles (three vertices per triangle).
#[derive(Debug, Clone)]
pub struct TriangleBatcher {
    transform: Mat4,
    vertices: Vec<BatchVertex>,
}

impl TriangleBatcher {
    pub fn new() -> Self {
        Self {
            transform: Mat4::IDENTITY,
            vertices: Vec::new(),
        }
    }

    /// Fills triangles given as consecutive vertex triples with one color.
    ///
    /// A trailing incomplete triple is ignored.
    pub fn fill_triangles(&mut self, positions: &[Vec2], color: Color) {
        let complete = positions.len() - positions.len() % 3;
        let color = color.to_array();
        self.vertices.extend(positions[..complete].iter().map(|&p| BatchVertex {
            position: to_clip(&self.transform, p),
            color,
            tex_coord: [0.0; 2],
        }));
    }

    /// Fills triangles with one color per vertex (e.g. from `geometry::gradient_colors`).
    ///
    /// Extra positions or colors beyond the shorter slice are ignored.
    pub fn fill_triangles_colored(&mut self, positions: &[Vec2], colors: &[Color]) {
        debug_assert_eq!(positions.len(), colors.len(), "one color per vertex expected");
        let n = positions.len().min(colors.len());
        let complete = n - n % 3;
        self.vertices.extend(
            positions[..complete]
                .iter()
                .zip(&colors[..complete])
                .map(|(&p, c)| BatchVertex {
                    position: to_clip(&self.transform, p),
                    color: c.to_array(),
                    tex_coord: [0.0; 2],
                }),
        );
    }

    /// Fills an axis-aligned rectangle as two triangles.
    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        let r = rect.normalized();
        let (l, t, rt, b) = (r.left(), r.top(), r.right(), r.bottom());
        let quad = [
            Vec2::new(l, t),
            Vec2::new(rt, t),
            Vec2::new(rt, b),
            Vec2::new(l, t),
            Vec2::new(rt, b),
            Vec2::new(l, b),
        ];
        self.fill_triangles(&quad, color);
    }
}

impl Default for TriangleBatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderBatcher for TriangleBatcher {
    fn matrix_changed(&mut self, modelview: &Mat4, projection: &Mat4) {
        self.transform = *projection * *modelview;
    }

    fn flush(&mut self, buffer: &mut BatchBuffer, gc: &mut dyn GraphicContext) {
        buffer.submit(gc, PrimitiveKind::Triangles, &self.vertices, None);
        self.vertices.clear();
    }

    fn pending_vertices(&self) -> usize {
        self.vertices.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingContext;

    fn tri() -> [Vec2; 3] {
        [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)]
    }

    #[test]
    fn fill_applies_current_transform() {
        let mut b = TriangleBatcher::new();
        b.matrix_changed(&Mat4::from_translation(glam::vec3(10.0, 20.0, 0.0)), &Mat4::IDENTITY);
        b.fill_triangles(&tri(), Color::WHITE);

        let mut gc = RecordingContext::window(100.0, 100.0);
        let handle = gc.handle();
        b.flush(&mut BatchBuffer::default(), &mut gc);

        let draws = handle.draws();
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].kind, PrimitiveKind::Triangles);
        assert_eq!(draws[0].vertices[1].position, [11.0, 20.0, 0.0, 1.0]);
    }

    #[test]
    fn transform_change_only_affects_later_geometry() {
        let mut b = TriangleBatcher::new();
        b.fill_triangles(&tri(), Color::WHITE);
        b.matrix_changed(&Mat4::from_scale(glam::vec3(2.0, 2.0, 1.0)), &Mat4::IDENTITY);
        b.fill_triangles(&tri(), Color::WHITE);

        let mut gc = RecordingContext::window(100.0, 100.0);
        let handle = gc.handle();
        b.flush(&mut BatchBuffer::default(), &mut gc);

        let v = &handle.draws()[0].vertices;
        assert_eq!(v[1].position[0], 1.0);
        assert_eq!(v[4].position[0], 2.0);
    }

    #[test]
    fn incomplete_triangle_is_ignored() {
        let mut b = TriangleBatcher::new();
        b.fill_triangles(&[Vec2::ZERO, Vec2::ZERO], Color::WHITE);
        assert_eq!(b.pending_vertices(), 0);
    }

    #[test]
    fn colored_fill_keeps_per_vertex_colors() {
        let mut b = TriangleBatcher::new();
        let colors = [Color::BLACK, Color::WHITE, Color::TRANSPARENT];
        b.fill_triangles_colored(&tri(), &colors);
        assert_eq!(b.pending_vertices(), 3);
        assert_eq!(b.vertices[2].color, Color::TRANSPARENT.to_array());
    }

    #[test]
    fn fill_rect_emits_two_triangles_and_flush_clears() {
        let mut b = TriangleBatcher::new();
        b.fill_rect(Rect::new(0.0, 0.0, 4.0, 2.0), Color::WHITE);
        assert_eq!(b.pending_vertices(), 6);

        let mut gc = RecordingContext::window(100.0, 100.0);
        b.flush(&mut BatchBuffer::default(), &mut gc);
        assert_eq!(b.pending_vertices(), 0);
    }
}
