use glam::Mat4;

use crate::coords::Vec2;
use crate::device::{BatchVertex, GraphicContext, PrimitiveKind};
use crate::paint::Color;

use super::{to_clip, BatchBuffer, RenderBatcher};

/// Accumulates single-pixel points.
#[derive(Debug, Clone)]
pub struct PointBatcher {
    transform: Mat4,
    vertices: Vec<BatchVertex>,
}

impl PointBatcher {
    pub fn new() -> Self {
        Self {
            transform: Mat4::IDENTITY,
            vertices: Vec::new(),
        }
    }

    pub fn draw_points(&mut self, positions: &[Vec2], color: Color) {
        let color = color.to_array();
        self.vertices.extend(positions.iter().map(|&p| BatchVertex {
            position: to_clip(&self.transform, p),
            color,
            tex_coord: [0.0; 2],
        }));
    }
}

impl Default for PointBatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderBatcher for PointBatcher {
    fn matrix_changed(&mut self, modelview: &Mat4, projection: &Mat4) {
        self.transform = *projection * *modelview;
    }

    fn flush(&mut self, buffer: &mut BatchBuffer, gc: &mut dyn GraphicContext) {
        buffer.submit(gc, PrimitiveKind::Points, &self.vertices, None);
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
    use glam::vec3;

    #[test]
    fn points_are_transformed_on_submission() {
        let mut b = PointBatcher::new();
        b.draw_points(&[Vec2::new(1.0, 2.0)], Color::WHITE);
        b.matrix_changed(&Mat4::from_translation(vec3(10.0, 0.0, 0.0)), &Mat4::IDENTITY);
        b.draw_points(&[Vec2::new(1.0, 2.0)], Color::WHITE);

        let mut gc = RecordingContext::window(100.0, 100.0);
        let handle = gc.handle();
        b.flush(&mut BatchBuffer::default(), &mut gc);

        let draws = handle.draws();
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].kind, PrimitiveKind::Points);
        assert_eq!(draws[0].vertices[0].position, [1.0, 2.0, 0.0, 1.0]);
        assert_eq!(draws[0].vertices[1].position, [11.0, 2.0, 0.0, 1.0]);
        assert_eq!(b.pending_vertices(), 0);
    }

    #[test]
    fn flushing_nothing_submits_nothing() {
        let mut gc = RecordingContext::window(100.0, 100.0);
        let handle = gc.handle();
        PointBatcher::new().flush(&mut BatchBuffer::default(), &mut gc);
        assert!(handle.calls().is_empty());
    }
}
