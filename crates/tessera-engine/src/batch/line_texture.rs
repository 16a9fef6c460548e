use glam::Mat4;

use crate::coords::Vec2;
use crate::device::{BatchVertex, GraphicContext, PrimitiveKind, TextureId};
use crate::paint::Color;

use super::{to_clip, BatchBuffer, RenderBatcher};

/// Accumulates textured line segments.
///
/// Segments are grouped into runs sharing one texture. Switching texture starts
/// a new run instead of flushing, so interleaving textures only costs one draw
/// call per run when the batcher is eventually flushed.
#[derive(Debug, Clone)]
pub struct LineTextureBatcher {
    transform: Mat4,
    vertices: Vec<BatchVertex>,
    /// `(texture, first vertex)` for each run, in submission order.
    runs: Vec<(TextureId, usize)>,
}

impl LineTextureBatcher {
    pub fn new() -> Self {
        Self {
            transform: Mat4::IDENTITY,
            vertices: Vec::new(),
            runs: Vec::new(),
        }
    }

    /// Draws segments given as consecutive point pairs, sampling `texture` at
    /// `tex_coords` (one per position, normalized texture space).
    pub fn draw_lines(
        &mut self,
        positions: &[Vec2],
        tex_coords: &[Vec2],
        color: Color,
        texture: TextureId,
    ) {
        debug_assert_eq!(positions.len(), tex_coords.len(), "one texture coordinate per vertex expected");
        let n = positions.len().min(tex_coords.len());
        let complete = n - n % 2;
        if complete == 0 {
            return;
        }

        if self.runs.last().map(|&(t, _)| t) != Some(texture) {
            self.runs.push((texture, self.vertices.len()));
        }

        let color = color.to_array();
        self.vertices.extend(
            positions[..complete]
                .iter()
                .zip(&tex_coords[..complete])
                .map(|(&p, uv)| BatchVertex {
                    position: to_clip(&self.transform, p),
                    color,
                    tex_coord: [uv.x, uv.y],
                }),
        );
    }

    /// Number of texture runs waiting for the next flush.
    pub fn pending_runs(&self) -> usize {
        self.runs.len()
    }
}

impl Default for LineTextureBatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderBatcher for LineTextureBatcher {
    fn matrix_changed(&mut self, modelview: &Mat4, projection: &Mat4) {
        self.transform = *projection * *modelview;
    }

    fn flush(&mut self, buffer: &mut BatchBuffer, gc: &mut dyn GraphicContext) {
        for (i, &(texture, start)) in self.runs.iter().enumerate() {
            let end = self
                .runs
                .get(i + 1)
                .map_or(self.vertices.len(), |&(_, next)| next);
            buffer.submit(gc, PrimitiveKind::Lines, &self.vertices[start..end], Some(texture));
        }
        self.vertices.clear();
        self.runs.clear();
    }

    fn pending_vertices(&self) -> usize {
        self.vertices.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingContext;

    fn seg() -> ([Vec2; 2], [Vec2; 2]) {
        (
            [Vec2::new(0.0, 0.0), Vec2::new(5.0, 0.0)],
            [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0)],
        )
    }

    #[test]
    fn same_texture_extends_current_run() {
        let mut b = LineTextureBatcher::new();
        let (p, uv) = seg();
        b.draw_lines(&p, &uv, Color::WHITE, TextureId(1));
        b.draw_lines(&p, &uv, Color::WHITE, TextureId(1));
        assert_eq!(b.pending_runs(), 1);
        assert_eq!(b.pending_vertices(), 4);
    }

    #[test]
    fn flush_submits_one_draw_per_run_in_order() {
        let mut b = LineTextureBatcher::new();
        let (p, uv) = seg();
        b.draw_lines(&p, &uv, Color::WHITE, TextureId(1));
        b.draw_lines(&p, &uv, Color::WHITE, TextureId(2));
        b.draw_lines(&p, &uv, Color::WHITE, TextureId(2));
        b.draw_lines(&p, &uv, Color::WHITE, TextureId(1));

        let mut gc = RecordingContext::window(100.0, 100.0);
        let handle = gc.handle();
        b.flush(&mut BatchBuffer::default(), &mut gc);

        let draws = handle.draws();
        let summary: Vec<_> = draws.iter().map(|d| (d.texture, d.vertices.len())).collect();
        assert_eq!(
            summary,
            vec![(Some(TextureId(1)), 2), (Some(TextureId(2)), 4), (Some(TextureId(1)), 2)]
        );
        assert_eq!(draws[0].vertices[1].tex_coord, [1.0, 0.0]);
        assert_eq!(b.pending_runs(), 0);
        assert_eq!(b.pending_vertices(), 0);
    }

    #[test]
    fn empty_submission_does_not_open_a_run() {
        let mut b = LineTextureBatcher::new();
        b.draw_lines(&[Vec2::ZERO], &[Vec2::ZERO], Color::WHITE, TextureId(3));
        assert_eq!(b.pending_runs(), 0);
    }
}
