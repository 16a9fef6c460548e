use crate::device::GraphicContext;

use super::{
    BatchBuffer, BatcherKind, LineBatcher, LineTextureBatcher, PointBatcher, RenderBatcher,
    TriangleBatcher,
};

/// The four batchers of a canvas and the buffer they share.
///
/// Each batcher is created on first request and kept for the lifetime of the
/// set.
#[derive(Debug, Clone, Default)]
pub struct BatcherSet {
    buffer: BatchBuffer,
    triangle: Option<TriangleBatcher>,
    line: Option<LineBatcher>,
    line_texture: Option<LineTextureBatcher>,
    point: Option<PointBatcher>,
}

impl BatcherSet {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: BatchBuffer::new(capacity),
            ..Self::default()
        }
    }

    pub fn buffer(&self) -> &BatchBuffer {
        &self.buffer
    }

    pub fn is_created(&self, kind: BatcherKind) -> bool {
        match kind {
            BatcherKind::Triangle => self.triangle.is_some(),
            BatcherKind::Line => self.line.is_some(),
            BatcherKind::LineTexture => self.line_texture.is_some(),
            BatcherKind::Point => self.point.is_some(),
        }
    }

    pub fn triangle(&mut self) -> &mut TriangleBatcher {
        self.triangle.get_or_insert_with(|| {
            log::trace!("creating triangle batcher");
            TriangleBatcher::new()
        })
    }

    pub fn line(&mut self) -> &mut LineBatcher {
        self.line.get_or_insert_with(|| {
            log::trace!("creating line batcher");
            LineBatcher::new()
        })
    }

    pub fn line_texture(&mut self) -> &mut LineTextureBatcher {
        self.line_texture.get_or_insert_with(|| {
            log::trace!("creating textured line batcher");
            LineTextureBatcher::new()
        })
    }

    pub fn point(&mut self) -> &mut PointBatcher {
        self.point.get_or_insert_with(|| {
            log::trace!("creating point batcher");
            PointBatcher::new()
        })
    }

    /// Batcher of `kind`, created if needed.
    pub fn get(&mut self, kind: BatcherKind) -> &mut dyn RenderBatcher {
        match kind {
            BatcherKind::Triangle => self.triangle(),
            BatcherKind::Line => self.line(),
            BatcherKind::LineTexture => self.line_texture(),
            BatcherKind::Point => self.point(),
        }
    }

    /// Flushes the batcher of `kind` through the shared buffer.
    ///
    /// A batcher that was never created has nothing to flush.
    pub fn flush(&mut self, kind: BatcherKind, gc: &mut dyn GraphicContext) {
        let buffer = &mut self.buffer;
        match kind {
            BatcherKind::Triangle => flush_one(kind, self.triangle.as_mut(), buffer, gc),
            BatcherKind::Line => flush_one(kind, self.line.as_mut(), buffer, gc),
            BatcherKind::LineTexture => flush_one(kind, self.line_texture.as_mut(), buffer, gc),
            BatcherKind::Point => flush_one(kind, self.point.as_mut(), buffer, gc),
        }
    }
}

fn flush_one<B: RenderBatcher>(
    kind: BatcherKind,
    batcher: Option<&mut B>,
    buffer: &mut BatchBuffer,
    gc: &mut dyn GraphicContext,
) {
    if let Some(batcher) = batcher {
        log::trace!("flushing {kind:?} batcher ({} vertices)", batcher.pending_vertices());
        batcher.flush(buffer, gc);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::paint::Color;
    use crate::testing::RecordingContext;

    #[test]
    fn batchers_are_created_lazily() {
        let mut set = BatcherSet::new(64);
        assert!(!set.is_created(BatcherKind::Point));
        set.get(BatcherKind::Point);
        assert!(set.is_created(BatcherKind::Point));
        assert!(!set.is_created(BatcherKind::Triangle));
    }

    #[test]
    fn flush_of_missing_batcher_is_noop() {
        let mut set = BatcherSet::new(64);
        let mut gc = RecordingContext::window(10.0, 10.0);
        let handle = gc.handle();
        set.flush(BatcherKind::Line, &mut gc);
        assert!(handle.calls().is_empty());
        assert!(!set.is_created(BatcherKind::Line));
    }

    #[test]
    fn all_batchers_share_one_buffer() {
        let mut set = BatcherSet::new(64);
        let mut gc = RecordingContext::window(10.0, 10.0);

        set.point().draw_points(&[Vec2::ZERO], Color::WHITE);
        set.line().draw_lines(&[Vec2::ZERO, Vec2::new(1.0, 1.0)], Color::WHITE);
        set.flush(BatcherKind::Point, &mut gc);
        set.flush(BatcherKind::Line, &mut gc);

        assert_eq!(set.buffer().draw_calls(), 2);
    }
}
