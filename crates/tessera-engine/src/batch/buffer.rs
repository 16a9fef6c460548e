use crate::device::{BatchVertex, GraphicContext, PrimitiveBatch, PrimitiveKind, TextureId};

/// Vertex budget shared by every batcher of a canvas.
///
/// The device-side vertex storage is sized for `capacity` vertices per draw
/// call. Batchers accumulate freely and hand their runs to [`submit`], which
/// slices them into draw calls that fit the budget without splitting a
/// primitive across two calls.
///
/// [`submit`]: BatchBuffer::submit
#[derive(Debug, Clone)]
pub struct BatchBuffer {
    capacity: usize,
    draw_calls: u64,
}

impl BatchBuffer {
    /// Creates a buffer holding `capacity` vertices per draw call.
    ///
    /// The capacity is raised to at least one triangle.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(PrimitiveKind::Triangles.vertices_per_primitive()),
            draw_calls: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total number of draw calls issued through this buffer.
    #[inline]
    pub fn draw_calls(&self) -> u64 {
        self.draw_calls
    }

    /// Submits `vertices` as one or more draw calls of `kind`.
    ///
    /// A trailing incomplete primitive is dropped.
    pub fn submit(
        &mut self,
        gc: &mut dyn GraphicContext,
        kind: PrimitiveKind,
        vertices: &[BatchVertex],
        texture: Option<TextureId>,
    ) {
        let per = kind.vertices_per_primitive();
        let complete = vertices.len() - vertices.len() % per;
        if complete == 0 {
            return;
        }

        let chunk = (self.capacity / per) * per;
        for part in vertices[..complete].chunks(chunk) {
            log::trace!("submitting {} {kind:?} vertices (texture {texture:?})", part.len());
            gc.draw_primitives(PrimitiveBatch { kind, vertices: part, texture });
            self.draw_calls += 1;
        }
    }
}

impl Default for BatchBuffer {
    fn default() -> Self {
        Self::new(4096)
    }
}
