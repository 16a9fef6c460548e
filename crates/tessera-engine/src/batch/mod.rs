//! Batched geometry accumulation.
//!
//! A batcher collects same-kind primitives (already transformed to clip space)
//! until the canvas flushes it. All batchers of one canvas submit through a
//! single [`BatchBuffer`], which splits their vertex runs into device-sized draw
//! calls.
//!
//! Protocol (driven by `Canvas`):
//! - at most one batcher is active at a time
//! - activating a different batcher flushes the active one first
//! - the active batcher receives every modelview/projection change through
//!   [`RenderBatcher::matrix_changed`]

mod buffer;
mod line;
mod line_texture;
mod point;
mod registry;
mod triangle;

use glam::Mat4;

use crate::coords::Vec2;
use crate::device::GraphicContext;

pub use crate::device::BatchVertex;
pub use buffer::BatchBuffer;
pub use line::LineBatcher;
pub use line_texture::LineTextureBatcher;
pub use point::PointBatcher;
pub use registry::BatcherSet;
pub use triangle::TriangleBatcher;

/// Identifies one of the canvas's batchers.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BatcherKind {
    Triangle,
    Line,
    LineTexture,
    Point,
}

/// Common contract of all batchers.
pub trait RenderBatcher {
    /// Stores the transform applied to geometry submitted from now on.
    fn matrix_changed(&mut self, modelview: &Mat4, projection: &Mat4);

    /// Submits accumulated geometry to `gc` and clears the accumulator.
    fn flush(&mut self, buffer: &mut BatchBuffer, gc: &mut dyn GraphicContext);

    /// Number of vertices waiting for the next flush.
    fn pending_vertices(&self) -> usize;
}

/// Transforms a logical-pixel point into clip space.
#[inline]
pub(crate) fn to_clip(transform: &Mat4, p: Vec2) -> [f32; 4] {
    (*transform * p.extend(0.0).extend(1.0)).to_array()
}
