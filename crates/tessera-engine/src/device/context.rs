use crate::coords::{Rect, Viewport};
use crate::paint::Color;

use super::{BatchVertex, ResizeSignal};

/// Vertical orientation of a render target's rows.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum YAxis {
    /// Row 0 is the top row (window surfaces, most texture APIs).
    TopDown,
    /// Row 0 is the bottom row (GL-style render-to-texture targets).
    BottomUp,
}

/// Depth range of the device's clip space.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ClipZRange {
    /// `-w <= z <= w` (OpenGL convention).
    NegativePositiveW,
    /// `0 <= z <= w` (Direct3D / Vulkan / Metal / wgpu convention).
    ZeroPositiveW,
}

/// Primitive topology of a submitted batch.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PrimitiveKind {
    Triangles,
    Lines,
    Points,
}

impl PrimitiveKind {
    /// Number of vertices forming one primitive.
    #[inline]
    pub const fn vertices_per_primitive(self) -> usize {
        match self {
            PrimitiveKind::Triangles => 3,
            PrimitiveKind::Lines => 2,
            PrimitiveKind::Points => 1,
        }
    }
}

/// Opaque handle to a texture registered with a graphics context.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TextureId(pub u32);

/// One draw call worth of clip-space vertices.
#[derive(Debug, Copy, Clone)]
pub struct PrimitiveBatch<'a> {
    pub kind: PrimitiveKind,
    pub vertices: &'a [BatchVertex],
    /// Texture sampled by the batch; `None` draws vertex colors only.
    pub texture: Option<TextureId>,
}

/// Device-side collaborator of `Canvas`.
///
/// Implementations own the actual render target and are responsible for
/// enforcing the scissor state on every subsequent draw. All calls happen on one
/// thread; none of them are expected to block beyond recording GPU work.
pub trait GraphicContext {
    /// Current drawable size in logical pixels.
    fn size(&self) -> Viewport;

    /// True when no framebuffer is attached, i.e. the context draws to a window.
    fn write_target_is_null(&self) -> bool;

    /// Row orientation of texture render targets on this device.
    fn texture_y_axis(&self) -> YAxis;

    fn clip_z_range(&self) -> ClipZRange;

    /// False once the underlying device or target is gone (device lost, target
    /// released). A canvas skips its final flush on an invalid context.
    fn is_valid(&self) -> bool {
        true
    }

    fn clear(&mut self, color: Color);

    /// Restricts subsequent draws to `rect`.
    ///
    /// `y_axis` states the orientation `rect` must be mapped into: `BottomUp`
    /// asks the device to mirror the rectangle vertically within the target.
    fn set_scissor(&mut self, rect: Rect, y_axis: YAxis);

    /// Removes any scissor restriction.
    fn reset_scissor(&mut self);

    fn draw_primitives(&mut self, batch: PrimitiveBatch<'_>);

    /// Resize notifications for window-backed contexts.
    fn resize_signal(&self) -> &ResizeSignal;
}
