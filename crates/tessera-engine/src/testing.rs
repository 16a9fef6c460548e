//! Recording `GraphicContext` double for unit tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::coords::{Rect, Viewport};
use crate::device::{
    BatchVertex, ClipZRange, GraphicContext, PrimitiveBatch, PrimitiveKind, ResizeSignal,
    TextureId, YAxis,
};
use crate::paint::Color;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Draw {
    pub kind: PrimitiveKind,
    pub vertices: Vec<BatchVertex>,
    pub texture: Option<TextureId>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum GcCall {
    Clear(Color),
    SetScissor(Rect, YAxis),
    ResetScissor,
    Draw(Draw),
}

/// Shared view of a [`RecordingContext`] that stays usable while a canvas
/// holds the context mutably.
#[derive(Clone)]
pub(crate) struct ContextHandle {
    log: Rc<RefCell<Vec<GcCall>>>,
    size: Rc<Cell<Viewport>>,
    valid: Rc<Cell<bool>>,
    signal: ResizeSignal,
}

impl ContextHandle {
    pub fn calls(&self) -> Vec<GcCall> {
        self.log.borrow().clone()
    }

    pub fn draws(&self) -> Vec<Draw> {
        self.log
            .borrow()
            .iter()
            .filter_map(|c| match c {
                GcCall::Draw(d) => Some(d.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn last_call(&self) -> Option<GcCall> {
        self.log.borrow().last().cloned()
    }

    pub fn clear_log(&self) {
        self.log.borrow_mut().clear();
    }

    /// Changes the context size and fires the resize signal, like a window would.
    pub fn resize(&self, width: f32, height: f32) {
        self.size.set(Viewport::new(width, height));
        self.signal.emit(Viewport::new(width, height));
    }

    /// Changes the size without notifying subscribers.
    pub fn set_size_silently(&self, width: f32, height: f32) {
        self.size.set(Viewport::new(width, height));
    }

    pub fn invalidate(&self) {
        self.valid.set(false);
    }

    pub fn subscriber_count(&self) -> usize {
        self.signal.subscriber_count()
    }
}

pub(crate) struct RecordingContext {
    window_backed: bool,
    y_axis: YAxis,
    clip_z: ClipZRange,
    handle: ContextHandle,
}

impl RecordingContext {
    /// Window-backed context (no framebuffer attached).
    pub fn window(width: f32, height: f32) -> Self {
        Self::build(true, YAxis::TopDown, width, height)
    }

    /// Off-screen context whose textures use `y_axis`.
    pub fn offscreen(width: f32, height: f32, y_axis: YAxis) -> Self {
        Self::build(false, y_axis, width, height)
    }

    pub fn with_clip_z(mut self, clip_z: ClipZRange) -> Self {
        self.clip_z = clip_z;
        self
    }

    pub fn handle(&self) -> ContextHandle {
        self.handle.clone()
    }

    fn build(window_backed: bool, y_axis: YAxis, width: f32, height: f32) -> Self {
        Self {
            window_backed,
            y_axis,
            clip_z: ClipZRange::ZeroPositiveW,
            handle: ContextHandle {
                log: Rc::default(),
                size: Rc::new(Cell::new(Viewport::new(width, height))),
                valid: Rc::new(Cell::new(true)),
                signal: ResizeSignal::new(),
            },
        }
    }

    fn record(&self, call: GcCall) {
        self.handle.log.borrow_mut().push(call);
    }
}

impl GraphicContext for RecordingContext {
    fn size(&self) -> Viewport {
        self.handle.size.get()
    }

    fn write_target_is_null(&self) -> bool {
        self.window_backed
    }

    fn texture_y_axis(&self) -> YAxis {
        self.y_axis
    }

    fn clip_z_range(&self) -> ClipZRange {
        self.clip_z
    }

    fn is_valid(&self) -> bool {
        self.handle.valid.get()
    }

    fn clear(&mut self, color: Color) {
        self.record(GcCall::Clear(color));
    }

    fn set_scissor(&mut self, rect: Rect, y_axis: YAxis) {
        self.record(GcCall::SetScissor(rect, y_axis));
    }

    fn reset_scissor(&mut self) {
        self.record(GcCall::ResetScissor);
    }

    fn draw_primitives(&mut self, batch: PrimitiveBatch<'_>) {
        self.record(GcCall::Draw(Draw {
            kind: batch.kind,
            vertices: batch.vertices.to_vec(),
            texture: batch.texture,
        }));
    }

    fn resize_signal(&self) -> &ResizeSignal {
        &self.handle.signal
    }
}
