//! Canvas: transform/clip state and batched draw submission for one graphics context.
//!
//! Drawing code asks the canvas for a batcher and appends geometry to it.
//! Asking for a different batcher than the active one flushes the active one
//! first, so draw calls reach the device in submission order. Transform changes
//! are forwarded to the active batcher immediately; clip changes flush the
//! active batcher and then update the device scissor.

mod clip;
mod config;
mod error;
mod transform;

use glam::Mat4;

use crate::batch::{
    BatcherKind, BatcherSet, LineBatcher, LineTextureBatcher, PointBatcher, TriangleBatcher,
};
use crate::coords::{Rect, Vec2, Viewport};
use crate::device::{GraphicContext, ResizeSubscription, YAxis};
use crate::geometry;
use crate::paint::{Color, Gradient};

pub use clip::{ClipStack, ScissorUpdate};
pub use config::CanvasConfig;
pub use error::CanvasError;
pub use transform::{MapMode, TransformStack};

/// Rendering session bound to one graphics context.
///
/// The context is borrowed for the canvas's whole lifetime. Dropping the canvas
/// flushes pending geometry unless the context reports itself invalid.
///
/// Window-backed canvases subscribe to the context's resize signal. Pending
/// resize notifications are applied at the start of the next mutating
/// operation, or explicitly with [`update_viewport_size`](Self::update_viewport_size).
pub struct Canvas<'gc> {
    gc: &'gc mut dyn GraphicContext,
    y_axis: YAxis,

    transform: TransformStack,
    clips: ClipStack,

    batchers: BatcherSet,
    active: Option<BatcherKind>,

    resize: Option<ResizeSubscription>,

    /// Number of times the active batcher received new matrices.
    matrix_notifications: u64,
}

impl<'gc> Canvas<'gc> {
    pub fn new(gc: &'gc mut dyn GraphicContext) -> Self {
        Self::with_config(gc, CanvasConfig::default())
    }

    pub fn with_config(gc: &'gc mut dyn GraphicContext, config: CanvasConfig) -> Self {
        let clip_z = gc.clip_z_range();

        let (y_axis, resize) = if gc.write_target_is_null() {
            (YAxis::TopDown, Some(gc.resize_signal().connect()))
        } else {
            (gc.texture_y_axis(), None)
        };

        let mut canvas = Self {
            gc,
            y_axis,
            transform: TransformStack::new(y_axis, clip_z),
            clips: ClipStack::new(),
            batchers: BatcherSet::new(config.batch_capacity),
            active: None,
            resize,
            matrix_notifications: 0,
        };

        canvas.update_viewport_size();
        canvas.set_map_mode(config.map_mode);

        log::debug!(
            "canvas created: {:?} {}x{} ({:?})",
            canvas.y_axis,
            canvas.size().width,
            canvas.size().height,
            clip_z
        );

        canvas
    }

    // ── attributes ────────────────────────────────────────────────────────

    /// Viewport size the projection was derived from.
    pub fn size(&self) -> Viewport {
        self.transform.viewport()
    }

    pub fn y_axis(&self) -> YAxis {
        self.y_axis
    }

    pub fn map_mode(&self) -> MapMode {
        self.transform.map_mode()
    }

    pub fn active_batcher(&self) -> Option<BatcherKind> {
        self.active
    }

    /// Total draw calls submitted by this canvas so far.
    pub fn draw_calls(&self) -> u64 {
        self.batchers.buffer().draw_calls()
    }

    /// How often the active batcher has been handed new matrices.
    pub fn matrix_notifications(&self) -> u64 {
        self.matrix_notifications
    }

    // ── batchers ──────────────────────────────────────────────────────────

    pub fn triangle_batcher(&mut self) -> &mut TriangleBatcher {
        self.set_batcher(BatcherKind::Triangle);
        self.batchers.triangle()
    }

    pub fn line_batcher(&mut self) -> &mut LineBatcher {
        self.set_batcher(BatcherKind::Line);
        self.batchers.line()
    }

    pub fn line_texture_batcher(&mut self) -> &mut LineTextureBatcher {
        self.set_batcher(BatcherKind::LineTexture);
        self.batchers.line_texture()
    }

    pub fn point_batcher(&mut self) -> &mut PointBatcher {
        self.set_batcher(BatcherKind::Point);
        self.batchers.point()
    }

    /// Makes `kind` the active batcher.
    ///
    /// Switching flushes the previously active batcher and hands the current
    /// matrices to the new one. Re-selecting the active batcher does nothing, so
    /// consecutive submissions of one kind accumulate into a single batch.
    pub fn set_batcher(&mut self, kind: BatcherKind) {
        self.pump_resize_events();
        if self.active == Some(kind) {
            return;
        }

        self.flush();
        log::trace!("activating {kind:?} batcher");
        self.active = Some(kind);
        self.update_batcher_matrix();
    }

    /// Submits the active batcher's geometry and leaves no batcher active.
    pub fn flush(&mut self) {
        // Detach before flushing so the active slot is clear during submission.
        let Some(kind) = self.active.take() else { return };
        self.batchers.flush(kind, &mut *self.gc);
    }

    pub fn clear(&mut self, color: Color) {
        self.pump_resize_events();
        self.gc.clear(color);
    }

    fn update_batcher_matrix(&mut self) {
        if let Some(kind) = self.active {
            let modelview = *self.transform.modelview();
            let projection = *self.transform.projection();
            self.batchers.get(kind).matrix_changed(&modelview, &projection);
            self.matrix_notifications += 1;
        }
    }

    // ── transforms ────────────────────────────────────────────────────────

    pub fn modelview(&self) -> &Mat4 {
        self.transform.modelview()
    }

    pub fn modelview_depth(&self) -> usize {
        self.transform.modelview_depth()
    }

    pub fn projection(&self) -> &Mat4 {
        self.transform.projection()
    }

    /// Replaces the top modelview. The active batcher is always notified, even
    /// when `modelview` equals the current top.
    pub fn set_modelview(&mut self, modelview: Mat4) {
        self.pump_resize_events();
        self.transform.set_modelview(modelview);
        self.update_batcher_matrix();
    }

    pub fn push_modelview(&mut self, modelview: Mat4) {
        self.pump_resize_events();
        self.transform.push_modelview(modelview);
        self.update_batcher_matrix();
    }

    /// Restores the previous modelview.
    ///
    /// Fails with [`CanvasError::ModelviewUnderflow`] instead of removing the
    /// identity baseline; the stack is left untouched in that case.
    pub fn pop_modelview(&mut self) -> Result<(), CanvasError> {
        self.pump_resize_events();
        self.transform.pop_modelview()?;
        self.update_batcher_matrix();
        Ok(())
    }

    /// Changes the map mode; the active batcher is notified only if the
    /// resulting projection differs.
    pub fn set_map_mode(&mut self, mode: MapMode) {
        self.pump_resize_events();
        if self.transform.set_map_mode(mode) {
            self.update_batcher_matrix();
        }
    }

    /// Sets the matrix used by [`MapMode::UserProjection`]; the active batcher is
    /// notified only if the resulting projection differs.
    pub fn set_user_projection(&mut self, projection: Mat4) {
        self.pump_resize_events();
        if self.transform.set_user_projection(projection) {
            self.update_batcher_matrix();
        }
    }

    /// Re-reads the context size and recomputes the projection if it changed.
    pub fn update_viewport_size(&mut self) {
        if let Some(sub) = &self.resize {
            // The context is queried directly; the payload is only a wake-up.
            let _ = sub.take();
        }

        let size = self.gc.size();
        if size == self.transform.viewport() {
            return;
        }

        log::debug!("canvas viewport {}x{}", size.width, size.height);
        if self.transform.set_viewport(size) {
            self.update_batcher_matrix();
        }
    }

    fn pump_resize_events(&mut self) {
        let pending = self.resize.as_ref().is_some_and(|sub| sub.take().is_some());
        if pending {
            self.update_viewport_size();
        }
    }

    // ── clipping ──────────────────────────────────────────────────────────

    /// Effective clip rectangle, `None` when clipping is off.
    pub fn cliprect(&self) -> Option<Rect> {
        self.clips.top()
    }

    pub fn clip_depth(&self) -> usize {
        self.clips.depth()
    }

    /// Replaces the current clip rectangle (pushes it if the stack is empty).
    pub fn set_cliprect(&mut self, rect: Rect) {
        let update = self.clips.set(rect);
        self.write_scissor(update);
    }

    /// Pushes `rect` intersected with the current clip.
    pub fn push_cliprect(&mut self, rect: Rect) {
        let update = self.clips.push(rect);
        self.write_scissor(update);
    }

    /// Pushes a copy of the current clip, or the full viewport when clipping is off.
    pub fn push_current_cliprect(&mut self) {
        let update = self.clips.push_current(self.gc.size());
        self.write_scissor(update);
    }

    /// Restores the previous clip; fails with [`CanvasError::ClipUnderflow`] on
    /// an empty stack.
    pub fn pop_cliprect(&mut self) -> Result<(), CanvasError> {
        let update = self.clips.pop()?;
        self.write_scissor(update);
        Ok(())
    }

    /// Drops all clip rectangles and disables clipping on the device.
    pub fn reset_cliprect(&mut self) {
        let update = self.clips.reset();
        self.write_scissor(update);
    }

    fn write_scissor(&mut self, update: ScissorUpdate) {
        // Pending geometry was recorded under the previous clip.
        self.flush();
        match update {
            ScissorUpdate::Set(rect) => self.gc.set_scissor(rect, self.y_axis),
            ScissorUpdate::Reset => self.gc.reset_scissor(),
        }
    }

    // ── geometry ──────────────────────────────────────────────────────────

    /// Per-vertex colors of `gradient` over the bounding box of `vertices`.
    pub fn get_gradient_colors(&self, vertices: &[Vec2], gradient: &Gradient) -> Vec<Color> {
        geometry::gradient_colors(vertices, gradient)
    }
}

impl Drop for Canvas<'_> {
    fn drop(&mut self) {
        if self.gc.is_valid() {
            self.flush();
        } else if self.active.is_some() {
            log::debug!("graphic context invalid; dropping unflushed geometry");
        }
    }
}
