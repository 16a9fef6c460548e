use winit::window::{Window, WindowId};

use crate::canvas::{Canvas, CanvasConfig};
use crate::device::{Gpu, SurfaceErrorAction};
use crate::paint::Color;
use crate::render::{BatchPipeline, GpuTarget, RenderCtx, RenderTarget};
use crate::window::RuntimeCtx;

use super::app::AppControl;

/// Per-window handles and immutable window metadata.
pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub window: &'a Window,
}

impl<'a> WindowCtx<'a> {
    /// Returns the logical window size as `(width, height)` in logical pixels.
    pub fn logical_size(&self) -> (f32, f32) {
        let phys = self.window.inner_size();
        let scale = self.window.scale_factor();
        let logi: winit::dpi::LogicalSize<f64> = phys.to_logical(scale);
        (logi.width as f32, logi.height as f32)
    }
}

/// Per-frame context passed to `core::App::on_frame`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
    pub pipeline: &'a mut BatchPipeline,
    pub canvas_config: CanvasConfig,
    pub runtime: &'a mut RuntimeCtx,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// Acquires the next surface texture, clears it with `clear`, hands `draw` a
    /// [`Canvas`] bound to it and presents the result.
    ///
    /// The canvas is dropped (and thereby flushed) before the frame is
    /// submitted. A draw error is logged and ends the application.
    pub fn render<F>(&mut self, clear: Color, draw: F) -> AppControl
    where
        F: FnOnce(&mut Canvas<'_>) -> anyhow::Result<()>,
    {
        let mut frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                let action = self.gpu.handle_surface_error(err);
                if action == SurfaceErrorAction::Fatal {
                    return AppControl::Exit;
                }
                return AppControl::Continue;
            }
        };

        self.pipeline.begin_frame();

        let result = {
            let gpu: &Gpu<'w> = self.gpu;
            let rctx = RenderCtx::for_window(gpu);
            let target = RenderTarget::new(&mut frame.encoder, &frame.view);
            let mut gc = GpuTarget::for_window(rctx, target, self.pipeline, gpu);

            let mut canvas = Canvas::with_config(&mut gc, self.canvas_config);
            canvas.clear(clear);
            draw(&mut canvas)
        };

        self.window.window.pre_present_notify();
        self.gpu.submit(frame);

        match result {
            Ok(()) => AppControl::Continue,
            Err(e) => {
                log::error!("frame draw failed: {e:#}");
                AppControl::Exit
            }
        }
    }
}
