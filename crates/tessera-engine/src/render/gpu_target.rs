use crate::coords::{Rect, Viewport};
use crate::device::{ClipZRange, DeviceHealth, Gpu, GraphicContext, PrimitiveBatch, ResizeSignal, YAxis};
use crate::paint::Color;

use super::common::{clear_color, logical_clip_to_scissor, Scissor};
use super::{BatchPipeline, RenderCtx, RenderTarget};

/// wgpu implementation of [`GraphicContext`] for one color attachment.
///
/// Every clear and every batch is recorded as its own render pass on the
/// target's encoder, so submission order on the GPU equals call order.
/// Window targets share the window's [`ResizeSignal`]; texture targets report
/// a signal nobody emits.
pub struct GpuTarget<'a> {
    ctx: RenderCtx<'a>,
    target: RenderTarget<'a>,
    pipeline: &'a mut BatchPipeline,

    window_backed: bool,
    health: DeviceHealth,
    resize_signal: ResizeSignal,

    scissor: Scissor,
    warned_missing_texture: bool,
}

impl<'a> GpuTarget<'a> {
    /// Target drawing into the window surface owned by `gpu`.
    pub fn for_window(
        ctx: RenderCtx<'a>,
        target: RenderTarget<'a>,
        pipeline: &'a mut BatchPipeline,
        gpu: &Gpu<'_>,
    ) -> Self {
        Self {
            ctx,
            target,
            pipeline,
            window_backed: true,
            health: gpu.health().clone(),
            resize_signal: gpu.resize_signal().clone(),
            scissor: Scissor::Full,
            warned_missing_texture: false,
        }
    }

    /// Off-screen target; `target.color_view` must use `ctx.surface_format`.
    /// `health` tracks the device `ctx` belongs to.
    pub fn for_texture(
        ctx: RenderCtx<'a>,
        target: RenderTarget<'a>,
        pipeline: &'a mut BatchPipeline,
        health: DeviceHealth,
    ) -> Self {
        Self {
            ctx,
            target,
            pipeline,
            window_backed: false,
            health,
            resize_signal: ResizeSignal::new(),
            scissor: Scissor::Full,
            warned_missing_texture: false,
        }
    }
}

impl GraphicContext for GpuTarget<'_> {
    fn size(&self) -> Viewport {
        self.ctx.viewport
    }

    fn write_target_is_null(&self) -> bool {
        self.window_backed
    }

    fn texture_y_axis(&self) -> YAxis {
        YAxis::TopDown
    }

    fn clip_z_range(&self) -> ClipZRange {
        ClipZRange::ZeroPositiveW
    }

    fn is_valid(&self) -> bool {
        self.health.is_valid()
    }

    fn clear(&mut self, color: Color) {
        let _rpass = self.target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("tessera clear"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: self.target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear_color(color)),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
    }

    fn set_scissor(&mut self, rect: Rect, y_axis: YAxis) {
        self.scissor = logical_clip_to_scissor(rect, y_axis, self.ctx.physical_size(), self.ctx.scale_factor);
    }

    fn reset_scissor(&mut self) {
        self.scissor = Scissor::Full;
    }

    fn draw_primitives(&mut self, batch: PrimitiveBatch<'_>) {
        if batch.vertices.is_empty() || self.scissor == Scissor::Empty {
            return;
        }

        let textured = batch.texture.is_some();
        if let Some(id) = batch.texture {
            if self.pipeline.texture(id).is_none() {
                if !self.warned_missing_texture {
                    log::warn!("batch references unregistered texture {id:?}; skipped");
                    self.warned_missing_texture = true;
                }
                return;
            }
        }

        // Mutating calls must happen before borrowing pipeline resources immutably.
        self.pipeline.ensure_pipeline(&self.ctx, batch.kind, textured);
        let range = self.pipeline.upload(&self.ctx, batch.vertices);

        let Some(pipeline) = self.pipeline.pipeline(batch.kind, textured) else { return };
        let Some(vbo) = self.pipeline.vertex_buffer() else { return };
        let bind_group = batch.texture.and_then(|id| self.pipeline.texture(id));

        let mut rpass = self.target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("tessera batch pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: self.target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        if let Some(bind_group) = bind_group {
            rpass.set_bind_group(0, bind_group, &[]);
        }
        if let Scissor::Rect(x, y, w, h) = self.scissor {
            rpass.set_scissor_rect(x, y, w, h);
        }
        rpass.set_vertex_buffer(0, vbo.slice(range));
        rpass.draw(0..batch.vertices.len() as u32, 0..1);
    }

    fn resize_signal(&self) -> &ResizeSignal {
        &self.resize_signal
    }
}
