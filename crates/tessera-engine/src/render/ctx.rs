use crate::coords::Viewport;
use crate::device::Gpu;

/// Device handles and target description shared by everything recording into
/// one color attachment.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    /// Format of the color attachment; pipelines are built for it.
    pub surface_format: wgpu::TextureFormat,
    /// Target size in logical pixels.
    pub viewport: Viewport,
    pub scale_factor: f32,
}

impl<'a> RenderCtx<'a> {
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        viewport: Viewport,
        scale_factor: f32,
    ) -> Self {
        Self { device, queue, surface_format, viewport, scale_factor }
    }

    /// Context for the window surface of `gpu`.
    pub fn for_window(gpu: &'a Gpu<'_>) -> Self {
        Self::new(
            gpu.device(),
            gpu.queue(),
            gpu.surface_format(),
            gpu.logical_size(),
            gpu.scale_factor() as f32,
        )
    }

    /// Target size in physical pixels, at least 1x1.
    pub fn physical_size(&self) -> (u32, u32) {
        let px = |logical: f32| (logical * self.scale_factor).max(1.0) as u32;
        (px(self.viewport.width), px(self.viewport.height))
    }
}

/// Encoder and color view a frame records into.
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
}

impl<'a> RenderTarget<'a> {
    pub fn new(encoder: &'a mut wgpu::CommandEncoder, color_view: &'a wgpu::TextureView) -> Self {
        Self { encoder, color_view }
    }
}
