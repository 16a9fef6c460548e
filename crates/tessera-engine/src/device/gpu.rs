use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use wgpu::SurfaceError;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::coords::Viewport;

use super::surface::WindowSurface;
use super::{GpuFrame, GpuInit, ResizeSignal, SurfaceErrorAction};

/// Shared device-loss flag. Clones observe a loss reported after they were taken.
#[derive(Debug, Clone, Default)]
pub struct DeviceHealth(Arc<AtomicBool>);

impl DeviceHealth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        !self.0.load(Ordering::Acquire)
    }

    pub fn mark_lost(&self) {
        self.0.store(true, Ordering::Release);
    }
}

/// wgpu state of one window: device, queue, configured surface, device-loss
/// flag and the resize signal canvases on this window subscribe to.
pub struct Gpu<'w> {
    _instance: wgpu::Instance,
    _adapter: wgpu::Adapter,

    surface: WindowSurface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,

    /// Drawable size in physical pixels.
    size: PhysicalSize<u32>,
    scale_factor: f64,

    health: DeviceHealth,
    resize_signal: ResizeSignal,
}

impl<'w> Gpu<'w> {
    /// Creates the GPU state for `window` (adapter and device requests are async).
    pub async fn new(window: &'w Window, init: GpuInit) -> Result<Self> {
        let size = window.inner_size();
        anyhow::ensure!(size.width > 0 && size.height > 0, "window has zero size");

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .context("failed to create wgpu surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: init.power_preference,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("tessera device"),
                required_features: init.required_features,
                required_limits: init.required_limits.clone(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let health = DeviceHealth::new();
        let flag = health.clone();
        device.set_device_lost_callback(move |reason, message| {
            log::error!("GPU device lost ({reason:?}): {message}");
            flag.mark_lost();
        });

        let surface = WindowSurface::configure(surface, &adapter, &device, size, &init)?;

        Ok(Self {
            _instance: instance,
            _adapter: adapter,
            surface,
            device,
            queue,
            size,
            scale_factor: window.scale_factor(),
            health,
            resize_signal: ResizeSignal::new(),
        })
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface.format()
    }

    /// Drawable size in physical pixels.
    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// Drawable size in logical pixels.
    pub fn logical_size(&self) -> Viewport {
        let logical = self.size.to_logical::<f64>(self.scale_factor);
        Viewport::new(logical.width as f32, logical.height as f32)
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// False once wgpu reported the device as lost.
    pub fn is_device_valid(&self) -> bool {
        self.health.is_valid()
    }

    /// Handle that keeps tracking device loss after this borrow ends.
    pub fn health(&self) -> &DeviceHealth {
        &self.health
    }

    pub fn resize_signal(&self) -> &ResizeSignal {
        &self.resize_signal
    }

    /// Follows a window resize or scale-factor change. Subscribers are notified
    /// with the new logical size once the surface has been reconfigured.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>, scale_factor: f64) {
        if new_size == self.size && scale_factor == self.scale_factor {
            return;
        }

        self.size = new_size;
        self.scale_factor = scale_factor;

        if self.surface.resize(&self.device, new_size) {
            self.resize_signal.emit(self.logical_size());
        }
    }

    /// Acquires the next swapchain image and an encoder for it.
    pub fn begin_frame(&self) -> std::result::Result<GpuFrame, SurfaceError> {
        self.surface.acquire(&self.device)
    }

    /// Submits the frame's commands and presents its image.
    pub fn submit(&self, frame: GpuFrame) {
        let GpuFrame { surface_texture, view, encoder } = frame;
        self.queue.submit(std::iter::once(encoder.finish()));
        drop(view);
        surface_texture.present();
    }

    pub fn handle_surface_error(&mut self, err: SurfaceError) -> SurfaceErrorAction {
        if !self.is_device_valid() {
            return SurfaceErrorAction::Fatal;
        }
        self.surface.recover(&self.device, err)
    }
}
