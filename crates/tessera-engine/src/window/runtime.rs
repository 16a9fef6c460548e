use std::collections::HashMap;

use anyhow::{Context, Result};
use ouroboros::self_referencing;
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::canvas::CanvasConfig;
use crate::core::{App, FrameCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::render::BatchPipeline;

/// Settings of one window.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    /// Settings of the canvas handed out for each frame of this window.
    pub canvas: CanvasConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "tessera".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            canvas: CanvasConfig::default(),
        }
    }
}

/// Requests an application makes during a frame; applied once the frame ends.
#[derive(Default)]
pub struct RuntimeCtx {
    open: Vec<RuntimeConfig>,
    close: Vec<WindowId>,
    exit: bool,
}

impl RuntimeCtx {
    pub fn create_window(&mut self, config: RuntimeConfig) {
        self.open.push(config);
    }

    pub fn close_window(&mut self, id: WindowId) {
        self.close.push(id);
    }

    pub fn exit(&mut self) {
        self.exit = true;
    }
}

/// Runs the winit event loop until the last window closes or the app exits.
pub struct Runtime;

impl Runtime {
    pub fn run<A>(initial: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: App + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut driver = Driver {
            initial,
            gpu_init,
            app,
            windows: HashMap::new(),
            exiting: false,
        };

        event_loop
            .run_app(&mut driver)
            .context("winit event loop terminated with error")
    }
}

/// A window and the GPU state borrowing it.
#[self_referencing]
struct WindowEntry {
    pipeline: BatchPipeline,
    canvas_config: CanvasConfig,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct Driver<A: App> {
    initial: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    windows: HashMap<WindowId, WindowEntry>,
    exiting: bool,
}

impl<A: App> Driver<A> {
    fn open_window(&mut self, event_loop: &ActiveEventLoop, config: RuntimeConfig) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(config.title)
            .with_inner_size(config.initial_size);
        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let id = window.id();
        let gpu_init = self.gpu_init.clone();
        let entry = WindowEntryTryBuilder {
            pipeline: BatchPipeline::new(),
            canvas_config: config.canvas,
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed for window")?;

        entry.with_window(|w| w.request_redraw());
        self.windows.insert(id, entry);
        log::debug!("window {id:?} opened");
        Ok(())
    }

    fn close_window(&mut self, id: WindowId) {
        if self.windows.remove(&id).is_some() {
            log::debug!("window {id:?} closed");
            self.app.on_window_closed(id);
        }
        if self.windows.is_empty() {
            self.exiting = true;
        }
    }

    /// Reconfigures the surface; the GPU layer then fires the window's resize
    /// signal for canvases bound to it.
    fn resize_window(&mut self, id: WindowId, size: Option<PhysicalSize<u32>>, scale_factor: Option<f64>) {
        let Some(entry) = self.windows.get_mut(&id) else { return };
        entry.with_mut(|fields| {
            let size = size.unwrap_or_else(|| fields.window.inner_size());
            let scale = scale_factor.unwrap_or_else(|| fields.window.scale_factor());
            fields.gpu.resize(size, scale);
            fields.window.request_redraw();
        });
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop, id: WindowId) {
        let mut requests = RuntimeCtx::default();
        let app = &mut self.app;

        if let Some(entry) = self.windows.get_mut(&id) {
            entry.with_mut(|fields| {
                let mut ctx = FrameCtx {
                    window: WindowCtx { id, window: fields.window },
                    gpu: fields.gpu,
                    pipeline: fields.pipeline,
                    canvas_config: *fields.canvas_config,
                    runtime: &mut requests,
                };
                if app.on_frame(&mut ctx).is_exit() {
                    ctx.runtime.exit();
                }
            });
        }

        self.apply(event_loop, requests);
    }

    fn apply(&mut self, event_loop: &ActiveEventLoop, requests: RuntimeCtx) {
        for config in requests.open {
            if let Err(e) = self.open_window(event_loop, config) {
                log::error!("failed to create window: {e:#}");
                self.exiting = true;
            }
        }
        for id in requests.close {
            self.close_window(id);
        }
        self.exiting |= requests.exit;
    }
}

impl<A: App> ApplicationHandler for Driver<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if !self.windows.is_empty() {
            return;
        }
        if let Err(e) = self.open_window(event_loop, self.initial.clone()) {
            log::error!("failed to create initial window: {e:#}");
            self.exiting = true;
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exiting {
            event_loop.exit();
            return;
        }

        // Continuous redraw.
        event_loop.set_control_flow(ControlFlow::Wait);
        for entry in self.windows.values() {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        if self.exiting || !self.windows.contains_key(&id) {
            return;
        }

        if self.app.on_window_event(id, &event).is_exit() {
            self.exiting = true;
        } else {
            match event {
                WindowEvent::CloseRequested => self.close_window(id),
                WindowEvent::Resized(size) => self.resize_window(id, Some(size), None),
                WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                    self.resize_window(id, None, Some(scale_factor))
                }
                WindowEvent::RedrawRequested => self.redraw(event_loop, id),
                _ => {}
            }
        }

        if self.exiting {
            event_loop.exit();
        }
    }
}
