//! Graphics-context contract and the wgpu device layer.
//!
//! This module is responsible for:
//! - the `GraphicContext` trait the canvas submits to (scissor, clear, draws)
//! - the window-resize observer (`ResizeSignal`)
//! - creating the wgpu Instance/Adapter/Device/Queue and the window surface
//! - acquiring frames and providing encoders/views for rendering

mod context;
mod gpu;
mod init;
mod signal;
mod surface;
mod vertex;

pub use context::{ClipZRange, GraphicContext, PrimitiveBatch, PrimitiveKind, TextureId, YAxis};
pub use gpu::{DeviceHealth, Gpu};
pub use init::GpuInit;
pub use signal::{ResizeSignal, ResizeSubscription};
pub use surface::{GpuFrame, SurfaceErrorAction};
pub use vertex::BatchVertex;
