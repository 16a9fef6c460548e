//! wgpu rendering backend.
//!
//! [`GpuTarget`] implements the canvas's [`GraphicContext`](crate::device::GraphicContext)
//! on top of a command encoder and a color view. [`BatchPipeline`] owns the GPU
//! resources that outlive a frame (pipelines, vertex ring, registered textures).
//!
//! Convention:
//! - vertices arrive in clip space; the canvas has already applied its matrices
//! - clip rectangles are logical pixels and become physical scissor rects here

mod common;
mod ctx;
mod gpu_target;
mod pipeline;

pub use ctx::{RenderCtx, RenderTarget};
pub use gpu_target::GpuTarget;
pub use pipeline::BatchPipeline;
