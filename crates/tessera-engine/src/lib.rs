//! Tessera engine crate.
//!
//! A batched 2D canvas (transform stacks, map modes, clip stack, gradient
//! colors) over a small `GraphicContext` contract, plus the wgpu/winit runtime
//! that backs it with real windows.

pub mod device;
pub mod window;
pub mod core;

pub mod logging;
pub mod coords;
pub mod paint;
pub mod geometry;
pub mod batch;
pub mod canvas;
pub mod render;

#[cfg(test)]
pub(crate) mod testing;
