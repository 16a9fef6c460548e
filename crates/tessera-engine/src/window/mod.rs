//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and Windows, wires them to the GPU layer and
//! forwards surface resizes to the window's resize signal.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};
