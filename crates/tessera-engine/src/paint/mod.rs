//! Paint model shared by the canvas and the batchers.
//!
//! Scope:
//! - color representation (linear premultiplied alpha)
//! - four-corner gradients, resolved to per-vertex colors by `geometry::gradient_colors`

pub mod color;
pub mod gradient;

pub use color::Color;
pub use gradient::Gradient;
