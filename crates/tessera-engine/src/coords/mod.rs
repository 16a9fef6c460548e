//! Coordinate and geometry types shared by the canvas, batchers and backends.
//!
//! Canonical CPU space:
//! - Logical pixels
//! - Origin top-left, +X right, +Y down (before the canvas projection is applied)
//!
//! The canvas projection maps this space into clip space; see `canvas::MapMode`.

mod rect;
mod viewport;

pub use glam::Vec2;
pub use rect::Rect;
pub use viewport::Viewport;
