use super::Rect;

/// Drawable size of a graphics context in logical pixels.
///
/// The canvas derives its 2D projections from this size and seeds the clip
/// stack with the full viewport rectangle.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Rectangle covering the whole viewport, anchored at the origin.
    #[inline]
    pub fn to_rect(self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}
