/// RGBA color with premultiplied alpha, in linear space.
///
/// Gradients interpolate these channel by channel; blending premultiplied
/// values component-wise stays premultiplied.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const TRANSPARENT: Color = Color::from_premul(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Color = Color::from_premul(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::from_premul(1.0, 1.0, 1.0, 1.0);

    /// Color whose RGB channels are already multiplied by `a`.
    #[inline]
    pub const fn from_premul(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Premultiplies straight-alpha channels; every input is clamped to `[0, 1]`.
    pub fn from_straight(r: f32, g: f32, b: f32, a: f32) -> Self {
        let a = a.clamp(0.0, 1.0);
        let [r, g, b] = [r, g, b].map(|c| c.clamp(0.0, 1.0) * a);
        Self { r, g, b, a }
    }

    /// Straight-alpha 8-bit channels, e.g. from a color picker.
    pub fn from_srgb_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        let [r, g, b, a] = [r, g, b, a].map(|c| f32::from(c) / 255.0);
        Self::from_straight(r, g, b, a)
    }

    /// `self` at `t = 0`, `other` at `t = 1`.
    pub fn lerp(self, other: Color, t: f32) -> Color {
        let [r, g, b, a] = std::array::from_fn(|i| {
            let (x, y) = (self.to_array()[i], other.to_array()[i]);
            x * (1.0 - t) + y * t
        });
        Color { r, g, b, a }
    }

    pub fn is_finite(self) -> bool {
        self.to_array().iter().all(|c| c.is_finite())
    }

    #[inline]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_straight_premultiplies() {
        let c = Color::from_straight(1.0, 0.5, 0.0, 0.5);
        assert_eq!(c, Color::from_premul(0.5, 0.25, 0.0, 0.5));
    }

    #[test]
    fn from_straight_clamps_channels() {
        let c = Color::from_straight(2.0, -1.0, 0.5, 3.0);
        assert_eq!(c, Color::from_premul(1.0, 0.0, 0.5, 1.0));
    }

    #[test]
    fn lerp_endpoints_and_midpoint() {
        let a = Color::BLACK;
        let b = Color::WHITE;
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Color::from_premul(0.5, 0.5, 0.5, 1.0));
    }
}
