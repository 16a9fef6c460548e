use super::Color;

/// Four-corner gradient.
///
/// Colors are interpolated bilinearly across the bounding box of the geometry
/// being filled: horizontally between the left and right corner of each row,
/// then vertically between the top and bottom rows.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Gradient {
    pub top_left: Color,
    pub top_right: Color,
    pub bottom_left: Color,
    pub bottom_right: Color,
}

impl Gradient {
    #[inline]
    pub const fn new(top_left: Color, top_right: Color, bottom_left: Color, bottom_right: Color) -> Self {
        Self { top_left, top_right, bottom_left, bottom_right }
    }

    /// Top-to-bottom gradient (both top corners share `top`, both bottom corners `bottom`).
    #[inline]
    pub const fn vertical(top: Color, bottom: Color) -> Self {
        Self::new(top, top, bottom, bottom)
    }

    /// Left-to-right gradient.
    #[inline]
    pub const fn horizontal(left: Color, right: Color) -> Self {
        Self::new(left, right, left, right)
    }

    /// Color at normalized position `(u, v)` in `[0, 1] x [0, 1]`, `(0, 0)` being top-left.
    #[inline]
    pub fn sample(&self, u: f32, v: f32) -> Color {
        let top = self.top_left.lerp(self.top_right, u);
        let bottom = self.bottom_left.lerp(self.bottom_right, u);
        top.lerp(bottom, v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(v: f32) -> Color { Color::from_premul(v, v, v, 1.0) }

    #[test]
    fn sample_corners() {
        let g = Gradient::new(c(0.1), c(0.2), c(0.3), c(0.4));
        assert_eq!(g.sample(0.0, 0.0), g.top_left);
        assert_eq!(g.sample(1.0, 0.0), g.top_right);
        assert_eq!(g.sample(0.0, 1.0), g.bottom_left);
        assert_eq!(g.sample(1.0, 1.0), g.bottom_right);
    }

    #[test]
    fn horizontal_ignores_v() {
        let g = Gradient::horizontal(c(0.0), c(1.0));
        assert_eq!(g.sample(0.5, 0.0), g.sample(0.5, 1.0));
        assert_eq!(g.sample(1.0, 0.3), c(1.0));
    }

    #[test]
    fn vertical_ignores_u() {
        let g = Gradient::vertical(c(0.0), c(1.0));
        assert_eq!(g.sample(0.0, 0.25), g.sample(1.0, 0.25));
    }
}
