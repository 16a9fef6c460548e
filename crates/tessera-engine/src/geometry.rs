//! Stateless geometry helpers used while preparing batched geometry.

use crate::coords::{Rect, Vec2};
use crate::paint::{Color, Gradient};

/// Axis-aligned bounding box of a vertex set.
///
/// Returns `None` for an empty slice.
pub fn bounding_box(vertices: &[Vec2]) -> Option<Rect> {
    let (first, rest) = vertices.split_first()?;

    let (mut left, mut top, mut right, mut bottom) = (first.x, first.y, first.x, first.y);
    for v in rest {
        left = left.min(v.x);
        top = top.min(v.y);
        right = right.max(v.x);
        bottom = bottom.max(v.y);
    }

    Some(Rect::from_edges(left, top, right, bottom))
}

/// Resolves a four-corner gradient into one color per vertex.
///
/// Each vertex is normalized into the bounding box of the whole set and the
/// gradient is sampled bilinearly at that position. Output order matches input
/// order. A box with zero width or height is treated as having extent 1 on that
/// axis, so collinear or single-point input still yields finite colors.
pub fn gradient_colors(vertices: &[Vec2], gradient: &Gradient) -> Vec<Color> {
    let Some(bounds) = bounding_box(vertices) else {
        return Vec::new();
    };

    let width = if bounds.size.x <= 0.0 { 1.0 } else { bounds.size.x };
    let height = if bounds.size.y <= 0.0 { 1.0 } else { bounds.size.y };
    let inv_w = 1.0 / width;
    let inv_h = 1.0 / height;

    vertices
        .iter()
        .map(|&v| {
            let p = v - bounds.origin;
            gradient.sample(p.x * inv_w, p.y * inv_h)
        })
        .collect()
}
