//! Shared GPU state helpers used by the batch pipeline and targets.

use crate::coords::Rect;
use crate::device::{PrimitiveKind, YAxis};
use crate::paint::Color;

// ── blend ─────────────────────────────────────────────────────────────────

pub(super) fn premul_alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

pub(super) fn topology(kind: PrimitiveKind) -> wgpu::PrimitiveTopology {
    match kind {
        PrimitiveKind::Triangles => wgpu::PrimitiveTopology::TriangleList,
        PrimitiveKind::Lines => wgpu::PrimitiveTopology::LineList,
        PrimitiveKind::Points => wgpu::PrimitiveTopology::PointList,
    }
}

pub(super) fn clear_color(c: Color) -> wgpu::Color {
    wgpu::Color {
        r: c.r as f64,
        g: c.g as f64,
        b: c.b as f64,
        a: c.a as f64,
    }
}

// ── scissor rect ──────────────────────────────────────────────────────────

/// Device scissor state.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(super) enum Scissor {
    /// Whole target.
    Full,
    /// Physical `(x, y, w, h)`, clamped to the target.
    Rect(u32, u32, u32, u32),
    /// Zero-area clip; draws are skipped.
    Empty,
}

/// Converts a logical-pixel clip rect to a physical scissor for a target of
/// `target` physical pixels.
///
/// `BottomUp` mirrors the rectangle vertically: its `y` is measured from the
/// bottom row of the target.
pub(super) fn logical_clip_to_scissor(
    clip: Rect,
    y_axis: YAxis,
    target: (u32, u32),
    scale: f32,
) -> Scissor {
    let (phys_w, phys_h) = target;
    let r = clip.normalized();

    let x  = ((r.left() * scale).max(0.0) as u32).min(phys_w);
    let x2 = ((r.right() * scale).max(0.0) as u32).min(phys_w);
    let (top, bottom) = match y_axis {
        YAxis::TopDown => (r.top(), r.bottom()),
        YAxis::BottomUp => {
            let h = phys_h as f32 / scale;
            (h - r.bottom(), h - r.top())
        }
    };
    let y  = ((top * scale).max(0.0) as u32).min(phys_h);
    let y2 = ((bottom * scale).max(0.0) as u32).min(phys_h);

    let (w, h) = (x2.saturating_sub(x), y2.saturating_sub(y));
    if w == 0 || h == 0 { Scissor::Empty } else { Scissor::Rect(x, y, w, h) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scissor_scales_to_physical_pixels() {
        let s = logical_clip_to_scissor(Rect::new(10.0, 20.0, 30.0, 40.0), YAxis::TopDown, (200, 200), 2.0);
        assert_eq!(s, Scissor::Rect(20, 40, 60, 80));
    }

    #[test]
    fn scissor_is_clamped_to_target() {
        let s = logical_clip_to_scissor(Rect::new(-10.0, -10.0, 500.0, 50.0), YAxis::TopDown, (100, 100), 1.0);
        assert_eq!(s, Scissor::Rect(0, 0, 100, 40));
    }

    #[test]
    fn bottom_up_scissor_is_mirrored() {
        let s = logical_clip_to_scissor(Rect::new(0.0, 0.0, 10.0, 10.0), YAxis::BottomUp, (100, 100), 1.0);
        assert_eq!(s, Scissor::Rect(0, 90, 10, 10));
    }

    #[test]
    fn zero_area_or_offscreen_clip_is_empty() {
        let tgt = (100, 100);
        assert_eq!(logical_clip_to_scissor(Rect::new(5.0, 5.0, 0.0, 10.0), YAxis::TopDown, tgt, 1.0), Scissor::Empty);
        assert_eq!(logical_clip_to_scissor(Rect::new(200.0, 0.0, 10.0, 10.0), YAxis::TopDown, tgt, 1.0), Scissor::Empty);
    }
}
