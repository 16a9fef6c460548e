use crate::coords::{Rect, Viewport};

use super::CanvasError;

/// Scissor state the device must adopt after a clip-stack change.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ScissorUpdate {
    Set(Rect),
    Reset,
}

/// Stack of nested clip rectangles.
///
/// The top is always the effective clip: every entry pushed onto a non-empty
/// stack is already intersected with its parent. An empty stack means no
/// clipping. Each mutation returns the scissor state to forward to the device.
#[derive(Debug, Clone, Default)]
pub struct ClipStack {
    rects: Vec<Rect>,
}

impl ClipStack {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn top(&self) -> Option<Rect> {
        self.rects.last().copied()
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.rects.len()
    }

    /// Replaces the top clip, or makes `rect` the only entry of an empty stack.
    ///
    /// Unlike [`push`](Self::push), the rectangle is not intersected with the
    /// parent.
    pub fn set(&mut self, rect: Rect) -> ScissorUpdate {
        match self.rects.last_mut() {
            Some(top) => *top = rect,
            None => self.rects.push(rect),
        }
        ScissorUpdate::Set(rect)
    }

    /// Pushes `rect` intersected with the current top.
    pub fn push(&mut self, rect: Rect) -> ScissorUpdate {
        let effective = match self.top() {
            Some(parent) => parent.overlap(rect),
            None => rect,
        };
        self.rects.push(effective);
        ScissorUpdate::Set(effective)
    }

    /// Duplicates the top so it can be restored by a later pop; an empty stack is
    /// seeded with the whole viewport.
    pub fn push_current(&mut self, viewport: Viewport) -> ScissorUpdate {
        let rect = self.top().unwrap_or_else(|| viewport.to_rect());
        self.rects.push(rect);
        ScissorUpdate::Set(rect)
    }

    pub fn pop(&mut self) -> Result<ScissorUpdate, CanvasError> {
        self.rects.pop().ok_or(CanvasError::ClipUnderflow)?;
        Ok(match self.top() {
            Some(rect) => ScissorUpdate::Set(rect),
            None => ScissorUpdate::Reset,
        })
    }

    pub fn reset(&mut self) -> ScissorUpdate {
        self.rects.clear();
        ScissorUpdate::Reset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(x: f32, y: f32, w: f32, h: f32) -> Rect { Rect::new(x, y, w, h) }

    #[test]
    fn push_on_empty_is_exact() {
        let mut s = ClipStack::new();
        let rect = r(-5.0, 3.0, 40.0, 7.0);
        assert_eq!(s.push(rect), ScissorUpdate::Set(rect));
        assert_eq!(s.top(), Some(rect));
    }

    #[test]
    fn push_intersects_with_parent() {
        let mut s = ClipStack::new();
        s.push(r(0.0, 0.0, 100.0, 100.0));
        let update = s.push(r(50.0, 50.0, 100.0, 100.0));
        assert_eq!(update, ScissorUpdate::Set(r(50.0, 50.0, 50.0, 50.0)));
        assert_eq!(s.depth(), 2);
    }

    #[test]
    fn disjoint_push_is_kept_as_empty_clip() {
        let mut s = ClipStack::new();
        s.push(r(0.0, 0.0, 10.0, 10.0));
        s.push(r(50.0, 50.0, 10.0, 10.0));
        assert_eq!(s.depth(), 2);
        assert!(s.top().unwrap().is_empty());
    }

    #[test]
    fn set_replaces_top_without_intersecting() {
        let mut s = ClipStack::new();
        s.push(r(0.0, 0.0, 10.0, 10.0));
        s.push(r(0.0, 0.0, 5.0, 5.0));
        let big = r(0.0, 0.0, 500.0, 500.0);
        assert_eq!(s.set(big), ScissorUpdate::Set(big));
        assert_eq!(s.depth(), 2);
        assert_eq!(s.top(), Some(big));
    }

    #[test]
    fn set_on_empty_pushes() {
        let mut s = ClipStack::new();
        s.set(r(1.0, 1.0, 1.0, 1.0));
        assert_eq!(s.depth(), 1);
    }

    #[test]
    fn push_current_duplicates_or_seeds_viewport() {
        let mut s = ClipStack::new();
        let vp = Viewport::new(640.0, 480.0);
        assert_eq!(s.push_current(vp), ScissorUpdate::Set(r(0.0, 0.0, 640.0, 480.0)));

        s.set(r(10.0, 10.0, 20.0, 20.0));
        assert_eq!(s.push_current(vp), ScissorUpdate::Set(r(10.0, 10.0, 20.0, 20.0)));
        assert_eq!(s.depth(), 2);
    }

    #[test]
    fn pop_restores_parent_then_resets() {
        let mut s = ClipStack::new();
        let outer = r(0.0, 0.0, 10.0, 10.0);
        s.push(outer);
        s.push(r(2.0, 2.0, 2.0, 2.0));

        assert_eq!(s.pop(), Ok(ScissorUpdate::Set(outer)));
        assert_eq!(s.pop(), Ok(ScissorUpdate::Reset));
        assert_eq!(s.pop(), Err(CanvasError::ClipUnderflow));
        assert_eq!(s.depth(), 0);
    }

    #[test]
    fn reset_clears_everything() {
        let mut s = ClipStack::new();
        s.push(r(0.0, 0.0, 1.0, 1.0));
        s.push(r(0.0, 0.0, 1.0, 1.0));
        assert_eq!(s.reset(), ScissorUpdate::Reset);
        assert_eq!(s.top(), None);
        assert_eq!(s.reset(), ScissorUpdate::Reset);
    }
}
