use glam::Mat4;

use crate::coords::Viewport;
use crate::device::{ClipZRange, YAxis};

use super::CanvasError;

/// Policy turning the viewport size into a projection matrix.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MapMode {
    /// 2D pixels, origin at the top-left corner, +Y down.
    UpperLeft2d,
    /// 2D pixels, origin at the bottom-left corner, +Y up.
    LowerLeft2d,
    /// The matrix given to `set_user_projection`, used as-is.
    UserProjection,
}

impl MapMode {
    /// Mode with the vertical origin swapped; the user projection has no mirror.
    #[inline]
    pub fn mirrored(self) -> MapMode {
        match self {
            MapMode::UpperLeft2d => MapMode::LowerLeft2d,
            MapMode::LowerLeft2d => MapMode::UpperLeft2d,
            MapMode::UserProjection => MapMode::UserProjection,
        }
    }
}

/// Modelview stack plus the projection derived from the map mode.
///
/// Invariants:
/// - the modelview stack is never empty (its base is the identity)
/// - `projection` always equals what `compute_projection` yields for the
///   current inputs
///
/// Mutators report whether the matrices seen by a batcher changed so the
/// canvas can forward them.
#[derive(Debug, Clone)]
pub struct TransformStack {
    modelviews: Vec<Mat4>,
    map_mode: MapMode,
    user_projection: Mat4,
    projection: Mat4,
    viewport: Viewport,
    y_axis: YAxis,
    clip_z: ClipZRange,
}

impl TransformStack {
    /// Creates a stack for a canvas with the given orientation and depth range.
    ///
    /// Starts in user-projection mode with an identity user matrix and an empty
    /// viewport; the canvas applies its configured map mode and size right after.
    pub fn new(y_axis: YAxis, clip_z: ClipZRange) -> Self {
        Self {
            modelviews: vec![Mat4::IDENTITY],
            map_mode: MapMode::UserProjection,
            user_projection: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            viewport: Viewport::default(),
            y_axis,
            clip_z,
        }
    }

    #[inline]
    pub fn modelview(&self) -> &Mat4 {
        // Never empty; see the type-level invariant.
        &self.modelviews[self.modelviews.len() - 1]
    }

    #[inline]
    pub fn modelview_depth(&self) -> usize {
        self.modelviews.len()
    }

    #[inline]
    pub fn projection(&self) -> &Mat4 {
        &self.projection
    }

    #[inline]
    pub fn map_mode(&self) -> MapMode {
        self.map_mode
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Replaces the top modelview.
    pub fn set_modelview(&mut self, modelview: Mat4) {
        let last = self.modelviews.len() - 1;
        self.modelviews[last] = modelview;
    }

    pub fn push_modelview(&mut self, modelview: Mat4) {
        self.modelviews.push(modelview);
    }

    /// Removes the top modelview; the identity baseline cannot be popped.
    pub fn pop_modelview(&mut self) -> Result<(), CanvasError> {
        if self.modelviews.len() <= 1 {
            return Err(CanvasError::ModelviewUnderflow);
        }
        self.modelviews.pop();
        Ok(())
    }

    /// Returns true if the projection changed.
    pub fn set_map_mode(&mut self, mode: MapMode) -> bool {
        self.map_mode = mode;
        self.recompute()
    }

    /// Returns true if the projection changed.
    pub fn set_user_projection(&mut self, projection: Mat4) -> bool {
        self.user_projection = projection;
        self.recompute()
    }

    /// Stores a new viewport size. Returns true if the projection changed.
    ///
    /// An unchanged size is a no-op.
    pub fn set_viewport(&mut self, viewport: Viewport) -> bool {
        if viewport == self.viewport {
            return false;
        }
        self.viewport = viewport;
        self.recompute()
    }

    /// Map mode actually used for the projection, after orientation mirroring.
    pub fn effective_map_mode(&self) -> MapMode {
        match self.y_axis {
            YAxis::BottomUp => self.map_mode.mirrored(),
            YAxis::TopDown => self.map_mode,
        }
    }

    /// Projection for the current inputs.
    ///
    /// A degenerate viewport (minimized window, nothing drawable) is treated as
    /// 1x1 so the 2D projections stay finite.
    pub fn compute_projection(&self) -> Mat4 {
        let (w, h) = if self.viewport.is_valid() {
            (self.viewport.width, self.viewport.height)
        } else {
            (clamp_extent(self.viewport.width), clamp_extent(self.viewport.height))
        };
        match self.effective_map_mode() {
            MapMode::UpperLeft2d => ortho_2d(0.0, w, h, 0.0, self.clip_z),
            MapMode::LowerLeft2d => ortho_2d(0.0, w, 0.0, h, self.clip_z),
            MapMode::UserProjection => self.user_projection,
        }
    }

    /// Memoized recompute: only a matrix with different bits counts as a change,
    /// so a NaN user projection set twice is still unchanged.
    fn recompute(&mut self) -> bool {
        let projection = self.compute_projection();
        if same_bits(&projection, &self.projection) {
            return false;
        }
        self.projection = projection;
        true
    }
}

fn clamp_extent(v: f32) -> f32 {
    if v > 0.0 && v.is_finite() { v } else { 1.0 }
}

fn same_bits(a: &Mat4, b: &Mat4) -> bool {
    a.to_cols_array().map(f32::to_bits) == b.to_cols_array().map(f32::to_bits)
}

/// Right-handed 2D orthographic projection with a `[-1, 1]` depth slab mapped
/// into the device's clip-Z range.
fn ortho_2d(left: f32, right: f32, bottom: f32, top: f32, clip_z: ClipZRange) -> Mat4 {
    match clip_z {
        ClipZRange::NegativePositiveW => Mat4::orthographic_rh_gl(left, right, bottom, top, -1.0, 1.0),
        ClipZRange::ZeroPositiveW => Mat4::orthographic_rh(left, right, bottom, top, -1.0, 1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{vec3, Vec4};

    fn stack(y_axis: YAxis) -> TransformStack {
        let mut t = TransformStack::new(y_axis, ClipZRange::ZeroPositiveW);
        t.set_viewport(Viewport::new(800.0, 600.0));
        t
    }

    fn project(t: &TransformStack, x: f32, y: f32) -> (f32, f32) {
        let p = *t.projection() * Vec4::new(x, y, 0.0, 1.0);
        (p.x / p.w, p.y / p.w)
    }

    fn near(a: (f32, f32), b: (f32, f32)) -> bool {
        (a.0 - b.0).abs() < 1e-5 && (a.1 - b.1).abs() < 1e-5
    }

    // ── modelview stack ───────────────────────────────────────────────────

    #[test]
    fn starts_with_identity() {
        let t = stack(YAxis::TopDown);
        assert_eq!(t.modelview_depth(), 1);
        assert_eq!(*t.modelview(), Mat4::IDENTITY);
    }

    #[test]
    fn push_pop_tracks_depth_and_top() {
        let mut t = stack(YAxis::TopDown);
        let a = Mat4::from_translation(vec3(1.0, 0.0, 0.0));
        let b = Mat4::from_translation(vec3(0.0, 2.0, 0.0));
        let c = Mat4::from_scale(vec3(3.0, 3.0, 1.0));

        t.push_modelview(a);
        t.push_modelview(b);
        assert_eq!(t.modelview_depth(), 3);
        assert_eq!(*t.modelview(), b);

        t.pop_modelview().unwrap();
        t.push_modelview(c);
        assert_eq!(t.modelview_depth(), 3);
        assert_eq!(*t.modelview(), c);

        t.pop_modelview().unwrap();
        assert_eq!(*t.modelview(), a);
    }

    #[test]
    fn popping_baseline_fails_and_keeps_depth() {
        let mut t = stack(YAxis::TopDown);
        assert_eq!(t.pop_modelview(), Err(CanvasError::ModelviewUnderflow));
        assert_eq!(t.modelview_depth(), 1);
        assert_eq!(*t.modelview(), Mat4::IDENTITY);

        t.push_modelview(Mat4::from_scale(vec3(2.0, 2.0, 1.0)));
        t.pop_modelview().unwrap();
        assert_eq!(t.pop_modelview(), Err(CanvasError::ModelviewUnderflow));
        assert_eq!(t.modelview_depth(), 1);
    }

    #[test]
    fn set_modelview_replaces_top_only() {
        let mut t = stack(YAxis::TopDown);
        let m = Mat4::from_translation(vec3(5.0, 5.0, 0.0));
        t.push_modelview(Mat4::IDENTITY);
        t.set_modelview(m);
        assert_eq!(t.modelview_depth(), 2);
        assert_eq!(*t.modelview(), m);
        t.pop_modelview().unwrap();
        assert_eq!(*t.modelview(), Mat4::IDENTITY);
    }

    // ── projection ────────────────────────────────────────────────────────

    #[test]
    fn upper_left_maps_origin_to_top_left() {
        let mut t = stack(YAxis::TopDown);
        t.set_map_mode(MapMode::UpperLeft2d);
        assert!(near(project(&t, 0.0, 0.0), (-1.0, 1.0)));
        assert!(near(project(&t, 800.0, 600.0), (1.0, -1.0)));
    }

    #[test]
    fn lower_left_is_vertically_inverted() {
        let mut t = stack(YAxis::TopDown);
        t.set_map_mode(MapMode::LowerLeft2d);
        assert!(near(project(&t, 0.0, 0.0), (-1.0, -1.0)));
        assert!(near(project(&t, 800.0, 600.0), (1.0, 1.0)));
    }

    #[test]
    fn bottom_up_targets_mirror_2d_modes() {
        let mut t = stack(YAxis::BottomUp);
        t.set_map_mode(MapMode::UpperLeft2d);
        assert_eq!(t.effective_map_mode(), MapMode::LowerLeft2d);
        assert!(near(project(&t, 0.0, 0.0), (-1.0, -1.0)));

        t.set_map_mode(MapMode::UserProjection);
        assert_eq!(t.effective_map_mode(), MapMode::UserProjection);
    }

    #[test]
    fn user_projection_is_used_verbatim() {
        let mut t = stack(YAxis::BottomUp);
        let user = Mat4::from_scale(vec3(0.5, 0.25, 1.0));
        t.set_map_mode(MapMode::UpperLeft2d);
        t.set_user_projection(user);
        assert!(t.set_map_mode(MapMode::UserProjection));
        assert_eq!(*t.projection(), user);
    }

    #[test]
    fn clip_z_range_selects_depth_mapping() {
        let mut zero = stack(YAxis::TopDown);
        zero.set_map_mode(MapMode::UpperLeft2d);
        let z0 = (*zero.projection() * Vec4::new(0.0, 0.0, 1.0, 1.0)).z;

        let mut gl = TransformStack::new(YAxis::TopDown, ClipZRange::NegativePositiveW);
        gl.set_viewport(Viewport::new(800.0, 600.0));
        gl.set_map_mode(MapMode::UpperLeft2d);
        let z1 = (*gl.projection() * Vec4::new(0.0, 0.0, 1.0, 1.0)).z;

        // z = near (+1 in a right-handed view) lands on the lower clip bound.
        assert!((z0 - 0.0).abs() < 1e-6, "{z0}");
        assert!((z1 + 1.0).abs() < 1e-6, "{z1}");
    }

    #[test]
    fn recompute_is_memoized() {
        let mut t = stack(YAxis::TopDown);
        assert!(t.set_map_mode(MapMode::UpperLeft2d));
        assert!(!t.set_map_mode(MapMode::UpperLeft2d));

        // User matrix changes are invisible while a 2D mode is active.
        assert!(!t.set_user_projection(Mat4::from_scale(vec3(2.0, 2.0, 1.0))));
    }

    #[test]
    fn viewport_change_recomputes_and_same_size_is_noop() {
        let mut t = stack(YAxis::TopDown);
        t.set_map_mode(MapMode::UpperLeft2d);
        assert!(!t.set_viewport(Viewport::new(800.0, 600.0)));
        assert!(t.set_viewport(Viewport::new(1024.0, 768.0)));
        assert!(near(project(&t, 1024.0, 768.0), (1.0, -1.0)));
    }

    #[test]
    fn zero_size_viewport_keeps_projection_finite_and_memoized() {
        let mut t = TransformStack::new(YAxis::TopDown, ClipZRange::ZeroPositiveW);
        assert!(!t.set_viewport(Viewport::new(0.0, 0.0)));
        assert!(t.set_map_mode(MapMode::UpperLeft2d));
        assert!(t.projection().is_finite());
        assert!(!t.set_map_mode(MapMode::UpperLeft2d));

        // Same as a 1x1 target.
        assert!(near(project(&t, 1.0, 1.0), (1.0, -1.0)));
    }

    #[test]
    fn repeated_nan_user_projection_is_unchanged() {
        let mut t = stack(YAxis::TopDown);
        let nan = Mat4::from_cols_array(&[f32::NAN; 16]);
        t.set_map_mode(MapMode::UserProjection);
        assert!(t.set_user_projection(nan));
        assert!(!t.set_user_projection(nan));
    }
}
