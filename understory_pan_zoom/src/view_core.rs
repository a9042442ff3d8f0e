// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Point, Rect, Vec2};

/// A position/scale pair describing where the view is looking.
///
/// `position` is the centre of the visible region in the content's local
/// frame; `scale` is the uniform scale of the content transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewState {
    /// Centre of the visible region, in content-local coordinates.
    pub position: Point,
    /// Uniform content scale.
    pub scale: f64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            position: Point::ZERO,
            scale: 1.0,
        }
    }
}

/// Transform and bounds bookkeeping for an animated pan/zoom view.
///
/// `PanZoomCore` owns the uniform translate+scale transform that maps the
/// content's local frame into its parent (global) frame, together with:
/// - the pan bounds: the visible viewport, in the global frame,
/// - the target bounds: the pannable content extent, laid out under the
///   identity transform (numerically the content's local frame).
///
/// Every mutation funnels through a single reposition step that re-clamps the
/// transform so the transformed content still covers the pan bounds, then
/// re-derives the transformed pan bounds and the live [`ViewState`]. That is
/// the only place the live state is written.
#[derive(Clone, Debug)]
pub struct PanZoomCore {
    scale: f64,
    translation: Vec2,
    pan_bounds: Rect,
    target_bounds: Rect,
    min_scale: f64,
    max_scale: f64,
    drag_bounds_margin: f64,
    transformed_pan_bounds: Rect,
    drag_bounds: Rect,
    source: ViewState,
}

impl PanZoomCore {
    /// Creates a core with the identity transform.
    ///
    /// The bounds may be left empty and supplied later; until both are
    /// finite and non-empty the core keeps its transform untouched.
    #[must_use]
    pub fn new(pan_bounds: Rect, target_bounds: Rect, min_scale: f64, max_scale: f64) -> Self {
        let mut core = Self {
            scale: 1.0,
            translation: Vec2::ZERO,
            pan_bounds,
            target_bounds,
            min_scale,
            max_scale,
            drag_bounds_margin: 0.0,
            transformed_pan_bounds: Rect::ZERO,
            drag_bounds: Rect::ZERO,
            source: ViewState::default(),
        };
        core.reposition_corrected();
        core
    }

    /// Returns `true` once both pan and target bounds are finite and non-empty.
    #[must_use]
    pub fn has_valid_bounds(&self) -> bool {
        is_valid_rect(self.pan_bounds) && is_valid_rect(self.target_bounds)
    }

    /// Returns the content transform (local → global).
    #[must_use]
    pub fn transform(&self) -> Affine {
        Affine::translate(self.translation) * Affine::scale(self.scale)
    }

    /// Replaces the content transform from outside the animation loop.
    ///
    /// Only uniform translate+scale transforms are supported.
    pub fn set_transform(&mut self, transform: Affine) {
        let [a, b, c, d, e, f] = transform.as_coeffs();
        debug_assert!(
            b.abs() < 1e-9 && c.abs() < 1e-9 && (a - d).abs() < 1e-9 && a > 0.0,
            "pan/zoom transforms must be a positive uniform scale plus translation"
        );
        self.scale = a;
        self.translation = Vec2::new(e, f);
        self.reposition_corrected();
    }

    /// Returns the current uniform scale.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Returns the current translation (global frame).
    #[must_use]
    pub fn translation(&self) -> Vec2 {
        self.translation
    }

    /// Returns the pan bounds (the visible viewport) in the global frame.
    #[must_use]
    pub fn pan_bounds(&self) -> Rect {
        self.pan_bounds
    }

    /// Sets the pan bounds in the global frame.
    pub fn set_pan_bounds(&mut self, bounds: Rect) {
        debug_assert!(
            is_valid_rect(bounds),
            "pan bounds must be finite and non-empty, got {bounds:?}"
        );
        if self.pan_bounds == bounds {
            return;
        }
        self.pan_bounds = bounds;
        self.reposition_corrected();
    }

    /// Returns the target (content) bounds.
    #[must_use]
    pub fn target_bounds(&self) -> Rect {
        self.target_bounds
    }

    /// Sets the target (content) bounds, laid out under the identity transform.
    pub fn set_target_bounds(&mut self, bounds: Rect) {
        debug_assert!(
            is_valid_rect(bounds),
            "target bounds must be finite and non-empty, got {bounds:?}"
        );
        if self.target_bounds == bounds {
            return;
        }
        self.target_bounds = bounds;
        self.reposition_corrected();
    }

    /// Sets the minimum and maximum scale; the current scale is clamped into
    /// the new range.
    pub fn set_scale_limits(&mut self, min_scale: f64, max_scale: f64) {
        let (min_scale, max_scale) = if min_scale <= max_scale {
            (min_scale, max_scale)
        } else {
            (max_scale, min_scale)
        };
        self.min_scale = min_scale;
        self.max_scale = max_scale;
        self.reposition_corrected();
    }

    /// Returns `(min_scale, max_scale)`.
    #[must_use]
    pub fn scale_limits(&self) -> (f64, f64) {
        (self.min_scale, self.max_scale)
    }

    /// Clamps `scale` into the configured range.
    #[must_use]
    pub fn limit_scale(&self, scale: f64) -> f64 {
        scale.clamp(self.min_scale, self.max_scale)
    }

    /// Sets how far the drag bounds are eroded from the pan bounds.
    pub fn set_drag_bounds_margin(&mut self, margin: f64) {
        self.drag_bounds_margin = margin.max(0.0);
        self.reposition_corrected();
    }

    /// Pan bounds eroded by the drag margin; a dragged pointer outside this
    /// rectangle is close to the viewport edge.
    #[must_use]
    pub fn drag_bounds(&self) -> Rect {
        self.drag_bounds
    }

    /// The pan bounds expressed in the content's local frame.
    #[must_use]
    pub fn transformed_pan_bounds(&self) -> Rect {
        self.transformed_pan_bounds
    }

    /// The live position/scale derived from the applied transform.
    #[must_use]
    pub fn source(&self) -> ViewState {
        self.source
    }

    /// Converts a global point into the content's local frame.
    #[must_use]
    pub fn global_to_local_point(&self, pt: Point) -> Point {
        ((pt.to_vec2() - self.translation) / self.scale).to_point()
    }

    /// Converts a local point into the global frame.
    #[must_use]
    pub fn local_to_global_point(&self, pt: Point) -> Point {
        (pt.to_vec2() * self.scale + self.translation).to_point()
    }

    /// Converts a global rectangle into the content's local frame.
    #[must_use]
    pub fn global_to_local_rect(&self, rect: Rect) -> Rect {
        // Uniform positive scale keeps the rect axis-aligned, so mapping two
        // opposite corners is enough.
        Rect::from_points(
            self.global_to_local_point(Point::new(rect.x0, rect.y0)),
            self.global_to_local_point(Point::new(rect.x1, rect.y1)),
        )
    }

    /// Converts a local rectangle into the global frame.
    #[must_use]
    pub fn local_to_global_rect(&self, rect: Rect) -> Rect {
        Rect::from_points(
            self.local_to_global_point(Point::new(rect.x0, rect.y0)),
            self.local_to_global_point(Point::new(rect.x1, rect.y1)),
        )
    }

    /// Moves the view centre by `delta` in the content's local frame.
    ///
    /// The content itself moves the opposite way.
    pub fn pan_view_by(&mut self, delta: Vec2) {
        if delta == Vec2::ZERO {
            return;
        }
        self.translation -= delta * self.scale;
        self.reposition_corrected();
    }

    /// Translates the content by `delta` in the global frame.
    pub fn translate_global(&mut self, delta: Vec2) {
        if delta == Vec2::ZERO {
            return;
        }
        self.translation += delta;
        self.reposition_corrected();
    }

    /// Changes the scale by `scale_delta` while keeping `global_point` fixed.
    pub fn scale_toward(&mut self, global_point: Point, scale_delta: f64) {
        self.set_absolute_scale_toward(global_point, self.scale + scale_delta);
    }

    /// Sets the scale to `scale` while keeping `global_point` fixed.
    ///
    /// The point's local coordinate is mapped back onto its own global
    /// position under the new scale; any clamping happens afterwards as a
    /// separate correction.
    pub fn set_absolute_scale_toward(&mut self, global_point: Point, scale: f64) {
        let new_scale = self.limit_scale(scale);
        let local = self.global_to_local_point(global_point);
        self.scale = new_scale;
        self.translation = global_point.to_vec2() - local.to_vec2() * new_scale;
        self.reposition_corrected();
    }

    /// Moves the local point under `from` onto `to` while multiplying the
    /// scale by `scale_ratio`.
    pub fn pinch(&mut self, from: Point, to: Point, scale_ratio: f64) {
        let local = self.global_to_local_point(from);
        self.scale = self.limit_scale(self.scale * scale_ratio);
        self.translation = to.to_vec2() - local.to_vec2() * self.scale;
        self.reposition_corrected();
    }

    /// Restores the identity transform.
    pub fn reset_transform(&mut self) {
        self.scale = 1.0;
        self.translation = Vec2::ZERO;
        self.reposition_corrected();
    }

    /// Clamps a destination position so that a pan region of the current
    /// transformed size centred on it stays inside the target bounds.
    #[must_use]
    pub fn valid_destination_position(&self, position: Point) -> Point {
        if !self.has_valid_bounds() {
            return position;
        }
        let half = self.transformed_pan_bounds.size().to_vec2() * 0.5;
        let target = self.target_bounds;
        Point::new(
            clamp_center(position.x, target.x0 + half.x, target.x1 - half.x),
            clamp_center(position.y, target.y0 + half.y, target.y1 - half.y),
        )
    }

    fn reposition_corrected(&mut self) {
        if !self.has_valid_bounds() {
            return;
        }
        self.scale = self.limit_scale(self.scale);

        let content = self.local_to_global_rect(self.target_bounds);
        let pan = self.pan_bounds;
        let correction = Vec2::new(
            cover_correction(content.x0, content.x1, pan.x0, pan.x1),
            cover_correction(content.y0, content.y1, pan.y0, pan.y1),
        );
        self.translation += correction;

        self.transformed_pan_bounds = self.global_to_local_rect(pan);
        let margin = self
            .drag_bounds_margin
            .min(pan.width() * 0.5)
            .min(pan.height() * 0.5);
        self.drag_bounds = pan.inset(-margin);
        self.source = ViewState {
            position: self.transformed_pan_bounds.center(),
            scale: self.scale,
        };
    }
}

/// Returns `true` if `rect` has finite coordinates and positive area.
pub(crate) fn is_valid_rect(rect: Rect) -> bool {
    rect.is_finite() && rect.width() > 0.0 && rect.height() > 0.0
}

/// Returns `true` if `inner` lies entirely inside `outer`.
pub(crate) fn rect_contains(outer: Rect, inner: Rect) -> bool {
    inner.x0 >= outer.x0 && inner.x1 <= outer.x1 && inner.y0 >= outer.y0 && inner.y1 <= outer.y1
}

// Shift needed along one axis so that `[content_min, content_max]` covers
// `[pan_min, pan_max]`; content narrower than the pan span is centred.
fn cover_correction(content_min: f64, content_max: f64, pan_min: f64, pan_max: f64) -> f64 {
    if content_max - content_min < pan_max - pan_min {
        (pan_min + pan_max) * 0.5 - (content_min + content_max) * 0.5
    } else if content_min > pan_min {
        pan_min - content_min
    } else if content_max < pan_max {
        pan_max - content_max
    } else {
        0.0
    }
}

fn clamp_center(value: f64, min: f64, max: f64) -> f64 {
    if min > max {
        (min + max) * 0.5
    } else {
        value.clamp(min, max)
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Affine, Point, Rect, Vec2};

    use super::PanZoomCore;

    fn core() -> PanZoomCore {
        PanZoomCore::new(
            Rect::new(0.0, 0.0, 800.0, 600.0),
            Rect::new(0.0, 0.0, 800.0, 600.0),
            1.0,
            4.0,
        )
    }

    fn close(a: Point, b: Point) -> bool {
        (a - b).length() < 1e-9
    }

    #[test]
    fn identity_source_is_pan_center() {
        let core = core();
        assert_eq!(core.source().position, Point::new(400.0, 300.0));
        assert_eq!(core.source().scale, 1.0);
        assert_eq!(core.transformed_pan_bounds(), core.pan_bounds());
    }

    #[test]
    fn scale_toward_keeps_point_local_coordinate() {
        let mut core = core();
        let p = Point::new(200.0, 150.0);
        let before = core.global_to_local_point(p);
        core.scale_toward(p, 0.75);
        let after = core.global_to_local_point(p);
        assert!(close(before, after), "{before:?} vs {after:?}");
        assert_eq!(core.scale(), 1.75);
    }

    #[test]
    fn scale_is_clamped_to_limits() {
        let mut core = core();
        core.scale_toward(Point::new(400.0, 300.0), 10.0);
        assert_eq!(core.scale(), 4.0);
        core.set_absolute_scale_toward(Point::new(400.0, 300.0), 0.1);
        assert_eq!(core.scale(), 1.0);
    }

    #[test]
    fn panning_is_clamped_to_cover_pan_bounds() {
        let mut core = core();
        core.set_absolute_scale_toward(Point::new(400.0, 300.0), 2.0);
        core.pan_view_by(Vec2::new(10_000.0, -10_000.0));
        let content = core.local_to_global_rect(core.target_bounds());
        let pan = core.pan_bounds();
        assert!(content.x0 <= pan.x0 + 1e-9 && content.x1 >= pan.x1 - 1e-9);
        assert!(content.y0 <= pan.y0 + 1e-9 && content.y1 >= pan.y1 - 1e-9);
        // Pinned against the right/top edges.
        assert!((core.transformed_pan_bounds().x1 - 800.0).abs() < 1e-9);
        assert!(core.transformed_pan_bounds().y0.abs() < 1e-9);
    }

    #[test]
    fn external_transform_is_resynced() {
        let mut core = core();
        core.set_transform(Affine::translate((-400.0, -300.0)) * Affine::scale(2.0));
        assert_eq!(core.scale(), 2.0);
        assert!(close(core.source().position, Point::new(400.0, 300.0)));
        assert_eq!(
            core.transformed_pan_bounds(),
            Rect::new(200.0, 150.0, 600.0, 450.0)
        );
    }

    #[test]
    fn valid_destination_keeps_view_inside_target() {
        let mut core = core();
        core.set_absolute_scale_toward(Point::new(400.0, 300.0), 2.0);
        let p = core.valid_destination_position(Point::new(-50.0, 1_000.0));
        assert_eq!(p, Point::new(200.0, 450.0));
    }

    #[test]
    fn drag_bounds_are_eroded_pan_bounds() {
        let mut core = core();
        core.set_drag_bounds_margin(50.0);
        assert_eq!(core.drag_bounds(), Rect::new(50.0, 50.0, 750.0, 550.0));
    }

    #[test]
    fn invalid_bounds_leave_transform_untouched() {
        let mut core = PanZoomCore::new(Rect::ZERO, Rect::ZERO, 1.0, 4.0);
        assert!(!core.has_valid_bounds());
        core.pan_view_by(Vec2::new(5.0, 5.0));
        assert_eq!(core.translation(), Vec2::new(-5.0, -5.0));
    }
}
