// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame easing of the live view state towards its destination.

use kurbo::{Point, Vec2};

use crate::config::PanZoomConfig;
use crate::view_core::{PanZoomCore, ViewState};

/// Position gap (local units) below which translation is considered settled.
pub(crate) const POSITION_EPSILON: f64 = 0.1;
/// Scale gap below which scale is considered settled.
pub(crate) const SCALE_EPSILON: f64 = 0.001;
/// Knee of the translation ease-out curve, in global units.
const EASE_KNEE: f64 = 5.0;

/// Eased translation speed for a remaining gap of `scaled_distance` global
/// units, clamped to `[0, max_speed]`.
///
/// The curve is `x·(k + 1/(x² + k²))`: roughly proportional to the gap, so
/// motion decays geometrically, and strictly positive for any non-zero gap.
#[must_use]
pub fn translation_speed(scaled_distance: f64, max_speed: f64) -> f64 {
    let x = scaled_distance;
    let speed = x * (EASE_KNEE + 1.0 / (x * x + EASE_KNEE * EASE_KNEE));
    speed.clamp(0.0, max_speed.max(0.0))
}

/// Destination state and the zoom anchor it is being approached with.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Animator {
    pub(crate) destination: ViewState,
    pub(crate) scale_anchor: Option<Point>,
}

impl Animator {
    pub(crate) fn new(core: &PanZoomCore) -> Self {
        Self {
            destination: core.source(),
            scale_anchor: None,
        }
    }

    pub(crate) fn set_destination_position(&mut self, core: &PanZoomCore, position: Point) {
        self.destination.position = core.valid_destination_position(position);
    }

    pub(crate) fn set_destination_scale(&mut self, core: &PanZoomCore, scale: f64) {
        self.destination.scale = core.limit_scale(scale);
    }

    /// Discards any in-flight animation.
    pub(crate) fn snap_to_source(&mut self, core: &PanZoomCore) {
        self.destination = core.source();
    }

    pub(crate) fn position_dirty(&self, core: &PanZoomCore) -> bool {
        (self.destination.position - core.source().position).length() > POSITION_EPSILON
    }

    pub(crate) fn scale_dirty(&self, core: &PanZoomCore) -> bool {
        (self.destination.scale - core.source().scale).abs() > SCALE_EPSILON
    }

    /// Moves the core one frame of `dt` seconds towards the destination.
    pub(crate) fn animate(&mut self, core: &mut PanZoomCore, dt: f64, config: &PanZoomConfig) {
        let position_dirty = self.position_dirty(core);
        let scale_dirty = self.scale_dirty(core);

        if position_dirty {
            let source = core.source();
            let delta = self.destination.position - source.position;
            let distance = delta.length();
            let direction = if distance > 0.0 {
                delta / distance
            } else {
                Vec2::ZERO
            };
            let speed = translation_speed(
                distance * source.scale,
                config.max_translation_speed * source.scale,
            );
            let mut step = direction * speed * dt;
            if step.length() > distance {
                step = delta;
            }
            tracing::trace!(?step, distance, "pan/zoom translation step");
            core.pan_view_by(step);
        }

        let anchor = self
            .scale_anchor
            .unwrap_or_else(|| core.pan_bounds().center());
        if scale_dirty {
            let gap = self.destination.scale - core.scale();
            let mut scale_step = gap * dt * config.scale_convergence_rate;
            if scale_step.abs() > gap.abs() {
                scale_step = gap;
            }
            tracing::trace!(scale_step, "pan/zoom scale step");
            core.scale_toward(anchor, scale_step);
            self.destination.position = core.source().position;
        } else if core.scale() != self.destination.scale {
            // Within tolerance; land exactly instead of micro-stepping.
            core.set_absolute_scale_toward(anchor, self.destination.scale);
            self.destination.position = core.source().position;
            self.scale_anchor = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Rect};

    use super::{Animator, POSITION_EPSILON, translation_speed};
    use crate::config::PanZoomConfig;
    use crate::view_core::PanZoomCore;

    fn zoomed_core() -> PanZoomCore {
        let mut core = PanZoomCore::new(
            Rect::new(0.0, 0.0, 800.0, 600.0),
            Rect::new(0.0, 0.0, 800.0, 600.0),
            1.0,
            4.0,
        );
        core.set_absolute_scale_toward(Point::new(400.0, 300.0), 2.0);
        core
    }

    #[test]
    fn speed_is_positive_monotonic_and_clamped() {
        assert_eq!(translation_speed(0.0, 1000.0), 0.0);
        let mut last = 0.0;
        for i in 1..200 {
            let x = f64::from(i) * 0.05;
            let s = translation_speed(x, 1000.0);
            assert!(s > last, "speed must grow with distance at x = {x}");
            last = s;
        }
        assert_eq!(translation_speed(1.0e6, 1000.0), 1000.0);
    }

    #[test]
    fn translation_converges_without_overshoot() {
        let config = PanZoomConfig::with_scale_limits(1.0, 4.0);
        let mut core = zoomed_core();
        let mut animator = Animator::new(&core);
        animator.set_destination_position(&core, Point::new(550.0, 400.0));
        let target = animator.destination.position;
        let start_gap = (target - core.source().position).length();

        let mut frames = 0;
        let mut last_gap = start_gap;
        while animator.position_dirty(&core) {
            animator.animate(&mut core, 1.0 / 60.0, &config);
            let gap = (target - core.source().position).length();
            assert!(gap <= last_gap + 1e-9, "gap grew from {last_gap} to {gap}");
            last_gap = gap;
            frames += 1;
            assert!(frames < 10_000, "translation failed to converge");
        }
        assert!(last_gap <= POSITION_EPSILON);
    }

    #[test]
    fn large_dt_lands_exactly() {
        let config = PanZoomConfig::with_scale_limits(1.0, 4.0);
        let mut core = zoomed_core();
        let mut animator = Animator::new(&core);
        animator.set_destination_position(&core, Point::new(300.0, 200.0));
        animator.animate(&mut core, 10.0, &config);
        assert!((core.source().position - Point::new(300.0, 200.0)).length() < 1e-9);
    }

    #[test]
    fn scale_converges_and_snaps_exactly() {
        let config = PanZoomConfig::with_scale_limits(1.0, 4.0);
        let mut core = zoomed_core();
        let mut animator = Animator::new(&core);
        animator.scale_anchor = Some(Point::new(400.0, 300.0));
        animator.set_destination_scale(&core, 3.0);

        for _ in 0..2_000 {
            animator.animate(&mut core, 1.0 / 60.0, &config);
            assert!(core.scale() <= 3.0);
        }
        assert_eq!(core.scale(), 3.0);
        assert_eq!(animator.scale_anchor, None);
        assert_eq!(animator.destination.position, core.source().position);
    }
}
