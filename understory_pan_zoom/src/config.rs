// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Tunables for a [`PanZoomController`](crate::PanZoomController).
///
/// All distances are in global (device) units unless noted otherwise. The
/// defaults match a typical pointer-driven canvas where the content starts at
/// `1.0` scale and the user may zoom in up to five times.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanZoomConfig {
    /// Smallest allowed uniform scale.
    pub min_scale: f64,
    /// Largest allowed uniform scale.
    pub max_scale: f64,
    /// Factor applied to wheel and key translation magnitudes and to the
    /// middle-press autoscroll velocity limit.
    pub target_scale: f64,
    /// Length of the translation vector produced by one arrow-key press.
    pub key_translation_magnitude: f64,
    /// Multiplier applied to wheel deltas reported in lines or pages.
    pub wheel_line_multiplier: f64,
    /// Upper bound on the middle-press autoscroll velocity.
    pub max_scroll_velocity: f64,
    /// Upper bound on the eased translation speed at scale `1.0`.
    pub max_translation_speed: f64,
    /// Margin kept between a followed region and the viewport edge.
    pub keep_in_view_padding: f64,
    /// Erosion of the pan bounds used to decide when a dragged pointer is
    /// close enough to the edge to trigger an immediate follow.
    pub drag_bounds_margin: f64,
    /// Fraction of the remaining scale gap closed per second.
    pub scale_convergence_rate: f64,
}

impl Default for PanZoomConfig {
    fn default() -> Self {
        Self {
            min_scale: 1.0,
            max_scale: 5.0,
            target_scale: 1.0,
            key_translation_magnitude: 80.0,
            wheel_line_multiplier: 25.0,
            max_scroll_velocity: 150.0,
            max_translation_speed: 1000.0,
            keep_in_view_padding: 150.0,
            drag_bounds_margin: 50.0,
            scale_convergence_rate: 6.0,
        }
    }
}

impl PanZoomConfig {
    /// Returns a config with the given zoom limits and defaults elsewhere.
    #[must_use]
    pub fn with_scale_limits(min_scale: f64, max_scale: f64) -> Self {
        let mut config = Self::default();
        config.set_scale_limits(min_scale, max_scale);
        config
    }

    /// Sets the zoom limits, normalized so that `min_scale <= max_scale`.
    pub fn set_scale_limits(&mut self, min_scale: f64, max_scale: f64) {
        debug_assert!(
            min_scale.is_finite() && max_scale.is_finite() && min_scale > 0.0 && max_scale > 0.0,
            "scale limits must be finite and positive"
        );
        let (min_scale, max_scale) = if min_scale <= max_scale {
            (min_scale, max_scale)
        } else {
            (max_scale, min_scale)
        };
        self.min_scale = min_scale;
        self.max_scale = max_scale;
    }
}
