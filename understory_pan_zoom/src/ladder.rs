// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Discrete zoom levels for stepped (keyboard) zooming.

/// Number of rungs in a [`ScaleLadder`].
pub const LADDER_STEPS: usize = 8;

/// Precomputed table of zoom levels used by keyboard zoom commands.
///
/// Rungs are spaced quadratically: low zoom levels are close together and
/// each step further in jumps further, similar to browser zoom. The first
/// rung is exactly `min_scale` and the last is exactly `max_scale`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleLadder {
    steps: [f64; LADDER_STEPS],
}

impl ScaleLadder {
    /// Builds the ladder for the given zoom limits.
    #[must_use]
    pub fn new(min_scale: f64, max_scale: f64) -> Self {
        let span = max_scale - min_scale;
        let step_size = span / LADDER_STEPS as f64;

        let mut steps = [0.0; LADDER_STEPS];
        for (i, step) in steps.iter_mut().enumerate() {
            let i = i as f64;
            *step = step_size * i * i;
        }

        // Renormalize so the ladder runs from `min_scale` to `max_scale`.
        let last = steps[LADDER_STEPS - 1];
        for step in &mut steps {
            *step = if last > 0.0 {
                min_scale + *step / last * span
            } else {
                min_scale
            };
        }
        steps[LADDER_STEPS - 1] = max_scale;

        Self { steps }
    }

    /// Returns the rungs in increasing order.
    #[must_use]
    pub fn steps(&self) -> &[f64; LADDER_STEPS] {
        &self.steps
    }

    /// Returns the index of the rung nearest `scale`; ties resolve to the
    /// lower index.
    #[must_use]
    pub fn nearest_index(&self, scale: f64) -> usize {
        let mut best = 0;
        let mut best_distance = f64::INFINITY;
        for (i, step) in self.steps.iter().enumerate() {
            let distance = (step - scale).abs();
            if distance < best_distance {
                best = i;
                best_distance = distance;
            }
        }
        best
    }

    /// Returns the rung one step in (or out) from the one nearest `scale`,
    /// clamping at either end of the ladder.
    #[must_use]
    pub fn next(&self, scale: f64, zoom_in: bool) -> f64 {
        let index = self.nearest_index(scale);
        let next = if zoom_in {
            (index + 1).min(LADDER_STEPS - 1)
        } else {
            index.saturating_sub(1)
        };
        self.steps[next]
    }
}

#[cfg(test)]
mod tests {
    use super::{LADDER_STEPS, ScaleLadder};

    #[test]
    fn ladder_spans_limits_with_accelerating_spacing() {
        let ladder = ScaleLadder::new(1.0, 4.0);
        let steps = ladder.steps();
        assert_eq!(steps[0], 1.0);
        assert_eq!(steps[LADDER_STEPS - 1], 4.0);
        for pair in steps.windows(3) {
            assert!(pair[1] > pair[0]);
            assert!(pair[2] - pair[1] > pair[1] - pair[0]);
        }
        assert!((steps[1] - (1.0 + 3.0 / 49.0)).abs() < 1e-12);
    }

    #[test]
    fn zoom_in_from_min_returns_second_rung() {
        let ladder = ScaleLadder::new(1.0, 4.0);
        assert_eq!(ladder.next(1.0, true), ladder.steps()[1]);
    }

    #[test]
    fn interior_rungs_round_trip() {
        let ladder = ScaleLadder::new(1.0, 4.0);
        for i in 1..LADDER_STEPS - 1 {
            let start = ladder.steps()[i];
            let up = ladder.next(start, true);
            assert_eq!(ladder.next(up, false), start);
        }
    }

    #[test]
    fn ends_clamp_instead_of_wrapping() {
        let ladder = ScaleLadder::new(1.0, 4.0);
        assert_eq!(ladder.next(4.0, true), 4.0);
        assert_eq!(ladder.next(1.0, false), 1.0);
        assert_eq!(ladder.next(100.0, true), 4.0);
    }

    #[test]
    fn degenerate_range_is_flat() {
        let ladder = ScaleLadder::new(2.0, 2.0);
        assert!(ladder.steps().iter().all(|&s| s == 2.0));
        assert_eq!(ladder.next(2.0, true), 2.0);
    }

    #[test]
    fn nearest_index_prefers_first_on_tie() {
        let ladder = ScaleLadder::new(2.0, 2.0);
        assert_eq!(ladder.nearest_index(2.0), 0);
    }
}
