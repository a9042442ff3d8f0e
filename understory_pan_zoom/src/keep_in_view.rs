// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Rect, Vec2};

/// A single axis along which following may be restricted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Only pan left/right.
    Horizontal,
    /// Only pan up/down.
    Vertical,
}

impl Axis {
    fn allows_x(restriction: Option<Self>) -> bool {
        restriction != Some(Self::Vertical)
    }

    fn allows_y(restriction: Option<Self>) -> bool {
        restriction != Some(Self::Horizontal)
    }
}

/// Computes how far the view centre must move to bring `region` into view.
///
/// Both rectangles are in the content's local frame. The result is a delta
/// for the view position (not for the content), so adding it to the current
/// view centre yields the new desired centre.
///
/// - With `recenter`, the region's centre is moved onto the view's centre.
/// - Otherwise a region is only chased along an axis where it already fits
///   inside `pan`; an oversized region is left alone on that axis. `padding`
///   starts the correction slightly before the region reaches the edge.
/// - `axis` zeroes the correction on the other axis.
#[must_use]
pub fn keep_in_view_translation(
    region: Rect,
    pan: Rect,
    padding: f64,
    recenter: bool,
    axis: Option<Axis>,
) -> Vec2 {
    let x = if Axis::allows_x(axis) {
        axis_translation(
            (region.x0, region.x1),
            (pan.x0, pan.x1),
            padding,
            recenter,
        )
    } else {
        0.0
    };
    let y = if Axis::allows_y(axis) {
        axis_translation(
            (region.y0, region.y1),
            (pan.y0, pan.y1),
            padding,
            recenter,
        )
    } else {
        0.0
    };
    Vec2::new(x, y)
}

fn axis_translation(
    (region_min, region_max): (f64, f64),
    (pan_min, pan_max): (f64, f64),
    padding: f64,
    recenter: bool,
) -> f64 {
    let (near, far) = if recenter {
        let center = (pan_min + pan_max) * 0.5 - (region_min + region_max) * 0.5;
        (center, center)
    } else if region_max - region_min < pan_max - pan_min {
        (
            pan_min - region_min + padding,
            pan_max - region_max - padding,
        )
    } else {
        (0.0, 0.0)
    };

    let mut translation = 0.0;
    // Escaping past the far edge: move the view towards it.
    if far < 0.0 {
        translation = -far;
    }
    // Escaping past the near edge wins if both apply.
    if near > 0.0 {
        translation = -near;
    }
    translation
}

#[cfg(test)]
mod tests {
    use kurbo::{Rect, Vec2};

    use super::{Axis, keep_in_view_translation};

    const PAN: Rect = Rect::new(0.0, 0.0, 400.0, 300.0);

    #[test]
    fn region_well_inside_needs_no_correction() {
        let region = Rect::new(180.0, 130.0, 220.0, 170.0);
        assert_eq!(
            keep_in_view_translation(region, PAN, 20.0, false, None),
            Vec2::ZERO
        );
    }

    #[test]
    fn region_near_right_edge_pulls_view_right() {
        let region = Rect::new(370.0, 130.0, 390.0, 170.0);
        let t = keep_in_view_translation(region, PAN, 20.0, false, None);
        assert_eq!(t, Vec2::new(10.0, 0.0));
    }

    #[test]
    fn region_past_top_edge_pulls_view_up() {
        let region = Rect::new(180.0, -40.0, 220.0, -10.0);
        let t = keep_in_view_translation(region, PAN, 20.0, false, None);
        assert_eq!(t, Vec2::new(0.0, -60.0));
    }

    #[test]
    fn oversized_region_is_not_chased() {
        let region = Rect::new(-100.0, 130.0, 500.0, 170.0);
        let t = keep_in_view_translation(region, PAN, 0.0, false, None);
        assert_eq!(t.x, 0.0);
    }

    #[test]
    fn recenter_moves_centers_together() {
        let region = Rect::new(500.0, 400.0, 520.0, 420.0);
        let t = keep_in_view_translation(region, PAN, 20.0, true, None);
        assert_eq!(t, Vec2::new(310.0, 260.0));
    }

    #[test]
    fn axis_restriction_zeroes_other_axis() {
        let region = Rect::new(500.0, 400.0, 520.0, 420.0);
        let horizontal = keep_in_view_translation(region, PAN, 20.0, true, Some(Axis::Horizontal));
        assert_eq!(horizontal, Vec2::new(310.0, 0.0));
        let vertical = keep_in_view_translation(region, PAN, 20.0, true, Some(Axis::Vertical));
        assert_eq!(vertical, Vec2::new(0.0, 260.0));
    }
}
