// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer input and background presses that drive the transform directly.
//!
//! A press is a touch, pen, or primary-mouse pointer that went down on the
//! pannable background without drag intent. While presses are active they
//! move the content themselves and the animation driver stands back.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::{Point, Vec2};
//! use understory_pan_zoom::{MultiPress, PointerId, PressEdit, PressTracker};
//!
//! let mut presses = MultiPress::default();
//! assert!(presses.press(PointerId(1), Point::new(10.0, 20.0)));
//!
//! // One press pans by the pointer delta.
//! let edit = presses.moved(PointerId(1), Point::new(15.0, 25.0));
//! assert_eq!(edit, Some(PressEdit::Translate(Vec2::new(5.0, 5.0))));
//!
//! presses.release(PointerId(1));
//! assert_eq!(presses.press_count(), 0);
//! ```

use kurbo::{Point, Vec2};
use smallvec::SmallVec;

/// Identifier of a pointer (mouse, touch contact, or pen).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointerId(pub u64);

/// Kind of device behind a pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerKind {
    /// A mouse.
    Mouse,
    /// A touch contact.
    Touch,
    /// A pen or stylus.
    Pen,
}

/// Mouse button associated with a pointer event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    /// Left/primary button.
    Primary,
    /// Middle button (wheel click).
    Middle,
    /// Right/secondary button.
    Secondary,
}

/// A pointer down/move/up/cancel event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    /// Which pointer this event belongs to.
    pub pointer: PointerId,
    /// Device kind.
    pub kind: PointerKind,
    /// Button that changed state, for mouse down/up.
    pub button: Option<PointerButton>,
    /// Pointer location in the global frame.
    pub point: Point,
    /// The pointer is meant to drag content rather than pan the view.
    pub drag_intent: bool,
}

impl PointerEvent {
    /// A mouse event.
    #[must_use]
    pub fn mouse(pointer: PointerId, button: Option<PointerButton>, point: Point) -> Self {
        Self {
            pointer,
            kind: PointerKind::Mouse,
            button,
            point,
            drag_intent: false,
        }
    }

    /// A touch event.
    #[must_use]
    pub fn touch(pointer: PointerId, point: Point) -> Self {
        Self {
            pointer,
            kind: PointerKind::Touch,
            button: None,
            point,
            drag_intent: false,
        }
    }

    /// Returns the event marked with drag intent.
    #[must_use]
    pub fn with_drag_intent(mut self) -> Self {
        self.drag_intent = true;
        self
    }

    /// Returns `true` for a mouse middle-button event.
    #[must_use]
    pub fn is_middle_mouse(&self) -> bool {
        self.kind == PointerKind::Mouse && self.button == Some(PointerButton::Middle)
    }

    /// Returns `true` for events that can start a background press.
    #[must_use]
    pub fn is_primary(&self) -> bool {
        match self.kind {
            PointerKind::Touch | PointerKind::Pen => true,
            PointerKind::Mouse => self.button == Some(PointerButton::Primary),
        }
    }
}

/// A direct transform edit requested by active presses.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PressEdit {
    /// Translate the content by a global delta.
    Translate(Vec2),
    /// Move the content point under `from` onto `to` while multiplying the
    /// scale by `scale_ratio`.
    Pinch {
        /// Previous midpoint of the two presses.
        from: Point,
        /// Current midpoint of the two presses.
        to: Point,
        /// Ratio of current to previous press spacing.
        scale_ratio: f64,
    },
}

/// Tracks background presses for a [`PanZoomController`](crate::PanZoomController).
///
/// Implementations decide which pointers they take and how pointer motion
/// maps onto transform edits; the controller applies the edits and keeps its
/// animation targets in sync.
pub trait PressTracker {
    /// Offers a new press. Returns `true` if the tracker took it.
    fn press(&mut self, pointer: PointerId, point: Point) -> bool;

    /// Reports pointer motion, returning the edit to apply, if any.
    fn moved(&mut self, pointer: PointerId, point: Point) -> Option<PressEdit>;

    /// Releases a press. Returns `true` if the pointer was tracked.
    fn release(&mut self, pointer: PointerId) -> bool;

    /// Drops every press.
    fn clear(&mut self);

    /// Number of active presses.
    fn press_count(&self) -> usize;
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Press {
    pointer: PointerId,
    last_point: Point,
}

/// Default [`PressTracker`]: one press pans, two presses pinch.
///
/// Further presses beyond the second are ignored.
#[derive(Clone, Debug, Default)]
pub struct MultiPress {
    presses: SmallVec<[Press; 2]>,
}

impl PressTracker for MultiPress {
    fn press(&mut self, pointer: PointerId, point: Point) -> bool {
        if self.presses.len() >= 2 || self.presses.iter().any(|p| p.pointer == pointer) {
            return false;
        }
        self.presses.push(Press {
            pointer,
            last_point: point,
        });
        true
    }

    fn moved(&mut self, pointer: PointerId, point: Point) -> Option<PressEdit> {
        let index = self.presses.iter().position(|p| p.pointer == pointer)?;
        match self.presses.len() {
            1 => {
                let delta = point - self.presses[0].last_point;
                self.presses[0].last_point = point;
                (delta != Vec2::ZERO).then_some(PressEdit::Translate(delta))
            }
            _ => {
                let old_a = self.presses[0].last_point;
                let old_b = self.presses[1].last_point;
                self.presses[index].last_point = point;
                let new_a = self.presses[0].last_point;
                let new_b = self.presses[1].last_point;

                let old_spacing = old_a.distance(old_b);
                let scale_ratio = if old_spacing > 0.0 {
                    new_a.distance(new_b) / old_spacing
                } else {
                    1.0
                };
                Some(PressEdit::Pinch {
                    from: old_a.midpoint(old_b),
                    to: new_a.midpoint(new_b),
                    scale_ratio,
                })
            }
        }
    }

    fn release(&mut self, pointer: PointerId) -> bool {
        let before = self.presses.len();
        self.presses.retain(|p| p.pointer != pointer);
        self.presses.len() != before
    }

    fn clear(&mut self) {
        self.presses.clear();
    }

    fn press_count(&self) -> usize {
        self.presses.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_tracker_has_no_presses() {
        let presses = MultiPress::default();
        assert_eq!(presses.press_count(), 0);
    }

    #[test]
    fn single_press_reports_incremental_translation() {
        let mut presses = MultiPress::default();
        presses.press(PointerId(1), Point::new(0.0, 0.0));

        assert_eq!(
            presses.moved(PointerId(1), Point::new(5.0, 3.0)),
            Some(PressEdit::Translate(Vec2::new(5.0, 3.0)))
        );
        assert_eq!(
            presses.moved(PointerId(1), Point::new(8.0, 7.0)),
            Some(PressEdit::Translate(Vec2::new(3.0, 4.0)))
        );
    }

    #[test]
    fn zero_movement_is_not_an_edit() {
        let mut presses = MultiPress::default();
        presses.press(PointerId(1), Point::new(50.0, 50.0));
        assert_eq!(presses.moved(PointerId(1), Point::new(50.0, 50.0)), None);
    }

    #[test]
    fn untracked_pointer_is_ignored() {
        let mut presses = MultiPress::default();
        assert_eq!(presses.moved(PointerId(9), Point::new(1.0, 1.0)), None);
        assert!(!presses.release(PointerId(9)));
    }

    #[test]
    fn two_presses_pinch_about_midpoint() {
        let mut presses = MultiPress::default();
        presses.press(PointerId(1), Point::new(0.0, 0.0));
        presses.press(PointerId(2), Point::new(100.0, 0.0));

        let edit = presses.moved(PointerId(2), Point::new(200.0, 0.0));
        assert_eq!(
            edit,
            Some(PressEdit::Pinch {
                from: Point::new(50.0, 0.0),
                to: Point::new(100.0, 0.0),
                scale_ratio: 2.0,
            })
        );
    }

    #[test]
    fn third_press_and_duplicates_are_rejected() {
        let mut presses = MultiPress::default();
        assert!(presses.press(PointerId(1), Point::ZERO));
        assert!(!presses.press(PointerId(1), Point::ZERO));
        assert!(presses.press(PointerId(2), Point::ZERO));
        assert!(!presses.press(PointerId(3), Point::ZERO));
        assert_eq!(presses.press_count(), 2);

        presses.clear();
        assert_eq!(presses.press_count(), 0);
    }

    #[test]
    fn primary_classification() {
        let p = Point::ZERO;
        assert!(PointerEvent::touch(PointerId(1), p).is_primary());
        assert!(PointerEvent::mouse(PointerId(1), Some(PointerButton::Primary), p).is_primary());
        let middle = PointerEvent::mouse(PointerId(1), Some(PointerButton::Middle), p);
        assert!(!middle.is_primary());
        assert!(middle.is_middle_mouse());
    }
}
