// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture normalizers: raw platform input → canonical gesture records.
//!
//! Each normalizer is a plain value computed from one raw event (plus the
//! controller's tunables). The controller decides what to do with it.

use kurbo::{Point, Vec2};

use crate::follow::{FocusRegister, SceneGeometry};
use crate::presses::PointerId;

/// Fraction of the raw wheel delta used as translation.
const WHEEL_TRANSLATION_FACTOR: f64 = 0.5;
/// Scale change requested by one ctrl-wheel notch.
const WHEEL_SCALE_DELTA: f64 = 0.5;
/// Pointer offset (in global units) corresponding to one unit of middle-press
/// autoscroll velocity.
const MIDDLE_PRESS_DISTANCE_DIVISOR: f64 = 100.0;

/// Units in which a wheel event reports its delta.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeltaMode {
    /// Delta is in pixels.
    #[default]
    Pixel,
    /// Delta is in lines.
    Line,
    /// Delta is in pages.
    Page,
}

/// A raw wheel event.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WheelEvent {
    /// Raw scroll delta.
    pub delta: Vec2,
    /// Units of `delta`.
    pub delta_mode: DeltaMode,
    /// Pointer location in the global frame.
    pub point: Point,
    /// Whether a ctrl key was held (also set by browsers for trackpad pinch).
    pub ctrl_key: bool,
    /// Whether a shift key was held.
    pub shift_key: bool,
}

/// Canonical wheel gesture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WheelGesture {
    /// The wheel is requesting a zoom rather than a pan.
    pub is_ctrl_key_down: bool,
    /// `+0.5` to zoom in, `-0.5` to zoom out, `0.0` for no vertical delta.
    pub scale_delta: f64,
    /// Point that should stay fixed while zooming.
    pub target_point: Point,
    /// Translation requested when not zooming, in global units.
    pub translation_vector: Vec2,
}

impl WheelGesture {
    /// Normalizes a raw wheel event.
    #[must_use]
    pub fn new(event: &WheelEvent, target_scale: f64, line_multiplier: f64) -> Self {
        debug_assert!(
            event.delta.is_finite() && event.point.is_finite(),
            "wheel event carries non-finite data"
        );
        let scale_delta = if event.delta.y > 0.0 {
            -WHEEL_SCALE_DELTA
        } else if event.delta.y < 0.0 {
            WHEEL_SCALE_DELTA
        } else {
            0.0
        };

        let mut translation = event.delta * WHEEL_TRANSLATION_FACTOR * target_scale;
        if event.delta_mode != DeltaMode::Pixel {
            translation *= line_multiplier;
        }
        if event.shift_key {
            translation = Vec2::new(translation.y, -translation.x);
        }

        Self {
            is_ctrl_key_down: event.ctrl_key,
            scale_delta,
            target_point: event.point,
            translation_vector: translation,
        }
    }
}

/// Keys the controller reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Left arrow.
    ArrowLeft,
    /// Right arrow.
    ArrowRight,
    /// Up arrow.
    ArrowUp,
    /// Down arrow.
    ArrowDown,
    /// `=` key.
    Equal,
    /// `+` key (including the numpad plus).
    Plus,
    /// `-` key (including the numpad minus).
    Minus,
    /// `0` key.
    Digit0,
    /// Any other key.
    Other,
}

impl Key {
    /// Returns `true` for the four arrow keys.
    #[must_use]
    pub fn is_arrow(self) -> bool {
        matches!(
            self,
            Self::ArrowLeft | Self::ArrowRight | Self::ArrowUp | Self::ArrowDown
        )
    }
}

/// Live query for which keys are currently held.
pub trait KeyState {
    /// Returns `true` while `key` is held down.
    fn is_key_down(&self, key: Key) -> bool;
}

impl KeyState for [Key] {
    fn is_key_down(&self, key: Key) -> bool {
        self.contains(&key)
    }
}

/// A raw key-down event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key that went down.
    pub key: Key,
    /// Whether a ctrl key was held.
    pub ctrl_key: bool,
    /// Whether a meta (command) key was held.
    pub meta_key: bool,
    /// Whether a shift key was held.
    pub shift_key: bool,
    /// Whether an alt key was held.
    pub alt_key: bool,
    /// Whether the event was dispatched inside the accessible subtree.
    ///
    /// Such events reach [`keydown`](crate::PanZoomController::keydown); the
    /// window-level fallback ignores them to avoid handling them twice.
    pub in_accessible_subtree: bool,
}

impl KeyEvent {
    /// A key-down with no modifiers, dispatched inside the accessible subtree.
    #[must_use]
    pub fn new(key: Key) -> Self {
        Self {
            key,
            ctrl_key: false,
            meta_key: false,
            shift_key: false,
            alt_key: false,
            in_accessible_subtree: true,
        }
    }

    /// Returns the event with the ctrl key held.
    #[must_use]
    pub fn with_ctrl(mut self) -> Self {
        self.ctrl_key = true;
        self
    }

    /// Returns `true` if any modifier key is held.
    #[must_use]
    pub fn has_modifier(&self) -> bool {
        self.ctrl_key || self.meta_key || self.shift_key || self.alt_key
    }

    /// Interprets the event as a zoom command, if it is one.
    #[must_use]
    pub fn zoom_command(&self) -> Option<ZoomCommand> {
        if !(self.ctrl_key || self.meta_key) {
            return None;
        }
        match self.key {
            Key::Equal | Key::Plus => Some(ZoomCommand::In),
            Key::Minus => Some(ZoomCommand::Out),
            Key::Digit0 => Some(ZoomCommand::Reset),
            _ => None,
        }
    }
}

/// A keyboard zoom command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoomCommand {
    /// Step one rung in on the discrete scale ladder.
    In,
    /// Step one rung out on the discrete scale ladder.
    Out,
    /// Restore the identity transform.
    Reset,
}

/// Canonical keyboard gesture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeyGesture {
    /// Translation requested by the held arrow keys, in global units.
    pub translation_vector: Vec2,
    /// Scale requested by the key press.
    pub scale: f64,
}

impl KeyGesture {
    /// Builds a gesture from the live arrow-key state and a requested scale.
    #[must_use]
    pub fn new<S: KeyState + ?Sized>(
        keys: &S,
        scale: f64,
        target_scale: f64,
        magnitude: f64,
    ) -> Self {
        let axis = |negative: Key, positive: Key| {
            let mut direction = 0.0;
            if keys.is_key_down(negative) {
                direction -= 1.0;
            }
            if keys.is_key_down(positive) {
                direction += 1.0;
            }
            direction
        };
        let direction = Vec2::new(
            axis(Key::ArrowLeft, Key::ArrowRight),
            axis(Key::ArrowUp, Key::ArrowDown),
        );
        let translation_vector = if direction == Vec2::ZERO {
            Vec2::ZERO
        } else {
            direction.normalize() * magnitude * target_scale
        };
        Self {
            translation_vector,
            scale,
        }
    }

    /// Point that should stay fixed while a keyboard zoom animates.
    ///
    /// Uses the centre of the focused node if it has finite bounds, then the
    /// centre of the first focusable node, then the origin.
    #[must_use]
    pub fn scale_anchor<K, F, G>(focus: &F, geometry: &G) -> Point
    where
        F: FocusRegister<K> + ?Sized,
        G: SceneGeometry<K> + ?Sized,
    {
        let center = |node: Option<K>| {
            node.and_then(|node| geometry.visible_bounds(&node))
                .filter(|bounds| bounds.is_finite())
                .map(|bounds| bounds.center())
        };
        center(focus.focused())
            .or_else(|| center(focus.first_focusable()))
            .unwrap_or(Point::ZERO)
    }
}

/// Middle-mouse autoscroll state; exists only while the button is held.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MiddlePress {
    /// Pointer holding the middle button.
    pub pointer: PointerId,
    /// Where the button went down.
    pub initial_point: Point,
    /// Latest pointer location.
    pub current_point: Point,
}

impl MiddlePress {
    /// Starts a middle press at `point`.
    #[must_use]
    pub fn new(pointer: PointerId, point: Point) -> Self {
        Self {
            pointer,
            initial_point: point,
            current_point: point,
        }
    }

    /// Autoscroll velocity for a frame of `dt` seconds, or `None` when the
    /// pointer has not left its initial point.
    ///
    /// The velocity points from the initial point towards the pointer, and
    /// its length is `min(offset / 100 / dt, max_velocity)`.
    #[must_use]
    pub fn autoscroll_velocity(&self, dt: f64, max_velocity: f64) -> Option<Vec2> {
        if dt <= 0.0 {
            return None;
        }
        let delta = self.current_point - self.initial_point;
        let distance = delta.length();
        let reduced = distance / MIDDLE_PRESS_DISTANCE_DIVISOR;
        if reduced > 0.0 {
            Some(delta / distance * (reduced / dt).min(max_velocity))
        } else {
            None
        }
    }
}

/// A raw trackpad pinch gesture event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PinchGestureEvent {
    /// Platform-reported cumulative scale of the gesture.
    pub scale: f64,
    /// Gesture location in the global frame.
    pub point: Point,
}

/// In-progress trackpad pinch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackpadPinch {
    /// Platform scale reported when the gesture started.
    pub start_scale: f64,
    /// Point that stays fixed while the pinch scales.
    pub anchor: Point,
}

impl TrackpadPinch {
    /// Records the start of a pinch.
    #[must_use]
    pub fn start(event: &PinchGestureEvent) -> Self {
        Self {
            start_scale: event.scale,
            anchor: event.point,
        }
    }

    /// Destination scale for a gesture-change event, relative to the live
    /// `source_scale`.
    #[must_use]
    pub fn destination_scale(&self, source_scale: f64, event: &PinchGestureEvent) -> f64 {
        source_scale + (event.scale - self.start_scale)
    }
}
