// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Optional action log for gesture entry points.
//!
//! Hosts that audit or replay input can install an [`EventLog`] on the
//! controller; it is told about every gesture the controller receives,
//! before the gesture is acted on.

use kurbo::{Point, Vec2};

use crate::gesture::{Key, ZoomCommand};
use crate::presses::PointerId;

/// One gesture received by the controller.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureRecord {
    /// Pointer went down.
    Down {
        /// Pointer.
        pointer: PointerId,
        /// Location, global frame.
        point: Point,
    },
    /// Pointer moved.
    Move {
        /// Pointer.
        pointer: PointerId,
        /// Location, global frame.
        point: Point,
    },
    /// Pointer went up.
    Up {
        /// Pointer.
        pointer: PointerId,
    },
    /// Pointer was cancelled by the platform.
    Cancel {
        /// Pointer.
        pointer: PointerId,
    },
    /// All input was interrupted.
    Interrupt,
    /// Wheel event.
    Wheel {
        /// Raw delta.
        delta: Vec2,
        /// Whether it requested a zoom.
        zoom: bool,
    },
    /// Key-down handled inside the accessible subtree.
    Key(Key),
    /// Key-down handled by the window-level fallback.
    WindowKey(Key),
    /// Keyboard zoom command.
    Zoom(ZoomCommand),
    /// Trackpad pinch started.
    PinchStart {
        /// Platform scale at the start.
        scale: f64,
    },
    /// Trackpad pinch changed.
    PinchChange {
        /// Platform scale.
        scale: f64,
    },
    /// Trackpad pinch ended.
    PinchEnd,
    /// Accessibility focus changed.
    FocusChange,
    /// Explicit pan-to-region request.
    PanTo,
    /// Transform reset.
    Reset,
}

/// Receives [`GestureRecord`]s from a controller.
pub trait EventLog {
    /// Records one gesture.
    fn record(&mut self, record: &GestureRecord);
}

/// [`EventLog`] that forwards every record to `tracing` at debug level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingEventLog;

impl EventLog for TracingEventLog {
    fn record(&mut self, record: &GestureRecord) {
        tracing::debug!(?record, "pan/zoom gesture");
    }
}
