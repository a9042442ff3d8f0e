// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_pan_zoom --heading-base-level=0

//! Understory Pan Zoom: an animated pan/zoom controller with input fusion.
//!
//! This crate owns a single uniform translate+scale transform applied to a
//! content node and reconciles many concurrently possible input channels
//! into one smoothly animated transform:
//! - Mouse wheel (pan, or ctrl-wheel zoom about the pointer).
//! - Trackpad pinch gestures.
//! - Keyboard arrows and zoom commands stepping along a discrete
//!   [`ScaleLadder`].
//! - Middle-mouse autoscroll.
//! - Background touch/mouse presses that pan and pinch directly.
//! - Drag-to-edge following of dragged objects ([`FollowSource`]).
//! - Accessibility focus following ([`SceneGeometry`], [`FocusRegister`]).
//!
//! It does **not** draw anything, build an accessibility tree, or hit test.
//! Callers are expected to:
//! - Feed normalized platform events into the controller's handlers.
//! - Call [`PanZoomController::step`] once per rendered frame.
//! - Read back [`PanZoomController::transform`] and apply it to their content.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Rect, Vec2};
//! use understory_pan_zoom::{PanZoomConfig, PanZoomController, WheelEvent};
//!
//! let viewport = Rect::new(0.0, 0.0, 800.0, 600.0);
//! let mut pan_zoom: PanZoomController<u32> =
//!     PanZoomController::new(PanZoomConfig::default(), viewport, viewport);
//!
//! // Ctrl-wheel up zooms in about the pointer.
//! let suppress_native = pan_zoom.wheel(&WheelEvent {
//!     delta: Vec2::new(0.0, -100.0),
//!     point: Point::new(200.0, 150.0),
//!     ctrl_key: true,
//!     ..WheelEvent::default()
//! });
//! assert!(suppress_native);
//! assert_eq!(pan_zoom.destination().scale, 1.5);
//!
//! // Frames ease the transform towards the destination.
//! for _ in 0..240 {
//!     pan_zoom.step(1.0 / 60.0);
//! }
//! assert_eq!(pan_zoom.current_scale(), 1.5);
//! ```
//!
//! ## Design notes
//!
//! - Gesture handlers only set a *destination*; the live (*source*) state is
//!   always re-derived from the applied transform, so external transform
//!   changes between frames are picked up automatically.
//! - The content always covers the pan bounds: every transform edit is
//!   followed by a corrective clamp.
//! - Handlers run to completion before the next frame, so the driver never
//!   sees a half-applied gesture. Nothing here is thread-aware.
//! - Host seams are traits passed into the operations that need them rather
//!   than stored references.
//!
//! This crate is `no_std`.

#![no_std]

extern crate alloc;

mod config;
mod controller;
mod driver;
mod follow;
mod gesture;
mod keep_in_view;
mod ladder;
mod log;
mod presses;
mod view_core;

pub use config::PanZoomConfig;
pub use controller::{PanZoomController, PanZoomDebugInfo};
pub use driver::translation_speed;
pub use follow::{FocusRegister, FollowRegion, FollowSource, SceneGeometry};
pub use gesture::{
    DeltaMode, Key, KeyEvent, KeyGesture, KeyState, MiddlePress, PinchGestureEvent,
    TrackpadPinch, WheelEvent, WheelGesture, ZoomCommand,
};
pub use keep_in_view::{Axis, keep_in_view_translation};
pub use ladder::{LADDER_STEPS, ScaleLadder};
pub use log::{EventLog, GestureRecord, TracingEventLog};
pub use presses::{
    MultiPress, PointerButton, PointerEvent, PointerId, PointerKind, PressEdit, PressTracker,
};
pub use view_core::{PanZoomCore, ViewState};
