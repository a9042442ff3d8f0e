// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::boxed::Box;
use alloc::rc::Weak;
use core::fmt;

use kurbo::{Affine, Point, Rect, Vec2};

use crate::config::PanZoomConfig;
use crate::driver::Animator;
use crate::follow::{
    AttachedPointers, FocusFollow, FocusRegister, FollowRegion, FollowSource, SceneGeometry,
    node_follow_region,
};
use crate::gesture::{
    KeyEvent, KeyGesture, KeyState, MiddlePress, PinchGestureEvent, TrackpadPinch, WheelEvent,
    WheelGesture, ZoomCommand,
};
use crate::keep_in_view::{Axis, keep_in_view_translation};
use crate::ladder::ScaleLadder;
use crate::log::{EventLog, GestureRecord};
use crate::presses::{MultiPress, PointerEvent, PointerId, PressEdit, PressTracker};
use crate::view_core::{PanZoomCore, ViewState, rect_contains};

/// Animated pan/zoom controller for a single content node.
///
/// The controller owns the content transform and fuses wheel, keyboard,
/// middle-press, trackpad-pinch, background-press, drag-follow, and
/// focus-follow input into one smoothly animated transform that always keeps
/// the content covering the pan bounds.
///
/// Gesture handlers only move the *destination*; [`step`](Self::step), called
/// once per rendered frame, eases the live transform towards it. Active
/// background presses (tracked by `P`) edit the transform directly and pause
/// the easing while they last.
///
/// `K` identifies scene nodes for focus-follow and keyboard zoom anchoring.
pub struct PanZoomController<K, P = MultiPress> {
    config: PanZoomConfig,
    core: PanZoomCore,
    animator: Animator,
    ladder: ScaleLadder,
    presses: P,
    attached: AttachedPointers,
    middle_press: Option<MiddlePress>,
    pinch: Option<TrackpadPinch>,
    focus_follow: Option<FocusFollow<K>>,
    event_log: Option<Box<dyn EventLog>>,
    disposed: bool,
}

impl<K: Clone, P: PressTracker + Default> PanZoomController<K, P> {
    /// Creates a controller over the given pan and target bounds.
    ///
    /// `pan_bounds` is the visible viewport in the global frame;
    /// `target_bounds` is the content extent laid out under the identity
    /// transform. Either may be empty until the host knows its layout.
    #[must_use]
    pub fn new(config: PanZoomConfig, pan_bounds: Rect, target_bounds: Rect) -> Self {
        Self::with_press_tracker(config, pan_bounds, target_bounds, P::default())
    }
}

impl<K: Clone, P: PressTracker> PanZoomController<K, P> {
    /// Creates a controller with an explicit press tracker.
    #[must_use]
    pub fn with_press_tracker(
        config: PanZoomConfig,
        pan_bounds: Rect,
        target_bounds: Rect,
        presses: P,
    ) -> Self {
        let mut core =
            PanZoomCore::new(pan_bounds, target_bounds, config.min_scale, config.max_scale);
        core.set_drag_bounds_margin(config.drag_bounds_margin);
        let animator = Animator::new(&core);
        Self {
            config,
            core,
            animator,
            ladder: ScaleLadder::new(config.min_scale, config.max_scale),
            presses,
            attached: AttachedPointers::default(),
            middle_press: None,
            pinch: None,
            focus_follow: None,
            event_log: None,
            disposed: false,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &PanZoomConfig {
        &self.config
    }

    /// Installs (or removes) the action log.
    pub fn set_event_log(&mut self, log: Option<Box<dyn EventLog>>) {
        self.event_log = log;
    }

    /// Read access to the transform/bounds bookkeeping.
    #[must_use]
    pub fn core(&self) -> &PanZoomCore {
        &self.core
    }

    /// The content transform (local → global).
    #[must_use]
    pub fn transform(&self) -> Affine {
        self.core.transform()
    }

    /// The current uniform scale.
    #[must_use]
    pub fn current_scale(&self) -> f64 {
        self.core.scale()
    }

    /// The live position/scale.
    #[must_use]
    pub fn source(&self) -> ViewState {
        self.core.source()
    }

    /// The position/scale the animation is heading for.
    #[must_use]
    pub fn destination(&self) -> ViewState {
        self.animator.destination
    }

    /// The pan bounds in the content's local frame.
    #[must_use]
    pub fn transformed_pan_bounds(&self) -> Rect {
        self.core.transformed_pan_bounds()
    }

    /// The discrete zoom levels used by keyboard zoom.
    #[must_use]
    pub fn ladder(&self) -> &ScaleLadder {
        &self.ladder
    }

    /// Returns `true` while the live state has not reached the destination.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animator.position_dirty(&self.core) || self.animator.scale_dirty(&self.core)
    }

    /// Returns `true` while a middle-button autoscroll is active.
    #[must_use]
    pub fn is_middle_pressing(&self) -> bool {
        self.middle_press.is_some()
    }

    /// Number of pressed drag-intent pointers being tracked.
    #[must_use]
    pub fn attached_pointer_count(&self) -> usize {
        self.attached.len()
    }

    /// Sets the pan bounds (global frame).
    pub fn set_pan_bounds(&mut self, bounds: Rect) {
        let was_valid = self.core.has_valid_bounds();
        self.core.set_pan_bounds(bounds);
        self.resync_destination(was_valid);
    }

    /// Sets the target bounds (content laid out under the identity transform).
    pub fn set_target_bounds(&mut self, bounds: Rect) {
        let was_valid = self.core.has_valid_bounds();
        self.core.set_target_bounds(bounds);
        self.resync_destination(was_valid);
    }

    /// Overwrites the transform from outside the controller.
    ///
    /// Any in-flight animation is discarded.
    pub fn set_transform(&mut self, transform: Affine) {
        self.core.set_transform(transform);
        self.animator.snap_to_source(&self.core);
    }

    /// Handles a pointer-down.
    pub fn on_down(&mut self, event: &PointerEvent) {
        self.log(GestureRecord::Down {
            pointer: event.pointer,
            point: event.point,
        });
        if !self.is_active() {
            return;
        }

        if let Some(press) = self.middle_press.take() {
            tracing::debug!(pointer = ?press.pointer, "middle press ended by new press");
            // The press that ended autoscroll does not start a new one.
            if event.is_middle_mouse() {
                return;
            }
        } else if event.is_middle_mouse() {
            tracing::debug!(pointer = ?event.pointer, "middle press started");
            self.middle_press = Some(MiddlePress::new(event.pointer, event.point));
            self.animator.snap_to_source(&self.core);
            return;
        }

        if event.drag_intent {
            self.attached.insert(event.pointer, event.point);
        } else if event.is_primary() && self.presses.press(event.pointer, event.point) {
            // A press takes over directly, with no residual inertia.
            self.animator.snap_to_source(&self.core);
        }
    }

    /// Binds a drag listener to a pointer pressed with drag intent.
    ///
    /// The listener is dropped from consideration once its last strong
    /// reference goes away. Returns `false` if the pointer is not tracked.
    pub fn attach_follow_source(
        &mut self,
        pointer: PointerId,
        source: Weak<dyn FollowSource>,
    ) -> bool {
        self.attached.attach(pointer, source)
    }

    /// Handles a pointer-move.
    pub fn on_move(&mut self, event: &PointerEvent) {
        self.log(GestureRecord::Move {
            pointer: event.pointer,
            point: event.point,
        });
        if !self.is_active() {
            return;
        }

        if let Some(press) = &mut self.middle_press {
            if press.pointer == event.pointer {
                press.current_point = event.point;
            }
        }

        if let Some(edit) = self.presses.moved(event.pointer, event.point) {
            match edit {
                PressEdit::Translate(delta) => self.core.translate_global(delta),
                PressEdit::Pinch {
                    from,
                    to,
                    scale_ratio,
                } => self.core.pinch(from, to, scale_ratio),
            }
            self.animator.snap_to_source(&self.core);
        }

        if self.attached.update_point(event.pointer, event.point)
            && self.drag_follow_eligible()
            && !self.core.drag_bounds().contains(event.point)
        {
            self.reposition_during_drag();
        }
    }

    /// Handles a pointer-up.
    pub fn on_up(&mut self, event: &PointerEvent) {
        self.log(GestureRecord::Up {
            pointer: event.pointer,
        });
        self.release_pointer(event.pointer);
    }

    /// Handles a platform pointer-cancel.
    pub fn on_cancel(&mut self, event: &PointerEvent) {
        self.log(GestureRecord::Cancel {
            pointer: event.pointer,
        });
        self.clear_input();
    }

    /// Abandons every in-progress press, drag and autoscroll.
    pub fn interrupt(&mut self) {
        self.log(GestureRecord::Interrupt);
        self.clear_input();
    }

    /// Handles a wheel event. Returns `true` when the platform's own
    /// zoom/scroll handling should be suppressed.
    pub fn wheel(&mut self, event: &WheelEvent) -> bool {
        self.log(GestureRecord::Wheel {
            delta: event.delta,
            zoom: event.ctrl_key,
        });
        if !self.is_active() {
            return false;
        }
        // Middle-press autoscroll owns translation while it lasts.
        if self.middle_press.is_some() {
            return true;
        }

        let wheel = WheelGesture::new(
            event,
            self.config.target_scale,
            self.config.wheel_line_multiplier,
        );
        if wheel.is_ctrl_key_down {
            let next = self.core.limit_scale(self.core.scale() + wheel.scale_delta);
            tracing::debug!(next, "wheel zoom");
            self.animator.scale_anchor = Some(wheel.target_point);
            self.animator.set_destination_scale(&self.core, next);
        } else {
            let source = self.core.source();
            let position = source.position + wheel.translation_vector / source.scale;
            self.animator.set_destination_position(&self.core, position);
        }
        true
    }

    /// Handles a key-down dispatched inside the accessible subtree.
    ///
    /// Zoom commands step along the discrete scale ladder (or reset), arrow
    /// keys pan. Returns `true` if the event was used.
    pub fn keydown<S, G, F>(&mut self, event: &KeyEvent, keys: &S, geometry: &G, focus: &F) -> bool
    where
        S: KeyState + ?Sized,
        G: SceneGeometry<K> + ?Sized,
        F: FocusRegister<K> + ?Sized,
    {
        self.log(GestureRecord::Key(event.key));
        if !self.is_active() {
            return false;
        }
        if let Some(command) = event.zoom_command() {
            self.apply_zoom_command(command, keys, geometry, focus);
            return true;
        }
        if event.key.is_arrow() && !event.has_modifier() {
            let gesture = KeyGesture::new(
                keys,
                self.core.scale(),
                self.config.target_scale,
                self.config.key_translation_magnitude,
            );
            return self.reposition_from_keys(&gesture, geometry, focus);
        }
        false
    }

    /// Window-level key-down fallback for events outside the accessible
    /// subtree. Only zoom commands are handled here.
    pub fn window_keydown<S, G, F>(
        &mut self,
        event: &KeyEvent,
        keys: &S,
        geometry: &G,
        focus: &F,
    ) -> bool
    where
        S: KeyState + ?Sized,
        G: SceneGeometry<K> + ?Sized,
        F: FocusRegister<K> + ?Sized,
    {
        if event.in_accessible_subtree {
            return false;
        }
        self.log(GestureRecord::WindowKey(event.key));
        if !self.is_active() {
            return false;
        }
        match event.zoom_command() {
            Some(command) => {
                self.apply_zoom_command(command, keys, geometry, focus);
                true
            }
            None => false,
        }
    }

    /// Starts a trackpad pinch. Returns `true` (native handling suppressed).
    pub fn gesture_start(&mut self, event: &PinchGestureEvent) -> bool {
        self.log(GestureRecord::PinchStart { scale: event.scale });
        if !self.is_active() {
            return false;
        }
        let pinch = TrackpadPinch::start(event);
        self.animator.scale_anchor = Some(pinch.anchor);
        self.pinch = Some(pinch);
        true
    }

    /// Updates a trackpad pinch. Returns `true` (native handling suppressed).
    pub fn gesture_change(&mut self, event: &PinchGestureEvent) -> bool {
        self.log(GestureRecord::PinchChange { scale: event.scale });
        if !self.is_active() {
            return false;
        }
        if let Some(pinch) = self.pinch {
            let scale = pinch.destination_scale(self.core.scale(), event);
            self.animator.scale_anchor = Some(pinch.anchor);
            self.animator.set_destination_scale(&self.core, scale);
        }
        true
    }

    /// Ends a trackpad pinch.
    pub fn gesture_end(&mut self) {
        self.log(GestureRecord::PinchEnd);
        self.pinch = None;
    }

    /// Advances the animation by `dt` seconds. Call once per rendered frame.
    pub fn step(&mut self, dt: f64) {
        if !self.is_active() {
            return;
        }
        debug_assert!(dt.is_finite() && dt >= 0.0, "step dt must be finite and non-negative");

        if let Some(press) = self.middle_press {
            let max = self.config.max_scroll_velocity * self.config.target_scale;
            if let Some(velocity) = press.autoscroll_velocity(dt, max) {
                // Velocity is per second; the destination advances by one frame's worth.
                let position = self.animator.destination.position + velocity * dt;
                self.animator.set_destination_position(&self.core, position);
            }
        }

        if self.drag_follow_eligible() {
            self.reposition_during_drag();
        }

        // Active presses drive the transform themselves.
        if self.presses.press_count() == 0 {
            self.animator.animate(&mut self.core, dt, &self.config);
        }
    }

    /// Pans so that `node` comes into view.
    pub fn pan_to_node<G>(&mut self, node: &K, geometry: &G, recenter: bool, axis: Option<Axis>)
    where
        G: SceneGeometry<K> + ?Sized,
    {
        if let Some(follow) = node_follow_region(geometry, node) {
            self.pan_to_region(follow.region, recenter, axis.or(follow.axis));
        }
    }

    /// Pans so that a global-frame `region` comes into view.
    ///
    /// The pan always animates; nothing jumps.
    pub fn pan_to_region(&mut self, region: Rect, recenter: bool, axis: Option<Axis>) {
        self.log(GestureRecord::PanTo);
        self.keep_in_view(region, recenter, axis);
    }

    /// Reacts to an accessibility focus change.
    ///
    /// The previous follow subscription is torn down. If a node gained
    /// focus, it is subscribed to, and if its region is not already fully
    /// visible the view starts panning to it immediately.
    pub fn handle_focus_change<G>(&mut self, focus: Option<K>, previous: Option<K>, geometry: &G)
    where
        G: SceneGeometry<K> + ?Sized,
    {
        self.log(GestureRecord::FocusChange);
        self.focus_follow = None;
        if !self.is_active() {
            return;
        }
        tracing::debug!(
            gained = focus.is_some(),
            had_previous = previous.is_some(),
            "pan/zoom focus change"
        );
        let Some(node) = focus else {
            return;
        };

        if let Some(follow) = node_follow_region(geometry, &node) {
            if !rect_contains(self.core.pan_bounds(), follow.region) {
                self.keep_in_view(follow.region, true, follow.axis);
            }
        }
        self.focus_follow = Some(FocusFollow::subscribe(node, geometry));
    }

    /// Re-checks the focus subscription after the host updated its scene.
    ///
    /// If a transform on the chain to the focused node (or its custom pan
    /// target) changed since last time, the view recenters on it.
    pub fn refresh_focus_follow<G>(&mut self, geometry: &G)
    where
        G: SceneGeometry<K> + ?Sized,
    {
        if !self.is_active() {
            return;
        }
        let Some(subscription) = &mut self.focus_follow else {
            return;
        };
        if !subscription.poll_changed(geometry) {
            return;
        }
        if let Some(follow) = node_follow_region(geometry, subscription.node()) {
            self.keep_in_view(follow.region, true, follow.axis);
        }
    }

    /// Restores the identity transform immediately.
    pub fn reset_transform(&mut self) {
        self.log(GestureRecord::Reset);
        tracing::debug!("pan/zoom reset");
        self.core.reset_transform();
        self.animator.snap_to_source(&self.core);
        self.animator.scale_anchor = None;
    }

    /// Tears down subscriptions and input state. The controller ignores all
    /// further input.
    pub fn dispose(&mut self) {
        self.focus_follow = None;
        self.clear_input();
        self.pinch = None;
        self.event_log = None;
        self.disposed = true;
    }

    /// Snapshot of the controller state for debugging and inspection.
    #[must_use]
    pub fn debug_info(&self) -> PanZoomDebugInfo {
        PanZoomDebugInfo {
            transform: self.core.transform(),
            pan_bounds: self.core.pan_bounds(),
            target_bounds: self.core.target_bounds(),
            transformed_pan_bounds: self.core.transformed_pan_bounds(),
            source: self.core.source(),
            destination: self.animator.destination,
            scale_anchor: self.animator.scale_anchor,
            press_count: self.presses.press_count(),
            attached_pointers: self.attached.len(),
            middle_pressing: self.middle_press.is_some(),
            following_focus: self.focus_follow.is_some(),
        }
    }

    fn is_active(&self) -> bool {
        !self.disposed && self.core.has_valid_bounds()
    }

    fn log(&mut self, record: GestureRecord) {
        if let Some(log) = &mut self.event_log {
            log.record(&record);
        }
    }

    fn release_pointer(&mut self, pointer: PointerId) {
        if self.middle_press.is_some_and(|press| press.pointer == pointer) {
            tracing::debug!(?pointer, "middle press released");
            self.middle_press = None;
        }
        self.presses.release(pointer);
        self.attached.remove(pointer);
    }

    fn clear_input(&mut self) {
        self.presses.clear();
        self.attached.clear();
        self.middle_press = None;
    }

    fn drag_follow_eligible(&self) -> bool {
        !self.attached.is_empty() && self.core.scale() > 1.0
    }

    fn reposition_during_drag(&mut self) {
        if let Some(FollowRegion { region, axis }) = self.attached.current_follow_region() {
            self.keep_in_view(region, false, axis);
        }
    }

    fn keep_in_view(&mut self, region: Rect, recenter: bool, axis: Option<Axis>) {
        if !self.core.has_valid_bounds() || !region.is_finite() {
            return;
        }
        let local = self.core.global_to_local_rect(region);
        let padding = self.config.keep_in_view_padding / self.core.scale();
        let translation = keep_in_view_translation(
            local,
            self.core.transformed_pan_bounds(),
            padding,
            recenter,
            axis,
        );
        if translation != Vec2::ZERO {
            let position = self.core.source().position + translation;
            self.animator.set_destination_position(&self.core, position);
        }
    }

    fn reposition_from_keys<G, F>(&mut self, gesture: &KeyGesture, geometry: &G, focus: &F) -> bool
    where
        G: SceneGeometry<K> + ?Sized,
        F: FocusRegister<K> + ?Sized,
    {
        let mut used = false;
        if gesture.translation_vector != Vec2::ZERO {
            let source = self.core.source();
            let position = source.position + gesture.translation_vector / source.scale;
            self.animator.set_destination_position(&self.core, position);
            used = true;
        }
        if gesture.scale != self.core.scale() {
            self.animator.scale_anchor = Some(KeyGesture::scale_anchor(focus, geometry));
            self.animator.set_destination_scale(&self.core, gesture.scale);
            used = true;
        }
        used
    }

    fn apply_zoom_command<S, G, F>(
        &mut self,
        command: ZoomCommand,
        keys: &S,
        geometry: &G,
        focus: &F,
    ) where
        S: KeyState + ?Sized,
        G: SceneGeometry<K> + ?Sized,
        F: FocusRegister<K> + ?Sized,
    {
        self.log(GestureRecord::Zoom(command));
        let zoom_in = match command {
            ZoomCommand::In => true,
            ZoomCommand::Out => false,
            ZoomCommand::Reset => {
                self.reset_transform();
                return;
            }
        };
        let next = self.ladder.next(self.core.scale(), zoom_in);
        tracing::debug!(next, zoom_in, "keyboard zoom");
        let gesture = KeyGesture::new(
            keys,
            next,
            self.config.target_scale,
            self.config.key_translation_magnitude,
        );
        self.reposition_from_keys(&gesture, geometry, focus);
    }

    // A destination recorded while the bounds were invalid is discarded.
    fn resync_destination(&mut self, was_valid: bool) {
        if !self.core.has_valid_bounds() {
            return;
        }
        if !was_valid {
            self.animator.snap_to_source(&self.core);
            return;
        }
        let destination = &mut self.animator.destination;
        destination.position = self.core.valid_destination_position(destination.position);
        destination.scale = self.core.limit_scale(destination.scale);
    }
}

impl<K, P> fmt::Debug for PanZoomController<K, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanZoomController")
            .field("config", &self.config)
            .field("core", &self.core)
            .field("destination", &self.animator.destination)
            .field("scale_anchor", &self.animator.scale_anchor)
            .field("middle_press", &self.middle_press)
            .field("pinch", &self.pinch)
            .field("following_focus", &self.focus_follow.is_some())
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}

/// Debug snapshot of a [`PanZoomController`] state.
#[derive(Clone, Copy, Debug)]
pub struct PanZoomDebugInfo {
    /// Content transform (local → global).
    pub transform: Affine,
    /// Visible viewport, global frame.
    pub pan_bounds: Rect,
    /// Content extent under the identity transform.
    pub target_bounds: Rect,
    /// Pan bounds in the content's local frame.
    pub transformed_pan_bounds: Rect,
    /// Live position/scale.
    pub source: ViewState,
    /// Animation target.
    pub destination: ViewState,
    /// Point held fixed while scale animates.
    pub scale_anchor: Option<Point>,
    /// Active background presses.
    pub press_count: usize,
    /// Pressed drag-intent pointers.
    pub attached_pointers: usize,
    /// Whether middle-press autoscroll is active.
    pub middle_pressing: bool,
    /// Whether a focused node is being followed.
    pub following_focus: bool,
}
