//! The facade: one object between platform glue and gameplay code.
//!
//! [`Input`] owns every subsystem (pressed state, actions, joypad identity,
//! trackers, the mouse surface, the listener bus) and keeps them coherent.
//! Platform glue calls the `&mut self` intake methods; gameplay code polls
//! through `&self` and can poll as often as it likes within a frame without
//! ever seeing two different answers.
//!
//! # Frame discipline
//! Feed events, let the frame run and poll freely, then call
//! [`end_frame`](Input::end_frame) exactly once at the boundary:
//!
//! ```
//! use switchboard::{ActionTrigger, Input, InputEvent, Key};
//!
//! let mut input = Input::new();
//! input.bind_action("jump", ActionTrigger::Key { key: Key(32) });
//!
//! input.parse_input_event(InputEvent::Key {
//!     key: Key(32),
//!     pressed: true,
//!     echo: false,
//! });
//!
//! // Observable immediately, and stable for the rest of the frame.
//! assert!(input.is_action_just_pressed("jump"));
//! assert!(input.is_action_just_pressed("jump"));
//!
//! input.end_frame(1.0 / 60.0);
//! assert!(input.is_action_pressed("jump"));
//! assert!(!input.is_action_just_pressed("jump"));
//! ```
//!
//! Each accepted event updates raw state first, then dependent actions, then
//! trackers, and only then reaches listeners, so a listener that polls sees a
//! world already consistent with the event in its hand.
//!
//! The borrow checker enforces the threading contract for free: intake takes
//! `&mut Input`, so producers and pollers cannot interleave mid-event.

use std::collections::VecDeque;

use glam::{IVec2, Vec2, Vec3};

use crate::action::{ActionMap, ActionProfile, ActionTrigger, BoundInput};
use crate::bus::{EventBus, EventFilter, InputListener};
use crate::error::InputError;
use crate::event::{InputEvent, Key};
use crate::joypad::{JoyMapping, JoypadRegistry, Vibration};
use crate::mouse::{CustomCursor, MouseButton, MouseButtonMask, MouseMode, MouseState, Rect};
use crate::snapshot::FrameSnapshot;
use crate::source::EventSource;
use crate::state::{ButtonState, StateStore};
use crate::tracker::{Pose, TrackerKind, TrackerRecord, TrackerRegistry};

/// Facade over every input subsystem. See the [module docs](self).
#[derive(Default)]
pub struct Input {
    store: StateStore,
    actions: ActionMap,
    joypads: JoypadRegistry,
    trackers: TrackerRegistry,
    mouse: MouseState,
    bus: EventBus,
    queued: VecDeque<InputEvent>,
    emulate_touchscreen: bool,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- event intake ----

    /// Applies one event: raw state, then dependent actions, then trackers,
    /// then listeners.
    ///
    /// Malformed situations (releases of buttons that were never pressed,
    /// poses for retired trackers, key echo) degrade to no-ops; listeners
    /// still hear every event.
    pub fn parse_input_event(&mut self, event: InputEvent) {
        self.apply(&event);
        self.bus.emit(&event);
    }

    /// Buffers an event for a later [`flush_queued`](Input::flush_queued).
    ///
    /// Useful when events are produced somewhere awkward (mid-callback,
    /// another system's iteration) and should take effect at a defined drain
    /// point instead.
    pub fn queue_event(&mut self, event: InputEvent) {
        self.queued.push_back(event);
    }

    /// Dispatches all queued events in arrival order.
    pub fn flush_queued(&mut self) {
        while let Some(event) = self.queued.pop_front() {
            self.parse_input_event(event);
        }
    }

    /// Drains an [`EventSource`] through the facade. Returns how many events
    /// were dispatched.
    pub fn pump<S: EventSource + ?Sized>(&mut self, source: &mut S) -> usize {
        let events = source.poll();
        let count = events.len();
        for event in events {
            self.parse_input_event(event);
        }
        count
    }

    /// Closes the frame: clears every *just pressed* / *just released* edge
    /// and folds accumulated mouse motion into
    /// [`last_mouse_speed`](Input::last_mouse_speed) using `delta` seconds.
    ///
    /// Call exactly once per frame, after gameplay polling. Pressed state,
    /// axis values, poses, and sensor readings all carry over.
    pub fn end_frame(&mut self, delta: f32) {
        self.store.end_frame();
        self.actions.end_frame();
        self.mouse.end_frame(delta);
    }

    fn apply(&mut self, event: &InputEvent) {
        let state_changed = match *event {
            InputEvent::Key { key, pressed, echo } => {
                !echo && self.store.apply_key(key, pressed)
            }
            InputEvent::MouseButton {
                button,
                pressed,
                position,
            } => {
                self.mouse.set_position(position);
                self.store.apply_mouse_button(button, pressed)
            }
            InputEvent::MouseMotion { position, relative } => {
                self.mouse.record_motion(position, relative);
                false
            }
            InputEvent::JoyButton {
                slot,
                button,
                pressed,
            } => self.store.apply_joy_button(slot, button, pressed),
            InputEvent::JoyAxis { slot, axis, value } => {
                self.store.set_joy_axis(slot, axis, value)
            }
            InputEvent::TrackerPose { index, pose } => {
                self.trackers.set_pose(index, pose);
                false
            }
        };

        // Only a real state change can move an action's aggregate.
        if state_changed {
            if let Some(input) = BoundInput::from_event(event) {
                self.actions.refresh(&input, &self.store);
            }
        }
    }

    // ---- keyboard ----

    #[inline]
    pub fn is_key_pressed(&self, key: Key) -> bool {
        self.store.is_key_pressed(key)
    }

    #[inline]
    pub fn is_key_just_pressed(&self, key: Key) -> bool {
        self.store.is_key_just_pressed(key)
    }

    #[inline]
    pub fn is_key_just_released(&self, key: Key) -> bool {
        self.store.is_key_just_released(key)
    }

    /// Pressed state and edges for one key, as a single value.
    #[inline]
    pub fn key_state(&self, key: Key) -> ButtonState {
        self.store.key_state(key)
    }

    // ---- mouse ----

    #[inline]
    pub fn is_mouse_button_pressed(&self, button: MouseButton) -> bool {
        self.store.is_mouse_button_pressed(button)
    }

    #[inline]
    pub fn is_mouse_button_just_pressed(&self, button: MouseButton) -> bool {
        self.store.is_mouse_button_just_pressed(button)
    }

    #[inline]
    pub fn is_mouse_button_just_released(&self, button: MouseButton) -> bool {
        self.store.is_mouse_button_just_released(button)
    }

    /// Pressed state and edges for one mouse button, as a single value.
    #[inline]
    pub fn mouse_button_state(&self, button: MouseButton) -> ButtonState {
        self.store.mouse_button_state(button)
    }

    /// Mask of all currently held mouse buttons.
    #[inline]
    pub fn mouse_button_mask(&self) -> MouseButtonMask {
        self.store.mouse_button_mask()
    }

    /// Last known cursor position in window coordinates.
    #[inline]
    pub fn mouse_position(&self) -> Vec2 {
        self.mouse.position()
    }

    /// Previous frame's mouse motion divided by its delta time.
    #[inline]
    pub fn last_mouse_speed(&self) -> Vec2 {
        self.mouse.last_speed()
    }

    #[inline]
    pub fn mouse_mode(&self) -> MouseMode {
        self.mouse.mode()
    }

    /// Requests a cursor mode. The platform layer reads this back and applies
    /// it to the OS cursor.
    pub fn set_mouse_mode(&mut self, mode: MouseMode) {
        self.mouse.set_mode(mode);
    }

    /// Teleports the logical cursor. Not treated as motion: speed is
    /// unaffected and listeners hear nothing.
    pub fn warp_mouse(&mut self, to: Vec2) {
        self.mouse.warp(to);
    }

    /// Wraps a motion delta around `rect` for captured-mode emulation,
    /// teleporting the cursor back inside when it escaped. Returns the
    /// corrected integer delta to integrate instead of the raw one.
    pub fn warp_mouse_motion(&mut self, relative: Vec2, rect: &Rect) -> IVec2 {
        self.mouse.warp_motion(relative, rect)
    }

    /// Requests a custom cursor image. `resource` is opaque to the facade.
    pub fn set_custom_mouse_cursor(&mut self, resource: impl Into<String>, hotspot: Vec2) {
        self.mouse.set_custom_cursor(CustomCursor {
            resource: resource.into(),
            hotspot,
        });
    }

    /// Reverts to the platform's default cursor image.
    pub fn clear_custom_mouse_cursor(&mut self) {
        self.mouse.clear_custom_cursor();
    }

    /// The pending custom cursor request, if any.
    #[inline]
    pub fn custom_mouse_cursor(&self) -> Option<&CustomCursor> {
        self.mouse.custom_cursor()
    }

    /// Windowing layer notification: the cursor entered or left the window.
    pub fn set_mouse_in_window(&mut self, inside: bool) {
        self.mouse.set_in_window(inside);
    }

    #[inline]
    pub fn is_mouse_in_window(&self) -> bool {
        self.mouse.is_in_window()
    }

    /// When set, the platform layer should synthesize touch events from
    /// mouse input. The facade only stores the request.
    pub fn set_emulate_touchscreen(&mut self, enable: bool) {
        self.emulate_touchscreen = enable;
    }

    #[inline]
    pub fn is_emulating_touchscreen(&self) -> bool {
        self.emulate_touchscreen
    }

    // ---- joypads ----

    /// Records a connection or disconnection for a slot.
    ///
    /// Disconnecting releases everything the pad held (with normal release
    /// edges, so actions bound to it let go cleanly) and drops its axis
    /// values; stale queries about the slot then answer neutrally until
    /// something reconnects there.
    pub fn joy_connection_changed(&mut self, slot: u32, connected: bool, name: &str, guid: &str) {
        self.joypads.connection_changed(slot, connected, name, guid);
        if !connected {
            let (buttons, axes) = self.store.clear_joypad(slot);
            for button in buttons {
                self.actions
                    .refresh(&BoundInput::JoyButton(slot, button), &self.store);
            }
            for axis in axes {
                self.actions
                    .refresh(&BoundInput::JoyAxis(slot, axis), &self.store);
            }
        }
    }

    /// Connected slots, ascending.
    pub fn connected_joypads(&self) -> Vec<u32> {
        self.joypads.connected()
    }

    #[inline]
    pub fn is_joy_connected(&self, slot: u32) -> bool {
        self.joypads.is_connected(slot)
    }

    /// Display name of the pad at `slot`, `""` when empty.
    pub fn joy_name(&self, slot: u32) -> String {
        self.joypads
            .slot(slot)
            .map(|s| s.name.clone())
            .unwrap_or_default()
    }

    /// GUID of the pad at `slot`, `""` when empty.
    pub fn joy_guid(&self, slot: u32) -> String {
        self.joypads
            .slot(slot)
            .map(|s| s.guid.clone())
            .unwrap_or_default()
    }

    /// Whether a mapping is registered for the pad at `slot`.
    pub fn is_joy_known(&self, slot: u32) -> bool {
        self.joypads.slot(slot).map(|s| s.known).unwrap_or(false)
    }

    #[inline]
    pub fn is_joy_button_pressed(&self, slot: u32, button: u32) -> bool {
        self.store.is_joy_button_pressed(slot, button)
    }

    #[inline]
    pub fn is_joy_button_just_pressed(&self, slot: u32, button: u32) -> bool {
        self.store.is_joy_button_just_pressed(slot, button)
    }

    #[inline]
    pub fn is_joy_button_just_released(&self, slot: u32, button: u32) -> bool {
        self.store.is_joy_button_just_released(slot, button)
    }

    /// Pressed state and edges for one joypad button, as a single value.
    #[inline]
    pub fn joy_button_state(&self, slot: u32, button: u32) -> ButtonState {
        self.store.joy_button_state(slot, button)
    }

    /// Latest axis value, `0.0` for silent or absent devices.
    #[inline]
    pub fn joy_axis(&self, slot: u32, axis: u32) -> f32 {
        self.store.joy_axis(slot, axis)
    }

    /// Registers one `guid,name,<layout...>` mapping line. A GUID that is
    /// already mapped is only replaced when `update_existing` is set.
    /// Connected pads using the GUID become *known*.
    pub fn add_joy_mapping(&mut self, line: &str, update_existing: bool) -> Result<(), InputError> {
        self.joypads.add_mapping(line, update_existing)
    }

    /// Drops the mapping for a GUID; affected pads become unknown. Returns
    /// whether a mapping was registered.
    pub fn remove_joy_mapping(&mut self, guid: &str) -> bool {
        self.joypads.remove_mapping(guid)
    }

    /// The registered mapping for a GUID, if any.
    pub fn joy_mapping(&self, guid: &str) -> Option<&JoyMapping> {
        self.joypads.mapping(guid)
    }

    /// Requests rumble on a pad. `duration == 0.0` means until stopped.
    /// Reports `false` for absent slots or out-of-range magnitudes.
    pub fn start_joy_vibration(&mut self, slot: u32, weak: f32, strong: f32, duration: f32) -> bool {
        self.joypads.start_vibration(slot, weak, strong, duration)
    }

    /// Replaces any running rumble with a stop request.
    pub fn stop_joy_vibration(&mut self, slot: u32) -> bool {
        self.joypads.stop_vibration(slot)
    }

    /// Latest vibration request for a slot (neutral when absent). The
    /// platform layer polls this and compares `timestamp` serials to spot
    /// new requests.
    pub fn joy_vibration(&self, slot: u32) -> Vibration {
        self.joypads.vibration(slot)
    }

    /// Requested motor magnitudes as `(weak, strong)`, zero when absent.
    pub fn joy_vibration_strength(&self, slot: u32) -> Vec2 {
        let v = self.joypads.vibration(slot);
        Vec2::new(v.weak, v.strong)
    }

    /// Requested vibration duration in seconds, zero when absent.
    pub fn joy_vibration_duration(&self, slot: u32) -> f32 {
        self.joypads.vibration(slot).duration
    }

    /// Serial of the latest vibration request, zero when none was ever filed.
    pub fn joy_vibration_timestamp(&self, slot: u32) -> u64 {
        self.joypads.vibration(slot).timestamp
    }

    // ---- actions ----

    /// Merges a parsed profile: actions it names are replaced wholesale,
    /// others keep their bindings.
    pub fn load_action_profile(&mut self, profile: &ActionProfile) {
        self.actions.load_profile(profile, &self.store);
    }

    /// Exports current bindings as a profile.
    pub fn export_action_profile(&self, name: &str) -> ActionProfile {
        self.actions.to_profile(name)
    }

    /// Registers an action with no triggers yet.
    pub fn add_action(&mut self, name: &str) {
        self.actions.add_action(name);
    }

    /// Unregisters an action. Returns whether it existed.
    pub fn erase_action(&mut self, name: &str) -> bool {
        self.actions.erase_action(name)
    }

    #[inline]
    pub fn has_action(&self, name: &str) -> bool {
        self.actions.has_action(name)
    }

    /// Registered action names, sorted.
    pub fn action_names(&self) -> Vec<String> {
        self.actions.action_names()
    }

    /// Adds a trigger to an action, creating it if needed.
    ///
    /// Binding mutations adopt current device state without manufacturing
    /// edges: if the key is already held when it gets bound, the action
    /// reads pressed but never *just pressed*.
    pub fn bind_action(&mut self, name: &str, trigger: ActionTrigger) {
        self.actions.bind(name, trigger, &self.store);
    }

    /// Removes one trigger. Returns whether it was bound.
    pub fn unbind_action(&mut self, name: &str, trigger: &ActionTrigger) -> bool {
        self.actions.unbind(name, trigger, &self.store)
    }

    /// Removes every trigger from an action, keeping it registered. The
    /// action reads neutral from here on.
    pub fn clear_action_bindings(&mut self, name: &str) {
        self.actions.clear_bindings(name, &self.store);
    }

    /// Triggers currently bound to an action (empty when unknown).
    pub fn action_triggers(&self, name: &str) -> &[ActionTrigger] {
        self.actions.triggers(name)
    }

    #[inline]
    pub fn is_action_pressed(&self, name: &str) -> bool {
        self.actions.is_pressed(name)
    }

    #[inline]
    pub fn is_action_just_pressed(&self, name: &str) -> bool {
        self.actions.is_just_pressed(name)
    }

    #[inline]
    pub fn is_action_just_released(&self, name: &str) -> bool {
        self.actions.is_just_released(name)
    }

    /// Full state for an action; neutral when the name is unknown.
    #[inline]
    pub fn action_state(&self, name: &str) -> ButtonState {
        self.actions.state(name)
    }

    /// Presses an action from code, with the same edge discipline as a
    /// physical press. Unknown names are registered on the fly.
    pub fn action_press(&mut self, name: &str) {
        self.actions.press(name);
    }

    /// Withdraws a synthetic press. A bound input that is still held keeps
    /// the action pressed.
    pub fn action_release(&mut self, name: &str) {
        self.actions.release(name, &self.store);
    }

    // ---- trackers ----

    /// Registers a tracker and returns its permanent index. Indices are
    /// monotonic and never reused, unlike joypad slots.
    pub fn add_tracker(
        &mut self,
        kind: TrackerKind,
        name: &str,
        tracks_orientation: bool,
        tracks_position: bool,
    ) -> u32 {
        self.trackers
            .add(kind, name, tracks_orientation, tracks_position)
    }

    /// Removes a tracker. Returns whether the index was live.
    pub fn remove_tracker(&mut self, index: u32) -> bool {
        self.trackers.remove(index)
    }

    /// Full record for a tracker, if live.
    pub fn tracker(&self, index: u32) -> Option<&TrackerRecord> {
        self.trackers.get(index)
    }

    /// Category of a tracker, [`TrackerKind::UNKNOWN`] when absent.
    pub fn tracker_kind(&self, index: u32) -> TrackerKind {
        self.trackers.kind(index)
    }

    /// Name of a tracker, `""` when absent.
    pub fn tracker_name(&self, index: u32) -> &str {
        self.trackers.name(index)
    }

    /// Latest pose of a tracker, identity when absent.
    pub fn tracker_pose(&self, index: u32) -> Pose {
        self.trackers.pose(index)
    }

    /// Whether a tracker reports usable orientation, `false` when absent.
    pub fn tracker_tracks_orientation(&self, index: u32) -> bool {
        self.trackers.tracks_orientation(index)
    }

    /// Whether a tracker reports usable position, `false` when absent.
    pub fn tracker_tracks_position(&self, index: u32) -> bool {
        self.trackers.tracks_position(index)
    }

    /// Live tracker indices whose kind intersects `mask`, ascending.
    pub fn connected_trackers(&self, mask: TrackerKind) -> Vec<u32> {
        self.trackers.connected(mask)
    }

    /// Overwrites a tracker's pose directly (external tracking systems).
    /// Reports whether the index was live.
    pub fn set_tracker_pose(&mut self, index: u32, pose: Pose) -> bool {
        self.trackers.set_pose(index, pose)
    }

    /// Advances a tracker's orientation from the current sensor readings
    /// over `delta` seconds. Deterministic; see
    /// [`TrackerRegistry::integrate_sensors`] semantics for the fusion rules.
    pub fn set_tracker_pose_from_sensors(&mut self, index: u32, delta: f32) -> bool {
        self.trackers
            .integrate_sensors(index, self.store.sensors(), delta)
    }

    // ---- sensors ----

    pub fn set_accelerometer(&mut self, value: Vec3) {
        self.store.set_accelerometer(value);
    }

    pub fn set_gravity(&mut self, value: Vec3) {
        self.store.set_gravity(value);
    }

    pub fn set_magnetometer(&mut self, value: Vec3) {
        self.store.set_magnetometer(value);
    }

    pub fn set_gyroscope(&mut self, value: Vec3) {
        self.store.set_gyroscope(value);
    }

    /// Latest accelerometer reading, zero until first set.
    #[inline]
    pub fn accelerometer(&self) -> Vec3 {
        self.store.sensors().accelerometer
    }

    /// Latest gravity reading, zero until first set.
    #[inline]
    pub fn gravity(&self) -> Vec3 {
        self.store.sensors().gravity
    }

    /// Latest magnetometer reading, zero until first set.
    #[inline]
    pub fn magnetometer(&self) -> Vec3 {
        self.store.sensors().magnetometer
    }

    /// Latest gyroscope reading, zero until first set.
    #[inline]
    pub fn gyroscope(&self) -> Vec3 {
        self.store.sensors().gyroscope
    }

    // ---- listeners ----

    /// Registers a listener on the dispatch bus, optionally limited to one
    /// joypad slot. Returns a handle.
    pub fn add_listener(
        &mut self,
        listener: impl InputListener + 'static,
        filter: EventFilter,
        slot: Option<u32>,
    ) -> u64 {
        self.bus.add_listener(listener, filter, slot)
    }

    pub fn enable_listener(&mut self, id: u64) {
        self.bus.enable(id);
    }

    pub fn disable_listener(&mut self, id: u64) {
        self.bus.disable(id);
    }

    /// Unregisters a listener. Returns whether the handle was live.
    pub fn remove_listener(&mut self, id: u64) -> bool {
        self.bus.remove_listener(id)
    }

    // ---- snapshots ----

    /// Owned copy of the per-frame polling surface, for fan-out.
    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            actions: self
                .actions
                .iter_states()
                .map(|(name, state)| (name.to_string(), state))
                .collect(),
            mouse_position: self.mouse.position(),
            mouse_speed: self.mouse.last_speed(),
            mouse_mask: self.store.mouse_button_mask(),
            mouse_mode: self.mouse.mode(),
            connected_joypads: self.joypads.connected(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::VirtualSource;
    use std::sync::mpsc;

    fn key_event(code: u32, pressed: bool) -> InputEvent {
        InputEvent::Key {
            key: Key(code),
            pressed,
            echo: false,
        }
    }

    #[test]
    fn echo_keys_do_not_disturb_state_but_reach_listeners() {
        struct Counter(mpsc::Sender<()>);
        impl InputListener for Counter {
            fn on_input(&mut self, _event: &InputEvent) {
                self.0.send(()).unwrap();
            }
        }

        let mut input = Input::new();
        let (tx, rx) = mpsc::channel();
        input.add_listener(Counter(tx), EventFilter::KeyboardOnly, None);

        input.parse_input_event(key_event(40, true));
        input.end_frame(1.0 / 60.0);

        input.parse_input_event(InputEvent::Key {
            key: Key(40),
            pressed: true,
            echo: true,
        });

        assert!(input.is_key_pressed(Key(40)));
        assert!(!input.is_key_just_pressed(Key(40)));
        assert_eq!(rx.try_iter().count(), 2);
    }

    #[test]
    fn accepted_events_reach_listeners_exactly_once() {
        struct Remember(mpsc::Sender<InputEvent>);
        impl InputListener for Remember {
            fn on_input(&mut self, event: &InputEvent) {
                self.0.send(event.clone()).unwrap();
            }
        }

        let mut input = Input::new();
        let (tx, rx) = mpsc::channel();
        input.add_listener(Remember(tx), EventFilter::All, None);

        input.parse_input_event(key_event(7, true));
        // Even a no-op release for an unpressed key is forwarded.
        input.parse_input_event(key_event(99, false));

        assert_eq!(rx.try_iter().count(), 2);
        assert!(input.is_key_pressed(Key(7)));
        assert!(input.is_key_just_pressed(Key(7)));
    }

    #[test]
    fn queued_events_wait_for_the_drain_point() {
        let mut input = Input::new();
        input.queue_event(key_event(3, true));
        input.queue_event(key_event(3, false));

        assert!(!input.is_key_pressed(Key(3)));

        input.flush_queued();
        assert!(!input.is_key_pressed(Key(3)));
        assert!(input.is_key_just_released(Key(3)));

        // The queue is empty afterwards.
        input.flush_queued();
        assert!(input.is_key_just_released(Key(3)));
    }

    #[test]
    fn pump_drains_a_source_in_order() {
        let mut input = Input::new();
        let mut source = VirtualSource::new("script");
        source.feed(key_event(1, true));
        source.feed(key_event(1, false));
        source.feed(key_event(2, true));

        assert_eq!(input.pump(&mut source), 3);
        assert!(!input.is_key_pressed(Key(1)));
        assert!(input.is_key_pressed(Key(2)));
        assert_eq!(input.pump(&mut source), 0);
    }

    #[test]
    fn mouse_button_events_update_position_without_motion() {
        let mut input = Input::new();
        input.parse_input_event(InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: true,
            position: Vec2::new(40.0, 30.0),
        });

        assert_eq!(input.mouse_position(), Vec2::new(40.0, 30.0));
        assert!(input.is_mouse_button_just_pressed(MouseButton::Left));
        assert!(input
            .mouse_button_mask()
            .contains(MouseButtonMask::LEFT));

        input.end_frame(1.0 / 60.0);
        // Clicks carry no relative delta, so no speed.
        assert_eq!(input.last_mouse_speed(), Vec2::ZERO);
    }

    #[test]
    fn disconnect_releases_held_buttons_and_bound_actions() {
        use crate::action::SlotFilter;

        let mut input = Input::new();
        input.bind_action(
            "fire",
            ActionTrigger::JoyButton {
                slot: SlotFilter::Any,
                button: 7,
            },
        );
        input.joy_connection_changed(0, true, "Pad", "guid-0");
        input.parse_input_event(InputEvent::JoyButton {
            slot: 0,
            button: 7,
            pressed: true,
        });
        input.end_frame(1.0 / 60.0);
        assert!(input.is_action_pressed("fire"));

        input.joy_connection_changed(0, false, "", "");

        assert!(!input.is_joy_button_pressed(0, 7));
        assert!(input.is_joy_button_just_released(0, 7));
        assert!(!input.is_action_pressed("fire"));
        assert!(input.is_action_just_released("fire"));
        assert_eq!(input.joy_axis(0, 0), 0.0);
        assert_eq!(input.joy_name(0), "");
    }

    #[test]
    fn touchscreen_emulation_is_a_plain_flag() {
        let mut input = Input::new();
        assert!(!input.is_emulating_touchscreen());
        input.set_emulate_touchscreen(true);
        assert!(input.is_emulating_touchscreen());
    }

    #[test]
    fn snapshot_captures_the_polling_surface() {
        let mut input = Input::new();
        input.bind_action("jump", ActionTrigger::Key { key: Key(32) });
        input.joy_connection_changed(1, true, "Pad", "g1");
        input.parse_input_event(key_event(32, true));
        input.parse_input_event(InputEvent::MouseMotion {
            position: Vec2::new(12.0, 8.0),
            relative: Vec2::new(2.0, 1.0),
        });

        let snap = input.snapshot();
        assert!(snap.action("jump").pressed);
        assert!(snap.action("jump").just_pressed);
        assert!(!snap.action("missing").pressed);
        assert_eq!(snap.mouse_position, Vec2::new(12.0, 8.0));
        assert_eq!(snap.connected_joypads, vec![1]);

        // The snapshot is a copy: later events do not touch it.
        input.parse_input_event(key_event(32, false));
        assert!(snap.action("jump").pressed);
    }
}
