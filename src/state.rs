//! Frame-coherent pressed state for keys, mouse buttons, and joypads.
//!
//! The [`StateStore`] is the single place raw pressed state lives. Events
//! mutate it as they arrive; pollers read it at any point in the frame and
//! always see the same answer. Alongside the current state it tracks two edge
//! sets per input class, *just pressed* and *just released*, holding exactly
//! the transitions that happened since the last
//! [`end_frame`](StateStore::end_frame).
//!
//! ## Edge rules
//! - A press marks *just pressed* and clears any *just released* left from
//!   earlier in the same frame. A release does the mirror image.
//! - Pressing an already-held input, or releasing one that is not held, is a
//!   no-op and produces no edge.
//! - An input is never in both edge sets at once, and *just pressed* implies
//!   currently pressed while *just released* implies currently released.
//!
//! Edges survive for exactly one frame: they become observable the moment the
//! event is applied and vanish at the next `end_frame`, however many times
//! they were polled in between.

use std::collections::{HashMap, HashSet};

use glam::Vec3;

use crate::event::Key;
use crate::mouse::{MouseButton, MouseButtonMask};

/// Pressed state plus this frame's edges for one input or action.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ButtonState {
    pub pressed: bool,
    pub just_pressed: bool,
    pub just_released: bool,
}

/// Latest readings from the host's motion sensors.
///
/// Plain last-value storage in whatever units the platform reports
/// (conventionally m/s² for accelerometer and gravity, µT for magnetometer,
/// rad/s for gyroscope). Zero until first set.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Sensors {
    pub accelerometer: Vec3,
    pub gravity: Vec3,
    pub magnetometer: Vec3,
    pub gyroscope: Vec3,
}

/// Raw pressed/axis state for every input class, with per-frame edge sets.
///
/// Mutators are crate-internal: events must flow through
/// [`Input::parse_input_event`](crate::input::Input::parse_input_event) so
/// that actions and listeners stay in sync with the store.
#[derive(Clone, Debug, Default)]
pub struct StateStore {
    keys_down: HashSet<Key>,
    keys_just_pressed: HashSet<Key>,
    keys_just_released: HashSet<Key>,

    mouse_mask: MouseButtonMask,
    mouse_just_pressed: HashSet<MouseButton>,
    mouse_just_released: HashSet<MouseButton>,

    joy_buttons_down: HashSet<(u32, u32)>,
    joy_just_pressed: HashSet<(u32, u32)>,
    joy_just_released: HashSet<(u32, u32)>,
    joy_axes: HashMap<(u32, u32), f32>,

    sensors: Sensors,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- queries ----

    #[inline]
    pub fn is_key_pressed(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    #[inline]
    pub fn is_key_just_pressed(&self, key: Key) -> bool {
        self.keys_just_pressed.contains(&key)
    }

    #[inline]
    pub fn is_key_just_released(&self, key: Key) -> bool {
        self.keys_just_released.contains(&key)
    }

    /// Pressed state and edges for one key, as a single value.
    pub fn key_state(&self, key: Key) -> ButtonState {
        ButtonState {
            pressed: self.is_key_pressed(key),
            just_pressed: self.is_key_just_pressed(key),
            just_released: self.is_key_just_released(key),
        }
    }

    #[inline]
    pub fn is_mouse_button_pressed(&self, button: MouseButton) -> bool {
        self.mouse_mask.contains(button.mask())
    }

    #[inline]
    pub fn is_mouse_button_just_pressed(&self, button: MouseButton) -> bool {
        self.mouse_just_pressed.contains(&button)
    }

    #[inline]
    pub fn is_mouse_button_just_released(&self, button: MouseButton) -> bool {
        self.mouse_just_released.contains(&button)
    }

    /// Pressed state and edges for one mouse button, as a single value.
    pub fn mouse_button_state(&self, button: MouseButton) -> ButtonState {
        ButtonState {
            pressed: self.is_mouse_button_pressed(button),
            just_pressed: self.is_mouse_button_just_pressed(button),
            just_released: self.is_mouse_button_just_released(button),
        }
    }

    /// Mask of all currently held mouse buttons.
    #[inline]
    pub fn mouse_button_mask(&self) -> MouseButtonMask {
        self.mouse_mask
    }

    #[inline]
    pub fn is_joy_button_pressed(&self, slot: u32, button: u32) -> bool {
        self.joy_buttons_down.contains(&(slot, button))
    }

    #[inline]
    pub fn is_joy_button_just_pressed(&self, slot: u32, button: u32) -> bool {
        self.joy_just_pressed.contains(&(slot, button))
    }

    #[inline]
    pub fn is_joy_button_just_released(&self, slot: u32, button: u32) -> bool {
        self.joy_just_released.contains(&(slot, button))
    }

    /// Pressed state and edges for one joypad button, as a single value.
    pub fn joy_button_state(&self, slot: u32, button: u32) -> ButtonState {
        ButtonState {
            pressed: self.is_joy_button_pressed(slot, button),
            just_pressed: self.is_joy_button_just_pressed(slot, button),
            just_released: self.is_joy_button_just_released(slot, button),
        }
    }

    /// Latest value of a joypad axis, `0.0` when never reported.
    #[inline]
    pub fn joy_axis(&self, slot: u32, axis: u32) -> f32 {
        self.joy_axes.get(&(slot, axis)).copied().unwrap_or(0.0)
    }

    /// True if `button` is held on any connected slot.
    pub fn any_joy_button_pressed(&self, button: u32) -> bool {
        self.joy_buttons_down.iter().any(|&(_, b)| b == button)
    }

    /// True if `axis` on any slot satisfies `test`.
    pub fn any_joy_axis(&self, axis: u32, test: impl Fn(f32) -> bool) -> bool {
        self.joy_axes
            .iter()
            .any(|(&(_, a), &value)| a == axis && test(value))
    }

    #[inline]
    pub fn sensors(&self) -> &Sensors {
        &self.sensors
    }

    // ---- mutators (driven by event dispatch) ----

    /// Applies a key transition. Returns whether pressed state changed.
    pub(crate) fn apply_key(&mut self, key: Key, pressed: bool) -> bool {
        if pressed {
            if self.keys_down.insert(key) {
                self.keys_just_pressed.insert(key);
                self.keys_just_released.remove(&key);
                return true;
            }
        } else if self.keys_down.remove(&key) {
            self.keys_just_released.insert(key);
            self.keys_just_pressed.remove(&key);
            return true;
        }
        false
    }

    /// Applies a mouse button transition. Returns whether state changed.
    pub(crate) fn apply_mouse_button(&mut self, button: MouseButton, pressed: bool) -> bool {
        let bit = button.mask();
        if pressed {
            if !self.mouse_mask.contains(bit) {
                self.mouse_mask.insert(bit);
                self.mouse_just_pressed.insert(button);
                self.mouse_just_released.remove(&button);
                return true;
            }
        } else if self.mouse_mask.contains(bit) {
            self.mouse_mask.remove(bit);
            self.mouse_just_released.insert(button);
            self.mouse_just_pressed.remove(&button);
            return true;
        }
        false
    }

    /// Applies a joypad button transition. Returns whether state changed.
    pub(crate) fn apply_joy_button(&mut self, slot: u32, button: u32, pressed: bool) -> bool {
        let id = (slot, button);
        if pressed {
            if self.joy_buttons_down.insert(id) {
                self.joy_just_pressed.insert(id);
                self.joy_just_released.remove(&id);
                return true;
            }
        } else if self.joy_buttons_down.remove(&id) {
            self.joy_just_released.insert(id);
            self.joy_just_pressed.remove(&id);
            return true;
        }
        false
    }

    /// Stores an axis value verbatim. Returns whether the value changed.
    pub(crate) fn set_joy_axis(&mut self, slot: u32, axis: u32, value: f32) -> bool {
        self.joy_axes.insert((slot, axis), value) != Some(value)
    }

    /// Drops all state for a disconnected slot.
    ///
    /// Held buttons release with a normal *just released* edge so that
    /// pollers and actions see an unplugged pad let go of everything rather
    /// than holding it forever. Returns the released buttons and the axes
    /// that were reporting, so dependent action state can be refreshed.
    pub(crate) fn clear_joypad(&mut self, slot: u32) -> (Vec<u32>, Vec<u32>) {
        let released: Vec<u32> = self
            .joy_buttons_down
            .iter()
            .filter(|&&(s, _)| s == slot)
            .map(|&(_, b)| b)
            .collect();
        for &button in &released {
            let id = (slot, button);
            self.joy_buttons_down.remove(&id);
            self.joy_just_released.insert(id);
            self.joy_just_pressed.remove(&id);
        }

        let axes: Vec<u32> = self
            .joy_axes
            .keys()
            .filter(|&&(s, _)| s == slot)
            .map(|&(_, a)| a)
            .collect();
        self.joy_axes.retain(|&(s, _), _| s != slot);

        (released, axes)
    }

    pub(crate) fn set_accelerometer(&mut self, value: Vec3) {
        self.sensors.accelerometer = value;
    }

    pub(crate) fn set_gravity(&mut self, value: Vec3) {
        self.sensors.gravity = value;
    }

    pub(crate) fn set_magnetometer(&mut self, value: Vec3) {
        self.sensors.magnetometer = value;
    }

    pub(crate) fn set_gyroscope(&mut self, value: Vec3) {
        self.sensors.gyroscope = value;
    }

    /// Clears every edge set. Pressed state and axis values carry over.
    pub(crate) fn end_frame(&mut self) {
        self.keys_just_pressed.clear();
        self.keys_just_released.clear();
        self.mouse_just_pressed.clear();
        self.mouse_just_released.clear();
        self.joy_just_pressed.clear();
        self.joy_just_released.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_sets_edge_for_exactly_one_frame() {
        let mut store = StateStore::new();

        assert!(store.apply_key(Key(10), true));
        assert!(store.is_key_pressed(Key(10)));
        assert!(store.is_key_just_pressed(Key(10)));
        assert!(!store.is_key_just_released(Key(10)));

        // Polling again within the frame sees the same edge.
        assert!(store.is_key_just_pressed(Key(10)));

        store.end_frame();
        assert!(store.is_key_pressed(Key(10)));
        assert!(!store.is_key_just_pressed(Key(10)));
    }

    #[test]
    fn repeated_press_produces_no_second_edge() {
        let mut store = StateStore::new();
        store.apply_key(Key(3), true);
        store.end_frame();

        assert!(!store.apply_key(Key(3), true));
        assert!(store.is_key_pressed(Key(3)));
        assert!(!store.is_key_just_pressed(Key(3)));
    }

    #[test]
    fn release_without_press_is_a_no_op() {
        let mut store = StateStore::new();
        assert!(!store.apply_key(Key(7), false));
        assert!(!store.is_key_just_released(Key(7)));
    }

    #[test]
    fn press_then_release_same_frame_reports_only_release() {
        let mut store = StateStore::new();
        store.apply_key(Key(5), true);
        store.apply_key(Key(5), false);

        assert!(!store.is_key_pressed(Key(5)));
        assert!(!store.is_key_just_pressed(Key(5)));
        assert!(store.is_key_just_released(Key(5)));
    }

    #[test]
    fn release_then_press_same_frame_reports_only_press() {
        let mut store = StateStore::new();
        store.apply_key(Key(5), true);
        store.end_frame();

        store.apply_key(Key(5), false);
        store.apply_key(Key(5), true);

        assert!(store.is_key_pressed(Key(5)));
        assert!(store.is_key_just_pressed(Key(5)));
        assert!(!store.is_key_just_released(Key(5)));
    }

    #[test]
    fn mouse_mask_tracks_held_buttons() {
        let mut store = StateStore::new();
        store.apply_mouse_button(MouseButton::Left, true);
        store.apply_mouse_button(MouseButton::Right, true);

        assert_eq!(
            store.mouse_button_mask(),
            MouseButtonMask::LEFT | MouseButtonMask::RIGHT
        );

        store.apply_mouse_button(MouseButton::Left, false);
        assert_eq!(store.mouse_button_mask(), MouseButtonMask::RIGHT);
        assert!(store.is_mouse_button_just_released(MouseButton::Left));
    }

    #[test]
    fn joy_buttons_are_tracked_per_slot() {
        let mut store = StateStore::new();
        store.apply_joy_button(0, 4, true);

        assert!(store.is_joy_button_pressed(0, 4));
        assert!(!store.is_joy_button_pressed(1, 4));
        assert!(store.any_joy_button_pressed(4));
        assert!(!store.any_joy_button_pressed(5));
    }

    #[test]
    fn unknown_axis_reads_zero() {
        let store = StateStore::new();
        assert_eq!(store.joy_axis(9, 9), 0.0);
    }

    #[test]
    fn clear_joypad_releases_held_buttons_with_edges() {
        let mut store = StateStore::new();
        store.apply_joy_button(2, 0, true);
        store.apply_joy_button(2, 1, true);
        store.apply_joy_button(3, 0, true);
        store.set_joy_axis(2, 0, 0.8);
        store.end_frame();

        let (mut released, axes) = store.clear_joypad(2);
        released.sort_unstable();
        assert_eq!(released, vec![0, 1]);
        assert_eq!(axes, vec![0]);

        assert!(!store.is_joy_button_pressed(2, 0));
        assert!(store.is_joy_button_just_released(2, 0));
        assert!(store.is_joy_button_just_released(2, 1));
        assert_eq!(store.joy_axis(2, 0), 0.0);

        // The other pad is untouched.
        assert!(store.is_joy_button_pressed(3, 0));
    }

    #[test]
    fn composite_state_mirrors_the_three_flags() {
        let mut store = StateStore::new();
        store.apply_key(Key(8), true);
        store.apply_mouse_button(MouseButton::Left, true);

        assert_eq!(
            store.key_state(Key(8)),
            ButtonState {
                pressed: true,
                just_pressed: true,
                just_released: false,
            }
        );
        store.end_frame();
        store.apply_mouse_button(MouseButton::Left, false);

        let mouse = store.mouse_button_state(MouseButton::Left);
        assert!(!mouse.pressed && mouse.just_released);

        // Never-touched inputs read as all-false.
        assert_eq!(store.joy_button_state(6, 6), ButtonState::default());
    }

    #[test]
    fn sensors_default_to_zero_and_hold_last_value() {
        let mut store = StateStore::new();
        assert_eq!(store.sensors().gyroscope, Vec3::ZERO);

        store.set_gyroscope(Vec3::new(0.1, 0.0, 0.0));
        store.set_gravity(Vec3::new(0.0, -9.81, 0.0));
        store.end_frame();

        // Frame boundaries do not touch sensor readings.
        assert_eq!(store.sensors().gyroscope, Vec3::new(0.1, 0.0, 0.0));
        assert_eq!(store.sensors().gravity, Vec3::new(0.0, -9.81, 0.0));
    }
}
