//! Events fed into the facade.
//!
//! Switchboard represents input changes as small, source-agnostic deltas
//! ([`InputEvent`]). Platform glue (a windowing crate, a HID reader, a test
//! script) constructs these and hands them to
//! [`Input::parse_input_event`](crate::input::Input::parse_input_event);
//! everything downstream (state stores, actions, listeners) sees only this
//! type.
//!
//! ## Value conventions
//! - **Joypad axes:** the `value` range is defined by whoever produces the
//!   event. Typical sticks and triggers are normalized to `[-1.0, 1.0]`, and
//!   the default action threshold assumes that, but the facade stores values
//!   verbatim.
//! - **Buttons:** boolean state expressed as press/release edges. A repeated
//!   press for an already-held button is accepted and collapses into the held
//!   state (no second edge).
//! - **Key codes:** [`Key`] is an opaque `u32` in whatever keymap the platform
//!   layer uses. The facade only ever compares codes for equality.
//! - **Mouse positions:** window coordinates, in the same units the platform
//!   reports. `relative` is the delta since the previous motion event and is
//!   what mouse speed is derived from, so captured-mode motion (position
//!   pinned, deltas flowing) still produces speed.
//! - **Key echo:** OS auto-repeat should arrive with `echo: true`; such events
//!   do not touch pressed state or edges but are still forwarded to listeners.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::mouse::MouseButton;
use crate::tracker::Pose;

/// Opaque key code, compared only for equality.
///
/// Use whatever scancode or keycode space the platform layer emits, as long
/// as it is consistent between events and action bindings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Key(pub u32);

/// One input change from any source.
///
/// Joypad variants carry the platform-assigned `slot`; keyboard and mouse are
/// treated as singletons. Events serialize cleanly, so recorded traces can be
/// replayed through the facade byte-for-byte.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// A keyboard key changed, or auto-repeated (`echo`).
    Key { key: Key, pressed: bool, echo: bool },

    /// A mouse button transitioned. `position` is the cursor position at the
    /// time of the click, in window coordinates.
    MouseButton {
        button: MouseButton,
        pressed: bool,
        position: Vec2,
    },

    /// The cursor moved. `relative` is the motion delta since the last
    /// motion event (raw counts in captured mode).
    MouseMotion { position: Vec2, relative: Vec2 },

    /// A joypad button transitioned on the given slot.
    JoyButton { slot: u32, button: u32, pressed: bool },

    /// A joypad axis moved on the given slot.
    JoyAxis { slot: u32, axis: u32, value: f32 },

    /// A positional tracker reported a new pose.
    TrackerPose { index: u32, pose: Pose },
}

impl InputEvent {
    /// The joypad slot this event belongs to, for joypad events only.
    #[inline]
    pub fn joy_slot(&self) -> Option<u32> {
        match *self {
            InputEvent::JoyButton { slot, .. } | InputEvent::JoyAxis { slot, .. } => Some(slot),
            _ => None,
        }
    }

    /// True for keyboard events.
    #[inline]
    pub fn is_key(&self) -> bool {
        matches!(self, InputEvent::Key { .. })
    }

    /// True for mouse button and mouse motion events.
    #[inline]
    pub fn is_mouse(&self) -> bool {
        matches!(
            self,
            InputEvent::MouseButton { .. } | InputEvent::MouseMotion { .. }
        )
    }
}
