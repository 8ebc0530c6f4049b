//! Per-frame snapshot of facade state.
//!
//! [`FrameSnapshot`] is an **owned**, read-only view of the polling surface
//! at a point in time (typically "this frame"). It's produced by
//! [`Input::snapshot`](crate::input::Input::snapshot) and is cheap to clone
//! for fan-out to systems that should not hold a borrow of the facade across
//! their whole update.
//!
//! # Semantics
//! - A snapshot is **immutable**. To refresh, dispatch events and request a
//!   new one.
//! - It captures the action table, the mouse surface, and the connected
//!   joypad slots; raw per-key state stays on the facade, where it is O(1)
//!   to query anyway.
//! - Unknown action names answer with the neutral [`ButtonState`], same as
//!   the live facade.

use std::collections::HashMap;

use glam::Vec2;

use crate::mouse::{MouseButtonMask, MouseMode};
use crate::state::ButtonState;

/// Owned copy of the per-frame polling surface.
#[derive(Clone, Debug, Default)]
pub struct FrameSnapshot {
    pub actions: HashMap<String, ButtonState>,
    pub mouse_position: Vec2,
    pub mouse_speed: Vec2,
    pub mouse_mask: MouseButtonMask,
    pub mouse_mode: MouseMode,
    pub connected_joypads: Vec<u32>,
}

impl FrameSnapshot {
    /// State of a named action at snapshot time.
    #[inline]
    pub fn action(&self, name: &str) -> ButtonState {
        self.actions.get(name).copied().unwrap_or_default()
    }

    /// Iterate `(action, state)` pairs.
    #[inline]
    pub fn iter_actions(&self) -> impl Iterator<Item = (&String, &ButtonState)> {
        self.actions.iter()
    }
}
