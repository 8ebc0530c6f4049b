//! Mouse buttons, cursor modes, and the cursor-side state tracker.
//!
//! Button *pressed* state and per-frame edges live in the
//! [`StateStore`](crate::state::StateStore) with every other button; this
//! module owns what is specific to the pointer: position, per-frame speed,
//! capture mode, the custom cursor request, and the wrap-around warp used by
//! capture emulation.
//!
//! ## Position vs. motion
//! Motion events update position *and* accumulate their `relative` delta into
//! the speed window; button events update position only (they carry no
//! delta). [`MouseState::warp`] teleports the cursor without contributing
//! motion, since a warp is not something the user did with the device.

use bitflags::bitflags;
use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
///
/// Indices start at 1 so that the mask bit for button `n` is `1 << (n - 1)`,
/// matching what most windowing layers report. Wheel "buttons" are pulses:
/// platforms deliver a press immediately followed by a release per detent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum MouseButton {
    Left = 1,
    Right = 2,
    Middle = 3,
    WheelUp = 4,
    WheelDown = 5,
    WheelLeft = 6,
    WheelRight = 7,
    Extra1 = 8,
    Extra2 = 9,
}

impl MouseButton {
    /// The mask bit for this button.
    #[inline]
    pub fn mask(self) -> MouseButtonMask {
        MouseButtonMask::from_bits_truncate(1 << (self as u16 - 1))
    }
}

bitflags! {
    /// Set of currently held mouse buttons.
    ///
    /// Bit layout is `1 << (button_index - 1)`, see [`MouseButton`].
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct MouseButtonMask: u16 {
        const LEFT = 1 << 0;
        const RIGHT = 1 << 1;
        const MIDDLE = 1 << 2;
        const WHEEL_UP = 1 << 3;
        const WHEEL_DOWN = 1 << 4;
        const WHEEL_LEFT = 1 << 5;
        const WHEEL_RIGHT = 1 << 6;
        const EXTRA1 = 1 << 7;
        const EXTRA2 = 1 << 8;
    }
}

/// Cursor visibility and confinement, as requested by the application.
///
/// The facade records the mode; actually hiding, capturing, or confining the
/// OS cursor is the platform layer's job. Discriminants are stable and safe
/// to persist.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum MouseMode {
    /// Cursor visible and free.
    #[default]
    Visible = 0,
    /// Cursor hidden but free.
    Hidden = 1,
    /// Cursor hidden and pinned; only relative motion flows.
    Captured = 2,
    /// Cursor visible but confined to the window.
    Confined = 3,
}

/// Application-supplied cursor image request.
///
/// `resource` is an opaque handle (a path, an asset key) that the platform
/// layer resolves; the facade just stores and hands it back.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CustomCursor {
    pub resource: String,
    /// Hotspot offset from the image's top-left corner, in pixels.
    pub hotspot: Vec2,
}

/// Axis-aligned rectangle in window coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub position: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }
}

/// Cursor-side state: position, speed window, mode, and cursor requests.
///
/// Owned by [`Input`](crate::input::Input); the mutators are crate-internal
/// because they must run inside the facade's event dispatch to keep state and
/// listeners in sync.
#[derive(Clone, Debug, Default)]
pub struct MouseState {
    mode: MouseMode,
    position: Vec2,
    last_speed: Vec2,
    frame_motion: Vec2,
    cursor: Option<CustomCursor>,
    // False until the windowing layer first reports the cursor inside.
    in_window: bool,
}

impl MouseState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requested cursor mode.
    #[inline]
    pub fn mode(&self) -> MouseMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: MouseMode) {
        self.mode = mode;
    }

    /// Last known cursor position in window coordinates.
    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Motion over the previous frame divided by that frame's delta time.
    ///
    /// Updated by [`end_frame`](Self::end_frame); reads the same value however
    /// often it is polled within a frame.
    #[inline]
    pub fn last_speed(&self) -> Vec2 {
        self.last_speed
    }

    /// The pending custom cursor request, if any.
    #[inline]
    pub fn custom_cursor(&self) -> Option<&CustomCursor> {
        self.cursor.as_ref()
    }

    pub fn set_custom_cursor(&mut self, cursor: CustomCursor) {
        self.cursor = Some(cursor);
    }

    /// Reverts to the platform's default cursor image.
    pub fn clear_custom_cursor(&mut self) {
        self.cursor = None;
    }

    /// Whether the windowing layer last reported the cursor inside the window.
    #[inline]
    pub fn is_in_window(&self) -> bool {
        self.in_window
    }

    pub fn set_in_window(&mut self, inside: bool) {
        self.in_window = inside;
    }

    /// Applies a motion event: moves the cursor and feeds the speed window.
    pub(crate) fn record_motion(&mut self, position: Vec2, relative: Vec2) {
        self.position = position;
        self.frame_motion += relative;
    }

    /// Updates position without contributing motion (button events, warps).
    pub(crate) fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Teleports the cursor. Does not count as motion.
    pub(crate) fn warp(&mut self, to: Vec2) {
        self.position = to;
    }

    /// Wraps a motion delta around `rect`, teleporting the cursor back inside
    /// when it escaped and returning the corrected integer delta.
    ///
    /// Used to emulate captured mode on platforms that cannot pin the OS
    /// cursor: call it with each motion event's `relative` after dispatching
    /// the event, and integrate the returned delta instead of the raw one.
    /// The correction folds the teleport back out of the delta, so a cursor
    /// that wrapped from one edge to the other still yields a small motion.
    pub(crate) fn warp_motion(&mut self, relative: Vec2, rect: &Rect) -> IVec2 {
        if rect.size.x <= 0.0 || rect.size.y <= 0.0 {
            return IVec2::new(relative.x as i32, relative.y as i32);
        }

        // Fold deltas larger than half the rect back into range, preserving sign.
        let margin = rect.size * 0.5;
        let sign = Vec2::new(
            if relative.x >= 0.0 { 1.0 } else { -1.0 },
            if relative.y >= 0.0 { 1.0 } else { -1.0 },
        );
        let corrected = Vec2::new(
            (relative.x + sign.x * margin.x) % rect.size.x - sign.x * margin.x,
            (relative.y + sign.y * margin.y) % rect.size.y - sign.y * margin.y,
        );

        let local = self.position - rect.position;
        let wrapped = Vec2::new(
            local.x.rem_euclid(rect.size.x),
            local.y.rem_euclid(rect.size.y),
        );
        if wrapped != local {
            self.position = wrapped + rect.position;
        }

        IVec2::new(corrected.x as i32, corrected.y as i32)
    }

    /// Closes the frame's speed window.
    ///
    /// With `delta > 0` the accumulated motion becomes the new
    /// [`last_speed`](Self::last_speed); otherwise the previous speed is kept.
    /// The window resets either way.
    pub(crate) fn end_frame(&mut self, delta: f32) {
        if delta > 0.0 {
            self.last_speed = self.frame_motion / delta;
        }
        self.frame_motion = Vec2::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_masks_use_index_minus_one_bits() {
        assert_eq!(MouseButton::Left.mask(), MouseButtonMask::LEFT);
        assert_eq!(MouseButton::Middle.mask(), MouseButtonMask::MIDDLE);
        assert_eq!(MouseButton::WheelDown.mask(), MouseButtonMask::WHEEL_DOWN);
        assert_eq!(MouseButton::Extra2.mask(), MouseButtonMask::EXTRA2);
        assert_eq!(MouseButton::Extra2.mask().bits(), 1 << 8);
    }

    #[test]
    fn mouse_mode_discriminants_are_stable() {
        assert_eq!(MouseMode::Visible as u8, 0);
        assert_eq!(MouseMode::Hidden as u8, 1);
        assert_eq!(MouseMode::Captured as u8, 2);
        assert_eq!(MouseMode::Confined as u8, 3);
    }

    #[test]
    fn speed_is_motion_over_delta_and_stable_within_frame() {
        let mut mouse = MouseState::new();
        mouse.record_motion(Vec2::new(4.0, 0.0), Vec2::new(4.0, 0.0));
        mouse.record_motion(Vec2::new(10.0, 2.0), Vec2::new(6.0, 2.0));

        // Not yet folded into speed.
        assert_eq!(mouse.last_speed(), Vec2::ZERO);

        mouse.end_frame(0.5);
        assert_eq!(mouse.last_speed(), Vec2::new(20.0, 4.0));
        assert_eq!(mouse.last_speed(), Vec2::new(20.0, 4.0));

        // Zero delta keeps the previous reading.
        mouse.record_motion(Vec2::new(11.0, 2.0), Vec2::new(1.0, 0.0));
        mouse.end_frame(0.0);
        assert_eq!(mouse.last_speed(), Vec2::new(20.0, 4.0));
    }

    #[test]
    fn warp_does_not_feed_the_speed_window() {
        let mut mouse = MouseState::new();
        mouse.warp(Vec2::new(500.0, 500.0));
        mouse.end_frame(1.0);
        assert_eq!(mouse.last_speed(), Vec2::ZERO);
        assert_eq!(mouse.position(), Vec2::new(500.0, 500.0));
    }

    #[test]
    fn warp_motion_wraps_position_back_into_rect() {
        let mut mouse = MouseState::new();
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);

        // Cursor escaped the right edge by 5 units.
        mouse.record_motion(Vec2::new(105.0, 50.0), Vec2::new(10.0, 0.0));
        let corrected = mouse.warp_motion(Vec2::new(10.0, 0.0), &rect);

        assert_eq!(mouse.position(), Vec2::new(5.0, 50.0));
        // Small delta passes through unchanged.
        assert_eq!(corrected, IVec2::new(10, 0));
    }

    #[test]
    fn warp_motion_folds_deltas_spanning_the_rect() {
        let mut mouse = MouseState::new();
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);

        mouse.set_position(Vec2::new(30.0, 50.0));
        // A delta of 80 crosses the wrap; the effective motion is -20.
        let corrected = mouse.warp_motion(Vec2::new(80.0, 0.0), &rect);
        assert_eq!(corrected, IVec2::new(-20, 0));
    }

    #[test]
    fn warp_motion_handles_offset_rects() {
        let mut mouse = MouseState::new();
        let rect = Rect::new(100.0, 100.0, 50.0, 50.0);

        mouse.set_position(Vec2::new(96.0, 120.0));
        let _ = mouse.warp_motion(Vec2::new(-6.0, 0.0), &rect);

        // -4 local wraps to 46 local, i.e. 146 in window coordinates.
        assert_eq!(mouse.position(), Vec2::new(146.0, 120.0));
    }

    #[test]
    fn degenerate_rect_passes_delta_through() {
        let mut mouse = MouseState::new();
        let rect = Rect::new(0.0, 0.0, 0.0, 100.0);
        mouse.set_position(Vec2::new(10.0, 10.0));
        let corrected = mouse.warp_motion(Vec2::new(7.0, -3.0), &rect);
        assert_eq!(corrected, IVec2::new(7, -3));
        assert_eq!(mouse.position(), Vec2::new(10.0, 10.0));
    }
}
