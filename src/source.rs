//! Pull-style event producers.
//!
//! Platform glue that naturally batches (a message pump, a HID reader
//! thread's outbox, a replay file) can implement [`EventSource`] and let
//! [`Input::pump`](crate::input::Input::pump) drain it once per frame instead
//! of calling `parse_input_event` per event.

use crate::event::{InputEvent, Key};

/// Anything that can be drained for pending events.
pub trait EventSource {
    /// Takes all events accumulated since the last poll, oldest first.
    fn poll(&mut self) -> Vec<InputEvent>;

    /// Stable label for diagnostics.
    fn name(&self) -> &str;
}

/// A scriptable in-memory source.
///
/// Useful for tests, demos, and replaying recorded traces: feed events in
/// any order, then pump them through the facade as if a device produced
/// them.
#[derive(Default)]
pub struct VirtualSource {
    name: String,
    events: Vec<InputEvent>,
}

impl VirtualSource {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            events: Vec::new(),
        }
    }

    /// Queues one event for the next poll.
    pub fn feed(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Queues a whole trace, preserving order.
    pub fn feed_all(&mut self, events: impl IntoIterator<Item = InputEvent>) {
        self.events.extend(events);
    }

    /// Convenience for a non-echo key press.
    pub fn press_key(&mut self, key: Key) {
        self.feed(InputEvent::Key {
            key,
            pressed: true,
            echo: false,
        });
    }

    pub fn release_key(&mut self, key: Key) {
        self.feed(InputEvent::Key {
            key,
            pressed: false,
            echo: false,
        });
    }

    pub fn press_joy_button(&mut self, slot: u32, button: u32) {
        self.feed(InputEvent::JoyButton {
            slot,
            button,
            pressed: true,
        });
    }

    pub fn release_joy_button(&mut self, slot: u32, button: u32) {
        self.feed(InputEvent::JoyButton {
            slot,
            button,
            pressed: false,
        });
    }

    pub fn set_joy_axis(&mut self, slot: u32, axis: u32, value: f32) {
        self.feed(InputEvent::JoyAxis { slot, axis, value });
    }

    /// Events waiting to be polled.
    pub fn pending(&self) -> usize {
        self.events.len()
    }
}

impl EventSource for VirtualSource {
    fn poll(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
