//! Push-style delivery for code that wants events, not polls.
//!
//! Every event accepted by the facade is forwarded to registered listeners
//! *after* state and actions have been updated, so a listener that turns
//! around and polls sees a world consistent with the event it was handed.
//! Listeners fire in registration order.

use std::collections::BTreeMap;

use log::debug;

use crate::event::InputEvent;

/// Trait for reacting to events as they are dispatched.
pub trait InputListener: Send {
    fn on_input(&mut self, event: &InputEvent);
}

/// Determines which kinds of events a listener wants to receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventFilter {
    All,
    KeyboardOnly,
    MouseOnly,
    JoypadOnly,
    TrackerOnly,
    Custom(fn(&InputEvent) -> bool),
}

impl EventFilter {
    fn passes(self, event: &InputEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::KeyboardOnly => event.is_key(),
            EventFilter::MouseOnly => event.is_mouse(),
            EventFilter::JoypadOnly => matches!(
                event,
                InputEvent::JoyButton { .. } | InputEvent::JoyAxis { .. }
            ),
            EventFilter::TrackerOnly => matches!(event, InputEvent::TrackerPose { .. }),
            EventFilter::Custom(f) => f(event),
        }
    }
}

/// Listener with its filters and control flags.
struct ListenerEntry {
    listener: Box<dyn InputListener>,
    enabled: bool,
    filter: EventFilter,
    /// When set, only events from this joypad slot get through.
    slot: Option<u32>,
}

/// Registered listeners, keyed by handle.
///
/// Ids are handed out monotonically and listeners iterate in id order, so
/// delivery order matches registration order.
#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    listeners: BTreeMap<u64, ListenerEntry>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener, optionally filtered to a joypad slot.
    /// Returns a handle for later enable/disable/remove calls.
    pub fn add_listener(
        &mut self,
        listener: impl InputListener + 'static,
        filter: EventFilter,
        slot: Option<u32>,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.insert(
            id,
            ListenerEntry {
                listener: Box::new(listener),
                enabled: true,
                filter,
                slot,
            },
        );
        id
    }

    /// Enables a previously registered listener.
    pub fn enable(&mut self, id: u64) {
        if let Some(entry) = self.listeners.get_mut(&id) {
            entry.enabled = true;
        }
    }

    /// Disables (mutes) a listener without removing it.
    pub fn disable(&mut self, id: u64) {
        if let Some(entry) = self.listeners.get_mut(&id) {
            entry.enabled = false;
        }
    }

    /// Unregisters a listener entirely. Returns whether it existed.
    pub fn remove_listener(&mut self, id: u64) -> bool {
        self.listeners.remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Delivers one event to all active and matching listeners.
    pub(crate) fn emit(&mut self, event: &InputEvent) {
        for entry in self.listeners.values_mut() {
            if !entry.enabled {
                continue;
            }

            // A slot-tagged listener only hears its own pad.
            if let Some(wanted) = entry.slot {
                if event.joy_slot() != Some(wanted) {
                    continue;
                }
            }

            if entry.filter.passes(event) {
                entry.listener.on_input(event);
            }
        }
    }
}

/// A listener that logs every event it hears at debug level.
pub struct DebugLogger;

impl DebugLogger {
    pub fn new() -> Self {
        DebugLogger
    }
}

impl Default for DebugLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl InputListener for DebugLogger {
    fn on_input(&mut self, event: &InputEvent) {
        debug!("input event: {event:?}");
    }
}

/// Wraps a listener and filters events based on a user-supplied predicate,
/// for conditions [`EventFilter`] cannot express without a fn pointer.
pub struct FilteredListener {
    predicate: Box<dyn Fn(&InputEvent) -> bool + Send + Sync>,
    inner: Box<dyn InputListener>,
}

impl FilteredListener {
    pub fn new(
        predicate: impl Fn(&InputEvent) -> bool + Send + Sync + 'static,
        inner: Box<dyn InputListener>,
    ) -> Self {
        Self {
            predicate: Box::new(predicate),
            inner,
        }
    }
}

impl InputListener for FilteredListener {
    fn on_input(&mut self, event: &InputEvent) {
        if (self.predicate)(event) {
            self.inner.on_input(event);
        }
    }
}
