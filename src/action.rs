//! Named actions bound to physical inputs.
//!
//! An action ("jump", "fire") aggregates any number of [`ActionTrigger`]s: it
//! is pressed while at least one bound input is active, or while a synthetic
//! press from [`Input::action_press`](crate::input::Input::action_press) is
//! outstanding. Edge flags are derived from transitions of that *aggregate*,
//! not from the edges of individual inputs: if one bound key releases in the
//! same frame another one presses, the action was pressed before and after
//! and reports no edge at all.
//!
//! Aggregates are refreshed incrementally as events arrive, so queries stay
//! O(1) however often a frame polls. Binding mutations (bind, unbind, profile
//! loads) resync the pressed value against current device state *without*
//! manufacturing edges: a config change is not something the player did.
//!
//! Profiles are plain serde data and load from TOML or JSON:
//!
//! ```toml
//! name = "default"
//!
//! [actions.jump]
//! triggers = [
//!     { type = "key", key = 32 },
//!     { type = "joy_button", slot = "any", button = 0 },
//! ]
//!
//! [actions.fire]
//! triggers = [
//!     { type = "mouse_button", button = "left" },
//!     { type = "joy_axis", slot = 0, axis = 5, threshold = 0.6 },
//! ]
//! ```

use std::collections::BTreeMap;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::InputError;
use crate::event::{InputEvent, Key};
use crate::mouse::MouseButton;
use crate::state::{ButtonState, StateStore};

/// Axis triggers activate at this threshold unless the profile says otherwise.
pub const DEFAULT_AXIS_THRESHOLD: f32 = 0.5;

/// Which joypad slots a trigger listens to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SlotFilter {
    /// Match the given input on every connected slot.
    #[default]
    Any,
    /// Match only this slot.
    Slot(u32),
}

impl SlotFilter {
    #[inline]
    pub fn admits(self, slot: u32) -> bool {
        match self {
            SlotFilter::Any => true,
            SlotFilter::Slot(wanted) => wanted == slot,
        }
    }
}

// In profiles a slot filter is either the string "any" or a bare index.
impl Serialize for SlotFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SlotFilter::Any => serializer.serialize_str("any"),
            SlotFilter::Slot(index) => serializer.serialize_u32(*index),
        }
    }
}

impl<'de> Deserialize<'de> for SlotFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Name(String),
            Index(u32),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Name(name) if name.eq_ignore_ascii_case("any") => Ok(SlotFilter::Any),
            Repr::Name(name) => Err(de::Error::custom(format!(
                "invalid slot filter '{name}', expected \"any\" or a slot index"
            ))),
            Repr::Index(index) => Ok(SlotFilter::Slot(index)),
        }
    }
}

/// Which half of an axis a trigger listens to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisDirection {
    #[default]
    Positive,
    Negative,
}

/// One physical input that can drive an action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionTrigger {
    /// A keyboard key.
    Key { key: Key },

    /// A mouse button.
    MouseButton { button: MouseButton },

    /// A joypad button, on one slot or any.
    JoyButton {
        #[serde(default)]
        slot: SlotFilter,
        button: u32,
    },

    /// A joypad axis treated as a button: active while the value is past
    /// `threshold` in the given direction.
    JoyAxis {
        #[serde(default)]
        slot: SlotFilter,
        axis: u32,
        #[serde(default = "default_threshold")]
        threshold: f32,
        #[serde(default)]
        direction: AxisDirection,
    },
}

fn default_threshold() -> f32 {
    DEFAULT_AXIS_THRESHOLD
}

impl ActionTrigger {
    /// Whether an observed input identity could change this trigger's state.
    fn matches(&self, input: &BoundInput) -> bool {
        match (self, input) {
            (ActionTrigger::Key { key }, BoundInput::Key(k)) => key == k,
            (ActionTrigger::MouseButton { button }, BoundInput::MouseButton(b)) => button == b,
            (ActionTrigger::JoyButton { slot, button }, BoundInput::JoyButton(s, b)) => {
                slot.admits(*s) && button == b
            }
            (ActionTrigger::JoyAxis { slot, axis, .. }, BoundInput::JoyAxis(s, a)) => {
                slot.admits(*s) && axis == a
            }
            _ => false,
        }
    }

    /// Whether this trigger is active against current device state.
    fn is_active(&self, store: &StateStore) -> bool {
        match *self {
            ActionTrigger::Key { key } => store.is_key_pressed(key),
            ActionTrigger::MouseButton { button } => store.is_mouse_button_pressed(button),
            ActionTrigger::JoyButton { slot, button } => match slot {
                SlotFilter::Any => store.any_joy_button_pressed(button),
                SlotFilter::Slot(s) => store.is_joy_button_pressed(s, button),
            },
            ActionTrigger::JoyAxis {
                slot,
                axis,
                threshold,
                direction,
            } => {
                let past = move |value: f32| match direction {
                    AxisDirection::Positive => value >= threshold,
                    AxisDirection::Negative => value <= -threshold,
                };
                match slot {
                    SlotFilter::Any => store.any_joy_axis(axis, past),
                    SlotFilter::Slot(s) => past(store.joy_axis(s, axis)),
                }
            }
        }
    }

    fn validate(&self, action: &str) -> Result<(), InputError> {
        if let ActionTrigger::JoyAxis { threshold, .. } = self {
            if !threshold.is_finite() || *threshold <= 0.0 || *threshold > 1.0 {
                return Err(InputError::InvalidProfile(format!(
                    "action '{action}': axis threshold must be within (0, 1], got {threshold}"
                )));
            }
        }
        Ok(())
    }
}

/// Identity of an input observed in an event, for trigger matching.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BoundInput {
    Key(Key),
    MouseButton(MouseButton),
    JoyButton(u32, u32),
    JoyAxis(u32, u32),
}

impl BoundInput {
    /// The bindable identity carried by an event, if any.
    pub(crate) fn from_event(event: &InputEvent) -> Option<Self> {
        match *event {
            InputEvent::Key { key, .. } => Some(BoundInput::Key(key)),
            InputEvent::MouseButton { button, .. } => Some(BoundInput::MouseButton(button)),
            InputEvent::JoyButton { slot, button, .. } => {
                Some(BoundInput::JoyButton(slot, button))
            }
            InputEvent::JoyAxis { slot, axis, .. } => Some(BoundInput::JoyAxis(slot, axis)),
            InputEvent::MouseMotion { .. } | InputEvent::TrackerPose { .. } => None,
        }
    }
}

/// Trigger list for one action, as stored in profiles.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionConfig {
    #[serde(default)]
    pub triggers: Vec<ActionTrigger>,
}

/// A named set of actions, loadable from TOML or JSON.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub actions: BTreeMap<String, ActionConfig>,
}

impl ActionProfile {
    /// Parses a profile from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, InputError> {
        let profile: ActionProfile = toml::from_str(text)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Parses a profile from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, InputError> {
        let profile: ActionProfile = serde_json::from_str(text)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Reads and parses a TOML profile file.
    pub fn load_toml_file(path: impl AsRef<std::path::Path>) -> Result<Self, InputError> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    /// Serializes the profile as pretty JSON, for interchange or editors.
    pub fn to_json_string(&self) -> Result<String, InputError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<(), InputError> {
        for (name, config) in &self.actions {
            if name.is_empty() {
                return Err(InputError::InvalidProfile(
                    "action names must be non-empty".into(),
                ));
            }
            for trigger in &config.triggers {
                trigger.validate(name)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Action {
    triggers: Vec<ActionTrigger>,
    state: ButtonState,
    /// Outstanding synthetic press, ORed into the aggregate.
    synthetic: bool,
}

impl Action {
    fn aggregate(&self, store: &StateStore) -> bool {
        self.synthetic || self.triggers.iter().any(|t| t.is_active(store))
    }

    /// Applies a new aggregate value, deriving edges from the transition.
    fn apply(&mut self, aggregate: bool) {
        if aggregate && !self.state.pressed {
            self.state.pressed = true;
            self.state.just_pressed = true;
            self.state.just_released = false;
        } else if !aggregate && self.state.pressed {
            self.state.pressed = false;
            self.state.just_released = true;
            self.state.just_pressed = false;
        }
    }

    /// Adopts the aggregate without edges, after a binding mutation.
    fn resync(&mut self, store: &StateStore) {
        self.state.pressed = self.aggregate(store);
        self.state.just_pressed = false;
        self.state.just_released = false;
    }
}

/// All registered actions and their current state.
///
/// Owned by [`Input`](crate::input::Input); unknown action names answer with
/// the neutral [`ButtonState`], never an error.
#[derive(Debug, Default)]
pub struct ActionMap {
    actions: BTreeMap<String, Action>,
}

impl ActionMap {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- configuration ----

    /// Registers an action with no triggers. Existing actions are untouched.
    pub fn add_action(&mut self, name: &str) {
        self.actions.entry(name.to_string()).or_default();
    }

    /// Removes an action entirely. Returns whether it existed.
    pub fn erase_action(&mut self, name: &str) -> bool {
        self.actions.remove(name).is_some()
    }

    #[inline]
    pub fn has_action(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    /// Registered action names, sorted.
    pub fn action_names(&self) -> Vec<String> {
        self.actions.keys().cloned().collect()
    }

    /// Triggers currently bound to an action (empty when unknown).
    pub fn triggers(&self, name: &str) -> &[ActionTrigger] {
        self.actions
            .get(name)
            .map(|a| a.triggers.as_slice())
            .unwrap_or(&[])
    }

    /// Adds a trigger, creating the action if needed. Duplicates are ignored.
    pub(crate) fn bind(&mut self, name: &str, trigger: ActionTrigger, store: &StateStore) {
        let action = self.actions.entry(name.to_string()).or_default();
        if !action.triggers.contains(&trigger) {
            action.triggers.push(trigger);
        }
        action.resync(store);
    }

    /// Removes one trigger. Returns whether it was bound.
    pub(crate) fn unbind(&mut self, name: &str, trigger: &ActionTrigger, store: &StateStore) -> bool {
        let Some(action) = self.actions.get_mut(name) else {
            return false;
        };
        let before = action.triggers.len();
        action.triggers.retain(|t| t != trigger);
        let removed = action.triggers.len() != before;
        if removed {
            action.resync(store);
        }
        removed
    }

    /// Removes every trigger from an action, keeping it registered.
    pub(crate) fn clear_bindings(&mut self, name: &str, store: &StateStore) {
        if let Some(action) = self.actions.get_mut(name) {
            action.triggers.clear();
            action.resync(store);
        }
    }

    /// Merges a profile: actions named in it are replaced wholesale, other
    /// registered actions keep their bindings.
    pub(crate) fn load_profile(&mut self, profile: &ActionProfile, store: &StateStore) {
        for (name, config) in &profile.actions {
            let action = self.actions.entry(name.clone()).or_default();
            action.triggers = config.triggers.clone();
            action.resync(store);
        }
    }

    /// Exports current bindings as a profile.
    pub fn to_profile(&self, name: &str) -> ActionProfile {
        ActionProfile {
            name: name.to_string(),
            description: None,
            actions: self
                .actions
                .iter()
                .map(|(action, entry)| {
                    (
                        action.clone(),
                        ActionConfig {
                            triggers: entry.triggers.clone(),
                        },
                    )
                })
                .collect(),
        }
    }

    // ---- state updates ----

    /// Refreshes every action that listens to `input`.
    pub(crate) fn refresh(&mut self, input: &BoundInput, store: &StateStore) {
        for action in self.actions.values_mut() {
            if action.triggers.iter().any(|t| t.matches(input)) {
                let aggregate = action.aggregate(store);
                action.apply(aggregate);
            }
        }
    }

    /// Synthetic press: the action reads pressed until released, regardless
    /// of bound inputs. Unknown names are registered on the fly.
    pub(crate) fn press(&mut self, name: &str) {
        let action = self.actions.entry(name.to_string()).or_default();
        action.synthetic = true;
        action.apply(true);
    }

    /// Withdraws a synthetic press; the action falls back to its bound
    /// inputs, which may keep it held.
    pub(crate) fn release(&mut self, name: &str, store: &StateStore) {
        let action = self.actions.entry(name.to_string()).or_default();
        action.synthetic = false;
        let aggregate = action.aggregate(store);
        action.apply(aggregate);
    }

    pub(crate) fn end_frame(&mut self) {
        for action in self.actions.values_mut() {
            action.state.just_pressed = false;
            action.state.just_released = false;
        }
    }

    // ---- queries ----

    /// Full state for an action; neutral when the name is unknown.
    #[inline]
    pub fn state(&self, name: &str) -> ButtonState {
        self.actions
            .get(name)
            .map(|a| a.state)
            .unwrap_or_default()
    }

    #[inline]
    pub fn is_pressed(&self, name: &str) -> bool {
        self.state(name).pressed
    }

    #[inline]
    pub fn is_just_pressed(&self, name: &str) -> bool {
        self.state(name).just_pressed
    }

    #[inline]
    pub fn is_just_released(&self, name: &str) -> bool {
        self.state(name).just_released
    }

    /// `(name, state)` pairs for every registered action, for snapshots.
    pub fn iter_states(&self) -> impl Iterator<Item = (&str, ButtonState)> {
        self.actions.iter().map(|(name, a)| (name.as_str(), a.state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_trigger(code: u32) -> ActionTrigger {
        ActionTrigger::Key { key: Key(code) }
    }

    #[test]
    fn unknown_action_reports_neutral_state() {
        let map = ActionMap::new();
        assert!(!map.is_pressed("missing"));
        assert!(!map.is_just_pressed("missing"));
        assert!(!map.is_just_released("missing"));
    }

    #[test]
    fn action_presses_when_any_trigger_activates() {
        let mut map = ActionMap::new();
        let mut store = StateStore::new();
        map.bind("jump", key_trigger(32), &store);
        map.bind("jump", key_trigger(38), &store);

        store.apply_key(Key(38), true);
        map.refresh(&BoundInput::Key(Key(38)), &store);

        assert!(map.is_pressed("jump"));
        assert!(map.is_just_pressed("jump"));
    }

    #[test]
    fn second_trigger_while_held_produces_no_edge() {
        let mut map = ActionMap::new();
        let mut store = StateStore::new();
        map.bind("jump", key_trigger(1), &store);
        map.bind("jump", key_trigger(2), &store);

        store.apply_key(Key(1), true);
        map.refresh(&BoundInput::Key(Key(1)), &store);
        map.end_frame();
        store.end_frame();

        store.apply_key(Key(2), true);
        map.refresh(&BoundInput::Key(Key(2)), &store);

        assert!(map.is_pressed("jump"));
        assert!(!map.is_just_pressed("jump"));
    }

    #[test]
    fn trigger_swap_within_a_frame_keeps_action_held_without_edges() {
        let mut map = ActionMap::new();
        let mut store = StateStore::new();
        map.bind("jump", key_trigger(1), &store);
        map.bind("jump", key_trigger(2), &store);

        store.apply_key(Key(1), true);
        map.refresh(&BoundInput::Key(Key(1)), &store);
        map.end_frame();
        store.end_frame();

        // Key 2 lands before key 1 lifts; the aggregate never drops.
        store.apply_key(Key(2), true);
        map.refresh(&BoundInput::Key(Key(2)), &store);
        store.apply_key(Key(1), false);
        map.refresh(&BoundInput::Key(Key(1)), &store);

        assert!(map.is_pressed("jump"));
        assert!(!map.is_just_pressed("jump"));
        assert!(!map.is_just_released("jump"));
    }

    #[test]
    fn release_edge_fires_when_last_trigger_drops() {
        let mut map = ActionMap::new();
        let mut store = StateStore::new();
        map.bind("fire", key_trigger(9), &store);

        store.apply_key(Key(9), true);
        map.refresh(&BoundInput::Key(Key(9)), &store);
        map.end_frame();
        store.end_frame();

        store.apply_key(Key(9), false);
        map.refresh(&BoundInput::Key(Key(9)), &store);

        assert!(!map.is_pressed("fire"));
        assert!(map.is_just_released("fire"));
    }

    #[test]
    fn axis_trigger_respects_threshold_and_direction() {
        let mut map = ActionMap::new();
        let mut store = StateStore::new();
        map.bind(
            "brake",
            ActionTrigger::JoyAxis {
                slot: SlotFilter::Slot(0),
                axis: 1,
                threshold: 0.5,
                direction: AxisDirection::Negative,
            },
            &store,
        );

        store.set_joy_axis(0, 1, -0.4);
        map.refresh(&BoundInput::JoyAxis(0, 1), &store);
        assert!(!map.is_pressed("brake"));

        store.set_joy_axis(0, 1, -0.6);
        map.refresh(&BoundInput::JoyAxis(0, 1), &store);
        assert!(map.is_pressed("brake"));
        assert!(map.is_just_pressed("brake"));

        // Positive deflection does not activate a negative trigger.
        store.set_joy_axis(0, 1, 0.9);
        map.refresh(&BoundInput::JoyAxis(0, 1), &store);
        assert!(!map.is_pressed("brake"));
    }

    #[test]
    fn slot_any_listens_to_every_pad() {
        let mut map = ActionMap::new();
        let mut store = StateStore::new();
        map.bind(
            "jump",
            ActionTrigger::JoyButton {
                slot: SlotFilter::Any,
                button: 0,
            },
            &store,
        );

        store.apply_joy_button(7, 0, true);
        map.refresh(&BoundInput::JoyButton(7, 0), &store);
        assert!(map.is_pressed("jump"));
    }

    #[test]
    fn unbinding_everything_releases_without_edges() {
        let mut map = ActionMap::new();
        let mut store = StateStore::new();
        map.bind("jump", key_trigger(4), &store);

        store.apply_key(Key(4), true);
        map.refresh(&BoundInput::Key(Key(4)), &store);
        map.end_frame();
        store.end_frame();
        assert!(map.is_pressed("jump"));

        map.clear_bindings("jump", &store);
        assert!(!map.is_pressed("jump"));
        assert!(!map.is_just_released("jump"));

        // Still registered, and the key no longer reaches it.
        assert!(map.has_action("jump"));
        store.apply_key(Key(4), false);
        map.refresh(&BoundInput::Key(Key(4)), &store);
        store.apply_key(Key(4), true);
        map.refresh(&BoundInput::Key(Key(4)), &store);
        assert!(!map.is_pressed("jump"));
    }

    #[test]
    fn synthetic_press_and_release_have_edge_discipline() {
        let mut map = ActionMap::new();
        let store = StateStore::new();

        // Unknown name is registered on the fly.
        map.press("cutscene_skip");
        assert!(map.has_action("cutscene_skip"));
        assert!(map.is_pressed("cutscene_skip"));
        assert!(map.is_just_pressed("cutscene_skip"));

        map.end_frame();
        map.release("cutscene_skip", &store);
        assert!(!map.is_pressed("cutscene_skip"));
        assert!(map.is_just_released("cutscene_skip"));
    }

    #[test]
    fn synthetic_release_defers_to_held_bound_input() {
        let mut map = ActionMap::new();
        let mut store = StateStore::new();
        map.bind("fire", key_trigger(11), &store);

        store.apply_key(Key(11), true);
        map.refresh(&BoundInput::Key(Key(11)), &store);
        map.end_frame();

        map.press("fire");
        map.release("fire", &store);

        // The key still holds the action down.
        assert!(map.is_pressed("fire"));
        assert!(!map.is_just_released("fire"));
    }

    #[test]
    fn profile_round_trips_through_toml() {
        let text = r#"
            name = "default"

            [actions.jump]
            triggers = [
                { type = "key", key = 32 },
                { type = "joy_button", slot = "any", button = 0 },
            ]

            [actions.brake]
            triggers = [
                { type = "joy_axis", slot = 1, axis = 2, threshold = 0.25, direction = "negative" },
            ]
        "#;

        let profile = ActionProfile::from_toml_str(text).unwrap();
        assert_eq!(profile.name, "default");
        assert_eq!(profile.actions.len(), 2);
        assert_eq!(
            profile.actions["jump"].triggers[1],
            ActionTrigger::JoyButton {
                slot: SlotFilter::Any,
                button: 0
            }
        );
        assert_eq!(
            profile.actions["brake"].triggers[0],
            ActionTrigger::JoyAxis {
                slot: SlotFilter::Slot(1),
                axis: 2,
                threshold: 0.25,
                direction: AxisDirection::Negative,
            }
        );

        // And back out through JSON interchange.
        let json = profile.to_json_string().unwrap();
        let back = ActionProfile::from_json_str(&json).unwrap();
        assert_eq!(profile, back);
    }

    #[test]
    fn axis_trigger_defaults_apply() {
        let text = r#"
            [actions.throttle]
            triggers = [{ type = "joy_axis", axis = 5 }]
        "#;
        let profile = ActionProfile::from_toml_str(text).unwrap();
        assert_eq!(
            profile.actions["throttle"].triggers[0],
            ActionTrigger::JoyAxis {
                slot: SlotFilter::Any,
                axis: 5,
                threshold: DEFAULT_AXIS_THRESHOLD,
                direction: AxisDirection::Positive,
            }
        );
    }

    #[test]
    fn bad_threshold_is_rejected() {
        for threshold in ["-1.0", "0.0", "1.5", "nan"] {
            let text = format!(
                r#"
                    [actions.bad]
                    triggers = [{{ type = "joy_axis", axis = 0, threshold = {threshold} }}]
                "#
            );
            assert!(
                matches!(
                    ActionProfile::from_toml_str(&text),
                    Err(InputError::InvalidProfile(_))
                ),
                "threshold {threshold} should be rejected"
            );
        }
    }

    #[test]
    fn bad_slot_filter_is_rejected() {
        let text = r#"
            [actions.bad]
            triggers = [{ type = "joy_button", slot = "first", button = 0 }]
        "#;
        assert!(matches!(
            ActionProfile::from_toml_str(text),
            Err(InputError::Toml(_))
        ));
    }

    #[test]
    fn load_profile_replaces_named_actions_only() {
        let mut map = ActionMap::new();
        let store = StateStore::new();
        map.bind("keep", key_trigger(1), &store);
        map.bind("replace", key_trigger(2), &store);

        let mut profile = ActionProfile::default();
        profile.actions.insert(
            "replace".into(),
            ActionConfig {
                triggers: vec![key_trigger(3)],
            },
        );
        map.load_profile(&profile, &store);

        assert_eq!(map.triggers("keep"), &[key_trigger(1)]);
        assert_eq!(map.triggers("replace"), &[key_trigger(3)]);
    }
}
