//! Joypad slots, vibration requests, and mapping metadata.
//!
//! The platform layer assigns each connected pad a `u32` slot and announces
//! connections through
//! [`Input::joy_connection_changed`](crate::input::Input::joy_connection_changed).
//! Slots are reused: after a disconnect, the next pad may land on the same
//! index, and all queries then describe the new device. Button and axis state
//! lives in the [`StateStore`](crate::state::StateStore); this registry keeps
//! the identity side: names, GUIDs, mapping knowledge, rumble requests.
//!
//! ## Mapping strings
//! `add_mapping` accepts SDL-style lines, `guid,name,<layout...>`. Only the
//! GUID and name are interpreted here; the layout tail is stored verbatim for
//! the platform layer, which is the one translating physical buttons into
//! canonical indices. A pad is *known* while a mapping for its GUID is
//! registered.

use std::collections::{BTreeMap, HashMap};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// Canonical button indices cover `0..JOY_BUTTON_MAX`.
pub const JOY_BUTTON_MAX: u32 = 16;
/// Canonical axis indices cover `0..JOY_AXIS_MAX`.
pub const JOY_AXIS_MAX: u32 = 10;

const BUTTON_NAMES: [&str; JOY_BUTTON_MAX as usize] = [
    "Face Bottom",
    "Face Right",
    "Face Left",
    "Face Top",
    "L",
    "R",
    "L2",
    "R2",
    "L3",
    "R3",
    "Select",
    "Start",
    "DPad Up",
    "DPad Down",
    "DPad Left",
    "DPad Right",
];

const AXIS_NAMES: [&str; JOY_AXIS_MAX as usize] = [
    "Left Stick X",
    "Left Stick Y",
    "Right Stick X",
    "Right Stick Y",
    "L2",
    "R2",
    "Extra 1",
    "Extra 2",
    "Extra 3",
    "Extra 4",
];

/// Display name for a canonical button index, `""` when out of range.
pub fn joy_button_string(button: u32) -> &'static str {
    BUTTON_NAMES.get(button as usize).copied().unwrap_or("")
}

/// Display name for a canonical axis index, `""` when out of range.
pub fn joy_axis_string(axis: u32) -> &'static str {
    AXIS_NAMES.get(axis as usize).copied().unwrap_or("")
}

/// Canonical button index for a display name, case-insensitive.
pub fn joy_button_from_string(name: &str) -> Option<u32> {
    BUTTON_NAMES
        .iter()
        .position(|n| n.eq_ignore_ascii_case(name))
        .map(|i| i as u32)
}

/// Canonical axis index for a display name, case-insensitive.
pub fn joy_axis_from_string(name: &str) -> Option<u32> {
    AXIS_NAMES
        .iter()
        .position(|n| n.eq_ignore_ascii_case(name))
        .map(|i| i as u32)
}

/// Most recent vibration request for a pad.
///
/// `timestamp` is a monotonic request serial, not wall time: every start or
/// stop bumps it, so the platform layer can detect new requests by comparing
/// serials (`duration == 0.0` with fresh magnitudes zero means "stop now").
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vibration {
    /// Weak (high-frequency) motor magnitude, `0.0..=1.0`.
    pub weak: f32,
    /// Strong (low-frequency) motor magnitude, `0.0..=1.0`.
    pub strong: f32,
    /// Requested duration in seconds; `0.0` means until stopped.
    pub duration: f32,
    /// Request serial; larger means newer.
    pub timestamp: u64,
}

/// Identity of one connected pad.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DeviceSlot {
    pub name: String,
    pub guid: String,
    /// Whether a mapping for this pad's GUID is registered.
    pub known: bool,
    pub vibration: Vibration,
}

/// One parsed mapping line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JoyMapping {
    pub guid: String,
    pub name: String,
    /// The layout tail after `guid,name,`; opaque to the facade.
    pub raw: String,
}

impl JoyMapping {
    /// Parses one `guid,name,<layout...>` line.
    pub fn parse(line: &str) -> Result<Self, InputError> {
        let line = line.trim();
        let mut parts = line.splitn(3, ',');

        let guid = parts.next().unwrap_or("").trim();
        if guid.is_empty() || guid.contains(char::is_whitespace) {
            return Err(InputError::MalformedMapping(format!(
                "expected 'guid,name,...', got '{line}'"
            )));
        }

        let name = parts.next().map(str::trim).unwrap_or("");
        if name.is_empty() {
            return Err(InputError::MalformedMapping(format!(
                "mapping for '{guid}' is missing a device name"
            )));
        }

        Ok(Self {
            guid: guid.to_string(),
            name: name.to_string(),
            raw: parts.next().unwrap_or("").to_string(),
        })
    }
}

/// Connected pads and registered mappings.
///
/// Owned by [`Input`](crate::input::Input). Queries about absent slots answer
/// with neutral values; only mapping parsing can fail.
#[derive(Debug, Default)]
pub struct JoypadRegistry {
    slots: BTreeMap<u32, DeviceSlot>,
    mappings: HashMap<String, JoyMapping>,
    vibration_serial: u64,
}

impl JoypadRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a connection or disconnection for a slot.
    ///
    /// Reconnecting an occupied slot just refreshes its identity (drivers
    /// re-announce on wakeup); disconnecting an empty slot is a no-op.
    pub(crate) fn connection_changed(&mut self, slot: u32, connected: bool, name: &str, guid: &str) {
        if connected {
            let known = self.mappings.contains_key(guid);
            let entry = self.slots.entry(slot).or_default();
            entry.name = name.to_string();
            entry.guid = guid.to_string();
            entry.known = known;
            debug!("joypad {slot} connected: '{name}' guid={guid} known={known}");
        } else if self.slots.remove(&slot).is_some() {
            debug!("joypad {slot} disconnected");
        }
    }

    /// Slots currently connected, ascending.
    pub fn connected(&self) -> Vec<u32> {
        self.slots.keys().copied().collect()
    }

    #[inline]
    pub fn is_connected(&self, slot: u32) -> bool {
        self.slots.contains_key(&slot)
    }

    pub fn slot(&self, slot: u32) -> Option<&DeviceSlot> {
        self.slots.get(&slot)
    }

    /// Registers a mapping line. A GUID already in the table is replaced only
    /// when `update_existing` is set, otherwise the line is ignored. Pads
    /// plugged in with that GUID re-resolve their *known* flag either way.
    pub(crate) fn add_mapping(
        &mut self,
        line: &str,
        update_existing: bool,
    ) -> Result<(), InputError> {
        let mapping = JoyMapping::parse(line).map_err(|err| {
            warn!("rejected joypad mapping: {err}");
            err
        })?;
        let guid = mapping.guid.clone();
        if !update_existing && self.mappings.contains_key(&guid) {
            debug!("keeping existing mapping for guid={guid}");
            return Ok(());
        }
        self.mappings.insert(guid.clone(), mapping);

        for entry in self.slots.values_mut() {
            if entry.guid == guid {
                entry.known = true;
            }
        }
        Ok(())
    }

    /// Drops the mapping for a GUID. Pads using it become unknown.
    pub(crate) fn remove_mapping(&mut self, guid: &str) -> bool {
        if self.mappings.remove(guid).is_none() {
            return false;
        }
        for entry in self.slots.values_mut() {
            if entry.guid == guid {
                entry.known = false;
            }
        }
        true
    }

    pub fn mapping(&self, guid: &str) -> Option<&JoyMapping> {
        self.mappings.get(guid)
    }

    /// Files a vibration request. Magnitudes outside `0..=1` or a negative
    /// duration reject the request; an absent slot reports failure.
    pub(crate) fn start_vibration(
        &mut self,
        slot: u32,
        weak: f32,
        strong: f32,
        duration: f32,
    ) -> bool {
        if !(0.0..=1.0).contains(&weak) || !(0.0..=1.0).contains(&strong) || duration < 0.0 {
            return false;
        }
        let Some(entry) = self.slots.get_mut(&slot) else {
            return false;
        };
        self.vibration_serial += 1;
        entry.vibration = Vibration {
            weak,
            strong,
            duration,
            timestamp: self.vibration_serial,
        };
        true
    }

    /// Replaces any running vibration with a fresh stop request.
    pub(crate) fn stop_vibration(&mut self, slot: u32) -> bool {
        let Some(entry) = self.slots.get_mut(&slot) else {
            return false;
        };
        self.vibration_serial += 1;
        entry.vibration = Vibration {
            weak: 0.0,
            strong: 0.0,
            duration: 0.0,
            timestamp: self.vibration_serial,
        };
        true
    }

    /// Latest vibration request for a slot; neutral when absent.
    pub fn vibration(&self, slot: u32) -> Vibration {
        self.slots
            .get(&slot)
            .map(|s| s.vibration)
            .unwrap_or_default()
    }
}
