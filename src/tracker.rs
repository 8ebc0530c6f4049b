//! Positional trackers: headsets, wands, lighthouse anchors.
//!
//! Trackers are registered by the platform or XR layer and addressed by a
//! facade-assigned `u32` index. Unlike joypad slots, indices are never
//! reused: removing a tracker retires its index for the lifetime of the
//! facade, so a stale handle can never silently point at a different device.

use std::collections::BTreeMap;

use bitflags::bitflags;
use glam::{Quat, Vec3};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::state::Sensors;

bitflags! {
    /// Tracker category, also usable as a query mask.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct TrackerKind: u8 {
        const HMD = 0x01;
        const CONTROLLER = 0x02;
        const BASESTATION = 0x04;
        const UNKNOWN = 0x80;

        const HMD_AND_CONTROLLER = 0x03;
        const ANY_KNOWN = 0x7f;
        const ANY = 0xff;
    }
}

impl Default for TrackerKind {
    fn default() -> Self {
        TrackerKind::UNKNOWN
    }
}

/// A position and orientation in tracking space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    /// Unit quaternion; [`Pose::default`] is the identity at the origin.
    pub orientation: Quat,
}

impl Pose {
    pub const IDENTITY: Pose = Pose {
        position: Vec3::ZERO,
        orientation: Quat::IDENTITY,
    };

    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }
}

/// One registered tracker.
#[derive(Clone, Debug)]
pub struct TrackerRecord {
    pub index: u32,
    pub kind: TrackerKind,
    pub name: String,
    pub pose: Pose,
    /// Whether pose updates carry meaningful orientation.
    pub tracks_orientation: bool,
    /// Whether pose updates carry meaningful position.
    pub tracks_position: bool,
}

/// Fraction of the measured tilt error corrected per second when fusing
/// gravity into an orientation estimate.
const TILT_CORRECTION_RATE: f32 = 0.4;

/// Registry of live trackers, indexed monotonically.
#[derive(Debug, Default)]
pub struct TrackerRegistry {
    trackers: BTreeMap<u32, TrackerRecord>,
    next_index: u32,
}

impl TrackerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tracker and returns its permanent index.
    pub(crate) fn add(
        &mut self,
        kind: TrackerKind,
        name: &str,
        tracks_orientation: bool,
        tracks_position: bool,
    ) -> u32 {
        let index = self.next_index;
        self.next_index += 1;
        self.trackers.insert(
            index,
            TrackerRecord {
                index,
                kind,
                name: name.to_string(),
                pose: Pose::IDENTITY,
                tracks_orientation,
                tracks_position,
            },
        );
        debug!("tracker {index} added: '{name}' kind={kind:?}");
        index
    }

    /// Removes a tracker. The index is not reissued later.
    pub(crate) fn remove(&mut self, index: u32) -> bool {
        let removed = self.trackers.remove(&index).is_some();
        if removed {
            debug!("tracker {index} removed");
        }
        removed
    }

    pub fn get(&self, index: u32) -> Option<&TrackerRecord> {
        self.trackers.get(&index)
    }

    /// Category of a tracker, [`TrackerKind::UNKNOWN`] when absent.
    pub fn kind(&self, index: u32) -> TrackerKind {
        self.trackers
            .get(&index)
            .map(|t| t.kind)
            .unwrap_or(TrackerKind::UNKNOWN)
    }

    /// Name of a tracker, `""` when absent.
    pub fn name(&self, index: u32) -> &str {
        self.trackers.get(&index).map(|t| t.name.as_str()).unwrap_or("")
    }

    /// Latest pose of a tracker, identity when absent.
    pub fn pose(&self, index: u32) -> Pose {
        self.trackers
            .get(&index)
            .map(|t| t.pose)
            .unwrap_or(Pose::IDENTITY)
    }

    /// Whether a tracker reports usable orientation, `false` when absent.
    pub fn tracks_orientation(&self, index: u32) -> bool {
        self.trackers
            .get(&index)
            .map(|t| t.tracks_orientation)
            .unwrap_or(false)
    }

    /// Whether a tracker reports usable position, `false` when absent.
    pub fn tracks_position(&self, index: u32) -> bool {
        self.trackers
            .get(&index)
            .map(|t| t.tracks_position)
            .unwrap_or(false)
    }

    /// Indices of live trackers whose kind intersects `mask`, ascending.
    pub fn connected(&self, mask: TrackerKind) -> Vec<u32> {
        self.trackers
            .values()
            .filter(|t| t.kind.intersects(mask))
            .map(|t| t.index)
            .collect()
    }

    /// Overwrites a tracker's pose. Reports whether the index was live.
    pub(crate) fn set_pose(&mut self, index: u32, pose: Pose) -> bool {
        match self.trackers.get_mut(&index) {
            Some(tracker) => {
                tracker.pose = pose;
                true
            }
            None => false,
        }
    }

    /// Advances a tracker's orientation from the current sensor readings.
    ///
    /// The gyroscope is integrated over `delta` as a body-frame rotation,
    /// then the estimate is nudged toward the measured gravity direction
    /// (accelerometer standing in when no gravity vector was reported) to
    /// bleed off pitch/roll drift. Yaw drift is left alone. Position is never
    /// integrated. The same readings over the same deltas always produce the
    /// same orientation.
    ///
    /// Reports `false` when the index is absent, the tracker does not track
    /// orientation, or `delta` is not positive.
    pub(crate) fn integrate_sensors(&mut self, index: u32, sensors: &Sensors, delta: f32) -> bool {
        let Some(tracker) = self.trackers.get_mut(&index) else {
            return false;
        };
        if !tracker.tracks_orientation || delta <= 0.0 {
            return false;
        }

        let mut orientation = tracker.pose.orientation;

        let omega = sensors.gyroscope;
        if omega.length_squared() > f32::EPSILON {
            orientation = (orientation * Quat::from_scaled_axis(omega * delta)).normalize();
        }

        let gravity = if sensors.gravity.length_squared() > f32::EPSILON {
            sensors.gravity
        } else {
            sensors.accelerometer
        };
        if gravity.length_squared() > f32::EPSILON {
            // Where the measured down direction ends up in world space.
            let measured_down = (orientation * gravity).normalize();
            let correction = Quat::from_rotation_arc(measured_down, Vec3::NEG_Y);
            let gain = (delta * TILT_CORRECTION_RATE).min(1.0);
            orientation = (Quat::IDENTITY.slerp(correction, gain) * orientation).normalize();
        }

        tracker.pose.orientation = orientation;
        true
    }
}
