//! Switchboard — a frame-coherent input facade.
//!
//! Normalizes keyboards, mice, joypads, motion sensors, and spatial trackers
//! behind one polling and action API. Platform glue feeds [`InputEvent`]s in;
//! gameplay code polls pressed / just-pressed / just-released state, named
//! actions, cursor data, and tracker poses without caring where any of it
//! came from.
//!
//! The core promise is frame coherence: within a frame every query returns
//! the same answer no matter how often it is asked, and transition edges live
//! for exactly one frame. See [`Input`] for the frame discipline.

pub mod action;
pub mod bus;
pub mod error;
pub mod event;
pub mod input;
pub mod joypad;
pub mod mouse;
pub mod snapshot;
pub mod source;
pub mod state;
pub mod tracker;

pub use action::*;
pub use bus::*;
pub use error::*;
pub use event::*;
pub use input::*;
pub use joypad::*;
pub use mouse::*;
pub use snapshot::*;
pub use source::*;
pub use state::*;
pub use tracker::*;
