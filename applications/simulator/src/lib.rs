//! Encore simulator
//!
//! Drives the playback engine against a simulated media device on a
//! virtual clock, without audio hardware.

pub mod bridge;
pub mod config;
pub mod error;
pub mod session;
pub mod tracks;

pub use bridge::{SimulatedBridge, SimulatedDevice};
pub use config::{SimConfig, SimulationSettings};
pub use error::{Result, SimError};
pub use session::{Session, SessionReport};
pub use tracks::parse_track_spec;
