//! Encore - Playback Engine
//!
//! Platform-agnostic playback state machine for the Encore artist dashboard.
//!
//! This crate provides:
//! - Current track and transport state (stopped, playing, paused)
//! - Explicit FIFO queue with reordering
//! - Bounded, de-duplicated playback history
//! - Repeat (Off, All, One) and shuffle flags
//! - Volume control with mute
//! - Generation-tagged reconciliation of asynchronous media signals
//!
//! # Architecture
//!
//! `encore-playback` never touches audio hardware. The platform supplies a
//! [`MediaBridge`] that performs loading and output and reports progress,
//! duration, completion and failures back as [`TaggedSignal`]s. The
//! [`PlaybackController`] applies commands and signals one at a time, so
//! every state transition is atomic with respect to other inputs.
//!
//! Each load and seek directive carries a fresh [`Generation`]. Signals
//! from superseded generations are dropped, which keeps a late progress
//! tick from a previous track from touching the new one.
//!
//! # Example: Basic Playback
//!
//! ```rust
//! use encore_playback::{
//!     Generation, MediaBridge, MediaSignal, PlaybackConfig, PlaybackController, TaggedSignal,
//!     Track, TransportState,
//! };
//!
//! // A bridge that ignores every directive
//! struct NullBridge;
//!
//! impl MediaBridge for NullBridge {
//!     fn load(&mut self, _source: &str, _generation: Generation) {}
//!     fn play(&mut self) {}
//!     fn pause(&mut self) {}
//!     fn seek(&mut self, _seconds: f64, _generation: Generation) {}
//!     fn set_volume(&mut self, _gain: f32) {}
//! }
//!
//! let mut controller = PlaybackController::new(NullBridge, PlaybackConfig::default()).unwrap();
//!
//! controller.play_track(Track::new("a", "Opening", "The Band", "https://cdn.example/a.mp3"));
//! controller.enqueue(Track::new("b", "Encore", "The Band", "https://cdn.example/b.mp3"));
//!
//! // The bridge reports back under the generation of the load
//! let generation = controller.generation();
//! controller
//!     .handle_signal(TaggedSignal::new(generation, MediaSignal::DurationKnown(200.0)))
//!     .unwrap();
//! controller
//!     .handle_signal(TaggedSignal::new(generation, MediaSignal::Ended))
//!     .unwrap();
//!
//! assert_eq!(controller.current_track().unwrap().id.as_str(), "b");
//! assert_eq!(controller.transport(), TransportState::Playing);
//! ```
//!
//! # Example: Repeat Modes
//!
//! ```rust
//! use encore_playback::{PlaybackConfig, RepeatMode};
//!
//! let config = PlaybackConfig {
//!     repeat: RepeatMode::One,
//!     ..Default::default()
//! };
//! assert_eq!(config.repeat.next(), RepeatMode::Off);
//! ```

pub mod bridge;
mod command;
mod controller;
mod error;
pub mod events;
mod history;
mod modes;
mod queue;
pub mod types;
mod volume;

// Public exports
pub use bridge::{
    Directive, FailureKind, Generation, MediaBridge, MediaFailure, MediaSignal, TaggedSignal,
};
pub use command::{EngineInput, PlaybackCommand};
pub use controller::PlaybackController;
pub use error::{PlaybackError, Result};
pub use events::PlaybackEvent;
pub use history::History;
pub use modes::ModeManager;
pub use queue::{Direction, Queue};
pub use types::{
    PlaybackConfig, PlaybackState, RepeatMode, Track, TrackId, TransportState,
    DEFAULT_HISTORY_SIZE,
};
pub use volume::Volume;
