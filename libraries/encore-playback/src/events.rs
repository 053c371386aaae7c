//! Playback Events
//!
//! Event-based communication for UI synchronization. The controller queues
//! events as it mutates state; the caller drains them after each step.

use crate::bridge::MediaFailure;
use crate::types::{RepeatMode, TrackId, TransportState};
use serde::{Deserialize, Serialize};

/// Events emitted by the playback controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Transport changed (playing, paused, stopped)
    StateChanged {
        /// The new transport state
        state: TransportState,
    },

    /// A different track became current
    TrackChanged {
        /// ID of the new (current) track
        track_id: TrackId,
        /// ID of the previous track (if any)
        previous_track_id: Option<TrackId>,
    },

    /// Current track restarted from the beginning (repeat one)
    TrackRestarted { track_id: TrackId },

    /// Track finished playing naturally (reached end)
    TrackFinished { track_id: TrackId },

    /// Nothing left to play after the current track
    ///
    /// Under `RepeatMode::All` this is the caller's cue to refill the queue.
    QueueExhausted { repeat: RepeatMode },

    /// Position update from the device or a seek
    PositionUpdate {
        position_seconds: f64,
        duration_seconds: f64,
    },

    /// Authoritative duration became known
    DurationChanged { duration_seconds: f64 },

    /// Volume changed
    VolumeChanged {
        /// New volume level (0.0-1.0)
        level: f32,
        /// Whether audio is muted
        is_muted: bool,
    },

    /// Queue changed (tracks added/removed/reordered)
    QueueChanged {
        /// New queue length
        length: usize,
    },

    /// Repeat or shuffle changed
    ModeChanged { repeat: RepeatMode, shuffle: bool },

    /// Media failure reported by the bridge
    Error {
        track_id: Option<TrackId>,
        failure: MediaFailure,
    },
}
