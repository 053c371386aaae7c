//! Error types for the playback engine

use crate::types::TrackId;
use thiserror::Error;

/// Playback errors
///
/// Only media failures reported by the bridge and rejected configuration are
/// errors. Out-of-range commands are clamped or ignored instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlaybackError {
    /// Source unreachable or in an unsupported format
    #[error("Failed to load track {track_id}: {message}")]
    MediaLoad { track_id: TrackId, message: String },

    /// Decode or output failure while the track was playing
    #[error("Playback failed for track {track_id}: {message}")]
    MediaPlayback { track_id: TrackId, message: String },

    /// Configuration rejected at construction
    #[error("Invalid playback configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
