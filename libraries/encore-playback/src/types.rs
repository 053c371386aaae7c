//! Core types for playback management

use crate::bridge::{Generation, MediaFailure};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Track identifier as issued by the catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    /// Create a new track ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TrackId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Track information supplied by the catalog
///
/// Opaque to the engine apart from `id` and `source`. The duration hint is
/// only used for display until the bridge reports the real duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier
    pub id: TrackId,

    /// Track title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Cover art reference (URL or asset key)
    pub cover: Option<String>,

    /// Caller-supplied duration in seconds, may be inaccurate
    pub duration_hint: f64,

    /// Locator handed to the media bridge on load
    pub source: String,
}

impl Track {
    /// Create a track without cover art or duration hint
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        artist: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            id: TrackId::new(id),
            title: title.into(),
            artist: artist.into(),
            cover: None,
            duration_hint: 0.0,
            source: source.into(),
        }
    }

    /// Set the duration hint (seconds)
    #[must_use]
    pub fn with_duration_hint(mut self, seconds: f64) -> Self {
        self.duration_hint = seconds;
        self
    }

    /// Set the cover reference
    #[must_use]
    pub fn with_cover(mut self, cover: impl Into<String>) -> Self {
        self.cover = Some(cover.into());
        self
    }
}

/// Coarse transport state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TransportState {
    /// Nothing playing; the last track may still be retained
    #[default]
    Stopped,

    /// Currently playing
    Playing,

    /// Paused mid-track
    Paused,
}

/// Repeat mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stop when the queue runs out
    #[default]
    Off,

    /// Caller keeps the queue topped up; the engine itself does not loop
    All,

    /// Replay the current track on natural end
    One,
}

impl RepeatMode {
    /// Next mode in the Off -> All -> One -> Off cycle
    pub fn next(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::All,
            RepeatMode::All => RepeatMode::One,
            RepeatMode::One => RepeatMode::Off,
        }
    }
}

/// Observable playback state
///
/// Snapshot handed to the UI. Only the controller mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackState {
    pub current_track: Option<Track>,
    pub transport: TransportState,
    pub progress_seconds: f64,
    /// 0 until the bridge reports it
    pub duration_seconds: f64,
    pub volume: f32,
    pub muted: bool,
    pub repeat_mode: RepeatMode,
    pub shuffle_enabled: bool,
    pub generation: Generation,
    pub last_error: Option<MediaFailure>,
}

/// Configuration for the playback controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Maximum history size (default: 20)
    pub history_size: usize,

    /// Initial volume (0.0-1.0, default: 1.0)
    pub volume: f32,

    /// Initial repeat mode (default: Off)
    pub repeat: RepeatMode,

    /// Initial shuffle flag (default: false)
    pub shuffle: bool,
}

/// Default history capacity
pub const DEFAULT_HISTORY_SIZE: usize = 20;

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            history_size: DEFAULT_HISTORY_SIZE,
            volume: 1.0,
            repeat: RepeatMode::Off,
            shuffle: false,
        }
    }
}
