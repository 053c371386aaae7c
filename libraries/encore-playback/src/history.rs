//! Playback history tracking
//!
//! Bounded record of recently activated tracks, most recent at the back.
//! Ids are unique: re-recording a track promotes it instead of duplicating.

use crate::types::{Track, TrackId, DEFAULT_HISTORY_SIZE};
use std::collections::VecDeque;

/// Playback history with bounded size
#[derive(Debug, Clone)]
pub struct History {
    /// History buffer (most recent = back)
    tracks: VecDeque<Track>,

    /// Maximum history size
    max_size: usize,
}

impl History {
    /// Create new history with specified maximum size
    pub fn new(max_size: usize) -> Self {
        Self {
            tracks: VecDeque::with_capacity(max_size),
            max_size,
        }
    }

    /// Record a track as most recent
    ///
    /// An existing entry with the same id is removed first; the oldest
    /// entries are dropped while over capacity.
    pub fn record(&mut self, track: Track) {
        if let Some(pos) = self.tracks.iter().position(|t| t.id == track.id) {
            self.tracks.remove(pos);
        }
        self.tracks.push_back(track);

        while self.tracks.len() > self.max_size {
            self.tracks.pop_front();
        }
    }

    /// Most recent track (without removing)
    pub fn most_recent(&self) -> Option<&Track> {
        self.tracks.back()
    }

    /// Iterate oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    pub fn contains(&self, id: &TrackId) -> bool {
        self.tracks.iter().any(|t| &t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    /// Maximum history size
    pub fn capacity(&self) -> usize {
        self.max_size
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_SIZE)
    }
}
