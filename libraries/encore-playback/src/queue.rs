//! Up-next queue
//!
//! Caller-populated FIFO. The transition algorithm only ever consumes from
//! the head; every other mutation is an explicit caller operation.

use crate::types::{Track, TrackId};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Direction for adjacent swaps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Towards the head (plays sooner)
    Up,

    /// Towards the tail (plays later)
    Down,
}

/// Ordered queue of tracks waiting to play
#[derive(Debug, Clone, Default)]
pub struct Queue {
    tracks: VecDeque<Track>,
}

impl Queue {
    /// Create new empty queue
    pub fn new() -> Self {
        Self {
            tracks: VecDeque::new(),
        }
    }

    /// Append track at the tail
    pub fn enqueue(&mut self, track: Track) {
        self.tracks.push_back(track);
    }

    /// Insert track at the head so it plays next
    pub fn push_front(&mut self, track: Track) {
        self.tracks.push_front(track);
    }

    /// Remove and return the head
    pub fn dequeue_next(&mut self) -> Option<Track> {
        self.tracks.pop_front()
    }

    /// Remove the first entry with a matching id
    ///
    /// Relative order of the remaining tracks is preserved.
    pub fn remove_by_id(&mut self, id: &TrackId) -> Option<Track> {
        let index = self.tracks.iter().position(|t| &t.id == id)?;
        self.tracks.remove(index)
    }

    /// Exchange the track at `index` with its neighbour
    ///
    /// Returns false (and changes nothing) when the move would leave the
    /// queue: first track up, last track down, or `index` out of range.
    pub fn swap_adjacent(&mut self, index: usize, direction: Direction) -> bool {
        if index >= self.tracks.len() {
            return false;
        }

        let other = match direction {
            Direction::Up if index > 0 => index - 1,
            Direction::Down if index + 1 < self.tracks.len() => index + 1,
            _ => return false,
        };

        self.tracks.swap(index, other);
        true
    }

    /// Remove everything
    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    /// Peek at the head without removing it
    pub fn peek_next(&self) -> Option<&Track> {
        self.tracks.front()
    }

    /// Track at index
    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// Iterate head to tail
    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    /// Whether a track with this id is queued
    pub fn contains(&self, id: &TrackId) -> bool {
        self.tracks.iter().any(|t| &t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
