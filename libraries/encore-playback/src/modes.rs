//! Repeat and shuffle modes
//!
//! Pure state. The shuffle flag is only read by whoever fills the queue;
//! nothing in this crate reorders tracks.

use crate::types::RepeatMode;

#[derive(Debug, Clone, Default)]
pub struct ModeManager {
    repeat: RepeatMode,
    shuffle: bool,
}

impl ModeManager {
    pub fn new(repeat: RepeatMode, shuffle: bool) -> Self {
        Self { repeat, shuffle }
    }

    /// Cycle Off -> All -> One -> Off and return the new mode
    pub fn toggle_repeat(&mut self) -> RepeatMode {
        self.repeat = self.repeat.next();
        self.repeat
    }

    /// Flip the shuffle flag and return the new value
    pub fn toggle_shuffle(&mut self) -> bool {
        self.shuffle = !self.shuffle;
        self.shuffle
    }

    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    pub fn shuffle_enabled(&self) -> bool {
        self.shuffle
    }
}
