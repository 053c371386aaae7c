//! Commands and the combined input stream
//!
//! Commands and bridge signals share one ordered input stream so a single
//! loop can apply them one at a time, in arrival order.

use crate::bridge::TaggedSignal;
use crate::queue::Direction;
use crate::types::{Track, TrackId};

/// Caller commands
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackCommand {
    /// Replace the current track and start playing it
    PlayTrack(Track),

    /// Toggle between playing and paused
    TogglePlayPause,

    /// Stop output, keeping the current track
    Stop,

    /// Skip to the head of the queue
    SkipToNext,

    /// Seek to position (in seconds)
    Seek(f64),

    /// Set volume (0.0-1.0)
    SetVolume(f32),

    /// Toggle mute
    ToggleMute,

    /// Append track to queue
    Enqueue(Track),

    /// Insert track at the head of the queue
    PlayNext(Track),

    /// Remove track from queue by id
    RemoveById(TrackId),

    /// Swap queued track with its neighbour
    SwapAdjacent { index: usize, direction: Direction },

    /// Clear queue
    ClearQueue,

    /// Cycle repeat mode
    ToggleRepeat,

    /// Flip shuffle flag
    ToggleShuffle,
}

/// One step of controller input
#[derive(Debug, Clone, PartialEq)]
pub enum EngineInput {
    Command(PlaybackCommand),
    Signal(TaggedSignal),
}

impl From<PlaybackCommand> for EngineInput {
    fn from(command: PlaybackCommand) -> Self {
        EngineInput::Command(command)
    }
}

impl From<TaggedSignal> for EngineInput {
    fn from(signal: TaggedSignal) -> Self {
        EngineInput::Signal(signal)
    }
}
