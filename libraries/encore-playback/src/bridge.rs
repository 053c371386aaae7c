//! Media bridge abstraction
//!
//! The bridge is the audio device: it performs the actual loading, decoding
//! and output, and reports back asynchronously. Every report carries the
//! generation of the directive it belongs to so the controller can drop
//! reports from operations that have since been superseded.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Monotonically increasing tag for load and seek directives
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Generation(u64);

impl Generation {
    /// Generation before any directive has been issued
    pub const ZERO: Generation = Generation(0);

    /// Wrap a raw generation number
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Raw generation number
    pub fn value(self) -> u64 {
        self.0
    }

    /// The generation following this one
    ///
    /// Saturates at `u64::MAX`.
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gen#{}", self.0)
    }
}

/// Which stage of playback failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    /// Source unreachable or unsupported format
    Load,

    /// Decode or hardware failure mid-playback
    Playback,
}

/// Failure reported by the bridge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl MediaFailure {
    /// Load failure
    pub fn load(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Load,
            message: message.into(),
        }
    }

    /// Mid-playback failure
    pub fn playback(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Playback,
            message: message.into(),
        }
    }
}

/// Asynchronous report from the bridge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MediaSignal {
    /// Current position in seconds
    Progress(f64),

    /// Authoritative duration in seconds
    DurationKnown(f64),

    /// Track reached its natural end
    Ended,

    /// Load or playback failure
    Error(MediaFailure),
}

/// A signal together with the generation it was emitted under
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedSignal {
    pub generation: Generation,
    pub signal: MediaSignal,
}

impl TaggedSignal {
    pub fn new(generation: Generation, signal: MediaSignal) -> Self {
        Self { generation, signal }
    }
}

/// Platform audio device
///
/// Directives are fire-and-forget: the outcome of `load` and `seek` comes
/// back later as a [`TaggedSignal`] carrying the generation passed here.
/// Implementors must tag every later emission with the most recent
/// generation they were handed.
pub trait MediaBridge {
    /// Start loading a source. Outcome is reported via signals.
    fn load(&mut self, source: &str, generation: Generation);

    /// Start or resume output
    fn play(&mut self);

    /// Pause output
    fn pause(&mut self);

    /// Move the playhead (seconds)
    fn seek(&mut self, seconds: f64, generation: Generation);

    /// Set output gain in [0, 1]
    fn set_volume(&mut self, gain: f32);
}

impl<B: MediaBridge + ?Sized> MediaBridge for Box<B> {
    fn load(&mut self, source: &str, generation: Generation) {
        (**self).load(source, generation);
    }

    fn play(&mut self) {
        (**self).play();
    }

    fn pause(&mut self) {
        (**self).pause();
    }

    fn seek(&mut self, seconds: f64, generation: Generation) {
        (**self).seek(seconds, generation);
    }

    fn set_volume(&mut self, gain: f32) {
        (**self).set_volume(gain);
    }
}

/// A directive as issued to the bridge
///
/// Handy for bridges that forward directives to another thread and for
/// recording what the controller asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    Load { source: String, generation: Generation },
    Play,
    Pause,
    Seek { seconds: f64, generation: Generation },
    SetVolume(f32),
}

/// Bridge that records directives for tests
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingBridge {
    pub directives: Vec<Directive>,
}

#[cfg(test)]
impl MediaBridge for RecordingBridge {
    fn load(&mut self, source: &str, generation: Generation) {
        self.directives.push(Directive::Load {
            source: source.to_string(),
            generation,
        });
    }

    fn play(&mut self) {
        self.directives.push(Directive::Play);
    }

    fn pause(&mut self) {
        self.directives.push(Directive::Pause);
    }

    fn seek(&mut self, seconds: f64, generation: Generation) {
        self.directives.push(Directive::Seek {
            seconds,
            generation,
        });
    }

    fn set_volume(&mut self, gain: f32) {
        self.directives.push(Directive::SetVolume(gain));
    }
}
