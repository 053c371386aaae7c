//! Simulated media device
//!
//! Split in two halves joined by channels. [`SimulatedBridge`] is handed to
//! the controller and only forwards directives. [`SimulatedDevice`] stays
//! with the session: it applies those directives, advances on a virtual
//! clock and sends back signals tagged with the generation it is currently
//! working on. Nothing but the controller can steer the device.

use crate::config::SimulationSettings;
use crossbeam_channel::{unbounded, Receiver, Sender};
use encore_playback::{Directive, Generation, MediaBridge, MediaFailure, MediaSignal, TaggedSignal};
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace, warn};

/// Controller-side half: forwards directives to the device
pub struct SimulatedBridge {
    directive_tx: Sender<Directive>,
}

impl SimulatedBridge {
    fn forward(&self, directive: Directive) {
        if self.directive_tx.send(directive).is_err() {
            warn!("Simulated device dropped; discarding directive");
        }
    }
}

impl MediaBridge for SimulatedBridge {
    fn load(&mut self, source: &str, generation: Generation) {
        self.forward(Directive::Load {
            source: source.to_string(),
            generation,
        });
    }

    fn play(&mut self) {
        self.forward(Directive::Play);
    }

    fn pause(&mut self) {
        self.forward(Directive::Pause);
    }

    fn seek(&mut self, seconds: f64, generation: Generation) {
        self.forward(Directive::Seek {
            seconds,
            generation,
        });
    }

    fn set_volume(&mut self, gain: f32) {
        self.forward(Directive::SetVolume(gain));
    }
}

/// What the device has loaded
#[derive(Debug, Clone)]
struct LoadedMedia {
    source: String,
    duration: f64,
    position: f64,
    /// Ticks until the load completes
    pending_ticks: u32,
    ended: bool,
}

/// Device-side half: plays nothing but reports like a real device
pub struct SimulatedDevice {
    directive_rx: Receiver<Directive>,
    signal_tx: Sender<TaggedSignal>,
    directives: Vec<Directive>,

    // Device model
    generation: Generation,
    loaded: Option<LoadedMedia>,
    playing: bool,
    gain: f32,
    ticks_since_progress: u32,

    // Catalog
    durations: HashMap<String, f64>,
    fail_sources: HashSet<String>,
    load_latency_ticks: u32,
    progress_every_ticks: u32,
}

impl SimulatedDevice {
    /// Create the device, the bridge that feeds it, and the signal receiver
    pub fn new(settings: &SimulationSettings) -> (Self, SimulatedBridge, Receiver<TaggedSignal>) {
        let (directive_tx, directive_rx) = unbounded();
        let (signal_tx, signal_rx) = unbounded();
        let device = Self {
            directive_rx,
            signal_tx,
            directives: Vec::new(),
            generation: Generation::ZERO,
            loaded: None,
            playing: false,
            gain: 1.0,
            ticks_since_progress: 0,
            durations: HashMap::new(),
            fail_sources: settings.fail_sources.iter().cloned().collect(),
            load_latency_ticks: settings.load_latency_ticks,
            progress_every_ticks: settings.progress_every_ticks.max(1),
        };
        (device, SimulatedBridge { directive_tx }, signal_rx)
    }

    /// Register the real length of a source
    pub fn register_source(&mut self, source: impl Into<String>, duration: f64) {
        self.durations.insert(source.into(), duration);
    }

    /// Directives applied so far, in order
    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    /// Effective output gain
    pub fn gain(&self) -> f32 {
        self.gain
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// True when nothing would change on the next tick
    pub fn is_idle(&self) -> bool {
        if !self.directive_rx.is_empty() {
            return false;
        }
        match &self.loaded {
            None => true,
            Some(media) => media.pending_ticks == 0 && (!self.playing || media.ended),
        }
    }

    /// Apply queued directives, then advance the virtual clock by `elapsed`
    /// seconds
    pub fn tick(&mut self, elapsed: f64) {
        while let Ok(directive) = self.directive_rx.try_recv() {
            self.apply(directive);
        }

        let generation = self.generation;

        let Some(media) = self.loaded.as_mut() else {
            return;
        };

        if media.pending_ticks > 0 {
            media.pending_ticks -= 1;
            if media.pending_ticks > 0 {
                return;
            }

            let failure = if self.fail_sources.contains(&media.source) {
                Some(MediaFailure::load(format!("simulated failure for {}", media.source)))
            } else if !self.durations.contains_key(&media.source) {
                Some(MediaFailure::load(format!("unknown source {}", media.source)))
            } else {
                None
            };

            if let Some(failure) = failure {
                self.loaded = None;
                self.playing = false;
                self.send(generation, MediaSignal::Error(failure));
                return;
            }

            let duration = media.duration;
            debug!(source = %media.source, duration, %generation, "Simulated load complete");
            self.send(generation, MediaSignal::DurationKnown(duration));
            return;
        }

        if !self.playing || media.ended {
            return;
        }

        media.position = (media.position + elapsed).min(media.duration);
        let position = media.position;
        let finished = position >= media.duration;
        if finished {
            media.ended = true;
        }

        self.ticks_since_progress += 1;
        if finished || self.ticks_since_progress >= self.progress_every_ticks {
            self.ticks_since_progress = 0;
            self.send(generation, MediaSignal::Progress(position));
        }
        if finished {
            self.playing = false;
            self.send(generation, MediaSignal::Ended);
        }
    }

    fn apply(&mut self, directive: Directive) {
        trace!(?directive, "Device directive");
        match &directive {
            Directive::Load { source, generation } => {
                self.generation = *generation;
                self.playing = false;
                self.loaded = Some(LoadedMedia {
                    source: source.clone(),
                    duration: self.durations.get(source).copied().unwrap_or(0.0),
                    position: 0.0,
                    pending_ticks: self.load_latency_ticks.max(1),
                    ended: false,
                });
            }
            Directive::Play => {
                if self.loaded.is_some() {
                    self.playing = true;
                }
            }
            Directive::Pause => self.playing = false,
            Directive::Seek {
                seconds,
                generation,
            } => {
                self.generation = *generation;
                if let Some(media) = self.loaded.as_mut() {
                    media.position = seconds.clamp(0.0, media.duration);
                    media.ended = false;
                }
            }
            Directive::SetVolume(gain) => self.gain = *gain,
        }
        self.directives.push(directive);
    }

    fn send(&self, generation: Generation, signal: MediaSignal) {
        trace!(%generation, ?signal, "Device signal");
        if self.signal_tx.send(TaggedSignal::new(generation, signal)).is_err() {
            warn!("Signal receiver dropped; discarding device signal");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device() -> (SimulatedDevice, SimulatedBridge, Receiver<TaggedSignal>) {
        let settings = SimulationSettings {
            load_latency_ticks: 1,
            progress_every_ticks: 1,
            ..Default::default()
        };
        let (mut device, bridge, rx) = SimulatedDevice::new(&settings);
        device.register_source("sim://a", 2.0);
        (device, bridge, rx)
    }

    #[test]
    fn reports_duration_then_progress_then_end() {
        let (mut device, mut bridge, rx) = device();
        let generation = Generation::new(1);

        bridge.load("sim://a", generation);
        bridge.play();
        device.tick(1.0);
        device.tick(1.0);
        device.tick(1.0);

        let signals: Vec<_> = rx.try_iter().collect();
        assert_eq!(
            signals,
            vec![
                TaggedSignal::new(generation, MediaSignal::DurationKnown(2.0)),
                TaggedSignal::new(generation, MediaSignal::Progress(1.0)),
                TaggedSignal::new(generation, MediaSignal::Progress(2.0)),
                TaggedSignal::new(generation, MediaSignal::Ended),
            ]
        );
        assert!(device.is_idle());
    }

    #[test]
    fn directives_take_effect_on_the_next_tick() {
        let (mut device, mut bridge, _rx) = device();

        bridge.set_volume(0.5);
        assert_eq!(device.gain(), 1.0);
        assert!(!device.is_idle());

        device.tick(0.1);
        assert_eq!(device.gain(), 0.5);
        assert_eq!(device.directives(), &[Directive::SetVolume(0.5)]);
        assert!(device.is_idle());
    }

    #[test]
    fn seek_retags_later_signals() {
        let (mut device, mut bridge, rx) = device();
        bridge.load("sim://a", Generation::new(1));
        bridge.play();
        device.tick(0.5);
        let _ = rx.try_iter().count();

        bridge.seek(0.25, Generation::new(2));
        device.tick(0.5);

        let signal = rx.try_recv().unwrap();
        assert_eq!(signal.generation, Generation::new(2));
        assert_eq!(signal.signal, MediaSignal::Progress(0.75));
    }

    #[test]
    fn unknown_source_fails_to_load() {
        let (mut device, mut bridge, rx) = device();
        bridge.load("sim://missing", Generation::new(3));
        bridge.play();
        device.tick(0.5);

        let signal = rx.try_recv().unwrap();
        assert!(matches!(signal.signal, MediaSignal::Error(_)));
        assert_eq!(signal.generation, Generation::new(3));
        assert!(device.is_idle());
    }

    #[test]
    fn paused_device_stays_quiet() {
        let (mut device, mut bridge, rx) = device();
        bridge.load("sim://a", Generation::new(1));
        device.tick(0.5);
        let _ = rx.try_iter().count();

        device.tick(0.5);
        assert!(rx.try_recv().is_err());
        assert!(device.is_idle());
    }
}
