//! Simulation session
//!
//! Single-threaded loop: advance the device clock, feed every pending signal
//! to the controller in arrival order, then log what changed. The session
//! owns the device but can only steer it through the controller.

use crate::bridge::{SimulatedBridge, SimulatedDevice};
use crate::config::SimConfig;
use crate::error::{Result, SimError};
use crossbeam_channel::Receiver;
use encore_playback::{
    PlaybackController, PlaybackEvent, PlaybackState, TaggedSignal, Track, TrackId,
    TransportState,
};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Outcome of a finished session
#[derive(Debug, Clone)]
pub struct SessionReport {
    /// Ticks executed
    pub ticks: u64,

    /// Virtual seconds elapsed
    pub elapsed_seconds: f64,

    /// Tracks that became current, in order (restarts not included)
    pub played: Vec<TrackId>,

    /// Media failures surfaced by the controller
    pub errors: usize,

    /// True when the session hit `max_ticks` before settling
    pub truncated: bool,

    /// Controller state at the end
    pub final_state: PlaybackState,
}

pub struct Session {
    controller: PlaybackController<SimulatedBridge>,
    device: SimulatedDevice,
    signals: Receiver<TaggedSignal>,
    config: SimConfig,
    played: Vec<TrackId>,
    errors: usize,
}

impl Session {
    /// Build a controller wired to a fresh simulated device
    pub fn new(config: SimConfig) -> Result<Self> {
        config.validate()?;
        let (device, bridge, signals) = SimulatedDevice::new(&config.simulation);
        let controller = PlaybackController::new(bridge, config.playback.clone())?;

        Ok(Self {
            controller,
            device,
            signals,
            config,
            played: Vec::new(),
            errors: 0,
        })
    }

    pub fn controller(&self) -> &PlaybackController<SimulatedBridge> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut PlaybackController<SimulatedBridge> {
        &mut self.controller
    }

    pub fn device(&self) -> &SimulatedDevice {
        &self.device
    }

    /// Play the first track and queue the rest
    pub fn load_tracks(&mut self, tracks: Vec<Track>) -> Result<()> {
        let mut tracks = tracks.into_iter();
        let first = tracks.next().ok_or(SimError::NoTracks)?;

        self.device.register_source(first.source.clone(), first.duration_hint);
        let rest: Vec<Track> = tracks.collect();
        for track in &rest {
            self.device.register_source(track.source.clone(), track.duration_hint);
        }

        self.controller.play_track(first);
        self.controller.enqueue_many(rest);
        self.flush_events();
        Ok(())
    }

    /// Run until playback settles or `max_ticks` is reached
    pub fn run(&mut self) -> SessionReport {
        let settings = self.config.simulation.clone();
        let tick_seconds = settings.tick_seconds();
        let mut ticks = 0;

        info!(
            tick_ms = settings.tick_ms,
            realtime = settings.realtime,
            "Starting simulation"
        );

        while ticks < settings.max_ticks {
            self.step();
            ticks += 1;

            if self.is_settled() {
                break;
            }

            if settings.realtime {
                std::thread::sleep(Duration::from_millis(settings.tick_ms));
            }
        }

        let truncated = !self.is_settled();
        if truncated {
            warn!(ticks, "Simulation hit max_ticks before settling");
        }

        SessionReport {
            ticks,
            elapsed_seconds: ticks as f64 * tick_seconds,
            played: self.played.clone(),
            errors: self.errors,
            truncated,
            final_state: self.controller.state(),
        }
    }

    /// Advance the device by one tick and reconcile what it reported
    pub fn step(&mut self) {
        self.device.tick(self.config.simulation.tick_seconds());
        self.pump_signals();
        self.flush_events();
    }

    /// Dispatch every signal already sent by the device
    pub fn pump_signals(&mut self) {
        while let Ok(signal) = self.signals.try_recv() {
            if let Err(e) = self.controller.dispatch(signal) {
                self.errors += 1;
                warn!("Media failure: {}", e);
            }
        }
    }

    fn is_settled(&self) -> bool {
        self.controller.transport() != TransportState::Playing
            && self.device.is_idle()
            && self.signals.is_empty()
    }

    fn flush_events(&mut self) {
        for event in self.controller.drain_events() {
            match &event {
                PlaybackEvent::TrackChanged { track_id, .. } => {
                    info!(track_id = %track_id, "Now playing");
                    self.played.push(track_id.clone());
                }
                PlaybackEvent::TrackRestarted { track_id } => {
                    info!(track_id = %track_id, "Restarting track");
                }
                PlaybackEvent::QueueExhausted { repeat } => {
                    info!(?repeat, "Queue exhausted");
                }
                PlaybackEvent::Error { track_id, failure } => {
                    warn!(?track_id, kind = ?failure.kind, "{}", failure.message);
                }
                PlaybackEvent::PositionUpdate {
                    position_seconds,
                    duration_seconds,
                } => {
                    debug!(
                        "Position {:.1}s / {:.1}s",
                        position_seconds, duration_seconds
                    );
                }
                other => debug!(?other, "Playback event"),
            }
        }
    }
}
