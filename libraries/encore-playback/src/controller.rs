//! Playback controller - core orchestration
//!
//! Owns the current track, transport state and the media bridge. Commands
//! mutate state synchronously and issue directives; bridge signals are
//! reconciled afterwards, subject to the generation guard.

use crate::{
    bridge::{FailureKind, Generation, MediaBridge, MediaFailure, MediaSignal, TaggedSignal},
    command::{EngineInput, PlaybackCommand},
    error::{PlaybackError, Result},
    events::PlaybackEvent,
    history::History,
    modes::ModeManager,
    queue::{Direction, Queue},
    types::{PlaybackConfig, PlaybackState, RepeatMode, Track, TrackId, TransportState},
    volume::Volume,
};
use tracing::{debug, info, warn};

/// What started a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trigger {
    /// Bridge reported the end of the track
    NaturalEnd,

    /// Caller asked to move on
    Skip,
}

/// Central playback management
///
/// Orchestrates:
/// - Current track and transport state
/// - Queue consumption on completion/skip
/// - History of activated tracks
/// - Repeat/shuffle modes
/// - Volume and mute
/// - Reconciliation of asynchronous bridge signals
pub struct PlaybackController<B: MediaBridge> {
    // Device
    bridge: B,

    // State
    transport: TransportState,
    current_track: Option<Track>,
    progress: f64,
    duration: f64,
    last_error: Option<MediaFailure>,

    // Generation guard
    generation: Generation,
    load_generation: Generation,

    // Queue and history
    queue: Queue,
    history: History,

    // Settings
    modes: ModeManager,
    volume: Volume,

    // Event queue for UI synchronization
    pending_events: Vec<PlaybackEvent>,
}

impl<B: MediaBridge> PlaybackController<B> {
    /// Create new playback controller owning `bridge`
    pub fn new(bridge: B, config: PlaybackConfig) -> Result<Self> {
        if config.history_size == 0 {
            return Err(PlaybackError::InvalidConfig(
                "history_size must be at least 1".to_string(),
            ));
        }
        if !config.volume.is_finite() {
            return Err(PlaybackError::InvalidConfig(format!(
                "volume must be a finite number, got {}",
                config.volume
            )));
        }

        let mut controller = Self {
            bridge,
            transport: TransportState::Stopped,
            current_track: None,
            progress: 0.0,
            duration: 0.0,
            last_error: None,
            generation: Generation::ZERO,
            load_generation: Generation::ZERO,
            queue: Queue::new(),
            history: History::new(config.history_size),
            modes: ModeManager::new(config.repeat, config.shuffle),
            volume: Volume::new(config.volume),
            pending_events: Vec::new(),
        };

        let gain = controller.volume.gain();
        controller.bridge.set_volume(gain);

        Ok(controller)
    }

    // ===== Playback Control =====

    /// Make `track` current and start playing it from the beginning
    pub fn play_track(&mut self, track: Track) {
        self.activate(track);
    }

    /// Flip between playing and paused
    ///
    /// Does nothing without a current track. From `Stopped` the retained
    /// track is reloaded and played from the start.
    pub fn toggle_play_pause(&mut self) {
        let Some(track) = self.current_track.as_ref() else {
            debug!("toggle_play_pause ignored: no current track");
            return;
        };

        match self.transport {
            TransportState::Playing => {
                self.bridge.pause();
                self.set_transport(TransportState::Paused);
            }
            TransportState::Paused => {
                self.bridge.play();
                self.set_transport(TransportState::Playing);
            }
            TransportState::Stopped => {
                let track = track.clone();
                self.activate(track);
            }
        }
    }

    /// Stop output and rewind, keeping the current track
    pub fn stop(&mut self) {
        if self.current_track.is_none() {
            return;
        }

        self.bridge.pause();
        self.progress = 0.0;
        self.generation = self.generation.next();
        self.bridge.seek(0.0, self.generation);
        self.set_transport(TransportState::Stopped);
        self.emit_position_update();
    }

    /// Advance to the head of the queue
    ///
    /// Always advances, even under `RepeatMode::One`.
    pub fn skip_to_next(&mut self) {
        self.run_transition(Trigger::Skip);
    }

    /// Seek within the current track
    ///
    /// The target is clamped into `[0, duration]` and written immediately;
    /// before the duration is known that range is `[0, 0]`.
    pub fn seek(&mut self, target_seconds: f64) {
        if self.current_track.is_none() {
            debug!("seek ignored: no current track");
            return;
        }
        if target_seconds.is_nan() {
            debug!("seek ignored: target is NaN");
            return;
        }

        self.progress = target_seconds.clamp(0.0, self.duration);
        self.generation = self.generation.next();
        debug!(
            target = self.progress,
            generation = %self.generation,
            "Seeking"
        );
        self.bridge.seek(self.progress, self.generation);
        self.emit_position_update();
    }

    // ===== Volume =====

    /// Set volume (clamped into 0.0-1.0, NaN ignored)
    pub fn set_volume(&mut self, level: f32) {
        if self.volume.set_level(level) {
            self.push_volume();
        }
    }

    pub fn mute(&mut self) {
        self.volume.mute();
        self.push_volume();
    }

    pub fn unmute(&mut self) {
        self.volume.unmute();
        self.push_volume();
    }

    pub fn toggle_mute(&mut self) {
        self.volume.toggle_mute();
        self.push_volume();
    }

    // ===== Queue Management =====

    /// Append track to the end of the queue
    pub fn enqueue(&mut self, track: Track) {
        self.queue.enqueue(track);
        self.emit_queue_changed();
    }

    /// Append several tracks, preserving their order
    pub fn enqueue_many(&mut self, tracks: impl IntoIterator<Item = Track>) {
        for track in tracks {
            self.queue.enqueue(track);
        }
        self.emit_queue_changed();
    }

    /// Insert track at the head of the queue
    pub fn play_next(&mut self, track: Track) {
        self.queue.push_front(track);
        self.emit_queue_changed();
    }

    /// Remove the first queued track with this id
    pub fn remove_by_id(&mut self, id: &TrackId) -> Option<Track> {
        let removed = self.queue.remove_by_id(id);
        if removed.is_some() {
            self.emit_queue_changed();
        }
        removed
    }

    /// Swap a queued track with its neighbour; out-of-range moves are no-ops
    pub fn swap_adjacent(&mut self, index: usize, direction: Direction) -> bool {
        let swapped = self.queue.swap_adjacent(index, direction);
        if swapped {
            self.emit_queue_changed();
        }
        swapped
    }

    pub fn clear_queue(&mut self) {
        if !self.queue.is_empty() {
            self.queue.clear();
            self.emit_queue_changed();
        }
    }

    // ===== Shuffle & Repeat =====

    /// Cycle repeat mode Off -> All -> One -> Off
    pub fn toggle_repeat(&mut self) -> RepeatMode {
        let mode = self.modes.toggle_repeat();
        self.emit_mode_changed();
        mode
    }

    /// Flip the shuffle flag
    ///
    /// The flag is informational; reordering the queue is up to the caller.
    pub fn toggle_shuffle(&mut self) -> bool {
        let enabled = self.modes.toggle_shuffle();
        self.emit_mode_changed();
        enabled
    }

    // ===== Bridge Signals =====

    /// Reconcile a tagged signal from the bridge
    ///
    /// Stale signals are dropped silently. Media failures are returned as
    /// errors after being recorded in the state.
    pub fn handle_signal(&mut self, tagged: TaggedSignal) -> Result<()> {
        let TaggedSignal { generation, signal } = tagged;
        match signal {
            MediaSignal::Progress(seconds) => self.on_media_progress(generation, seconds),
            MediaSignal::DurationKnown(seconds) => {
                self.on_media_duration_known(generation, seconds);
            }
            MediaSignal::Ended => self.on_media_ended(generation),
            MediaSignal::Error(failure) => return self.on_media_error(generation, failure),
        }
        Ok(())
    }

    /// Position report
    pub fn on_media_progress(&mut self, generation: Generation, seconds: f64) {
        if !self.is_current(generation, "progress") {
            return;
        }
        if self.current_track.is_none() || self.transport == TransportState::Stopped {
            return;
        }
        if seconds.is_nan() {
            return;
        }

        self.progress = seconds.clamp(0.0, self.duration);
        self.emit_position_update();
    }

    /// Authoritative duration for the loaded source
    pub fn on_media_duration_known(&mut self, generation: Generation, seconds: f64) {
        if !self.is_current_load(generation, "duration") {
            return;
        }
        if self.current_track.is_none() {
            return;
        }
        if !seconds.is_finite() || seconds < 0.0 {
            warn!(seconds, "Ignoring invalid duration from media bridge");
            return;
        }

        self.duration = seconds;
        self.progress = self.progress.clamp(0.0, self.duration);
        self.pending_events.push(PlaybackEvent::DurationChanged {
            duration_seconds: seconds,
        });
    }

    /// Natural end of the current track
    pub fn on_media_ended(&mut self, generation: Generation) {
        if !self.is_current(generation, "ended") {
            return;
        }
        let Some(track) = self.current_track.as_ref() else {
            return;
        };
        if self.transport == TransportState::Stopped {
            debug!("ended ignored: transport already stopped");
            return;
        }

        info!(track_id = %track.id, "Track finished");
        self.pending_events.push(PlaybackEvent::TrackFinished {
            track_id: track.id.clone(),
        });
        self.run_transition(Trigger::NaturalEnd);
    }

    /// Load or playback failure
    ///
    /// Never advances the queue. Load failures stop, playback failures
    /// pause; recovery is left to the caller.
    pub fn on_media_error(&mut self, generation: Generation, failure: MediaFailure) -> Result<()> {
        if !self.is_current_load(generation, "error") {
            return Ok(());
        }
        let Some(track_id) = self.current_track.as_ref().map(|t| t.id.clone()) else {
            return Ok(());
        };

        warn!(
            track_id = %track_id,
            kind = ?failure.kind,
            message = %failure.message,
            "Media bridge reported a failure"
        );

        match failure.kind {
            FailureKind::Load => self.set_transport(TransportState::Stopped),
            FailureKind::Playback => {
                if self.transport == TransportState::Playing {
                    self.bridge.pause();
                    self.set_transport(TransportState::Paused);
                }
            }
        }

        self.last_error = Some(failure.clone());
        self.pending_events.push(PlaybackEvent::Error {
            track_id: Some(track_id.clone()),
            failure: failure.clone(),
        });

        Err(match failure.kind {
            FailureKind::Load => PlaybackError::MediaLoad {
                track_id,
                message: failure.message,
            },
            FailureKind::Playback => PlaybackError::MediaPlayback {
                track_id,
                message: failure.message,
            },
        })
    }

    /// Apply one command or signal
    pub fn dispatch(&mut self, input: impl Into<EngineInput>) -> Result<()> {
        match input.into() {
            EngineInput::Command(command) => {
                self.apply(command);
                Ok(())
            }
            EngineInput::Signal(signal) => self.handle_signal(signal),
        }
    }

    /// Apply a caller command
    pub fn apply(&mut self, command: PlaybackCommand) {
        debug!(?command, "Applying command");
        match command {
            PlaybackCommand::PlayTrack(track) => self.play_track(track),
            PlaybackCommand::TogglePlayPause => self.toggle_play_pause(),
            PlaybackCommand::Stop => self.stop(),
            PlaybackCommand::SkipToNext => self.skip_to_next(),
            PlaybackCommand::Seek(seconds) => self.seek(seconds),
            PlaybackCommand::SetVolume(level) => self.set_volume(level),
            PlaybackCommand::ToggleMute => self.toggle_mute(),
            PlaybackCommand::Enqueue(track) => self.enqueue(track),
            PlaybackCommand::PlayNext(track) => self.play_next(track),
            PlaybackCommand::RemoveById(id) => {
                self.remove_by_id(&id);
            }
            PlaybackCommand::SwapAdjacent { index, direction } => {
                self.swap_adjacent(index, direction);
            }
            PlaybackCommand::ClearQueue => self.clear_queue(),
            PlaybackCommand::ToggleRepeat => {
                self.toggle_repeat();
            }
            PlaybackCommand::ToggleShuffle => {
                self.toggle_shuffle();
            }
        }
    }

    // ===== State Queries =====

    /// Snapshot of the observable state
    pub fn state(&self) -> PlaybackState {
        PlaybackState {
            current_track: self.current_track.clone(),
            transport: self.transport,
            progress_seconds: self.progress,
            duration_seconds: self.duration,
            volume: self.volume.level(),
            muted: self.volume.is_muted(),
            repeat_mode: self.modes.repeat(),
            shuffle_enabled: self.modes.shuffle_enabled(),
            generation: self.generation,
            last_error: self.last_error.clone(),
        }
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current_track.as_ref()
    }

    pub fn transport(&self) -> TransportState {
        self.transport
    }

    /// Position in seconds
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Authoritative duration in seconds (0 until known)
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Duration for display: the reported one, else the track's hint
    pub fn display_duration(&self) -> f64 {
        if self.duration > 0.0 {
            return self.duration;
        }
        self.current_track
            .as_ref()
            .map(|t| t.duration_hint.max(0.0))
            .unwrap_or(0.0)
    }

    pub fn volume(&self) -> f32 {
        self.volume.level()
    }

    pub fn is_muted(&self) -> bool {
        self.volume.is_muted()
    }

    pub fn repeat_mode(&self) -> RepeatMode {
        self.modes.repeat()
    }

    pub fn shuffle_enabled(&self) -> bool {
        self.modes.shuffle_enabled()
    }

    /// Most recently issued generation
    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn last_error(&self) -> Option<&MediaFailure> {
        self.last_error.as_ref()
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Check if a skip or natural end would keep playing
    pub fn has_next(&self) -> bool {
        !self.queue.is_empty() || self.modes.repeat() == RepeatMode::One
    }

    /// Read-only view of the bridge; directives only go through the controller
    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    // ===== Events =====

    /// Take all events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== Internals =====

    /// Shared effects of `play_track` and queue advancement
    fn activate(&mut self, track: Track) {
        let previous_track_id = self.current_track.as_ref().map(|t| t.id.clone());

        self.generation = self.generation.next();
        self.load_generation = self.generation;
        self.progress = 0.0;
        self.duration = 0.0;
        self.last_error = None;
        self.history.record(track.clone());

        info!(
            track_id = %track.id,
            title = %track.title,
            generation = %self.generation,
            "Loading track"
        );
        self.bridge.load(&track.source, self.generation);
        self.bridge.play();

        let track_id = track.id.clone();
        self.current_track = Some(track);
        self.set_transport(TransportState::Playing);
        self.pending_events.push(PlaybackEvent::TrackChanged {
            track_id,
            previous_track_id,
        });
        self.emit_position_update();
    }

    /// Decide what plays after the current track
    fn run_transition(&mut self, trigger: Trigger) {
        if trigger == Trigger::NaturalEnd && self.modes.repeat() == RepeatMode::One {
            if let Some(track_id) = self.current_track.as_ref().map(|t| t.id.clone()) {
                debug!(track_id = %track_id, "Repeat one: restarting track");
                self.progress = 0.0;
                self.generation = self.generation.next();
                self.bridge.seek(0.0, self.generation);
                self.bridge.play();
                self.set_transport(TransportState::Playing);
                self.pending_events
                    .push(PlaybackEvent::TrackRestarted { track_id });
                self.emit_position_update();
                return;
            }
        }

        if let Some(next) = self.queue.dequeue_next() {
            self.emit_queue_changed();
            self.activate(next);
            return;
        }

        // Repeat all has no playlist of its own to fall back on; refilling
        // the queue is the caller's job, so it stops like repeat off.
        if self.current_track.is_none() {
            return;
        }

        match trigger {
            Trigger::NaturalEnd => self.progress = self.duration,
            Trigger::Skip => {
                if self.transport != TransportState::Stopped {
                    self.bridge.pause();
                }
            }
        }

        info!(repeat = ?self.modes.repeat(), "Queue exhausted, stopping");
        self.set_transport(TransportState::Stopped);
        self.pending_events.push(PlaybackEvent::QueueExhausted {
            repeat: self.modes.repeat(),
        });
    }

    /// Position-bound signals must match the latest generation exactly
    fn is_current(&self, generation: Generation, kind: &str) -> bool {
        if generation > self.generation {
            warn!(%generation, current = %self.generation, kind, "Foreign media signal");
            return false;
        }
        if generation < self.generation {
            debug!(%generation, current = %self.generation, kind, "Stale media signal");
            return false;
        }
        true
    }

    /// Source-bound signals only need to belong to the current load
    fn is_current_load(&self, generation: Generation, kind: &str) -> bool {
        if generation > self.generation {
            warn!(%generation, current = %self.generation, kind, "Foreign media signal");
            return false;
        }
        if generation < self.load_generation {
            debug!(%generation, load = %self.load_generation, kind, "Stale media signal");
            return false;
        }
        true
    }

    fn set_transport(&mut self, state: TransportState) {
        if self.transport != state {
            self.transport = state;
            self.pending_events
                .push(PlaybackEvent::StateChanged { state });
        }
    }

    fn push_volume(&mut self) {
        self.bridge.set_volume(self.volume.gain());
        self.pending_events.push(PlaybackEvent::VolumeChanged {
            level: self.volume.level(),
            is_muted: self.volume.is_muted(),
        });
    }

    fn emit_position_update(&mut self) {
        self.pending_events.push(PlaybackEvent::PositionUpdate {
            position_seconds: self.progress,
            duration_seconds: self.duration,
        });
    }

    fn emit_queue_changed(&mut self) {
        self.pending_events.push(PlaybackEvent::QueueChanged {
            length: self.queue.len(),
        });
    }

    fn emit_mode_changed(&mut self) {
        self.pending_events.push(PlaybackEvent::ModeChanged {
            repeat: self.modes.repeat(),
            shuffle: self.modes.shuffle_enabled(),
        });
    }
}
