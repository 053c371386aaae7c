//! Property-based tests for the playback controller
//!
//! Uses proptest to verify invariants across many random command and
//! signal interleavings.

use encore_playback::{
    Direction, Generation, History, MediaBridge, MediaSignal, PlaybackCommand, PlaybackConfig,
    PlaybackController, Queue, TaggedSignal, Track, TransportState,
};
use proptest::prelude::*;
use std::collections::HashSet;

// ===== Helpers =====

/// Device that only remembers its current generation
#[derive(Debug, Default)]
struct GenerationBridge {
    generation: Generation,
}

impl MediaBridge for GenerationBridge {
    fn load(&mut self, _source: &str, generation: Generation) {
        self.generation = generation;
    }

    fn play(&mut self) {}

    fn pause(&mut self) {}

    fn seek(&mut self, _seconds: f64, generation: Generation) {
        self.generation = generation;
    }

    fn set_volume(&mut self, _gain: f32) {}
}

fn track(id: &str) -> Track {
    Track::new(id, id, "Artist", format!("mem://{}", id))
}

fn arbitrary_track() -> impl Strategy<Value = Track> {
    "[a-f]{1,2}".prop_map(|id| track(&id))
}

/// One step of platform input
#[derive(Debug, Clone)]
enum Step {
    Command(PlaybackCommand),
    /// Signal from the device, tagged with its current generation
    Fresh(MediaSignal),
    /// Signal tagged with an older generation
    Stale(u64, MediaSignal),
}

fn arbitrary_signal() -> impl Strategy<Value = MediaSignal> {
    prop_oneof![
        (-50.0f64..500.0).prop_map(MediaSignal::Progress),
        (0.0f64..400.0).prop_map(MediaSignal::DurationKnown),
        Just(MediaSignal::Ended),
    ]
}

fn arbitrary_command() -> impl Strategy<Value = PlaybackCommand> {
    prop_oneof![
        arbitrary_track().prop_map(PlaybackCommand::PlayTrack),
        arbitrary_track().prop_map(PlaybackCommand::Enqueue),
        arbitrary_track().prop_map(PlaybackCommand::PlayNext),
        Just(PlaybackCommand::TogglePlayPause),
        Just(PlaybackCommand::SkipToNext),
        Just(PlaybackCommand::Stop),
        Just(PlaybackCommand::ToggleRepeat),
        (-100.0f64..600.0).prop_map(PlaybackCommand::Seek),
        (-1.0f32..2.0).prop_map(PlaybackCommand::SetVolume),
        (0usize..6, prop_oneof![Just(Direction::Up), Just(Direction::Down)])
            .prop_map(|(index, direction)| PlaybackCommand::SwapAdjacent { index, direction }),
    ]
}

fn arbitrary_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        4 => arbitrary_command().prop_map(Step::Command),
        4 => arbitrary_signal().prop_map(Step::Fresh),
        1 => (1u64..4, arbitrary_signal()).prop_map(|(back, s)| Step::Stale(back, s)),
    ]
}

fn apply(controller: &mut PlaybackController<GenerationBridge>, step: Step) {
    let tagged = match step {
        Step::Command(command) => {
            controller.apply(command);
            return;
        }
        Step::Fresh(signal) => TaggedSignal::new(controller.bridge().generation, signal),
        Step::Stale(back, signal) => {
            let current = controller.generation().value();
            TaggedSignal::new(Generation::new(current.saturating_sub(back)), signal)
        }
    };
    // Only error signals can fail, and none are generated here
    controller.handle_signal(tagged).unwrap();
}

// ===== Property Tests =====

proptest! {
    /// Property: progress never leaves [0, duration], whatever the input order
    #[test]
    fn progress_stays_within_duration(steps in prop::collection::vec(arbitrary_step(), 1..80)) {
        let mut controller =
            PlaybackController::new(GenerationBridge::default(), PlaybackConfig::default()).unwrap();

        for step in steps {
            apply(&mut controller, step);
            let state = controller.state();
            prop_assert!(state.progress_seconds >= 0.0);
            prop_assert!(state.progress_seconds <= state.duration_seconds);
            prop_assert!((0.0..=1.0).contains(&state.volume));
        }
    }

    /// Property: a current track always exists while not stopped
    #[test]
    fn active_transport_has_a_track(steps in prop::collection::vec(arbitrary_step(), 1..80)) {
        let mut controller =
            PlaybackController::new(GenerationBridge::default(), PlaybackConfig::default()).unwrap();

        for step in steps {
            apply(&mut controller, step);
            if controller.transport() != TransportState::Stopped {
                prop_assert!(controller.current_track().is_some());
            }
        }
    }

    /// Property: generations never go backwards
    #[test]
    fn generation_is_monotonic(steps in prop::collection::vec(arbitrary_step(), 1..80)) {
        let mut controller =
            PlaybackController::new(GenerationBridge::default(), PlaybackConfig::default()).unwrap();
        let mut last = controller.generation();

        for step in steps {
            apply(&mut controller, step);
            prop_assert!(controller.generation() >= last);
            last = controller.generation();
        }
    }

    /// Property: a natural end with tracks queued consumes exactly the head
    #[test]
    fn natural_end_consumes_one_queued_track(
        queued in prop::collection::vec(arbitrary_track(), 1..10),
        duration in 1.0f64..600.0,
    ) {
        let mut controller =
            PlaybackController::new(GenerationBridge::default(), PlaybackConfig::default()).unwrap();
        controller.play_track(track("current"));
        controller.enqueue_many(queued.clone());

        let generation = controller.generation();
        controller.on_media_duration_known(generation, duration);
        controller.on_media_ended(generation);

        prop_assert_eq!(controller.queue().len(), queued.len() - 1);
        prop_assert_eq!(controller.current_track(), Some(&queued[0]));
        prop_assert_eq!(controller.transport(), TransportState::Playing);
    }

    /// Property: seek lands inside [0, duration]
    #[test]
    fn seek_is_clamped(duration in 0.0f64..1000.0, target in -2000.0f64..2000.0) {
        let mut controller =
            PlaybackController::new(GenerationBridge::default(), PlaybackConfig::default()).unwrap();
        controller.play_track(track("a"));
        let generation = controller.generation();
        controller.on_media_duration_known(generation, duration);

        controller.seek(target);

        prop_assert_eq!(controller.progress(), target.clamp(0.0, duration));
    }

    /// Property: play_track always yields a fresh, playing track
    #[test]
    fn play_track_resets_state(
        prefix in prop::collection::vec(arbitrary_step(), 0..40),
        next in arbitrary_track(),
    ) {
        let mut controller =
            PlaybackController::new(GenerationBridge::default(), PlaybackConfig::default()).unwrap();
        for step in prefix {
            apply(&mut controller, step);
        }

        controller.play_track(next.clone());

        prop_assert_eq!(controller.current_track(), Some(&next));
        prop_assert_eq!(controller.progress(), 0.0);
        prop_assert_eq!(controller.transport(), TransportState::Playing);
        prop_assert_eq!(controller.history().most_recent(), Some(&next));
    }

    /// Property: history is bounded and holds each id at most once
    #[test]
    fn history_bounded_and_unique(
        capacity in 1usize..10,
        tracks in prop::collection::vec(arbitrary_track(), 0..60),
    ) {
        let mut history = History::new(capacity);
        for t in &tracks {
            history.record(t.clone());
        }

        prop_assert!(history.len() <= capacity);
        let ids: HashSet<_> = history.iter().map(|t| t.id.clone()).collect();
        prop_assert_eq!(ids.len(), history.len());

        if let Some(last) = tracks.last() {
            prop_assert_eq!(history.most_recent(), Some(last));
        }
    }

    /// Property: dequeue order matches enqueue order
    #[test]
    fn queue_is_fifo(tracks in prop::collection::vec(arbitrary_track(), 0..30)) {
        let mut queue = Queue::new();
        for t in &tracks {
            queue.enqueue(t.clone());
        }

        let drained: Vec<_> = std::iter::from_fn(|| queue.dequeue_next()).collect();
        prop_assert_eq!(drained, tracks);
    }

    /// Property: adjacent swaps preserve the multiset of queued ids
    #[test]
    fn swaps_preserve_contents(
        tracks in prop::collection::vec(arbitrary_track(), 0..10),
        swaps in prop::collection::vec((0usize..12, any::<bool>()), 0..20),
    ) {
        let mut queue = Queue::new();
        for t in &tracks {
            queue.enqueue(t.clone());
        }

        for (index, up) in swaps {
            let direction = if up { Direction::Up } else { Direction::Down };
            queue.swap_adjacent(index, direction);
        }

        let mut before: Vec<_> = tracks.iter().map(|t| t.id.to_string()).collect();
        let mut after: Vec<_> = queue.iter().map(|t| t.id.to_string()).collect();
        before.sort();
        after.sort();
        prop_assert_eq!(before, after);
    }
}
