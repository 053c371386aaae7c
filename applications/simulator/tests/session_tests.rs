/// End-to-end simulation tests
/// Runs the playback engine against the simulated device until it settles
use encore_playback::{Directive, RepeatMode, TrackId, TransportState};
use encore_sim::{parse_track_spec, Session, SimConfig, SimError};

fn config(repeat: RepeatMode) -> SimConfig {
    let mut config = SimConfig::default();
    config.playback.repeat = repeat;
    config.simulation.max_ticks = 500;
    config
}

fn tracks(specs: &[&str]) -> Vec<encore_playback::Track> {
    specs.iter().map(|s| parse_track_spec(s).unwrap()).collect()
}

fn ids(played: &[TrackId]) -> Vec<&str> {
    played.iter().map(|id| id.as_str()).collect()
}

/// Test a short queue plays through and stops on the last track
#[test]
fn test_plays_queue_to_completion() {
    let mut session = Session::new(config(RepeatMode::Off)).unwrap();
    session
        .load_tracks(tracks(&["a:Opening:The Band:2", "b:Encore:The Band:1"]))
        .unwrap();

    let report = session.run();

    assert!(!report.truncated);
    assert_eq!(ids(&report.played), vec!["a", "b"]);
    assert_eq!(report.errors, 0);

    let state = report.final_state;
    assert_eq!(state.transport, TransportState::Stopped);
    assert_eq!(state.current_track.map(|t| t.id), Some(TrackId::new("b")));
    assert_eq!(state.duration_seconds, 1.0);
    assert_eq!(state.progress_seconds, 1.0);
}

/// Test repeat all without a refill stops after the last track
#[test]
fn test_repeat_all_without_refill_stops() {
    let mut session = Session::new(config(RepeatMode::All)).unwrap();
    session
        .load_tracks(tracks(&["a:A:X:1", "b:B:X:1"]))
        .unwrap();

    let report = session.run();

    assert!(!report.truncated);
    assert_eq!(ids(&report.played), vec!["a", "b"]);
    assert_eq!(report.final_state.transport, TransportState::Stopped);
}

/// Test repeat one keeps restarting the first track
#[test]
fn test_repeat_one_never_settles() {
    let mut session = Session::new(config(RepeatMode::One)).unwrap();
    session
        .load_tracks(tracks(&["a:A:X:1", "b:B:X:1"]))
        .unwrap();

    let report = session.run();

    assert!(report.truncated);
    assert_eq!(ids(&report.played), vec!["a"]);
    assert_eq!(report.final_state.transport, TransportState::Playing);
    assert_eq!(session.controller().queue().len(), 1);

    let loads = session
        .device()
        .directives()
        .iter()
        .filter(|d| matches!(d, Directive::Load { .. }))
        .count();
    assert_eq!(loads, 1);
}

/// Test a failing source stops the session without skipping ahead
#[test]
fn test_load_failure_stops_playback() {
    let mut config = config(RepeatMode::Off);
    config.simulation.fail_sources = vec!["sim://b".to_string()];

    let mut session = Session::new(config).unwrap();
    session
        .load_tracks(tracks(&["a:A:X:1", "b:B:X:1", "c:C:X:1"]))
        .unwrap();

    let report = session.run();

    assert!(!report.truncated);
    assert_eq!(report.errors, 1);
    assert_eq!(ids(&report.played), vec!["a", "b"]);
    assert_eq!(report.final_state.transport, TransportState::Stopped);
    assert!(report.final_state.last_error.is_some());
    assert_eq!(session.controller().queue().len(), 1);
}

/// Test a seek mid-session drops the progress the device reported earlier
#[test]
fn test_seek_during_session() {
    let mut session = Session::new(config(RepeatMode::Off)).unwrap();
    session.load_tracks(tracks(&["a:A:X:60"])).unwrap();

    // Let the load complete
    for _ in 0..3 {
        session.step();
    }
    assert_eq!(session.controller().duration(), 60.0);

    session.controller_mut().seek(59.0);
    let report = session.run();

    assert!(!report.truncated);
    assert!(report.elapsed_seconds < 5.0);
    assert_eq!(report.final_state.progress_seconds, 60.0);
}

/// Test the device only ever acts on directives issued by the controller
#[test]
fn test_device_follows_controller_generations() {
    let mut session = Session::new(config(RepeatMode::Off)).unwrap();
    session
        .load_tracks(tracks(&["a:A:X:2", "b:B:X:2", "c:C:X:2"]))
        .unwrap();

    for _ in 0..4 {
        session.step();
    }
    session.controller_mut().seek(1.5);
    let report = session.run();
    assert!(!report.truncated);

    let directives = session.device().directives();
    let sources: Vec<_> = directives
        .iter()
        .filter_map(|d| match d {
            Directive::Load { source, .. } => Some(source.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(sources, vec!["sim://a", "sim://b", "sim://c"]);

    let generations: Vec<_> = directives
        .iter()
        .filter_map(|d| match d {
            Directive::Load { generation, .. } | Directive::Seek { generation, .. } => {
                Some(*generation)
            }
            _ => None,
        })
        .collect();
    assert!(generations.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(generations.last(), Some(&session.controller().generation()));
}

/// Test an empty track list is rejected
#[test]
fn test_no_tracks() {
    let mut session = Session::new(config(RepeatMode::Off)).unwrap();
    let err = session.load_tracks(Vec::new()).unwrap_err();
    assert!(matches!(err, SimError::NoTracks));
}
