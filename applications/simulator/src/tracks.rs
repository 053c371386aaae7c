/// Track specs given on the command line
use crate::error::{Result, SimError};
use encore_playback::Track;

/// URI scheme the simulated device understands
pub const SOURCE_SCHEME: &str = "sim://";

/// Parse `id:title:artist:seconds` into a track
///
/// The source becomes `sim://<id>` and `seconds` is both the duration hint
/// and the length the simulated device will report.
pub fn parse_track_spec(spec: &str) -> Result<Track> {
    let invalid = |reason: &str| SimError::InvalidTrack {
        spec: spec.to_string(),
        reason: reason.to_string(),
    };

    let parts: Vec<&str> = spec.split(':').collect();
    let [id, title, artist, seconds] = parts.as_slice() else {
        return Err(invalid("expected id:title:artist:seconds"));
    };

    let id = id.trim();
    if id.is_empty() {
        return Err(invalid("id must not be empty"));
    }

    let seconds: f64 = seconds
        .trim()
        .parse()
        .map_err(|_| invalid("seconds must be a number"))?;
    if !seconds.is_finite() || seconds <= 0.0 {
        return Err(invalid("seconds must be positive"));
    }

    Ok(Track::new(
        id,
        title.trim(),
        artist.trim(),
        format!("{}{}", SOURCE_SCHEME, id),
    )
    .with_duration_hint(seconds))
}
