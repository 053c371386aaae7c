/// Simulator error types
use encore_playback::PlaybackError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SimError>;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid track spec '{spec}': {reason}")]
    InvalidTrack { spec: String, reason: String },

    #[error("Nothing to play: pass at least one --track or set simulation.tracks")]
    NoTracks,

    #[error("Playback error: {0}")]
    Playback(#[from] PlaybackError),

    #[error("Serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl From<config::ConfigError> for SimError {
    fn from(err: config::ConfigError) -> Self {
        SimError::Config(err.to_string())
    }
}
