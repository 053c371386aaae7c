/// Simulator configuration
use crate::error::{Result, SimError};
use encore_playback::PlaybackConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "encore-sim.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SimConfig {
    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default)]
    pub simulation: SimulationSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SimulationSettings {
    /// Virtual time advanced per tick (milliseconds)
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    /// Ticks between a load directive and the duration report
    #[serde(default = "default_load_latency_ticks")]
    pub load_latency_ticks: u32,

    /// Emit a progress signal every N ticks while playing
    #[serde(default = "default_progress_every_ticks")]
    pub progress_every_ticks: u32,

    /// Hard stop for runaway sessions (e.g. repeat one)
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,

    /// Sleep for each tick instead of running as fast as possible
    #[serde(default)]
    pub realtime: bool,

    /// Sources the simulated device refuses to load
    #[serde(default)]
    pub fail_sources: Vec<String>,

    /// Tracks in `id:title:artist:seconds` form, used when none are given on
    /// the command line
    #[serde(default)]
    pub tracks: Vec<String>,
}

fn default_tick_ms() -> u64 {
    250
}

fn default_load_latency_ticks() -> u32 {
    2
}

fn default_progress_every_ticks() -> u32 {
    4
}

fn default_max_ticks() -> u64 {
    100_000
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            load_latency_ticks: default_load_latency_ticks(),
            progress_every_ticks: default_progress_every_ticks(),
            max_ticks: default_max_ticks(),
            realtime: false,
            fail_sources: Vec::new(),
            tracks: Vec::new(),
        }
    }
}

impl SimulationSettings {
    /// Virtual seconds per tick
    pub fn tick_seconds(&self) -> f64 {
        self.tick_ms as f64 / 1000.0
    }
}

impl SimConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist. Without one, `encore-sim.toml` in the
    /// working directory is used if present. `ENCORE_`-prefixed variables
    /// override both, with `__` between table and key
    /// (`ENCORE_PLAYBACK__VOLUME=0.5`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(SimError::Config(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("ENCORE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: SimConfig = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.simulation.tick_ms == 0 {
            return Err(SimError::Config(
                "simulation.tick_ms must be greater than 0".to_string(),
            ));
        }

        if self.simulation.progress_every_ticks == 0 {
            return Err(SimError::Config(
                "simulation.progress_every_ticks must be greater than 0".to_string(),
            ));
        }

        if self.playback.history_size == 0 {
            return Err(SimError::Config(
                "playback.history_size must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Render as TOML, e.g. to seed a config file
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
