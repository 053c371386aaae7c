//! Volume control
//!
//! Linear level in [0, 1] with a mute switch that preserves the level.
//! The bridge receives the effective gain.

/// Volume controller
#[derive(Debug, Clone)]
pub struct Volume {
    /// Volume level (0.0-1.0)
    level: f32,

    /// Mute state (preserves volume level)
    muted: bool,
}

impl Volume {
    /// Create new volume controller, clamping `level` into [0, 1]
    pub fn new(level: f32) -> Self {
        Self {
            level: Self::clamp_level(level).unwrap_or(1.0),
            muted: false,
        }
    }

    /// Set volume level
    ///
    /// Values are clamped into [0, 1]. NaN is ignored and returns false.
    pub fn set_level(&mut self, level: f32) -> bool {
        match Self::clamp_level(level) {
            Some(level) => {
                self.level = level;
                true
            }
            None => false,
        }
    }

    /// Current volume level (0.0-1.0)
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Mute audio (preserves volume level)
    pub fn mute(&mut self) {
        self.muted = true;
    }

    /// Unmute audio (restores previous volume)
    pub fn unmute(&mut self) {
        self.muted = false;
    }

    /// Toggle mute state
    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Gain handed to the bridge: 0.0 if muted, otherwise the level
    pub fn gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.level
        }
    }

    fn clamp_level(level: f32) -> Option<f32> {
        if level.is_nan() {
            None
        } else {
            Some(level.clamp(0.0, 1.0))
        }
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(1.0)
    }
}
