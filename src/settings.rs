//! Race settings
//!
//! Supplied by the host as JSON (or left at defaults). Physics constants
//! live in `consts`; these are the knobs that vary between races.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Opponent difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DifficultyPreset {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl DifficultyPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyPreset::Easy => "Easy",
            DifficultyPreset::Normal => "Normal",
            DifficultyPreset::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(DifficultyPreset::Easy),
            "normal" | "medium" => Some(DifficultyPreset::Normal),
            "hard" => Some(DifficultyPreset::Hard),
            _ => None,
        }
    }

    /// Range opponent difficulty is drawn from (always inside [0.5, 1.0])
    pub fn difficulty_range(&self) -> RangeInclusive<f32> {
        match self {
            DifficultyPreset::Easy => 0.5..=0.7,
            DifficultyPreset::Normal => 0.5..=1.0,
            DifficultyPreset::Hard => 0.8..=1.0,
        }
    }
}

/// Race configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Opponent difficulty preset
    pub difficulty: DifficultyPreset,
    /// Number of AI opponents (names cycle past the roster size)
    pub opponent_count: usize,
    /// Distance from a checkpoint that counts as reaching it
    pub checkpoint_radius: f32,
    /// Seconds counted down before the race starts
    pub countdown_secs: u32,
    /// Longest frame step the simulation will take (seconds)
    pub max_frame_dt: f32,
    /// Racers push each other apart when they overlap
    pub entity_bumping: bool,
    /// Race ends in game over after this long (seconds)
    pub time_limit_secs: Option<f32>,
    /// Base seed for the race RNG
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: DifficultyPreset::Normal,
            opponent_count: 7,
            checkpoint_radius: 50.0,
            countdown_secs: 3,
            max_frame_dt: 0.1,
            entity_bumping: true,
            time_limit_secs: Some(300.0),
            seed: 0x5EED_2024,
        }
    }
}

impl Settings {
    /// Create settings with a difficulty preset applied
    pub fn from_preset(preset: DifficultyPreset) -> Self {
        Self {
            difficulty: preset,
            ..Self::default()
        }
    }

    /// Parse settings from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Pull out-of-range values back to something the simulation accepts
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.checkpoint_radius.is_finite() && self.checkpoint_radius > 0.0) {
            log::warn!("Invalid checkpoint radius {}, using default", self.checkpoint_radius);
            self.checkpoint_radius = defaults.checkpoint_radius;
        }
        if !(self.max_frame_dt.is_finite() && self.max_frame_dt > 0.0) {
            log::warn!("Invalid max frame dt {}, using default", self.max_frame_dt);
            self.max_frame_dt = defaults.max_frame_dt;
        }
        if self.time_limit_secs.is_some_and(|t| !(t.is_finite() && t > 0.0)) {
            log::warn!("Invalid time limit {:?}, disabling it", self.time_limit_secs);
            self.time_limit_secs = None;
        }
        self
    }

    /// Frame step cap, falling back to the default if the field was set to
    /// something unusable after construction
    pub fn frame_dt_limit(&self) -> f32 {
        if self.max_frame_dt.is_finite() && self.max_frame_dt > 0.0 {
            self.max_frame_dt
        } else {
            Self::default().max_frame_dt
        }
    }

    /// Time limit in milliseconds, if any
    pub fn time_limit_ms(&self) -> Option<f32> {
        self.time_limit_secs.map(|t| t * 1000.0)
    }
}
