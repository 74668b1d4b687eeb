//! Game settings and preferences
//!
//! Kept separate from [`GameConfig`]: settings are what a player picks in a
//! menu, the config is the full balance table a preset expands into.

use serde::{Deserialize, Serialize};

use crate::tuning::GameConfig;

/// Difficulty preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "med" | "medium" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Enemies per wave at the start of a run
    pub fn initial_wave_size(&self) -> u32 {
        match self {
            Difficulty::Easy => 20,
            Difficulty::Normal => 30,
            Difficulty::Hard => 40,
        }
    }

    /// Chance each scheduled enemy spawns
    pub fn spawn_chance(&self) -> f64 {
        match self {
            Difficulty::Easy => 0.75,
            Difficulty::Normal => 0.9,
            Difficulty::Hard => 1.0,
        }
    }

    /// Enemy speed multiplier
    pub fn enemy_speed_scale(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.8,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.25,
        }
    }

    pub fn max_wave_size(&self) -> u32 {
        match self {
            Difficulty::Easy => 100,
            Difficulty::Normal => 150,
            Difficulty::Hard => 200,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub difficulty: Difficulty,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            show_fps: true,
        }
    }
}

impl Settings {
    /// Create settings from a difficulty preset
    pub fn from_preset(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            ..Self::default()
        }
    }

    /// Master volume as the 0-100 slider shows it
    pub fn volume_percent(&self) -> u8 {
        (self.master_volume.clamp(0.0, 1.0) * 100.0).round() as u8
    }

    /// Set master volume from a 0-100 slider value
    pub fn set_volume_percent(&mut self, percent: u8) {
        self.master_volume = f32::from(percent.min(100)) / 100.0;
    }

    /// Expand the difficulty preset into a full balance table
    pub fn game_config(&self) -> GameConfig {
        let d = self.difficulty;
        GameConfig {
            initial_wave_size: d.initial_wave_size(),
            spawn_chance: d.spawn_chance(),
            enemy_speed_scale: d.enemy_speed_scale(),
            max_wave_size: d.max_wave_size(),
            ..GameConfig::default()
        }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
