//! Simulation settings and difficulty presets
//!
//! Everything tunable about a run lives here. Settings are plain data: the
//! host may build them in code, start from a preset, or parse them from JSON.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::level::{LevelParams, default_levels};

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
            "normal" | "norm" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Crush damage for this preset
    pub fn crush_damage(&self) -> u8 {
        match self {
            Difficulty::Easy => CRUSH_DAMAGE / 2,
            Difficulty::Normal => CRUSH_DAMAGE,
            Difficulty::Hard => CRUSH_DAMAGE * 2,
        }
    }

    /// Water damage per exposure for this preset
    pub fn water_damage(&self) -> u8 {
        match self {
            Difficulty::Easy => WATER_DAMAGE / 2,
            Difficulty::Normal => WATER_DAMAGE,
            Difficulty::Hard => WATER_DAMAGE * 2,
        }
    }

    /// Gravity cadence for this preset (faster collapse on Hard)
    pub fn gravity_cadence(&self) -> u32 {
        match self {
            Difficulty::Easy => GRAVITY_CADENCE * 2,
            Difficulty::Normal => GRAVITY_CADENCE,
            Difficulty::Hard => (GRAVITY_CADENCE / 2).max(1),
        }
    }
}

/// Simulation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Difficulty preset the damage values were derived from
    pub difficulty: Difficulty,

    // === Grid ===
    pub grid_width: usize,
    pub grid_height: usize,

    // === Cadences (ticks between resolver runs) ===
    pub gravity_cadence: u32,
    pub water_cadence: u32,
    pub lava_cadence: u32,
    /// Probability (0-1) of a lava cell trying to spread sideways
    pub lava_lateral_chance: f64,

    // === Creature ===
    pub move_cooldown_ticks: u32,
    pub dig_lock_ticks: u32,

    // === Hazards ===
    pub crush_damage: u8,
    pub crush_cooldown_ticks: u32,
    pub water_damage: u8,
    pub water_cooldown_ticks: u32,

    // === Levels ===
    #[serde(default = "default_levels")]
    pub levels: Vec<LevelParams>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,

            grid_width: GRID_WIDTH,
            grid_height: GRID_HEIGHT,

            gravity_cadence: GRAVITY_CADENCE,
            water_cadence: WATER_CADENCE,
            lava_cadence: LAVA_CADENCE,
            lava_lateral_chance: LAVA_LATERAL_CHANCE,

            move_cooldown_ticks: MOVE_COOLDOWN_TICKS,
            dig_lock_ticks: DIG_LOCK_TICKS,

            crush_damage: CRUSH_DAMAGE,
            crush_cooldown_ticks: CRUSH_COOLDOWN_TICKS,
            water_damage: WATER_DAMAGE,
            water_cooldown_ticks: WATER_COOLDOWN_TICKS,

            levels: default_levels(),
        }
    }
}

impl Settings {
    /// Create settings from a difficulty preset (applies preset defaults)
    pub fn from_preset(preset: Difficulty) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a difficulty preset (updates difficulty-dependent settings)
    pub fn apply_preset(&mut self, preset: Difficulty) {
        self.difficulty = preset;
        self.crush_damage = preset.crush_damage();
        self.water_damage = preset.water_damage();
        self.gravity_cadence = preset.gravity_cadence();
    }

    /// Check that a simulation can be built from these settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        for (resolver, cadence) in [
            ("gravity", self.gravity_cadence),
            ("water", self.water_cadence),
            ("lava", self.lava_cadence),
        ] {
            if cadence == 0 {
                return Err(ConfigError::ZeroCadence { resolver });
            }
        }
        if self.lava_cadence <= self.water_cadence {
            return Err(ConfigError::LavaFasterThanWater {
                water: self.water_cadence,
                lava: self.lava_cadence,
            });
        }
        if !(0.0..=1.0).contains(&self.lava_lateral_chance) {
            return Err(ConfigError::LavaChanceOutOfRange);
        }
        if self.levels.is_empty() {
            return Err(ConfigError::NoLevels);
        }
        for (index, level) in self.levels.iter().enumerate() {
            level
                .validate(self.grid_width, self.grid_height)
                .map_err(|reason| ConfigError::InvalidLevel { level: index, reason })?;
        }
        Ok(())
    }

    /// Parse and validate settings from JSON text
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        log::info!(
            "Loaded settings: {} difficulty, {}x{} grid, {} levels",
            settings.difficulty.as_str(),
            settings.grid_width,
            settings.grid_height,
            settings.levels.len()
        );
        Ok(settings)
    }

    /// Serialize settings to JSON text
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
