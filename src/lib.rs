//! Burrow - a destructible-terrain digging simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (terrain grid, gravity, fluids, digging, run state)
//! - `settings`: Data-driven tuning with difficulty presets
//! - `audio`: Sound cue mapping for simulation events
//! - `highscores`: Leaderboard fed by run results

pub mod audio;
pub mod error;
pub mod highscores;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, LevelError};
pub use highscores::HighScores;
pub use settings::{Difficulty, Settings};

/// Game configuration constants
pub mod consts {
    /// Simulation ticks per second (one tick per animation frame)
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Default grid dimensions (cells)
    pub const GRID_WIDTH: usize = 32;
    pub const GRID_HEIGHT: usize = 48;

    /// Creature health
    pub const MAX_HEALTH: u8 = 100;

    /// Resolver cadences (ticks between runs); lava is the most viscous
    pub const GRAVITY_CADENCE: u32 = 4;
    pub const WATER_CADENCE: u32 = 8;
    pub const LAVA_CADENCE: u32 = 20;
    /// Chance that a lava cell attempts lateral flow on a lava tick
    pub const LAVA_LATERAL_CHANCE: f64 = 0.3;

    /// Ticks between accepted moves
    pub const MOVE_COOLDOWN_TICKS: u32 = 8;
    /// Ticks a dig locks out movement and further digging
    pub const DIG_LOCK_TICKS: u32 = 12;

    /// Damage from a falling block landing on the creature
    pub const CRUSH_DAMAGE: u8 = 25;
    pub const CRUSH_COOLDOWN_TICKS: u32 = 30;
    /// Damage per water exposure
    pub const WATER_DAMAGE: u8 = 5;
    pub const WATER_COOLDOWN_TICKS: u32 = 30;

    /// Hit count of a freshly generated rock cell
    pub const ROCK_DURABILITY: u8 = 2;

    /// Scoring
    pub const DIG_SCORE: u64 = 1;
    pub const GEM_BASE_SCORE: u64 = 50;
    pub const GEM_DEPTH_BONUS: u64 = 10;
    /// Points per remaining health point on final victory
    pub const VICTORY_HEALTH_BONUS: u64 = 10;

    /// Placement attempt budgets for the level generator
    pub const GEM_PLACEMENT_ATTEMPTS: u32 = 1000;
    pub const POCKET_PLACEMENT_ATTEMPTS: u32 = 100;
}
