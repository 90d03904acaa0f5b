//! Error types for simulation construction and configuration.

use std::fmt;

/// Errors arising from invalid settings, level tables or stored data.
///
/// The simulation itself never fails once constructed; everything that can go
/// wrong is caught here, before the first level is generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Grid has zero width or height.
    EmptyGrid,
    /// A resolver cadence of zero.
    ZeroCadence {
        /// Which resolver.
        resolver: &'static str,
    },
    /// The level table has no levels.
    NoLevels,
    /// Lava must run on a slower cadence than water.
    LavaFasterThanWater {
        water: u32,
        lava: u32,
    },
    /// Lava lateral chance is not a probability in 0-1 (or is NaN).
    LavaChanceOutOfRange,
    /// A level's bands are unusable for the configured grid.
    InvalidLevel {
        /// Index into the level table.
        level: usize,
        /// What went wrong.
        reason: LevelError,
    },
    /// Stored grid arrays do not match its dimensions.
    GridShape {
        width: usize,
        height: usize,
        cells: usize,
        durability: usize,
    },
    /// Stored grid has durability on a non-Rock cell.
    StrayDurability,
    /// Settings text could not be parsed.
    Parse {
        /// Parser message.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGrid => write!(f, "grid must have at least one cell"),
            Self::ZeroCadence { resolver } => {
                write!(f, "{resolver} cadence must be at least one tick")
            }
            Self::LavaFasterThanWater { water, lava } => write!(
                f,
                "lava cadence ({lava}) must be slower than water cadence ({water})"
            ),
            Self::LavaChanceOutOfRange => {
                write!(f, "lava lateral chance must be between 0 and 1")
            }
            Self::NoLevels => write!(f, "level table is empty"),
            Self::InvalidLevel { level, reason } => {
                write!(f, "level {level} is invalid: {reason}")
            }
            Self::GridShape {
                width,
                height,
                cells,
                durability,
            } => write!(
                f,
                "{width}x{height} grid stored with {cells} cells and {durability} durability values"
            ),
            Self::StrayDurability => write!(f, "grid has durability on a non-rock cell"),
            Self::Parse { reason } => write!(f, "failed to parse settings: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Why a single level's parameters were rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelError {
    /// Grid has no columns to carve a spawn in.
    NoColumns,
    NoSkyRows,
    /// The spawn tunnel is carved in the first grass row.
    NoGrassRows,
    /// Bands leave no bedrock row at the bottom.
    NoBedrock {
        /// Rows taken by sky, grass, soil and rock.
        bands: usize,
        height: usize,
    },
    ZeroGemTarget,
    TargetExceedsGems {
        target: u32,
        gems: u32,
    },
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoColumns => write!(f, "grid has no columns"),
            Self::NoSkyRows => write!(f, "needs at least one sky row"),
            Self::NoGrassRows => write!(f, "needs at least one grass row for the spawn tunnel"),
            Self::NoBedrock { bands, height } => write!(
                f,
                "bands fill {bands} rows but the grid has {height}; at least one bedrock row is required"
            ),
            Self::ZeroGemTarget => write!(f, "gem target must be at least one"),
            Self::TargetExceedsGems { target, gems } => {
                write!(f, "gem target {target} exceeds gem count {gems}")
            }
        }
    }
}

impl std::error::Error for LevelError {}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse {
            reason: err.to_string(),
        }
    }
}
