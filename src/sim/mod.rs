//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (row-major sweeps)
//! - No rendering or platform dependencies

pub mod creature;
pub mod dig;
pub mod fluid;
pub mod gravity;
pub mod grid;
pub mod ledger;
pub mod level;
pub mod material;
pub mod state;
pub mod tick;

pub use creature::{Creature, Direction};
pub use dig::{DigResult, dig};
pub use fluid::{FlowRule, step_fluid, step_lava, step_water};
pub use gravity::{Crush, GravityOutcome, step_gravity};
pub use grid::Grid;
pub use ledger::{Hazard, RunLedger, gem_score, resolve_hazard};
pub use level::{GeneratedLevel, LevelParams, default_levels, generate};
pub use material::Material;
pub use state::{
    DamageCause, EventSink, GameEvent, RunState, Snapshot, TerrainSimulation, level_seed,
};
pub use tick::{TickInput, tick};
