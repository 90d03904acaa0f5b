//! Per-level score/gem ledger and hazard resolution

use serde::{Deserialize, Serialize};

use super::creature::Creature;
use super::grid::Grid;
use super::material::Material;
use crate::consts::*;

/// Score and progress for the current level
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunLedger {
    pub score: u64,
    pub gems_collected: u32,
    pub gems_target: u32,
    /// Deepest row the creature has stood in this level
    pub deepest_row: i32,
    /// Cells cleared this level (cosmetic only)
    pub blocks_dug: u32,
}

impl RunLedger {
    pub fn new(gems_target: u32, spawn_row: i32) -> Self {
        Self {
            gems_target,
            deepest_row: spawn_row,
            ..Default::default()
        }
    }

    /// Record the creature's current row
    pub fn observe_row(&mut self, row: i32) {
        self.deepest_row = self.deepest_row.max(row);
    }

    #[inline]
    pub fn target_met(&self) -> bool {
        self.gems_collected >= self.gems_target
    }

    /// Cosmetic size factor that grows with digging (1.0 up to 1.5)
    pub fn size_factor(&self) -> f32 {
        1.0 + self.blocks_dug.min(100) as f32 * 0.005
    }
}

/// Points for a gem dug out `depth` rows below the sky band
#[inline]
pub fn gem_score(depth: u32) -> u64 {
    GEM_BASE_SCORE + GEM_DEPTH_BONUS * depth as u64
}

/// Result of checking the creature's cell for hazards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hazard {
    None,
    Damage(u8),
    Death,
}

/// Apply whatever the creature's current cell does to it.
///
/// Water hurts a little on its own cooldown; lava kills outright regardless of
/// any cooldown.
pub fn resolve_hazard(
    creature: &mut Creature,
    grid: &Grid,
    water_damage: u8,
    water_cooldown_ticks: u32,
) -> Hazard {
    match grid.get(creature.pos) {
        Some(Material::Lava) => {
            creature.health = 0;
            Hazard::Death
        }
        Some(Material::Water) if creature.water_cooldown == 0 => {
            creature.water_cooldown = water_cooldown_ticks;
            let taken = creature.take_damage(water_damage);
            if creature.is_alive() {
                Hazard::Damage(taken)
            } else {
                Hazard::Death
            }
        }
        _ => Hazard::None,
    }
}
