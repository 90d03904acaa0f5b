//! Dig interaction: the creature chews through the cell it faces

use glam::IVec2;

use super::creature::Creature;
use super::grid::Grid;
use super::ledger::{RunLedger, gem_score};
use super::material::Material;
use crate::consts::DIG_SCORE;

/// Outcome of a successful dig
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigResult {
    /// Cell that was hit
    pub pos: IVec2,
    /// Material the cell held before the hit
    pub material: Material,
    /// Whether the cell was cleared (false for a first hit on rock)
    pub cleared: bool,
    pub gem_found: bool,
    /// Score awarded for this dig
    pub points: u64,
}

/// Dig the cell the creature faces.
///
/// Returns `None` without touching anything when the target is out of bounds,
/// not diggable, or the creature is still busy with the previous dig.
/// `sky_rows` anchors the depth used for the gem bonus.
pub fn dig(
    grid: &mut Grid,
    creature: &mut Creature,
    ledger: &mut RunLedger,
    sky_rows: usize,
    dig_lock_ticks: u32,
) -> Option<DigResult> {
    if creature.is_digging() {
        return None;
    }

    let pos = creature.facing_cell();
    let material = grid.get(pos).filter(|m| m.is_diggable())?;

    creature.dig_timer = dig_lock_ticks;

    // First hit on fresh rock only cracks it
    if material == Material::Rock && grid.durability(pos) > 1 {
        grid.set_durability(pos, grid.durability(pos) - 1);
        return Some(DigResult {
            pos,
            material,
            cleared: false,
            gem_found: false,
            points: 0,
        });
    }

    grid.set(pos, Material::Empty);
    ledger.blocks_dug += 1;

    let gem_found = material == Material::Gem;
    let points = if gem_found {
        ledger.gems_collected += 1;
        let depth = (pos.y - sky_rows as i32).max(0) as u32;
        gem_score(depth)
    } else {
        DIG_SCORE
    };
    ledger.score += points;

    Some(DigResult {
        pos,
        material,
        cleared: true,
        gem_found,
        points,
    })
}
