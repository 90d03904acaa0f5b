//! Gravity resolver
//!
//! One sweep drops every unsupported soil/rock cell by a single row. The
//! sweep runs bottom-to-top so a block that just fell is never visited again
//! in the same pass.

use glam::IVec2;

use super::creature::Creature;
use super::grid::Grid;
use super::material::Material;

/// A falling block landed on the creature and hurt it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crush {
    pub pos: IVec2,
    pub material: Material,
    pub damage: u8,
}

/// What one gravity sweep did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GravityOutcome {
    /// Cells that dropped a row
    pub fallen: u32,
    /// Crushes that actually dealt damage (cooldown permitting)
    pub crushes: Vec<Crush>,
    /// Where the creature was moved to after being buried
    pub rescued_to: Option<IVec2>,
}

/// Run one gravity sweep.
///
/// After the sweep the creature is guaranteed not to share a cell with solid
/// matter, as long as the grid still has an Empty cell anywhere.
pub fn step_gravity(
    grid: &mut Grid,
    creature: &mut Creature,
    crush_damage: u8,
    crush_cooldown_ticks: u32,
) -> GravityOutcome {
    let mut outcome = GravityOutcome::default();
    let height = grid.height() as i32;
    let width = grid.width() as i32;

    for y in (0..height - 1).rev() {
        for x in 0..width {
            let pos = IVec2::new(x, y);
            let below = pos + IVec2::Y;
            let Some(material) = grid.get(pos).filter(|m| m.falls()) else {
                continue;
            };
            if grid.get(below) != Some(Material::Empty) {
                continue;
            }

            grid.move_cell(pos, below);
            outcome.fallen += 1;

            if below == creature.pos && creature.crush_cooldown == 0 {
                let damage = creature.take_damage(crush_damage);
                creature.crush_cooldown = crush_cooldown_ticks;
                outcome.crushes.push(Crush {
                    pos: below,
                    material,
                    damage,
                });
            }
        }
    }

    if grid.is_solid(creature.pos) {
        outcome.rescued_to = rescue(grid, creature);
    }

    outcome
}

/// Move a buried creature to the nearest Empty cell
fn rescue(grid: &Grid, creature: &mut Creature) -> Option<IVec2> {
    match grid.nearest_empty(creature.pos) {
        Some(free) => {
            log::debug!("Creature buried at {} moved to {}", creature.pos, free);
            creature.pos = free;
            Some(free)
        }
        None => {
            log::error!(
                "Creature buried at {} and the grid has no Empty cell left",
                creature.pos
            );
            None
        }
    }
}
