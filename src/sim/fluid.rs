//! Water and lava flow
//!
//! Both fluids use a double-buffered pass: the step reads from a snapshot of
//! the grid taken when it starts and writes into the live grid. A move is only
//! made into a cell that is Empty in *both* buffers, so two sources can never
//! converge on one destination and the fluid is conserved.

use glam::IVec2;
use rand::Rng;

use super::grid::Grid;
use super::material::Material;

/// How a fluid spreads sideways when it cannot fall
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowRule {
    pub fluid: Material,
    /// Probability (0-1) that a blocked cell tries to spread sideways this step
    pub lateral_chance: f64,
}

impl FlowRule {
    pub const WATER: FlowRule = FlowRule {
        fluid: Material::Water,
        lateral_chance: 1.0,
    };

    pub fn lava(lateral_chance: f64) -> Self {
        Self {
            fluid: Material::Lava,
            lateral_chance,
        }
    }
}

/// One water step. Returns the number of cells that moved.
pub fn step_water<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) -> u32 {
    step_fluid(grid, FlowRule::WATER, rng)
}

/// One lava step. Lava falls like water but only sometimes spreads sideways.
pub fn step_lava<R: Rng + ?Sized>(grid: &mut Grid, lateral_chance: f64, rng: &mut R) -> u32 {
    step_fluid(grid, FlowRule::lava(lateral_chance), rng)
}

/// Shared double-buffered flow pass, bottom-to-top
pub fn step_fluid<R: Rng + ?Sized>(grid: &mut Grid, rule: FlowRule, rng: &mut R) -> u32 {
    let read = grid.clone();
    let open = |grid: &Grid, pos: IVec2| {
        read.get(pos) == Some(Material::Empty) && grid.get(pos) == Some(Material::Empty)
    };

    let mut moved = 0;
    for y in (0..read.height() as i32).rev() {
        for x in 0..read.width() as i32 {
            let pos = IVec2::new(x, y);
            if read.get(pos) != Some(rule.fluid) {
                continue;
            }

            let below = pos + IVec2::Y;
            if open(grid, below) {
                grid.move_cell(pos, below);
                moved += 1;
                continue;
            }

            if rule.lateral_chance < 1.0 && !rng.random_bool(rule.lateral_chance.clamp(0.0, 1.0))
            {
                continue;
            }

            let first = if rng.random_bool(0.5) { IVec2::X } else { IVec2::NEG_X };
            for side in [first, -first] {
                let target = pos + side;
                if open(grid, target) {
                    grid.move_cell(pos, target);
                    moved += 1;
                    break;
                }
            }
        }
    }
    moved
}
