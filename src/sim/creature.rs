//! The digging creature and its grid-stepping movement
//!
//! Movement is discrete: one cell per accepted input. Any smoothing between
//! cells is a rendering concern and never feeds back into collision.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::grid::Grid;
use crate::consts::MAX_HEALTH;

/// Cardinal facing / movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl Direction {
    /// Grid offset (row 0 is the top, so Up is -y)
    #[inline]
    pub fn offset(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::NEG_Y,
            Direction::Down => IVec2::Y,
            Direction::Left => IVec2::NEG_X,
            Direction::Right => IVec2::X,
        }
    }
}

/// The player-controlled creature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creature {
    /// Grid cell (x = column, y = row)
    pub pos: IVec2,
    pub facing: Direction,
    pub health: u8,
    /// Ticks until falling blocks can hurt again
    pub crush_cooldown: u32,
    /// Ticks until water can hurt again
    pub water_cooldown: u32,
    /// Ticks until the next move is accepted
    pub move_cooldown: u32,
    /// Ticks left in the current dig; digging while non-zero
    pub dig_timer: u32,
}

impl Creature {
    pub fn new(spawn: IVec2) -> Self {
        Self {
            pos: spawn,
            facing: Direction::Down,
            health: MAX_HEALTH,
            crush_cooldown: 0,
            water_cooldown: 0,
            move_cooldown: 0,
            dig_timer: 0,
        }
    }

    #[inline]
    pub fn is_digging(&self) -> bool {
        self.dig_timer > 0
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Cell the creature is facing (dig target)
    #[inline]
    pub fn facing_cell(&self) -> IVec2 {
        self.pos + self.facing.offset()
    }

    /// Count down every timer by one tick
    pub fn tick_timers(&mut self) {
        self.crush_cooldown = self.crush_cooldown.saturating_sub(1);
        self.water_cooldown = self.water_cooldown.saturating_sub(1);
        self.move_cooldown = self.move_cooldown.saturating_sub(1);
        self.dig_timer = self.dig_timer.saturating_sub(1);
    }

    /// Subtract health, returning the damage actually taken
    pub fn take_damage(&mut self, amount: u8) -> u8 {
        let taken = amount.min(self.health);
        self.health -= taken;
        taken
    }

    /// Try to step one cell in `direction`.
    ///
    /// Ignored entirely while digging. Otherwise the creature turns to face
    /// `direction` even if the step is then refused (move cooldown running,
    /// out of bounds or solid), which lets it dig sideways without moving.
    pub fn try_move(&mut self, direction: Direction, grid: &Grid, cooldown_ticks: u32) -> bool {
        if self.is_digging() {
            return false;
        }

        self.facing = direction;
        if self.move_cooldown > 0 {
            return false;
        }

        let target = self.pos + direction.offset();
        match grid.get(target) {
            Some(material) if material.is_passable() => {
                self.pos = target;
                self.move_cooldown = cooldown_ticks;
                true
            }
            _ => false,
        }
    }
}
