//! Cell materials and their classification

use serde::{Deserialize, Serialize};

/// Content of one grid cell
///
/// `#[repr(u8)]` so a renderer can upload the grid as raw bytes
/// (see [`super::grid::Grid::as_bytes`]).
#[repr(u8)]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, bytemuck::NoUninit,
)]
pub enum Material {
    #[default]
    Empty = 0,
    Grass = 1,
    Soil = 2,
    Rock = 3,
    Gem = 4,
    Water = 5,
    Lava = 6,
    Bedrock = 7,
    /// Open sky above the terrain; collides like Empty
    Surface = 8,
}

impl Material {
    pub const ALL: [Material; 9] = [
        Material::Empty,
        Material::Grass,
        Material::Soil,
        Material::Rock,
        Material::Gem,
        Material::Water,
        Material::Lava,
        Material::Bedrock,
        Material::Surface,
    ];

    /// Blocks creature movement
    #[inline]
    pub fn is_solid(self) -> bool {
        matches!(
            self,
            Material::Grass | Material::Soil | Material::Rock | Material::Gem | Material::Bedrock
        )
    }

    /// Creature may occupy this cell
    #[inline]
    pub fn is_passable(self) -> bool {
        !self.is_solid()
    }

    #[inline]
    pub fn is_diggable(self) -> bool {
        matches!(
            self,
            Material::Grass | Material::Soil | Material::Rock | Material::Gem
        )
    }

    /// Drops into an Empty cell below during a gravity sweep
    #[inline]
    pub fn falls(self) -> bool {
        matches!(self, Material::Soil | Material::Rock)
    }

    #[inline]
    pub fn is_fluid(self) -> bool {
        matches!(self, Material::Water | Material::Lava)
    }

    /// Debug glyph for text dumps of the grid
    pub fn glyph(self) -> char {
        match self {
            Material::Empty => ' ',
            Material::Grass => '"',
            Material::Soil => '.',
            Material::Rock => '#',
            Material::Gem => '*',
            Material::Water => '~',
            Material::Lava => '^',
            Material::Bedrock => '=',
            Material::Surface => ' ',
        }
    }
}
