//! Level parameters and terrain generation
//!
//! A level is a stack of horizontal bands (sky, grass, soil, rock, bedrock)
//! sprinkled with gems and pockets of water and lava. Generation takes an
//! injected RNG so a seeded run always digs through the same terrain.

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::grid::Grid;
use super::material::Material;
use crate::consts::*;
use crate::error::LevelError;

/// Static per-level configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelParams {
    /// Open sky rows at the top of the grid
    pub sky_rows: usize,
    pub grass_rows: usize,
    pub soil_rows: usize,
    pub rock_rows: usize,
    /// Gems to scatter through soil and rock
    pub gem_count: u32,
    pub water_pockets: u32,
    pub lava_pockets: u32,
    /// Gems needed (plus a trip back to the surface) to finish the level
    pub gem_target: u32,
}

impl LevelParams {
    /// First grass row; also the spawn row
    #[inline]
    pub fn grass_top(&self) -> usize {
        self.sky_rows
    }

    /// First row below the grass band
    #[inline]
    pub fn soil_top(&self) -> usize {
        self.sky_rows + self.grass_rows
    }

    #[inline]
    pub fn rock_top(&self) -> usize {
        self.soil_top() + self.soil_rows
    }

    /// First bedrock row; everything from here down is undiggable
    #[inline]
    pub fn bedrock_top(&self) -> usize {
        self.rock_top() + self.rock_rows
    }

    /// Check that these parameters produce a usable level on a `width x height` grid
    pub fn validate(&self, width: usize, height: usize) -> Result<(), LevelError> {
        if width == 0 {
            return Err(LevelError::NoColumns);
        }
        if self.sky_rows == 0 {
            return Err(LevelError::NoSkyRows);
        }
        if self.grass_rows == 0 {
            return Err(LevelError::NoGrassRows);
        }
        if self.bedrock_top() >= height {
            return Err(LevelError::NoBedrock {
                bands: self.bedrock_top(),
                height,
            });
        }
        if self.gem_target == 0 {
            return Err(LevelError::ZeroGemTarget);
        }
        if self.gem_target > self.gem_count {
            return Err(LevelError::TargetExceedsGems {
                target: self.gem_target,
                gems: self.gem_count,
            });
        }
        Ok(())
    }
}

/// Built-in level table: each level is deeper, rockier and more hazardous
pub fn default_levels() -> Vec<LevelParams> {
    vec![
        LevelParams {
            sky_rows: 4,
            grass_rows: 1,
            soil_rows: 12,
            rock_rows: 14,
            gem_count: 8,
            water_pockets: 2,
            lava_pockets: 0,
            gem_target: 5,
        },
        LevelParams {
            sky_rows: 4,
            grass_rows: 1,
            soil_rows: 10,
            rock_rows: 18,
            gem_count: 10,
            water_pockets: 3,
            lava_pockets: 1,
            gem_target: 6,
        },
        LevelParams {
            sky_rows: 4,
            grass_rows: 1,
            soil_rows: 8,
            rock_rows: 22,
            gem_count: 12,
            water_pockets: 4,
            lava_pockets: 2,
            gem_target: 8,
        },
        LevelParams {
            sky_rows: 4,
            grass_rows: 1,
            soil_rows: 6,
            rock_rows: 26,
            gem_count: 14,
            water_pockets: 5,
            lava_pockets: 3,
            gem_target: 10,
        },
        LevelParams {
            sky_rows: 4,
            grass_rows: 1,
            soil_rows: 5,
            rock_rows: 30,
            gem_count: 16,
            water_pockets: 6,
            lava_pockets: 5,
            gem_target: 12,
        },
    ]
}

/// Output of [`generate`]
#[derive(Debug, Clone)]
pub struct GeneratedLevel {
    pub grid: Grid,
    /// Carved spawn tunnel in the first grass row
    pub spawn: IVec2,
    pub gems_placed: u32,
    pub water_pockets_placed: u32,
    pub lava_pockets_placed: u32,
}

/// Generate a level's terrain.
///
/// Placement that runs out of attempts is skipped, so a level may end up with
/// fewer gems or pockets than `params` asks for.
pub fn generate<R: Rng + ?Sized>(
    params: &LevelParams,
    width: usize,
    height: usize,
    rng: &mut R,
) -> GeneratedLevel {
    let mut grid = fill_bands(params, width, height);

    let gems_placed = place_gems(&mut grid, params, rng);

    // Water sits in the lower two thirds of the diggable band
    let band_top = params.soil_top();
    let band_bottom = params.bedrock_top().min(height);
    let band_len = band_bottom.saturating_sub(band_top);
    let water_rows = (band_top + band_len / 3)..band_bottom;
    let mut water_pockets_placed = 0;
    for _ in 0..params.water_pockets {
        if place_pocket(&mut grid, rng, water_rows.clone(), Material::Water, 2..=4, |m| {
            matches!(m, Material::Soil | Material::Rock)
        }) {
            water_pockets_placed += 1;
        }
    }

    // Lava only in rock, and only past the band midpoint
    let lava_rows = params.rock_top().max(band_top + band_len / 2)..band_bottom;
    let mut lava_pockets_placed = 0;
    for _ in 0..params.lava_pockets {
        if place_pocket(&mut grid, rng, lava_rows.clone(), Material::Lava, 2..=5, |m| {
            m == Material::Rock
        }) {
            lava_pockets_placed += 1;
        }
    }

    let spawn = IVec2::new((width / 2) as i32, params.grass_top() as i32);
    grid.set(spawn, Material::Empty);

    if gems_placed < params.gem_count
        || water_pockets_placed < params.water_pockets
        || lava_pockets_placed < params.lava_pockets
    {
        log::debug!(
            "Placement shortfall: gems {}/{}, water {}/{}, lava {}/{}",
            gems_placed,
            params.gem_count,
            water_pockets_placed,
            params.water_pockets,
            lava_pockets_placed,
            params.lava_pockets
        );
    }

    GeneratedLevel {
        grid,
        spawn,
        gems_placed,
        water_pockets_placed,
        lava_pockets_placed,
    }
}

/// Lay down the horizontal material bands
fn fill_bands(params: &LevelParams, width: usize, height: usize) -> Grid {
    let mut grid = Grid::filled(width, height, Material::Bedrock);
    for y in 0..height.min(params.bedrock_top()) {
        let material = if y < params.grass_top() {
            Material::Surface
        } else if y < params.soil_top() {
            Material::Grass
        } else if y < params.rock_top() {
            Material::Soil
        } else {
            Material::Rock
        };
        for x in 0..width {
            let pos = IVec2::new(x as i32, y as i32);
            grid.set(pos, material);
            if material == Material::Rock {
                grid.set_durability(pos, ROCK_DURABILITY);
            }
        }
    }
    grid
}

/// Rejection-sample gem positions on soil or rock below the grass band
fn place_gems<R: Rng + ?Sized>(grid: &mut Grid, params: &LevelParams, rng: &mut R) -> u32 {
    let rows = params.soil_top()..params.bedrock_top().min(grid.height());
    if rows.is_empty() || grid.width() == 0 {
        return 0;
    }

    let mut placed = 0;
    let mut attempts = 0;
    while placed < params.gem_count && attempts < GEM_PLACEMENT_ATTEMPTS {
        attempts += 1;
        let pos = IVec2::new(
            rng.random_range(0..grid.width()) as i32,
            rng.random_range(rows.clone()) as i32,
        );
        if matches!(grid.get(pos), Some(Material::Soil | Material::Rock)) {
            grid.set(pos, Material::Gem);
            placed += 1;
        }
    }
    placed
}

/// Drop one clump of `fluid` around a random centre in `rows`.
///
/// Returns true if at least one cell was converted.
fn place_pocket<R: Rng + ?Sized>(
    grid: &mut Grid,
    rng: &mut R,
    rows: std::ops::Range<usize>,
    fluid: Material,
    size: std::ops::RangeInclusive<u32>,
    accepts: impl Fn(Material) -> bool,
) -> bool {
    if rows.is_empty() || grid.width() == 0 {
        return false;
    }

    for _ in 0..POCKET_PLACEMENT_ATTEMPTS {
        let center = IVec2::new(
            rng.random_range(0..grid.width()) as i32,
            rng.random_range(rows.clone()) as i32,
        );
        if !grid.get(center).is_some_and(&accepts) {
            continue;
        }

        let cells = rng.random_range(size.clone());
        let mut converted = 0;
        for _ in 0..cells {
            let jitter = IVec2::new(rng.random_range(-1..=1), rng.random_range(-1..=1));
            let pos = center + jitter;
            if grid.get(pos).is_some_and(&accepts) {
                grid.set(pos, fluid);
                converted += 1;
            }
        }
        if converted > 0 {
            return true;
        }
    }
    false
}
