//! Material grid with per-cell rock durability
//!
//! Row-major storage, row 0 at the top. Positions are `IVec2 { x: col, y: row }`.
//! Every accessor is bounds-checked; out-of-bounds reads yield `None` and
//! out-of-bounds writes are ignored.

use std::collections::VecDeque;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::material::Material;
use crate::error::ConfigError;

/// The four cardinal neighbour offsets, in BFS visiting order
pub const CARDINALS: [IVec2; 4] = [IVec2::NEG_Y, IVec2::X, IVec2::Y, IVec2::NEG_X];

/// Fixed-size terrain grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GridData")]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Material>,
    /// Remaining hits per cell; non-zero only on Rock
    durability: Vec<u8>,
}

/// Unchecked serialized form of [`Grid`]
#[derive(Deserialize)]
struct GridData {
    width: usize,
    height: usize,
    cells: Vec<Material>,
    durability: Vec<u8>,
}

impl TryFrom<GridData> for Grid {
    type Error = ConfigError;

    fn try_from(data: GridData) -> Result<Self, Self::Error> {
        let expected = data.width.checked_mul(data.height);
        if expected != Some(data.cells.len()) || data.durability.len() != data.cells.len() {
            return Err(ConfigError::GridShape {
                width: data.width,
                height: data.height,
                cells: data.cells.len(),
                durability: data.durability.len(),
            });
        }
        let grid = Grid {
            width: data.width,
            height: data.height,
            cells: data.cells,
            durability: data.durability,
        };
        if !grid.durability_consistent() {
            return Err(ConfigError::StrayDurability);
        }
        Ok(grid)
    }
}

impl Grid {
    /// Create a grid filled with one material (durability all zero)
    pub fn filled(width: usize, height: usize, material: Material) -> Self {
        Self {
            width,
            height,
            cells: vec![material; width * height],
            durability: vec![0; width * height],
        }
    }

    /// Create an all-Empty grid
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, Material::Empty)
    }

    /// Build a grid from text rows using [`Material::glyph`] characters.
    ///
    /// `' '` maps to Empty and `'_'` to Surface. Rock cells get
    /// `rock_durability`. Short rows are padded with Empty.
    pub fn from_rows(rows: &[&str], rock_durability: u8) -> Self {
        let height = rows.len();
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        let mut grid = Self::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                let material = match ch {
                    '"' => Material::Grass,
                    '.' => Material::Soil,
                    '#' => Material::Rock,
                    '*' => Material::Gem,
                    '~' => Material::Water,
                    '^' => Material::Lava,
                    '=' => Material::Bedrock,
                    '_' => Material::Surface,
                    _ => Material::Empty,
                };
                grid.set(IVec2::new(x as i32, y as i32), material);
                if material == Material::Rock {
                    grid.set_durability(IVec2::new(x as i32, y as i32), rock_durability);
                }
            }
        }
        grid
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn in_bounds(&self, pos: IVec2) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    #[inline]
    fn idx(&self, pos: IVec2) -> Option<usize> {
        self.in_bounds(pos)
            .then(|| pos.y as usize * self.width + pos.x as usize)
    }

    /// Material at `pos`, `None` when out of bounds
    #[inline]
    pub fn get(&self, pos: IVec2) -> Option<Material> {
        self.idx(pos).map(|i| self.cells[i])
    }

    /// Durability at `pos` (0 when out of bounds)
    #[inline]
    pub fn durability(&self, pos: IVec2) -> u8 {
        self.idx(pos).map(|i| self.durability[i]).unwrap_or(0)
    }

    /// Whether `pos` is in bounds and holds a solid material
    #[inline]
    pub fn is_solid(&self, pos: IVec2) -> bool {
        self.get(pos).is_some_and(Material::is_solid)
    }

    /// Set the material at `pos`. Any non-Rock material clears durability so
    /// the durability invariant cannot be broken through this call.
    pub fn set(&mut self, pos: IVec2, material: Material) {
        if let Some(i) = self.idx(pos) {
            self.cells[i] = material;
            if material != Material::Rock {
                self.durability[i] = 0;
            }
        }
    }

    /// Set durability at `pos`; ignored unless the cell is Rock
    pub fn set_durability(&mut self, pos: IVec2, value: u8) {
        if let Some(i) = self.idx(pos)
            && self.cells[i] == Material::Rock
        {
            self.durability[i] = value;
        }
    }

    /// Move a cell's material and durability from `from` to `to`, leaving Empty behind
    pub fn move_cell(&mut self, from: IVec2, to: IVec2) {
        let (Some(a), Some(b)) = (self.idx(from), self.idx(to)) else {
            return;
        };
        self.cells[b] = self.cells[a];
        self.durability[b] = self.durability[a];
        self.cells[a] = Material::Empty;
        self.durability[a] = 0;
    }

    /// Count cells holding `material`
    pub fn count(&self, material: Material) -> usize {
        self.cells.iter().filter(|&&m| m == material).count()
    }

    /// Iterate `(pos, material)` in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (IVec2, Material)> + '_ {
        self.cells.iter().enumerate().map(move |(i, &m)| {
            let pos = IVec2::new((i % self.width) as i32, (i / self.width) as i32);
            (pos, m)
        })
    }

    /// Raw material slice (row-major)
    pub fn cells(&self) -> &[Material] {
        &self.cells
    }

    /// Zero-copy byte view of the materials for renderer uploads
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.cells)
    }

    /// True if durability is non-zero only on Rock cells
    pub fn durability_consistent(&self) -> bool {
        self.cells
            .iter()
            .zip(&self.durability)
            .all(|(&m, &d)| m == Material::Rock || d == 0)
    }

    /// Breadth-first search from `start` for the nearest Empty cell.
    ///
    /// The search walks 4-connected neighbours through any material, so the
    /// result is the Empty cell with the smallest grid distance (ties broken
    /// by [`CARDINALS`] order). `start` itself qualifies if Empty.
    pub fn nearest_empty(&self, start: IVec2) -> Option<IVec2> {
        let start_idx = self.idx(start)?;
        let mut visited = vec![false; self.cells.len()];
        let mut queue = VecDeque::new();
        visited[start_idx] = true;
        queue.push_back(start);

        while let Some(pos) = queue.pop_front() {
            if self.get(pos) == Some(Material::Empty) {
                return Some(pos);
            }
            for offset in CARDINALS {
                let next = pos + offset;
                if let Some(i) = self.idx(next)
                    && !visited[i]
                {
                    visited[i] = true;
                    queue.push_back(next);
                }
            }
        }
        None
    }

    /// Render the grid as text rows of glyphs (debugging aid)
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for row in self.cells.chunks(self.width.max(1)) {
            out.extend(row.iter().map(|m| m.glyph()));
            out.push('\n');
        }
        out
    }
}
