//! Offset-coordinate hex grid: wall storage and adjacency.
//!
//! Rows are staggered: odd rows (`j & 1 == 1`) sit half a cell to the right of
//! even rows, so the diagonal neighbors shift with the parity of `j`.

use serde::{Deserialize, Serialize};

use crate::engine::error::GameError;

/// `(i, j)` cell address. Out-of-range values stand for "outside the grid".
pub type Coord = (i32, i32);

/// Neighbor offsets for even rows: left, top-left, top-right, right, bottom-right, bottom-left.
const EVEN_ROW_OFFSETS: [(i32, i32); 6] = [
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, 0),
    (0, 1),
    (-1, 1),
];

/// Neighbor offsets for odd rows, same order as [`EVEN_ROW_OFFSETS`].
const ODD_ROW_OFFSETS: [(i32, i32); 6] = [
    (-1, 0),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
];

/// Return the 6 neighbors of `(i, j)` in the fixed order
/// `[left, top-left, top-right, right, bottom-right, bottom-left]`.
///
/// Results may fall outside any particular grid; callers decide what that means.
pub fn hex_neighbors(i: i32, j: i32) -> [Coord; 6] {
    let offsets = if j & 1 == 0 {
        &EVEN_ROW_OFFSETS
    } else {
        &ODD_ROW_OFFSETS
    };
    offsets.map(|(di, dj)| (i + di, j + dj))
}

/// Read view of a single in-range cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub i: i32,
    pub j: i32,
    pub is_wall: bool,
}

/// Fixed-size grid of wall flags, stored row-major (`index = j * width + i`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HexGrid {
    width: i32,
    height: i32,
    walls: Vec<bool>,
}

/// Largest accepted width or height.
pub const MAX_DIMENSION: i32 = 1024;

/// Both dimensions must lie in `1..=MAX_DIMENSION`.
pub fn check_dimensions(width: i32, height: i32) -> Result<(), GameError> {
    if width < 1 || height < 1 {
        return Err(GameError::InvalidConfig(format!(
            "grid dimensions must be positive, got {width}x{height}"
        )));
    }
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(GameError::InvalidConfig(format!(
            "grid dimensions must be at most {MAX_DIMENSION}, got {width}x{height}"
        )));
    }
    Ok(())
}

impl HexGrid {
    /// Create an all-open grid. See [`check_dimensions`].
    pub fn new(width: i32, height: i32) -> Result<Self, GameError> {
        check_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            walls: vec![false; (width * height) as usize],
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.walls.len()
    }

    /// Always `false`: construction rejects empty grids.
    pub fn is_empty(&self) -> bool {
        self.walls.is_empty()
    }

    pub fn in_bounds(&self, i: i32, j: i32) -> bool {
        i >= 0 && i < self.width && j >= 0 && j < self.height
    }

    fn index(&self, i: i32, j: i32) -> Option<usize> {
        self.in_bounds(i, j).then(|| (j * self.width + i) as usize)
    }

    /// Inverse of the row-major index used for storage.
    pub fn coord_of(&self, index: usize) -> Coord {
        let index = index as i32;
        (index % self.width, index / self.width)
    }

    /// The cell at `(i, j)`, or `None` when the coordinate is outside the grid.
    pub fn cell_at(&self, i: i32, j: i32) -> Option<Cell> {
        self.index(i, j).map(|idx| Cell {
            i,
            j,
            is_wall: self.walls[idx],
        })
    }

    /// Out-of-range coordinates are never walls.
    pub fn is_wall(&self, i: i32, j: i32) -> bool {
        self.index(i, j).is_some_and(|idx| self.walls[idx])
    }

    /// In range and not walled.
    pub fn is_open(&self, i: i32, j: i32) -> bool {
        self.index(i, j).is_some_and(|idx| !self.walls[idx])
    }

    pub fn set_wall(&mut self, i: i32, j: i32, value: bool) -> Result<(), GameError> {
        let idx = self.index(i, j).ok_or(GameError::InvalidCoordinate {
            i,
            j,
            width: self.width,
            height: self.height,
        })?;
        self.walls[idx] = value;
        Ok(())
    }

    /// Open every cell.
    pub fn clear(&mut self) {
        self.walls.fill(false);
    }

    pub fn neighbors(&self, i: i32, j: i32) -> [Coord; 6] {
        hex_neighbors(i, j)
    }

    /// A cell is on the boundary iff at least one neighbor lies outside the grid.
    pub fn is_boundary(&self, i: i32, j: i32) -> bool {
        hex_neighbors(i, j)
            .iter()
            .any(|&(ni, nj)| !self.in_bounds(ni, nj))
    }

    pub fn wall_count(&self) -> usize {
        self.walls.iter().filter(|&&w| w).count()
    }

    /// Coordinates of all walled cells in row-major order.
    pub fn walls(&self) -> impl Iterator<Item = Coord> + '_ {
        self.walls
            .iter()
            .enumerate()
            .filter(|&(_, &w)| w)
            .map(|(idx, _)| self.coord_of(idx))
    }

    /// Row-major wall flags.
    pub fn wall_flags(&self) -> &[bool] {
        &self.walls
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.walls.iter().enumerate().map(|(idx, &is_wall)| {
            let (i, j) = self.coord_of(idx);
            Cell { i, j, is_wall }
        })
    }
}
