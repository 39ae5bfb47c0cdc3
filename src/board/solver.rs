//! Nearest-exit cat movement.
//!
//! A multi-source BFS seeded at every open boundary cell yields, for each open
//! cell, the number of steps the cat needs to leave the grid. The cat then
//! steps to the neighbor with the smallest value. Outside the grid counts as 0.

use std::collections::VecDeque;

use super::hex::{Coord, HexGrid};

/// What the cat does next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextMove {
    /// Step to an in-range open cell.
    MoveTo(Coord),
    /// Step off the grid.
    Escape,
    /// No legal move.
    Stuck,
}

/// Steps-to-exit for every open cell; `None` where no exit is reachable or the cell is a wall.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceField {
    width: i32,
    height: i32,
    dist: Vec<Option<u32>>,
}

impl DistanceField {
    /// Build the field for the current wall layout.
    pub fn compute(grid: &HexGrid) -> Self {
        let width = grid.width();
        let mut dist: Vec<Option<u32>> = vec![None; grid.len()];
        let mut queue: VecDeque<Coord> = VecDeque::new();

        for cell in grid.cells() {
            if !cell.is_wall && grid.is_boundary(cell.i, cell.j) {
                dist[(cell.j * width + cell.i) as usize] = Some(1);
                queue.push_back((cell.i, cell.j));
            }
        }

        while let Some((i, j)) = queue.pop_front() {
            let Some(d) = dist[(j * width + i) as usize] else {
                continue;
            };
            for (ni, nj) in grid.neighbors(i, j) {
                if !grid.is_open(ni, nj) {
                    continue;
                }
                let idx = (nj * width + ni) as usize;
                if dist[idx].is_none() {
                    dist[idx] = Some(d + 1);
                    queue.push_back((ni, nj));
                }
            }
        }

        Self {
            width,
            height: grid.height(),
            dist,
        }
    }

    /// Distance at `(i, j)`; out-of-range coordinates are exits and read as `Some(0)`.
    pub fn get(&self, i: i32, j: i32) -> Option<u32> {
        if i < 0 || i >= self.width || j < 0 || j >= self.height {
            return Some(0);
        }
        self.dist[(j * self.width + i) as usize]
    }
}

/// Choose the cat's next step from `cat`.
///
/// Candidates are checked in neighbor order and only a strictly smaller
/// distance replaces the current best, so ties go to the earlier direction.
pub fn next_move(grid: &HexGrid, cat: Coord) -> NextMove {
    let field = DistanceField::compute(grid);
    next_move_with_field(grid, &field, cat)
}

/// Same as [`next_move`] with a precomputed field.
pub fn next_move_with_field(grid: &HexGrid, field: &DistanceField, cat: Coord) -> NextMove {
    let mut best: Option<(u32, Coord)> = None;

    for (ni, nj) in grid.neighbors(cat.0, cat.1) {
        let candidate = if !grid.in_bounds(ni, nj) {
            Some(0)
        } else if grid.is_wall(ni, nj) {
            None
        } else {
            field.get(ni, nj)
        };
        if let Some(d) = candidate {
            if best.map_or(true, |(bd, _)| d < bd) {
                best = Some((d, (ni, nj)));
            }
        }
    }

    match best {
        None => NextMove::Stuck,
        Some((0, _)) => NextMove::Escape,
        Some((_, to)) => NextMove::MoveTo(to),
    }
}
