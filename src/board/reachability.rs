//! Trap detection: can the cat still reach any exit cell?

use std::collections::VecDeque;

use super::hex::{Coord, HexGrid};

/// Result of a reachability search from the cat's cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reachability {
    /// Some open path leads to a cell with an out-of-range neighbor.
    EscapePath,
    /// The cat is enclosed; `region_size` counts the open cells it can still visit.
    Trapped { region_size: usize },
}

impl Reachability {
    pub fn is_trapped(&self) -> bool {
        matches!(self, Reachability::Trapped { .. })
    }
}

/// Breadth-first search over open cells starting at `cat`.
///
/// Stops at the first exit cell reached. A walled or out-of-range start is
/// treated as an empty region.
pub fn check_reachability(grid: &HexGrid, cat: Coord) -> Reachability {
    let (ci, cj) = cat;
    if !grid.is_open(ci, cj) {
        return Reachability::Trapped { region_size: 0 };
    }

    let width = grid.width();
    let mut visited = vec![false; grid.len()];
    let mut queue: VecDeque<Coord> = VecDeque::new();
    visited[(cj * width + ci) as usize] = true;
    queue.push_back(cat);
    let mut region_size = 0usize;

    while let Some((i, j)) = queue.pop_front() {
        region_size += 1;
        for (ni, nj) in grid.neighbors(i, j) {
            if !grid.in_bounds(ni, nj) {
                return Reachability::EscapePath;
            }
            let idx = (nj * width + ni) as usize;
            if visited[idx] || grid.is_wall(ni, nj) {
                continue;
            }
            visited[idx] = true;
            queue.push_back((ni, nj));
        }
    }

    Reachability::Trapped { region_size }
}

/// Shorthand for `check_reachability(grid, cat).is_trapped()`.
pub fn is_trapped(grid: &HexGrid, cat: Coord) -> bool {
    check_reachability(grid, cat).is_trapped()
}
