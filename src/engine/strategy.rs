//! Strategy traits for both sides of the board.
//!
//! The cat side is what the controller asks for a move each turn; the player
//! side is only used by automated play (arena, diagnostics).

use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::RngCore;

use crate::board::hex::{Coord, HexGrid};
use crate::board::solver::{next_move, NextMove};

/// Decides where the cat goes. Must not mutate the grid.
pub trait CatStrategy: Send + Sync {
    fn name(&self) -> &str;

    fn next_move(&self, grid: &HexGrid, cat: Coord) -> NextMove;
}

/// Walks toward the nearest reachable exit, ties broken by neighbor order.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestExitCat;

impl CatStrategy for NearestExitCat {
    fn name(&self) -> &str {
        "nearest_exit"
    }

    fn next_move(&self, grid: &HexGrid, cat: Coord) -> NextMove {
        next_move(grid, cat)
    }
}

/// Picks the next wall for an automated player. `None` means no legal wall remains.
pub trait PlayerStrategy: Send + Sync {
    fn name(&self) -> &str;

    fn choose_wall(&self, grid: &HexGrid, cat: Coord, rng: &mut dyn RngCore) -> Option<Coord>;
}

/// Open, non-cat cells in row-major order.
pub fn legal_walls(grid: &HexGrid, cat: Coord) -> Vec<Coord> {
    grid.cells()
        .filter(|c| !c.is_wall && (c.i, c.j) != cat)
        .map(|c| (c.i, c.j))
        .collect()
}

/// Walls a uniformly random legal cell.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPlayer;

impl PlayerStrategy for RandomPlayer {
    fn name(&self) -> &str {
        "random"
    }

    fn choose_wall(&self, grid: &HexGrid, cat: Coord, rng: &mut dyn RngCore) -> Option<Coord> {
        legal_walls(grid, cat).choose(rng).copied()
    }
}

/// Walls the cell the cat is about to step into; random when that is not possible.
pub struct BlockerPlayer {
    cat: Arc<dyn CatStrategy>,
}

impl BlockerPlayer {
    pub fn new(cat: Arc<dyn CatStrategy>) -> Self {
        Self { cat }
    }
}

impl Default for BlockerPlayer {
    fn default() -> Self {
        Self::new(Arc::new(NearestExitCat))
    }
}

impl PlayerStrategy for BlockerPlayer {
    fn name(&self) -> &str {
        "blocker"
    }

    fn choose_wall(&self, grid: &HexGrid, cat: Coord, rng: &mut dyn RngCore) -> Option<Coord> {
        match self.cat.next_move(grid, cat) {
            NextMove::MoveTo((i, j)) if grid.is_open(i, j) && (i, j) != cat => Some((i, j)),
            _ => RandomPlayer.choose_wall(grid, cat, rng),
        }
    }
}
