//! Core engine data types shared by the controller, the arena and hosts.

use std::fmt;

use serde::{Deserialize, Serialize};

pub use crate::board::hex::Coord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameState {
    Playing,
    Win,
    Lose,
}

impl GameState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameState::Playing)
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GameState::Playing => "playing",
            GameState::Win => "won",
            GameState::Lose => "lost",
        };
        f.write_str(s)
    }
}

/// One committed player move: where the cat stood before it moved, and the wall placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub cat_before: Coord,
    pub wall_placed: Coord,
}

/// How a turn ended after the wall went down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// The wall closed the enclosure; the cat did not move.
    Trapped,
    /// The cat stepped to a new cell and play continues.
    Moved,
    /// The cat stepped off the grid.
    Escaped,
    /// The cat found no legal move.
    GaveUp,
}

/// Result of an accepted `place_wall`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOutcome {
    pub wall: Coord,
    pub state: GameState,
    pub cat_before: Coord,
    pub cat_after: Coord,
    pub resolution: Resolution,
}

impl TurnOutcome {
    /// The cat's new cell, if it moved this turn.
    pub fn cat_moved(&self) -> Option<Coord> {
        (self.resolution == Resolution::Moved).then_some(self.cat_after)
    }
}

/// Read-only picture of a session for redrawing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub width: i32,
    pub height: i32,
    /// Row-major wall flags (`index = j * width + i`).
    pub walls: Vec<bool>,
    pub cat: Coord,
    pub state: GameState,
    /// Number of committed moves in the history.
    pub moves: usize,
}

impl Snapshot {
    pub fn is_wall(&self, i: i32, j: i32) -> bool {
        if i < 0 || i >= self.width || j < 0 || j >= self.height {
            return false;
        }
        self.walls
            .get((j * self.width + i) as usize)
            .copied()
            .unwrap_or(false)
    }
}

/// Tone of a status line, so hosts can color it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusTone {
    Normal,
    Win,
    Lose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    Reset,
    WallPlaced { outcome: TurnOutcome },
    Undone { record: MoveRecord },
}

/// Emitted to listeners after every successful mutating call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    pub kind: EventKind,
    pub state: GameState,
    pub cat: Coord,
    pub status: String,
    pub tone: StatusTone,
}
