//! Error taxonomy for game operations. Every variant is a reported result, never fatal.

use std::fmt;

use thiserror::Error;

use crate::engine::models::GameState;

/// Why a wall placement on an in-range cell was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveRejection {
    AlreadyWall,
    CatCell,
}

impl fmt::Display for MoveRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveRejection::AlreadyWall => f.write_str("that is already a wall"),
            MoveRejection::CatCell => f.write_str("you cannot wall the cat's cell"),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("cell ({i}, {j}) is outside the {width}x{height} grid")]
    InvalidCoordinate {
        i: i32,
        j: i32,
        width: i32,
        height: i32,
    },
    #[error("invalid move at ({i}, {j}): {reason}")]
    InvalidMove {
        i: i32,
        j: i32,
        reason: MoveRejection,
    },
    #[error("cannot {action} while the game is {state}; reset to play again")]
    IllegalStateTransition {
        action: &'static str,
        state: GameState,
    },
    #[error("no moves to undo")]
    EmptyHistory,
    #[error("invalid game config: {0}")]
    InvalidConfig(String),
}
