pub mod hex;
pub mod reachability;
pub mod solver;

pub use hex::{hex_neighbors, Cell, HexGrid};
pub use reachability::{check_reachability, is_trapped, Reachability};
pub use solver::{next_move, DistanceField, NextMove};
