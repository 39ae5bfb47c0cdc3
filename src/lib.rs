//! Catch the Cat: hex-grid pursuit engine.
//!
//! `board` holds the grid and the pure search procedures over it, `engine`
//! holds the turn state machine and everything a host needs to drive it.

pub mod board;
pub mod engine;
