//! Rules engine for Tetrad, a four-color territorial capture game.
//!
//! Four colors (A, B, C, D) take turns placing pawns on a square board.
//! Colors A and C form one team, B and D the other. A placement can
//! convert straight lines of a single enemy color by bracketing them
//! ("pincer capture"), and a color wins by linking two opposite edges of
//! the board with a chain of its own pawns.
//!
//! This crate knows nothing about players, rooms, or networking: only
//! colors and coordinates. The room layer maps teams onto player slots.
//!
//! # Key types
//!
//! - [`GameEngine`]: one match: board, turn state, legality, capture, win
//! - [`Board`]: the grid and its derived [`Zone`]s
//! - [`Pawn`] / [`Posture`]: cell contents and capture immunity
//! - [`Color`] / [`Team`] / [`Winner`]: identities and outcomes

mod board;
mod color;
mod engine;
mod error;

pub use board::{Board, BoardSize, Pawn, Pos, Posture, Zone};
pub use color::{Color, Team, Winner};
pub use engine::{GameEngine, Placement};
pub use error::EngineError;
