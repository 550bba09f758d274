//! Error types for the rules engine.

use crate::Pos;

/// A rejected placement.
///
/// Rejections are deterministic: the same state and the same input
/// always produce the same error, and the engine state is untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The cell exists but the rules forbid a pawn there right now
    /// (occupied, too close to the turn's first pawn, zone not anchored,
    /// or the game is already decided).
    #[error("invalid move at {0}")]
    InvalidMove(Pos),

    /// The coordinates are not on the board.
    #[error("({r}, {c}) is outside the board")]
    OutOfBounds { r: i64, c: i64 },
}
