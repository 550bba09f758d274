//! Error types for the room layer.
//!
//! The `Display` text of the caller-local variants is exactly what the
//! client sees in its `error_message` event.

use tetrad_engine::EngineError;
use tetrad_protocol::{ConnectionId, RoomCode};
use tetrad_session::SessionError;

/// Errors that can occur during room operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// No live room has this code.
    #[error("Room not found.")]
    RoomNotFound(RoomCode),

    /// The caller does not hold the slot of the team to move.
    #[error("It is not your turn!")]
    NotYourTurn,

    /// The engine refused the placement.
    #[error("Invalid Move")]
    InvalidMove(#[source] EngineError),

    /// The connection was never admitted or is already gone.
    #[error("connection {0} is not registered")]
    NotConnected(ConnectionId),

    #[error(transparent)]
    Session(#[from] SessionError),

    /// The manager actor has stopped.
    #[error("room manager is unavailable")]
    Unavailable,
}

impl RoomError {
    /// `true` for rejections that are reported back to the requester.
    pub fn is_caller_local(&self) -> bool {
        matches!(
            self,
            RoomError::RoomNotFound(_) | RoomError::NotYourTurn | RoomError::InvalidMove(_)
        )
    }
}
