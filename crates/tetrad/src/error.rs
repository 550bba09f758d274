//! Unified error type for the Tetrad server.

use tetrad_protocol::ProtocolError;
use tetrad_room::RoomError;
use tetrad_session::SessionError;
use tetrad_transport::TransportError;

/// Top-level error that wraps every layer's error.
#[derive(Debug, thiserror::Error)]
pub enum TetradError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Room(#[from] RoomError),
}
