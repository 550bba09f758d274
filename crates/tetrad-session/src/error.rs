//! Error types for the session layer.

use tetrad_protocol::ConnectionId;

/// Errors raised while admitting or tracking connections.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The connection presented no usable identity token.
    #[error("invalid token")]
    InvalidIdentity,

    /// A connection with this id is already registered.
    #[error("connection {0} is already registered")]
    AlreadyConnected(ConnectionId),

    /// No connection with this id is registered.
    #[error("connection {0} is not registered")]
    NotConnected(ConnectionId),
}
