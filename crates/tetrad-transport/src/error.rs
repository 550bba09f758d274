use std::io;
use std::time::Duration;

/// Errors raised by a transport or one of its connections.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("accept failed: {0}")]
    Accept(#[source] io::Error),

    /// The peer connected but the upgrade to a frame protocol failed.
    #[error("handshake failed: {0}")]
    Handshake(String),

    #[error("handshake not completed within {0:?}")]
    HandshakeTimedOut(Duration),

    #[error("send failed: {0}")]
    Send(String),

    #[error("receive failed: {0}")]
    Receive(String),

    /// A binary frame arrived that does not hold UTF-8 text.
    #[error("frame is not valid UTF-8")]
    NotText,
}
