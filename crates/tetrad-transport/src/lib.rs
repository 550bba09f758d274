//! Socket plumbing for Tetrad.
//!
//! The server only ever sees text frames: one JSON event per frame. How
//! they travel is hidden behind three traits:
//!
//! ```text
//! Transport::accept ──→ Incoming::upgrade ──→ Connection
//!   (listener task)      (per-peer task)       (per-peer task)
//! ```
//!
//! Accepting reads nothing from the peer. The handshake happens in
//! [`Incoming::upgrade`], which the caller runs on the peer's own task,
//! so a peer that connects and then goes quiet only stalls itself.
//!
//! Peers name themselves with an opaque token given when the connection
//! opens; over WebSocket that is the `token` query parameter of the
//! upgrade request, e.g. `ws://host:3000/?token=p-17`. The transport
//! records it and exposes it through [`Connection::admission_token`];
//! deciding whether it is acceptable is the session layer's job.
//!
//! The `websocket` feature (on by default) provides
//! [`WebSocketTransport`].

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
#[cfg(feature = "websocket")]
pub use websocket::{WebSocketConnection, WebSocketIncoming, WebSocketTransport};

use std::fmt;

/// Names one accepted connection for its whole life.
///
/// Several connections may carry the same player token over time (page
/// reloads, a second tab). Ids are never reused within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Source of new peers.
pub trait Transport: Send + Sync + 'static {
    type Incoming: Incoming;
    type Error: std::error::Error + Send + Sync;

    /// Waits for the next peer. Returns as soon as it has connected.
    async fn accept(&mut self) -> Result<Self::Incoming, Self::Error>;
}

/// A peer that has connected but not yet completed its handshake.
pub trait Incoming: Send + 'static {
    type Connection: Connection;
    type Error: std::error::Error + Send + Sync;

    /// Runs the handshake. Waits as long as the peer does; callers
    /// bound it with a timeout.
    async fn upgrade(self) -> Result<Self::Connection, Self::Error>;
}

/// A bidirectional stream of text frames with one peer.
///
/// Methods take `&self` so one task can read while another writes.
pub trait Connection: Send + Sync + 'static {
    type Error: std::error::Error + Send + Sync;

    async fn send(&self, frame: &str) -> Result<(), Self::Error>;

    /// The next text frame, or `Ok(None)` once the peer has closed.
    async fn recv(&self) -> Result<Option<String>, Self::Error>;

    async fn close(&self) -> Result<(), Self::Error>;

    fn id(&self) -> ConnectionId;

    /// Token the peer presented when connecting, if any.
    fn admission_token(&self) -> Option<&str>;
}
