//! `TetradServer` builder and accept loop.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tetrad_protocol::{Codec, JsonCodec};
use tetrad_room::{ManagerHandle, RoomConfig, spawn_manager};
use tetrad_session::Authenticator;
use tetrad_transport::{Transport, WebSocketTransport};

use crate::TetradError;
use crate::handler::handle_connection;

/// Shared state handed to every connection task.
pub(crate) struct ServerState<A: Authenticator, C: Codec> {
    pub(crate) rooms: ManagerHandle,
    pub(crate) auth: A,
    pub(crate) codec: C,
    pub(crate) handshake_timeout: Duration,
}

/// Builder for configuring and starting a Tetrad server.
pub struct TetradServerBuilder {
    bind_addr: String,
    room_config: RoomConfig,
    handshake_timeout: Duration,
}

impl TetradServerBuilder {
    pub fn new() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            room_config: RoomConfig::default(),
            handshake_timeout: Duration::from_secs(10),
        }
    }

    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.room_config = config;
        self
    }

    /// How long a new peer gets to finish the WebSocket upgrade before it
    /// is dropped. Defaults to 10 seconds.
    pub fn handshake_timeout(mut self, timeout: Duration) -> Self {
        self.handshake_timeout = timeout;
        self
    }

    /// Binds the listener and starts the room manager.
    ///
    /// Frames are JSON over WebSocket.
    pub async fn build<A: Authenticator>(
        self,
        auth: A,
    ) -> Result<TetradServer<A, JsonCodec>, TetradError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let state = Arc::new(ServerState {
            rooms: spawn_manager(self.room_config),
            auth,
            codec: JsonCodec,
            handshake_timeout: self.handshake_timeout,
        });

        Ok(TetradServer { transport, state })
    }
}

impl Default for TetradServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound Tetrad server. Call [`run()`](Self::run) to start serving.
pub struct TetradServer<A: Authenticator, C: Codec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<A, C>>,
}

impl TetradServer<tetrad_session::TokenAuthenticator, JsonCodec> {
    pub fn builder() -> TetradServerBuilder {
        TetradServerBuilder::new()
    }
}

impl<A: Authenticator, C: Codec> TetradServer<A, C> {
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.transport.local_addr()
    }

    /// Accepts peers forever. Each one is upgraded and served on its own
    /// task.
    pub async fn run(mut self) -> Result<(), TetradError> {
        tracing::info!("Tetrad server running");

        loop {
            match self.transport.accept().await {
                Ok(incoming) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(incoming, state).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
