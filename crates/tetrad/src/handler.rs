//! Per-connection handler: admission, event routing, and outbound
//! delivery.
//!
//! Each accepted peer gets its own task running [`handle_connection`]:
//!   1. Finish the WebSocket upgrade within the handshake timeout
//!   2. Authenticate the token captured at upgrade time
//!   3. Register an outbox with the room manager (the client lands in the
//!      lobby)
//!   4. Spawn a writer that drains the outbox onto the socket
//!   5. Loop: decode frames into [`ClientEvent`]s and forward them
//!
//! When the loop ends the [`DisconnectGuard`] tells the manager, which
//! drops the outbox and with it the writer.

use std::sync::Arc;

use tetrad_protocol::{ClientEvent, Codec, ConnectionId, ServerEvent};
use tetrad_room::ManagerHandle;
use tetrad_session::{Authenticator, SessionError};
use tetrad_transport::{Connection, Incoming, TransportError, WebSocketIncoming};
use tokio::sync::mpsc;

use crate::TetradError;
use crate::server::ServerState;

/// Reports the disconnect to the room manager when the handler exits,
/// including on early return or panic.
struct DisconnectGuard {
    conn_id: ConnectionId,
    rooms: ManagerHandle,
}

impl Drop for DisconnectGuard {
    fn drop(&mut self) {
        let conn_id = self.conn_id;
        let rooms = self.rooms.clone();
        tokio::spawn(async move {
            let _ = rooms.disconnect(conn_id).await;
        });
    }
}

/// Handles a single peer from accept to close.
pub(crate) async fn handle_connection<A, C>(
    incoming: WebSocketIncoming,
    state: Arc<ServerState<A, C>>,
) -> Result<(), TetradError>
where
    A: Authenticator,
    C: Codec,
{
    let peer = incoming.peer_addr();
    let conn = match tokio::time::timeout(state.handshake_timeout, incoming.upgrade()).await {
        Ok(upgraded) => upgraded?,
        Err(_) => {
            tracing::debug!(%peer, "handshake timed out");
            return Err(TransportError::HandshakeTimedOut(state.handshake_timeout).into());
        }
    };

    let conn_id = conn.id();
    tracing::debug!(%conn_id, "handling new connection");

    // --- Admission ---
    let player_id = match state.auth.authenticate(conn.admission_token()).await {
        Ok(player_id) => player_id,
        Err(e) => {
            tracing::info!(%conn_id, error = %e, "admission refused");
            let refusal = state.codec.encode(&ServerEvent::ErrorMessage {
                message: SessionError::InvalidIdentity.to_string(),
            })?;
            conn.send(&refusal).await?;
            conn.close().await?;
            return Err(e.into());
        }
    };

    let (outbox, mut outbound) = mpsc::unbounded_channel::<ServerEvent>();
    state.rooms.connect(conn_id, player_id.clone(), outbox).await?;
    let _guard = DisconnectGuard {
        conn_id,
        rooms: state.rooms.clone(),
    };
    tracing::info!(%conn_id, %player_id, "player admitted");

    // --- Writer ---
    let conn = Arc::new(conn);
    let writer = {
        let conn = Arc::clone(&conn);
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            while let Some(event) = outbound.recv().await {
                let frame = match state.codec.encode(&event) {
                    Ok(frame) => frame,
                    Err(e) => {
                        tracing::error!(%conn_id, error = %e, "failed to encode event");
                        continue;
                    }
                };
                if let Err(e) = conn.send(&frame).await {
                    tracing::debug!(%conn_id, error = %e, "send failed, stopping writer");
                    break;
                }
            }
        })
    };

    // --- Reader ---
    loop {
        let frame = match conn.recv().await {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                tracing::info!(%conn_id, %player_id, "connection closed");
                break;
            }
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "recv error");
                break;
            }
        };

        let event: ClientEvent = match state.codec.decode(&frame) {
            Ok(event) => event,
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "ignoring undecodable frame");
                continue;
            }
        };

        state.rooms.event(conn_id, event).await?;
    }

    // The socket is done; anything still queued has nowhere to go.
    writer.abort();
    Ok(())
}
