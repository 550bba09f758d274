//! WebSocket transport over `tokio-tungstenite`.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};

use crate::{Connection, ConnectionId, Incoming, Transport, TransportError};

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

type Socket = WebSocketStream<TcpStream>;

/// Listens for WebSocket upgrades on a TCP port.
pub struct WebSocketTransport {
    listener: TcpListener,
}

impl WebSocketTransport {
    pub async fn bind(addr: &str) -> Result<Self, TransportError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| TransportError::Bind {
                addr: addr.to_string(),
                source,
            })?;
        let local = listener.local_addr().map_err(TransportError::Accept)?;
        tracing::info!(addr = %local, "listening for websocket clients");
        Ok(Self { listener })
    }

    /// The address actually bound (useful after binding port 0).
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

impl Transport for WebSocketTransport {
    type Incoming = WebSocketIncoming;
    type Error = TransportError;

    async fn accept(&mut self) -> Result<Self::Incoming, Self::Error> {
        let (tcp, peer) = self
            .listener
            .accept()
            .await
            .map_err(TransportError::Accept)?;
        tracing::trace!(%peer, "tcp peer accepted");
        Ok(WebSocketIncoming { tcp, peer })
    }
}

/// A TCP peer whose upgrade request has not been read yet.
pub struct WebSocketIncoming {
    tcp: TcpStream,
    peer: SocketAddr,
}

impl WebSocketIncoming {
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }
}

impl Incoming for WebSocketIncoming {
    type Connection = WebSocketConnection;
    type Error = TransportError;

    async fn upgrade(self) -> Result<Self::Connection, Self::Error> {
        let peer = self.peer;

        // The token rides on the upgrade request; grab it before the
        // request is gone.
        let mut token = None;
        let socket =
            tokio_tungstenite::accept_hdr_async(self.tcp, |req: &Request, resp: Response| {
                token = token_from_query(req.uri().query());
                Ok::<Response, ErrorResponse>(resp)
            })
            .await
            .map_err(|e| TransportError::Handshake(e.to_string()))?;

        let id = ConnectionId::new(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed));
        tracing::debug!(conn_id = %id, %peer, has_token = token.is_some(), "websocket upgraded");

        let (outgoing, incoming) = socket.split();
        Ok(WebSocketConnection {
            id,
            token,
            outgoing: Mutex::new(outgoing),
            incoming: Mutex::new(incoming),
        })
    }
}

/// The percent-decoded `token` parameter of an upgrade query string, if
/// present and non-empty.
fn token_from_query(query: Option<&str>) -> Option<String> {
    form_urlencoded::parse(query?.as_bytes())
        .find(|(key, _)| key == "token")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// One upgraded WebSocket.
///
/// Each half sits behind its own lock, so the reader loop never blocks
/// the writer task.
pub struct WebSocketConnection {
    id: ConnectionId,
    token: Option<String>,
    outgoing: Mutex<SplitSink<Socket, Message>>,
    incoming: Mutex<SplitStream<Socket>>,
}

impl Connection for WebSocketConnection {
    type Error = TransportError;

    async fn send(&self, frame: &str) -> Result<(), Self::Error> {
        self.outgoing
            .lock()
            .await
            .send(Message::text(frame.to_owned()))
            .await
            .map_err(|e| TransportError::Send(e.to_string()))
    }

    async fn recv(&self) -> Result<Option<String>, Self::Error> {
        let mut incoming = self.incoming.lock().await;
        while let Some(msg) = incoming.next().await {
            match msg.map_err(|e| TransportError::Receive(e.to_string()))? {
                Message::Text(text) => return Ok(Some(text.as_str().to_owned())),
                Message::Binary(bytes) => {
                    let text = std::str::from_utf8(&bytes).map_err(|_| TransportError::NotText)?;
                    return Ok(Some(text.to_owned()));
                }
                Message::Close(_) => return Ok(None),
                // Control frames are answered by tungstenite itself.
                Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {}
            }
        }
        Ok(None)
    }

    async fn close(&self) -> Result<(), Self::Error> {
        self.outgoing
            .lock()
            .await
            .close()
            .await
            .map_err(|e| TransportError::Send(e.to_string()))
    }

    fn id(&self) -> ConnectionId {
        self.id
    }

    fn admission_token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_from_query() {
        assert_eq!(token_from_query(Some("token=abc")), Some("abc".into()));
        assert_eq!(
            token_from_query(Some("v=2&token=p-17&x=1")),
            Some("p-17".into())
        );
        assert_eq!(token_from_query(Some("token=")), None);
        assert_eq!(token_from_query(Some("tok=abc")), None);
        assert_eq!(token_from_query(None), None);
    }

    #[test]
    fn test_token_is_percent_decoded() {
        assert_eq!(token_from_query(Some("token=a%20b")), Some("a b".into()));
        assert_eq!(
            token_from_query(Some("token=p%2B17%26x")),
            Some("p+17&x".into())
        );
        assert_eq!(token_from_query(Some("token=%C3%A9lise")), Some("élise".into()));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(TransportError::NotText.to_string(), "frame is not valid UTF-8");
        let err = TransportError::Handshake("no upgrade header".into());
        assert_eq!(err.to_string(), "handshake failed: no upgrade header");
    }
}
