//! The WebSocket transport against a real `tokio-tungstenite` client.

#![cfg(feature = "websocket")]

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tetrad_transport::{Connection, Incoming, Transport, WebSocketConnection, WebSocketTransport};
use tokio_tungstenite::tungstenite::Message;

type ClientWs = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

/// Binds on an ephemeral port and opens one client with `path_and_query`.
async fn pair(path_and_query: &str) -> (WebSocketConnection, ClientWs) {
    let mut transport = WebSocketTransport::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let url = format!("ws://{}/{path_and_query}", transport.local_addr().unwrap());

    let accepted = tokio::spawn(async move {
        let incoming = transport.accept().await.expect("accept");
        incoming.upgrade().await.expect("upgrade")
    });
    let (client, _) = tokio_tungstenite::connect_async(url)
        .await
        .expect("client connect");
    (accepted.await.expect("accept task"), client)
}

#[tokio::test]
async fn test_frames_flow_both_ways() {
    let (server, mut client) = pair("?token=alice").await;
    assert_eq!(server.admission_token(), Some("alice"));
    assert!(server.id().into_inner() > 0);

    server.send(r#"{"type":"message"}"#).await.unwrap();
    let frame = client.next().await.unwrap().unwrap();
    assert_eq!(frame.to_text().unwrap(), r#"{"type":"message"}"#);

    client
        .send(Message::Text("from client".into()))
        .await
        .unwrap();
    assert_eq!(server.recv().await.unwrap().as_deref(), Some("from client"));

    server.close().await.unwrap();
}

#[tokio::test]
async fn test_binary_utf8_frames_read_as_text() {
    let (server, mut client) = pair("?token=bob").await;

    client
        .send(Message::Binary(b"{}".to_vec().into()))
        .await
        .unwrap();
    assert_eq!(server.recv().await.unwrap().as_deref(), Some("{}"));
}

#[tokio::test]
async fn test_missing_token_is_none() {
    let (server, _client) = pair("").await;
    assert_eq!(server.admission_token(), None);
}

#[tokio::test]
async fn test_client_close_ends_stream() {
    let (server, mut client) = pair("?token=carol").await;

    client.send(Message::Close(None)).await.unwrap();
    assert!(server.recv().await.unwrap().is_none());
}

#[tokio::test]
async fn test_connection_ids_are_distinct() {
    let (first, _a) = pair("?token=a").await;
    let (second, _b) = pair("?token=b").await;
    assert_ne!(first.id(), second.id());
}

#[tokio::test]
async fn test_silent_peer_does_not_hold_up_accept() {
    let mut transport = WebSocketTransport::bind("127.0.0.1:0").await.unwrap();
    let addr = transport.local_addr().unwrap();

    // Connects at the TCP level and never sends an upgrade request.
    let _silent = tokio::net::TcpStream::connect(addr).await.unwrap();
    let stalled = transport.accept().await.unwrap();
    assert_eq!(stalled.peer_addr().ip(), addr.ip());

    let client = tokio::spawn(async move {
        tokio_tungstenite::connect_async(format!("ws://{addr}/?token=dave"))
            .await
            .map(|(ws, _)| ws)
    });
    let next = tokio::time::timeout(Duration::from_secs(2), transport.accept())
        .await
        .expect("second peer accepted while the first is silent")
        .unwrap();
    let conn = next.upgrade().await.unwrap();
    assert_eq!(conn.admission_token(), Some("dave"));
    let _ws = client.await.unwrap().unwrap();

    // The silent peer's handshake never finishes on its own.
    let stuck = tokio::time::timeout(Duration::from_millis(100), stalled.upgrade()).await;
    assert!(stuck.is_err());
}

#[tokio::test]
async fn test_encoded_token_is_decoded() {
    let (server, _client) = pair("?token=ada%20lovelace").await;
    assert_eq!(server.admission_token(), Some("ada lovelace"));
}
