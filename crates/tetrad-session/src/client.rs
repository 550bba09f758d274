//! The registry of live connections and their broadcast groups.
//!
//! Every admitted connection is a [`Client`]: a player identity, an outbox
//! that the connection's task drains onto the socket, and the one
//! [`Group`] the connection currently listens to. New clients start in
//! the lobby.
//!
//! Not thread-safe by itself. The room layer owns one registry inside its
//! manager task and is the only code that touches it.

use std::collections::BTreeMap;

use tetrad_protocol::{ConnectionId, PlayerId, RoomCode, ServerEvent};
use tokio::sync::mpsc;

use crate::SessionError;

/// Sending half of a connection's outbound queue.
///
/// Unbounded so that broadcasting never waits on a slow socket; the
/// connection task drains it as fast as the socket accepts frames.
pub type Outbox = mpsc::UnboundedSender<ServerEvent>;

/// The broadcast group a connection listens to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Group {
    /// Receives `lobby_update` events.
    Lobby,
    /// Receives the named room's events.
    Room(RoomCode),
}

/// One admitted connection.
#[derive(Debug)]
pub struct Client {
    conn_id: ConnectionId,
    player_id: PlayerId,
    group: Group,
    outbox: Outbox,
}

impl Client {
    pub fn conn_id(&self) -> ConnectionId {
        self.conn_id
    }

    pub fn player_id(&self) -> &PlayerId {
        &self.player_id
    }

    pub fn group(&self) -> &Group {
        &self.group
    }

    /// The room this connection is attached to, if any.
    pub fn room(&self) -> Option<&RoomCode> {
        match &self.group {
            Group::Room(code) => Some(code),
            Group::Lobby => None,
        }
    }

    /// Queues an event for this connection.
    ///
    /// Returns `false` if the connection task has already gone away; the
    /// disconnect that follows will remove the client.
    pub fn send(&self, event: ServerEvent) -> bool {
        self.outbox.send(event).is_ok()
    }
}

/// All live connections, keyed by [`ConnectionId`].
///
/// A `BTreeMap` keeps iteration in admission order, so broadcasts reach
/// clients in a stable order.
#[derive(Debug, Default)]
pub struct ClientRegistry {
    clients: BTreeMap<ConnectionId, Client>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an admitted connection in the lobby group.
    ///
    /// # Errors
    /// Returns [`SessionError::AlreadyConnected`] if `conn_id` is taken.
    pub fn connect(
        &mut self,
        conn_id: ConnectionId,
        player_id: PlayerId,
        outbox: Outbox,
    ) -> Result<&Client, SessionError> {
        if self.clients.contains_key(&conn_id) {
            return Err(SessionError::AlreadyConnected(conn_id));
        }

        tracing::info!(%conn_id, %player_id, "client connected");
        let client = self.clients.entry(conn_id).or_insert(Client {
            conn_id,
            player_id,
            group: Group::Lobby,
            outbox,
        });
        Ok(client)
    }

    /// Removes a connection and hands back its final record.
    ///
    /// # Errors
    /// Returns [`SessionError::NotConnected`] if `conn_id` is unknown.
    pub fn disconnect(&mut self, conn_id: ConnectionId) -> Result<Client, SessionError> {
        let client = self
            .clients
            .remove(&conn_id)
            .ok_or(SessionError::NotConnected(conn_id))?;
        tracing::info!(%conn_id, player_id = %client.player_id, "client disconnected");
        Ok(client)
    }

    pub fn get(&self, conn_id: ConnectionId) -> Option<&Client> {
        self.clients.get(&conn_id)
    }

    /// Moves a connection into `group`, leaving whatever group it was in.
    ///
    /// # Errors
    /// Returns [`SessionError::NotConnected`] if `conn_id` is unknown.
    pub fn move_to(&mut self, conn_id: ConnectionId, group: Group) -> Result<(), SessionError> {
        let client = self
            .clients
            .get_mut(&conn_id)
            .ok_or(SessionError::NotConnected(conn_id))?;
        client.group = group;
        Ok(())
    }

    /// Queues an event for a single connection. Unknown ids are ignored.
    pub fn send_to(&self, conn_id: ConnectionId, event: ServerEvent) {
        if let Some(client) = self.clients.get(&conn_id) {
            client.send(event);
        }
    }

    /// Queues an event for every connection in `group`.
    pub fn broadcast(&self, group: &Group, event: &ServerEvent) {
        for client in self.in_group(group) {
            client.send(event.clone());
        }
    }

    /// Connections currently listening to `group`.
    pub fn in_group<'a>(&'a self, group: &'a Group) -> impl Iterator<Item = &'a Client> + 'a {
        self.clients.values().filter(move |c| &c.group == group)
    }

    /// `true` if at least one connection is attached to the room.
    pub fn is_room_attached(&self, code: &RoomCode) -> bool {
        self.clients.values().any(|c| c.room() == Some(code))
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}
