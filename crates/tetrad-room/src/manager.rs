//! Room manager: creates rooms, seats players, authorizes moves, and
//! tears down rooms nobody is watching.
//!
//! The manager is plain synchronous state. It is driven by the manager
//! actor ([`spawn_manager`](crate::spawn_manager)), which feeds it client
//! events, disconnects, and timer expiries one at a time.
//!
//! # Deletion timers
//!
//! ```text
//! disconnect ──→ room has no attached connection? ──→ spawn timer (generation g)
//!                                                        │
//! join ──→ abort timer, clear pending                    │ grace period
//!                                                        ▼
//!                        Expiry { code, g } ──→ still pending as g and
//!                                               still unattached? ──→ delete
//! ```
//!
//! A timer never deletes on its own; it only posts an [`Expiry`] back into
//! the actor, which re-checks the room before committing.

use std::collections::BTreeMap;

use tetrad_engine::{BoardSize, Placement};
use tetrad_protocol::{ClientEvent, ConnectionId, PlayerId, Role, RoomCode, ServerEvent};
use tetrad_session::{Client, ClientRegistry, Group, Outbox};
use tokio::sync::mpsc;

use crate::{CodeGenerator, Room, RoomConfig, RoomError, lobby_update};

/// Text broadcast to a room when its second seat is filled.
const GAME_ACTIVE_NOTICE: &str = "Game Active: AC vs BD";

/// A fired deletion timer, delivered back to the manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expiry {
    pub code: RoomCode,
    pub generation: u64,
}

/// Where a create or join put the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seat {
    pub room_id: RoomCode,
    pub role: Role,
}

/// Owns every room and every admitted connection.
pub struct RoomManager {
    rooms: BTreeMap<RoomCode, Room>,
    clients: ClientRegistry,
    codes: CodeGenerator,
    config: RoomConfig,
    expiry_tx: mpsc::UnboundedSender<Expiry>,
    next_generation: u64,
}

impl RoomManager {
    /// Creates an empty manager and the receiver its deletion timers
    /// report to.
    pub fn new(config: RoomConfig) -> (Self, mpsc::UnboundedReceiver<Expiry>) {
        let (expiry_tx, expiry_rx) = mpsc::unbounded_channel();
        let manager = Self {
            rooms: BTreeMap::new(),
            clients: ClientRegistry::new(),
            codes: CodeGenerator::new(config.code_seed),
            config,
            expiry_tx,
            next_generation: 1,
        };
        (manager, expiry_rx)
    }

    // -- Connections ------------------------------------------------------

    /// Admits a connection into the lobby and republishes the lobby.
    pub fn connect(
        &mut self,
        conn_id: ConnectionId,
        player_id: PlayerId,
        outbox: Outbox,
    ) -> Result<(), RoomError> {
        self.clients.connect(conn_id, player_id, outbox)?;
        self.publish_lobby();
        Ok(())
    }

    /// Handles a closed connection.
    ///
    /// The player leaves every spectator set. Every room that is left with
    /// no attached connection and no timer yet gets a deletion timer.
    pub fn handle_disconnect(&mut self, conn_id: ConnectionId) -> Result<(), RoomError> {
        let client = self.clients.disconnect(conn_id)?;
        let player_id = client.player_id();

        for room in self.rooms.values_mut() {
            if room.remove_spectator(player_id) {
                tracing::debug!(room_id = %room.code(), %player_id, "spectator removed");
            }
        }

        let orphaned: Vec<RoomCode> = self
            .rooms
            .iter()
            .filter(|(code, room)| {
                !room.is_deletion_pending() && !self.clients.is_room_attached(code)
            })
            .map(|(code, _)| code.clone())
            .collect();
        for code in orphaned {
            self.schedule_deletion(code);
        }

        self.publish_lobby();
        Ok(())
    }

    // -- Client events ----------------------------------------------------

    /// Runs one client event, reports caller-local failures back to the
    /// caller, and republishes the lobby when the listing may have changed.
    pub fn handle_event(&mut self, conn_id: ConnectionId, event: ClientEvent) {
        let (result, lobby_changed) = match event {
            ClientEvent::CreateGame { size } => (self.create_game(conn_id, size).map(drop), true),
            ClientEvent::JoinGame { room_id } => {
                (self.join_game(conn_id, &room_id).map(drop), true)
            }
            ClientEvent::LeaveGame { room_id } => (self.leave_game(conn_id, &room_id), true),
            ClientEvent::MakeMove { room_id, r, c } => {
                match self.submit_move(conn_id, &room_id, r, c) {
                    Ok(placement) => (
                        Ok(()),
                        placement.is_some_and(|p| p.decided.is_some()),
                    ),
                    Err(e) => (Err(e), false),
                }
            }
        };

        if let Err(e) = result {
            if e.is_caller_local() {
                tracing::debug!(%conn_id, error = %e, "request rejected");
                self.clients.send_to(
                    conn_id,
                    ServerEvent::ErrorMessage {
                        message: e.to_string(),
                    },
                );
            } else {
                tracing::warn!(%conn_id, error = %e, "event dropped");
            }
        }

        if lobby_changed {
            self.publish_lobby();
        }
    }

    /// Opens a room with the caller seated as AC and moves the caller into
    /// it. Unsupported sizes fall back to the default board.
    pub fn create_game(
        &mut self,
        conn_id: ConnectionId,
        size: Option<i64>,
    ) -> Result<Seat, RoomError> {
        let player_id = self.client(conn_id)?.player_id().clone();
        let size = BoardSize::from_requested(size);
        let rooms = &self.rooms;
        let code = self.codes.next_code(|c| rooms.contains_key(c));

        let room = Room::new(code.clone(), size, player_id.clone());
        let game_state = room.engine().clone();
        self.rooms.insert(code.clone(), room);
        self.clients.move_to(conn_id, Group::Room(code.clone()))?;

        tracing::info!(room_id = %code, %player_id, size = size.get(), "room created");

        self.clients.send_to(
            conn_id,
            ServerEvent::GameCreated {
                room_id: code.clone(),
                team: Role::AC,
                game_state,
            },
        );
        Ok(Seat {
            room_id: code,
            role: Role::AC,
        })
    }

    /// Seats the caller in an existing room (or back in their old seat)
    /// and cancels any pending deletion.
    pub fn join_game(&mut self, conn_id: ConnectionId, room_id: &str) -> Result<Seat, RoomError> {
        let player_id = self.client(conn_id)?.player_id().clone();
        let code = RoomCode::normalize(room_id);
        let room = self
            .rooms
            .get_mut(&code)
            .ok_or_else(|| RoomError::RoomNotFound(code.clone()))?;

        if room.cancel_deletion() {
            tracing::info!(room_id = %code, "room deletion cancelled");
        }

        let role = room.seat(&player_id);
        let game_state = room.engine().clone();
        let game_active = room.is_full() && !room.engine().is_decided();
        self.clients.move_to(conn_id, Group::Room(code.clone()))?;

        tracing::info!(room_id = %code, %player_id, %role, "player joined");

        self.clients.send_to(
            conn_id,
            ServerEvent::GameJoined {
                room_id: code.clone(),
                team: role,
                game_state: game_state.clone(),
            },
        );

        if game_active {
            let group = Group::Room(code.clone());
            self.clients.broadcast(
                &group,
                &ServerEvent::Message {
                    text: GAME_ACTIVE_NOTICE.to_string(),
                },
            );
            self.clients
                .broadcast(&group, &ServerEvent::StateUpdate { game_state });
        }

        Ok(Seat {
            room_id: code,
            role,
        })
    }

    /// Sends the caller back to the lobby. Their seat is kept.
    ///
    /// Leaving a room the connection is not attached to does nothing.
    pub fn leave_game(&mut self, conn_id: ConnectionId, room_id: &str) -> Result<(), RoomError> {
        let code = RoomCode::normalize(room_id);
        let client = self.client(conn_id)?;
        if client.room() != Some(&code) {
            return Ok(());
        }

        tracing::info!(room_id = %code, player_id = %client.player_id(), "player left room");
        self.clients.move_to(conn_id, Group::Lobby)?;
        Ok(())
    }

    /// Places a pawn for the caller's team and broadcasts the result.
    ///
    /// Returns `Ok(None)` without side effects when the room is unknown or
    /// already decided.
    ///
    /// # Errors
    /// - [`RoomError::NotYourTurn`] if the caller does not hold the slot of
    ///   the team whose color is to move
    /// - [`RoomError::InvalidMove`] if the engine rejects the placement
    pub fn submit_move(
        &mut self,
        conn_id: ConnectionId,
        room_id: &str,
        r: i64,
        c: i64,
    ) -> Result<Option<Placement>, RoomError> {
        let player_id = self.client(conn_id)?.player_id().clone();
        let code = RoomCode::normalize(room_id);
        let Some(room) = self.rooms.get_mut(&code) else {
            return Ok(None);
        };
        if room.engine().is_decided() {
            return Ok(None);
        }

        let team = room.engine().current_color().team();
        if room.player_for(team) != Some(&player_id) {
            return Err(RoomError::NotYourTurn);
        }

        let placement = room
            .engine_mut()
            .place_at(r, c)
            .map_err(RoomError::InvalidMove)?;
        let game_state = room.engine().clone();

        tracing::debug!(
            room_id = %code,
            %player_id,
            pos = %placement.pos,
            color = %placement.color,
            converted = placement.converted.len(),
            "pawn placed"
        );

        let group = Group::Room(code.clone());
        self.clients
            .broadcast(&group, &ServerEvent::StateUpdate { game_state });
        if let Some(winner) = placement.decided {
            tracing::info!(room_id = %code, %winner, "game decided");
            self.clients
                .broadcast(&group, &ServerEvent::GameOver { winner });
        }

        Ok(Some(placement))
    }

    // -- Deletion ---------------------------------------------------------

    fn schedule_deletion(&mut self, code: RoomCode) {
        let Some(room) = self.rooms.get_mut(&code) else {
            return;
        };
        let generation = self.next_generation;
        self.next_generation += 1;

        let grace = self.config.grace_period;
        let expiry_tx = self.expiry_tx.clone();
        let expiry = Expiry {
            code: code.clone(),
            generation,
        };
        let timer = tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            let _ = expiry_tx.send(expiry);
        });
        room.set_pending_deletion(generation, timer.abort_handle());

        tracing::info!(
            room_id = %code,
            grace_secs = grace.as_secs_f64(),
            "room scheduled for deletion"
        );
    }

    /// Commits a fired deletion timer.
    ///
    /// Deletes the room only if the timer is still the pending one and no
    /// connection is attached. Returns whether the room was deleted.
    pub fn expire(&mut self, expiry: Expiry) -> bool {
        let Some(room) = self.rooms.get_mut(&expiry.code) else {
            return false;
        };
        if !room.take_deletion(expiry.generation) {
            tracing::debug!(room_id = %expiry.code, "stale deletion timer ignored");
            return false;
        }
        if self.clients.is_room_attached(&expiry.code) {
            tracing::info!(room_id = %expiry.code, "room reattached, deletion skipped");
            return false;
        }

        self.rooms.remove(&expiry.code);
        tracing::info!(room_id = %expiry.code, "room deleted");
        true
    }

    // -- Lobby & queries --------------------------------------------------

    /// The current `lobby_update` event.
    pub fn lobby(&self) -> ServerEvent {
        lobby_update(self.rooms.values())
    }

    /// Sends the current listing to every connection in the lobby.
    pub fn publish_lobby(&self) {
        self.clients.broadcast(&Group::Lobby, &self.lobby());
    }

    pub fn room(&self, code: &RoomCode) -> Option<&Room> {
        self.rooms.get(code)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn clients(&self) -> &ClientRegistry {
        &self.clients
    }

    fn client(&self, conn_id: ConnectionId) -> Result<&Client, RoomError> {
        self.clients
            .get(conn_id)
            .ok_or(RoomError::NotConnected(conn_id))
    }
}
