//! Manager actor: the single task that owns the [`RoomManager`].
//!
//! Connection tasks talk to it through a cloneable [`ManagerHandle`].
//! Deletion timers report to it through the expiry channel, so a timer
//! firing and a player rejoining can never interleave mid-update.

use tetrad_protocol::{ClientEvent, ConnectionId, PlayerId, RoomCode, ServerEvent};
use tetrad_session::Outbox;
use tokio::sync::{mpsc, oneshot};

use crate::manager::Expiry;
use crate::{RoomConfig, RoomError, RoomManager};

/// Commands accepted by the manager actor.
enum ManagerCommand {
    /// Admit a connection into the lobby.
    Connect {
        conn_id: ConnectionId,
        player_id: PlayerId,
        outbox: Outbox,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },

    /// A client event from an admitted connection (fire-and-forget).
    Event {
        conn_id: ConnectionId,
        event: ClientEvent,
    },

    /// The connection is gone.
    Disconnect { conn_id: ConnectionId },

    /// Current lobby listing.
    Lobby { reply: oneshot::Sender<ServerEvent> },

    /// Whether a room with this code is live.
    RoomExists {
        code: RoomCode,
        reply: oneshot::Sender<bool>,
    },
}

/// Handle to the running manager actor.
///
/// Cheap to clone; every connection task holds one.
#[derive(Clone)]
pub struct ManagerHandle {
    sender: mpsc::Sender<ManagerCommand>,
}

impl ManagerHandle {
    /// Admits a connection. Its outbox starts receiving lobby updates.
    pub async fn connect(
        &self,
        conn_id: ConnectionId,
        player_id: PlayerId,
        outbox: Outbox,
    ) -> Result<(), RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(ManagerCommand::Connect {
                conn_id,
                player_id,
                outbox,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable)?;
        reply_rx.await.map_err(|_| RoomError::Unavailable)?
    }

    /// Queues a client event. Replies arrive on the connection's outbox.
    pub async fn event(&self, conn_id: ConnectionId, event: ClientEvent) -> Result<(), RoomError> {
        self.sender
            .send(ManagerCommand::Event { conn_id, event })
            .await
            .map_err(|_| RoomError::Unavailable)
    }

    pub async fn disconnect(&self, conn_id: ConnectionId) -> Result<(), RoomError> {
        self.sender
            .send(ManagerCommand::Disconnect { conn_id })
            .await
            .map_err(|_| RoomError::Unavailable)
    }

    pub async fn lobby(&self) -> Result<ServerEvent, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(ManagerCommand::Lobby { reply: reply_tx })
            .await
            .map_err(|_| RoomError::Unavailable)?;
        reply_rx.await.map_err(|_| RoomError::Unavailable)
    }

    pub async fn room_exists(&self, code: RoomCode) -> Result<bool, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(ManagerCommand::RoomExists {
                code,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable)?;
        reply_rx.await.map_err(|_| RoomError::Unavailable)
    }
}

struct ManagerActor {
    manager: RoomManager,
    commands: mpsc::Receiver<ManagerCommand>,
    expiries: mpsc::UnboundedReceiver<Expiry>,
}

impl ManagerActor {
    /// Processes commands and timer expiries until every handle is dropped.
    async fn run(mut self) {
        tracing::info!("room manager started");

        loop {
            tokio::select! {
                cmd = self.commands.recv() => match cmd {
                    Some(cmd) => self.handle(cmd),
                    None => break,
                },
                Some(expiry) = self.expiries.recv() => {
                    if self.manager.expire(expiry) {
                        self.manager.publish_lobby();
                    }
                }
            }
        }

        tracing::info!(rooms = self.manager.room_count(), "room manager stopped");
    }

    fn handle(&mut self, cmd: ManagerCommand) {
        match cmd {
            ManagerCommand::Connect {
                conn_id,
                player_id,
                outbox,
                reply,
            } => {
                let _ = reply.send(self.manager.connect(conn_id, player_id, outbox));
            }
            ManagerCommand::Event { conn_id, event } => {
                self.manager.handle_event(conn_id, event);
            }
            ManagerCommand::Disconnect { conn_id } => {
                if let Err(e) = self.manager.handle_disconnect(conn_id) {
                    tracing::debug!(%conn_id, error = %e, "disconnect for unknown connection");
                }
            }
            ManagerCommand::Lobby { reply } => {
                let _ = reply.send(self.manager.lobby());
            }
            ManagerCommand::RoomExists { code, reply } => {
                let _ = reply.send(self.manager.room(&code).is_some());
            }
        }
    }
}

/// Spawns the manager actor and returns a handle to it.
pub fn spawn_manager(config: RoomConfig) -> ManagerHandle {
    let (tx, rx) = mpsc::channel(config.command_capacity);
    let (manager, expiries) = RoomManager::new(config);

    let actor = ManagerActor {
        manager,
        commands: rx,
        expiries,
    };
    tokio::spawn(actor.run());

    ManagerHandle { sender: tx }
}
