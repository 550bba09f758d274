//! A single room: one engine, two player slots, and any number of
//! spectators.
//!
//! Slot 0 plays team AC, slot 1 plays team BD. Slots are never freed: a
//! player who closes the tab keeps their seat and gets it back by joining
//! again with the same identity.

use std::collections::HashSet;

use tetrad_engine::{BoardSize, GameEngine, Team};
use tetrad_protocol::{LobbyEntry, PlayerId, Role, RoomCode};
use tokio::task::AbortHandle;

/// Maximum number of seated players.
pub const MAX_PLAYERS: usize = 2;

/// A deletion timer that has been scheduled for this room.
#[derive(Debug)]
struct PendingDeletion {
    generation: u64,
    timer: AbortHandle,
}

/// One match and the people attached to it.
#[derive(Debug)]
pub struct Room {
    code: RoomCode,
    engine: GameEngine,
    players: Vec<PlayerId>,
    spectators: HashSet<PlayerId>,
    pending_deletion: Option<PendingDeletion>,
}

impl Room {
    /// Opens a room with `creator` seated as team AC.
    pub fn new(code: RoomCode, size: BoardSize, creator: PlayerId) -> Self {
        Self {
            code,
            engine: GameEngine::new(size),
            players: vec![creator],
            spectators: HashSet::new(),
            pending_deletion: None,
        }
    }

    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    pub(crate) fn engine_mut(&mut self) -> &mut GameEngine {
        &mut self.engine
    }

    /// Seated players, AC first.
    pub fn players(&self) -> &[PlayerId] {
        &self.players
    }

    pub fn spectators(&self) -> &HashSet<PlayerId> {
        &self.spectators
    }

    pub fn is_full(&self) -> bool {
        self.players.len() >= MAX_PLAYERS
    }

    /// The player holding `team`'s slot, if it has been filled.
    pub fn player_for(&self, team: Team) -> Option<&PlayerId> {
        self.players.get(team.slot())
    }

    /// Resolves the role for a joining player and records it.
    ///
    /// A seated player gets their own seat back. Otherwise the first free
    /// slot is taken, and once both are taken the player spectates.
    pub(crate) fn seat(&mut self, player: &PlayerId) -> Role {
        if let Some(slot) = self.players.iter().position(|p| p == player) {
            if let Some(team) = Team::from_slot(slot) {
                return Role::from(team);
            }
        }
        if !self.is_full() {
            self.players.push(player.clone());
            self.spectators.remove(player);
            if let Some(team) = Team::from_slot(self.players.len() - 1) {
                return Role::from(team);
            }
        }
        self.spectators.insert(player.clone());
        Role::Spectator
    }

    /// Drops `player` from the spectator set. Returns whether they were in it.
    pub(crate) fn remove_spectator(&mut self, player: &PlayerId) -> bool {
        self.spectators.remove(player)
    }

    pub fn is_deletion_pending(&self) -> bool {
        self.pending_deletion.is_some()
    }

    pub(crate) fn set_pending_deletion(&mut self, generation: u64, timer: AbortHandle) {
        self.pending_deletion = Some(PendingDeletion { generation, timer });
    }

    /// Aborts a pending deletion timer. Returns whether one was pending.
    pub(crate) fn cancel_deletion(&mut self) -> bool {
        match self.pending_deletion.take() {
            Some(pending) => {
                pending.timer.abort();
                true
            }
            None => false,
        }
    }

    /// Clears the pending deletion if it is the one identified by
    /// `generation`. Returns `false` for a stale or cancelled timer.
    pub(crate) fn take_deletion(&mut self, generation: u64) -> bool {
        match &self.pending_deletion {
            Some(pending) if pending.generation == generation => {
                self.pending_deletion = None;
                true
            }
            _ => false,
        }
    }

    /// This room's row in the lobby listing.
    pub fn summary(&self) -> LobbyEntry {
        LobbyEntry {
            id: self.code.clone(),
            size: self.engine.size().get(),
            players: self.players.clone(),
            player_count: self.players.len(),
            spectator_count: self.spectators.len(),
            winner: self.engine.winner(),
        }
    }
}

impl Drop for Room {
    fn drop(&mut self) {
        self.cancel_deletion();
    }
}
