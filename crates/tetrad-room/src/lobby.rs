//! Lobby listing.
//!
//! Rooms still waiting for a second player are "open"; everything else,
//! including finished matches, is "active".

use tetrad_protocol::ServerEvent;

use crate::Room;

/// Builds the `lobby_update` event for a set of rooms.
///
/// Entries keep the iteration order of `rooms`; the manager passes them
/// ordered by code.
pub fn lobby_update<'a>(rooms: impl IntoIterator<Item = &'a Room>) -> ServerEvent {
    let (open_games, active_games) = rooms
        .into_iter()
        .partition::<Vec<_>, _>(|room| !room.engine().is_decided() && !room.is_full());

    ServerEvent::LobbyUpdate {
        open_games: open_games.into_iter().map(Room::summary).collect(),
        active_games: active_games.into_iter().map(Room::summary).collect(),
    }
}
