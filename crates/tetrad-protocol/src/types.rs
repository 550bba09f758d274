//! Event types for Tetrad's wire format.
//!
//! Every frame is one JSON object whose `type` field names the event.
//! Field names are camelCase because browsers read them directly:
//!
//! ```text
//! {"type":"make_move","roomId":"K3F9QZ","r":6,"c":6}
//! {"type":"state_update","gameState":{"size":13,"turnIndex":1,...}}
//! ```

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use tetrad_engine::{GameEngine, Team, Winner};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// The stable identity of a player, supplied by the client at admission.
///
/// Opaque to the server: two connections presenting the same token are the
/// same player, which is how a refreshed browser tab gets its seat back.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A room's join code: six uppercase base-36 characters.
///
/// Codes typed by people arrive with stray whitespace and mixed case, so
/// [`RoomCode::normalize`] trims and uppercases before any lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomCode(String);

impl RoomCode {
    /// Canonicalizes a user-supplied code.
    pub fn normalize(raw: &str) -> Self {
        Self(raw.trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The capacity in which a connection sits in a room.
///
/// Serialized as `"AC"`, `"BD"`, or `"spectator"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    AC,
    BD,
    #[serde(rename = "spectator")]
    Spectator,
}

impl From<Team> for Role {
    fn from(team: Team) -> Self {
        match team {
            Team::AC => Role::AC,
            Team::BD => Role::BD,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::AC => f.write_str("AC"),
            Role::BD => f.write_str("BD"),
            Role::Spectator => f.write_str("spectator"),
        }
    }
}

// ---------------------------------------------------------------------------
// Client → Server
// ---------------------------------------------------------------------------

/// Events a client may send once admitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ClientEvent {
    /// Open a new room. A missing or unsupported `size` falls back to 13.
    CreateGame {
        #[serde(default, deserialize_with = "lenient_size")]
        size: Option<i64>,
    },

    /// Take a seat (or a spectator spot) in an existing room.
    JoinGame { room_id: String },

    /// Leave a room and go back to the lobby.
    LeaveGame { room_id: String },

    /// Place a pawn for the color whose turn it is.
    MakeMove { room_id: String, r: i64, c: i64 },
}

/// Accepts a number, a numeric string, or anything else (treated as absent).
fn lenient_size<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Int(n)) => Some(n),
        Some(Raw::Text(s)) => s.trim().parse().ok(),
        Some(Raw::Other(_)) | None => None,
    })
}

// ---------------------------------------------------------------------------
// Server → Client
// ---------------------------------------------------------------------------

/// One row of the lobby listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LobbyEntry {
    pub id: RoomCode,
    pub size: usize,
    /// Seated players, slot 0 (AC) first.
    pub players: Vec<PlayerId>,
    pub player_count: usize,
    pub spectator_count: usize,
    pub winner: Option<Winner>,
}

/// Events the server pushes to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ServerEvent {
    /// Reply to `create_game`. The creator always plays AC.
    GameCreated {
        room_id: RoomCode,
        team: Role,
        game_state: GameEngine,
    },

    /// Reply to `join_game`.
    GameJoined {
        room_id: RoomCode,
        team: Role,
        game_state: GameEngine,
    },

    /// Full snapshot after any change to a room's game.
    StateUpdate { game_state: GameEngine },

    /// The match has been decided.
    GameOver { winner: Winner },

    /// Room listing for connections sitting in the lobby.
    LobbyUpdate {
        open_games: Vec<LobbyEntry>,
        active_games: Vec<LobbyEntry>,
    },

    /// Informational text for everyone in a room.
    Message { text: String },

    /// A request was rejected. Sent only to the requester.
    ErrorMessage { message: String },
}
