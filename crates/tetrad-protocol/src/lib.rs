//! Wire protocol for Tetrad.
//!
//! - **Types** ([`ClientEvent`], [`ServerEvent`], [`LobbyEntry`], ...):
//!   the events that travel between browser and server.
//! - **Identities** ([`PlayerId`], [`RoomCode`], [`Role`]): who is
//!   talking, which room, and in what capacity.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how events become text
//!   frames and back.
//!
//! ```text
//! Transport (text frames) → Protocol (events) → Session/Room (state)
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{ClientEvent, LobbyEntry, PlayerId, Role, RoomCode, ServerEvent};

// Re-exported so the layers above speak about connections without
// depending on the transport crate directly.
pub use tetrad_transport::ConnectionId;
