//! # Tetrad
//!
//! Real-time server for a four-color territorial capture game. Two teams
//! (colors A+C against B+D) share a square board; pawns convert enemy
//! lines by pincering them, and the first color to link two opposite
//! edges wins.
//!
//! The server ties the layers together: WebSocket transport → JSON
//! events → admission → the room manager actor.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tetrad::prelude::*;
//!
//! # async fn run() -> Result<(), TetradError> {
//! let server = TetradServer::builder()
//!     .bind("0.0.0.0:3000")
//!     .build(TokenAuthenticator)
//!     .await?;
//! server.run().await
//! # }
//! ```

mod error;
mod handler;
mod server;

pub use error::TetradError;
pub use server::{TetradServer, TetradServerBuilder};

pub mod prelude {
    pub use crate::{TetradError, TetradServer, TetradServerBuilder};
    pub use tetrad_engine::{BoardSize, Color, GameEngine, Team, Winner};
    pub use tetrad_protocol::{ClientEvent, PlayerId, Role, RoomCode, ServerEvent};
    pub use tetrad_room::RoomConfig;
    pub use tetrad_session::{Authenticator, SessionError, TokenAuthenticator};
}
