//! Room lifecycle management for Tetrad.
//!
//! All rooms live in one [`RoomManager`], owned by a single Tokio task
//! (the manager actor). Every player action, disconnect, and deletion
//! timer expiry is processed there one at a time, so rooms and their
//! engines need no locking.
//!
//! # Key types
//!
//! - [`RoomManager`]: seats players, authorizes moves, schedules teardown
//! - [`Room`]: one match: engine, player slots, spectators, pending deletion
//! - [`ManagerHandle`]: send commands to the running manager actor
//! - [`RoomConfig`]: grace period, code seed, channel sizing
//! - [`RoomError`]: caller-local rejections

mod code;
mod config;
mod error;
mod lobby;
mod manager;
mod room;
mod service;

pub use code::CodeGenerator;
pub use config::RoomConfig;
pub use error::RoomError;
pub use lobby::lobby_update;
pub use manager::{Expiry, RoomManager, Seat};
pub use room::Room;
pub use service::{ManagerHandle, spawn_manager};
