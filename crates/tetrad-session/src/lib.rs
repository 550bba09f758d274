//! Connection admission and client tracking for Tetrad.
//!
//! 1. **Admission**: turning the token a browser presents into a
//!    [`PlayerId`](tetrad_protocol::PlayerId) ([`Authenticator`] trait)
//! 2. **Client registry**: which connections are live, who they belong
//!    to, and which broadcast [`Group`] each one sits in ([`ClientRegistry`])
//!
//! ```text
//! Room Layer (above)  ← broadcasts through the registry's groups
//!     ↕
//! Session Layer (this crate)
//!     ↕
//! Protocol Layer (below)  ← PlayerId, RoomCode, ServerEvent
//! ```
//!
//! A player's identity outlives any single connection. Reconnecting is
//! simply connecting again with the same token; the room layer puts the
//! player back in their seat.

#![allow(async_fn_in_trait)]

mod auth;
mod client;
mod error;

pub use auth::{Authenticator, TokenAuthenticator};
pub use client::{Client, ClientRegistry, Group, Outbox};
pub use error::SessionError;
