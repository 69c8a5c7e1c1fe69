//! WebSocket layer: the authenticated handshake and per-connection pumps.
//!
//! The endpoint at `/ws` is push-only. Clients authenticate with a bearer
//! token during the upgrade and then receive one text frame per created
//! post.

pub mod connection;
pub mod handler;
