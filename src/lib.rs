//! # murmur-gateway
//!
//! Backend for short posts with real-time delivery. Authenticated users
//! create posts over REST; every stored post is pushed, as it is created,
//! to all live WebSocket connections.
//!
//! The heart of the crate is the broadcast [`domain::Hub`]: a single
//! coordinator task that owns the registry of admitted connections and
//! fans each event out with a non-blocking enqueue per connection. A
//! connection whose bounded outbound queue is full is evicted rather than
//! allowed to stall everyone else.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)          ── Authenticated extractor (auth/)
//!     ├── WS Handshake + Pumps (ws/)    ── Authenticated extractor (auth/)
//!     │
//!     ├── AccountService / PostService (service/)
//!     │       └── PostService ── broadcast ──► Hub (domain/)
//!     │
//!     └── Storage: in-memory or PostgreSQL (persistence/)
//! ```

pub mod api;
pub mod app_state;
pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
pub mod ws;
