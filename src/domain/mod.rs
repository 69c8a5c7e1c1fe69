//! Domain layer: identifiers, posts, users, and the broadcast hub.
//!
//! The [`Hub`] is the only stateful concurrent component in the service:
//! it owns the registry of live push connections and fans every newly
//! created [`Post`] out to them as an [`Event`].

pub mod event;
pub mod hub;
pub mod ids;
pub mod post;
pub mod sanitize;

pub use event::Event;
pub use hub::{Hub, Member, Registry};
pub use ids::{ConnectionId, PostId, UserId};
pub use post::{Post, User};
