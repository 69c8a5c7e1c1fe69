//! Service layer: business logic orchestration.
//!
//! [`AccountService`] handles registration and login; [`PostService`]
//! stores posts and publishes each one through the [`crate::domain::Hub`].

pub mod account_service;
pub mod post_service;

pub use account_service::AccountService;
pub use post_service::PostService;
