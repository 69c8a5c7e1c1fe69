//! Data Transfer Objects for REST request/response serialization.

pub mod account_dto;
pub mod post_dto;

pub use account_dto::*;
pub use post_dto::*;
