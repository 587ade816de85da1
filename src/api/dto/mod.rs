//! Data Transfer Objects for REST request/response serialization.
//!
//! Request bodies are lenient: missing fields take defaults and unknown
//! fields are ignored. Responses never expose password secrets.

pub mod auth_dto;
pub mod common_dto;
pub mod order_dto;
pub mod user_dto;

pub use auth_dto::*;
pub use common_dto::*;
pub use order_dto::*;
pub use user_dto::*;
