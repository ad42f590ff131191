//! API middleware.

pub mod auth;

pub use auth::{AuthContext, auth_middleware};
