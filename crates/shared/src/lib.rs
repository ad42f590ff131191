//! Shared types, errors, and configuration for Sala.
//!
//! This crate provides common types used across all other crates:
//! - Application-wide error types
//! - Authentication claims and the per-request access context
//! - JWT token service
//! - Configuration management

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;

pub use auth::{AccessContext, AccessLevel, CampusGrant, Claims};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use jwt::{JwtError, JwtService};
