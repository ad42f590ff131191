//! Authentication primitives.
//!
//! This module provides:
//! - Password hashing with Argon2id
//! - Password verification
//!
//! Campus access levels live in `sala_shared::auth` since they are
//! shared between the API layer and the database layer.

mod password;

pub use password::{PasswordError, hash_password, verify_password};
