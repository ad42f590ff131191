//! Payment void request workflow.
//!
//! Recorded payments are immutable; the only way to undo one is a void
//! request that an administrator approves or rejects. This module holds
//! the state machine for that workflow:
//! - Void request status and transitions
//! - Workflow actions with audit trail data
//! - Error types for workflow operations

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::VoidError;
pub use service::VoidWorkflow;
pub use types::{VoidAction, VoidRequestStatus};
