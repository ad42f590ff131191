//! Void workflow error types.

use thiserror::Error;
use uuid::Uuid;

use crate::void::types::VoidRequestStatus;

/// Errors that can occur during void workflow operations.
#[derive(Debug, Error)]
pub enum VoidError {
    /// The payment has already been voided.
    #[error("Payment {0} is already voided")]
    AlreadyVoided(Uuid),

    /// The payment already has a pending void request.
    #[error("Payment {0} already has a pending void request")]
    RequestAlreadyPending(Uuid),

    /// Attempted to resolve a request that is not pending.
    #[error("Void request is {current}, only pending requests can be resolved")]
    NotPending {
        /// The request's current status.
        current: VoidRequestStatus,
    },

    /// Void reason is required but not provided.
    #[error("Void reason is required")]
    ReasonRequired,

    /// Rejection reason is required but not provided.
    #[error("Rejection reason is required")]
    RejectionReasonRequired,

    /// Payment not found.
    #[error("Payment {0} not found")]
    PaymentNotFound(Uuid),

    /// Void request not found.
    #[error("Void request {0} not found")]
    RequestNotFound(Uuid),

    /// The entity exists but is owned by a campus outside the caller's
    /// scope. Deliberately carries no detail about the owning campus.
    #[error("Access to this campus is denied")]
    CampusForbidden,

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl VoidError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::ReasonRequired | Self::RejectionReasonRequired => 400,

            Self::AlreadyVoided(_) | Self::RequestAlreadyPending(_) | Self::NotPending { .. } => {
                409
            }

            Self::PaymentNotFound(_) | Self::RequestNotFound(_) => 404,

            Self::CampusForbidden => 403,

            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::AlreadyVoided(_) => "ALREADY_VOIDED",
            Self::RequestAlreadyPending(_) => "REQUEST_ALREADY_PENDING",
            Self::NotPending { .. } => "REQUEST_NOT_PENDING",
            Self::ReasonRequired => "VOID_REASON_REQUIRED",
            Self::RejectionReasonRequired => "REJECTION_REASON_REQUIRED",
            Self::PaymentNotFound(_) => "PAYMENT_NOT_FOUND",
            Self::RequestNotFound(_) => "VOID_REQUEST_NOT_FOUND",
            Self::CampusForbidden => "CAMPUS_FORBIDDEN",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(VoidError::ReasonRequired.status_code(), 400);
        assert_eq!(VoidError::AlreadyVoided(Uuid::nil()).status_code(), 409);
        assert_eq!(
            VoidError::NotPending {
                current: VoidRequestStatus::Approved,
            }
            .status_code(),
            409
        );
        assert_eq!(VoidError::RequestNotFound(Uuid::nil()).status_code(), 404);
        assert_eq!(VoidError::CampusForbidden.status_code(), 403);
        assert_eq!(VoidError::Database("oops".into()).status_code(), 500);
    }

    #[test]
    fn test_not_pending_message_names_status() {
        let err = VoidError::NotPending {
            current: VoidRequestStatus::Rejected,
        };
        assert!(err.to_string().contains("rejected"));
    }
}
