//! Void workflow service for payment void state transitions.
//!
//! This module implements the state machine for the void request
//! lifecycle. The database layer enforces the same single-pending rule
//! with a partial unique index; the checks here give precise errors
//! before the constraint ever fires.

use chrono::Utc;
use uuid::Uuid;

use crate::void::error::VoidError;
use crate::void::types::{VoidAction, VoidRequestStatus};

/// Stateless service for managing void request transitions.
///
/// All methods are associated functions that validate and execute
/// state transitions, returning the appropriate `VoidAction` with
/// audit trail information.
pub struct VoidWorkflow;

impl VoidWorkflow {
    /// Open a void request against a payment.
    ///
    /// # Arguments
    /// * `payment_id` - The payment being voided
    /// * `payment_voided` - Whether the payment is already voided
    /// * `pending_exists` - Whether a pending request already exists
    /// * `requested_by` - The user opening the request
    /// * `reason` - Why the payment should be voided (required)
    ///
    /// # Returns
    /// * `Ok(VoidAction::Request)` if the request can be opened
    /// * `Err(VoidError::AlreadyVoided)` if the payment is voided
    /// * `Err(VoidError::RequestAlreadyPending)` if one is already open
    /// * `Err(VoidError::ReasonRequired)` if the reason is blank
    pub fn request(
        payment_id: Uuid,
        payment_voided: bool,
        pending_exists: bool,
        requested_by: Uuid,
        reason: String,
    ) -> Result<VoidAction, VoidError> {
        if reason.trim().is_empty() {
            return Err(VoidError::ReasonRequired);
        }
        if payment_voided {
            return Err(VoidError::AlreadyVoided(payment_id));
        }
        if pending_exists {
            return Err(VoidError::RequestAlreadyPending(payment_id));
        }

        Ok(VoidAction::Request {
            new_status: VoidRequestStatus::Pending,
            requested_by,
            requested_at: Utc::now(),
            reason,
        })
    }

    /// Approve a pending void request.
    ///
    /// # Returns
    /// * `Ok(VoidAction::Approve)` if the request is pending
    /// * `Err(VoidError::NotPending)` otherwise
    pub fn approve(
        current_status: VoidRequestStatus,
        resolved_by: Uuid,
    ) -> Result<VoidAction, VoidError> {
        match current_status {
            VoidRequestStatus::Pending => Ok(VoidAction::Approve {
                new_status: VoidRequestStatus::Approved,
                resolved_by,
                resolved_at: Utc::now(),
            }),
            _ => Err(VoidError::NotPending {
                current: current_status,
            }),
        }
    }

    /// Reject a pending void request.
    ///
    /// # Returns
    /// * `Ok(VoidAction::Reject)` if the request is pending
    /// * `Err(VoidError::NotPending)` otherwise
    /// * `Err(VoidError::RejectionReasonRequired)` if the reason is blank
    pub fn reject(
        current_status: VoidRequestStatus,
        resolved_by: Uuid,
        rejection_reason: String,
    ) -> Result<VoidAction, VoidError> {
        if rejection_reason.trim().is_empty() {
            return Err(VoidError::RejectionReasonRequired);
        }

        match current_status {
            VoidRequestStatus::Pending => Ok(VoidAction::Reject {
                new_status: VoidRequestStatus::Rejected,
                resolved_by,
                resolved_at: Utc::now(),
                rejection_reason,
            }),
            _ => Err(VoidError::NotPending {
                current: current_status,
            }),
        }
    }

    /// Check if a status transition is valid.
    ///
    /// Valid transitions:
    /// - Pending → Approved (approve)
    /// - Pending → Rejected (reject)
    #[must_use]
    pub fn is_valid_transition(from: VoidRequestStatus, to: VoidRequestStatus) -> bool {
        matches!(
            (from, to),
            (
                VoidRequestStatus::Pending,
                VoidRequestStatus::Approved | VoidRequestStatus::Rejected
            )
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> Uuid {
        Uuid::now_v7()
    }

    #[test]
    fn test_request_opens_pending() {
        let action = VoidWorkflow::request(
            Uuid::now_v7(),
            false,
            false,
            admin(),
            "duplicate receipt".to_string(),
        )
        .unwrap();

        assert_eq!(action.new_status(), VoidRequestStatus::Pending);
        assert!(matches!(action, VoidAction::Request { reason, .. } if reason == "duplicate receipt"));
    }

    #[test]
    fn test_request_blank_reason_rejected() {
        let result = VoidWorkflow::request(Uuid::now_v7(), false, false, admin(), "  ".to_string());
        assert!(matches!(result, Err(VoidError::ReasonRequired)));
    }

    #[test]
    fn test_request_against_voided_payment() {
        let payment_id = Uuid::now_v7();
        let result =
            VoidWorkflow::request(payment_id, true, false, admin(), "mistake".to_string());
        assert!(matches!(result, Err(VoidError::AlreadyVoided(id)) if id == payment_id));
    }

    #[test]
    fn test_request_with_pending_open() {
        let payment_id = Uuid::now_v7();
        let result =
            VoidWorkflow::request(payment_id, false, true, admin(), "mistake".to_string());
        assert!(matches!(result, Err(VoidError::RequestAlreadyPending(id)) if id == payment_id));
    }

    #[test]
    fn test_approve_pending() {
        let action = VoidWorkflow::approve(VoidRequestStatus::Pending, admin()).unwrap();
        assert_eq!(action.new_status(), VoidRequestStatus::Approved);
    }

    #[test]
    fn test_approve_already_approved() {
        // Double approval must fail so the balance is never restored twice.
        let result = VoidWorkflow::approve(VoidRequestStatus::Approved, admin());
        assert!(matches!(
            result,
            Err(VoidError::NotPending {
                current: VoidRequestStatus::Approved,
            })
        ));
    }

    #[test]
    fn test_approve_rejected_request() {
        let result = VoidWorkflow::approve(VoidRequestStatus::Rejected, admin());
        assert!(matches!(result, Err(VoidError::NotPending { .. })));
    }

    #[test]
    fn test_reject_pending() {
        let action = VoidWorkflow::reject(
            VoidRequestStatus::Pending,
            admin(),
            "payment was legitimate".to_string(),
        )
        .unwrap();
        assert_eq!(action.new_status(), VoidRequestStatus::Rejected);
    }

    #[test]
    fn test_reject_requires_reason() {
        let result = VoidWorkflow::reject(VoidRequestStatus::Pending, admin(), String::new());
        assert!(matches!(result, Err(VoidError::RejectionReasonRequired)));
    }

    #[test]
    fn test_reject_resolved_request() {
        let result = VoidWorkflow::reject(
            VoidRequestStatus::Approved,
            admin(),
            "too late".to_string(),
        );
        assert!(matches!(result, Err(VoidError::NotPending { .. })));
    }

    #[test]
    fn test_valid_transitions() {
        assert!(VoidWorkflow::is_valid_transition(
            VoidRequestStatus::Pending,
            VoidRequestStatus::Approved
        ));
        assert!(VoidWorkflow::is_valid_transition(
            VoidRequestStatus::Pending,
            VoidRequestStatus::Rejected
        ));
        assert!(!VoidWorkflow::is_valid_transition(
            VoidRequestStatus::Approved,
            VoidRequestStatus::Rejected
        ));
        assert!(!VoidWorkflow::is_valid_transition(
            VoidRequestStatus::Rejected,
            VoidRequestStatus::Pending
        ));
    }
}
