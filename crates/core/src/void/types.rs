//! Void workflow domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Status of a void request.
///
/// A request starts `Pending` and is resolved exactly once:
/// - Pending → Approved (payment is voided, invoice balance restored)
/// - Pending → Rejected (payment stands; a new request may follow)
///
/// Resolved requests are immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoidRequestStatus {
    /// Awaiting an administrator's decision.
    Pending,
    /// Approved; the payment has been voided.
    Approved,
    /// Rejected; the payment stands.
    Rejected,
}

impl VoidRequestStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Returns true if the request has been resolved.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

impl fmt::Display for VoidRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Workflow action representing a void state transition with audit data.
#[derive(Debug, Clone)]
pub enum VoidAction {
    /// Open a new void request against a payment.
    Request {
        /// The status of the new request (Pending).
        new_status: VoidRequestStatus,
        /// The user who requested the void.
        requested_by: Uuid,
        /// When the request was opened.
        requested_at: DateTime<Utc>,
        /// The reason for the void.
        reason: String,
    },
    /// Approve a pending void request.
    Approve {
        /// The status after approval.
        new_status: VoidRequestStatus,
        /// The administrator who approved.
        resolved_by: Uuid,
        /// When the request was resolved.
        resolved_at: DateTime<Utc>,
    },
    /// Reject a pending void request.
    Reject {
        /// The status after rejection.
        new_status: VoidRequestStatus,
        /// The administrator who rejected.
        resolved_by: Uuid,
        /// When the request was resolved.
        resolved_at: DateTime<Utc>,
        /// Why the request was turned down.
        rejection_reason: String,
    },
}

impl VoidAction {
    /// Returns the new status resulting from this action.
    #[must_use]
    pub fn new_status(&self) -> VoidRequestStatus {
        match self {
            Self::Request { new_status, .. }
            | Self::Approve { new_status, .. }
            | Self::Reject { new_status, .. } => *new_status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_as_str() {
        assert_eq!(VoidRequestStatus::Pending.as_str(), "pending");
        assert_eq!(VoidRequestStatus::Approved.as_str(), "approved");
        assert_eq!(VoidRequestStatus::Rejected.as_str(), "rejected");
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(
            VoidRequestStatus::parse("pending"),
            Some(VoidRequestStatus::Pending)
        );
        assert_eq!(
            VoidRequestStatus::parse("APPROVED"),
            Some(VoidRequestStatus::Approved)
        );
        assert_eq!(VoidRequestStatus::parse("cancelled"), None);
    }

    #[test]
    fn test_is_resolved() {
        assert!(!VoidRequestStatus::Pending.is_resolved());
        assert!(VoidRequestStatus::Approved.is_resolved());
        assert!(VoidRequestStatus::Rejected.is_resolved());
    }
}
