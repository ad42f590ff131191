//! Ledger domain types for invoices and payments.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Payment status of an invoice, derived from its amounts.
///
/// Status is never stored independently of the amounts that imply it:
/// every mutation recomputes it from `total_amount` and `paid_amount`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// No payment has been applied.
    Unpaid,
    /// Some, but not all, of the total has been paid.
    Partial,
    /// The full total has been paid.
    Paid,
    /// The invoice was cancelled and no longer accepts payments.
    Cancelled,
}

impl InvoiceStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::Partial => "partial",
            Self::Paid => "paid",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "unpaid" => Some(Self::Unpaid),
            "partial" => Some(Self::Partial),
            "paid" => Some(Self::Paid),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns true if the invoice can still accept payments.
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Unpaid | Self::Partial)
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A line item supplied when creating an invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceItemInput {
    /// What the charge is for.
    pub description: String,
    /// The amount charged for this item. Must be positive.
    pub amount: Decimal,
}

/// The result of applying or reversing a payment against an invoice.
///
/// Carries the new amounts and the status they imply, ready to be
/// written back in the same transaction that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentOutcome {
    /// The invoice's paid amount after the mutation.
    pub paid_amount: Decimal,
    /// The remaining balance (`total_amount - paid_amount`).
    pub balance: Decimal,
    /// The status derived from the new amounts.
    pub status: InvoiceStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_as_str() {
        assert_eq!(InvoiceStatus::Unpaid.as_str(), "unpaid");
        assert_eq!(InvoiceStatus::Partial.as_str(), "partial");
        assert_eq!(InvoiceStatus::Paid.as_str(), "paid");
        assert_eq!(InvoiceStatus::Cancelled.as_str(), "cancelled");
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(InvoiceStatus::parse("unpaid"), Some(InvoiceStatus::Unpaid));
        assert_eq!(InvoiceStatus::parse("PARTIAL"), Some(InvoiceStatus::Partial));
        assert_eq!(InvoiceStatus::parse("Paid"), Some(InvoiceStatus::Paid));
        assert_eq!(InvoiceStatus::parse("bogus"), None);
    }

    #[test]
    fn test_status_is_open() {
        assert!(InvoiceStatus::Unpaid.is_open());
        assert!(InvoiceStatus::Partial.is_open());
        assert!(!InvoiceStatus::Paid.is_open());
        assert!(!InvoiceStatus::Cancelled.is_open());
    }

    #[test]
    fn test_status_serde_roundtrip() {
        let json = serde_json::to_string(&InvoiceStatus::Partial).unwrap();
        assert_eq!(json, "\"partial\"");
        let back: InvoiceStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, InvoiceStatus::Partial);
    }
}
