//! Ledger error types for invoice and payment operations.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Attempted to create an invoice with no line items.
    #[error("Invoice must have at least one line item")]
    EmptyInvoice,

    /// A line item amount was zero or negative.
    #[error("Line item amount {amount} must be positive")]
    InvalidItemAmount {
        /// The offending amount.
        amount: Decimal,
    },

    /// A line item description was empty or whitespace.
    #[error("Line item description is required")]
    BlankItemDescription,

    /// A payment amount was zero or negative.
    #[error("Payment amount {amount} must be positive")]
    NonPositivePayment {
        /// The offending amount.
        amount: Decimal,
    },

    /// A payment amount exceeded the invoice's remaining balance.
    #[error("Payment amount {amount} exceeds remaining balance {balance}")]
    PaymentExceedsBalance {
        /// The attempted payment amount.
        amount: Decimal,
        /// The remaining balance on the invoice.
        balance: Decimal,
    },

    /// A reversal would leave the invoice with a negative paid amount.
    #[error("Reversal amount {amount} exceeds paid amount {paid}")]
    ReversalExceedsPaid {
        /// The amount being reversed.
        amount: Decimal,
        /// The invoice's current paid amount.
        paid: Decimal,
    },

    /// Attempted to record a payment against a closed invoice.
    #[error("Invoice {0} is not open for payment")]
    InvoiceNotOpen(Uuid),

    /// Invoice not found.
    #[error("Invoice {0} not found")]
    InvoiceNotFound(Uuid),

    /// Student not found.
    #[error("Student {0} not found")]
    StudentNotFound(Uuid),

    /// Payment not found.
    #[error("Payment {0} not found")]
    PaymentNotFound(Uuid),

    /// The entity exists but is owned by a campus outside the caller's
    /// scope. Deliberately carries no detail about the owning campus.
    #[error("Access to this campus is denied")]
    CampusForbidden,

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl LedgerError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::EmptyInvoice
            | Self::InvalidItemAmount { .. }
            | Self::BlankItemDescription
            | Self::NonPositivePayment { .. }
            | Self::PaymentExceedsBalance { .. } => 400,

            Self::ReversalExceedsPaid { .. } | Self::InvoiceNotOpen(_) => 409,

            Self::InvoiceNotFound(_) | Self::StudentNotFound(_) | Self::PaymentNotFound(_) => 404,

            Self::CampusForbidden => 403,

            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyInvoice => "EMPTY_INVOICE",
            Self::InvalidItemAmount { .. } => "INVALID_ITEM_AMOUNT",
            Self::BlankItemDescription => "BLANK_ITEM_DESCRIPTION",
            Self::NonPositivePayment { .. } => "NON_POSITIVE_PAYMENT",
            Self::PaymentExceedsBalance { .. } => "PAYMENT_EXCEEDS_BALANCE",
            Self::ReversalExceedsPaid { .. } => "REVERSAL_EXCEEDS_PAID",
            Self::InvoiceNotOpen(_) => "INVOICE_NOT_OPEN",
            Self::InvoiceNotFound(_) => "INVOICE_NOT_FOUND",
            Self::StudentNotFound(_) => "STUDENT_NOT_FOUND",
            Self::PaymentNotFound(_) => "PAYMENT_NOT_FOUND",
            Self::CampusForbidden => "CAMPUS_FORBIDDEN",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}
