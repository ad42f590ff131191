//! Invoice and payment balance logic.
//!
//! This module implements the core ledger functionality:
//! - Invoice status derivation from amounts
//! - Invoice line item validation
//! - Payment application and reversal arithmetic
//! - Error types for ledger operations

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::LedgerError;
pub use service::LedgerService;
pub use types::{InvoiceItemInput, InvoiceStatus, PaymentOutcome};
