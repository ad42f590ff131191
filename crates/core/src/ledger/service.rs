//! Ledger service for invoice and payment arithmetic.
//!
//! All functions here are pure: they take the current invoice amounts
//! and return the new amounts, leaving persistence to the caller. The
//! repository layer runs them inside a transaction while holding a row
//! lock on the invoice, so the amounts they see are current.

use rust_decimal::Decimal;

use crate::ledger::error::LedgerError;
use crate::ledger::types::{InvoiceItemInput, InvoiceStatus, PaymentOutcome};

/// Stateless service implementing the invoice balance rules.
pub struct LedgerService;

impl LedgerService {
    /// Derives the invoice status from its amounts.
    ///
    /// The rule, applied uniformly everywhere a status is computed:
    /// - balance >= total: `Unpaid` (nothing has been paid)
    /// - 0 < balance < total: `Partial`
    /// - balance <= 0: `Paid`
    ///
    /// `Cancelled` is never derived; it is set explicitly and sticks.
    #[must_use]
    pub fn derive_status(total_amount: Decimal, paid_amount: Decimal) -> InvoiceStatus {
        let balance = total_amount - paid_amount;
        if balance >= total_amount {
            InvoiceStatus::Unpaid
        } else if balance > Decimal::ZERO {
            InvoiceStatus::Partial
        } else {
            InvoiceStatus::Paid
        }
    }

    /// Validates invoice line items and returns the invoice total.
    ///
    /// # Errors
    ///
    /// * `LedgerError::EmptyInvoice` if `items` is empty
    /// * `LedgerError::BlankItemDescription` if a description is blank
    /// * `LedgerError::InvalidItemAmount` if an amount is not positive
    pub fn validate_items(items: &[InvoiceItemInput]) -> Result<Decimal, LedgerError> {
        if items.is_empty() {
            return Err(LedgerError::EmptyInvoice);
        }

        let mut total = Decimal::ZERO;
        for item in items {
            if item.description.trim().is_empty() {
                return Err(LedgerError::BlankItemDescription);
            }
            if item.amount <= Decimal::ZERO {
                return Err(LedgerError::InvalidItemAmount {
                    amount: item.amount,
                });
            }
            total += item.amount;
        }

        Ok(total)
    }

    /// Applies a payment to an invoice.
    ///
    /// # Arguments
    /// * `total_amount` - The invoice total
    /// * `paid_amount` - The amount paid so far
    /// * `amount` - The payment being recorded
    ///
    /// # Errors
    ///
    /// * `LedgerError::NonPositivePayment` if `amount <= 0`
    /// * `LedgerError::PaymentExceedsBalance` if `amount` is greater
    ///   than the remaining balance
    pub fn apply_payment(
        total_amount: Decimal,
        paid_amount: Decimal,
        amount: Decimal,
    ) -> Result<PaymentOutcome, LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::NonPositivePayment { amount });
        }

        let balance = total_amount - paid_amount;
        if amount > balance {
            return Err(LedgerError::PaymentExceedsBalance { amount, balance });
        }

        let new_paid = paid_amount + amount;
        Ok(PaymentOutcome {
            paid_amount: new_paid,
            balance: total_amount - new_paid,
            status: Self::derive_status(total_amount, new_paid),
        })
    }

    /// Reverses a previously applied payment (void approval).
    ///
    /// # Errors
    ///
    /// * `LedgerError::ReversalExceedsPaid` if reversing `amount` would
    ///   drive the paid amount negative. This indicates a corrupted
    ///   ledger and must abort the surrounding transaction.
    pub fn reverse_payment(
        total_amount: Decimal,
        paid_amount: Decimal,
        amount: Decimal,
    ) -> Result<PaymentOutcome, LedgerError> {
        if amount > paid_amount {
            return Err(LedgerError::ReversalExceedsPaid {
                amount,
                paid: paid_amount,
            });
        }

        let new_paid = paid_amount - amount;
        Ok(PaymentOutcome {
            paid_amount: new_paid,
            balance: total_amount - new_paid,
            status: Self::derive_status(total_amount, new_paid),
        })
    }
}
