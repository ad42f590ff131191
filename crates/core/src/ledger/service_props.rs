//! Property-based tests for invoice balance arithmetic.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::service::LedgerService;
use super::types::InvoiceStatus;

/// Strategy to generate an amount from 0.01 to 1,000,000.00.
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// For any invoice, balance + paid_amount always equals total_amount
    /// after a successful payment.
    #[test]
    fn prop_payment_conserves_total(
        total in positive_amount(),
        fraction in 1u32..=100u32,
    ) {
        let amount = total * Decimal::from(fraction) / Decimal::from(100u32);
        prop_assume!(amount > Decimal::ZERO && amount <= total);

        let outcome = LedgerService::apply_payment(total, Decimal::ZERO, amount).unwrap();
        prop_assert_eq!(outcome.balance + outcome.paid_amount, total);
    }

    /// A payment larger than the remaining balance is always rejected,
    /// regardless of how the balance was reached.
    #[test]
    fn prop_overpayment_always_rejected(
        total in positive_amount(),
        excess in positive_amount(),
    ) {
        let result = LedgerService::apply_payment(total, Decimal::ZERO, total + excess);
        prop_assert!(result.is_err());
    }

    /// Applying then reversing the same payment restores the original
    /// amounts and status exactly.
    #[test]
    fn prop_reverse_is_inverse_of_apply(
        total in positive_amount(),
        prior_fraction in 0u32..=50u32,
        fraction in 1u32..=50u32,
    ) {
        let prior = total * Decimal::from(prior_fraction) / Decimal::from(100u32);
        let amount = total * Decimal::from(fraction) / Decimal::from(100u32);
        prop_assume!(amount > Decimal::ZERO);

        let applied = LedgerService::apply_payment(total, prior, amount).unwrap();
        let reversed =
            LedgerService::reverse_payment(total, applied.paid_amount, amount).unwrap();

        prop_assert_eq!(reversed.paid_amount, prior);
        prop_assert_eq!(reversed.balance, total - prior);
        prop_assert_eq!(reversed.status, LedgerService::derive_status(total, prior));
    }

    /// The derived status always agrees with the amounts that imply it.
    #[test]
    fn prop_status_matches_amounts(
        total in positive_amount(),
        fraction in 0u32..=100u32,
    ) {
        let paid = total * Decimal::from(fraction) / Decimal::from(100u32);
        let status = LedgerService::derive_status(total, paid);

        if paid == Decimal::ZERO {
            prop_assert_eq!(status, InvoiceStatus::Unpaid);
        } else if paid < total {
            prop_assert_eq!(status, InvoiceStatus::Partial);
        } else {
            prop_assert_eq!(status, InvoiceStatus::Paid);
        }
    }

    /// Paid amount never goes negative through any sequence of
    /// successful applies and reverses.
    #[test]
    fn prop_paid_amount_never_negative(
        total in positive_amount(),
        ops in prop::collection::vec((any::<bool>(), 1u32..=40u32), 1..20),
    ) {
        let mut paid = Decimal::ZERO;
        for (is_apply, fraction) in ops {
            let amount = total * Decimal::from(fraction) / Decimal::from(100u32);
            let result = if is_apply {
                LedgerService::apply_payment(total, paid, amount)
            } else {
                LedgerService::reverse_payment(total, paid, amount)
            };
            if let Ok(outcome) = result {
                paid = outcome.paid_amount;
            }
            prop_assert!(paid >= Decimal::ZERO);
            prop_assert!(paid <= total);
        }
    }
}
