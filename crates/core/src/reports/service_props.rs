//! Property-based tests for report aggregation.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::service::ReportService;
use super::types::PaymentRecord;

fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn payment_strategy() -> impl Strategy<Value = PaymentRecord> {
    (
        amount_strategy(),
        prop_oneof![Just("cash"), Just("transfer"), Just("card")],
        any::<bool>(),
        1u32..=28u32,
    )
        .prop_map(|(amount, method, is_voided, day)| PaymentRecord {
            payment_id: Uuid::now_v7(),
            receipt_number: "RCT-prop".to_string(),
            payment_date: NaiveDate::from_ymd_opt(2026, 3, day).unwrap(),
            amount,
            payment_method: method.to_string(),
            invoice_number: "INV-prop".to_string(),
            student_code: "S-prop".to_string(),
            student_name: "prop".to_string(),
            campus_id: Uuid::nil(),
            is_voided,
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The cashbox grand total always equals the sum of its per-method
    /// subtotals, and voided amounts never leak into either.
    #[test]
    fn prop_cashbox_totals_consistent(
        payments in prop::collection::vec(payment_strategy(), 0..40),
    ) {
        let expected_live: Decimal = payments
            .iter()
            .filter(|p| !p.is_voided)
            .map(|p| p.amount)
            .sum();
        let expected_voided: Decimal = payments
            .iter()
            .filter(|p| p.is_voided)
            .map(|p| p.amount)
            .sum();

        let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let report = ReportService::daily_cashbox(date, None, payments);

        prop_assert_eq!(report.grand_total, expected_live);
        prop_assert_eq!(report.voided_total, expected_voided);

        let method_sum: Decimal = report.by_method.iter().map(|m| m.total).sum();
        prop_assert_eq!(method_sum, report.grand_total);

        let method_count: u64 = report.by_method.iter().map(|m| m.count).sum();
        prop_assert_eq!(method_count, report.transaction_count);
    }

    /// The daily income series covers exactly the non-voided payments,
    /// in date order.
    #[test]
    fn prop_daily_income_partitions_payments(
        payments in prop::collection::vec(payment_strategy(), 0..40),
    ) {
        let series = ReportService::daily_income(&payments);

        let expected_total: Decimal = payments
            .iter()
            .filter(|p| !p.is_voided)
            .map(|p| p.amount)
            .sum();
        let series_total: Decimal = series.iter().map(|e| e.total).sum();
        prop_assert_eq!(series_total, expected_total);

        let expected_count = payments.iter().filter(|p| !p.is_voided).count() as u64;
        let series_count: u64 = series.iter().map(|e| e.transaction_count).sum();
        prop_assert_eq!(series_count, expected_count);

        for window in series.windows(2) {
            prop_assert!(window[0].date < window[1].date);
        }
    }
}
