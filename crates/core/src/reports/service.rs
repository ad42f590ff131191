//! Report aggregation service.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::reports::types::{
    CashboxReport, DailyIncomeEntry, DebtInvoice, DebtReport, Debtor, MethodTotal, PaymentRecord,
};

/// Stateless service that folds ledger rows into report shapes.
pub struct ReportService;

impl ReportService {
    /// Builds the daily cashbox report from one day's payments.
    ///
    /// Voided payments stay in the transaction listing for audit but
    /// contribute to `voided_total` instead of the money totals.
    #[must_use]
    pub fn daily_cashbox(
        report_date: NaiveDate,
        campus_id: Option<Uuid>,
        payments: Vec<PaymentRecord>,
    ) -> CashboxReport {
        let mut by_method: BTreeMap<String, (u64, Decimal)> = BTreeMap::new();
        let mut grand_total = Decimal::ZERO;
        let mut voided_total = Decimal::ZERO;
        let mut transaction_count = 0u64;

        for payment in &payments {
            if payment.is_voided {
                voided_total += payment.amount;
                continue;
            }
            transaction_count += 1;
            grand_total += payment.amount;
            let entry = by_method
                .entry(payment.payment_method.clone())
                .or_insert((0, Decimal::ZERO));
            entry.0 += 1;
            entry.1 += payment.amount;
        }

        let mut by_method: Vec<MethodTotal> = by_method
            .into_iter()
            .map(|(method, (count, total))| MethodTotal {
                method,
                count,
                total,
            })
            .collect();
        by_method.sort_by(|a, b| b.total.cmp(&a.total));

        CashboxReport {
            report_date,
            campus_id,
            transaction_count,
            by_method,
            grand_total,
            voided_total,
            transactions: payments,
        }
    }

    /// Builds the outstanding debt report from open invoice rows.
    ///
    /// Groups invoices by student, orders debtors by amount owed, and
    /// caps the listing at `limit`. The headline totals always cover
    /// every debtor, listed or not.
    #[must_use]
    pub fn outstanding_debt(
        campus_id: Option<Uuid>,
        invoices: Vec<DebtInvoice>,
        limit: usize,
    ) -> DebtReport {
        let mut by_student: BTreeMap<Uuid, Debtor> = BTreeMap::new();

        for invoice in invoices {
            if invoice.balance <= Decimal::ZERO {
                continue;
            }
            by_student
                .entry(invoice.student_id)
                .and_modify(|debtor| {
                    debtor.invoice_count += 1;
                    debtor.total_owed += invoice.balance;
                    if invoice.due_date < debtor.oldest_due_date {
                        debtor.oldest_due_date = invoice.due_date;
                    }
                })
                .or_insert_with(|| Debtor {
                    student_id: invoice.student_id,
                    student_code: invoice.student_code.clone(),
                    student_name: invoice.student_name.clone(),
                    grade: invoice.grade.clone(),
                    campus_id: invoice.campus_id,
                    invoice_count: 1,
                    total_owed: invoice.balance,
                    oldest_due_date: invoice.due_date,
                });
        }

        let total_debtors = by_student.len() as u64;
        let total_outstanding = by_student
            .values()
            .map(|d| d.total_owed)
            .sum::<Decimal>();

        let mut debtors: Vec<Debtor> = by_student.into_values().collect();
        debtors.sort_by(|a, b| b.total_owed.cmp(&a.total_owed));
        let truncated = debtors.len() > limit;
        debtors.truncate(limit);

        DebtReport {
            campus_id,
            total_debtors,
            total_outstanding,
            debtors,
            truncated,
        }
    }

    /// Builds the daily income series from a range of payments.
    ///
    /// Voided payments are dropped entirely; days with no takings do
    /// not appear.
    #[must_use]
    pub fn daily_income(payments: &[PaymentRecord]) -> Vec<DailyIncomeEntry> {
        let mut by_date: BTreeMap<NaiveDate, (u64, Decimal)> = BTreeMap::new();

        for payment in payments {
            if payment.is_voided {
                continue;
            }
            let entry = by_date
                .entry(payment.payment_date)
                .or_insert((0, Decimal::ZERO));
            entry.0 += 1;
            entry.1 += payment.amount;
        }

        by_date
            .into_iter()
            .map(|(date, (transaction_count, total))| DailyIncomeEntry {
                date,
                transaction_count,
                total,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn payment(amount: Decimal, method: &str, voided: bool) -> PaymentRecord {
        PaymentRecord {
            payment_id: Uuid::now_v7(),
            receipt_number: "RCT-test".to_string(),
            payment_date: day(2),
            amount,
            payment_method: method.to_string(),
            invoice_number: "INV-test".to_string(),
            student_code: "S-001".to_string(),
            student_name: "Ayu Lestari".to_string(),
            campus_id: Uuid::now_v7(),
            is_voided: voided,
        }
    }

    fn debt(student_id: Uuid, balance: Decimal, due: NaiveDate) -> DebtInvoice {
        DebtInvoice {
            student_id,
            student_code: "S-001".to_string(),
            student_name: "Ayu Lestari".to_string(),
            grade: Some("7".to_string()),
            campus_id: Uuid::now_v7(),
            balance,
            due_date: due,
        }
    }

    #[test]
    fn test_cashbox_excludes_voided_from_totals() {
        let payments = vec![
            payment(dec!(550), "cash", false),
            payment(dec!(200), "cash", true),
        ];
        let report = ReportService::daily_cashbox(day(2), None, payments);

        assert_eq!(report.grand_total, dec!(550));
        assert_eq!(report.voided_total, dec!(200));
        assert_eq!(report.transaction_count, 1);
        // Voided payment still listed for audit
        assert_eq!(report.transactions.len(), 2);
    }

    #[test]
    fn test_cashbox_method_subtotals() {
        let payments = vec![
            payment(dec!(100), "cash", false),
            payment(dec!(400), "transfer", false),
            payment(dec!(50), "cash", false),
        ];
        let report = ReportService::daily_cashbox(day(2), None, payments);

        assert_eq!(report.by_method.len(), 2);
        // Largest first
        assert_eq!(report.by_method[0].method, "transfer");
        assert_eq!(report.by_method[0].total, dec!(400));
        assert_eq!(report.by_method[1].method, "cash");
        assert_eq!(report.by_method[1].count, 2);
        assert_eq!(report.by_method[1].total, dec!(150));
        assert_eq!(report.grand_total, dec!(550));
    }

    #[test]
    fn test_cashbox_empty_day() {
        let report = ReportService::daily_cashbox(day(2), None, vec![]);
        assert_eq!(report.transaction_count, 0);
        assert_eq!(report.grand_total, dec!(0));
        assert!(report.by_method.is_empty());
    }

    #[test]
    fn test_debt_groups_by_student() {
        let student = Uuid::now_v7();
        let invoices = vec![
            debt(student, dec!(300), day(1)),
            debt(student, dec!(250), day(5)),
        ];
        let report = ReportService::outstanding_debt(None, invoices, 100);

        assert_eq!(report.total_debtors, 1);
        assert_eq!(report.total_outstanding, dec!(550));
        assert_eq!(report.debtors[0].invoice_count, 2);
        assert_eq!(report.debtors[0].oldest_due_date, day(1));
    }

    #[test]
    fn test_debt_ordered_and_capped() {
        let invoices = vec![
            debt(Uuid::now_v7(), dec!(100), day(1)),
            debt(Uuid::now_v7(), dec!(900), day(1)),
            debt(Uuid::now_v7(), dec!(500), day(1)),
        ];
        let report = ReportService::outstanding_debt(None, invoices, 2);

        assert_eq!(report.debtors.len(), 2);
        assert!(report.truncated);
        assert_eq!(report.debtors[0].total_owed, dec!(900));
        assert_eq!(report.debtors[1].total_owed, dec!(500));
        // Headline totals still cover the student cut from the listing
        assert_eq!(report.total_debtors, 3);
        assert_eq!(report.total_outstanding, dec!(1500));
    }

    #[test]
    fn test_debt_skips_settled_invoices() {
        let invoices = vec![debt(Uuid::now_v7(), dec!(0), day(1))];
        let report = ReportService::outstanding_debt(None, invoices, 100);
        assert_eq!(report.total_debtors, 0);
        assert!(!report.truncated);
    }

    #[test]
    fn test_daily_income_groups_by_date() {
        let mut early = payment(dec!(100), "cash", false);
        early.payment_date = day(1);
        let payments = vec![
            early,
            payment(dec!(200), "cash", false),
            payment(dec!(300), "transfer", false),
            payment(dec!(999), "cash", true),
        ];

        let series = ReportService::daily_income(&payments);

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].date, day(1));
        assert_eq!(series[0].total, dec!(100));
        assert_eq!(series[1].date, day(2));
        assert_eq!(series[1].transaction_count, 2);
        assert_eq!(series[1].total, dec!(500));
    }
}
