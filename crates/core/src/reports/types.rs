//! Report input rows and output shapes.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A payment row as fed to the report services.
///
/// One row per recorded payment, joined with its invoice and student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// The payment's id.
    pub payment_id: Uuid,
    /// The payment's receipt number.
    pub receipt_number: String,
    /// The date the payment was taken.
    pub payment_date: NaiveDate,
    /// The amount paid.
    pub amount: Decimal,
    /// How the payment was made (cash, transfer, ...).
    pub payment_method: String,
    /// The invoice the payment settled against.
    pub invoice_number: String,
    /// The paying student's code.
    pub student_code: String,
    /// The paying student's name.
    pub student_name: String,
    /// The campus the payment belongs to.
    pub campus_id: Uuid,
    /// Whether the payment has been voided.
    pub is_voided: bool,
}

/// Per-method subtotal in the cashbox report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodTotal {
    /// The payment method.
    pub method: String,
    /// Number of non-voided payments taken with this method.
    pub count: u64,
    /// Sum of non-voided payment amounts for this method.
    pub total: Decimal,
}

/// Daily cashbox report: one day's takings for a campus (or all).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashboxReport {
    /// The day the report covers.
    pub report_date: NaiveDate,
    /// The campus filter, if any.
    pub campus_id: Option<Uuid>,
    /// Number of non-voided payments.
    pub transaction_count: u64,
    /// Subtotals per payment method, largest first.
    pub by_method: Vec<MethodTotal>,
    /// Sum of all non-voided payments.
    pub grand_total: Decimal,
    /// Sum of voided payments, reported separately for audit.
    pub voided_total: Decimal,
    /// Every payment taken that day, voided ones included.
    pub transactions: Vec<PaymentRecord>,
}

/// An open invoice row as fed to the debt report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebtInvoice {
    /// The owing student's id.
    pub student_id: Uuid,
    /// The owing student's code.
    pub student_code: String,
    /// The owing student's name.
    pub student_name: String,
    /// The student's grade, if recorded.
    pub grade: Option<String>,
    /// The campus the invoice belongs to.
    pub campus_id: Uuid,
    /// The invoice's remaining balance.
    pub balance: Decimal,
    /// When the invoice was due.
    pub due_date: NaiveDate,
}

/// One student's aggregated debt position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Debtor {
    /// The student's id.
    pub student_id: Uuid,
    /// The student's code.
    pub student_code: String,
    /// The student's name.
    pub student_name: String,
    /// The student's grade, if recorded.
    pub grade: Option<String>,
    /// The campus the student belongs to.
    pub campus_id: Uuid,
    /// Number of open invoices.
    pub invoice_count: u64,
    /// Total owed across open invoices.
    pub total_owed: Decimal,
    /// The earliest due date among the open invoices.
    pub oldest_due_date: NaiveDate,
}

/// Outstanding debt report for a campus (or all).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebtReport {
    /// The campus filter, if any.
    pub campus_id: Option<Uuid>,
    /// Total number of students with open balances.
    pub total_debtors: u64,
    /// Total outstanding across all debtors, listed or not.
    pub total_outstanding: Decimal,
    /// Debtors ordered by amount owed, capped at the configured limit.
    pub debtors: Vec<Debtor>,
    /// True when the debtor list was cut off at the limit.
    pub truncated: bool,
}

/// One day's income in the daily income series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyIncomeEntry {
    /// The day.
    pub date: NaiveDate,
    /// Number of non-voided payments taken that day.
    pub transaction_count: u64,
    /// Sum of non-voided payments taken that day.
    pub total: Decimal,
}

/// Enrollment count for one campus/grade bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentCount {
    /// The campus.
    pub campus_id: Uuid,
    /// The grade, if recorded.
    pub grade: Option<String>,
    /// Number of active students in the bucket.
    pub student_count: u64,
}
