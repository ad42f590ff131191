//! Financial report aggregation.
//!
//! Reports are computed from ledger rows handed in by the repository
//! layer; nothing here touches the database. Voided payments never
//! count toward any money total, though the cashbox report still lists
//! them for audit.

pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use service::ReportService;
pub use types::{
    CashboxReport, DailyIncomeEntry, DebtInvoice, DebtReport, Debtor, EnrollmentCount,
    MethodTotal, PaymentRecord,
};
