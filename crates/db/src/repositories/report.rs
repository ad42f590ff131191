//! Report repository.
//!
//! Fetches the rows a report needs, joins them in memory, and hands
//! them to `ReportService` for aggregation. Reports are read-only and
//! never lock anything.

use std::collections::HashMap;

use chrono::NaiveDate;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
};
use uuid::Uuid;

use sala_core::reports::{
    CashboxReport, DailyIncomeEntry, DebtInvoice, DebtReport, EnrollmentCount, PaymentRecord,
    ReportService,
};

use crate::entities::{
    invoices, payments, students, sea_orm_active_enums::InvoiceStatus as DbInvoiceStatus,
};

/// Error types for report operations.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Invalid date range.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl ReportError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidDateRange { .. } => 400,
            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

/// Report repository for ledger report queries.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: DatabaseConnection,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Builds the daily cashbox report for one day.
    ///
    /// `campus_id = None` covers every campus the caller may see; the
    /// API layer only passes `None` for users granted all campuses.
    pub async fn daily_cashbox(
        &self,
        campus_id: Option<Uuid>,
        report_date: NaiveDate,
    ) -> Result<CashboxReport, ReportError> {
        let records = self
            .payment_records(campus_id, report_date, report_date)
            .await?;
        Ok(ReportService::daily_cashbox(report_date, campus_id, records))
    }

    /// Builds the outstanding debt report, optionally narrowed to one
    /// grade.
    pub async fn outstanding_debt(
        &self,
        campus_id: Option<Uuid>,
        grade: Option<String>,
        debtor_limit: usize,
    ) -> Result<DebtReport, ReportError> {
        let mut condition = Condition::all().add(
            invoices::Column::Status.is_in([DbInvoiceStatus::Unpaid, DbInvoiceStatus::Partial]),
        );
        if let Some(campus_id) = campus_id {
            condition = condition.add(invoices::Column::CampusId.eq(campus_id));
        }

        let open_invoices = invoices::Entity::find()
            .filter(condition)
            .all(&self.db)
            .await?;

        let student_index = self
            .student_index(open_invoices.iter().map(|i| i.student_id))
            .await?;

        let rows = open_invoices
            .into_iter()
            .filter_map(|invoice| {
                let student = student_index.get(&invoice.student_id)?;
                if let Some(grade) = &grade {
                    if student.grade.as_deref() != Some(grade.as_str()) {
                        return None;
                    }
                }
                Some(DebtInvoice {
                    student_id: invoice.student_id,
                    student_code: student.student_code.clone(),
                    student_name: student.full_name.clone(),
                    grade: student.grade.clone(),
                    campus_id: invoice.campus_id,
                    balance: invoice.balance(),
                    due_date: invoice.due_date,
                })
            })
            .collect();

        Ok(ReportService::outstanding_debt(campus_id, rows, debtor_limit))
    }

    /// Builds the daily income series over a date range.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidDateRange` if `from > to`.
    pub async fn daily_income(
        &self,
        campus_id: Option<Uuid>,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyIncomeEntry>, ReportError> {
        if from > to {
            return Err(ReportError::InvalidDateRange { start: from, end: to });
        }

        let records = self.payment_records(campus_id, from, to).await?;
        Ok(ReportService::daily_income(&records))
    }

    /// Counts active students per campus and grade.
    pub async fn enrollment_stats(
        &self,
        campus_id: Option<Uuid>,
    ) -> Result<Vec<EnrollmentCount>, ReportError> {
        let mut query = students::Entity::find().filter(students::Column::IsActive.eq(true));
        if let Some(campus_id) = campus_id {
            query = query.filter(students::Column::CampusId.eq(campus_id));
        }
        let rows = query.all(&self.db).await?;

        let mut counts: HashMap<(Uuid, Option<String>), u64> = HashMap::new();
        for student in rows {
            *counts.entry((student.campus_id, student.grade)).or_insert(0) += 1;
        }

        let mut stats: Vec<EnrollmentCount> = counts
            .into_iter()
            .map(|((campus_id, grade), student_count)| EnrollmentCount {
                campus_id,
                grade,
                student_count,
            })
            .collect();
        stats.sort_by(|a, b| (a.campus_id, &a.grade).cmp(&(b.campus_id, &b.grade)));

        Ok(stats)
    }

    /// Fetches payments in a date range joined with their invoice and
    /// student, as report input rows.
    async fn payment_records(
        &self,
        campus_id: Option<Uuid>,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PaymentRecord>, ReportError> {
        let mut query = payments::Entity::find()
            .filter(payments::Column::PaymentDate.gte(from))
            .filter(payments::Column::PaymentDate.lte(to));
        if let Some(campus_id) = campus_id {
            query = query.filter(payments::Column::CampusId.eq(campus_id));
        }
        let payment_rows = query.all(&self.db).await?;

        let invoice_ids: Vec<Uuid> = payment_rows.iter().map(|p| p.invoice_id).collect();
        let invoice_rows = invoices::Entity::find()
            .filter(invoices::Column::Id.is_in(invoice_ids))
            .all(&self.db)
            .await?;
        let student_index = self
            .student_index(invoice_rows.iter().map(|i| i.student_id))
            .await?;
        let invoice_index: HashMap<Uuid, invoices::Model> =
            invoice_rows.into_iter().map(|i| (i.id, i)).collect();

        let records = payment_rows
            .into_iter()
            .filter_map(|payment| {
                let invoice = invoice_index.get(&payment.invoice_id)?;
                let student = student_index.get(&invoice.student_id)?;
                Some(PaymentRecord {
                    payment_id: payment.id,
                    receipt_number: payment.receipt_number,
                    payment_date: payment.payment_date,
                    amount: payment.amount,
                    payment_method: payment.payment_method,
                    invoice_number: invoice.invoice_number.clone(),
                    student_code: student.student_code.clone(),
                    student_name: student.full_name.clone(),
                    campus_id: payment.campus_id,
                    is_voided: payment.is_voided,
                })
            })
            .collect();

        Ok(records)
    }

    async fn student_index(
        &self,
        student_ids: impl Iterator<Item = Uuid>,
    ) -> Result<HashMap<Uuid, students::Model>, ReportError> {
        let ids: Vec<Uuid> = student_ids.collect();
        let rows = students::Entity::find()
            .filter(students::Column::Id.is_in(ids))
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(|s| (s.id, s)).collect())
    }
}
