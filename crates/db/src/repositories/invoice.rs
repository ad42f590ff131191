//! Invoice repository.
//!
//! Invoice creation writes the header and its line items in one
//! database transaction; the total is always the sum of the items the
//! ledger service validated.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use sala_core::ledger::{InvoiceItemInput, LedgerError, LedgerService};
use sala_core::numbering;

use crate::entities::{
    invoice_items, invoices, payments, students, sea_orm_active_enums::InvoiceStatus,
};

/// Input for creating an invoice.
#[derive(Debug, Clone)]
pub struct CreateInvoiceInput {
    /// The campus the invoice belongs to.
    pub campus_id: Uuid,
    /// The billed student.
    pub student_id: Uuid,
    /// Line items; must be non-empty with positive amounts.
    pub items: Vec<InvoiceItemInput>,
    /// The date the invoice is issued.
    pub issue_date: NaiveDate,
    /// The date the invoice falls due.
    pub due_date: NaiveDate,
    /// The user creating the invoice.
    pub created_by: Uuid,
}

/// Filter options for listing invoices.
#[derive(Debug, Clone, Default)]
pub struct InvoiceFilter {
    /// Filter by status.
    pub status: Option<InvoiceStatus>,
    /// Filter by student.
    pub student_id: Option<Uuid>,
    /// Only invoices due on or before this date.
    pub due_before: Option<NaiveDate>,
}

/// An invoice with its line items and payments.
#[derive(Debug, Clone)]
pub struct InvoiceDetail {
    /// Invoice header.
    pub invoice: invoices::Model,
    /// Line items.
    pub items: Vec<invoice_items::Model>,
    /// Payments recorded against the invoice, voided ones included.
    pub payments: Vec<payments::Model>,
}

/// Invoice repository.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    db: DatabaseConnection,
}

impl InvoiceRepository {
    /// Creates a new invoice repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an invoice with its line items.
    ///
    /// # Errors
    ///
    /// * `LedgerError::EmptyInvoice` / `InvalidItemAmount` /
    ///   `BlankItemDescription` if the items fail validation
    /// * `LedgerError::StudentNotFound` if the student does not exist
    ///   or is deactivated
    /// * `LedgerError::CampusForbidden` if the student belongs to
    ///   another campus
    pub async fn create_invoice(
        &self,
        input: CreateInvoiceInput,
    ) -> Result<InvoiceDetail, LedgerError> {
        let total = LedgerService::validate_items(&input.items)?;

        // Fetch by id first so a cross-campus probe is denied, not
        // reported as missing.
        let student = students::Entity::find_by_id(input.student_id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(LedgerError::StudentNotFound(input.student_id))?;
        if student.campus_id != input.campus_id {
            return Err(LedgerError::CampusForbidden);
        }
        if !student.is_active {
            return Err(LedgerError::StudentNotFound(input.student_id));
        }

        let txn = self.db.begin().await.map_err(db_err)?;

        let invoice = self.insert_invoice(&txn, &input, total).await?;
        let items = Self::insert_items(&txn, invoice.id, &input.items).await?;

        txn.commit().await.map_err(db_err)?;

        Ok(InvoiceDetail {
            invoice,
            items,
            payments: Vec::new(),
        })
    }

    async fn insert_invoice(
        &self,
        txn: &DatabaseTransaction,
        input: &CreateInvoiceInput,
        total: rust_decimal::Decimal,
    ) -> Result<invoices::Model, LedgerError> {
        let now = Utc::now().into();
        let invoice = invoices::ActiveModel {
            id: Set(Uuid::now_v7()),
            campus_id: Set(input.campus_id),
            student_id: Set(input.student_id),
            invoice_number: Set(numbering::invoice_number()),
            status: Set(InvoiceStatus::Unpaid),
            total_amount: Set(total),
            paid_amount: Set(rust_decimal::Decimal::ZERO),
            issue_date: Set(input.issue_date),
            due_date: Set(input.due_date),
            created_by: Set(input.created_by),
            created_at: Set(now),
            updated_at: Set(now),
        };
        invoice.insert(txn).await.map_err(db_err)
    }

    async fn insert_items(
        txn: &DatabaseTransaction,
        invoice_id: Uuid,
        items: &[InvoiceItemInput],
    ) -> Result<Vec<invoice_items::Model>, LedgerError> {
        let now = Utc::now().into();
        let mut result = Vec::with_capacity(items.len());
        for item in items {
            let row = invoice_items::ActiveModel {
                id: Set(Uuid::now_v7()),
                invoice_id: Set(invoice_id),
                description: Set(item.description.clone()),
                amount: Set(item.amount),
                created_at: Set(now),
            };
            result.push(row.insert(txn).await.map_err(db_err)?);
        }
        Ok(result)
    }

    /// Fetches an invoice with its items and payments.
    ///
    /// # Errors
    ///
    /// * `LedgerError::InvoiceNotFound` if the invoice does not exist
    /// * `LedgerError::CampusForbidden` if it belongs to another campus
    pub async fn get_invoice(
        &self,
        campus_id: Uuid,
        invoice_id: Uuid,
    ) -> Result<InvoiceDetail, LedgerError> {
        let invoice = invoices::Entity::find_by_id(invoice_id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(LedgerError::InvoiceNotFound(invoice_id))?;
        if invoice.campus_id != campus_id {
            return Err(LedgerError::CampusForbidden);
        }

        let items = invoice_items::Entity::find()
            .filter(invoice_items::Column::InvoiceId.eq(invoice.id))
            .order_by_asc(invoice_items::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let invoice_payments = payments::Entity::find()
            .filter(payments::Column::InvoiceId.eq(invoice.id))
            .order_by_asc(payments::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(InvoiceDetail {
            invoice,
            items,
            payments: invoice_payments,
        })
    }

    /// Lists a student's invoices, newest first.
    ///
    /// # Errors
    ///
    /// * `LedgerError::StudentNotFound` if the student does not exist
    /// * `LedgerError::CampusForbidden` if the student belongs to
    ///   another campus
    pub async fn list_student_invoices(
        &self,
        campus_id: Uuid,
        student_id: Uuid,
        status: Option<InvoiceStatus>,
    ) -> Result<Vec<invoices::Model>, LedgerError> {
        let student = students::Entity::find_by_id(student_id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(LedgerError::StudentNotFound(student_id))?;
        if student.campus_id != campus_id {
            return Err(LedgerError::CampusForbidden);
        }

        let mut query = invoices::Entity::find()
            .filter(invoices::Column::CampusId.eq(campus_id))
            .filter(invoices::Column::StudentId.eq(student_id))
            .order_by_desc(invoices::Column::IssueDate)
            .order_by_desc(invoices::Column::CreatedAt);

        if let Some(status) = status {
            query = query.filter(invoices::Column::Status.eq(status));
        }

        query.all(&self.db).await.map_err(db_err)
    }

    /// Lists invoices in a campus.
    pub async fn list(
        &self,
        campus_id: Uuid,
        filter: InvoiceFilter,
    ) -> Result<Vec<invoices::Model>, LedgerError> {
        let mut query = invoices::Entity::find()
            .filter(invoices::Column::CampusId.eq(campus_id))
            .order_by_desc(invoices::Column::IssueDate)
            .order_by_desc(invoices::Column::CreatedAt);

        if let Some(status) = filter.status {
            query = query.filter(invoices::Column::Status.eq(status));
        }
        if let Some(student_id) = filter.student_id {
            query = query.filter(invoices::Column::StudentId.eq(student_id));
        }
        if let Some(due_before) = filter.due_before {
            query = query.filter(invoices::Column::DueDate.lte(due_before));
        }

        query.all(&self.db).await.map_err(db_err)
    }
}

fn db_err(err: DbErr) -> LedgerError {
    LedgerError::Database(err.to_string())
}
