//! Payment repository.
//!
//! `record_payment` re-reads the invoice under `SELECT ... FOR UPDATE`
//! inside its transaction, so two tellers racing on the same invoice
//! serialize and the second sees the balance the first left behind.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use sala_core::ledger::{LedgerError, LedgerService};
use sala_core::numbering;

use crate::entities::{invoices, payments};

/// Input for recording a payment.
#[derive(Debug, Clone)]
pub struct RecordPaymentInput {
    /// The campus the payment belongs to.
    pub campus_id: Uuid,
    /// The invoice being paid.
    pub invoice_id: Uuid,
    /// The amount paid.
    pub amount: Decimal,
    /// How the payment was made (cash, transfer, ...).
    pub payment_method: String,
    /// External reference, e.g. a bank transfer id.
    pub reference_number: Option<String>,
    /// The date the payment was taken.
    pub payment_date: NaiveDate,
    /// The teller who took the payment.
    pub received_by: Uuid,
}

/// A recorded payment with the invoice state it produced.
#[derive(Debug, Clone)]
pub struct RecordedPayment {
    /// The new payment row.
    pub payment: payments::Model,
    /// The invoice after the payment was applied.
    pub invoice: invoices::Model,
}

/// Payment repository.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    db: DatabaseConnection,
}

impl PaymentRepository {
    /// Creates a new payment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a payment against an invoice.
    ///
    /// # Errors
    ///
    /// * `LedgerError::InvoiceNotFound` if the invoice does not exist
    /// * `LedgerError::CampusForbidden` if it belongs to another campus
    /// * `LedgerError::InvoiceNotOpen` if the invoice is paid or
    ///   cancelled
    /// * `LedgerError::NonPositivePayment` / `PaymentExceedsBalance`
    ///   if the amount fails validation against the locked row
    pub async fn record_payment(
        &self,
        input: RecordPaymentInput,
    ) -> Result<RecordedPayment, LedgerError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        // Row lock: the balance check and the write happen against the
        // same snapshot.
        let invoice = invoices::Entity::find_by_id(input.invoice_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(LedgerError::InvoiceNotFound(input.invoice_id))?;
        if invoice.campus_id != input.campus_id {
            return Err(LedgerError::CampusForbidden);
        }

        let status: sala_core::ledger::InvoiceStatus = invoice.status.clone().into();
        if !status.is_open() {
            return Err(LedgerError::InvoiceNotOpen(invoice.id));
        }

        let outcome =
            LedgerService::apply_payment(invoice.total_amount, invoice.paid_amount, input.amount)?;

        let now = Utc::now().into();
        let payment = payments::ActiveModel {
            id: Set(Uuid::now_v7()),
            campus_id: Set(input.campus_id),
            invoice_id: Set(invoice.id),
            receipt_number: Set(numbering::receipt_number()),
            amount: Set(input.amount),
            payment_method: Set(input.payment_method),
            reference_number: Set(input.reference_number),
            payment_date: Set(input.payment_date),
            is_voided: Set(false),
            void_reason: Set(None),
            voided_at: Set(None),
            voided_by: Set(None),
            received_by: Set(input.received_by),
            created_at: Set(now),
        };
        let payment = payment.insert(&txn).await.map_err(db_err)?;

        let mut invoice: invoices::ActiveModel = invoice.into();
        invoice.paid_amount = Set(outcome.paid_amount);
        invoice.status = Set(outcome.status.into());
        invoice.updated_at = Set(now);
        let invoice = invoice.update(&txn).await.map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        Ok(RecordedPayment { payment, invoice })
    }

    /// Finds a payment, verifying campus ownership.
    ///
    /// # Errors
    ///
    /// * `LedgerError::PaymentNotFound` if the payment does not exist
    /// * `LedgerError::CampusForbidden` if it belongs to another campus
    pub async fn find(
        &self,
        campus_id: Uuid,
        payment_id: Uuid,
    ) -> Result<payments::Model, LedgerError> {
        let payment = payments::Entity::find_by_id(payment_id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(LedgerError::PaymentNotFound(payment_id))?;
        if payment.campus_id != campus_id {
            return Err(LedgerError::CampusForbidden);
        }
        Ok(payment)
    }

    /// Lists payments for an invoice, oldest first.
    ///
    /// # Errors
    ///
    /// * `LedgerError::InvoiceNotFound` if the invoice does not exist
    /// * `LedgerError::CampusForbidden` if it belongs to another campus
    pub async fn list_by_invoice(
        &self,
        campus_id: Uuid,
        invoice_id: Uuid,
    ) -> Result<Vec<payments::Model>, LedgerError> {
        let invoice = invoices::Entity::find_by_id(invoice_id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(LedgerError::InvoiceNotFound(invoice_id))?;
        if invoice.campus_id != campus_id {
            return Err(LedgerError::CampusForbidden);
        }

        payments::Entity::find()
            .filter(payments::Column::InvoiceId.eq(invoice.id))
            .order_by_asc(payments::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)
    }
}

fn db_err(err: DbErr) -> LedgerError {
    LedgerError::Database(err.to_string())
}
