//! Void request repository.
//!
//! Approval reverses the payment on the invoice and flags the payment
//! voided, all in one database transaction with the invoice row locked.
//! The `uq_void_requests_pending` index backs up the single-pending
//! check against racing requesters.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use sala_core::ledger::LedgerService;
use sala_core::void::{VoidAction, VoidError, VoidRequestStatus, VoidWorkflow};

use crate::entities::{
    invoices, payments, void_requests,
    sea_orm_active_enums::VoidRequestStatus as DbVoidStatus,
};

/// A pending void request joined with the payment it targets.
#[derive(Debug, Clone)]
pub struct PendingVoidRequest {
    /// The request row.
    pub request: void_requests::Model,
    /// The payment to be voided.
    pub payment: payments::Model,
}

/// Void request repository.
#[derive(Debug, Clone)]
pub struct VoidRepository {
    db: DatabaseConnection,
}

impl VoidRepository {
    /// Creates a new void repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Opens a void request against a payment.
    ///
    /// # Errors
    ///
    /// * `VoidError::PaymentNotFound` if the payment does not exist
    /// * `VoidError::CampusForbidden` if it belongs to another campus
    /// * `VoidError::AlreadyVoided` if the payment is already voided
    /// * `VoidError::RequestAlreadyPending` if a pending request exists
    /// * `VoidError::ReasonRequired` if the reason is blank
    pub async fn request_void(
        &self,
        campus_id: Uuid,
        payment_id: Uuid,
        requested_by: Uuid,
        reason: String,
    ) -> Result<void_requests::Model, VoidError> {
        let payment = payments::Entity::find_by_id(payment_id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(VoidError::PaymentNotFound(payment_id))?;
        if payment.campus_id != campus_id {
            return Err(VoidError::CampusForbidden);
        }

        let pending_exists = void_requests::Entity::find()
            .filter(void_requests::Column::PaymentId.eq(payment_id))
            .filter(void_requests::Column::Status.eq(DbVoidStatus::Pending))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .is_some();

        let action = VoidWorkflow::request(
            payment_id,
            payment.is_voided,
            pending_exists,
            requested_by,
            reason,
        )?;

        let VoidAction::Request {
            new_status,
            requested_by,
            requested_at,
            reason,
        } = action
        else {
            return Err(VoidError::Database("unexpected workflow action".into()));
        };

        let now = Utc::now().into();
        let request = void_requests::ActiveModel {
            id: Set(Uuid::now_v7()),
            campus_id: Set(campus_id),
            payment_id: Set(payment_id),
            status: Set(new_status.into()),
            reason: Set(reason),
            requested_by: Set(requested_by),
            requested_at: Set(requested_at.into()),
            resolved_by: Set(None),
            resolved_at: Set(None),
            rejection_reason: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        request.insert(&self.db).await.map_err(|err| {
            // Lost the race to the partial unique index
            if err.to_string().contains("uq_void_requests_pending") {
                VoidError::RequestAlreadyPending(payment_id)
            } else {
                db_err(err)
            }
        })
    }

    /// Approves a pending void request.
    ///
    /// Marks the payment voided, restores the invoice balance, and
    /// resolves the request, all in one transaction.
    ///
    /// # Errors
    ///
    /// * `VoidError::RequestNotFound` if the request does not exist
    /// * `VoidError::CampusForbidden` if it belongs to another campus
    /// * `VoidError::NotPending` if the request is already resolved
    pub async fn approve_void(
        &self,
        campus_id: Uuid,
        request_id: Uuid,
        resolved_by: Uuid,
    ) -> Result<void_requests::Model, VoidError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let request = void_requests::Entity::find_by_id(request_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(VoidError::RequestNotFound(request_id))?;
        if request.campus_id != campus_id {
            return Err(VoidError::CampusForbidden);
        }

        let current: VoidRequestStatus = request.status.clone().into();
        let action = VoidWorkflow::approve(current, resolved_by)?;

        let payment = payments::Entity::find_by_id(request.payment_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(VoidError::PaymentNotFound(request.payment_id))?;

        // The pending-request guard should make this unreachable, but a
        // voided payment must never be reversed twice.
        if payment.is_voided {
            return Err(VoidError::AlreadyVoided(payment.id));
        }

        let invoice = invoices::Entity::find_by_id(payment.invoice_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or_else(|| {
                VoidError::Database(format!("invoice {} missing for payment", payment.invoice_id))
            })?;

        let outcome =
            LedgerService::reverse_payment(invoice.total_amount, invoice.paid_amount, payment.amount)
                .map_err(|err| VoidError::Database(err.to_string()))?;

        let VoidAction::Approve {
            new_status,
            resolved_by,
            resolved_at,
        } = action
        else {
            return Err(VoidError::Database("unexpected workflow action".into()));
        };

        let now = Utc::now().into();
        let void_reason = request.reason.clone();

        let mut payment: payments::ActiveModel = payment.into();
        payment.is_voided = Set(true);
        payment.void_reason = Set(Some(void_reason));
        payment.voided_at = Set(Some(resolved_at.into()));
        payment.voided_by = Set(Some(resolved_by));
        payment.update(&txn).await.map_err(db_err)?;

        let mut invoice: invoices::ActiveModel = invoice.into();
        invoice.paid_amount = Set(outcome.paid_amount);
        invoice.status = Set(outcome.status.into());
        invoice.updated_at = Set(now);
        invoice.update(&txn).await.map_err(db_err)?;

        let mut request: void_requests::ActiveModel = request.into();
        request.status = Set(new_status.into());
        request.resolved_by = Set(Some(resolved_by));
        request.resolved_at = Set(Some(resolved_at.into()));
        request.updated_at = Set(now);
        let request = request.update(&txn).await.map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        Ok(request)
    }

    /// Rejects a pending void request. The payment stands untouched.
    ///
    /// # Errors
    ///
    /// * `VoidError::RequestNotFound` if the request does not exist
    /// * `VoidError::CampusForbidden` if it belongs to another campus
    /// * `VoidError::NotPending` if the request is already resolved
    /// * `VoidError::RejectionReasonRequired` if the reason is blank
    pub async fn reject_void(
        &self,
        campus_id: Uuid,
        request_id: Uuid,
        resolved_by: Uuid,
        rejection_reason: String,
    ) -> Result<void_requests::Model, VoidError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let request = void_requests::Entity::find_by_id(request_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(VoidError::RequestNotFound(request_id))?;
        if request.campus_id != campus_id {
            return Err(VoidError::CampusForbidden);
        }

        let current: VoidRequestStatus = request.status.clone().into();
        let action = VoidWorkflow::reject(current, resolved_by, rejection_reason)?;

        let VoidAction::Reject {
            new_status,
            resolved_by,
            resolved_at,
            rejection_reason,
        } = action
        else {
            return Err(VoidError::Database("unexpected workflow action".into()));
        };

        let mut request: void_requests::ActiveModel = request.into();
        request.status = Set(new_status.into());
        request.resolved_by = Set(Some(resolved_by));
        request.resolved_at = Set(Some(resolved_at.into()));
        request.rejection_reason = Set(Some(rejection_reason));
        request.updated_at = Set(Utc::now().into());
        let request = request.update(&txn).await.map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        Ok(request)
    }

    /// Lists pending void requests for a campus, oldest first.
    pub async fn list_pending(&self, campus_id: Uuid) -> Result<Vec<PendingVoidRequest>, VoidError> {
        let rows = void_requests::Entity::find()
            .filter(void_requests::Column::CampusId.eq(campus_id))
            .filter(void_requests::Column::Status.eq(DbVoidStatus::Pending))
            .order_by_asc(void_requests::Column::RequestedAt)
            .find_also_related(payments::Entity)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        rows.into_iter()
            .map(|(request, payment)| {
                let payment_id = request.payment_id;
                payment
                    .map(|payment| PendingVoidRequest { request, payment })
                    .ok_or(VoidError::PaymentNotFound(payment_id))
            })
            .collect()
    }
}

fn db_err(err: DbErr) -> VoidError {
    VoidError::Database(err.to_string())
}
