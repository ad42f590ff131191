//! Payment routes.
//!
//! Payments are append-only: there is no update or delete. Reversal
//! goes through the void request workflow.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::middleware::auth::app_error_response;
use crate::routes::invoices::ledger_error_response;
use crate::{AppState, middleware::AuthContext};
use sala_db::repositories::{PaymentRepository, RecordPaymentInput};

/// Creates the payment routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/payments", post(record_payment))
        .route("/payments/{payment_id}", get(get_payment))
        .route("/invoices/{invoice_id}/payments", get(list_invoice_payments))
}

/// Request body for recording a payment.
#[derive(Debug, Deserialize)]
pub struct RecordPaymentRequest {
    /// The invoice being paid.
    pub invoice_id: Uuid,
    /// The amount paid (positive, at most the open balance).
    pub amount: Decimal,
    /// How the payment was made (cash, transfer, ...).
    pub payment_method: String,
    /// External reference, e.g. a bank transfer id.
    pub reference_number: Option<String>,
    /// The date the payment was taken.
    pub payment_date: NaiveDate,
}

/// POST /payments - Record a payment against an invoice (write access).
async fn record_payment(
    State(state): State<AppState>,
    ctx: AuthContext,
    Json(payload): Json<RecordPaymentRequest>,
) -> impl IntoResponse {
    let campus_id = match ctx.campus() {
        Ok(campus_id) => campus_id,
        Err(response) => return response,
    };
    if let Err(err) = ctx.0.require_write(campus_id) {
        return app_error_response(&err);
    }

    if payload.payment_method.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_error",
                "message": "payment_method is required"
            })),
        )
            .into_response();
    }

    let repo = PaymentRepository::new((*state.db).clone());
    let input = RecordPaymentInput {
        campus_id,
        invoice_id: payload.invoice_id,
        amount: payload.amount,
        payment_method: payload.payment_method,
        reference_number: payload.reference_number,
        payment_date: payload.payment_date,
        received_by: ctx.0.user_id(),
    };

    match repo.record_payment(input).await {
        Ok(recorded) => {
            info!(
                payment_id = %recorded.payment.id,
                invoice_id = %recorded.invoice.id,
                amount = %recorded.payment.amount,
                "Payment recorded"
            );
            (
                StatusCode::CREATED,
                Json(json!({
                    "payment": recorded.payment,
                    "invoice": {
                        "id": recorded.invoice.id,
                        "status": recorded.invoice.status,
                        "total_amount": recorded.invoice.total_amount,
                        "paid_amount": recorded.invoice.paid_amount,
                        "balance": recorded.invoice.balance(),
                    }
                })),
            )
                .into_response()
        }
        Err(e) => ledger_error_response(&e),
    }
}

/// GET /payments/{payment_id} - Fetch one payment.
async fn get_payment(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(payment_id): Path<Uuid>,
) -> impl IntoResponse {
    let campus_id = match ctx.campus() {
        Ok(campus_id) => campus_id,
        Err(response) => return response,
    };

    let repo = PaymentRepository::new((*state.db).clone());
    match repo.find(campus_id, payment_id).await {
        Ok(payment) => Json(json!({ "payment": payment })).into_response(),
        Err(e) => ledger_error_response(&e),
    }
}

/// GET /invoices/{invoice_id}/payments - Payment history, voided included.
async fn list_invoice_payments(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(invoice_id): Path<Uuid>,
) -> impl IntoResponse {
    let campus_id = match ctx.campus() {
        Ok(campus_id) => campus_id,
        Err(response) => return response,
    };

    let repo = PaymentRepository::new((*state.db).clone());
    match repo.list_by_invoice(campus_id, invoice_id).await {
        Ok(payments) => Json(json!({ "payments": payments })).into_response(),
        Err(e) => ledger_error_response(&e),
    }
}
