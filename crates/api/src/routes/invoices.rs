//! Invoice routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::middleware::auth::app_error_response;
use crate::{AppState, middleware::AuthContext};
use sala_core::ledger::{InvoiceItemInput, InvoiceStatus, LedgerError};
use sala_db::repositories::{CreateInvoiceInput, InvoiceDetail, InvoiceFilter, InvoiceRepository};

/// Creates the invoice routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/invoices", get(list_invoices))
        .route("/invoices", post(create_invoice))
        .route("/invoices/{invoice_id}", get(get_invoice))
        .route("/students/{student_id}/invoices", get(list_student_invoices))
}

/// Query parameters for listing invoices.
#[derive(Debug, Deserialize)]
pub struct ListInvoicesQuery {
    /// Filter by status (unpaid, partial, paid, cancelled).
    pub status: Option<String>,
    /// Filter by student.
    pub student_id: Option<Uuid>,
    /// Only invoices due on or before this date (YYYY-MM-DD).
    pub due_before: Option<NaiveDate>,
}

/// Request body for a single invoice line item.
#[derive(Debug, Deserialize)]
pub struct InvoiceItemRequest {
    /// What the line charges for.
    pub description: String,
    /// The charged amount (positive).
    pub amount: rust_decimal::Decimal,
}

/// Request body for issuing an invoice.
#[derive(Debug, Deserialize)]
pub struct CreateInvoiceRequest {
    /// The billed student.
    pub student_id: Uuid,
    /// Line items; at least one is required.
    pub items: Vec<InvoiceItemRequest>,
    /// The date the invoice is issued.
    pub issue_date: NaiveDate,
    /// The date the invoice falls due.
    pub due_date: NaiveDate,
}

/// GET /invoices - List invoices in the selected campus.
async fn list_invoices(
    State(state): State<AppState>,
    ctx: AuthContext,
    Query(query): Query<ListInvoicesQuery>,
) -> impl IntoResponse {
    let campus_id = match ctx.campus() {
        Ok(campus_id) => campus_id,
        Err(response) => return response,
    };

    let status = match query.status.as_deref() {
        None => None,
        Some(s) => match InvoiceStatus::parse(s) {
            Some(status) => Some(status.into()),
            None => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "invalid_status",
                        "message": "Status must be one of unpaid, partial, paid, cancelled"
                    })),
                )
                    .into_response();
            }
        },
    };

    let repo = InvoiceRepository::new((*state.db).clone());
    let filter = InvoiceFilter {
        status,
        student_id: query.student_id,
        due_before: query.due_before,
    };

    match repo.list(campus_id, filter).await {
        Ok(invoices) => {
            let items: Vec<_> = invoices.iter().map(invoice_summary).collect();
            Json(json!({ "invoices": items })).into_response()
        }
        Err(e) => ledger_error_response(&e),
    }
}

/// POST /invoices - Issue an invoice to a student (write access).
async fn create_invoice(
    State(state): State<AppState>,
    ctx: AuthContext,
    Json(payload): Json<CreateInvoiceRequest>,
) -> impl IntoResponse {
    let campus_id = match ctx.campus() {
        Ok(campus_id) => campus_id,
        Err(response) => return response,
    };
    if let Err(err) = ctx.0.require_write(campus_id) {
        return app_error_response(&err);
    }

    let repo = InvoiceRepository::new((*state.db).clone());
    let input = CreateInvoiceInput {
        campus_id,
        student_id: payload.student_id,
        items: payload
            .items
            .into_iter()
            .map(|item| InvoiceItemInput {
                description: item.description,
                amount: item.amount,
            })
            .collect(),
        issue_date: payload.issue_date,
        due_date: payload.due_date,
        created_by: ctx.0.user_id(),
    };

    match repo.create_invoice(input).await {
        Ok(detail) => {
            info!(
                invoice_id = %detail.invoice.id,
                campus_id = %campus_id,
                total = %detail.invoice.total_amount,
                "Invoice issued"
            );
            (StatusCode::CREATED, Json(invoice_detail_body(&detail))).into_response()
        }
        Err(e) => ledger_error_response(&e),
    }
}

/// GET /invoices/{invoice_id} - Fetch an invoice with items and payments.
async fn get_invoice(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(invoice_id): Path<Uuid>,
) -> impl IntoResponse {
    let campus_id = match ctx.campus() {
        Ok(campus_id) => campus_id,
        Err(response) => return response,
    };

    let repo = InvoiceRepository::new((*state.db).clone());
    match repo.get_invoice(campus_id, invoice_id).await {
        Ok(detail) => Json(invoice_detail_body(&detail)).into_response(),
        Err(e) => ledger_error_response(&e),
    }
}

/// GET /students/{student_id}/invoices - List a student's invoices.
async fn list_student_invoices(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(student_id): Path<Uuid>,
    Query(query): Query<ListInvoicesQuery>,
) -> impl IntoResponse {
    let campus_id = match ctx.campus() {
        Ok(campus_id) => campus_id,
        Err(response) => return response,
    };

    let status = match query.status.as_deref() {
        None => None,
        Some(s) => match InvoiceStatus::parse(s) {
            Some(status) => Some(status.into()),
            None => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "invalid_status",
                        "message": "Status must be one of unpaid, partial, paid, cancelled"
                    })),
                )
                    .into_response();
            }
        },
    };

    let repo = InvoiceRepository::new((*state.db).clone());
    match repo.list_student_invoices(campus_id, student_id, status).await {
        Ok(invoices) => {
            let items: Vec<_> = invoices.iter().map(invoice_summary).collect();
            Json(json!({ "invoices": items })).into_response()
        }
        Err(e) => ledger_error_response(&e),
    }
}

/// Invoice summary body used in list responses.
fn invoice_summary(invoice: &sala_db::entities::invoices::Model) -> serde_json::Value {
    json!({
        "id": invoice.id,
        "invoice_number": invoice.invoice_number,
        "student_id": invoice.student_id,
        "status": invoice.status,
        "total_amount": invoice.total_amount,
        "paid_amount": invoice.paid_amount,
        "balance": invoice.balance(),
        "issue_date": invoice.issue_date,
        "due_date": invoice.due_date,
    })
}

/// Full invoice body with items and payment history.
fn invoice_detail_body(detail: &InvoiceDetail) -> serde_json::Value {
    json!({
        "invoice": detail.invoice,
        "balance": detail.invoice.balance(),
        "items": detail.items,
        "payments": detail.payments,
    })
}

/// Renders a ledger error as a JSON error response.
pub(crate) fn ledger_error_response(err: &LedgerError) -> Response {
    if err.status_code() >= 500 {
        error!(error = %err, "Ledger operation failed");
    }
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({
            "error": err.error_code(),
            "message": err.to_string()
        })),
    )
        .into_response()
}
