//! Void request routes.
//!
//! Recording staff open a request; only campus admins resolve it.
//! Approval voids the payment and restores the invoice balance in one
//! transaction.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::middleware::auth::app_error_response;
use crate::{AppState, middleware::AuthContext};
use sala_core::void::VoidError;
use sala_db::repositories::VoidRepository;
use sala_shared::AccessLevel;

/// Creates the void request routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/payments/{payment_id}/void-requests", post(request_void))
        .route("/void-requests", get(list_pending))
        .route("/void-requests/{request_id}/approve", post(approve_void))
        .route("/void-requests/{request_id}/reject", post(reject_void))
}

/// Request body for opening a void request.
#[derive(Debug, Deserialize)]
pub struct RequestVoidBody {
    /// Why the payment should be voided.
    pub reason: String,
}

/// Request body for rejecting a void request.
#[derive(Debug, Deserialize)]
pub struct RejectVoidBody {
    /// Why the request is rejected.
    pub rejection_reason: String,
}

/// POST /payments/{payment_id}/void-requests - Open a void request (write access).
async fn request_void(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(payment_id): Path<Uuid>,
    Json(payload): Json<RequestVoidBody>,
) -> impl IntoResponse {
    let campus_id = match ctx.campus() {
        Ok(campus_id) => campus_id,
        Err(response) => return response,
    };
    if let Err(err) = ctx.0.require_write(campus_id) {
        return app_error_response(&err);
    }

    let repo = VoidRepository::new((*state.db).clone());
    match repo
        .request_void(campus_id, payment_id, ctx.0.user_id(), payload.reason)
        .await
    {
        Ok(request) => {
            info!(
                request_id = %request.id,
                payment_id = %payment_id,
                "Void request opened"
            );
            (StatusCode::CREATED, Json(json!({ "void_request": request }))).into_response()
        }
        Err(e) => void_error_response(&e),
    }
}

/// GET /void-requests - List pending void requests in the campus.
async fn list_pending(State(state): State<AppState>, ctx: AuthContext) -> impl IntoResponse {
    let campus_id = match ctx.campus() {
        Ok(campus_id) => campus_id,
        Err(response) => return response,
    };

    let repo = VoidRepository::new((*state.db).clone());
    match repo.list_pending(campus_id).await {
        Ok(pending) => {
            let items: Vec<_> = pending
                .into_iter()
                .map(|entry| {
                    json!({
                        "request": entry.request,
                        "payment": entry.payment,
                    })
                })
                .collect();
            Json(json!({ "void_requests": items })).into_response()
        }
        Err(e) => void_error_response(&e),
    }
}

/// POST /void-requests/{request_id}/approve - Approve a request (admin only).
async fn approve_void(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(request_id): Path<Uuid>,
) -> impl IntoResponse {
    let campus_id = match ctx.campus() {
        Ok(campus_id) => campus_id,
        Err(response) => return response,
    };
    if let Err(err) = ctx.0.require_level(campus_id, AccessLevel::Admin) {
        return app_error_response(&err);
    }

    let repo = VoidRepository::new((*state.db).clone());
    match repo.approve_void(campus_id, request_id, ctx.0.user_id()).await {
        Ok(request) => {
            info!(
                request_id = %request.id,
                payment_id = %request.payment_id,
                "Void request approved"
            );
            Json(json!({ "void_request": request })).into_response()
        }
        Err(e) => void_error_response(&e),
    }
}

/// POST /void-requests/{request_id}/reject - Reject a request (admin only).
async fn reject_void(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(request_id): Path<Uuid>,
    Json(payload): Json<RejectVoidBody>,
) -> impl IntoResponse {
    let campus_id = match ctx.campus() {
        Ok(campus_id) => campus_id,
        Err(response) => return response,
    };
    if let Err(err) = ctx.0.require_level(campus_id, AccessLevel::Admin) {
        return app_error_response(&err);
    }

    let repo = VoidRepository::new((*state.db).clone());
    match repo
        .reject_void(campus_id, request_id, ctx.0.user_id(), payload.rejection_reason)
        .await
    {
        Ok(request) => {
            info!(request_id = %request.id, "Void request rejected");
            Json(json!({ "void_request": request })).into_response()
        }
        Err(e) => void_error_response(&e),
    }
}

/// Renders a void workflow error as a JSON error response.
fn void_error_response(err: &VoidError) -> Response {
    if err.status_code() >= 500 {
        error!(error = %err, "Void workflow operation failed");
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
