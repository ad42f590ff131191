//! Fee template routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::middleware::auth::app_error_response;
use crate::{AppState, middleware::AuthContext};
use sala_db::repositories::{CreateFeeTemplateInput, FeeTemplateRepository};
use sala_shared::AppError;

/// Creates the fee template routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/fee-templates", get(list_fee_templates))
        .route("/fee-templates", post(create_fee_template))
        .route("/fee-templates/{template_id}", get(get_fee_template))
}

/// Request body for creating a fee template.
#[derive(Debug, Deserialize)]
pub struct CreateFeeTemplateRequest {
    /// Template name.
    pub name: String,
    /// Longer description, if any.
    pub description: Option<String>,
    /// The charge amount.
    pub amount: Decimal,
}

/// GET /fee-templates - List fee templates in the selected campus.
async fn list_fee_templates(State(state): State<AppState>, ctx: AuthContext) -> impl IntoResponse {
    let campus_id = match ctx.campus() {
        Ok(campus_id) => campus_id,
        Err(response) => return response,
    };

    let repo = FeeTemplateRepository::new((*state.db).clone());
    match repo.list(campus_id).await {
        Ok(templates) => Json(json!({ "fee_templates": templates })).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to list fee templates");
            internal_error("Failed to list fee templates")
        }
    }
}

/// POST /fee-templates - Create a fee template (write access).
async fn create_fee_template(
    State(state): State<AppState>,
    ctx: AuthContext,
    Json(payload): Json<CreateFeeTemplateRequest>,
) -> impl IntoResponse {
    let campus_id = match ctx.campus() {
        Ok(campus_id) => campus_id,
        Err(response) => return response,
    };
    if let Err(err) = ctx.0.require_write(campus_id) {
        return app_error_response(&err);
    }

    if payload.name.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_error",
                "message": "name is required"
            })),
        )
            .into_response();
    }
    if payload.amount <= Decimal::ZERO {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_amount",
                "message": "Amount must be positive"
            })),
        )
            .into_response();
    }

    let repo = FeeTemplateRepository::new((*state.db).clone());
    let input = CreateFeeTemplateInput {
        campus_id,
        name: payload.name,
        description: payload.description,
        amount: payload.amount,
    };

    match repo.create(input).await {
        Ok(template) => {
            info!(template_id = %template.id, campus_id = %campus_id, "Fee template created");
            (StatusCode::CREATED, Json(json!({ "fee_template": template }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create fee template");
            internal_error("Failed to create fee template")
        }
    }
}

/// GET /fee-templates/{template_id} - Fetch one fee template.
async fn get_fee_template(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(template_id): Path<Uuid>,
) -> impl IntoResponse {
    let campus_id = match ctx.campus() {
        Ok(campus_id) => campus_id,
        Err(response) => return response,
    };

    let repo = FeeTemplateRepository::new((*state.db).clone());
    match repo.find(template_id).await {
        Ok(Some(template)) if template.campus_id != campus_id => app_error_response(
            &AppError::Forbidden("Fee template belongs to another campus".to_string()),
        ),
        Ok(Some(template)) => Json(json!({ "fee_template": template })).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "fee_template_not_found",
                "message": "Fee template not found"
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to fetch fee template");
            internal_error("Failed to fetch fee template")
        }
    }
}

fn internal_error(message: &str) -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "internal_error", "message": message })),
    )
        .into_response()
}
