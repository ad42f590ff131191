//! Reporting routes.
//!
//! All reports are scoped to the selected campus and exclude voided
//! payments from money totals. The cashbox report still lists voided
//! transactions so the day's paper trail is complete.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::{AppState, middleware::AuthContext};
use sala_db::repositories::{ReportError, ReportRepository};

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports/daily-cashbox", get(daily_cashbox))
        .route("/reports/outstanding-debt", get(outstanding_debt))
        .route("/reports/daily-income", get(daily_income))
        .route("/reports/enrollment", get(enrollment))
}

/// Query parameters for the daily cashbox report.
#[derive(Debug, Deserialize)]
pub struct CashboxQuery {
    /// The business day to report on (YYYY-MM-DD).
    pub date: NaiveDate,
}

/// Query parameters for the outstanding debt report.
#[derive(Debug, Deserialize)]
pub struct DebtQuery {
    /// Narrow the report to one grade.
    pub grade: Option<String>,
}

/// Query parameters for the daily income series.
#[derive(Debug, Deserialize)]
pub struct IncomeQuery {
    /// Range start (YYYY-MM-DD, inclusive).
    pub from: NaiveDate,
    /// Range end (YYYY-MM-DD, inclusive).
    pub to: NaiveDate,
}

/// GET /reports/daily-cashbox?date= - Per-method cashbox for one day.
async fn daily_cashbox(
    State(state): State<AppState>,
    ctx: AuthContext,
    Query(query): Query<CashboxQuery>,
) -> impl IntoResponse {
    let campus_id = match ctx.campus() {
        Ok(campus_id) => campus_id,
        Err(response) => return response,
    };

    let repo = ReportRepository::new((*state.db).clone());
    match repo.daily_cashbox(Some(campus_id), query.date).await {
        Ok(report) => Json(json!({ "report": report })).into_response(),
        Err(e) => report_error_response(&e),
    }
}

/// GET /reports/outstanding-debt?grade= - Debtors ranked by amount owed.
async fn outstanding_debt(
    State(state): State<AppState>,
    ctx: AuthContext,
    Query(query): Query<DebtQuery>,
) -> impl IntoResponse {
    let campus_id = match ctx.campus() {
        Ok(campus_id) => campus_id,
        Err(response) => return response,
    };

    let limit = usize::try_from(state.reports.debtor_limit).unwrap_or(usize::MAX);
    let repo = ReportRepository::new((*state.db).clone());
    match repo
        .outstanding_debt(Some(campus_id), query.grade, limit)
        .await
    {
        Ok(report) => Json(json!({ "report": report })).into_response(),
        Err(e) => report_error_response(&e),
    }
}

/// GET /reports/daily-income?from=&to= - Income per day over a range.
async fn daily_income(
    State(state): State<AppState>,
    ctx: AuthContext,
    Query(query): Query<IncomeQuery>,
) -> impl IntoResponse {
    let campus_id = match ctx.campus() {
        Ok(campus_id) => campus_id,
        Err(response) => return response,
    };

    let repo = ReportRepository::new((*state.db).clone());
    match repo.daily_income(Some(campus_id), query.from, query.to).await {
        Ok(series) => Json(json!({ "daily_income": series })).into_response(),
        Err(e) => report_error_response(&e),
    }
}

/// GET /reports/enrollment - Active student counts per grade.
async fn enrollment(State(state): State<AppState>, ctx: AuthContext) -> impl IntoResponse {
    let campus_id = match ctx.campus() {
        Ok(campus_id) => campus_id,
        Err(response) => return response,
    };

    let repo = ReportRepository::new((*state.db).clone());
    match repo.enrollment_stats(Some(campus_id)).await {
        Ok(counts) => Json(json!({ "enrollment": counts })).into_response(),
        Err(e) => report_error_response(&e),
    }
}

/// Renders a report error as a JSON error response.
fn report_error_response(err: &ReportError) -> Response {
    if err.status_code() >= 500 {
        error!(error = %err, "Report query failed");
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
