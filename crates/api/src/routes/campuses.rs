//! Campus routes.
//!
//! Campuses are provisioned operationally (migrator/seeder); the API
//! only lists the ones the caller holds a grant for.

use axum::{
    Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get,
};
use serde_json::json;
use tracing::error;

use crate::{AppState, middleware::AuthContext};
use sala_db::CampusRepository;

/// Creates the campus routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/campuses", get(list_campuses))
}

/// GET /campuses - List the campuses the caller has access to.
async fn list_campuses(
    State(state): State<AppState>,
    AuthContext(ctx): AuthContext,
) -> impl IntoResponse {
    let repo = CampusRepository::new((*state.db).clone());

    match repo.list_active().await {
        Ok(campuses) => {
            let visible: Vec<_> = campuses
                .into_iter()
                .filter(|campus| ctx.has_access(campus.id))
                .collect();
            Json(json!({ "campuses": visible })).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list campuses");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "Failed to list campuses"
                })),
            )
                .into_response()
        }
    }
}
