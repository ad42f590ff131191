//! Authentication routes.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use serde_json::json;
use tracing::{error, info};

use crate::AppState;
use sala_core::auth::verify_password;
use sala_db::UserRepository;
use sala_shared::auth::{CampusGrant, LoginRequest, LoginResponse, UserInfo};

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

/// POST /auth/login - Authenticate a user and return an access token.
///
/// Unknown usernames, wrong passwords, and deactivated accounts all
/// answer with the same generic credentials error.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    let user_repo = UserRepository::new((*state.db).clone());

    let found = match user_repo.find_by_username(&payload.username).await {
        Ok(found) => found,
        Err(e) => {
            error!(error = %e, "Database error during login");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred during login"
                })),
            )
                .into_response();
        }
    };

    let Some(found) = found else {
        info!(username = %payload.username, "Login attempt for unknown user");
        return invalid_credentials();
    };

    match verify_password(&payload.password, &found.user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            info!(user_id = %found.user.id, "Failed login attempt");
            return invalid_credentials();
        }
        Err(e) => {
            error!(error = %e, "Password verification error");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred during login"
                })),
            )
                .into_response();
        }
    }

    let campuses: Vec<CampusGrant> = found
        .grants
        .iter()
        .map(|grant| CampusGrant {
            id: grant.campus_id,
            level: grant.access_level.clone().into(),
        })
        .collect();

    let access_token = match state.jwt_service.generate_access_token(
        found.user.id,
        &found.user.username,
        campuses.clone(),
    ) {
        Ok(token) => token,
        Err(e) => {
            error!(error = %e, "Failed to generate access token");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred during login"
                })),
            )
                .into_response();
        }
    };

    info!(user_id = %found.user.id, "User logged in");

    Json(LoginResponse {
        user: UserInfo {
            id: found.user.id,
            username: found.user.username,
            full_name: found.user.full_name,
            campuses,
        },
        access_token,
        expires_in: state.jwt_service.access_token_expires_secs(),
    })
    .into_response()
}

fn invalid_credentials() -> axum::response::Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "invalid_credentials",
            "message": "Invalid username or password"
        })),
    )
        .into_response()
}
