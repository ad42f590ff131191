//! Authentication middleware for protected routes.
//!
//! Validates the bearer token, resolves the campus scope from the
//! `X-Campus-Id` header against the token's grants, and stores the
//! resulting [`AccessContext`] in request extensions. A requested
//! campus outside the grant set leaves the context with no selected
//! scope; campus-gated handlers then fail closed.

use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;
use uuid::Uuid;

use crate::AppState;
use sala_shared::{AccessContext, AppError, JwtError};

/// Header naming the campus the request operates in.
pub const CAMPUS_HEADER: &str = "X-Campus-Id";

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

/// Authentication middleware that validates JWT tokens.
///
/// This middleware:
/// 1. Extracts the Bearer token from the Authorization header
/// 2. Validates the token using the JWT service
/// 3. Resolves the campus scope from the `X-Campus-Id` header
/// 4. Stores the access context in request extensions
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(token) = auth_header.and_then(extract_bearer_token) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "missing_token",
                "message": "Authorization header with Bearer token is required"
            })),
        )
            .into_response();
    };

    let claims = match state.jwt_service.validate_token(token) {
        Ok(claims) => claims,
        Err(e) => {
            let (error, message) = match e {
                JwtError::Expired => ("token_expired", "Token has expired"),
                _ => ("invalid_token", "Invalid or malformed token"),
            };
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": error, "message": message })),
            )
                .into_response();
        }
    };

    let requested_campus = request
        .headers()
        .get(CAMPUS_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok());

    let context = AccessContext::from_claims(&claims, requested_campus);
    request.extensions_mut().insert(context);
    next.run(request).await
}

/// Extractor for the resolved access context.
///
/// Use this in handlers to get the acting user and campus scope:
///
/// ```ignore
/// async fn handler(AuthContext(ctx): AuthContext) -> impl IntoResponse {
///     let user_id = ctx.user_id();
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthContext(pub AccessContext);

impl AuthContext {
    /// Returns the selected campus, or the response for a request that
    /// named no usable campus.
    ///
    /// Campus-gated handlers call this first; a missing or ungranted
    /// `X-Campus-Id` never falls back to a wider scope.
    pub fn campus(&self) -> Result<Uuid, Response> {
        self.0.selected_campus().ok_or_else(|| {
            (
                StatusCode::FORBIDDEN,
                Json(json!({
                    "error": "no_campus_scope",
                    "message": "X-Campus-Id header naming a granted campus is required"
                })),
            )
                .into_response()
        })
    }
}

impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AccessContext>()
            .cloned()
            .map(AuthContext)
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({
                        "error": "unauthorized",
                        "message": "Authentication required"
                    })),
                )
            })
    }
}

/// Renders an [`AppError`] as a JSON error response.
pub fn app_error_response(err: &AppError) -> Response {
    let status = StatusCode::from_u16(err.status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({
            "error": err.error_code(),
            "message": err.to_string()
        })),
    )
        .into_response()
}
