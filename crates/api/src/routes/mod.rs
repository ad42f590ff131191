//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth::auth_middleware};

pub mod auth;
pub mod campuses;
pub mod fee_templates;
pub mod health;
pub mod invoices;
pub mod payments;
pub mod reports;
pub mod students;
pub mod void_requests;

/// Creates the API router with all routes.
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(campuses::routes())
        .merge(students::routes())
        .merge(fee_templates::routes())
        .merge(invoices::routes())
        .merge(payments::routes())
        .merge(void_requests::routes())
        .merge(reports::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Combine public and protected routes
    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}
