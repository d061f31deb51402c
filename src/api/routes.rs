//! Public and admin route configuration.

use crate::api::handlers::{
    health_handler, redirect_handler, reload_all_handler, reload_domain_handler, status_handler,
};
use crate::state::AppState;
use axum::{Router, routing::get};

/// Public routes: every request goes through the redirect pipeline.
pub fn public_routes() -> Router<AppState> {
    Router::new().fallback(redirect_handler)
}

/// Admin routes under `/redirecter`.
///
/// # Endpoints
///
/// - `GET|POST /reload`          - Reload every cache
/// - `GET|POST /reload/{domain}` - Reload one domain's cache
/// - `GET      /status`          - Cache status
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/reload",
            get(reload_all_handler).post(reload_all_handler),
        )
        .route(
            "/reload/{domain}",
            get(reload_domain_handler).post(reload_domain_handler),
        )
        .route("/status", get(status_handler))
}

/// Unauthenticated admin-listener routes.
///
/// - `GET /health` - Readiness of every cache
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_handler))
}
