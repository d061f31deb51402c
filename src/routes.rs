//! Top-level routers for the public and admin listeners.
//!
//! # Public listener
//!
//! - `*` - Redirect pipeline (every method and path)
//!
//! # Admin listener
//!
//! - `GET      /health`                       - Readiness (open)
//! - `GET|POST /redirecter/reload`            - Reload every cache (token if configured)
//! - `GET|POST /redirecter/reload/{domain}`   - Reload one domain
//! - `GET      /redirecter/status`            - Cache status
//!
//! Admin routes live on a separate listener so they never shadow redirect keys.

use crate::api;
use crate::api::middleware::{admin_auth, tracing};
use crate::state::AppState;
use axum::{Router, middleware};

/// Router for the public listener.
pub fn app_router(state: AppState) -> Router {
    api::routes::public_routes()
        .with_state(state)
        .layer(tracing::layer())
}

/// Router for the admin listener.
pub fn admin_router(state: AppState) -> Router {
    let admin = api::routes::admin_routes().route_layer(middleware::from_fn_with_state(
        state.clone(),
        admin_auth::layer,
    ));

    Router::new()
        .nest("/redirecter", admin)
        .merge(api::routes::health_routes())
        .with_state(state)
        .layer(tracing::layer())
}
