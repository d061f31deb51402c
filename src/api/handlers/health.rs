//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::HealthResponse;
use crate::api::handlers::status::cache_statuses;
use crate::state::AppState;

/// Returns service health.
///
/// # Endpoint
///
/// `GET /health` (admin listener)
///
/// # Response Codes
///
/// - **200 OK**: every cache has published a snapshot
/// - **503 Service Unavailable**: a cache has never loaded, or none exist
///
/// A cache that loaded once and then failed a reload is still healthy: it keeps
/// serving its previous snapshot. Its `last_error` is reported either way.
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let caches = cache_statuses(&state);
    let all_ready = !caches.is_empty() && caches.iter().all(|c| c.ready);

    let response = HealthResponse {
        status: if all_ready { "healthy" } else { "not_ready" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        caches,
    };

    if all_ready {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}
