//! Admin handler reporting the state of every cache.

use axum::{Json, extract::State};

use crate::api::dto::status::{CacheStatusDto, StatusResponse};
use crate::state::AppState;

/// Lists each cache with readiness, entry count, load time and last error.
///
/// # Endpoint
///
/// `GET /redirecter/status`
pub async fn status_handler(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        caches: cache_statuses(&state),
    })
}

pub(crate) fn cache_statuses(state: &AppState) -> Vec<CacheStatusDto> {
    state
        .registry
        .caches()
        .iter()
        .map(|cache| cache.status().into())
        .collect()
}
