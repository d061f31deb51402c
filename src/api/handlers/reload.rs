//! Admin handlers that trigger a reload of the redirect table.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::error::ReloadError;
use crate::state::AppState;
use crate::utils::extract_domain::normalize_domain;

/// Reloads every provisioned cache.
///
/// # Endpoint
///
/// `GET|POST /redirecter/reload`
///
/// # Response Codes
///
/// - **200 OK**: all caches reloaded; body `Reloaded N redirects`
/// - **500 Internal Server Error**: a load failed or no cache exists; the body
///   carries the error message (one line per failed domain)
pub async fn reload_all_handler(State(state): State<AppState>) -> Response {
    let outcomes = state.registry.reload_all().await;
    if outcomes.is_empty() {
        return ReloadError::NotInitialized(None).into_response();
    }

    let mut total = 0;
    let mut failures = Vec::new();
    for outcome in outcomes {
        match outcome.result {
            Ok(entries) => total += entries,
            Err(e) => failures.push(match outcome.domain.as_deref() {
                Some(domain) => format!("{}: {}", domain, e),
                None => e.to_string(),
            }),
        }
    }

    if failures.is_empty() {
        (StatusCode::OK, format!("Reloaded {} redirects", total)).into_response()
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, failures.join("\n")).into_response()
    }
}

/// Reloads the cache of one domain.
///
/// # Endpoint
///
/// `GET|POST /redirecter/reload/{domain}`
///
/// # Errors
///
/// Returns 500 with the message of [`ReloadError::NotInitialized`] for an
/// unknown domain, or of the load error.
pub async fn reload_domain_handler(
    Path(domain): Path<String>,
    State(state): State<AppState>,
) -> Result<String, ReloadError> {
    let domain = normalize_domain(&domain);
    let entries = state.registry.reload(Some(&domain)).await?;
    Ok(format!("Reloaded {} redirects for {}", entries, domain))
}
