//! Request pipeline handler: answers matching requests with a redirect.

use axum::{
    extract::State,
    http::{HeaderMap, Uri},
    response::{IntoResponse, Redirect, Response},
};
use tracing::debug;

use crate::application::cache::Lookup;
use crate::error::AppError;
use crate::state::{AppState, CacheRouting};
use crate::utils::extract_domain::extract_domain;
use crate::utils::redirect_target::sanitize_destination;
use crate::utils::request_key::request_key;

/// Redirects any request whose key is in the redirect table.
///
/// Mounted as the public router's fallback, so it sees every method and path.
///
/// # Request Flow
///
/// 1. Pick the cache (the single cache, or by `Host` domain in multi-domain mode)
/// 2. Build the key (request path, or URL without query string)
/// 3. Look it up in the current snapshot
/// 4. On a hit, return 308 Permanent Redirect to the sanitized destination
///
/// A cache that has not loaded yet is treated like a miss.
///
/// # Errors
///
/// Returns 404 Not Found on a miss or for an unknown domain.
/// Returns 400 Bad Request if a host is needed and the request has none.
pub async fn redirect_handler(
    State(state): State<AppState>,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let domain = match state.routing {
        CacheRouting::Single(_) => None,
        CacheRouting::ByHost => Some(extract_domain(&headers, &uri)?),
    };

    let Some(cache) = state.cache_for(domain.as_deref()) else {
        debug!(domain = ?domain, "No redirect cache for domain");
        return Err(not_found(uri.path()));
    };

    let key = request_key(state.key_mode, &uri, &headers, state.behind_proxy)?;

    match cache.resolve(&key) {
        Lookup::Found(destination) => {
            debug!(%key, %destination, "Redirect HIT");
            Ok(Redirect::permanent(sanitize_destination(&destination)).into_response())
        }
        Lookup::Missing => Err(not_found(uri.path())),
        Lookup::NotReady => {
            debug!(%key, "Redirect table not loaded yet, passing through");
            Err(not_found(uri.path()))
        }
    }
}

fn not_found(path: &str) -> AppError {
    AppError::not_found("Not found", serde_json::json!({ "path": path }))
}
