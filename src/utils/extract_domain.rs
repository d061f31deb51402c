//! Host and domain extraction from HTTP requests.

use crate::AppError;
use axum::http::{HeaderMap, Uri, header};

/// Returns the request authority: the `Host` header, or the URI authority for
/// HTTP/2 requests that carry none. The port is kept.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if neither is present or the header is not
/// valid UTF-8.
pub fn request_host(headers: &HeaderMap, uri: &Uri) -> Result<String, AppError> {
    match headers.get(header::HOST) {
        Some(value) => value
            .to_str()
            .map(|h| h.to_ascii_lowercase())
            .map_err(|_| AppError::bad_request("Invalid Host header", serde_json::json!({}))),
        None => uri
            .authority()
            .map(|a| a.as_str().to_ascii_lowercase())
            .ok_or_else(|| AppError::bad_request("Missing Host header", serde_json::json!({}))),
    }
}

/// Canonical spelling of a domain: surrounding whitespace trimmed, ASCII lowercased.
///
/// Every place that takes a domain from outside (environment, admin route, CLI)
/// goes through this, so caches, reload requests and rows agree on one key.
pub fn normalize_domain(domain: &str) -> String {
    domain.trim().to_ascii_lowercase()
}

/// Extracts the lowercase domain name, without port, from the request.
///
/// IPv6 literals keep their brackets (`[::1]:8080` → `[::1]`).
///
/// # Errors
///
/// See [`request_host`].
pub fn extract_domain(headers: &HeaderMap, uri: &Uri) -> Result<String, AppError> {
    let host = request_host(headers, uri)?;

    let domain = if host.starts_with('[') {
        match host.find(']') {
            Some(end_bracket) => host[..=end_bracket].to_string(),
            None => host,
        }
    } else {
        host.split(':').next().unwrap_or(&host).to_string()
    };

    Ok(domain)
}
