//! Builds the cache lookup key for an incoming request.

use axum::http::{HeaderMap, Uri};

use crate::AppError;
use crate::config::KeyMode;
use crate::utils::extract_domain::request_host;

/// Lookup key for a request under the given key mode.
///
/// - [`KeyMode::Path`]: the request path, e.g. `/old-page`
/// - [`KeyMode::Url`]: `scheme://host/path` with the query string dropped,
///   e.g. `https://sub.domain.cat/old-page`
///
/// In URL mode the scheme is `https` when `behind_proxy` is set and the proxy
/// reports `X-Forwarded-Proto: https`, the URI scheme when the request carries
/// one, and `http` otherwise.
///
/// # Errors
///
/// In URL mode, returns [`AppError::Validation`] if the request has no usable host.
pub fn request_key(
    mode: KeyMode,
    uri: &Uri,
    headers: &HeaderMap,
    behind_proxy: bool,
) -> Result<String, AppError> {
    match mode {
        KeyMode::Path => Ok(uri.path().to_string()),
        KeyMode::Url => {
            let host = request_host(headers, uri)?;
            let scheme = request_scheme(uri, headers, behind_proxy);
            Ok(format!("{}://{}{}", scheme, host, uri.path()))
        }
    }
}

fn request_scheme<'a>(uri: &'a Uri, headers: &'a HeaderMap, behind_proxy: bool) -> &'a str {
    if behind_proxy {
        let forwarded = headers
            .get("x-forwarded-proto")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim);
        if let Some(proto) = forwarded {
            if proto.eq_ignore_ascii_case("https") {
                return "https";
            }
            if proto.eq_ignore_ascii_case("http") {
                return "http";
            }
        }
    }
    uri.scheme_str().unwrap_or("http")
}
