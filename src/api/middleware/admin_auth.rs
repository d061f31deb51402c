//! Optional bearer token protection for admin routes.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;

use crate::error::AppError;
use crate::state::{AppState, token_digest};

/// Requires `Authorization: Bearer <ADMIN_TOKEN>` when an admin token is configured.
///
/// Tokens are compared by their SHA-256 digests. With no token configured the
/// request passes through; the admin listener should then be bound to a
/// loopback or otherwise private address.
///
/// # Errors
///
/// Returns `401 Unauthorized` with `WWW-Authenticate: Bearer` if the header is
/// missing, malformed, or carries the wrong token.
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(expected) = st.admin_token_digest.as_deref() else {
        return Ok(next.run(req).await);
    };

    let (mut parts, body) = req.into_parts();

    let AuthBearer(token) = AuthBearer::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            AppError::unauthorized(
                "Unauthorized",
                serde_json::json!({"reason": "Authorization header is missing or invalid"}),
            )
        })?;

    if token_digest(&token) != expected {
        return Err(AppError::unauthorized(
            "Unauthorized",
            serde_json::json!({"reason": "Invalid admin token"}),
        ));
    }

    let req = Request::from_parts(parts, body);
    Ok(next.run(req).await)
}
