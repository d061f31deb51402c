//! DTOs for health check endpoint.

use serde::Serialize;

use super::status::CacheStatusDto;

/// Health check response with per-cache status.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub caches: Vec<CacheStatusDto>,
}
