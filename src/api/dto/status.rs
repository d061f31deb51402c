//! DTOs for the cache status endpoint.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::application::cache::CacheStatus;

/// Status of every provisioned cache.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub caches: Vec<CacheStatusDto>,
}

/// State of one cache.
#[derive(Debug, Serialize)]
pub struct CacheStatusDto {
    /// `null` for the unscoped cache.
    pub domain: Option<String>,
    pub ready: bool,
    pub entries: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub loaded_at: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl From<CacheStatus> for CacheStatusDto {
    fn from(status: CacheStatus) -> Self {
        Self {
            domain: status.domain,
            ready: status.ready,
            entries: status.entries,
            loaded_at: status.loaded_at,
            last_error: status.last_error,
        }
    }
}
