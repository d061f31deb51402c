//! Shared state injected into every HTTP handler.

use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::application::cache::{CacheRegistry, RedirectCache};
use crate::config::KeyMode;

/// How the request pipeline picks the cache for a request.
#[derive(Clone, Debug)]
pub enum CacheRouting {
    /// Every request is looked up in this one cache.
    Single(Arc<RedirectCache>),
    /// The cache is chosen by the request `Host` domain.
    ByHost,
}

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<CacheRegistry>,
    pub routing: CacheRouting,
    pub key_mode: KeyMode,
    pub behind_proxy: bool,
    /// SHA-256 of the admin bearer token; admin routes are open when `None`.
    pub admin_token_digest: Option<Vec<u8>>,
}

impl AppState {
    pub fn new(
        registry: Arc<CacheRegistry>,
        routing: CacheRouting,
        key_mode: KeyMode,
        behind_proxy: bool,
        admin_token: Option<&str>,
    ) -> Self {
        Self {
            registry,
            routing,
            key_mode,
            behind_proxy,
            admin_token_digest: admin_token.map(token_digest),
        }
    }

    /// The cache serving `domain`, per the routing mode.
    pub fn cache_for(&self, domain: Option<&str>) -> Option<Arc<RedirectCache>> {
        match &self.routing {
            CacheRouting::Single(cache) => Some(cache.clone()),
            CacheRouting::ByHost => domain.and_then(|d| self.registry.get(Some(d))),
        }
    }
}

pub fn token_digest(token: &str) -> Vec<u8> {
    Sha256::digest(token.as_bytes()).to_vec()
}
