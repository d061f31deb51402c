//! Single-instance provisioning of redirect caches.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, error, info};

use super::redirect_cache::RedirectCache;
use crate::config::CacheConfig;
use crate::domain::repositories::RedirectRepository;
use crate::error::{ConfigError, LoadError, ReloadError, display_domain};
use crate::utils::extract_domain::normalize_domain;

type Slots = HashMap<Option<String>, Arc<RedirectCache>>;

/// Result of [`CacheRegistry::provision`].
#[derive(Debug)]
pub struct Provisioned {
    pub cache: Arc<RedirectCache>,
    /// Background initial load, present only when this call created the cache.
    pub initial_load: Option<JoinHandle<()>>,
}

/// Outcome of reloading one cache during [`CacheRegistry::reload_all`].
#[derive(Debug)]
pub struct ReloadOutcome {
    pub domain: Option<String>,
    pub result: Result<usize, LoadError>,
}

/// Holds exactly one [`RedirectCache`] per domain key for the whole process.
///
/// The registry is owned by the composition root and shared through
/// [`crate::state::AppState`]. A cache, once created, is reused for the rest of
/// the process lifetime and never rebuilt.
#[derive(Default)]
pub struct CacheRegistry {
    slots: Mutex<Slots>,
}

impl CacheRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self) -> MutexGuard<'_, Slots> {
        // The map is only ever inserted into, so a poisoned guard is still consistent.
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the shared cache for `config.domain`, creating it on first use.
    ///
    /// Creation is a guarded check-then-create: concurrent callers converge on
    /// one instance and `make_repository` runs at most once per domain. A newly
    /// created cache gets its first reload dispatched on a spawned task so the
    /// caller never waits for the backing store. If that load fails the error is
    /// logged and recorded on the cache, which stays alive and unloaded until a
    /// later reload succeeds.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration is incomplete. Nothing is
    /// created in that case.
    pub fn provision<F>(
        &self,
        config: &CacheConfig,
        make_repository: F,
    ) -> Result<Provisioned, ConfigError>
    where
        F: FnOnce(&CacheConfig) -> Arc<dyn RedirectRepository>,
    {
        config.validate()?;
        let domain = config.domain.as_deref().map(normalize_domain);

        let cache = {
            let mut slots = self.slots();
            if let Some(existing) = slots.get(&domain) {
                debug!(
                    domain = display_domain(domain.as_deref()),
                    "Reusing redirect cache"
                );
                return Ok(Provisioned {
                    cache: existing.clone(),
                    initial_load: None,
                });
            }

            info!(
                domain = display_domain(domain.as_deref()),
                "Initializing redirect cache"
            );
            let cache = Arc::new(RedirectCache::new(
                domain.clone(),
                config.load_timeout,
                make_repository(config),
            ));
            slots.insert(domain, cache.clone());
            cache
        };

        let initial_load = tokio::spawn(run_initial_load(cache.clone()));

        Ok(Provisioned {
            cache,
            initial_load: Some(initial_load),
        })
    }

    /// The cache provisioned for `domain`, if any. The domain is matched normalized.
    pub fn get(&self, domain: Option<&str>) -> Option<Arc<RedirectCache>> {
        self.slots().get(&domain.map(normalize_domain)).cloned()
    }

    /// All provisioned caches, ordered by domain.
    pub fn caches(&self) -> Vec<Arc<RedirectCache>> {
        let mut caches: Vec<_> = self.slots().values().cloned().collect();
        caches.sort_by(|a, b| a.domain().cmp(&b.domain()));
        caches
    }

    pub fn is_empty(&self) -> bool {
        self.slots().is_empty()
    }

    /// Reloads the cache for `domain` now.
    ///
    /// # Errors
    ///
    /// - [`ReloadError::NotInitialized`] if no cache was provisioned for `domain`
    /// - [`ReloadError::Load`] if the backing store load fails
    pub async fn reload(&self, domain: Option<&str>) -> Result<usize, ReloadError> {
        let cache = self
            .get(domain)
            .ok_or_else(|| ReloadError::NotInitialized(domain.map(str::to_owned)))?;
        Ok(cache.reload().await?)
    }

    /// Reloads every provisioned cache concurrently.
    ///
    /// Returns one outcome per cache, ordered by domain. An empty registry
    /// yields no outcomes.
    pub async fn reload_all(&self) -> Vec<ReloadOutcome> {
        let mut tasks = JoinSet::new();
        for cache in self.caches() {
            tasks.spawn(async move {
                let result = cache.reload().await;
                ReloadOutcome {
                    domain: cache.domain().map(str::to_owned),
                    result,
                }
            });
        }

        let mut outcomes = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => error!(error = %e, "Reload task failed to complete"),
            }
        }
        outcomes.sort_by(|a, b| a.domain.cmp(&b.domain));
        outcomes
    }
}

impl std::fmt::Debug for CacheRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheRegistry")
            .field("caches", &self.slots().len())
            .finish()
    }
}

async fn run_initial_load(cache: Arc<RedirectCache>) {
    if let Err(e) = cache.reload().await {
        error!(
            domain = display_domain(cache.domain()),
            error = %e,
            "Initial redirect load failed; lookups miss until the next successful reload"
        );
    }
}
