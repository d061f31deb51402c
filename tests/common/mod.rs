#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use redirecter::application::cache::{CacheRegistry, RedirectCache};
use redirecter::config::{CacheConfig, DatabaseConfig, KeyMode};
use redirecter::domain::entities::Redirect;
use redirecter::domain::repositories::RedirectRepository;
use redirecter::error::LoadError;
use redirecter::routes::{admin_router, app_router};
use redirecter::state::{AppState, CacheRouting};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// In-memory redirect table that can be edited and switched to failing.
#[derive(Default)]
pub struct StaticRepository {
    rows: Mutex<Vec<Redirect>>,
    failing: AtomicBool,
    loads: AtomicUsize,
}

impl StaticRepository {
    pub fn with_rows(rows: &[(&str, &str)]) -> Arc<Self> {
        let repo = Arc::new(Self::default());
        repo.set_rows(rows);
        repo
    }

    pub fn set_rows(&self, rows: &[(&str, &str)]) {
        *self.rows.lock().unwrap() = rows
            .iter()
            .map(|(source, destination)| Redirect::new(*source, *destination))
            .collect();
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RedirectRepository for StaticRepository {
    async fn load_all(&self) -> Result<Vec<Redirect>, LoadError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(LoadError::Unavailable("connection refused".to_string()));
        }
        Ok(self.rows.lock().unwrap().clone())
    }
}

pub fn test_database() -> DatabaseConfig {
    DatabaseConfig {
        host: "localhost".to_string(),
        port: 5432,
        user: "redirecter".to_string(),
        password: "secret".to_string(),
        name: "redirecter_test".to_string(),
    }
}

pub fn cache_config(domain: Option<&str>) -> CacheConfig {
    CacheConfig::new(
        test_database(),
        domain.map(str::to_owned),
        Duration::from_secs(5),
    )
}

/// Provisions a cache backed by `repo` and waits for its initial load.
pub async fn provision(
    registry: &CacheRegistry,
    domain: Option<&str>,
    repo: Arc<StaticRepository>,
) -> Arc<RedirectCache> {
    let provisioned = registry
        .provision(&cache_config(domain), |_| repo as Arc<dyn RedirectRepository>)
        .unwrap();
    if let Some(initial_load) = provisioned.initial_load {
        initial_load.await.unwrap();
    }
    provisioned.cache
}

/// State with one unscoped cache, path keys, and no admin token.
pub async fn single_cache_state(repo: Arc<StaticRepository>) -> AppState {
    let registry = Arc::new(CacheRegistry::new());
    let cache = provision(&registry, None, repo).await;
    AppState::new(
        registry,
        CacheRouting::Single(cache),
        KeyMode::Path,
        false,
        None,
    )
}

pub fn public_server(state: AppState) -> TestServer {
    TestServer::new(app_router(state)).unwrap()
}

pub fn admin_server(state: AppState) -> TestServer {
    TestServer::new(admin_router(state)).unwrap()
}
