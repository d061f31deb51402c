//! HTTP server initialization and runtime setup.
//!
//! Provisions the redirect caches, starts the optional reload worker, and runs
//! the public and admin listeners until shutdown.

use crate::application::cache::CacheRegistry;
use crate::application::reload_worker::run_reload_worker;
use crate::config::Config;
use crate::domain::repositories::RedirectRepository;
use crate::infrastructure::persistence::PgRedirectRepository;
use crate::routes::{admin_router, app_router};
use crate::state::{AppState, CacheRouting};

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;

/// Runs the service with the given configuration.
///
/// Initializes:
/// - One redirect cache per configured domain (initial loads run in the background)
/// - Scheduled reload worker, if enabled
/// - Public and admin Axum servers
///
/// Startup does not wait for the database: lookups miss until the first load
/// succeeds, and `/health` reports 503 meanwhile.
///
/// # Errors
///
/// Returns an error if:
/// - The cache configuration is invalid
/// - A listener fails to bind
/// - A server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let registry = Arc::new(CacheRegistry::new());

    let mut first_cache = None;
    for cache_config in config.cache_configs() {
        let provisioned = registry
            .provision(&cache_config, |c| {
                Arc::new(PgRedirectRepository::new(c)) as Arc<dyn RedirectRepository>
            })
            .context("Failed to provision redirect cache")?;
        first_cache.get_or_insert(provisioned.cache);
    }

    let routing = if config.multi_domain {
        CacheRouting::ByHost
    } else {
        CacheRouting::Single(first_cache.context("No redirect cache configured")?)
    };

    if let Some(period) = config.reload_interval() {
        tokio::spawn(run_reload_worker(registry.clone(), period));
        tracing::info!("Reload worker started (every {}s)", period.as_secs());
    }

    let state = AppState::new(
        registry,
        routing,
        config.key_mode,
        config.behind_proxy,
        config.admin_token.as_deref(),
    );

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    let admin_addr: SocketAddr = config.admin_listen_addr.parse()?;
    let admin_listener = tokio::net::TcpListener::bind(admin_addr).await?;
    tracing::info!("Admin listening on http://{admin_addr}");

    let public = async {
        axum::serve(listener, app_router(state.clone()))
            .with_graceful_shutdown(shutdown_signal())
            .await
    };
    let admin = async {
        axum::serve(admin_listener, admin_router(state.clone()))
            .with_graceful_shutdown(shutdown_signal())
            .await
    };

    tokio::try_join!(public, admin)?;
    tracing::info!("Shut down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
