//! Background worker that reloads every cache on a fixed period.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, warn};

use crate::application::cache::CacheRegistry;
use crate::error::display_domain;

/// Reloads all provisioned caches every `period`.
///
/// The first tick fires one period after start; the initial load is already
/// dispatched by provisioning. Failures are logged and the previous snapshot
/// keeps serving; the next tick is an independent attempt. Ticks missed while
/// a slow reload runs are skipped rather than queued.
pub async fn run_reload_worker(registry: Arc<CacheRegistry>, period: Duration) {
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;

        for outcome in registry.reload_all().await {
            match outcome.result {
                Ok(entries) => debug!(
                    domain = display_domain(outcome.domain.as_deref()),
                    entries, "Scheduled reload complete"
                ),
                Err(e) => warn!(
                    domain = display_domain(outcome.domain.as_deref()),
                    error = %e,
                    "Scheduled reload failed"
                ),
            }
        }
    }
}
