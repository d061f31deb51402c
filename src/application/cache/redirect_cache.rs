//! Refreshable in-memory redirect table.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use arc_swap::ArcSwapOption;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::domain::Snapshot;
use crate::domain::repositories::RedirectRepository;
use crate::error::{LoadError, display_domain};

/// Outcome of a lookup that keeps "never loaded" apart from "no entry".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Found(String),
    /// A snapshot is published but has no entry for the key.
    Missing,
    /// No snapshot has ever been published.
    NotReady,
}

impl Lookup {
    /// Collapses [`Lookup::Missing`] and [`Lookup::NotReady`] into `None`.
    pub fn into_option(self) -> Option<String> {
        match self {
            Lookup::Found(destination) => Some(destination),
            Lookup::Missing | Lookup::NotReady => None,
        }
    }
}

/// Point-in-time view of a cache for health and status reporting.
#[derive(Debug, Clone)]
pub struct CacheStatus {
    pub domain: Option<String>,
    pub ready: bool,
    pub entries: usize,
    pub loaded_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

/// A failed load, tagged with the publish generation it started from.
struct LoadFailure {
    generation: u64,
    message: String,
}

/// Redirect table whose snapshot is swapped atomically on reload.
///
/// Readers load the current [`Snapshot`] pointer without locking and are
/// answered entirely from that one snapshot. A reload builds the next snapshot
/// off to the side and publishes it with a single store; on failure the
/// published snapshot is left untouched.
///
/// Concurrent reloads are allowed. The last one to publish wins. A failed load
/// is reported by [`Self::last_error`] only until a snapshot newer than the one
/// it started from is published, so an overlapping slow failure never shows up
/// next to a fresher table.
pub struct RedirectCache {
    domain: Option<String>,
    load_timeout: Duration,
    repository: Arc<dyn RedirectRepository>,
    current: ArcSwapOption<Snapshot>,
    /// Bumped after every publish.
    generation: AtomicU64,
    last_error: ArcSwapOption<LoadFailure>,
}

impl RedirectCache {
    /// Creates an unloaded cache. Lookups miss until the first successful reload.
    pub fn new(
        domain: Option<String>,
        load_timeout: Duration,
        repository: Arc<dyn RedirectRepository>,
    ) -> Self {
        Self {
            domain,
            load_timeout,
            repository,
            current: ArcSwapOption::empty(),
            generation: AtomicU64::new(0),
            last_error: ArcSwapOption::empty(),
        }
    }

    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    /// Returns the destination for `key`.
    ///
    /// An unloaded cache answers `None`, the same as a loaded cache without a
    /// matching entry. Use [`Self::resolve`] to tell the two apart.
    pub fn lookup(&self, key: &str) -> Option<String> {
        self.resolve(key).into_option()
    }

    /// Looks up `key`, distinguishing a miss from a cache that never loaded.
    pub fn resolve(&self, key: &str) -> Lookup {
        match self.current.load().as_deref() {
            None => Lookup::NotReady,
            Some(snapshot) => match snapshot.get(key) {
                Some(destination) => Lookup::Found(destination.to_owned()),
                None => Lookup::Missing,
            },
        }
    }

    /// The currently published snapshot, if any.
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.current.load_full()
    }

    pub fn is_ready(&self) -> bool {
        self.current.load().is_some()
    }

    /// Message of the most recent failed load, cleared by the next success.
    pub fn last_error(&self) -> Option<String> {
        let failure = self.last_error.load_full()?;
        (failure.generation == self.generation.load(Ordering::Acquire))
            .then(|| failure.message.clone())
    }

    /// Reloads the whole table from the backing store and publishes it.
    ///
    /// Returns the number of entries in the new snapshot. No lock is held
    /// while the store is queried; only the final publish is synchronized.
    ///
    /// # Errors
    ///
    /// Returns the [`LoadError`] from the repository, or [`LoadError::Timeout`]
    /// if the load does not finish within the configured timeout. The previous
    /// snapshot stays visible in both cases.
    pub async fn reload(&self) -> Result<usize, LoadError> {
        let generation = self.generation.load(Ordering::Acquire);
        let result = match tokio::time::timeout(self.load_timeout, self.repository.load_all()).await
        {
            Ok(result) => result,
            Err(_) => Err(LoadError::Timeout(self.load_timeout)),
        };

        match result {
            Ok(rows) => {
                let snapshot = Snapshot::from_rows(rows);
                let entries = snapshot.len();
                self.current.store(Some(Arc::new(snapshot)));
                self.generation.fetch_add(1, Ordering::AcqRel);
                self.last_error.store(None);
                info!(
                    domain = display_domain(self.domain()),
                    entries, "Loaded redirects"
                );
                Ok(entries)
            }
            Err(e) => {
                self.last_error.store(Some(Arc::new(LoadFailure {
                    generation,
                    message: e.to_string(),
                })));
                warn!(
                    domain = display_domain(self.domain()),
                    error = %e,
                    "Failed to load redirects, keeping previous snapshot"
                );
                Err(e)
            }
        }
    }

    pub fn status(&self) -> CacheStatus {
        let snapshot = self.snapshot();
        CacheStatus {
            domain: self.domain.clone(),
            ready: snapshot.is_some(),
            entries: snapshot.as_ref().map_or(0, |s| s.len()),
            loaded_at: snapshot.as_ref().map(|s| s.loaded_at()),
            last_error: self.last_error(),
        }
    }
}

impl std::fmt::Debug for RedirectCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedirectCache")
            .field("domain", &self.domain)
            .field("load_timeout", &self.load_timeout)
            .field("ready", &self.is_ready())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Redirect;
    use crate::domain::repositories::MockRedirectRepository;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Semaphore;

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn rows(pairs: &[(&str, &str)]) -> Vec<Redirect> {
        pairs.iter().map(|(s, d)| Redirect::new(*s, *d)).collect()
    }

    fn cache_with(repo: impl RedirectRepository + 'static) -> RedirectCache {
        RedirectCache::new(None, TIMEOUT, Arc::new(repo))
    }

    /// Serves a different table on each call, in order.
    fn sequenced_mock(tables: Vec<Result<Vec<Redirect>, &'static str>>) -> MockRedirectRepository {
        let calls = AtomicUsize::new(0);
        let mut mock = MockRedirectRepository::new();
        mock.expect_load_all().returning(move || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            match &tables[n.min(tables.len() - 1)] {
                Ok(rows) => Ok(rows.clone()),
                Err(msg) => Err(LoadError::Unavailable(msg.to_string())),
            }
        });
        mock
    }

    #[tokio::test]
    async fn test_unloaded_cache_misses() {
        let mut mock = MockRedirectRepository::new();
        mock.expect_load_all().never();
        let cache = cache_with(mock);

        assert_eq!(cache.lookup("/old-page"), None);
        assert_eq!(cache.resolve("/old-page"), Lookup::NotReady);
        assert!(!cache.is_ready());
        assert!(cache.snapshot().is_none());
    }

    #[tokio::test]
    async fn test_reload_publishes_snapshot() {
        let mut mock = MockRedirectRepository::new();
        mock.expect_load_all()
            .times(1)
            .returning(|| Ok(rows(&[("/old-page", "/new-page")])));
        let cache = cache_with(mock);

        let entries = cache.reload().await.unwrap();

        assert_eq!(entries, 1);
        assert_eq!(cache.lookup("/old-page"), Some("/new-page".to_string()));
        assert_eq!(cache.lookup("/other-page"), None);
        assert_eq!(cache.resolve("/other-page"), Lookup::Missing);
        assert!(cache.is_ready());
    }

    #[tokio::test]
    async fn test_loaded_but_empty_is_ready() {
        let mut mock = MockRedirectRepository::new();
        mock.expect_load_all().returning(|| Ok(Vec::new()));
        let cache = cache_with(mock);

        cache.reload().await.unwrap();

        assert!(cache.is_ready());
        assert_eq!(cache.resolve("/anything"), Lookup::Missing);
    }

    #[tokio::test]
    async fn test_reload_replaces_destination() {
        let cache = cache_with(sequenced_mock(vec![
            Ok(rows(&[("/old-page", "/new-page"), ("/gone", "/x")])),
            Ok(rows(&[("/old-page", "/newer-page")])),
        ]));

        cache.reload().await.unwrap();
        assert_eq!(cache.lookup("/old-page"), Some("/new-page".to_string()));

        cache.reload().await.unwrap();
        assert_eq!(cache.lookup("/old-page"), Some("/newer-page".to_string()));
        assert_eq!(cache.lookup("/gone"), None);
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_previous_snapshot() {
        let cache = cache_with(sequenced_mock(vec![
            Ok(rows(&[("/old-page", "/new-page")])),
            Err("connection refused"),
        ]));

        cache.reload().await.unwrap();
        let before = cache.snapshot().unwrap();

        let err = cache.reload().await.unwrap_err();

        assert!(matches!(err, LoadError::Unavailable(_)));
        assert_eq!(cache.lookup("/old-page"), Some("/new-page".to_string()));
        assert!(Arc::ptr_eq(&before, &cache.snapshot().unwrap()));
        assert_eq!(
            cache.last_error().as_deref(),
            Some("backing store unavailable: connection refused")
        );
    }

    #[tokio::test]
    async fn test_failed_first_reload_stays_unloaded() {
        let cache = cache_with(sequenced_mock(vec![Err("unreachable")]));

        assert!(cache.reload().await.is_err());

        assert_eq!(cache.lookup("/old-page"), None);
        assert_eq!(cache.resolve("/old-page"), Lookup::NotReady);
        let status = cache.status();
        assert!(!status.ready);
        assert_eq!(status.entries, 0);
        assert!(status.last_error.is_some());
    }

    #[tokio::test]
    async fn test_success_clears_last_error() {
        let cache = cache_with(sequenced_mock(vec![
            Err("unreachable"),
            Ok(rows(&[("/a", "/b")])),
        ]));

        assert!(cache.reload().await.is_err());
        assert!(cache.last_error().is_some());

        cache.reload().await.unwrap();
        assert!(cache.last_error().is_none());
        let status = cache.status();
        assert!(status.ready);
        assert_eq!(status.entries, 1);
        assert!(status.loaded_at.is_some());
    }

    /// Repository whose loads each take one permit from `gate`, then serve the
    /// next table in order (the last one repeats).
    struct GatedRepository {
        gate: Arc<Semaphore>,
        tables: Vec<Vec<Redirect>>,
        calls: AtomicUsize,
    }

    impl GatedRepository {
        fn new(gate: Arc<Semaphore>, tables: Vec<Vec<Redirect>>) -> Self {
            Self {
                gate,
                tables,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl RedirectRepository for GatedRepository {
        async fn load_all(&self) -> Result<Vec<Redirect>, LoadError> {
            self.gate
                .acquire()
                .await
                .map_err(|e| LoadError::Unavailable(e.to_string()))?
                .forget();
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.tables[n.min(self.tables.len() - 1)].clone())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_reload_times_out() {
        let repo = GatedRepository::new(Arc::new(Semaphore::new(0)), vec![Vec::new()]);
        let cache = RedirectCache::new(None, Duration::from_secs(2), Arc::new(repo));

        let err = cache.reload().await.unwrap_err();

        assert!(matches!(err, LoadError::Timeout(d) if d == Duration::from_secs(2)));
        assert!(!cache.is_ready());
    }

    #[tokio::test]
    async fn test_lookup_serves_previous_snapshot_while_reload_in_flight() {
        // One permit: the first load runs, the second waits on the gate.
        let gate = Arc::new(Semaphore::new(1));
        let cache = Arc::new(RedirectCache::new(
            None,
            TIMEOUT,
            Arc::new(GatedRepository::new(
                gate.clone(),
                vec![
                    rows(&[("/old-page", "/new-page")]),
                    rows(&[("/old-page", "/newer-page")]),
                ],
            )),
        ));
        cache.reload().await.unwrap();

        let reloading = cache.clone();
        let handle = tokio::spawn(async move { reloading.reload().await });
        tokio::task::yield_now().await;
        assert!(!handle.is_finished());

        assert_eq!(cache.lookup("/old-page"), Some("/new-page".to_string()));
        assert_eq!(
            cache.resolve("/old-page"),
            Lookup::Found("/new-page".to_string())
        );

        gate.add_permits(1);
        assert_eq!(handle.await.unwrap().unwrap(), 1);
        assert_eq!(cache.lookup("/old-page"), Some("/newer-page".to_string()));
    }

    /// First load waits on `gate` and then fails; every later load succeeds.
    struct SlowFailureRepository {
        gate: Semaphore,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RedirectRepository for SlowFailureRepository {
        async fn load_all(&self) -> Result<Vec<Redirect>, LoadError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                let _permit = self
                    .gate
                    .acquire()
                    .await
                    .map_err(|e| LoadError::Unavailable(e.to_string()))?;
                return Err(LoadError::Unavailable("connection reset".to_string()));
            }
            Ok(rows(&[("/old-page", "/new-page")]))
        }
    }

    #[tokio::test]
    async fn test_overlapping_failure_does_not_mask_newer_snapshot() {
        let repo = Arc::new(SlowFailureRepository {
            gate: Semaphore::new(0),
            calls: AtomicUsize::new(0),
        });
        let cache = Arc::new(RedirectCache::new(None, TIMEOUT, repo.clone()));

        let slow = cache.clone();
        let failing = tokio::spawn(async move { slow.reload().await });
        tokio::task::yield_now().await;

        cache.reload().await.unwrap();
        repo.gate.add_permits(1);
        assert!(failing.await.unwrap().is_err());

        assert_eq!(cache.lookup("/old-page"), Some("/new-page".to_string()));
        assert_eq!(cache.last_error(), None);
        assert_eq!(cache.status().last_error, None);
    }

    #[tokio::test]
    async fn test_failure_after_publish_is_reported() {
        let cache = cache_with(sequenced_mock(vec![
            Ok(rows(&[("/a", "/b")])),
            Err("connection refused"),
        ]));

        cache.reload().await.unwrap();
        assert!(cache.reload().await.is_err());

        assert_eq!(
            cache.status().last_error.as_deref(),
            Some("backing store unavailable: connection refused")
        );
    }

    #[test]
    fn test_lookup_into_option() {
        assert_eq!(Lookup::Found("/x".to_string()).into_option(), Some("/x".to_string()));
        assert_eq!(Lookup::Missing.into_option(), None);
        assert_eq!(Lookup::NotReady.into_option(), None);
    }
}
