//! Repository trait for loading redirect rows.

use crate::domain::entities::Redirect;
use crate::error::LoadError;
use async_trait::async_trait;

/// Backing-store client for the redirect table.
///
/// An implementation is bound to one cache configuration (connection
/// parameters plus optional domain discriminator) and returns every row that
/// applies to it.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgRedirectRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_redirect.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RedirectRepository: Send + Sync {
    /// Loads all redirect rows for the configured domain, in arrival order.
    ///
    /// Must complete within a single query/connection lifecycle. On failure no
    /// rows are returned.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Database`] if the store is unreachable, the query
    /// fails, or a row cannot be decoded.
    async fn load_all(&self) -> Result<Vec<Redirect>, LoadError>;
}
