//! PostgreSQL implementation of the redirect repository.

use async_trait::async_trait;
use sqlx::postgres::PgConnectOptions;
use sqlx::{Connection, PgConnection};
use tracing::debug;

use crate::config::CacheConfig;
use crate::domain::entities::{NewRedirect, Redirect};
use crate::domain::repositories::RedirectRepository;
use crate::error::LoadError;
use crate::utils::extract_domain::normalize_domain;

/// PostgreSQL repository for the `redirects` table.
///
/// Holds connection options rather than a pool: every call opens one
/// connection, runs its statement and closes it, so a reload never keeps a
/// connection alive between runs.
pub struct PgRedirectRepository {
    connect_options: PgConnectOptions,
    domain: Option<String>,
}

impl PgRedirectRepository {
    /// Creates a repository for the connection and domain of `config`.
    pub fn new(config: &CacheConfig) -> Self {
        Self::with_connect_options(config.database.connect_options(), config.domain.clone())
    }

    pub fn with_connect_options(connect_options: PgConnectOptions, domain: Option<String>) -> Self {
        Self {
            connect_options,
            domain: domain.map(|d| normalize_domain(&d)),
        }
    }

    async fn connect(&self) -> Result<PgConnection, sqlx::Error> {
        PgConnection::connect_with(&self.connect_options).await
    }

    /// Inserts a redirect row.
    ///
    /// Rows are appended; a later row with the same source wins at the next load.
    /// The domain is stored normalized.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`sqlx::Error`] on connection or query failure.
    pub async fn insert(&self, new_redirect: &NewRedirect) -> Result<i64, sqlx::Error> {
        let mut conn = self.connect().await?;
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO redirects (domain, src_path, dest_path)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(new_redirect.domain.as_deref().map(normalize_domain))
        .bind(&new_redirect.source)
        .bind(&new_redirect.destination)
        .fetch_one(&mut conn)
        .await?;
        conn.close().await?;
        Ok(id)
    }

    /// Deletes every row for `source` in `domain` (`None` matches unscoped rows).
    /// Domains compare case-insensitively.
    ///
    /// Returns the number of rows removed.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`sqlx::Error`] on connection or query failure.
    pub async fn delete(&self, source: &str, domain: Option<&str>) -> Result<u64, sqlx::Error> {
        let mut conn = self.connect().await?;
        let result = sqlx::query(
            r#"
            DELETE FROM redirects
            WHERE src_path = $1 AND lower(domain) IS NOT DISTINCT FROM lower($2)
            "#,
        )
        .bind(source)
        .bind(domain)
        .execute(&mut conn)
        .await?;
        conn.close().await?;
        Ok(result.rows_affected())
    }

    /// Opens and pings a connection.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`sqlx::Error`] if the database is unreachable.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        let mut conn = self.connect().await?;
        conn.ping().await?;
        conn.close().await
    }
}

#[async_trait]
impl RedirectRepository for PgRedirectRepository {
    async fn load_all(&self) -> Result<Vec<Redirect>, LoadError> {
        let mut conn = self.connect().await?;

        let rows: Vec<(String, String)> = sqlx::query_as(
            r#"
            SELECT src_path, dest_path
            FROM redirects
            WHERE ($1::text IS NULL OR lower(domain) = $1)
            ORDER BY id
            "#,
        )
        .bind(self.domain.as_deref())
        .fetch_all(&mut conn)
        .await?;

        if let Err(e) = conn.close().await {
            debug!(error = %e, "Failed to close redirect load connection cleanly");
        }

        Ok(rows
            .into_iter()
            .map(|(source, destination)| Redirect {
                source,
                destination,
            })
            .collect())
    }
}
