//! PostgreSQL repository implementations.
//!
//! - [`PgRedirectRepository`] - Redirect table loading and operator writes

pub mod pg_redirect_repository;

pub use pg_redirect_repository::PgRedirectRepository;
