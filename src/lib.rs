//! # Redirecter
//!
//! A hot-reloadable redirect table backed by PostgreSQL and served with Axum.
//!
//! Every inbound request is looked up in an in-memory snapshot of the
//! `redirects` table. The snapshot is swapped atomically on reload, so lookups
//! never block on the database and never see a half-updated table.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Redirect rows, snapshots and the repository trait
//! - **Application Layer** ([`application`]) - The redirect cache, its registry and reload worker
//! - **Infrastructure Layer** ([`infrastructure`]) - PostgreSQL repository
//! - **API Layer** ([`api`]) - Redirect pipeline and admin endpoints
//!
//! ## Quick Start
//!
//! ```bash
//! export DB_USER=postgres DB_PASSWORD=secret DB_NAME=redirects
//! cargo run --bin redirecter-admin -- db migrate
//! cargo run --bin redirecter-admin -- redirect add /old-page /new-page
//! cargo run
//! curl -X POST http://127.0.0.1:2019/redirecter/reload
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::cache::{CacheRegistry, Lookup, RedirectCache};
    pub use crate::config::{CacheConfig, DatabaseConfig, KeyMode};
    pub use crate::domain::Snapshot;
    pub use crate::domain::entities::Redirect;
    pub use crate::domain::repositories::RedirectRepository;
    pub use crate::error::{AppError, ConfigError, LoadError, ReloadError};
    pub use crate::state::{AppState, CacheRouting};
}
