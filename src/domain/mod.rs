//! Domain layer containing the redirect model.
//!
//! - [`entities`] - Redirect rows
//! - [`snapshot`] - Immutable redirect table built by one load
//! - [`repositories`] - Backing-store trait definitions
//!
//! The domain layer has no dependencies on infrastructure or HTTP concerns.

pub mod entities;
pub mod repositories;
pub mod snapshot;

pub use snapshot::Snapshot;
