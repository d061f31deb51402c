//! The refreshable redirect cache and its lifecycle.
//!
//! - [`RedirectCache`] - Snapshot holder with lock-free lookup and atomic reload
//! - [`CacheRegistry`] - One shared cache per domain, provisioned exactly once

mod redirect_cache;
mod registry;

pub use redirect_cache::{CacheStatus, Lookup, RedirectCache};
pub use registry::{CacheRegistry, Provisioned, ReloadOutcome};
