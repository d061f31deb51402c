//! Application layer: the redirect cache and the tasks that refresh it.
//!
//! - [`cache::RedirectCache`] - Lock-free lookups over an atomically swapped snapshot
//! - [`cache::CacheRegistry`] - Exactly-once provisioning and the reload trigger
//! - [`reload_worker::run_reload_worker`] - Optional scheduled reloads

pub mod cache;
pub mod reload_worker;
