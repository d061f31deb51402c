//! HTTP request handlers.
//!
//! - [`redirect`] - Public request pipeline
//! - [`reload`], [`status`], [`health`] - Admin endpoints

pub mod health;
pub mod redirect;
pub mod reload;
pub mod status;

pub use health::health_handler;
pub use redirect::redirect_handler;
pub use reload::{reload_all_handler, reload_domain_handler};
pub use status::status_handler;
