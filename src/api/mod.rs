//! HTTP layer: the redirect pipeline and the administrative interface.
//!
//! - [`dto`] - Response serialization for admin endpoints
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Admin authentication and request tracing
//! - [`routes`] - Route configuration

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
