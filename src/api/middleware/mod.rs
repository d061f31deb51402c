//! HTTP middleware for request processing and protection.

pub mod admin_auth;
pub mod tracing;
