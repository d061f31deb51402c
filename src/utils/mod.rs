//! Helpers for turning requests into lookup keys and destinations into responses.
//!
//! - [`extract_domain`] - Host and domain extraction from headers
//! - [`request_key`] - Lookup key construction per key mode
//! - [`redirect_target`] - Open-redirect sanitizing of destinations

pub mod extract_domain;
pub mod redirect_target;
pub mod request_key;
