//! Core domain entities.
//!
//! - [`Redirect`] - A source key to destination mapping loaded from the store
//! - [`NewRedirect`] - Data for inserting a redirect row (operator CLI)

pub mod redirect;

pub use redirect::{NewRedirect, Redirect};
