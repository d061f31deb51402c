//! Data Transfer Objects for admin responses.

pub mod health;
pub mod status;
