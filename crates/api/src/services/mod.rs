//! Business logic services.

pub mod access;
pub mod auth;
