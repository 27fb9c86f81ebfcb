//! API Controller modules
//!
//! Controllers organized by domain.

pub mod auth;
pub mod pricing;
pub mod profile;
pub mod reservations;
pub mod subscribe;
