//! API-facing primitives shared by HTTP modules
//!
//! No HTTP framework dependencies here; the server crate adapts these.

pub mod auth;
pub mod types;
