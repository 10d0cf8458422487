//! # Memories Common Library
//!
//! Shared code for the memories gallery service:
//! - Error type
//! - Configuration loading and root folder resolution
//! - Access-code authentication primitives
//! - JSON response envelopes

pub mod api;
pub mod config;
pub mod error;

pub use error::{Error, Result};
