//! Access-code authentication
//!
//! The gallery is gated by one shared access code. The configured code is
//! kept only as a SHA-256 digest and compared in constant time. An absent or
//! empty configured code disables checking entirely.
//!
//! Pure functions only; the HTTP middleware lives in the server crate.

use sha2::{Digest, Sha256};
use std::fmt;
use thiserror::Error;

/// Header carrying the access code on every protected request
pub const ACCESS_CODE_HEADER: &str = "x-access-code";

/// Access-code validation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("Access code required")]
    Missing,

    #[error("Invalid access code")]
    Invalid,
}

/// SHA-256 of an access code, hex-encoded
pub fn hash_access_code(code: &str) -> String {
    format!("{:x}", Sha256::digest(code.as_bytes()))
}

/// Check a presented code against a stored [`hash_access_code`] digest
pub fn verify_access_code(provided: &str, expected_digest: &str) -> bool {
    constant_time_eq(
        hash_access_code(provided).as_bytes(),
        expected_digest.as_bytes(),
    )
}

/// Gate deciding whether a request may proceed
#[derive(Clone, PartialEq, Eq)]
pub enum AccessGate {
    /// No code configured; every request passes
    Disabled,
    /// Requests must present a code with this hex digest
    Required { digest: String },
}

impl AccessGate {
    /// Build a gate from the configured code
    pub fn from_code(code: Option<&str>) -> Self {
        match code {
            Some(code) if !code.is_empty() => AccessGate::Required {
                digest: hash_access_code(code),
            },
            _ => AccessGate::Disabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, AccessGate::Required { .. })
    }

    /// Check a presented code against the gate
    pub fn verify(&self, provided: Option<&str>) -> Result<(), AccessError> {
        let AccessGate::Required { digest } = self else {
            return Ok(());
        };

        let provided = provided.ok_or(AccessError::Missing)?;

        if verify_access_code(provided, digest) {
            Ok(())
        } else {
            Err(AccessError::Invalid)
        }
    }
}

// Never print the digest
impl fmt::Debug for AccessGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessGate::Disabled => f.write_str("AccessGate::Disabled"),
            AccessGate::Required { .. } => f.write_str("AccessGate::Required(..)"),
        }
    }
}

/// Byte comparison that does not stop at the first difference
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
