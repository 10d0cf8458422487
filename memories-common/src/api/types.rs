//! JSON response envelopes
//!
//! Every API response carries a `success` flag. Successful payloads are
//! flattened next to it:
//!
//! ```json
//! { "success": true, "memories": [] }
//! { "success": false, "error": "File not found" }
//! ```

use serde::{Deserialize, Serialize};

/// Successful response: `success: true` plus the payload's fields
#[derive(Debug, Clone, Serialize)]
pub struct Success<T> {
    success: bool,
    #[serde(flatten)]
    pub data: T,
}

impl<T: Serialize> Success<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Failed response: `success: false` plus a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    pub success: bool,
    pub error: String,
}

impl Failure {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

/// Payload-free acknowledgement with a human-readable message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}
