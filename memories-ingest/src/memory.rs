//! The canonical Memory record

use serde::{Deserialize, Serialize};

/// One tagged, located, dated multimedia experience
///
/// Fully self-contained; serialized with camelCase keys for the gallery client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Memory {
    pub id: String,
    pub title: String,
    pub country: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Canonical ISO-8601 text, or the original text when unrecognized
    pub date: String,
    pub description: String,
    pub categories: Vec<String>,
    /// Sub-filter within a category; absent when the row has none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    pub photo_files: Vec<String>,
    #[serde(default)]
    pub video_files: Vec<String>,
    #[serde(default)]
    pub audio_files: Vec<String>,
}
