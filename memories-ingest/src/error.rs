//! Error types for the ingest pipeline
//!
//! Only whole-file failures are errors. Per-row anomalies are absorbed by the
//! builder's defaulting rules and surface, at most, as [`crate::FieldWarning`]s.

use thiserror::Error;

/// Result type for ingest operations
pub type Result<T> = std::result::Result<T, IngestError>;

/// Whole-file ingest failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IngestError {
    /// Filename extension is not `.xlsx`, `.xls` or `.csv`
    #[error("Unsupported file format: {filename}. Please upload .xlsx, .xls, or .csv file")]
    UnsupportedFormat { filename: String },

    /// Bytes could not be opened as a workbook at all
    #[error("Malformed {format} file: {reason}")]
    Malformed { format: &'static str, reason: String },
}
