//! Ingest entry points: bytes + filename → ordered Memory collection
//!
//! The only error that leaves this module is a whole-file one (unsupported
//! extension, unreadable workbook). Row-level problems are absorbed by the
//! builder and, with [`ingest_with_report`], reported as warnings.

use serde::Serialize;

use crate::builder::{build_memory, build_memory_with_warnings, FieldWarning};
use crate::decoder::{decode, SourceFormat};
use crate::error::Result;
use crate::memory::Memory;

/// A field warning tied to the row that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowWarning {
    /// Zero-based index into the output collection (header excluded)
    pub row: usize,
    /// Memory id of that row, for display
    pub id: String,
    #[serde(flatten)]
    pub warning: FieldWarning,
}

/// Parsed memories plus every data-quality warning raised on the way
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IngestReport {
    pub memories: Vec<Memory>,
    pub warnings: Vec<RowWarning>,
}

/// Parse a memories file; row order is preserved
pub fn ingest(bytes: &[u8], filename: &str) -> Result<Vec<Memory>> {
    let format = SourceFormat::from_filename(filename)?;
    let rows = decode(bytes, format)?;
    Ok(rows.iter().map(build_memory).collect())
}

/// Parse a memories file and collect field warnings alongside the records
pub fn ingest_with_report(bytes: &[u8], filename: &str) -> Result<IngestReport> {
    let format = SourceFormat::from_filename(filename)?;
    ingest_decoded(bytes, format)
}

pub(crate) fn ingest_decoded(bytes: &[u8], format: SourceFormat) -> Result<IngestReport> {
    let rows = decode(bytes, format)?;

    let mut report = IngestReport {
        memories: Vec::with_capacity(rows.len()),
        warnings: Vec::new(),
    };

    for (index, row) in rows.iter().enumerate() {
        let (memory, warnings) = build_memory_with_warnings(row);
        for warning in warnings {
            tracing::debug!(row = index, id = %memory.id, "{}", warning);
            report.warnings.push(RowWarning {
                row: index,
                id: memory.id.clone(),
                warning,
            });
        }
        report.memories.push(memory);
    }

    if !report.warnings.is_empty() {
        tracing::info!(
            rows = report.memories.len(),
            warnings = report.warnings.len(),
            "Ingested memories with field warnings"
        );
    }

    Ok(report)
}
