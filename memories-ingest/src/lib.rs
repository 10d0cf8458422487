//! # Memories Ingest
//!
//! Turns an uploaded spreadsheet or CSV file into the ordered collection of
//! [`Memory`] records served to the gallery.
//!
//! Pipeline stages (leaf to root):
//! - [`decoder`]: raw bytes → loosely-typed row mappings
//! - [`resolver`]: alias resolution of domain fields per row
//! - [`dates`]: heterogeneous date values → canonical ISO-8601 text
//! - [`lists`]: comma-separated fields → ordered token sequences
//! - [`builder`]: row mapping → [`Memory`] (plus field warnings)
//! - [`pipeline`]: `ingest(bytes, filename)` entry points
//! - [`cache`]: optional content-hash cache of parsed results
//!
//! Everything here is synchronous and holds no shared state except inside
//! an explicitly constructed [`IngestCache`].

pub mod builder;
pub mod cache;
pub mod cell;
pub mod coerce;
pub mod dates;
pub mod decoder;
pub mod error;
pub mod lists;
pub mod memory;
pub mod pipeline;
pub mod resolver;

pub use builder::{build_memory, build_memory_with_warnings, FieldWarning};
pub use cache::IngestCache;
pub use cell::{CellValue, RowMap};
pub use decoder::{decode, SourceFormat};
pub use error::{IngestError, Result};
pub use memory::Memory;
pub use pipeline::{ingest, ingest_with_report, IngestReport, RowWarning};
