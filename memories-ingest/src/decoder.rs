//! Tabular decoder: raw bytes → ordered row mappings
//!
//! Knows nothing about memories. Spreadsheets contribute their first sheet
//! only; the first row is the header. CSV is read with the header row as keys
//! and every field as text.

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::NaiveDateTime;
use std::collections::HashSet;
use std::io::Cursor;

use crate::cell::{CellValue, RowMap};
use crate::error::{IngestError, Result};

/// Header used for blank header cells
const EMPTY_HEADER: &str = "__EMPTY";

/// CSV field separators recognized, in tie-break order
const CSV_DELIMITERS: [u8; 4] = [b',', b'\t', b'|', b';'];

/// Decoding path selected from the source filename
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    /// `.xlsx` or `.xls` workbook (container is sniffed from the bytes)
    Spreadsheet,
    /// `.csv` text
    Csv,
}

impl SourceFormat {
    /// Choose a format from the filename suffix (case-insensitive)
    pub fn from_filename(filename: &str) -> Result<Self> {
        let lower = filename.to_lowercase();
        if lower.ends_with(".xlsx") || lower.ends_with(".xls") {
            Ok(SourceFormat::Spreadsheet)
        } else if lower.ends_with(".csv") {
            Ok(SourceFormat::Csv)
        } else {
            Err(IngestError::UnsupportedFormat {
                filename: filename.to_string(),
            })
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SourceFormat::Spreadsheet => "spreadsheet",
            SourceFormat::Csv => "CSV",
        }
    }
}

/// Decode a byte buffer into row mappings, preserving source row order
pub fn decode(bytes: &[u8], format: SourceFormat) -> Result<Vec<RowMap>> {
    let rows = match format {
        SourceFormat::Spreadsheet => decode_spreadsheet(bytes)?,
        SourceFormat::Csv => decode_csv(bytes)?,
    };

    tracing::debug!(
        format = format.name(),
        bytes = bytes.len(),
        rows = rows.len(),
        "Decoded tabular source"
    );

    Ok(rows)
}

fn decode_spreadsheet(bytes: &[u8]) -> Result<Vec<RowMap>> {
    let malformed = |reason: String| IngestError::Malformed {
        format: SourceFormat::Spreadsheet.name(),
        reason,
    };

    let mut workbook =
        open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|e| malformed(e.to_string()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| malformed("workbook has no sheets".to_string()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| malformed(format!("cannot read sheet '{}': {}", sheet_name, e)))?;

    let mut sheet_rows = range.rows();
    let Some(header_cells) = sheet_rows.next() else {
        return Ok(Vec::new());
    };

    let headers = disambiguate_headers(
        header_cells
            .iter()
            .map(|cell| convert_cell(cell).map(|v| v.to_string()).unwrap_or_default())
            .collect(),
    );

    let mut rows = Vec::new();
    for cells in sheet_rows {
        let mut row = RowMap::new();
        for (name, cell) in headers.iter().zip(cells) {
            if let Some(value) = convert_cell(cell) {
                row.insert(name.clone(), value);
            }
        }
        // Fully blank rows are not records
        if !row.is_empty() {
            rows.push(row);
        }
    }

    Ok(rows)
}

/// Map a workbook cell onto [`CellValue`]; `None` for empty cells
fn convert_cell(cell: &Data) -> Option<CellValue> {
    match cell {
        Data::Empty => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(CellValue::Text(s.clone())),
        Data::Float(f) => Some(CellValue::Number(*f)),
        Data::Int(i) => Some(CellValue::Number(*i as f64)),
        Data::Bool(b) => Some(CellValue::Bool(*b)),
        Data::DateTime(dt) => Some(match dt.as_datetime() {
            Some(native) => CellValue::DateTime(native),
            None => CellValue::Number(dt.as_f64()),
        }),
        Data::DateTimeIso(s) => Some(
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                .map(CellValue::DateTime)
                .unwrap_or_else(|_| CellValue::Text(s.clone())),
        ),
        Data::DurationIso(s) => Some(CellValue::Text(s.clone())),
        Data::Error(e) => Some(CellValue::Text(e.to_string())),
    }
}

fn decode_csv(bytes: &[u8]) -> Result<Vec<RowMap>> {
    let malformed = |e: csv::Error| IngestError::Malformed {
        format: SourceFormat::Csv.name(),
        reason: e.to_string(),
    };

    let text = String::from_utf8_lossy(bytes);
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);

    let delimiter = detect_delimiter(text);
    if delimiter != b',' {
        tracing::debug!(
            delimiter = %(delimiter as char).escape_default(),
            "Detected CSV delimiter"
        );
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());
    let mut records = reader.records();

    let headers = match records.next() {
        Some(record) => {
            let record = record.map_err(malformed)?;
            disambiguate_headers(record.iter().map(str::to_string).collect())
        }
        None => return Ok(Vec::new()),
    };

    let mut rows = Vec::new();
    for record in records {
        let record = record.map_err(malformed)?;
        if record.len() == 1 && record[0].is_empty() {
            continue;
        }

        // Short rows leave trailing columns absent; extra fields are dropped
        let row: RowMap = headers
            .iter()
            .zip(record.iter())
            .map(|(name, field)| (name.clone(), field))
            .collect();
        rows.push(row);
    }

    Ok(rows)
}

/// Pick the field separator from the header line
///
/// Counts each candidate outside double quotes on the first non-blank line;
/// the most frequent wins, ties going to the earlier candidate. Falls back
/// to `,` when no candidate occurs.
fn detect_delimiter(text: &str) -> u8 {
    let Some(header) = text.lines().find(|line| !line.trim().is_empty()) else {
        return b',';
    };

    let mut counts = [0usize; CSV_DELIMITERS.len()];
    let mut in_quotes = false;
    for byte in header.bytes() {
        if byte == b'"' {
            in_quotes = !in_quotes;
        } else if !in_quotes {
            if let Some(i) = CSV_DELIMITERS.iter().position(|&d| d == byte) {
                counts[i] += 1;
            }
        }
    }

    let best = (1..counts.len()).fold(0, |best, i| if counts[i] > counts[best] { i } else { best });

    if counts[best] == 0 {
        b','
    } else {
        CSV_DELIMITERS[best]
    }
}

/// Make header names unique and non-empty
///
/// Blank headers become `__EMPTY`; repeats of a name get `_1`, `_2`, ...
/// appended in column order.
fn disambiguate_headers(raw: Vec<String>) -> Vec<String> {
    let mut used = HashSet::new();
    let mut headers = Vec::with_capacity(raw.len());

    for name in raw {
        let base = if name.is_empty() {
            EMPTY_HEADER.to_string()
        } else {
            name
        };

        let mut candidate = base.clone();
        let mut suffix = 0;
        while used.contains(&candidate) {
            suffix += 1;
            candidate = format!("{}_{}", base, suffix);
        }

        used.insert(candidate.clone());
        headers.push(candidate);
    }

    headers
}
