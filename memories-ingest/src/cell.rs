//! Loosely-typed cell values and row mappings
//!
//! A [`RowMap`] is one decoded spreadsheet/CSV row: header name → cell.
//! Empty workbook cells are never inserted. CSV rows keep empty fields as
//! empty text, which alias resolution treats as absent, so "absent" and
//! "empty cell" end up the same thing for every later stage.

use chrono::NaiveDateTime;
use std::collections::HashMap;
use std::fmt;

use crate::dates::format_iso;

/// A single decoded cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Text cell (every CSV field is text)
    Text(String),
    /// Numeric spreadsheet cell
    Number(f64),
    /// Boolean spreadsheet cell
    Bool(bool),
    /// Date/time spreadsheet cell, materialized as a calendar value
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// True for text cells holding exactly the empty string
    ///
    /// Alias resolution treats these as absent so the next alias can win.
    pub fn is_blank(&self) -> bool {
        matches!(self, CellValue::Text(s) if s.is_empty())
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => f.write_str(s),
            // f64 Display already drops a zero fraction (1.0 → "1")
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::DateTime(dt) => f.write_str(&format_iso(dt)),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(dt: NaiveDateTime) -> Self {
        CellValue::DateTime(dt)
    }
}

/// One decoded row: header name → cell value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowMap {
    cells: HashMap<String, CellValue>,
}

impl RowMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a cell; later inserts for the same key replace earlier ones
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<CellValue>) {
        self.cells.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.cells.get(key)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RowMap
where
    K: Into<String>,
    V: Into<CellValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = RowMap::new();
        for (key, value) in iter {
            row.insert(key, value);
        }
        row
    }
}
