//! Record builder: one row mapping → one [`Memory`]
//!
//! Never fails. A malformed row yields a low-information but well-typed
//! Memory: missing strings become `""`, unusable coordinates become `0.0`,
//! unrecognized dates are kept as text. Every such substitution can be
//! observed through [`build_memory_with_warnings`] without changing the
//! Memory itself.

use serde::Serialize;
use std::fmt;

use crate::cell::{CellValue, RowMap};
use crate::coerce::coerce_number;
use crate::dates::{classify_date, DateOutcome};
use crate::lists::split_list;
use crate::memory::Memory;
use crate::resolver::resolve;

/// A field-level data-quality note produced while building a Memory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldWarning {
    /// Coordinate column absent or blank; defaulted to 0
    MissingCoordinate { field: &'static str },
    /// Coordinate present but not numeric; defaulted to 0
    UnparseableNumber { field: &'static str, raw: String },
    /// Date text not recognized; kept verbatim
    UnparseableDate { raw: String },
}

impl fmt::Display for FieldWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldWarning::MissingCoordinate { field } => {
                write!(f, "{} missing, defaulted to 0", field)
            }
            FieldWarning::UnparseableNumber { field, raw } => {
                write!(f, "{} unparseable ({:?}), defaulted to 0", field, raw)
            }
            FieldWarning::UnparseableDate { raw } => {
                write!(f, "date unrecognized ({:?}), kept as text", raw)
            }
        }
    }
}

/// Build a Memory from a row mapping
pub fn build_memory(row: &RowMap) -> Memory {
    build_memory_with_warnings(row).0
}

/// Build a Memory and report every default that was applied
pub fn build_memory_with_warnings(row: &RowMap) -> (Memory, Vec<FieldWarning>) {
    let fields = resolve(row);
    let mut warnings = Vec::new();

    let latitude = coordinate("latitude", fields.latitude, &mut warnings);
    let longitude = coordinate("longitude", fields.longitude, &mut warnings);

    let date = match classify_date(fields.date) {
        DateOutcome::Verbatim(raw) => {
            warnings.push(FieldWarning::UnparseableDate { raw: raw.clone() });
            raw
        }
        outcome => outcome.into_string(),
    };

    let memory = Memory {
        id: text(fields.id),
        title: text(fields.title),
        country: text(fields.country),
        city: text(fields.city),
        latitude,
        longitude,
        date,
        description: text(fields.description),
        categories: list(fields.categories),
        identifier: fields.identifier.map(|cell| cell.to_string().trim().to_string()),
        photo_files: list(fields.photos),
        video_files: list(fields.videos),
        audio_files: list(fields.audio),
    };

    (memory, warnings)
}

fn text(cell: Option<&CellValue>) -> String {
    cell.map(|c| c.to_string()).unwrap_or_default()
}

fn list(cell: Option<&CellValue>) -> Vec<String> {
    split_list(cell.map(|c| c.to_string()).as_deref())
}

fn coordinate(
    field: &'static str,
    cell: Option<&CellValue>,
    warnings: &mut Vec<FieldWarning>,
) -> f64 {
    let Some(cell) = cell else {
        warnings.push(FieldWarning::MissingCoordinate { field });
        return 0.0;
    };

    match coerce_number(cell) {
        // Normalizes -0.0 as well
        Some(value) if value != 0.0 => value,
        Some(_) => 0.0,
        None => {
            warnings.push(FieldWarning::UnparseableNumber {
                field,
                raw: cell.to_string(),
            });
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(pairs: &[(&str, &str)]) -> RowMap {
        pairs.iter().map(|(k, v)| (*k, *v)).collect()
    }

    #[test]
    fn test_empty_row_defaults() {
        let (memory, warnings) = build_memory_with_warnings(&RowMap::new());
        assert_eq!(memory.id, "");
        assert_eq!(memory.title, "");
        assert_eq!(memory.latitude, 0.0);
        assert_eq!(memory.longitude, 0.0);
        assert_eq!(memory.date, "");
        assert!(memory.categories.is_empty());
        assert_eq!(memory.identifier, None);
        assert!(memory.photo_files.is_empty());
        assert!(memory.video_files.is_empty());
        assert!(memory.audio_files.is_empty());
        assert_eq!(
            warnings,
            vec![
                FieldWarning::MissingCoordinate { field: "latitude" },
                FieldWarning::MissingCoordinate { field: "longitude" },
            ]
        );
    }

    #[test]
    fn test_bad_latitude_defaults_to_zero() {
        let (memory, warnings) = build_memory_with_warnings(&row(&[
            ("latitude", "not-a-number"),
            ("longitude", "20.25"),
        ]));
        assert_eq!(memory.latitude, 0.0);
        assert_eq!(memory.longitude, 20.25);
        assert_eq!(
            warnings,
            vec![FieldWarning::UnparseableNumber {
                field: "latitude",
                raw: "not-a-number".to_string()
            }]
        );
        assert_eq!(
            warnings[0].to_string(),
            "latitude unparseable (\"not-a-number\"), defaulted to 0"
        );
    }

    #[test]
    fn test_warnings_do_not_change_memory() {
        let r = row(&[("id", "9"), ("latitude", "x"), ("date", "Summer 2019")]);
        let (with_warnings, warnings) = build_memory_with_warnings(&r);
        assert_eq!(build_memory(&r), with_warnings);
        assert_eq!(with_warnings.date, "Summer 2019");
        assert!(warnings.contains(&FieldWarning::UnparseableDate {
            raw: "Summer 2019".to_string()
        }));
    }

    #[test]
    fn test_alias_priority_in_record() {
        let memory = build_memory(&row(&[("tags", "x"), ("categories", "y")]));
        assert_eq!(memory.categories, vec!["y"]);
    }

    #[test]
    fn test_identifier_trimmed_or_absent() {
        assert_eq!(
            build_memory(&row(&[("identifier", "  north  ")])).identifier.as_deref(),
            Some("north")
        );
        assert_eq!(build_memory(&row(&[("identifier", "")])).identifier, None);
        assert_eq!(build_memory(&row(&[("title", "x")])).identifier, None);
    }

    #[test]
    fn test_typed_spreadsheet_cells() {
        let mut r = RowMap::new();
        r.insert("id", 42.0);
        r.insert("latitude", -33.87);
        r.insert("longitude", 151.21);
        r.insert(
            "date",
            NaiveDate::from_ymd_opt(2024, 3, 15)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        );

        let (memory, warnings) = build_memory_with_warnings(&r);
        assert_eq!(memory.id, "42");
        assert_eq!(memory.latitude, -33.87);
        assert_eq!(memory.longitude, 151.21);
        assert!(memory.date.starts_with("2024-03-15"));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_zero_and_negative_zero() {
        let memory = build_memory(&row(&[("latitude", "-0"), ("longitude", "0.0")]));
        assert!(memory.latitude == 0.0 && memory.latitude.is_sign_positive());
        assert_eq!(memory.longitude, 0.0);
    }

    #[test]
    fn test_media_lists() {
        let memory = build_memory(&row(&[
            ("photo_files", "a.jpg, b.jpg,"),
            ("videos", "clip.mp4"),
            ("audioFiles", " , "),
        ]));
        assert_eq!(memory.photo_files, vec!["a.jpg", "b.jpg"]);
        assert_eq!(memory.video_files, vec!["clip.mp4"]);
        assert!(memory.audio_files.is_empty());
    }

    #[test]
    fn test_strings_are_not_trimmed() {
        let memory = build_memory(&row(&[("title", " Trip "), ("city", "Paris")]));
        assert_eq!(memory.title, " Trip ");
        assert_eq!(memory.city, "Paris");
    }
}
