//! Field resolution across alternate column names
//!
//! Spreadsheets in the wild use several names for the same column. Each
//! domain concept has a fixed, ordered list of candidate headers and the first
//! present value wins. An empty text cell counts as absent so a blank
//! `categories` column does not hide a filled `tags` column.
//!
//! Only presence is checked here; coercion happens in the builder.

use crate::cell::{CellValue, RowMap};

/// Category column candidates, highest priority first
pub const CATEGORY_ALIASES: &[&str] = &[
    "categories",
    "Categories",
    "tags",
    "Tags",
    "category",
    "Category",
];

/// Identifier column candidates (sub-filter within a category)
pub const IDENTIFIER_ALIASES: &[&str] = &["identifier", "Identifier"];

pub const PHOTO_ALIASES: &[&str] = &["photo_files", "photoFiles", "photos"];
pub const VIDEO_ALIASES: &[&str] = &["video_files", "videoFiles", "videos"];
pub const AUDIO_ALIASES: &[&str] = &["audio_files", "audioFiles", "audio"];

/// Return the first candidate column holding a non-blank value
pub fn first_present<'a>(row: &'a RowMap, candidates: &[&str]) -> Option<&'a CellValue> {
    candidates
        .iter()
        .filter_map(|key| row.get(key))
        .find(|value| !value.is_blank())
}

/// Domain fields of one row, before coercion
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFields<'a> {
    pub id: Option<&'a CellValue>,
    pub title: Option<&'a CellValue>,
    pub country: Option<&'a CellValue>,
    pub city: Option<&'a CellValue>,
    pub latitude: Option<&'a CellValue>,
    pub longitude: Option<&'a CellValue>,
    pub date: Option<&'a CellValue>,
    pub description: Option<&'a CellValue>,
    pub categories: Option<&'a CellValue>,
    pub identifier: Option<&'a CellValue>,
    pub photos: Option<&'a CellValue>,
    pub videos: Option<&'a CellValue>,
    pub audio: Option<&'a CellValue>,
}

/// Resolve every domain field of a row
pub fn resolve(row: &RowMap) -> ResolvedFields<'_> {
    let single = |key: &str| first_present(row, &[key]);

    ResolvedFields {
        id: single("id"),
        title: single("title"),
        country: single("country"),
        city: single("city"),
        latitude: single("latitude"),
        longitude: single("longitude"),
        date: single("date"),
        description: single("description"),
        categories: first_present(row, CATEGORY_ALIASES),
        identifier: first_present(row, IDENTIFIER_ALIASES),
        photos: first_present(row, PHOTO_ALIASES),
        videos: first_present(row, VIDEO_ALIASES),
        audio: first_present(row, AUDIO_ALIASES),
    }
}
