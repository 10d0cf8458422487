//! Date normalization
//!
//! Every date value the spreadsheet can hold is reduced to one string:
//! the canonical ISO-8601 form (`YYYY-MM-DDTHH:MM:SS.sssZ`) when the value is
//! recognized, otherwise the trimmed original text. Nothing here fails.
//!
//! **Algorithm** (first match wins):
//! 1. Absent/empty → `""`
//! 2. Native date cell → canonical form
//! 3. Stringify and trim; empty → `""`
//! 4. `D/M/YY` or `D/M/YYYY` → canonical form of that calendar day at midnight
//!    (two-digit years pivot at 50: `49` → 2049, `50` → 1950)
//! 5. Generic date formats (RFC 3339, ISO, RFC 2822, month names, month-year,
//!    bare four-digit year) → canonical form
//! 6. Anything else → the trimmed text verbatim ("Summer 2019" stays as is)

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::cell::CellValue;

/// Two-digit years below this map to 20xx, the rest to 19xx
const TWO_DIGIT_YEAR_PIVOT: i32 = 50;

static SLASH_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{2,4})$").expect("slash date pattern is valid")
});

/// Date-time layouts tried without an offset (interpreted as UTC)
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

/// Date-only layouts
const NAIVE_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%B %d %Y",
    "%b %d, %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%d %B, %Y",
    "%A, %B %d, %Y",
    "%a %b %d %Y",
    "%m-%d-%Y",
    "%Y.%m.%d",
];

/// Month-precision layouts, resolved to the first day of the month
const MONTH_FORMATS: &[&str] = &["%B %Y", "%b %Y", "%Y-%m", "%Y/%m"];

/// Outcome of normalizing one date value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateOutcome {
    /// No value, or only whitespace
    Empty,
    /// Recognized; holds the canonical ISO-8601 string
    Parsed(String),
    /// Not recognized; holds the trimmed original text
    Verbatim(String),
}

impl DateOutcome {
    pub fn into_string(self) -> String {
        match self {
            DateOutcome::Empty => String::new(),
            DateOutcome::Parsed(s) | DateOutcome::Verbatim(s) => s,
        }
    }
}

/// Normalize a date cell to its canonical string (never fails)
pub fn normalize_date(value: Option<&CellValue>) -> String {
    classify_date(value).into_string()
}

/// Normalize a date cell, reporting whether it was recognized
pub fn classify_date(value: Option<&CellValue>) -> DateOutcome {
    let text = match value {
        None => return DateOutcome::Empty,
        Some(CellValue::DateTime(dt)) => return DateOutcome::Parsed(format_iso(dt)),
        Some(other) => other.to_string(),
    };

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return DateOutcome::Empty;
    }

    if let Some(captures) = SLASH_DATE.captures(trimmed) {
        let day: i64 = captures[1].parse().unwrap_or_default();
        let month: i64 = captures[2].parse().unwrap_or_default();
        let year: i32 = captures[3].parse().unwrap_or_default();
        // Rendered as UTC midnight, not server-local midnight, so the output
        // does not depend on the host timezone
        if let Some(date) = calendar_date(expand_two_digit_year(year), month, day) {
            return DateOutcome::Parsed(format_iso(&date.and_time(NaiveTime::MIN)));
        }
    }

    match parse_generic(trimmed) {
        Some(dt) => DateOutcome::Parsed(format_iso(&dt)),
        None => DateOutcome::Verbatim(trimmed.to_string()),
    }
}

/// Canonical ISO-8601 rendering, UTC with millisecond precision
pub fn format_iso(dt: &NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Apply the two-digit year pivot; other widths pass through unchanged
pub fn expand_two_digit_year(year: i32) -> i32 {
    if year >= 100 {
        year
    } else if year < TWO_DIGIT_YEAR_PIVOT {
        2000 + year
    } else {
        1900 + year
    }
}

/// Build a calendar date, rolling out-of-range components over
///
/// Month 0 is December of the previous year, month 13 January of the next;
/// day 0 is the last day of the previous month, day 31 of a 30-day month is
/// the 1st of the next. `None` only when the result leaves chrono's range.
fn calendar_date(year: i32, month: i64, day: i64) -> Option<NaiveDate> {
    let jan_first = NaiveDate::from_ymd_opt(year, 1, 1)?;

    let month_offset = month - 1;
    let month_start = if month_offset >= 0 {
        jan_first.checked_add_months(Months::new(u32::try_from(month_offset).ok()?))?
    } else {
        jan_first.checked_sub_months(Months::new(u32::try_from(-month_offset).ok()?))?
    };

    month_start.checked_add_signed(Duration::try_days(day - 1)?)
}

/// Generic parsing for already-canonical or otherwise common date text
///
/// Layout-based matches must carry a four-digit year; chrono's `%Y` would
/// otherwise read "15-03-24" as the year 15.
fn parse_generic(text: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.naive_utc());
    }

    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NAIVE_DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
                .or_else(|| parse_month(text))
                .or_else(|| parse_bare_year(text))
                .map(|date| date.and_time(NaiveTime::MIN))
        })
        .filter(|dt| (1000..=9999).contains(&dt.year()))
}

/// "June 2019", "2019-06" → first day of that month
fn parse_month(text: &str) -> Option<NaiveDate> {
    let with_day = format!("{} 1", text);
    MONTH_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(&with_day, &format!("{} %d", format)).ok())
}

/// "2019" → January 1st of that year
fn parse_bare_year(text: &str) -> Option<NaiveDate> {
    if text.len() != 4 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::from_ymd_opt(text.parse().ok()?, 1, 1)
}
