//! Comma-separated list fields (media filenames, category tags)
//!
//! There is no escaping: a token that itself contains a comma cannot be
//! represented and is split like any other.

/// Split a raw list field into trimmed, non-empty tokens
///
/// Order and duplicates are preserved.
pub fn split_list(raw: Option<&str>) -> Vec<String> {
    match raw {
        None => Vec::new(),
        Some(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect(),
    }
}
