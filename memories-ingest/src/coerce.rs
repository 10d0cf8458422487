//! Lenient numeric coercion for coordinate cells

use once_cell::sync::Lazy;
use regex::Regex;

use crate::cell::CellValue;

/// Longest leading float literal, after leading whitespace
static FLOAT_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(Infinity|(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?)")
        .expect("float prefix pattern is valid")
});

/// Parse the leading numeric prefix of a string
///
/// `"10.5abc"` → `Some(10.5)`, `"  -3"` → `Some(-3.0)`, `"abc"` → `None`.
/// `"1e"` reads as `1` because the exponent is incomplete.
pub fn parse_float_prefix(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let literal = FLOAT_PREFIX.find(text)?.as_str();

    match literal.trim_start_matches(['+', '-']) {
        "Infinity" if literal.starts_with('-') => Some(f64::NEG_INFINITY),
        "Infinity" => Some(f64::INFINITY),
        _ => literal.parse().ok(),
    }
}

/// Coerce a cell to a finite number
///
/// Numeric cells are taken as-is, everything else goes through
/// [`parse_float_prefix`] on its text form. Non-finite results are `None`.
pub fn coerce_number(cell: &CellValue) -> Option<f64> {
    let value = match cell {
        CellValue::Number(n) => Some(*n),
        CellValue::Bool(_) | CellValue::DateTime(_) => None,
        CellValue::Text(s) => parse_float_prefix(s),
    }?;

    value.is_finite().then_some(value)
}
