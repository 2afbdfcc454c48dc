// src/clean/fields.rs
//
// Per-field cleaning rules. Each helper takes the already-trimmed raw value
// and owns exactly one column's coercion policy.

/// Empty location becomes an explicit absent marker.
pub fn clean_location(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Strip every character that is not a digit or `.`, then parse as float.
/// Currency symbols, thousands separators and signs are all discarded, so a
/// negative price comes out positive; an empty or unparseable remainder
/// collapses to 0.0.
pub fn clean_price(value: &str) -> f64 {
    let digits: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    digits.parse().unwrap_or(0.0)
}

/// Normalize `/`-separated dates to `-`. Anything else passes through
/// untouched; calendar validity is checked later, at derivation time.
pub fn clean_date(value: &str) -> String {
    if value.contains('/') {
        value.replace('/', "-")
    } else {
        value.to_string()
    }
}

/// Parse a quantity as an integer; negatives and garbage collapse to 0.
pub fn clean_quantity(value: &str) -> i64 {
    match value.parse::<i64>() {
        Ok(v) if v >= 0 => v,
        _ => 0,
    }
}
