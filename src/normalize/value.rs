//! Lenient field access over `serde_json::Value`
//!
//! Model output and database records disagree on key spelling and value types.
//! These helpers coerce instead of failing: a wrong type yields `None` (or 0),
//! never an error.

use serde_json::Value;

/// Values that mean "nothing here" even though a string was supplied
const PLACEHOLDERS: &[&str] = &[
    "",
    "-",
    "—",
    "n/a",
    "na",
    "none",
    "null",
    "unknown",
    "not found",
    "not available",
    "not specified",
    "not applicable",
];

/// Check whether text is a placeholder such as "Unknown", "N/A" or `<name>`
pub fn is_placeholder(text: &str) -> bool {
    let trimmed = text.trim().trim_end_matches('.');
    let lower = trimmed.to_lowercase();
    PLACEHOLDERS.contains(&lower.as_str()) || (trimmed.starts_with('<') && trimmed.ends_with('>'))
}

/// Render a scalar as text; arrays, objects and null are `None`
pub fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// First non-placeholder string among `keys`
pub fn string_field(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| value.get(*key))
        .filter_map(as_text)
        .find(|s| !is_placeholder(s))
}

/// First value among `keys` that coerces to an integer
pub fn int_field(value: &Value, keys: &[&str]) -> Option<i64> {
    keys.iter()
        .filter_map(|key| value.get(*key))
        .find_map(as_int)
}

/// Coerce a number or numeric string to an integer
pub fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
            cleaned
                .parse::<i64>()
                .ok()
                .or_else(|| cleaned.parse::<f64>().ok().map(|f| f as i64))
        }
        _ => None,
    }
}

/// Coerce noisy counts such as `"1,234 followers"` to an integer, 0 on failure
pub fn coerce_count(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Some(Value::String(s)) => {
            let digits: String = s
                .trim()
                .chars()
                .skip_while(|c| !c.is_ascii_digit())
                .take_while(|c| c.is_ascii_digit() || *c == ',')
                .filter(char::is_ascii_digit)
                .collect();
            digits.parse().unwrap_or(0)
        }
        _ => 0,
    }
}

/// First http(s) URL among `keys`
pub fn url_field(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| value.get(*key))
        .filter_map(as_text)
        .find(|s| is_http_url(s))
}

/// Check whether text looks like an absolute http(s) URL
pub fn is_http_url(text: &str) -> bool {
    let lower = text.trim().to_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Array under the first matching key, or empty
pub fn array_field<'a>(value: &'a Value, keys: &[&str]) -> &'a [Value] {
    keys.iter()
        .filter_map(|key| value.get(*key))
        .find_map(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}
