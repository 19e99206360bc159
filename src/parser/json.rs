//! Locate and parse JSON embedded in model replies

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

use crate::utils::error::ParseError;

/// Expected top-level JSON shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonShape {
    /// `[ ... ]`
    Array,
    /// `{ ... }`
    Object,
    /// Whichever bracket opens first
    Any,
}

impl JsonShape {
    fn brackets(self, text: &str) -> Option<(char, char)> {
        match self {
            Self::Array => Some(('[', ']')),
            Self::Object => Some(('{', '}')),
            Self::Any => match (text.find('['), text.find('{')) {
                (Some(a), Some(o)) if a < o => Some(('[', ']')),
                (_, Some(_)) => Some(('{', '}')),
                (Some(_), None) => Some(('[', ']')),
                (None, None) => None,
            },
        }
    }
}

/// Content of the first fenced code block, if any
pub fn strip_code_fences(text: &str) -> &str {
    if let Some(start) = text.find("```json") {
        if let Some(end) = text[start + 7..].find("```") {
            return text[start + 7..start + 7 + end].trim();
        }
    }

    if let Some(start) = text.find("```") {
        let after_start = &text[start + 3..];
        // Skip language identifier if present
        let content_start = after_start.find('\n').map_or(0, |i| i + 1);
        if let Some(end) = after_start[content_start..].find("```") {
            return after_start[content_start..content_start + end].trim();
        }
    }

    text.trim()
}

/// Slice from the first opening bracket to the last matching closer
fn locate(text: &str, shape: JsonShape) -> Option<&str> {
    let (open, close) = shape.brackets(text)?;
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

/// Remove commas directly before a closing bracket
fn remove_trailing_commas(json: &str) -> String {
    static TRAILING_COMMA_RE: OnceLock<Regex> = OnceLock::new();

    let re = TRAILING_COMMA_RE
        .get_or_init(|| Regex::new(r",\s*([\]}])").expect("Invalid regex pattern"));
    re.replace_all(json, "$1").into_owned()
}

/// Extract JSON of the given shape from free text
///
/// Strips code fences, slices from the first opening bracket to the last
/// closer, parses strictly and retries once without trailing commas.
pub fn extract_json(text: &str, shape: JsonShape) -> Result<Value, ParseError> {
    if text.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let candidates = [strip_code_fences(text), text];
    let mut last_error = None;

    for candidate in candidates {
        let Some(slice) = locate(candidate, shape) else {
            continue;
        };

        match serde_json::from_str::<Value>(slice) {
            Ok(value) => return Ok(value),
            Err(e) => {
                if let Ok(value) = serde_json::from_str::<Value>(&remove_trailing_commas(slice)) {
                    return Ok(value);
                }
                last_error = Some(e.to_string());
            }
        }
    }

    match last_error {
        Some(e) => Err(ParseError::InvalidJson(e)),
        None => Err(ParseError::NoJson),
    }
}
