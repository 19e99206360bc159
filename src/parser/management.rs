//! Management roster extraction

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

use super::json::{extract_json, JsonShape};
use crate::models::{dedup_management, ManagementEntry, RoleStatus};
use crate::normalize::value::{array_field, is_placeholder, string_field, url_field};
use crate::utils::error::ParseError;

/// Parse a management roster from a model reply or stored text
///
/// Accepts a JSON array, a `{current: [...], past: [...]}` object, or legacy
/// `Name — Role (Status); ...` text. Result is deduplicated.
pub fn parse_management(raw: &str) -> Vec<ManagementEntry> {
    match try_parse_management(raw) {
        Ok(entries) => entries,
        Err(ParseError::Empty) => Vec::new(),
        Err(e) => {
            tracing::debug!(error = %e, "Management reply is not JSON, trying legacy text");
            parse_legacy_management(raw)
        }
    }
}

/// Parse a JSON management reply
pub fn try_parse_management(raw: &str) -> Result<Vec<ManagementEntry>, ParseError> {
    let value = extract_json(raw, JsonShape::Any)?;
    Ok(management_from_value(&value))
}

/// Decode a roster from any of the known JSON shapes
pub fn management_from_value(value: &Value) -> Vec<ManagementEntry> {
    let entries = match value {
        Value::Array(items) => items.iter().flat_map(entries_from_item).collect(),
        Value::Object(map) if map.contains_key("current") || map.contains_key("past") => {
            let mut entries = with_status(array_field(value, &["current"]), RoleStatus::Current);
            entries.extend(with_status(array_field(value, &["past"]), RoleStatus::Past));
            entries
        }
        Value::Object(_) => {
            let wrapped = array_field(value, &["management", "executives", "top_management"]);
            if wrapped.is_empty() {
                entry_from_value(value).into_iter().collect()
            } else {
                wrapped.iter().flat_map(entries_from_item).collect()
            }
        }
        Value::String(text) => parse_legacy_management(text),
        _ => Vec::new(),
    };
    dedup_management(entries)
}

fn entries_from_item(item: &Value) -> Vec<ManagementEntry> {
    match item {
        Value::String(text) => parse_legacy_management(text),
        other => entry_from_value(other).into_iter().collect(),
    }
}

fn with_status(items: &[Value], status: RoleStatus) -> Vec<ManagementEntry> {
    items
        .iter()
        .flat_map(entries_from_item)
        .map(|mut entry| {
            entry.status = status;
            entry
        })
        .collect()
}

/// Decode one entry; the legacy `role` key is read as the position
pub fn entry_from_value(value: &Value) -> Option<ManagementEntry> {
    let name = string_field(value, &["name", "Name", "full_name"])?;
    let position = string_field(value, &["position", "role", "title", "Position", "job_title"])?;
    let status = string_field(value, &["status", "Status"])
        .map(|s| RoleStatus::parse(&s))
        .unwrap_or_default();

    Some(ManagementEntry {
        name,
        position,
        status,
        linkedin_url: url_field(value, &["linkedin_url", "linkedin", "LinkedIn"]),
        location: string_field(value, &["location", "Location"]),
        bio: string_field(value, &["bio", "Bio", "summary"]),
    })
}

/// Parse `Name — Position (Status) [Location]` entries separated by `;` or newlines
pub fn parse_legacy_management(text: &str) -> Vec<ManagementEntry> {
    static ENTRY_RE: OnceLock<Regex> = OnceLock::new();

    let re = ENTRY_RE.get_or_init(|| {
        Regex::new(
            r"(?i)^(.+?)\s*(?:[—–]|\s-\s)\s*(.+?)(?:\s*\((current|past|former)\))?(?:\s*\[([^\]]+)\])?$",
        )
        .expect("Invalid regex pattern")
    });

    let entries = text
        .split([';', '\n'])
        .map(|part| part.trim().trim_start_matches(['-', '*', '•']).trim())
        .filter(|part| !part.is_empty())
        .filter_map(|part| {
            let caps = re.captures(part)?;
            let name = caps.get(1)?.as_str().trim().to_string();
            let position = caps.get(2)?.as_str().trim().to_string();
            if is_placeholder(&name) || is_placeholder(&position) {
                return None;
            }
            let mut entry = ManagementEntry::new(
                name,
                position,
                caps.get(3)
                    .map(|m| RoleStatus::parse(m.as_str()))
                    .unwrap_or_default(),
            );
            entry.location = caps.get(4).map(|m| m.as_str().trim().to_string());
            Some(entry)
        })
        .collect();

    dedup_management(entries)
}
