//! Boundary decoding of heterogeneous record shapes
//!
//! Stored reports, database records and model replies hand over management,
//! event and subsidiary data as native JSON, JSON encoded in a string (at
//! times twice), legacy semicolon or block text, or nothing at all.
//! [`RawRecords`] names those shapes once; the decoders turn each into the
//! canonical record list and never fail.

pub mod value;

use serde_json::Value;

use crate::models::{CorporateEvent, ManagementEntry, Subsidiary};
use crate::parser::{events, management, subsidiaries};

/// Shape of a record list at the boundary
#[derive(Debug, Clone, PartialEq)]
pub enum RawRecords {
    /// No data
    Absent,
    /// Native JSON
    Json(Value),
    /// Text containing JSON that still needs locating (fences, commentary)
    JsonText(String),
    /// Legacy plain text
    Legacy(String),
}

impl RawRecords {
    /// Classify an optional JSON value
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => Self::Absent,
            Some(Value::String(text)) => Self::from_text(text),
            Some(other) => Self::Json(other.clone()),
        }
    }

    /// Classify text, unwrapping double-encoded JSON once
    pub fn from_text(text: &str) -> Self {
        Self::classify(text, true)
    }

    fn classify(text: &str, unwrap: bool) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Self::Absent;
        }

        match serde_json::from_str::<Value>(trimmed) {
            Ok(Value::Null) => Self::Absent,
            Ok(Value::String(inner)) if unwrap => Self::classify(&inner, false),
            Ok(value @ (Value::Array(_) | Value::Object(_))) => Self::Json(value),
            _ if trimmed.contains(['[', '{']) => Self::JsonText(trimmed.to_string()),
            _ => Self::Legacy(trimmed.to_string()),
        }
    }

    /// Decode a management roster
    pub fn management(&self) -> Vec<ManagementEntry> {
        match self {
            Self::Absent => Vec::new(),
            Self::Json(value) => management::management_from_value(value),
            Self::JsonText(text) => management::parse_management(text),
            Self::Legacy(text) => management::parse_legacy_management(text),
        }
    }

    /// Decode corporate events
    pub fn events(&self) -> Vec<CorporateEvent> {
        match self {
            Self::Absent => Vec::new(),
            Self::Json(value) => events::events_from_value(value, usize::MAX),
            Self::JsonText(text) => events::parse_events(text, usize::MAX),
            Self::Legacy(text) => events::parse_legacy_events(text),
        }
    }

    /// Decode subsidiaries; legacy text is read as a comma or semicolon list of names
    pub fn subsidiaries(&self) -> Vec<Subsidiary> {
        match self {
            Self::Absent => Vec::new(),
            Self::Json(value) => subsidiaries::subsidiaries_from_value(value),
            Self::JsonText(text) => subsidiaries::parse_subsidiaries(text),
            Self::Legacy(text) => {
                let names: Vec<Value> = text
                    .split([';', ',', '\n'])
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(|s| Value::String(s.to_string()))
                    .collect();
                subsidiaries::subsidiaries_from_value(&Value::Array(names))
            }
        }
    }
}

/// Decode management entries from stored text
pub fn management_from_text(text: &str) -> Vec<ManagementEntry> {
    RawRecords::from_text(text).management()
}

/// Decode corporate events from stored text
pub fn events_from_text(text: &str) -> Vec<CorporateEvent> {
    RawRecords::from_text(text).events()
}

/// Decode subsidiaries from stored text
pub fn subsidiaries_from_text(text: &str) -> Vec<Subsidiary> {
    RawRecords::from_text(text).subsidiaries()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DealStatus, RoleStatus};
    use serde_json::json;

    const EVENTS: &str = r#"[
        {"event_short": "Acme acquired Widget Corp", "date": "2021-04-01", "closed_date": "2021-06-30",
         "deal_type": "acquisition", "value": "$12,000,000 (cash)",
         "counterparties": [{"company_name": "Widget Corp", "type": "Majority Investor",
                             "individuals": [{"name": "Jane Doe"}, {"name": "jane doe"}]}]},
        {"Event (short)": "Acme rebrands", "Deal Status": "Not yet launched", "Event type": "Spin-off"}
    ]"#;

    #[test]
    fn test_classify_shapes() {
        assert_eq!(RawRecords::from_value(None), RawRecords::Absent);
        assert_eq!(RawRecords::from_text("  "), RawRecords::Absent);
        assert_eq!(RawRecords::from_text("null"), RawRecords::Absent);
        assert!(matches!(RawRecords::from_text("[1]"), RawRecords::Json(_)));
        assert!(matches!(
            RawRecords::from_text("```json\n[1]\n```"),
            RawRecords::JsonText(_)
        ));
        assert!(matches!(
            RawRecords::from_text("Jane Doe — CEO"),
            RawRecords::Legacy(_)
        ));
    }

    #[test]
    fn test_double_encoded_json_unwrapped_once() {
        let once = serde_json::to_string(r#"[{"name":"Jane Doe","role":"CEO"}]"#).unwrap();
        assert!(matches!(RawRecords::from_text(&once), RawRecords::Json(_)));

        let twice = serde_json::to_string(&once).unwrap();
        assert!(!matches!(RawRecords::from_text(&twice), RawRecords::Json(_)));
    }

    #[test]
    fn test_management_from_value_string() {
        let value = json!(r#"[{"name":"Jane Doe","role":"CEO"}]"#);
        let entries = RawRecords::from_value(Some(&value)).management();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].position, "CEO");
        assert_eq!(entries[0].status, RoleStatus::Current);
    }

    #[test]
    fn test_events_normalization_is_idempotent() {
        let once = events_from_text(EVENTS);
        assert_eq!(once.len(), 2);
        let serialized = serde_json::to_string(&once).unwrap();
        let twice = events_from_text(&serialized);
        assert_eq!(once, twice);

        assert_eq!(once[0].deal_status, DealStatus::Completed);
        assert_eq!(once[0].counterparties[0].type_id, 24);
        assert_eq!(once[0].counterparties[0].individuals.len(), 1);
        assert_eq!(once[1].deal_status, DealStatus::NotYetLaunched);
    }

    #[test]
    fn test_management_normalization_is_idempotent() {
        let once = management_from_text("Jane Doe — CEO (Current); John Roe — CFO (Past) [Paris]");
        let twice = management_from_text(&serde_json::to_string(&once).unwrap());
        assert_eq!(once, twice);
        assert_eq!(twice.len(), 2);
    }

    #[test]
    fn test_subsidiaries_legacy_names() {
        let subs = subsidiaries_from_text("Alpha Ltd; Beta Inc");
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[1].name, "Beta Inc");
    }

    #[test]
    fn test_failures_are_empty() {
        assert!(events_from_text("{broken").is_empty());
        assert!(management_from_text("[{").is_empty());
        assert!(RawRecords::Json(json!(42)).events().is_empty());
    }
}
