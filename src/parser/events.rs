//! Corporate event extraction from model replies

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

use super::json::{extract_json, JsonShape};
use crate::models::{Advisor, CorporateEvent, Counterparty, DealStatus, DealType, Individual};
use crate::money::{format_usd, MonetaryValue};
use crate::normalize::value::{array_field, as_text, int_field, string_field, url_field};
use crate::utils::error::ParseError;

const SHORT_KEYS: &[&str] = &["event_short", "Event (short)", "event", "title", "headline"];
const DESCRIPTION_KEYS: &[&str] = &["description", "Description", "details", "summary"];
const ANNOUNCED_KEYS: &[&str] = &["announcement_date", "Announcement Date", "date", "Date"];
const CLOSED_KEYS: &[&str] = &["closed_date", "Closed Date", "close_date"];
const DEAL_TYPE_KEYS: &[&str] = &["deal_type", "Deal Type", "event_type", "Event type", "type"];
const DEAL_STATUS_KEYS: &[&str] = &["deal_status", "Deal Status", "status"];
const VALUE_KEYS: &[&str] = &["value_usd", "Event value (USD)", "value", "Value", "deal_value"];
const SOURCE_KEYS: &[&str] = &["source_url", "Source URL", "source", "url"];

/// Parse events from a model reply, at most `max` of them
///
/// JSON first, then the legacy `- Event Description:` block format. Total
/// failure yields an empty list.
pub fn parse_events(raw: &str, max: usize) -> Vec<CorporateEvent> {
    match try_parse_events(raw, max) {
        Ok(events) => events,
        Err(e) => {
            let legacy = parse_legacy_events(raw);
            if legacy.is_empty() && !raw.trim().is_empty() {
                tracing::warn!(error = %e, "Could not parse events from reply");
            }
            legacy.into_iter().take(max).collect()
        }
    }
}

/// Parse events from a JSON reply
pub fn try_parse_events(raw: &str, max: usize) -> Result<Vec<CorporateEvent>, ParseError> {
    let value = extract_json(raw, JsonShape::Any)?;
    if !value.is_array() && !value.is_object() {
        return Err(ParseError::UnexpectedShape("expected array or object".into()));
    }
    Ok(events_from_value(&value, max))
}

/// Decode events from an array, a wrapper object, or a single event object
pub fn events_from_value(value: &Value, max: usize) -> Vec<CorporateEvent> {
    let items: Vec<&Value> = match value {
        Value::Array(items) => items.iter().collect(),
        Value::Object(_) => {
            let wrapped = array_field(value, &["events", "corporate_events", "Corporate Events"]);
            if wrapped.is_empty() {
                vec![value]
            } else {
                wrapped.iter().collect()
            }
        }
        _ => Vec::new(),
    };

    items
        .into_iter()
        .filter_map(event_from_value)
        .take(max)
        .collect()
}

/// Decode one event; `None` when it carries no description at all
pub fn event_from_value(value: &Value) -> Option<CorporateEvent> {
    if !value.is_object() {
        return None;
    }

    let event_short = string_field(value, SHORT_KEYS).unwrap_or_default();
    let description = string_field(value, DESCRIPTION_KEYS).unwrap_or_default();
    if event_short.is_empty() && description.is_empty() {
        return None;
    }

    let announcement_date = string_field(value, ANNOUNCED_KEYS);
    let closed_date = string_field(value, CLOSED_KEYS);

    // An explicit "Unknown" is a status, not a placeholder
    let status_text = DEAL_STATUS_KEYS
        .iter()
        .filter_map(|key| value.get(*key))
        .find_map(as_text);
    let deal_status = match status_text {
        Some(text) => DealStatus::parse(&text).unwrap_or_else(|| {
            tracing::debug!(status = %text, "Unrecognized deal status, inferring");
            DealStatus::inferred(closed_date.as_deref())
        }),
        None => DealStatus::inferred(closed_date.as_deref()),
    };

    let deal_type = string_field(value, DEAL_TYPE_KEYS).and_then(|t| DealType::parse(&t));

    let value_text = event_value(value);
    if !value_text.is_empty() && !MonetaryValue::parse(&value_text).is_canonical() {
        tracing::debug!(value = %value_text, "Event value is not in canonical format");
    }

    let counterparties = dedup_counterparties(
        array_field(value, &["counterparties", "Counterparties"])
            .iter()
            .filter_map(counterparty_from_value)
            .collect(),
    );

    let advisors = array_field(value, &["advisors", "Advisors"])
        .iter()
        .filter_map(advisor_from_value)
        .collect();

    Some(CorporateEvent {
        announcement_date,
        closed_date,
        event_short,
        description,
        deal_type,
        deal_status,
        value: value_text,
        source_url: url_field(value, SOURCE_KEYS),
        counterparties,
        advisors,
    })
}

fn event_value(value: &Value) -> String {
    VALUE_KEYS
        .iter()
        .filter_map(|key| value.get(*key))
        .find_map(|v| match v {
            Value::Number(n) => n
                .as_u64()
                .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64))
                .map(format_usd)
                .or_else(|| Some(n.to_string())),
            other => as_text(other),
        })
        .unwrap_or_default()
}

/// Decode a counterparty object, or a bare company name
pub fn counterparty_from_value(value: &Value) -> Option<Counterparty> {
    if let Value::String(name) = value {
        let name = name.trim();
        return (!name.is_empty()).then(|| Counterparty::new(name, None, ""));
    }

    let name = string_field(value, &["company_name", "company", "name"])?;
    let kind = string_field(value, &["type", "role", "kind"]).unwrap_or_default();
    let mut counterparty = Counterparty::new(name, int_field(value, &["type_id"]), &kind);

    counterparty.role_description =
        string_field(value, &["role_description", "description"]).unwrap_or_default();
    counterparty.company_linkedin_url =
        url_field(value, &["company_linkedin_url", "linkedin_url", "linkedin"]);
    counterparty.press_release_url = url_field(value, &["press_release_url", "press_release"]);

    for individual in array_field(value, &["individuals", "people"])
        .iter()
        .filter_map(individual_from_value)
    {
        counterparty.add_individual(individual);
    }

    Some(counterparty)
}

/// Decode an individual; `None` without a name
pub fn individual_from_value(value: &Value) -> Option<Individual> {
    Some(Individual {
        name: string_field(value, &["name", "full_name"])?,
        title: string_field(value, &["title", "position", "role"]).unwrap_or_default(),
        linkedin_url: url_field(value, &["linkedin_url", "linkedin"]),
    })
}

fn advisor_from_value(value: &Value) -> Option<Advisor> {
    Some(Advisor {
        advisor_name: string_field(value, &["advisor_name", "name", "company_name"])?,
        advisor_type: string_field(value, &["advisor_type", "type"]).unwrap_or_default(),
        advised_party: string_field(value, &["advised_party", "client"]).unwrap_or_default(),
        announcement_url: url_field(value, &["announcement_url", "url", "source_url"]),
    })
}

/// Merge counterparties that name the same company, keeping the first
fn dedup_counterparties(counterparties: Vec<Counterparty>) -> Vec<Counterparty> {
    let mut out: Vec<Counterparty> = Vec::with_capacity(counterparties.len());
    for cp in counterparties {
        let key = cp.company_name.trim().to_lowercase();
        match out
            .iter_mut()
            .find(|existing| existing.company_name.trim().to_lowercase() == key)
        {
            Some(existing) => {
                for individual in cp.individuals {
                    existing.add_individual(individual);
                }
            }
            None => out.push(cp),
        }
    }
    out
}

/// Parse the legacy plain-text block format
///
/// ```text
/// - Event Description: Acme acquired Widget Corp
///   Date: 2021-04-01
///   Type: Acquisition
///   Value: $12,000,000 (cash)
/// ```
pub fn parse_legacy_events(text: &str) -> Vec<CorporateEvent> {
    static BLOCK_RE: OnceLock<Regex> = OnceLock::new();
    static FIELD_RE: OnceLock<Regex> = OnceLock::new();

    let block_re = BLOCK_RE.get_or_init(|| {
        Regex::new(r"(?i)-\s*Event Description:").expect("Invalid regex pattern")
    });
    let field_re = FIELD_RE.get_or_init(|| {
        Regex::new(r"(?im)^[ \t]*(Date|Type|Value):").expect("Invalid regex pattern")
    });

    let starts: Vec<(usize, usize)> = block_re
        .find_iter(text)
        .map(|m| (m.start(), m.end()))
        .collect();

    let mut events = Vec::new();
    for (i, &(_, body_start)) in starts.iter().enumerate() {
        let body_end = starts.get(i + 1).map_or(text.len(), |&(start, _)| start);
        let block = &text[body_start..body_end];

        let line_end = block.find('\n').unwrap_or(block.len());
        let description_end = field_re.find(block).map_or(line_end, |m| m.start().min(line_end));
        let description = crate::utils::normalize_whitespace(&block[..description_end]);
        if description.is_empty() {
            continue;
        }

        let mut event = CorporateEvent {
            event_short: description.clone(),
            description,
            ..Default::default()
        };

        for caps in field_re.captures_iter(block) {
            let Some(whole) = caps.get(0) else { continue };
            let rest = &block[whole.end()..];
            let value = rest[..rest.find('\n').unwrap_or(rest.len())].trim().to_string();
            if value.is_empty() {
                continue;
            }
            match caps[1].to_lowercase().as_str() {
                "date" => event.announcement_date = Some(value),
                "type" => event.deal_type = DealType::parse(&value),
                "value" => event.value = value,
                _ => {}
            }
        }

        event.deal_status = DealStatus::inferred(event.closed_date.as_deref());
        events.push(event);
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPLY: &str = r#"Here are the events:
```json
[
  {
    "announcement_date": "2021-04-01",
    "closed_date": "2021-06-30",
    "event_short": "Acme acquired Widget Corp",
    "description": "Acme Inc. completed the acquisition of Widget Corp.",
    "deal_type": "Acquisition",
    "value_usd": "$12,000,000 (cash)",
    "source_url": "https://news.example.com/acme-widget",
    "counterparties": [
      {"company_name": "Acme Inc.", "type_id": 18, "type": "Acquirer", "role_description": "Buyer"},
      {"company_name": "Widget Corp", "type": "target", "individuals": [
        {"name": "Jane Doe", "title": "CEO"},
        {"name": "JANE DOE", "title": "Founder"}
      ]}
    ],
    "advisors": [{"advisor_name": "Bank & Co", "advisor_type": "Financial", "advised_party": "Acme Inc."}]
  },
  {"event_short": "Acme raises Series B", "deal_status": "Rumoured"}
]
```"#;

    #[test]
    fn test_parse_events_json() {
        let events = parse_events(REPLY, 20);
        assert_eq!(events.len(), 2);

        let first = &events[0];
        assert_eq!(first.deal_status, DealStatus::Completed);
        assert_eq!(first.deal_type, Some(DealType::Acquisition));
        assert_eq!(first.counterparties.len(), 2);
        assert_eq!(first.counterparties[1].type_id, 17);
        assert_eq!(first.counterparties[1].individuals.len(), 1);
        assert_eq!(first.advisors.len(), 1);
        assert!(first.money().is_canonical());

        assert_eq!(events[1].deal_status, DealStatus::Unknown);
    }

    #[test]
    fn test_parse_events_respects_max() {
        assert_eq!(parse_events(REPLY, 1).len(), 1);
    }

    #[test]
    fn test_legacy_date_key_and_status_rule() {
        let raw = r#"[{"event": "Acme buys Beta", "date": "March 2020", "closed_date": "April 2020"}]"#;
        let events = parse_events(raw, 20);
        assert_eq!(events[0].announcement_date.as_deref(), Some("March 2020"));
        assert_eq!(events[0].event_short, "Acme buys Beta");
        assert_eq!(events[0].deal_status, DealStatus::Completed);
    }

    #[test]
    fn test_every_status_in_vocabulary() {
        let raw = r#"[
            {"event_short": "a", "deal_status": "In Market"},
            {"event_short": "b", "deal_status": "whatever"},
            {"event_short": "c"},
            {"event_short": "d", "closed_date": "2020"}
        ]"#;
        let vocab = DealStatus::all();
        for event in parse_events(raw, 20) {
            assert!(vocab.contains(&event.deal_status));
        }
    }

    #[test]
    fn test_malformed_output_is_empty() {
        assert!(parse_events("I could not find any events.", 20).is_empty());
        assert!(parse_events(r#"[{"event_short": "Acme acquired"#, 20).is_empty());
        assert!(parse_events(r#"{"event_short": "Acme acquired", "#, 20).is_empty());
        assert!(parse_events("", 20).is_empty());
        assert!(parse_events("[1, 2, 3]", 20).is_empty());
    }

    #[test]
    fn test_numeric_value_is_formatted() {
        let raw = r#"[{"event_short": "x", "value_usd": 2200000000}]"#;
        assert_eq!(parse_events(raw, 20)[0].value, "$2,200,000,000");
    }

    #[test]
    fn test_explicit_unknown_status_is_kept() {
        let raw = r#"[
            {"event_short": "Acme buys Beta", "closed_date": "2021-06-30", "deal_status": "Unknown"},
            {"event_short": "Acme buys Gamma", "closed_date": "2021-06-30", "deal_status": "N/A"}
        ]"#;
        let events = parse_events(raw, 20);
        assert_eq!(events[0].deal_status, DealStatus::Unknown);
        assert_eq!(events[1].deal_status, DealStatus::Completed);
    }

    #[test]
    fn test_float_and_negative_values_are_coerced() {
        let raw = r#"[
            {"event_short": "a", "value_usd": 1500000.0},
            {"event_short": "b", "value_usd": 2.2e9},
            {"event_short": "c", "value_usd": -5}
        ]"#;
        let events = parse_events(raw, 20);
        assert_eq!(events[0].value, "$1,500,000");
        assert_eq!(events[1].value, "$2,200,000,000");
        assert_eq!(events[2].value, "-5");
    }

    #[test]
    fn test_legacy_fields_start_a_line() {
        let text = "- Event Description: Acme acquired Widget Corp\nDate: 2021-04-01\nType: Acquisition\nClosed Date: 2021-06-30\nDeal Type: Bankruptcy";
        let events = parse_events(text, 20);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_short, "Acme acquired Widget Corp");
        assert_eq!(events[0].announcement_date.as_deref(), Some("2021-04-01"));
        assert_eq!(events[0].deal_type, Some(DealType::Acquisition));
    }

    #[test]
    fn test_parse_legacy_events() {
        let text = "- Event Description: Acme acquired Widget Corp\nDate: 2021-04-01\nType: Acquisition\nValue: $12,000,000 (cash)\n- Event Description: Acme opened an office in Berlin\nDate: 2022";
        let events = parse_events(text, 20);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_short, "Acme acquired Widget Corp");
        assert_eq!(events[0].announcement_date.as_deref(), Some("2021-04-01"));
        assert_eq!(events[0].deal_type, Some(DealType::Acquisition));
        assert_eq!(events[0].value, "$12,000,000 (cash)");
        assert_eq!(events[1].announcement_date.as_deref(), Some("2022"));
        assert_eq!(events[1].deal_status, DealStatus::Unknown);
    }
}
