//! Counterparty enrichment replies

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::events::individual_from_value;
use super::json::{extract_json, JsonShape};
use crate::models::Individual;
use crate::normalize::value::{array_field, string_field, url_field};
use crate::utils::error::ParseError;

/// Details found for one counterparty of an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CounterpartyEnrichment {
    pub company: String,
    pub press_release_url: Option<String>,
    pub company_linkedin_url: Option<String>,
    pub individuals: Vec<Individual>,
}

/// Parse an enrichment reply; empty on failure
pub fn parse_enrichment(raw: &str) -> Vec<CounterpartyEnrichment> {
    try_parse_enrichment(raw).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "Could not parse enrichment reply");
        Vec::new()
    })
}

/// Parse an enrichment reply
///
/// An object with a `counterparties` key is tried first, then a bare array.
pub fn try_parse_enrichment(raw: &str) -> Result<Vec<CounterpartyEnrichment>, ParseError> {
    let value = extract_json(raw, JsonShape::Object)
        .ok()
        .filter(|v| v.get("counterparties").is_some_and(Value::is_array))
        .map(Ok)
        .unwrap_or_else(|| extract_json(raw, JsonShape::Array))?;

    let items: &[Value] = match &value {
        Value::Array(items) => items.as_slice(),
        Value::Object(_) => array_field(&value, &["counterparties"]),
        _ => return Err(ParseError::UnexpectedShape("expected counterparties".into())),
    };

    Ok(items.iter().filter_map(enrichment_from_value).collect())
}

fn enrichment_from_value(value: &Value) -> Option<CounterpartyEnrichment> {
    Some(CounterpartyEnrichment {
        company: string_field(value, &["company", "company_name", "name"])?,
        press_release_url: url_field(value, &["press_release_url", "press_release"]),
        company_linkedin_url: url_field(value, &["company_linkedin_url", "linkedin_url"]),
        individuals: array_field(value, &["individuals", "people"])
            .iter()
            .filter_map(individual_from_value)
            .collect(),
    })
}
