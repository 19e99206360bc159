//! Company database client
//!
//! The company database is a hosted backend exposing four endpoints: lookup
//! by website URL, full company record, corporate events of a company, and
//! event creation. Records come back in loosely typed JSON and are decoded
//! leniently.

pub mod overview;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

use crate::config::CompanyDbConfig;
use crate::models::{CorporateEvent, DbEvent};
use crate::normalize::value::{array_field, int_field, string_field};
use crate::utils::error::FetchError;

pub use overview::{db_management, db_overview};

/// Key holding the event list in the events response
pub const EVENTS_KEY: &str = "New_Events_Wits_Advisors";

/// Company found by URL lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyRef {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Lookup payload as returned
    #[serde(default)]
    pub raw: Value,
}

impl CompanyRef {
    /// Decode a lookup payload; `null`, `{}` and a missing id mean not found
    pub fn from_lookup(payload: &Value) -> Option<Self> {
        let id = int_field(payload, &["id"])?;
        Some(Self {
            id,
            name: string_field(payload, &["name"]),
            raw: payload.clone(),
        })
    }
}

/// Individual in an event creation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewIndividual {
    pub name: String,
    pub title: String,
    pub linkedin_url: Option<String>,
}

/// Counterparty in an event creation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCounterparty {
    pub company_name: String,
    pub type_id: u32,
    pub role_description: String,
    pub company_linkedin_url: Option<String>,
    pub press_release_url: Option<String>,
    pub individuals: Vec<NewIndividual>,
}

/// Body of the create-event endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEventRequest {
    pub new_company_id: i64,
    pub title: String,
    pub description: String,
    pub announcement_date: Option<String>,
    /// Serialized as `null` when the deal has not closed
    pub closed_date: Option<String>,
    pub deal_type: Option<String>,
    pub deal_status: String,
    pub investment_amount: Option<u64>,
    pub currency_id: Option<u32>,
    pub source_url: Option<String>,
    pub counterparties: Vec<NewCounterparty>,
}

impl NewEventRequest {
    /// Build the request for an AI event
    ///
    /// Dates are converted to `YYYY-MM-DD` when they parse; the currency id is
    /// looked up by ISO code in `currency_ids`.
    pub fn from_event(company_id: i64, event: &CorporateEvent, currency_ids: &HashMap<String, u32>) -> Self {
        let money = event.money();
        let amount = money.amount.filter(|_| !money.undisclosed);
        let currency_id = amount
            .and(money.currency.as_ref())
            .and_then(|code| currency_ids.get(code))
            .copied();

        Self {
            new_company_id: company_id,
            title: event.headline().to_string(),
            description: event.description.clone(),
            announcement_date: event.announcement_date.as_deref().map(normalize_date),
            closed_date: event.closed_date.as_deref().map(normalize_date),
            deal_type: event.deal_type.as_ref().map(|t| t.as_str().to_string()),
            deal_status: event.deal_status.as_str().to_string(),
            investment_amount: amount,
            currency_id,
            source_url: event.source_url.clone(),
            counterparties: event
                .counterparties
                .iter()
                .map(|cp| NewCounterparty {
                    company_name: cp.company_name.clone(),
                    type_id: cp.type_id,
                    role_description: cp.role_description.clone(),
                    company_linkedin_url: cp.company_linkedin_url.clone(),
                    press_release_url: cp.press_release_url.clone(),
                    individuals: cp
                        .individuals
                        .iter()
                        .map(|i| NewIndividual {
                            name: i.name.clone(),
                            title: i.title.clone(),
                            linkedin_url: i.linkedin_url.clone(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%b %d, %Y", "%B %d, %Y", "%d %B %Y", "%d %b %Y", "%m/%d/%Y"];

/// Convert a loosely formatted date to ISO `YYYY-MM-DD`; unparseable text is kept
pub fn normalize_date(text: &str) -> String {
    let trimmed = text.trim();
    let candidate = trimmed
        .split(['T', '('])
        .next()
        .unwrap_or(trimmed)
        .trim()
        .replace("Sept ", "Sep ");

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&candidate, fmt).ok())
        .map_or_else(|| trimmed.to_string(), |d| d.format("%Y-%m-%d").to_string())
}

/// Reply of the create-event endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CreateEventOutcome {
    pub success: bool,
    #[serde(default)]
    pub event_id: Option<i64>,
    #[serde(default)]
    pub counterparties_created: Vec<Value>,
}

/// Company database seam
#[async_trait]
pub trait CompanyDatabase: Send + Sync {
    /// Find a company by website URL
    async fn lookup_by_url(&self, url: &str) -> Result<Option<CompanyRef>, FetchError>;

    /// Full company record
    async fn company(&self, id: i64) -> Result<Value, FetchError>;

    /// Corporate events recorded for a company
    async fn events(&self, id: i64) -> Result<Vec<DbEvent>, FetchError>;

    /// Create an event
    async fn create_event(&self, request: &NewEventRequest) -> Result<CreateEventOutcome, FetchError>;
}

/// HTTP client for the company database
pub struct CompanyDbClient {
    client: Client,
    config: CompanyDbConfig,
}

impl CompanyDbClient {
    /// Create a client from configuration
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be created
    pub fn with_config(config: &CompanyDbConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .build()?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Create a client against a custom base URL, for testing
    pub fn with_base_url(base_url: &str) -> Result<Self, FetchError> {
        Self::with_config(&CompanyDbConfig {
            base_url: Some(base_url.to_string()),
            create_event_path: Some("/events".to_string()),
            ..CompanyDbConfig::default()
        })
    }

    fn url(&self, path: &str) -> Result<String, FetchError> {
        let base = self
            .config
            .base_url
            .as_deref()
            .filter(|b| !b.is_empty())
            .ok_or(FetchError::NotConfigured("Company database"))?;
        Ok(format!("{}{}", base.trim_end_matches('/'), path))
    }

    async fn read_json(response: reqwest::Response) -> Result<Value, FetchError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::status(status.as_u16(), &body));
        }
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| FetchError::Api(format!("invalid JSON payload: {e}")))
    }
}

#[async_trait]
impl CompanyDatabase for CompanyDbClient {
    async fn lookup_by_url(&self, url: &str) -> Result<Option<CompanyRef>, FetchError> {
        let endpoint = self.url(&self.config.lookup_path)?;
        let response = self
            .client
            .get(&endpoint)
            .query(&[("website_url", url)])
            .send()
            .await?;

        let found = CompanyRef::from_lookup(&Self::read_json(response).await?);
        tracing::info!(url = %url, found = found.is_some(), "Company lookup");
        Ok(found)
    }

    async fn company(&self, id: i64) -> Result<Value, FetchError> {
        let path = self.config.company_path.replace("{id}", &id.to_string());
        let response = self.client.get(self.url(&path)?).send().await?;
        Self::read_json(response).await
    }

    async fn events(&self, id: i64) -> Result<Vec<DbEvent>, FetchError> {
        let endpoint = self.url(&self.config.events_path)?;
        let response = self
            .client
            .get(&endpoint)
            .query(&[("new_company_id", id)])
            .send()
            .await?;

        let payload = Self::read_json(response).await?;
        let events: Vec<DbEvent> = array_field(&payload, &[EVENTS_KEY])
            .iter()
            .map(DbEvent::from_value)
            .collect();

        tracing::info!(company_id = id, events = events.len(), "Database events fetched");
        Ok(events)
    }

    async fn create_event(&self, request: &NewEventRequest) -> Result<CreateEventOutcome, FetchError> {
        let path = self
            .config
            .create_event_path
            .as_deref()
            .ok_or(FetchError::NotConfigured("Company database create-event endpoint"))?;

        let response = self.client.post(self.url(path)?).json(request).send().await?;
        let payload = Self::read_json(response).await?;

        if let Some(message) = string_field(&payload, &["error", "message"]) {
            if !payload.get("success").and_then(Value::as_bool).unwrap_or(false) {
                return Err(FetchError::Api(message));
            }
        }

        let outcome: CreateEventOutcome = serde_json::from_value(payload)
            .map_err(|e| FetchError::Api(format!("unexpected create-event reply: {e}")))?;
        if !outcome.success {
            return Err(FetchError::Api("event creation was not accepted".to_string()));
        }

        tracing::info!(
            company_id = request.new_company_id,
            event_id = ?outcome.event_id,
            counterparties = outcome.counterparties_created.len(),
            "Event created"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Counterparty, DealStatus, DealType, Individual};
    use serde_json::json;

    #[test]
    fn test_lookup_not_found_shapes() {
        assert!(CompanyRef::from_lookup(&Value::Null).is_none());
        assert!(CompanyRef::from_lookup(&json!({})).is_none());
        assert!(CompanyRef::from_lookup(&json!({"id": null, "name": "Acme"})).is_none());

        let found = CompanyRef::from_lookup(&json!({"id": "42", "name": "Acme"})).unwrap();
        assert_eq!(found.id, 42);
        assert_eq!(found.name.as_deref(), Some("Acme"));
    }

    #[test]
    fn test_normalize_date() {
        assert_eq!(normalize_date("Nov 30, 2020"), "2020-11-30");
        assert_eq!(normalize_date("February 28, 2022"), "2022-02-28");
        assert_eq!(normalize_date("2021-06-30T00:00:00Z"), "2021-06-30");
        assert_eq!(normalize_date("Jan 1, 2019 (approximate)"), "2019-01-01");
        assert_eq!(normalize_date("Q3 2021"), "Q3 2021");
    }

    #[test]
    fn test_new_event_request_from_event() {
        let mut target = Counterparty::new("Widget Corp", Some(17), "");
        target.add_individual(Individual {
            name: "Jane Doe".to_string(),
            title: "CEO".to_string(),
            linkedin_url: None,
        });
        let event = CorporateEvent {
            announcement_date: Some("Mar 1, 2021".to_string()),
            event_short: "Acme acquired Widget Corp".to_string(),
            deal_type: Some(DealType::Acquisition),
            deal_status: DealStatus::Unknown,
            value: "$12,000,000 (cash)".to_string(),
            counterparties: vec![target],
            ..Default::default()
        };
        let currencies = HashMap::from([("USD".to_string(), 1)]);
        let request = NewEventRequest::from_event(7, &event, &currencies);

        assert_eq!(request.announcement_date.as_deref(), Some("2021-03-01"));
        assert_eq!(request.investment_amount, Some(12_000_000));
        assert_eq!(request.currency_id, Some(1));
        assert_eq!(request.deal_type.as_deref(), Some("Acquisition"));
        assert_eq!(request.counterparties[0].individuals[0].name, "Jane Doe");

        let body = serde_json::to_value(&request).unwrap();
        assert!(body["closed_date"].is_null());
        assert_eq!(body["counterparties"][0]["type_id"], 17);
    }

    #[test]
    fn test_undisclosed_value_has_no_amount() {
        let event = CorporateEvent {
            value: "Undisclosed".to_string(),
            ..Default::default()
        };
        let request = NewEventRequest::from_event(1, &event, &HashMap::new());
        assert_eq!(request.investment_amount, None);
        assert_eq!(request.currency_id, None);
    }

    #[tokio::test]
    async fn test_unconfigured_database() {
        let client = CompanyDbClient::with_config(&CompanyDbConfig::default()).unwrap();
        let result = client.lookup_by_url("https://acme.example").await;
        assert!(matches!(result, Err(FetchError::NotConfigured(_))));
    }
}
