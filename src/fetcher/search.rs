//! SerpApi search client and rate-limited query batches

use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::Client;
use serde_json::Value;
use std::collections::HashSet;
use std::time::Duration;

use super::SearchProvider;
use crate::config::SearchConfig;
use crate::models::SearchHit;
use crate::normalize::value::string_field;
use crate::utils::error::FetchError;

/// SerpApi message for a query without results; not a failure
const NO_RESULTS: &str = "hasn't returned any results";

/// Google search through SerpApi
pub struct SerpApiClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    hl: String,
    gl: String,
}

impl SerpApiClient {
    /// Create a client from configuration
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be created
    pub fn with_config(config: &SearchConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
            hl: config.hl.clone(),
            gl: config.gl.clone(),
        })
    }

    /// Create a client against a custom endpoint, for testing
    pub fn with_base_url(endpoint: &str, api_key: &str) -> Result<Self, FetchError> {
        Self::with_config(&SearchConfig {
            endpoint: endpoint.to_string(),
            api_key: Some(api_key.to_string()),
            ..SearchConfig::default()
        })
    }

    fn parse_hits(payload: &Value, num: u32) -> Vec<SearchHit> {
        payload
            .get("organic_results")
            .and_then(Value::as_array)
            .map(|results| {
                results
                    .iter()
                    .take(num as usize)
                    .map(|r| SearchHit {
                        title: string_field(r, &["title"]).unwrap_or_default(),
                        snippet: string_field(r, &["snippet"]).unwrap_or_default(),
                        link: string_field(r, &["link"]).unwrap_or_default(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl SearchProvider for SerpApiClient {
    async fn search(&self, query: &str, num: u32) -> Result<Vec<SearchHit>, FetchError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(FetchError::NotConfigured("Search provider"))?;

        let num_param = num.to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("q", query),
                ("hl", self.hl.as_str()),
                ("gl", self.gl.as_str()),
                ("num", num_param.as_str()),
                ("api_key", api_key),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::status(status.as_u16(), &body));
        }

        let payload: Value = response.json().await?;
        if let Some(message) = payload.get("error").and_then(Value::as_str) {
            if message.contains(NO_RESULTS) {
                return Ok(Vec::new());
            }
            return Err(FetchError::Api(message.to_string()));
        }

        let hits = Self::parse_hits(&payload, num);
        tracing::debug!(query = %query, hits = hits.len(), "Search complete");
        Ok(hits)
    }
}

/// A query that failed inside a batch
#[derive(Debug)]
pub struct QueryFailure {
    pub query: String,
    pub error: FetchError,
}

/// Deduplicated hits of a batch plus its per-query failures
#[derive(Debug, Default)]
pub struct BatchResults {
    pub hits: Vec<SearchHit>,
    pub failures: Vec<QueryFailure>,
}

impl BatchResults {
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

/// Sequential, rate-limited runner for a list of queries
///
/// Hits are deduplicated by link across the whole batch. A failing query is
/// recorded and the batch moves on; an unconfigured provider stops the batch
/// at the first query.
pub struct SearchBatch<'a> {
    provider: &'a dyn SearchProvider,
    limiter: Option<DefaultDirectRateLimiter>,
}

impl<'a> SearchBatch<'a> {
    /// Create a batch allowing one query per `interval`
    pub fn new(provider: &'a dyn SearchProvider, interval: Duration) -> Self {
        let limiter = Quota::with_period(interval).map(RateLimiter::direct);
        Self { provider, limiter }
    }

    /// Run every query, asking for `num` results each
    pub async fn run<S: AsRef<str>>(&self, queries: &[S], num: u32) -> BatchResults {
        let mut results = BatchResults::default();
        let mut seen = HashSet::new();

        for query in queries {
            let query = query.as_ref();
            if let Some(limiter) = &self.limiter {
                limiter.until_ready().await;
            }

            match self.provider.search(query, num).await {
                Ok(hits) => {
                    for hit in hits {
                        if hit.link.is_empty() || seen.insert(hit.link.clone()) {
                            results.hits.push(hit);
                        }
                    }
                }
                Err(error) => {
                    tracing::warn!(query = %query, error = %error, "Search query failed");
                    let stop = matches!(error, FetchError::NotConfigured(_));
                    results.failures.push(QueryFailure {
                        query: query.to_string(),
                        error,
                    });
                    if stop {
                        break;
                    }
                }
            }
        }

        tracing::info!(
            queries = queries.len(),
            hits = results.hits.len(),
            failures = results.failures.len(),
            "Search batch complete"
        );
        results
    }
}
