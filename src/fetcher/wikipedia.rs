//! Wikipedia summaries and subsidiary lists

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::OnceLock;
use std::time::Duration;

use super::Encyclopedia;
use crate::config::WikipediaConfig;
use crate::utils::error::FetchError;
use crate::utils::normalize_whitespace;

#[derive(Debug, Deserialize)]
struct PageSummary {
    #[serde(default, rename = "type")]
    kind: String,
    #[serde(default)]
    extract: String,
}

/// Wikipedia REST and page client
pub struct WikipediaClient {
    client: Client,
    endpoint: String,
    summary_timeout: Duration,
    page_timeout: Duration,
}

impl WikipediaClient {
    /// Create a client from configuration
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be created
    pub fn with_config(config: &WikipediaConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .gzip(true)
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            summary_timeout: Duration::from_secs(config.timeout_secs),
            page_timeout: Duration::from_secs(config.page_timeout_secs),
        })
    }

    /// Create a client against a custom base URL, for testing
    pub fn with_base_url(base_url: &str) -> Result<Self, FetchError> {
        Self::with_config(&WikipediaConfig {
            endpoint: base_url.to_string(),
            ..WikipediaConfig::default()
        })
    }

    async fn get_text(&self, url: &str, timeout: Duration) -> Result<Option<String>, FetchError> {
        let response = self.client.get(url).timeout(timeout).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::status(status.as_u16(), &body));
        }
        Ok(Some(response.text().await?))
    }
}

/// Encode a page title as one path segment (`&` becomes `%26`)
pub fn encode_title(title: &str) -> String {
    let underscored = title.trim().replace(' ', "_");
    url::form_urlencoded::byte_serialize(underscored.as_bytes()).collect()
}

#[async_trait]
impl Encyclopedia for WikipediaClient {
    async fn summary(&self, title: &str) -> Result<Option<String>, FetchError> {
        if title.trim().is_empty() {
            return Ok(None);
        }
        let url = format!("{}/api/rest_v1/page/summary/{}", self.endpoint, encode_title(title));

        let Some(body) = self.get_text(&url, self.summary_timeout).await? else {
            tracing::debug!(title = %title, "No Wikipedia page");
            return Ok(None);
        };

        let page: PageSummary =
            serde_json::from_str(&body).map_err(|e| FetchError::Api(format!("invalid summary payload: {e}")))?;

        if page.kind == "disambiguation" {
            tracing::debug!(title = %title, "Wikipedia disambiguation page rejected");
            return Ok(None);
        }
        let extract = page.extract.trim();
        Ok((!extract.is_empty()).then(|| extract.to_string()))
    }

    async fn subsidiaries(&self, title: &str) -> Result<Vec<String>, FetchError> {
        if title.trim().is_empty() {
            return Ok(Vec::new());
        }
        let url = format!("{}/wiki/{}", self.endpoint, encode_title(title));

        let names = self
            .get_text(&url, self.page_timeout)
            .await?
            .map(|html| parse_subsidiaries_html(&html))
            .unwrap_or_default();

        tracing::debug!(title = %title, subsidiaries = names.len(), "Wikipedia subsidiaries");
        Ok(names)
    }
}

struct PageSelectors {
    infobox_rows: Selector,
    header: Selector,
    link: Selector,
    heading_or_list: Selector,
    item: Selector,
}

fn selectors() -> &'static PageSelectors {
    static SELECTORS: OnceLock<PageSelectors> = OnceLock::new();

    SELECTORS.get_or_init(|| PageSelectors {
        infobox_rows: Selector::parse("table.infobox tr").expect("Invalid selector"),
        header: Selector::parse("th").expect("Invalid selector"),
        link: Selector::parse("a").expect("Invalid selector"),
        heading_or_list: Selector::parse("h2, ul").expect("Invalid selector"),
        item: Selector::parse("li").expect("Invalid selector"),
    })
}

fn element_text(element: &ElementRef<'_>) -> String {
    normalize_whitespace(&element.text().collect::<String>())
}

/// Subsidiary names from an article: the infobox "Subsidiaries" row links,
/// then the first list after a "Subsidiaries" heading
pub fn parse_subsidiaries_html(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let sel = selectors();
    let mut seen = HashSet::new();
    let mut names = Vec::new();

    let mut push = |name: String| {
        if !name.is_empty() && seen.insert(name.to_lowercase()) {
            names.push(name);
        }
    };

    for row in document.select(&sel.infobox_rows) {
        let is_subsidiaries = row
            .select(&sel.header)
            .next()
            .is_some_and(|th| element_text(&th).contains("Subsidiaries"));
        if !is_subsidiaries {
            continue;
        }
        for link in row.select(&sel.link) {
            let text = element_text(&link);
            if !text.starts_with("http") && !text.starts_with('#') && !text.starts_with('[') {
                push(text);
            }
        }
    }

    let mut after_heading = false;
    for element in document.select(&sel.heading_or_list) {
        match element.value().name() {
            "h2" => after_heading = element_text(&element).contains("Subsidiaries"),
            "ul" if after_heading => {
                for item in element.select(&sel.item) {
                    push(element_text(&item));
                }
                after_heading = false;
            }
            _ => {}
        }
    }

    names
}
