//! Web-content fetchers
//!
//! Best-effort access to the search provider and Wikipedia. Both consume
//! quota or rate budget, so callers get a `Result` for every call and decide
//! themselves whether a failure matters.

pub mod search;
pub mod wikipedia;

use async_trait::async_trait;

use crate::models::SearchHit;
use crate::utils::error::FetchError;

pub use search::{BatchResults, QueryFailure, SearchBatch, SerpApiClient};
pub use wikipedia::WikipediaClient;

/// Web search seam
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Run one query, returning at most `num` organic results
    async fn search(&self, query: &str, num: u32) -> Result<Vec<SearchHit>, FetchError>;
}

/// Encyclopedia seam
#[async_trait]
pub trait Encyclopedia: Send + Sync {
    /// Lead summary of the page for `title`
    ///
    /// Missing pages and disambiguation pages are `Ok(None)`.
    async fn summary(&self, title: &str) -> Result<Option<String>, FetchError>;

    /// Subsidiary names listed on the page for `title`
    async fn subsidiaries(&self, title: &str) -> Result<Vec<String>, FetchError>;
}

/// Render hits as numbered context blocks for extraction prompts
///
/// ```text
/// [1] title
/// snippet
/// Source: link
/// ```
pub fn format_snippets(hits: &[SearchHit]) -> String {
    hits.iter()
        .enumerate()
        .map(|(i, hit)| format!("[{}] {}\n{}\nSource: {}\n\n", i + 1, hit.title, hit.snippet, hit.link))
        .collect()
}

/// Render hits as `title\nsnippet` paragraphs, without links
pub fn format_plain(hits: &[SearchHit]) -> String {
    hits.iter()
        .map(|hit| format!("{}\n{}\n\n", hit.title, hit.snippet))
        .collect()
}
