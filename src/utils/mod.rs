//! Common utilities and helper functions
//!
//! This module provides shared text and URL helpers used across the crate.

pub mod error;

use anyhow::{Context, Result};
use regex::Regex;
use std::sync::OnceLock;
use url::Url;

/// Normalize whitespace in text
pub fn normalize_whitespace(text: &str) -> String {
    static WHITESPACE_RE: OnceLock<Regex> = OnceLock::new();

    let re = WHITESPACE_RE.get_or_init(|| Regex::new(r"\s+").expect("Invalid regex pattern"));

    re.replace_all(text.trim(), " ").to_string()
}

/// Extract host from URL
pub fn extract_domain(url: &str) -> Result<String> {
    let parsed = Url::parse(url).context("Invalid URL")?;

    parsed
        .host_str()
        .map(|s| s.to_string())
        .context("No host in URL")
}

/// Check whether user input is a URL rather than a company name
pub fn is_url(text: &str) -> bool {
    let text = text.trim();
    text.starts_with("http://") || text.starts_with("https://")
}

/// Truncate text to a maximum length, appending an ellipsis
///
/// Cuts on a char boundary so multi-byte text never panics.
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.len() <= max_len {
        text.to_string()
    } else {
        let truncated = clip(text, max_len.saturating_sub(3));
        format!("{truncated}...")
    }
}

/// Clip text to at most `max_bytes` bytes without splitting a character
pub fn clip(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let mut end = max_bytes;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Favicon URL for a site, used when no logo is supplied
pub fn favicon_url(site: &str) -> String {
    static SCHEME_RE: OnceLock<Regex> = OnceLock::new();

    let re = SCHEME_RE
        .get_or_init(|| Regex::new(r"^https?://(www\.)?").expect("Invalid regex pattern"));
    let stripped = re.replace(site.trim(), "");
    let domain = stripped.split('/').next().unwrap_or_default();
    let domain = if domain.is_empty() { "google.com" } else { domain };

    format!("https://www.google.com/s2/favicons?sz=64&domain_url={domain}")
}
