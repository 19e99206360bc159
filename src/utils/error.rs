//! Error types for collaborator calls and response parsing
//!
//! Every external call (search provider, LLM gateway, Wikipedia, company
//! database) reports failures as a [`FetchError`]; every attempt to read
//! structure out of free text reports a [`ParseError`].

use thiserror::Error;

/// Errors that can occur while talking to an external HTTP collaborator
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request error (connection refused, TLS, body decoding)
    #[error("HTTP request failed: {0}")]
    Http(#[source] reqwest::Error),

    /// Non-success status code
    #[error("Server returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Request timeout
    #[error("Request timeout")]
    Timeout,

    /// Provider answered 200 but the payload carried an error message
    #[error("Provider error: {0}")]
    Api(String),

    /// Completion or payload was empty
    #[error("Empty response from {0}")]
    EmptyResponse(String),

    /// Provider is not configured (missing key or endpoint)
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(err)
        }
    }
}

impl FetchError {
    /// Build a status error, keeping only the head of the body
    pub fn status(status: u16, body: &str) -> Self {
        Self::Status {
            status,
            body: super::truncate_text(body, 200),
        }
    }

    /// Check whether a later attempt could plausibly succeed
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Http(_) | Self::Timeout | Self::EmptyResponse(_) => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::Api(_) | Self::NotConfigured(_) | Self::InvalidUrl(_) => false,
        }
    }
}

/// Errors that can occur while parsing free-text replies
#[derive(Error, Debug)]
pub enum ParseError {
    /// Input was empty or whitespace
    #[error("Empty input")]
    Empty,

    /// No JSON array or object could be located
    #[error("No JSON found in response")]
    NoJson,

    /// JSON was located but could not be parsed
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    /// JSON parsed but did not have the expected shape
    #[error("Unexpected shape: {0}")]
    UnexpectedShape(String),
}
