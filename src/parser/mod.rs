//! Response parsing for model replies
//!
//! Model replies are free text that usually, but not always, contain the JSON
//! the prompt asked for. Every parser here has an infallible entry point that
//! returns an empty collection on total failure, and most have a `try_`
//! variant returning [`ParseError`](crate::utils::error::ParseError) for
//! callers that need to tell "nothing found" from "could not parse".

pub mod ceo;
pub mod enrichment;
pub mod events;
pub mod json;
pub mod management;
pub mod subsidiaries;
pub mod summary;

pub use ceo::{ceo_from_text, clean_ceo_reply};
pub use enrichment::{parse_enrichment, CounterpartyEnrichment};
pub use events::{parse_events, parse_legacy_events};
pub use json::{extract_json, JsonShape};
pub use management::{parse_legacy_management, parse_management};
pub use subsidiaries::parse_subsidiaries;
pub use summary::{replace_ceo_line, CompanyDetails};
