//! LinkedIn profile lookup for executives through the search provider

use regex::Regex;
use std::sync::OnceLock;

use super::queries::linkedin_queries;
use crate::fetcher::SearchBatch;
use crate::models::SearchHit;
use crate::utils::error::FetchError;

const RESULTS_PER_QUERY: u32 = 5;

fn honorifics() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(?:Dr|Mr|Mrs|Ms|Jr|Sr)\b\.?|\b(?:III|II|IV)\b").expect("Invalid regex pattern")
    })
}

/// Strip honorifics and generational suffixes; `None` below two name parts
pub fn clean_person_name(name: &str) -> Option<String> {
    let cleaned = honorifics().replace_all(name, " ");
    let parts: Vec<&str> = cleaned.split_whitespace().collect();
    (parts.len() >= 2).then(|| parts.join(" "))
}

/// First personal profile link among hits; company pages are skipped
pub fn profile_link(hits: &[SearchHit]) -> Option<String> {
    hits.iter()
        .map(|hit| hit.link.as_str())
        .find(|link| link.contains("linkedin.com/in/") && !link.contains("/company/"))
        .map(str::to_string)
}

/// Look up the profile of `name` at `company`
///
/// Queries run until one yields a profile. A failing query aborts the
/// lookup with its error.
pub async fn find_profile(batch: &SearchBatch<'_>, name: &str, company: &str) -> Result<Option<String>, FetchError> {
    let Some(full_name) = clean_person_name(name) else {
        return Ok(None);
    };
    let lowered = full_name.to_lowercase();
    let parts: Vec<&str> = lowered.split_whitespace().collect();
    let (first, last) = match parts.as_slice() {
        [first, .., last] => (*first, *last),
        _ => return Ok(None),
    };

    for query in linkedin_queries(&full_name, first, last, company) {
        let results = batch.run(&[query], RESULTS_PER_QUERY).await;
        if let Some(failure) = results.failures.into_iter().next() {
            return Err(failure.error);
        }
        if let Some(link) = profile_link(&results.hits) {
            tracing::debug!(name = %full_name, link = %link, "LinkedIn profile found");
            return Ok(Some(link));
        }
    }

    Ok(None)
}
