//! Gap analysis between AI-extracted events and database events
//!
//! Events have no stable identity, so matching is a keyword-overlap heuristic:
//! an AI event is considered present in the database when its short
//! description shares enough keywords with some database event description.
//! False positives and negatives are expected.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::companydb::EVENTS_KEY;
use crate::error::{Error, Result};
use crate::models::{CorporateEvent, DbEvent};
use crate::normalize::events_from_text;

/// Default similarity threshold for calling two events the same
///
/// Empirical; tune through `matching.threshold` in the configuration.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.4;

/// Words ignored when comparing descriptions
pub const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "to", "of", "in", "for", "with", "by", "from", "its", "as",
];

/// Lower-cased whitespace-delimited words minus stop words
pub fn keywords(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .filter(|w| !STOP_WORDS.contains(w))
        .map(str::to_string)
        .collect()
}

/// Keyword overlap `|A ∩ B| / max(|A|, |B|)`, 0 when either side is empty
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = keywords(a);
    let b = keywords(b);
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let common = a.intersection(&b).count();
    common as f64 / a.len().max(b.len()) as f64
}

/// AI event found in the database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedEvent {
    pub event: CorporateEvent,
    /// Index of the matching database event
    pub db_index: usize,
    pub score: f64,
}

/// Partition of AI events into matched and missing
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GapAnalysis {
    pub matched: Vec<MatchedEvent>,
    pub missing: Vec<CorporateEvent>,
}

impl GapAnalysis {
    /// Total number of AI events analysed
    pub fn total(&self) -> usize {
        self.matched.len() + self.missing.len()
    }
}

/// Keyword-overlap event matcher
#[derive(Debug, Clone, Copy)]
pub struct EventMatcher {
    threshold: f64,
}

impl Default for EventMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_MATCH_THRESHOLD)
    }
}

impl EventMatcher {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// First database event reaching the threshold, with its score
    ///
    /// First match wins; there is no global assignment, so two AI events may
    /// match the same database event.
    pub fn find_match(&self, event: &CorporateEvent, db_events: &[DbEvent]) -> Option<(usize, f64)> {
        db_events.iter().enumerate().find_map(|(i, db)| {
            let score = similarity(event.headline(), &db.description);
            (score >= self.threshold).then_some((i, score))
        })
    }

    /// Classify every AI event as matched or missing
    pub fn analyze(&self, ai_events: &[CorporateEvent], db_events: &[DbEvent]) -> GapAnalysis {
        let mut analysis = GapAnalysis::default();

        for event in ai_events {
            match self.find_match(event, db_events) {
                Some((db_index, score)) => analysis.matched.push(MatchedEvent {
                    event: event.clone(),
                    db_index,
                    score,
                }),
                None => analysis.missing.push(event.clone()),
            }
        }

        tracing::info!(
            ai_events = ai_events.len(),
            db_events = db_events.len(),
            matched = analysis.matched.len(),
            missing = analysis.missing.len(),
            "Gap analysis complete"
        );

        analysis
    }
}

/// Decode database events from an export
///
/// Accepts a bare array or the events endpoint payload keyed by
/// `New_Events_Wits_Advisors`.
pub fn db_events_from_json(text: &str) -> Result<Vec<DbEvent>> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    let items = match &value {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(map) => match map.get(EVENTS_KEY) {
            Some(serde_json::Value::Array(items)) => items,
            Some(serde_json::Value::Null) | None => return Ok(Vec::new()),
            Some(_) => return Err(Error::other(format!("'{}' is not an array", EVENTS_KEY))),
        },
        _ => return Err(Error::other("Expected an array of database events")),
    };
    Ok(items.iter().map(DbEvent::from_value).collect())
}

/// Gap analysis over saved AI events and a database export
pub fn gap_from_texts(matcher: &EventMatcher, ai_text: &str, db_text: &str) -> Result<GapAnalysis> {
    let ai_events = events_from_text(ai_text);
    let db_events = db_events_from_json(db_text)?;
    Ok(matcher.analyze(&ai_events, &db_events))
}
