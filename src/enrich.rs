//! Second-pass counterparty enrichment
//!
//! For each extracted event the web model is asked for the executives and
//! press releases of every counterparty. Results are merged without ever
//! overwriting data already present, so running the pass twice changes
//! nothing the second time.

use serde::{Deserialize, Serialize};

use crate::llm::{prompts, LlmTask, ModelRouter};
use crate::models::{AnalysisWarning, CorporateEvent, Counterparty};
use crate::parser::{parse_enrichment, CounterpartyEnrichment};

/// Whether an enrichment entry refers to a counterparty
///
/// Names match when either lower-cased name contains the other, or when a
/// word longer than three characters of the enrichment name appears in the
/// counterparty name.
pub fn names_match(counterparty: &str, enrichment: &str) -> bool {
    let cp = counterparty.trim().to_lowercase();
    let en = enrichment.trim().to_lowercase();
    if cp.is_empty() || en.is_empty() {
        return false;
    }

    cp.contains(&en)
        || en.contains(&cp)
        || en
            .split_whitespace()
            .filter(|w| w.chars().count() > 3)
            .any(|w| cp.contains(w))
}

/// Counts of what a merge changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MergeStats {
    pub individuals_added: usize,
    pub urls_filled: usize,
}

fn fill(slot: &mut Option<String>, value: Option<&String>) -> bool {
    let empty = slot.as_deref().map_or(true, |s| s.trim().is_empty());
    match value.filter(|v| !v.trim().is_empty()) {
        Some(value) if empty => {
            *slot = Some(value.clone());
            true
        }
        _ => false,
    }
}

fn merge_into(counterparty: &mut Counterparty, enrichment: &CounterpartyEnrichment, stats: &mut MergeStats) {
    if fill(&mut counterparty.press_release_url, enrichment.press_release_url.as_ref()) {
        stats.urls_filled += 1;
    }
    if fill(&mut counterparty.company_linkedin_url, enrichment.company_linkedin_url.as_ref()) {
        stats.urls_filled += 1;
    }
    for individual in &enrichment.individuals {
        if counterparty.add_individual(individual.clone()) {
            stats.individuals_added += 1;
        }
    }
}

/// Merge enrichment entries into an event's counterparties
///
/// Each entry goes to the first matching counterparty; unmatched entries are
/// dropped.
pub fn merge_enrichment(event: &mut CorporateEvent, enrichments: &[CounterpartyEnrichment]) -> MergeStats {
    let mut stats = MergeStats::default();

    for enrichment in enrichments {
        match event
            .counterparties
            .iter_mut()
            .find(|cp| names_match(&cp.company_name, &enrichment.company))
        {
            Some(counterparty) => merge_into(counterparty, enrichment, &mut stats),
            None => tracing::debug!(company = %enrichment.company, "Enrichment matched no counterparty"),
        }
    }

    stats
}

/// Runs the enrichment pass, one model call per event
pub struct Enricher<'a> {
    router: &'a ModelRouter,
}

impl<'a> Enricher<'a> {
    pub fn new(router: &'a ModelRouter) -> Self {
        Self { router }
    }

    /// Enrich events in place; failures leave the event as it was
    pub async fn enrich(&self, events: &mut [CorporateEvent]) -> Vec<AnalysisWarning> {
        let mut warnings = Vec::new();
        let mut total = MergeStats::default();
        let count = events.len();

        for (i, event) in events.iter_mut().enumerate() {
            if !event.counterparties.iter().any(|cp| !cp.company_name.trim().is_empty()) {
                continue;
            }

            tracing::debug!(event = %event.headline(), index = i + 1, count, "Enriching event");
            let prompt = prompts::enrichment(event);

            match self.router.ask(LlmTask::Enrichment, &prompt).await {
                Ok(reply) => {
                    let stats = merge_enrichment(event, &parse_enrichment(&reply));
                    total.individuals_added += stats.individuals_added;
                    total.urls_filled += stats.urls_filled;
                }
                Err(e) => {
                    tracing::warn!(event = %event.headline(), error = %e, "Enrichment failed");
                    warnings.push(AnalysisWarning::new(
                        "enrichment",
                        format!("{}: {e}", event.headline()),
                    ));
                }
            }
        }

        tracing::info!(
            events = count,
            individuals_added = total.individuals_added,
            urls_filled = total.urls_filled,
            "Enrichment pass complete"
        );
        warnings
    }
}
