use anyhow::{bail, Context, Result};
use std::path::Path;
use std::sync::Arc;

use corpscout::config::Config;
use corpscout::normalize::events_from_text;
use corpscout::research::Researcher;

/// Create one event for an existing company
pub async fn push_event(config: Config, company_id: i64, event_path: &Path) -> Result<()> {
    config.validate()?;

    let text = std::fs::read_to_string(event_path)
        .with_context(|| format!("Failed to read event file: {}", event_path.display()))?;
    let mut events = events_from_text(&text);
    if events.len() != 1 {
        bail!("Expected exactly one event in {}, found {}", event_path.display(), events.len());
    }
    let event = events.remove(0);

    let researcher = Researcher::from_config(Arc::new(config)).context("Failed to set up research clients")?;
    let outcome = researcher
        .push_event(company_id, &event)
        .await
        .context("Event creation failed")?;

    match outcome.event_id {
        Some(id) => println!("Created event {id} for company {company_id}"),
        None => println!("Created event for company {company_id}"),
    }
    if !outcome.counterparties_created.is_empty() {
        println!("Counterparties created: {}", outcome.counterparties_created.len());
    }

    Ok(())
}
