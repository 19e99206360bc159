use anyhow::{Context, Result};
use std::sync::Arc;

use corpscout::config::Config;
use corpscout::research::Researcher;

use super::analyze::{print_management, print_overview, print_warnings};

/// Database-only view of a company, no model calls
pub async fn refresh(config: Config, url: &str, json: bool) -> Result<()> {
    config.validate()?;
    let researcher = Researcher::from_config(Arc::new(config)).context("Failed to set up research clients")?;
    let report = researcher.refresh(url).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Database record for {url}");
    println!("================================");

    let Some(company) = &report.existing_company else {
        println!("\nCompany not found in the database.");
        print_warnings(&report.warnings);
        return Ok(());
    };

    println!("Company id: {}", company.id);
    if let Some(overview) = &report.db_overview {
        println!("\nOverview");
        print_overview(overview);
    }
    print_management("Management", &report.db_management);

    println!("\nEvents: {}", report.db_events.len());
    for (i, event) in report.db_events.iter().enumerate() {
        println!(
            "{}. {} ({})",
            i + 1,
            event.description,
            event.announcement_date.as_deref().unwrap_or("Unknown")
        );
    }

    print_warnings(&report.warnings);
    Ok(())
}
