use anyhow::{Context, Result};
use std::sync::Arc;

use corpscout::config::Config;
use corpscout::models::{AnalysisWarning, CompanyOverview, CorporateEvent, ManagementEntry};
use corpscout::research::{AnalysisReport, Researcher};

/// Options of the analyze command
pub struct AnalyzeParams {
    pub query: String,
    pub max_events: Option<usize>,
    pub json: bool,
    pub store: bool,
}

pub async fn analyze(mut config: Config, params: AnalyzeParams) -> Result<()> {
    if let Some(max_events) = params.max_events {
        config.research.max_events = max_events;
    }
    config.research.store_reports &= params.store;
    config.validate()?;

    let researcher = Researcher::from_config(Arc::new(config)).context("Failed to set up research clients")?;
    let report = researcher.analyze(&params.query).await;

    if params.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_report(&report);
    Ok(())
}

fn print_report(report: &AnalysisReport) {
    println!("Company: {}", report.company_name);
    println!("================================");

    match &report.existing_company {
        Some(company) => println!("Database: existing company (id {})", company.id),
        None => println!("Database: new company"),
    }
    println!(
        "Profile: {} ({:?}, confidence {:.2})",
        report.company_profile.kind.as_str(),
        report.company_profile.size,
        report.company_profile.confidence
    );

    println!("\nOverview");
    print_overview(&report.ai_overview);
    if let Some(db_overview) = &report.db_overview {
        println!("\nDatabase overview");
        print_overview(db_overview);
    }

    if !report.description.is_empty() {
        println!("\nDescription\n{}", report.description);
    }

    println!("\nCorporate events: {} found, {} missing from the database", report.events.len(), report.missing.len());
    for (i, event) in report.events.iter().enumerate() {
        let missing = report.missing.contains(event);
        print_event(i + 1, event, missing);
    }

    print_management("Management (AI)", &report.management);
    print_management("Management (database)", &report.db_management);

    if !report.subsidiaries.is_empty() {
        println!("\nSubsidiaries");
        for subsidiary in &report.subsidiaries {
            if subsidiary.url.is_empty() {
                println!("  - {}", subsidiary.name);
            } else {
                println!("  - {} ({})", subsidiary.name, subsidiary.url);
            }
        }
    }

    print_warnings(&report.warnings);
}

pub(crate) fn print_overview(overview: &CompanyOverview) {
    let rows = [
        ("Name", Some(overview.name.clone())),
        ("City", overview.city.clone()),
        ("Country", overview.country.clone()),
        ("Ownership", overview.ownership.clone()),
        ("Website", overview.website.clone()),
        ("LinkedIn", overview.linkedin.clone()),
        ("Founded", overview.year_founded.map(|y| y.to_string())),
        ("CEO", overview.ceo.clone()),
        (
            "Business focus",
            overview.primary_business_focus.as_ref().map(|f| f.name.clone()),
        ),
    ];
    for (label, value) in rows {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            println!("  {label}: {value}");
        }
    }
    if !overview.sectors.is_empty() {
        let sectors: Vec<&str> = overview.sectors.iter().map(|s| s.sector.as_str()).collect();
        println!("  Sectors: {}", sectors.join(", "));
    }
}

fn print_event(index: usize, event: &CorporateEvent, missing: bool) {
    let marker = if missing { "[missing]" } else { "[in db]" };
    println!("{index}. {marker} {} ({})", event.headline(), event.display_date());
    if let Some(deal_type) = &event.deal_type {
        println!("   Type: {deal_type} | Status: {}", event.deal_status);
    }
    if let Some(value) = event.money().canonical() {
        println!("   Value: {value}");
    }
    for counterparty in &event.counterparties {
        println!("   - {} ({})", counterparty.company_name, counterparty.kind);
    }
    if let Some(source) = &event.source_url {
        println!("   Source: {source}");
    }
}

pub(crate) fn print_management(title: &str, entries: &[ManagementEntry]) {
    if entries.is_empty() {
        return;
    }
    println!("\n{title}");
    for entry in entries {
        match &entry.linkedin_url {
            Some(url) => println!("  - {}: {} <{url}>", entry.name, entry.position),
            None => println!("  - {}: {}", entry.name, entry.position),
        }
    }
}

pub(crate) fn print_warnings(warnings: &[AnalysisWarning]) {
    if warnings.is_empty() {
        return;
    }
    println!("\nWarnings");
    for warning in warnings {
        println!("  ! {warning}");
    }
}
