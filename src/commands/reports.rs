use anyhow::{Context, Result};

use corpscout::config::Config;
use corpscout::storage::{ReportRepository, SqliteReportRepository};
use corpscout::utils::truncate_text;

/// List saved reports, newest first
pub fn reports(config: &Config, limit: usize) -> Result<()> {
    let path = &config.storage.sqlite_path;
    if !path.exists() {
        println!("No report store at {}", path.display());
        return Ok(());
    }

    let repo = SqliteReportRepository::new(path).context("Failed to open report store")?;
    let reports = repo.list_reports(Some(limit))?;

    if reports.is_empty() {
        println!("No saved reports.");
        return Ok(());
    }

    println!("Saved reports ({}):\n", reports.len());
    for report in &reports {
        let events = report.events();
        println!(
            "#{} {} | {} | {} events, {} managers",
            report.id,
            report.company,
            report.created_at.format("%Y-%m-%d %H:%M"),
            events.len(),
            report.management().len()
        );
        if !report.description.is_empty() {
            println!("   {}", truncate_text(&report.description, 150));
        }
    }

    Ok(())
}
