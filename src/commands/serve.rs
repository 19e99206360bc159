use anyhow::{Context, Result};
use std::sync::Arc;

use corpscout::config::Config;
use corpscout::research::Researcher;

/// Run the HTTP API until interrupted
pub async fn serve(config: Config, host: &str, port: u16) -> Result<()> {
    config.validate()?;

    tracing::info!(
        search_enabled = %config.search_enabled(),
        company_db = ?config.company_db.base_url,
        store_reports = %config.research.store_reports,
        "Research server configuration"
    );

    let researcher = Researcher::from_config(Arc::new(config)).context("Failed to set up research clients")?;
    corpscout::server::serve(Arc::new(researcher), host, port).await
}
