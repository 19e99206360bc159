//! corpscout - Company research assistant
//!
//! Given a company name or website, corpscout gathers Wikipedia and web search
//! context, asks LLMs for a company profile, leadership, corporate events and
//! subsidiaries, and compares the events against the company database to show
//! which ones are missing.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management and settings
//! - [`fetcher`] - Search provider and Wikipedia clients
//! - [`llm`] - Model routing, gateway client and prompt builders
//! - [`parser`] - Model reply parsing (JSON location, events, management, ...)
//! - [`normalize`] - Boundary decoding of loosely typed records
//! - [`enrich`] - Counterparty enrichment pass
//! - [`matching`] - Gap analysis between AI and database events
//! - [`companydb`] - Company database client
//! - [`profile`] - Company overview derivation and taxonomies
//! - [`research`] - Pipeline orchestration
//! - [`storage`] - Local report store (SQLite)
//! - [`server`] - HTTP JSON API
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use corpscout::config::Config;
//! use corpscout::research::Researcher;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Arc::new(Config::from_env()?);
//!     config.validate()?;
//!     let researcher = Researcher::from_config(config)?;
//!     let report = researcher.analyze("https://www.example.com/").await;
//!     println!("{} events, {} missing", report.events.len(), report.missing.len());
//!     Ok(())
//! }
//! ```

pub mod companydb;
pub mod config;
pub mod enrich;
pub mod error;
pub mod fetcher;
pub mod llm;
pub mod matching;
pub mod models;
pub mod money;
pub mod normalize;
pub mod parser;
pub mod profile;
pub mod research;
pub mod server;
pub mod storage;
pub mod utils;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Error, ErrorCategory, Result, ScoutErrorTrait};
    pub use crate::matching::{EventMatcher, GapAnalysis};
    pub use crate::models::{CompanyOverview, CorporateEvent, Counterparty, DealStatus, DealType, ManagementEntry};
    pub use crate::research::{AnalysisReport, Researcher};
    pub use crate::storage::{ReportRepository, SqliteReportRepository};
}

// Direct re-exports for convenience
pub use models::{CorporateEvent, DbEvent};
