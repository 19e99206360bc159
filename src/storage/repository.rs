//! Repository pattern for the report store
//!
//! Business logic talks to [`ReportRepository`]; the SQLite implementation is
//! the production backend and the in-memory constructor serves tests.
//!
//! ```rust,ignore
//! use corpscout::storage::{ReportRepository, SqliteReportRepository};
//!
//! let repo = SqliteReportRepository::new("data/reports.db")?;
//! let reports = repo.list_reports(Some(20))?;
//! ```

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::models::{CorporateEvent, ManagementEntry, Subsidiary};
use crate::normalize::{events_from_text, management_from_text, subsidiaries_from_text};

// ============================================================================
// Core Types
// ============================================================================

/// Report to append to the store
#[derive(Debug, Clone, Default)]
pub struct NewReport<'a> {
    pub company: &'a str,
    pub summary: &'a str,
    pub description: &'a str,
    pub events: &'a [CorporateEvent],
    pub management: &'a [ManagementEntry],
}

/// Report row as stored
///
/// Events and management are kept as JSON text; rows written by older
/// versions may hold legacy text, which the accessors decode as well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredReport {
    pub id: i64,
    pub company: String,
    pub summary: String,
    pub description: String,
    pub events_json: String,
    pub management_json: String,
    pub created_at: DateTime<Utc>,
}

impl StoredReport {
    /// Decoded corporate events
    pub fn events(&self) -> Vec<CorporateEvent> {
        events_from_text(&self.events_json)
    }

    /// Decoded management roster
    pub fn management(&self) -> Vec<ManagementEntry> {
        management_from_text(&self.management_json)
    }
}

// ============================================================================
// Repository Trait
// ============================================================================

/// Append-only report store with a subsidiary cache
pub trait ReportRepository: Send + Sync {
    /// Append a report, returning its row id
    fn store_report(&self, report: &NewReport<'_>) -> Result<i64>;

    /// Reports newest first, at most `limit` when given
    fn list_reports(&self, limit: Option<usize>) -> Result<Vec<StoredReport>>;

    /// Replace the cached subsidiaries of a company
    fn store_subsidiaries(&self, company: &str, subsidiaries: &[Subsidiary]) -> Result<()>;

    /// Cached subsidiaries, `None` when the company was never cached
    fn subsidiaries(&self, company: &str) -> Result<Option<Vec<Subsidiary>>>;
}

// ============================================================================
// SQLite Implementation
// ============================================================================

/// SQLite implementation of [`ReportRepository`]
///
/// Uses `Mutex` to ensure thread-safety for the SQLite connection.
pub struct SqliteReportRepository {
    conn: Mutex<Connection>,
}

impl SqliteReportRepository {
    /// Open or create a report store
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let conn = Connection::open(path).context("Failed to open SQLite database")?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        let repo = Self {
            conn: Mutex::new(conn),
        };
        repo.create_schema()?;

        tracing::info!(path = %path.display(), "Report store initialized");
        Ok(repo)
    }

    /// Create in-memory repository (for testing)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to create in-memory SQLite")?;
        let repo = Self {
            conn: Mutex::new(conn),
        };
        repo.create_schema()?;
        Ok(repo)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| anyhow!("Report store lock poisoned"))
    }

    fn create_schema(&self) -> Result<()> {
        let conn = self.lock()?;
        conn.execute_batch(
            r#"
                CREATE TABLE IF NOT EXISTS reports (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    company TEXT NOT NULL,
                    summary TEXT NOT NULL DEFAULT '',
                    description TEXT NOT NULL DEFAULT '',
                    events_json TEXT NOT NULL DEFAULT '[]',
                    management_json TEXT NOT NULL DEFAULT '[]',
                    created_at TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_reports_company
                    ON reports(company);

                CREATE TABLE IF NOT EXISTS subsidiaries (
                    company_key TEXT PRIMARY KEY,
                    company TEXT NOT NULL,
                    subsidiaries_json TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                );
                "#,
        )
        .context("Failed to create SQLite schema")?;

        Ok(())
    }
}

fn company_key(company: &str) -> String {
    company.trim().to_lowercase()
}

fn parse_timestamp(text: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

impl ReportRepository for SqliteReportRepository {
    fn store_report(&self, report: &NewReport<'_>) -> Result<i64> {
        let events = serde_json::to_string(report.events).context("Failed to encode events")?;
        let management =
            serde_json::to_string(report.management).context("Failed to encode management")?;

        let conn = self.lock()?;
        conn.execute(
            r#"
                INSERT INTO reports (company, summary, description, events_json, management_json, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            params![
                report.company,
                report.summary,
                report.description,
                events,
                management,
                Utc::now().to_rfc3339()
            ],
        )
        .context("Failed to store report")?;

        let id = conn.last_insert_rowid();
        tracing::info!(company = %report.company, id, events = report.events.len(), "Report stored");
        Ok(id)
    }

    fn list_reports(&self, limit: Option<usize>) -> Result<Vec<StoredReport>> {
        let conn = self.lock()?;
        let limit = limit.map_or(-1, |l| i64::try_from(l).unwrap_or(i64::MAX));

        let mut stmt = conn
            .prepare(
                "SELECT id, company, summary, description, events_json, management_json, created_at
                 FROM reports ORDER BY id DESC LIMIT ?1",
            )
            .context("Failed to prepare report query")?;

        let reports = stmt
            .query_map(params![limit], |row| {
                Ok(StoredReport {
                    id: row.get(0)?,
                    company: row.get(1)?,
                    summary: row.get(2)?,
                    description: row.get(3)?,
                    events_json: row.get(4)?,
                    management_json: row.get(5)?,
                    created_at: parse_timestamp(&row.get::<_, String>(6)?),
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to read reports")?;

        Ok(reports)
    }

    fn store_subsidiaries(&self, company: &str, subsidiaries: &[Subsidiary]) -> Result<()> {
        let json = serde_json::to_string(subsidiaries).context("Failed to encode subsidiaries")?;

        let conn = self.lock()?;
        conn.execute(
            r#"
                INSERT OR REPLACE INTO subsidiaries (company_key, company, subsidiaries_json, updated_at)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            params![company_key(company), company, json, Utc::now().to_rfc3339()],
        )
        .context("Failed to store subsidiaries")?;

        tracing::debug!(company = %company, count = subsidiaries.len(), "Subsidiaries cached");
        Ok(())
    }

    fn subsidiaries(&self, company: &str) -> Result<Option<Vec<Subsidiary>>> {
        let conn = self.lock()?;
        let json: Option<String> = conn
            .query_row(
                "SELECT subsidiaries_json FROM subsidiaries WHERE company_key = ?1",
                params![company_key(company)],
                |row| row.get(0),
            )
            .optional()
            .context("Failed to read subsidiaries")?;

        Ok(json.map(|text| subsidiaries_from_text(&text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Counterparty, RoleStatus};
    use tempfile::TempDir;

    fn event(short: &str) -> CorporateEvent {
        CorporateEvent {
            event_short: short.to_string(),
            value: "$5,000,000 (cash)".to_string(),
            counterparties: vec![Counterparty::new("Widget Corp", Some(17), "")],
            ..Default::default()
        }
    }

    #[test]
    fn test_report_round_trip() {
        let repo = SqliteReportRepository::in_memory().unwrap();
        let events = vec![event("Acme acquired Widget Corp")];
        let management = vec![ManagementEntry::new("Jane Doe", "CEO", RoleStatus::Current)];

        let id = repo
            .store_report(&NewReport {
                company: "Acme",
                summary: "**Company Name:** Acme",
                description: "Makes anvils.",
                events: &events,
                management: &management,
            })
            .unwrap();

        let reports = repo.list_reports(None).unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].id, id);
        assert_eq!(reports[0].events(), events);
        assert_eq!(reports[0].management(), management);
    }

    #[test]
    fn test_list_reports_newest_first() {
        let repo = SqliteReportRepository::in_memory().unwrap();
        for company in ["First", "Second", "Third"] {
            repo.store_report(&NewReport {
                company,
                ..Default::default()
            })
            .unwrap();
        }

        let reports = repo.list_reports(Some(2)).unwrap();
        let names: Vec<_> = reports.iter().map(|r| r.company.as_str()).collect();
        assert_eq!(names, vec!["Third", "Second"]);
    }

    #[test]
    fn test_legacy_rows_decode() {
        let repo = SqliteReportRepository::in_memory().unwrap();
        {
            let conn = repo.lock().unwrap();
            conn.execute(
                "INSERT INTO reports (company, events_json, management_json, created_at)
                 VALUES ('Old', '', 'Jane Doe - CEO; John Roe - CFO', 'not a date')",
                [],
            )
            .unwrap();
        }

        let report = &repo.list_reports(None).unwrap()[0];
        assert!(report.events().is_empty());
        assert_eq!(report.management().len(), 2);
    }

    #[test]
    fn test_subsidiary_cache() {
        let dir = TempDir::new().unwrap();
        let repo = SqliteReportRepository::new(dir.path().join("nested/reports.db")).unwrap();
        assert_eq!(repo.subsidiaries("Acme").unwrap(), None);

        let subs = vec![Subsidiary {
            name: "Acme Labs".to_string(),
            linkedin_members: 120,
            ..Default::default()
        }];
        repo.store_subsidiaries("Acme", &subs).unwrap();
        repo.store_subsidiaries("ACME ", &subs).unwrap();

        assert_eq!(repo.subsidiaries("acme").unwrap(), Some(subs));
    }
}
