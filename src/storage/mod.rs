//! Local report store
//!
//! Every analysis is appended as one row; nothing is updated in place except
//! the per-company subsidiary cache.

pub mod repository;

pub use repository::{NewReport, ReportRepository, SqliteReportRepository, StoredReport};
