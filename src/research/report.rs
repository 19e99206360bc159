//! Analysis results returned to the CLI and the HTTP API

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::classify::CompanyProfile;
use crate::companydb::CompanyRef;
use crate::matching::MatchedEvent;
use crate::models::{AnalysisWarning, CompanyOverview, CorporateEvent, DbEvent, ManagementEntry, Subsidiary};

/// Full result of one analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Correlates the report with its log lines
    pub id: Uuid,
    /// Query as entered, a company name or a URL
    pub query: String,
    pub company_name: String,
    pub ai_overview: CompanyOverview,
    pub db_overview: Option<CompanyOverview>,
    /// Markdown company details, CEO line verified
    pub summary: String,
    pub description: String,
    pub ceo: Option<String>,
    pub company_profile: CompanyProfile,
    pub events: Vec<CorporateEvent>,
    /// AI events already recorded in the database
    pub matched: Vec<MatchedEvent>,
    /// AI events absent from the database
    pub missing: Vec<CorporateEvent>,
    pub db_events: Vec<DbEvent>,
    pub management: Vec<ManagementEntry>,
    pub db_management: Vec<ManagementEntry>,
    pub subsidiaries: Vec<Subsidiary>,
    pub existing_company: Option<CompanyRef>,
    pub warnings: Vec<AnalysisWarning>,
}

impl AnalysisReport {
    pub(crate) fn new(query: &str, company_name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            query: query.to_string(),
            company_name: company_name.to_string(),
            ai_overview: CompanyOverview::default(),
            db_overview: None,
            summary: String::new(),
            description: String::new(),
            ceo: None,
            company_profile: CompanyProfile::default(),
            events: Vec::new(),
            matched: Vec::new(),
            missing: Vec::new(),
            db_events: Vec::new(),
            management: Vec::new(),
            db_management: Vec::new(),
            subsidiaries: Vec::new(),
            existing_company: None,
            warnings: Vec::new(),
        }
    }

    /// Whether the company already exists in the database
    pub fn is_existing(&self) -> bool {
        self.existing_company.is_some()
    }
}

/// Database-only view of a company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RefreshReport {
    pub url: String,
    pub existing_company: Option<CompanyRef>,
    pub db_overview: Option<CompanyOverview>,
    pub db_management: Vec<ManagementEntry>,
    pub db_events: Vec<DbEvent>,
    pub warnings: Vec<AnalysisWarning>,
}
