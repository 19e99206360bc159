// Core data structures for corpscout

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;

use crate::money::MonetaryValue;
use crate::normalize::value as lenient;

/// Deal type vocabulary for corporate events
///
/// Unmapped model output is kept as [`DealType::Other`] and logged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DealType {
    Acquisition,
    Sale,
    Ipo,
    Mbo,
    Investment,
    StrategicReview,
    Divestment,
    Restructuring,
    DualTrack,
    Closing,
    Grant,
    DebtFinancing,
    Bankruptcy,
    Reorganisation,
    EmployeeTenderOffer,
    Rebrand,
    Partnership,
    Accelerator,
    Award,
    Other(String),
}

impl DealType {
    /// Every vocabulary entry, in prompt order
    pub fn all() -> Vec<Self> {
        vec![
            Self::Acquisition,
            Self::Sale,
            Self::Ipo,
            Self::Mbo,
            Self::Investment,
            Self::StrategicReview,
            Self::Divestment,
            Self::Restructuring,
            Self::DualTrack,
            Self::Closing,
            Self::Grant,
            Self::DebtFinancing,
            Self::Bankruptcy,
            Self::Reorganisation,
            Self::EmployeeTenderOffer,
            Self::Rebrand,
            Self::Partnership,
            Self::Accelerator,
            Self::Award,
        ]
    }

    /// Get string representation
    pub fn as_str(&self) -> &str {
        match self {
            Self::Acquisition => "Acquisition",
            Self::Sale => "Sale",
            Self::Ipo => "IPO",
            Self::Mbo => "MBO",
            Self::Investment => "Investment",
            Self::StrategicReview => "Strategic Review",
            Self::Divestment => "Divestment",
            Self::Restructuring => "Restructuring",
            Self::DualTrack => "Dual track",
            Self::Closing => "Closing",
            Self::Grant => "Grant",
            Self::DebtFinancing => "Debt financing",
            Self::Bankruptcy => "Bankruptcy",
            Self::Reorganisation => "Reorganisation",
            Self::EmployeeTenderOffer => "Employee tender offer",
            Self::Rebrand => "Rebrand",
            Self::Partnership => "Partnership",
            Self::Accelerator => "Accelerator",
            Self::Award => "Award",
            Self::Other(label) => label,
        }
    }

    /// Resolve free text against the vocabulary, case-insensitively
    ///
    /// Returns `None` for blank input.
    pub fn parse(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        let lower = trimmed.to_lowercase();
        let known = Self::all()
            .into_iter()
            .find(|t| t.as_str().to_lowercase() == lower)
            .or_else(|| match lower.as_str() {
                "merger" | "m&a" | "acquisition/merger" => Some(Self::Acquisition),
                "initial public offering" => Some(Self::Ipo),
                "management buyout" => Some(Self::Mbo),
                "funding" | "funding round" | "investment round" => Some(Self::Investment),
                "reorganization" => Some(Self::Reorganisation),
                _ => None,
            });

        Some(known.unwrap_or_else(|| {
            tracing::warn!(deal_type = %trimmed, "Unmapped deal type, passing through");
            Self::Other(trimmed.to_string())
        }))
    }

    /// Whether this value is outside the vocabulary
    pub fn is_unmapped(&self) -> bool {
        matches!(self, Self::Other(_))
    }
}

impl From<String> for DealType {
    fn from(s: String) -> Self {
        Self::parse(&s).unwrap_or(Self::Other(s))
    }
}

impl From<DealType> for String {
    fn from(t: DealType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for DealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Deal status vocabulary (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum DealStatus {
    Completed,
    InMarket,
    NotYetLaunched,
    StrategicReview,
    DealPrep,
    InExclusivity,
    #[default]
    Unknown,
}

impl DealStatus {
    /// Get all statuses
    pub fn all() -> Vec<Self> {
        vec![
            Self::Completed,
            Self::InMarket,
            Self::NotYetLaunched,
            Self::StrategicReview,
            Self::DealPrep,
            Self::InExclusivity,
            Self::Unknown,
        ]
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "Completed",
            Self::InMarket => "In Market",
            Self::NotYetLaunched => "Not yet launched",
            Self::StrategicReview => "Strategic Review",
            Self::DealPrep => "Deal Prep",
            Self::InExclusivity => "In Exclusivity",
            Self::Unknown => "Unknown",
        }
    }

    /// Resolve free text against the vocabulary; unrecognized text is `None`
    pub fn parse(text: &str) -> Option<Self> {
        let lower = text.trim().to_lowercase();
        if lower.is_empty() {
            return None;
        }
        Self::all()
            .into_iter()
            .find(|s| s.as_str().to_lowercase() == lower)
            .or_else(|| match lower.as_str() {
                "complete" | "closed" => Some(Self::Completed),
                "in exclusivity period" | "exclusivity" => Some(Self::InExclusivity),
                _ => None,
            })
    }

    /// Status for an event whose status is absent or unrecognized
    pub fn inferred(closed_date: Option<&str>) -> Self {
        if closed_date.is_some_and(|d| !d.trim().is_empty()) {
            Self::Completed
        } else {
            Self::Unknown
        }
    }
}

impl From<String> for DealStatus {
    fn from(s: String) -> Self {
        Self::parse(&s).unwrap_or_default()
    }
}

impl From<DealStatus> for String {
    fn from(s: DealStatus) -> Self {
        s.as_str().to_string()
    }
}

impl fmt::Display for DealStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Counterparty role codes used by the company database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CounterpartyRole {
    Target = 17,
    Acquirer = 18,
    Seller = 19,
    JointVenturePartner = 20,
    InvestorMajority = 24,
    InvestorMinority = 25,
    InvestorUnknown = 26,
}

impl CounterpartyRole {
    /// Get all roles
    pub fn all() -> Vec<Self> {
        vec![
            Self::Target,
            Self::Acquirer,
            Self::InvestorMajority,
            Self::InvestorMinority,
            Self::InvestorUnknown,
            Self::Seller,
            Self::JointVenturePartner,
        ]
    }

    /// Create from database type id
    pub fn from_id(id: i64) -> Option<Self> {
        match id {
            17 => Some(Self::Target),
            18 => Some(Self::Acquirer),
            19 => Some(Self::Seller),
            20 => Some(Self::JointVenturePartner),
            24 => Some(Self::InvestorMajority),
            25 => Some(Self::InvestorMinority),
            26 => Some(Self::InvestorUnknown),
            _ => None,
        }
    }

    /// Database type id
    pub fn id(&self) -> u32 {
        *self as u32
    }

    /// Canonical label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Target => "Target",
            Self::Acquirer => "Acquirer",
            Self::Seller => "Seller",
            Self::JointVenturePartner => "Joint Venture Partner",
            Self::InvestorMajority => "Investor (majority)",
            Self::InvestorMinority => "Investor (minority)",
            Self::InvestorUnknown => "Investor (unknown)",
        }
    }

    /// Resolve free text, ignoring case, punctuation and word order
    ///
    /// "Majority Investor" and "investor (majority)" both resolve to
    /// [`CounterpartyRole::InvestorMajority`].
    pub fn resolve(text: &str) -> Option<Self> {
        let words = role_words(text);
        if words.is_empty() {
            return None;
        }
        Self::all()
            .into_iter()
            .find(|role| role_words(role.label()) == words)
    }
}

fn role_words(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .flat_map(|w| match w {
            "jv" => vec!["joint", "venture"],
            other => vec![other],
        })
        .map(str::to_string)
        .collect()
}

/// Person attached to a counterparty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Individual {
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
}

/// Company-side participant in a corporate event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Counterparty {
    pub company_name: String,
    /// Role code, 0 when the role text is a free label
    #[serde(default)]
    pub type_id: u32,
    /// Role label
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub role_description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_linkedin_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub press_release_url: Option<String>,
    #[serde(default)]
    pub individuals: Vec<Individual>,
}

impl Counterparty {
    /// Create a counterparty, resolving its role from an id and/or free text
    ///
    /// A valid role id wins; otherwise the text is resolved against the role
    /// table, and unrecognized text is kept as the label with type id 0.
    pub fn new(company_name: impl Into<String>, type_id: Option<i64>, kind: &str) -> Self {
        let (type_id, kind) = match type_id
            .and_then(CounterpartyRole::from_id)
            .or_else(|| CounterpartyRole::resolve(kind))
        {
            Some(role) => (role.id(), role.label().to_string()),
            None => (0, kind.trim().to_string()),
        };

        Self {
            company_name: company_name.into(),
            type_id,
            kind,
            ..Default::default()
        }
    }

    /// Resolved role, if the type id is one of the defined codes
    pub fn role(&self) -> Option<CounterpartyRole> {
        CounterpartyRole::from_id(i64::from(self.type_id))
    }

    /// Add an individual unless one with the same name (ignoring case) exists
    ///
    /// Returns whether the individual was added.
    pub fn add_individual(&mut self, individual: Individual) -> bool {
        let key = individual.name.trim().to_lowercase();
        if key.is_empty() {
            return false;
        }
        if self
            .individuals
            .iter()
            .any(|existing| existing.name.trim().to_lowercase() == key)
        {
            return false;
        }
        self.individuals.push(individual);
        true
    }
}

/// Advisor on a corporate event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Advisor {
    pub advisor_name: String,
    #[serde(default)]
    pub advisor_type: String,
    #[serde(default)]
    pub advised_party: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub announcement_url: Option<String>,
}

/// Corporate event extracted from model output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CorporateEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub announcement_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_date: Option<String>,
    #[serde(default)]
    pub event_short: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deal_type: Option<DealType>,
    #[serde(default)]
    pub deal_status: DealStatus,
    /// Display text of the event value, see [`CorporateEvent::money`]
    #[serde(rename = "value_usd", default)]
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default)]
    pub counterparties: Vec<Counterparty>,
    #[serde(default)]
    pub advisors: Vec<Advisor>,
}

impl CorporateEvent {
    /// Announcement date, else closed date, else "Unknown"
    pub fn display_date(&self) -> &str {
        self.announcement_date
            .as_deref()
            .or(self.closed_date.as_deref())
            .unwrap_or("Unknown")
    }

    /// Parsed event value
    pub fn money(&self) -> MonetaryValue {
        MonetaryValue::parse(&self.value)
    }

    /// Short description, falling back to the long one
    pub fn headline(&self) -> &str {
        if self.event_short.trim().is_empty() {
            &self.description
        } else {
            &self.event_short
        }
    }
}

/// Employment status of a management entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RoleStatus {
    #[default]
    Current,
    Past,
}

impl RoleStatus {
    /// Parse free text; anything that is not clearly past is current
    pub fn parse(text: &str) -> Self {
        match text.trim().to_lowercase().as_str() {
            "past" | "former" | "previous" | "ex" => Self::Past,
            _ => Self::Current,
        }
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Current => "Current",
            Self::Past => "Past",
        }
    }
}

/// Executive or leadership role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ManagementEntry {
    pub name: String,
    pub position: String,
    #[serde(default)]
    pub status: RoleStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

impl ManagementEntry {
    pub fn new(name: impl Into<String>, position: impl Into<String>, status: RoleStatus) -> Self {
        Self {
            name: name.into(),
            position: position.into(),
            status,
            ..Default::default()
        }
    }

    /// Deduplication key
    pub fn key(&self) -> (String, String) {
        (
            self.name.trim().to_lowercase(),
            self.position.trim().to_lowercase(),
        )
    }

    /// One-line rendering: `Name — Position (Status) [Location]`
    pub fn display_line(&self) -> String {
        let mut line = format!("{} — {} ({})", self.name, self.position, self.status.as_str());
        if let Some(location) = self.location.as_deref().filter(|l| !l.is_empty()) {
            line.push_str(&format!(" [{location}]"));
        }
        line
    }
}

/// Remove later entries sharing a (name, position) key, keeping order
pub fn dedup_management(entries: Vec<ManagementEntry>) -> Vec<ManagementEntry> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|e| !e.name.trim().is_empty() && !e.position.trim().is_empty())
        .filter(|e| seen.insert(e.key()))
        .collect()
}

/// Render a roster as `; `-separated display lines
pub fn format_management(entries: &[ManagementEntry]) -> String {
    entries
        .iter()
        .map(ManagementEntry::display_line)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Subsidiary of the analysed company
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Subsidiary {
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub sector: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub linkedin_members: u64,
    /// Logo URI or base64 data URI
    #[serde(default)]
    pub logo: String,
}

/// Importance of a sector tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Importance {
    Primary,
    Secondary,
}

impl Importance {
    /// Parse free text, defaulting to primary
    pub fn parse(text: &str) -> Self {
        if text.trim().eq_ignore_ascii_case("secondary") {
            Self::Secondary
        } else {
            Self::Primary
        }
    }
}

/// Sector tag on a company overview
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorTag {
    pub sector: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub importance: Importance,
}

/// Primary business focus mapped onto the taxonomy, id 0 when unmatched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessFocus {
    pub name: String,
    pub id: u32,
}

/// Flattened company overview, from AI output or from the company database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CompanyOverview {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ownership: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webpage_monitored: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_founded: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ceo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_business_focus: Option<BusinessFocus>,
    #[serde(default)]
    pub sectors: Vec<SectorTag>,
}

/// Non-fatal failure recorded during an analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisWarning {
    /// Pipeline stage, e.g. "events" or "company_db"
    pub stage: String,
    pub message: String,
}

impl AnalysisWarning {
    pub fn new(stage: impl Into<String>, message: impl fmt::Display) -> Self {
        Self {
            stage: stage.into(),
            message: message.to_string(),
        }
    }
}

impl fmt::Display for AnalysisWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.stage, self.message)
    }
}

/// Search-engine result triple
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SearchHit {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub link: String,
}

/// Corporate event as stored in the company database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DbEvent {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub announcement_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deal_type: Option<String>,
    /// Full database record
    #[serde(default)]
    pub raw: Value,
}

impl DbEvent {
    /// Decode one database event, tolerating missing or oddly-typed keys
    pub fn from_value(value: &Value) -> Self {
        Self {
            description: lenient::string_field(value, &["description", "Description", "event_short"])
                .unwrap_or_default(),
            announcement_date: lenient::string_field(
                value,
                &["announcement_date", "Announcement_Date", "date"],
            ),
            deal_type: lenient::string_field(value, &["deal_type", "Deal_Type", "deal_type_text"]),
            raw: value.clone(),
        }
    }
}
