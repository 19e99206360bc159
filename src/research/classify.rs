//! Startup versus enterprise classification from search snippets
//!
//! The classification only steers which event queries are run, so a wrong
//! answer costs recall, never correctness.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

const STARTUP_SIGNALS: &[&str] = &[
    "startup",
    "founded in 20",
    "seed round",
    "series a",
    "series b",
    "accelerator",
    "incubator",
    "early-stage",
    "venture-backed",
    "pre-seed",
    "angel investment",
    "bootstrap",
    "climate tech startup",
    "fintech startup",
    "healthtech",
    "saas startup",
    "founded 2018",
    "founded 2019",
    "founded 2020",
    "founded 2021",
    "founded 2022",
    "founded 2023",
    "founded 2024",
    "founded 2025",
    "young company",
    "emerging company",
    "growth-stage",
    "scale-up",
];

const ENTERPRISE_SIGNALS: &[&str] = &[
    "fortune 500",
    "nasdaq:",
    "nyse:",
    "publicly traded",
    "billion revenue",
    "global leader",
    "multinational",
    "established in 19",
    "founded 19",
    "100+ years",
    "50,000 employees",
    "10,000 employees",
    "headquarters",
    "s&p 500",
    "dow jones",
    "ftse 100",
    "dax",
    "cac 40",
];

/// Kind of company, steering the event search plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompanyKind {
    Startup,
    SmallCompany,
    Enterprise,
}

impl CompanyKind {
    /// Whether the startup-oriented search plan applies
    pub fn is_startup_like(&self) -> bool {
        !matches!(self, Self::Enterprise)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Startup => "startup",
            Self::SmallCompany => "small_company",
            Self::Enterprise => "enterprise",
        }
    }
}

/// Size estimate derived from the signal scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EstimatedSize {
    EarlyStage,
    GrowthStage,
    Large,
    #[default]
    Unknown,
}

/// Outcome of the keyword classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub kind: CompanyKind,
    pub size: EstimatedSize,
    pub founded_year: Option<i32>,
    pub startup_score: u32,
    pub enterprise_score: u32,
    /// Share of the winning side among all signals, 0 without signals
    pub confidence: f64,
    /// Scores tied and the snippets mention no M&A
    pub ambiguous: bool,
}

impl Default for CompanyProfile {
    fn default() -> Self {
        Self {
            kind: CompanyKind::Enterprise,
            size: EstimatedSize::Unknown,
            founded_year: None,
            startup_score: 0,
            enterprise_score: 0,
            confidence: 0.0,
            ambiguous: false,
        }
    }
}

fn year_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();

    PATTERNS.get_or_init(|| {
        [
            r"founded (?:in )?(\d{4})",
            r"established (?:in )?(\d{4})",
            r"since (\d{4})",
            r"started (?:in )?(\d{4})",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("Invalid regex pattern"))
        .collect()
    })
}

/// First founding year found, trying the patterns in order
pub fn founding_year(lowered: &str) -> Option<i32> {
    year_patterns()
        .iter()
        .find_map(|re| re.captures(lowered)?.get(1)?.as_str().parse().ok())
}

fn count_signals(text: &str, signals: &[&str]) -> u32 {
    signals.iter().filter(|s| text.contains(*s)).count() as u32
}

/// Score snippets for startup and enterprise signals
///
/// A founding year of 2015 or later adds three startup points, 2010 or later
/// one. Ties fall to enterprise when M&A is mentioned, else to small company
/// with `ambiguous` set.
pub fn classify_snippets(text: &str) -> CompanyProfile {
    let lowered = text.to_lowercase();
    let mut startup_score = count_signals(&lowered, STARTUP_SIGNALS);
    let enterprise_score = count_signals(&lowered, ENTERPRISE_SIGNALS);

    let founded_year = founding_year(&lowered);
    match founded_year {
        Some(year) if year >= 2015 => startup_score += 3,
        Some(year) if year >= 2010 => startup_score += 1,
        _ => {}
    }

    let total = startup_score + enterprise_score;
    let confidence = if total > 0 {
        f64::from(startup_score.max(enterprise_score)) / f64::from(total)
    } else {
        0.0
    };

    let mut profile = CompanyProfile {
        founded_year,
        startup_score,
        enterprise_score,
        confidence,
        ..CompanyProfile::default()
    };

    if startup_score > enterprise_score {
        profile.kind = CompanyKind::Startup;
        profile.size = if startup_score >= 5 {
            EstimatedSize::EarlyStage
        } else {
            EstimatedSize::GrowthStage
        };
    } else if enterprise_score > startup_score {
        profile.kind = CompanyKind::Enterprise;
        profile.size = EstimatedSize::Large;
    } else if lowered.contains("acquired") || lowered.contains("acquisition") {
        profile.kind = CompanyKind::Enterprise;
    } else {
        profile.kind = CompanyKind::SmallCompany;
        profile.ambiguous = true;
    }

    profile
}

/// Read the one-word reply of the classification prompt
pub fn kind_from_reply(reply: &str) -> Option<CompanyKind> {
    let upper = reply.to_uppercase();
    match (upper.contains("STARTUP"), upper.contains("ENTERPRISE")) {
        (true, false) => Some(CompanyKind::Startup),
        (false, true) => Some(CompanyKind::Enterprise),
        _ => None,
    }
}
