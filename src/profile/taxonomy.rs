//! Controlled vocabularies of the company database
//!
//! Business focus IDs, ownership classes and country spellings as the
//! database stores them.

use crate::models::BusinessFocus;
use crate::normalize::value::is_placeholder;

/// Business focus taxonomy with database IDs
pub const BUSINESS_FOCUS_TAXONOMY: &[(&str, u32)] = &[
    ("Financial Services", 74),
    ("Data & Analytics", 75),
    ("Software", 76),
    ("Business Services", 77),
    ("Consumer Internet", 78),
    ("Consumer Media", 79),
    ("Aerospace", 80),
    ("Food", 81),
    ("Insurance", 82),
    ("Satellites", 83),
    ("Events", 84),
    ("Retail", 85),
    ("Wholesale", 86),
    ("Industrials", 87),
    ("Agriculture", 88),
    ("Telecommunications", 89),
    ("Healthcare", 90),
    ("Law", 91),
    ("Pharmaceuticals", 92),
    ("Education & Training", 93),
    ("Real Estate", 94),
    ("Defence", 95),
    ("Entertainment", 96),
    ("Medical Equipment", 97),
    ("Laboratory Equipment", 98),
    ("Shipping", 99),
    ("Academic Publishing", 100),
    ("Trade Association", 101),
    ("Fitness", 102),
    ("Chemicals", 103),
    ("Not-for-Profit", 104),
    ("Semiconductors", 105),
    ("Natural Resources", 106),
    ("Power Generation", 107),
    ("Consumer Electronics", 108),
    ("Energy & Commodities", 109),
    ("Crypto", 110),
    ("Engineering", 111),
    ("Aviation", 112),
    ("Automotive", 113),
    ("Digital Infrastructure", 114),
    ("Professional Body", 115),
    ("Manufacturing", 117),
    ("Marketplace", 118),
    ("Business Media", 119),
    ("Government Agency", 120),
    ("Real Estate Broker", 121),
];

/// Substring synonyms tried after an exact match fails, in order
const FOCUS_SYNONYMS: &[(&str, &str)] = &[
    ("fintech", "Financial Services"),
    ("banking", "Financial Services"),
    ("payments", "Financial Services"),
    ("data analytics", "Data & Analytics"),
    ("analytics", "Data & Analytics"),
    ("big data", "Data & Analytics"),
    ("saas", "Software"),
    ("software as a service", "Software"),
    ("enterprise software", "Software"),
    ("b2b services", "Business Services"),
    ("professional services", "Business Services"),
    ("consulting", "Business Services"),
    ("e-commerce", "Consumer Internet"),
    ("online marketplace", "Marketplace"),
    ("marketplace", "Marketplace"),
    ("ecommerce", "Consumer Internet"),
    ("pharma", "Pharmaceuticals"),
    ("drug development", "Pharmaceuticals"),
    ("medical devices", "Medical Equipment"),
    ("healthcare services", "Healthcare"),
    ("health tech", "Healthcare"),
    ("healthtech", "Healthcare"),
    ("telecom", "Telecommunications"),
    ("defense", "Defence"),
    ("defence", "Defence"),
    ("non-profit", "Not-for-Profit"),
    ("nonprofit", "Not-for-Profit"),
    ("nfp", "Not-for-Profit"),
    ("energy", "Energy & Commodities"),
    ("commodities", "Energy & Commodities"),
    ("cryptocurrency", "Crypto"),
    ("blockchain", "Crypto"),
    ("real estate", "Real Estate"),
    ("property", "Real Estate"),
];

/// Ownership classes accepted by the database
pub const OWNERSHIP_CLASSES: &[&str] = &[
    "Public",
    "Private",
    "Venture-Backed",
    "Private Equity-Backed",
    "Family-Owned",
    "Employee-Owned",
    "Founder-Owned",
    "Institutional-Owned",
    "Government-Owned",
    "Non-Profit",
    "Subsidiary",
    "Cooperative",
    "Partnership",
];

/// Indicator substrings per ownership class; earlier rows win
const OWNERSHIP_INDICATORS: &[(&[&str], &str)] = &[
    (
        &["public", "publicly traded", "publicly held", "listed", "nasdaq", "nyse", "lse", "stock exchange", "ipo"],
        "Public",
    ),
    (&["private equity", "pe-backed", "pe backed"], "Private Equity-Backed"),
    (&["venture", "vc-backed", "vc backed"], "Venture-Backed"),
    (&["government", "state-owned", "state owned"], "Government-Owned"),
    (&["non-profit", "nonprofit", "not-for-profit"], "Non-Profit"),
    (&["family"], "Family-Owned"),
    (&["employee", "esop"], "Employee-Owned"),
    (&["founder"], "Founder-Owned"),
    (&["subsidiary", "owned by"], "Subsidiary"),
    (&["institutional"], "Institutional-Owned"),
    (&["partnership", "llp"], "Partnership"),
    (&["cooperative", "co-op"], "Cooperative"),
    (&["private"], "Private"),
];

const COUNTRY_SYNONYMS: &[(&str, &str)] = &[
    ("england", "UK"),
    ("scotland", "UK"),
    ("wales", "UK"),
    ("northern ireland", "UK"),
    ("britain", "UK"),
    ("great britain", "UK"),
    ("united kingdom", "UK"),
    ("u.k.", "UK"),
    ("u.k", "UK"),
    ("united states", "USA"),
    ("united states of america", "USA"),
    ("america", "USA"),
    ("us", "USA"),
    ("u.s.", "USA"),
    ("u.s.a.", "USA"),
    ("u.s.a", "USA"),
    ("united arab emirates", "UAE"),
    ("u.a.e.", "UAE"),
    ("the netherlands", "Netherlands"),
    ("holland", "Netherlands"),
    ("republic of ireland", "Ireland"),
    ("south korea", "Korea"),
    ("republic of korea", "Korea"),
];

/// Map free text onto the business focus taxonomy
///
/// Exact (case-insensitive) match first, then substring synonyms. Unmatched
/// text is kept with id 0; placeholders give `None`.
pub fn map_business_focus(text: &str) -> Option<BusinessFocus> {
    let trimmed = text.trim();
    if is_placeholder(trimmed) {
        return None;
    }
    let lower = trimmed.to_lowercase();

    let found = BUSINESS_FOCUS_TAXONOMY
        .iter()
        .find(|(name, _)| name.to_lowercase() == lower)
        .or_else(|| {
            FOCUS_SYNONYMS
                .iter()
                .find(|(synonym, _)| lower.contains(synonym))
                .and_then(|(_, target)| BUSINESS_FOCUS_TAXONOMY.iter().find(|(name, _)| name == target))
        });

    Some(match found {
        Some((name, id)) => BusinessFocus {
            name: name.to_string(),
            id: *id,
        },
        None => {
            tracing::debug!(focus = %trimmed, "Business focus not in taxonomy, keeping as-is");
            BusinessFocus {
                name: trimmed.to_string(),
                id: 0,
            }
        }
    })
}

/// Classify a free-text ownership description
pub fn classify_ownership(text: &str) -> Option<&'static str> {
    if is_placeholder(text) {
        return None;
    }
    let lower = text.trim().to_lowercase();

    let class = OWNERSHIP_INDICATORS
        .iter()
        .find(|(indicators, _)| indicators.iter().any(|i| lower.contains(i)))
        .map(|(_, class)| *class)
        .or_else(|| {
            OWNERSHIP_CLASSES
                .iter()
                .find(|c| c.to_lowercase() == lower)
                .copied()
        });

    if class.is_none() {
        tracing::debug!(ownership = %text, "Unknown ownership value");
    }
    class
}

/// Normalize a country name to the database spelling
pub fn normalize_country(country: &str) -> String {
    let trimmed = country.trim();
    let lower = trimmed.to_lowercase();
    COUNTRY_SYNONYMS
        .iter()
        .find(|(synonym, _)| *synonym == lower)
        .map_or_else(|| trimmed.to_string(), |(_, canonical)| canonical.to_string())
}
