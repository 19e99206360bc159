//! Search query plans for each research step

use super::classify::CompanyKind;

/// Results requested per event query outside testing mode
pub const EVENT_RESULTS: u32 = 25;

/// Results requested per event query in testing mode
pub const TESTING_RESULTS: u32 = 5;

/// Oldest year covered by the per-year acquisition queries
const FIRST_DEAL_YEAR: i32 = 2015;

/// Queries for one event search pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventQueryPlan {
    pub queries: Vec<String>,
    /// Results requested per query
    pub num: u32,
    /// Single-query plan used when at most one event is wanted
    pub testing: bool,
    pub startup: bool,
}

/// Choose the event plan
///
/// `max_events <= 1` is testing mode: one broad query with five results.
pub fn event_plan(company: &str, max_events: usize, kind: CompanyKind, current_year: i32) -> EventQueryPlan {
    if max_events <= 1 {
        return EventQueryPlan {
            queries: vec![format!("\"{company}\" acquisition OR merger OR investment OR funding")],
            num: TESTING_RESULTS,
            testing: true,
            startup: kind.is_startup_like(),
        };
    }

    let queries = if kind.is_startup_like() {
        startup_queries(company, current_year)
    } else {
        enterprise_queries(company, current_year)
    };

    EventQueryPlan {
        queries,
        num: EVENT_RESULTS,
        testing: false,
        startup: kind.is_startup_like(),
    }
}

fn quoted(company: &str, suffixes: &[&str]) -> Vec<String> {
    suffixes
        .iter()
        .map(|suffix| format!("\"{company}\" {suffix}"))
        .collect()
}

/// Funding, accelerator, grant and partnership oriented plan
pub fn startup_queries(company: &str, current_year: i32) -> Vec<String> {
    let mut queries = quoted(
        company,
        &[
            "\"raises\" OR \"raised\" funding",
            "\"seed round\" OR \"pre-seed\"",
            "\"series A\" OR \"series B\" OR \"series C\"",
            "funding round announced",
            "\"led by\" investment OR funding",
            "\"venture capital\" OR \"VC\" investment",
            "angel investment OR angel investor",
            "site:techcrunch.com",
            "site:crunchbase.com",
            "site:eu-startups.com",
            "site:sifted.eu",
            "site:dealroom.co",
            "site:tech.eu",
            "accelerator OR incubator",
            "Y Combinator OR YC",
            "Techstars OR 500 Startups",
            "startup competition winner",
            "grant OR award funding",
            "government grant OR innovation grant",
            "EU grant OR Horizon Europe",
            "Innovate UK OR EIC Accelerator",
            "partnership announced",
            "\"strategic partnership\" OR \"partners with\"",
            "pilot program OR proof of concept",
            "\"backed by\" OR \"portfolio company\"",
            "bridge round OR extension",
            "convertible note OR SAFE",
            "crowdfunding OR equity crowdfunding",
            "acquired by",
            "exit OR \"sold to\"",
            "site:prnewswire.com",
            "site:businesswire.com",
        ],
    );

    let recent: Vec<String> = (current_year - 2..=current_year).rev().map(|y| y.to_string()).collect();
    queries.push(format!("\"{company}\" funding {}", recent.join(" OR ")));
    queries
}

/// Acquisition, private equity and divestiture oriented plan
pub fn enterprise_queries(company: &str, current_year: i32) -> Vec<String> {
    let mut queries = quoted(
        company,
        &[
            "acquisition site:prnewswire.com",
            "acquisition site:businesswire.com",
            "acquisition site:globenewswire.com",
            "acquires",
            "acquired",
            "\"has acquired\"",
            "buys",
            "merger",
        ],
    );

    queries.extend(
        (FIRST_DEAL_YEAR..=current_year)
            .rev()
            .map(|year| format!("\"{company}\" acquisition {year}")),
    );

    queries.extend(quoted(
        company,
        &[
            "\"private equity\" investment",
            "\"growth equity\" OR \"growth investment\"",
            "investor OR \"backed by\"",
            "\"majority stake\" OR \"minority stake\"",
            "\"portfolio company\"",
            "site:pitchbook.com",
            "site:pehub.com",
            "site:crunchbase.com",
            "\"series A\" OR \"series B\" OR \"seed round\"",
            "\"raises\" OR \"raised\" funding",
            "sold OR divested",
            "divestiture OR \"sale of\"",
            "\"sold to\" OR \"sells\"",
            "\"bolt-on acquisition\"",
            "\"strategic acquisition\"",
            "\"completed acquisition\" OR \"completes acquisition\"",
            "\"announces acquisition\"",
            "\"acquisition of\"",
            "M&A deal",
            "acquisition site:reuters.com",
            "acquisition site:bloomberg.com",
            "partnership OR \"strategic partnership\"",
            "\"joint venture\" OR JV",
            "company funding history",
        ],
    ));
    queries
}

/// Queries used to classify the company
pub fn classification_queries(company: &str) -> Vec<String> {
    quoted(
        company,
        &[
            "founded startup",
            "series funding OR seed round OR accelerator",
            "site:crunchbase.com OR site:linkedin.com/company",
        ],
    )
}

/// Background queries for the summary when Wikipedia has too little text
pub fn summary_queries(company: &str, website: Option<&str>) -> Vec<String> {
    let mut queries = quoted(
        company,
        &[
            "company about headquarters",
            "site:linkedin.com/company",
            "site:crunchbase.com",
            "founded CEO location",
        ],
    );

    let site = website.map(|url| {
        url.trim()
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_end_matches('/')
            .to_string()
    });
    queries.push(match site.filter(|s| !s.is_empty()) {
        Some(site) => format!("site:{site}"),
        None => format!("\"{company}\" company"),
    });
    queries
}

/// Queries feeding the strict CEO extractor
pub fn ceo_queries(company: &str) -> Vec<String> {
    vec![
        format!("{company} current CEO"),
        format!("{company} CEO"),
        format!("who is the CEO of {company}"),
        format!("{company} chief executive officer"),
    ]
}

/// Leadership context queries
pub fn management_queries(company: &str) -> Vec<String> {
    vec![
        format!("\"{company}\" leadership team CEO CFO executives"),
        format!("\"{company}\" management team board directors"),
        format!("{company} CEO \"chief executive\" OR CFO OR CTO"),
    ]
}

/// Subsidiary link discovery
pub fn subsidiary_query(company: &str) -> String {
    format!(
        "{company} subsidiaries OR child companies site:linkedin.com OR site:crunchbase.com OR site:craft.co OR site:wikipedia.org"
    )
}

/// LinkedIn profile lookup for one person
pub fn linkedin_queries(full_name: &str, first: &str, last: &str, company: &str) -> Vec<String> {
    vec![
        format!("\"{full_name}\" \"{company}\" site:linkedin.com/in/"),
        format!("{first} {last} {company} linkedin"),
    ]
}
