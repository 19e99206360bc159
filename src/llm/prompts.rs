//! Prompt builders, one per [`LlmTask`](super::LlmTask)
//!
//! Each prompt spells out the exact output shape the parsers expect and
//! embeds the controlled vocabularies. Context text is clipped to a fixed
//! budget on a char boundary.

use crate::models::{CorporateEvent, CounterpartyRole, DealStatus, DealType};
use crate::profile::taxonomy::{BUSINESS_FOCUS_TAXONOMY, OWNERSHIP_CLASSES};
use crate::utils::clip;

/// Context budget for the management prompt
pub const MANAGEMENT_CONTEXT_CHARS: usize = 8_000;

/// Context budget for summary, description and CEO prompts
pub const CONTEXT_CHARS: usize = 6_000;

/// Context budget for the management fallback prompt
pub const MANAGEMENT_FALLBACK_CONTEXT_CHARS: usize = 5_000;

fn deal_type_list() -> String {
    DealType::all()
        .iter()
        .map(|t| format!("   - \"{}\"", t.as_str()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn deal_status_list() -> String {
    DealStatus::all()
        .iter()
        .filter(|s| **s != DealStatus::Unknown)
        .map(|s| format!("   - \"{}\"", s.as_str()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn role_list() -> String {
    CounterpartyRole::all()
        .iter()
        .map(|r| format!("   - type_id: {}, type: \"{}\"", r.id(), r.label()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Markdown company profile with one `- Key: value` line per field
pub fn summary(company: &str, known_website: Option<&str>, context: &str) -> String {
    let ownership = OWNERSHIP_CLASSES.join(", ");
    let focus = BUSINESS_FOCUS_TAXONOMY
        .iter()
        .map(|(name, _)| *name)
        .collect::<Vec<_>>()
        .join(", ");
    let website = known_website
        .map(|w| format!("Known website: {w}\n"))
        .unwrap_or_default();

    format!(
        r#"You are a professional researcher. Find and extract complete company details for "{company}".

Return ONLY in this exact markdown format (no extra text):

**Company Details**
- Company Name: <full legal/common name>
- Year Founded: <year>
- Website: <full URL like https://www.example.com>
- LinkedIn: <full LinkedIn URL like https://www.linkedin.com/company/example>
- Headquarters: <city, country>
- CEO: <full name>
- Ownership Status: <one of: {ownership}>
- Primary Business Focus: <one of: {focus}>
- Primary Sectors: <comma-separated sectors>
- Secondary Sectors: <comma-separated sectors>
- Press Page: <full URL of the company's news or press page>

CRITICAL RULES:
1. Website, LinkedIn and Press Page must be full URLs starting with https:// or http://
2. LinkedIn must be the company page URL
3. Headquarters is formatted as "City, Country" (e.g., "London, United Kingdom")
4. Use your own knowledge of the company if the source text is insufficient
5. If you truly cannot find a value, write "Unknown"

{website}
Source text for reference:
{}
"#,
        clip(context, CONTEXT_CHARS)
    )
}

/// Factual 5 to 6 line description grounded on the verified summary
pub fn description(company: &str, details: &str, context: &str) -> String {
    format!(
        r#"Write a factual 5-6 line company description for "{company}" using ONLY the verified information provided.
Do NOT invent data. Focus on what the company does, its products and services, its market and its value.

Verified Company Information:
{details}

Additional Context:
{}
"#,
        clip(context, CONTEXT_CHARS)
    )
}

/// Strict CEO extraction; the answer is a bare name or `NONE`
pub fn ceo(company: &str, context: &str) -> String {
    format!(
        r#"Extract ONLY the CURRENT CEO of "{company}" from the text below.

RULES:
- Return ONLY the CEO's full name.
- No sentences, no extra words, no titles.
- No guessing.
- If the CEO is not explicitly mentioned in the text, return EXACTLY: NONE

Text:
{}
"#,
        clip(context, CONTEXT_CHARS)
    )
}

/// Full executive roster with bios
pub fn management(company: &str, context: &str) -> String {
    format!(
        r#"You are a corporate research analyst. Extract the COMPLETE current executive leadership team of "{company}".

Include ALL of these roles if they exist:
- CEO (Chief Executive Officer), REQUIRED
- CFO, COO, CTO, CMO
- CLO or General Counsel
- CHRO or Chief People Officer
- President or Managing Director
- Chairman of the Board
- Other C-suite or Senior VP roles

For EACH executive provide:
- name: full name
- position: official title
- status: "Current" or "Past"
- location: City, State/Country if known, else ""
- bio: 3-5 sentence third-person executive summary covering leadership experience,
  sectors, key skills, international exposure and education, written as one paragraph

CONTEXT ABOUT {company}:
{}

The CEO matters most. If the context does not mention executives, use your own knowledge.

Return ONLY a valid JSON array (no markdown, no explanation):
[
  {{
    "name": "John Smith",
    "position": "Chief Executive Officer",
    "status": "Current",
    "location": "San Francisco, CA",
    "bio": "Experienced CEO with a track record in Technology and SaaS. 25+ years in leadership roles for Private Equity and Fortune 500 companies. Skilled in General Management, Strategy Development and M&A. Operated across the US, Europe and Asia Pacific. MBA from Stanford Graduate School of Business."
  }}
]

JSON:"#,
        clip(context, MANAGEMENT_CONTEXT_CHARS)
    )
}

/// Shorter roster prompt for the deep model
pub fn management_fallback(company: &str, context: &str) -> String {
    format!(
        r#"List the current top management (CEO, CFO, CTO, etc.) of {company}.

For each person provide:
- name: full name
- position: official title
- status: "Current"
- location: where they are based
- bio: brief professional background (1-2 sentences)

Context: {}

Return a JSON array only:
[{{"name": "...", "position": "...", "status": "Current", "location": "...", "bio": "..."}}]
"#,
        clip(context, MANAGEMENT_FALLBACK_CONTEXT_CHARS)
    )
}

fn startup_checklist() -> &'static str {
    r#"EXTRACTION CHECKLIST FOR STARTUPS, scan for ALL of these:
- FUNDING ROUNDS (highest priority): pre-seed, seed, Series A/B/C, bridge and extension rounds,
  convertible notes, SAFEs, equity crowdfunding
- GRANTS: government and innovation grants, research funding, competition prize money
- ACCELERATORS: Y Combinator, Techstars and similar programmes, demo days, competition wins
- PARTNERSHIPS: strategic partnerships, pilots, major customer contracts, distribution deals
- ACQUISITIONS: being acquired, acqui-hires, exits, and any acquisitions the startup made

Signals: "raises", "secures", "closes" with an amount; "led by", "backed by" with investor
names; "selected for", "graduates from" with an accelerator; "awarded" with a grant."#
}

fn enterprise_checklist(company: &str) -> String {
    format!(
        r#"EXTRACTION CHECKLIST, scan for ALL of these:
- Companies that "{company}" acquired ("acquired", "buys", "bought", "acquisition of")
- Companies that "{company}" merged with
- Investors, PE firms and VCs that invested in "{company}"
- Assets or divisions that "{company}" sold or divested
- Regional acquisitions and small bolt-on purchases
- Funding rounds, strategic partnerships and joint ventures
- IPO or SPAC transactions"#
    )
}

/// Bulk event extraction over numbered search results
pub fn events(company: &str, context: &str, result_count: usize, max_events: usize, startup: bool) -> String {
    let checklist = if startup {
        startup_checklist().to_string()
    } else {
        enterprise_checklist(company)
    };
    let deal_types = deal_type_list();
    let deal_statuses = deal_status_list();
    let roles = role_list();

    format!(
        r#"Extract ALL corporate events for "{company}" from the {result_count} search results below.

GOAL: return up to {max_events} UNIQUE corporate events including M&A, funding, grants, accelerators and partnerships.

{checklist}

EXTRACTION RULES:
1. Each unique target company is a separate event, even for small deals
2. Investments INTO the company are events
3. If only the year is known use "Jan 1, YYYY" and say "(approximate)" in the description
4. Never guess dates; only use dates stated in the search results
5. For major mergers, the announcement and the completion are separate events
6. Include deals with undisclosed values

For EACH event, return these fields:

- announcement_date: "MMM DD, YYYY" when the deal was made public, or ""
- closed_date: "MMM DD, YYYY" when the deal completed, or ""
- event_short: 10-20 words, e.g. "{company} acquired [Target] to [purpose]",
  "[Investor] invested in {company}", "{company} sold [Division] to [Buyer]"
- description: neutral 2-4 sentence prose description (parties, value, rationale, terms)
- deal_type: EXACTLY one of
{deal_types}
- deal_status: EXACTLY one of
{deal_statuses}
  ("Completed" when closed_date is set)
- value_usd: comma-grouped amount with the basis in parentheses, e.g.
  "$44,000,000,000 (enterprise value)", "$2,225,000,000 (cash)", or "Undisclosed".
  Convert "$2.2B" to "$2,200,000,000" and "$550M" to "$550,000,000".
- source_url: the best press release or article URL, exactly as shown, or ""
- counterparties: every company in the deal, each with company_name, type_id, type,
  role_description, company_linkedin_url (or ""), press_release_url (or ""), and
  individuals [{{"name", "title", "linkedin_url": ""}}] quoted or named for this deal.
  Counterparty types (use the exact type_id):
{roles}
  Every deal has at least two counterparties and "{company}" is one of them.
- advisors: advisory firms on the deal, each with advisor_name, advisor_type
  ("Financial Advisor" | "Legal Advisor" | "Due Diligence" | "Tax Advisor" | "Other"),
  advised_party and announcement_url; [] if none are mentioned.

Search results to analyze:
{context}

Return ONLY a valid JSON array (no markdown, no explanation):
[
  {{
    "announcement_date": "Jan 15, 2021",
    "closed_date": "Jan 15, 2021",
    "event_short": "S&P Global acquired Visible Alpha",
    "description": "S&P Global acquired Visible Alpha, a provider of consensus estimate data. The acquisition strengthens its Market Intelligence division. Terms were not disclosed.",
    "deal_type": "Acquisition",
    "deal_status": "Completed",
    "value_usd": "Undisclosed",
    "source_url": "https://www.spglobal.com/visible-alpha-acquisition",
    "counterparties": [
      {{"company_name": "S&P Global", "type_id": 18, "type": "Acquirer", "role_description": "Acquiring company", "company_linkedin_url": "", "press_release_url": "", "individuals": []}},
      {{"company_name": "Visible Alpha", "type_id": 17, "type": "Target", "role_description": "Target company", "company_linkedin_url": "", "press_release_url": "", "individuals": [{{"name": "Scott Ryles", "title": "CEO", "linkedin_url": ""}}]}}
    ],
    "advisors": [
      {{"advisor_name": "Jefferies", "advisor_type": "Financial Advisor", "advised_party": "Visible Alpha", "announcement_url": ""}}
    ]
  }}
]

JSON:"#
    )
}

/// Per-event enrichment: executives and press-release URLs per counterparty
pub fn enrichment(event: &CorporateEvent) -> String {
    let names = event
        .counterparties
        .iter()
        .map(|c| c.company_name.as_str())
        .filter(|n| !n.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

    let dates = match (event.announcement_date.as_deref(), event.closed_date.as_deref()) {
        (Some(a), Some(c)) => format!("Announced: {a}, Closed: {c}"),
        (Some(a), None) => format!("Announced: {a}"),
        (None, Some(c)) => format!("Closed: {c}"),
        (None, None) => "Date unknown".to_string(),
    };

    format!(
        r#"For the corporate deal: "{}"
Date: {dates}
Companies involved: {names}

Find for EACH company involved:

1. KEY EXECUTIVES involved in this deal: CEO, President or Managing Director, CFO or deal
   leads, executives quoted in press releases, PE firm partners
2. ANNOUNCEMENT URL: the company's own press release about this deal

Return JSON with this EXACT format:
{{
  "counterparties": [
    {{
      "company": "Company Name",
      "press_release_url": "https://company.com/news/deal-announcement",
      "company_linkedin_url": "https://www.linkedin.com/company/company-name/",
      "individuals": [
        {{"name": "Full Name", "title": "Title at Company", "linkedin_url": ""}}
      ]
    }}
  ]
}}

Return ONLY valid JSON, no other text. Include ALL companies from the deal."#,
        event.headline()
    )
}

/// Structured subsidiary list from Wikipedia names and search links
pub fn subsidiaries(company: &str, wiki_names: &[String], links: &[String]) -> String {
    let wiki = if wiki_names.is_empty() {
        "(none found)".to_string()
    } else {
        wiki_names.join(", ")
    };

    format!(
        r#"You are a professional corporate researcher.

Using the Wikipedia list and the links below, produce a JSON array of the CURRENT subsidiaries of "{company}".
Each object must contain:
- name
- url
- description
- sector
- linkedin_members (number of employees on LinkedIn, 0 if unknown)
- country
- logo (company favicon URL if possible)

Wikipedia subsidiaries:
{wiki}

Additional links:
{}

Return ONLY a valid JSON array (no text, no comments).
"#,
        links.join("\n")
    )
}

/// One-word startup or enterprise classification
pub fn classify_company(company: &str, context: &str) -> String {
    format!(
        r#"Classify "{company}" as either a startup (young, venture or grant funded, small team) or an
established enterprise (mature, public or large private company).

Answer with EXACTLY one word: STARTUP or ENTERPRISE

Context:
{}
"#,
        clip(context, CONTEXT_CHARS)
    )
}
