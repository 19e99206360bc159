//! Common test utilities: in-process fakes for the four collaborators

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use corpscout::companydb::{CompanyDatabase, CompanyRef, CreateEventOutcome, NewEventRequest};
use corpscout::config::Config;
use corpscout::fetcher::{Encyclopedia, SearchProvider};
use corpscout::llm::{ChatModel, CompletionRequest, APP_TITLE};
use corpscout::models::{DbEvent, SearchHit};
use corpscout::research::Researcher;
use corpscout::utils::error::FetchError;

/// Config with a gateway key, no query pacing and no LinkedIn lookups
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.llm.api_key = Some("test-key".to_string());
    config.search.api_key = Some("test-key".to_string());
    config.search.query_interval_ms = 0;
    config.research.linkedin_lookup = false;
    config
}

pub fn hit(title: &str, snippet: &str, link: &str) -> SearchHit {
    SearchHit {
        title: title.to_string(),
        snippet: snippet.to_string(),
        link: link.to_string(),
    }
}

/// Search provider returning the same hits for every query
pub struct FakeSearch {
    pub hits: Vec<SearchHit>,
    pub unconfigured: bool,
    pub queries: Mutex<Vec<String>>,
}

impl FakeSearch {
    pub fn with_hits(hits: Vec<SearchHit>) -> Self {
        Self {
            hits,
            unconfigured: false,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            hits: Vec::new(),
            unconfigured: true,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

#[async_trait]
impl SearchProvider for FakeSearch {
    async fn search(&self, query: &str, num: u32) -> Result<Vec<SearchHit>, FetchError> {
        if self.unconfigured {
            return Err(FetchError::NotConfigured("Search provider"));
        }
        self.queries.lock().unwrap().push(query.to_string());
        Ok(self.hits.iter().take(num as usize).cloned().collect())
    }
}

/// Encyclopedia with one fixed page
#[derive(Default)]
pub struct FakeWiki {
    pub summary: Option<String>,
    pub subsidiaries: Vec<String>,
    pub subsidiary_calls: Mutex<usize>,
}

#[async_trait]
impl Encyclopedia for FakeWiki {
    async fn summary(&self, _title: &str) -> Result<Option<String>, FetchError> {
        Ok(self.summary.clone())
    }

    async fn subsidiaries(&self, _title: &str) -> Result<Vec<String>, FetchError> {
        *self.subsidiary_calls.lock().unwrap() += 1;
        Ok(self.subsidiaries.clone())
    }
}

/// Chat model answering by task label; unscripted tasks fail
#[derive(Default)]
pub struct ScriptedChat {
    pub replies: HashMap<&'static str, String>,
    pub calls: Mutex<Vec<String>>,
}

impl ScriptedChat {
    pub fn new(replies: &[(&'static str, &str)]) -> Self {
        Self {
            replies: replies.iter().map(|(k, v)| (*k, v.to_string())).collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Task labels in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn was_asked(&self, task: &str) -> bool {
        self.calls().iter().any(|c| c == task)
    }
}

#[async_trait]
impl ChatModel for ScriptedChat {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, FetchError> {
        let task = request
            .title
            .strip_prefix(APP_TITLE)
            .unwrap_or(&request.title)
            .trim()
            .to_string();
        self.calls.lock().unwrap().push(task.clone());
        self.replies
            .get(task.as_str())
            .cloned()
            .ok_or_else(|| FetchError::Api(format!("no reply scripted for {task}")))
    }
}

/// Company database holding at most one company
#[derive(Default)]
pub struct FakeDb {
    pub company: Option<CompanyRef>,
    pub record: Value,
    pub events: Vec<DbEvent>,
    pub unreachable: bool,
    pub create_unconfigured: bool,
    pub lookups: Mutex<Vec<String>>,
    pub created: Mutex<Vec<NewEventRequest>>,
}

impl FakeDb {
    pub fn with_company(id: i64, name: &str, record: Value, events: &[&str]) -> Self {
        Self {
            company: Some(CompanyRef {
                id,
                name: Some(name.to_string()),
                raw: json!({"id": id, "name": name}),
            }),
            record,
            events: events
                .iter()
                .map(|d| DbEvent::from_value(&json!({"description": d, "announcement_date": "2021-03-01"})))
                .collect(),
            ..Default::default()
        }
    }
}

#[async_trait]
impl CompanyDatabase for FakeDb {
    async fn lookup_by_url(&self, url: &str) -> Result<Option<CompanyRef>, FetchError> {
        if self.unreachable {
            return Err(FetchError::Timeout);
        }
        self.lookups.lock().unwrap().push(url.to_string());
        Ok(self.company.clone())
    }

    async fn company(&self, _id: i64) -> Result<Value, FetchError> {
        Ok(self.record.clone())
    }

    async fn events(&self, _id: i64) -> Result<Vec<DbEvent>, FetchError> {
        Ok(self.events.clone())
    }

    async fn create_event(&self, request: &NewEventRequest) -> Result<CreateEventOutcome, FetchError> {
        if self.create_unconfigured {
            return Err(FetchError::NotConfigured("Company database create-event endpoint"));
        }
        self.created.lock().unwrap().push(request.clone());
        Ok(CreateEventOutcome {
            success: true,
            event_id: Some(901),
            counterparties_created: vec![json!({"id": 1})],
        })
    }
}

pub fn researcher(
    config: Config,
    search: Arc<FakeSearch>,
    wiki: Arc<FakeWiki>,
    chat: Arc<ScriptedChat>,
    db: Arc<FakeDb>,
) -> Researcher {
    Researcher::new(Arc::new(config), search, wiki, chat, db)
}

pub const WIKI_SUMMARY: &str = "Acme Robotics is a British robotics company founded in 2016 in \
Cambridge. It builds autonomous warehouse robots for logistics operators across Europe.";

pub const SUMMARY_REPLY: &str = "**Company Details**
- Company Name: Acme Robotics
- Year Founded: 2016
- Website: https://www.acme.example
- LinkedIn: https://www.linkedin.com/company/acme-robotics
- Headquarters: Cambridge, United Kingdom
- CEO: <full name>
- Ownership Status: Venture-backed private company
- Primary Sectors: Robotics, Logistics";

pub const DESCRIPTION_REPLY: &str = "Acme Robotics builds autonomous warehouse robots.\n\
It sells to logistics operators across Europe.";

pub const EVENTS_REPLY: &str = r#"Here are the events:
```json
[
  {"event_short": "Acme Robotics raises Series A funding", "date": "2021-03-01",
   "deal_type": "Financing", "value": "$12,000,000",
   "counterparties": [{"company_name": "Acme Robotics", "type": "Target"}]},
  {"event_short": "Partnership with Gamma Logistics announced", "date": "2023-05-10",
   "deal_type": "Partnership",
   "counterparties": [{"company_name": "Gamma Logistics", "type": "Joint Venture Partner"}]}
]
```"#;

pub const ENRICHMENT_REPLY: &str = r#"{"counterparties": [
  {"company": "Gamma Logistics", "press_release_url": "https://gamma.example/pr",
   "individuals": [{"name": "John Roe", "title": "CEO"}]}
]}"#;

pub const MANAGEMENT_REPLY: &str = r#"[{"name": "Jane Doe", "position": "Chief Executive Officer", "status": "Current"}]"#;

pub const SUBSIDIARIES_REPLY: &str = r#"[{"name": "Widget Labs", "url": "https://widgetlabs.example", "country": "UK"}]"#;

/// Replies for every task of a full analysis
pub fn full_script() -> ScriptedChat {
    ScriptedChat::new(&[
        ("summary", SUMMARY_REPLY),
        ("ceo", "Jane Doe"),
        ("description", DESCRIPTION_REPLY),
        ("classify-company", "startup"),
        ("events", EVENTS_REPLY),
        ("enrichment", ENRICHMENT_REPLY),
        ("management", MANAGEMENT_REPLY),
        ("subsidiaries", SUBSIDIARIES_REPLY),
    ])
}

pub fn startup_hits() -> Vec<SearchHit> {
    vec![
        hit(
            "Acme Robotics raises Series A",
            "Acme Robotics, a startup founded in 2016, closed its Series A round.",
            "https://news.example.com/acme-series-a",
        ),
        hit(
            "Acme Robotics leadership team",
            "Jane Doe is the CEO of Acme Robotics.",
            "https://press.example.com/acme-ceo",
        ),
    ]
}
