//! Full analysis pipeline over fake collaborators

use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

use corpscout::models::{CorporateEvent, Subsidiary};
use corpscout::research::{CompanyProfile, Researcher};
use corpscout::storage::{ReportRepository, SqliteReportRepository};

use crate::common::*;

fn acme_record() -> serde_json::Value {
    json!({
        "Company": {
            "name": "Acme Robotics Ltd",
            "url": "https://www.acme.example",
            "year_founded": 2016,
            "Management_Roles_current": [{"Individual_text": "Jane Doe", "job_titles_id": [{"job_title": "CEO"}]}]
        }
    })
}

struct Fixture {
    search: Arc<FakeSearch>,
    wiki: Arc<FakeWiki>,
    chat: Arc<ScriptedChat>,
    db: Arc<FakeDb>,
    repo: Arc<SqliteReportRepository>,
}

impl Fixture {
    fn new(db: FakeDb) -> Self {
        Self {
            search: Arc::new(FakeSearch::with_hits(startup_hits())),
            wiki: Arc::new(FakeWiki {
                summary: Some(WIKI_SUMMARY.to_string()),
                subsidiaries: vec!["Widget Labs".to_string()],
                ..Default::default()
            }),
            chat: Arc::new(full_script()),
            db: Arc::new(db),
            repo: Arc::new(SqliteReportRepository::in_memory().unwrap()),
        }
    }

    fn researcher(&self) -> Researcher {
        self.researcher_with(test_config())
    }

    fn researcher_with(&self, config: corpscout::config::Config) -> Researcher {
        researcher(
            config,
            Arc::clone(&self.search),
            Arc::clone(&self.wiki),
            Arc::clone(&self.chat),
            Arc::clone(&self.db),
        )
        .with_repository(self.repo.clone())
    }
}

#[tokio::test]
async fn test_full_analysis_of_existing_company() {
    let fixture = Fixture::new(FakeDb::with_company(
        42,
        "Acme Robotics Ltd",
        acme_record(),
        &["Acme Robotics raises Series A round"],
    ));

    let report = fixture.researcher().analyze("https://www.acme.example/").await;

    assert!(report.warnings.is_empty(), "unexpected warnings: {:?}", report.warnings);
    assert_eq!(report.company_name, "Acme");
    assert_eq!(report.ceo.as_deref(), Some("Jane Doe"));
    assert!(report.summary.contains("- CEO: Jane Doe"));
    assert_eq!(report.ai_overview.name, "Acme Robotics");
    assert_eq!(report.ai_overview.ceo.as_deref(), Some("Jane Doe"));
    assert_eq!(report.ai_overview.year_founded, Some(2016));
    assert!(report.description.starts_with("Acme Robotics builds"));
    assert!(report.company_profile.kind.is_startup_like());

    assert_eq!(report.events.len(), 2);
    assert_eq!(report.matched.len(), 1);
    assert_eq!(report.matched[0].db_index, 0);
    assert_eq!(report.missing.len(), 1);
    assert_eq!(report.missing[0].event_short, "Partnership with Gamma Logistics announced");
    assert_eq!(report.missing[0].counterparties[0].individuals[0].name, "John Roe");

    assert!(report.is_existing());
    assert_eq!(report.existing_company.as_ref().unwrap().id, 42);
    assert_eq!(report.db_events.len(), 1);
    assert_eq!(report.db_overview.as_ref().unwrap().name, "Acme Robotics Ltd");
    assert_eq!(report.db_management.len(), 1);

    assert_eq!(report.management.len(), 1);
    assert_eq!(report.management[0].name, "Jane Doe");
    assert_eq!(report.subsidiaries.len(), 1);
    assert_eq!(report.subsidiaries[0].name, "Widget Labs");

    // Lookup uses the URL as entered
    assert_eq!(fixture.db.lookups.lock().unwrap()[0], "https://www.acme.example/");
}

#[tokio::test]
async fn test_analysis_is_stored_with_subsidiary_cache() {
    let fixture = Fixture::new(FakeDb::default());
    let report = fixture.researcher().analyze("https://www.acme.example/").await;

    let stored = fixture.repo.list_reports(None).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].company, "Acme");
    assert_eq!(stored[0].events().len(), report.events.len());
    assert_eq!(stored[0].management()[0].name, report.management[0].name);

    let cached = fixture.repo.subsidiaries("Acme").unwrap().unwrap();
    assert_eq!(cached[0].name, "Widget Labs");
}

#[tokio::test]
async fn test_unknown_company_has_every_event_missing() {
    let fixture = Fixture::new(FakeDb::default());
    let report = fixture.researcher().analyze("Acme Robotics").await;

    assert!(!report.is_existing());
    assert!(report.matched.is_empty());
    assert_eq!(report.missing.len(), report.events.len());
    assert_eq!(report.events.len(), 2);
    // Name queries fall back to the website from the summary
    assert_eq!(fixture.db.lookups.lock().unwrap()[0], "https://www.acme.example");
}

#[tokio::test]
async fn test_testing_mode_skips_classification() {
    let fixture = Fixture::new(FakeDb::default());
    let mut config = test_config();
    config.research.max_events = 1;
    config.research.enrich_events = false;

    let report = fixture.researcher_with(config).analyze("Acme Robotics").await;

    assert_eq!(report.company_profile, CompanyProfile::default());
    assert!(!fixture.chat.was_asked("classify-company"));
    assert!(!fixture.chat.was_asked("enrichment"));
    assert_eq!(report.events.len(), 1);
    assert!(!fixture
        .search
        .queries
        .lock()
        .unwrap()
        .iter()
        .any(|q| q.contains("founded startup")));
}

#[tokio::test]
async fn test_cached_subsidiaries_skip_lookup() {
    let fixture = Fixture::new(FakeDb::default());
    let cached = vec![Subsidiary {
        name: "Cached Sub Ltd".to_string(),
        ..Default::default()
    }];
    fixture.repo.store_subsidiaries("acme", &cached).unwrap();

    let report = fixture.researcher().analyze("https://www.acme.example/").await;

    assert_eq!(report.subsidiaries, cached);
    assert_eq!(*fixture.wiki.subsidiary_calls.lock().unwrap(), 0);
    assert!(!fixture.chat.was_asked("subsidiaries"));
}

#[tokio::test]
async fn test_store_disabled_in_config() {
    let fixture = Fixture::new(FakeDb::default());
    let mut config = test_config();
    config.research.store_reports = false;

    fixture.researcher_with(config).analyze("Acme Robotics").await;
    assert!(fixture.repo.list_reports(None).unwrap().is_empty());
}

#[tokio::test]
async fn test_refresh_reads_database_only() {
    let fixture = Fixture::new(FakeDb::with_company(
        42,
        "Acme Robotics Ltd",
        acme_record(),
        &["Acme Robotics raises Series A round"],
    ));

    let report = fixture.researcher().refresh(" https://www.acme.example ").await;

    assert_eq!(report.url, "https://www.acme.example");
    assert_eq!(report.existing_company.unwrap().id, 42);
    assert_eq!(report.db_overview.unwrap().year_founded, Some(2016));
    assert_eq!(report.db_management[0].name, "Jane Doe");
    assert_eq!(report.db_management[0].position, "CEO");
    assert_eq!(report.db_events.len(), 1);
    assert!(fixture.chat.calls().is_empty());
    assert_eq!(fixture.search.query_count(), 0);
}

#[tokio::test]
async fn test_push_event_builds_request() {
    let fixture = Fixture::new(FakeDb::default());
    let mut config = test_config();
    config.company_db.currency_ids = HashMap::from([("USD".to_string(), 1)]);

    let event = CorporateEvent {
        event_short: "Acme Robotics raises Series A funding".to_string(),
        announcement_date: Some("March 1, 2021".to_string()),
        value: "$12,000,000".to_string(),
        ..Default::default()
    };
    let outcome = fixture.researcher_with(config).push_event(42, &event).await.unwrap();
    assert_eq!(outcome.event_id, Some(901));

    let created = fixture.db.created.lock().unwrap();
    assert_eq!(created[0].new_company_id, 42);
    assert_eq!(created[0].announcement_date.as_deref(), Some("2021-03-01"));
    assert_eq!(created[0].investment_amount, Some(12_000_000));
    assert_eq!(created[0].currency_id, Some(1));
}
