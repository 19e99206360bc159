//! Analyses with failing collaborators degrade instead of aborting

use std::sync::Arc;

use corpscout::models::ManagementEntry;

use crate::common::*;

fn stages(warnings: &[corpscout::models::AnalysisWarning]) -> Vec<&str> {
    warnings.iter().map(|w| w.stage.as_str()).collect()
}

#[tokio::test]
async fn test_every_collaborator_failing() {
    let search = Arc::new(FakeSearch::unconfigured());
    let chat = Arc::new(ScriptedChat::default());
    let db = Arc::new(FakeDb {
        unreachable: true,
        ..Default::default()
    });
    let researcher = researcher(test_config(), search, Arc::new(FakeWiki::default()), chat, db);

    let report = researcher.analyze("https://www.acme.example/").await;

    assert_eq!(report.company_name, "Acme");
    assert!(report.summary.is_empty());
    assert!(report.events.is_empty());
    assert!(report.management.is_empty());
    assert!(report.subsidiaries.is_empty());
    assert!(!report.is_existing());

    let stages = stages(&report.warnings);
    assert!(stages.contains(&"summary"));
    assert!(stages.contains(&"management"));
    assert!(stages.contains(&"subsidiaries"));
    assert!(stages.contains(&"company_db"));
    assert!(stages.contains(&"summary_search"));
}

#[tokio::test]
async fn test_model_failures_keep_search_driven_fallbacks() {
    // CEO comes from the regex cascade when the model is unavailable
    let search = Arc::new(FakeSearch::with_hits(startup_hits()));
    let chat = Arc::new(ScriptedChat::new(&[("summary", SUMMARY_REPLY)]));
    let researcher = researcher(
        test_config(),
        search,
        Arc::new(FakeWiki::default()),
        chat,
        Arc::new(FakeDb::default()),
    );

    let report = researcher.analyze("Acme Robotics").await;

    assert_eq!(report.ceo.as_deref(), Some("Jane Doe"));
    assert!(report.summary.contains("- CEO: Jane Doe"));
    assert!(report.description.is_empty());
    assert!(report.events.is_empty());
    assert!(stages(&report.warnings).contains(&"events"));
}

#[tokio::test]
async fn test_short_description_is_discarded() {
    let chat = Arc::new(ScriptedChat::new(&[
        ("summary", SUMMARY_REPLY),
        ("description", "Robots."),
    ]));
    let researcher = researcher(
        test_config(),
        Arc::new(FakeSearch::with_hits(startup_hits())),
        Arc::new(FakeWiki::default()),
        chat,
        Arc::new(FakeDb::default()),
    );

    let report = researcher.analyze("Acme Robotics").await;
    assert!(report.description.is_empty());
    assert!(report.ai_overview.description.is_none());
    assert!(stages(&report.warnings).contains(&"description"));
}

#[tokio::test]
async fn test_management_fallback_prompt() {
    let chat = Arc::new(ScriptedChat::new(&[
        ("management", "I could not find anyone."),
        ("management-fallback", MANAGEMENT_REPLY),
    ]));
    let researcher = researcher(
        test_config(),
        Arc::new(FakeSearch::with_hits(startup_hits())),
        Arc::new(FakeWiki::default()),
        Arc::clone(&chat),
        Arc::new(FakeDb::default()),
    );

    let report = researcher.analyze("Acme Robotics").await;

    assert_eq!(
        report.management,
        vec![ManagementEntry::new(
            "Jane Doe",
            "Chief Executive Officer",
            corpscout::models::RoleStatus::Current
        )]
    );
    let calls = chat.calls();
    let primary = calls.iter().position(|c| c == "management").unwrap();
    let fallback = calls.iter().position(|c| c == "management-fallback").unwrap();
    assert!(primary < fallback);
}

#[tokio::test]
async fn test_linkedin_lookup_attaches_profiles() {
    let mut hits = startup_hits();
    hits.push(hit(
        "Jane Doe - CEO - Acme Robotics | LinkedIn",
        "View Jane Doe's profile",
        "https://www.linkedin.com/in/jane-doe-acme",
    ));
    let mut config = test_config();
    config.research.linkedin_lookup = true;

    let researcher = researcher(
        config,
        Arc::new(FakeSearch::with_hits(hits)),
        Arc::new(FakeWiki::default()),
        Arc::new(full_script()),
        Arc::new(FakeDb::default()),
    );

    let report = researcher.analyze("Acme Robotics").await;
    assert_eq!(
        report.management[0].linkedin_url.as_deref(),
        Some("https://www.linkedin.com/in/jane-doe-acme")
    );
}
