//! Report store persistence tests

use tempfile::TempDir;

use corpscout::models::{CorporateEvent, ManagementEntry, RoleStatus, Subsidiary};
use corpscout::storage::{NewReport, ReportRepository, SqliteReportRepository};

#[test]
fn test_reports_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("reports.db");

    let events = vec![CorporateEvent {
        event_short: "Acme acquired Widget Corp".to_string(),
        announcement_date: Some("2021-04-01".to_string()),
        value: "$12,000,000".to_string(),
        ..Default::default()
    }];
    let management = vec![ManagementEntry::new("Jane Doe", "CEO", RoleStatus::Current)];

    {
        let repo = SqliteReportRepository::new(&path).unwrap();
        repo.store_report(&NewReport {
            company: "Acme",
            summary: "- Company Name: Acme",
            description: "Acme makes anvils.",
            events: &events,
            management: &management,
        })
        .unwrap();
        repo.store_subsidiaries(
            "Acme",
            &[Subsidiary {
                name: "Widget Corp".to_string(),
                ..Default::default()
            }],
        )
        .unwrap();
    }

    let repo = SqliteReportRepository::new(&path).unwrap();
    let reports = repo.list_reports(None).unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].company, "Acme");
    assert_eq!(reports[0].events()[0].event_short, "Acme acquired Widget Corp");
    assert_eq!(reports[0].events()[0].value, "$12,000,000");
    assert_eq!(reports[0].management(), management);

    let cached = repo.subsidiaries(" ACME ").unwrap().unwrap();
    assert_eq!(cached[0].name, "Widget Corp");
    assert!(repo.subsidiaries("Beta").unwrap().is_none());
}

#[test]
fn test_limit_applies_newest_first() {
    let repo = SqliteReportRepository::in_memory().unwrap();
    for company in ["Alpha", "Beta", "Gamma"] {
        repo.store_report(&NewReport {
            company,
            ..Default::default()
        })
        .unwrap();
    }

    let names: Vec<String> = repo
        .list_reports(Some(2))
        .unwrap()
        .into_iter()
        .map(|r| r.company)
        .collect();
    assert_eq!(names, vec!["Gamma", "Beta"]);
}
