//! HTTP API tests against the router

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use corpscout::research::Researcher;
use corpscout::server::{app, AppState};
use corpscout::storage::SqliteReportRepository;

use crate::common::*;

fn router(researcher: Researcher) -> axum::Router {
    app(AppState::new(Arc::new(researcher)))
}

fn default_researcher(db: FakeDb) -> Researcher {
    researcher(
        test_config(),
        Arc::new(FakeSearch::with_hits(startup_hits())),
        Arc::new(FakeWiki {
            summary: Some(WIKI_SUMMARY.to_string()),
            ..Default::default()
        }),
        Arc::new(full_script()),
        Arc::new(db),
    )
}

async fn send(router: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(router(default_researcher(FakeDb::default())), get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "healthy");
    assert_eq!(body["data"]["search_enabled"], true);
    assert_eq!(body["data"]["company_db_configured"], false);
    assert_eq!(body["data"]["report_store"], false);
}

#[tokio::test]
async fn test_analyze_requires_query() {
    let (status, body) = send(
        router(default_researcher(FakeDb::default())),
        post_json("/analyze", json!({"query": "   "})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Missing 'query' field");

    let (status, _) = send(
        router(default_researcher(FakeDb::default())),
        post_json("/refresh_db", json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_analyze_returns_report() {
    let (status, body) = send(
        router(default_researcher(FakeDb::default())),
        post_json("/analyze", json!({"query": "https://www.acme.example/"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let report = &body["data"];
    assert_eq!(report["company_name"], "Acme");
    assert_eq!(report["events"].as_array().unwrap().len(), 2);
    assert_eq!(report["missing"].as_array().unwrap().len(), 2);
    assert!(report["existing_company"].is_null());
    assert!(report["id"].is_string());
}

#[tokio::test]
async fn test_refresh_db() {
    let db = FakeDb::with_company(7, "Acme Robotics Ltd", json!({"name": "Acme Robotics Ltd"}), &["Old event"]);
    let (status, body) = send(
        router(default_researcher(db)),
        post_json("/refresh_db", json!({"query": "https://www.acme.example"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["existing_company"]["id"], 7);
    assert_eq!(body["data"]["db_overview"]["name"], "Acme Robotics Ltd");
    assert_eq!(body["data"]["db_events"][0]["description"], "Old event");
}

#[tokio::test]
async fn test_reports_without_store() {
    let (status, body) = send(router(default_researcher(FakeDb::default())), get("/reports")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "Report store is disabled");
}

#[tokio::test]
async fn test_reports_after_analysis() {
    let repo = Arc::new(SqliteReportRepository::in_memory().unwrap());
    let researcher = Arc::new(default_researcher(FakeDb::default()).with_repository(repo));
    researcher.analyze("Acme Robotics").await;
    researcher.analyze("https://www.beta.example/").await;

    let app = app(AppState::new(Arc::clone(&researcher)));
    let (status, body) = send(app, get("/reports?limit=1")).await;

    assert_eq!(status, StatusCode::OK);
    let reports = body["data"].as_array().unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0]["company"], "Beta");
    assert_eq!(reports[0]["events"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_push_event() {
    let event = json!({"event_short": "Partnership with Gamma Logistics announced", "announcement_date": "2023-05-10"});
    let (status, body) = send(
        router(default_researcher(FakeDb::default())),
        post_json("/events", json!({"company_id": 42, "event": event})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["event_id"], 901);
}

#[tokio::test]
async fn test_push_event_unconfigured() {
    let db = FakeDb {
        create_unconfigured: true,
        ..Default::default()
    };
    let (status, body) = send(
        router(default_researcher(db)),
        post_json("/events", json!({"company_id": 42, "event": {"event_short": "Something"}})),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["success"], false);
}
