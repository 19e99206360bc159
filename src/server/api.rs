//! REST API handlers
//!
//! This module defines the API routes and handlers for the research server.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{CorporateEvent, ManagementEntry};
use crate::storage::StoredReport;
use crate::utils::error::FetchError;

use super::AppState;

/// Reports returned when no limit is given
const DEFAULT_REPORT_LIMIT: usize = 50;

// ============================================================================
// API Response Types
// ============================================================================

/// Generic API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

/// Simple error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
        }
    }
}

fn error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorResponse::new(message))).into_response()
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub search_enabled: bool,
    pub company_db_configured: bool,
    pub report_store: bool,
}

/// Body of `/analyze` and `/refresh_db`
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub query: String,
}

/// Body of `/events`
#[derive(Debug, Deserialize)]
pub struct PushEventRequest {
    pub company_id: i64,
    pub event: CorporateEvent,
}

#[derive(Debug, Deserialize)]
pub struct ReportsQuery {
    pub limit: Option<usize>,
}

/// Stored report with decoded records
#[derive(Debug, Serialize)]
pub struct ReportView {
    pub id: i64,
    pub company: String,
    pub summary: String,
    pub description: String,
    pub events: Vec<CorporateEvent>,
    pub management: Vec<ManagementEntry>,
    pub created_at: DateTime<Utc>,
}

impl From<&StoredReport> for ReportView {
    fn from(report: &StoredReport) -> Self {
        Self {
            id: report.id,
            company: report.company.clone(),
            summary: report.summary.clone(),
            description: report.description.clone(),
            events: report.events(),
            management: report.management(),
            created_at: report.created_at,
        }
    }
}

// ============================================================================
// API Routes
// ============================================================================

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/analyze", post(analyze))
        .route("/refresh_db", post(refresh_db))
        .route("/reports", get(list_reports))
        .route("/events", post(push_event))
        .with_state(state)
}

// ============================================================================
// Handlers
// ============================================================================

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let config = state.researcher.config();

    Json(ApiResponse::success(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        search_enabled: config.search_enabled(),
        company_db_configured: config.company_db.base_url.is_some(),
        report_store: state.researcher.repository().is_some(),
    }))
}

/// Full AI analysis plus gap analysis
async fn analyze(State(state): State<AppState>, Json(request): Json<QueryRequest>) -> Response {
    let query = request.query.trim();
    if query.is_empty() {
        return error(StatusCode::BAD_REQUEST, "Missing 'query' field");
    }

    let report = state.researcher.analyze(query).await;
    (StatusCode::OK, Json(ApiResponse::success(report))).into_response()
}

/// Database data only, no model calls
async fn refresh_db(State(state): State<AppState>, Json(request): Json<QueryRequest>) -> Response {
    let query = request.query.trim();
    if query.is_empty() {
        return error(StatusCode::BAD_REQUEST, "Missing 'query' field");
    }

    let report = state.researcher.refresh(query).await;
    (StatusCode::OK, Json(ApiResponse::success(report))).into_response()
}

async fn list_reports(State(state): State<AppState>, Query(params): Query<ReportsQuery>) -> Response {
    let Some(repo) = state.researcher.repository() else {
        return error(StatusCode::SERVICE_UNAVAILABLE, "Report store is disabled");
    };

    match repo.list_reports(Some(params.limit.unwrap_or(DEFAULT_REPORT_LIMIT))) {
        Ok(reports) => {
            let views: Vec<ReportView> = reports.iter().map(ReportView::from).collect();
            (StatusCode::OK, Json(ApiResponse::success(views))).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to list reports");
            error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to list reports")
        }
    }
}

/// Add a missing event to the company database
async fn push_event(State(state): State<AppState>, Json(request): Json<PushEventRequest>) -> Response {
    match state.researcher.push_event(request.company_id, &request.event).await {
        Ok(outcome) => (StatusCode::OK, Json(ApiResponse::success(outcome))).into_response(),
        Err(e) => {
            tracing::warn!(company_id = request.company_id, error = %e, "Event creation failed");
            let status = match e {
                FetchError::NotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
                FetchError::Timeout => StatusCode::GATEWAY_TIMEOUT,
                _ => StatusCode::BAD_GATEWAY,
            };
            error(status, e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_response_success() {
        let response = ApiResponse::success(vec![1, 2]);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], serde_json::json!([1, 2]));
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_error_response() {
        let json = serde_json::to_value(ErrorResponse::new("boom")).unwrap();
        assert_eq!(json, serde_json::json!({"success": false, "error": "boom"}));
    }

    #[test]
    fn test_report_view_decodes_legacy_rows() {
        let stored = StoredReport {
            id: 3,
            company: "Acme".to_string(),
            summary: String::new(),
            description: String::new(),
            events_json: "[]".to_string(),
            management_json: "Jane Doe - CEO".to_string(),
            created_at: Utc::now(),
        };
        let view = ReportView::from(&stored);
        assert!(view.events.is_empty());
        assert_eq!(view.management[0].position, "CEO");
    }
}
