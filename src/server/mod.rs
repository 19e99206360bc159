//! HTTP JSON API
//!
//! One [`Researcher`] is shared by every request; analyses run to completion
//! inside the request that started them.

pub mod api;

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::research::Researcher;

pub use api::create_router;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub researcher: Arc<Researcher>,

    /// Server start time
    pub start_time: Instant,
}

impl AppState {
    pub fn new(researcher: Arc<Researcher>) -> Self {
        Self {
            researcher,
            start_time: Instant::now(),
        }
    }
}

/// Router with tracing and permissive CORS layers
pub fn app(state: AppState) -> Router {
    create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

/// Bind and serve until the process is stopped
pub async fn serve(researcher: Arc<Researcher>, host: &str, port: u16) -> Result<()> {
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    tracing::info!(addr = %addr, "API server listening");
    axum::serve(listener, app(AppState::new(researcher)))
        .await
        .context("Server error")?;

    Ok(())
}
