//! Service banner and health check endpoints

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};

use crate::AppState;

/// GET /
///
/// Service banner, kept for frontend liveness probes.
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "LinkedIn Post Factory API",
        "status": "running",
    }))
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
    pub providers: ProviderStatus,
    /// Local rendering needs no credentials, so it is always available
    pub media_generation: bool,
    pub storage: bool,
}

/// Per-provider availability, derived from configured credentials
#[derive(Debug, Serialize)]
pub struct ProviderStatus {
    pub gemini: bool,
    pub newsapi: bool,
}

/// GET /health
///
/// Health check endpoint for monitoring. Reports which providers are
/// configured so the frontend can grey out unavailable features.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        module: "lpf-gen".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        providers: ProviderStatus {
            gemini: state.gemini.is_some(),
            newsapi: state.news.is_some(),
        },
        media_generation: true,
        storage: state.storage.is_some(),
    })
}
