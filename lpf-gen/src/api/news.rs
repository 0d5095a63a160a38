//! News endpoints for content inspiration

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::ApiError;
use crate::clients::newsapi::Article;
use crate::AppState;

/// Upper bound on requested article counts
const MAX_COUNT: usize = 50;

fn default_category() -> String {
    "technology".to_string()
}

fn default_count() -> usize {
    10
}

/// Query parameters for GET /news/trending
#[derive(Debug, Deserialize)]
pub struct TrendingQuery {
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_count")]
    pub count: usize,
}

/// Response for GET /news/trending
#[derive(Debug, Serialize)]
pub struct TrendingResponse {
    pub success: bool,
    pub articles: Vec<Article>,
    pub category: String,
}

/// GET /news/trending
///
/// Top headlines by category for content inspiration.
pub async fn trending_news(
    State(state): State<AppState>,
    Query(query): Query<TrendingQuery>,
) -> Result<Json<TrendingResponse>, ApiError> {
    let news = state.news.as_ref().ok_or_else(not_configured)?;

    let articles = news
        .top_headlines(&query.category, query.count.min(MAX_COUNT))
        .await?;

    Ok(Json(TrendingResponse {
        success: true,
        articles,
        category: query.category,
    }))
}

/// Query parameters for GET /news/search
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub pillar: Option<String>,
    #[serde(default = "default_count")]
    pub count: usize,
}

/// Response for GET /news/search
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub articles: Vec<Article>,
    pub query: String,
}

/// GET /news/search
///
/// Popularity-sorted search over the last week, restricted to trusted
/// sources. An empty query falls back to the pillar keyword table.
pub async fn search_news(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, ApiError> {
    let news = state.news.as_ref().ok_or_else(not_configured)?;

    let articles = news
        .search(
            &query.query,
            query.pillar.as_deref(),
            query.count.min(MAX_COUNT),
        )
        .await?;

    Ok(Json(SearchResponse {
        success: true,
        articles,
        query: query.query,
    }))
}

fn not_configured() -> ApiError {
    ApiError::NotConfigured(
        "NewsAPI key not configured. Set LPF_NEWSAPI_KEY or add newsapi_key to the TOML config."
            .to_string(),
    )
}
