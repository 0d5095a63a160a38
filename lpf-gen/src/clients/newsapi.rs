//! NewsAPI client
//!
//! Fetches trending headlines and keyword searches for content
//! inspiration. Transport failures degrade to an empty article list with
//! a warning; callers treat "no articles" and "news unavailable" the
//! same way.

use chrono::{Duration as ChronoDuration, Utc};
use lpf_common::{Error, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// NewsAPI base URL
const NEWSAPI_URL: &str = "https://newsapi.org/v2";

/// Default timeout for news requests
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Reputable sources only
const TRUSTED_SOURCES: &[&str] = &[
    "techcrunch",
    "wired",
    "the-verge",
    "ars-technica",
    "bbc-news",
    "cnn",
    "reuters",
    "the-wall-street-journal",
    "bloomberg",
    "financial-times",
    "business-insider",
    "the-washington-post",
    "the-new-york-times",
];

/// Search keywords per content pillar
const PILLAR_KEYWORDS: &[(&str, &str)] = &[
    (
        "AI & Innovation",
        "artificial intelligence OR machine learning OR AI OR innovation",
    ),
    ("Leadership", "leadership OR management OR business strategy"),
    (
        "Career Growth",
        "career OR professional development OR job market",
    ),
    ("Tech & Tools", "technology OR software OR tools OR apps"),
];

/// Formatted article returned to API consumers
#[derive(Debug, Clone, Serialize)]
pub struct Article {
    pub title: String,
    pub description: String,
    pub url: String,
    pub image_url: String,
    pub source: String,
    pub published_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

/// NewsAPI client
pub struct NewsClient {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl NewsClient {
    /// Create a new client against the public endpoint
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, NEWSAPI_URL.to_string())
    }

    /// Create a client against a custom base URL (tests, proxies)
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            http_client: Client::builder()
                .timeout(DEFAULT_TIMEOUT)
                .build()
                .expect("Failed to create HTTP client"),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Get top headlines by category
    ///
    /// Categories: business, entertainment, general, health, science,
    /// sports, technology. Articles without an image are dropped.
    pub async fn top_headlines(&self, category: &str, max_results: usize) -> Result<Vec<Article>> {
        let url = format!("{}/top-headlines", self.base_url);
        let params = [
            ("category", category.to_string()),
            ("language", "en".to_string()),
            ("apiKey", self.api_key.clone()),
            ("pageSize", max_results.to_string()),
        ];

        self.fetch_articles(&url, &params, max_results).await
    }

    /// Search trending articles from the last 7 days, sorted by popularity
    ///
    /// An empty query falls back to the pillar keyword table; an unknown
    /// pillar searches for the pillar name itself.
    pub async fn search(
        &self,
        query: &str,
        pillar: Option<&str>,
        max_results: usize,
    ) -> Result<Vec<Article>> {
        let search_query = if query.trim().is_empty() {
            match pillar {
                Some(pillar) => pillar_keywords(pillar)
                    .unwrap_or(pillar)
                    .to_string(),
                None => {
                    return Err(Error::InvalidInput(
                        "Either query or pillar is required".to_string(),
                    ))
                }
            }
        } else {
            query.to_string()
        };

        let from_date = (Utc::now() - ChronoDuration::days(7))
            .format("%Y-%m-%d")
            .to_string();

        let url = format!("{}/everything", self.base_url);
        let params = [
            ("q", search_query),
            ("from", from_date),
            ("sortBy", "popularity".to_string()),
            ("language", "en".to_string()),
            ("apiKey", self.api_key.clone()),
            // Fetch extra so the no-image filter still fills the page
            ("pageSize", (max_results * 2).to_string()),
            ("sources", TRUSTED_SOURCES.join(",")),
        ];

        self.fetch_articles(&url, &params, max_results).await
    }

    /// Execute a request and map the response, degrading to empty on
    /// transport errors
    async fn fetch_articles(
        &self,
        url: &str,
        params: &[(&str, String)],
        max_results: usize,
    ) -> Result<Vec<Article>> {
        let response = match self.http_client.get(url).query(params).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("NewsAPI request failed: {}", e);
                return Ok(Vec::new());
            }
        };

        if !response.status().is_success() {
            warn!("NewsAPI returned error status {}", response.status());
            return Ok(Vec::new());
        }

        let payload: NewsResponse = response
            .json()
            .await
            .map_err(|e| Error::Provider(format!("Failed to parse NewsAPI response: {}", e)))?;

        let articles: Vec<Article> = payload
            .articles
            .into_iter()
            .filter_map(format_article)
            .take(max_results)
            .collect();

        debug!(count = articles.len(), "NewsAPI query complete");
        Ok(articles)
    }
}

/// Resolve a content pillar to its search keywords
pub fn pillar_keywords(pillar: &str) -> Option<&'static str> {
    PILLAR_KEYWORDS
        .iter()
        .find(|(name, _)| *name == pillar)
        .map(|(_, keywords)| *keywords)
}

/// Map a raw article, dropping entries without an image
fn format_article(raw: RawArticle) -> Option<Article> {
    let image_url = raw.url_to_image.filter(|u| !u.is_empty())?;
    Some(Article {
        title: raw.title.unwrap_or_default(),
        description: raw.description.unwrap_or_default(),
        url: raw.url.unwrap_or_default(),
        image_url,
        source: raw
            .source
            .and_then(|s| s.name)
            .unwrap_or_else(|| "Unknown".to_string()),
        published_at: raw.published_at.unwrap_or_default(),
        author: raw.author,
    })
}

// ============================================================================
// NewsAPI Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct NewsResponse {
    #[serde(default)]
    articles: Vec<RawArticle>,
}

#[derive(Debug, Deserialize)]
struct RawArticle {
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    #[serde(rename = "urlToImage")]
    url_to_image: Option<String>,
    source: Option<RawSource>,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
    author: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSource {
    name: Option<String>,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pillar_table_resolves_known_pillars() {
        assert!(pillar_keywords("AI & Innovation")
            .unwrap()
            .contains("machine learning"));
        assert!(pillar_keywords("Leadership").unwrap().contains("management"));
        assert!(pillar_keywords("Unknown Pillar").is_none());
    }

    #[test]
    fn articles_without_image_are_dropped() {
        let payload: NewsResponse = serde_json::from_str(
            r#"{"status":"ok","articles":[
                {"title":"With image","url":"https://a","urlToImage":"https://img",
                 "source":{"name":"Wired"},"publishedAt":"2026-08-01T00:00:00Z"},
                {"title":"No image","url":"https://b","urlToImage":null,
                 "source":{"name":"Wired"},"publishedAt":"2026-08-01T00:00:00Z"}
            ]}"#,
        )
        .unwrap();

        let articles: Vec<Article> = payload
            .articles
            .into_iter()
            .filter_map(format_article)
            .collect();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "With image");
        assert_eq!(articles[0].source, "Wired");
    }

    #[test]
    fn missing_source_maps_to_unknown() {
        let raw: RawArticle = serde_json::from_str(
            r#"{"title":"T","urlToImage":"https://img"}"#,
        )
        .unwrap();
        let article = format_article(raw).unwrap();
        assert_eq!(article.source, "Unknown");
        assert!(article.author.is_none());
    }

    #[test]
    fn trusted_sources_cover_the_original_list() {
        assert_eq!(TRUSTED_SOURCES.len(), 13);
        assert!(TRUSTED_SOURCES.contains(&"reuters"));
    }
}
