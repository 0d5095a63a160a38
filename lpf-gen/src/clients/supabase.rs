//! Supabase client: object storage and the posts table
//!
//! Two surfaces of the same backend share one client: the storage API
//! (`/storage/v1`) persists generated media under
//! `{post_id}/{kind}_{timestamp}.{ext}` keys, and the PostgREST surface
//! (`/rest/v1`) reads previously posted posts for prompt learning
//! context.

use chrono::Utc;
use lpf_common::{Error, MediaKind, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// Default timeout for storage requests (uploads carry whole PDFs)
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Stored media object, as returned by the listing endpoint
#[derive(Debug, Clone, Serialize)]
pub struct StorageObject {
    pub name: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// A previously posted post used for learning context
#[derive(Debug, Clone, Deserialize)]
pub struct PostedPost {
    pub text: String,
    #[serde(default)]
    pub hashtags: Option<Vec<String>>,
    #[serde(default)]
    #[allow(dead_code)] // Selected for parity with the posts schema
    pub voice_score: Option<f64>,
}

/// Supabase storage + posts client
pub struct SupabaseClient {
    http_client: Client,
    base_url: String,
    bucket: String,
}

impl SupabaseClient {
    /// Create a new client
    ///
    /// `base_url` is the project URL without a trailing slash; `api_key`
    /// is sent both as `apikey` and bearer token, as the REST surface
    /// expects.
    pub fn new(base_url: String, api_key: String, bucket: String) -> Self {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(&api_key) {
            headers.insert("apikey", value);
        }
        if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", api_key)) {
            headers.insert(AUTHORIZATION, value);
        }

        Self {
            http_client: Client::builder()
                .timeout(DEFAULT_TIMEOUT)
                .default_headers(headers)
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            bucket,
        }
    }

    /// Object key for a generated asset
    fn object_key(post_id: &str, kind: MediaKind, timestamp_ms: i64) -> String {
        format!(
            "{}/{}_{}.{}",
            post_id,
            kind.label(),
            timestamp_ms,
            kind.extension()
        )
    }

    /// Public download URL for an object key
    fn public_url(&self, key: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, key
        )
    }

    /// Upload a generated asset, returning its public URL
    pub async fn upload_media(
        &self,
        data: Vec<u8>,
        post_id: &str,
        kind: MediaKind,
    ) -> Result<String> {
        let key = Self::object_key(post_id, kind, Utc::now().timestamp_millis());
        let url = format!("{}/storage/v1/object/{}/{}", self.base_url, self.bucket, key);

        debug!(key = %key, bytes = data.len(), "Uploading media to storage");

        let response = self
            .http_client
            .post(&url)
            .header("content-type", kind.mime_type())
            .header("x-upsert", "true")
            .body(data)
            .send()
            .await
            .map_err(|e| Error::Provider(format!("Storage upload failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Provider(format!(
                "Storage upload returned error {}: {}",
                status, body
            )));
        }

        Ok(self.public_url(&key))
    }

    /// List stored media for a post
    pub async fn list_media(&self, post_id: &str) -> Result<Vec<StorageObject>> {
        let url = format!("{}/storage/v1/object/list/{}", self.base_url, self.bucket);
        let body = json!({
            "prefix": post_id,
            "limit": 100,
            "offset": 0,
        });

        let response = self
            .http_client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Provider(format!("Storage listing failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Provider(format!(
                "Storage listing returned error {}: {}",
                status, body
            )));
        }

        let objects: Vec<RawObject> = response
            .json()
            .await
            .map_err(|e| Error::Provider(format!("Failed to parse storage listing: {}", e)))?;

        Ok(objects
            .into_iter()
            .map(|raw| {
                let url = self.public_url(&format!("{}/{}", post_id, raw.name));
                StorageObject {
                    name: raw.name,
                    url,
                    size: raw.metadata.as_ref().and_then(|m| m.size),
                    mime_type: raw.metadata.and_then(|m| m.mimetype),
                    created_at: raw.created_at,
                }
            })
            .collect())
    }

    /// Fetch the most recent posted posts for learning context
    pub async fn fetch_posted_posts(&self, limit: usize) -> Result<Vec<PostedPost>> {
        let url = format!("{}/rest/v1/posts", self.base_url);
        let params = [
            ("select", "text,hashtags,voice_score".to_string()),
            ("status", "eq.posted".to_string()),
            ("order", "created_at.desc".to_string()),
            ("limit", limit.to_string()),
        ];

        let response = self
            .http_client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| Error::Provider(format!("Posts query failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Provider(format!(
                "Posts query returned error {}: {}",
                status, body
            )));
        }

        let posts: Vec<PostedPost> = response
            .json()
            .await
            .map_err(|e| Error::Provider(format!("Failed to parse posts: {}", e)))?;

        debug!(count = posts.len(), "Fetched posted posts");
        Ok(posts)
    }
}

// ============================================================================
// Storage API Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawObject {
    name: String,
    created_at: Option<String>,
    metadata: Option<RawMetadata>,
}

#[derive(Debug, Deserialize)]
struct RawMetadata {
    size: Option<u64>,
    mimetype: Option<String>,
}

// ============================================================================
// Tests
// ============================================================================
