//! Gemini API client
//!
//! Text and image generation against a `generateContent`-style REST
//! endpoint. One client instance serves both models; the carousel
//! renderer issues one image call per slide, so requests are rate
//! limited to 1/sec to stay inside the provider's free-tier quota.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use lpf_common::{Error, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use tracing::debug;

/// Gemini API base URL
const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model used for post text and HTML generation
const TEXT_MODEL: &str = "gemini-2.0-flash";

/// Model used for image generation
const IMAGE_MODEL: &str = "gemini-2.5-flash-image";

/// Default timeout; image generation regularly takes tens of seconds
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Minimum interval between requests
const RATE_LIMIT_INTERVAL: Duration = Duration::from_millis(1000);

/// Style modifiers appended to AI image prompts
const STYLE_MODIFIERS: &[(&str, &str)] = &[
    (
        "professional",
        "Professional, clean, corporate style. High quality, modern design.",
    ),
    (
        "artistic",
        "Artistic, creative, visually striking. Bold colors and unique composition.",
    ),
    (
        "technical",
        "Technical, precise, clear diagrams. Clean lines and professional appearance.",
    ),
    (
        "minimal",
        "Minimalist, simple, elegant. Clean design with focus on key elements.",
    ),
];

/// Enhance an image prompt with a named style modifier
///
/// Unknown styles fall back to "professional".
pub fn enhance_prompt(prompt: &str, style: &str) -> String {
    let modifier = STYLE_MODIFIERS
        .iter()
        .find(|(name, _)| *name == style)
        .or_else(|| STYLE_MODIFIERS.iter().find(|(name, _)| *name == "professional"))
        .map(|(_, text)| *text)
        .unwrap_or_default();
    format!("{}. {}", prompt, modifier)
}

/// Gemini API client
///
/// Sends prompts to the `models/{model}:generateContent` endpoint and
/// extracts either concatenated candidate text or inline image bytes.
pub struct GeminiClient {
    http_client: Client,
    api_key: String,
    base_url: String,
    /// Rate limiter (last request time)
    rate_limiter: Arc<Mutex<Option<Instant>>>,
}

impl GeminiClient {
    /// Create a new client against the public endpoint
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, GEMINI_API_URL.to_string())
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
            rate_limiter: Arc::new(Mutex::new(None)),
        }
    }

    /// Enforce the minimum interval between requests
    async fn enforce_rate_limit(&self) {
        let mut last_request = self.rate_limiter.lock().await;

        if let Some(last_time) = *last_request {
            let elapsed = last_time.elapsed();
            if elapsed < RATE_LIMIT_INTERVAL {
                let sleep_duration = RATE_LIMIT_INTERVAL - elapsed;
                debug!(
                    sleep_ms = sleep_duration.as_millis(),
                    "Rate limiting: sleeping before Gemini request"
                );
                sleep(sleep_duration).await;
            }
        }

        *last_request = Some(Instant::now());
    }

    /// Execute a generateContent call against the given model
    async fn generate_content(&self, model: &str, prompt: &str) -> Result<GenerateContentResponse> {
        self.enforce_rate_limit().await;

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        );
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        debug!(model = %model, prompt_len = prompt.len(), "Sending Gemini request");

        let response = self
            .http_client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Provider(format!("Gemini API request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Provider(format!(
                "Gemini API returned error {}: {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Provider(format!("Failed to parse Gemini response: {}", e)))
    }

    /// Generate text from a prompt
    ///
    /// Concatenates the text parts of the first candidate.
    pub async fn generate_text(&self, prompt: &str) -> Result<String> {
        let response = self.generate_content(TEXT_MODEL, prompt).await?;

        let text = response.first_candidate_text();
        if text.is_empty() {
            return Err(Error::Provider(
                "No text in Gemini response".to_string(),
            ));
        }

        debug!(chars = text.len(), "Gemini text generation complete");
        Ok(text)
    }

    /// Generate an image from a prompt
    ///
    /// Returns the decoded bytes of the first inline-data part.
    pub async fn generate_image(&self, prompt: &str) -> Result<Vec<u8>> {
        let response = self.generate_content(IMAGE_MODEL, prompt).await?;

        let inline = response
            .first_inline_data()
            .ok_or_else(|| Error::Provider("No image data in Gemini response".to_string()))?;

        let bytes = STANDARD
            .decode(&inline.data)
            .map_err(|e| Error::Provider(format!("Invalid image payload: {}", e)))?;

        debug!(bytes = bytes.len(), "Gemini image generation complete");
        Ok(bytes)
    }
}

// ============================================================================
// Gemini API Request/Response Types
// ============================================================================

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate's parts
    fn first_candidate_text(&self) -> String {
        self.parts()
            .filter_map(|part| part.text.as_deref())
            .collect::<Vec<_>>()
            .join("")
    }

    /// First inline-data (image) part of the first candidate
    fn first_inline_data(&self) -> Option<&InlineData> {
        self.parts().find_map(|part| part.inline_data.as_ref())
    }

    fn parts(&self) -> impl Iterator<Item = &ResponsePart> {
        self.candidates
            .iter()
            .flatten()
            .take(1)
            .filter_map(|candidate| candidate.content.as_ref())
            .filter_map(|content| content.parts.as_ref())
            .flatten()
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    parts: Option<Vec<ResponsePart>>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
    #[serde(rename = "inlineData", alias = "inline_data")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
struct InlineData {
    #[serde(rename = "mimeType", alias = "mime_type")]
    #[allow(dead_code)] // Deserialized from API but not directly accessed
    mime_type: Option<String>,
    data: String,
}

// ============================================================================
// Tests
// ============================================================================
