//! Media generation endpoints
//!
//! Every endpoint follows one publish flow: render bytes, then either
//! upload them to storage (when requested, possible, and successful) or
//! fall back to a data URI. Upload failures degrade, they never fail the
//! request.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::ApiError;
use crate::clients::gemini;
use crate::clients::supabase::StorageObject;
use crate::render::carousel::{self, Slide};
use crate::render::chart::{ChartData, ChartType};
use crate::render::infographic::Stat;
use crate::render::{code, infographic, qr, theme, xml_escape};
use crate::AppState;
use lpf_common::{media::to_data_uri, MediaKind};

fn default_true() -> bool {
    true
}

/// Uniform media endpoint response
#[derive(Debug, Serialize)]
pub struct MediaResponse {
    pub success: bool,
    /// Public storage URL, or a data URI when storage is skipped
    pub url: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

/// Upload-or-data-URI tail shared by every media endpoint
async fn publish(
    state: &AppState,
    bytes: Vec<u8>,
    kind: MediaKind,
    post_id: Option<&str>,
    save_to_storage: bool,
) -> MediaResponse {
    if save_to_storage {
        if let (Some(post_id), Some(storage)) = (post_id, &state.storage) {
            match storage.upload_media(bytes.clone(), post_id, kind).await {
                Ok(url) => {
                    return MediaResponse {
                        success: true,
                        url,
                        kind: kind.label(),
                    }
                }
                Err(e) => warn!("Storage upload failed: {}", e),
            }
        }
    }

    MediaResponse {
        success: true,
        url: to_data_uri(&bytes, kind.mime_type()),
        kind: kind.label(),
    }
}

// ============================================================================
// Code image
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CodeImageRequest {
    pub code: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_code_theme")]
    pub theme: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub post_id: Option<String>,
    #[serde(default = "default_true")]
    pub save_to_storage: bool,
}

fn default_language() -> String {
    "python".to_string()
}

fn default_code_theme() -> String {
    "monokai".to_string()
}

/// POST /media/generate-code-image
pub async fn generate_code_image(
    State(state): State<AppState>,
    Json(request): Json<CodeImageRequest>,
) -> Result<Json<MediaResponse>, ApiError> {
    let bytes = code::render(
        &request.code,
        &request.language,
        &request.theme,
        request.title.as_deref(),
    )?;
    Ok(Json(
        publish(
            &state,
            bytes,
            MediaKind::Code,
            request.post_id.as_deref(),
            request.save_to_storage,
        )
        .await,
    ))
}

// ============================================================================
// Chart
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ChartRequest {
    /// bar, line, pie, scatter, area, or funnel
    pub chart_type: String,
    #[serde(default)]
    pub data: ChartData,
    pub title: String,
    #[serde(default = "default_chart_theme")]
    pub theme: String,
    #[serde(default)]
    pub post_id: Option<String>,
    #[serde(default = "default_true")]
    pub save_to_storage: bool,
}

fn default_chart_theme() -> String {
    "dark".to_string()
}

/// POST /media/generate-chart
pub async fn generate_chart(
    State(state): State<AppState>,
    Json(request): Json<ChartRequest>,
) -> Result<Json<MediaResponse>, ApiError> {
    let chart_type: ChartType = request.chart_type.parse().map_err(ApiError::from)?;
    let bytes =
        crate::render::chart::render(chart_type, &request.data, &request.title, &request.theme)?;
    Ok(Json(
        publish(
            &state,
            bytes,
            MediaKind::Chart,
            request.post_id.as_deref(),
            request.save_to_storage,
        )
        .await,
    ))
}

// ============================================================================
// Infographic
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct InfographicRequest {
    pub title: String,
    pub stats: Vec<Stat>,
    #[serde(default = "default_brand_color")]
    pub brand_color: String,
    #[serde(default)]
    pub post_id: Option<String>,
    #[serde(default = "default_true")]
    pub save_to_storage: bool,
}

fn default_brand_color() -> String {
    "#4a9eff".to_string()
}

/// POST /media/generate-infographic
pub async fn generate_infographic(
    State(state): State<AppState>,
    Json(request): Json<InfographicRequest>,
) -> Result<Json<MediaResponse>, ApiError> {
    let bytes = infographic::render(&request.title, &request.stats, &request.brand_color)?;
    Ok(Json(
        publish(
            &state,
            bytes,
            MediaKind::Infographic,
            request.post_id.as_deref(),
            request.save_to_storage,
        )
        .await,
    ))
}

// ============================================================================
// QR code
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct QrCodeRequest {
    pub url: String,
    #[serde(default)]
    pub post_id: Option<String>,
    #[serde(default = "default_true")]
    pub save_to_storage: bool,
}

/// POST /media/generate-qrcode
pub async fn generate_qrcode(
    State(state): State<AppState>,
    Json(request): Json<QrCodeRequest>,
) -> Result<Json<MediaResponse>, ApiError> {
    let bytes = qr::render(&request.url)?;
    Ok(Json(
        publish(
            &state,
            bytes,
            MediaKind::Qrcode,
            request.post_id.as_deref(),
            request.save_to_storage,
        )
        .await,
    ))
}

// ============================================================================
// Carousel
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CarouselRequest {
    pub slides: Vec<Slide>,
    pub title: String,
    #[serde(default = "default_carousel_theme")]
    pub theme: String,
    /// Optional branded caption above the footer bar
    #[serde(default)]
    pub footer: Option<String>,
    #[serde(default)]
    pub post_id: Option<String>,
    #[serde(default = "default_true")]
    pub save_to_storage: bool,
}

fn default_carousel_theme() -> String {
    "professional_blue".to_string()
}

/// POST /media/generate-carousel
///
/// One image-generation call per slide; a failed call only costs that
/// slide its illustration (the renderer draws a placeholder panel).
pub async fn generate_carousel(
    State(state): State<AppState>,
    Json(request): Json<CarouselRequest>,
) -> Result<Json<MediaResponse>, ApiError> {
    let theme = theme::lookup(&request.theme);

    let mut images: Vec<Option<Vec<u8>>> = Vec::with_capacity(request.slides.len());
    for (index, slide) in request.slides.iter().enumerate() {
        let image = match &state.gemini {
            Some(client) => {
                let prompt = carousel::image_prompt(index, slide, theme);
                match client.generate_image(&prompt).await {
                    Ok(bytes) => Some(bytes),
                    Err(e) => {
                        warn!(slide = index, "Slide image generation failed: {}", e);
                        None
                    }
                }
            }
            None => None,
        };
        images.push(image);
    }

    let bytes = carousel::render(
        &request.title,
        &request.slides,
        theme,
        &images,
        request.footer.as_deref(),
    )?;
    Ok(Json(
        publish(
            &state,
            bytes,
            MediaKind::Carousel,
            request.post_id.as_deref(),
            request.save_to_storage,
        )
        .await,
    ))
}

// ============================================================================
// AI image
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AiImageRequest {
    pub prompt: String,
    #[serde(default = "default_style")]
    pub style: String,
    #[serde(default)]
    pub post_id: Option<String>,
    #[serde(default = "default_true")]
    pub save_to_storage: bool,
}

fn default_style() -> String {
    "professional".to_string()
}

/// POST /media/generate-ai-image
pub async fn generate_ai_image(
    State(state): State<AppState>,
    Json(request): Json<AiImageRequest>,
) -> Result<Json<MediaResponse>, ApiError> {
    let client = state.gemini.as_ref().ok_or_else(|| {
        ApiError::NotConfigured(
            "Google API key not configured. Set LPF_GOOGLE_API_KEY or add google_api_key \
             to the TOML config."
                .to_string(),
        )
    })?;

    let enhanced = gemini::enhance_prompt(&request.prompt, &request.style);
    let bytes = client.generate_image(&enhanced).await?;

    Ok(Json(
        publish(
            &state,
            bytes,
            MediaKind::AiImage,
            request.post_id.as_deref(),
            request.save_to_storage,
        )
        .await,
    ))
}

// ============================================================================
// Interactive HTML
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct InteractiveRequest {
    pub prompt: String,
    pub title: String,
    #[serde(default)]
    pub post_id: Option<String>,
    #[serde(default = "default_true")]
    pub save_to_storage: bool,
}

/// POST /media/generate-interactive
///
/// Generation failures return a fallback error page instead of an error
/// status; the asset is still publishable.
pub async fn generate_interactive(
    State(state): State<AppState>,
    Json(request): Json<InteractiveRequest>,
) -> Result<Json<MediaResponse>, ApiError> {
    let html = match &state.gemini {
        Some(client) => {
            let prompt = interactive_prompt(&request.title, &request.prompt);
            match client.generate_text(&prompt).await {
                Ok(text) => strip_code_fences(&text),
                Err(e) => {
                    warn!("Interactive HTML generation failed: {}", e);
                    fallback_page(&e.to_string())
                }
            }
        }
        None => fallback_page("Google API key not configured"),
    };

    Ok(Json(
        publish(
            &state,
            html.into_bytes(),
            MediaKind::Interactive,
            request.post_id.as_deref(),
            request.save_to_storage,
        )
        .await,
    ))
}

/// Prompt for a self-contained interactive HTML component
fn interactive_prompt(title: &str, description: &str) -> String {
    format!(
        "Create a single-file, self-contained HTML/JS/CSS interactive component.\n\
         Topic: {}\n\
         Description of functionality: {}\n\n\
         Requirements:\n\
         - Must be a single HTML file with embedded CSS and JS.\n\
         - Design: Modern, professional, clean (like Stripe or Linear docs).\n\
         - Use Tailwind CSS (include via CDN: \
         <script src=\"https://cdn.tailwindcss.com\"></script>).\n\
         - Make it fully functional and interactive (buttons work, calcs work, etc.).\n\
         - Do not include markdown formatting (like ```html), just return the raw HTML.",
        title, description
    )
}

/// Strip markdown code fences the model sometimes adds anyway
pub(crate) fn strip_code_fences(text: &str) -> String {
    text.replace("```html", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Minimal error page served when generation fails
fn fallback_page(message: &str) -> String {
    format!(
        "<html><body><h1>Generation Error</h1><p>{}</p></body></html>",
        xml_escape(message)
    )
}

// ============================================================================
// Media listing
// ============================================================================

/// Response for GET /media/list/:post_id
#[derive(Debug, Serialize)]
pub struct MediaListResponse {
    pub post_id: String,
    pub media: Vec<StorageObject>,
}

/// GET /media/list/:post_id
///
/// Storage disabled means no persisted assets, not an error.
pub async fn list_post_media(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<Json<MediaListResponse>, ApiError> {
    let media = match &state.storage {
        Some(storage) => storage.list_media(&post_id).await?,
        None => Vec::new(),
    };

    Ok(Json(MediaListResponse { post_id, media }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_fences_are_stripped() {
        let cleaned = strip_code_fences("```html\n<html></html>\n```");
        assert_eq!(cleaned, "<html></html>");
        assert_eq!(strip_code_fences("<html/>"), "<html/>");
    }

    #[test]
    fn fallback_page_escapes_the_message() {
        let page = fallback_page("boom <script>");
        assert!(page.contains("Generation Error"));
        assert!(page.contains("boom &lt;script&gt;"));
    }

    #[test]
    fn interactive_prompt_embeds_topic_and_description() {
        let prompt = interactive_prompt("Mortgage Calculator", "sliders for rate and term");
        assert!(prompt.contains("Topic: Mortgage Calculator"));
        assert!(prompt.contains("sliders for rate and term"));
        assert!(prompt.contains("tailwindcss"));
    }
}
