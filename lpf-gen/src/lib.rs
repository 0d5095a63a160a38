//! lpf-gen library - LinkedIn Post Factory content generator
//!
//! HTTP service composing an LLM provider, a news API, and an object
//! store into content-generation endpoints: post text, code cards,
//! charts, infographics, QR codes, PDF carousels, AI images, and
//! interactive HTML demos.

use axum::http::HeaderValue;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod api;
pub mod clients;
pub mod config;
pub mod render;

use clients::gemini::GeminiClient;
use clients::newsapi::NewsClient;
use clients::supabase::SupabaseClient;
use config::Config;

/// Application state shared across HTTP handlers
///
/// Each client is present only when its provider is configured; handlers
/// that need an absent client answer 400 rather than failing at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub gemini: Option<Arc<GeminiClient>>,
    pub news: Option<Arc<NewsClient>>,
    pub storage: Option<Arc<SupabaseClient>>,
}

impl AppState {
    /// Build state from resolved configuration, constructing the clients
    /// whose credentials are present.
    pub fn from_config(config: Config) -> Self {
        let gemini = config
            .google_api_key
            .as_ref()
            .map(|key| Arc::new(GeminiClient::new(key.clone())));
        let news = config
            .newsapi_key
            .as_ref()
            .map(|key| Arc::new(NewsClient::new(key.clone())));
        let storage = match (&config.supabase_url, &config.supabase_key) {
            (Some(url), Some(key)) => Some(Arc::new(SupabaseClient::new(
                url.clone(),
                key.clone(),
                config.storage_bucket.clone(),
            ))),
            _ => None,
        };

        Self {
            config: Arc::new(config),
            gemini,
            news,
            storage,
        }
    }
}

/// Build application router
///
/// All routes are public; CORS origins come from configuration (the
/// original service allowed only its local frontend).
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let origins: Vec<HeaderValue> = state
        .config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(api::root))
        .route("/health", get(api::health_check))
        .route("/posts/generate", post(api::generate_post))
        .route("/media/generate-code-image", post(api::generate_code_image))
        .route("/media/generate-chart", post(api::generate_chart))
        .route(
            "/media/generate-infographic",
            post(api::generate_infographic),
        )
        .route("/media/generate-qrcode", post(api::generate_qrcode))
        .route("/media/generate-carousel", post(api::generate_carousel))
        .route("/media/generate-ai-image", post(api::generate_ai_image))
        .route(
            "/media/generate-interactive",
            post(api::generate_interactive),
        )
        .route("/media/list/:post_id", get(api::list_post_media))
        .route("/news/trending", get(api::trending_news))
        .route("/news/search", get(api::search_news))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
