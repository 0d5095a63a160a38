//! Integration tests for lpf-gen API endpoints
//!
//! Runs the router with no providers configured: local renderers must
//! work end to end (data-URI responses, carousel placeholders), and
//! provider-backed endpoints must answer 400 rather than reaching for
//! the network.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use lpf_gen::config::Config;
use lpf_gen::{build_router, AppState};
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot` method

/// Test helper: state with every provider unconfigured
fn setup_app() -> axum::Router {
    let config = Config {
        bind: "127.0.0.1:8000".parse().unwrap(),
        google_api_key: None,
        newsapi_key: None,
        supabase_url: None,
        supabase_key: None,
        storage_bucket: "post-media".to_string(),
        cors_origins: vec!["http://localhost:3000".to_string()],
    };
    build_router(AppState::from_config(config))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

/// Decode the payload of a `data:<mime>;base64,` URI
fn decode_data_uri(uri: &str, expected_mime: &str) -> Vec<u8> {
    let prefix = format!("data:{};base64,", expected_mime);
    let payload = uri
        .strip_prefix(&prefix)
        .unwrap_or_else(|| panic!("expected {} data URI, got {}", expected_mime, &uri[..60.min(uri.len())]));
    STANDARD.decode(payload).expect("valid base64 payload")
}

// =============================================================================
// Banner and health
// =============================================================================

#[tokio::test]
async fn root_banner() {
    let response = setup_app().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["message"], "LinkedIn Post Factory API");
    assert_eq!(body["status"], "running");
}

#[tokio::test]
async fn health_reports_provider_availability() {
    let response = setup_app().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["module"], "lpf-gen");
    assert!(body["version"].is_string());
    assert_eq!(body["providers"]["gemini"], false);
    assert_eq!(body["providers"]["newsapi"], false);
    assert_eq!(body["media_generation"], true);
    assert_eq!(body["storage"], false);
}

// =============================================================================
// Post generation
// =============================================================================

#[tokio::test]
async fn unsupported_provider_is_rejected() {
    let request = post_json(
        "/posts/generate",
        json!({"pillar": "Leadership", "format_type": "story", "provider": "openai"}),
    );
    let response = setup_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    assert!(body["error"].as_str().unwrap().contains("not supported"));
}

#[tokio::test]
async fn post_generation_requires_a_configured_key() {
    let request = post_json(
        "/posts/generate",
        json!({"pillar": "Leadership", "format_type": "story"}),
    );
    let response = setup_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    assert!(body["error"].as_str().unwrap().contains("not configured"));
}

// =============================================================================
// Local renderers end to end
// =============================================================================

#[tokio::test]
async fn chart_endpoint_returns_an_svg_data_uri() {
    let request = post_json(
        "/media/generate-chart",
        json!({
            "chart_type": "bar",
            "data": {"labels": ["Q1", "Q2"], "values": [10, 30]},
            "title": "Revenue",
        }),
    );
    let response = setup_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["type"], "chart");

    let svg = decode_data_uri(body["url"].as_str().unwrap(), "image/svg+xml");
    let svg = String::from_utf8(svg).unwrap();
    assert!(svg.contains("<svg"));
    assert!(svg.contains("Revenue"));
}

#[tokio::test]
async fn unknown_chart_type_is_a_bad_request() {
    let request = post_json(
        "/media/generate-chart",
        json!({"chart_type": "sankey", "data": {}, "title": "T"}),
    );
    let response = setup_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Unsupported chart type"));
}

#[tokio::test]
async fn mismatched_chart_series_are_a_bad_request() {
    let request = post_json(
        "/media/generate-chart",
        json!({
            "chart_type": "bar",
            "data": {"labels": ["only one"], "values": [1, 2, 3]},
            "title": "T",
        }),
    );
    let response = setup_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn infographic_endpoint_returns_an_svg_data_uri() {
    let request = post_json(
        "/media/generate-infographic",
        json!({
            "title": "2026 in Numbers",
            "stats": [
                {"label": "Posts", "value": "120"},
                {"label": "Followers", "value": "8k"},
            ],
        }),
    );
    let response = setup_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["type"], "infographic");
    let svg = decode_data_uri(body["url"].as_str().unwrap(), "image/svg+xml");
    assert!(String::from_utf8(svg).unwrap().contains("2026 in Numbers"));
}

#[tokio::test]
async fn empty_infographic_stats_are_a_bad_request() {
    let request = post_json(
        "/media/generate-infographic",
        json!({"title": "T", "stats": []}),
    );
    let response = setup_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn qrcode_endpoint_returns_an_svg_data_uri() {
    let request = post_json(
        "/media/generate-qrcode",
        json!({"url": "https://example.com/tool"}),
    );
    let response = setup_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["type"], "qrcode");
    let svg = decode_data_uri(body["url"].as_str().unwrap(), "image/svg+xml");
    assert!(String::from_utf8(svg).unwrap().contains("<svg"));
}

#[tokio::test]
async fn code_image_endpoint_returns_an_svg_data_uri() {
    let request = post_json(
        "/media/generate-code-image",
        json!({
            "code": "fn main() {\n    println!(\"hi\");\n}\n",
            "language": "rust",
            "title": "Hello",
        }),
    );
    let response = setup_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["type"], "code");
    let svg = decode_data_uri(body["url"].as_str().unwrap(), "image/svg+xml");
    let svg = String::from_utf8(svg).unwrap();
    assert!(svg.contains("println"));
    assert!(svg.contains("Hello"));
}

// =============================================================================
// Carousel: placeholder path without an image provider
// =============================================================================

#[tokio::test]
async fn carousel_renders_a_pdf_with_placeholder_panels() {
    let request = post_json(
        "/media/generate-carousel",
        json!({
            "title": "Scaling Stories",
            "slides": [
                {"title": "Scaling Stories", "content": ""},
                {"title": "Lesson One", "content": "Ship early. Ship often. (Visual: a pipeline)"},
                {"title": "Lesson Two", "content": "Talk to users weekly."},
            ],
        }),
    );
    let response = setup_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["type"], "carousel");

    let pdf = decode_data_uri(body["url"].as_str().unwrap(), "application/pdf");
    assert!(pdf.starts_with(b"%PDF"));
}

#[tokio::test]
async fn empty_carousel_is_a_bad_request() {
    let request = post_json(
        "/media/generate-carousel",
        json!({"title": "T", "slides": []}),
    );
    let response = setup_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Provider-backed endpoints without credentials
// =============================================================================

#[tokio::test]
async fn ai_image_requires_a_configured_key() {
    let request = post_json(
        "/media/generate-ai-image",
        json!({"prompt": "a rocket over a city"}),
    );
    let response = setup_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn interactive_degrades_to_a_fallback_page() {
    let request = post_json(
        "/media/generate-interactive",
        json!({"prompt": "compound interest calculator", "title": "Calculator"}),
    );
    let response = setup_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["type"], "interactive");
    let html = decode_data_uri(body["url"].as_str().unwrap(), "text/html");
    assert!(String::from_utf8(html).unwrap().contains("Generation Error"));
}

#[tokio::test]
async fn news_requires_a_configured_key() {
    let response = setup_app().oneshot(get("/news/trending")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = setup_app()
        .oneshot(get("/news/search?query=ai"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Media listing without storage
// =============================================================================

#[tokio::test]
async fn media_listing_is_empty_without_storage() {
    let response = setup_app()
        .oneshot(get("/media/list/post-123"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["post_id"], "post-123");
    assert_eq!(body["media"].as_array().unwrap().len(), 0);
}
