//! HTTP API handlers for lpf-gen

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

pub mod health;
pub mod media;
pub mod news;
pub mod posts;

pub use health::{health_check, root};
pub use media::{
    generate_ai_image, generate_carousel, generate_chart, generate_code_image,
    generate_infographic, generate_interactive, generate_qrcode, list_post_media,
};
pub use news::{search_news, trending_news};
pub use posts::generate_post;

/// API errors
///
/// The original service collapsed every failure into a 500; here the
/// taxonomy keeps caller mistakes (400), missing provider credentials
/// (400, as the original answered for absent keys), and upstream
/// provider failures (502) apart. The body shape is uniform.
#[derive(Debug)]
pub enum ApiError {
    InvalidInput(String),
    NotConfigured(String),
    Provider(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotConfigured(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Provider(msg) => (
                StatusCode::BAD_GATEWAY,
                format!("Provider error: {}", msg),
            ),
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Internal error: {}", msg),
            ),
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

impl From<lpf_common::Error> for ApiError {
    fn from(err: lpf_common::Error) -> Self {
        use lpf_common::Error;
        match err {
            Error::InvalidInput(msg) => ApiError::InvalidInput(msg),
            Error::NotConfigured(msg) => ApiError::NotConfigured(msg),
            Error::Provider(msg) => ApiError::Provider(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_statuses() {
        let response = ApiError::InvalidInput("bad".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError::NotConfigured("no key".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError::Provider("upstream".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let response = ApiError::Internal("boom".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn common_errors_map_onto_the_taxonomy() {
        let api: ApiError = lpf_common::Error::InvalidInput("x".into()).into();
        assert!(matches!(api, ApiError::InvalidInput(_)));

        let api: ApiError = lpf_common::Error::Render("x".into()).into();
        assert!(matches!(api, ApiError::Internal(_)));
    }
}
