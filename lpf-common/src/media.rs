//! Media kinds and data-URI helpers
//!
//! Every generated asset is addressed by the post it belongs to and its
//! media kind; the kind fixes the file extension and MIME type used both
//! for storage object keys and for data-URI fallbacks.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Kind of generated media asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MediaKind {
    Code,
    Chart,
    Infographic,
    Qrcode,
    Carousel,
    AiImage,
    Interactive,
}

impl MediaKind {
    /// Storage file extension for this kind
    pub fn extension(&self) -> &'static str {
        match self {
            MediaKind::Code | MediaKind::Chart | MediaKind::Infographic | MediaKind::Qrcode => {
                "svg"
            }
            MediaKind::Carousel => "pdf",
            MediaKind::AiImage => "png",
            MediaKind::Interactive => "html",
        }
    }

    /// MIME type for this kind
    pub fn mime_type(&self) -> &'static str {
        match self {
            MediaKind::Code | MediaKind::Chart | MediaKind::Infographic | MediaKind::Qrcode => {
                "image/svg+xml"
            }
            MediaKind::Carousel => "application/pdf",
            MediaKind::AiImage => "image/png",
            MediaKind::Interactive => "text/html",
        }
    }

    /// Response `type` label, matching the kebab-case wire form
    pub fn label(&self) -> &'static str {
        match self {
            MediaKind::Code => "code",
            MediaKind::Chart => "chart",
            MediaKind::Infographic => "infographic",
            MediaKind::Qrcode => "qrcode",
            MediaKind::Carousel => "carousel",
            MediaKind::AiImage => "ai-image",
            MediaKind::Interactive => "interactive",
        }
    }
}

/// Encode bytes as a `data:` URI with the given MIME type
pub fn to_data_uri(data: &[u8], mime_type: &str) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(data))
}
