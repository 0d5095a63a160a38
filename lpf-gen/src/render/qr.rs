//! QR code rendering

use lpf_common::{Error, Result};
use qrcode::render::svg;
use qrcode::{EcLevel, QrCode};

/// Render a QR code for a URL as SVG bytes
///
/// High error correction so the code survives LinkedIn's image
/// recompression.
pub fn render(url: &str) -> Result<Vec<u8>> {
    let code = QrCode::with_error_correction_level(url.as_bytes(), EcLevel::H)
        .map_err(|e| Error::Render(format!("Failed to generate QR code: {}", e)))?;

    let image = code
        .render::<svg::Color>()
        .min_dimensions(600, 600)
        .quiet_zone(true)
        .dark_color(svg::Color("#000000"))
        .light_color(svg::Color("#ffffff"))
        .build();

    Ok(image.into_bytes())
}
