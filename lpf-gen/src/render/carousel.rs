//! Carousel PDF rendering
//!
//! Lays an ordered list of slides out as a multi-page portrait PDF: per
//! slide a centered title (font size picked by title length), an
//! illustrative image fitted into a fixed box, and a bulleted body spread
//! over the remaining height. Slides with no body text (and the first
//! slide) render as covers with an uppercased, raised title.
//!
//! The renderer is pure: callers resolve each slide's image beforehand
//! (see [`image_prompt`]) and pass the bytes in; a missing or undecodable
//! image becomes a placeholder panel, never an error.

use super::theme::{hex_rgb, Theme};
use lpf_common::{Error, Result};
use printpdf::{
    BuiltinFont, Color, LinePoint, Mm, Op, PaintMode, PdfDocument, PdfPage, PdfSaveOptions, Point,
    Polygon, PolygonRing, Pt, RawImage, Rgb, TextItem, WindingOrder, XObjectTransform,
};
use serde::Deserialize;
use tracing::warn;

/// LinkedIn portrait 4:5 page, in points
pub const PAGE_WIDTH: f32 = 600.0;
pub const PAGE_HEIGHT: f32 = 750.0;

/// Illustration box: x=50, 500x300; y depends on cover/regular layout
const IMAGE_BOX_X: f32 = 50.0;
const IMAGE_BOX_W: f32 = 500.0;
const IMAGE_BOX_H: f32 = 300.0;

/// Body text wrap width, in characters
const MAX_CHARS_PER_LINE: usize = 45;

/// At most this many raw sentence points per slide
const MAX_RAW_POINTS: usize = 6;

/// At most this many rendered bullet lines per slide
const MAX_BULLET_LINES: usize = 12;

/// Placeholder panel color when image generation failed
const PLACEHOLDER_BG: &str = "#1E293B";

/// A carousel slide as supplied by the caller
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Slide {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Per-slide layout computed from the slide text
#[derive(Debug, Clone)]
pub(crate) struct SlidePlan {
    /// Display title (uppercased on covers)
    pub title: String,
    /// Cover slide: first in sequence or no body text
    pub cover: bool,
    /// One or two centered title lines
    pub title_lines: Vec<String>,
    pub title_size: f32,
    /// Wrapped bullet lines, already capped
    pub bullets: Vec<String>,
    /// Vertical distance between bullet lines
    pub line_spacing: f32,
}

/// Case-insensitive ASCII substring search
fn find_ci(haystack: &str, needle: &str) -> Option<usize> {
    let haystack = haystack.as_bytes();
    let needle = needle.as_bytes();
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    (0..=haystack.len() - needle.len())
        .find(|&i| haystack[i..i + needle.len()].eq_ignore_ascii_case(needle))
}

/// Extract the first `(Visual: ...)` directive's text
pub(crate) fn extract_visual(content: &str) -> Option<String> {
    let start = find_ci(content, "(visual:")?;
    let after = &content[start + "(visual:".len()..];
    let end = after.find(')')?;
    let text = after[..end].trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Remove every `(Visual: ...)` directive from the content
pub(crate) fn strip_visual(content: &str) -> String {
    let mut out = String::new();
    let mut rest = content;
    while let Some(start) = find_ci(rest, "(visual:") {
        out.push_str(&rest[..start]);
        match rest[start..].find(')') {
            Some(end) => rest = &rest[start + end + 1..],
            None => {
                rest = "";
                break;
            }
        }
    }
    out.push_str(rest);
    out.trim().to_string()
}

/// Display title for a slide, before cover uppercasing
fn raw_title(index: usize, slide: &Slide) -> String {
    slide
        .title
        .clone()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| format!("Slide {}", index + 1))
}

/// Compute the full layout for one slide
pub(crate) fn plan_slide(index: usize, slide: &Slide) -> SlidePlan {
    let raw_content = slide.content.as_deref().unwrap_or("").trim();
    let body = strip_visual(raw_content);
    let cover = body.is_empty() || index == 0;

    let mut title = raw_title(index, slide);
    if cover {
        title = title.to_uppercase();
    }

    let (title_lines, title_size) = split_title(&title);
    let bullets = bullet_lines(&body, &title);
    let line_spacing = bullet_spacing(bullets.len());

    SlidePlan {
        title,
        cover,
        title_lines,
        title_size,
        bullets,
        line_spacing,
    }
}

/// Title font size by character length; very long titles wrap to two
/// lines split at the word midpoint
fn split_title(title: &str) -> (Vec<String>, f32) {
    let len = title.chars().count();
    if len > 50 {
        let words: Vec<&str> = title.split_whitespace().collect();
        let mid = words.len() / 2;
        (
            vec![words[..mid].join(" "), words[mid..].join(" ")],
            18.0,
        )
    } else if len > 35 {
        (vec![title.to_string()], 22.0)
    } else if len > 25 {
        (vec![title.to_string()], 26.0)
    } else {
        (vec![title.to_string()], 32.0)
    }
}

/// Split body text into wrapped bullet lines
///
/// Sentences become points (newlines count as breaks), markdown symbols
/// are dropped, points equal to the title are skipped, and each point is
/// word-wrapped to the 45-character budget.
fn bullet_lines(body: &str, title: &str) -> Vec<String> {
    let cleaned: String = body
        .chars()
        .filter(|c| !matches!(c, '*' | '#' | '_'))
        .collect();
    let cleaned = cleaned.trim();

    if cleaned.is_empty() || cleaned.eq_ignore_ascii_case(title) {
        return Vec::new();
    }

    let mut lines = Vec::new();
    let points = cleaned
        .replace('\n', ". ")
        .split('.')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .take(MAX_RAW_POINTS)
        .collect::<Vec<_>>();

    for point in points {
        if point.eq_ignore_ascii_case(title) {
            continue;
        }
        if point.chars().count() <= MAX_CHARS_PER_LINE {
            lines.push(point);
        } else {
            lines.extend(wrap_words(&point, MAX_CHARS_PER_LINE));
        }
    }

    lines.truncate(MAX_BULLET_LINES);
    lines
}

/// Greedy word wrap to a character budget
fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed <= width {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        } else {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Bullet spacing spreads lines over the remaining page height, capped
/// at 32 pt
fn bullet_spacing(line_count: usize) -> f32 {
    let start_y = PAGE_HEIGHT - 420.0;
    let available = start_y - 80.0; // space until the footer
    let count = line_count.max(1) as f32;
    (available / count).floor().min(32.0)
}

/// Image-generation prompt for one slide, enhanced with the theme's
/// palette hint
///
/// Priority: explicit `(Visual: ...)` directive, then the first sentence
/// of the content, then a generic professional phrase built from the
/// title. The image must never contain the slide title text.
pub fn image_prompt(index: usize, slide: &Slide, theme: &Theme) -> String {
    let plan = plan_slide(index, slide);
    let content = slide.content.as_deref().unwrap_or("").trim();

    let subject = if let Some(visual) = extract_visual(content) {
        visual
    } else if content.chars().count() > 10 {
        content
            .split('.')
            .next()
            .unwrap_or("")
            .trim()
            .chars()
            .take(100)
            .collect()
    } else if index == 0 {
        format!("Professional corporate background related to {}", plan.title)
    } else {
        format!("Professional business concept for {}", plan.title)
    };

    format!(
        "Professional LinkedIn visual: {}. Background color palette: {} with {} accents. \
         Create a high-quality, photorealistic image that complements these colors. \
         Modern, corporate style. DO NOT include any text or words in the image.",
        subject, theme.bg, theme.accent
    )
}

/// Render a slide deck as PDF bytes
///
/// `title` becomes the document title; `images[i]` carries the
/// pre-generated illustration for slide `i`; `None` (or undecodable
/// bytes) draws the placeholder panel instead.
pub fn render(
    title: &str,
    slides: &[Slide],
    theme: &Theme,
    images: &[Option<Vec<u8>>],
    footer: Option<&str>,
) -> Result<Vec<u8>> {
    if slides.is_empty() {
        return Err(Error::InvalidInput("at least one slide is required".to_string()));
    }

    let bg = hex_rgb(theme.bg);
    let accent = hex_rgb(theme.accent);
    let text_color = hex_rgb(theme.text);
    let dim = hex_rgb(theme.dim);

    let mut doc = PdfDocument::new(title);
    let mut pages = Vec::with_capacity(slides.len());

    for (index, slide) in slides.iter().enumerate() {
        let plan = plan_slide(index, slide);
        let mut ops = Vec::new();

        // Background and header bar
        fill_rect(&mut ops, 0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT, bg);
        fill_rect(&mut ops, 0.0, PAGE_HEIGHT - 10.0, PAGE_WIDTH, 10.0, accent);

        // Page counter, top-right
        centered_text(
            &mut ops,
            &format!("{}/{}", index + 1, slides.len()),
            PAGE_WIDTH - 35.0,
            PAGE_HEIGHT - 28.0,
            10.0,
            BuiltinFont::Helvetica,
            dim,
        );

        // Title
        let title_y = if plan.cover {
            PAGE_HEIGHT - 150.0
        } else {
            PAGE_HEIGHT - 58.0
        };
        match plan.title_lines.as_slice() {
            [line1, line2] => {
                let (y1, y2) = if plan.cover {
                    (title_y + 30.0, title_y)
                } else {
                    (PAGE_HEIGHT - 50.0, PAGE_HEIGHT - 72.0)
                };
                centered_text(
                    &mut ops,
                    line1,
                    PAGE_WIDTH / 2.0,
                    y1,
                    plan.title_size,
                    BuiltinFont::HelveticaBold,
                    text_color,
                );
                centered_text(
                    &mut ops,
                    line2,
                    PAGE_WIDTH / 2.0,
                    y2,
                    plan.title_size,
                    BuiltinFont::HelveticaBold,
                    text_color,
                );
            }
            [line] => centered_text(
                &mut ops,
                line,
                PAGE_WIDTH / 2.0,
                title_y,
                plan.title_size,
                BuiltinFont::HelveticaBold,
                text_color,
            ),
            _ => {}
        }

        // Illustration, aspect-fit into the image box
        let image_box_y = if plan.cover {
            PAGE_HEIGHT - 480.0
        } else {
            PAGE_HEIGHT - 380.0
        };
        let decoded = images
            .get(index)
            .and_then(|bytes| bytes.as_deref())
            .and_then(|bytes| {
                let mut warnings = Vec::new();
                match RawImage::decode_from_bytes(bytes, &mut warnings) {
                    Ok(raw) => Some(raw),
                    Err(e) => {
                        warn!(slide = index, "Undecodable slide image: {}", e);
                        None
                    }
                }
            });
        match decoded {
            Some(raw) => {
                let image_id = doc.add_image(&raw);
                let (img_w, img_h) = (raw.width as f32, raw.height as f32);
                let box_ratio = IMAGE_BOX_W / IMAGE_BOX_H;
                let img_ratio = img_w / img_h.max(1.0);
                let (new_w, new_h) = if img_ratio > box_ratio {
                    (IMAGE_BOX_W, IMAGE_BOX_W / img_ratio)
                } else {
                    (IMAGE_BOX_H * img_ratio, IMAGE_BOX_H)
                };
                let x = IMAGE_BOX_X + (IMAGE_BOX_W - new_w) / 2.0;
                let y = image_box_y + (IMAGE_BOX_H - new_h) / 2.0;
                ops.push(Op::UseXobject {
                    id: image_id,
                    transform: XObjectTransform {
                        translate_x: Some(Pt(x)),
                        translate_y: Some(Pt(y)),
                        rotate: None,
                        // At 72 dpi one pixel is one point, so the scale
                        // factors map pixels straight to the fitted size
                        scale_x: Some(new_w / img_w.max(1.0)),
                        scale_y: Some(new_h / img_h.max(1.0)),
                        dpi: Some(72.0),
                    },
                });
            }
            None => {
                // Placeholder panel, always at the regular position
                fill_rect(
                    &mut ops,
                    IMAGE_BOX_X,
                    PAGE_HEIGHT - 380.0,
                    IMAGE_BOX_W,
                    IMAGE_BOX_H,
                    hex_rgb(PLACEHOLDER_BG),
                );
                centered_text(
                    &mut ops,
                    "[Image generation failed]",
                    PAGE_WIDTH / 2.0,
                    PAGE_HEIGHT - 230.0,
                    12.0,
                    BuiltinFont::Helvetica,
                    dim,
                );
            }
        }

        // Bulleted body
        let mut bullet_y = PAGE_HEIGHT - 420.0;
        for line in &plan.bullets {
            ops.push(set_fill(accent));
            ops.push(dot(80.0, bullet_y + 5.0, 4.0));
            left_text(
                &mut ops,
                line,
                110.0,
                bullet_y,
                16.0,
                BuiltinFont::Helvetica,
                text_color,
            );
            bullet_y -= plan.line_spacing;
        }

        // Footer caption and footer bar
        if let Some(caption) = footer {
            centered_text(
                &mut ops,
                caption,
                PAGE_WIDTH / 2.0,
                25.0,
                9.0,
                BuiltinFont::Helvetica,
                dim,
            );
        }
        fill_rect(&mut ops, 0.0, 0.0, PAGE_WIDTH, 10.0, accent);

        pages.push(PdfPage::new(
            Mm::from(Pt(PAGE_WIDTH)),
            Mm::from(Pt(PAGE_HEIGHT)),
            ops,
        ));
    }

    let mut warnings = Vec::new();
    let bytes = doc
        .with_pages(pages)
        .save(&PdfSaveOptions::default(), &mut warnings);
    Ok(bytes)
}

// ============================================================================
// Drawing helpers
// ============================================================================

fn set_fill(rgb: (f32, f32, f32)) -> Op {
    Op::SetFillColor {
        col: Color::Rgb(Rgb {
            r: rgb.0,
            g: rgb.1,
            b: rgb.2,
            icc_profile: None,
        }),
    }
}

fn line_point(x: f32, y: f32) -> LinePoint {
    LinePoint {
        p: Point { x: Pt(x), y: Pt(y) },
        bezier: false,
    }
}

/// Filled axis-aligned rectangle
fn fill_rect(ops: &mut Vec<Op>, x: f32, y: f32, w: f32, h: f32, rgb: (f32, f32, f32)) {
    ops.push(set_fill(rgb));
    ops.push(Op::DrawPolygon {
        polygon: Polygon {
            rings: vec![PolygonRing {
                points: vec![
                    line_point(x, y),
                    line_point(x + w, y),
                    line_point(x + w, y + h),
                    line_point(x, y + h),
                ],
            }],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        },
    });
}

/// Bullet dot: a filled octagon is indistinguishable from a circle at
/// this radius
fn dot(cx: f32, cy: f32, r: f32) -> Op {
    let points = (0..8)
        .map(|i| {
            let angle = std::f32::consts::TAU * i as f32 / 8.0;
            line_point(cx + r * angle.cos(), cy + r * angle.sin())
        })
        .collect();
    Op::DrawPolygon {
        polygon: Polygon {
            rings: vec![PolygonRing { points }],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        },
    }
}

/// Write a left-anchored text run
fn left_text(
    ops: &mut Vec<Op>,
    text: &str,
    x: f32,
    y: f32,
    size: f32,
    font: BuiltinFont,
    rgb: (f32, f32, f32),
) {
    ops.push(set_fill(rgb));
    ops.push(Op::StartTextSection);
    ops.push(Op::SetTextCursor {
        pos: Point { x: Pt(x), y: Pt(y) },
    });
    ops.push(Op::SetFontSizeBuiltinFont {
        size: Pt(size),
        font,
    });
    ops.push(Op::WriteTextBuiltinFont {
        items: vec![TextItem::Text(text.to_string())],
        font,
    });
    ops.push(Op::EndTextSection);
}

/// Write a run centered on `center_x`, using average-advance metrics for
/// the built-in Helvetica faces
fn centered_text(
    ops: &mut Vec<Op>,
    text: &str,
    center_x: f32,
    y: f32,
    size: f32,
    font: BuiltinFont,
    rgb: (f32, f32, f32),
) {
    let x = center_x - text_width(text, size, font) / 2.0;
    left_text(ops, text, x.max(0.0), y, size, font, rgb);
}

/// Approximate advance width of a Helvetica run
fn text_width(text: &str, size: f32, font: BuiltinFont) -> f32 {
    let factor = match font {
        BuiltinFont::HelveticaBold => 0.53,
        _ => 0.50,
    };
    text.chars().count() as f32 * size * factor
}

// ============================================================================
// Tests
// ============================================================================
