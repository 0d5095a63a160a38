//! Code snippet card rendering
//!
//! Syntax-highlighted source over a dark card with a line-number gutter,
//! an optional title, and an accent border. Output is SVG; syntect does
//! the token coloring.

use super::xml_escape;
use lpf_common::{Error, Result};
use once_cell::sync::Lazy;
use std::fmt::Write as _;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

static SYNTAX_SET: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: Lazy<ThemeSet> = Lazy::new(ThemeSet::load_defaults);

/// Card geometry
const CARD_WIDTH: usize = 1200;
const PADDING: usize = 60;
const TITLE_HEIGHT: usize = 80;
const FONT_SIZE: usize = 16;
const LINE_HEIGHT: usize = 22; // font size + line pad
const GUTTER_WIDTH: usize = 60;

/// Accent border color
const BORDER: &str = "#4a9eff";

/// Map a requested theme name onto a bundled syntect theme
///
/// The request vocabulary is the original service's pygments names; the
/// bundled set is what syntect ships, so this is a nearest-neighbor
/// table.
fn resolve_theme(name: &str) -> &'static Theme {
    let key = match name {
        "monokai" => "base16-eighties.dark",
        "github" => "InspiredGitHub",
        "github-dark" => "base16-ocean.dark",
        "dracula" => "base16-mocha.dark",
        "solarized-dark" => "Solarized (dark)",
        "solarized-light" => "Solarized (light)",
        _ => "base16-ocean.dark",
    };
    &THEME_SET.themes[key]
}

/// Render a highlighted code card as SVG bytes
pub fn render(code: &str, language: &str, theme_name: &str, title: Option<&str>) -> Result<Vec<u8>> {
    if code.trim().is_empty() {
        return Err(Error::InvalidInput("code must be non-empty".to_string()));
    }

    let syntax = SYNTAX_SET
        .find_syntax_by_token(language)
        .unwrap_or_else(|| SYNTAX_SET.find_syntax_plain_text());
    let theme = resolve_theme(theme_name);
    let mut highlighter = HighlightLines::new(syntax, theme);

    // Tabs render unpredictably in SVG text; normalize up front
    let code = code.replace('\t', "    ");
    let line_count = LinesWithEndings::from(&code).count();

    let title_height = if title.is_some() { TITLE_HEIGHT } else { 0 };
    let code_top = PADDING + title_height;
    let height = code_top + line_count * LINE_HEIGHT + PADDING;

    let background = theme
        .settings
        .background
        .map(|c| format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b))
        .unwrap_or_else(|| "#1e1e1e".to_string());

    let mut svg = String::new();
    let _ = write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" \
         viewBox=\"0 0 {w} {h}\">",
        w = CARD_WIDTH,
        h = height
    );
    let _ = write!(
        svg,
        "<rect width=\"{}\" height=\"{}\" fill=\"{}\"/>",
        CARD_WIDTH, height, background
    );

    if let Some(title) = title {
        let _ = write!(
            svg,
            "<text x=\"{}\" y=\"{}\" font-family=\"Helvetica, Arial, sans-serif\" \
             font-size=\"32\" font-weight=\"bold\" fill=\"#ffffff\">{}</text>",
            PADDING,
            PADDING,
            xml_escape(title)
        );
    }

    for (i, line) in LinesWithEndings::from(&code).enumerate() {
        let y = code_top + (i + 1) * LINE_HEIGHT;
        let _ = write!(
            svg,
            "<text class=\"ln\" x=\"{}\" y=\"{}\" font-family=\"monospace\" font-size=\"{}\" \
             fill=\"#666666\" text-anchor=\"end\">{}</text>",
            PADDING + GUTTER_WIDTH - 16,
            y,
            FONT_SIZE,
            i + 1
        );

        let ranges = highlighter
            .highlight_line(line, &SYNTAX_SET)
            .map_err(|e| Error::Render(format!("Highlighting failed: {}", e)))?;

        let _ = write!(
            svg,
            "<text x=\"{}\" y=\"{}\" xml:space=\"preserve\" font-family=\"monospace\" \
             font-size=\"{}\">",
            PADDING + GUTTER_WIDTH,
            y,
            FONT_SIZE
        );
        for (style, text) in ranges {
            let text = text.trim_end_matches('\n');
            if text.is_empty() {
                continue;
            }
            let fg = style.foreground;
            let _ = write!(
                svg,
                "<tspan fill=\"#{:02x}{:02x}{:02x}\">{}</tspan>",
                fg.r,
                fg.g,
                fg.b,
                xml_escape(text)
            );
        }
        svg.push_str("</text>");
    }

    // Accent border
    let _ = write!(
        svg,
        "<rect x=\"5\" y=\"5\" width=\"{}\" height=\"{}\" fill=\"none\" stroke=\"{}\" \
         stroke-width=\"3\"/>",
        CARD_WIDTH - 10,
        height - 10,
        BORDER
    );

    svg.push_str("</svg>");
    Ok(svg.into_bytes())
}
