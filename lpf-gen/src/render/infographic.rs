//! Infographic rendering
//!
//! A title and up to six stat cards on the 1200x630 canvas, laid out in
//! a 3-column grid over a subtle vertical gradient.

use super::{xml_escape, BASE_HEIGHT, BASE_WIDTH};
use lpf_common::{Error, Result};
use serde::Deserialize;
use std::fmt::Write as _;

/// A single statistic: big value, small label
#[derive(Debug, Clone, Deserialize)]
pub struct Stat {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub value: String,
}

/// Grid geometry
const STATS_PER_ROW: usize = 3;
const MAX_STATS: usize = 6;
const MARGIN: f64 = 60.0;
const SLOT_HEIGHT: f64 = 200.0;
const GRID_TOP: f64 = 180.0;

/// Render an infographic as SVG bytes
pub fn render(title: &str, stats: &[Stat], brand_color: &str) -> Result<Vec<u8>> {
    if stats.is_empty() {
        return Err(Error::InvalidInput("at least one stat is required".to_string()));
    }

    let mut svg = String::new();
    let _ = write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" \
         viewBox=\"0 0 {w} {h}\" font-family=\"Helvetica, Arial, sans-serif\">",
        w = BASE_WIDTH,
        h = BASE_HEIGHT
    );

    // Vertical gradient backdrop
    svg.push_str(
        "<defs><linearGradient id=\"bg\" x1=\"0\" y1=\"0\" x2=\"0\" y2=\"1\">\
         <stop offset=\"0%\" stop-color=\"#1e1e32\"/>\
         <stop offset=\"100%\" stop-color=\"#323250\"/>\
         </linearGradient></defs>",
    );
    let _ = write!(
        svg,
        "<rect width=\"{}\" height=\"{}\" fill=\"url(#bg)\"/>",
        BASE_WIDTH, BASE_HEIGHT
    );

    let _ = write!(
        svg,
        "<text x=\"{:.0}\" y=\"98\" font-size=\"48\" font-weight=\"bold\" fill=\"#ffffff\">{}</text>",
        MARGIN,
        xml_escape(title)
    );

    let slot_width = (BASE_WIDTH as f64 - MARGIN * 2.0) / STATS_PER_ROW as f64;
    let card_width = slot_width - 40.0;
    let card_height = SLOT_HEIGHT - 40.0;

    for (i, stat) in stats.iter().take(MAX_STATS).enumerate() {
        let row = i / STATS_PER_ROW;
        let col = i % STATS_PER_ROW;
        let x = MARGIN + col as f64 * slot_width;
        let y = GRID_TOP + row as f64 * SLOT_HEIGHT;

        let _ = write!(
            svg,
            "<rect class=\"card\" x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" \
             rx=\"15\" fill=\"#2a2a2a\" stroke=\"{}\" stroke-width=\"3\"/>",
            x,
            y,
            card_width,
            card_height,
            xml_escape(brand_color)
        );
        let _ = write!(
            svg,
            "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"42\" font-weight=\"bold\" fill=\"{}\" \
             text-anchor=\"middle\">{}</text>",
            x + card_width / 2.0,
            y + 75.0,
            xml_escape(brand_color),
            xml_escape(&stat.value)
        );
        let _ = write!(
            svg,
            "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"28\" fill=\"#cccccc\" \
             text-anchor=\"middle\">{}</text>",
            x + card_width / 2.0,
            y + 130.0,
            xml_escape(&stat.label)
        );
    }

    svg.push_str("</svg>");
    Ok(svg.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(n: usize) -> Vec<Stat> {
        (0..n)
            .map(|i| Stat {
                label: format!("Metric {}", i),
                value: format!("{}%", i * 10),
            })
            .collect()
    }

    #[test]
    fn renders_one_card_per_stat() {
        let svg = String::from_utf8(render("Growth", &stats(4), "#4a9eff").unwrap()).unwrap();
        assert_eq!(svg.matches("class=\"card\"").count(), 4);
        assert!(svg.contains(">Growth</text>"));
    }

    #[test]
    fn caps_at_six_cards() {
        let svg = String::from_utf8(render("Growth", &stats(9), "#4a9eff").unwrap()).unwrap();
        assert_eq!(svg.matches("class=\"card\"").count(), 6);
    }

    #[test]
    fn empty_stats_are_rejected() {
        assert!(render("Growth", &[], "#4a9eff").is_err());
    }

    #[test]
    fn brand_color_styles_cards_and_values() {
        let svg = String::from_utf8(render("T", &stats(1), "#ff0066").unwrap()).unwrap();
        assert!(svg.contains("stroke=\"#ff0066\""));
        assert!(svg.contains("fill=\"#ff0066\""));
    }

    #[test]
    fn stat_text_is_escaped() {
        let list = vec![Stat {
            label: "A&B".to_string(),
            value: "<1s".to_string(),
        }];
        let svg = String::from_utf8(render("T", &list, "#4a9eff").unwrap()).unwrap();
        assert!(svg.contains("A&amp;B"));
        assert!(svg.contains("&lt;1s"));
    }
}
