//! Chart rendering
//!
//! Hand-assembled SVG on the 1200x630 canvas. Single accent-colored
//! series for cartesian charts; qualitative palette for pie slices and a
//! sequential blue ramp for funnel stages, mirroring the layouts the
//! original service produced.

use super::{xml_escape, BASE_HEIGHT, BASE_WIDTH};
use lpf_common::{Error, Result};
use serde::Deserialize;
use std::fmt::Write as _;

/// Series accent color
const ACCENT: &str = "#4a9eff";

/// Qualitative palette for pie slices
const QUALITATIVE: &[&str] = &[
    "#E58606", "#5D69B1", "#52BCA3", "#99C945", "#CC61B0", "#24796C", "#DAA51B", "#2F8AC4",
    "#764E9F", "#ED645A", "#A5AA99",
];

/// Sequential blues for funnel stages (widest stage darkest)
const BLUES: &[&str] = &[
    "#08306B", "#2171B5", "#4292C6", "#6BAED6", "#9ECAE1", "#C6DBEF", "#DEEBF7",
];

/// Supported chart types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartType {
    Bar,
    Line,
    Pie,
    Scatter,
    Area,
    Funnel,
}

impl std::str::FromStr for ChartType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "bar" => Ok(ChartType::Bar),
            "line" => Ok(ChartType::Line),
            "pie" => Ok(ChartType::Pie),
            "scatter" => Ok(ChartType::Scatter),
            "area" => Ok(ChartType::Area),
            "funnel" => Ok(ChartType::Funnel),
            other => Err(Error::InvalidInput(format!(
                "Unsupported chart type: {}",
                other
            ))),
        }
    }
}

/// Chart input series
///
/// Categorical charts (bar, pie, funnel) use `labels` + `values`;
/// cartesian charts (line, scatter, area) use `y` with optional `x`
/// (indices when absent).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChartData {
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub values: Vec<f64>,
    #[serde(default)]
    pub x: Vec<f64>,
    #[serde(default)]
    pub y: Vec<f64>,
}

/// Rendering palette derived from the requested theme name
struct Palette {
    bg: &'static str,
    text: &'static str,
    dim: &'static str,
    grid: &'static str,
}

fn palette(theme: &str) -> Palette {
    if theme.contains("light") {
        Palette {
            bg: "#ffffff",
            text: "#1a1a1a",
            dim: "#666666",
            grid: "#dddddd",
        }
    } else {
        Palette {
            bg: "#1e1e1e",
            text: "#f0f0f0",
            dim: "#999999",
            grid: "#3a3a3a",
        }
    }
}

/// Render a chart as SVG bytes
pub fn render(chart_type: ChartType, data: &ChartData, title: &str, theme: &str) -> Result<Vec<u8>> {
    validate(chart_type, data)?;

    let pal = palette(theme);
    let mut svg = String::new();
    let _ = write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" \
         viewBox=\"0 0 {w} {h}\" font-family=\"Helvetica, Arial, sans-serif\">",
        w = BASE_WIDTH,
        h = BASE_HEIGHT
    );
    let _ = write!(
        svg,
        "<rect width=\"{}\" height=\"{}\" fill=\"{}\"/>",
        BASE_WIDTH, BASE_HEIGHT, pal.bg
    );
    let _ = write!(
        svg,
        "<text x=\"{}\" y=\"52\" font-size=\"24\" fill=\"{}\" text-anchor=\"middle\">{}</text>",
        BASE_WIDTH / 2,
        pal.text,
        xml_escape(title)
    );

    match chart_type {
        ChartType::Bar => draw_bar(&mut svg, data, &pal),
        ChartType::Line => draw_line(&mut svg, data, &pal, false),
        ChartType::Area => draw_line(&mut svg, data, &pal, true),
        ChartType::Scatter => draw_scatter(&mut svg, data, &pal),
        ChartType::Pie => draw_pie(&mut svg, data, &pal),
        ChartType::Funnel => draw_funnel(&mut svg, data, &pal),
    }

    svg.push_str("</svg>");
    Ok(svg.into_bytes())
}

/// Validate the series shape for the requested chart type
fn validate(chart_type: ChartType, data: &ChartData) -> Result<()> {
    match chart_type {
        ChartType::Bar | ChartType::Pie | ChartType::Funnel => {
            if data.labels.is_empty() || data.labels.len() != data.values.len() {
                return Err(Error::InvalidInput(
                    "labels and values must be non-empty and the same length".to_string(),
                ));
            }
            if matches!(chart_type, ChartType::Pie | ChartType::Funnel)
                && data.values.iter().sum::<f64>() <= 0.0
            {
                return Err(Error::InvalidInput(
                    "values must sum to a positive number".to_string(),
                ));
            }
        }
        ChartType::Line | ChartType::Scatter | ChartType::Area => {
            if data.y.is_empty() {
                return Err(Error::InvalidInput("y series must be non-empty".to_string()));
            }
            if !data.x.is_empty() && data.x.len() != data.y.len() {
                return Err(Error::InvalidInput(
                    "x and y series must be the same length".to_string(),
                ));
            }
        }
    }
    Ok(())
}

// Plot area shared by the cartesian charts
const PLOT_LEFT: f64 = 90.0;
const PLOT_RIGHT: f64 = 1160.0;
const PLOT_TOP: f64 = 90.0;
const PLOT_BOTTOM: f64 = 560.0;

fn plot_width() -> f64 {
    PLOT_RIGHT - PLOT_LEFT
}

fn plot_height() -> f64 {
    PLOT_BOTTOM - PLOT_TOP
}

/// Format an axis or data label, dropping a trailing .0
fn fmt_value(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        format!("{}", value.round() as i64)
    } else {
        format!("{:.1}", value)
    }
}

/// Horizontal gridlines with value labels from 0 (or the data minimum) up
fn draw_gridlines(svg: &mut String, min: f64, max: f64, pal: &Palette) {
    const TICKS: usize = 5;
    for i in 0..=TICKS {
        let fraction = i as f64 / TICKS as f64;
        let value = min + (max - min) * fraction;
        let y = PLOT_BOTTOM - plot_height() * fraction;
        let _ = write!(
            svg,
            "<line x1=\"{:.1}\" y1=\"{y:.1}\" x2=\"{:.1}\" y2=\"{y:.1}\" stroke=\"{}\" stroke-width=\"1\"/>",
            PLOT_LEFT,
            PLOT_RIGHT,
            pal.grid,
            y = y
        );
        let _ = write!(
            svg,
            "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"14\" fill=\"{}\" text-anchor=\"end\">{}</text>",
            PLOT_LEFT - 10.0,
            y + 5.0,
            pal.dim,
            fmt_value(value)
        );
    }
}

fn draw_bar(svg: &mut String, data: &ChartData, pal: &Palette) {
    let max = data.values.iter().cloned().fold(0.0_f64, f64::max).max(1e-9);
    draw_gridlines(svg, 0.0, max, pal);

    let n = data.values.len();
    let slot = plot_width() / n as f64;
    let bar_width = slot * 0.6;

    for (i, (label, &value)) in data.labels.iter().zip(&data.values).enumerate() {
        let height = (value.max(0.0) / max) * plot_height();
        let x = PLOT_LEFT + i as f64 * slot + (slot - bar_width) / 2.0;
        let y = PLOT_BOTTOM - height;
        let _ = write!(
            svg,
            "<rect class=\"bar\" x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"{}\"/>",
            x, y, bar_width, height, ACCENT
        );
        // Value label above the bar
        let _ = write!(
            svg,
            "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"14\" fill=\"{}\" text-anchor=\"middle\">{}</text>",
            x + bar_width / 2.0,
            y - 8.0,
            pal.text,
            fmt_value(value)
        );
        let _ = write!(
            svg,
            "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"14\" fill=\"{}\" text-anchor=\"middle\">{}</text>",
            x + bar_width / 2.0,
            PLOT_BOTTOM + 24.0,
            pal.dim,
            xml_escape(label)
        );
    }
}

/// Scaled (x, y) screen positions for a cartesian series
fn cartesian_points(data: &ChartData) -> Vec<(f64, f64)> {
    let xs: Vec<f64> = if data.x.is_empty() {
        (0..data.y.len()).map(|i| i as f64).collect()
    } else {
        data.x.clone()
    };

    let (x_min, x_max) = bounds(&xs);
    let (y_min, y_max) = bounds(&data.y);

    xs.iter()
        .zip(&data.y)
        .map(|(&x, &y)| {
            let fx = (x - x_min) / (x_max - x_min);
            let fy = (y - y_min) / (y_max - y_min);
            (
                PLOT_LEFT + fx * plot_width(),
                PLOT_BOTTOM - fy * plot_height(),
            )
        })
        .collect()
}

/// Min/max of a series, padded when degenerate so scaling never divides
/// by zero
fn bounds(series: &[f64]) -> (f64, f64) {
    let min = series.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = series.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if (max - min).abs() < 1e-9 {
        (min - 1.0, max + 1.0)
    } else {
        (min, max)
    }
}

fn draw_line(svg: &mut String, data: &ChartData, pal: &Palette, filled: bool) {
    let (y_min, y_max) = bounds(&data.y);
    draw_gridlines(svg, y_min, y_max, pal);

    let points = cartesian_points(data);
    let path: Vec<String> = points
        .iter()
        .map(|(x, y)| format!("{:.1},{:.1}", x, y))
        .collect();

    if filled {
        // Close the polygon down to the baseline
        let first = points.first().copied().unwrap_or((PLOT_LEFT, PLOT_BOTTOM));
        let last = points.last().copied().unwrap_or((PLOT_RIGHT, PLOT_BOTTOM));
        let _ = write!(
            svg,
            "<polygon class=\"area\" points=\"{} {:.1},{:.1} {:.1},{:.1}\" fill=\"{}\" fill-opacity=\"0.3\"/>",
            path.join(" "),
            last.0,
            PLOT_BOTTOM,
            first.0,
            PLOT_BOTTOM,
            ACCENT
        );
    }

    let stroke_width = if filled { 2 } else { 3 };
    let _ = write!(
        svg,
        "<polyline points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"/>",
        path.join(" "),
        ACCENT,
        stroke_width
    );

    if !filled {
        for (x, y) in &points {
            let _ = write!(
                svg,
                "<circle class=\"marker\" cx=\"{:.1}\" cy=\"{:.1}\" r=\"5\" fill=\"{}\"/>",
                x, y, ACCENT
            );
        }
    }
}

fn draw_scatter(svg: &mut String, data: &ChartData, pal: &Palette) {
    let (y_min, y_max) = bounds(&data.y);
    draw_gridlines(svg, y_min, y_max, pal);

    for (x, y) in cartesian_points(data) {
        let _ = write!(
            svg,
            "<circle class=\"marker\" cx=\"{:.1}\" cy=\"{:.1}\" r=\"6\" fill=\"{}\" fill-opacity=\"0.8\"/>",
            x, y, ACCENT
        );
    }
}

fn draw_pie(svg: &mut String, data: &ChartData, pal: &Palette) {
    let total: f64 = data.values.iter().sum();
    let cx = 520.0;
    let cy = 340.0;
    let outer = 200.0;
    let inner = outer * 0.3; // donut hole

    // Start at 12 o'clock, sweep clockwise
    let mut angle = -std::f64::consts::FRAC_PI_2;
    for (i, &value) in data.values.iter().enumerate() {
        if value <= 0.0 {
            continue;
        }
        // A full-circle arc degenerates; hold it just under one turn
        let sweep = (value / total * std::f64::consts::TAU).min(std::f64::consts::TAU - 1e-4);
        let end = angle + sweep;
        let large_arc = i32::from(sweep > std::f64::consts::PI);
        let color = QUALITATIVE[i % QUALITATIVE.len()];

        let (ox0, oy0) = (cx + outer * angle.cos(), cy + outer * angle.sin());
        let (ox1, oy1) = (cx + outer * end.cos(), cy + outer * end.sin());
        let (ix0, iy0) = (cx + inner * angle.cos(), cy + inner * angle.sin());
        let (ix1, iy1) = (cx + inner * end.cos(), cy + inner * end.sin());

        let _ = write!(
            svg,
            "<path class=\"slice\" d=\"M {ox0:.2} {oy0:.2} \
             A {outer:.2} {outer:.2} 0 {large_arc} 1 {ox1:.2} {oy1:.2} \
             L {ix1:.2} {iy1:.2} \
             A {inner:.2} {inner:.2} 0 {large_arc} 0 {ix0:.2} {iy0:.2} Z\" fill=\"{color}\"/>",
        );

        // Percentage label at the slice midpoint
        let mid = angle + sweep / 2.0;
        let label_r = (outer + inner) / 2.0;
        let _ = write!(
            svg,
            "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"16\" fill=\"#ffffff\" text-anchor=\"middle\">{:.1}%</text>",
            cx + label_r * mid.cos(),
            cy + label_r * mid.sin() + 5.0,
            value / total * 100.0
        );

        angle = end;
    }

    draw_legend(svg, &data.labels, QUALITATIVE, pal);
}

fn draw_funnel(svg: &mut String, data: &ChartData, pal: &Palette) {
    let max = data.values.iter().cloned().fold(0.0_f64, f64::max).max(1e-9);
    let first = data.values.first().copied().unwrap_or(max).max(1e-9);
    let n = data.values.len();
    let gap = 8.0;
    let stage_height = (plot_height() - gap * (n as f64 - 1.0)) / n as f64;
    let center_x = (PLOT_LEFT + PLOT_RIGHT) / 2.0 + 60.0;
    let max_width = plot_width() * 0.6;

    for (i, (label, &value)) in data.labels.iter().zip(&data.values).enumerate() {
        let width = (value.max(0.0) / max) * max_width;
        let x = center_x - width / 2.0;
        let y = PLOT_TOP + i as f64 * (stage_height + gap);
        let color = BLUES[i % BLUES.len()];

        let _ = write!(
            svg,
            "<rect class=\"stage\" x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"{}\"/>",
            x, y, width, stage_height, color
        );
        // Value + percent-of-first inside the stage
        let _ = write!(
            svg,
            "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"16\" fill=\"#ffffff\" text-anchor=\"middle\">{} ({:.0}%)</text>",
            center_x,
            y + stage_height / 2.0 + 5.0,
            fmt_value(value),
            value / first * 100.0
        );
        // Stage name on the left
        let _ = write!(
            svg,
            "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"16\" fill=\"{}\" text-anchor=\"end\">{}</text>",
            x - 16.0,
            y + stage_height / 2.0 + 5.0,
            pal.text,
            xml_escape(label)
        );
    }
}

/// Legend column on the right edge
fn draw_legend(svg: &mut String, labels: &[String], colors: &[&str], pal: &Palette) {
    let x = 880.0;
    let mut y = 160.0;
    for (i, label) in labels.iter().enumerate() {
        let _ = write!(
            svg,
            "<rect x=\"{x:.1}\" y=\"{:.1}\" width=\"16\" height=\"16\" fill=\"{}\"/>",
            y - 12.0,
            colors[i % colors.len()]
        );
        let _ = write!(
            svg,
            "<text x=\"{:.1}\" y=\"{y:.1}\" font-size=\"16\" fill=\"{}\">{}</text>",
            x + 24.0,
            pal.text,
            xml_escape(label),
            y = y
        );
        y += 28.0;
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn categorical(n: usize) -> ChartData {
        ChartData {
            labels: (0..n).map(|i| format!("L{}", i)).collect(),
            values: (0..n).map(|i| (i + 1) as f64 * 10.0).collect(),
            ..Default::default()
        }
    }

    fn svg_string(chart_type: ChartType, data: &ChartData) -> String {
        String::from_utf8(render(chart_type, data, "Title", "dark").unwrap()).unwrap()
    }

    #[test]
    fn bar_chart_has_one_rect_per_value() {
        let svg = svg_string(ChartType::Bar, &categorical(4));
        assert_eq!(svg.matches("class=\"bar\"").count(), 4);
        assert!(svg.contains(">Title</text>"));
    }

    #[test]
    fn line_chart_has_markers_and_polyline() {
        let data = ChartData {
            y: vec![1.0, 3.0, 2.0, 5.0],
            ..Default::default()
        };
        let svg = svg_string(ChartType::Line, &data);
        assert!(svg.contains("<polyline"));
        assert_eq!(svg.matches("class=\"marker\"").count(), 4);
    }

    #[test]
    fn area_chart_fills_to_baseline() {
        let data = ChartData {
            x: vec![0.0, 1.0, 2.0],
            y: vec![2.0, 4.0, 3.0],
            ..Default::default()
        };
        let svg = svg_string(ChartType::Area, &data);
        assert!(svg.contains("class=\"area\""));
        assert!(svg.contains("fill-opacity=\"0.3\""));
    }

    #[test]
    fn pie_chart_has_one_slice_per_value_and_a_legend() {
        let svg = svg_string(ChartType::Pie, &categorical(3));
        assert_eq!(svg.matches("class=\"slice\"").count(), 3);
        assert!(svg.contains(">L0</text>"));
    }

    #[test]
    fn single_slice_pie_does_not_degenerate() {
        let data = ChartData {
            labels: vec!["All".to_string()],
            values: vec![42.0],
            ..Default::default()
        };
        let svg = svg_string(ChartType::Pie, &data);
        assert_eq!(svg.matches("class=\"slice\"").count(), 1);
        assert!(svg.contains("100.0%"));
    }

    #[test]
    fn funnel_labels_percent_of_first_stage() {
        let data = ChartData {
            labels: vec!["Visits".into(), "Signups".into(), "Paid".into()],
            values: vec![1000.0, 400.0, 100.0],
            ..Default::default()
        };
        let svg = svg_string(ChartType::Funnel, &data);
        assert_eq!(svg.matches("class=\"stage\"").count(), 3);
        assert!(svg.contains("(40%)"));
        assert!(svg.contains("(10%)"));
    }

    #[test]
    fn mismatched_series_are_rejected() {
        let data = ChartData {
            labels: vec!["A".into()],
            values: vec![1.0, 2.0],
            ..Default::default()
        };
        assert!(render(ChartType::Bar, &data, "T", "dark").is_err());

        let data = ChartData {
            x: vec![1.0],
            y: vec![1.0, 2.0],
            ..Default::default()
        };
        assert!(render(ChartType::Line, &data, "T", "dark").is_err());
    }

    #[test]
    fn empty_series_are_rejected() {
        assert!(render(ChartType::Bar, &ChartData::default(), "T", "dark").is_err());
        assert!(render(ChartType::Scatter, &ChartData::default(), "T", "dark").is_err());
    }

    #[test]
    fn titles_are_escaped() {
        let svg = String::from_utf8(
            render(ChartType::Bar, &categorical(1), "Q3 <Results> & More", "dark").unwrap(),
        )
        .unwrap();
        assert!(svg.contains("Q3 &lt;Results&gt; &amp; More"));
    }

    #[test]
    fn light_theme_switches_background() {
        let svg = String::from_utf8(
            render(ChartType::Bar, &categorical(2), "T", "plotly_light").unwrap(),
        )
        .unwrap();
        assert!(svg.contains("fill=\"#ffffff\""));
    }

    #[test]
    fn flat_series_do_not_divide_by_zero() {
        let data = ChartData {
            y: vec![5.0, 5.0, 5.0],
            ..Default::default()
        };
        let svg = svg_string(ChartType::Line, &data);
        assert!(!svg.contains("NaN"));
    }

    #[test]
    fn chart_type_parses_from_wire_names() {
        assert_eq!("bar".parse::<ChartType>().unwrap(), ChartType::Bar);
        assert_eq!("funnel".parse::<ChartType>().unwrap(), ChartType::Funnel);
        assert!("sankey".parse::<ChartType>().is_err());
    }
}
