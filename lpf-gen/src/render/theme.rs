//! Color themes for carousel PDFs

/// A named carousel palette
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub name: &'static str,
    /// Page background
    pub bg: &'static str,
    /// Header/footer bars, bullets, borders
    pub accent: &'static str,
    /// Primary text
    pub text: &'static str,
    /// Page counter, captions
    pub dim: &'static str,
}

/// Available carousel themes
pub const THEMES: &[Theme] = &[
    Theme {
        name: "professional_blue",
        bg: "#0F172A",
        accent: "#3B82F6",
        text: "#F8FAFC",
        dim: "#94A3B8",
    },
    Theme {
        name: "elegant_dark",
        bg: "#1A1A1A",
        accent: "#00D4AA",
        text: "#FFFFFF",
        dim: "#888888",
    },
    Theme {
        name: "modern_purple",
        bg: "#1E1B4B",
        accent: "#A78BFA",
        text: "#F3F4F6",
        dim: "#9CA3AF",
    },
    Theme {
        name: "corporate_red",
        bg: "#1F1B1B",
        accent: "#EF4444",
        text: "#FAFAFA",
        dim: "#A1A1AA",
    },
    Theme {
        name: "nature_green",
        bg: "#0A2E1C",
        accent: "#10B981",
        text: "#F0FDF4",
        dim: "#86EFAC",
    },
    Theme {
        name: "sunset_orange",
        bg: "#1C1917",
        accent: "#F97316",
        text: "#FAFAF9",
        dim: "#A8A29E",
    },
];

/// Look up a theme by name, falling back to professional_blue
pub fn lookup(name: &str) -> &'static Theme {
    THEMES
        .iter()
        .find(|theme| theme.name == name)
        .unwrap_or(&THEMES[0])
}

/// Parse a `#RRGGBB` hex color into normalized RGB components
///
/// Malformed input yields mid-grey rather than failing the render.
pub fn hex_rgb(hex: &str) -> (f32, f32, f32) {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 {
        return (0.5, 0.5, 0.5);
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16)
            .map(|v| v as f32 / 255.0)
            .unwrap_or(0.5)
    };
    (channel(0..2), channel(2..4), channel(4..6))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_finds_named_theme() {
        assert_eq!(lookup("nature_green").accent, "#10B981");
    }

    #[test]
    fn unknown_theme_falls_back_to_professional_blue() {
        assert_eq!(lookup("neon_chartreuse").name, "professional_blue");
    }

    #[test]
    fn hex_parsing() {
        assert_eq!(hex_rgb("#FFFFFF"), (1.0, 1.0, 1.0));
        let (r, g, b) = hex_rgb("#3B82F6");
        assert!((r - 0x3B as f32 / 255.0).abs() < 1e-6);
        assert!((g - 0x82 as f32 / 255.0).abs() < 1e-6);
        assert!((b - 0xF6 as f32 / 255.0).abs() < 1e-6);
        assert_eq!(hex_rgb("garbage"), (0.5, 0.5, 0.5));
    }
}
