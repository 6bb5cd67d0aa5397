//! Generated cover placeholders
//!
//! When no mirror serves a cover, a 160x120 SVG is synthesized locally: a diagonal
//! accent gradient with the game's initial (or a generic glyph) centered on top.
//! Output depends only on the display name and theme colors.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::config::placeholder::{
    DEFAULT_ACCENT, DEFAULT_ACCENT_DARK, FONT_SIZE, GENERIC_GLYPH, HEIGHT, WIDTH,
};

/// Accent colors taken from the active page theme
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub accent_dark: String,
    pub accent: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent_dark: DEFAULT_ACCENT_DARK.to_string(),
            accent: DEFAULT_ACCENT.to_string(),
        }
    }
}

impl Theme {
    /// Build a theme from computed CSS custom properties, falling back per color
    pub fn from_css(accent_dark: Option<&str>, accent: Option<&str>) -> Self {
        Self {
            accent_dark: css_color(accent_dark).unwrap_or_else(|| DEFAULT_ACCENT_DARK.to_string()),
            accent: css_color(accent).unwrap_or_else(|| DEFAULT_ACCENT.to_string()),
        }
    }

    /// Same theme with any unusable color replaced by its default
    pub fn sanitized(&self) -> Self {
        Self::from_css(Some(&self.accent_dark), Some(&self.accent))
    }
}

/// Accept only plain color syntax so a value cannot break out of the SVG attribute
fn css_color(value: Option<&str>) -> Option<String> {
    let value = value?.trim();
    let allowed = |c: char| c.is_ascii_alphanumeric() || "#(),.% -".contains(c);

    if value.is_empty() || !value.chars().all(allowed) {
        None
    } else {
        Some(value.to_string())
    }
}

/// A rendered placeholder image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    glyph: String,
    svg: String,
}

impl Placeholder {
    /// Render the placeholder for a game name
    pub fn render(display_name: &str, theme: &Theme) -> Self {
        let glyph = glyph_for(display_name);
        let theme = theme.sanitized();

        let svg = format!(
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
                r#"<defs><linearGradient id="bg" x1="0" y1="0" x2="{w}" y2="{h}" gradientUnits="userSpaceOnUse">"#,
                r#"<stop offset="0" stop-color="{dark}"/><stop offset="1" stop-color="{light}"/>"#,
                r#"</linearGradient></defs>"#,
                r#"<rect width="{w}" height="{h}" fill="url(#bg)"/>"#,
                r##"<text x="{cx}" y="{cy}" fill="#ffffff" font-family="Arial, sans-serif" font-size="{size}" font-weight="bold" text-anchor="middle" dominant-baseline="central">{glyph}</text>"##,
                r#"</svg>"#
            ),
            w = WIDTH,
            h = HEIGHT,
            cx = WIDTH / 2,
            cy = HEIGHT / 2,
            size = FONT_SIZE,
            dark = theme.accent_dark,
            light = theme.accent,
            glyph = escape_xml(&glyph),
        );

        Self { glyph, svg }
    }

    /// The character drawn in the center
    pub fn glyph(&self) -> &str {
        &self.glyph
    }

    pub fn svg(&self) -> &str {
        &self.svg
    }

    /// Self-contained image source usable without network access
    pub fn data_url(&self) -> String {
        format!("data:image/svg+xml;base64,{}", STANDARD.encode(self.svg.as_bytes()))
    }
}

/// First character of the name, uppercased, or the generic glyph for blank names
fn glyph_for(display_name: &str) -> String {
    match display_name.trim().chars().next() {
        Some(first) => first.to_uppercase().collect(),
        None => GENERIC_GLYPH.to_string(),
    }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
