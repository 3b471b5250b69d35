//! Style palettes: a fixed table from style name to colors.

use image::Rgb;
use serde::Serialize;

use crate::constants::DEFAULT_STYLE;

/// A named set of colors used for the gradient and the shapes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Style {
    /// Lowercase style keyword, eg `ocean`.
    pub name: &'static str,
    /// Ordered palette; the first two colors are the gradient stops.
    pub colors: [Rgb<u8>; 5],
}

impl Style {
    /// Style name with the first letter capitalised, eg `Ocean`.
    pub fn display_name(&self) -> String {
        let mut chars = self.name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Gradient start color.
    pub fn gradient_start(&self) -> Rgb<u8> {
        self.colors[0]
    }

    /// Gradient end color.
    pub fn gradient_end(&self) -> Rgb<u8> {
        self.colors[1]
    }

    /// Palette as `#rrggbb` strings.
    pub fn hex_colors(&self) -> Vec<String> {
        self.colors.iter().copied().map(to_hex).collect()
    }
}

/// Formats a color as `#RRGGBB`.
pub fn to_hex(color: Rgb<u8>) -> String {
    let [r, g, b] = color.0;
    format!("#{r:02X}{g:02X}{b:02X}")
}

/// How a style is presented over the API.
#[derive(Clone, Debug, Serialize)]
pub struct StyleSummary {
    /// Style keyword.
    pub name: String,
    /// Palette as hex strings.
    pub colors: Vec<String>,
    /// Capitalised name for display.
    #[serde(rename = "displayName")]
    pub display_name: String,
}

impl From<&Style> for StyleSummary {
    fn from(style: &Style) -> Self {
        Self {
            name: style.name.to_string(),
            colors: style.hex_colors(),
            display_name: style.display_name(),
        }
    }
}

/// Immutable lookup table of styles. The first entry is the fallback.
#[derive(Clone, Debug)]
pub struct PaletteTable {
    styles: Vec<Style>,
}

impl Default for PaletteTable {
    fn default() -> Self {
        Self {
            styles: vec![
                Style {
                    name: DEFAULT_STYLE,
                    colors: [
                        Rgb([0xFF, 0x6B, 0x6B]),
                        Rgb([0x4E, 0xCD, 0xC4]),
                        Rgb([0x45, 0xB7, 0xD1]),
                        Rgb([0x96, 0xCE, 0xB4]),
                        Rgb([0xFF, 0xEA, 0xA7]),
                    ],
                },
                Style {
                    name: "nature",
                    colors: [
                        Rgb([0x2D, 0x50, 0x16]),
                        Rgb([0x8B, 0xC3, 0x4A]),
                        Rgb([0x3E, 0x7C, 0x17]),
                        Rgb([0xCD, 0xDC, 0x39]),
                        Rgb([0x79, 0x55, 0x48]),
                    ],
                },
                Style {
                    name: "tech",
                    colors: [
                        Rgb([0x0F, 0x0F, 0x23]),
                        Rgb([0x3A, 0x86, 0xFF]),
                        Rgb([0x00, 0xD4, 0xFF]),
                        Rgb([0x7B, 0x2C, 0xBF]),
                        Rgb([0xFF, 0x00, 0x6E]),
                    ],
                },
                Style {
                    name: "sunset",
                    colors: [
                        Rgb([0xFF, 0x6B, 0x35]),
                        Rgb([0x54, 0x0D, 0x6E]),
                        Rgb([0xF7, 0x93, 0x1E]),
                        Rgb([0xFF, 0xD2, 0x3F]),
                        Rgb([0xEE, 0x42, 0x66]),
                    ],
                },
                Style {
                    name: "ocean",
                    colors: [
                        Rgb([0x00, 0x69, 0x94]),
                        Rgb([0x00, 0x3F, 0x5C]),
                        Rgb([0x00, 0x99, 0xCC]),
                        Rgb([0x66, 0xCC, 0xFF]),
                        Rgb([0x2F, 0x95, 0x99]),
                    ],
                },
            ],
        }
    }
}

impl PaletteTable {
    /// Finds a style by name, ignoring case and surrounding whitespace.
    /// Unknown names get the fallback style rather than an error.
    pub fn lookup(&self, name: &str) -> &Style {
        let name = name.trim();
        self.styles
            .iter()
            .find(|style| style.name.eq_ignore_ascii_case(name))
            .unwrap_or_else(|| self.fallback())
    }

    /// Returns true when `name` matches a known style.
    pub fn contains(&self, name: &str) -> bool {
        let name = name.trim();
        self.styles
            .iter()
            .any(|style| style.name.eq_ignore_ascii_case(name))
    }

    /// All styles, in table order.
    pub fn styles(&self) -> &[Style] {
        &self.styles
    }

    fn fallback(&self) -> &Style {
        // Default always populates the table and there's no way to remove entries.
        &self.styles[0]
    }
}
