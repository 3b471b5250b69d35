//! Text measurement, wrapping and drawing with embedded fonts.

use image::{Rgb, RgbImage};
use rusttype::{Font, Scale, point};

use super::raster::blend;
use crate::error::ArtError;

static BOLD_FONT: &[u8] = include_bytes!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/assets/fonts/DejaVuSans-Bold.ttf"
));
static REGULAR_FONT: &[u8] = include_bytes!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/assets/fonts/DejaVuSans.ttf"
));

/// The two faces every image uses.
pub struct Fonts {
    /// Used for the prompt.
    pub bold: Font<'static>,
    /// Used for the signature.
    pub regular: Font<'static>,
}

impl std::fmt::Debug for Fonts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fonts").finish_non_exhaustive()
    }
}

impl Fonts {
    /// Parses the fonts compiled into the binary.
    pub fn embedded() -> Result<Self, ArtError> {
        let bold = Font::try_from_bytes(BOLD_FONT).ok_or_else(|| {
            ArtError::InternalServerError("failed to parse embedded bold font".to_string())
        })?;
        let regular = Font::try_from_bytes(REGULAR_FONT).ok_or_else(|| {
            ArtError::InternalServerError("failed to parse embedded regular font".to_string())
        })?;
        Ok(Self { bold, regular })
    }
}

/// Advance width of `text` at `px` pixels, kerning included.
pub fn text_width(font: &Font<'_>, px: f32, text: &str) -> f32 {
    font.layout(text, Scale::uniform(px), point(0.0, 0.0))
        .last()
        .map(|glyph| glyph.position().x + glyph.unpositioned().h_metrics().advance_width)
        .unwrap_or(0.0)
}

/// Greedy word wrap: keeps adding words to the current line while it fits in
/// `max_width`. A word that is wider than `max_width` on its own gets a line
/// to itself and is never broken.
pub fn wrap_lines(font: &Font<'_>, px: f32, text: &str, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{current} {word}");
        if text_width(font, px, &candidate) > max_width {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Draws one line of text centered both ways on `center`.
pub(crate) fn draw_text_centered(
    canvas: &mut RgbImage,
    font: &Font<'_>,
    px: f32,
    center: (f32, f32),
    color: Rgb<u8>,
    opacity: f32,
    text: &str,
) {
    let scale = Scale::uniform(px);
    let v_metrics = font.v_metrics(scale);
    let (cx, cy) = center;
    let start_x = cx - text_width(font, px, text) / 2.0;
    // descent is negative, so this puts the middle of the em box on cy
    let baseline = cy + (v_metrics.ascent + v_metrics.descent) / 2.0;

    for glyph in font.layout(text, scale, point(start_x, baseline)) {
        let Some(bounds) = glyph.pixel_bounding_box() else {
            continue;
        };
        glyph.draw(|gx, gy, coverage| {
            blend(
                canvas,
                i64::from(bounds.min.x) + i64::from(gx),
                i64::from(bounds.min.y) + i64::from(gy),
                color,
                coverage * opacity,
            );
        });
    }
}
