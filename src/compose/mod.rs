//! Image composition: gradient, random shapes, the wrapped prompt and a signature.
//!
//! Rendering is a pure function of the prompt, the style, a random source and
//! the date printed in the signature. Nothing here touches the disk or the clock.

mod raster;
pub mod shapes;
pub mod text;

use std::io::Cursor;
use std::sync::Arc;

use chrono::NaiveDate;
use image::{ImageFormat, Rgb, RgbImage};
use rand::Rng;
use tracing::debug;

use crate::constants::{
    CANVAS_HEIGHT, CANVAS_WIDTH, LINE_HEIGHT, PROMPT_FONT_SIZE, SHAPE_COUNT, SIGNATURE_FONT_SIZE,
    SIGNATURE_Y, WRAP_WIDTH,
};
use crate::error::ArtError;
use crate::palette::{PaletteTable, Style};
use shapes::Shape;
use text::{Fonts, draw_text_centered, wrap_lines};

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const SHADOW_OFFSET: f32 = 2.0;
const SHADOW_OPACITY: f32 = 0.5;
const SIGNATURE_OPACITY: f32 = 0.7;

/// Renders images. Cheap to clone; the fonts and palettes are shared.
#[derive(Clone, Debug)]
pub struct Composer {
    palettes: Arc<PaletteTable>,
    fonts: Arc<Fonts>,
}

impl Composer {
    /// Builds a composer over the given palette table using the embedded fonts.
    pub fn new(palettes: PaletteTable) -> Result<Self, ArtError> {
        Ok(Self {
            palettes: Arc::new(palettes),
            fonts: Arc::new(Fonts::embedded()?),
        })
    }

    /// The palette table styles are resolved against.
    pub fn palettes(&self) -> &PaletteTable {
        &self.palettes
    }

    /// Draws a fresh 800x600 image for `prompt` in `style`.
    ///
    /// Unknown styles use the fallback palette. The caller is responsible for
    /// rejecting blank prompts; a blank prompt simply renders no prompt text.
    pub fn compose<R: Rng + ?Sized>(
        &self,
        prompt: &str,
        style: &str,
        rng: &mut R,
        date: NaiveDate,
    ) -> RgbImage {
        let style = self.palettes.lookup(style);
        let mut canvas = self.draw_background(style, rng);
        self.draw_prompt(&mut canvas, prompt);
        self.draw_signature(&mut canvas, date);
        canvas
    }

    /// Gradient plus the random shapes.
    fn draw_background<R: Rng + ?Sized>(&self, style: &Style, rng: &mut R) -> RgbImage {
        let mut canvas = RgbImage::new(CANVAS_WIDTH, CANVAS_HEIGHT);
        raster::fill_diagonal_gradient(&mut canvas, style.gradient_start(), style.gradient_end());
        for shape in sample_shapes(rng, style) {
            shape.draw(&mut canvas);
        }
        canvas
    }

    /// Wrapped prompt lines, each with a soft drop shadow under the white text.
    fn draw_prompt(&self, canvas: &mut RgbImage, prompt: &str) {
        let lines = wrap_lines(&self.fonts.bold, PROMPT_FONT_SIZE, prompt, WRAP_WIDTH);
        debug!("Drawing {} prompt line(s) for {:?}", lines.len(), prompt);
        let center_x = CANVAS_WIDTH as f32 / 2.0;
        for (line, center_y) in lines.iter().zip(line_centers(lines.len())) {
            draw_text_centered(
                canvas,
                &self.fonts.bold,
                PROMPT_FONT_SIZE,
                (center_x + SHADOW_OFFSET, center_y + SHADOW_OFFSET),
                BLACK,
                SHADOW_OPACITY,
                line,
            );
            draw_text_centered(
                canvas,
                &self.fonts.bold,
                PROMPT_FONT_SIZE,
                (center_x, center_y),
                WHITE,
                1.0,
                line,
            );
        }
    }

    fn draw_signature(&self, canvas: &mut RgbImage, date: NaiveDate) {
        draw_text_centered(
            canvas,
            &self.fonts.regular,
            SIGNATURE_FONT_SIZE,
            (CANVAS_WIDTH as f32 / 2.0, SIGNATURE_Y),
            WHITE,
            SIGNATURE_OPACITY,
            &signature(date),
        );
    }
}

/// Samples the shapes for one image, in drawing order.
pub fn sample_shapes<R: Rng + ?Sized>(rng: &mut R, style: &Style) -> Vec<Shape> {
    (0..SHAPE_COUNT)
        .map(|_| Shape::sample(rng, &style.colors, CANVAS_WIDTH, CANVAS_HEIGHT))
        .collect()
}

/// Vertical centers for `count` prompt lines, stacked around the canvas middle.
pub fn line_centers(count: usize) -> Vec<f32> {
    let middle = CANVAS_HEIGHT as f32 / 2.0;
    let start = middle - (count.saturating_sub(1) as f32 * LINE_HEIGHT) / 2.0;
    (0..count)
        .map(|index| start + index as f32 * LINE_HEIGHT)
        .collect()
}

/// The caption stamped at the bottom of every image.
pub fn signature(date: NaiveDate) -> String {
    format!("AI Generated • {} • Dynamic Art", date.format("%Y-%m-%d"))
}

/// Encodes a composed image as PNG.
pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>, ArtError> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}
