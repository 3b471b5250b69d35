//! Shared constants for rendering, storage and the HTTP layer
//!

use std::sync::LazyLock;

/// Canvas width in pixels.
pub const CANVAS_WIDTH: u32 = 800;

/// Canvas height in pixels.
pub const CANVAS_HEIGHT: u32 = 600;

/// How many random shapes go into every image.
pub const SHAPE_COUNT: usize = 20;

/// Prompt lines are wrapped so they never exceed this width (unless a single word does).
pub const WRAP_WIDTH: f32 = 700.0;

/// Font size of the prompt text, in pixels.
pub const PROMPT_FONT_SIZE: f32 = 32.0;

/// Distance between prompt line centers.
pub const LINE_HEIGHT: f32 = 40.0;

/// Font size of the signature caption.
pub const SIGNATURE_FONT_SIZE: f32 = 16.0;

/// Vertical position of the signature caption.
pub const SIGNATURE_Y: f32 = 580.0;

/// Style used when the request doesn't name one, and the palette fallback.
pub const DEFAULT_STYLE: &str = "abstract";

/// Extension of every stored image.
pub const IMAGE_EXTENSION: &str = "png";

/// URL path prefix for stored images.
pub const IMAGES_PATH: &str = "images";

/// Default place we put images
pub const DEFAULT_IMAGE_DIR: &str = "./generated-images";

/// Service name reported by the health check.
pub const SERVICE_NAME: &str = "Dynamic Art Generator";

/// Max age (in seconds) for image cache entries.
pub const IMAGE_CACHE_MAX_AGE_SECONDS: u64 = 60 * 60 * 24;

/// Generated images never change, so they can be cached hard.
pub static IMAGE_CACHE_CONTROL: LazyLock<String> = LazyLock::new(|| {
    format!(
        "public, max-age={}, immutable",
        IMAGE_CACHE_MAX_AGE_SECONDS
    )
});

#[cfg(test)]
/// Base URL used in tests
pub const TEST_BASE_URL: &str = "http://example.org";
