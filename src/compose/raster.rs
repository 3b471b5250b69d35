//! Low level pixel operations on an opaque RGB canvas.

use image::{Rgb, RgbImage};

/// Blends `color` over the pixel at (x, y) with the given opacity.
/// Coordinates outside the canvas are ignored.
pub(crate) fn blend(canvas: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>, opacity: f32) {
    if x < 0 || y < 0 || x >= i64::from(canvas.width()) || y >= i64::from(canvas.height()) {
        return;
    }
    let alpha = opacity.clamp(0.0, 1.0);
    if alpha <= 0.0 {
        return;
    }
    let inv = 1.0 - alpha;
    let dst = canvas.get_pixel_mut(x as u32, y as u32);
    for (channel, src) in dst.0.iter_mut().zip(color.0) {
        *channel = (f32::from(src) * alpha + f32::from(*channel) * inv).round() as u8;
    }
}

/// Blends every pixel whose center satisfies `inside`, scanning only the
/// clipped bounding box `[min_x, max_x] x [min_y, max_y]`.
pub(crate) fn fill_where<F>(
    canvas: &mut RgbImage,
    bounds: (f32, f32, f32, f32),
    color: Rgb<u8>,
    opacity: f32,
    inside: F,
) where
    F: Fn(f32, f32) -> bool,
{
    let (min_x, min_y, max_x, max_y) = bounds;
    let x0 = (min_x.floor() as i64).max(0);
    let y0 = (min_y.floor() as i64).max(0);
    let x1 = (max_x.ceil() as i64).min(i64::from(canvas.width()));
    let y1 = (max_y.ceil() as i64).min(i64::from(canvas.height()));

    for py in y0..y1 {
        for px in x0..x1 {
            if inside(px as f32 + 0.5, py as f32 + 0.5) {
                blend(canvas, px, py, color, opacity);
            }
        }
    }
}

/// Fills the canvas with a linear gradient running from the top-left corner
/// (`start`) to the bottom-right corner (`end`).
pub(crate) fn fill_diagonal_gradient(canvas: &mut RgbImage, start: Rgb<u8>, end: Rgb<u8>) {
    let (width, height) = (canvas.width() as f32, canvas.height() as f32);
    let length_sq = width * width + height * height;
    if length_sq <= 0.0 {
        return;
    }
    for (x, y, pixel) in canvas.enumerate_pixels_mut() {
        let (cx, cy) = (x as f32 + 0.5, y as f32 + 0.5);
        let t = ((cx * width + cy * height) / length_sq).clamp(0.0, 1.0);
        *pixel = lerp(start, end, t);
    }
}

fn lerp(start: Rgb<u8>, end: Rgb<u8>, t: f32) -> Rgb<u8> {
    let mut out = [0u8; 3];
    for ((slot, a), b) in out.iter_mut().zip(start.0).zip(end.0) {
        *slot = (f32::from(a) + (f32::from(b) - f32::from(a)) * t).round() as u8;
    }
    Rgb(out)
}
