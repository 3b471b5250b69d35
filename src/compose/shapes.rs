//! Random shape primitives and their rasterisation.

use image::{Rgb, RgbImage};
use rand::{Rng, RngExt};

use super::raster::fill_where;

/// Color and opacity of a single shape. Every shape owns its paint, so
/// nothing carries over from one shape to the next.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Paint {
    /// Fill or stroke color.
    pub color: Rgb<u8>,
    /// Opacity in `[0, 1]`.
    pub opacity: f32,
}

/// One randomly placed primitive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    /// Filled disc.
    Circle {
        /// Center x.
        cx: f32,
        /// Center y.
        cy: f32,
        /// Radius.
        radius: f32,
        /// Fill.
        paint: Paint,
    },
    /// Filled axis-aligned rectangle anchored at its top-left corner.
    Rectangle {
        /// Left edge.
        x: f32,
        /// Top edge.
        y: f32,
        /// Width.
        width: f32,
        /// Height.
        height: f32,
        /// Fill.
        paint: Paint,
    },
    /// Filled isosceles triangle pointing up.
    Triangle {
        /// Corners: apex, bottom-left, bottom-right.
        points: [(f32, f32); 3],
        /// Fill.
        paint: Paint,
    },
    /// Stroked segment with butt caps.
    Line {
        /// Start point.
        from: (f32, f32),
        /// End point.
        to: (f32, f32),
        /// Stroke width.
        width: f32,
        /// Stroke.
        paint: Paint,
    },
}

impl Shape {
    /// Samples a shape somewhere on a `width` x `height` canvas, colored from `palette`.
    pub fn sample<R: Rng + ?Sized>(
        rng: &mut R,
        palette: &[Rgb<u8>; 5],
        width: u32,
        height: u32,
    ) -> Self {
        let kind = rng.random_range(0..4u8);
        let x = rng.random_range(0.0..width as f32);
        let y = rng.random_range(0.0..height as f32);
        let size: f32 = rng.random_range(10.0..110.0);
        let paint = Paint {
            color: palette[rng.random_range(0..palette.len())],
            opacity: rng.random_range(0.2..0.7),
        };

        match kind {
            0 => Shape::Circle {
                cx: x,
                cy: y,
                radius: size / 2.0,
                paint,
            },
            1 => Shape::Rectangle {
                x,
                y,
                width: size,
                height: size * 0.6,
                paint,
            },
            2 => {
                let half = size / 2.0;
                Shape::Triangle {
                    points: [(x, y - half), (x - half, y + half), (x + half, y + half)],
                    paint,
                }
            }
            _ => {
                let dy: f32 = rng.random_range(-50.0..50.0);
                Shape::Line {
                    from: (x, y),
                    to: (x + size, y + dy),
                    width: rng.random_range(2.0..10.0),
                    paint,
                }
            }
        }
    }

    /// The shape's paint.
    pub fn paint(&self) -> Paint {
        match self {
            Shape::Circle { paint, .. }
            | Shape::Rectangle { paint, .. }
            | Shape::Triangle { paint, .. }
            | Shape::Line { paint, .. } => *paint,
        }
    }

    /// Rasterises the shape onto the canvas, clipping anything off-canvas.
    pub fn draw(&self, canvas: &mut RgbImage) {
        let Paint { color, opacity } = self.paint();
        match *self {
            Shape::Circle { cx, cy, radius, .. } => {
                let radius_sq = radius * radius;
                fill_where(
                    canvas,
                    (cx - radius, cy - radius, cx + radius, cy + radius),
                    color,
                    opacity,
                    |px, py| (px - cx).powi(2) + (py - cy).powi(2) <= radius_sq,
                );
            }
            Shape::Rectangle {
                x,
                y,
                width,
                height,
                ..
            } => {
                fill_where(
                    canvas,
                    (x, y, x + width, y + height),
                    color,
                    opacity,
                    |px, py| px >= x && px < x + width && py >= y && py < y + height,
                );
            }
            Shape::Triangle { points, .. } => {
                let [a, b, c] = points;
                let min_x = a.0.min(b.0).min(c.0);
                let max_x = a.0.max(b.0).max(c.0);
                let min_y = a.1.min(b.1).min(c.1);
                let max_y = a.1.max(b.1).max(c.1);
                fill_where(
                    canvas,
                    (min_x, min_y, max_x, max_y),
                    color,
                    opacity,
                    |px, py| point_in_triangle((px, py), a, b, c),
                );
            }
            Shape::Line { from, to, width, .. } => {
                let half = width / 2.0;
                let (dx, dy) = (to.0 - from.0, to.1 - from.1);
                let length_sq = dx * dx + dy * dy;
                if length_sq <= f32::EPSILON {
                    return;
                }
                let length = length_sq.sqrt();
                fill_where(
                    canvas,
                    (
                        from.0.min(to.0) - half,
                        from.1.min(to.1) - half,
                        from.0.max(to.0) + half,
                        from.1.max(to.1) + half,
                    ),
                    color,
                    opacity,
                    |px, py| {
                        let (rx, ry) = (px - from.0, py - from.1);
                        let along = (rx * dx + ry * dy) / length_sq;
                        let across = (rx * dy - ry * dx).abs() / length;
                        (0.0..=1.0).contains(&along) && across <= half
                    },
                );
            }
        }
    }
}

fn edge(p: (f32, f32), a: (f32, f32), b: (f32, f32)) -> f32 {
    (b.0 - a.0) * (p.1 - a.1) - (b.1 - a.1) * (p.0 - a.0)
}

fn point_in_triangle(p: (f32, f32), a: (f32, f32), b: (f32, f32), c: (f32, f32)) -> bool {
    let (e0, e1, e2) = (edge(p, a, b), edge(p, b, c), edge(p, c, a));
    let has_negative = e0 < 0.0 || e1 < 0.0 || e2 < 0.0;
    let has_positive = e0 > 0.0 || e1 > 0.0 || e2 > 0.0;
    !(has_negative && has_positive)
}
