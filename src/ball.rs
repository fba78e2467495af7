//! Soccer ball overlay.
//!
//! The ball is drawn on its own transparent image: a background colored disc, a central pentagon
//! surrounded by five hexagons, and a thin outline. The finished ball (usually carrying the logo)
//! is alpha blended onto the center of the symbol.

use std::f64::consts::PI;

use image::{imageops, Rgba, RgbaImage};
use imageproc::drawing::draw_hollow_polygon_mut;
use imageproc::point::Point;
use log::{info, warn};

use crate::config::{BallGeometry, Palette, BALL_COVERAGE_WARN_PERCENT};
use crate::pipeline::Warning;
use crate::raster::{Canvas, Layout};

/// Diameter of the ball in pixels for a symbol laid out as `layout`.
pub fn ball_size(layout: &Layout, relative_size: f64) -> u32 {
    (layout.symbol_px() as f64 * relative_size) as u32
}

/// Seam width in pixels, growing with the ball so large prints keep visible lines.
pub fn line_width(ball_size: u32) -> u32 {
    (ball_size / 200).max(1)
}

/// Vertices of a regular polygon with circumradius `radius`, the first vertex at `rotation`
/// degrees (0 points right, angles grow clockwise in image coordinates).
pub fn regular_polygon(center: (f64, f64), radius: f64, sides: u32, rotation: f64) -> Vec<(f64, f64)> {
    (0..sides)
        .map(|i| {
            let angle = (i as f64 * 360.0 / sides as f64 + rotation) * PI / 180.0;
            (center.0 + radius * angle.cos(), center.1 + radius * angle.sin())
        })
        .collect()
}

/// Precomputed seam geometry of a ball of a given size.
#[derive(Clone, Debug, PartialEq)]
pub struct BallPattern {
    /// Diameter in pixels.
    pub size: u32,
    pub pentagon: Vec<(f64, f64)>,
    pub hexagons: Vec<Vec<(f64, f64)>>,
}

impl BallPattern {
    pub fn new(size: u32, geometry: &BallGeometry) -> Self {
        let center = size as f64 / 2.0;
        let radius = center;
        let pentagon = regular_polygon(
            (center, center),
            radius * geometry.pentagon_radius_factor,
            5,
            -90.0,
        );
        let distance = radius * geometry.hexagon_distance_factor;
        let hexagons = (0..5)
            .map(|i| {
                let angle = (i as f64 * 72.0) * PI / 180.0;
                let hex_center = (center + distance * angle.cos(), center + distance * angle.sin());
                regular_polygon(hex_center, radius * geometry.hexagon_radius_factor, 6, 0.0)
            })
            .collect();
        Self { size, pentagon, hexagons }
    }

    /// Draw the ball on a transparent image of `size` x `size` pixels.
    pub fn render(&self, palette: &Palette) -> RgbaImage {
        let mut ball = RgbaImage::from_pixel(self.size, self.size, Rgba([0, 0, 0, 0]));
        if self.size == 0 {
            return ball;
        }
        let seam = palette.pattern.rgba();
        let fill = palette.background.rgba();
        let width = line_width(self.size);

        // Disc inscribed in the whole box, outline as the outermost `width` pixels of it.
        let mid = (self.size as f64 - 1.0) / 2.0;
        let outer = self.size as f64 / 2.0;
        let inner = outer - width as f64;
        for (x, y, pixel) in ball.enumerate_pixels_mut() {
            let distance = (x as f64 - mid).hypot(y as f64 - mid);
            if distance <= inner {
                *pixel = fill;
            } else if distance <= outer {
                *pixel = seam;
            }
        }
        for polygon in std::iter::once(&self.pentagon).chain(self.hexagons.iter()) {
            for k in 0..width {
                // Thicken by redrawing slightly scaled copies around the nominal outline.
                let offset = k as f64 - (width - 1) as f64 / 2.0;
                let points = thicken(polygon, offset);
                draw_hollow_polygon_mut(&mut ball, &points, seam);
            }
        }
        ball
    }
}

/// Push every vertex `offset` pixels away from the polygon's centroid.
fn thicken(polygon: &[(f64, f64)], offset: f64) -> Vec<Point<f32>> {
    let n = polygon.len() as f64;
    let (cx, cy) = polygon
        .iter()
        .fold((0.0, 0.0), |(sx, sy), &(x, y)| (sx + x / n, sy + y / n));
    polygon
        .iter()
        .map(|&(x, y)| {
            let (dx, dy) = (x - cx, y - cy);
            let len = (dx * dx + dy * dy).sqrt();
            let scale = if len > 0.0 { (len + offset) / len } else { 1.0 };
            Point::new((cx + dx * scale) as f32, (cy + dy * scale) as f32)
        })
        .collect()
}

/// Percentage of the symbol area hidden by the ball.
pub fn coverage_percent(ball_size: u32, layout: &Layout) -> f64 {
    let symbol = layout.symbol_px() as f64;
    if symbol == 0.0 {
        return 0.0;
    }
    (ball_size as f64).powi(2) / (symbol * symbol) * 100.0
}

/// Log the ball coverage, warning when it threatens scannability.
pub fn check_coverage(ball_size: u32, layout: &Layout) -> Option<Warning> {
    let percent = coverage_percent(ball_size, layout);
    info!("Soccer ball overlay covers ~{:.1}% of the QR code image area.", percent);
    if percent > BALL_COVERAGE_WARN_PERCENT {
        warn!(
            "Coverage exceeds {}%. QR code may be difficult to scan. Consider reducing the ball size.",
            BALL_COVERAGE_WARN_PERCENT
        );
        return Some(Warning::BallCoverage { percent });
    }
    None
}

/// Blend `ball` onto the center of the symbol.
pub fn overlay_ball(canvas: &mut Canvas, ball: &RgbaImage) {
    let layout = canvas.layout;
    let offset = layout.symbol_origin() as i64;
    let x = offset + (layout.symbol_px() as i64 - ball.width() as i64) / 2;
    let y = offset + (layout.symbol_px() as i64 - ball.height() as i64) / 2;
    imageops::overlay(&mut canvas.image, ball, x, y);
}
