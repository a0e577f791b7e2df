//! Artifact stage: randomized dirt and lens marks.
//!
//! Draws a dirtiness-scaled number of small dark translucent marks, each a
//! circle or a flattened rectangle, and blends them in place. Simulates
//! sensor dirt and smudges rather than scene content.

use image::RgbaImage;
use rand::Rng;

use crate::params::AugmentationParams;
use crate::stage::blend_over;

/// Mark count ceiling at dirtiness = 100 (before the uniform scale-down).
pub const MAX_MARKS: f64 = 30.0;

/// Marks span up to this fraction of the frame width.
pub const MAX_SIZE_FRAC: f32 = 1.0 / 20.0;

/// Flattened rectangles are this fraction as tall as they are wide.
pub const RECT_ASPECT: f32 = 0.2;

/// Per-sample draws for the artifact stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtifactDraws {
    /// Number of marks to paint.
    pub marks: u32,
}

impl ArtifactDraws {
    /// Draw the mark count: `floor((dirtiness/100) * 30 * U)`, `U in [0,1)`.
    pub fn sample<R: Rng + ?Sized>(rng: &mut R, params: &AugmentationParams) -> Self {
        let marks = (f64::from(params.dirtiness_unit()) * MAX_MARKS * rng.gen::<f64>()) as u32;
        Self { marks }
    }
}

/// Paint the drawn number of marks; geometry and fill are drawn per mark.
pub fn apply<R: Rng + ?Sized>(buffer: &mut RgbaImage, draws: &ArtifactDraws, rng: &mut R) {
    let (width, height) = buffer.dimensions();
    let max_size = (width as f32 * MAX_SIZE_FRAC).max(1.0);

    for _ in 0..draws.marks {
        let center_x = rng.gen_range(0.0..width as f32);
        let center_y = rng.gen_range(0.0..height as f32);
        let size = rng.gen_range(0.0..max_size);
        let color = [
            rng.gen_range(0..=50u8),
            rng.gen_range(0..=50u8),
            rng.gen_range(0..=50u8),
        ];
        let opacity = rng.gen_range(0.0..0.5);

        if rng.gen_bool(0.5) {
            fill_circle(buffer, center_x, center_y, size / 2.0, color, opacity);
        } else {
            fill_rect(buffer, center_x, center_y, size, size * RECT_ASPECT, color, opacity);
        }
    }
}

fn fill_circle(
    buffer: &mut RgbaImage,
    center_x: f32,
    center_y: f32,
    radius: f32,
    color: [u8; 3],
    opacity: f32,
) {
    if radius <= 0.0 {
        return;
    }
    let (width, height) = buffer.dimensions();
    let min_x = (center_x - radius).floor().max(0.0) as u32;
    let max_x = ((center_x + radius).ceil() as u32).min(width.saturating_sub(1));
    let min_y = (center_y - radius).floor().max(0.0) as u32;
    let max_y = ((center_y + radius).ceil() as u32).min(height.saturating_sub(1));

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let dx = x as f32 - center_x;
            let dy = y as f32 - center_y;
            if dx * dx + dy * dy <= radius * radius {
                blend_over(buffer.get_pixel_mut(x, y), color, opacity);
            }
        }
    }
}

fn fill_rect(
    buffer: &mut RgbaImage,
    center_x: f32,
    center_y: f32,
    rect_width: f32,
    rect_height: f32,
    color: [u8; 3],
    opacity: f32,
) {
    if rect_width <= 0.0 || rect_height <= 0.0 {
        return;
    }
    let (width, height) = buffer.dimensions();
    let min_x = (center_x - rect_width / 2.0).floor().max(0.0) as u32;
    let max_x = ((center_x + rect_width / 2.0).ceil() as u32).min(width.saturating_sub(1));
    let min_y = (center_y - rect_height / 2.0).floor().max(0.0) as u32;
    let max_y = ((center_y + rect_height / 2.0).ceil() as u32).min(height.saturating_sub(1));

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            blend_over(buffer.get_pixel_mut(x, y), color, opacity);
        }
    }
}
