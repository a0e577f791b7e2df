//! Noise injection stage: per-pixel salt-and-pepper corruption.
//!
//! Every pixel runs an independent Bernoulli trial; on trigger its RGB
//! channels are driven to full white or full black with equal probability.
//! Kept as its own stage (rather than folded into the photometric pass) so
//! the density property is testable in isolation.

use image::RgbaImage;
use rand::Rng;

use crate::params::AugmentationParams;

/// Trigger probability divisor: `harshness / 5000`, i.e. at most 2%.
pub const DENSITY_DIVISOR: f64 = 5000.0;

/// Corruption probability for the given parameters.
#[inline]
pub fn trigger_probability(params: &AugmentationParams) -> f64 {
    f64::from(params.harshness.min(100)) / DENSITY_DIVISOR
}

/// Corrupt the buffer in place with salt-and-pepper noise.
///
/// Alpha is untouched. At harshness 0 the probability is exactly 0 and the
/// buffer is returned unmodified.
pub fn apply<R: Rng + ?Sized>(buffer: &mut RgbaImage, params: &AugmentationParams, rng: &mut R) {
    let probability = trigger_probability(params);
    if probability <= 0.0 {
        return;
    }

    for pixel in buffer.pixels_mut() {
        if rng.gen_bool(probability) {
            let value = if rng.gen_bool(0.5) { 255 } else { 0 };
            pixel[0] = value;
            pixel[1] = value;
            pixel[2] = value;
        }
    }
}
