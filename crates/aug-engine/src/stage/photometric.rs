//! Photometric adjustment stage: per-pixel tone and color remapping.
//!
//! One set of draws is taken per sample and applied uniformly to every pixel:
//! gamma, per-channel gain, contrast around the midpoint, and a brightness
//! offset. All magnitudes widen with the light-aging knob. The alpha channel
//! is never touched.

use image::RgbaImage;
use rand::Rng;

use crate::params::AugmentationParams;

/// Brightness delta upper bound (in 0-255 units) at light_aging = 100.
pub const MAX_BRIGHTNESS_DELTA: f32 = 150.0;

/// Lower bound shared by the contrast and gamma draws.
pub const CURVE_FLOOR: f32 = 0.5;

/// Channel gains are drawn uniformly from `[1 - GAIN_SPAN, 1 + GAIN_SPAN]`.
pub const GAIN_SPAN: f32 = 0.2;

/// Per-sample draws for the photometric stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhotometricDraws {
    /// Brightness offset in 0-255 units, `[-150, 150]` scaled by light_aging.
    pub brightness: f32,
    /// Contrast multiplier around the 0.5 midpoint.
    pub contrast: f32,
    /// Gamma exponent applied to normalized channel values.
    pub gamma: f32,
    /// Red channel gain.
    pub gain_r: f32,
    /// Green channel gain.
    pub gain_g: f32,
    /// Blue channel gain.
    pub gain_b: f32,
}

impl PhotometricDraws {
    /// Draw the stage parameters for one sample.
    ///
    /// At light_aging = 0 the brightness range collapses to zero and the
    /// contrast/gamma ranges collapse to [`CURVE_FLOOR`]; channel gains stay
    /// independent of the knob, so consecutive samples still drift in color
    /// balance.
    pub fn sample<R: Rng + ?Sized>(rng: &mut R, params: &AugmentationParams) -> Self {
        let aging = params.light_aging_unit();
        let brightness_span = aging * MAX_BRIGHTNESS_DELTA;
        let curve_ceiling = CURVE_FLOOR + aging * 2.0;

        Self {
            brightness: rng.gen_range(-brightness_span..=brightness_span),
            contrast: rng.gen_range(CURVE_FLOOR..=curve_ceiling),
            gamma: rng.gen_range(CURVE_FLOOR..=curve_ceiling),
            gain_r: rng.gen_range(1.0 - GAIN_SPAN..=1.0 + GAIN_SPAN),
            gain_g: rng.gen_range(1.0 - GAIN_SPAN..=1.0 + GAIN_SPAN),
            gain_b: rng.gen_range(1.0 - GAIN_SPAN..=1.0 + GAIN_SPAN),
        }
    }

    /// The draws that leave every pixel unchanged.
    pub fn identity() -> Self {
        Self {
            brightness: 0.0,
            contrast: 1.0,
            gamma: 1.0,
            gain_r: 1.0,
            gain_g: 1.0,
            gain_b: 1.0,
        }
    }
}

/// Remap every pixel of the buffer in place.
///
/// Per RGB channel: normalize to `[0, 1]`, raise to the gamma power, apply
/// the channel gain, scale around the 0.5 midpoint by the contrast factor,
/// add the normalized brightness offset, clamp, write back.
pub fn apply(buffer: &mut RgbaImage, draws: &PhotometricDraws) {
    let brightness = draws.brightness / 255.0;
    let gains = [draws.gain_r, draws.gain_g, draws.gain_b];

    for pixel in buffer.pixels_mut() {
        for (channel, &gain) in gains.iter().enumerate() {
            let normalized = f32::from(pixel[channel]) / 255.0;
            let curved = normalized.powf(draws.gamma) * gain;
            let adjusted = (curved - 0.5) * draws.contrast + 0.5 + brightness;
            pixel[channel] = (adjusted.clamp(0.0, 1.0) * 255.0).round() as u8;
        }
    }
}
