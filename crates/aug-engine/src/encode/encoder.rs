//! JPEG encoding at randomized quality.
//!
//! Re-encoding at a per-sample quality factor simulates the variable
//! capture/compression quality of real-world imagery, which is part of the
//! robustness the augmented set trains for.

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, RgbaImage};
use rand::Rng;

use crate::api::StageError;
use crate::encode::GeneratedSample;

/// Lower bound of the per-sample quality factor.
pub const MIN_QUALITY: f32 = 0.5;

/// Upper bound of the per-sample quality factor.
pub const MAX_QUALITY: f32 = 0.9;

/// Draw the JPEG quality for one sample, mapped to the encoder's 1-100
/// integer scale.
pub fn sample_quality<R: Rng + ?Sized>(rng: &mut R) -> u8 {
    (rng.gen_range(MIN_QUALITY..=MAX_QUALITY) * 100.0).round() as u8
}

/// Encode the finished work buffer into a [`GeneratedSample`].
///
/// Consumes the buffer (the pipeline discards it after encoding either way)
/// and flattens RGBA to RGB by dropping the alpha channel; frame regions the
/// warped source never covered keep whatever the later stages made of the
/// background fill. `batch_stamp_millis` is drawn once per batch so file
/// names are unique within it.
pub fn encode_sample(
    buffer: RgbaImage,
    index: usize,
    batch_stamp_millis: i64,
    quality: u8,
) -> Result<GeneratedSample, StageError> {
    let rgb = DynamicImage::ImageRgba8(buffer).into_rgb8();

    let mut bytes = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut bytes, quality);
    encoder.encode_image(&rgb)?;

    Ok(GeneratedSample {
        index,
        bytes,
        file_name: format!("aug_{batch_stamp_millis}_{index}.jpg"),
    })
}
