//! Augmentor builder -- the primary entry point for the crate.
//!
//! [`Augmentor`] holds one immutable parameter set and runs the full stage
//! pipeline (geometric, photometric, noise, overlay, artifact, encode) once
//! per requested sample.

use chrono::Utc;
use image::RgbaImage;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::api::error::{AugmentError, StageError};
use crate::encode::{self, GeneratedSample};
use crate::params::AugmentationParams;
use crate::stage::{
    artifact, geometric, noise, overlay, photometric, ArtifactDraws, GeometricDraws,
    OverlayDraws, PhotometricDraws,
};

/// Derive the independent random stream for one sample of a batch.
///
/// Splitmix64 finalizer over `seed + index`: stateless and order-free, so a
/// parallel driver and the sequential [`Augmentor::generate`] produce
/// identical streams for the same `(seed, index)` pair.
pub fn sample_rng(seed: u64, index: usize) -> StdRng {
    StdRng::seed_from_u64(splitmix64(seed.wrapping_add(index as u64)))
}

fn splitmix64(state: u64) -> u64 {
    let mut z = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Batch augmentation orchestrator.
///
/// `Augmentor` is the recommended entry point for the crate. It composes the
/// stage pipeline behind a builder API with the three intensity knobs:
///
/// - Constructor takes [`AugmentationParams`] (clamped on entry, immutable
///   for every batch generated through this instance)
/// - Knob methods consume and return `self` (standard builder pattern)
/// - [`generate()`](Self::generate) takes `&self`, so one `Augmentor` is
///   reusable across batches and shareable across worker threads
///
/// # Example
///
/// ```
/// use aug_engine::{AugmentationParams, Augmentor};
/// use image::{Rgba, RgbaImage};
///
/// let source = RgbaImage::from_pixel(32, 32, Rgba([128, 128, 128, 255]));
/// let augmentor = Augmentor::new(AugmentationParams::new().harshness(40));
///
/// let batch = augmentor.generate(&source, 3, 1234).unwrap();
/// assert_eq!(batch.len(), 3);
/// assert_eq!(batch[0].index, 0);
/// ```
#[derive(Debug, Clone)]
pub struct Augmentor {
    params: AugmentationParams,
}

impl Augmentor {
    /// Create an augmentor with the given parameters, clamped to `[0, 100]`.
    pub fn new(params: AugmentationParams) -> Self {
        Self {
            params: params.clamped(),
        }
    }

    /// Set the harshness knob, clamped to `[0, 100]`.
    #[inline]
    pub fn harshness(mut self, pct: u8) -> Self {
        self.params = self.params.harshness(pct);
        self
    }

    /// Set the light-aging knob, clamped to `[0, 100]`.
    #[inline]
    pub fn light_aging(mut self, pct: u8) -> Self {
        self.params = self.params.light_aging(pct);
        self
    }

    /// Set the dirtiness knob, clamped to `[0, 100]`.
    #[inline]
    pub fn dirtiness(mut self, pct: u8) -> Self {
        self.params = self.params.dirtiness(pct);
        self
    }

    /// The clamped parameter set this augmentor applies.
    #[inline]
    pub fn params(&self) -> AugmentationParams {
        self.params
    }

    /// Generate an ordered batch of `count` samples from one source image.
    ///
    /// Validates the source before constructing any RNG or consuming any
    /// draw. Each sample runs the full stage pipeline on its own fresh work
    /// buffer with its own random stream derived from `(seed, index)`, so
    /// samples are statistically independent and the whole batch is
    /// reproducible for a fixed seed.
    ///
    /// All-or-nothing: if any stage fails, the batch is aborted, samples
    /// already generated are discarded, and the error carries the failing
    /// index. `count = 0` is valid and returns an empty batch.
    pub fn generate(
        &self,
        source: &RgbaImage,
        count: usize,
        seed: u64,
    ) -> Result<Vec<GeneratedSample>, AugmentError> {
        validate_source(source)?;
        let batch_stamp = batch_stamp_millis();

        let mut samples = Vec::with_capacity(count);
        for index in 0..count {
            let mut rng = sample_rng(seed, index);
            let sample = self
                .run_pipeline(source, index, batch_stamp, &mut rng)
                .map_err(|source| AugmentError::BatchGeneration {
                    failed_at_index: index,
                    source,
                })?;
            samples.push(sample);
        }
        Ok(samples)
    }

    /// Generate a single sample: the per-sample entry point used by parallel
    /// batch drivers, with the caller supplying the sample's random stream
    /// and the batch-wide timestamp for file naming.
    ///
    /// Performs the same source validation as [`generate()`](Self::generate),
    /// before any draw is consumed.
    pub fn augment_sample<R: Rng + ?Sized>(
        &self,
        source: &RgbaImage,
        index: usize,
        batch_stamp_millis: i64,
        rng: &mut R,
    ) -> Result<GeneratedSample, AugmentError> {
        validate_source(source)?;
        self.run_pipeline(source, index, batch_stamp_millis, rng)
            .map_err(AugmentError::Stage)
    }

    /// Run the fixed stage sequence for one sample.
    fn run_pipeline<R: Rng + ?Sized>(
        &self,
        source: &RgbaImage,
        index: usize,
        batch_stamp_millis: i64,
        rng: &mut R,
    ) -> Result<GeneratedSample, StageError> {
        let (width, height) = source.dimensions();

        let geo = GeometricDraws::sample(rng, width, height, index == 0);
        let mut buffer = geometric::apply(source, &geo)?;

        let photo = PhotometricDraws::sample(rng, &self.params);
        photometric::apply(&mut buffer, &photo);

        noise::apply(&mut buffer, &self.params, rng);

        let overlays = OverlayDraws::sample(rng, &self.params, width, height);
        overlay::apply(&mut buffer, &overlays, rng);

        let marks = ArtifactDraws::sample(rng, &self.params);
        artifact::apply(&mut buffer, &marks, rng);

        let quality = encode::sample_quality(rng);
        encode::encode_sample(buffer, index, batch_stamp_millis, quality)
    }
}

/// UTC timestamp for batch-unique file names, drawn once per batch.
pub fn batch_stamp_millis() -> i64 {
    Utc::now().timestamp_millis()
}

fn validate_source(source: &RgbaImage) -> Result<(), AugmentError> {
    let (width, height) = source.dimensions();
    if width == 0 || height == 0 {
        return Err(AugmentError::InvalidInput { width, height });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn gray_source(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba([128, 128, 128, 255]))
    }

    #[test]
    fn test_builder_chaining_clamps() {
        let augmentor = Augmentor::new(AugmentationParams::new())
            .harshness(200)
            .light_aging(40)
            .dirtiness(30);

        assert_eq!(augmentor.params().harshness, 100);
        assert_eq!(augmentor.params().light_aging, 40);
        assert_eq!(augmentor.params().dirtiness, 30);
    }

    #[test]
    fn test_new_clamps_params() {
        let params = AugmentationParams {
            harshness: 255,
            light_aging: 0,
            dirtiness: 0,
        };
        assert_eq!(Augmentor::new(params).params().harshness, 100);
    }

    #[test]
    fn test_generate_returns_count_samples_in_order() {
        let source = gray_source(40, 30);
        let augmentor = Augmentor::new(AugmentationParams::new());

        let batch = augmentor.generate(&source, 4, 99).unwrap();
        assert_eq!(batch.len(), 4);
        for (i, sample) in batch.iter().enumerate() {
            assert_eq!(sample.index, i);
            assert!(sample.file_name.starts_with("aug_"));
            assert!(sample.file_name.ends_with(&format!("_{i}.jpg")));
        }
    }

    #[test]
    fn test_zero_count_is_empty_ok() {
        let source = gray_source(10, 10);
        let augmentor = Augmentor::new(AugmentationParams::new());

        let batch = augmentor.generate(&source, 0, 1).unwrap();
        assert!(batch.is_empty());
    }

    #[test]
    fn test_zero_width_rejected() {
        let source = RgbaImage::new(0, 16);
        let augmentor = Augmentor::new(AugmentationParams::new());

        match augmentor.generate(&source, 3, 1) {
            Err(AugmentError::InvalidInput { width: 0, height: 16 }) => {}
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_generate_does_not_mutate_source() {
        let source = gray_source(24, 24);
        let pristine = source.clone();
        let augmentor = Augmentor::new(
            AugmentationParams::new()
                .harshness(100)
                .light_aging(100)
                .dirtiness(100),
        );

        augmentor.generate(&source, 3, 5).unwrap();
        assert_eq!(source, pristine);
    }

    #[test]
    fn test_sample_rng_streams_are_index_independent() {
        let mut a = sample_rng(42, 0);
        let mut b = sample_rng(42, 1);
        let draw_a: u64 = a.gen();
        let draw_b: u64 = b.gen();
        assert_ne!(draw_a, draw_b, "adjacent indices must get distinct streams");

        let mut a_again = sample_rng(42, 0);
        assert_eq!(draw_a, a_again.gen::<u64>(), "streams must be reproducible");
    }
}
