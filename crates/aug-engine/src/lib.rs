//! aug-engine: randomized weathering augmentation for training images
//!
//! This library generates synthetic variants of a single source image for
//! training-set augmentation (object-detection pipelines and similar). Each
//! variant runs a fixed sequence of randomized transforms over its own work
//! buffer and is re-encoded lossily, so a batch delivers statistical
//! diversity -- not visual realism -- for robustness training.
//!
//! # Quick Start
//!
//! The [`Augmentor`] builder is the primary entry point:
//!
//! ```
//! use aug_engine::{AugmentationParams, Augmentor};
//! use image::{Rgba, RgbaImage};
//!
//! let source = RgbaImage::from_pixel(64, 64, Rgba([120, 140, 90, 255]));
//!
//! let augmentor = Augmentor::new(AugmentationParams::new())
//!     .harshness(60)
//!     .light_aging(40)
//!     .dirtiness(30);
//!
//! let batch = augmentor.generate(&source, 5, 42).unwrap();
//!
//! assert_eq!(batch.len(), 5);
//! assert!(batch[0].file_name.starts_with("aug_"));
//! ```
//!
//! # Pipeline
//!
//! Every sample is processed independently, in a fixed stage order:
//!
//! ```text
//! SourceImage (immutable, caller-owned)
//!     |
//!     v
//! geometric      randomized affine warp into a fresh work buffer
//!     |          (sample index 0 keeps rotation at exactly zero)
//!     v
//! photometric    gamma / contrast / brightness / channel gains
//!     |
//!     v
//! noise          salt-and-pepper corruption, density <= 2%
//!     |
//!     v
//! overlay        gated fog -> rain -> glare compositing
//!     |
//!     v
//! artifact       translucent dirt / lens marks
//!     |
//!     v
//! encode         JPEG at a per-sample quality in [50, 90]
//!     |
//!     v
//! GeneratedSample { index, bytes, file_name }
//! ```
//!
//! # Intensity knobs
//!
//! Three percentages in `[0, 100]` scale the randomized stages
//! ([`AugmentationParams`]): **harshness** drives noise density and the
//! fog/rain gates, **light_aging** drives photometric magnitude and the
//! glare gate, **dirtiness** drives artifact-mark density. Out-of-range
//! values are clamped, never rejected.
//!
//! # Determinism
//!
//! `generate()` threads an explicit seed; each sample's stream is derived
//! from `(seed, index)` via [`api::sample_rng`], so batches are reproducible
//! and per-sample pipelines can run on parallel workers without sharing RNG
//! state. No randomness persists between engine calls.
//!
//! # Concurrency
//!
//! The engine layer is synchronous and pure per sample: it reads the shared
//! source, owns one work buffer per in-flight sample, and shares no mutable
//! state. Batch-level parallelism, cancellation, and partial-result
//! semantics belong to the hosting driver, not to this crate.

pub mod api;
pub mod encode;
pub mod params;
pub mod stage;


pub use api::{AugmentError, Augmentor, StageError};
pub use encode::GeneratedSample;
pub use params::AugmentationParams;
