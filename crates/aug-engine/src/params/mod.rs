//! Intensity parameters for the augmentation pipeline.
//!
//! This module provides the [`AugmentationParams`] struct: the three bounded
//! knobs that scale stage probabilities and magnitudes downstream.

mod params;

pub use params::AugmentationParams;
