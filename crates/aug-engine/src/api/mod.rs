//! Public API for the aug-engine crate.
//!
//! This module provides the high-level API: the [`Augmentor`] builder, the
//! per-sample stream derivation used by parallel drivers, and the
//! [`AugmentError`] / [`StageError`] taxonomy.

mod augmentor;
mod error;

pub use augmentor::{batch_stamp_millis, sample_rng, Augmentor};
pub use error::{AugmentError, StageError};
