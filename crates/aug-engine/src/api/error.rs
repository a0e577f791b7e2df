//! Error types for the augmentation engine.
//!
//! [`AugmentError`] is the unified public error for `?` propagation in
//! application code; [`StageError`] covers the failures an individual
//! pipeline stage can surface.

use thiserror::Error;

/// A failure inside one sample's stage pipeline.
///
/// Stages perform no disk or network I/O, so there are no transient
/// failures to retry; everything here is a programmer or resource error
/// surfaced directly to the caller.
#[derive(Debug, Error)]
pub enum StageError {
    /// The drawn geometric transform could not be inverted. The drawn
    /// parameter ranges keep the determinant well away from zero, so this
    /// indicates corrupted draws rather than bad luck.
    #[error("drawn geometric transform is not invertible")]
    SingularTransform,

    /// JPEG encoding of the finished work buffer failed.
    #[error("JPEG encode failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Unified error type for the engine's public API.
#[derive(Debug, Error)]
pub enum AugmentError {
    /// The source image has a zero dimension. Rejected before any stage
    /// runs and before any random draw is consumed.
    #[error("source image has empty dimensions: {width}x{height}")]
    InvalidInput {
        /// Source width in pixels.
        width: u32,
        /// Source height in pixels.
        height: u32,
    },

    /// A single sample's pipeline failed (per-sample entry point).
    #[error("sample generation failed: {0}")]
    Stage(#[from] StageError),

    /// A stage failed during a batch. The whole batch is aborted: samples
    /// generated before the failing index are discarded, and the caller may
    /// retry the entire batch.
    #[error("batch aborted at sample {failed_at_index}: {source}")]
    BatchGeneration {
        /// Index of the sample whose pipeline failed.
        failed_at_index: usize,
        /// The underlying stage failure.
        source: StageError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_invalid_input_display() {
        let error = AugmentError::InvalidInput {
            width: 0,
            height: 480,
        };
        assert_eq!(
            error.to_string(),
            "source image has empty dimensions: 0x480"
        );
    }

    #[test]
    fn test_batch_generation_display_carries_index() {
        let error = AugmentError::BatchGeneration {
            failed_at_index: 7,
            source: StageError::SingularTransform,
        };
        assert_eq!(
            error.to_string(),
            "batch aborted at sample 7: drawn geometric transform is not invertible"
        );
    }

    #[test]
    fn test_stage_error_converts_to_augment_error() {
        let error: AugmentError = StageError::SingularTransform.into();
        match error {
            AugmentError::Stage(StageError::SingularTransform) => {}
            other => panic!("expected Stage variant, got {:?}", other),
        }
    }
}
