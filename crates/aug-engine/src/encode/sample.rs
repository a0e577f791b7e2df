//! The immutable output unit of the augmentation pipeline.

/// One generated sample: encoded bytes plus batch metadata.
///
/// Samples are immutable once produced and are collected into an ordered
/// batch (`Vec<GeneratedSample>`, order = generation index). A sample is
/// never re-derived; more diversity means another engine call with fresh
/// draws.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSample {
    /// Position of this sample within its batch.
    pub index: usize,
    /// Lossy-encoded image bytes (JPEG).
    pub bytes: Vec<u8>,
    /// Unique-within-batch file name, `aug_<timestamp>_<index>.jpg`.
    pub file_name: String,
}
