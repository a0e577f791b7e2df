use thiserror::Error;

/// Errors surfaced by the batch driver layer.
///
/// The engine's own taxonomy (`AugmentError`) passes through unchanged;
/// the driver only adds the failure modes of running sample pipelines on
/// worker tasks and writing their output to disk.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("augmentation failed: {0}")]
    Engine(#[from] aug_engine::AugmentError),

    #[error("worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("failed to write sample {file_name}: {source}")]
    WriteSample {
        file_name: String,
        #[source]
        source: std::io::Error,
    },
}
