use std::path::{Path, PathBuf};

use aug_engine::GeneratedSample;

use crate::error::DriverError;

/// Write a batch's samples into `dir`, creating it if needed.
///
/// File names come from the samples themselves (`aug_<timestamp>_<index>.jpg`,
/// unique within a batch). Returns the written paths in batch order. Archive
/// packaging of the directory is the consumer's concern, not ours.
pub fn write_samples(samples: &[GeneratedSample], dir: &Path) -> Result<Vec<PathBuf>, DriverError> {
    std::fs::create_dir_all(dir).map_err(|source| DriverError::WriteSample {
        file_name: dir.display().to_string(),
        source,
    })?;

    let mut paths = Vec::with_capacity(samples.len());
    for sample in samples {
        let path = dir.join(&sample.file_name);
        std::fs::write(&path, &sample.bytes).map_err(|source| DriverError::WriteSample {
            file_name: sample.file_name.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), bytes = sample.bytes.len(), "Wrote sample");
        paths.push(path);
    }
    Ok(paths)
}
