use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use aug_engine::{api, AugmentError, AugmentationParams, Augmentor, GeneratedSample};
use image::RgbaImage;
use tokio::task::JoinSet;

use crate::error::DriverError;

/// Shared cooperative cancellation flag for one batch run.
///
/// Cloning is cheap; any clone can cancel. Cancellation stops the driver
/// from launching further samples -- in-flight ones are drained, not killed.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of the batch this flag was handed to.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Result of one driver run.
#[derive(Debug)]
pub struct BatchOutcome {
    /// Completed samples, ordered by generation index.
    pub samples: Vec<GeneratedSample>,
    /// Whether the run was cut short by cancellation. Unlike the engine's
    /// all-or-nothing batch contract, a cancelled driver run keeps the
    /// samples that finished -- the deliberate escape hatch at this layer.
    pub cancelled: bool,
}

/// Parallel batch layer over the augmentation engine.
///
/// Each sample's pipeline is pure and independent, so the driver fans the
/// batch out to blocking worker tasks, capped at `jobs` in flight to bound
/// peak memory (each in-flight sample owns one width x height x 4 work
/// buffer). Awaiting task completion yields to the host runtime between
/// samples, keeping an interactive host responsive during large batches.
pub struct BatchDriver {
    augmentor: Arc<Augmentor>,
    max_in_flight: usize,
}

impl BatchDriver {
    /// Create a driver with an immutable parameter set and a worker cap.
    pub fn new(params: AugmentationParams, jobs: usize) -> Self {
        Self {
            augmentor: Arc::new(Augmentor::new(params)),
            max_in_flight: jobs.max(1),
        }
    }

    /// Generate up to `count` samples on the worker pool.
    ///
    /// Sample streams are derived from `(seed, index)` exactly as the
    /// engine's sequential orchestrator derives them, so for a fixed seed a
    /// driver run reproduces the engine's sample bytes regardless of worker
    /// interleaving (file names still carry the per-run batch timestamp).
    ///
    /// A stage failure aborts the whole batch and surfaces the engine's
    /// batch error. Cancellation instead returns the completed subset with
    /// `cancelled = true`.
    pub async fn run(
        &self,
        source: Arc<RgbaImage>,
        count: usize,
        seed: u64,
        cancel: &CancelFlag,
    ) -> Result<BatchOutcome, DriverError> {
        let (width, height) = source.dimensions();
        if width == 0 || height == 0 {
            return Err(AugmentError::InvalidInput { width, height }.into());
        }

        let batch_stamp = api::batch_stamp_millis();
        let mut in_flight: JoinSet<Result<GeneratedSample, (usize, AugmentError)>> =
            JoinSet::new();
        let mut samples = Vec::with_capacity(count);
        let mut next_index = 0usize;

        loop {
            let can_spawn = next_index < count && !cancel.is_cancelled();
            if can_spawn && in_flight.len() < self.max_in_flight {
                let augmentor = Arc::clone(&self.augmentor);
                let source = Arc::clone(&source);
                let index = next_index;
                next_index += 1;
                in_flight.spawn_blocking(move || {
                    let mut rng = api::sample_rng(seed, index);
                    augmentor
                        .augment_sample(&source, index, batch_stamp, &mut rng)
                        .map_err(|error| (index, error))
                });
                continue;
            }

            match in_flight.join_next().await {
                Some(joined) => match joined.map_err(DriverError::Join)? {
                    Ok(sample) => {
                        tracing::debug!(
                            index = sample.index,
                            bytes = sample.bytes.len(),
                            "Sample complete"
                        );
                        samples.push(sample);
                    }
                    Err((index, AugmentError::Stage(stage))) => {
                        return Err(AugmentError::BatchGeneration {
                            failed_at_index: index,
                            source: stage,
                        }
                        .into());
                    }
                    Err((_, error)) => return Err(error.into()),
                },
                None => break,
            }
        }

        samples.sort_by_key(|sample| sample.index);
        let cancelled = cancel.is_cancelled();
        if cancelled {
            tracing::info!(
                completed = samples.len(),
                requested = count,
                "Batch cancelled, returning completed samples"
            );
        }
        Ok(BatchOutcome { samples, cancelled })
    }
}
