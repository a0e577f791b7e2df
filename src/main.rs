use anyhow::Context;
use clap::Parser;
use rand::Rng;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use aug_engine::AugmentationParams;
use patina::models::JobConfig;
use patina::services::{self, BatchDriver, CancelFlag};

#[derive(Parser)]
#[command(name = "patina")]
#[command(about = "Generate synthetically weathered variants of a source image for training-set augmentation")]
struct Cli {
    /// Source image (any format the image crate can decode)
    input: PathBuf,

    /// Output directory for the generated samples
    #[arg(short, long, default_value = "augmented")]
    out_dir: PathBuf,

    /// Number of samples to generate
    #[arg(short = 'n', long)]
    count: Option<usize>,

    /// Harshness knob [0-100]: noise density and fog/rain intensity
    #[arg(long)]
    harshness: Option<u8>,

    /// Light-aging knob [0-100]: photometric distortion and glare
    #[arg(long)]
    light_aging: Option<u8>,

    /// Dirtiness knob [0-100]: dirt and lens-artifact density
    #[arg(long)]
    dirtiness: Option<u8>,

    /// RNG seed; a random one is drawn and logged when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum samples processed concurrently
    #[arg(long)]
    jobs: Option<usize>,

    /// YAML job file supplying defaults for the options above
    #[arg(long)]
    job: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "patina=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // A job file provides defaults; explicit flags win over it.
    let base = match &cli.job {
        Some(path) => JobConfig::load(path)?,
        None => JobConfig::default(),
    };

    let count = cli.count.unwrap_or(base.count);
    let jobs = cli.jobs.unwrap_or(base.jobs);
    let seed = cli
        .seed
        .or(base.seed)
        .unwrap_or_else(|| rand::thread_rng().gen());
    let params = AugmentationParams::new()
        .harshness(cli.harshness.unwrap_or(base.harshness))
        .light_aging(cli.light_aging.unwrap_or(base.light_aging))
        .dirtiness(cli.dirtiness.unwrap_or(base.dirtiness));

    let source = image::open(&cli.input)
        .with_context(|| format!("failed to decode {}", cli.input.display()))?
        .to_rgba8();

    tracing::info!(
        input = %cli.input.display(),
        width = source.width(),
        height = source.height(),
        count,
        seed,
        jobs,
        harshness = params.harshness,
        light_aging = params.light_aging,
        dirtiness = params.dirtiness,
        "Starting augmentation batch"
    );

    let cancel = CancelFlag::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing in-flight samples");
            interrupt.cancel();
        }
    });

    let driver = BatchDriver::new(params, jobs);
    let outcome = driver.run(Arc::new(source), count, seed, &cancel).await?;

    let paths = services::write_samples(&outcome.samples, &cli.out_dir)?;
    tracing::info!(
        written = paths.len(),
        out_dir = %cli.out_dir.display(),
        cancelled = outcome.cancelled,
        "Batch finished"
    );

    Ok(())
}
