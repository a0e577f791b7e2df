use aug_engine::AugmentationParams;
use serde::Deserialize;
use std::path::Path;

/// Job description loaded from a YAML file.
///
/// Every field is optional in the file; CLI flags override whatever the job
/// file provides, and anything still unset falls back to these defaults.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct JobConfig {
    /// Harshness knob percentage, clamped by the engine.
    #[serde(default)]
    pub harshness: u8,

    /// Light-aging knob percentage, clamped by the engine.
    #[serde(default)]
    pub light_aging: u8,

    /// Dirtiness knob percentage, clamped by the engine.
    #[serde(default)]
    pub dirtiness: u8,

    /// Number of samples to generate.
    #[serde(default = "default_count")]
    pub count: usize,

    /// Fixed RNG seed; omit for a fresh random seed per run.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Maximum samples processed concurrently.
    #[serde(default = "default_jobs")]
    pub jobs: usize,
}

fn default_count() -> usize {
    10
}

fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

impl JobConfig {
    /// Load a job file, failing loudly: unlike built-in defaults, a job file
    /// the user pointed at must parse.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        tracing::info!(
            path = %path.display(),
            count = config.count,
            jobs = config.jobs,
            "Loaded job file"
        );
        Ok(config)
    }

    /// The engine parameter set described by this job.
    pub fn params(&self) -> AugmentationParams {
        AugmentationParams::new()
            .harshness(self.harshness)
            .light_aging(self.light_aging)
            .dirtiness(self.dirtiness)
    }
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            harshness: 0,
            light_aging: 0,
            dirtiness: 0,
            count: default_count(),
            seed: None,
            jobs: default_jobs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = JobConfig::default();

        assert_eq!(config.harshness, 0);
        assert_eq!(config.light_aging, 0);
        assert_eq!(config.dirtiness, 0);
        assert_eq!(config.count, 10);
        assert_eq!(config.seed, None);
        assert!(config.jobs >= 1);
    }

    #[test]
    fn test_parse_partial_yaml_fills_defaults() {
        let config: JobConfig = serde_yaml::from_str("harshness: 60\ncount: 25\n").unwrap();

        assert_eq!(config.harshness, 60);
        assert_eq!(config.count, 25);
        assert_eq!(config.light_aging, 0);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_parse_full_yaml() {
        let yaml = "harshness: 80\nlight_aging: 40\ndirtiness: 30\ncount: 5\nseed: 42\njobs: 2\n";
        let config: JobConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.seed, Some(42));
        assert_eq!(config.jobs, 2);
        assert_eq!(
            config.params(),
            AugmentationParams::new()
                .harshness(80)
                .light_aging(40)
                .dirtiness(30)
        );
    }

    #[test]
    fn test_params_clamps_oversized_knobs() {
        let config: JobConfig = serde_yaml::from_str("harshness: 255\n").unwrap();
        assert_eq!(config.params().harshness, 100);
    }
}
