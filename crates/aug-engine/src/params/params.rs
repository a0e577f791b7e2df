//! The three intensity knobs controlling the augmentation pipeline.

/// Upper bound for every knob; values above are clamped, never rejected.
pub const MAX_PERCENT: u8 = 100;

/// Intensity parameters for one batch of augmented samples.
///
/// Each knob is a percentage in `[0, 100]`:
///
/// - `harshness` drives salt-and-pepper noise density and the probability
///   and strength of the fog/rain overlays,
/// - `light_aging` drives photometric distortion magnitude and the glare
///   overlay probability,
/// - `dirtiness` drives the density of dirt/lens-artifact marks.
///
/// The knobs are soft controls: out-of-range values are clamped silently by
/// every constructor and setter (and once more by the consuming
/// [`Augmentor`](crate::Augmentor)), so there is no invalid-params error.
///
/// # Example
///
/// ```
/// use aug_engine::AugmentationParams;
///
/// // Defaults are all-zero (no weathering beyond geometric jitter)
/// let params = AugmentationParams::new();
/// assert_eq!(params.harshness, 0);
///
/// // Builder pattern, clamped to 100
/// let params = AugmentationParams::new()
///     .harshness(60)
///     .light_aging(255)
///     .dirtiness(30);
/// assert_eq!(params.light_aging, 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AugmentationParams {
    /// Noise density and environmental-overlay intensity, `[0, 100]`.
    pub harshness: u8,

    /// Photometric distortion magnitude and glare probability, `[0, 100]`.
    pub light_aging: u8,

    /// Artifact-mark density, `[0, 100]`.
    pub dirtiness: u8,
}

impl AugmentationParams {
    /// Create parameters with all knobs at zero.
    ///
    /// This is equivalent to `AugmentationParams::default()` but more
    /// discoverable.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the harshness knob, clamped to `[0, 100]`.
    #[inline]
    pub fn harshness(mut self, pct: u8) -> Self {
        self.harshness = pct.min(MAX_PERCENT);
        self
    }

    /// Set the light-aging knob, clamped to `[0, 100]`.
    #[inline]
    pub fn light_aging(mut self, pct: u8) -> Self {
        self.light_aging = pct.min(MAX_PERCENT);
        self
    }

    /// Set the dirtiness knob, clamped to `[0, 100]`.
    #[inline]
    pub fn dirtiness(mut self, pct: u8) -> Self {
        self.dirtiness = pct.min(MAX_PERCENT);
        self
    }

    /// Return a copy with every knob clamped to `[0, 100]`.
    ///
    /// Fields are public, so a caller can bypass the setters; the orchestrator
    /// normalizes through this before a batch starts.
    #[inline]
    pub fn clamped(self) -> Self {
        Self {
            harshness: self.harshness.min(MAX_PERCENT),
            light_aging: self.light_aging.min(MAX_PERCENT),
            dirtiness: self.dirtiness.min(MAX_PERCENT),
        }
    }

    /// Harshness as a unit fraction in `[0.0, 1.0]`.
    #[inline]
    pub fn harshness_unit(&self) -> f32 {
        f32::from(self.harshness.min(MAX_PERCENT)) / 100.0
    }

    /// Light-aging as a unit fraction in `[0.0, 1.0]`.
    #[inline]
    pub fn light_aging_unit(&self) -> f32 {
        f32::from(self.light_aging.min(MAX_PERCENT)) / 100.0
    }

    /// Dirtiness as a unit fraction in `[0.0, 1.0]`.
    #[inline]
    pub fn dirtiness_unit(&self) -> f32 {
        f32::from(self.dirtiness.min(MAX_PERCENT)) / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_values() {
        let params = AugmentationParams::default();
        assert_eq!(params.harshness, 0, "harshness should default to 0");
        assert_eq!(params.light_aging, 0, "light_aging should default to 0");
        assert_eq!(params.dirtiness, 0, "dirtiness should default to 0");
    }

    #[test]
    fn test_new_equals_default() {
        assert_eq!(AugmentationParams::new(), AugmentationParams::default());
    }

    #[test]
    fn test_builder_chaining() {
        let params = AugmentationParams::new()
            .harshness(60)
            .light_aging(40)
            .dirtiness(30);

        assert_eq!(params.harshness, 60);
        assert_eq!(params.light_aging, 40);
        assert_eq!(params.dirtiness, 30);
    }

    #[test]
    fn test_setters_clamp() {
        let params = AugmentationParams::new()
            .harshness(101)
            .light_aging(200)
            .dirtiness(255);

        assert_eq!(params.harshness, 100);
        assert_eq!(params.light_aging, 100);
        assert_eq!(params.dirtiness, 100);
    }

    #[test]
    fn test_clamped_normalizes_direct_field_writes() {
        let params = AugmentationParams {
            harshness: 250,
            light_aging: 100,
            dirtiness: 7,
        };
        let clamped = params.clamped();

        assert_eq!(clamped.harshness, 100);
        assert_eq!(clamped.light_aging, 100);
        assert_eq!(clamped.dirtiness, 7);
    }

    #[test]
    fn test_unit_fractions() {
        let params = AugmentationParams::new()
            .harshness(50)
            .light_aging(100)
            .dirtiness(0);

        assert!((params.harshness_unit() - 0.5).abs() < f32::EPSILON);
        assert!((params.light_aging_unit() - 1.0).abs() < f32::EPSILON);
        assert!(params.dirtiness_unit().abs() < f32::EPSILON);
    }

    #[test]
    fn test_unit_fractions_clamp_unclamped_fields() {
        let params = AugmentationParams {
            harshness: 200,
            light_aging: 0,
            dirtiness: 0,
        };
        assert!((params.harshness_unit() - 1.0).abs() < f32::EPSILON);
    }
}
