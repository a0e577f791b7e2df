//! Environmental overlay stage: probabilistic fog, rain, and glare.
//!
//! Three independent compositing passes stacked in a fixed order. Each pass
//! is gated by a knob threshold ANDed with its own coin flip, so any subset
//! of the three can land on a given sample. Gate outcomes and scalar draws
//! are reified in [`OverlayDraws`] so the gating properties are testable
//! without touching pixels; streak and mark geometry is drawn during
//! application.

use image::RgbaImage;
use rand::Rng;

use crate::params::AugmentationParams;
use crate::stage::blend_over;

/// Fog requires harshness strictly above this threshold.
pub const FOG_THRESHOLD: u8 = 50;
/// Coin-flip probability for fog once over the threshold.
pub const FOG_CHANCE: f64 = 0.5;
/// Fog opacity at the bottom row relative to the drawn peak opacity.
pub const FOG_FLOOR_FRAC: f32 = 0.2;
const FOG_COLOR: [u8; 3] = [255, 255, 255];

/// Rain requires harshness strictly above this threshold.
pub const RAIN_THRESHOLD: u8 = 70;
/// Coin-flip probability for rain once over the threshold.
pub const RAIN_CHANCE: f64 = 0.6;
/// Opacity of each rain streak.
pub const RAIN_ALPHA: f32 = 0.2;
/// Horizontal drift per vertical pixel; streaks slant toward the bottom.
const RAIN_SLANT: f32 = 0.35;
const RAIN_COLOR: [u8; 3] = [180, 190, 210];

/// Glare requires light_aging strictly above this threshold.
pub const GLARE_THRESHOLD: u8 = 60;
/// Coin-flip probability for glare once over the threshold.
pub const GLARE_CHANCE: f64 = 0.7;
/// Additive weight of the glare color at the gradient center.
pub const GLARE_PEAK: f32 = 0.4;
const GLARE_COLOR: [u8; 3] = [255, 240, 200];

/// Draws for the glare pass: a radial gradient placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlareDraws {
    /// Gradient center, x.
    pub center_x: f32,
    /// Gradient center, y.
    pub center_y: f32,
    /// Gradient radius in pixels, up to the full frame width.
    pub radius: f32,
}

/// Gate outcomes and scalar draws for one sample's overlay passes.
///
/// `None` means the pass did not fire for this sample, either because the
/// knob sat at or below its threshold (probability 0, no coin flipped) or
/// because the coin flip failed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayDraws {
    /// Peak fog opacity in `[0, harshness/200)`.
    pub fog: Option<f32>,
    /// Number of rain streaks in `[100, 300)`.
    pub rain: Option<u32>,
    /// Glare gradient placement.
    pub glare: Option<GlareDraws>,
}

impl OverlayDraws {
    /// Draw the gate outcomes and scalar parameters for one sample.
    pub fn sample<R: Rng + ?Sized>(
        rng: &mut R,
        params: &AugmentationParams,
        width: u32,
        height: u32,
    ) -> Self {
        let fog = if params.harshness > FOG_THRESHOLD && rng.gen_bool(FOG_CHANCE) {
            Some(rng.gen_range(0.0..f32::from(params.harshness) / 200.0))
        } else {
            None
        };

        let rain = if params.harshness > RAIN_THRESHOLD && rng.gen_bool(RAIN_CHANCE) {
            Some(rng.gen_range(100..300))
        } else {
            None
        };

        let glare = if params.light_aging > GLARE_THRESHOLD && rng.gen_bool(GLARE_CHANCE) {
            Some(GlareDraws {
                center_x: rng.gen_range(0.0..width as f32),
                center_y: rng.gen_range(0.0..height as f32),
                radius: rng.gen_range(0.0..width as f32),
            })
        } else {
            None
        };

        Self { fog, rain, glare }
    }

    /// Draws with every pass gated off.
    pub fn none() -> Self {
        Self {
            fog: None,
            rain: None,
            glare: None,
        }
    }

    /// Whether any pass fired.
    pub fn any(&self) -> bool {
        self.fog.is_some() || self.rain.is_some() || self.glare.is_some()
    }
}

/// Composite the gated overlay passes over the buffer, in fog, rain, glare
/// order. Streak positions and lengths are drawn from `rng` here.
pub fn apply<R: Rng + ?Sized>(buffer: &mut RgbaImage, draws: &OverlayDraws, rng: &mut R) {
    if let Some(opacity) = draws.fog {
        apply_fog(buffer, opacity);
    }
    if let Some(streaks) = draws.rain {
        apply_rain(buffer, streaks, rng);
    }
    if let Some(glare) = draws.glare {
        apply_glare(buffer, &glare);
    }
}

/// Top-to-bottom white gradient, fading to [`FOG_FLOOR_FRAC`] of the peak
/// opacity at the bottom row.
fn apply_fog(buffer: &mut RgbaImage, opacity: f32) {
    let (width, height) = buffer.dimensions();
    for y in 0..height {
        let depth = if height > 1 {
            y as f32 / (height - 1) as f32
        } else {
            0.0
        };
        let row_opacity = opacity * (1.0 - (1.0 - FOG_FLOOR_FRAC) * depth);
        for x in 0..width {
            blend_over(buffer.get_pixel_mut(x, y), FOG_COLOR, row_opacity);
        }
    }
}

/// Short translucent streaks at uniform random positions, slanted toward
/// the bottom of the frame. Segments running off the edge are clipped.
fn apply_rain<R: Rng + ?Sized>(buffer: &mut RgbaImage, streaks: u32, rng: &mut R) {
    let (width, height) = buffer.dimensions();
    for _ in 0..streaks {
        let start_x = rng.gen_range(0.0..width as f32);
        let start_y = rng.gen_range(0.0..height as f32);
        let length = rng.gen_range(10.0..30.0f32);

        let steps = length.ceil() as u32;
        for step in 0..steps {
            let t = step as f32;
            let x = start_x + t * RAIN_SLANT;
            let y = start_y + t;
            if x < 0.0 || y < 0.0 || x >= width as f32 || y >= height as f32 {
                break;
            }
            blend_over(buffer.get_pixel_mut(x as u32, y as u32), RAIN_COLOR, RAIN_ALPHA);
        }
    }
}

/// Additive radial warm-white gradient, [`GLARE_PEAK`] weight at the center
/// fading linearly to zero at the drawn radius.
fn apply_glare(buffer: &mut RgbaImage, draws: &GlareDraws) {
    if draws.radius <= f32::EPSILON {
        return;
    }
    let (width, height) = buffer.dimensions();

    let min_x = (draws.center_x - draws.radius).floor().max(0.0) as u32;
    let max_x = ((draws.center_x + draws.radius).ceil() as u32).min(width.saturating_sub(1));
    let min_y = (draws.center_y - draws.radius).floor().max(0.0) as u32;
    let max_y = ((draws.center_y + draws.radius).ceil() as u32).min(height.saturating_sub(1));

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let dx = x as f32 - draws.center_x;
            let dy = y as f32 - draws.center_y;
            let distance = (dx * dx + dy * dy).sqrt();
            if distance >= draws.radius {
                continue;
            }
            let weight = GLARE_PEAK * (1.0 - distance / draws.radius);
            let pixel = buffer.get_pixel_mut(x, y);
            for (channel, &c) in GLARE_COLOR.iter().enumerate() {
                let lit = f32::from(pixel[channel]) + f32::from(c) * weight;
                pixel[channel] = lit.min(255.0).round() as u8;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn dark_frame(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba([30, 30, 30, 255]))
    }

    #[test]
    fn test_zero_params_never_gate_in() {
        let mut rng = StdRng::seed_from_u64(17);
        let params = AugmentationParams::new();
        for _ in 0..500 {
            let draws = OverlayDraws::sample(&mut rng, &params, 100, 100);
            assert!(!draws.any(), "no overlay may fire at zero params");
        }
    }

    #[test]
    fn test_threshold_boundaries_are_strict() {
        let mut rng = StdRng::seed_from_u64(23);
        // Exactly at each threshold the gate must stay closed.
        let params = AugmentationParams::new()
            .harshness(FOG_THRESHOLD)
            .light_aging(GLARE_THRESHOLD);
        for _ in 0..500 {
            let draws = OverlayDraws::sample(&mut rng, &params, 64, 64);
            assert!(draws.fog.is_none());
            assert!(draws.rain.is_none());
            assert!(draws.glare.is_none());
        }
    }

    #[test]
    fn test_trigger_rates_at_full_knobs() {
        let mut rng = StdRng::seed_from_u64(31);
        let params = AugmentationParams::new().harshness(100).light_aging(100);
        let trials = 4000;

        let mut fog = 0usize;
        let mut rain = 0usize;
        let mut glare = 0usize;
        for _ in 0..trials {
            let draws = OverlayDraws::sample(&mut rng, &params, 64, 64);
            fog += usize::from(draws.fog.is_some());
            rain += usize::from(draws.rain.is_some());
            glare += usize::from(draws.glare.is_some());
        }

        let rate = |n: usize| n as f64 / trials as f64;
        assert!(
            (rate(fog) - FOG_CHANCE).abs() < 0.04,
            "fog rate {:.3} far from {}",
            rate(fog),
            FOG_CHANCE
        );
        assert!(
            (rate(rain) - RAIN_CHANCE).abs() < 0.04,
            "rain rate {:.3} far from {}",
            rate(rain),
            RAIN_CHANCE
        );
        assert!(
            (rate(glare) - GLARE_CHANCE).abs() < 0.04,
            "glare rate {:.3} far from {}",
            rate(glare),
            GLARE_CHANCE
        );
    }

    #[test]
    fn test_fog_opacity_range() {
        let mut rng = StdRng::seed_from_u64(41);
        let params = AugmentationParams::new().harshness(80);
        let mut fired = 0;
        for _ in 0..500 {
            if let Some(opacity) = OverlayDraws::sample(&mut rng, &params, 64, 64).fog {
                assert!((0.0..0.4).contains(&opacity), "opacity {} out of range", opacity);
                fired += 1;
            }
        }
        assert!(fired > 0, "fog should fire sometimes at harshness 80");
    }

    #[test]
    fn test_fog_gradient_fades_downward() {
        let mut buffer = dark_frame(16, 64);
        apply_fog(&mut buffer, 0.5);

        let top = buffer.get_pixel(8, 0)[0];
        let bottom = buffer.get_pixel(8, 63)[0];
        assert!(
            top > bottom,
            "fog must be denser at the top: top={} bottom={}",
            top,
            bottom
        );
        // Bottom row keeps 20% of the peak opacity: 30 + (255-30)*0.1 = 52.5
        assert!((51..=54).contains(&bottom), "bottom row was {}", bottom);
    }

    #[test]
    fn test_rain_brightens_some_pixels_only() {
        let mut buffer = dark_frame(100, 100);
        let mut rng = StdRng::seed_from_u64(5);
        apply_rain(&mut buffer, 150, &mut rng);

        let touched = buffer.pixels().filter(|p| p.0[0] > 30).count();
        assert!(touched > 100, "rain should mark many pixels, got {}", touched);
        assert!(
            touched < 100 * 100 / 2,
            "rain must not flood the frame, touched {}",
            touched
        );
    }

    #[test]
    fn test_glare_peaks_at_center_and_spares_the_far_edge() {
        let mut buffer = dark_frame(64, 64);
        let draws = GlareDraws {
            center_x: 16.0,
            center_y: 16.0,
            radius: 20.0,
        };
        apply_glare(&mut buffer, &draws);

        let center = buffer.get_pixel(16, 16)[0];
        let inside = buffer.get_pixel(26, 16)[0];
        let outside = buffer.get_pixel(60, 60)[0];
        assert!(center > inside, "glare fades with distance");
        assert_eq!(outside, 30, "pixels beyond the radius are untouched");
    }

    #[test]
    fn test_apply_respects_gates() {
        let mut buffer = dark_frame(32, 32);
        let original = buffer.clone();
        let mut rng = StdRng::seed_from_u64(2);

        apply(&mut buffer, &OverlayDraws::none(), &mut rng);
        assert_eq!(buffer, original, "no gated pass, no pixel change");
    }
}
