//! Geometric transform stage: randomized affine distortion of the source.
//!
//! Paints the immutable source into a fresh work buffer through one composed
//! projective transform (scale, shear, optional horizontal flip, rotation,
//! translation about the frame center). Frame pixels the warped source does
//! not cover keep the explicit fully transparent background fill.

use image::{Rgba, RgbaImage};
use imageproc::geometric_transformations::{warp, Interpolation, Projection};
use rand::Rng;

use crate::api::StageError;

/// Rotation is drawn uniformly from this range, in degrees.
pub const MAX_ROTATION_DEG: f32 = 20.0;

/// Scale is drawn uniformly from `[1 - SCALE_SPAN, 1 + SCALE_SPAN]`.
pub const SCALE_SPAN: f32 = 0.15;

/// Shear factors are drawn uniformly from `[-MAX_SKEW, MAX_SKEW]` radians.
pub const MAX_SKEW: f32 = 0.1;

/// Translation is drawn up to this fraction of the frame dimension per axis.
pub const MAX_TRANSLATE_FRAC: f32 = 0.15;

/// Per-sample draws for the geometric stage.
///
/// Sampling and application are separate so the rotation policy (the anchor
/// sample at batch index 0 keeps rotation at exactly zero) and the draw
/// ranges can be asserted without warping pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometricDraws {
    /// Rotation in radians. Zero for the anchor sample.
    pub rotation: f32,
    /// Uniform scale factor.
    pub scale: f32,
    /// Horizontal shear factor.
    pub skew_x: f32,
    /// Vertical shear factor.
    pub skew_y: f32,
    /// Horizontal translation in pixels.
    pub tx: f32,
    /// Vertical translation in pixels.
    pub ty: f32,
    /// Mirror the frame horizontally.
    pub flip_horizontal: bool,
}

impl GeometricDraws {
    /// Draw the stage parameters for one sample.
    ///
    /// `anchor_sample` is true for batch index 0 only: that sample keeps a
    /// rotation of exactly 0 so every batch contains one orientation-true
    /// variant, while all other draws still apply.
    pub fn sample<R: Rng + ?Sized>(
        rng: &mut R,
        width: u32,
        height: u32,
        anchor_sample: bool,
    ) -> Self {
        let rotation = if anchor_sample {
            0.0
        } else {
            rng.gen_range(-MAX_ROTATION_DEG..=MAX_ROTATION_DEG).to_radians()
        };

        let max_tx = MAX_TRANSLATE_FRAC * width as f32;
        let max_ty = MAX_TRANSLATE_FRAC * height as f32;

        Self {
            rotation,
            scale: rng.gen_range(1.0 - SCALE_SPAN..=1.0 + SCALE_SPAN),
            skew_x: rng.gen_range(-MAX_SKEW..=MAX_SKEW),
            skew_y: rng.gen_range(-MAX_SKEW..=MAX_SKEW),
            tx: rng.gen_range(-max_tx..=max_tx),
            ty: rng.gen_range(-max_ty..=max_ty),
            flip_horizontal: rng.gen_bool(0.5),
        }
    }

    /// The combined scale/shear/flip matrix, row-major.
    fn linear_matrix(&self) -> [f32; 9] {
        let flip = if self.flip_horizontal { -1.0 } else { 1.0 };
        [
            self.scale * flip,
            self.skew_x,
            0.0,
            self.skew_y,
            self.scale,
            0.0,
            0.0,
            0.0,
            1.0,
        ]
    }
}

/// Warp the source into a fresh work buffer using the given draws.
///
/// The transform is composed center-out: move the frame center to the
/// origin, apply scale/shear/flip, rotate, then move back to the center plus
/// the drawn offset. Output dimensions always equal the source's.
pub fn apply(source: &RgbaImage, draws: &GeometricDraws) -> Result<RgbaImage, StageError> {
    let (width, height) = source.dimensions();
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;

    // The drawn ranges keep the determinant well away from zero, but a
    // non-invertible matrix must surface as an error, not a panic.
    let linear =
        Projection::from_matrix(draws.linear_matrix()).ok_or(StageError::SingularTransform)?;

    let projection = Projection::translate(-center_x, -center_y)
        .and_then(linear)
        .and_then(Projection::rotate(draws.rotation))
        .and_then(Projection::translate(center_x + draws.tx, center_y + draws.ty));

    Ok(warp(
        source,
        &projection,
        Interpolation::Bilinear,
        Rgba([0, 0, 0, 0]),
    ))
}
