//! Color post-processing applied once per shaded pixel.

use glam::Vec3A;

use crate::config::PostConfig;

/// Display gamma exponent, approximately 1 / 2.2.
pub const DEFAULT_GAMMA: f32 = 0.4545;

/// Rec. 709 luma weights.
const LUMA: Vec3A = Vec3A::new(0.2126, 0.7152, 0.0722);

/// Per-channel `color^gamma_factor`.
///
/// Expects linear, non-negative channels.
pub fn gamma_correction(color: Vec3A, gamma_factor: f32) -> Vec3A {
    color.powf(gamma_factor)
}

/// Default grading: plain gamma correction with [`DEFAULT_GAMMA`].
pub fn color_correction(color: Vec3A) -> Vec3A {
    color_correction_with(color, &PostConfig::default())
}

/// Exposure, contrast around mid grey, saturation, then gamma.
///
/// Channels are clamped at zero before the gamma curve; no upper clamp is
/// applied.
pub fn color_correction_with(color: Vec3A, config: &PostConfig) -> Vec3A {
    let exposed = color * config.exposure;
    let contrasted = (exposed - Vec3A::splat(0.5)) * config.contrast + Vec3A::splat(0.5);
    let luma = contrasted.dot(LUMA);
    let saturated = Vec3A::splat(luma) + (contrasted - Vec3A::splat(luma)) * config.saturation;
    gamma_correction(saturated.max(Vec3A::ZERO), config.gamma)
}
