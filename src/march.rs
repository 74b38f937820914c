//! Sphere marching against a height field.
//!
//! The vertical gap `position.y - height(position.xz)` stands in for the
//! distance to the surface. It is not a lower bound on the true distance, so
//! every step is damped by `step_factor` to keep the march from tunnelling
//! through steep slopes.

use glam::{Vec2, Vec3A};

use crate::config::{MarchConfig, MAX_T};
use crate::ray::Ray;
use crate::terrain::HeightField;

/// Result of marching a ray: either a surface hit or the canonical miss.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayStep {
    /// Distance travelled along the ray, -1 when unmarched or missed
    pub t: f32,
    /// Sample position, origin + direction * t
    pub position: Vec3A,
    /// Unit surface normal on hit, zero otherwise
    pub normal: Vec3A,
    /// Auxiliary data: (steps used / max_steps, t / max_t, surface height / max height)
    pub metadata: Vec3A,
    /// Heightfield distance at the last sample
    pub distance: f32,
    /// Whether the surface was reached
    pub hit: bool,
}

impl RayStep {
    /// The canonical miss value.
    pub const fn miss() -> Self {
        Self {
            t: -1.0,
            position: Vec3A::ZERO,
            normal: Vec3A::ZERO,
            metadata: Vec3A::ZERO,
            distance: MAX_T,
            hit: false,
        }
    }
}

impl Default for RayStep {
    fn default() -> Self {
        Self::miss()
    }
}

/// How a march ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarchOutcome {
    /// Surface reached within tolerance
    Hit,
    /// Ray starts above the field's ceiling and never descends
    Escaped,
    /// `t` moved past `max_t`
    LeftRange,
    /// `max_steps` samples were taken without a hit
    StepLimit,
    /// `t` stopped advancing, e.g. the ray starts below the surface
    Stalled,
}

/// Bookkeeping from a single march.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarchStats {
    /// Number of height samples taken by the loop
    pub steps: u32,
    pub outcome: MarchOutcome,
}

/// Hit tolerance at distance `t`.
///
/// Grows linearly with distance so that the tolerance stays roughly one pixel
/// wide on screen, never dropping below `min_threshold`.
#[inline]
pub fn threshold_from(t: f32, config: &MarchConfig) -> f32 {
    (t * config.threshold_scale).max(config.min_threshold)
}

#[inline]
fn ground(p: Vec3A) -> Vec2 {
    Vec2::new(p.x, p.z)
}

/// Take a single sample at distance `t`. The normal is left at zero.
pub fn march<H: HeightField + ?Sized>(ray: &Ray, t: f32, field: &H, config: &MarchConfig) -> RayStep {
    let position = ray.at(t);
    let distance = position.y - field.height(ground(position));
    RayStep {
        t,
        position,
        normal: Vec3A::ZERO,
        metadata: Vec3A::ZERO,
        distance,
        hit: distance.abs() < threshold_from(t, config),
    }
}

/// March `ray` until it reaches the surface, leaves its range or runs out of
/// steps.
pub fn ray_march_terrain<H: HeightField + ?Sized>(ray: &Ray, field: &H, config: &MarchConfig) -> RayStep {
    ray_march_terrain_traced(ray, field, config).0
}

/// Like [`ray_march_terrain`], also reporting how many samples were taken and
/// why the march stopped.
pub fn ray_march_terrain_traced<H: HeightField + ?Sized>(
    ray: &Ray,
    field: &H,
    config: &MarchConfig,
) -> (RayStep, MarchStats) {
    let ceiling = field.max_height();
    if ray.origin.y > ceiling && ray.direction.y >= 0.0 {
        return (RayStep::miss(), MarchStats { steps: 0, outcome: MarchOutcome::Escaped });
    }

    let range = ray.range();
    let mut t = range.min;
    for step in 0..config.max_steps {
        let mut sample = march(ray, t, field, config);
        if sample.hit {
            let xz = ground(sample.position);
            sample.normal = field.normal(xz, config.normal_epsilon);
            sample.metadata = Vec3A::new(
                (step + 1) as f32 / config.max_steps as f32,
                t / range.max,
                (sample.position.y - sample.distance) / ceiling,
            );
            return (sample, MarchStats { steps: step + 1, outcome: MarchOutcome::Hit });
        }

        let next = (t + sample.distance * config.step_factor).max(range.min);
        if next == t {
            // the next sample would repeat this one
            return (RayStep::miss(), MarchStats { steps: step + 1, outcome: MarchOutcome::Stalled });
        }
        t = next;
        if !range.contains(t) {
            return (RayStep::miss(), MarchStats { steps: step + 1, outcome: MarchOutcome::LeftRange });
        }
    }

    (RayStep::miss(), MarchStats { steps: config.max_steps, outcome: MarchOutcome::StepLimit })
}
