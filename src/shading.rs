//! Minimal demonstration shading for the render host.
//!
//! Just enough lighting to make the marched surface readable, plus debug
//! views that visualise the march metadata directly. Colors are linear.

use glam::Vec3A;

use crate::march::{MarchStats, RayStep};
use crate::ray::Ray;

/// Linear RGB, as produced by [`shade`].
pub type Color = Vec3A;

/// What the host writes for each pixel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    /// Lit terrain over a sky gradient
    #[default]
    Shaded,
    /// Surface normals remapped to [0, 1]
    Normals,
    /// Travel distance, near is bright
    Depth,
    /// Loop iterations relative to the step budget
    Steps,
    /// Surface height relative to the terrain ceiling
    Height,
}

const SUN_DIRECTION: Vec3A = Vec3A::new(0.577_350_3, 0.577_350_3, 0.577_350_3);
const GRASS: Color = Vec3A::new(0.18, 0.30, 0.08);
const ROCK: Color = Vec3A::new(0.32, 0.28, 0.24);
const SNOW: Color = Vec3A::new(0.90, 0.92, 0.95);
const AMBIENT: f32 = 0.2;

/// Sky gradient by ray elevation: white at the horizon, blue overhead.
pub fn sky(direction: Vec3A) -> Color {
    let a = direction.y.clamp(0.0, 1.0);
    (1.0 - a) * Color::new(1.0, 1.0, 1.0) + a * Color::new(0.5, 0.7, 1.0)
}

/// Surface albedo from slope and relative height.
pub fn terrain_albedo(normal: Vec3A, relative_height: f32) -> Color {
    let flatness = normal.y.clamp(0.0, 1.0);
    let ground = ROCK.lerp(GRASS, ((flatness - 0.6) / 0.3).clamp(0.0, 1.0));
    let snow = ((relative_height - 0.85) / 0.1).clamp(0.0, 1.0) * flatness;
    ground.lerp(SNOW, snow)
}

/// Linear color for one marched ray.
pub fn shade(ray: &Ray, step: &RayStep, stats: &MarchStats, mode: ViewMode, max_steps: u32) -> Color {
    match mode {
        ViewMode::Shaded => {
            if !step.hit {
                return sky(ray.direction);
            }
            let albedo = terrain_albedo(step.normal, step.metadata.z);
            let diffuse = step.normal.dot(SUN_DIRECTION).max(0.0);
            albedo * (AMBIENT + (1.0 - AMBIENT) * diffuse)
        }
        ViewMode::Normals => {
            if step.hit { step.normal * 0.5 + Vec3A::splat(0.5) } else { Color::ZERO }
        }
        ViewMode::Depth => {
            if step.hit { Vec3A::splat(1.0 - step.metadata.y) } else { Color::ZERO }
        }
        ViewMode::Steps => Vec3A::splat(stats.steps as f32 / max_steps.max(1) as f32),
        ViewMode::Height => {
            if step.hit { Vec3A::splat(step.metadata.z) } else { Color::ZERO }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::march::MarchOutcome;

    fn miss_stats() -> MarchStats {
        MarchStats { steps: 50, outcome: MarchOutcome::StepLimit }
    }

    #[test]
    fn miss_shows_sky_in_shaded_view() {
        let ray = Ray::new(Vec3A::ZERO, Vec3A::Y, 1.0, 10.0);
        let c = shade(&ray, &RayStep::miss(), &miss_stats(), ViewMode::Shaded, 200);
        assert_eq!(c, sky(Vec3A::Y));
    }

    #[test]
    fn steps_view_is_relative_to_budget() {
        let ray = Ray::new(Vec3A::ZERO, Vec3A::Y, 1.0, 10.0);
        let c = shade(&ray, &RayStep::miss(), &miss_stats(), ViewMode::Steps, 200);
        assert_eq!(c, Vec3A::splat(0.25));
    }

    #[test]
    fn lit_surface_is_brighter_than_ambient_only() {
        let ray = Ray::new(Vec3A::ZERO, Vec3A::NEG_Y, 1.0, 10.0);
        let hit = RayStep {
            t: 5.0,
            position: Vec3A::new(0.0, -5.0, 0.0),
            normal: Vec3A::Y,
            metadata: Vec3A::new(0.1, 0.5, 0.3),
            distance: 0.0,
            hit: true,
        };
        let stats = MarchStats { steps: 20, outcome: MarchOutcome::Hit };
        let c = shade(&ray, &hit, &stats, ViewMode::Shaded, 200);
        let ambient_only = terrain_albedo(Vec3A::Y, 0.3) * AMBIENT;
        assert!(c.min_element() > 0.0);
        assert!(c.x > ambient_only.x);
        let n = shade(&ray, &hit, &stats, ViewMode::Normals, 200);
        assert_eq!(n, Vec3A::new(0.5, 1.0, 0.5));
    }

    #[test]
    fn steep_slopes_are_rock() {
        let steep = Vec3A::new(1.0, 0.2, 0.0).normalize();
        assert_eq!(terrain_albedo(steep, 0.2), ROCK);
    }
}
