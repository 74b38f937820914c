//! Ray representation for terrain marching.
//!
//! A ray is r(t) = origin + t * direction with t restricted to [min_t, max_t].
//! Primary rays are built per pixel from a [`Camera`] and a screen coordinate.

use glam::{Vec2, Vec3A};

use crate::camera::Camera;
use crate::config::MarchConfig;
use crate::interval::Interval;

/// Reciprocal that stays finite for components close to zero.
pub fn safe_inverse(x: f32) -> f32 {
    if x.abs() <= f32::EPSILON {
        // signum keeps the sign of -0.0 as well
        x.signum() / f32::EPSILON
    } else {
        1.0 / x
    }
}

/// Ray in 3D space with a bounded travel range.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Starting point of the ray in world coordinates.
    pub origin: Vec3A,
    /// Unit direction of travel.
    pub direction: Vec3A,
    /// Component-wise inverse of `direction`, kept for box tests.
    pub inverse_direction: Vec3A,
    /// Distance travelled before the first sample.
    pub min_t: f32,
    /// Distance after which the ray is considered to have missed.
    pub max_t: f32,
}

impl Ray {
    /// Create a ray; `direction` is normalized here so callers can pass any
    /// non-zero vector.
    pub fn new(origin: Vec3A, direction: Vec3A, min_t: f32, max_t: f32) -> Self {
        debug_assert!(direction.length_squared() > 0.0, "ray direction must be non-zero");
        debug_assert!(min_t <= max_t, "min_t ({min_t}) must not exceed max_t ({max_t})");

        let direction = direction.normalize();
        Self {
            origin,
            direction,
            inverse_direction: Vec3A::new(
                safe_inverse(direction.x),
                safe_inverse(direction.y),
                safe_inverse(direction.z),
            ),
            min_t,
            max_t,
        }
    }

    /// Primary ray through normalized device coordinates `uv` ∈ [-1, 1]².
    ///
    /// The view-space direction is `(uv.x, uv.y, focal_length)`; +u is screen
    /// right and +v is screen up.
    pub fn to_screen_uv(uv: Vec2, cam: &Camera, config: &MarchConfig) -> Self {
        debug_assert!(
            uv.abs().cmple(Vec2::ONE).all(),
            "uv {uv} outside of [-1, 1]^2"
        );
        let view_dir = Vec3A::new(uv.x, uv.y, cam.focal_length).normalize();
        Self::new(cam.position, cam.cam2world(view_dir), config.min_t, config.max_t)
    }

    /// Compute a point at parameter t along the ray.
    pub fn at(&self, t: f32) -> Vec3A {
        self.origin + t * self.direction
    }

    /// Valid travel range as an interval.
    pub fn range(&self) -> Interval {
        Interval::new(self.min_t, self.max_t)
    }
}
