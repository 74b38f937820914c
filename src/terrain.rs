//! Procedural terrain height field.
//!
//! Heights come from fractal Brownian motion over [`lattice_noise`]: a sum of
//! octaves at rising frequency and falling amplitude, normalized back into
//! [-1, 1] and then mapped to world meters. All functions are pure; calling
//! them twice with the same input gives bit-identical results.

use glam::{Mat2, Vec2, Vec3A};

use crate::config::TerrainConfig;
use crate::noise::lattice_noise;

/// Rotation applied between octaves so lattice cells of successive octaves do
/// not line up (a 3-4-5 triangle, exactly orthonormal).
const OCTAVE_ROTATION: Mat2 = Mat2::from_cols(Vec2::new(0.8, 0.6), Vec2::new(-0.6, 0.8));

/// Anything the ray marcher can march against.
///
/// Implementations must be pure: the marcher samples `height` repeatedly and
/// relies on identical answers for identical input.
pub trait HeightField: Sync + Send {
    /// Surface height at world position `xz`.
    fn height(&self, xz: Vec2) -> f32;

    /// Upper bound of `height` over the whole field.
    fn max_height(&self) -> f32;

    /// Unit surface normal at `xz`, estimated with offsets of `eps`.
    fn normal(&self, xz: Vec2, eps: f32) -> Vec3A {
        central_difference_normal(self, xz, eps)
    }
}

/// Normal from central differences of `field.height` along X and Z.
pub fn central_difference_normal<H: HeightField + ?Sized>(field: &H, xz: Vec2, eps: f32) -> Vec3A {
    let dx = Vec2::new(eps, 0.0);
    let dz = Vec2::new(0.0, eps);
    let tangent_x = Vec3A::new(2.0 * eps, field.height(xz + dx) - field.height(xz - dx), 0.0);
    let tangent_z = Vec3A::new(0.0, field.height(xz + dz) - field.height(xz - dz), 2.0 * eps);
    tangent_z.cross(tangent_x).normalize()
}

#[inline]
fn signed_noise(p: Vec2, seed: u32) -> f32 {
    2.0 * lattice_noise(p, seed) - 1.0
}

/// Single octave of lattice noise at grid position `xz`, in [-1, 1].
pub fn normalized_terrain_noise(xz: Vec2, config: &TerrainConfig) -> f32 {
    signed_noise(xz, config.seed)
}

/// FBM height at grid position `xz`, in [-1, 1].
///
/// Each octave multiplies the frequency by `config.lacunarity` and scales the
/// amplitude by `roughness`, which must lie in (0, 1). The sum is divided by
/// the total amplitude so the range does not depend on the octave count.
pub fn normalized_terrain_height_with_roughness(xz: Vec2, roughness: f32, config: &TerrainConfig) -> f32 {
    debug_assert!(roughness > 0.0 && roughness < 1.0, "roughness {roughness} outside (0, 1)");

    let mut p = xz;
    let mut amplitude = 1.0;
    let mut sum = 0.0;
    let mut total = 0.0;
    for octave in 0..config.octaves.max(1) {
        sum += amplitude * signed_noise(p, config.seed.wrapping_add(octave));
        total += amplitude;
        amplitude *= roughness;
        p = OCTAVE_ROTATION * p * config.lacunarity;
    }
    (sum / total).clamp(-1.0, 1.0)
}

/// FBM height with the configured default roughness.
pub fn normalized_terrain_height(xz: Vec2, config: &TerrainConfig) -> f32 {
    normalized_terrain_height_with_roughness(xz, config.roughness, config)
}

/// World-space terrain height in [0, terrain_max_height].
pub fn terrain_height(xz: Vec2, config: &TerrainConfig) -> f32 {
    let grid = xz * config.world_to_grid + config.grid_origin;
    let height = config.base_terrain_height + normalized_terrain_height(grid, config) * config.terrain_variation;
    height.clamp(0.0, config.terrain_max_height)
}

/// Unit terrain normal at world position `xz`.
pub fn terrain_normal(xz: Vec2, eps: f32, config: &TerrainConfig) -> Vec3A {
    central_difference_normal(&Terrain::new(*config), xz, eps)
}

/// The procedural terrain as a [`HeightField`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Terrain {
    pub config: TerrainConfig,
}

impl Terrain {
    pub fn new(config: TerrainConfig) -> Self {
        Self { config }
    }
}

impl HeightField for Terrain {
    fn height(&self, xz: Vec2) -> f32 {
        terrain_height(xz, &self.config)
    }

    fn max_height(&self) -> f32 {
        self.config.terrain_max_height
    }
}
