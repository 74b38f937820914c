//! Renderer configuration.
//!
//! The defaults reproduce the fixed constants of the terrain renderer. Every
//! struct deserializes with `#[serde(default)]`, so a TOML file only needs to
//! name the fields it overrides.

use std::path::Path;

use glam::{Vec2, Vec3A};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Minimum ray travel distance before the first sample.
pub const MIN_T: f32 = 15.0;
/// Maximum ray travel distance before a miss is declared.
pub const MAX_T: f32 = 2000.0;
/// Ceiling for terrain height, in meters.
pub const TERRAIN_MAX_HEIGHT: f32 = 840.0;
/// Hard iteration cap for the marching loop.
pub const MAX_STEPS: u32 = 200;
/// Damping applied to each heightfield-distance step.
pub const STEP_FACTOR: f32 = 0.8;
/// Amplitude of normalized noise in world height.
pub const TERRAIN_VARIATION: f32 = 600.0;
/// Additive offset for world height.
pub const BASE_TERRAIN_HEIGHT: f32 = 600.0;
/// World to grid coordinate scale.
pub const WORLD_TO_GRID: f32 = 1.0 / 2000.0;
/// Grid coordinate offset.
pub const GRID_ORIGIN: Vec2 = Vec2::new(1.0, -2.0);

/// Ray marching parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarchConfig {
    pub min_t: f32,
    pub max_t: f32,
    pub max_steps: u32,
    pub step_factor: f32,
    /// Hit tolerance per unit of travel distance.
    pub threshold_scale: f32,
    /// Lower bound for the hit tolerance.
    pub min_threshold: f32,
    /// Offset used for finite-difference normals.
    pub normal_epsilon: f32,
}

impl Default for MarchConfig {
    fn default() -> Self {
        Self {
            min_t: MIN_T,
            max_t: MAX_T,
            max_steps: MAX_STEPS,
            step_factor: STEP_FACTOR,
            threshold_scale: 1.0 / 1000.0,
            min_threshold: 0.01,
            normal_epsilon: 1.0,
        }
    }
}

/// Procedural height field parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    pub seed: u32,
    pub terrain_max_height: f32,
    pub terrain_variation: f32,
    pub base_terrain_height: f32,
    pub world_to_grid: f32,
    pub grid_origin: Vec2,
    pub octaves: u32,
    pub lacunarity: f32,
    /// Amplitude gain per octave used by the fixed-roughness height.
    pub roughness: f32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            terrain_max_height: TERRAIN_MAX_HEIGHT,
            terrain_variation: TERRAIN_VARIATION,
            base_terrain_height: BASE_TERRAIN_HEIGHT,
            world_to_grid: WORLD_TO_GRID,
            grid_origin: GRID_ORIGIN,
            octaves: 8,
            lacunarity: 2.0,
            roughness: 0.5,
        }
    }
}

/// Camera placement used by the render host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: Vec3A,
    pub target: Vec3A,
    pub focal_length: f32,
    /// Roll around the view axis, in radians.
    pub roll: f32,
    /// Viewing direction; replaces `target` when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub look_dir: Option<Vec3A>,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3A::new(0.0, 1000.0, 0.0),
            target: Vec3A::new(0.0, 700.0, 1000.0),
            focal_length: 1.5,
            roll: 0.0,
            look_dir: None,
        }
    }
}

/// Color grading applied after shading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostConfig {
    pub exposure: f32,
    pub contrast: f32,
    pub saturation: f32,
    pub gamma: f32,
}

impl Default for PostConfig {
    fn default() -> Self {
        Self {
            exposure: 1.0,
            contrast: 1.0,
            saturation: 1.0,
            gamma: crate::post::DEFAULT_GAMMA,
        }
    }
}

/// Output image settings for the render host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub samples_per_pixel: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            samples_per_pixel: 1,
        }
    }
}

/// Complete renderer configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub march: MarchConfig,
    pub terrain: TerrainConfig,
    pub camera: CameraConfig,
    pub post: PostConfig,
    pub render: RenderConfig,
}

impl Config {
    /// Read and validate a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading configuration from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::InvalidConfig(e.to_string()))
    }

    /// Reject parameter combinations the renderer cannot work with.
    pub fn validate(&self) -> Result<()> {
        let m = &self.march;
        if !(m.min_t > 0.0 && m.min_t <= m.max_t) {
            return Err(invalid(format!("march.min_t ({}) must be in (0, max_t = {}]", m.min_t, m.max_t)));
        }
        if m.max_steps == 0 {
            return Err(invalid("march.max_steps must be at least 1"));
        }
        if !(m.step_factor > 0.0 && m.step_factor <= 1.0) {
            return Err(invalid(format!("march.step_factor ({}) must be in (0, 1]", m.step_factor)));
        }
        if m.threshold_scale < 0.0 || m.min_threshold <= 0.0 || m.normal_epsilon <= 0.0 {
            return Err(invalid("march thresholds and normal_epsilon must be positive"));
        }

        let t = &self.terrain;
        if t.octaves == 0 {
            return Err(invalid("terrain.octaves must be at least 1"));
        }
        if t.lacunarity < 2.0 {
            return Err(invalid(format!("terrain.lacunarity ({}) must be >= 2", t.lacunarity)));
        }
        if !(t.roughness > 0.0 && t.roughness < 1.0) {
            return Err(invalid(format!("terrain.roughness ({}) must be in (0, 1)", t.roughness)));
        }
        if t.terrain_max_height <= 0.0 || t.world_to_grid <= 0.0 {
            return Err(invalid("terrain.terrain_max_height and terrain.world_to_grid must be positive"));
        }

        if self.camera.focal_length <= 0.0 {
            return Err(invalid("camera.focal_length must be positive"));
        }
        if self.post.gamma <= 0.0 || self.post.exposure < 0.0 {
            return Err(invalid("post.gamma must be positive and post.exposure non-negative"));
        }

        let r = &self.render;
        if r.width == 0 || r.height == 0 || r.samples_per_pixel == 0 {
            return Err(invalid("render.width, render.height and render.samples_per_pixel must be non-zero"));
        }
        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> Error {
    Error::InvalidConfig(msg.into())
}
