//! End-to-end properties of the camera → march → post pipeline.

use std::sync::atomic::{AtomicUsize, Ordering};

use glam::{Vec2, Vec3A};
use terramarch::camera::{cam2world_matrix_with_roll, Camera};
use terramarch::config::{MarchConfig, TerrainConfig, MAX_T};
use terramarch::march::{ray_march_terrain, ray_march_terrain_traced, threshold_from, MarchOutcome, RayStep};
use terramarch::post::{color_correction, gamma_correction};
use terramarch::ray::Ray;
use terramarch::terrain::{terrain_height, HeightField, Terrain};

/// Wraps a field and counts calls to `height`.
struct Counting<H> {
    inner: H,
    calls: AtomicUsize,
}

impl<H> Counting<H> {
    fn new(inner: H) -> Self {
        Self { inner, calls: AtomicUsize::new(0) }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl<H: HeightField> HeightField for Counting<H> {
    fn height(&self, xz: Vec2) -> f32 {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.inner.height(xz)
    }

    fn max_height(&self) -> f32 {
        self.inner.max_height()
    }

    fn normal(&self, xz: Vec2, eps: f32) -> Vec3A {
        // normal sampling is not part of the loop budget
        self.inner.normal(xz, eps)
    }
}

/// Sharp ridges every 40 m that rise almost to the ceiling.
struct Ridges;

impl HeightField for Ridges {
    fn height(&self, xz: Vec2) -> f32 {
        let phase = (xz.x / 40.0).fract().abs();
        if phase < 0.02 { 830.0 } else { 100.0 }
    }

    fn max_height(&self) -> f32 {
        840.0
    }
}

fn assert_hit_on_surface(step: &RayStep, ray: &Ray, config: &MarchConfig, terrain: &TerrainConfig) {
    assert!(step.hit, "expected a hit for {ray:?}");
    assert!(ray.range().contains(step.t), "t = {} outside ray range", step.t);
    let surface = terrain_height(Vec2::new(step.position.x, step.position.z), terrain);
    assert!(
        (step.position.y - surface).abs() < threshold_from(step.t, config),
        "position {} is {} away from the surface",
        step.position,
        step.position.y - surface
    );
    assert!((step.normal.length() - 1.0).abs() < 1e-4);
    assert!(step.normal.y > 0.0);
}

#[test]
fn straight_down_rays_hit_the_surface() {
    let config = MarchConfig::default();
    let terrain = Terrain::default();
    for i in 0..25 {
        let origin = Vec3A::new(i as f32 * 431.0 - 5000.0, 1000.0, i as f32 * -277.0 + 3000.0);
        let ray = Ray::new(origin, Vec3A::NEG_Y, config.min_t, MAX_T);
        let step = ray_march_terrain(&ray, &terrain, &config);
        assert_hit_on_surface(&step, &ray, &config, &terrain.config);
    }
}

#[test]
fn straight_up_rays_from_above_the_ceiling_miss() {
    let config = MarchConfig::default();
    let terrain = Terrain::default();
    for y in [841.0, 900.0, 1500.0] {
        let ray = Ray::new(Vec3A::new(123.0, y, -456.0), Vec3A::Y, config.min_t, MAX_T);
        let step = ray_march_terrain(&ray, &terrain, &config);
        assert!(!step.hit);
        assert_eq!(step, RayStep::miss());
    }
}

#[test]
fn example_scene_hits_below_the_camera() {
    let config = MarchConfig::default();
    let terrain = Terrain::default();
    let camera = Camera::new(Vec3A::new(0.0, 1000.0, 0.0), Vec3A::new(0.0, 0.0, -1.0), 1.0, 0.0);

    let ray = Ray::to_screen_uv(Vec2::ZERO, &camera, &config);
    assert!((ray.direction - (camera.target - camera.position).normalize()).length() < 1e-5);

    let step = ray_march_terrain(&ray, &terrain, &config);
    assert_hit_on_surface(&step, &ray, &config, &terrain.config);
    assert!(step.position.y < 1000.0);
}

#[test]
fn march_never_exceeds_the_step_budget() {
    let config = MarchConfig::default();
    let budget = config.max_steps as usize;

    // grazing rays over the procedural terrain
    let terrain = Counting::new(Terrain::default());
    for i in 0..16 {
        let angle = i as f32 * 0.4;
        let dir = Vec3A::new(angle.cos(), -0.001, angle.sin());
        let ray = Ray::new(Vec3A::new(0.0, 845.0, 0.0), dir, config.min_t, MAX_T);
        let before = terrain.calls();
        let (_, stats) = ray_march_terrain_traced(&ray, &terrain, &config);
        let used = terrain.calls() - before;
        assert!(used <= budget, "{used} height samples for one ray");
        assert_eq!(used, stats.steps as usize);
    }

    // rays skimming across sharp ridges
    let ridges = Counting::new(Ridges);
    for i in 0..16 {
        let dir = Vec3A::new(1.0, -0.01 * i as f32, 0.05);
        let ray = Ray::new(Vec3A::new(1.0, 835.0, 0.0), dir, config.min_t, MAX_T);
        let before = ridges.calls();
        let (step, stats) = ray_march_terrain_traced(&ray, &ridges, &config);
        let used = ridges.calls() - before;
        assert!(used <= budget, "{used} height samples for one ray");
        if stats.outcome != MarchOutcome::Hit {
            assert_eq!(step, RayStep::miss());
        }
    }
}

#[test]
fn heights_are_bounded_and_deterministic() {
    let config = TerrainConfig::default();
    for i in -30..30 {
        for j in -30..30 {
            let xz = Vec2::new(i as f32 * 173.0, j as f32 * 211.0);
            let h = terrain_height(xz, &config);
            assert!((0.0..=config.terrain_max_height).contains(&h));
            assert_eq!(h.to_bits(), terrain_height(xz, &config).to_bits());
        }
    }
}

#[test]
fn camera_bases_are_orthonormal_and_right_handed() {
    let targets = [
        Vec3A::new(0.0, 0.0, 1.0),
        Vec3A::new(5.0, -3.0, 2.0),
        Vec3A::new(0.0, -1.0, 0.0),
        Vec3A::new(0.0, 1.0, 0.0),
        Vec3A::new(-2.0, 0.5, -7.0),
        Vec3A::new(1e-4, -10.0, 0.0),
    ];
    for target in targets {
        for roll in [0.0, 0.3, -1.2, 3.0] {
            let m = cam2world_matrix_with_roll(Vec3A::ZERO, target, roll);
            let (r, u, f) = (m.x_axis, m.y_axis, m.z_axis);
            assert!((r.length() - 1.0).abs() < 1e-5);
            assert!((u.length() - 1.0).abs() < 1e-5);
            assert!((f.length() - 1.0).abs() < 1e-5);
            assert!(r.dot(u).abs() < 1e-5 && r.dot(f).abs() < 1e-5 && u.dot(f).abs() < 1e-5);
            assert!((r.cross(u) - f).length() < 1e-5, "left-handed basis for target {target}");
        }
    }
}

#[test]
fn gamma_identities() {
    let c = Vec3A::new(0.2, 0.4, 0.6);
    assert!((gamma_correction(c, 1.0) - c).abs().max_element() < 1e-6);
    for g in [0.4545, 1.0, 2.2] {
        assert_eq!(gamma_correction(Vec3A::ONE, g), Vec3A::ONE);
    }
    assert_eq!(color_correction(Vec3A::ZERO), Vec3A::ZERO);
}
