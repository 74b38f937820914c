//! CPU render host.
//!
//! Runs the per-pixel pipeline (camera ray → march → shading → color
//! correction) over a whole image. Pixels are independent, so rows are handed
//! out to rayon workers without any coordination beyond the shared counters
//! used for statistics.

use std::sync::atomic::{AtomicU64, Ordering};

use glam::{UVec2, Vec2};
use image::{ImageBuffer, Rgb};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use rayon::prelude::*;

use crate::camera::Camera;
use crate::config::{Config, PostConfig};
use crate::error::Result;
use crate::march::{ray_march_terrain_traced, MarchOutcome, MarchStats, RayStep};
use crate::post::color_correction_with;
use crate::random;
use crate::ray::Ray;
use crate::shading::{shade, Color, ViewMode};
use crate::terrain::Terrain;

/// Linear HDR image produced by the renderer.
pub type LinearImage = ImageBuffer<Rgb<f32>, Vec<f32>>;

/// Map a position in pixel space to normalized device coordinates.
///
/// `pixel` is measured from the top-left corner (so the centre of pixel
/// (0, 0) is (0.5, 0.5)). The longer image axis spans [-1, 1]; the shorter
/// one is scaled down by the aspect ratio, so the result always lies in
/// [-1, 1]². v points up.
pub fn screen_uv(pixel: Vec2, size: UVec2) -> Vec2 {
    let size = size.as_vec2();
    let ndc = Vec2::new(2.0 * pixel.x / size.x - 1.0, 1.0 - 2.0 * pixel.y / size.y);
    let uv = if size.x >= size.y {
        Vec2::new(ndc.x, ndc.y * size.y / size.x)
    } else {
        Vec2::new(ndc.x * size.x / size.y, ndc.y)
    };
    uv.clamp(Vec2::NEG_ONE, Vec2::ONE)
}

/// Aggregate statistics over a rendered frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Rays that reached the terrain
    pub hits: u64,
    /// Rays that missed
    pub misses: u64,
    /// Total march loop iterations
    pub steps: u64,
    /// Misses caused by the step budget running out
    pub step_limited: u64,
}

impl FrameStats {
    /// Number of rays traced.
    pub fn rays(&self) -> u64 {
        self.hits + self.misses
    }

    /// Mean loop iterations per ray.
    pub fn mean_steps(&self) -> f64 {
        if self.rays() == 0 { 0.0 } else { self.steps as f64 / self.rays() as f64 }
    }
}

#[derive(Default)]
struct FrameCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    steps: AtomicU64,
    step_limited: AtomicU64,
}

impl FrameCounters {
    fn record(&self, stats: &MarchStats) {
        self.steps.fetch_add(stats.steps as u64, Ordering::Relaxed);
        match stats.outcome {
            MarchOutcome::Hit => {
                self.hits.fetch_add(1, Ordering::Relaxed);
            }
            MarchOutcome::StepLimit => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                self.step_limited.fetch_add(1, Ordering::Relaxed);
            }
            MarchOutcome::Escaped | MarchOutcome::LeftRange | MarchOutcome::Stalled => {
                self.misses.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    fn snapshot(&self) -> FrameStats {
        FrameStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            steps: self.steps.load(Ordering::Relaxed),
            step_limited: self.step_limited.load(Ordering::Relaxed),
        }
    }
}

/// Renders the procedural terrain from a single camera.
#[derive(Debug, Clone)]
pub struct Renderer {
    pub config: Config,
    pub camera: Camera,
    pub terrain: Terrain,
    pub view: ViewMode,
}

impl Renderer {
    /// Validate `config` and build the camera and terrain it describes.
    pub fn new(config: Config, view: ViewMode) -> Result<Self> {
        config.validate()?;
        let camera = Camera::from_config(&config.camera)?;
        debug!(
            "Camera at {} looking at {} (focal length {}, roll {})",
            camera.position, camera.target, camera.focal_length, camera.roll
        );
        Ok(Self {
            config,
            camera,
            terrain: Terrain::new(config.terrain),
            view,
        })
    }

    /// Output size in pixels.
    pub fn size(&self) -> UVec2 {
        UVec2::new(self.config.render.width, self.config.render.height)
    }

    /// Trace the primary ray through `uv`.
    pub fn trace(&self, uv: Vec2) -> (Ray, RayStep, MarchStats) {
        let ray = Ray::to_screen_uv(uv, &self.camera, &self.config.march);
        let (step, stats) = ray_march_terrain_traced(&ray, &self.terrain, &self.config.march);
        (ray, step, stats)
    }

    /// Linear color seen through `uv`.
    pub fn shade_uv(&self, uv: Vec2) -> Color {
        let (ray, step, stats) = self.trace(uv);
        shade(&ray, &step, &stats, self.view, self.config.march.max_steps)
    }

    /// Final, color-corrected value of one pixel sampled at its centre.
    pub fn render_pixel(&self, x: u32, y: u32) -> Color {
        let uv = screen_uv(Vec2::new(x as f32 + 0.5, y as f32 + 0.5), self.size());
        color_correction_with(self.shade_uv(uv), &self.config.post)
    }

    /// Render the full frame as linear color.
    ///
    /// With one sample per pixel the ray passes through the pixel centre;
    /// more samples are jittered inside the pixel and averaged.
    pub fn render(&self) -> (LinearImage, FrameStats) {
        let size = self.size();
        let samples = self.config.render.samples_per_pixel.max(1);
        let mut image = LinearImage::new(size.x, size.y);

        info!(
            "Marching {}x{} pixels, {} sample(s) each, on {} threads...",
            size.x,
            size.y,
            samples,
            rayon::current_num_threads()
        );
        let start = std::time::Instant::now();
        let pb = ProgressBar::new(size.y as u64);
        if let Ok(style) = ProgressStyle::default_bar().template("{bar:40} {pos}/{len} rows ETA: {eta}") {
            pb.set_style(style);
        }

        let counters = FrameCounters::default();
        let row_len = size.x as usize * 3;
        image.par_chunks_mut(row_len).enumerate().for_each(|(y, row)| {
            for (x, pixel) in row.chunks_exact_mut(3).enumerate() {
                let mut color = Color::ZERO;
                for _ in 0..samples {
                    let offset = if samples == 1 { Vec2::ZERO } else { random::sample_square() };
                    let centre = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) + offset;
                    let (ray, step, stats) = self.trace(screen_uv(centre, size));
                    counters.record(&stats);
                    color += shade(&ray, &step, &stats, self.view, self.config.march.max_steps);
                }
                color /= samples as f32;
                pixel.copy_from_slice(&[color.x, color.y, color.z]);
            }
            pb.inc(1);
        });

        pb.finish_and_clear();
        let stats = counters.snapshot();
        info!("Frame marched in {:.2?}", start.elapsed());
        debug!(
            "{} rays: {} hits, {} misses ({} hit the step limit), {:.1} steps per ray",
            stats.rays(),
            stats.hits,
            stats.misses,
            stats.step_limited,
            stats.mean_steps()
        );
        (image, stats)
    }
}

/// Apply color correction to every pixel of a linear image.
pub fn post_process(image: &LinearImage, config: &PostConfig) -> LinearImage {
    let mut out = image.clone();
    out.par_chunks_mut(3).for_each(|pixel| {
        let c = color_correction_with(Color::new(pixel[0], pixel[1], pixel[2]), config);
        pixel.copy_from_slice(&[c.x, c.y, c.z]);
    });
    out
}
