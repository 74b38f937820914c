use std::path::Path;

use clap::Parser;
use log::{error, info};

mod cli;
mod logger;

use cli::Args;
use logger::init_logger;
use terramarch::config::Config;
use terramarch::output::save_image;
use terramarch::render::Renderer;

/// Merge command line overrides into the loaded configuration.
fn apply_overrides(config: &mut Config, args: &Args) {
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }
    if let Some(samples) = args.samples_per_pixel {
        config.render.samples_per_pixel = samples;
    }
    if let Some(position) = args.camera_position {
        config.camera.position = position;
    }
    if let Some(target) = args.camera_target {
        config.camera.target = target;
        config.camera.look_dir = None;
    }
    if let Some(look_dir) = args.look_dir {
        config.camera.look_dir = Some(look_dir);
    }
    if let Some(focal_length) = args.focal_length {
        config.camera.focal_length = focal_length;
    }
    if let Some(roll) = args.roll {
        config.camera.roll = roll.to_radians();
    }
    if let Some(seed) = args.seed {
        config.terrain.seed = seed;
    }
}

fn run(args: Args) -> terramarch::Result<()> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    apply_overrides(&mut config, &args);

    let renderer = Renderer::new(config, args.view.clone().into())?;
    info!(
        "Image resolution: {}x{}, samples per pixel: {}, view: {:?}",
        config.render.width, config.render.height, config.render.samples_per_pixel, renderer.view
    );

    let (image, stats) = renderer.render();
    info!(
        "{} of {} rays hit the terrain, {:.1} march steps per ray",
        stats.hits,
        stats.rays(),
        stats.mean_steps()
    );

    save_image(&image, Path::new(&args.output), &config.post)
}

fn main() {
    let args = Args::parse();

    init_logger(args.debug_level.clone().into());

    // Log application startup with version information
    info!("terramarch - Git Version {} ({})", env!("GIT_HASH"), env!("GIT_DATE"));

    if let Err(e) = run(args) {
        error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3A;
    use terramarch::camera::Camera;

    #[test]
    fn look_dir_flag_reaches_the_camera() {
        let args = Args::parse_from(["terramarch", "--camera-position", "0,1000,0", "--look-dir", "0,2,-90"]);
        let mut config = Config::default();
        apply_overrides(&mut config, &args);
        let camera = Camera::from_config(&config.camera).unwrap();
        assert_eq!(camera.target, Vec3A::new(0.0, 1002.0, -90.0));
    }

    #[test]
    fn target_flag_clears_a_configured_look_dir() {
        let args = Args::parse_from(["terramarch", "--camera-target", "0,0,-1"]);
        let mut config = Config::default();
        config.camera.look_dir = Some(Vec3A::Z);
        apply_overrides(&mut config, &args);
        assert_eq!(config.camera.look_dir, None);
        assert_eq!(Camera::from_config(&config.camera).unwrap().target, Vec3A::new(0.0, 0.0, -1.0));
    }
}
