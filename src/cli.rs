use clap::{Parser, ValueEnum};
use glam::Vec3A;
use log::LevelFilter;
use terramarch::shading::ViewMode;

/// Custom enum for log levels that can be used with clap's ValueEnum
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convert our custom LogLevel enum to log crate's LevelFilter
impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// What to write into each pixel
#[derive(Debug, Clone, ValueEnum)]
pub enum View {
    Shaded,
    Normals,
    Depth,
    Steps,
    Height,
}

impl From<View> for ViewMode {
    fn from(view: View) -> Self {
        match view {
            View::Shaded => ViewMode::Shaded,
            View::Normals => ViewMode::Normals,
            View::Depth => ViewMode::Depth,
            View::Steps => ViewMode::Steps,
            View::Height => ViewMode::Height,
        }
    }
}

/// Parse "x,y,z" into a vector
fn parse_vec3(s: &str) -> Result<Vec3A, String> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<f32>().map_err(|e| format!("'{p}': {e}")))
        .collect::<Result<Vec<_>, _>>()?;
    match parts.as_slice() {
        [x, y, z] => Ok(Vec3A::new(*x, *y, *z)),
        _ => Err(format!("expected three comma separated numbers, got '{s}'")),
    }
}

/// Command line arguments structure using clap derive macros
#[derive(Parser)]
#[command(name = "terramarch")]
#[command(about = "Ray march a procedural terrain into an image")]
pub struct Args {
    /// TOML configuration file; built-in defaults are used when omitted
    #[arg(short, long)]
    pub config: Option<String>,

    /// Set the logging level (defaults to "info")
    #[arg(long, default_value = "info", help = "Set the logging level")]
    pub debug_level: LogLevel,

    /// Image width in pixels
    #[arg(long, help = "Image width in pixels (overrides the config)")]
    pub width: Option<u32>,

    /// Image height in pixels
    #[arg(long, help = "Image height in pixels (overrides the config)")]
    pub height: Option<u32>,

    /// Number of samples per pixel
    #[arg(long, short = 's', help = "Number of jittered samples per pixel (overrides the config)")]
    pub samples_per_pixel: Option<u32>,

    /// Output file path (.png for 8-bit color corrected, .exr for HDR linear)
    #[arg(short, long, default_value = "terrain.png", help = "Output file path (.png for 8-bit color corrected, .exr for HDR linear)")]
    pub output: String,

    /// Debug visualisation
    #[arg(long, value_enum, default_value = "shaded")]
    pub view: View,

    /// Camera position as x,y,z
    #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
    pub camera_position: Option<Vec3A>,

    /// Camera target as x,y,z
    #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
    pub camera_target: Option<Vec3A>,

    /// Viewing direction as x,y,z, used instead of a target point
    #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true, conflicts_with = "camera_target")]
    pub look_dir: Option<Vec3A>,

    /// Focal length of the pinhole camera
    #[arg(long)]
    pub focal_length: Option<f32>,

    /// Camera roll in degrees
    #[arg(long, allow_hyphen_values = true)]
    pub roll: Option<f32>,

    /// Seed of the terrain noise
    #[arg(long)]
    pub seed: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_vectors() {
        assert_eq!(parse_vec3("1, -2.5,3").unwrap(), Vec3A::new(1.0, -2.5, 3.0));
        assert!(parse_vec3("1,2").is_err());
        assert!(parse_vec3("a,b,c").is_err());
    }

    #[test]
    fn parses_camera_overrides() {
        let args = Args::parse_from([
            "terramarch",
            "--camera-position",
            "0,1000,0",
            "--camera-target",
            "0,0,-1",
            "--roll",
            "-15",
            "--view",
            "steps",
        ]);
        assert_eq!(args.camera_position, Some(Vec3A::new(0.0, 1000.0, 0.0)));
        assert_eq!(args.camera_target, Some(Vec3A::new(0.0, 0.0, -1.0)));
        assert_eq!(args.roll, Some(-15.0));
        assert!(matches!(args.view, View::Steps));
        assert_eq!(args.output, "terrain.png");
    }

    #[test]
    fn look_dir_conflicts_with_target() {
        let args = Args::parse_from(["terramarch", "--look-dir", "0,2,-90"]);
        assert_eq!(args.look_dir, Some(Vec3A::new(0.0, 2.0, -90.0)));
        assert!(Args::try_parse_from(["terramarch", "--look-dir", "0,2,-90", "--camera-target", "0,0,1"]).is_err());
    }
}
