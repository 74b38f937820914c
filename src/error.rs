//! Error type for the fallible outer surfaces of the renderer.
//!
//! The marching core itself is total: a ray that finds no terrain returns a
//! miss value, not an error. Only configuration, camera setup from untrusted
//! parameters and image output can fail.

/// Errors raised while configuring the renderer or writing its output.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Degenerate camera: {0}")]
    DegenerateCamera(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("EXR error: {0}")]
    Exr(#[from] exr::error::Error),

    #[error("Unsupported output format '{0}', expected .png or .exr")]
    UnsupportedOutput(String),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
