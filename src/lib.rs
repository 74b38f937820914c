//! terramarch procedural terrain ray marcher
//!
//! Builds a view ray per pixel from a pinhole camera, sphere-marches it
//! against an FBM height field and color-corrects the shaded result. The
//! marching core is pure and per pixel; [`render`] drives it over an image.

#![warn(rustdoc::broken_intra_doc_links)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod noise;
pub mod terrain;
pub mod interval;
pub mod ray;
pub mod camera;
pub mod march;
pub mod post;
pub mod config;
pub mod error;
pub mod random;
pub mod shading;
pub mod render;
pub mod output;

pub use camera::Camera;
pub use config::Config;
pub use error::{Error, Result};
pub use march::{ray_march_terrain, RayStep};
pub use ray::Ray;
pub use terrain::{HeightField, Terrain};
