//! # Output Module
//!
//! Writes rendered frames to disk:
//! - PNG: color corrected with the configured grading and quantized to 8 bits
//! - EXR: the linear HDR frame, untouched, for grading in an external tool

use std::path::Path;

use image::{ImageBuffer, Rgb};
use log::info;

use crate::config::PostConfig;
use crate::error::{Error, Result};
use crate::render::{post_process, LinearImage};

/// Quantize one display-encoded channel to 8 bits.
#[inline]
fn to_u8(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
}

/// Save a linear frame as an 8-bit PNG after color correction.
///
/// Values above 1.0 after grading are clipped to white.
pub fn save_image_as_png(image: &LinearImage, output_path: &Path, post: &PostConfig) -> Result<()> {
    let graded = post_process(image, post);
    let (width, height) = graded.dimensions();
    let u8_image: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_fn(width, height, |x, y| {
        let pixel = graded.get_pixel(x, y);
        Rgb([to_u8(pixel[0]), to_u8(pixel[1]), to_u8(pixel[2])])
    });

    u8_image.save(output_path)?;
    info!("Image saved as {}", output_path.display());
    Ok(())
}

/// Save a linear frame as a 32-bit float EXR with no tone mapping.
pub fn save_image_as_exr(image: &LinearImage, output_path: &Path) -> Result<()> {
    let (width, height) = image.dimensions();
    exr::prelude::write_rgb_file(output_path, width as usize, height as usize, |x, y| {
        let pixel = image.get_pixel(x as u32, y as u32);
        (pixel[0], pixel[1], pixel[2])
    })?;
    info!("HDR image saved as EXR: {}", output_path.display());
    Ok(())
}

/// Save by file extension: `.png` or `.exr`.
pub fn save_image(image: &LinearImage, output_path: &Path, post: &PostConfig) -> Result<()> {
    let extension = output_path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "png" => save_image_as_png(image, output_path, post),
        "exr" => save_image_as_exr(image, output_path),
        _ => Err(Error::UnsupportedOutput(output_path.display().to_string())),
    }
}
