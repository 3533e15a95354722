//! Image file I/O around the evolution engine: loading the target normalized to
//! RGBA, scaling it to working resolution, and writing PNG artifacts.

use std::path::Path;

use image::{imageops, imageops::FilterType, ImageFormat, RgbaImage};
use tracing::debug;

use crate::error::Result;

/// Opens an image file of any supported format and converts it to 8-bit RGBA.
pub fn load_target(path: &Path) -> Result<RgbaImage> {
    let image = image::open(path)?.to_rgba8();
    debug!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        "Loaded target image"
    );
    Ok(image)
}

/// The working-resolution size for a quality factor, truncated and never below 1x1.
pub fn working_size(width: u32, height: u32, quality_factor: f64) -> (u32, u32) {
    let scale = |side: u32| ((side as f64 * quality_factor) as u32).max(1);
    (scale(width), scale(height))
}

/// Upper bound (exclusive) for gene coordinates of a `width` x `height` target.
pub fn max_coordinate(width: u32, height: u32) -> u32 {
    width.max(height).saturating_mul(2)
}

/// Returns `image` resampled to `width` x `height`, or a copy if it already has that size.
pub fn resize(image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    if image.dimensions() == (width, height) {
        return image.clone();
    }
    imageops::resize(image, width, height, FilterType::CatmullRom)
}

/// Writes `image` as PNG, replacing any existing file.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<()> {
    image.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}
