//! I/O helpers for stereo inputs, segment labels and JSON reports.
//!
//! - `load_planar_image`: read a PNG/JPEG/etc. into a [`PlanarImage`] in the
//!   requested colour space.
//! - `load_label_image`: read an 8/16-bit label image as a per-pixel label buffer.
//! - `save_normalized_f32`: write an `ImageF32` (e.g. disparity) as a grayscale
//!   PNG after mapping `[lo, hi]` to `[0, 255]`; NaN pixels become black.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::color::{planar_from_rgb8, ColorSpace};
use super::{ImageF32, ImageView, PlanarImage};
use image::{GrayImage, Luma};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Per-pixel segment labels in row-major order.
#[derive(Clone, Debug)]
pub struct LabelImage {
    pub width: usize,
    pub height: usize,
    pub labels: Vec<u32>,
}

/// Load an image from disk and convert it to `space`.
pub fn load_planar_image(path: &Path, space: ColorSpace) -> Result<PlanarImage, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_rgb8();
    let width = img.width() as usize;
    let height = img.height() as usize;
    log::debug!(
        "load_planar_image {} {}x{} -> {:?} ({} channels)",
        path.display(),
        width,
        height,
        space,
        space.channels()
    );
    planar_from_rgb8(width, height, img.as_raw(), space)
        .map_err(|e| format!("Failed to convert {}: {e}", path.display()))
}

/// Load a label image; 16-bit sources keep their full label range.
pub fn load_label_image(path: &Path) -> Result<LabelImage, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_luma16();
    Ok(LabelImage {
        width: img.width() as usize,
        height: img.height() as usize,
        labels: img.as_raw().iter().map(|&v| v as u32).collect(),
    })
}

/// Save a float image to a grayscale PNG, mapping `[lo, hi]` to `[0, 255]`.
pub fn save_normalized_f32(image: &ImageF32, lo: f32, hi: f32, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let span = (hi - lo).max(f32::EPSILON);
    let mut out = GrayImage::new(image.w as u32, image.h as u32);
    for y in 0..image.h {
        let row = image.row(y);
        for (x, &px) in row.iter().enumerate() {
            let v = if px.is_finite() {
                ((px - lo) / span * 255.0).clamp(0.0, 255.0)
            } else {
                0.0
            };
            out.put_pixel(x as u32, y as u32, Luma([v as u8]));
        }
    }
    out.save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
