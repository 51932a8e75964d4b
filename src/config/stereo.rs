use crate::image::io::load_label_image;
use crate::image::ColorSpace;
use crate::pipeline::StereoParams;
use crate::segmentation::Segmentation;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

fn default_grid_cell() -> usize {
    16
}

#[derive(Debug, Deserialize)]
pub struct StereoToolConfig {
    pub left: PathBuf,
    pub right: PathBuf,
    /// Segment label image for the left view. A regular grid of
    /// `grid_cell`-sized blocks stands in when absent.
    #[serde(default)]
    pub labels: Option<PathBuf>,
    #[serde(default)]
    pub color_space: ColorSpace,
    #[serde(default = "default_grid_cell")]
    pub grid_cell: usize,
    #[serde(default)]
    pub params: StereoParams,
    pub output: StereoOutputConfig,
}

#[derive(Debug, Deserialize)]
pub struct StereoOutputConfig {
    pub disparity_image: PathBuf,
    #[serde(default)]
    pub plane_image: Option<PathBuf>,
    pub report_json: PathBuf,
}

impl StereoToolConfig {
    /// Segmentation for a `width × height` left image.
    pub fn segmentation(&self, width: usize, height: usize) -> Result<Segmentation, String> {
        let Some(path) = &self.labels else {
            return Ok(Segmentation::regular_grid(width, height, self.grid_cell));
        };
        let labels = load_label_image(path)?;
        if labels.width != width || labels.height != height {
            return Err(format!(
                "Label image {} is {}x{}, expected {}x{}",
                path.display(),
                labels.width,
                labels.height,
                width,
                height
            ));
        }
        Segmentation::from_labels(width, height, &labels.labels)
            .map_err(|e| format!("Invalid labels {}: {e}", path.display()))
    }
}

pub fn load_config(path: &Path) -> Result<StereoToolConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_fills_defaults() {
        let cfg: StereoToolConfig = serde_json::from_str(
            r#"{
                "left": "data/left.png",
                "right": "data/right.png",
                "color_space": "gray",
                "params": { "matching": { "min_disp": -4, "max_disp": 12 } },
                "output": { "disparity_image": "out/d.png", "report_json": "out/r.json" }
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.color_space, ColorSpace::Gray);
        assert_eq!(cfg.grid_cell, 16);
        assert!(cfg.labels.is_none());
        assert!(cfg.output.plane_image.is_none());
        assert_eq!(cfg.params.matching.min_disp, -4);
        assert_eq!(cfg.params.refine.iterations, 1);

        let seg = cfg.segmentation(40, 20).unwrap();
        assert_eq!(seg.len(), 3 * 2);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_config(Path::new("does/not/exist.json")).unwrap_err();
        assert!(err.contains("does/not/exist.json"));
    }
}
