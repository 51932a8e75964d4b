//! Median-based plane fitting over the valid disparities of a segment.
//!
//! Slopes come from pooled pairwise differences inside row buckets (for
//! `slope_x`) and column buckets (for `slope_y`); the intercept is the median
//! residual once both slopes are fixed. The median of `n` samples is element
//! `n / 2` of the sorted values.
//!
//! Work per segment is quadratic in the bucket sizes, which stay small for
//! superpixel-sized segments.
use super::Plane;
use crate::disparity::DisparityMap;
use crate::error::Result;
use crate::segmentation::{Pixel, Segmentation};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct FitParams {
    /// Minimum pooled pairs required for each slope estimate.
    pub min_slope_pairs: usize,
}

impl Default for FitParams {
    fn default() -> Self {
        Self { min_slope_pairs: 1 }
    }
}

/// Why a segment produced no plane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "reason")]
pub enum Degenerate {
    NoValidSamples,
    InsufficientRowPairs { pairs: usize },
    InsufficientColumnPairs { pairs: usize },
}

/// Planes for every segment of a segmentation, in arena order.
#[derive(Clone, Debug, Default)]
pub struct PlaneFit {
    pub planes: Vec<Option<Plane>>,
    /// Arena index and reason for every segment left without a plane.
    pub degenerate: Vec<(usize, Degenerate)>,
}

impl PlaneFit {
    pub fn fitted_count(&self) -> usize {
        self.planes.iter().filter(|p| p.is_some()).count()
    }
}

#[derive(Clone, Debug, Default)]
pub struct PlaneFitter {
    params: FitParams,
}

fn median(values: &mut [f32]) -> Option<f32> {
    if values.is_empty() {
        return None;
    }
    let mid = values.len() / 2;
    let (_, m, _) = values.select_nth_unstable_by(mid, f32::total_cmp);
    Some(*m)
}

/// Pool `(d_j − d_i) / (t_j − t_i)` over all pairs inside each bucket.
fn pairwise_slopes(buckets: &BTreeMap<usize, Vec<(usize, f32)>>) -> Vec<f32> {
    let mut slopes = Vec::new();
    for samples in buckets.values() {
        for (i, &(ti, di)) in samples.iter().enumerate() {
            for &(tj, dj) in &samples[i + 1..] {
                let dt = tj as f32 - ti as f32;
                if dt != 0.0 {
                    slopes.push((dj - di) / dt);
                }
            }
        }
    }
    slopes
}

impl PlaneFitter {
    pub fn new(params: FitParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &FitParams {
        &self.params
    }

    /// Fit one plane to the valid disparities under `pixels`.
    ///
    /// Pixels outside `disparity` are ignored.
    pub fn fit_segment(
        &self,
        pixels: &[Pixel],
        disparity: &DisparityMap,
    ) -> std::result::Result<Plane, Degenerate> {
        let samples: Vec<(usize, usize, f32)> = pixels
            .iter()
            .filter(|p| p.x < disparity.width() && p.y < disparity.height())
            .filter_map(|p| disparity.get(p.x, p.y).map(|d| (p.x, p.y, d as f32)))
            .collect();
        if samples.is_empty() {
            return Err(Degenerate::NoValidSamples);
        }

        let mut rows: BTreeMap<usize, Vec<(usize, f32)>> = BTreeMap::new();
        let mut cols: BTreeMap<usize, Vec<(usize, f32)>> = BTreeMap::new();
        for &(x, y, d) in &samples {
            rows.entry(y).or_default().push((x, d));
            cols.entry(x).or_default().push((y, d));
        }

        let need = self.params.min_slope_pairs.max(1);
        let mut sx = pairwise_slopes(&rows);
        if sx.len() < need {
            return Err(Degenerate::InsufficientRowPairs { pairs: sx.len() });
        }
        let mut sy = pairwise_slopes(&cols);
        if sy.len() < need {
            return Err(Degenerate::InsufficientColumnPairs { pairs: sy.len() });
        }
        let slope_x = median(&mut sx).ok_or(Degenerate::InsufficientRowPairs { pairs: 0 })?;
        let slope_y = median(&mut sy).ok_or(Degenerate::InsufficientColumnPairs { pairs: 0 })?;

        let mut offsets: Vec<f32> = samples
            .iter()
            .map(|&(x, y, d)| d - (slope_x * x as f32 + slope_y * y as f32))
            .collect();
        let intercept = median(&mut offsets).ok_or(Degenerate::NoValidSamples)?;
        Ok(Plane::new(slope_x, slope_y, intercept))
    }

    /// Fit every segment of `segmentation` against `disparity`.
    pub fn fit(&self, segmentation: &Segmentation, disparity: &DisparityMap) -> Result<PlaneFit> {
        segmentation.check_extent(disparity.width(), disparity.height())?;
        let segments = segmentation.segments();

        #[cfg(feature = "parallel")]
        let results: Vec<_> = segments
            .par_iter()
            .map(|s| self.fit_segment(&s.pixels, disparity))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let results: Vec<_> = segments
            .iter()
            .map(|s| self.fit_segment(&s.pixels, disparity))
            .collect();

        let mut fit = PlaneFit {
            planes: Vec::with_capacity(results.len()),
            degenerate: Vec::new(),
        };
        for (index, result) in results.into_iter().enumerate() {
            match result {
                Ok(plane) => fit.planes.push(Some(plane)),
                Err(reason) => {
                    log::debug!("PlaneFitter: segment {} degenerate: {:?}", index, reason);
                    fit.planes.push(None);
                    fit.degenerate.push((index, reason));
                }
            }
        }
        log::debug!(
            "PlaneFitter: {}/{} segments fitted",
            fit.fitted_count(),
            fit.planes.len()
        );
        Ok(fit)
    }
}
