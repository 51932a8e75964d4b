//! Reprojection cost of every (segment, plane) pairing.
//!
//! Each pixel `(x, y)` of a segment is sent through the candidate plane to
//! `rx = round(x + plane(x, y))` in the right image and charged
//! `(1 − ω)·|R(rx, y) − L(x, y)| + ω·(|∂xL − ∂xR| + |∂yL − ∂yR|)` per
//! channel. A pairing is infeasible as soon as one pixel lands outside
//! `[0, W − 2]`, and every pairing with an invalid plane is infeasible.
use super::Plane;
use crate::cost::StereoPair;
use crate::error::{Result, StereoError};
use crate::segmentation::{Pixel, Segmentation};
use nalgebra::DMatrix;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Sentinel for pairings that cannot be evaluated.
pub const INFEASIBLE_COST: f32 = f32::MAX;

/// Costs indexed `(segment, plane)`.
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentPlaneCostMatrix {
    costs: DMatrix<f32>,
}

impl SegmentPlaneCostMatrix {
    pub fn from_matrix(costs: DMatrix<f32>) -> Self {
        Self { costs }
    }

    pub fn segments(&self) -> usize {
        self.costs.nrows()
    }

    pub fn planes(&self) -> usize {
        self.costs.ncols()
    }

    #[inline]
    pub fn get(&self, segment: usize, plane: usize) -> f32 {
        self.costs[(segment, plane)]
    }

    #[inline]
    pub fn is_feasible(&self, segment: usize, plane: usize) -> bool {
        self.get(segment, plane) < INFEASIBLE_COST
    }

    /// Cheapest feasible plane for `segment`, lowest index on ties.
    pub fn best_plane(&self, segment: usize) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (plane, &c) in self.costs.row(segment).iter().enumerate() {
            if c >= INFEASIBLE_COST {
                continue;
            }
            match best {
                Some((_, b)) if c >= b => {}
                _ => best = Some((plane, c)),
            }
        }
        best.map(|(plane, _)| plane)
    }

    pub fn feasible_count(&self) -> usize {
        self.costs.iter().filter(|&&c| c < INFEASIBLE_COST).count()
    }

    pub fn as_matrix(&self) -> &DMatrix<f32> {
        &self.costs
    }
}

pub struct SegmentPlaneCostEvaluator<'a> {
    pair: &'a StereoPair<'a>,
    omega: f32,
}

impl<'a> SegmentPlaneCostEvaluator<'a> {
    pub fn new(pair: &'a StereoPair<'a>, omega: f32) -> Result<Self> {
        if !(0.0..=1.0).contains(&omega) {
            return Err(StereoError::InvalidBlendWeight(omega));
        }
        Ok(Self { pair, omega })
    }

    pub fn pair(&self) -> &StereoPair<'a> {
        self.pair
    }

    /// Total cost of explaining `pixels` with `plane`, or [`INFEASIBLE_COST`].
    pub fn segment_cost(&self, pixels: &[Pixel], plane: &Plane) -> f32 {
        let pair = self.pair;
        let max_rx = pair.width() as f32 - 2.0;
        let omega = self.omega;
        let mut total = 0.0f32;
        for p in pixels {
            let rx = (p.x as f32 + plane.disparity_at(p.x as f32, p.y as f32)).round();
            if !rx.is_finite() || rx < 0.0 || rx > max_rx {
                return INFEASIBLE_COST;
            }
            let rx = rx as usize;
            for c in 0..pair.channels() {
                let l = pair.left.plane(c).get(p.x, p.y);
                let r = pair.right.plane(c).get(rx, p.y);
                let gx = (pair.left_grad.dx(p.x, p.y, c) - pair.right_grad.dx(rx, p.y, c)).abs();
                let gy = (pair.left_grad.dy(p.x, p.y, c) - pair.right_grad.dy(rx, p.y, c)).abs();
                total += (1.0 - omega) * (r - l).abs() + omega * (gx + gy);
            }
        }
        total.min(INFEASIBLE_COST)
    }

    fn segment_row(&self, pixels: &[Pixel], planes: &[Option<Plane>]) -> Vec<f32> {
        planes
            .iter()
            .map(|plane| match plane {
                Some(plane) => self.segment_cost(pixels, plane),
                None => INFEASIBLE_COST,
            })
            .collect()
    }

    /// Score every segment against every plane (`segments × planes`).
    pub fn evaluate(
        &self,
        segmentation: &Segmentation,
        planes: &[Option<Plane>],
    ) -> Result<SegmentPlaneCostMatrix> {
        segmentation.check_extent(self.pair.width(), self.pair.height())?;
        segmentation.validate()?;
        let segments = segmentation.segments();

        #[cfg(feature = "parallel")]
        let rows: Vec<Vec<f32>> = segments
            .par_iter()
            .map(|s| self.segment_row(&s.pixels, planes))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let rows: Vec<Vec<f32>> = segments
            .iter()
            .map(|s| self.segment_row(&s.pixels, planes))
            .collect();

        let flat: Vec<f32> = rows.into_iter().flatten().collect();
        let matrix = SegmentPlaneCostMatrix::from_matrix(DMatrix::from_row_slice(
            segments.len(),
            planes.len(),
            &flat,
        ));
        log::debug!(
            "SegmentPlaneCostEvaluator: {}x{} matrix, {} feasible entries",
            matrix.segments(),
            matrix.planes(),
            matrix.feasible_count()
        );
        Ok(matrix)
    }
}
