//! Piecewise-planar disparity: robust per-segment plane fits, the
//! segment × plane reprojection cost, and the reassign/merge/refit loop.
//!
//! A plane maps pixel coordinates to disparity,
//! `d(x, y) = slope_x·x + slope_y·y + intercept`. Segments without a usable
//! fit carry `None` in the plane list.

pub mod cost;
pub mod fit;
pub mod refine;
pub mod render;

pub use cost::{SegmentPlaneCostEvaluator, SegmentPlaneCostMatrix, INFEASIBLE_COST};
pub use fit::{Degenerate, FitParams, PlaneFit, PlaneFitter};
pub use refine::{
    IterationStats, PlaneRefiner, RefineOutcome, RefineParams, RefineStage, RefineState,
    RefineStep,
};
pub use render::render_planes;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plane {
    pub slope_x: f32,
    pub slope_y: f32,
    pub intercept: f32,
}

impl Plane {
    pub fn new(slope_x: f32, slope_y: f32, intercept: f32) -> Self {
        Self {
            slope_x,
            slope_y,
            intercept,
        }
    }

    /// Constant-disparity plane.
    pub fn fronto_parallel(d: f32) -> Self {
        Self::new(0.0, 0.0, d)
    }

    #[inline]
    pub fn disparity_at(&self, x: f32, y: f32) -> f32 {
        self.slope_x * x + self.slope_y * y + self.intercept
    }
}
