#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod cost;
pub mod diagnostics;
pub mod disparity;
pub mod error;
pub mod image;
pub mod pipeline;
pub mod plane;
pub mod segmentation;

// Tool-side configuration for the demos.
pub mod config;

// --- High-level re-exports -------------------------------------------------

pub use crate::error::{Result, StereoError};
pub use crate::image::{ImageF32, PlanarImage};
pub use crate::pipeline::{
    compute_disparity, DisparityOutput, MatchParams, StereoOutput, StereoParams, StereoPipeline,
};
pub use crate::segmentation::{Pixel, Segment, SegmentId, Segmentation};

pub use crate::diagnostics::StereoReport;
pub use crate::disparity::{DisparityMap, INVALID_DISPARITY};
pub use crate::plane::{Plane, INFEASIBLE_COST};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use plane_stereo::prelude::*;
///
/// # fn main() -> plane_stereo::Result<()> {
/// let (w, h) = (64usize, 48usize);
/// let left = PlanarImage::from_interleaved_u8(w, h, 1, &vec![0u8; w * h])?;
/// let right = left.clone();
///
/// let out = compute_disparity(&left, &right, &MatchParams::default())?;
/// println!("valid={}", out.disparity.valid_count());
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::{ImageU8, PlanarImage};
    pub use crate::{compute_disparity, MatchParams, Segmentation, StereoParams, StereoPipeline};
}

// --- Stage-level API (for tools & advanced users) --------------------------

pub mod stages {
    pub use crate::cost::{
        CostParams, CostSource, CostVolume, DisparityRange, MatchingCost, StereoPair,
    };
    pub use crate::disparity::{
        select_disparities, ConsistencyFilter, ConsistencyStats, DisparityPair,
    };
    pub use crate::plane::refine::{assign_planes, group_by_plane, merge_groups};
    pub use crate::plane::{
        render_planes, Degenerate, FitParams, PlaneFit, PlaneFitter, PlaneRefiner, RefineParams,
        RefineStage, RefineState, SegmentPlaneCostEvaluator, SegmentPlaneCostMatrix,
    };
}
