//! End-to-end stereo driver.
//!
//! [`StereoPipeline`] chains the stages on a rectified pair and an external
//! segmentation:
//!
//! 1. matching cost + bidirectional winner-take-all,
//! 2. left/right consistency check,
//! 3. per-segment plane fit on the surviving disparities,
//! 4. reassign/merge/refit refinement,
//! 5. rendering of the final planes into a dense disparity image.
//!
//! [`compute_disparity`] runs stages 1–2 alone.
//!
//! ```no_run
//! use plane_stereo::{PlanarImage, Segmentation, StereoParams, StereoPipeline};
//!
//! # fn example(left: PlanarImage, right: PlanarImage) -> plane_stereo::Result<()> {
//! let segmentation = Segmentation::regular_grid(left.width(), left.height(), 16);
//! let pipeline = StereoPipeline::new(StereoParams::default());
//! let out = pipeline.run(&left, &right, &segmentation)?;
//! println!("{} planar segments", out.segmentation.len());
//! # Ok(())
//! # }
//! ```

pub mod params;

pub use params::{MatchParams, StereoParams};

use crate::cost::{CostVolume, MatchingCost, StereoPair};
use crate::diagnostics::timing::elapsed_ms;
use crate::diagnostics::{
    FitStage, InputDescriptor, MatchingStage, PlaneRecord, RefinementStage, StereoReport,
    TimingBreakdown,
};
use crate::disparity::{select_disparities, ConsistencyStats, DisparityMap, DisparityPair};
use crate::error::Result;
use crate::image::{ImageF32, PlanarImage};
use crate::plane::{
    render_planes, Plane, PlaneFitter, PlaneRefiner, RefineState, SegmentPlaneCostEvaluator,
};
use crate::segmentation::Segmentation;
use log::debug;
use std::time::Instant;

/// Result of the matching half of the pipeline.
#[derive(Clone, Debug)]
pub struct DisparityOutput {
    /// Raw forward winner-take-all map.
    pub forward: DisparityMap,
    /// Raw reverse winner-take-all map (right image's view).
    pub reverse: DisparityMap,
    /// Forward map with inconsistent pixels turned into holes.
    pub disparity: DisparityMap,
    pub consistency: ConsistencyStats,
}

#[derive(Clone, Debug)]
pub struct StereoOutput {
    pub disparity: DisparityOutput,
    /// Refined (merged) segmentation.
    pub segmentation: Segmentation,
    /// One plane slot per refined segment.
    pub planes: Vec<Option<Plane>>,
    /// Dense piecewise-planar disparity, `NaN` without a plane.
    pub dense: ImageF32,
    pub report: StereoReport,
}

fn match_pair(
    pair: &StereoPair<'_>,
    params: &MatchParams,
    timings: &mut TimingBreakdown,
) -> Result<DisparityOutput> {
    let cost_params = params.to_cost_params()?;
    let filter = params.consistency_filter()?;
    let lazy = MatchingCost::new(pair, cost_params);

    let DisparityPair { forward, reverse } = if params.materialize_volume {
        let volume = timings.measure("cost_volume", || CostVolume::build(&lazy));
        timings.measure("select", || select_disparities(&volume))
    } else {
        timings.measure("select", || select_disparities(&lazy))
    };
    let (disparity, consistency) =
        timings.measure("consistency", || filter.apply(&forward, &reverse))?;
    Ok(DisparityOutput {
        forward,
        reverse,
        disparity,
        consistency,
    })
}

fn matching_stage(params: &MatchParams, consistency: ConsistencyStats) -> MatchingStage {
    MatchingStage {
        min_disp: params.min_disp,
        max_disp: params.max_disp,
        omega: params.omega,
        window_radius: params.window_radius,
        materialized: params.materialize_volume,
        consistency,
    }
}

/// Dense matching and cross-check only.
pub fn compute_disparity(
    left: &PlanarImage,
    right: &PlanarImage,
    params: &MatchParams,
) -> Result<DisparityOutput> {
    let pair = StereoPair::new(left, right)?;
    let mut timings = TimingBreakdown::default();
    match_pair(&pair, params, &mut timings)
}

pub struct StereoPipeline {
    params: StereoParams,
}

impl StereoPipeline {
    pub fn new(params: StereoParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &StereoParams {
        &self.params
    }

    /// Matching half with a report, for tools that stop at the pixel map.
    pub fn run_disparity(
        &self,
        left: &PlanarImage,
        right: &PlanarImage,
    ) -> Result<(DisparityOutput, StereoReport)> {
        let total_start = Instant::now();
        let pair = StereoPair::new(left, right)?;
        let mut timings = TimingBreakdown::default();
        let out = match_pair(&pair, &self.params.matching, &mut timings)?;
        timings.total_ms = elapsed_ms(total_start);
        let (width, height, channels) = left.shape();
        let report = StereoReport {
            input: InputDescriptor {
                width,
                height,
                channels,
                segments: None,
            },
            matching: matching_stage(&self.params.matching, out.consistency),
            fit: None,
            refinement: None,
            planes: Vec::new(),
            timings,
        };
        Ok((out, report))
    }

    /// Full pipeline on a rectified pair and a segmentation of the left image.
    pub fn run(
        &self,
        left: &PlanarImage,
        right: &PlanarImage,
        segmentation: &Segmentation,
    ) -> Result<StereoOutput> {
        let total_start = Instant::now();
        let pair = StereoPair::new(left, right)?;
        segmentation.check_extent(pair.width(), pair.height())?;
        segmentation.validate()?;
        debug!(
            "StereoPipeline::run start w={} h={} c={} segments={}",
            pair.width(),
            pair.height(),
            pair.channels(),
            segmentation.len()
        );

        let mut timings = TimingBreakdown::default();
        let matching = match_pair(&pair, &self.params.matching, &mut timings)?;

        let fitter = PlaneFitter::new(self.params.fit.clone());
        let fit = timings.measure("fit", || fitter.fit(segmentation, &matching.disparity))?;
        let fit_stage = FitStage::from_fit(&fit);

        let evaluator = SegmentPlaneCostEvaluator::new(&pair, self.params.matching.omega)?;
        let refiner = PlaneRefiner::new(
            evaluator,
            fitter,
            &matching.disparity,
            self.params.refine.clone(),
        );
        let initial = RefineState::initial(segmentation.clone(), fit.planes);
        let outcome = timings.measure("refine", || refiner.run(initial))?;

        let state = outcome.state;
        let dense = timings.measure("render", || {
            render_planes(&state.segmentation, &state.planes)
        });
        timings.total_ms = elapsed_ms(total_start);

        let report = StereoReport {
            input: InputDescriptor {
                width: pair.width(),
                height: pair.height(),
                channels: pair.channels(),
                segments: Some(segmentation.len()),
            },
            matching: matching_stage(&self.params.matching, matching.consistency),
            fit: Some(fit_stage),
            refinement: Some(RefinementStage {
                iterations: outcome.iterations,
                final_stage: state.stage,
                final_segments: state.segmentation.len(),
            }),
            planes: PlaneRecord::collect(&state.segmentation, &state.planes),
            timings,
        };
        debug!(
            "StereoPipeline::run done: {} valid pixels, {} -> {} segments in {:.2} ms",
            matching.consistency.valid,
            segmentation.len(),
            state.segmentation.len(),
            report.timings.total_ms
        );

        Ok(StereoOutput {
            disparity: matching,
            segmentation: state.segmentation,
            planes: state.planes,
            dense,
            report,
        })
    }
}
