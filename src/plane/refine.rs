//! Reassign / merge / refit loop over segments and planes.
//!
//! One step walks `Initial → Scored → Reassigned → Merged → Refit`:
//!
//! 1. score every segment against every current plane,
//! 2. give each segment its cheapest plane (lowest index on ties),
//! 3. merge the segments that chose the same plane into one segment,
//! 4. refit one plane per merged segment against the pixel disparity map.
//!
//! Every step returns a fresh [`RefineState`]; the previous one is left
//! untouched. The segment count never grows. How many steps to take is the
//! caller's decision (`RefineParams::iterations`, one by default), with an
//! optional early stop once a step no longer merges anything.
use super::cost::{SegmentPlaneCostEvaluator, SegmentPlaneCostMatrix};
use super::fit::PlaneFitter;
use super::Plane;
use crate::disparity::DisparityMap;
use crate::error::Result;
use crate::segmentation::{Segment, SegmentId, Segmentation};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum RefineStage {
    Initial,
    Scored,
    Reassigned,
    Merged,
    Refit,
    Converged,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct RefineParams {
    /// Maximum number of reassign/merge/refit steps.
    pub iterations: usize,
    /// Stop early once a step leaves the segment count unchanged.
    pub stop_on_fixed_point: bool,
}

impl Default for RefineParams {
    fn default() -> Self {
        Self {
            iterations: 1,
            stop_on_fixed_point: true,
        }
    }
}

/// Segmentation and one plane slot per segment.
#[derive(Clone, Debug)]
pub struct RefineState {
    pub stage: RefineStage,
    pub segmentation: Segmentation,
    pub planes: Vec<Option<Plane>>,
}

impl RefineState {
    pub fn initial(segmentation: Segmentation, planes: Vec<Option<Plane>>) -> Self {
        Self {
            stage: RefineStage::Initial,
            segmentation,
            planes,
        }
    }
}

/// Everything one step computed, for inspection and reporting.
#[derive(Clone, Debug)]
pub struct RefineStep {
    pub state: RefineState,
    pub costs: SegmentPlaneCostMatrix,
    /// Chosen plane index per input segment.
    pub assignment: Vec<usize>,
    /// Plane index → input segments that chose it, ascending.
    pub groups: BTreeMap<usize, Vec<usize>>,
    /// Segments whose whole cost row was infeasible.
    pub infeasible_segments: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IterationStats {
    pub iteration: usize,
    pub segments_in: usize,
    pub segments_out: usize,
    pub infeasible_segments: usize,
    pub fitted_planes: usize,
}

#[derive(Clone, Debug)]
pub struct RefineOutcome {
    pub state: RefineState,
    pub iterations: Vec<IterationStats>,
}

/// Cheapest feasible plane per segment.
///
/// Ties go to the lowest plane index, and so does a segment whose whole row
/// is infeasible. Returns the assignment and the number of such segments.
pub fn assign_planes(costs: &SegmentPlaneCostMatrix) -> (Vec<usize>, usize) {
    let mut infeasible = 0usize;
    let assignment = (0..costs.segments())
        .map(|segment| {
            costs.best_plane(segment).unwrap_or_else(|| {
                infeasible += 1;
                0
            })
        })
        .collect();
    (assignment, infeasible)
}

/// Group segment indices by their chosen plane.
pub fn group_by_plane(assignment: &[usize]) -> BTreeMap<usize, Vec<usize>> {
    let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (segment, &plane) in assignment.iter().enumerate() {
        groups.entry(plane).or_default().push(segment);
    }
    groups
}

/// Union the pixels of each group; merged segments are numbered in plane
/// index order.
pub fn merge_groups(
    segmentation: &Segmentation,
    groups: &BTreeMap<usize, Vec<usize>>,
) -> Result<Segmentation> {
    let source = segmentation.segments();
    let merged = groups
        .values()
        .enumerate()
        .map(|(new_id, members)| {
            let pixels = members
                .iter()
                .flat_map(|&i| source[i].pixels.iter().copied())
                .collect();
            Segment::new(SegmentId(new_id as u32), pixels)
        })
        .collect();
    Segmentation::new(segmentation.width(), segmentation.height(), merged)
}

pub struct PlaneRefiner<'a> {
    evaluator: SegmentPlaneCostEvaluator<'a>,
    fitter: PlaneFitter,
    disparity: &'a DisparityMap,
    params: RefineParams,
}

impl<'a> PlaneRefiner<'a> {
    pub fn new(
        evaluator: SegmentPlaneCostEvaluator<'a>,
        fitter: PlaneFitter,
        disparity: &'a DisparityMap,
        params: RefineParams,
    ) -> Self {
        Self {
            evaluator,
            fitter,
            disparity,
            params,
        }
    }

    pub fn params(&self) -> &RefineParams {
        &self.params
    }

    /// One full reassign/merge/refit pass starting from `state`.
    pub fn step(&self, state: &RefineState) -> Result<RefineStep> {
        let costs = self
            .evaluator
            .evaluate(&state.segmentation, &state.planes)?;
        let (assignment, infeasible_segments) = assign_planes(&costs);
        let groups = group_by_plane(&assignment);
        let merged = merge_groups(&state.segmentation, &groups)?;
        let fit = self.fitter.fit(&merged, self.disparity)?;
        log::debug!(
            "PlaneRefiner::step {} -> {} segments ({} infeasible, {} fitted)",
            state.segmentation.len(),
            merged.len(),
            infeasible_segments,
            fit.fitted_count()
        );
        Ok(RefineStep {
            state: RefineState {
                stage: RefineStage::Refit,
                segmentation: merged,
                planes: fit.planes,
            },
            costs,
            assignment,
            groups,
            infeasible_segments,
        })
    }

    /// Repeat [`Self::step`] up to `params.iterations` times.
    pub fn run(&self, initial: RefineState) -> Result<RefineOutcome> {
        let mut state = initial;
        let mut iterations = Vec::new();
        for iteration in 0..self.params.iterations {
            let segments_in = state.segmentation.len();
            let step = self.step(&state)?;
            let segments_out = step.state.segmentation.len();
            iterations.push(IterationStats {
                iteration,
                segments_in,
                segments_out,
                infeasible_segments: step.infeasible_segments,
                fitted_planes: step.state.planes.iter().filter(|p| p.is_some()).count(),
            });
            state = step.state;
            if self.params.stop_on_fixed_point && segments_out == segments_in {
                state.stage = RefineStage::Converged;
                break;
            }
        }
        Ok(RefineOutcome { state, iterations })
    }
}
