use super::TimingBreakdown;
use crate::disparity::ConsistencyStats;
use crate::plane::{Degenerate, IterationStats, Plane, PlaneFit, RefineStage};
use crate::segmentation::{SegmentId, Segmentation};
use serde::Serialize;

/// Structured summary of a stereo run, written as JSON by the demos.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StereoReport {
    pub input: InputDescriptor,
    pub matching: MatchingStage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fit: Option<FitStage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refinement: Option<RefinementStage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub planes: Vec<PlaneRecord>,
    pub timings: TimingBreakdown,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segments: Option<usize>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingStage {
    pub min_disp: i32,
    pub max_disp: i32,
    pub omega: f32,
    pub window_radius: usize,
    pub materialized: bool,
    pub consistency: ConsistencyStats,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DegenerateRecord {
    pub segment: usize,
    #[serde(flatten)]
    pub reason: Degenerate,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FitStage {
    pub segments: usize,
    pub fitted: usize,
    pub degenerate: Vec<DegenerateRecord>,
}

impl FitStage {
    pub fn from_fit(fit: &PlaneFit) -> Self {
        Self {
            segments: fit.planes.len(),
            fitted: fit.fitted_count(),
            degenerate: fit
                .degenerate
                .iter()
                .map(|&(segment, reason)| DegenerateRecord { segment, reason })
                .collect(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefinementStage {
    pub iterations: Vec<IterationStats>,
    pub final_stage: RefineStage,
    pub final_segments: usize,
}

/// One plane slot of the final state; consumers must check `valid`.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaneRecord {
    pub segment: usize,
    pub id: SegmentId,
    pub pixels: usize,
    pub valid: bool,
    #[serde(flatten)]
    pub plane: Option<Plane>,
}

impl PlaneRecord {
    pub fn collect(segmentation: &Segmentation, planes: &[Option<Plane>]) -> Vec<Self> {
        segmentation
            .segments()
            .iter()
            .enumerate()
            .map(|(segment, s)| {
                let plane = planes.get(segment).copied().flatten();
                Self {
                    segment,
                    id: s.id,
                    pixels: s.len(),
                    valid: plane.is_some(),
                    plane,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plane_records_carry_validity_flag() {
        let seg = Segmentation::regular_grid(4, 2, 2);
        let records = PlaneRecord::collect(&seg, &[Some(Plane::new(0.5, 0.0, 3.0))]);
        assert_eq!(records.len(), 2);
        assert!(records[0].valid);
        assert!(!records[1].valid);

        let json = serde_json::to_value(&records).unwrap();
        assert_eq!(json[0]["slopeX"], 0.5);
        assert_eq!(json[0]["intercept"], 3.0);
        assert_eq!(json[1]["valid"], false);
        assert!(json[1].get("slopeX").is_none());
    }

    #[test]
    fn degenerate_reason_is_flattened() {
        let record = DegenerateRecord {
            segment: 3,
            reason: Degenerate::InsufficientRowPairs { pairs: 0 },
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["segment"], 3);
        assert_eq!(json["reason"], "insufficientRowPairs");
        assert_eq!(json["pairs"], 0);
    }
}
