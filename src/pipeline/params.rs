//! Parameter types configuring the stereo stages.
//!
//! Everything deserialises from JSON with per-field defaults, so a config
//! only needs to name the knobs it changes.

use crate::cost::{CostParams, DisparityRange};
use crate::disparity::ConsistencyFilter;
use crate::error::Result;
use crate::plane::{FitParams, RefineParams};
use serde::Deserialize;

/// Pipeline-wide parameters.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct StereoParams {
    pub matching: MatchParams,
    pub fit: FitParams,
    pub refine: RefineParams,
}

/// Dense matching and cross-check settings.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct MatchParams {
    /// Smallest candidate disparity (usually ≤ 0).
    pub min_disp: i32,
    /// Largest candidate disparity (usually ≥ 0).
    pub max_disp: i32,
    /// Blend between intensity SAD (0) and gradient differences (1).
    pub omega: f32,
    /// Half-size of the aggregation window.
    pub window_radius: usize,
    /// Largest accepted `|rev + fwd|` is just below this value.
    pub consistency_threshold: f32,
    /// Build the full cost volume instead of evaluating rows on demand.
    pub materialize_volume: bool,
}

impl Default for MatchParams {
    fn default() -> Self {
        Self {
            min_disp: 0,
            max_disp: 16,
            omega: 0.5,
            window_radius: 1,
            consistency_threshold: 2.0,
            materialize_volume: false,
        }
    }
}

impl MatchParams {
    pub fn range(&self) -> Result<DisparityRange> {
        DisparityRange::new(self.min_disp, self.max_disp)
    }

    pub fn to_cost_params(&self) -> Result<CostParams> {
        let range = self.range()?;
        if !range.contains(0) {
            log::warn!(
                "disparity range [{}, {}] excludes zero",
                range.min,
                range.max
            );
        }
        CostParams::new(range, self.omega, self.window_radius)
    }

    pub fn consistency_filter(&self) -> Result<ConsistencyFilter> {
        ConsistencyFilter::new(self.consistency_threshold)
    }

    /// Check every field without running anything.
    pub fn validate(&self) -> Result<()> {
        self.to_cost_params()?;
        self.consistency_filter()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StereoError;

    #[test]
    fn partial_json_keeps_defaults() {
        let params: StereoParams =
            serde_json::from_str(r#"{ "matching": { "max_disp": 32 }, "refine": { "iterations": 4 } }"#)
                .unwrap();
        assert_eq!(params.matching.min_disp, 0);
        assert_eq!(params.matching.max_disp, 32);
        assert_eq!(params.matching.omega, 0.5);
        assert_eq!(params.matching.window_radius, 1);
        assert_eq!(params.matching.consistency_threshold, 2.0);
        assert_eq!(params.fit.min_slope_pairs, 1);
        assert_eq!(params.refine.iterations, 4);
        assert!(params.refine.stop_on_fixed_point);
        assert!(params.matching.validate().is_ok());
    }

    #[test]
    fn invalid_fields_are_reported() {
        let bad_range = MatchParams {
            min_disp: 4,
            max_disp: 2,
            ..Default::default()
        };
        assert_eq!(
            bad_range.validate().unwrap_err(),
            StereoError::InvalidDisparityRange { min: 4, max: 2 }
        );
        let bad_threshold = MatchParams {
            consistency_threshold: -1.0,
            ..Default::default()
        };
        assert_eq!(
            bad_threshold.validate().unwrap_err(),
            StereoError::InvalidThreshold(-1.0)
        );
    }
}
