//! Matching cost between a rectified left/right pair.
//!
//! [`MatchingCost`] evaluates the windowed SAD + gradient cost lazily;
//! [`CostVolume`] materialises it as a `W × H × N` block. Both expose the
//! same row-slab interface through [`CostSource`], which is all the
//! winner-take-all selector needs.

pub mod matching;
pub mod pair;
pub mod range;
pub mod volume;

pub use matching::MatchingCost;
pub use pair::StereoPair;
pub use range::DisparityRange;
pub use volume::CostVolume;

use crate::error::{Result, StereoError};

/// Validated cost settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CostParams {
    /// Candidate disparities searched for each left pixel.
    pub range: DisparityRange,
    /// Blend between intensity SAD (0) and gradient differences (1).
    pub omega: f32,
    /// Half-size of the square aggregation window.
    pub window_radius: usize,
}

impl CostParams {
    pub fn new(range: DisparityRange, omega: f32, window_radius: usize) -> Result<Self> {
        if !(0.0..=1.0).contains(&omega) {
            return Err(StereoError::InvalidBlendWeight(omega));
        }
        if window_radius == 0 {
            return Err(StereoError::InvalidWindowRadius);
        }
        Ok(Self {
            range,
            omega,
            window_radius,
        })
    }
}

/// Anything that can produce per-row cost slabs.
///
/// `fill_row(y, out)` writes `out[x * n + k] = cost(x, y, range.min + k)` for
/// every column `x` and candidate index `k`, where `n = range.len()`.
pub trait CostSource: Sync {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn range(&self) -> DisparityRange;
    fn fill_row(&self, y: usize, out: &mut [f32]);

    /// Length of the slab expected by [`CostSource::fill_row`].
    fn row_len(&self) -> usize {
        self.width() * self.range().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_blend_and_radius() {
        let range = DisparityRange::new(0, 4).unwrap();
        assert!(CostParams::new(range, 0.5, 1).is_ok());
        assert_eq!(
            CostParams::new(range, 1.5, 1).unwrap_err(),
            StereoError::InvalidBlendWeight(1.5)
        );
        assert!(CostParams::new(range, f32::NAN, 1).is_err());
        assert_eq!(
            CostParams::new(range, 0.5, 0).unwrap_err(),
            StereoError::InvalidWindowRadius
        );
    }
}
