use super::DisparityMap;
use crate::error::{Result, StereoError};
use serde::Serialize;

/// Left/right cross-check.
///
/// A forward disparity `d` at `(x, y)` survives when the reverse map at
/// `(x + d, y)` points back within `threshold`: `|rev + d| < threshold`.
/// Pixels whose match leaves the image, or lands on a reverse hole, become
/// holes themselves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConsistencyFilter {
    threshold: f32,
}

impl Default for ConsistencyFilter {
    fn default() -> Self {
        Self { threshold: 2.0 }
    }
}

/// Outcome counters of one cross-check.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsistencyStats {
    pub total: usize,
    pub valid: usize,
    pub out_of_bounds: usize,
    pub inconsistent: usize,
}

impl ConsistencyFilter {
    pub fn new(threshold: f32) -> Result<Self> {
        if threshold.is_nan() || threshold <= 0.0 {
            return Err(StereoError::InvalidThreshold(threshold));
        }
        Ok(Self { threshold })
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn apply(
        &self,
        forward: &DisparityMap,
        reverse: &DisparityMap,
    ) -> Result<(DisparityMap, ConsistencyStats)> {
        let (w, h) = (forward.width(), forward.height());
        if reverse.width() != w || reverse.height() != h {
            return Err(StereoError::DisparityShapeMismatch {
                a_w: w,
                a_h: h,
                b_w: reverse.width(),
                b_h: reverse.height(),
            });
        }

        let mut out = DisparityMap::invalid(w, h, forward.range());
        let mut stats = ConsistencyStats {
            total: w * h,
            ..Default::default()
        };
        for y in 0..h {
            for x in 0..w {
                let Some(d) = forward.get(x, y) else {
                    stats.inconsistent += 1;
                    continue;
                };
                let xr = x as i64 + d as i64;
                if xr < 0 || xr >= w as i64 {
                    stats.out_of_bounds += 1;
                    continue;
                }
                match reverse.get(xr as usize, y) {
                    Some(r) if ((r as f32) + (d as f32)).abs() < self.threshold => {
                        out.set(x, y, Some(d));
                        stats.valid += 1;
                    }
                    _ => stats.inconsistent += 1,
                }
            }
        }
        log::debug!(
            "ConsistencyFilter: {}/{} valid, {} out of bounds, {} inconsistent",
            stats.valid,
            stats.total,
            stats.out_of_bounds,
            stats.inconsistent
        );
        Ok((out, stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::DisparityRange;

    fn map(w: usize, h: usize, data: Vec<i16>) -> DisparityMap {
        DisparityMap::from_vec(w, h, DisparityRange::new(-3, 3).unwrap(), data).unwrap()
    }

    #[test]
    fn keeps_round_trips_and_drops_the_rest() {
        let forward = map(5, 1, vec![1, 1, 0, 2, 1]);
        //                 x + d:   1  2  2  5  5
        let reverse = map(5, 1, vec![0, -1, 1, 0, 0]);
        let filter = ConsistencyFilter::default();
        let (out, stats) = filter.apply(&forward, &reverse).unwrap();

        assert_eq!(out.get(0, 0), Some(1));
        // reverse(2) = 1, |1 + 1| = 2 is not below the threshold
        assert_eq!(out.get(1, 0), None);
        // reverse(2) = 1, |1 + 0| = 1
        assert_eq!(out.get(2, 0), Some(0));
        assert_eq!(out.get(3, 0), None);
        assert_eq!(out.get(4, 0), None);
        assert_eq!(
            stats,
            ConsistencyStats {
                total: 5,
                valid: 2,
                out_of_bounds: 2,
                inconsistent: 1
            }
        );
    }

    #[test]
    fn reverse_holes_invalidate() {
        let forward = map(3, 1, vec![0, 0, 0]);
        let mut reverse = map(3, 1, vec![0, 0, 0]);
        reverse.set(1, 0, None);
        let (out, _) = ConsistencyFilter::default()
            .apply(&forward, &reverse)
            .unwrap();
        assert_eq!(out.valid_count(), 2);
        assert_eq!(out.get(1, 0), None);
    }

    #[test]
    fn rejects_bad_threshold_and_shapes() {
        assert!(ConsistencyFilter::new(0.0).is_err());
        assert!(ConsistencyFilter::new(f32::NAN).is_err());
        let a = map(3, 1, vec![0; 3]);
        let b = map(1, 3, vec![0; 3]);
        assert!(matches!(
            ConsistencyFilter::default().apply(&a, &b),
            Err(StereoError::DisparityShapeMismatch { .. })
        ));
    }
}
