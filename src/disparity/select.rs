//! Bidirectional winner-take-all disparity selection.
//!
//! Forward: `d(x, y) = argmin_d cost(x, y, d)` scanning `d` upward from
//! `range.min`; an incumbent is only replaced by a strictly smaller cost, so
//! ties go to the first candidate.
//!
//! Reverse: the right image's view, `d'(x, y) = argmin cost(x + d', y, −d')`.
//! Candidates are scanned as `d' = −min, −min − 1, …, −max`, the mirror of the
//! forward order, so a flat cost resolves to `−min` exactly as the forward
//! pass resolves to `min`. Columns `x + d'` outside the image are clamped to
//! the border.
//!
//! Both passes are computed from one cost slab per row; rows are independent.
use super::DisparityMap;
use crate::cost::CostSource;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Forward (left→right) and reverse (right→left) winner-take-all maps.
#[derive(Clone, Debug)]
pub struct DisparityPair {
    pub forward: DisparityMap,
    pub reverse: DisparityMap,
}

fn select_row<C: CostSource + ?Sized>(source: &C, y: usize) -> (Vec<i16>, Vec<i16>) {
    let w = source.width();
    let range = source.range();
    let n = range.len();
    let mut slab = vec![0.0f32; source.row_len()];
    source.fill_row(y, &mut slab);

    let mut forward = Vec::with_capacity(w);
    for costs in slab.chunks_exact(n) {
        let mut best_k = 0usize;
        let mut best = costs[0];
        for (k, &c) in costs.iter().enumerate().skip(1) {
            if c < best {
                best = c;
                best_k = k;
            }
        }
        forward.push((range.min + best_k as i32) as i16);
    }

    let last = w as i64 - 1;
    let mut reverse = Vec::with_capacity(w);
    for xr in 0..w as i64 {
        let mut best_k = 0usize;
        let mut best = f32::INFINITY;
        for k in 0..n {
            let d = range.min as i64 + k as i64;
            let x = (xr - d).clamp(0, last) as usize;
            let c = slab[x * n + k];
            if k == 0 || c < best {
                best = c;
                best_k = k;
            }
        }
        reverse.push(-(range.min + best_k as i32) as i16);
    }
    (forward, reverse)
}

/// Run both winner-take-all passes over `source`.
pub fn select_disparities<C: CostSource + ?Sized>(source: &C) -> DisparityPair {
    let w = source.width();
    let h = source.height();
    let range = source.range();

    #[cfg(feature = "parallel")]
    let rows: Vec<(Vec<i16>, Vec<i16>)> = (0..h)
        .into_par_iter()
        .map(|y| select_row(source, y))
        .collect();
    #[cfg(not(feature = "parallel"))]
    let rows: Vec<(Vec<i16>, Vec<i16>)> = (0..h).map(|y| select_row(source, y)).collect();

    let mut fwd = Vec::with_capacity(w * h);
    let mut rev = Vec::with_capacity(w * h);
    for (f, r) in rows {
        fwd.extend(f);
        rev.extend(r);
    }
    log::debug!(
        "select_disparities {}x{} range [{}, {}]",
        w,
        h,
        range.min,
        range.max
    );
    DisparityPair {
        forward: DisparityMap::from_vec(w, h, range, fwd)
            .unwrap_or_else(|| DisparityMap::invalid(w, h, range)),
        reverse: DisparityMap::from_vec(w, h, range.mirrored(), rev)
            .unwrap_or_else(|| DisparityMap::invalid(w, h, range.mirrored())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::DisparityRange;

    /// Cost source backed by a closure, for exercising tie rules directly.
    struct FnCost<F> {
        w: usize,
        h: usize,
        range: DisparityRange,
        f: F,
    }

    impl<F: Fn(usize, usize, i32) -> f32 + Sync> CostSource for FnCost<F> {
        fn width(&self) -> usize {
            self.w
        }
        fn height(&self) -> usize {
            self.h
        }
        fn range(&self) -> DisparityRange {
            self.range
        }
        fn fill_row(&self, y: usize, out: &mut [f32]) {
            let n = self.range.len();
            for x in 0..self.w {
                for (k, d) in self.range.iter().enumerate() {
                    out[x * n + k] = (self.f)(x, y, d);
                }
            }
        }
    }

    #[test]
    fn flat_cost_picks_range_ends() {
        let source = FnCost {
            w: 6,
            h: 3,
            range: DisparityRange::new(-2, 3).unwrap(),
            f: |_, _, _| 1.0,
        };
        let pair = select_disparities(&source);
        assert!(pair.forward.as_slice().iter().all(|&d| d == -2));
        assert!(pair.reverse.as_slice().iter().all(|&d| d == 2));
        assert_eq!(pair.reverse.range(), DisparityRange::new(-3, 2).unwrap());
    }

    #[test]
    fn reverse_reads_the_matched_left_column() {
        // Left column x matches right column x + 2 perfectly.
        let source = FnCost {
            w: 10,
            h: 1,
            range: DisparityRange::new(0, 4).unwrap(),
            f: |_, _, d| if d == 2 { 0.0 } else { 5.0 },
        };
        let pair = select_disparities(&source);
        for x in 0..10 {
            assert_eq!(pair.forward.get(x, 0), Some(2));
            assert_eq!(pair.reverse.get(x, 0), Some(-2));
        }
    }

    #[test]
    fn reverse_uses_cost_of_left_pixel() {
        // Only left pixel 5 at d = 3 is cheap; the reverse pass must find it
        // from right pixel 8 and nowhere else.
        let source = FnCost {
            w: 10,
            h: 1,
            range: DisparityRange::new(0, 3).unwrap(),
            f: |x, _, d| if x == 5 && d == 3 { 0.0 } else { 1.0 + d as f32 },
        };
        let pair = select_disparities(&source);
        assert_eq!(pair.forward.get(5, 0), Some(3));
        assert_eq!(pair.forward.get(4, 0), Some(0));
        assert_eq!(pair.reverse.get(8, 0), Some(-3));
        assert_eq!(pair.reverse.get(7, 0), Some(0));
    }
}
