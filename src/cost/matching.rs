//! Windowed intensity + gradient matching cost.
//!
//! For a left pixel `(x, y)` and disparity `d` the match in the right image
//! is `(x + d, y)`. The cost blends
//!
//! - `SAD`: absolute colour differences over the `(2r+1)×(2r+1)` window, and
//! - `GRAD`: absolute differences of forward gradients (∂x and ∂y) over the
//!   causal half `i ∈ [−r, 0]`, `j ∈ [−r, r]` of that window,
//!
//! as `(1 − ω)·SAD + ω·GRAD`, summed over all channels.
//!
//! Border policy: the window centre is clamped so that the window and its
//! shifted copy stay inside the image (x into `[max(−min, r), W − max − 1 − r]`,
//! y into `[r, H − 1 − r]`). Border pixels therefore reuse the nearest interior
//! cost. If the image is too small for such an interval the centre stays
//! put; individual samples are always clamped into the image.
use super::{CostParams, CostSource, DisparityRange, StereoPair};
use crate::image::ImageView;

/// On-demand evaluation of the matching cost; never materialises the volume.
pub struct MatchingCost<'a> {
    pair: &'a StereoPair<'a>,
    params: CostParams,
    x_span: Option<(isize, isize)>,
    y_span: Option<(isize, isize)>,
}

fn span(lo: isize, hi: isize) -> Option<(isize, isize)> {
    (lo <= hi).then_some((lo, hi))
}

impl<'a> MatchingCost<'a> {
    pub fn new(pair: &'a StereoPair<'a>, params: CostParams) -> Self {
        let w = pair.width() as isize;
        let h = pair.height() as isize;
        let r = params.window_radius as isize;
        let range = params.range;
        let x_span = span(
            (-(range.min as isize)).max(r),
            w - range.max as isize - 1 - r,
        );
        let y_span = span(r, h - 1 - r);
        if x_span.is_none() {
            log::debug!(
                "MatchingCost: width {} too small for range [{}, {}] with radius {}, centres left unclamped",
                w,
                range.min,
                range.max,
                r
            );
        }
        Self {
            pair,
            params,
            x_span,
            y_span,
        }
    }

    pub fn params(&self) -> &CostParams {
        &self.params
    }

    #[inline]
    fn centre(v: isize, span: Option<(isize, isize)>) -> isize {
        match span {
            Some((lo, hi)) => v.clamp(lo, hi),
            None => v,
        }
    }

    /// Cost of matching left `(x, y)` with right `(x + d, y)`.
    ///
    /// Defined for any `x`, `y` (including outside the image) and any `d`;
    /// always non-negative.
    pub fn cost(&self, x: isize, y: isize, d: i32) -> f32 {
        let pair = self.pair;
        let r = self.params.window_radius as isize;
        let d = d as isize;
        let cx = Self::centre(x, self.x_span);
        let cy = Self::centre(y, self.y_span);

        let mut sad = 0.0f32;
        let mut grad = 0.0f32;
        for j in -r..=r {
            let sy = cy + j;
            for i in -r..=r {
                let lx = cx + i;
                let rx = lx + d;
                for c in 0..pair.channels() {
                    let l = pair.left.plane(c);
                    let rt = pair.right.plane(c);
                    sad += (l.sample_clamped(lx, sy) - rt.sample_clamped(rx, sy)).abs();
                    if i <= 0 {
                        let (lg, rg) = (&pair.left_grad, &pair.right_grad);
                        grad += (lg.gx[c].sample_clamped(lx, sy) - rg.gx[c].sample_clamped(rx, sy))
                            .abs()
                            + (lg.gy[c].sample_clamped(lx, sy) - rg.gy[c].sample_clamped(rx, sy))
                                .abs();
                    }
                }
            }
        }
        let omega = self.params.omega;
        (1.0 - omega) * sad + omega * grad
    }
}

impl CostSource for MatchingCost<'_> {
    fn width(&self) -> usize {
        self.pair.width()
    }

    fn height(&self) -> usize {
        self.pair.height()
    }

    fn range(&self) -> DisparityRange {
        self.params.range
    }

    fn fill_row(&self, y: usize, out: &mut [f32]) {
        let n = self.params.range.len();
        debug_assert_eq!(out.len(), self.pair.width() * n);
        for (x, slab) in out.chunks_exact_mut(n).enumerate() {
            for (slot, d) in slab.iter_mut().zip(self.params.range.iter()) {
                *slot = self.cost(x as isize, y as isize, d);
            }
        }
    }
}
