use super::{CostSource, DisparityRange};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Dense matching cost volume, laid out `[y][x][k]`.
///
/// Memory is `W·H·N` floats; prefer [`super::MatchingCost`] for large
/// ranges and materialise only when the costs are reused.
#[derive(Clone, Debug)]
pub struct CostVolume {
    w: usize,
    h: usize,
    range: DisparityRange,
    data: Vec<f32>,
}

impl CostVolume {
    /// Evaluate every `(x, y, d)` of `source` once.
    pub fn build<C: CostSource + ?Sized>(source: &C) -> Self {
        let w = source.width();
        let h = source.height();
        let range = source.range();
        let row_len = source.row_len();
        let mut data = vec![0.0f32; row_len * h];
        if row_len > 0 {
            #[cfg(feature = "parallel")]
            data.par_chunks_mut(row_len)
                .enumerate()
                .for_each(|(y, row)| source.fill_row(y, row));
            #[cfg(not(feature = "parallel"))]
            data.chunks_mut(row_len)
                .enumerate()
                .for_each(|(y, row)| source.fill_row(y, row));
        }
        log::debug!(
            "CostVolume::build {}x{} range [{}, {}] -> {} floats",
            w,
            h,
            range.min,
            range.max,
            data.len()
        );
        Self { w, h, range, data }
    }

    /// Cost at `(x, y, d)`; `None` outside the image or the range.
    pub fn get(&self, x: usize, y: usize, d: i32) -> Option<f32> {
        if x >= self.w || y >= self.h {
            return None;
        }
        let k = self.range.index_of(d)?;
        let n = self.range.len();
        Some(self.data[(y * self.w + x) * n + k])
    }

    /// Costs of row `y`, indexed `x * n + k`.
    pub fn row(&self, y: usize) -> &[f32] {
        let len = self.w * self.range.len();
        &self.data[y * len..(y + 1) * len]
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

impl CostSource for CostVolume {
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
        out.copy_from_slice(self.row(y));
    }
}
