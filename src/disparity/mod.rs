//! Integer disparity maps and the winner-take-all / cross-check stages that
//! produce them.
//!
//! Holes are stored in-band as [`INVALID_DISPARITY`] (`i16::MAX`) so a map
//! stays a flat `Vec<i16>`; the public accessors surface them as `None`.

pub mod consistency;
pub mod select;

pub use consistency::{ConsistencyFilter, ConsistencyStats};
pub use select::{select_disparities, DisparityPair};

use crate::cost::DisparityRange;
use crate::image::ImageF32;

/// Reserved "no valid disparity" value.
pub const INVALID_DISPARITY: i16 = i16::MAX;

#[derive(Clone, Debug, PartialEq)]
pub struct DisparityMap {
    w: usize,
    h: usize,
    range: DisparityRange,
    data: Vec<i16>,
}

impl DisparityMap {
    /// Map of size `w × h` with every cell a hole.
    pub fn invalid(w: usize, h: usize, range: DisparityRange) -> Self {
        Self {
            w,
            h,
            range,
            data: vec![INVALID_DISPARITY; w * h],
        }
    }

    /// Wrap a row-major buffer. Returns `None` on a length mismatch.
    pub fn from_vec(w: usize, h: usize, range: DisparityRange, data: Vec<i16>) -> Option<Self> {
        (data.len() == w * h).then_some(Self { w, h, range, data })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.w
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.h
    }

    /// Range the stored disparities were selected from.
    #[inline]
    pub fn range(&self) -> DisparityRange {
        self.range
    }

    /// Raw cell value, [`INVALID_DISPARITY`] for holes.
    #[inline]
    pub fn raw(&self, x: usize, y: usize) -> i16 {
        self.data[y * self.w + x]
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<i16> {
        let v = self.raw(x, y);
        (v != INVALID_DISPARITY).then_some(v)
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, d: Option<i16>) {
        self.data[y * self.w + x] = d.unwrap_or(INVALID_DISPARITY);
    }

    pub fn as_slice(&self) -> &[i16] {
        &self.data
    }

    pub fn valid_count(&self) -> usize {
        self.data.iter().filter(|&&d| d != INVALID_DISPARITY).count()
    }

    /// Valid cells as `(x, y, d)` in row-major order.
    pub fn iter_valid(&self) -> impl Iterator<Item = (usize, usize, i16)> + '_ {
        let w = self.w;
        self.data
            .iter()
            .enumerate()
            .filter(|(_, &d)| d != INVALID_DISPARITY)
            .map(move |(i, &d)| (i % w, i / w, d))
    }

    /// Float copy with holes mapped to `NaN`.
    pub fn to_image_f32(&self) -> ImageF32 {
        let mut img = ImageF32::filled(self.w, self.h, f32::NAN);
        for (x, y, d) in self.iter_valid() {
            img.set(x, y, d as f32);
        }
        img
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holes_read_as_none() {
        let range = DisparityRange::new(-2, 3).unwrap();
        let mut map = DisparityMap::invalid(3, 2, range);
        assert_eq!(map.valid_count(), 0);
        map.set(1, 0, Some(-2));
        map.set(2, 1, Some(3));
        assert_eq!(map.get(1, 0), Some(-2));
        assert_eq!(map.get(0, 0), None);
        assert_eq!(map.raw(0, 1), INVALID_DISPARITY);
        assert_eq!(
            map.iter_valid().collect::<Vec<_>>(),
            vec![(1, 0, -2), (2, 1, 3)]
        );
        let img = map.to_image_f32();
        assert!(img.get(0, 0).is_nan());
        assert_eq!(img.get(2, 1), 3.0);
        assert!(DisparityMap::from_vec(3, 2, range, vec![0; 5]).is_none());
    }
}
