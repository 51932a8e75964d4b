use crate::disparity::INVALID_DISPARITY;
use crate::error::{Result, StereoError};
use serde::Serialize;

/// Inclusive disparity search interval `[min, max]`.
///
/// `max` must stay below [`INVALID_DISPARITY`] and `-min` must be a valid
/// disparity too, since the reverse pass searches `[-max, -min]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DisparityRange {
    pub min: i32,
    pub max: i32,
}

impl DisparityRange {
    pub fn new(min: i32, max: i32) -> Result<Self> {
        let limit = INVALID_DISPARITY as i32;
        if min > max || max >= limit || min <= -limit {
            return Err(StereoError::InvalidDisparityRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// Number of candidate disparities.
    #[inline]
    pub fn len(&self) -> usize {
        (self.max - self.min + 1) as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn contains(&self, d: i32) -> bool {
        d >= self.min && d <= self.max
    }

    /// Position of `d` among the candidates, `None` outside the range.
    #[inline]
    pub fn index_of(&self, d: i32) -> Option<usize> {
        self.contains(d).then(|| (d - self.min) as usize)
    }

    /// Candidate disparities in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = i32> {
        self.min..=self.max
    }

    /// The range searched from the right image's point of view.
    pub fn mirrored(&self) -> Self {
        Self {
            min: -self.max,
            max: -self.min,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_and_mirrors() {
        let r = DisparityRange::new(-2, 5).unwrap();
        assert_eq!(r.len(), 8);
        assert_eq!(r.index_of(-2), Some(0));
        assert_eq!(r.index_of(5), Some(7));
        assert_eq!(r.index_of(6), None);
        assert_eq!(r.mirrored(), DisparityRange { min: -5, max: 2 });
        assert_eq!(r.iter().collect::<Vec<_>>(), (-2..=5).collect::<Vec<_>>());

        assert!(DisparityRange::new(3, 2).is_err());
        assert!(DisparityRange::new(0, i16::MAX as i32).is_err());
        assert!(DisparityRange::new(-(i16::MAX as i32), 0).is_err());
    }
}
