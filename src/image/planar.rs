//! Owned multi-channel image stored as one [`ImageF32`] plane per channel.
//!
//! Matching costs are summed over channels, so the container only promises
//! that every plane shares one width and height. Channel semantics (gray,
//! RGB, L*a*b*) are the caller's business.
use super::traits::ImageView;
use super::{ImageF32, ImageU8};
use crate::error::{Result, StereoError};

#[derive(Clone, Debug, PartialEq)]
pub struct PlanarImage {
    w: usize,
    h: usize,
    planes: Vec<ImageF32>,
}

impl PlanarImage {
    /// Assemble an image from per-channel planes of identical size.
    pub fn from_planes(planes: Vec<ImageF32>) -> Result<Self> {
        let first = planes.first().ok_or(StereoError::EmptyImage)?;
        let (w, h) = (first.w, first.h);
        if w == 0 || h == 0 {
            return Err(StereoError::EmptyImage);
        }
        for (channel, plane) in planes.iter().enumerate() {
            if plane.w != w || plane.h != h {
                return Err(StereoError::ChannelMismatch {
                    channel,
                    got_w: plane.w,
                    got_h: plane.h,
                    expected_w: w,
                    expected_h: h,
                });
            }
        }
        Ok(Self { w, h, planes })
    }

    /// Single-channel image from a float plane.
    pub fn from_gray(plane: ImageF32) -> Result<Self> {
        Self::from_planes(vec![plane])
    }

    /// Single-channel image from a borrowed 8-bit view.
    pub fn from_gray_u8(view: &ImageU8<'_>) -> Result<Self> {
        let mut plane = ImageF32::new(view.w, view.h);
        for y in 0..view.h {
            for (x, &v) in view.row(y).iter().enumerate() {
                plane.set(x, y, v as f32);
            }
        }
        Self::from_gray(plane)
    }

    /// De-interleave a packed `u8` buffer (`channels` samples per pixel).
    pub fn from_interleaved_u8(w: usize, h: usize, channels: usize, data: &[u8]) -> Result<Self> {
        Self::deinterleave(w, h, channels, data, |v| v as f32)
    }

    /// De-interleave a packed `f32` buffer (`channels` samples per pixel).
    pub fn from_interleaved_f32(
        w: usize,
        h: usize,
        channels: usize,
        data: &[f32],
    ) -> Result<Self> {
        Self::deinterleave(w, h, channels, data, |v| v)
    }

    fn deinterleave<T: Copy>(
        w: usize,
        h: usize,
        channels: usize,
        data: &[T],
        convert: impl Fn(T) -> f32,
    ) -> Result<Self> {
        if channels == 0 || w == 0 || h == 0 {
            return Err(StereoError::EmptyImage);
        }
        let expected = w * h * channels;
        if data.len() != expected {
            return Err(StereoError::BufferLength {
                got: data.len(),
                expected,
            });
        }
        let mut planes = vec![ImageF32::new(w, h); channels];
        for (i, px) in data.chunks_exact(channels).enumerate() {
            for (plane, &v) in planes.iter_mut().zip(px) {
                plane.data[i] = convert(v);
            }
        }
        Self::from_planes(planes)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.w
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.h
    }

    #[inline]
    pub fn channel_count(&self) -> usize {
        self.planes.len()
    }

    #[inline]
    pub fn plane(&self, c: usize) -> &ImageF32 {
        &self.planes[c]
    }

    #[inline]
    pub fn planes(&self) -> &[ImageF32] {
        &self.planes
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, c: usize) -> f32 {
        self.planes[c].get(x, y)
    }

    /// Width, height and channel count.
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.w, self.h, self.planes.len())
    }

    pub fn same_shape(&self, other: &PlanarImage) -> bool {
        self.shape() == other.shape()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interleaved_buffer_splits_into_planes() {
        let data = [1u8, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];
        let img = PlanarImage::from_interleaved_u8(2, 2, 3, &data).unwrap();
        assert_eq!(img.shape(), (2, 2, 3));
        assert_eq!(img.get(0, 0, 0), 1.0);
        assert_eq!(img.get(1, 0, 2), 6.0);
        assert_eq!(img.get(1, 1, 1), 11.0);
    }

    #[test]
    fn rejects_short_buffer_and_mixed_planes() {
        let err = PlanarImage::from_interleaved_u8(2, 2, 3, &[0u8; 11]).unwrap_err();
        assert_eq!(
            err,
            StereoError::BufferLength {
                got: 11,
                expected: 12
            }
        );
        let err =
            PlanarImage::from_planes(vec![ImageF32::new(4, 4), ImageF32::new(4, 3)]).unwrap_err();
        assert!(matches!(err, StereoError::ChannelMismatch { channel: 1, .. }));
        assert_eq!(
            PlanarImage::from_planes(Vec::new()).unwrap_err(),
            StereoError::EmptyImage
        );
    }
}
