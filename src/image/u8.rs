/// Borrowed 8-bit single-channel view over caller-owned memory.
#[derive(Clone, Debug)]
pub struct ImageU8<'a> {
    pub w: usize,
    pub h: usize,
    /// Row pitch in bytes; may exceed `w` for padded buffers.
    pub stride: usize,
    pub data: &'a [u8],
}

impl<'a> ImageU8<'a> {
    /// Tightly packed view (`stride == w`).
    pub fn packed(w: usize, h: usize, data: &'a [u8]) -> Self {
        Self {
            w,
            h,
            stride: w,
            data,
        }
    }
}

impl<'a> crate::image::traits::ImageView for ImageU8<'a> {
    type Pixel = u8;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn stride(&self) -> usize {
        self.stride
    }
    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.data[start..start + self.w]
    }
    #[inline]
    fn as_slice(&self) -> Option<&[u8]> {
        (self.stride == self.w).then_some(&self.data[..self.w * self.h])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::traits::ImageView;
    use crate::image::PlanarImage;

    #[test]
    fn padded_rows_skip_the_pitch() {
        // 3x2 image stored with a 4-byte pitch
        let data = [1u8, 2, 3, 99, 4, 5, 6, 99];
        let view = ImageU8 {
            w: 3,
            h: 2,
            stride: 4,
            data: &data,
        };
        assert_eq!(view.row(1), &[4u8, 5, 6]);
        assert!(view.as_slice().is_none());
        assert_eq!(view.sample_clamped(5, -3), 3);

        let img = PlanarImage::from_gray_u8(&view).unwrap();
        assert_eq!(img.shape(), (3, 2, 1));
        assert_eq!(img.get(2, 1, 0), 6.0);
        let packed = ImageU8::packed(2, 2, &data[..4]);
        assert_eq!(packed.as_slice(), Some(&data[..4]));
    }
}
