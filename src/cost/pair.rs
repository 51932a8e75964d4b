use crate::error::{Result, StereoError};
use crate::image::{forward_gradients, Gradients, PlanarImage};

/// A rectified left/right image pair with cached forward gradients.
///
/// Construction is the single place where the shape contract is enforced:
/// both images must agree in width, height and channel count.
#[derive(Clone, Debug)]
pub struct StereoPair<'a> {
    pub left: &'a PlanarImage,
    pub right: &'a PlanarImage,
    pub left_grad: Gradients,
    pub right_grad: Gradients,
}

impl<'a> StereoPair<'a> {
    pub fn new(left: &'a PlanarImage, right: &'a PlanarImage) -> Result<Self> {
        if !left.same_shape(right) {
            let (left_w, left_h, left_c) = left.shape();
            let (right_w, right_h, right_c) = right.shape();
            return Err(StereoError::ShapeMismatch {
                left_w,
                left_h,
                left_c,
                right_w,
                right_h,
                right_c,
            });
        }
        Ok(Self {
            left,
            right,
            left_grad: forward_gradients(left),
            right_grad: forward_gradients(right),
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.left.width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.left.height()
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.left.channel_count()
    }
}
