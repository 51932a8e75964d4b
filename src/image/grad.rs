//! Forward-difference image gradients, one pair of planes per channel.
//!
//! - `gx(x, y) = I(x + 1, y) − I(x, y)`, `gy(x, y) = I(x, y + 1) − I(x, y)`.
//! - The last column of `gx` and the last row of `gy` are zero (Neumann
//!   border), so every pixel has a defined gradient.
//!
//! Complexity: O(W·H·C); memory: two float planes per channel.
use super::traits::{ImageView, ImageViewMut};
use super::{ImageF32, PlanarImage};

/// Per-channel horizontal and vertical forward differences.
#[derive(Clone, Debug)]
pub struct Gradients {
    /// Horizontal derivative per channel
    pub gx: Vec<ImageF32>,
    /// Vertical derivative per channel
    pub gy: Vec<ImageF32>,
}

impl Gradients {
    #[inline]
    pub fn dx(&self, x: usize, y: usize, c: usize) -> f32 {
        self.gx[c].get(x, y)
    }

    #[inline]
    pub fn dy(&self, x: usize, y: usize, c: usize) -> f32 {
        self.gy[c].get(x, y)
    }
}

fn forward_difference(l: &ImageF32) -> (ImageF32, ImageF32) {
    let w = l.w;
    let h = l.h;
    let mut gx = ImageF32::new(w, h);
    let mut gy = ImageF32::new(w, h);
    if w == 0 || h == 0 {
        return (gx, gy);
    }

    for y in 0..h {
        let row = l.row(y);
        let out_gx = gx.row_mut(y);
        for x in 0..w - 1 {
            out_gx[x] = row[x + 1] - row[x];
        }
        if y + 1 < h {
            let next = l.row(y + 1);
            let out_gy = gy.row_mut(y);
            for x in 0..w {
                out_gy[x] = next[x] - row[x];
            }
        }
    }
    (gx, gy)
}

/// Compute forward-difference gradients for every channel of `img`.
pub fn forward_gradients(img: &PlanarImage) -> Gradients {
    let (gx, gy): (Vec<ImageF32>, Vec<ImageF32>) =
        img.planes().iter().map(forward_difference).unzip();
    Gradients { gx, gy }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_has_constant_gradient_and_zero_border() {
        let mut plane = ImageF32::new(4, 3);
        for y in 0..3 {
            for x in 0..4 {
                plane.set(x, y, 2.0 * x as f32 + 5.0 * y as f32);
            }
        }
        let img = PlanarImage::from_gray(plane).unwrap();
        let g = forward_gradients(&img);
        assert_eq!(g.gx.len(), 1);
        for y in 0..3 {
            for x in 0..3 {
                assert_eq!(g.dx(x, y, 0), 2.0);
            }
            assert_eq!(g.dx(3, y, 0), 0.0);
        }
        for x in 0..4 {
            assert_eq!(g.dy(x, 0, 0), 5.0);
            assert_eq!(g.dy(x, 1, 0), 5.0);
            assert_eq!(g.dy(x, 2, 0), 0.0);
        }
    }
}
