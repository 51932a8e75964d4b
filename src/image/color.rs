//! Colour-space handling for matching inputs.
//!
//! Absolute-difference costs assume commensurable channels. Colour input
//! defaults to CIE L*a*b*; plain RGB and single-channel luma are also
//! accepted.
use super::{ImageF32, PlanarImage};
use crate::error::{Result, StereoError};
use serde::Deserialize;

/// Channel layout requested when converting 8-bit RGB input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorSpace {
    /// Single luma channel (Rec. 601 weights).
    Gray,
    /// Raw R, G, B samples in [0, 255].
    Rgb,
    /// CIE L*a*b* under D65, L in [0, 100].
    #[default]
    Lab,
}

impl ColorSpace {
    pub fn channels(self) -> usize {
        match self {
            ColorSpace::Gray => 1,
            ColorSpace::Rgb | ColorSpace::Lab => 3,
        }
    }
}

// sRGB (D65) -> XYZ
const RGB_TO_XYZ: [[f32; 3]; 3] = [
    [0.412_456_4, 0.357_576_1, 0.180_437_5],
    [0.212_672_9, 0.715_152_2, 0.072_175_0],
    [0.019_333_9, 0.119_192, 0.950_304_1],
];
const WHITE_D65: [f32; 3] = [0.950_47, 1.0, 1.088_83];

#[inline]
fn srgb_to_linear(v: f32) -> f32 {
    if v <= 0.040_45 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

#[inline]
fn lab_f(t: f32) -> f32 {
    const DELTA: f32 = 6.0 / 29.0;
    if t > DELTA * DELTA * DELTA {
        t.cbrt()
    } else {
        t / (3.0 * DELTA * DELTA) + 4.0 / 29.0
    }
}

/// Convert one 8-bit sRGB triple to L*a*b*.
pub fn rgb_to_lab(rgb: [u8; 3]) -> [f32; 3] {
    let lin = rgb.map(|v| srgb_to_linear(v as f32 / 255.0));
    let mut xyz = [0.0f32; 3];
    for (out, coeffs) in xyz.iter_mut().zip(RGB_TO_XYZ.iter()) {
        *out = coeffs[0] * lin[0] + coeffs[1] * lin[1] + coeffs[2] * lin[2];
    }
    let fx = lab_f(xyz[0] / WHITE_D65[0]);
    let fy = lab_f(xyz[1] / WHITE_D65[1]);
    let fz = lab_f(xyz[2] / WHITE_D65[2]);
    [116.0 * fy - 16.0, 500.0 * (fx - fy), 200.0 * (fy - fz)]
}

#[inline]
fn luma(rgb: [u8; 3]) -> f32 {
    0.299 * rgb[0] as f32 + 0.587 * rgb[1] as f32 + 0.114 * rgb[2] as f32
}

fn map_pixels<const N: usize>(
    w: usize,
    h: usize,
    rgb: &[u8],
    convert: impl Fn([u8; 3]) -> [f32; N],
) -> Result<PlanarImage> {
    let expected = w * h * 3;
    if rgb.len() != expected {
        return Err(StereoError::BufferLength {
            got: rgb.len(),
            expected,
        });
    }
    let mut planes = vec![ImageF32::new(w, h); N];
    for (i, px) in rgb.chunks_exact(3).enumerate() {
        let values = convert([px[0], px[1], px[2]]);
        for (plane, v) in planes.iter_mut().zip(values) {
            plane.data[i] = v;
        }
    }
    PlanarImage::from_planes(planes)
}

/// Build a [`PlanarImage`] from packed 8-bit RGB in the requested space.
pub fn planar_from_rgb8(w: usize, h: usize, rgb: &[u8], space: ColorSpace) -> Result<PlanarImage> {
    match space {
        ColorSpace::Rgb => PlanarImage::from_interleaved_u8(w, h, 3, rgb),
        ColorSpace::Gray => map_pixels(w, h, rgb, |px| [luma(px)]),
        ColorSpace::Lab => map_pixels(w, h, rgb, rgb_to_lab),
    }
}
