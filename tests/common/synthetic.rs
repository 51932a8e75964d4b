use plane_stereo::{ImageF32, PlanarImage};

/// Deterministic high-frequency texture in `[0, 256)`.
pub fn texture(x: i64, y: i64) -> f32 {
    let mut h = (x as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ (y as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F);
    h ^= h >> 33;
    h = h.wrapping_mul(0xFF51_AFD7_ED55_8CCD);
    h ^= h >> 33;
    (h % 256) as f32
}

/// Gray image from a per-pixel function.
pub fn gray(width: usize, height: usize, f: impl Fn(i64, i64) -> f32) -> PlanarImage {
    let mut plane = ImageF32::new(width, height);
    for y in 0..height {
        for x in 0..width {
            plane.set(x, y, f(x as i64, y as i64));
        }
    }
    PlanarImage::from_gray(plane).expect("non-empty image")
}

/// Textured pair with constant disparity: `right(x) = left(x − shift)`.
pub fn shifted_pair(width: usize, height: usize, shift: i64) -> (PlanarImage, PlanarImage) {
    (
        gray(width, height, texture),
        gray(width, height, |x, y| texture(x - shift, y)),
    )
}

/// Gray image whose every row equals `row`.
pub fn repeated_rows(row: &[f32], height: usize) -> PlanarImage {
    gray(row.len(), height, |x, _| row[x as usize])
}
