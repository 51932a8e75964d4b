use super::Plane;
use crate::image::ImageF32;
use crate::segmentation::Segmentation;

/// Dense disparity from per-segment planes; `NaN` where a segment has no
/// plane or no segment covers the pixel.
pub fn render_planes(segmentation: &Segmentation, planes: &[Option<Plane>]) -> ImageF32 {
    let mut out = ImageF32::filled(segmentation.width(), segmentation.height(), f32::NAN);
    for (segment, plane) in segmentation.segments().iter().zip(planes) {
        let Some(plane) = plane else { continue };
        for p in &segment.pixels {
            out.set(p.x, p.y, plane.disparity_at(p.x as f32, p.y as f32));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_planes_and_leaves_holes() {
        let seg = Segmentation::regular_grid(4, 2, 2);
        let planes = vec![Some(Plane::new(1.0, 0.5, 2.0)), None];
        let img = render_planes(&seg, &planes);
        assert_eq!(img.get(0, 0), 2.0);
        assert_eq!(img.get(1, 1), 3.5);
        assert!(img.get(2, 0).is_nan());
        assert!(img.get(3, 1).is_nan());
    }
}
