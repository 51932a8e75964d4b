//! Segment arena: the externally supplied partition of the image into
//! superpixels.
//!
//! Segments live in a `Vec` and are referred to by their position in it. The
//! `id` carried by each segment is informational (the source label, or the
//! merge index after refinement).
use crate::error::{Result, StereoError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Label value for pixels no segment covers in [`Segmentation::label_image`].
pub const UNLABELED: u32 = u32::MAX;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pixel {
    pub x: usize,
    pub y: usize,
}

impl Pixel {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    pub id: SegmentId,
    pub pixels: Vec<Pixel>,
}

impl Segment {
    pub fn new(id: SegmentId, pixels: Vec<Pixel>) -> Self {
        Self { id, pixels }
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Segmentation {
    width: usize,
    height: usize,
    segments: Vec<Segment>,
}

impl Segmentation {
    /// Wrap an arena, checking that every pixel lies inside `width × height`.
    pub fn new(width: usize, height: usize, segments: Vec<Segment>) -> Result<Self> {
        let seg = Self {
            width,
            height,
            segments,
        };
        seg.validate()?;
        Ok(seg)
    }

    /// Group a row-major label buffer into segments, ordered by label value.
    pub fn from_labels(width: usize, height: usize, labels: &[u32]) -> Result<Self> {
        let expected = width * height;
        if labels.len() != expected {
            return Err(StereoError::BufferLength {
                got: labels.len(),
                expected,
            });
        }
        let mut groups: BTreeMap<u32, Vec<Pixel>> = BTreeMap::new();
        for (i, &label) in labels.iter().enumerate() {
            groups
                .entry(label)
                .or_default()
                .push(Pixel::new(i % width, i / width));
        }
        let segments = groups
            .into_iter()
            .map(|(label, pixels)| Segment::new(SegmentId(label), pixels))
            .collect::<Vec<_>>();
        log::debug!(
            "Segmentation::from_labels {}x{} -> {} segments",
            width,
            height,
            segments.len()
        );
        Ok(Self {
            width,
            height,
            segments,
        })
    }

    /// Square blocks of `cell × cell` pixels (clipped at the right/bottom).
    pub fn regular_grid(width: usize, height: usize, cell: usize) -> Self {
        let cell = cell.max(1);
        let cols = width.div_ceil(cell);
        let rows = height.div_ceil(cell);
        let mut segments = Vec::with_capacity(cols * rows);
        for by in 0..rows {
            for bx in 0..cols {
                let mut pixels = Vec::with_capacity(cell * cell);
                for y in by * cell..((by + 1) * cell).min(height) {
                    for x in bx * cell..((bx + 1) * cell).min(width) {
                        pixels.push(Pixel::new(x, y));
                    }
                }
                let id = SegmentId(segments.len() as u32);
                segments.push(Segment::new(id, pixels));
            }
        }
        Self {
            width,
            height,
            segments,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn pixel_count(&self) -> usize {
        self.segments.iter().map(Segment::len).sum()
    }

    /// Per-pixel arena index, [`UNLABELED`] where no segment reaches.
    pub fn label_image(&self) -> Vec<u32> {
        let mut labels = vec![UNLABELED; self.width * self.height];
        for (index, segment) in self.segments.iter().enumerate() {
            for p in &segment.pixels {
                labels[p.y * self.width + p.x] = index as u32;
            }
        }
        labels
    }

    pub fn validate(&self) -> Result<()> {
        for (segment, s) in self.segments.iter().enumerate() {
            if let Some(p) = s
                .pixels
                .iter()
                .find(|p| p.x >= self.width || p.y >= self.height)
            {
                return Err(StereoError::PixelOutOfBounds {
                    segment,
                    x: p.x,
                    y: p.y,
                });
            }
        }
        Ok(())
    }

    /// Fail unless the arena was built for a `width × height` image.
    pub fn check_extent(&self, width: usize, height: usize) -> Result<()> {
        if self.width != width || self.height != height {
            return Err(StereoError::SegmentationMismatch {
                seg_w: self.width,
                seg_h: self.height,
                img_w: width,
                img_h: height,
            });
        }
        Ok(())
    }
}
