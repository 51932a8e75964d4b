//! Error type for the fatal input-validation failures.
//!
//! Only malformed inputs abort a run. Degenerate plane fits, infeasible
//! reprojections and inconsistent pixels are contained locally through
//! `Option`, [`crate::plane::INFEASIBLE_COST`] and
//! [`crate::disparity::INVALID_DISPARITY`].

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StereoError {
    #[error(
        "left image is {left_w}x{left_h}x{left_c} but right image is {right_w}x{right_h}x{right_c}"
    )]
    ShapeMismatch {
        left_w: usize,
        left_h: usize,
        left_c: usize,
        right_w: usize,
        right_h: usize,
        right_c: usize,
    },
    #[error("image must have at least one channel and a non-zero size")]
    EmptyImage,
    #[error("channel {channel} is {got_w}x{got_h}, expected {expected_w}x{expected_h}")]
    ChannelMismatch {
        channel: usize,
        got_w: usize,
        got_h: usize,
        expected_w: usize,
        expected_h: usize,
    },
    #[error("buffer holds {got} samples, expected {expected}")]
    BufferLength { got: usize, expected: usize },
    #[error("invalid disparity range [{min}, {max}]")]
    InvalidDisparityRange { min: i32, max: i32 },
    #[error("blend weight omega must lie in [0, 1], got {0}")]
    InvalidBlendWeight(f32),
    #[error("consistency threshold must be positive, got {0}")]
    InvalidThreshold(f32),
    #[error("window radius must be at least 1")]
    InvalidWindowRadius,
    #[error("segmentation covers {seg_w}x{seg_h} but the image is {img_w}x{img_h}")]
    SegmentationMismatch {
        seg_w: usize,
        seg_h: usize,
        img_w: usize,
        img_h: usize,
    },
    #[error("segment {segment} contains pixel ({x}, {y}) outside the image")]
    PixelOutOfBounds { segment: usize, x: usize, y: usize },
    #[error("disparity maps differ in size: {a_w}x{a_h} vs {b_w}x{b_h}")]
    DisparityShapeMismatch {
        a_w: usize,
        a_h: usize,
        b_w: usize,
        b_h: usize,
    },
}

pub type Result<T> = std::result::Result<T, StereoError>;
