//! Eye-axis geometry derived from a 68-point landmark set.
//!
//! Per eye: a horizontal segment between the two eye corners and a
//! vertical segment between the upper-lid midpoint and the lower-lid
//! midpoint. Recomputed from scratch every frame; an axis has no identity
//! beyond the frame it was derived for.

use thiserror::Error;

use crate::detection::domain::landmarks::{
    LandmarkSet, EYE_LANDMARKS_REQUIRED, LEFT_EYE_INNER_CORNER, LEFT_EYE_LOWER_LID,
    LEFT_EYE_OUTER_CORNER, LEFT_EYE_UPPER_LID, RIGHT_EYE_INNER_CORNER, RIGHT_EYE_LOWER_LID,
    RIGHT_EYE_OUTER_CORNER, RIGHT_EYE_UPPER_LID,
};
use crate::shared::point::{midpoint, Point};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GeometryError {
    /// The upstream predictor returned too few points, which means an
    /// incompatible or truncated model output. Not recoverable.
    #[error("landmark set has {actual} points, {required} required for eye geometry")]
    MalformedLandmarks { required: usize, actual: usize },
}

/// A line segment between two pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }
}

/// The two overlay segments for one eye.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EyeAxis {
    pub horizontal: Segment,
    pub vertical: Segment,
}

/// Derives the left and right eye axes from a landmark set, in that
/// fixed order. The index assignments follow the predictor's 68-point
/// ordering contract.
///
/// Fails with [`GeometryError::MalformedLandmarks`] when fewer than 48
/// points are present, rather than returning partial geometry.
pub fn derive_eye_axes(landmarks: &LandmarkSet) -> Result<(EyeAxis, EyeAxis), GeometryError> {
    if landmarks.len() < EYE_LANDMARKS_REQUIRED {
        return Err(GeometryError::MalformedLandmarks {
            required: EYE_LANDMARKS_REQUIRED,
            actual: landmarks.len(),
        });
    }

    // Length was checked above; all indices below are < 48.
    let pt = |i: usize| landmarks.get(i).unwrap();

    let left = EyeAxis {
        horizontal: Segment::new(pt(LEFT_EYE_OUTER_CORNER), pt(LEFT_EYE_INNER_CORNER)),
        vertical: Segment::new(
            midpoint(pt(LEFT_EYE_UPPER_LID[0]), pt(LEFT_EYE_UPPER_LID[1])),
            midpoint(pt(LEFT_EYE_LOWER_LID[0]), pt(LEFT_EYE_LOWER_LID[1])),
        ),
    };

    let right = EyeAxis {
        horizontal: Segment::new(pt(RIGHT_EYE_INNER_CORNER), pt(RIGHT_EYE_OUTER_CORNER)),
        vertical: Segment::new(
            midpoint(pt(RIGHT_EYE_UPPER_LID[0]), pt(RIGHT_EYE_UPPER_LID[1])),
            midpoint(pt(RIGHT_EYE_LOWER_LID[0]), pt(RIGHT_EYE_LOWER_LID[1])),
        ),
    };

    Ok((left, right))
}
