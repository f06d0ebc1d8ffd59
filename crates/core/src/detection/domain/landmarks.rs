//! Ordered facial landmark set in the 68-point dlib convention.
//!
//! Indices 36-41 trace the left eye contour and 42-47 the right eye
//! contour. The ordering is fixed by the external predictor model.

use crate::shared::point::Point;

/// Total landmark count produced by a full 68-point predictor.
pub const LANDMARK_COUNT: usize = 68;

/// Minimum landmark count required for eye geometry (indices 0-47).
pub const EYE_LANDMARKS_REQUIRED: usize = 48;

// Eye corner and lid indices, 68-point convention.
pub const LEFT_EYE_OUTER_CORNER: usize = 36;
pub const LEFT_EYE_INNER_CORNER: usize = 39;
pub const LEFT_EYE_UPPER_LID: [usize; 2] = [37, 38];
pub const LEFT_EYE_LOWER_LID: [usize; 2] = [41, 40];

pub const RIGHT_EYE_INNER_CORNER: usize = 42;
pub const RIGHT_EYE_OUTER_CORNER: usize = 45;
pub const RIGHT_EYE_UPPER_LID: [usize; 2] = [43, 44];
pub const RIGHT_EYE_LOWER_LID: [usize; 2] = [47, 46];

/// Full contour index ranges, used to derive eye bounding boxes.
pub const LEFT_EYE_CONTOUR: std::ops::Range<usize> = 36..42;
pub const RIGHT_EYE_CONTOUR: std::ops::Range<usize> = 42..48;

/// An ordered sequence of landmark points for one detected face.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LandmarkSet {
    points: Vec<Point>,
}

impl LandmarkSet {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Point> {
        self.points.get(index).copied()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Axis-aligned bounds of a contiguous index range, as
    /// `(min, max)` corner points. `None` when the range is out of
    /// bounds or empty.
    pub fn contour_bounds(&self, range: std::ops::Range<usize>) -> Option<(Point, Point)> {
        if range.is_empty() || range.end > self.points.len() {
            return None;
        }
        let contour = &self.points[range];
        let min_x = contour.iter().map(|p| p.x).min()?;
        let min_y = contour.iter().map(|p| p.y).min()?;
        let max_x = contour.iter().map(|p| p.x).max()?;
        let max_y = contour.iter().map(|p| p.y).max()?;
        Some((Point::new(min_x, min_y), Point::new(max_x, max_y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequential_landmarks(n: usize) -> LandmarkSet {
        LandmarkSet::new((0..n).map(|i| Point::new(i as i32, i as i32 * 2)).collect())
    }

    #[test]
    fn test_len_and_get() {
        let lm = sequential_landmarks(68);
        assert_eq!(lm.len(), LANDMARK_COUNT);
        assert_eq!(lm.get(36), Some(Point::new(36, 72)));
        assert_eq!(lm.get(68), None);
    }

    #[test]
    fn test_empty() {
        let lm = LandmarkSet::new(vec![]);
        assert!(lm.is_empty());
        assert_eq!(lm.get(0), None);
    }

    #[test]
    fn test_contour_bounds() {
        let mut points = vec![Point::new(0, 0); 48];
        points[36] = Point::new(10, 22);
        points[37] = Point::new(14, 18);
        points[38] = Point::new(20, 18);
        points[39] = Point::new(25, 21);
        points[40] = Point::new(20, 26);
        points[41] = Point::new(14, 26);
        let lm = LandmarkSet::new(points);

        let (min, max) = lm.contour_bounds(LEFT_EYE_CONTOUR).unwrap();
        assert_eq!(min, Point::new(10, 18));
        assert_eq!(max, Point::new(25, 26));
    }

    #[test]
    fn test_contour_bounds_out_of_range() {
        let lm = sequential_landmarks(40);
        assert!(lm.contour_bounds(RIGHT_EYE_CONTOUR).is_none());
    }

    #[test]
    fn test_eye_index_convention() {
        // The contour ranges must start/end at the corner indices.
        assert_eq!(LEFT_EYE_CONTOUR.start, LEFT_EYE_OUTER_CORNER);
        assert_eq!(RIGHT_EYE_CONTOUR.start, RIGHT_EYE_INNER_CORNER);
        assert!(RIGHT_EYE_CONTOUR.contains(&RIGHT_EYE_OUTER_CORNER));
        assert_eq!(RIGHT_EYE_CONTOUR.end, EYE_LANDMARKS_REQUIRED);
    }
}
