/// An integer pixel coordinate pair.
///
/// Coordinates are whole pixels, not sub-pixel positions, so derived
/// points (midpoints) stay on the integer grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Midpoint of two points with truncating integer averaging.
///
/// Truncation (not rounding) matches pixel-addressing semantics:
/// `midpoint((1,1), (2,2)) == (1,1)`.
pub fn midpoint(p1: Point, p2: Point) -> Point {
    Point {
        x: (p1.x + p2.x) / 2,
        y: (p1.y + p2.y) / 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::origin(Point::new(0, 0), Point::new(0, 0))]
    #[case::positive(Point::new(17, 23), Point::new(100, 200))]
    #[case::negative(Point::new(-10, -4), Point::new(3, 9))]
    fn test_midpoint_commutative(#[case] p1: Point, #[case] p2: Point) {
        assert_eq!(midpoint(p1, p2), midpoint(p2, p1));
    }

    #[rstest]
    #[case(Point::new(0, 0))]
    #[case(Point::new(100, 100))]
    #[case(Point::new(-7, 31))]
    fn test_midpoint_identical_inputs(#[case] p: Point) {
        assert_eq!(midpoint(p, p), p);
    }

    #[test]
    fn test_midpoint_truncates() {
        // (1.5, 1.5) truncates to (1, 1), never rounds to (2, 2)
        assert_eq!(
            midpoint(Point::new(1, 1), Point::new(2, 2)),
            Point::new(1, 1)
        );
    }

    #[test]
    fn test_midpoint_even_sums_are_exact() {
        assert_eq!(
            midpoint(Point::new(10, 20), Point::new(30, 40)),
            Point::new(20, 30)
        );
    }

    #[test]
    fn test_midpoint_mixed_parity() {
        assert_eq!(
            midpoint(Point::new(0, 1), Point::new(5, 2)),
            Point::new(2, 1)
        );
    }
}
