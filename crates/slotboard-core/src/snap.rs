//! Grid snapping for item placement and direct manipulation.

use kurbo::Point;

/// Grid unit in world coordinates (matches the visual dot grid).
pub const GRID_SIZE: f64 = 20.0;

/// Snap a single coordinate to the nearest grid multiple.
pub fn snap_coord(v: f64) -> f64 {
    (v / GRID_SIZE).round() * GRID_SIZE
}

/// Snap a point to the nearest grid intersection.
pub fn snap_point(point: Point) -> Point {
    Point::new(snap_coord(point.x), snap_coord(point.y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_rounds_to_nearest() {
        assert_eq!(snap_coord(23.0), 20.0);
        assert_eq!(snap_coord(31.0), 40.0);
        assert_eq!(snap_coord(-9.0), -0.0);
        assert_eq!(snap_coord(-11.0), -20.0);
    }

    #[test]
    fn test_snap_exact_multiple_unchanged() {
        assert_eq!(snap_coord(40.0), 40.0);
        assert_eq!(snap_coord(0.0), 0.0);
    }

    #[test]
    fn test_snap_idempotent() {
        for v in [-137.2, -20.0, 0.0, 9.9, 10.0, 19.99, 1234.56] {
            let once = snap_coord(v);
            assert_eq!(snap_coord(once), once);
            // The result is always an exact multiple of the grid unit.
            assert_eq!(once % GRID_SIZE, 0.0);
        }
    }

    #[test]
    fn test_snap_point() {
        assert_eq!(snap_point(Point::new(23.0, 47.0)), Point::new(20.0, 40.0));
    }
}
