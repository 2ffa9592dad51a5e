//! Polygon utilities for contour analysis
//!
//! Perimeter and simplification come from `imageproc::geometry`; area and
//! the inclusive bounding box are computed here.

use crate::models::BoundingRegion;
use imageproc::geometry::approximate_polygon_dp;
use imageproc::point::Point;

/// Absolute area enclosed by a closed point sequence (shoelace formula)
pub fn contour_area(points: &[Point<i32>]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }

    let mut twice_area = 0i64;
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (points[j], points[i]);
        twice_area += a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64;
        j = i;
    }
    (twice_area as f64 * 0.5).abs()
}

/// Axis-aligned bounding rectangle (inclusive pixel extent)
pub fn bounding_rect(points: &[Point<i32>]) -> BoundingRegion {
    let Some(first) = points.first() else {
        return BoundingRegion::default();
    };

    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    BoundingRegion::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1)
}

/// Douglas-Peucker simplification of a closed contour.
///
/// Contours with fewer than 3 points, or a tolerance that is not positive,
/// come back unchanged.
pub fn approx_closed_polygon(points: &[Point<i32>], epsilon: f64) -> Vec<Point<i32>> {
    if points.len() < 3 || epsilon.is_nan() || epsilon <= 0.0 {
        return points.to_vec();
    }
    approximate_polygon_dp(points, epsilon, true)
}
