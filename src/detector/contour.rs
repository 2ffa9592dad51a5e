use crate::models::BoundingRegion;
use crate::utils::geometry::{bounding_rect, contour_area};
use image::GrayImage;
use imageproc::contours::{BorderType, find_contours};
use imageproc::geometry::arc_length;
use imageproc::point::Point;

/// An outer boundary traced from an edge map, with its cached measurements
#[derive(Debug, Clone)]
pub struct ContourCandidate {
    /// Boundary points in tracing order
    pub points: Vec<Point<i32>>,
    /// Enclosed area in square pixels
    pub area: f64,
    /// Closed perimeter in pixels
    pub perimeter: f64,
    /// Axis-aligned bounding rectangle of `points`
    pub bounds: BoundingRegion,
}

impl ContourCandidate {
    /// Measure a traced boundary
    pub fn from_points(points: Vec<Point<i32>>) -> Self {
        let area = contour_area(&points);
        let perimeter = arc_length(&points, true);
        let bounds = bounding_rect(&points);
        Self {
            points,
            area,
            perimeter,
            bounds,
        }
    }
}

/// Contour extraction over binary edge maps
pub struct ContourDetector;

impl ContourDetector {
    /// Outermost contours of an edge map (nonzero = foreground).
    ///
    /// Holes and anything nested inside another shape are dropped. Order is
    /// the raster order in which the tracer discovered each border, which the
    /// locator relies on for its first-seen tie-break.
    pub fn external(edges: &GrayImage) -> Vec<ContourCandidate> {
        if edges.width() == 0 || edges.height() == 0 {
            return Vec::new();
        }

        find_contours::<i32>(edges)
            .into_iter()
            .filter(|c| matches!(c.border_type, BorderType::Outer) && c.parent.is_none())
            .map(|c| ContourCandidate::from_points(c.points))
            .collect()
    }
}
