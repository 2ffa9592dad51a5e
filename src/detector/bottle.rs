use crate::config::LocatorConfig;
use crate::detector::contour::{ContourCandidate, ContourDetector};
use crate::error::{VolumeError, VolumeResult};
use crate::models::{BottleDetection, Frame, GENERIC_BOTTLE};
use crate::utils::edges::{canny, gaussian_blur};
use crate::utils::geometry::approx_closed_polygon;
use crate::utils::grayscale::frame_to_grayscale;
use tracing::{debug, warn};

/// Finds the bounding region of the most bottle-like outline in a frame.
///
/// A contour qualifies when it covers enough of the frame, simplifies to a
/// polygon with at least `min_vertices` corners and has a bounding box that is
/// taller than wide within `(min_aspect, max_aspect)`. The largest qualifying
/// contour wins; equal areas keep the first one found.
#[derive(Debug, Clone, Default)]
pub struct BottleLocator {
    config: LocatorConfig,
}

impl BottleLocator {
    /// Create a locator with the given thresholds
    pub fn new(config: LocatorConfig) -> Self {
        Self { config }
    }

    /// Thresholds in use
    pub fn config(&self) -> &LocatorConfig {
        &self.config
    }

    /// Locate a bottle; any internal failure reads as "no bottle visible"
    pub fn locate(&self, frame: &Frame<'_>) -> Option<BottleDetection> {
        match self.try_locate(frame) {
            Ok(detection) => detection,
            Err(err) => {
                warn!("bottle location failed: {err}");
                None
            }
        }
    }

    /// Locate a bottle, surfacing degenerate input as an error
    pub fn try_locate(&self, frame: &Frame<'_>) -> VolumeResult<Option<BottleDetection>> {
        if frame.area() == 0 {
            return Err(VolumeError::EmptyFrame {
                width: frame.width(),
                height: frame.height(),
            });
        }

        let gray = frame_to_grayscale(frame);
        let blurred = gaussian_blur(&gray, self.config.blur_sigma);
        let edges = canny(&blurred, self.config.canny_low, self.config.canny_high);
        let candidates = ContourDetector::external(&edges);

        debug!(
            "{} external contours in {}x{} frame",
            candidates.len(),
            frame.width(),
            frame.height()
        );
        Ok(self.select(&candidates, frame.width(), frame.height()))
    }

    /// Apply the area, shape and aspect filters and pick the largest survivor
    pub fn select(
        &self,
        candidates: &[ContourCandidate],
        frame_width: usize,
        frame_height: usize,
    ) -> Option<BottleDetection> {
        let frame_area = (frame_width * frame_height) as f64;
        if frame_area <= 0.0 {
            return None;
        }
        let min_area = frame_area * self.config.min_area_fraction;

        let mut best: Option<&ContourCandidate> = None;
        for (i, candidate) in candidates.iter().enumerate() {
            if candidate.area < min_area {
                continue;
            }

            let epsilon = self.config.poly_epsilon_fraction * candidate.perimeter;
            let vertices = approx_closed_polygon(&candidate.points, epsilon).len();
            if vertices < self.config.min_vertices {
                debug!("contour {i}: {vertices} vertices, not rectangular");
                continue;
            }

            let Some(aspect) = candidate.bounds.aspect_ratio() else {
                continue;
            };
            if !(aspect > self.config.min_aspect && aspect < self.config.max_aspect) {
                debug!("contour {i}: aspect {aspect:.2} out of range");
                continue;
            }

            if best.is_none_or(|b| candidate.area > b.area) {
                best = Some(candidate);
            }
        }

        let best = best?;
        let confidence =
            (best.area / (self.config.confidence_saturation * frame_area)).min(1.0);
        debug!(
            "bottle at {:?}, area {:.0}, confidence {:.2}",
            best.bounds, best.area, confidence
        );

        Some(BottleDetection {
            region: best.bounds,
            bottle_type: GENERIC_BOTTLE.to_string(),
            confidence,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imageproc::point::Point;

    /// Traced outline of a `w` x `h` rectangle, one point per boundary pixel
    fn rect_candidate(x: i32, y: i32, w: i32, h: i32) -> ContourCandidate {
        let mut points = Vec::new();
        points.extend((x..x + w).map(|px| Point::new(px, y)));
        points.extend((y..y + h).map(|py| Point::new(x + w, py)));
        points.extend((x + 1..=x + w).rev().map(|px| Point::new(px, y + h)));
        points.extend((y + 1..=y + h).rev().map(|py| Point::new(x, py)));
        ContourCandidate::from_points(points)
    }

    #[test]
    fn test_rejects_small_area() {
        let locator = BottleLocator::default();
        // 20x50 = 1000 px in a 200x200 frame: 2.5% < 5%
        let small = rect_candidate(10, 10, 20, 50);
        assert!(locator.select(&[small], 200, 200).is_none());
    }

    #[test]
    fn test_rejects_aspect_out_of_range() {
        let locator = BottleLocator::default();
        // Wider than tall
        let wide = rect_candidate(0, 0, 100, 60);
        assert!(locator.select(&[wide], 200, 200).is_none());
        // Too thin: bounding box 21 x 101 -> aspect 4.8
        let thin = rect_candidate(0, 0, 20, 100);
        assert!(locator.select(&[thin], 100, 100).is_none());
    }

    #[test]
    fn test_rejects_non_polygonal_outline() {
        let locator = BottleLocator::default();
        let mut points: Vec<Point<i32>> = (0..100).map(|y| Point::new(0, y)).collect();
        points.extend((1..99).rev().map(|y| Point::new(1, y)));
        let sliver = ContourCandidate {
            area: 10_000.0,
            ..ContourCandidate::from_points(points)
        };
        assert!(locator.select(&[sliver], 200, 200).is_none());
    }

    #[test]
    fn test_picks_largest_and_first_on_tie() {
        let locator = BottleLocator::default();
        let a = rect_candidate(0, 0, 40, 100);
        let b = rect_candidate(100, 0, 60, 150);
        let c = rect_candidate(300, 0, 60, 150);
        let detection = locator.select(&[a, b, c], 400, 400).unwrap();
        assert_eq!(detection.region.x, 100);
        assert_eq!(detection.bottle_type, GENERIC_BOTTLE);
    }

    #[test]
    fn test_confidence_saturates() {
        let locator = BottleLocator::default();
        // 9000 / (0.3 * 100_000) = 0.3
        let partial = locator
            .select(&[rect_candidate(0, 0, 60, 150)], 400, 250)
            .unwrap();
        assert!((partial.confidence - 0.3).abs() < 1e-9);

        let full = locator
            .select(&[rect_candidate(0, 0, 60, 150)], 100, 150)
            .unwrap();
        assert_eq!(full.confidence, 1.0);
    }
}
