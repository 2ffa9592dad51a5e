use serde::Serialize;

/// Integer rectangle inside a frame (x, y, width, height).
///
/// Regions handed to the estimator may come from anywhere, so coordinates are
/// signed; [`BoundingRegion::clip`] produces the in-bounds part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BoundingRegion {
    /// Left edge
    pub x: i32,
    /// Top edge
    pub y: i32,
    /// Width in pixels
    pub width: i32,
    /// Height in pixels
    pub height: i32,
}

impl BoundingRegion {
    /// Create a new region
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Region area in pixels (zero for degenerate regions)
    pub fn area(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            self.width as i64 * self.height as i64
        }
    }

    /// True when width or height is not positive
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Height over width; `None` for degenerate regions
    pub fn aspect_ratio(&self) -> Option<f64> {
        if self.is_empty() {
            None
        } else {
            Some(self.height as f64 / self.width as f64)
        }
    }

    /// Intersection with a `frame_width` x `frame_height` frame.
    ///
    /// The result satisfies `0 <= x, y` and `x + width <= W`, `y + height <= H`;
    /// it has zero width or height when there is no overlap.
    pub fn clip(&self, frame_width: usize, frame_height: usize) -> Self {
        let fw = frame_width.min(i32::MAX as usize) as i64;
        let fh = frame_height.min(i32::MAX as usize) as i64;

        let x0 = (self.x as i64).clamp(0, fw);
        let y0 = (self.y as i64).clamp(0, fh);
        let x1 = (self.x as i64 + self.width.max(0) as i64).clamp(0, fw);
        let y1 = (self.y as i64 + self.height.max(0) as i64).clamp(0, fh);

        Self {
            x: x0 as i32,
            y: y0 as i32,
            width: (x1 - x0).max(0) as i32,
            height: (y1 - y0).max(0) as i32,
        }
    }

    /// True when the region lies entirely inside the frame
    pub fn fits_within(&self, frame_width: usize, frame_height: usize) -> bool {
        self.x >= 0
            && self.y >= 0
            && (self.x as i64 + self.width as i64) <= frame_width as i64
            && (self.y as i64 + self.height as i64) <= frame_height as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_inside_is_identity() {
        let r = BoundingRegion::new(10, 20, 30, 40);
        assert_eq!(r.clip(100, 100), r);
        assert!(r.fits_within(100, 100));
    }

    #[test]
    fn test_clip_negative_origin() {
        let r = BoundingRegion::new(-5, -10, 20, 30);
        let c = r.clip(100, 100);
        assert_eq!(c, BoundingRegion::new(0, 0, 15, 20));
    }

    #[test]
    fn test_clip_past_right_edge() {
        let r = BoundingRegion::new(90, 0, 20, 10);
        assert_eq!(r.clip(100, 50), BoundingRegion::new(90, 0, 10, 10));
    }

    #[test]
    fn test_clip_outside_collapses() {
        let r = BoundingRegion::new(150, 10, 20, 10);
        let c = r.clip(100, 100);
        assert_eq!(c.width, 0);
        assert!(c.is_empty());
        assert_eq!(c.area(), 0);
    }

    #[test]
    fn test_aspect_ratio() {
        assert_eq!(BoundingRegion::new(0, 0, 40, 100).aspect_ratio(), Some(2.5));
        assert_eq!(BoundingRegion::new(0, 0, 0, 100).aspect_ratio(), None);
    }
}
