//! Hough line detection over edge maps.
//!
//! A thin layer over `imageproc::hough::detect_lines`, which works at a
//! fixed 1 pixel by 1 degree resolution. Lines are reported as (ρ, θ) with
//! `x·cos θ + y·sin θ = ρ`, θ in [0, π) and ρ signed in pixels from the image
//! origin. Each line carries its accumulator votes and the list is sorted by
//! votes, highest first, keeping the detector's angle-major order on ties.

use image::GrayImage;
use imageproc::hough::{LineDetectionOptions, detect_lines};
use rayon::prelude::*;

/// A detected line in polar form
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarLine {
    /// Signed distance from the origin in pixels
    pub rho: f64,
    /// Angle of the line normal in radians, in [0, π)
    pub theta: f64,
    /// Accumulator votes
    pub votes: u32,
}

/// Run the transform over every nonzero pixel of `edges`.
///
/// `threshold` is exclusive: a line needs more than `threshold` votes.
/// Peaks must be the largest accumulator value within `suppression_radius`.
pub fn hough_lines(edges: &GrayImage, threshold: u32, suppression_radius: u32) -> Vec<PolarLine> {
    let (w, h) = edges.dimensions();
    if w == 0 || h == 0 {
        return Vec::new();
    }

    let options = LineDetectionOptions {
        vote_threshold: threshold.saturating_add(1),
        suppression_radius,
    };
    let detected = detect_lines(edges, options);
    if detected.is_empty() {
        return Vec::new();
    }

    let points: Vec<(f32, f32)> = edges
        .enumerate_pixels()
        .filter(|(_, _, p)| p[0] != 0)
        .map(|(x, y, _)| (x as f32, y as f32))
        .collect();

    let mut lines: Vec<PolarLine> = detected
        .par_iter()
        .map(|line| {
            let votes = accumulator_votes(&points, line.angle_in_degrees, line.r as i32);
            PolarLine {
                rho: line.r as f64,
                theta: (line.angle_in_degrees as f64).to_radians(),
                votes,
            }
        })
        .collect();
    lines.sort_by(|a, b| b.votes.cmp(&a.votes));
    lines
}

/// Count the points that fall in accumulator bin (`r`, `degrees`).
///
/// Uses the same single-precision projection and truncation as the detector
/// so the tally matches the bin it thresholded.
fn accumulator_votes(points: &[(f32, f32)], degrees: u32, r: i32) -> u32 {
    let (sin_t, cos_t) = (degrees as f32).to_radians().sin_cos();
    points
        .iter()
        .filter(|&&(x, y)| (x * cos_t + y * sin_t) as i32 == r)
        .count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_horizontal_line() {
        let mut img = GrayImage::new(100, 60);
        for x in 0..100 {
            img.put_pixel(x, 25, Luma([255]));
        }
        let lines = hough_lines(&img, 50, 1);
        assert!(!lines.is_empty());
        let best = lines[0];
        assert!((best.theta - FRAC_PI_2).abs() < 1e-9);
        assert!((best.rho - 25.0).abs() <= 1.0);
        assert!(best.votes > 50 && best.votes <= 100);
    }

    #[test]
    fn test_vertical_line() {
        let mut img = GrayImage::new(60, 100);
        for y in 0..100 {
            img.put_pixel(40, y, Luma([255]));
        }
        let lines = hough_lines(&img, 50, 1);
        let best = lines[0];
        assert!(best.theta.abs() < 1e-9);
        assert_eq!(best.rho, 40.0);
        assert_eq!(best.votes, 100);
    }

    #[test]
    fn test_below_threshold_and_empty() {
        let mut img = GrayImage::new(40, 40);
        for x in 0..30 {
            img.put_pixel(x, 10, Luma([255]));
        }
        assert!(hough_lines(&img, 50, 1).is_empty());
        assert!(hough_lines(&GrayImage::new(40, 40), 0, 1).is_empty());
        assert!(hough_lines(&GrayImage::new(0, 0), 0, 1).is_empty());
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let mut img = GrayImage::new(60, 100);
        for y in 0..80 {
            img.put_pixel(10, y, Luma([255]));
        }
        assert!(hough_lines(&img, 80, 1).is_empty());
        let lines = hough_lines(&img, 79, 1);
        assert_eq!(lines[0].votes, 80);
    }

    #[test]
    fn test_sorted_by_votes() {
        let mut img = GrayImage::new(200, 200);
        for x in 0..200 {
            img.put_pixel(x, 50, Luma([255]));
        }
        for x in 0..120 {
            img.put_pixel(x, 150, Luma([255]));
        }
        let lines = hough_lines(&img, 60, 1);
        assert!(lines.len() >= 2);
        assert!(lines.windows(2).all(|w| w[0].votes >= w[1].votes));
        assert!((lines[0].rho - 50.0).abs() <= 1.0);
    }
}
