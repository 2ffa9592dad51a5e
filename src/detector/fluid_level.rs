//! Fluid surface estimation inside a bottle region.
//!
//! The region is cropped and edge-mapped, and the outline's own edge along
//! the crop border is cleared. Near-horizontal Hough lines are tried first;
//! when none lands inside the region the busiest edge row of the middle half
//! is used instead. Every failure path returns the configured default level
//! tagged as [`LevelSource::Fallback`].

use crate::config::LevelConfig;
use crate::error::{VolumeError, VolumeResult};
use crate::models::{BoundingRegion, FluidLevelEstimate, Frame, LevelSource};
use crate::utils::edges::{canny, clear_border, count_nonzero_row, gaussian_blur};
use crate::utils::grayscale::crop_to_grayscale;
use crate::utils::hough::{PolarLine, hough_lines};
use image::GrayImage;
use std::f64::consts::PI;
use tracing::{debug, warn};

/// Estimates the normalized fluid level within a bottle region
#[derive(Debug, Clone, Default)]
pub struct FluidLevelEstimator {
    config: LevelConfig,
}

impl FluidLevelEstimator {
    /// Create an estimator with the given thresholds
    pub fn new(config: LevelConfig) -> Self {
        Self { config }
    }

    /// Thresholds in use
    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    /// Level in [0, 1]; never fails
    pub fn estimate_level(&self, frame: &Frame<'_>, region: &BoundingRegion) -> f64 {
        self.estimate(frame, region).level
    }

    /// Level with its provenance; failures become the tagged default
    pub fn estimate(&self, frame: &Frame<'_>, region: &BoundingRegion) -> FluidLevelEstimate {
        match self.try_estimate(frame, region) {
            Ok(estimate) => estimate,
            Err(VolumeError::EmptyRegion) => {
                debug!("region {region:?} empty after clipping, using default level");
                FluidLevelEstimate::fallback(self.config.default_level)
            }
            Err(err) => {
                warn!("fluid level estimation failed: {err}");
                FluidLevelEstimate::fallback(self.config.default_level)
            }
        }
    }

    /// Level estimation that reports why it could not run
    pub fn try_estimate(
        &self,
        frame: &Frame<'_>,
        region: &BoundingRegion,
    ) -> VolumeResult<FluidLevelEstimate> {
        let clipped = region.clip(frame.width(), frame.height());
        if clipped.is_empty() {
            return Err(VolumeError::EmptyRegion);
        }

        let gray = crop_to_grayscale(frame, &clipped);
        let blurred = gaussian_blur(&gray, self.config.blur_sigma);
        let mut edges = canny(&blurred, self.config.canny_low, self.config.canny_high);
        clear_border(&mut edges, self.config.border_margin);

        let lines = hough_lines(
            &edges,
            self.config.hough_threshold,
            self.config.hough_suppression_radius,
        );

        let (row, source) = match self.select_line_row(&lines, region, &clipped) {
            Some(row) => (row, LevelSource::HoughLine),
            None => scan_edge_rows(&edges, region.height),
        };

        let level = (1.0 - row as f64 / region.height as f64).clamp(0.0, 1.0);
        debug!("fluid row {row} of {} ({source:?}) -> level {level:.3}", region.height);
        Ok(FluidLevelEstimate { level, source })
    }

    /// Row of the chosen near-horizontal line, relative to the region top.
    ///
    /// Lines are visited in accumulator order. Each candidate's length is
    /// taken to be the region width, so the first in-bounds line wins.
    pub fn select_line_row(
        &self,
        lines: &[PolarLine],
        region: &BoundingRegion,
        clipped: &BoundingRegion,
    ) -> Option<i64> {
        let tol = self.config.angle_tolerance;
        let mut max_length = 0;
        let mut chosen = None;

        for line in lines {
            if !(line.theta.abs() < tol || (line.theta - PI).abs() < tol) {
                continue;
            }
            let sin_t = line.theta.sin();
            if sin_t.abs() <= self.config.min_sin_theta {
                continue;
            }

            let y = (line.rho / sin_t).round() as i64 - clipped.y as i64;
            if y < 0 || y >= region.height as i64 {
                continue;
            }

            let length = region.width;
            if length > max_length {
                max_length = length;
                chosen = Some(y);
            }
        }
        chosen
    }
}

/// Busiest edge row in the middle half of the region.
///
/// Rows run from `height / 4` to `3 * height / 4`, cut short at the bottom of
/// the edge map. Returns the middle row when no row has any edge pixel.
pub fn scan_edge_rows(edges: &GrayImage, height: i32) -> (i64, LevelSource) {
    let height = height as i64;
    let start = (height / 4).max(0);
    let end = (3 * height / 4).min(edges.height() as i64);

    let mut max_edges = 0;
    let mut best = None;
    for y in start..end {
        let count = count_nonzero_row(edges, y as u32);
        if count > max_edges {
            max_edges = count;
            best = Some(y);
        }
    }

    match best {
        Some(row) => (row, LevelSource::EdgeRow),
        None => (height / 2, LevelSource::MiddleRow),
    }
}
