//! Tunable thresholds for every pipeline stage.
//!
//! Defaults are the stock thresholds. Partial JSON files override only
//! the fields they name. Edge extraction always smooths with a σ = 1.4
//! Gaussian; `blur_sigma` adds an optional pre-blur on top of it.

use crate::error::{VolumeError, VolumeResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Bottle locator thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorConfig {
    /// Extra Gaussian sigma applied before edge extraction; 0 disables it.
    pub blur_sigma: f32,
    /// Canny hysteresis low threshold.
    pub canny_low: f32,
    /// Canny hysteresis high threshold.
    pub canny_high: f32,
    /// Contours smaller than this fraction of the frame area are rejected.
    pub min_area_fraction: f64,
    /// Polygon approximation tolerance as a fraction of contour perimeter.
    pub poly_epsilon_fraction: f64,
    /// Minimum vertex count of the approximated polygon.
    pub min_vertices: usize,
    /// Exclusive lower bound on height / width.
    pub min_aspect: f64,
    /// Exclusive upper bound on height / width.
    pub max_aspect: f64,
    /// Frame-area fraction at which detection confidence saturates to 1.
    pub confidence_saturation: f64,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            blur_sigma: 0.0,
            canny_low: 50.0,
            canny_high: 150.0,
            min_area_fraction: 0.05,
            poly_epsilon_fraction: 0.02,
            min_vertices: 4,
            min_aspect: 1.2,
            max_aspect: 4.0,
            confidence_saturation: 0.3,
        }
    }
}

/// Fluid level estimator thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Extra Gaussian sigma applied to the cropped region; 0 disables it.
    pub blur_sigma: f32,
    /// Canny hysteresis low threshold.
    pub canny_low: f32,
    /// Canny hysteresis high threshold.
    pub canny_high: f32,
    /// Minimum accumulator votes for a line (exclusive).
    pub hough_threshold: u32,
    /// Accumulator peaks must be the maximum of this radius around them.
    pub hough_suppression_radius: u32,
    /// Width of the crop border cleared before the line search, in pixels.
    ///
    /// The region hugs the bottle outline, so its silhouette edge sits on the
    /// outermost rows and columns of the crop.
    pub border_margin: u32,
    /// Lines with |θ| or |θ − π| below this are kept.
    pub angle_tolerance: f64,
    /// Lines with |sin θ| at or below this are skipped.
    pub min_sin_theta: f64,
    /// Level returned when nothing usable was found.
    pub default_level: f64,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            blur_sigma: 0.0,
            canny_low: 50.0,
            canny_high: 150.0,
            hough_threshold: 50,
            hough_suppression_radius: 1,
            border_margin: 2,
            angle_tolerance: 0.1,
            min_sin_theta: 0.001,
            default_level: 0.5,
        }
    }
}

/// Volume calculator shape correction and confidence terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeConfig {
    /// Levels strictly below this use `bottom_correction`.
    pub bottom_band: f64,
    /// Levels strictly above this use `top_correction`.
    pub top_band: f64,
    /// Factor for the tapered base.
    pub bottom_correction: f64,
    /// Factor for the cylindrical body.
    pub middle_correction: f64,
    /// Factor for the shoulder and neck.
    pub top_correction: f64,
    /// Starting confidence.
    pub base_confidence: f64,
    /// Region/frame area fraction earning `large_area_bonus` (exclusive).
    pub large_area_fraction: f64,
    /// Bonus for large regions.
    pub large_area_bonus: f64,
    /// Region/frame area fraction earning `medium_area_bonus` (exclusive).
    pub medium_area_fraction: f64,
    /// Bonus for medium regions.
    pub medium_area_bonus: f64,
    /// Bonus when the level lies in [0, 1].
    pub valid_level_bonus: f64,
    /// Fixed stability bonus.
    pub stability_bonus: f64,
}

impl Default for VolumeConfig {
    fn default() -> Self {
        Self {
            bottom_band: 0.1,
            top_band: 0.9,
            bottom_correction: 0.85,
            middle_correction: 0.95,
            top_correction: 0.75,
            base_confidence: 0.5,
            large_area_fraction: 0.3,
            large_area_bonus: 0.2,
            medium_area_fraction: 0.15,
            medium_area_bonus: 0.1,
            valid_level_bonus: 0.2,
            stability_bonus: 0.1,
        }
    }
}

/// Configuration for the whole estimation pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Bottle locator settings.
    pub locator: LocatorConfig,
    /// Fluid level settings.
    pub level: LevelConfig,
    /// Volume settings.
    pub volume: VolumeConfig,
}

impl EstimatorConfig {
    /// Load a (possibly partial) JSON config and validate it.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> VolumeResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| VolumeError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self =
            serde_json::from_str(&text).map_err(|source| VolumeError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject non-finite or inverted thresholds.
    pub fn validate(&self) -> VolumeResult<()> {
        let l = &self.locator;
        check_positive("locator.blur_sigma", l.blur_sigma as f64, true)?;
        check_canny("locator", l.canny_low, l.canny_high)?;
        check_fraction("locator.min_area_fraction", l.min_area_fraction)?;
        check_fraction("locator.poly_epsilon_fraction", l.poly_epsilon_fraction)?;
        check_positive("locator.confidence_saturation", l.confidence_saturation, false)?;
        if !(l.min_aspect.is_finite() && l.max_aspect.is_finite()) || l.min_aspect >= l.max_aspect
        {
            return Err(VolumeError::InvalidConfig(format!(
                "locator aspect bounds ({}, {}) are not an open interval",
                l.min_aspect, l.max_aspect
            )));
        }

        let v = &self.level;
        check_positive("level.blur_sigma", v.blur_sigma as f64, true)?;
        check_canny("level", v.canny_low, v.canny_high)?;
        check_positive("level.angle_tolerance", v.angle_tolerance, false)?;
        check_fraction("level.min_sin_theta", v.min_sin_theta)?;
        check_fraction("level.default_level", v.default_level)?;

        let c = &self.volume;
        check_fraction("volume.bottom_band", c.bottom_band)?;
        check_fraction("volume.top_band", c.top_band)?;
        if c.bottom_band > c.top_band {
            return Err(VolumeError::InvalidConfig(format!(
                "volume.bottom_band {} exceeds volume.top_band {}",
                c.bottom_band, c.top_band
            )));
        }
        for (name, value) in [
            ("volume.bottom_correction", c.bottom_correction),
            ("volume.middle_correction", c.middle_correction),
            ("volume.top_correction", c.top_correction),
        ] {
            check_positive(name, value, false)?;
        }
        Ok(())
    }
}

fn check_positive(name: &str, value: f64, allow_zero: bool) -> VolumeResult<()> {
    let ok = value.is_finite() && (value > 0.0 || (allow_zero && value == 0.0));
    if ok {
        Ok(())
    } else {
        Err(VolumeError::InvalidConfig(format!(
            "{name} must be positive, got {value}"
        )))
    }
}

fn check_fraction(name: &str, value: f64) -> VolumeResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(VolumeError::InvalidConfig(format!(
            "{name} must lie in [0, 1], got {value}"
        )))
    }
}

fn check_canny(stage: &str, low: f32, high: f32) -> VolumeResult<()> {
    if low.is_finite() && high.is_finite() && low > 0.0 && low <= high {
        Ok(())
    } else {
        Err(VolumeError::InvalidConfig(format!(
            "{stage} canny thresholds ({low}, {high}) must satisfy 0 < low <= high"
        )))
    }
}
