//! Level-to-volume conversion.
//!
//! The bottle is modelled as a cylinder of the bottle's diameter, filled to
//! `height × level`, and scaled by a band-dependent factor for the tapered
//! base and the shoulder. Confidence is a fixed additive heuristic over the
//! region's share of the frame.

use crate::config::VolumeConfig;
use crate::models::{BottleSpec, BoundingRegion, FluidLevelEstimate, VolumeEstimate};
use std::f64::consts::PI;
use tracing::debug;

const CUBIC_METERS_TO_ML: f64 = 1e6;

/// Converts a normalized fluid level into milliliters
#[derive(Debug, Clone, Default)]
pub struct VolumeCalculator {
    config: VolumeConfig,
}

impl VolumeCalculator {
    /// Create a calculator with the given factors
    pub fn new(config: VolumeConfig) -> Self {
        Self { config }
    }

    /// Factors in use
    pub fn config(&self) -> &VolumeConfig {
        &self.config
    }

    /// Volume and confidence for a bottle of type `bottle_type` filled to `level`.
    ///
    /// Unknown tags use the generic spec; the tag is echoed unchanged.
    pub fn calculate_volume(
        &self,
        bottle_type: &str,
        level: f64,
        region: &BoundingRegion,
        frame_width: usize,
        frame_height: usize,
    ) -> VolumeEstimate {
        let spec = BottleSpec::lookup(bottle_type);

        let volume = if level.is_finite() {
            Some(cylindrical_volume_ml(spec, level) * self.shape_correction(level))
        } else {
            None
        };
        let confidence = self.confidence(level, region, frame_width, frame_height);

        debug!(
            "{bottle_type}: level {level:.3} -> {:?} mL (confidence {confidence:.2})",
            volume
        );

        VolumeEstimate {
            volume,
            confidence,
            bottle_type: bottle_type.to_string(),
            level,
            level_source: None,
        }
    }

    /// Same as [`calculate_volume`](Self::calculate_volume), keeping the level's provenance
    pub fn calculate_from_estimate(
        &self,
        bottle_type: &str,
        level: &FluidLevelEstimate,
        region: &BoundingRegion,
        frame_width: usize,
        frame_height: usize,
    ) -> VolumeEstimate {
        VolumeEstimate {
            level_source: Some(level.source),
            ..self.calculate_volume(bottle_type, level.level, region, frame_width, frame_height)
        }
    }

    /// Band factor: strict `<` on the bottom band, strict `>` on the top band
    pub fn shape_correction(&self, level: f64) -> f64 {
        if level < self.config.bottom_band {
            self.config.bottom_correction
        } else if level > self.config.top_band {
            self.config.top_correction
        } else {
            self.config.middle_correction
        }
    }

    /// Additive confidence, clamped to [0, 1]
    pub fn confidence(
        &self,
        level: f64,
        region: &BoundingRegion,
        frame_width: usize,
        frame_height: usize,
    ) -> f64 {
        let c = &self.config;
        let frame_area = (frame_width * frame_height) as f64;
        let area_fraction = if frame_area > 0.0 {
            region.area() as f64 / frame_area
        } else {
            0.0
        };

        let mut confidence = c.base_confidence;
        if area_fraction > c.large_area_fraction {
            confidence += c.large_area_bonus;
        } else if area_fraction > c.medium_area_fraction {
            confidence += c.medium_area_bonus;
        }
        if (0.0..=1.0).contains(&level) {
            confidence += c.valid_level_bonus;
        }
        confidence += c.stability_bonus;

        confidence.clamp(0.0, 1.0)
    }
}

/// Uncorrected fluid volume of a cylinder filled to `level`
pub fn cylindrical_volume_ml(spec: &BottleSpec, level: f64) -> f64 {
    let radius = spec.radius();
    PI * radius * radius * spec.height * level * CUBIC_METERS_TO_ML
}
