//! Locate → level → volume for whole frames.
//!
//! Each invocation is independent; batches fan out over rayon and come back in
//! input order.

use crate::config::EstimatorConfig;
use crate::detector::bottle::BottleLocator;
use crate::detector::fluid_level::FluidLevelEstimator;
use crate::models::{BottleDetection, FluidLevelEstimate, Frame, VolumeEstimate};
use crate::volume::VolumeCalculator;
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

/// Every intermediate result of one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineReport {
    /// Located bottle, if any
    pub detection: Option<BottleDetection>,
    /// Fluid level; absent when no bottle was found
    pub level: Option<FluidLevelEstimate>,
    /// Volume; absent when no bottle was found
    pub volume: Option<VolumeEstimate>,
}

/// All three stages with their configuration
#[derive(Debug, Clone, Default)]
pub struct VolumeEstimator {
    locator: BottleLocator,
    level: FluidLevelEstimator,
    calculator: VolumeCalculator,
}

impl VolumeEstimator {
    /// Build the stages from one configuration
    pub fn new(config: EstimatorConfig) -> Self {
        Self {
            locator: BottleLocator::new(config.locator),
            level: FluidLevelEstimator::new(config.level),
            calculator: VolumeCalculator::new(config.volume),
        }
    }

    /// Bottle locator stage
    pub fn locator(&self) -> &BottleLocator {
        &self.locator
    }

    /// Fluid level stage
    pub fn level_estimator(&self) -> &FluidLevelEstimator {
        &self.level
    }

    /// Volume stage
    pub fn calculator(&self) -> &VolumeCalculator {
        &self.calculator
    }

    /// Volume for one frame; `None` means no bottle was visible
    pub fn estimate(&self, frame: &Frame<'_>) -> Option<VolumeEstimate> {
        self.analyze(frame).volume
    }

    /// Run every stage and keep the intermediate results
    pub fn analyze(&self, frame: &Frame<'_>) -> PipelineReport {
        let Some(detection) = self.locator.locate(frame) else {
            debug!("no bottle in {}x{} frame", frame.width(), frame.height());
            return PipelineReport {
                detection: None,
                level: None,
                volume: None,
            };
        };

        let level = self.level.estimate(frame, &detection.region);
        let volume = self.calculator.calculate_from_estimate(
            &detection.bottle_type,
            &level,
            &detection.region,
            frame.width(),
            frame.height(),
        );

        PipelineReport {
            detection: Some(detection),
            level: Some(level),
            volume: Some(volume),
        }
    }

    /// Estimate frames in parallel; results line up with `frames`
    pub fn estimate_batch(&self, frames: &[Frame<'_>]) -> Vec<Option<VolumeEstimate>> {
        frames.par_iter().map(|frame| self.estimate(frame)).collect()
    }
}

/// Chooses which frames of a stream to run the pipeline on.
///
/// Frame `n` is processed when `n % every == 0`; `every == 0` behaves as 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSampler {
    every: u64,
}

impl FrameSampler {
    /// Sample every `every`-th frame
    pub fn new(every: u64) -> Self {
        Self {
            every: every.max(1),
        }
    }

    /// Sampling period
    pub fn every(&self) -> u64 {
        self.every
    }

    /// Whether frame number `n` should be processed
    pub fn should_process(&self, n: u64) -> bool {
        n % self.every == 0
    }
}

impl Default for FrameSampler {
    fn default() -> Self {
        Self::new(1)
    }
}
