//! clear_volume - liquid volume estimation for bottles in camera frames
//!
//! Three independent stages turn one frame into a volume:
//! locate the bottle, find the fluid surface inside it, convert the fill
//! fraction into milliliters using a table of known bottle dimensions.
//! Every stage is a pure function of its inputs, so frames can be processed
//! concurrently without synchronization.

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Tunable thresholds and JSON loading
pub mod config;
/// Bottle and fluid detection stages
pub mod detector;
/// Error type shared by the fallible entry points
pub mod error;
/// Core data structures (Frame, BoundingRegion, BottleSpec, stage outputs)
pub mod models;
/// End-to-end estimator and frame sampling
pub mod pipeline;
/// Image loading, statistics and dataset helpers for the CLI and benches
pub mod tools;
/// Utility functions (grayscale, edges, geometry, Hough transform)
pub mod utils;
/// Level-to-volume conversion
pub mod volume;

pub use config::{EstimatorConfig, LevelConfig, LocatorConfig, VolumeConfig};
pub use error::{VolumeError, VolumeResult};
pub use models::{
    BottleDetection, BottleSpec, BoundingRegion, ChannelOrder, FluidLevelEstimate, Frame,
    LevelSource, VolumeEstimate,
};
pub use pipeline::{FrameSampler, PipelineReport, VolumeEstimator};

use detector::bottle::BottleLocator;
use detector::fluid_level::FluidLevelEstimator;
use volume::VolumeCalculator;

/// Locate the most bottle-like region in a frame
///
/// # Arguments
/// * `frame` - Borrowed RGB or BGR frame
///
/// # Returns
/// The detection, or `None` when no bottle is visible
pub fn locate(frame: &Frame<'_>) -> Option<BottleDetection> {
    BottleLocator::default().locate(frame)
}

/// Fluid level in [0, 1] inside `region`; 0.5 when nothing could be measured
pub fn estimate_level(frame: &Frame<'_>, region: &BoundingRegion) -> f64 {
    FluidLevelEstimator::default().estimate_level(frame, region)
}

/// Convert a fluid level into a volume estimate with default factors
pub fn calculate_volume(
    bottle_type: &str,
    level: f64,
    region: &BoundingRegion,
    frame_width: usize,
    frame_height: usize,
) -> VolumeEstimate {
    VolumeCalculator::default().calculate_volume(
        bottle_type,
        level,
        region,
        frame_width,
        frame_height,
    )
}

/// Run the whole pipeline with default thresholds
pub fn estimate_volume(frame: &Frame<'_>) -> Option<VolumeEstimate> {
    VolumeEstimator::default().estimate(frame)
}
