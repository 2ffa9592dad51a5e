//! Bottle and fluid detection stages
//!
//! This module contains the image-analysis half of the pipeline:
//! - Outer contour extraction from an edge map
//! - Bottle localization (area, polygon and aspect filters)
//! - Fluid level estimation inside a located region

/// Bottle localization from external contours
pub mod bottle;
/// Outer contour tracing and measurement
pub mod contour;
/// Fluid surface detection via Hough lines with an edge-row fallback
pub mod fluid_level;
