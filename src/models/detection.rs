use super::BoundingRegion;
use serde::Serialize;

/// A bottle-shaped region found in a frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BottleDetection {
    /// Bounding rectangle of the accepted contour
    pub region: BoundingRegion,
    /// Bottle type tag (always `generic` from the locator)
    pub bottle_type: String,
    /// Detection confidence in [0, 1]
    pub confidence: f64,
}

/// Where a fluid level came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LevelSource {
    /// First in-bounds near-horizontal Hough line
    HoughLine,
    /// Edge-row scan picked the row with the most edge pixels
    EdgeRow,
    /// Edge-row scan found nothing, middle row of the region was used
    MiddleRow,
    /// Degenerate input or internal failure; the default level was returned
    Fallback,
}

impl LevelSource {
    /// True when the level was measured rather than defaulted
    pub fn is_measured(&self) -> bool {
        matches!(self, LevelSource::HoughLine | LevelSource::EdgeRow)
    }
}

/// Normalized fluid level with its provenance
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FluidLevelEstimate {
    /// Fill fraction in [0, 1]
    pub level: f64,
    /// How the level was obtained
    pub source: LevelSource,
}

impl FluidLevelEstimate {
    /// Level produced by the fail-soft path
    pub fn fallback(level: f64) -> Self {
        Self {
            level,
            source: LevelSource::Fallback,
        }
    }
}

/// Physical volume estimate for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeEstimate {
    /// Volume in milliliters; `None` when the level was unusable
    pub volume: Option<f64>,
    /// Heuristic confidence in [0, 1]
    pub confidence: f64,
    /// Bottle type tag as supplied by the caller
    pub bottle_type: String,
    /// Level the volume was computed from
    pub level: f64,
    /// Provenance of `level`, when known
    pub level_source: Option<LevelSource>,
}
