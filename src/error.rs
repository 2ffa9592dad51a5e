//! Error types for frame handling and configuration.
//!
//! None of these escape the per-frame contract: the locator maps them to
//! "no detection" and the level estimator maps them to the default level.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised inside the estimation pipeline and its tooling.
#[derive(Debug, Error)]
pub enum VolumeError {
    /// Frame has zero width or height.
    #[error("Frame is empty ({width}x{height})")]
    EmptyFrame {
        /// Frame width in pixels.
        width: usize,
        /// Frame height in pixels.
        height: usize,
    },

    /// Pixel buffer is shorter than width * height * 3.
    #[error("Pixel buffer too small: expected {expected} bytes, got {actual}")]
    BufferTooSmall {
        /// Required number of bytes.
        expected: usize,
        /// Bytes actually supplied.
        actual: usize,
    },

    /// Region collapsed to nothing after clipping to the frame.
    #[error("Region is empty after clipping to frame bounds")]
    EmptyRegion,

    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Image could not be opened or decoded.
    #[error("Failed to load image {path}: {source}")]
    ImageLoad {
        /// The path that failed.
        path: PathBuf,
        /// The underlying decode error.
        #[source]
        source: image::ImageError,
    },

    /// Config file could not be read.
    #[error("Failed to read config {path}: {source}")]
    ConfigIo {
        /// The path that failed.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid JSON for [`crate::EstimatorConfig`].
    #[error("Failed to parse config {path}: {source}")]
    ConfigParse {
        /// The path that failed.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for pipeline operations.
pub type VolumeResult<T> = std::result::Result<T, VolumeError>;
