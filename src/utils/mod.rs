//! Image-processing primitives used by the estimation stages
//!
//! - Grayscale conversion (RGB/BGR frames to luminance)
//! - Gaussian blur, Canny edges and crop-border clearing
//! - Polygon geometry (area, perimeter, simplification, bounding boxes)
//! - Hough line detection ranked by votes

pub mod edges;
pub mod geometry;
pub mod grayscale;
pub mod hough;
