use crate::error::{VolumeError, VolumeResult};
use crate::models::Frame;
use crate::pipeline::{PipelineReport, VolumeEstimator};
use crate::utils::edges::count_nonzero;
use image::{GenericImageView, GrayImage, RgbImage};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

fn parse_positive(value: &str) -> Option<u64> {
    match value.trim().parse::<u64>() {
        Ok(0) | Err(_) => None,
        Ok(v) => Some(v),
    }
}

fn max_dim_from_env() -> Option<u32> {
    env::var("CV_MAX_DIM")
        .ok()
        .and_then(|v| parse_positive(&v))
        .and_then(|v| u32::try_from(v).ok())
}

/// Load an image as RGB, downscaled so its longer side fits `CV_MAX_DIM` when set.
pub fn load_rgb<P: AsRef<Path>>(path: P) -> VolumeResult<RgbImage> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|source| VolumeError::ImageLoad {
        path: path.to_path_buf(),
        source,
    })?;
    let rgb = match max_dim_from_env() {
        Some(max_dim) if img.dimensions().0.max(img.dimensions().1) > max_dim => img
            .resize(max_dim, max_dim, image::imageops::FilterType::Triangle)
            .to_rgb8(),
        _ => img.to_rgb8(),
    };
    Ok(rgb)
}

/// Load one image and run every pipeline stage over it.
///
/// Load and frame construction failures are returned, not swallowed, so batch
/// callers can report which file was skipped.
pub fn analyze_image<P: AsRef<Path>>(
    estimator: &VolumeEstimator,
    path: P,
) -> VolumeResult<PipelineReport> {
    let rgb = load_rgb(path)?;
    let frame = Frame::from_rgb_image(&rgb)?;
    Ok(estimator.analyze(&frame))
}

/// Summary statistics for grayscale data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrayStats {
    /// Minimum grayscale value.
    pub min: u8,
    /// Maximum grayscale value.
    pub max: u8,
    /// Average grayscale value.
    pub avg: u8,
}

/// Edge density of an edge map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeStats {
    /// Count of edge pixels.
    pub edge_pixels: usize,
    /// Total pixels in the map.
    pub total_pixels: usize,
    /// Ratio of edge pixels to total pixels.
    pub edge_ratio: f64,
}

/// Compute min/max/avg for grayscale values.
pub fn grayscale_stats(gray: &[u8]) -> GrayStats {
    if gray.is_empty() {
        return GrayStats {
            min: 0,
            max: 0,
            avg: 0,
        };
    }
    let mut min = u8::MAX;
    let mut max = u8::MIN;
    let mut sum: u64 = 0;
    for &v in gray {
        min = min.min(v);
        max = max.max(v);
        sum += v as u64;
    }
    GrayStats {
        min,
        max,
        avg: (sum / gray.len() as u64) as u8,
    }
}

/// Compute edge pixel stats for an edge map.
pub fn edge_stats(edges: &GrayImage) -> EdgeStats {
    let edge_pixels = count_nonzero(edges);
    let total = (edges.width() * edges.height()) as usize;
    let ratio = if total == 0 {
        0.0
    } else {
        edge_pixels as f64 / total as f64
    };
    EdgeStats {
        edge_pixels,
        total_pixels: total,
        edge_ratio: ratio,
    }
}

/// Default dataset root from environment variables.
pub fn dataset_root_from_env() -> PathBuf {
    env::var("CV_DATASET_ROOT")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("benches/images/bottles"))
}

/// Default bench limit from environment variables.
///
/// Returns `None` (full dataset) when `CV_BENCH_LIMIT` is unset or `0`.
pub fn bench_limit_from_env() -> Option<usize> {
    env::var("CV_BENCH_LIMIT")
        .ok()
        .and_then(|v| parse_positive(&v))
        .map(|v| v as usize)
}

/// Frame sampling period from `CV_SAMPLE_EVERY`; 1 when unset or invalid.
pub fn sample_every_from_env() -> u64 {
    env::var("CV_SAMPLE_EVERY")
        .ok()
        .and_then(|v| parse_positive(&v))
        .unwrap_or(1)
}

/// Iterate dataset image paths in sorted order, up to `limit`.
pub fn dataset_iter<P: AsRef<Path>>(
    root: P,
    limit: Option<usize>,
) -> impl Iterator<Item = PathBuf> {
    let mut images = collect_images(root.as_ref());
    images.sort();
    if let Some(limit) = limit {
        images.truncate(limit);
    }
    images.into_iter()
}

fn collect_images(root: &Path) -> Vec<PathBuf> {
    let mut stack = vec![root.to_path_buf()];
    let mut images = Vec::new();

    while let Some(dir) = stack.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(_) => continue,
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
                continue;
            }
            if let Some(ext) = path.extension() {
                let ext = ext.to_string_lossy().to_lowercase();
                if matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "bmp") {
                    images.push(path);
                }
            }
        }
    }

    images
}
