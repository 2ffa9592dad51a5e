//! End-to-end tests on synthetic bottle frames
//!
//! Frames are drawn with `image::RgbImage` so every scenario has exact
//! geometry: a bright bottle body over a dark background, with a darker
//! fluid column filling its lower half.

use clear_volume::models::GENERIC_BOTTLE;
use clear_volume::{
    BoundingRegion, ChannelOrder, EstimatorConfig, Frame, LevelSource, VolumeEstimator,
    calculate_volume, estimate_level, estimate_volume, locate,
};
use image::{Rgb, RgbImage};

const FRAME_W: u32 = 347;
const FRAME_H: u32 = 1100;
const BOTTLE_X: (u32, u32) = (20, 327);
const BOTTLE_Y: (u32, u32) = (660, 1060);
const FLUID_TOP: u32 = 860;

fn fill(img: &mut RgbImage, xs: (u32, u32), ys: (u32, u32), color: [u8; 3]) {
    for y in ys.0..ys.1 {
        for x in xs.0..xs.1 {
            img.put_pixel(x, y, Rgb(color));
        }
    }
}

/// Bottle body covering ~32% of the frame, half full
fn half_full_bottle() -> RgbImage {
    let mut img = RgbImage::from_pixel(FRAME_W, FRAME_H, Rgb([10, 10, 10]));
    fill(&mut img, BOTTLE_X, (BOTTLE_Y.0, FLUID_TOP), [250, 250, 250]);
    fill(&mut img, BOTTLE_X, (FLUID_TOP, BOTTLE_Y.1), [120, 120, 120]);
    img
}

fn to_bgr(img: &RgbImage) -> Vec<u8> {
    let mut data = img.as_raw().clone();
    for px in data.chunks_exact_mut(3) {
        px.swap(0, 2);
    }
    data
}

#[test]
fn test_half_full_bottle_end_to_end() {
    let img = half_full_bottle();
    let frame = Frame::from_rgb_image(&img).unwrap();
    let report = VolumeEstimator::default().analyze(&frame);

    let detection = report.detection.expect("bottle should be located");
    assert_eq!(detection.bottle_type, GENERIC_BOTTLE);
    assert_eq!(detection.confidence, 1.0);
    let region = detection.region;
    assert!((region.x - BOTTLE_X.0 as i32).abs() <= 2, "region {region:?}");
    assert!((region.y - BOTTLE_Y.0 as i32).abs() <= 2, "region {region:?}");
    let aspect = region.aspect_ratio().unwrap();
    assert!(aspect > 1.2 && aspect < 4.0);

    let level = report.level.unwrap();
    assert_eq!(level.source, LevelSource::EdgeRow);
    assert!((level.level - 0.5).abs() < 0.02, "level {}", level.level);

    let volume = report.volume.unwrap();
    let ml = volume.volume.unwrap();
    assert!((ml - 456.98).abs() < 10.0, "volume {ml}");
    assert!((volume.confidence - 1.0).abs() < 1e-9);
    assert_eq!(volume.level_source, Some(LevelSource::EdgeRow));
}

#[test]
fn test_uniform_bottle_reads_middle_row() {
    // 380x950 body, ~36% of the frame, no fluid surface drawn
    let mut img = RgbImage::from_pixel(1000, 1000, Rgb([10, 10, 10]));
    fill(&mut img, (310, 690), (25, 975), [250, 250, 250]);
    let frame = Frame::from_rgb_image(&img).unwrap();
    let report = VolumeEstimator::default().analyze(&frame);

    let detection = report.detection.expect("bottle should be located");
    assert_eq!(detection.confidence, 1.0);
    let aspect = detection.region.aspect_ratio().unwrap();
    assert!(aspect > 2.3 && aspect < 2.7, "aspect {aspect}");

    let level = report.level.unwrap();
    assert_eq!(level.source, LevelSource::MiddleRow);
    assert!((level.level - 0.5).abs() < 1e-3, "level {}", level.level);

    let volume = report.volume.unwrap();
    let ml = volume.volume.unwrap();
    assert!((ml - 456.98).abs() < 0.1, "volume {ml}");
    assert!((volume.confidence - 1.0).abs() < 1e-9);
    assert_eq!(volume.level_source, Some(LevelSource::MiddleRow));
}

#[test]
fn test_free_functions_agree_with_estimator() {
    let img = half_full_bottle();
    let frame = Frame::from_rgb_image(&img).unwrap();

    let detection = locate(&frame).unwrap();
    let level = estimate_level(&frame, &detection.region);
    let manual = calculate_volume(
        &detection.bottle_type,
        level,
        &detection.region,
        frame.width(),
        frame.height(),
    );
    let piped = estimate_volume(&frame).unwrap();
    assert_eq!(manual.volume, piped.volume);
    assert_eq!(manual.confidence, piped.confidence);
}

#[test]
fn test_bgr_frame_matches_rgb() {
    let mut img = RgbImage::from_pixel(FRAME_W, FRAME_H, Rgb([5, 20, 40]));
    fill(&mut img, BOTTLE_X, (BOTTLE_Y.0, FLUID_TOP), [240, 250, 255]);
    fill(&mut img, BOTTLE_X, (FLUID_TOP, BOTTLE_Y.1), [60, 130, 200]);

    let bgr = to_bgr(&img);
    let rgb_frame = Frame::from_rgb_image(&img).unwrap();
    let bgr_frame = Frame::new(&bgr, FRAME_W as usize, FRAME_H as usize, ChannelOrder::Bgr)
        .unwrap();

    let estimator = VolumeEstimator::default();
    assert_eq!(estimator.analyze(&rgb_frame), estimator.analyze(&bgr_frame));
}

#[test]
fn test_small_shape_is_not_a_bottle() {
    // 40x80 = 2% of the frame
    let mut img = RgbImage::from_pixel(400, 400, Rgb([10, 10, 10]));
    fill(&mut img, (100, 140), (100, 180), [220, 220, 220]);
    let frame = Frame::from_rgb_image(&img).unwrap();

    assert!(locate(&frame).is_none());
    assert!(estimate_volume(&frame).is_none());
    let report = VolumeEstimator::default().analyze(&frame);
    assert!(report.level.is_none() && report.volume.is_none());
}

#[test]
fn test_wide_box_is_not_a_bottle() {
    let mut img = RgbImage::from_pixel(400, 400, Rgb([10, 10, 10]));
    fill(&mut img, (50, 350), (100, 300), [220, 220, 220]);
    let frame = Frame::from_rgb_image(&img).unwrap();
    assert!(locate(&frame).is_none());
}

#[test]
fn test_region_outside_frame_uses_default_level() {
    let img = half_full_bottle();
    let frame = Frame::from_rgb_image(&img).unwrap();
    let outside = BoundingRegion::new(FRAME_W as i32 + 5, 0, 50, 100);

    assert_eq!(estimate_level(&frame, &outside), 0.5);
    let estimator = VolumeEstimator::default();
    let estimate = estimator.level_estimator().estimate(&frame, &outside);
    assert_eq!(estimate.source, LevelSource::Fallback);
    assert!(!estimate.source.is_measured());
}

#[test]
fn test_batch_keeps_frame_order() {
    let bottle = half_full_bottle();
    let blank = RgbImage::from_pixel(FRAME_W, FRAME_H, Rgb([10, 10, 10]));
    let frames = [
        Frame::from_rgb_image(&blank).unwrap(),
        Frame::from_rgb_image(&bottle).unwrap(),
        Frame::from_rgb_image(&blank).unwrap(),
    ];

    let results = VolumeEstimator::new(EstimatorConfig::default()).estimate_batch(&frames);
    assert_eq!(results.len(), 3);
    assert!(results[0].is_none());
    assert!(results[1].is_some());
    assert!(results[2].is_none());
}

#[test]
fn test_stricter_area_threshold_rejects_bottle() {
    let img = half_full_bottle();
    let frame = Frame::from_rgb_image(&img).unwrap();
    let mut config = EstimatorConfig::default();
    config.locator.min_area_fraction = 0.5;
    assert!(config.validate().is_ok());
    assert!(VolumeEstimator::new(config).estimate(&frame).is_none());
}
