//! Smoothing and edge extraction on grayscale images.
//!
//! Both wrap `imageproc`. Its Canny smooths with a σ = 1.4 Gaussian before
//! taking Sobel gradients, so callers pass the plain grayscale image.

use image::{GrayImage, Luma};
use imageproc::filter::gaussian_blur_f32;

/// Value written for edge pixels
pub const EDGE: u8 = 255;

/// Gaussian blur; a non-positive sigma returns an unmodified copy
pub fn gaussian_blur(gray: &GrayImage, sigma: f32) -> GrayImage {
    if sigma <= 0.0 || gray.width() == 0 || gray.height() == 0 {
        return gray.clone();
    }
    gaussian_blur_f32(gray, sigma)
}

/// Canny edge map: 255 on edges, 0 elsewhere.
///
/// Images narrower or shorter than 3 pixels have no interior and come back
/// empty. The low threshold is raised to the smallest positive value and the
/// high threshold to at least the low one, so any pair is accepted.
pub fn canny(gray: &GrayImage, low_threshold: f32, high_threshold: f32) -> GrayImage {
    let (w, h) = gray.dimensions();
    if w < 3 || h < 3 {
        return GrayImage::new(w, h);
    }

    let low = low_threshold.max(f32::MIN_POSITIVE);
    let high = high_threshold.max(low);
    imageproc::edges::canny(gray, low, high)
}

/// Zero every pixel within `margin` of the image border
pub fn clear_border(image: &mut GrayImage, margin: u32) {
    if margin == 0 {
        return;
    }
    let (w, h) = image.dimensions();
    let inside_x = margin..w.saturating_sub(margin);
    let inside_y = margin..h.saturating_sub(margin);
    for (x, y, px) in image.enumerate_pixels_mut() {
        if !inside_x.contains(&x) || !inside_y.contains(&y) {
            *px = Luma([0]);
        }
    }
}

/// Number of nonzero pixels in row `y` (0 when `y` is out of range)
pub fn count_nonzero_row(image: &GrayImage, y: u32) -> usize {
    if y >= image.height() {
        return 0;
    }
    let w = image.width() as usize;
    let start = y as usize * w;
    image.as_raw()[start..start + w]
        .iter()
        .filter(|&&v| v != 0)
        .count()
}

/// Number of nonzero pixels in the whole image
pub fn count_nonzero(image: &GrayImage) -> usize {
    image.as_raw().iter().filter(|&&v| v != 0).count()
}
