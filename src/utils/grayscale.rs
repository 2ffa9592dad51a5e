//! Grayscale conversion for RGB and BGR frames
//! Y = 0.299*R + 0.587*G + 0.114*B
//! Uses fast integer arithmetic: Y = (76*R + 150*G + 29*B) >> 8

use crate::models::{BoundingRegion, ChannelOrder, Frame};
use image::GrayImage;
use rayon::prelude::*;

/// Coefficients for grayscale conversion: Y = (76*R + 150*G + 29*B) >> 8
const COEF_R: i32 = 76;
const COEF_G: i32 = 150;
const COEF_B: i32 = 29;

#[inline]
fn luma(r: u8, g: u8, b: u8) -> u8 {
    let lum = (COEF_R * r as i32 + COEF_G * g as i32 + COEF_B * b as i32) >> 8;
    lum.min(255) as u8
}

/// Byte offsets of red and blue inside one pixel
#[inline]
fn red_blue_offsets(order: ChannelOrder) -> (usize, usize) {
    match order {
        ChannelOrder::Rgb => (0, 2),
        ChannelOrder::Bgr => (2, 0),
    }
}

/// Convert a whole frame to grayscale (rows processed in parallel)
pub fn frame_to_grayscale(frame: &Frame<'_>) -> GrayImage {
    let full = BoundingRegion::new(0, 0, frame.width() as i32, frame.height() as i32);
    crop_to_grayscale(frame, &full)
}

/// Convert the part of `region` that lies inside the frame to grayscale.
///
/// Cropping and conversion happen in one pass; the output has the clipped
/// region's dimensions (possibly 0x0).
pub fn crop_to_grayscale(frame: &Frame<'_>, region: &BoundingRegion) -> GrayImage {
    let clipped = region.clip(frame.width(), frame.height());
    let w = clipped.width as usize;
    let h = clipped.height as usize;
    let mut gray = GrayImage::new(w as u32, h as u32);
    if w == 0 || h == 0 {
        return gray;
    }

    let (ri, bi) = red_blue_offsets(frame.order());
    let (x0, y0) = (clipped.x as usize, clipped.y as usize);
    let buffer: &mut [u8] = &mut gray;

    // Process rows in parallel
    buffer.par_chunks_mut(w).enumerate().for_each(|(row, out)| {
        let src = frame.row_span(x0, y0 + row, w);
        for (dst, px) in out.iter_mut().zip(src.chunks_exact(Frame::CHANNELS)) {
            *dst = luma(px[ri], px[1], px[bi]);
        }
    });

    gray
}

/// Single-threaded conversion of a packed 3-channel buffer
pub fn pixels_to_grayscale(
    data: &[u8],
    width: usize,
    height: usize,
    order: ChannelOrder,
) -> Vec<u8> {
    let pixel_count = width * height;
    let (ri, bi) = red_blue_offsets(order);
    data.chunks_exact(Frame::CHANNELS)
        .take(pixel_count)
        .map(|px| luma(px[ri], px[1], px[bi]))
        .collect()
}
