use crate::error::{VolumeError, VolumeResult};

/// Byte order of the three samples stored for each pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelOrder {
    /// Red, green, blue (the `image` crate's layout)
    #[default]
    Rgb,
    /// Blue, green, red (typical camera / OpenCV layout)
    Bgr,
}

/// Borrowed, immutable view of one camera frame.
///
/// The pipeline only reads through this view during a single call and never
/// keeps it afterwards; the lifetime ties every stage to the caller's buffer.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
    order: ChannelOrder,
}

impl<'a> Frame<'a> {
    /// Bytes per pixel
    pub const CHANNELS: usize = 3;

    /// Wrap a packed 3-channel buffer.
    ///
    /// Fails when either dimension is zero or the buffer cannot hold
    /// `width * height` pixels.
    pub fn new(
        data: &'a [u8],
        width: usize,
        height: usize,
        order: ChannelOrder,
    ) -> VolumeResult<Self> {
        if width == 0 || height == 0 {
            return Err(VolumeError::EmptyFrame { width, height });
        }
        let expected = width * height * Self::CHANNELS;
        if data.len() < expected {
            return Err(VolumeError::BufferTooSmall {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            order,
        })
    }

    /// View an `image::RgbImage` as a frame
    pub fn from_rgb_image(image: &'a image::RgbImage) -> VolumeResult<Self> {
        let (w, h) = image.dimensions();
        Self::new(image.as_raw(), w as usize, h as usize, ChannelOrder::Rgb)
    }

    /// Frame width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Frame height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total pixel count (W×H)
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// Channel order of the samples
    pub fn order(&self) -> ChannelOrder {
        self.order
    }

    /// Raw packed samples
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Samples of row `y`, starting at column `x`, `len` pixels long
    pub(crate) fn row_span(&self, x: usize, y: usize, len: usize) -> &'a [u8] {
        let start = (y * self.width + x) * Self::CHANNELS;
        &self.data[start..start + len * Self::CHANNELS]
    }
}
