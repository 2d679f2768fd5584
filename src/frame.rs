//! Sampled frame type.

use image::DynamicImage;

use crate::configuration::PixelFormat;

/// One frame emitted by a [`SamplerSession`](crate::SamplerSession).
///
/// Holds the frame's zero-based position in decode order together with an
/// owned image in the session's pixel format and output resolution. The
/// pixel bytes are tightly packed, row-major, channels interleaved.
#[derive(Debug, Clone, PartialEq)]
pub struct SampledFrame {
    /// Zero-based index of this frame in decode order.
    pub decode_index: u64,
    /// The converted image (`ImageLuma8` or `ImageRgb8`).
    pub image: DynamicImage,
}

impl SampledFrame {
    pub(crate) fn new(decode_index: u64, image: DynamicImage) -> Self {
        Self {
            decode_index,
            image,
        }
    }

    /// Frame width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Frame height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Channels per pixel: 1 for grayscale, 3 for RGB.
    pub fn channels(&self) -> u8 {
        self.image.color().channel_count()
    }

    /// The pixel format this frame was converted to.
    pub fn pixel_format(&self) -> PixelFormat {
        match self.image {
            DynamicImage::ImageLuma8(_) => PixelFormat::Gray8,
            _ => PixelFormat::Rgb8,
        }
    }

    /// Raw packed pixel bytes (`width × height × channels`).
    pub fn as_bytes(&self) -> &[u8] {
        self.image.as_bytes()
    }

    /// Consume the frame and return its image.
    pub fn into_image(self) -> DynamicImage {
        self.image
    }
}
