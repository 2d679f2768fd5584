//! Scaled-frame to image conversion.
//!
//! FFmpeg frames carry per-row padding (the stride is often wider than
//! `width × channels`). These helpers strip that padding and wrap the packed
//! bytes in an [`image::DynamicImage`] matching the session's pixel format.

use ffmpeg_next::frame::Video as VideoFrame;
use image::{DynamicImage, GrayImage, RgbImage};

use crate::{configuration::PixelFormat, error::SamplerError};

/// Copy `height` rows of `row_bytes` each out of a plane laid out with
/// `stride` bytes per row.
fn pack_rows(data: &[u8], stride: usize, row_bytes: usize, height: usize) -> Vec<u8> {
    if stride == row_bytes {
        return data[..row_bytes * height].to_vec();
    }

    let mut buffer = Vec::with_capacity(row_bytes * height);
    for row in 0..height {
        let row_start = row * stride;
        buffer.extend_from_slice(&data[row_start..row_start + row_bytes]);
    }
    buffer
}

/// Convert a scaled frame (already in `pixel_format` at `width × height`)
/// into an owned image.
pub(crate) fn frame_to_image(
    scaled_frame: &VideoFrame,
    width: u32,
    height: u32,
    pixel_format: PixelFormat,
) -> Result<DynamicImage, SamplerError> {
    let row_bytes = width as usize * pixel_format.channels() as usize;
    let stride = scaled_frame.stride(0);
    let data = scaled_frame.data(0);

    if stride < row_bytes || data.len() < stride * (height as usize).saturating_sub(1) + row_bytes
    {
        return Err(SamplerError::FrameConversion(format!(
            "scaled plane is too small for {width}x{height} ({} bytes, stride {stride})",
            data.len(),
        )));
    }

    let buffer = pack_rows(data, stride, row_bytes, height as usize);

    match pixel_format {
        PixelFormat::Gray8 => GrayImage::from_raw(width, height, buffer)
            .map(DynamicImage::ImageLuma8)
            .ok_or_else(|| {
                SamplerError::FrameConversion(
                    "failed to construct grayscale image from scaled frame data".to_string(),
                )
            }),
        PixelFormat::Rgb8 => RgbImage::from_raw(width, height, buffer)
            .map(DynamicImage::ImageRgb8)
            .ok_or_else(|| {
                SamplerError::FrameConversion(
                    "failed to construct RGB image from scaled frame data".to_string(),
                )
            }),
    }
}
