//! Sampling configuration.
//!
//! [`SamplerOptions`] is a builder that carries the sampling cadence (stride
//! and batch size) and the output frame shape (pixel format, resolution,
//! scaling filter) into a [`SamplerSession`](crate::SamplerSession).
//!
//! # Example
//!
//! ```no_run
//! use framestride::{PixelFormat, SamplerOptions, ScalingFilter};
//!
//! let options = SamplerOptions::new()
//!     .with_step(5)
//!     .with_max_frames_per_call(32)
//!     .with_pixel_format(PixelFormat::Gray8)
//!     .with_resolution(Some(32), Some(32))
//!     .with_scaling_filter(ScalingFilter::Bicubic);
//! ```

use ffmpeg_next::{format::Pixel, software::scaling::Flags as ScalingFlags};

/// Default number of frames a single sampling call may return.
pub const DEFAULT_MAX_FRAMES_PER_CALL: usize = 100;

/// Output pixel format for sampled frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PixelFormat {
    /// 8-bit grayscale, one channel.
    Gray8,
    /// 8-bit RGB, three interleaved channels. This is the default.
    #[default]
    Rgb8,
}

impl PixelFormat {
    /// Map to the corresponding FFmpeg pixel format constant.
    pub(crate) fn to_ffmpeg_pixel(self) -> Pixel {
        match self {
            PixelFormat::Gray8 => Pixel::GRAY8,
            PixelFormat::Rgb8 => Pixel::RGB24,
        }
    }

    /// Number of interleaved 8-bit channels per pixel.
    pub fn channels(self) -> u8 {
        match self {
            PixelFormat::Gray8 => 1,
            PixelFormat::Rgb8 => 3,
        }
    }
}

/// Interpolation used when converting decoded frames to the output size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScalingFilter {
    /// Fast bilinear.
    FastBilinear,
    /// Bilinear.
    Bilinear,
    /// Bicubic. This is the default.
    #[default]
    Bicubic,
    /// Area averaging, good for strong downscaling.
    Area,
    /// Lanczos.
    Lanczos,
}

impl ScalingFilter {
    pub(crate) fn to_ffmpeg_flags(self) -> ScalingFlags {
        match self {
            ScalingFilter::FastBilinear => ScalingFlags::FAST_BILINEAR,
            ScalingFilter::Bilinear => ScalingFlags::BILINEAR,
            ScalingFilter::Bicubic => ScalingFlags::BICUBIC,
            ScalingFilter::Area => ScalingFlags::AREA,
            ScalingFilter::Lanczos => ScalingFlags::LANCZOS,
        }
    }
}

/// Shape of the frames a session emits.
///
/// A dimension left as `None` (or set to `Some(0)`) keeps the source's
/// native value. The two dimensions resolve independently; no aspect ratio
/// is preserved when only one is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameOutputOptions {
    /// Output pixel format.
    pub pixel_format: PixelFormat,
    /// Target width. `None` keeps the source width.
    pub width: Option<u32>,
    /// Target height. `None` keeps the source height.
    pub height: Option<u32>,
    /// Interpolation used by the scaler.
    pub scaling_filter: ScalingFilter,
}

impl FrameOutputOptions {
    /// Resolve the final output dimensions given the source size.
    ///
    /// Returns `(width, height)`.
    pub(crate) fn resolve_dimensions(&self, source_width: u32, source_height: u32) -> (u32, u32) {
        let width = self.width.filter(|&w| w > 0).unwrap_or(source_width);
        let height = self.height.filter(|&h| h > 0).unwrap_or(source_height);
        (width, height)
    }
}

/// Configuration for a [`SamplerSession`](crate::SamplerSession).
///
/// All fields have defaults: every frame is sampled (`step = 1`), at most
/// [`DEFAULT_MAX_FRAMES_PER_CALL`] frames come back per call, and frames keep
/// the source resolution in [`PixelFormat::Rgb8`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplerOptions {
    /// Decode-order distance between two sampled frames. Always at least 1.
    pub(crate) step: u64,
    /// Upper bound on frames returned by one sampling call. Always at least 1.
    pub(crate) max_frames_per_call: usize,
    /// Frame output settings (pixel format, resolution, filter).
    pub(crate) frame_output: FrameOutputOptions,
}

impl Default for SamplerOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl SamplerOptions {
    /// Create options with default settings.
    pub fn new() -> Self {
        Self {
            step: 1,
            max_frames_per_call: DEFAULT_MAX_FRAMES_PER_CALL,
            frame_output: FrameOutputOptions::default(),
        }
    }

    /// Set the sampling stride. Clamped to a minimum of 1.
    #[must_use]
    pub fn with_step(mut self, step: u64) -> Self {
        self.step = step.max(1);
        self
    }

    /// Set the batch size of a single sampling call. Clamped to a minimum
    /// of 1.
    #[must_use]
    pub fn with_max_frames_per_call(mut self, count: usize) -> Self {
        self.max_frames_per_call = count.max(1);
        self
    }

    /// Set the output pixel format.
    #[must_use]
    pub fn with_pixel_format(mut self, format: PixelFormat) -> Self {
        self.frame_output.pixel_format = format;
        self
    }

    /// Set the output resolution. `None` or `Some(0)` keeps the source value
    /// for that dimension.
    #[must_use]
    pub fn with_resolution(mut self, width: Option<u32>, height: Option<u32>) -> Self {
        self.frame_output.width = width;
        self.frame_output.height = height;
        self
    }

    /// Set the interpolation used when resizing.
    #[must_use]
    pub fn with_scaling_filter(mut self, filter: ScalingFilter) -> Self {
        self.frame_output.scaling_filter = filter;
        self
    }

    /// Replace the complete frame output configuration.
    #[must_use]
    pub fn with_frame_output(mut self, frame_output: FrameOutputOptions) -> Self {
        self.frame_output = frame_output;
        self
    }

    /// Sampling stride.
    pub fn step(&self) -> u64 {
        self.step
    }

    /// Batch size of a single sampling call.
    pub fn max_frames_per_call(&self) -> usize {
        self.max_frames_per_call
    }

    /// Frame output settings.
    pub fn frame_output(&self) -> &FrameOutputOptions {
        &self.frame_output
    }
}
