//! Error types for the `framestride` crate.
//!
//! [`SamplerError`] is returned by every fallible operation: opening a
//! sampling session, sampling frames, and the stateless stream probes. Each
//! variant maps onto one failure class of the decode pipeline so callers can
//! tell a missing file from a file without video. Callers that still expect
//! a single `-1` failure value can collapse results with
//! [`IntoSentinel`](crate::IntoSentinel).

use std::path::PathBuf;

use ffmpeg_next::Error as FfmpegError;
use thiserror::Error;

/// The unified error type for all `framestride` operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SamplerError {
    /// The container could not be opened (bad path, unsupported format,
    /// permissions).
    #[error("Failed to open media file at {path}: {reason}")]
    StreamOpen {
        /// Path handed to the demuxer.
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The container opened but its stream information could not be read.
    #[error("Failed to read stream information from {path}: {reason}")]
    StreamInfo {
        /// Path handed to the demuxer.
        path: PathBuf,
        /// Underlying reason the probe failed.
        reason: String,
    },

    /// The container has no stream of video type.
    #[error("No video stream found in file")]
    NoVideoStream,

    /// No decoder is available for the video stream, or the decoder context
    /// could not be initialised.
    #[error("Video codec error: {0}")]
    Codec(String),

    /// A buffer or context allocation failed.
    #[error("Allocation failed: {0}")]
    Allocation(String),

    /// A decoded frame could not be scaled or converted into an image.
    #[error("Failed to convert decoded frame: {0}")]
    FrameConversion(String),

    /// An FFmpeg failure not tied to one file, such as library
    /// initialisation.
    #[error("FFmpeg error: {0}")]
    FfmpegError(String),
}

/// Payload-free classification of a [`SamplerError`].
///
/// Handy for `match`-ing on the failure class or for counting failures in a
/// batch without inspecting messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// See [`SamplerError::StreamOpen`].
    StreamOpen,
    /// See [`SamplerError::StreamInfo`].
    StreamInfo,
    /// See [`SamplerError::NoVideoStream`].
    NoVideoStream,
    /// See [`SamplerError::Codec`].
    Codec,
    /// See [`SamplerError::Allocation`].
    Allocation,
    /// See [`SamplerError::FrameConversion`].
    FrameConversion,
    /// See [`SamplerError::FfmpegError`].
    Ffmpeg,
}

impl SamplerError {
    /// Classify this error without its payload.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SamplerError::StreamOpen { .. } => ErrorKind::StreamOpen,
            SamplerError::StreamInfo { .. } => ErrorKind::StreamInfo,
            SamplerError::NoVideoStream => ErrorKind::NoVideoStream,
            SamplerError::Codec(_) => ErrorKind::Codec,
            SamplerError::Allocation(_) => ErrorKind::Allocation,
            SamplerError::FrameConversion(_) => ErrorKind::FrameConversion,
            SamplerError::FfmpegError(_) => ErrorKind::Ffmpeg,
        }
    }
}

impl From<FfmpegError> for SamplerError {
    fn from(error: FfmpegError) -> Self {
        SamplerError::FfmpegError(error.to_string())
    }
}
