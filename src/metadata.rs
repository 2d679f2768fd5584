//! Probe result types.
//!
//! [`ProbeReport`] is returned by [`MediaProbe::probe`](crate::MediaProbe::probe)
//! and gathers everything the individual probe functions compute from a
//! single open of the container.

use std::time::Duration;

/// Which estimation step produced a frame count.
///
/// Containers populate different metadata fields, so the count is resolved
/// by trying each source in this order and keeping the first positive
/// result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameCountSource {
    /// The frame count stored in the stream header.
    Header,
    /// Stream duration converted through its time base and frame rate.
    Duration,
    /// Position of the last index entry at or before the stream duration.
    IndexSearch,
    /// Counting the video stream's packets by demuxing the whole file.
    PacketScan,
}

/// Summary of a media file's video stream and container.
///
/// # Example
///
/// ```no_run
/// use framestride::MediaProbe;
///
/// let report = MediaProbe::probe("input.mp4")?;
/// println!(
///     "{} streams, {}x{} @ {} fps, ~{} frames ({:?})",
///     report.stream_count,
///     report.width,
///     report.height,
///     report.frame_rate,
///     report.estimated_frame_count,
///     report.frame_count_source,
/// );
/// # Ok::<(), framestride::SamplerError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct ProbeReport {
    /// Number of demuxed streams of any type.
    pub stream_count: usize,
    /// Index of the first video stream.
    pub video_stream_index: usize,
    /// Native frame width in pixels.
    pub width: u32,
    /// Native frame height in pixels.
    pub height: u32,
    /// Frame rate truncated to an integer, as reported by
    /// [`frame_rate`](crate::frame_rate).
    pub frame_rate: u32,
    /// Frame rate as a float, for callers that need the fractional part.
    pub frames_per_second: f64,
    /// Frame count as reported by
    /// [`estimated_frame_count`](crate::estimated_frame_count).
    pub estimated_frame_count: u64,
    /// Which step produced [`estimated_frame_count`](Self::estimated_frame_count).
    pub frame_count_source: FrameCountSource,
    /// Codec name (e.g. `"h264"`, `"mpeg4"`).
    pub codec: String,
    /// Container duration, zero when unknown.
    pub duration: Duration,
    /// Container format name (e.g. `"avi"`, `"mov,mp4,m4a,3gp,3g2,mj2"`).
    pub format: String,
}
