//! Stateless stream probes.
//!
//! Each function here opens its own container, reads what it needs and
//! closes the container before returning. Nothing is shared between calls,
//! so probes may run from several threads at once as long as each call uses
//! its own path handle.
//!
//! # Example
//!
//! ```no_run
//! let streams = framestride::stream_count("input.mp4")?;
//! let frames = framestride::estimated_frame_count("input.mp4")?;
//! let fps = framestride::frame_rate("input.mp4")?;
//! println!("{streams} streams, ~{frames} frames at {fps} fps");
//! # Ok::<(), framestride::SamplerError>(())
//! ```

use std::{os::raw::c_int, path::Path, time::Duration};

use ffmpeg_next::{Error as FfmpegError, Packet, Rational, Stream, format::context::Input};
use ffmpeg_sys_next::{AVSEEK_FLAG_ANY, AVSEEK_FLAG_BACKWARD, AVStream, av_index_search_timestamp};

use crate::{
    container,
    error::SamplerError,
    metadata::{FrameCountSource, ProbeReport},
};

/// Number of streams (video, audio and any other type) in the container.
///
/// # Errors
///
/// [`SamplerError::StreamOpen`] or [`SamplerError::StreamInfo`] when the
/// file cannot be opened or probed.
pub fn stream_count<P: AsRef<Path>>(path: P) -> Result<usize, SamplerError> {
    let input = container::open_input(path.as_ref())?;
    Ok(input.nb_streams() as usize)
}

/// Estimated number of frames in the first video stream.
///
/// The count comes from the first of these that yields a positive value:
///
/// 1. the frame count in the stream header;
/// 2. the stream duration converted through its time base and frame rate;
/// 3. the last index entry at or before the stream duration;
/// 4. a demux pass counting the stream's packets.
///
/// # Errors
///
/// [`SamplerError::StreamOpen`], [`SamplerError::StreamInfo`], or
/// [`SamplerError::NoVideoStream`].
pub fn estimated_frame_count<P: AsRef<Path>>(path: P) -> Result<u64, SamplerError> {
    let mut input = container::open_input(path.as_ref())?;
    let stream_index = container::first_video_stream(&input)?;
    let (count, source) = resolve_frame_count(&mut input, stream_index)?;
    log::debug!(
        "Frame count for {}: {count} ({source:?})",
        path.as_ref().display()
    );
    Ok(count)
}

/// Frame rate of the first video stream, truncated to an integer.
///
/// Uses the stream's base frame rate (`r_frame_rate`) and integer division,
/// so `30000/1001` reports `29`. Falls back to the average frame rate when
/// the base rate is unset, and to `0` when neither is usable.
///
/// # Errors
///
/// [`SamplerError::StreamOpen`], [`SamplerError::StreamInfo`], or
/// [`SamplerError::NoVideoStream`].
pub fn frame_rate<P: AsRef<Path>>(path: P) -> Result<u32, SamplerError> {
    let input = container::open_input(path.as_ref())?;
    let stream_index = container::first_video_stream(&input)?;
    let stream = input
        .stream(stream_index)
        .ok_or(SamplerError::NoVideoStream)?;
    Ok(stream_frame_rate(&stream))
}

/// One-shot probing of every metadata field at once.
///
/// Opens the file a single time and fills a [`ProbeReport`], instead of the
/// three opens the individual functions would need.
pub struct MediaProbe;

impl MediaProbe {
    /// Probe a media file.
    ///
    /// # Errors
    ///
    /// [`SamplerError::StreamOpen`], [`SamplerError::StreamInfo`], or
    /// [`SamplerError::NoVideoStream`].
    pub fn probe<P: AsRef<Path>>(path: P) -> Result<ProbeReport, SamplerError> {
        let path = path.as_ref();
        let mut input = container::open_input(path)?;
        let stream_index = container::first_video_stream(&input)?;

        let stream_count = input.nb_streams() as usize;
        let format = input.format().name().to_string();
        let duration_microseconds = input.duration();
        let duration = if duration_microseconds > 0 {
            Duration::from_micros(duration_microseconds as u64)
        } else {
            Duration::ZERO
        };

        let (width, height, codec, frame_rate, frames_per_second) = {
            let stream = input
                .stream(stream_index)
                .ok_or(SamplerError::NoVideoStream)?;
            let parameters = stream.parameters();
            let raw_parameters = unsafe { *parameters.as_ptr() };
            let rate = preferred_rate(&stream);
            let frames_per_second = if rate.denominator() > 0 {
                rate.numerator() as f64 / rate.denominator() as f64
            } else {
                0.0
            };
            (
                raw_parameters.width.max(0) as u32,
                raw_parameters.height.max(0) as u32,
                parameters.id().name().to_string(),
                stream_frame_rate(&stream),
                frames_per_second,
            )
        };

        let (estimated_frame_count, frame_count_source) =
            resolve_frame_count(&mut input, stream_index)?;

        log::debug!(
            "Probed {}: {stream_count} streams, video stream {stream_index} {codec} {width}x{height} @ {frames_per_second:.3} fps, ~{estimated_frame_count} frames ({frame_count_source:?})",
            path.display(),
        );

        Ok(ProbeReport {
            stream_count,
            video_stream_index: stream_index,
            width,
            height,
            frame_rate,
            frames_per_second,
            estimated_frame_count,
            frame_count_source,
            codec,
            duration,
            format,
        })
    }

    /// Probe several files one after another.
    ///
    /// A file that cannot be probed produces an `Err` entry rather than
    /// aborting the batch.
    pub fn probe_many<P: AsRef<Path>>(paths: &[P]) -> Vec<Result<ProbeReport, SamplerError>> {
        paths.iter().map(Self::probe).collect()
    }

    /// Probe several files on the rayon thread pool.
    ///
    /// Results keep the order of `paths`. Each worker opens its own
    /// container.
    #[cfg(feature = "rayon")]
    pub fn probe_many_parallel<P: AsRef<Path> + Sync>(
        paths: &[P],
    ) -> Vec<Result<ProbeReport, SamplerError>> {
        crate::rayon::probe_parallel(paths)
    }
}

/// Resolve a frame count for `stream_index`, returning the count and the
/// step that produced it.
fn resolve_frame_count(
    input: &mut Input,
    stream_index: usize,
) -> Result<(u64, FrameCountSource), SamplerError> {
    let (header, duration_estimate, index_estimate) = {
        let stream = input
            .stream(stream_index)
            .ok_or(SamplerError::NoVideoStream)?;
        (
            stream.frames(),
            estimate_from_duration(stream.duration(), stream.time_base(), preferred_rate(&stream)),
            index_search_frame_count(&stream),
        )
    };

    Ok(first_frame_count(header, duration_estimate, index_estimate, || {
        count_stream_packets(input, stream_index)
    }))
}

/// Pick the first usable frame count, in fallback order. `scan` runs only
/// when every metadata source is unusable.
fn first_frame_count(
    header: i64,
    duration_estimate: Option<u64>,
    index_estimate: Option<u64>,
    scan: impl FnOnce() -> u64,
) -> (u64, FrameCountSource) {
    if header > 0 {
        return (header as u64, FrameCountSource::Header);
    }
    if let Some(count) = duration_estimate {
        return (count, FrameCountSource::Duration);
    }
    if let Some(count) = index_estimate {
        return (count, FrameCountSource::IndexSearch);
    }
    (scan(), FrameCountSource::PacketScan)
}

/// Demux the rest of the file and count packets of `stream_index`.
///
/// Stops at the first read error of any kind, end of file included, so a
/// demuxer that keeps failing cannot stall the scan.
fn count_stream_packets(input: &mut Input, stream_index: usize) -> u64 {
    let mut count = 0u64;
    let mut packet = Packet::empty();
    loop {
        match packet.read(input) {
            Ok(()) => {
                if packet.stream() == stream_index {
                    count += 1;
                }
            }
            Err(FfmpegError::Eof) => break,
            Err(error) => {
                log::debug!("Packet scan stopped after {count} packets: {error}");
                break;
            }
        }
    }
    count
}

/// Frames covered by `duration` (in `time_base` units) at `rate`, truncated.
///
/// Returns `None` when any input is unset or the result is not positive.
fn estimate_from_duration(duration: i64, time_base: Rational, rate: Rational) -> Option<u64> {
    if duration <= 0 || !is_positive(time_base) || !is_positive(rate) {
        return None;
    }

    let numerator =
        duration as i128 * time_base.numerator() as i128 * rate.numerator() as i128;
    let denominator = time_base.denominator() as i128 * rate.denominator() as i128;
    let frames = numerator / denominator;

    (frames > 0).then(|| frames.min(u64::MAX as i128) as u64)
}

/// Count index entries up to the stream's duration.
fn index_search_frame_count(stream: &Stream) -> Option<u64> {
    let duration = stream.duration();
    if duration <= 0 {
        return None;
    }

    let flags = (AVSEEK_FLAG_ANY | AVSEEK_FLAG_BACKWARD) as c_int;
    let entry =
        unsafe { av_index_search_timestamp(stream.as_ptr() as *mut AVStream, duration, flags) };

    (entry >= 0).then(|| entry as u64 + 1)
}

/// Integer frame rate of a stream: base rate first, then average rate.
fn stream_frame_rate(stream: &Stream) -> u32 {
    truncated_frame_rate(stream.rate())
        .or_else(|| truncated_frame_rate(stream.avg_frame_rate()))
        .unwrap_or(0)
}

/// `numerator / denominator` with integer truncation, or `None` for an
/// unset or negative rational.
fn truncated_frame_rate(rate: Rational) -> Option<u32> {
    if rate.denominator() <= 0 || rate.numerator() < 0 {
        return None;
    }
    Some((rate.numerator() / rate.denominator()) as u32)
}

/// The rate used for duration-based estimates: average rate when set, base
/// rate otherwise.
fn preferred_rate(stream: &Stream) -> Rational {
    let average = stream.avg_frame_rate();
    if is_positive(average) {
        average
    } else {
        stream.rate()
    }
}

fn is_positive(rational: Rational) -> bool {
    rational.numerator() > 0 && rational.denominator() > 0
}
