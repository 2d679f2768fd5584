//! Resumable stride-based frame sampling.
//!
//! A [`SamplerSession`] tracks one video file across many sampling calls. The
//! container and decoder are opened lazily on the first call and stay open
//! between calls, so each call picks up decoding where the previous one
//! stopped. Frames are counted in decode order; every `step`-th frame
//! (starting from the cadence origin) is scaled, converted and handed back.
//!
//! Two entry points share one decode loop:
//!
//! - [`sample_range`](SamplerSession::sample_range) re-targets the cadence to
//!   `low` and stops once decoding moves past `high`.
//! - [`continue_sample`](SamplerSession::continue_sample) keeps the current
//!   cadence and runs until the batch is full or the stream ends.
//!
//! # Example
//!
//! ```no_run
//! use framestride::{PixelFormat, SamplerOptions, SamplerSession};
//!
//! let options = SamplerOptions::new()
//!     .with_step(3)
//!     .with_max_frames_per_call(50)
//!     .with_pixel_format(PixelFormat::Gray8)
//!     .with_resolution(Some(32), Some(32));
//! let mut session = SamplerSession::new("input.mp4", options);
//!
//! let mut frames = Vec::new();
//! while session.continue_sample(&mut frames)? > 0 {}
//! println!("sampled {} frames", frames.len());
//! # Ok::<(), framestride::SamplerError>(())
//! ```

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
};

use ffmpeg_next::{
    Error as FfmpegError, Packet,
    decoder::Video as VideoDecoder,
    format::context::Input,
    frame::Video as VideoFrame,
    software::scaling::Context as ScalingContext,
};

use crate::{
    configuration::{FrameOutputOptions, SamplerOptions},
    container,
    conversion::frame_to_image,
    error::SamplerError,
    frame::SampledFrame,
};

/// Which frames a sampling pass may look at, and where its cadence starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SampleWindow {
    /// Restart the cadence at `low`; stop once decoding passes `high`.
    Bounded { low: u64, high: u64 },
    /// Keep the current cadence; no upper bound.
    Continuation,
}

impl SampleWindow {
    fn restart_index(self) -> Option<u64> {
        match self {
            SampleWindow::Bounded { low, .. } => Some(low),
            SampleWindow::Continuation => None,
        }
    }

    fn is_past_end(self, current_index: u64) -> bool {
        match self {
            SampleWindow::Bounded { high, .. } => current_index > high,
            SampleWindow::Continuation => false,
        }
    }
}

/// Why a sampling pass stopped.
#[derive(Debug)]
enum StopReason {
    BatchFull,
    PastWindow,
    EndOfStream,
    ReadError(FfmpegError),
}

/// Decode-order bookkeeping for an open source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct SampleCursor {
    /// Frames decoded so far.
    current_index: u64,
    /// Decode index of the next frame to emit.
    next_sample_index: u64,
}

/// An open container plus the decoder for its video stream.
struct VideoSource {
    // Declared before `input` so the codec context is released first.
    decoder: VideoDecoder,
    input: Input,
    stream_index: usize,
    output_width: u32,
    output_height: u32,
    end_of_stream: bool,
}

impl VideoSource {
    fn open(path: &Path, frame_output: &FrameOutputOptions) -> Result<Self, SamplerError> {
        let input = container::open_input(path)?;
        let stream_index = container::first_video_stream(&input)?;
        let decoder = container::open_video_decoder(&input, stream_index)?;

        let (output_width, output_height) =
            frame_output.resolve_dimensions(decoder.width(), decoder.height());
        if output_width == 0 || output_height == 0 {
            return Err(SamplerError::Codec(format!(
                "decoder reports no frame size for stream {stream_index}"
            )));
        }

        log::info!(
            "Opened {} for sampling: stream {}, {}x{} {:?} -> {}x{} {:?}",
            path.display(),
            stream_index,
            decoder.width(),
            decoder.height(),
            decoder.format(),
            output_width,
            output_height,
            frame_output.pixel_format,
        );

        Ok(Self {
            decoder,
            input,
            stream_index,
            output_width,
            output_height,
            end_of_stream: false,
        })
    }

    /// Run one sampling pass, appending emitted frames to `output`.
    ///
    /// The scaler and frame buffers live only for this pass.
    fn sample_into(
        &mut self,
        cursor: &mut SampleCursor,
        window: SampleWindow,
        options: &SamplerOptions,
        output: &mut Vec<SampledFrame>,
    ) -> Result<StopReason, SamplerError> {
        let frame_output = options.frame_output;
        let mut scaler: Option<ScalingContext> = None;
        let mut decoded_frame = VideoFrame::empty();
        let mut scaled_frame = VideoFrame::empty();
        let mut emitted = 0usize;

        let stop = loop {
            if emitted >= options.max_frames_per_call {
                break StopReason::BatchFull;
            }
            if window.is_past_end(cursor.current_index) {
                break StopReason::PastWindow;
            }

            // Drain what the decoder already holds before reading more input,
            // so frames buffered at the end of the previous call are not lost.
            if self.decoder.receive_frame(&mut decoded_frame).is_ok() {
                if cursor.current_index == cursor.next_sample_index {
                    let scaler = scaler_for(&mut scaler, &decoded_frame, self, &frame_output)?;
                    scaler
                        .run(&decoded_frame, &mut scaled_frame)
                        .map_err(|error| SamplerError::FrameConversion(error.to_string()))?;
                    let image = frame_to_image(
                        &scaled_frame,
                        self.output_width,
                        self.output_height,
                        frame_output.pixel_format,
                    )?;
                    output.push(SampledFrame::new(cursor.current_index, image));
                    cursor.next_sample_index += options.step;
                    emitted += 1;
                }
                cursor.current_index += 1;
                continue;
            }

            if self.end_of_stream {
                break StopReason::EndOfStream;
            }

            let mut packet = Packet::empty();
            match packet.read(&mut self.input) {
                Ok(()) => {
                    if packet.stream() != self.stream_index {
                        continue;
                    }
                    if let Err(error) = self.decoder.send_packet(&packet) {
                        log::debug!(
                            "Decoder rejected packet at pts {:?}: {error}",
                            packet.pts()
                        );
                    }
                }
                Err(FfmpegError::Eof) => {
                    if let Err(error) = self.decoder.send_eof() {
                        log::debug!("Failed to flush decoder at end of stream: {error}");
                    }
                    self.end_of_stream = true;
                }
                Err(error) => break StopReason::ReadError(error),
            }
        };

        Ok(stop)
    }
}

/// Return the pass's scaler, (re)building it when the decoded frame's
/// format or size differs from what the scaler was built for.
fn scaler_for<'a>(
    scaler: &'a mut Option<ScalingContext>,
    decoded_frame: &VideoFrame,
    source: &VideoSource,
    frame_output: &FrameOutputOptions,
) -> Result<&'a mut ScalingContext, SamplerError> {
    let matches_input = scaler.as_ref().is_some_and(|context| {
        let input = context.input();
        input.format == decoded_frame.format()
            && input.width == decoded_frame.width()
            && input.height == decoded_frame.height()
    });

    if !matches_input {
        let context = ScalingContext::get(
            decoded_frame.format(),
            decoded_frame.width(),
            decoded_frame.height(),
            frame_output.pixel_format.to_ffmpeg_pixel(),
            source.output_width,
            source.output_height,
            frame_output.scaling_filter.to_ffmpeg_flags(),
        )
        .map_err(|error| {
            SamplerError::Allocation(format!(
                "scaling context {:?} {}x{} -> {}x{}: {error}",
                decoded_frame.format(),
                decoded_frame.width(),
                decoded_frame.height(),
                source.output_width,
                source.output_height,
            ))
        })?;
        *scaler = Some(context);
    }

    scaler
        .as_mut()
        .ok_or_else(|| SamplerError::Allocation("scaling context".to_string()))
}

/// A resumable frame sampler over one video file.
///
/// Construction performs no I/O. The first sampling call opens the container,
/// selects the first video stream and opens its decoder; the handle then
/// stays open across calls. It is released by [`close`](Self::close), when
/// the session is dropped, or automatically when reading the container fails
/// (in which case the next call reopens the file from the start).
///
/// Reaching the end of the stream is not a failure: the handle stays open and
/// further calls return `Ok(0)`.
///
/// A session is meant for one thread at a time; every sampling call takes
/// `&mut self`.
pub struct SamplerSession {
    path: PathBuf,
    options: SamplerOptions,
    source: Option<VideoSource>,
    cursor: SampleCursor,
}

impl Debug for SamplerSession {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("SamplerSession")
            .field("path", &self.path)
            .field("options", &self.options)
            .field("is_open", &self.is_open())
            .field("current_index", &self.cursor.current_index)
            .field("next_sample_index", &self.cursor.next_sample_index)
            .finish_non_exhaustive()
    }
}

impl SamplerSession {
    /// Create a closed session for `path`.
    pub fn new<P: AsRef<Path>>(path: P, options: SamplerOptions) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            options,
            source: None,
            cursor: SampleCursor::default(),
        }
    }

    /// Sample frames whose decode index lies in `low..=high`.
    ///
    /// The cadence restarts at `low` on every call, so frames `low`,
    /// `low + step`, `low + 2 × step`, … are emitted as decoding reaches
    /// them, up to the configured batch size. Decoding never goes backwards:
    /// if the session has already decoded past `low`, only frames at or after
    /// the current position can be emitted.
    ///
    /// Frames are appended to `output` in decode order. Returns the number
    /// appended by this call.
    ///
    /// # Errors
    ///
    /// - [`SamplerError::StreamOpen`], [`SamplerError::StreamInfo`],
    ///   [`SamplerError::NoVideoStream`], [`SamplerError::Codec`] when the
    ///   lazy open fails. The session stays closed.
    /// - [`SamplerError::Allocation`] or [`SamplerError::FrameConversion`]
    ///   when a frame cannot be converted. The session is closed and frames
    ///   appended earlier in the same call are removed from `output`.
    ///
    /// A read error from the container is not returned: the session closes
    /// itself and the frames gathered so far are counted.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use framestride::{SamplerOptions, SamplerSession};
    ///
    /// let mut session = SamplerSession::new("input.mp4", SamplerOptions::new().with_step(3));
    /// let mut frames = Vec::new();
    /// let count = session.sample_range(0, 9, &mut frames)?;
    /// for frame in &frames {
    ///     println!("frame {} ({}x{})", frame.decode_index, frame.width(), frame.height());
    /// }
    /// # let _ = count;
    /// # Ok::<(), framestride::SamplerError>(())
    /// ```
    pub fn sample_range(
        &mut self,
        low: u64,
        high: u64,
        output: &mut Vec<SampledFrame>,
    ) -> Result<usize, SamplerError> {
        self.sample(SampleWindow::Bounded { low, high }, output)
    }

    /// Continue sampling from where the previous call stopped.
    ///
    /// Keeps the current cadence (starting at frame 0 on a fresh open) and
    /// runs until the batch is full or the stream ends. Returns the number of
    /// frames appended; `Ok(0)` once the stream is exhausted.
    ///
    /// # Errors
    ///
    /// Same as [`sample_range`](Self::sample_range).
    pub fn continue_sample(&mut self, output: &mut Vec<SampledFrame>) -> Result<usize, SamplerError> {
        self.sample(SampleWindow::Continuation, output)
    }

    fn sample(
        &mut self,
        window: SampleWindow,
        output: &mut Vec<SampledFrame>,
    ) -> Result<usize, SamplerError> {
        let source = match &mut self.source {
            Some(source) => source,
            slot => {
                let opened = VideoSource::open(&self.path, &self.options.frame_output)?;
                self.cursor = SampleCursor::default();
                slot.insert(opened)
            }
        };

        if let Some(low) = window.restart_index() {
            if low < self.cursor.current_index {
                log::debug!(
                    "Range starts at {low} but {} frames are already decoded in {}",
                    self.cursor.current_index,
                    self.path.display(),
                );
            }
            self.cursor.next_sample_index = low;
        }

        let first_new = output.len();
        let outcome = source.sample_into(&mut self.cursor, window, &self.options, output);
        self.finish_pass(outcome, output, first_new)
    }

    /// Apply the teardown policy for a finished pass and count the frames it
    /// appended after `first_new`.
    ///
    /// A read error closes the session but keeps the frames. Any other error
    /// closes the session and removes this call's frames from `output`.
    fn finish_pass(
        &mut self,
        outcome: Result<StopReason, SamplerError>,
        output: &mut Vec<SampledFrame>,
        first_new: usize,
    ) -> Result<usize, SamplerError> {
        let emitted = output.len() - first_new;

        match outcome {
            Ok(StopReason::ReadError(error)) => {
                log::warn!(
                    "Read error in {} after {} decoded frames, closing session: {error}",
                    self.path.display(),
                    self.cursor.current_index,
                );
                self.close();
                Ok(emitted)
            }
            Ok(stop) => {
                log::debug!(
                    "Sampled {emitted} frames from {} ({stop:?}, decoded={}, next={})",
                    self.path.display(),
                    self.cursor.current_index,
                    self.cursor.next_sample_index,
                );
                Ok(emitted)
            }
            Err(error) => {
                output.truncate(first_new);
                self.close();
                Err(error)
            }
        }
    }

    /// Release the container and decoder.
    ///
    /// Idempotent. The next sampling call reopens the file, resolves output
    /// dimensions again, and restarts decode-order counting at 0.
    pub fn close(&mut self) {
        if self.source.take().is_some() {
            log::debug!("Closed sampling session for {}", self.path.display());
        }
    }

    /// Returns `true` while a container and decoder are held open.
    pub fn is_open(&self) -> bool {
        self.source.is_some()
    }

    /// Returns `true` once the open handle has hit the end of the stream and
    /// the decoder has been flushed.
    pub fn is_exhausted(&self) -> bool {
        self.source
            .as_ref()
            .is_some_and(|source| source.end_of_stream)
    }

    /// Number of frames decoded since the last open.
    pub fn current_index(&self) -> u64 {
        self.cursor.current_index
    }

    /// Decode index of the next frame that will be emitted.
    pub fn next_sample_index(&self) -> u64 {
        self.cursor.next_sample_index
    }

    /// Resolved output `(width, height)`, or `None` while closed.
    pub fn output_dimensions(&self) -> Option<(u32, u32)> {
        self.source
            .as_ref()
            .map(|source| (source.output_width, source.output_height))
    }

    /// Index of the sampled video stream within the container, or `None`
    /// while closed.
    pub fn video_stream_index(&self) -> Option<usize> {
        self.source.as_ref().map(|source| source.stream_index)
    }

    /// Path of the source file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The session's sampling options.
    pub fn options(&self) -> &SamplerOptions {
        &self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_window_stops_after_high() {
        let window = SampleWindow::Bounded { low: 2, high: 9 };
        assert!(!window.is_past_end(9));
        assert!(window.is_past_end(10));
        assert_eq!(window.restart_index(), Some(2));
    }

    #[test]
    fn continuation_window_never_ends_or_restarts() {
        let window = SampleWindow::Continuation;
        assert!(!window.is_past_end(u64::MAX));
        assert_eq!(window.restart_index(), None);
    }

    fn blank_frame(decode_index: u64) -> SampledFrame {
        SampledFrame::new(
            decode_index,
            image::DynamicImage::ImageLuma8(image::GrayImage::new(2, 2)),
        )
    }

    #[test]
    fn read_error_closes_session_and_keeps_frames() {
        let mut session = SamplerSession::new("clip.avi", SamplerOptions::new());
        session.cursor = SampleCursor {
            current_index: 7,
            next_sample_index: 9,
        };
        let mut output = vec![blank_frame(0), blank_frame(3), blank_frame(6)];

        let outcome = Ok(StopReason::ReadError(FfmpegError::Other { errno: 5 }));
        let count = session
            .finish_pass(outcome, &mut output, 1)
            .expect("read errors are not reported");

        assert_eq!(count, 2);
        assert_eq!(output.len(), 3);
        assert!(!session.is_open());
        assert_eq!(session.output_dimensions(), None);
        assert_eq!(session.video_stream_index(), None);
    }

    #[test]
    fn conversion_error_discards_frames_of_the_failed_call() {
        let mut session = SamplerSession::new("clip.avi", SamplerOptions::new());
        let mut output = vec![blank_frame(0), blank_frame(1), blank_frame(2)];

        let outcome = Err(SamplerError::FrameConversion("plane too small".to_string()));
        let error = session
            .finish_pass(outcome, &mut output, 1)
            .expect_err("conversion errors are reported");

        assert_eq!(error.kind(), crate::ErrorKind::FrameConversion);
        assert_eq!(output.len(), 1);
        assert_eq!(output[0].decode_index, 0);
        assert!(!session.is_open());
    }

    #[test]
    fn end_of_stream_reports_emitted_count() {
        let mut session = SamplerSession::new("clip.avi", SamplerOptions::new());
        let mut output = vec![blank_frame(4)];

        let count = session
            .finish_pass(Ok(StopReason::EndOfStream), &mut output, 0)
            .expect("end of stream is not an error");
        assert_eq!(count, 1);
    }

    #[test]
    fn new_session_performs_no_io() {
        let session = SamplerSession::new("does/not/exist.mp4", SamplerOptions::new());
        assert!(!session.is_open());
        assert!(!session.is_exhausted());
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.output_dimensions(), None);
    }
}
