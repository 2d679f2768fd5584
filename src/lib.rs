//! # framestride
//!
//! Stride-based video frame sampling for perceptual hashing.
//!
//! `framestride` decodes a video file with FFmpeg (via the
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next) crate) and hands back
//! every Nth frame, in decode order, as an [`image::DynamicImage`] in a fixed
//! pixel format and resolution. A [`SamplerSession`] keeps the decoder open
//! between calls so large files can be consumed in bounded batches. Three
//! stateless probes report the stream count, an estimated frame count, and
//! the integer frame rate.
//!
//! ## Quick Start
//!
//! ### Sample every third frame of the first ten
//!
//! ```no_run
//! use framestride::{PixelFormat, SamplerOptions, SamplerSession};
//!
//! let options = SamplerOptions::new()
//!     .with_step(3)
//!     .with_pixel_format(PixelFormat::Gray8)
//!     .with_resolution(Some(32), Some(32));
//! let mut session = SamplerSession::new("input.mp4", options);
//!
//! let mut frames = Vec::new();
//! session.sample_range(0, 9, &mut frames)?;
//! // decode indices 0, 3, 6, 9
//! # Ok::<(), framestride::SamplerError>(())
//! ```
//!
//! ### Stream a whole file in batches
//!
//! ```no_run
//! use framestride::{SamplerOptions, SamplerSession};
//!
//! let mut session =
//!     SamplerSession::new("input.mp4", SamplerOptions::new().with_max_frames_per_call(16));
//! let mut batch = Vec::new();
//! while session.continue_sample(&mut batch)? > 0 {
//!     for frame in batch.drain(..) {
//!         println!("frame {}", frame.decode_index);
//!     }
//! }
//! # Ok::<(), framestride::SamplerError>(())
//! ```
//!
//! ### Probe a file
//!
//! ```no_run
//! let fps = framestride::frame_rate("input.mp4")?;
//! let frames = framestride::estimated_frame_count("input.mp4")?;
//! # Ok::<(), framestride::SamplerError>(())
//! ```
//!
//! ## Optional Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `rayon` | `MediaProbe::probe_many_parallel()` probes many files on the rayon pool |
//! | `full` | Enables all of the above |
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on your system.

pub mod configuration;
mod container;
mod conversion;
pub mod error;
pub mod ffmpeg;
pub mod frame;
pub mod metadata;
pub mod probe;
#[cfg(feature = "rayon")]
mod rayon;
pub mod sentinel;
pub mod session;

pub use configuration::{
    DEFAULT_MAX_FRAMES_PER_CALL, FrameOutputOptions, PixelFormat, SamplerOptions, ScalingFilter,
};
pub use error::{ErrorKind, SamplerError};
pub use ffmpeg::{FfmpegLogLevel, get_ffmpeg_log_level, set_ffmpeg_log_level};
pub use frame::SampledFrame;
pub use metadata::{FrameCountSource, ProbeReport};
pub use probe::{MediaProbe, estimated_frame_count, frame_rate, stream_count};
pub use sentinel::{IntoSentinel, SENTINEL};
pub use session::SamplerSession;
