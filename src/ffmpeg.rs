//! FFmpeg initialisation and log level configuration.
//!
//! FFmpeg has its own logging system, separate from the Rust
//! [`log`](https://crates.io/crates/log) crate. Frame sampling runs over many
//! files in hashing workloads and FFmpeg's per-file warnings are noise there,
//! so the first container this crate opens also sets FFmpeg's level to
//! [`FfmpegLogLevel::Quiet`]. Callers who want FFmpeg's diagnostics back can
//! raise the level at any time afterwards.
//!
//! # Example
//!
//! ```no_run
//! use framestride::{FfmpegLogLevel, SamplerOptions, SamplerSession};
//!
//! let mut session = SamplerSession::new("input.mp4", SamplerOptions::new());
//! let mut frames = Vec::new();
//! session.continue_sample(&mut frames)?;
//!
//! // Show FFmpeg's own errors for the remaining calls.
//! framestride::set_ffmpeg_log_level(FfmpegLogLevel::Error);
//! # Ok::<(), framestride::SamplerError>(())
//! ```

use std::sync::OnceLock;

use ffmpeg_next::{Error as FfmpegError, util::log::Level};

static INITIALIZED: OnceLock<Result<(), FfmpegError>> = OnceLock::new();

/// Initialise FFmpeg once per process and silence its console output.
///
/// Later calls return the outcome of the first one.
pub(crate) fn initialize() -> Result<(), FfmpegError> {
    *INITIALIZED.get_or_init(|| {
        let result = ffmpeg_next::init();
        ffmpeg_next::util::log::set_level(Level::Quiet);
        log::debug!("FFmpeg initialised (result={result:?}), console logging silenced");
        result
    })
}

/// Verbosity of FFmpeg's own console logging, most quiet first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FfmpegLogLevel {
    /// Nothing. This is what initialisation sets.
    Quiet,
    /// Only conditions FFmpeg aborts on.
    Panic,
    /// Unrecoverable errors.
    Fatal,
    /// Recoverable errors, such as a corrupt packet.
    Error,
    /// Warnings. FFmpeg's built-in default.
    Warning,
    /// Informational messages, such as stream summaries.
    Info,
    /// More detailed informational messages.
    Verbose,
    /// Messages useful when debugging FFmpeg itself.
    Debug,
    /// Everything, including per-packet tracing.
    Trace,
}

const LEVELS: [(FfmpegLogLevel, Level); 9] = [
    (FfmpegLogLevel::Quiet, Level::Quiet),
    (FfmpegLogLevel::Panic, Level::Panic),
    (FfmpegLogLevel::Fatal, Level::Fatal),
    (FfmpegLogLevel::Error, Level::Error),
    (FfmpegLogLevel::Warning, Level::Warning),
    (FfmpegLogLevel::Info, Level::Info),
    (FfmpegLogLevel::Verbose, Level::Verbose),
    (FfmpegLogLevel::Debug, Level::Debug),
    (FfmpegLogLevel::Trace, Level::Trace),
];

impl From<FfmpegLogLevel> for Level {
    fn from(level: FfmpegLogLevel) -> Self {
        LEVELS
            .iter()
            .find(|(ours, _)| *ours == level)
            .map_or(Level::Quiet, |&(_, theirs)| theirs)
    }
}

/// Change FFmpeg's console verbosity.
///
/// FFmpeg is initialised first if needed, so the silencing applied on first
/// open never overrides a level chosen here. Rust-side `log` output is
/// unaffected.
pub fn set_ffmpeg_log_level(level: FfmpegLogLevel) {
    if let Err(error) = initialize() {
        log::debug!("Setting FFmpeg log level without a successful init: {error}");
    }
    ffmpeg_next::util::log::set_level(level.into());
}

/// FFmpeg's current console verbosity, or `None` for a level between the
/// named ones.
pub fn get_ffmpeg_log_level() -> Option<FfmpegLogLevel> {
    let current = ffmpeg_next::util::log::get_level().ok()?;
    LEVELS
        .iter()
        .find(|(_, theirs)| *theirs == current)
        .map(|&(ours, _)| ours)
}
