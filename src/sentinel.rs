//! Single-value failure reporting for legacy callers.
//!
//! Older hashing code expects every operation to return a plain integer with
//! `-1` standing in for any failure. [`IntoSentinel`] collapses a
//! `Result<_, SamplerError>` into that shape at the call site, so the typed
//! API stays the primary one.
//!
//! # Example
//!
//! ```no_run
//! use framestride::{IntoSentinel, SENTINEL};
//!
//! let frames = framestride::estimated_frame_count("input.mp4").into_sentinel();
//! if frames == SENTINEL {
//!     eprintln!("could not probe input.mp4");
//! }
//! ```

use crate::error::SamplerError;

/// The value every failure collapses to.
pub const SENTINEL: i64 = -1;

/// Collapse a typed result into an `i64`, mapping every error to
/// [`SENTINEL`].
pub trait IntoSentinel {
    /// Return the success value as `i64`, or [`SENTINEL`] on error.
    ///
    /// A success value too large for `i64` also yields [`SENTINEL`].
    fn into_sentinel(self) -> i64;
}

impl<T> IntoSentinel for Result<T, SamplerError>
where
    T: TryInto<i64>,
{
    fn into_sentinel(self) -> i64 {
        match self {
            Ok(value) => value.try_into().unwrap_or(SENTINEL),
            Err(error) => {
                log::debug!("Collapsing error to sentinel: {error}");
                SENTINEL
            }
        }
    }
}
