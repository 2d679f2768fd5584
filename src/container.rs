//! Shared container open helpers.
//!
//! Both the sampling session and the stateless probes start the same way:
//! open the container, read its stream information, pick the first video
//! stream and, for sampling, open a decoder for it. Every handle returned
//! here owns its FFmpeg resources and releases them on drop.

use std::{
    ffi::CString,
    path::{Path, PathBuf},
    ptr,
};

use ffmpeg_next::{
    Error as FfmpegError, codec::context::Context as CodecContext, decoder::Video as VideoDecoder,
    format::context::Input, media::Type,
};
use ffmpeg_sys_next::{
    AVFormatContext, avformat_close_input, avformat_find_stream_info, avformat_open_input,
};

use crate::error::SamplerError;

/// Open a container and read its stream information.
///
/// Opening and probing are done as two separate FFmpeg calls so that an
/// unreadable file ([`SamplerError::StreamOpen`]) can be told apart from a
/// file whose streams cannot be resolved ([`SamplerError::StreamInfo`]).
pub(crate) fn open_input(path: &Path) -> Result<Input, SamplerError> {
    let path_buf = path.to_path_buf();

    crate::ffmpeg::initialize()?;

    let c_path = path_to_cstring(path)?;

    unsafe {
        let mut format_context: *mut AVFormatContext = ptr::null_mut();

        let open_result = avformat_open_input(
            &mut format_context,
            c_path.as_ptr(),
            ptr::null_mut(),
            ptr::null_mut(),
        );
        if open_result != 0 {
            // avformat_open_input frees the context itself on failure.
            return Err(open_error(path_buf, open_result));
        }

        let info_result = avformat_find_stream_info(format_context, ptr::null_mut());
        if info_result < 0 {
            avformat_close_input(&mut format_context);
            return Err(SamplerError::StreamInfo {
                path: path_buf,
                reason: FfmpegError::from(info_result).to_string(),
            });
        }

        Ok(Input::wrap(format_context))
    }
}

/// The path's exact bytes as a C string for `avformat_open_input`.
#[cfg(unix)]
fn path_to_cstring(path: &Path) -> Result<CString, SamplerError> {
    use std::os::unix::ffi::OsStrExt;

    CString::new(path.as_os_str().as_bytes()).map_err(|_| SamplerError::StreamOpen {
        path: path.to_path_buf(),
        reason: "path contains an interior NUL byte".to_string(),
    })
}

/// The path as a UTF-8 C string for `avformat_open_input`.
#[cfg(not(unix))]
fn path_to_cstring(path: &Path) -> Result<CString, SamplerError> {
    let utf8 = path.to_str().ok_or_else(|| SamplerError::StreamOpen {
        path: path.to_path_buf(),
        reason: "path is not valid UTF-8".to_string(),
    })?;

    CString::new(utf8).map_err(|_| SamplerError::StreamOpen {
        path: path.to_path_buf(),
        reason: "path contains an interior NUL byte".to_string(),
    })
}

fn open_error(path: PathBuf, code: i32) -> SamplerError {
    SamplerError::StreamOpen {
        path,
        reason: FfmpegError::from(code).to_string(),
    }
}

/// Index of the first stream whose media type is video.
///
/// Container order is used rather than FFmpeg's "best stream" heuristic so
/// the same stream is chosen by the session and by every probe.
pub(crate) fn first_video_stream(input: &Input) -> Result<usize, SamplerError> {
    input
        .streams()
        .find(|stream| stream.parameters().medium() == Type::Video)
        .map(|stream| stream.index())
        .ok_or(SamplerError::NoVideoStream)
}

/// Build and open a video decoder for `stream_index`.
pub(crate) fn open_video_decoder(
    input: &Input,
    stream_index: usize,
) -> Result<VideoDecoder, SamplerError> {
    let stream = input
        .stream(stream_index)
        .ok_or(SamplerError::NoVideoStream)?;

    let decoder_context = CodecContext::from_parameters(stream.parameters()).map_err(|error| {
        SamplerError::Codec(format!(
            "failed to initialise codec context for stream {stream_index}: {error}"
        ))
    })?;

    decoder_context.decoder().video().map_err(|error| {
        SamplerError::Codec(format!(
            "no usable decoder for stream {stream_index}: {error}"
        ))
    })
}
