//! Fixture generation shared by the integration tests.
//!
//! Fixtures are encoded on the fly into a temporary directory: an MPEG-4 AVI
//! with a known number of frames where frame `i` is a flat gray of level
//! [`gray_level`]`(i)`, and a short PCM WAV with no video at all. Generation
//! returns `None` when the local FFmpeg build lacks the MPEG-4 encoder or the
//! AVI muxer, and tests skip in that case.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use ffmpeg_next::{
    Packet, Rational,
    codec::{Id, context::Context as CodecContext},
    format::{Flags as FormatFlags, Pixel},
    frame::Video as VideoFrame,
};
use tempfile::TempDir;

/// Width of generated videos.
pub const WIDTH: u32 = 64;
/// Height of generated videos.
pub const HEIGHT: u32 = 48;
/// Frame rate of generated videos.
pub const FPS: i32 = 25;

/// A generated media file that lives as long as this value.
pub struct Fixture {
    _directory: TempDir,
    pub path: PathBuf,
}

/// Luma value painted into frame `index`.
pub fn gray_level(index: u64) -> u8 {
    (16 + (index % 11) * 20) as u8
}

/// Mean byte value of a sampled frame.
pub fn mean_level(bytes: &[u8]) -> f64 {
    bytes.iter().map(|&b| b as f64).sum::<f64>() / bytes.len() as f64
}

/// Encode `frame_count` flat gray frames into an AVI.
pub fn gray_video(frame_count: u64) -> Option<Fixture> {
    gray_video_named(frame_count, "gray.avi")
}

/// Encode `frame_count` flat gray frames into `file_name`; the extension
/// picks the muxer (`.avi`, `.mkv`, `.m4v` for a raw MPEG-4 stream).
pub fn gray_video_named(frame_count: u64, file_name: &str) -> Option<Fixture> {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let path = directory.path().join(file_name);

    match encode_gray_video(&path, frame_count) {
        Ok(()) => Some(Fixture {
            _directory: directory,
            path,
        }),
        Err(reason) => {
            eprintln!("Skipping: cannot generate video fixture ({reason})");
            None
        }
    }
}

/// A copy of a generated video cut to `keep_percent` of its bytes.
pub fn truncated_video(frame_count: u64, keep_percent: usize) -> Option<Fixture> {
    let full = gray_video(frame_count)?;
    let bytes = std::fs::read(&full.path).expect("Failed to read fixture");

    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let path = directory.path().join("truncated.avi");
    std::fs::write(&path, &bytes[..bytes.len() * keep_percent / 100])
        .expect("Failed to write truncated fixture");

    Some(Fixture {
        _directory: directory,
        path,
    })
}

/// One second of 8 kHz mono silence as PCM WAV.
pub fn audio_only_wav() -> Fixture {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let path = directory.path().join("silence.wav");

    let sample_rate: u32 = 8000;
    let data_len: u32 = sample_rate * 2;
    let mut bytes = Vec::with_capacity(44 + data_len as usize);
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
    bytes.extend_from_slice(b"WAVE");
    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM
    bytes.extend_from_slice(&1u16.to_le_bytes()); // mono
    bytes.extend_from_slice(&sample_rate.to_le_bytes());
    bytes.extend_from_slice(&(sample_rate * 2).to_le_bytes());
    bytes.extend_from_slice(&2u16.to_le_bytes());
    bytes.extend_from_slice(&16u16.to_le_bytes());
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&data_len.to_le_bytes());
    bytes.resize(44 + data_len as usize, 0);
    std::fs::write(&path, bytes).expect("Failed to write wav fixture");

    Fixture {
        _directory: directory,
        path,
    }
}

/// A file with garbage content and a video extension.
pub fn garbage_file() -> Fixture {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let path = directory.path().join("invalid.mp4");
    std::fs::write(&path, b"this is not a media file").expect("Failed to write invalid file");
    Fixture {
        _directory: directory,
        path,
    }
}

fn encode_gray_video(path: &Path, frame_count: u64) -> Result<(), String> {
    ffmpeg_next::init().map_err(|e| e.to_string())?;

    let time_base = Rational::new(1, FPS);
    let mut output = ffmpeg_next::format::output(&path).map_err(|e| format!("output: {e}"))?;
    let needs_global_header = output.format().flags().contains(FormatFlags::GLOBAL_HEADER);
    let codec = ffmpeg_next::encoder::find(Id::MPEG4).ok_or("mpeg4 encoder not available")?;

    let mut stream = output
        .add_stream(codec)
        .map_err(|e| format!("add stream: {e}"))?;
    let stream_index = stream.index();
    stream.set_time_base(time_base);

    let mut encoder = CodecContext::from_parameters(stream.parameters())
        .map_err(|e| format!("codec context: {e}"))?
        .encoder()
        .video()
        .map_err(|e| format!("video encoder: {e}"))?;
    encoder.set_width(WIDTH);
    encoder.set_height(HEIGHT);
    encoder.set_format(Pixel::YUV420P);
    encoder.set_time_base(time_base);
    encoder.set_frame_rate(Some(Rational::new(FPS, 1)));
    encoder.set_bit_rate(800_000);
    if needs_global_header {
        unsafe {
            (*encoder.as_mut_ptr()).flags |= ffmpeg_sys_next::AV_CODEC_FLAG_GLOBAL_HEADER as i32;
        }
    }

    let mut encoder = encoder
        .open_as(codec)
        .map_err(|e| format!("open encoder: {e}"))?;
    stream.set_parameters(&encoder);

    output
        .write_header()
        .map_err(|e| format!("write header: {e}"))?;
    let stream_time_base = output
        .stream(stream_index)
        .ok_or("output stream vanished")?
        .time_base();

    let mut packet = Packet::empty();
    for index in 0..frame_count {
        let mut frame = VideoFrame::new(Pixel::YUV420P, WIDTH, HEIGHT);
        frame.data_mut(0).fill(gray_level(index));
        frame.data_mut(1).fill(128);
        frame.data_mut(2).fill(128);
        frame.set_pts(Some(index as i64));

        encoder
            .send_frame(&frame)
            .map_err(|e| format!("send frame: {e}"))?;
        while encoder.receive_packet(&mut packet).is_ok() {
            packet.set_stream(stream_index);
            packet.rescale_ts(time_base, stream_time_base);
            packet
                .write_interleaved(&mut output)
                .map_err(|e| format!("write packet: {e}"))?;
        }
    }

    encoder.send_eof().map_err(|e| format!("send eof: {e}"))?;
    while encoder.receive_packet(&mut packet).is_ok() {
        packet.set_stream(stream_index);
        packet.rescale_ts(time_base, stream_time_base);
        packet
            .write_interleaved(&mut output)
            .map_err(|e| format!("write packet: {e}"))?;
    }

    output
        .write_trailer()
        .map_err(|e| format!("write trailer: {e}"))?;
    Ok(())
}
