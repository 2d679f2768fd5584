//! Strided frame sampling example.
//!
//! Usage:
//!   cargo run --example sample_frames -- <input_file> [step] [low] [high]

use std::error::Error;

use framestride::{PixelFormat, SamplerOptions, SamplerSession};

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let input_path = args.next().unwrap_or_else(|| "input.mp4".to_string());
    let step: u64 = args.next().map(|s| s.parse::<u64>()).transpose()?.unwrap_or(30);
    let low: u64 = args.next().map(|s| s.parse::<u64>()).transpose()?.unwrap_or(0);
    let high: u64 = args.next().map(|s| s.parse::<u64>()).transpose()?.unwrap_or(u64::MAX);

    let estimated = framestride::estimated_frame_count(&input_path)?;
    let fps = framestride::frame_rate(&input_path)?;
    println!("{input_path}: ~{estimated} frames at {fps} fps");

    let options = SamplerOptions::new()
        .with_step(step)
        .with_max_frames_per_call(16)
        .with_pixel_format(PixelFormat::Gray8)
        .with_resolution(Some(160), None);
    let mut session = SamplerSession::new(&input_path, options);

    // The first call bounds the window; continuations keep the cadence
    // until the stream ends.
    let mut batch = Vec::new();
    let mut total = session.sample_range(low, high, &mut batch)?;
    report(&batch);

    loop {
        batch.clear();
        let count = session.continue_sample(&mut batch)?;
        if count == 0 {
            break;
        }
        report(&batch);
        total += count;
    }

    println!("Sampled {total} frames (every {step}th from frame {low})");
    Ok(())
}

fn report(batch: &[framestride::SampledFrame]) {
    for frame in batch {
        let bytes = frame.as_bytes();
        let mean = bytes.iter().map(|&b| b as u64).sum::<u64>() / bytes.len().max(1) as u64;
        println!(
            "frame {:>6}  {}x{}  mean luma {mean}",
            frame.decode_index,
            frame.width(),
            frame.height(),
        );
    }
}
