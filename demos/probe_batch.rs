//! Parallel stream probing example (feature = "rayon").
//!
//! Usage:
//!   cargo run --features=rayon --example probe_batch -- <file>...

use std::error::Error;
use std::time::Instant;

use framestride::MediaProbe;

fn main() -> Result<(), Box<dyn Error>> {
    let paths: Vec<String> = std::env::args().skip(1).collect();
    if paths.is_empty() {
        return Err("usage: probe_batch <file>...".into());
    }

    println!("Probing {} files in parallel...", paths.len());
    let start = Instant::now();
    let reports = MediaProbe::probe_many_parallel(&paths);
    let elapsed = start.elapsed();

    for (path, report) in paths.iter().zip(&reports) {
        match report {
            Ok(report) => println!(
                "{path}: {} {}x{} {} fps, ~{} frames ({:?}), {} streams",
                report.codec,
                report.width,
                report.height,
                report.frame_rate,
                report.estimated_frame_count,
                report.frame_count_source,
                report.stream_count,
            ),
            Err(error) => println!("{path}: {error} (sentinel {})", framestride::SENTINEL),
        }
    }

    println!("Done in {elapsed:.2?}");
    Ok(())
}
