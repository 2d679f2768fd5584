//! Benchmarks for strided sampling and stream probing.
//!
//! Run with: cargo bench
//! Run with all features: cargo bench --all-features
//!
//! Set `FRAMESTRIDE_BENCH_VIDEO` to a local video file; benchmarks skip
//! when it is unset or missing.

use std::{hint::black_box, path::PathBuf, time::Duration};

use criterion::Criterion;
use framestride::{
    FfmpegLogLevel, MediaProbe, PixelFormat, SamplerOptions, SamplerSession,
    set_ffmpeg_log_level,
};

fn bench_video() -> Option<PathBuf> {
    set_ffmpeg_log_level(FfmpegLogLevel::Quiet);

    let path = PathBuf::from(std::env::var_os("FRAMESTRIDE_BENCH_VIDEO")?);
    if !path.exists() {
        eprintln!("Skipping benchmark: {} not found", path.display());
        return None;
    }
    Some(path)
}

fn sample_all(path: &PathBuf, options: &SamplerOptions) -> usize {
    let mut session = SamplerSession::new(path, options.clone());
    let mut frames = Vec::new();
    while session.continue_sample(&mut frames).unwrap() > 0 {}
    frames.len()
}

fn benchmark_stride(criterion: &mut Criterion) {
    let Some(video) = bench_video() else {
        return;
    };

    let mut group = criterion.benchmark_group("stride");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(10));

    for step in [1u64, 5, 25] {
        let options = SamplerOptions::new().with_step(step);
        group.bench_function(format!("every {step} frames"), |bencher| {
            bencher.iter(|| black_box(sample_all(&video, &options)));
        });
    }

    group.finish();
}

fn benchmark_first_range(criterion: &mut Criterion) {
    let Some(video) = bench_video() else {
        return;
    };

    criterion.bench_function("open and sample frames 0-9", |bencher| {
        bencher.iter(|| {
            let mut session = SamplerSession::new(&video, SamplerOptions::new());
            let mut frames = Vec::new();
            black_box(session.sample_range(0, 9, &mut frames).unwrap());
        });
    });
}

fn benchmark_pixel_formats(criterion: &mut Criterion) {
    let Some(video) = bench_video() else {
        return;
    };

    let mut group = criterion.benchmark_group("pixel formats");

    for (name, format) in [("rgb8", PixelFormat::Rgb8), ("gray8", PixelFormat::Gray8)] {
        let options = SamplerOptions::new()
            .with_step(10)
            .with_max_frames_per_call(10)
            .with_pixel_format(format);
        group.bench_function(name, |bencher| {
            bencher.iter(|| {
                let mut session = SamplerSession::new(&video, options.clone());
                let mut frames = Vec::new();
                black_box(session.continue_sample(&mut frames).unwrap());
            });
        });
    }

    let options = SamplerOptions::new()
        .with_step(10)
        .with_max_frames_per_call(10)
        .with_resolution(Some(160), Some(90));
    group.bench_function("rgb8 160x90", |bencher| {
        bencher.iter(|| {
            let mut session = SamplerSession::new(&video, options.clone());
            let mut frames = Vec::new();
            black_box(session.continue_sample(&mut frames).unwrap());
        });
    });

    group.finish();
}

fn benchmark_probe(criterion: &mut Criterion) {
    let Some(video) = bench_video() else {
        return;
    };

    criterion.bench_function("probe report", |bencher| {
        bencher.iter(|| black_box(MediaProbe::probe(&video).unwrap()));
    });

    criterion.bench_function("estimated frame count", |bencher| {
        bencher.iter(|| black_box(framestride::estimated_frame_count(&video).unwrap()));
    });
}

#[cfg(feature = "rayon")]
fn benchmark_parallel_probe(criterion: &mut Criterion) {
    let Some(video) = bench_video() else {
        return;
    };

    let paths = vec![video; 8];
    let mut group = criterion.benchmark_group("probe 8 files");
    group.sample_size(30);

    group.bench_function("sequential", |bencher| {
        bencher.iter(|| black_box(MediaProbe::probe_many(&paths)));
    });
    group.bench_function("parallel", |bencher| {
        bencher.iter(|| black_box(MediaProbe::probe_many_parallel(&paths)));
    });

    group.finish();
}

#[cfg(not(feature = "rayon"))]
fn benchmark_parallel_probe(_criterion: &mut Criterion) {}

criterion::criterion_group!(
    benches,
    benchmark_stride,
    benchmark_first_range,
    benchmark_pixel_formats,
    benchmark_probe,
    benchmark_parallel_probe,
);
criterion::criterion_main!(benches);
