//! Criterion benchmarks for the full inflator processor
//!
//! Run with: cargo bench -p inflato-engine
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use inflato_core::{OversampleFactor, PhaseMode, ResamplerQuality};
use inflato_engine::{Inflator, InflatorState, StreamSetup};

const SAMPLE_RATE: f64 = 48000.0;
const BLOCK_SIZE: usize = 512;

fn generate_test_signal(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            let t = i as f64 / SAMPLE_RATE;
            ((2.0 * std::f64::consts::PI * 440.0 * t).sin() * 0.5) as f32
        })
        .collect()
}

fn prepared(state: InflatorState) -> Inflator {
    let mut inflator = Inflator::with_quality(ResamplerQuality::Standard);
    inflator.set_state(state);
    if let Err(err) = inflator.prepare(StreamSetup::new(SAMPLE_RATE, 2, BLOCK_SIZE)) {
        panic!("prepare failed: {err}");
    }
    inflator
}

fn bench_modes(c: &mut Criterion) {
    let mut group = c.benchmark_group("Inflator");
    let input = generate_test_signal(BLOCK_SIZE);

    for phase in [PhaseMode::Minimum, PhaseMode::Linear] {
        for factor in [
            OversampleFactor::X1,
            OversampleFactor::X2,
            OversampleFactor::X4,
            OversampleFactor::X8,
        ] {
            let state = InflatorState {
                oversampling: factor,
                phase,
                ..Default::default()
            };
            group.bench_with_input(
                BenchmarkId::new(format!("{phase:?}"), format!("{}x", factor.ratio())),
                &state,
                |b, &state| {
                    let mut inflator = prepared(state);
                    let mut left = vec![0.0f32; BLOCK_SIZE];
                    let mut right = vec![0.0f32; BLOCK_SIZE];
                    b.iter(|| {
                        inflator.process(
                            &[black_box(&input[..]), black_box(&input[..])],
                            &mut [&mut left[..], &mut right[..]],
                            &[],
                        );
                        black_box(left[0]);
                    });
                },
            );
        }
    }
    group.finish();
}

fn bench_band_split(c: &mut Criterion) {
    let mut group = c.benchmark_group("BandSplit");
    let input = generate_test_signal(BLOCK_SIZE);

    for factor in [OversampleFactor::X1, OversampleFactor::X4] {
        let state = InflatorState {
            oversampling: factor,
            split: true,
            ..Default::default()
        };
        group.bench_with_input(
            BenchmarkId::new("split", format!("{}x", factor.ratio())),
            &state,
            |b, &state| {
                let mut inflator = prepared(state);
                let mut left = vec![0.0f32; BLOCK_SIZE];
                let mut right = vec![0.0f32; BLOCK_SIZE];
                b.iter(|| {
                    inflator.process(
                        &[&input[..], &input[..]],
                        &mut [&mut left[..], &mut right[..]],
                        &[],
                    );
                    black_box(right[0]);
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_modes, bench_band_split);
criterion_main!(benches);
