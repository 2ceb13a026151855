//! End-to-end tests for the inflator processor.

use inflato_core::{OversampleFactor, PhaseMode, ResamplerQuality};
use inflato_engine::{Inflator, InflatorState, ParamEvent, StreamSetup, meter_channel, params};
use proptest::prelude::*;

const SR: f64 = 48000.0;

fn inflator(state: InflatorState, channels: usize, max_block: usize) -> Inflator {
    let mut inflator = Inflator::with_quality(ResamplerQuality::Low);
    inflator.set_state(state);
    inflator
        .prepare(StreamSetup::new(SR, channels, max_block))
        .unwrap();
    inflator
}

fn run_mono(inflator: &mut Inflator, input: &[f64]) -> Vec<f64> {
    let mut out = vec![0.0; input.len()];
    inflator.process(&[input], &mut [&mut out[..]], &[]);
    out
}

fn impulse(len: usize, at: usize, amplitude: f64) -> Vec<f64> {
    let mut x = vec![0.0; len];
    x[at] = amplitude;
    x
}

fn argmax_abs(x: &[f64]) -> usize {
    x.iter()
        .enumerate()
        .max_by(|a, b| a.1.abs().total_cmp(&b.1.abs()))
        .map_or(0, |(i, _)| i)
}

#[test]
fn default_curve_never_shrinks_unit_range_magnitudes() {
    let mut inflator = inflator(InflatorState::default(), 1, 256);
    let input: Vec<f64> = (0..4096)
        .map(|i| {
            let t = i as f64 / SR;
            0.7 * (2.0 * std::f64::consts::PI * 220.0 * t).sin()
                + 0.25 * (2.0 * std::f64::consts::PI * 3100.0 * t).sin()
        })
        .collect();
    assert!(input.iter().all(|x| x.abs() <= 1.0));
    let out = run_mono(&mut inflator, &input);
    for (x, y) in input.iter().zip(&out) {
        assert!(y.abs() <= 1.0 + 1e-9, "{x} -> {y}");
        assert!(y.abs() >= x.abs() - 1e-9, "{x} -> {y}");
        assert!(x * y >= -1e-15);
    }
}

#[test]
fn bypass_emits_dry_delayed_by_latency() {
    for (factor, phase) in [
        (OversampleFactor::X2, PhaseMode::Minimum),
        (OversampleFactor::X8, PhaseMode::Minimum),
        (OversampleFactor::X2, PhaseMode::Linear),
    ] {
        let state = InflatorState {
            oversampling: factor,
            phase,
            bypass: true,
            ..Default::default()
        };
        let mut inflator = inflator(state, 1, 512);
        let latency = inflator.latency();
        assert!(latency > 0);
        let input: Vec<f64> = (0..latency + 600).map(|i| ((i % 97) as f64 - 48.0) / 64.0).collect();
        let out = run_mono(&mut inflator, &input);
        for n in 0..out.len() {
            let expected = if n >= latency { input[n - latency] } else { 0.0 };
            assert!((out[n] - expected).abs() < 1e-12, "{factor:?}/{phase:?} n={n}");
        }
    }
}

#[test]
fn zero_effect_matches_bypass() {
    let state = InflatorState {
        oversampling: OversampleFactor::X4,
        effect: 0.0,
        ..Default::default()
    };
    let mut dry = inflator(state, 1, 256);
    let mut bypassed = inflator(InflatorState { bypass: true, ..state }, 1, 256);
    let input: Vec<f64> = (0..1000).map(|i| (i as f64 * 0.031).sin() * 0.8).collect();
    let a = run_mono(&mut dry, &input);
    let b = run_mono(&mut bypassed, &input);
    for (x, y) in a.iter().zip(&b) {
        assert!((x - y).abs() < 1e-12);
    }
}

#[test]
fn minimum_phase_impulse_lands_on_reported_latency() {
    for factor in [OversampleFactor::X2, OversampleFactor::X4, OversampleFactor::X8] {
        let state = InflatorState {
            oversampling: factor,
            ..Default::default()
        };
        let mut inflator = inflator(state, 1, 256);
        let latency = inflator.latency();
        let out = run_mono(&mut inflator, &impulse(latency + 400, 100, 1e-3));
        assert_eq!(argmax_abs(&out), 100 + latency, "{factor:?}");
        // Small signals see the curve's slope at zero.
        let gain = out[100 + latency] / 1e-3;
        assert!(gain > 1.0 && gain < 1.6, "{factor:?}: {gain}");
    }
}

#[test]
fn linear_phase_impulse_lands_on_reported_latency() {
    for factor in [OversampleFactor::X2, OversampleFactor::X8] {
        let state = InflatorState {
            oversampling: factor,
            phase: PhaseMode::Linear,
            ..Default::default()
        };
        let mut inflator = inflator(state, 1, 512);
        let latency = inflator.latency();
        let table = *inflator.latency_table().unwrap();
        assert!(latency > 10 * table.get(factor, PhaseMode::Minimum));
        let out = run_mono(&mut inflator, &impulse(latency + 1200, 700, 1e-3));
        assert_eq!(argmax_abs(&out), 700 + latency, "{factor:?}");
    }
}

#[test]
fn half_mix_sums_wet_and_dry_on_one_frame() {
    for (factor, phase) in [
        (OversampleFactor::X2, PhaseMode::Minimum),
        (OversampleFactor::X4, PhaseMode::Minimum),
        (OversampleFactor::X2, PhaseMode::Linear),
        (OversampleFactor::X4, PhaseMode::Linear),
    ] {
        // Slope one at zero, so small signals pass the shaper unchanged.
        let state = |effect: f64| InflatorState {
            oversampling: factor,
            phase,
            effect,
            curve: -50.0,
            clip: true,
            ..Default::default()
        };
        let mut wet = inflator(state(100.0), 1, 256);
        let mut dry = inflator(state(0.0), 1, 256);
        let mut half = inflator(state(50.0), 1, 256);
        let latency = half.latency();
        let input = impulse(latency + 600, 150, 1e-3);

        let wet_out = run_mono(&mut wet, &input);
        let dry_out = run_mono(&mut dry, &input);
        let half_out = run_mono(&mut half, &input);
        let at = 150 + latency;
        assert_eq!(argmax_abs(&dry_out), at, "{factor:?}/{phase:?} dry");
        assert_eq!(argmax_abs(&wet_out), at, "{factor:?}/{phase:?} wet");
        assert_eq!(argmax_abs(&half_out), at, "{factor:?}/{phase:?} mix");
        // Misaligned paths would leave two half-height peaks.
        assert!(half_out[at] > 0.9e-3, "{factor:?}/{phase:?}: {}", half_out[at]);
    }
}

#[test]
fn mode_switch_realigns_dry_path_immediately() {
    let state = InflatorState {
        oversampling: OversampleFactor::X2,
        bypass: true,
        ..Default::default()
    };
    let mut inflator = inflator(state, 1, 256);
    let first: Vec<f64> = (0..300).map(|i| i as f64 * 1e-3).collect();
    run_mono(&mut inflator, &first);

    let second: Vec<f64> = (0..300).map(|i| -(i as f64) * 1e-3).collect();
    let mut out = vec![0.0; second.len()];
    inflator.process(
        &[&second[..]],
        &mut [&mut out[..]],
        &[ParamEvent::new(params::OVERSAMPLING, 3.0)],
    );
    assert!(inflator.take_latency_changed());
    let latency = inflator.latency();
    assert_eq!(
        latency,
        inflator
            .latency_table()
            .unwrap()
            .get(OversampleFactor::X8, PhaseMode::Minimum)
    );
    for n in latency..second.len() {
        assert!((out[n] - second[n - latency]).abs() < 1e-12);
    }
}

#[test]
fn one_meter_record_per_host_block() {
    let (tx, rx) = meter_channel(16);
    let mut inflator = inflator(InflatorState::default(), 1, 128);
    inflator.set_meter_sender(Some(tx));
    let input = vec![0.5; 300];
    run_mono(&mut inflator, &input);
    run_mono(&mut inflator, &input[..70]);
    let records: Vec<_> = rx.try_iter().collect();
    let sizes: Vec<u32> = records.iter().map(|r| r.num_samples).collect();
    assert_eq!(sizes, vec![300, 70]);
    let last = records[1];
    assert_eq!(last.sample_rate, SR);
    assert!(last.in_l > 0.0 && last.out_l > last.in_l);
    assert_eq!(last.in_l, last.in_r);
    assert_eq!(last.out_l, last.out_r);

    run_mono(&mut inflator, &[]);
    assert!(rx.try_recv().is_err());
}

#[test]
fn full_meter_channel_never_blocks() {
    let (tx, rx) = meter_channel(1);
    let mut inflator = inflator(InflatorState::default(), 2, 32);
    inflator.set_meter_sender(Some(tx));
    let input = vec![0.1f32; 256];
    let mut l = vec![0.0f32; 256];
    let mut r = vec![0.0f32; 256];
    for _ in 0..4 {
        inflator.process(&[&input[..], &input[..]], &mut [&mut l[..], &mut r[..]], &[]);
    }
    assert_eq!(rx.try_iter().count(), 1);
}

#[test]
fn levels_follow_each_channel() {
    assert_eq!(Inflator::new().levels(0), None);

    let mut inflator = inflator(InflatorState::default(), 2, 256);
    let loud = vec![0.5f32; 4800];
    let quiet = vec![0.05f32; 4800];
    let mut l = vec![0.0f32; 4800];
    let mut r = vec![0.0f32; 4800];
    inflator.process(&[&loud[..], &quiet[..]], &mut [&mut l[..], &mut r[..]], &[]);

    let (in_l, out_l) = inflator.levels(0).unwrap();
    let (in_r, out_r) = inflator.levels(1).unwrap();
    assert!((in_l - 0.5).abs() < 0.02, "{in_l}");
    assert!((in_r - 0.05).abs() < 0.005, "{in_r}");
    assert!(out_l > in_l && out_r > in_r);
    assert_eq!(inflator.levels(2), None);
}

#[test]
fn crossover_corners_shape_split_output() {
    let state = InflatorState {
        oversampling: OversampleFactor::X2,
        split: true,
        curve: 40.0,
        ..Default::default()
    };
    let input: Vec<f64> = (0..2048)
        .map(|i| {
            let t = i as f64 / SR;
            0.6 * (2.0 * std::f64::consts::PI * 500.0 * t).sin()
                + 0.3 * (2.0 * std::f64::consts::PI * 5000.0 * t).sin()
        })
        .collect();

    let mut default_corners = inflator(state, 1, 256);
    let mut moved = inflator(state, 1, 256);
    moved.set_crossover(1000.0, 10_000.0);
    // Corners chosen before prepare survive it.
    let mut moved_early = Inflator::with_quality(ResamplerQuality::Low);
    moved_early.set_state(state);
    moved_early.set_crossover(1000.0, 10_000.0);
    moved_early.prepare(StreamSetup::new(SR, 1, 256)).unwrap();

    let a = run_mono(&mut default_corners, &input);
    let b = run_mono(&mut moved, &input);
    let c = run_mono(&mut moved_early, &input);
    let max_diff = a.iter().zip(&b).map(|(x, y)| (x - y).abs()).fold(0.0, f64::max);
    assert!(max_diff > 1e-3, "{max_diff}");
    for (y, z) in b.iter().zip(&c) {
        assert!((y - z).abs() < 1e-6);
    }
}

#[test]
fn gain_reduction_falls_with_compression() {
    let measure = |input_gain_db: f64| {
        let (tx, rx) = meter_channel(4);
        let state = InflatorState {
            input_gain_db,
            ..Default::default()
        };
        let mut inflator = inflator(state, 1, 1024);
        inflator.set_meter_sender(Some(tx));
        let input: Vec<f64> = (0..1024).map(|i| 0.9 * (i as f64 * 0.05).sin()).collect();
        run_mono(&mut inflator, &input);
        rx.try_recv().unwrap().gain_reduction
    };
    let quiet = measure(-6.0);
    let hot = measure(6.0);
    let hotter = measure(12.0);
    assert!(hot < quiet, "{hot} vs {quiet}");
    assert!(hotter < hot, "{hotter} vs {hot}");
    assert!(hotter < 0.0);
}

#[test]
fn clip_bounds_hot_input() {
    let state = InflatorState {
        input_gain_db: 12.0,
        clip: true,
        ..Default::default()
    };
    let mut inflator = inflator(state, 1, 256);
    let input: Vec<f64> = (0..512).map(|i| (i as f64 * 0.1).sin()).collect();
    let out = run_mono(&mut inflator, &input);
    // Clipped to ±1 the curve output stays at or below unity.
    assert!(out.iter().all(|y| y.abs() <= 1.0 + 1e-9));
    assert!(out.iter().any(|y| y.abs() > 0.99));
}

#[test]
fn band_split_processes_without_blowing_up() {
    let state = InflatorState {
        oversampling: OversampleFactor::X2,
        split: true,
        ..Default::default()
    };
    let mut inflator = inflator(state, 2, 256);
    let input: Vec<f32> = (0..2048).map(|i| (0.6 * (i as f64 * 0.07).sin()) as f32).collect();
    let mut l = vec![0.0f32; input.len()];
    let mut r = vec![0.0f32; input.len()];
    inflator.process(&[&input[..], &input[..]], &mut [&mut l[..], &mut r[..]], &[]);
    assert!(l.iter().all(|s| s.is_finite() && s.abs() < 3.0));
    for (a, b) in l.iter().zip(&r) {
        assert!((a - b).abs() < 1e-6);
    }
    assert!(l.iter().any(|s| s.abs() > 0.1));
}

#[test]
fn output_gain_scales_result() {
    let base = InflatorState::default();
    let mut unity = inflator(base, 1, 256);
    let mut quieter = inflator(
        InflatorState {
            output_gain_db: -6.0,
            ..base
        },
        1,
        256,
    );
    let input: Vec<f64> = (0..256).map(|i| 0.4 * (i as f64 * 0.05).sin()).collect();
    let a = run_mono(&mut unity, &input);
    let b = run_mono(&mut quieter, &input);
    let g = inflato_core::db_to_linear(-6.0);
    for (x, y) in a.iter().zip(&b) {
        assert!((x * g - y).abs() < 1e-9);
    }
}

#[test]
fn f32_and_f64_buffers_agree() {
    let state = InflatorState {
        oversampling: OversampleFactor::X2,
        curve: 15.0,
        ..Default::default()
    };
    let mut a = inflator(state, 1, 256);
    let mut b = inflator(state, 1, 256);
    let input64: Vec<f64> = (0..512)
        .map(|i| f64::from((f64::from(i) * 0.03).sin() as f32 * 0.5))
        .collect();
    let input32: Vec<f32> = input64.iter().map(|&x| x as f32).collect();
    let out64 = run_mono(&mut a, &input64);
    let mut out32 = vec![0.0f32; input32.len()];
    b.process(&[&input32[..]], &mut [&mut out32[..]], &[]);
    for (x, y) in out64.iter().zip(&out32) {
        assert!((x - f64::from(*y)).abs() < 1e-6);
    }
}

#[test]
fn state_survives_binary_round_trip_through_processor() {
    let mut inflator = Inflator::new();
    let state = InflatorState {
        input_gain_db: 2.0,
        effect: 55.0,
        curve: -10.0,
        output_gain_db: -3.0,
        oversampling: OversampleFactor::X8,
        clip: true,
        input_enable: false,
        split: true,
        phase: PhaseMode::Linear,
        bypass: false,
    };
    inflator.set_state(state);
    let restored = InflatorState::from_bytes(&inflator.state().to_bytes()).unwrap();
    assert_eq!(restored, state);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    /// Splitting a stream into arbitrary host blocks does not change the
    /// output.
    #[test]
    fn host_block_size_is_transparent(
        cuts in prop::collection::vec(1usize..300, 1..8),
        factor in 0usize..4,
    ) {
        let state = InflatorState {
            oversampling: OversampleFactor::from_index(factor),
            curve: 20.0,
            ..Default::default()
        };
        let input: Vec<f64> = (0..1200).map(|i| 0.8 * (i as f64 * 0.013).sin()).collect();

        let mut whole = inflator(state, 1, 256);
        let expected = run_mono(&mut whole, &input);

        let mut pieces = inflator(state, 1, 256);
        let mut actual = Vec::with_capacity(input.len());
        let mut start = 0;
        let mut cut = cuts.iter().cycle();
        while start < input.len() {
            let end = (start + cut.next().copied().unwrap_or(64)).min(input.len());
            actual.extend(run_mono(&mut pieces, &input[start..end]));
            start = end;
        }
        prop_assert_eq!(actual, expected);
    }
}
