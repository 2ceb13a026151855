//! File-based processing command.

use anyhow::Context;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use inflato_config::validate_settings;
use inflato_core::linear_to_db;
use inflato_engine::{Inflator, InflatorState, StreamSetup};
use inflato_io::{WavSpec, read_wav, write_wav};
use std::path::PathBuf;

use super::common::{QualityArg, SettingsArgs, load_preset, print_settings};

#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Preset name or file (TOML)
    #[arg(short, long)]
    preset: Option<String>,

    #[command(flatten)]
    settings: SettingsArgs,

    /// Linear-phase resampler quality
    #[arg(long, value_enum, default_value_t = QualityArg::Standard)]
    quality: QualityArg,

    /// Processing block size
    #[arg(long, default_value = "512")]
    block_size: usize,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    println!("Reading {}...", args.input.display());
    let (channels, spec) = read_wav(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    if !(1..=2).contains(&channels.len()) {
        anyhow::bail!("only mono and stereo input is supported, got {} channels", channels.len());
    }
    let frames = channels[0].len();
    println!(
        "  {} frames, {} channel(s), {} Hz, {:.2}s",
        frames,
        channels.len(),
        spec.sample_rate,
        frames as f64 / f64::from(spec.sample_rate)
    );

    let mut state = match &args.preset {
        Some(name) => {
            let preset = load_preset(name)?;
            println!("Loading preset: {}", preset.name);
            preset.settings
        }
        None => InflatorState::default(),
    };
    args.settings.apply(&mut state);
    validate_settings(&state)?;
    print_settings(&state);

    let mut inflator = Inflator::with_quality(args.quality.into());
    inflator.set_state(state);
    inflator.prepare(StreamSetup::new(
        f64::from(spec.sample_rate),
        channels.len(),
        args.block_size,
    ))?;
    println!("Latency: {} samples (compensated)", inflator.latency());

    let pb = ProgressBar::new(frames as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );
    let output = render(&mut inflator, &channels, args.block_size, |done| {
        pb.set_position(done.min(frames) as u64);
    });
    pb.finish_and_clear();

    let (in_peak, in_rms) = stats(&channels);
    let (out_peak, out_rms) = stats(&output);
    println!("\nStats:");
    println!(
        "  Input:  RMS {:.1} dB, Peak {:.1} dB",
        linear_to_db(in_rms),
        linear_to_db(in_peak)
    );
    println!(
        "  Output: RMS {:.1} dB, Peak {:.1} dB",
        linear_to_db(out_rms),
        linear_to_db(out_peak)
    );

    let out_spec = WavSpec {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: args.bit_depth,
    };
    println!("\nWriting {}...", args.output.display());
    write_wav(&args.output, &output, out_spec)?;
    println!("Done!");

    Ok(())
}

/// Run `channels` through a prepared processor in blocks of `block_size`,
/// compensating the processor latency.
///
/// The first `latency()` output frames are discarded and the tail is flushed
/// with silence, so the result is aligned with and as long as the input.
fn render(
    inflator: &mut Inflator,
    channels: &[Vec<f32>],
    block_size: usize,
    mut progress: impl FnMut(usize),
) -> Vec<Vec<f32>> {
    let frames = channels.first().map_or(0, Vec::len);
    let latency = inflator.latency();
    let block_size = block_size.max(1);
    let total = frames + latency;

    let mut output = vec![Vec::with_capacity(frames); channels.len()];
    let mut in_block = vec![vec![0.0f32; block_size]; channels.len()];
    let mut out_block = vec![vec![0.0f32; block_size]; channels.len()];

    let mut pos = 0;
    while pos < total {
        let len = block_size.min(total - pos);
        for (buf, source) in in_block.iter_mut().zip(channels) {
            for (i, sample) in buf[..len].iter_mut().enumerate() {
                *sample = source.get(pos + i).copied().unwrap_or(0.0);
            }
        }

        let inputs: Vec<&[f32]> = in_block.iter().map(|b| &b[..len]).collect();
        let mut outputs: Vec<&mut [f32]> = out_block.iter_mut().map(|b| &mut b[..len]).collect();
        inflator.process(&inputs, &mut outputs, &[]);

        let skip = latency.saturating_sub(pos).min(len);
        for (dest, buf) in output.iter_mut().zip(&out_block) {
            dest.extend_from_slice(&buf[skip..len]);
        }
        pos += len;
        progress(pos);
    }

    output
}

/// Peak and RMS across all channels.
fn stats(channels: &[Vec<f32>]) -> (f64, f64) {
    let mut peak = 0.0f64;
    let mut sum = 0.0f64;
    let mut count = 0usize;
    for &s in channels.iter().flatten() {
        let s = f64::from(s);
        peak = peak.max(s.abs());
        sum += s * s;
        count += 1;
    }
    let rms = if count == 0 { 0.0 } else { (sum / count as f64).sqrt() };
    (peak, rms)
}
