//! Latency table for every oversampling mode.

use clap::Args;
use inflato_engine::{Inflator, StreamSetup};

use super::common::QualityArg;

/// Print per-mode latency at a sample rate.
#[derive(Args)]
pub struct LatencyArgs {
    /// Base sample rate in Hz
    #[arg(short, long, default_value = "48000")]
    sample_rate: u32,

    /// Linear-phase resampler quality
    #[arg(short, long, value_enum, default_value_t = QualityArg::Standard)]
    quality: QualityArg,
}

/// Run the latency command.
pub fn run(args: LatencyArgs) -> anyhow::Result<()> {
    let mut inflator = Inflator::with_quality(args.quality.into());
    inflator.prepare(StreamSetup::new(f64::from(args.sample_rate), 1, 512))?;
    let Some(table) = inflator.latency_table() else {
        anyhow::bail!("processor did not report a latency table");
    };

    println!("Latency at {} Hz ({:?} quality):", args.sample_rate, args.quality);
    println!("  {:<6} {:<8} {:>8} {:>10}", "Factor", "Phase", "Samples", "ms");
    for (factor, phase, samples) in table.iter() {
        let ms = samples as f64 * 1000.0 / f64::from(args.sample_rate);
        println!(
            "  {:<6} {:<8} {:>8} {:>10.3}",
            format!("{}x", factor.ratio()),
            format!("{phase:?}"),
            samples,
            ms
        );
    }

    Ok(())
}
