//! Display WAV file metadata.

use clap::Args;
use inflato_io::{WavFormat, read_wav_info};

#[derive(Args)]
pub struct InfoArgs {
    /// Path to the WAV file
    pub file: std::path::PathBuf,
}

pub fn run(args: InfoArgs) -> anyhow::Result<()> {
    let info = read_wav_info(&args.file)?;
    let encoding = match info.format {
        WavFormat::Pcm => "PCM",
        WavFormat::IeeeFloat => "IEEE Float",
    };

    println!("File:        {}", args.file.display());
    println!("Format:      {encoding} {}-bit", info.bits_per_sample);
    println!("Channels:    {}", info.channels);
    println!("Sample Rate: {} Hz", info.sample_rate);
    println!("Duration:    {:.3}s ({} frames)", info.duration_secs, info.num_frames);
    if (1..=2).contains(&info.channels) {
        println!("Processable: yes");
    } else {
        println!("Processable: no (only mono and stereo are supported)");
    }
    Ok(())
}
