//! Inflato CLI - offline soft-inflation processing and preset management.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "inflato")]
#[command(author, version, about = "Soft-inflation waveshaper", long_about = None)]
struct Cli {
    /// Log processor events (equivalent to RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a WAV file
    Process(commands::process::ProcessArgs),

    /// Show WAV file metadata
    Info(commands::info::InfoArgs),

    /// Print the latency of every oversampling mode
    Latency(commands::latency::LatencyArgs),

    /// List, show and save presets
    Presets(commands::presets::PresetsArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into())
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Process(args) => commands::process::run(args),
        Commands::Info(args) => commands::info::run(args),
        Commands::Latency(args) => commands::latency::run(args),
        Commands::Presets(args) => commands::presets::run(args),
    }
}
