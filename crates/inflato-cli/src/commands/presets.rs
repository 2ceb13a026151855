//! Preset management commands.

use clap::{Args, Subcommand};
use inflato_config::{
    Preset, ensure_user_presets_dir, factory_presets, list_user_presets,
    paths::list_presets_in_dir, preset_name_from_path, validate_preset,
};
use std::path::PathBuf;

use super::common::{SettingsArgs, load_preset, print_settings};

#[derive(Args)]
pub struct PresetsArgs {
    #[command(subcommand)]
    command: PresetsCommand,
}

#[derive(Subcommand)]
enum PresetsCommand {
    /// List factory and user presets
    List {
        /// Show only factory presets
        #[arg(long)]
        factory: bool,

        /// Show only user presets
        #[arg(long)]
        user: bool,

        /// Read user presets from this directory
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Show the settings of a preset
    Show {
        /// Preset name or path
        name: String,

        /// Print the preset as JSON
        #[arg(long)]
        json: bool,
    },

    /// Save settings as a user preset
    Save {
        /// Name for the new preset
        name: String,

        /// Start from an existing preset instead of the defaults
        #[arg(long)]
        from: Option<String>,

        /// Description of the preset
        #[arg(short, long)]
        description: Option<String>,

        #[command(flatten)]
        settings: SettingsArgs,

        /// Write into this directory instead of the user presets directory
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Overwrite if the preset already exists
        #[arg(long)]
        force: bool,
    },
}

pub fn run(args: PresetsArgs) -> anyhow::Result<()> {
    match args.command {
        PresetsCommand::List { factory, user, dir } => list_presets(factory, user, dir),
        PresetsCommand::Show { name, json } => show_preset(&name, json),
        PresetsCommand::Save {
            name,
            from,
            description,
            settings,
            dir,
            force,
        } => save_preset(&name, from.as_deref(), description, &settings, dir, force),
    }
}

fn list_presets(factory_only: bool, user_only: bool, dir: Option<PathBuf>) -> anyhow::Result<()> {
    if !user_only {
        println!("Factory Presets:");
        println!("================");
        for preset in factory_presets() {
            let desc = preset.description.as_deref().unwrap_or("");
            println!("  {:12} - {}", preset.name, desc);
        }
        println!();
    }

    if !factory_only {
        println!("User Presets:");
        println!("=============");
        let paths = match &dir {
            Some(dir) => list_presets_in_dir(dir),
            None => list_user_presets(),
        };
        if paths.is_empty() {
            println!("  (none)");
        }
        for path in paths {
            let name = preset_name_from_path(&path).unwrap_or_else(|| "unknown".to_string());
            match Preset::load(&path) {
                Ok(preset) => {
                    println!("  {:12} - {}", name, preset.description.as_deref().unwrap_or(""));
                }
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "unreadable preset");
                    println!("  {:12} - (error loading)", name);
                }
            }
        }
        println!();
    }

    Ok(())
}

fn show_preset(name: &str, json: bool) -> anyhow::Result<()> {
    let preset = load_preset(name)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&preset)?);
        return Ok(());
    }

    println!("Preset: {}", preset.name);
    println!("{}", "=".repeat(8 + preset.name.len()));
    if let Some(desc) = &preset.description {
        println!("{desc}");
    }
    if let Some(rate) = preset.sample_rate {
        println!("Tuned at {rate} Hz");
    }
    println!();
    print_settings(&preset.settings);
    Ok(())
}

fn save_preset(
    name: &str,
    from: Option<&str>,
    description: Option<String>,
    settings: &SettingsArgs,
    dir: Option<PathBuf>,
    force: bool,
) -> anyhow::Result<()> {
    let mut preset = match from {
        Some(source) => {
            let mut base = load_preset(source)?;
            base.name = name.to_string();
            base
        }
        None => Preset::new(name),
    };
    if description.is_some() {
        preset.description = description;
    }
    settings.apply(&mut preset.settings);
    validate_preset(&preset)?;

    let dir = match dir {
        Some(dir) => dir,
        None => ensure_user_presets_dir()?,
    };
    let path = dir.join(format!("{name}.toml"));
    if path.exists() && !force {
        anyhow::bail!("Preset '{name}' already exists. Use --force to overwrite.");
    }

    preset.save(&path)?;
    println!("Saved preset '{}' to {}", name, path.display());
    Ok(())
}
