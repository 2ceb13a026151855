//! Argument types and helpers shared by several commands.

use clap::{Args, ValueEnum};
use inflato_config::{ConfigError, Preset, find_preset, get_factory_preset};
use inflato_core::{OversampleFactor, PhaseMode, ResamplerQuality};
use inflato_engine::InflatorState;

/// Linear-phase resampler quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum QualityArg {
    /// Shortest latency
    Low,
    /// Balanced
    #[default]
    Standard,
    /// Steepest transition
    High,
}

impl From<QualityArg> for ResamplerQuality {
    fn from(arg: QualityArg) -> Self {
        match arg {
            QualityArg::Low => ResamplerQuality::Low,
            QualityArg::Standard => ResamplerQuality::Standard,
            QualityArg::High => ResamplerQuality::High,
        }
    }
}

/// Rate-conversion phase mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PhaseArg {
    /// Half-band cascade, short latency
    #[value(alias = "min")]
    Minimum,
    /// Sinc resampler, symmetric response
    #[value(alias = "lin")]
    Linear,
}

impl From<PhaseArg> for PhaseMode {
    fn from(arg: PhaseArg) -> Self {
        match arg {
            PhaseArg::Minimum => PhaseMode::Minimum,
            PhaseArg::Linear => PhaseMode::Linear,
        }
    }
}

fn parse_oversample(s: &str) -> Result<OversampleFactor, String> {
    s.trim_end_matches(['x', 'X'])
        .parse::<usize>()
        .ok()
        .and_then(OversampleFactor::from_ratio)
        .ok_or_else(|| format!("invalid oversampling factor '{s}' (expected 1, 2, 4 or 8)"))
}

/// Processor settings given on the command line. Each one overrides the
/// preset (or default) value when present.
#[derive(Args, Debug, Default)]
pub struct SettingsArgs {
    /// Input gain in dB (-6 to 12)
    #[arg(long, allow_negative_numbers = true)]
    pub input_gain: Option<f64>,

    /// Effect amount in percent (0 to 100)
    #[arg(long)]
    pub effect: Option<f64>,

    /// Curve shape (-50 to 50)
    #[arg(long, allow_negative_numbers = true)]
    pub curve: Option<f64>,

    /// Output gain in dB (-12 to 0)
    #[arg(long, allow_negative_numbers = true)]
    pub output_gain: Option<f64>,

    /// Hard clip to ±1 before shaping
    #[arg(long)]
    pub clip: bool,

    /// Shape three frequency bands separately
    #[arg(long)]
    pub split: bool,

    /// Ignore the input gain
    #[arg(long)]
    pub no_input_gain: bool,

    /// Pass the latency-aligned dry signal
    #[arg(long)]
    pub bypass: bool,

    /// Oversampling factor (1, 2, 4 or 8)
    #[arg(long, value_parser = parse_oversample)]
    pub oversample: Option<OversampleFactor>,

    /// Rate-conversion phase mode
    #[arg(long, value_enum)]
    pub phase: Option<PhaseArg>,
}

impl SettingsArgs {
    /// Apply the given overrides to `state`.
    pub fn apply(&self, state: &mut InflatorState) {
        if let Some(db) = self.input_gain {
            state.input_gain_db = db;
        }
        if let Some(effect) = self.effect {
            state.effect = effect;
        }
        if let Some(curve) = self.curve {
            state.curve = curve;
        }
        if let Some(db) = self.output_gain {
            state.output_gain_db = db;
        }
        if let Some(factor) = self.oversample {
            state.oversampling = factor;
        }
        if let Some(phase) = self.phase {
            state.phase = phase.into();
        }
        state.clip |= self.clip;
        state.split |= self.split;
        state.bypass |= self.bypass;
        if self.no_input_gain {
            state.input_enable = false;
        }
    }
}

/// Resolve a preset by factory name, user preset name or file path.
pub fn load_preset(name: &str) -> anyhow::Result<Preset> {
    if let Some(preset) = get_factory_preset(name) {
        return Ok(preset);
    }
    let path = find_preset(name).ok_or_else(|| ConfigError::PresetNotFound(name.to_string()))?;
    Ok(Preset::load(path)?)
}

/// Print a settings table, indented by two spaces.
pub fn print_settings(state: &InflatorState) {
    let on_off = |b: bool| if b { "on" } else { "off" };
    println!("  Input gain:   {:+.1} dB ({})", state.input_gain_db, on_off(state.input_enable));
    println!("  Effect:       {:.0}%", state.effect);
    println!("  Curve:        {:+.1}", state.curve);
    println!("  Output gain:  {:+.1} dB", state.output_gain_db);
    println!("  Oversampling: {}x", state.oversampling.ratio());
    println!("  Phase:        {:?}", state.phase);
    println!("  Clip:         {}", on_off(state.clip));
    println!("  Band split:   {}", on_off(state.split));
    println!("  Bypass:       {}", on_off(state.bypass));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversample_accepts_ratio_with_optional_suffix() {
        assert_eq!(parse_oversample("4"), Ok(OversampleFactor::X4));
        assert_eq!(parse_oversample("8x"), Ok(OversampleFactor::X8));
        assert!(parse_oversample("3").is_err());
        assert!(parse_oversample("two").is_err());
    }

    #[test]
    fn overrides_only_touch_given_fields() {
        let mut state = InflatorState {
            curve: 12.0,
            effect: 40.0,
            ..Default::default()
        };
        let args = SettingsArgs {
            curve: Some(-5.0),
            split: true,
            phase: Some(PhaseArg::Linear),
            ..Default::default()
        };
        args.apply(&mut state);
        assert_eq!(state.curve, -5.0);
        assert_eq!(state.effect, 40.0);
        assert!(state.split);
        assert!(!state.clip);
        assert_eq!(state.phase, PhaseMode::Linear);
    }

    #[test]
    fn factory_presets_resolve_by_name() {
        let preset = load_preset("gentle").unwrap();
        assert_eq!(preset.name, "Gentle");
        assert!(load_preset("no-such-preset-anywhere").is_err());
    }
}
