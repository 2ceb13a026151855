//! Factory presets bundled with the library.
//!
//! Embedded as TOML so they read exactly like user preset files.

use crate::Preset;

/// Identifiers of the factory presets.
pub static FACTORY_PRESET_NAMES: &[&str] = &["default", "gentle", "loud", "bands", "mastering"];

static FACTORY_PRESETS_TOML: &[(&str, &str)] = &[
    ("default", DEFAULT_PRESET),
    ("gentle", GENTLE_PRESET),
    ("loud", LOUD_PRESET),
    ("bands", BANDS_PRESET),
    ("mastering", MASTERING_PRESET),
];

const DEFAULT_PRESET: &str = r#"
name = "Default"
description = "Neutral curve, full effect, no oversampling"

[settings]
input_gain_db = 0.0
effect = 100.0
curve = 0.0
output_gain_db = 0.0
oversampling = 1
phase = "minimum"
clip = false
split = false
"#;

const GENTLE_PRESET: &str = r#"
name = "Gentle"
description = "Half effect with a relaxed curve for mix-bus glue"

[settings]
effect = 50.0
curve = -30.0
oversampling = 2
"#;

const LOUD_PRESET: &str = r#"
name = "Loud"
description = "Hot input into a steep curve, clipped and trimmed"

[settings]
input_gain_db = 6.0
effect = 100.0
curve = 30.0
output_gain_db = -3.0
oversampling = 4
clip = true
"#;

const BANDS_PRESET: &str = r#"
name = "Bands"
description = "Three-band inflation to keep lows and highs from fighting"

[settings]
effect = 80.0
curve = 10.0
oversampling = 2
split = true
"#;

const MASTERING_PRESET: &str = r#"
name = "Mastering"
description = "Linear-phase 8x with clip for final loudness"
sample_rate = 48000

[settings]
input_gain_db = 2.0
effect = 70.0
curve = 5.0
output_gain_db = -0.5
oversampling = 8
phase = "linear"
clip = true
"#;

/// Every factory preset, in catalogue order.
pub fn factory_presets() -> Vec<Preset> {
    FACTORY_PRESETS_TOML
        .iter()
        .filter_map(|(_, toml)| Preset::from_toml(toml).ok())
        .collect()
}

/// Look up a factory preset by identifier or display name (case-insensitive).
///
/// ```rust
/// use inflato_config::get_factory_preset;
///
/// let preset = get_factory_preset("Loud").unwrap();
/// assert!(preset.settings.clip);
/// ```
pub fn get_factory_preset(name: &str) -> Option<Preset> {
    FACTORY_PRESETS_TOML
        .iter()
        .filter_map(|(id, toml)| Some((id, Preset::from_toml(toml).ok()?)))
        .find(|(id, preset)| {
            id.eq_ignore_ascii_case(name) || preset.name.eq_ignore_ascii_case(name)
        })
        .map(|(_, preset)| preset)
}

/// Identifiers of all factory presets.
pub fn factory_preset_names() -> Vec<&'static str> {
    FACTORY_PRESETS_TOML.iter().map(|(name, _)| *name).collect()
}

/// Whether `name` names a factory preset.
pub fn is_factory_preset(name: &str) -> bool {
    get_factory_preset(name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate_preset;
    use inflato_engine::InflatorState;

    #[test]
    fn every_factory_preset_parses_and_validates() {
        let presets = factory_presets();
        assert_eq!(presets.len(), FACTORY_PRESET_NAMES.len());
        for preset in &presets {
            validate_preset(preset).unwrap_or_else(|e| panic!("{}: {e}", preset.name));
        }
    }

    #[test]
    fn names_and_table_agree() {
        assert_eq!(factory_preset_names(), FACTORY_PRESET_NAMES);
    }

    #[test]
    fn default_preset_matches_processor_defaults() {
        let preset = get_factory_preset("default").unwrap();
        assert_eq!(preset.settings, InflatorState::default());
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert!(is_factory_preset("MASTERING"));
        assert!(is_factory_preset("Bands"));
        assert!(!is_factory_preset("nonexistent"));
        let mastering = get_factory_preset("mastering").unwrap();
        assert_eq!(mastering.settings.oversampling.ratio(), 8);
        assert_eq!(mastering.sample_rate, Some(48000));
    }
}
