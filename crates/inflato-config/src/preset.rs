//! Preset file format and operations.

use inflato_engine::InflatorState;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// A named set of processor settings.
///
/// # TOML Format
///
/// ```toml
/// name = "Loud"
/// description = "Hot input with a steep curve"
/// sample_rate = 48000
///
/// [settings]
/// input_gain_db = 6.0
/// effect = 100.0
/// curve = 30.0
/// output_gain_db = -3.0
/// oversampling = 4
/// phase = "minimum"
/// clip = true
/// split = false
/// ```
///
/// Every field of `[settings]` is optional; missing fields take the
/// processor defaults. `sample_rate` is a hint only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Preset {
    /// Name of the preset.
    pub name: String,

    /// Optional description of the preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Sample rate the preset was tuned at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<u32>,

    /// Processor settings.
    #[serde(default)]
    pub settings: InflatorState,
}

impl Preset {
    /// Create a preset with default settings.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            sample_rate: None,
            settings: InflatorState::default(),
        }
    }

    /// Create a preset with a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the sample rate hint.
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = Some(sample_rate);
        self
    }

    /// Replace the settings.
    pub fn with_settings(mut self, settings: InflatorState) -> Self {
        self.settings = settings;
        self
    }

    /// Load a preset from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Load a preset from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the preset to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the preset to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self::new("Untitled")
    }
}
