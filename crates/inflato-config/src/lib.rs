//! Presets and configuration for the inflato processor.
//!
//! - **Presets**: named [`InflatorState`](inflato_engine::InflatorState)
//!   snapshots stored as TOML
//! - **Validation**: range checks driven by the engine's parameter descriptors
//! - **Paths**: platform preset directory lookup
//! - **Factory Presets**: built-in starting points
//!
//! # Example
//!
//! ```rust,no_run
//! use inflato_config::{Preset, user_presets_dir, validate_preset};
//! use inflato_engine::InflatorState;
//!
//! let preset = Preset::new("Warm")
//!     .with_description("Gentle lift")
//!     .with_settings(InflatorState { curve: -20.0, effect: 60.0, ..Default::default() });
//! validate_preset(&preset).unwrap();
//! preset.save(user_presets_dir().join("warm.toml")).unwrap();
//!
//! let loaded = Preset::load(user_presets_dir().join("warm.toml")).unwrap();
//! assert_eq!(loaded, preset);
//! ```

mod error;
mod preset;

/// Platform-specific paths for presets.
pub mod paths;

/// Settings and preset validation.
pub mod validation;

/// Factory presets bundled with the library.
pub mod factory_presets;

pub use error::ConfigError;
pub use factory_presets::{
    FACTORY_PRESET_NAMES, factory_preset_names, factory_presets, get_factory_preset,
    is_factory_preset,
};
pub use paths::{
    ensure_user_presets_dir, find_preset, list_user_presets, preset_name_from_path,
    user_presets_dir,
};
pub use preset::Preset;
pub use validation::{ValidationError, ValidationResult, validate_preset, validate_settings};
