//! Range checks for processor settings and presets.
//!
//! Parameter ranges come from the engine's descriptors, so the checks here
//! never drift from what the processor accepts.
//!
//! # Example
//!
//! ```rust
//! use inflato_config::{ValidationError, validate_settings};
//! use inflato_engine::InflatorState;
//!
//! assert!(validate_settings(&InflatorState::default()).is_ok());
//!
//! let hot = InflatorState { input_gain_db: 24.0, ..Default::default() };
//! assert!(matches!(
//!     validate_settings(&hot),
//!     Err(ValidationError::OutOfRange { .. })
//! ));
//! ```

use inflato_engine::{InflatorState, params};
use thiserror::Error;

use crate::Preset;

/// Highest sample-rate hint accepted in a preset.
pub const MAX_SAMPLE_RATE: u32 = 768_000;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Parameter value out of range.
    #[error("parameter '{param}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// String id of the parameter.
        param: String,
        /// The rejected value.
        value: f64,
        /// Minimum allowed value.
        min: f64,
        /// Maximum allowed value.
        max: f64,
    },

    /// Parameter value is NaN or infinite.
    #[error("parameter '{0}' is not a finite number")]
    NotFinite(String),

    /// Sample-rate hint outside 1..=768000.
    #[error("invalid sample rate: {0}")]
    InvalidSampleRate(u32),

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

fn check(index: usize, value: f64, errors: &mut Vec<ValidationError>) {
    let Some(desc) = params::descriptor(index) else {
        return;
    };
    if !value.is_finite() {
        errors.push(ValidationError::NotFinite(desc.string_id.to_string()));
        return;
    }
    let (min, max) = (f64::from(desc.min), f64::from(desc.max));
    if value < min || value > max {
        errors.push(ValidationError::OutOfRange {
            param: desc.string_id.to_string(),
            value,
            min,
            max,
        });
    }
}

fn collect(mut errors: Vec<ValidationError>) -> ValidationResult<()> {
    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}

fn settings_errors(settings: &InflatorState, errors: &mut Vec<ValidationError>) {
    let continuous = [
        (params::INPUT_GAIN, settings.input_gain_db),
        (params::EFFECT, settings.effect),
        (params::CURVE, settings.curve),
        (params::OUTPUT_GAIN, settings.output_gain_db),
    ];
    for (id, value) in continuous {
        check(id.0 as usize, value, errors);
    }
}

/// Check every continuous setting against its parameter range.
///
/// Switches and choices are valid by construction.
pub fn validate_settings(settings: &InflatorState) -> ValidationResult<()> {
    let mut errors = Vec::new();
    settings_errors(settings, &mut errors);
    collect(errors)
}

/// Validate a preset's settings and sample-rate hint.
pub fn validate_preset(preset: &Preset) -> ValidationResult<()> {
    let mut errors = Vec::new();
    if let Some(rate) = preset.sample_rate
        && !(1..=MAX_SAMPLE_RATE).contains(&rate)
    {
        errors.push(ValidationError::InvalidSampleRate(rate));
    }
    settings_errors(&preset.settings, &mut errors);
    collect(errors)
}
