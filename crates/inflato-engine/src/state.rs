//! Full processor configuration and its persisted binary form.
//!
//! # Binary Layout
//!
//! Little-endian, fixed order:
//!
//! ```text
//! f64  input gain (dB)
//! f64  effect (%)
//! f64  curve
//! f64  output gain (dB)
//! i32  oversampling factor index (0..=3)
//! i32  clip
//! i32  input enable
//! i32  split
//! i32  phase (0 = minimum, 1 = linear)
//! i32  bypass
//! ```
//!
//! Blobs written by older versions may end early inside the integer block;
//! the missing fields take their defaults. A blob shorter than the float
//! block is rejected.

use inflato_core::{OversampleFactor, PhaseMode};
use serde::{Deserialize, Serialize};

use crate::error::StateError;
use crate::params;

/// Bytes in the leading float block.
pub const FLOAT_BLOCK_LEN: usize = 4 * 8;

/// Bytes in a complete blob.
pub const STATE_LEN: usize = FLOAT_BLOCK_LEN + 6 * 4;

/// Every user-facing control of the processor.
///
/// Serializes to TOML/JSON with the oversampling factor written as its
/// ratio (`1`, `2`, `4`, `8`) and the phase mode as `"minimum"` or
/// `"linear"`. Missing fields take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InflatorState {
    /// Input gain in dB (-6..=12).
    pub input_gain_db: f64,
    /// Wet/dry mix in percent (0..=100).
    pub effect: f64,
    /// Transfer-curve shape (-50..=50).
    pub curve: f64,
    /// Output gain in dB (-12..=0).
    pub output_gain_db: f64,
    /// Oversampling factor.
    #[serde(with = "ratio")]
    pub oversampling: OversampleFactor,
    /// Hard clip to ±1 before shaping.
    pub clip: bool,
    /// Apply the input gain.
    pub input_enable: bool,
    /// Shape three bands independently.
    pub split: bool,
    /// Rate-conversion phase mode.
    #[serde(with = "phase")]
    pub phase: PhaseMode,
    /// Emit the latency-aligned dry signal.
    pub bypass: bool,
}

impl Default for InflatorState {
    fn default() -> Self {
        Self {
            input_gain_db: 0.0,
            effect: 100.0,
            curve: 0.0,
            output_gain_db: 0.0,
            oversampling: OversampleFactor::X1,
            clip: false,
            input_enable: true,
            split: false,
            phase: PhaseMode::Minimum,
            bypass: false,
        }
    }
}

impl InflatorState {
    /// Serialize to the fixed binary layout.
    ///
    /// ```rust
    /// use inflato_engine::{InflatorState, STATE_LEN};
    ///
    /// let state = InflatorState { curve: 20.0, clip: true, ..Default::default() };
    /// let bytes = state.to_bytes();
    /// assert_eq!(bytes.len(), STATE_LEN);
    /// assert_eq!(InflatorState::from_bytes(&bytes).unwrap(), state);
    /// ```
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(STATE_LEN);
        for value in [self.input_gain_db, self.effect, self.curve, self.output_gain_db] {
            out.extend_from_slice(&value.to_le_bytes());
        }
        for value in [
            self.oversampling.index() as i32,
            i32::from(self.clip),
            i32::from(self.input_enable),
            i32::from(self.split),
            self.phase.index() as i32,
            i32::from(self.bypass),
        ] {
            out.extend_from_slice(&value.to_le_bytes());
        }
        out
    }

    /// Restore from the binary layout.
    ///
    /// Values are sanitized into their parameter ranges. Trailing integer
    /// fields that are missing keep their defaults.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StateError> {
        if bytes.len() < FLOAT_BLOCK_LEN {
            return Err(StateError::Truncated {
                needed: FLOAT_BLOCK_LEN,
                got: bytes.len(),
            });
        }
        let float = |i: usize| {
            let mut raw = [0u8; 8];
            raw.copy_from_slice(&bytes[i * 8..i * 8 + 8]);
            f64::from_le_bytes(raw)
        };
        let int = |i: usize| {
            let start = FLOAT_BLOCK_LEN + i * 4;
            bytes.get(start..start + 4).map(|chunk| {
                let mut raw = [0u8; 4];
                raw.copy_from_slice(chunk);
                i32::from_le_bytes(raw)
            })
        };

        let defaults = Self::default();
        let state = Self {
            input_gain_db: float(0),
            effect: float(1),
            curve: float(2),
            output_gain_db: float(3),
            oversampling: int(0).map_or(defaults.oversampling, |v| {
                OversampleFactor::from_index(v.max(0) as usize)
            }),
            clip: int(1).map_or(defaults.clip, |v| v != 0),
            input_enable: int(2).map_or(defaults.input_enable, |v| v != 0),
            split: int(3).map_or(defaults.split, |v| v != 0),
            phase: int(4).map_or(defaults.phase, |v| PhaseMode::from_index(v.max(0) as usize)),
            bypass: int(5).map_or(defaults.bypass, |v| v != 0),
        };
        Ok(state.sanitized())
    }

    /// Clamp every continuous field into its parameter range; non-finite
    /// values become the default.
    pub fn sanitized(mut self) -> Self {
        let fix = params::clamp_value;
        self.input_gain_db = fix(0, self.input_gain_db);
        self.effect = fix(1, self.effect);
        self.curve = fix(2, self.curve);
        self.output_gain_db = fix(7, self.output_gain_db);
        self
    }
}

mod ratio {
    use inflato_core::OversampleFactor;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(factor: &OversampleFactor, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u32(factor.ratio() as u32)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<OversampleFactor, D::Error> {
        let ratio = u32::deserialize(d)?;
        OversampleFactor::from_ratio(ratio as usize)
            .ok_or_else(|| {
                D::Error::custom(format!("oversampling must be 1, 2, 4 or 8, got {ratio}"))
            })
    }
}

mod phase {
    use inflato_core::PhaseMode;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(mode: &PhaseMode, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(match mode {
            PhaseMode::Minimum => "minimum",
            PhaseMode::Linear => "linear",
        })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<PhaseMode, D::Error> {
        let name = String::deserialize(d)?;
        match name.to_ascii_lowercase().as_str() {
            "minimum" | "min" => Ok(PhaseMode::Minimum),
            "linear" | "lin" => Ok(PhaseMode::Linear),
            other => Err(D::Error::custom(format!("unknown phase mode '{other}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_state() -> InflatorState {
        InflatorState {
            input_gain_db: 3.5,
            effect: 72.0,
            curve: -12.5,
            output_gain_db: -1.5,
            oversampling: OversampleFactor::X4,
            clip: true,
            input_enable: false,
            split: true,
            phase: PhaseMode::Linear,
            bypass: true,
        }
    }

    #[test]
    fn layout_is_fixed_order_little_endian() {
        let bytes = sample_state().to_bytes();
        assert_eq!(bytes.len(), STATE_LEN);
        assert_eq!(&bytes[0..8], &3.5f64.to_le_bytes());
        assert_eq!(&bytes[24..32], &(-1.5f64).to_le_bytes());
        assert_eq!(&bytes[32..36], &2i32.to_le_bytes());
        assert_eq!(&bytes[36..40], &1i32.to_le_bytes());
        assert_eq!(&bytes[40..44], &0i32.to_le_bytes());
        assert_eq!(&bytes[48..52], &1i32.to_le_bytes());
    }

    #[test]
    fn missing_trailing_fields_take_defaults() {
        let bytes = sample_state().to_bytes();
        // Cut after clip (two integers).
        let state = InflatorState::from_bytes(&bytes[..FLOAT_BLOCK_LEN + 8]).unwrap();
        assert_eq!(state.oversampling, OversampleFactor::X4);
        assert!(state.clip);
        assert!(state.input_enable);
        assert!(!state.split);
        assert_eq!(state.phase, PhaseMode::Minimum);
        assert!(!state.bypass);
        // A partial integer is ignored too.
        let state = InflatorState::from_bytes(&bytes[..FLOAT_BLOCK_LEN + 2]).unwrap();
        assert_eq!(state.oversampling, OversampleFactor::X1);
        assert_eq!(state.curve, -12.5);
    }

    #[test]
    fn truncated_float_block_is_rejected() {
        let bytes = sample_state().to_bytes();
        assert_eq!(
            InflatorState::from_bytes(&bytes[..20]),
            Err(StateError::Truncated { needed: 32, got: 20 })
        );
        assert!(InflatorState::from_bytes(&[]).is_err());
    }

    #[test]
    fn out_of_range_values_are_sanitized() {
        let mut bytes = InflatorState::default().to_bytes();
        bytes[0..8].copy_from_slice(&40.0f64.to_le_bytes());
        bytes[16..24].copy_from_slice(&f64::NAN.to_le_bytes());
        bytes[32..36].copy_from_slice(&(-3i32).to_le_bytes());
        bytes[48..52].copy_from_slice(&7i32.to_le_bytes());
        let state = InflatorState::from_bytes(&bytes).unwrap();
        assert_eq!(state.input_gain_db, 12.0);
        assert_eq!(state.curve, 0.0);
        assert_eq!(state.oversampling, OversampleFactor::X1);
        assert_eq!(state.phase, PhaseMode::Linear);
    }

    #[test]
    fn toml_uses_ratio_and_phase_names() {
        let text = toml::to_string(&sample_state()).unwrap();
        assert!(text.contains("oversampling = 4"), "{text}");
        assert!(text.contains("phase = \"linear\""), "{text}");
        let back: InflatorState = toml::from_str(&text).unwrap();
        assert_eq!(back, sample_state());

        let partial: InflatorState = toml::from_str("curve = 10.0\noversampling = 8").unwrap();
        assert_eq!(partial.curve, 10.0);
        assert_eq!(partial.oversampling, OversampleFactor::X8);
        assert_eq!(partial.effect, 100.0);

        assert!(toml::from_str::<InflatorState>("oversampling = 3").is_err());
        assert!(toml::from_str::<InflatorState>("phase = \"maximum\"").is_err());
    }
}
