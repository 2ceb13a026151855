//! Parameter introspection for hosts, presets and the command line.
//!
//! Processors expose their controls through the [`ParameterInfo`] trait. Each
//! control is described by a [`ParamDescriptor`] carrying its range, default,
//! unit and a stable [`ParamId`] that survives reordering.
//!
//! # Example
//!
//! ```rust
//! use inflato_core::{ParamDescriptor, ParamId, ParameterInfo};
//!
//! struct Trim {
//!     gain_db: f32,
//! }
//!
//! impl ParameterInfo for Trim {
//!     fn param_count(&self) -> usize { 1 }
//!
//!     fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
//!         match index {
//!             0 => Some(ParamDescriptor::gain_db("Trim", "Trim", -12.0, 12.0, 0.0)
//!                 .with_id(ParamId(1), "trim")),
//!             _ => None,
//!         }
//!     }
//!
//!     fn get_param(&self, index: usize) -> f32 {
//!         match index {
//!             0 => self.gain_db,
//!             _ => 0.0,
//!         }
//!     }
//!
//!     fn set_param(&mut self, index: usize, value: f32) {
//!         if index == 0 {
//!             self.gain_db = value.clamp(-12.0, 12.0);
//!         }
//!     }
//! }
//!
//! let mut trim = Trim { gain_db: 0.0 };
//! trim.set_param(0, 40.0);
//! assert_eq!(trim.get_param(0), 12.0);
//! assert_eq!(trim.param_index_by_id(ParamId(1)), Some(0));
//! ```

/// Stable parameter identifier.
///
/// Used for automation events and state persistence. Once assigned, an id
/// never changes for a given parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParamId(pub u32);

/// Parameter capability flags. Combine with [`union`](Self::union).
///
/// ```rust
/// use inflato_core::ParamFlags;
///
/// let flags = ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED);
/// assert!(flags.contains(ParamFlags::STEPPED));
/// assert!(!flags.contains(ParamFlags::BYPASS));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamFlags(u8);

impl ParamFlags {
    /// No flags set.
    pub const NONE: Self = Self(0);
    /// Host can automate this parameter.
    pub const AUTOMATABLE: Self = Self(1 << 0);
    /// Discrete integer steps (switches and choices).
    pub const STEPPED: Self = Self(1 << 1);
    /// The processor's bypass switch.
    pub const BYPASS: Self = Self(1 << 2);

    /// Returns `true` if all bits in `other` are set in `self`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns the union of two flag sets.
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl Default for ParamFlags {
    fn default() -> Self {
        Self::AUTOMATABLE
    }
}

/// Unit used when displaying a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamUnit {
    /// Decibels.
    Decibels,
    /// Percentage.
    Percent,
    /// Dimensionless.
    None,
}

impl ParamUnit {
    /// Suffix appended to displayed values.
    ///
    /// ```rust
    /// use inflato_core::ParamUnit;
    ///
    /// assert_eq!(ParamUnit::Decibels.suffix(), " dB");
    /// assert_eq!(ParamUnit::None.suffix(), "");
    /// ```
    pub const fn suffix(&self) -> &'static str {
        match self {
            ParamUnit::Decibels => " dB",
            ParamUnit::Percent => "%",
            ParamUnit::None => "",
        }
    }
}

/// Metadata for one parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Full display name.
    pub name: &'static str,
    /// Short name for narrow displays, at most 8 characters.
    pub short_name: &'static str,
    /// Display unit.
    pub unit: ParamUnit,
    /// Minimum value.
    pub min: f32,
    /// Maximum value.
    pub max: f32,
    /// Value after construction or reset.
    pub default: f32,
    /// Recommended increment.
    pub step: f32,
    /// Stable numeric id. `ParamId(0)` until assigned.
    pub id: ParamId,
    /// Stable snake_case id used in presets and on the command line.
    pub string_id: &'static str,
    /// Capability flags.
    pub flags: ParamFlags,
    /// Labels for stepped values, indexed from `min`. Empty for continuous
    /// parameters.
    pub labels: &'static [&'static str],
}

impl ParamDescriptor {
    /// Gain parameter in decibels.
    pub fn gain_db(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::Decibels,
            min,
            max,
            default,
            step: 0.1,
            id: ParamId(0),
            string_id: "",
            flags: ParamFlags::AUTOMATABLE,
            labels: &[],
        }
    }

    /// Continuous parameter with a custom unit and range.
    pub fn custom(
        name: &'static str,
        short_name: &'static str,
        unit: ParamUnit,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            short_name,
            unit,
            min,
            max,
            default,
            step: 1.0,
            id: ParamId(0),
            string_id: "",
            flags: ParamFlags::AUTOMATABLE,
            labels: &[],
        }
    }

    /// On/off switch with values 0 and 1.
    pub fn toggle(name: &'static str, short_name: &'static str, default: bool) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::None,
            min: 0.0,
            max: 1.0,
            default: if default { 1.0 } else { 0.0 },
            step: 1.0,
            id: ParamId(0),
            string_id: "",
            flags: ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED),
            labels: &["Off", "On"],
        }
    }

    /// Choice among `labels`, valued `0..labels.len()`.
    pub fn choice(
        name: &'static str,
        short_name: &'static str,
        labels: &'static [&'static str],
        default: usize,
    ) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::None,
            min: 0.0,
            max: labels.len().saturating_sub(1) as f32,
            default: default as f32,
            step: 1.0,
            id: ParamId(0),
            string_id: "",
            flags: ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED),
            labels,
        }
    }

    /// Sets the stable ids. Builder style.
    pub const fn with_id(mut self, id: ParamId, string_id: &'static str) -> Self {
        self.id = id;
        self.string_id = string_id;
        self
    }

    /// Sets the flags. Builder style.
    pub const fn with_flags(mut self, flags: ParamFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Whether the parameter takes discrete steps.
    pub fn is_stepped(&self) -> bool {
        self.flags.contains(ParamFlags::STEPPED)
    }

    /// Clamps a value to the valid range, rounding stepped parameters.
    /// NaN becomes the default.
    ///
    /// ```rust
    /// use inflato_core::ParamDescriptor;
    ///
    /// let gain = ParamDescriptor::gain_db("Gain", "Gain", -6.0, 12.0, 0.0);
    /// assert_eq!(gain.clamp(20.0), 12.0);
    /// assert_eq!(gain.clamp(f32::NAN), 0.0);
    ///
    /// let clip = ParamDescriptor::toggle("Clip", "Clip", false);
    /// assert_eq!(clip.clamp(0.7), 1.0);
    /// ```
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            return self.default;
        }
        let value = value.clamp(self.min, self.max);
        if self.is_stepped() {
            libm::roundf(value)
        } else {
            value
        }
    }

    /// Plain value to 0..=1.
    #[inline]
    pub fn normalize(&self, value: f32) -> f32 {
        let range = self.max - self.min;
        if range == 0.0 {
            return 0.0;
        }
        (value - self.min) / range
    }

    /// 0..=1 back to the plain range.
    #[inline]
    pub fn denormalize(&self, normalized: f32) -> f32 {
        self.clamp(self.min + normalized * (self.max - self.min))
    }

    /// Label for a stepped value, if one exists.
    ///
    /// ```rust
    /// use inflato_core::ParamDescriptor;
    ///
    /// let phase = ParamDescriptor::choice("Phase", "Phase", &["Minimum", "Linear"], 0);
    /// assert_eq!(phase.label(1.0), Some("Linear"));
    /// assert_eq!(phase.label(5.0), Some("Linear"));
    /// ```
    pub fn label(&self, value: f32) -> Option<&'static str> {
        if self.labels.is_empty() {
            return None;
        }
        let index = (self.clamp(value) - self.min) as usize;
        self.labels.get(index).copied()
    }
}

/// A processor whose parameters can be discovered and set by index.
///
/// Indices are stable for the lifetime of the instance. Out-of-range
/// indices are ignored by setters and read as `0.0`.
pub trait ParameterInfo {
    /// Number of parameters.
    fn param_count(&self) -> usize;

    /// Descriptor for `index`, `None` when out of range.
    fn param_info(&self, index: usize) -> Option<ParamDescriptor>;

    /// Current value at `index`.
    fn get_param(&self, index: usize) -> f32;

    /// Set the value at `index`. Implementations clamp to the descriptor range.
    fn set_param(&mut self, index: usize, value: f32);

    /// Find a parameter by name, short name or string id (case-insensitive).
    fn find_param_by_name(&self, name: &str) -> Option<usize> {
        (0..self.param_count()).find(|&i| {
            self.param_info(i).is_some_and(|desc| {
                desc.name.eq_ignore_ascii_case(name)
                    || desc.short_name.eq_ignore_ascii_case(name)
                    || desc.string_id.eq_ignore_ascii_case(name)
            })
        })
    }

    /// Stable id for `index`.
    fn param_id(&self, index: usize) -> Option<ParamId> {
        self.param_info(index).map(|d| d.id)
    }

    /// Index of the parameter with `id`. Linear scan; not for the audio path.
    fn param_index_by_id(&self, id: ParamId) -> Option<usize> {
        (0..self.param_count()).find(|&i| self.param_info(i).is_some_and(|d| d.id == id))
    }
}
