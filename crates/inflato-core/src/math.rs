//! Mathematical utility functions for the inflato signal path.
//!
//! Everything here works in `f64`, the precision the engine processes at
//! internally regardless of the host buffer format.
//!
//! # Level Conversions
//!
//! - [`db_to_linear`] / [`linear_to_db`] - Convert between dB and linear gain
//!
//! # Numerical Hygiene
//!
//! - [`flush_denormal`] - Zero out values in the subnormal neighbourhood
//! - [`AntiDenormal`] - Low-amplitude pseudo-random offset injected at the input

use libm::{exp, log};

/// Convert decibels to linear gain.
///
/// # Example
/// ```rust
/// use inflato_core::db_to_linear;
///
/// assert!((db_to_linear(0.0) - 1.0).abs() < 1e-12);
/// assert!((db_to_linear(-6.0206) - 0.5).abs() < 1e-4);
/// ```
#[inline]
pub fn db_to_linear(db: f64) -> f64 {
    // 10^(dB/20) = e^(dB * ln(10)/20)
    const FACTOR: f64 = core::f64::consts::LN_10 / 20.0;
    exp(db * FACTOR)
}

/// Convert linear gain to decibels.
///
/// Inputs at or below `1e-10` are clamped, giving a floor of -200 dB.
///
/// # Example
/// ```rust
/// use inflato_core::linear_to_db;
///
/// assert!(linear_to_db(1.0).abs() < 1e-12);
/// assert!((linear_to_db(0.5) + 6.0206).abs() < 1e-4);
/// ```
#[inline]
pub fn linear_to_db(linear: f64) -> f64 {
    const FACTOR: f64 = 20.0 / core::f64::consts::LN_10;
    log(linear.max(1e-10)) * FACTOR
}

/// Flush values that have drifted toward the subnormal range to zero.
#[inline]
pub fn flush_denormal(x: f64) -> f64 {
    if x.abs() < 1e-30 { 0.0 } else { x }
}

/// Amplitude of the anti-denormal offset (about -360 dBFS).
pub const ANTI_DENORMAL_LEVEL: f64 = 1e-18;

/// Pseudo-random anti-denormal offset generator.
///
/// Recursive filters fed with pure digital silence decay into the subnormal
/// range, where many CPUs fall off a performance cliff. Adding an inaudible
/// noise floor to every input sample keeps all downstream state normal.
/// This is a performance measure only; the offset sits hundreds of dB below
/// any audible level.
///
/// The generator is a 32-bit linear congruential generator with the
/// Numerical Recipes constants (`a = 1664525`, `c = 1013904223`).
///
/// # Example
///
/// ```rust
/// use inflato_core::{AntiDenormal, ANTI_DENORMAL_LEVEL};
///
/// let mut noise = AntiDenormal::new(1);
/// let x = noise.apply(0.0);
/// assert!(x != 0.0);
/// assert!(x.abs() <= ANTI_DENORMAL_LEVEL);
/// ```
#[derive(Debug, Clone)]
pub struct AntiDenormal {
    state: u32,
}

impl AntiDenormal {
    /// Create a generator with the given seed.
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    #[inline]
    fn next_u32(&mut self) -> u32 {
        const A: u32 = 1664525;
        const C: u32 = 1013904223;
        self.state = self.state.wrapping_mul(A).wrapping_add(C);
        self.state
    }

    /// Next offset, uniformly distributed in `(-level, level]` and never zero.
    #[inline]
    pub fn next_offset(&mut self) -> f64 {
        let unit = (f64::from(self.next_u32()) + 1.0) / (f64::from(u32::MAX) + 1.0);
        let centered = 2.0 * unit - 1.0;
        if centered == 0.0 {
            ANTI_DENORMAL_LEVEL
        } else {
            ANTI_DENORMAL_LEVEL * centered
        }
    }

    /// Add the next offset to `x`.
    #[inline]
    pub fn apply(&mut self, x: f64) -> f64 {
        x + self.next_offset()
    }
}

impl Default for AntiDenormal {
    fn default() -> Self {
        Self::new(0x1234_5678)
    }
}
