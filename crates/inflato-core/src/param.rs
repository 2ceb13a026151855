//! Smoothed parameters for zipper-free gain and mix changes.
//!
//! ```rust
//! use inflato_core::SmoothedParam;
//!
//! let mut gain = SmoothedParam::with_config(1.0, 48000.0, 10.0);
//! gain.set_target(0.5);
//! for _ in 0..4800 {
//!     gain.advance();
//! }
//! assert!((gain.get() - 0.5).abs() < 1e-4);
//! for _ in 0..7200 {
//!     gain.advance();
//! }
//! assert!(gain.is_settled());
//! ```

use libm::exp;

/// One-pole smoothed value.
///
/// `current += coeff · (target - current)` each sample, with
/// `coeff = 1 - exp(-1 / (τ · sample_rate))`. A smoothing time of zero makes
/// changes instant.
#[derive(Debug, Clone)]
pub struct SmoothedParam {
    current: f64,
    target: f64,
    coeff: f64,
    sample_rate: f64,
    smoothing_time_ms: f64,
}

impl SmoothedParam {
    /// Create with smoothing disabled.
    pub fn new(initial: f64) -> Self {
        Self {
            current: initial,
            target: initial,
            coeff: 1.0,
            sample_rate: 48000.0,
            smoothing_time_ms: 0.0,
        }
    }

    /// Create with a sample rate and smoothing time.
    pub fn with_config(initial: f64, sample_rate: f64, smoothing_time_ms: f64) -> Self {
        let mut param = Self::new(initial);
        param.sample_rate = sample_rate;
        param.smoothing_time_ms = smoothing_time_ms;
        param.recalculate_coeff();
        param
    }

    /// Set the value to approach.
    #[inline]
    pub fn set_target(&mut self, target: f64) {
        self.target = target;
    }

    /// Set target and current value together.
    #[inline]
    pub fn set_immediate(&mut self, value: f64) {
        self.target = value;
        self.current = value;
    }

    /// Update the sample rate.
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
        self.recalculate_coeff();
    }

    /// Update the smoothing time constant.
    pub fn set_smoothing_time_ms(&mut self, time_ms: f64) {
        self.smoothing_time_ms = time_ms;
        self.recalculate_coeff();
    }

    /// Advance one sample and return the smoothed value.
    #[inline]
    pub fn advance(&mut self) -> f64 {
        self.current += self.coeff * (self.target - self.current);
        self.current
    }

    /// Current value without advancing.
    #[inline]
    pub fn get(&self) -> f64 {
        self.current
    }

    /// Target value.
    #[inline]
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Whether the value is within `1e-9` of the target.
    #[inline]
    pub fn is_settled(&self) -> bool {
        (self.current - self.target).abs() < 1e-9
    }

    /// Jump to the target.
    #[inline]
    pub fn snap_to_target(&mut self) {
        self.current = self.target;
    }

    fn recalculate_coeff(&mut self) {
        if self.smoothing_time_ms <= 0.0 || self.sample_rate <= 0.0 {
            self.coeff = 1.0;
        } else {
            let samples = self.smoothing_time_ms / 1000.0 * self.sample_rate;
            self.coeff = 1.0 - exp(-1.0 / samples);
        }
    }
}

impl Default for SmoothedParam {
    fn default() -> Self {
        Self::new(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unconfigured_is_instant() {
        let mut p = SmoothedParam::new(0.0);
        p.set_target(2.0);
        assert_eq!(p.advance(), 2.0);
    }

    #[test]
    fn one_time_constant_reaches_63_percent() {
        let mut p = SmoothedParam::with_config(0.0, 48000.0, 10.0);
        p.set_target(1.0);
        for _ in 0..480 {
            p.advance();
        }
        assert!((p.get() - (1.0 - libm::exp(-1.0))).abs() < 1e-3);
        assert!(!p.is_settled());
    }

    #[test]
    fn settling_takes_about_twenty_time_constants() {
        let mut p = SmoothedParam::with_config(1.0, 48000.0, 10.0);
        p.set_target(0.5);
        for _ in 0..4800 {
            p.advance();
        }
        assert!(!p.is_settled());
        for _ in 0..7200 {
            p.advance();
        }
        assert!(p.is_settled());
    }

    #[test]
    fn immediate_and_snap() {
        let mut p = SmoothedParam::with_config(0.0, 48000.0, 50.0);
        p.set_immediate(0.7);
        assert_eq!(p.get(), 0.7);
        p.set_target(0.1);
        p.snap_to_target();
        assert!(p.is_settled());
        assert_eq!(p.advance(), 0.1);
    }
}
