//! Two-corner, three-band crossover built from one-pole TPT sections.
//!
//! # Algorithm
//!
//! Each section is a trapezoidal (zero-delay-feedback) one-pole low-pass:
//!
//! ```text
//! y = s + a·(x - s)
//! s = 2y - s
//! ```
//!
//! with `a = 0.5·tan(π·(f/fs - 0.25)) + 0.5`, which equals `t / (1 + t)` for
//! the prewarped `t = tan(π f / fs)`.
//!
//! Two sections at the low and high corners give
//!
//! ```text
//! low  = LP_low(x)
//! mid  = LP_high(x) - LP_low(x)
//! high = x - LP_high(x)
//! ```
//!
//! so `low + mid + high == x` sample for sample. The mid band is a first-order
//! band-pass whose peak gain at the geometric centre is
//! `(t_hi - t_lo) / (t_hi + t_lo)`; [`BandSplitter::mid_gain`] is the reciprocal,
//! applied before shaping and undone after it.
//!
//! # References
//!
//! - Vadim Zavalishin, *The Art of VA Filter Design*, ch. 3.

use libm::tan;

use crate::math::flush_denormal;

/// Default low corner in Hz.
pub const DEFAULT_LOW_HZ: f64 = 240.0;

/// Default high corner in Hz.
pub const DEFAULT_HIGH_HZ: f64 = 2400.0;

/// One-pole TPT low-pass section.
#[derive(Debug, Clone, Copy, Default)]
struct OnePoleTpt {
    a: f64,
    s: f64,
}

impl OnePoleTpt {
    #[inline]
    fn process(&mut self, x: f64) -> f64 {
        let y = self.s + self.a * (x - self.s);
        self.s = flush_denormal(2.0 * y - self.s);
        y
    }
}

/// Section coefficient for a corner frequency.
fn coefficient(freq: f64, sample_rate: f64) -> f64 {
    let normalized = (freq / sample_rate).clamp(1e-6, 0.49);
    0.5 * tan(core::f64::consts::PI * (normalized - 0.25)) + 0.5
}

/// The three bands of one input sample.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bands {
    /// Below the low corner.
    pub low: f64,
    /// Between the corners (not gain-corrected).
    pub mid: f64,
    /// Above the high corner.
    pub high: f64,
}

/// Per-channel three-band splitter.
///
/// # Example
///
/// ```rust
/// use inflato_core::BandSplitter;
///
/// let mut split = BandSplitter::new(96000.0, 240.0, 2400.0);
/// let b = split.split(0.5);
/// assert!((b.low + b.mid + b.high - 0.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct BandSplitter {
    low: OnePoleTpt,
    high: OnePoleTpt,
    low_hz: f64,
    high_hz: f64,
    sample_rate: f64,
    mid_gain: f64,
    mid_gain_recip: f64,
}

impl BandSplitter {
    /// Create a splitter. Corners are swapped if given in the wrong order.
    pub fn new(sample_rate: f64, low_hz: f64, high_hz: f64) -> Self {
        let mut splitter = Self {
            low: OnePoleTpt::default(),
            high: OnePoleTpt::default(),
            low_hz,
            high_hz,
            sample_rate,
            mid_gain: 1.0,
            mid_gain_recip: 1.0,
        };
        splitter.recalculate();
        splitter
    }

    /// Change the corners, keeping filter state.
    pub fn set_frequencies(&mut self, low_hz: f64, high_hz: f64) {
        self.low_hz = low_hz;
        self.high_hz = high_hz;
        self.recalculate();
    }

    /// Change the processing rate, keeping filter state.
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
        self.recalculate();
    }

    /// Low corner in Hz.
    pub fn low_hz(&self) -> f64 {
        self.low_hz
    }

    /// High corner in Hz.
    pub fn high_hz(&self) -> f64 {
        self.high_hz
    }

    /// Forward gain applied to the mid band before shaping.
    pub fn mid_gain(&self) -> f64 {
        self.mid_gain
    }

    /// Reciprocal of [`mid_gain`](Self::mid_gain), applied after shaping.
    pub fn mid_gain_recip(&self) -> f64 {
        self.mid_gain_recip
    }

    /// Split one sample.
    #[inline]
    pub fn split(&mut self, x: f64) -> Bands {
        let lp_low = self.low.process(x);
        let lp_high = self.high.process(x);
        Bands {
            low: lp_low,
            mid: lp_high - lp_low,
            high: x - lp_high,
        }
    }

    /// Split `x`, run each band through `shape` and recombine, with the mid
    /// band gain-corrected around the shaper.
    #[inline]
    pub fn process_with<F: Fn(f64) -> f64>(&mut self, x: f64, shape: F) -> f64 {
        let b = self.split(x);
        shape(b.low) + shape(b.mid * self.mid_gain) * self.mid_gain_recip + shape(b.high)
    }

    /// Clear filter state.
    pub fn reset(&mut self) {
        self.low.s = 0.0;
        self.high.s = 0.0;
    }

    fn recalculate(&mut self) {
        let (lo, hi) = if self.low_hz <= self.high_hz {
            (self.low_hz, self.high_hz)
        } else {
            (self.high_hz, self.low_hz)
        };
        self.low.a = coefficient(lo, self.sample_rate);
        self.high.a = coefficient(hi, self.sample_rate);

        let t_lo = self.low.a / (1.0 - self.low.a);
        let t_hi = self.high.a / (1.0 - self.high.a);
        let spread = t_hi - t_lo;
        if spread > 1e-9 {
            self.mid_gain = (t_hi + t_lo) / spread;
            self.mid_gain_recip = 1.0 / self.mid_gain;
        } else {
            self.mid_gain = 1.0;
            self.mid_gain_recip = 1.0;
        }
    }
}

impl Default for BandSplitter {
    fn default() -> Self {
        Self::new(48000.0, DEFAULT_LOW_HZ, DEFAULT_HIGH_HZ)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coefficient_matches_prewarped_form() {
        for f in [100.0, 240.0, 2400.0, 10000.0] {
            let t = tan(core::f64::consts::PI * f / 48000.0);
            assert!((coefficient(f, 48000.0) - t / (1.0 + t)).abs() < 1e-12);
        }
    }

    #[test]
    fn gain_correction_is_reciprocal() {
        let split = BandSplitter::new(96000.0, 240.0, 2400.0);
        assert!(split.mid_gain() > 1.0);
        assert!((split.mid_gain() * split.mid_gain_recip() - 1.0).abs() < 1e-15);
    }

    #[test]
    fn bands_reconstruct_input() {
        let mut split = BandSplitter::new(48000.0, 240.0, 2400.0);
        for i in 0..2000 {
            let x = libm::sin(i as f64 * 0.05) * 0.6 + libm::sin(i as f64 * 1.3) * 0.3;
            let y = split.process_with(x, |v| v);
            assert!((y - x).abs() < 1e-12, "sample {i}: {y} vs {x}");
        }
    }

    #[test]
    fn low_band_passes_dc() {
        let mut split = BandSplitter::new(48000.0, 240.0, 2400.0);
        let mut b = Bands::default();
        for _ in 0..48000 {
            b = split.split(1.0);
        }
        assert!((b.low - 1.0).abs() < 1e-6);
        assert!(b.mid.abs() < 1e-6);
        assert!(b.high.abs() < 1e-6);
    }

    #[test]
    fn mid_band_peak_is_normalized() {
        // A sine at the geometric centre should come out of the corrected mid
        // band at close to unity amplitude.
        let sr = 48000.0;
        let mut split = BandSplitter::new(sr, 240.0, 2400.0);
        let t_lo = tan(core::f64::consts::PI * 240.0 / sr);
        let t_hi = tan(core::f64::consts::PI * 2400.0 / sr);
        let centre = libm::atan(libm::sqrt(t_lo * t_hi)) * sr / core::f64::consts::PI;
        let mut peak: f64 = 0.0;
        for i in 0..(sr as usize) {
            let x = libm::sin(2.0 * core::f64::consts::PI * centre * i as f64 / sr);
            let mid = split.split(x).mid * split.mid_gain();
            if i > sr as usize / 2 {
                peak = peak.max(mid.abs());
            }
        }
        assert!((peak - 1.0).abs() < 2e-3, "peak {peak}");
    }

    #[test]
    fn swapped_corners_are_reordered() {
        let a = BandSplitter::new(48000.0, 2400.0, 240.0);
        let b = BandSplitter::new(48000.0, 240.0, 2400.0);
        assert_eq!(a.mid_gain(), b.mid_gain());
    }
}
