//! Oversampling factors, phase modes, and the half-band cascade.
//!
//! Nonlinear shaping generates harmonics that can exceed Nyquist and alias
//! back into the audible range. The cascade mitigates this by:
//!
//! 1. **Upsampling**: one to three half-band interpolation stages (2×, 4×, 8×)
//! 2. **Processing**: the caller shapes every oversampled sub-sample
//! 3. **Downsampling**: the matching decimation stages in reverse order
//!
//! Each stage is designed for its own working rate: stage `i` (1-based) runs
//! at `base · 2^i`, with its cutoff at a quarter of that rate and a shared
//! passband edge at 90% of the base Nyquist. Later stages therefore have a
//! much wider transition band and need far fewer taps.
//!
//! ## Latency
//!
//! An up/down round trip through stage `i` delays the signal by `M_i`
//! samples at rate `base · 2^(i-1)`. Each `M_i` is rounded up to a multiple
//! of `2^(i-1)` at design time, so the total
//!
//! ```text
//! latency(N) = Σ_{i=1..log2 N} M_i / 2^(i-1)
//! ```
//!
//! is always a whole number of base-rate samples.
//!
//! ## Usage
//!
//! ```rust
//! use inflato_core::{HalfBandCascade, OversampleFactor};
//!
//! let mut cascade = HalfBandCascade::new(48000.0);
//! let factor = OversampleFactor::X4;
//! let mut buf = [0.0; 8];
//!
//! cascade.upsample(0.5, factor, &mut buf[..factor.ratio()]);
//! for s in &mut buf[..factor.ratio()] {
//!     *s = s.clamp(-1.0, 1.0);
//! }
//! let y = cascade.downsample(&mut buf[..factor.ratio()], factor);
//! assert!(y.is_finite());
//! ```

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::design::HalfBandSpec;
use crate::halfband::HalfBandStage;

/// Maximum supported oversampling ratio.
pub const MAX_OVERSAMPLE_FACTOR: usize = 8;

/// Number of half-band stages needed for [`MAX_OVERSAMPLE_FACTOR`].
pub const MAX_STAGES: usize = 3;

/// Passband edge as a fraction of the base sample rate (90% of Nyquist).
pub const PASSBAND_RATIO: f64 = 0.45;

/// Stopband attenuation every cascade stage is designed for.
pub const STAGE_ATTENUATION_DB: f64 = 90.0;

/// Oversampling ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OversampleFactor {
    /// No oversampling.
    #[default]
    X1,
    /// 2× oversampling, one half-band stage.
    X2,
    /// 4× oversampling, two stages.
    X4,
    /// 8× oversampling, three stages.
    X8,
}

impl OversampleFactor {
    /// All factors in ascending order.
    pub const ALL: [Self; 4] = [Self::X1, Self::X2, Self::X4, Self::X8];

    /// Rate multiplier (1, 2, 4 or 8).
    pub const fn ratio(self) -> usize {
        match self {
            Self::X1 => 1,
            Self::X2 => 2,
            Self::X4 => 4,
            Self::X8 => 8,
        }
    }

    /// Number of half-band stages in the chain.
    pub const fn stages(self) -> usize {
        match self {
            Self::X1 => 0,
            Self::X2 => 1,
            Self::X4 => 2,
            Self::X8 => 3,
        }
    }

    /// Stable index (0..=3), as used by parameters and persisted state.
    pub const fn index(self) -> usize {
        self.stages()
    }

    /// Factor from its stable index. Out-of-range indices clamp to 8×.
    pub const fn from_index(index: usize) -> Self {
        match index {
            0 => Self::X1,
            1 => Self::X2,
            2 => Self::X4,
            _ => Self::X8,
        }
    }

    /// Factor from a ratio (1, 2, 4, 8). Returns `None` for anything else.
    pub const fn from_ratio(ratio: usize) -> Option<Self> {
        match ratio {
            1 => Some(Self::X1),
            2 => Some(Self::X2),
            4 => Some(Self::X4),
            8 => Some(Self::X8),
            _ => None,
        }
    }
}

/// Rate-conversion strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PhaseMode {
    /// Short half-band cascade (tens of samples of latency).
    #[default]
    Minimum,
    /// Long windowed-sinc resampler with flat phase (hundreds to thousands
    /// of samples of latency).
    Linear,
}

impl PhaseMode {
    /// Stable index (0 = minimum, 1 = linear).
    pub const fn index(self) -> usize {
        match self {
            Self::Minimum => 0,
            Self::Linear => 1,
        }
    }

    /// Mode from its stable index; anything non-zero selects [`PhaseMode::Linear`].
    pub const fn from_index(index: usize) -> Self {
        if index == 0 { Self::Minimum } else { Self::Linear }
    }
}

/// Per-channel half-band up/down cascade covering every factor up to 8×.
///
/// The three stage designs depend only on the base rate and the stage
/// position, so a single cascade serves all factors by running the first
/// `factor.stages()` stages. Switching factor requires no redesign; call
/// [`reset`](Self::reset) to discard stale history.
#[derive(Debug, Clone)]
pub struct HalfBandCascade {
    up: Vec<HalfBandStage>,
    down: Vec<HalfBandStage>,
    /// Round-trip delay contributed by each stage, in base-rate samples.
    stage_latency: [usize; MAX_STAGES],
}

impl HalfBandCascade {
    /// Design and allocate a cascade for the given base sample rate.
    pub fn new(sample_rate: f64) -> Self {
        let passband = sample_rate * PASSBAND_RATIO;
        let mut up = Vec::with_capacity(MAX_STAGES);
        let mut down = Vec::with_capacity(MAX_STAGES);
        let mut stage_latency = [0; MAX_STAGES];
        for (i, latency) in stage_latency.iter_mut().enumerate() {
            let align = 1 << i;
            let working_rate = sample_rate * f64::from(2u32 << i);
            let spec = HalfBandSpec::design(working_rate, passband, STAGE_ATTENUATION_DB, align);
            *latency = spec.half_len() / align;
            #[cfg(feature = "tracing")]
            tracing::debug!(
                stage = i + 1,
                working_rate,
                taps = spec.tap_count(),
                "designed half-band stage"
            );
            up.push(HalfBandStage::new(&spec));
            down.push(HalfBandStage::new(&spec));
        }
        Self {
            up,
            down,
            stage_latency,
        }
    }

    /// Total up/down group delay for `factor`, in base-rate samples.
    pub fn latency(&self, factor: OversampleFactor) -> usize {
        self.stage_latency[..factor.stages()].iter().sum()
    }

    /// Interpolate one base-rate sample into `out` (`out.len() == factor.ratio()`).
    #[inline]
    pub fn upsample(&mut self, x: f64, factor: OversampleFactor, out: &mut [f64]) {
        debug_assert_eq!(out.len(), factor.ratio());
        out[0] = x;
        let mut n = 1;
        let mut tmp = [0.0; MAX_OVERSAMPLE_FACTOR];
        for stage in &mut self.up[..factor.stages()] {
            tmp[..n].copy_from_slice(&out[..n]);
            for (i, &s) in tmp[..n].iter().enumerate() {
                let (a, b) = stage.upsample(s);
                out[2 * i] = a;
                out[2 * i + 1] = b;
            }
            n *= 2;
        }
    }

    /// Decimate `buf` (`buf.len() == factor.ratio()`) to one base-rate sample.
    ///
    /// `buf` is used as scratch space and is overwritten.
    #[inline]
    pub fn downsample(&mut self, buf: &mut [f64], factor: OversampleFactor) -> f64 {
        debug_assert_eq!(buf.len(), factor.ratio());
        let mut n = factor.ratio();
        for stage in self.down[..factor.stages()].iter_mut().rev() {
            n /= 2;
            for i in 0..n {
                buf[i] = stage.downsample(buf[2 * i], buf[2 * i + 1]);
            }
        }
        buf[0]
    }

    /// Clear every stage's history.
    pub fn reset(&mut self) {
        self.up.iter_mut().chain(self.down.iter_mut()).for_each(HalfBandStage::reset);
    }
}
