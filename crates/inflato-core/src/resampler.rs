//! Linear-phase rate conversion through a windowed-sinc resampler.
//!
//! Wraps [`rubato::SincFixedIn`] so it can be driven one base-rate sample at
//! a time from a real-time callback of any block size:
//!
//! - input is accumulated into a fixed chunk before each resampler call,
//! - output goes to a FIFO that was primed with zeros at construction, so a
//!   pop never has to wait for the next chunk,
//! - every buffer is sized in [`SincResampler::new`]; pushing and popping
//!   never allocate.
//!
//! `SincFixedIn` starts its read position half a sinc into the first chunk,
//! so it emits timestamp-aligned output but fewer frames from the first
//! chunk than from later ones. The priming covers one chunk of buffering
//! plus that shortfall ([`rubato::Resampler::output_delay`]); with it the
//! FIFO never underflows and the delay is the priming alone, identical for
//! every sample. [`LinearPhasePair::latency`] reports it in base-rate
//! samples.

use std::collections::VecDeque;

pub use rubato::ResamplerConstructionError;
use rubato::{
    Resampler as _, SincFixedIn, SincInterpolationParameters, SincInterpolationType,
    WindowFunction,
};

use crate::oversample::OversampleFactor;

/// Base-rate frames collected before each resampler call.
pub const CHUNK_FRAMES: usize = 512;

/// Sinc table oversampling. A multiple of every supported ratio, so integer
/// ratio positions land exactly on table entries.
const SINC_OVERSAMPLING: usize = 32;

/// Design trade-off between latency and transition steepness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResamplerQuality {
    /// 128-tap sinc (base rate): shortest latency, widest transition.
    Low,
    /// 256-tap sinc.
    #[default]
    Standard,
    /// 512-tap sinc: steepest transition, longest latency.
    High,
}

impl ResamplerQuality {
    /// Sinc length in base-rate samples.
    pub const fn sinc_len(self) -> usize {
        match self {
            Self::Low => 128,
            Self::Standard => 256,
            Self::High => 512,
        }
    }
}

/// Direction of a [`SincResampler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Base rate to `ratio ×` base rate.
    Up,
    /// `ratio ×` base rate back to base rate.
    Down,
}

/// One single-channel sinc resampler with fixed integer ratio.
pub struct SincResampler {
    inner: SincFixedIn<f64>,
    input: Vec<Vec<f64>>,
    filled: usize,
    output: Vec<Vec<f64>>,
    fifo: VecDeque<f64>,
    /// Zeros primed into the FIFO.
    prime: usize,
    /// Output frames expected from one chunk.
    chunk_out: usize,
}

impl core::fmt::Debug for SincResampler {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SincResampler")
            .field("filled", &self.filled)
            .field("queued", &self.fifo.len())
            .field("prime", &self.prime)
            .finish_non_exhaustive()
    }
}

impl SincResampler {
    /// Build a resampler for `ratio` (2, 4 or 8) in the given direction.
    pub fn new(
        ratio: usize,
        direction: Direction,
        quality: ResamplerQuality,
    ) -> Result<Self, ResamplerConstructionError> {
        let ratio = ratio.max(1);
        let (resample_ratio, sinc_len, chunk_in, chunk_out) = match direction {
            Direction::Up => (
                ratio as f64,
                quality.sinc_len(),
                CHUNK_FRAMES,
                CHUNK_FRAMES * ratio,
            ),
            // Downsampling keeps the sinc length in input samples, so scale it
            // to cover the same base-rate span as the upsampler.
            Direction::Down => (
                1.0 / ratio as f64,
                quality.sinc_len() * ratio,
                CHUNK_FRAMES * ratio,
                CHUNK_FRAMES,
            ),
        };
        let params = SincInterpolationParameters {
            sinc_len,
            f_cutoff: 0.95,
            interpolation: SincInterpolationType::Linear,
            oversampling_factor: SINC_OVERSAMPLING,
            window: WindowFunction::BlackmanHarris2,
        };
        let inner = SincFixedIn::<f64>::new(resample_ratio, 1.0, params, chunk_in, 1)?;
        let delay = inner.output_delay();
        let out_max = inner.output_frames_max();

        // Frames popped until the second chunk lands, less what the first
        // chunk delivers. `delay` is a multiple of `ratio` going up, so the
        // upsampler's priming is a whole number of base-rate samples.
        let prime = match direction {
            Direction::Up => (CHUNK_FRAMES + 1) * ratio + delay,
            Direction::Down => CHUNK_FRAMES + delay,
        };

        let mut fifo = VecDeque::with_capacity(prime + 2 * out_max);
        fifo.extend(core::iter::repeat_n(0.0, prime));

        Ok(Self {
            inner,
            input: vec![vec![0.0; chunk_in]],
            filled: 0,
            output: vec![vec![0.0; out_max]],
            fifo,
            prime,
            chunk_out,
        })
    }

    /// Queue one input sample, running the resampler when a chunk is full.
    #[inline]
    pub fn push(&mut self, x: f64) {
        self.input[0][self.filled] = x;
        self.filled += 1;
        if self.filled == self.input[0].len() {
            self.filled = 0;
            match self.inner.process_into_buffer(&self.input, &mut self.output, None) {
                Ok((_, written)) => self.fifo.extend(self.output[0][..written].iter().copied()),
                // Keep the timeline intact if the resampler refuses a chunk.
                Err(_) => self.fifo.extend(core::iter::repeat_n(0.0, self.chunk_out)),
            }
        }
    }

    /// Pop one output sample (zero on underflow).
    #[inline]
    pub fn pop(&mut self) -> f64 {
        self.fifo.pop_front().unwrap_or(0.0)
    }

    /// Total delay in output-rate frames.
    pub fn output_latency(&self) -> usize {
        self.prime
    }

    /// Reset to the freshly constructed state.
    pub fn reset(&mut self) {
        self.inner.reset();
        self.filled = 0;
        self.input[0].fill(0.0);
        self.fifo.clear();
        self.fifo.extend(core::iter::repeat_n(0.0, self.prime));
    }
}

/// Matched up/down resampler pair for one channel and one ratio.
#[derive(Debug)]
pub struct LinearPhasePair {
    ratio: usize,
    up: SincResampler,
    down: SincResampler,
}

impl LinearPhasePair {
    /// Build the pair for `factor`. [`OversampleFactor::X1`] is rejected by
    /// the caller; a ratio of 1 would only add latency.
    pub fn new(
        factor: OversampleFactor,
        quality: ResamplerQuality,
    ) -> Result<Self, ResamplerConstructionError> {
        let ratio = factor.ratio();
        Ok(Self {
            ratio,
            up: SincResampler::new(ratio, Direction::Up, quality)?,
            down: SincResampler::new(ratio, Direction::Down, quality)?,
        })
    }

    /// Round-trip latency in base-rate samples.
    pub fn latency(&self) -> usize {
        self.up.output_latency() / self.ratio + self.down.output_latency()
    }

    /// Interpolate one base-rate sample into `out` (`out.len() == ratio`).
    #[inline]
    pub fn upsample(&mut self, x: f64, out: &mut [f64]) {
        self.up.push(x);
        for s in out.iter_mut() {
            *s = self.up.pop();
        }
    }

    /// Decimate `input` (`input.len() == ratio`) to one base-rate sample.
    #[inline]
    pub fn downsample(&mut self, input: &[f64]) -> f64 {
        for &s in input {
            self.down.push(s);
        }
        self.down.pop()
    }

    /// Reset both directions.
    pub fn reset(&mut self) {
        self.up.reset();
        self.down.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_orders_sinc_length() {
        assert!(ResamplerQuality::Low.sinc_len() < ResamplerQuality::Standard.sinc_len());
        assert!(ResamplerQuality::Standard.sinc_len() < ResamplerQuality::High.sinc_len());
    }

    #[test]
    fn latency_is_large_and_grows_with_quality() {
        let low = LinearPhasePair::new(OversampleFactor::X2, ResamplerQuality::Low).unwrap();
        let high = LinearPhasePair::new(OversampleFactor::X2, ResamplerQuality::High).unwrap();
        assert!(low.latency() >= 2 * (CHUNK_FRAMES - 1));
        assert!(high.latency() > low.latency());
    }

    #[test]
    fn upsampler_prime_aligns_to_base_rate() {
        for ratio in [2, 4, 8] {
            let up = SincResampler::new(ratio, Direction::Up, ResamplerQuality::Standard).unwrap();
            assert_eq!(up.output_latency() % ratio, 0);
        }
    }

    #[test]
    fn fifo_never_underflows() {
        for ratio in [2, 4, 8] {
            let mut up = SincResampler::new(ratio, Direction::Up, ResamplerQuality::Low).unwrap();
            let mut down =
                SincResampler::new(ratio, Direction::Down, ResamplerQuality::Low).unwrap();
            for i in 0..(CHUNK_FRAMES * 4) {
                up.push(if i % 7 == 0 { 0.3 } else { -0.1 });
                for _ in 0..ratio {
                    assert!(!up.fifo.is_empty(), "ratio {ratio}: upsampler ran dry at {i}");
                    down.push(up.pop());
                }
                assert!(!down.fifo.is_empty(), "ratio {ratio}: downsampler ran dry at {i}");
                let _ = down.pop();
                assert!(up.fifo.len() <= up.prime + up.chunk_out);
                assert!(down.fifo.len() <= down.prime + down.chunk_out);
            }
        }
    }

    fn impulse_peak(pair: &mut LinearPhasePair, position: usize) -> (usize, f64) {
        let n = pair.ratio;
        let mut buf = [0.0; 8];
        let mut peak = (0, 0.0);
        for i in 0..position + pair.latency() + CHUNK_FRAMES {
            pair.upsample(if i == position { 1.0 } else { 0.0 }, &mut buf[..n]);
            let y = pair.downsample(&buf[..n]);
            if y.abs() > peak.1 {
                peak = (i - position.min(i), y.abs());
            }
        }
        peak
    }

    #[test]
    fn impulse_peaks_at_reported_latency() {
        for quality in [ResamplerQuality::Low, ResamplerQuality::Standard, ResamplerQuality::High] {
            for factor in [OversampleFactor::X2, OversampleFactor::X4, OversampleFactor::X8] {
                let mut pair = LinearPhasePair::new(factor, quality).unwrap();
                let (at, height) = impulse_peak(&mut pair, 0);
                assert_eq!(at, pair.latency(), "{quality:?} {factor:?}");
                assert!(height > 0.8, "{quality:?} {factor:?}: peak {height}");
            }
        }
    }

    #[test]
    fn delay_does_not_depend_on_position() {
        for position in [1, 333, CHUNK_FRAMES + 77, 3 * CHUNK_FRAMES] {
            let mut pair =
                LinearPhasePair::new(OversampleFactor::X4, ResamplerQuality::Low).unwrap();
            let (at, _) = impulse_peak(&mut pair, position);
            assert_eq!(at, pair.latency(), "impulse at {position}");
        }
    }

    #[test]
    fn latency_is_two_chunks_plus_sinc() {
        for quality in [ResamplerQuality::Low, ResamplerQuality::Standard, ResamplerQuality::High] {
            let pair = LinearPhasePair::new(OversampleFactor::X2, quality).unwrap();
            assert_eq!(pair.latency(), 2 * CHUNK_FRAMES + 1 + quality.sinc_len());
        }
    }

    #[test]
    fn sine_round_trip_is_delayed_copy() {
        for factor in [OversampleFactor::X2, OversampleFactor::X4, OversampleFactor::X8] {
            let mut pair = LinearPhasePair::new(factor, ResamplerQuality::Standard).unwrap();
            let latency = pair.latency();
            let n = factor.ratio();
            let mut buf = [0.0; 8];
            let input: Vec<f64> = (0..latency + 4 * CHUNK_FRAMES)
                .map(|i| 0.5 * (2.0 * std::f64::consts::PI * 440.0 * i as f64 / 48000.0).sin())
                .collect();
            for (i, &x) in input.iter().enumerate() {
                pair.upsample(x, &mut buf[..n]);
                let y = pair.downsample(&buf[..n]);
                if i >= latency + CHUNK_FRAMES {
                    assert!(
                        (y - input[i - latency]).abs() < 5e-3,
                        "{factor:?} sample {i}: {y} vs {}",
                        input[i - latency]
                    );
                }
            }
        }
    }

    #[test]
    fn reset_restores_priming() {
        let mut pair = LinearPhasePair::new(OversampleFactor::X2, ResamplerQuality::Low).unwrap();
        let mut buf = [0.0; 2];
        for _ in 0..CHUNK_FRAMES * 3 {
            pair.upsample(0.9, &mut buf);
            pair.downsample(&buf);
        }
        pair.reset();
        assert_eq!(pair.up.fifo.len(), pair.up.prime);
        assert_eq!(pair.down.fifo.len(), pair.down.prime);
        pair.upsample(0.0, &mut buf);
        assert_eq!(buf, [0.0, 0.0]);
    }
}
