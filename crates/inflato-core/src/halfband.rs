//! Polyphase half-band stages for 2× up- and downsampling.
//!
//! A [`HalfBandStage`] owns one polyphase coefficient branch and the sample
//! history for a single (channel, cascade position) pair. Only the non-zero
//! side taps are ever multiplied; the centre tap (exactly 0.5) becomes a plain
//! delayed copy and the zero taps are skipped entirely, so no zero-stuffed
//! sequence is materialised.
//!
//! History is kept in a mirrored ring: every sample is written twice, `len`
//! apart, so the newest-first window is always one contiguous slice and a
//! push costs O(1) instead of an O(taps) shift.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use crate::design::{HalfBandParity, HalfBandSpec};

/// Mirrored ring buffer exposing the last `len` samples newest-first.
#[derive(Debug, Clone)]
struct History {
    buf: Vec<f64>,
    len: usize,
    pos: usize,
}

impl History {
    fn new(len: usize) -> Self {
        let len = len.max(1);
        Self {
            buf: vec![0.0; 2 * len],
            len,
            pos: 0,
        }
    }

    #[inline]
    fn push(&mut self, x: f64) {
        self.pos = if self.pos == 0 { self.len - 1 } else { self.pos - 1 };
        self.buf[self.pos] = x;
        self.buf[self.pos + self.len] = x;
    }

    /// `window()[k]` is the sample pushed `k` pushes ago.
    #[inline]
    fn window(&self) -> &[f64] {
        &self.buf[self.pos..self.pos + self.len]
    }

    fn clear(&mut self) {
        self.buf.fill(0.0);
        self.pos = 0;
    }
}

/// Symmetric dot product `Σ g[j]·(w[j] + w[L-1-j])` over the tap pairs.
#[inline]
fn symmetric_dot(half: &[f64], window: &[f64]) -> f64 {
    let last = window.len() - 1;
    half.iter()
        .enumerate()
        .map(|(j, &g)| g * (window[j] + window[last - j]))
        .sum()
}

/// One half-band rate-conversion stage.
///
/// Use an instance in one direction only: either call
/// [`upsample`](Self::upsample) or [`downsample`](Self::downsample) on it,
/// never both, since the two directions interpret the history differently.
///
/// # Example
///
/// ```rust
/// use inflato_core::{HalfBandSpec, HalfBandStage};
///
/// let spec = HalfBandSpec::design(96000.0, 21600.0, 90.0, 1);
/// let mut up = HalfBandStage::new(&spec);
/// let mut down = HalfBandStage::new(&spec);
///
/// let (a, b) = up.upsample(1.0);
/// let y = down.downsample(a, b);
/// assert!(y.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct HalfBandStage {
    /// First half of the symmetric polyphase branch.
    half: Vec<f64>,
    parity: HalfBandParity,
    /// Offset of the centre-tap copy within the history window.
    center: usize,
    half_len: usize,
    /// Upsampler input history, or downsampler "early" branch.
    early: History,
    /// Downsampler "late" branch.
    late: History,
}

impl HalfBandStage {
    /// Create a stage with cleared history.
    pub fn new(spec: &HalfBandSpec) -> Self {
        let poly = spec.polyphase();
        let len = poly.len();
        let half = poly[..spec.quarter_len()].to_vec();
        let parity = spec.parity();
        let m = spec.half_len();
        let center = match parity {
            HalfBandParity::Odd => (m - 1) / 2,
            HalfBandParity::Even => m / 2,
        };
        Self {
            half,
            parity,
            center,
            half_len: m,
            early: History::new(len),
            late: History::new(len),
        }
    }

    /// Group delay in samples at the stage's fast (2×) side.
    pub fn latency(&self) -> usize {
        self.half_len
    }

    /// Interpolate one input sample into two output samples.
    ///
    /// The pair is `(y[2m], y[2m+1])` of the 2× stream, including the factor
    /// of two that restores the level lost to zero insertion.
    #[inline]
    pub fn upsample(&mut self, x: f64) -> (f64, f64) {
        self.early.push(x);
        let window = self.early.window();
        let filtered = 2.0 * symmetric_dot(&self.half, window);
        let delayed = window[self.center];
        match self.parity {
            HalfBandParity::Odd => (filtered, delayed),
            HalfBandParity::Even => (delayed, filtered),
        }
    }

    /// Decimate two consecutive input samples (`a` earlier, `b` later) into
    /// one output sample.
    #[inline]
    pub fn downsample(&mut self, a: f64, b: f64) -> f64 {
        self.early.push(a);
        // The late branch contributes only samples preceding `a`.
        let y = match self.parity {
            HalfBandParity::Odd => {
                symmetric_dot(&self.half, self.early.window())
                    + 0.5 * self.late.window()[self.center]
            }
            HalfBandParity::Even => {
                symmetric_dot(&self.half, self.late.window())
                    + 0.5 * self.early.window()[self.center]
            }
        };
        self.late.push(b);
        y
    }

    /// Clear all history.
    pub fn reset(&mut self) {
        self.early.clear();
        self.late.clear();
    }
}
