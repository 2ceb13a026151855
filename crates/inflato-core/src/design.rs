//! Kaiser-window FIR design and the half-band specialisation used by the
//! oversampling cascade.
//!
//! # Algorithm
//!
//! The ideal band-pass response between `Fa` and `Fb` at sample rate `Fs` is
//!
//! ```text
//! A[0] = 2 (Fb - Fa) / Fs
//! A[j] = (sin(2πj·Fb/Fs) - sin(2πj·Fa/Fs)) / (πj)
//! ```
//!
//! which is truncated to `2·Np + 1` taps and weighted by a Kaiser window
//!
//! ```text
//! w[j] = I0(β·sqrt(1 - j²/Np²)) / I0(β)
//! ```
//!
//! The shape parameter β follows Kaiser's empirical formula for the desired
//! stopband attenuation, and the tap count follows his order estimate.
//!
//! A half-band filter places the cutoff at exactly a quarter of the working
//! rate. Every second tap (counting from the centre) is then zero and the
//! centre tap is exactly 0.5, which the polyphase stages in
//! [`halfband`](crate::halfband) exploit.
//!
//! # References
//!
//! - J. F. Kaiser, "Nonrecursive Digital Filter Design Using the I0-sinh
//!   Window Function", IEEE ISCAS 1974.
//! - P. P. Vaidyanathan, *Multirate Systems and Filter Banks*, ch. 4.6.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use core::f64::consts::PI;
use libm::{ceil, pow, sin, sqrt};

/// Relative termination threshold of the Bessel power series.
const BESSEL_EPSILON: f64 = 1e-6;

/// Kaiser window shape parameter for a stopband attenuation in dB.
///
/// Three regions:
///
/// | Attenuation | β |
/// |-------------|---|
/// | < 21 dB | 0 (rectangular) |
/// | 21–50 dB | `0.5842 (A-21)^0.4 + 0.07886 (A-21)` |
/// | > 50 dB | `0.1102 (A - 8.7)` |
pub fn kaiser_beta(attenuation_db: f64) -> f64 {
    if attenuation_db > 50.0 {
        0.1102 * (attenuation_db - 8.7)
    } else if attenuation_db >= 21.0 {
        let a = attenuation_db - 21.0;
        0.5842 * pow(a, 0.4) + 0.07886 * a
    } else {
        0.0
    }
}

/// Zeroth-order modified Bessel function of the first kind.
///
/// Evaluated with its power series, stopping once the added term falls
/// below `1e-6` of the running sum.
pub fn bessel_i0(x: f64) -> f64 {
    let half_sq = x * x * 0.25;
    let mut term = 1.0;
    let mut sum = 1.0;
    let mut k = 0.0;
    loop {
        k += 1.0;
        term *= half_sq / (k * k);
        sum += term;
        if term <= sum * BESSEL_EPSILON {
            return sum;
        }
    }
}

/// Kaiser's estimate of the (odd) tap count needed for a given attenuation
/// and a transition width normalised to the sample rate.
///
/// `N = (A - 7.95) / (14.36 Δf) + 1`, rounded up to the next odd integer.
pub fn estimate_taps(attenuation_db: f64, transition_width: f64) -> usize {
    let width = transition_width.max(1e-6);
    let order = ceil((attenuation_db - 7.95).max(0.0) / (14.36 * width)) as usize + 1;
    order | 1
}

/// Design a symmetric Kaiser-windowed band-pass FIR.
///
/// Pass `band_start = 0` for a low-pass. `taps` is forced odd; the returned
/// vector has that length and satisfies `h[j] == h[taps - 1 - j]` exactly.
///
/// # Arguments
/// * `sample_rate` - Rate the filter runs at, in Hz
/// * `band_start` - Lower band edge in Hz
/// * `band_end` - Upper band edge in Hz
/// * `taps` - Number of coefficients
/// * `attenuation_db` - Target stopband attenuation
pub fn kaiser_design(
    sample_rate: f64,
    band_start: f64,
    band_end: f64,
    taps: usize,
    attenuation_db: f64,
) -> Vec<f64> {
    let taps = taps.max(1) | 1;
    let np = (taps - 1) / 2;
    let a0 = 2.0 * (band_end - band_start) / sample_rate;
    if np == 0 {
        return vec![a0];
    }

    let beta = kaiser_beta(attenuation_db);
    let inv_i0_beta = 1.0 / bessel_i0(beta);
    let npf = np as f64;
    let wa = 2.0 * PI * band_start / sample_rate;
    let wb = 2.0 * PI * band_end / sample_rate;

    let mut h = vec![0.0; taps];
    h[np] = a0;
    for j in 1..=np {
        let jf = j as f64;
        let ideal = (sin(jf * wb) - sin(jf * wa)) / (PI * jf);
        // At j == Np the radicand is 1 - Np²/Np², which may round to a
        // tiny negative value; the window value there is exactly I0(0)/I0(β).
        let window = if j == np {
            inv_i0_beta
        } else {
            let r = jf / npf;
            bessel_i0(beta * sqrt(1.0 - r * r)) * inv_i0_beta
        };
        let coef = ideal * window;
        h[np + j] = coef;
        h[np - j] = coef;
    }
    h
}

/// Parity class of a half-band filter's half-length `M = (N - 1) / 2`.
///
/// Determines which polyphase branch carries the centre tap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HalfBandParity {
    /// `M` odd (`N mod 4 == 3`): the centre tap sits in the odd branch.
    Odd,
    /// `M` even (`N mod 4 == 1`): the centre tap sits in the even branch.
    Even,
}

/// An immutable half-band filter design.
///
/// Created once per (working rate, tap count) and shared read-only by every
/// stage that runs at that rate.
#[derive(Debug, Clone, PartialEq)]
pub struct HalfBandSpec {
    taps: Vec<f64>,
    half_len: usize,
}

impl HalfBandSpec {
    /// Design a half-band low-pass for a stage running at `working_rate`.
    ///
    /// The cutoff is fixed at `working_rate / 4`. The passband extends to
    /// `passband_edge` Hz and the stopband starts at its mirror image
    /// `working_rate / 2 - passband_edge`. The half-length `M` is rounded up
    /// to a multiple of `align` (use `2^(stage - 1)` in a cascade so every
    /// stage delay is a whole number of base-rate samples).
    pub fn design(
        working_rate: f64,
        passband_edge: f64,
        attenuation_db: f64,
        align: usize,
    ) -> Self {
        let quarter = working_rate * 0.25;
        let passband_edge = passband_edge.clamp(working_rate * 0.01, quarter * 0.98);
        let transition = (working_rate * 0.5 - 2.0 * passband_edge) / working_rate;
        let estimated = estimate_taps(attenuation_db, transition);

        let align = align.max(1);
        let half_len = (estimated - 1) / 2;
        let half_len = half_len.max(1).div_ceil(align) * align;
        let taps = kaiser_design(working_rate, 0.0, quarter, 2 * half_len + 1, attenuation_db);
        Self::from_prototype(taps)
    }

    /// Build a spec from an odd-length symmetric prototype.
    ///
    /// Enforces the half-band structure: taps at even non-zero offsets from
    /// the centre are set to exactly zero, the centre is set to 0.5 and the
    /// remaining taps are scaled to sum to 0.5 (unity DC gain).
    pub fn from_prototype(mut taps: Vec<f64>) -> Self {
        if taps.len() % 2 == 0 {
            taps.push(0.0);
        }
        let half_len = (taps.len() - 1) / 2;
        let mut side_sum = 0.0;
        for (i, tap) in taps.iter_mut().enumerate() {
            let offset = i.abs_diff(half_len);
            if offset == 0 {
                *tap = 0.5;
            } else if offset % 2 == 0 {
                *tap = 0.0;
            } else {
                side_sum += *tap;
            }
        }
        if side_sum.abs() > f64::EPSILON {
            let scale = 0.5 / side_sum;
            for (i, tap) in taps.iter_mut().enumerate() {
                if i.abs_diff(half_len) % 2 == 1 {
                    *tap *= scale;
                }
            }
        }
        Self { taps, half_len }
    }

    /// Full coefficient sequence.
    pub fn taps(&self) -> &[f64] {
        &self.taps
    }

    /// Number of taps `N`.
    pub fn tap_count(&self) -> usize {
        self.taps.len()
    }

    /// Half-length `M = (N - 1) / 2`, also the group delay in samples of
    /// the stage's working rate.
    pub fn half_len(&self) -> usize {
        self.half_len
    }

    /// Parity class of [`half_len`](Self::half_len).
    pub fn parity(&self) -> HalfBandParity {
        if self.half_len % 2 == 1 {
            HalfBandParity::Odd
        } else {
            HalfBandParity::Even
        }
    }

    /// Index of the first tap of the polyphase branch holding the non-zero
    /// side taps (`(M + 1) mod 2`).
    pub fn start(&self) -> usize {
        (self.half_len + 1) % 2
    }

    /// Polyphase branch coefficients `g[j] = h[start + 2j]`.
    ///
    /// Symmetric, with even length `M + 1` (odd parity) or `M` (even parity).
    pub fn polyphase(&self) -> Vec<f64> {
        self.taps.iter().skip(self.start()).step_by(2).copied().collect()
    }

    /// Half of the polyphase length, i.e. the number of symmetric tap pairs.
    pub fn quarter_len(&self) -> usize {
        self.polyphase_len() / 2
    }

    /// Length of the polyphase branch.
    pub fn polyphase_len(&self) -> usize {
        match self.parity() {
            HalfBandParity::Odd => self.half_len + 1,
            HalfBandParity::Even => self.half_len,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn beta_regions() {
        assert_eq!(kaiser_beta(10.0), 0.0);
        assert!((kaiser_beta(21.0)).abs() < 1e-12);
        let mid = kaiser_beta(40.0);
        assert!((mid - (0.5842 * pow(19.0, 0.4) + 0.07886 * 19.0)).abs() < 1e-12);
        assert!((kaiser_beta(90.0) - 0.1102 * 81.3).abs() < 1e-12);
    }

    #[test]
    fn bessel_known_values() {
        assert_eq!(bessel_i0(0.0), 1.0);
        assert!((bessel_i0(1.0) - 1.266_065_878).abs() < 1e-5);
        let i0_5 = bessel_i0(5.0);
        assert!((i0_5 - 27.239_871_82).abs() / 27.24 < 1e-5);
    }

    #[test]
    fn tap_estimate_is_odd_and_grows_with_attenuation() {
        let low = estimate_taps(40.0, 0.05);
        let high = estimate_taps(90.0, 0.05);
        assert_eq!(low % 2, 1);
        assert_eq!(high % 2, 1);
        assert!(high > low);
    }

    #[test]
    fn design_is_symmetric_and_finite() {
        let h = kaiser_design(96000.0, 0.0, 24000.0, 101, 90.0);
        assert_eq!(h.len(), 101);
        for j in 0..h.len() {
            assert!(h[j].is_finite());
            assert_eq!(h[j], h[h.len() - 1 - j]);
        }
    }

    #[test]
    fn design_forces_odd_length() {
        assert_eq!(kaiser_design(48000.0, 0.0, 12000.0, 20, 60.0).len(), 21);
        assert_eq!(kaiser_design(48000.0, 0.0, 12000.0, 0, 60.0).len(), 1);
    }

    #[test]
    fn halfband_structure() {
        let spec = HalfBandSpec::design(96000.0, 21600.0, 90.0, 1);
        let m = spec.half_len();
        let taps = spec.taps();
        assert_eq!(taps[m], 0.5);
        for (i, &t) in taps.iter().enumerate() {
            let offset = i.abs_diff(m);
            if offset != 0 && offset % 2 == 0 {
                assert_eq!(t, 0.0, "tap {i} should be zero");
            }
        }
        let dc: f64 = taps.iter().sum();
        assert!((dc - 1.0).abs() < 1e-12, "DC gain {dc}");
    }

    #[test]
    fn halfband_alignment() {
        for align in [1, 2, 4] {
            let spec = HalfBandSpec::design(192000.0, 21600.0, 90.0, align);
            assert_eq!(spec.half_len() % align, 0);
            assert_eq!(spec.tap_count(), 2 * spec.half_len() + 1);
        }
    }

    #[test]
    fn polyphase_branch_is_symmetric_with_even_length() {
        for rate in [96000.0, 192000.0, 384000.0] {
            for align in [1, 2, 4] {
                let spec = HalfBandSpec::design(rate, 21600.0, 90.0, align);
                let g = spec.polyphase();
                assert_eq!(g.len(), spec.polyphase_len());
                assert_eq!(g.len() % 2, 0);
                for j in 0..g.len() {
                    assert!((g[j] - g[g.len() - 1 - j]).abs() < 1e-15);
                }
                let sum: f64 = g.iter().sum();
                assert!((sum - 0.5).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn halfband_stopband_attenuation() {
        let spec = HalfBandSpec::design(96000.0, 21600.0, 90.0, 1);
        // Evaluate |H(f)| at a few stopband frequencies.
        for f in [26400.0, 30000.0, 40000.0, 47000.0] {
            let w = 2.0 * PI * f / 96000.0;
            let (mut re, mut im) = (0.0, 0.0);
            for (n, &h) in spec.taps().iter().enumerate() {
                re += h * libm::cos(w * n as f64);
                im -= h * libm::sin(w * n as f64);
            }
            let mag = sqrt(re * re + im * im);
            assert!(mag < 1e-3, "stopband leak {mag} at {f} Hz");
        }
    }
}
