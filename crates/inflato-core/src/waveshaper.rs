//! The inflator transfer curve.
//!
//! A piecewise polynomial that lifts low and mid-level material toward full
//! scale while leaving the unit peak fixed:
//!
//! ```text
//! s = |x|
//! s ≥ 2     →  0
//! 1 < s < 2 →  sign(x)·(2s - s²)
//! s ≤ 1     →  sign(x)·(A·s + B·s² + C·s³ - D·(s² - 2s³ + s⁴))
//! ```
//!
//! with, for `c = curve / 100` (`curve` in -50..=50):
//!
//! ```text
//! A = 1.5 + c        B = -2c
//! C = c - 0.5        D = 0.0625 - 0.25c + 0.25c²
//! ```
//!
//! Every curve passes through `(1, 1)`, where the quadratic taper takes over
//! and falls back to zero at `s = 2`. At `curve = 0` the curve is monotone on
//! `[0, 1]` and never drops below the identity.
//!
//! | `curve` | Character |
//! |---------|-----------|
//! | -50 | Close to linear, gentle lift |
//! | 0 | Default inflation |
//! | +50 | Strongest lift of low-level detail |

/// Lowest accepted curve value.
pub const CURVE_MIN: f64 = -50.0;

/// Highest accepted curve value.
pub const CURVE_MAX: f64 = 50.0;

/// Stateless waveshaper holding the curve coefficients.
///
/// # Example
///
/// ```rust
/// use inflato_core::Waveshaper;
///
/// let shaper = Waveshaper::default();
/// assert_eq!(shaper.shape(0.0), 0.0);
/// assert_eq!(shaper.shape(1.0), 1.0);
/// assert_eq!(shaper.shape(-0.3), -shaper.shape(0.3));
/// assert_eq!(shaper.shape(2.5), 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waveshaper {
    curve: f64,
    a: f64,
    b: f64,
    c: f64,
    d: f64,
}

impl Waveshaper {
    /// Create a shaper for a curve value in -50..=50.
    pub fn new(curve: f64) -> Self {
        let mut shaper = Self {
            curve: 0.0,
            a: 0.0,
            b: 0.0,
            c: 0.0,
            d: 0.0,
        };
        shaper.set_curve(curve);
        shaper
    }

    /// Recompute the coefficients. Values are clamped to -50..=50.
    pub fn set_curve(&mut self, curve: f64) {
        let curve = if curve.is_finite() { curve.clamp(CURVE_MIN, CURVE_MAX) } else { 0.0 };
        let pct = curve / 100.0;
        self.curve = curve;
        self.a = 1.5 + pct;
        self.b = -2.0 * pct;
        self.c = pct - 0.5;
        self.d = 0.0625 - 0.25 * pct + 0.25 * pct * pct;
    }

    /// Current curve value.
    pub fn curve(&self) -> f64 {
        self.curve
    }

    /// Coefficients `(A, B, C, D)`.
    pub fn coefficients(&self) -> (f64, f64, f64, f64) {
        (self.a, self.b, self.c, self.d)
    }

    /// Apply the transfer curve. NaN maps to zero.
    #[inline]
    pub fn shape(&self, x: f64) -> f64 {
        let s = x.abs();
        if s.is_nan() || s >= 2.0 {
            return 0.0;
        }
        let y = if s > 1.0 {
            2.0 * s - s * s
        } else {
            let s2 = s * s;
            let s3 = s2 * s;
            self.a * s + self.b * s2 + self.c * s3 - self.d * (s2 - 2.0 * s3 + s2 * s2)
        };
        if x < 0.0 { -y } else { y }
    }
}

impl Default for Waveshaper {
    fn default() -> Self {
        Self::new(0.0)
    }
}
