//! Level follower for metering.
//!
//! Smooths in the decibel domain, so attack and release behave uniformly
//! across the whole dynamic range of a VU display.

use libm::{exp, log10, pow, sqrt};

/// Silence floor in dB (of the detected level).
pub const FLOOR_DB: f64 = -100.0;

/// Attack time as a fraction of the configured decay time.
pub const ATTACK_RATIO: f64 = 0.01;

/// What the follower measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetectionMode {
    /// Instantaneous magnitude `|x|`.
    Peak,
    /// Smoothed power `x²`; the exposed level is its square root.
    #[default]
    Rms,
}

impl DetectionMode {
    /// dB per dB of amplitude for the detected quantity (1 for peak, 2 for power).
    fn exponent(self) -> f64 {
        match self {
            Self::Peak => 1.0,
            Self::Rms => 2.0,
        }
    }
}

/// Envelope follower with asymmetric one-pole smoothing of the level in dB.
///
/// Per sample the detected value is converted to dB; if it exceeds the
/// current state the attack coefficient is used, otherwise the release
/// coefficient:
///
/// ```text
/// state = α·state + (1 - α)·new_db
/// α     = exp(-1 / (sample_rate · τ))
/// ```
///
/// The attack time constant is 1% of the decay time, release equals the
/// decay time.
///
/// # Example
///
/// ```rust
/// use inflato_core::{DetectionMode, EnvelopeFollower};
///
/// let mut env = EnvelopeFollower::new(48000.0, 0.3, DetectionMode::Peak);
/// for _ in 0..48000 {
///     env.process(0.5);
/// }
/// assert!((env.level() - 0.5).abs() < 1e-3);
/// ```
#[derive(Debug, Clone)]
pub struct EnvelopeFollower {
    /// Detected level in dB (power dB for RMS).
    state: f64,
    attack_coeff: f64,
    release_coeff: f64,
    sample_rate: f64,
    decay_seconds: f64,
    mode: DetectionMode,
}

impl EnvelopeFollower {
    /// Create a follower starting at the silence floor.
    pub fn new(sample_rate: f64, decay_seconds: f64, mode: DetectionMode) -> Self {
        let mut follower = Self {
            state: FLOOR_DB * mode.exponent(),
            attack_coeff: 0.0,
            release_coeff: 0.0,
            sample_rate,
            decay_seconds,
            mode,
        };
        follower.recalculate_coefficients();
        follower
    }

    /// Set the decay (release) time in seconds.
    pub fn set_decay(&mut self, decay_seconds: f64) {
        self.decay_seconds = decay_seconds;
        self.recalculate_coefficients();
    }

    /// Update the sample rate.
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
        self.recalculate_coefficients();
    }

    /// Decay time in seconds.
    pub fn decay(&self) -> f64 {
        self.decay_seconds
    }

    /// Detection mode.
    pub fn mode(&self) -> DetectionMode {
        self.mode
    }

    /// Feed one sample and return the updated linear level.
    #[inline]
    pub fn process(&mut self, x: f64) -> f64 {
        let floor = FLOOR_DB * self.mode.exponent();
        let detected = match self.mode {
            DetectionMode::Peak => x.abs(),
            DetectionMode::Rms => x * x,
        };
        let new_db = if detected > 0.0 {
            (20.0 * log10(detected)).max(floor)
        } else {
            floor
        };
        let coeff = if new_db > self.state {
            self.attack_coeff
        } else {
            self.release_coeff
        };
        self.state = coeff * self.state + (1.0 - coeff) * new_db;
        self.level()
    }

    /// Current level as linear amplitude (never negative).
    pub fn level(&self) -> f64 {
        let value = pow(10.0, self.state / 20.0);
        match self.mode {
            DetectionMode::Peak => value,
            DetectionMode::Rms => sqrt(value),
        }
    }

    /// Current level in dB of amplitude, at or above [`FLOOR_DB`].
    pub fn level_db(&self) -> f64 {
        self.state / self.mode.exponent()
    }

    /// Return to the silence floor.
    pub fn reset(&mut self) {
        self.state = FLOOR_DB * self.mode.exponent();
    }

    fn recalculate_coefficients(&mut self) {
        let decay = self.decay_seconds.max(1e-4);
        let attack = decay * ATTACK_RATIO;
        self.attack_coeff = exp(-1.0 / (self.sample_rate * attack));
        self.release_coeff = exp(-1.0 / (self.sample_rate * decay));
    }
}
